//! One-shot registry of viewers awaiting the next visible change.

use super::player::PlayerId;
use tokio::sync::oneshot;
use tracing::debug;

/// Watchers blocked until the board changes visibly.
///
/// Registration and draining both happen under the board monitor; the
/// drained senders are resolved outside it, each with a fresh per-viewer
/// rendering. Draining makes every watcher one-shot: a long-poll client
/// re-registers after each delivery.
#[derive(Debug, Default)]
pub(crate) struct WatcherRegistry {
    pending: Vec<(PlayerId, oneshot::Sender<String>)>,
}

impl WatcherRegistry {
    /// Registers a watcher for `viewer` and returns its receiving half.
    pub(crate) fn register(&mut self, viewer: PlayerId) -> oneshot::Receiver<String> {
        let (tx, rx) = oneshot::channel();
        self.pending.push((viewer, tx));
        debug!(pending = self.pending.len(), "watcher registered");
        rx
    }

    /// Takes the whole registry, leaving it empty.
    pub(crate) fn drain(&mut self) -> Vec<(PlayerId, oneshot::Sender<String>)> {
        std::mem::take(&mut self.pending)
    }

    /// Number of registered watchers.
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}
