//! Hand-off queue for flips blocked on a controlled card.

use super::position::Position;
use std::collections::HashMap;
use tokio::sync::oneshot;
use tracing::debug;

/// Outcome delivered to a blocked flip when its wait ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HandOff {
    /// The controlling player released the card; re-examine it.
    Released,
    /// The board was reset while waiting.
    Cancelled,
}

/// Pending hand-off promises, keyed by position.
///
/// Each queue is insertion-ordered, but resolution order carries no fairness
/// guarantee: releasing a position pops the whole queue at once. Senders are
/// dispatched only after the board monitor is released.
#[derive(Debug, Default)]
pub(crate) struct WaiterRegistry {
    queues: HashMap<Position, Vec<oneshot::Sender<HandOff>>>,
}

impl WaiterRegistry {
    /// Registers a fresh waiter on `pos` and returns its receiving half.
    ///
    /// Entries whose receiver has already been dropped (the blocked flip was
    /// cancelled by its caller) are pruned here, so an abandoned wait does
    /// not leak a queue slot.
    pub(crate) fn enqueue(&mut self, pos: Position) -> oneshot::Receiver<HandOff> {
        let queue = self.queues.entry(pos).or_default();
        queue.retain(|sender| !sender.is_closed());
        let (tx, rx) = oneshot::channel();
        queue.push(tx);
        debug!(%pos, pending = queue.len(), "flip waiting for control hand-off");
        rx
    }

    /// Removes and returns every waiter queued on `pos`.
    pub(crate) fn drain(&mut self, pos: Position) -> Vec<oneshot::Sender<HandOff>> {
        self.queues.remove(&pos).unwrap_or_default()
    }

    /// Removes and returns every waiter on every position.
    pub(crate) fn drain_all(&mut self) -> Vec<oneshot::Sender<HandOff>> {
        self.queues.drain().flat_map(|(_, queue)| queue).collect()
    }

    /// Positions that currently have at least one queued waiter.
    pub(crate) fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.queues.keys().copied()
    }
}
