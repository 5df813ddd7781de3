//! Concurrent Memory Scramble board.
//!
//! The [`Board`] is a thread-safe, mutable grid of cards shared by any
//! number of players at once. There are no turns: players race to flip
//! pairs, and correctness rests on a card-ownership discipline instead of
//! turn arbitration.
//!
//! All state transitions are serialised by a single board monitor (an async
//! mutex). Exactly one operation mutates at a time, and the representation
//! invariants are debug-checked before every monitor release. A flip that
//! collides with another player's first card releases the monitor, parks on
//! a hand-off promise, and re-acquires the monitor once the controller lets
//! go. Waiter resolution and watcher notification always happen after the
//! monitor has been released.

mod card;
mod error;
mod invariants;
mod player;
mod position;
mod state;
mod waiters;
mod watchers;

pub use card::Card;
pub use error::BoardError;
pub use position::Position;

use player::PlayerId;
use position::Dimensions;
use state::{BoardState, Effects, FirstCard};
use std::future::Future;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use waiters::HandOff;

/// A shared Memory Scramble board.
///
/// Clone-free: callers wrap the board in an [`std::sync::Arc`] and invoke
/// operations through shared references. Player and viewer identities are
/// opaque non-blank strings; card tokens are non-empty strings with no
/// whitespace.
#[derive(Debug)]
pub struct Board {
    state: Mutex<BoardState>,
}

impl Board {
    /// Builds a board from a row count, a column count, and `rows * cols`
    /// card tokens in row-major order. Every cell starts face-down, and the
    /// token sequence is kept as the target of future [`Board::reset`]
    /// calls.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::BadArgument`] when a dimension is zero, the
    /// token count does not match the grid, or a token is empty or contains
    /// whitespace.
    #[instrument(skip(cards), fields(card_count = cards.len()))]
    pub fn new(rows: usize, cols: usize, cards: Vec<String>) -> Result<Self, BoardError> {
        let dims = Dimensions::new(rows, cols)?;
        if cards.len() != dims.len() {
            return Err(BoardError::bad_argument(format!(
                "expected {} cards for a {} board, got {}",
                dims.len(),
                dims,
                cards.len()
            )));
        }
        let cards = cards
            .iter()
            .map(|raw| Card::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;
        info!(%dims, "board constructed");
        Ok(Self {
            state: Mutex::new(BoardState::new(dims, cards)),
        })
    }

    /// Renders the board as seen by `viewer`.
    ///
    /// The rendering is a `<rows>x<cols>` header line followed by one line
    /// per cell in row-major order: `none` for a removed card, `down` for a
    /// face-down card, `my <token>` for a face-up card the viewer controls,
    /// and `up <token>` for any other face-up card.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::BadArgument`] when `viewer` is blank.
    #[instrument(skip(self))]
    pub async fn view(&self, viewer: &str) -> Result<String, BoardError> {
        let viewer = PlayerId::parse(viewer)?;
        let state = self.state.lock().await;
        Ok(state.render(&viewer))
    }

    /// Flips the card at `(row, col)` for `player`.
    ///
    /// A flip is the player's first or second card of a turn, decided by
    /// their tracked state. Before a first card, the player's previous
    /// finished turn is settled: a matched pair is removed from the board,
    /// an unmatched pair is turned back face-down where still possible.
    ///
    /// A first-card flip on a card another player controls blocks until
    /// that control is released; the monitor is not held while blocked. A
    /// second-card flip never blocks: an empty or already-controlled target
    /// fails immediately, and the player loses control of their first card.
    /// That loss is real and observable through [`Board::view`].
    ///
    /// # Errors
    ///
    /// - [`BoardError::BadArgument`]: blank player or out-of-bounds
    ///   position; raised before any state change.
    /// - [`BoardError::NoCardAtPosition`]: the target cell is empty.
    /// - [`BoardError::CardAlreadyControlled`]: a second flip targeted a
    ///   controlled card (including the player's own first card).
    /// - [`BoardError::Cancelled`]: the board was reset while this flip
    ///   was blocked.
    #[instrument(skip(self))]
    pub async fn flip(&self, player: &str, row: usize, col: usize) -> Result<(), BoardError> {
        let player = PlayerId::parse(player)?;
        let mut state = self.state.lock().await;
        let target = state.dims().checked(row, col)?;
        let mut effects = Effects::default();

        state.cleanup_turn(&player, target, &mut effects);

        let result = match state.open_turn(&player) {
            Some(first) => state.second_card(&player, first, target, &mut effects),
            None => loop {
                match state.begin_first_card(&player, target, &mut effects) {
                    FirstCard::Taken => break Ok(()),
                    FirstCard::Gone => break Err(BoardError::no_card(target)),
                    FirstCard::Busy(handoff) => {
                        state.check();
                        drop(state);
                        self.settle(&mut effects).await;
                        debug!(%player, %target, "blocked on controlled card");
                        match handoff.await {
                            Ok(HandOff::Released) => {}
                            Ok(HandOff::Cancelled) | Err(_) => {
                                return Err(BoardError::Cancelled)
                            }
                        }
                        state = self.state.lock().await;
                    }
                }
            },
        };

        state.check();
        drop(state);
        self.settle(&mut effects).await;
        result
    }

    /// Applies `transform` to every card value on the board.
    ///
    /// Positions are grouped by their current token; `transform` runs
    /// exactly once per distinct token, with all groups computed
    /// concurrently while the monitor is free. Each group is then applied
    /// atomically: cards that were equal stay equal through the transform,
    /// and no viewer ever observes a group half-replaced. A position whose
    /// card changed between snapshot and apply is left alone. Face state
    /// and control are preserved.
    ///
    /// `transform` must be a pure function of its input.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::BadArgument`] when a transformed token is
    /// empty or contains whitespace. No group is applied in that case.
    pub async fn map<F, Fut>(&self, transform: F) -> Result<(), BoardError>
    where
        F: Fn(Card) -> Fut,
        Fut: Future<Output = String>,
    {
        let groups = {
            let state = self.state.lock().await;
            state.cards_by_value()
        };

        let computed =
            futures::future::join_all(groups.into_iter().map(|(card, positions)| {
                let replacement = transform(card.clone());
                async move { (card, positions, replacement.await) }
            }))
            .await;

        let mut replacements = Vec::with_capacity(computed.len());
        for (original, positions, raw) in computed {
            if raw == original.as_str() {
                continue;
            }
            let replacement = Card::parse(&raw)?;
            replacements.push((original, replacement, positions));
        }

        for (original, replacement, positions) in replacements {
            let changed = {
                let mut state = self.state.lock().await;
                let changed = state.replace_group(&original, &replacement, &positions);
                state.check();
                changed
            };
            if changed {
                self.notify_watchers().await;
            }
        }
        Ok(())
    }

    /// Waits for the next visible board change and returns a fresh
    /// rendering for `viewer`.
    ///
    /// Visible changes are cards turning face-up or face-down, removals,
    /// token replacements, and resets. A control transfer that leaves faces
    /// untouched does not count. The registration is one-shot: a long-poll
    /// client re-registers after each delivery.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::BadArgument`] when `viewer` is blank, or
    /// [`BoardError::Cancelled`] when the board is dropped before the next
    /// visible change.
    #[instrument(skip(self))]
    pub async fn watch(&self, viewer: &str) -> Result<String, BoardError> {
        let viewer = PlayerId::parse(viewer)?;
        let receiver = {
            let mut state = self.state.lock().await;
            state.register_watcher(viewer)
        };
        receiver.await.map_err(|_| BoardError::Cancelled)
    }

    /// Restores every cell to its initial card, face-down, clears all
    /// control and player state, and cancels every blocked flip.
    ///
    /// Watchers are always notified, even when the board was already in its
    /// initial state.
    #[instrument(skip(self))]
    pub async fn reset(&self) {
        let cancelled = {
            let mut state = self.state.lock().await;
            let cancelled = state.restore_initial();
            state.check();
            cancelled
        };
        info!(cancelled = cancelled.len(), "board reset");
        for waiter in cancelled {
            let _ = waiter.send(HandOff::Cancelled);
        }
        self.notify_watchers().await;
    }

    /// Resolves collected waiters, then runs the watcher fan-out when the
    /// operation changed visible state. Must be called with the monitor
    /// released.
    async fn settle(&self, effects: &mut Effects) {
        for waiter in effects.wakes.drain(..) {
            // An abandoned waiter is gone; resolving it is a no-op.
            let _ = waiter.send(HandOff::Released);
        }
        if std::mem::take(&mut effects.visible) {
            self.notify_watchers().await;
        }
    }

    /// Snapshots and clears the watcher registry, then resolves each
    /// watcher with a current rendering for its viewer. Renderings may
    /// reflect later state than the triggering change if further visible
    /// changes have already landed.
    async fn notify_watchers(&self) {
        let pending = {
            let mut state = self.state.lock().await;
            if state.watcher_count() == 0 {
                return;
            }
            state.drain_watchers()
        };
        for (viewer, watcher) in pending {
            let rendering = {
                let state = self.state.lock().await;
                state.render(&viewer)
            };
            let _ = watcher.send(rendering);
        }
    }
}
