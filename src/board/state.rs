//! Mutable board representation, guarded by the board monitor.
//!
//! Every method here runs with the monitor held. Mutations that other
//! players can observe are folded into an [`Effects`] value; the façade
//! dispatches those effects only after the monitor is released.

use super::card::{Card, Cell};
use super::error::BoardError;
use super::invariants;
use super::player::{PlayerId, PlayerState};
use super::position::{Dimensions, Position};
use super::waiters::{HandOff, WaiterRegistry};
use super::watchers::WatcherRegistry;
use std::collections::HashMap;
use tokio::sync::oneshot;
use tracing::debug;

/// Wake-ups and visibility collected while the monitor is held.
///
/// Waiter promises are resolved first, then the watcher fan-out runs if any
/// change was visible. A control transfer on an already-face-up card leaves
/// `visible` untouched, so watchers sleep through it.
#[derive(Debug, Default)]
pub(crate) struct Effects {
    /// Waiters to resolve with [`HandOff::Released`].
    pub(crate) wakes: Vec<oneshot::Sender<HandOff>>,
    /// Whether any face, value, or removal change occurred.
    pub(crate) visible: bool,
}

/// Next step for a first-card flip attempt.
pub(crate) enum FirstCard {
    /// The card is face-up and under the caller's control.
    Taken,
    /// Another player controls the card: await the hand-off, then retry.
    Busy(oneshot::Receiver<HandOff>),
    /// The cell is empty.
    Gone,
}

/// The grid and all coordination state the board owns.
#[derive(Debug)]
pub(crate) struct BoardState {
    dims: Dimensions,
    grid: Vec<Cell>,
    control: HashMap<Position, PlayerId>,
    players: HashMap<PlayerId, PlayerState>,
    waiters: WaiterRegistry,
    watchers: WatcherRegistry,
    initial: Vec<Card>,
}

impl BoardState {
    /// Builds a fresh board: every cell face-down, no control, no players.
    pub(crate) fn new(dims: Dimensions, cards: Vec<Card>) -> Self {
        let grid = cards.iter().cloned().map(Cell::FaceDown).collect();
        Self {
            dims,
            grid,
            control: HashMap::new(),
            players: HashMap::new(),
            waiters: WaiterRegistry::default(),
            watchers: WatcherRegistry::default(),
            initial: cards,
        }
    }

    pub(crate) fn dims(&self) -> Dimensions {
        self.dims
    }

    pub(crate) fn control(&self) -> &HashMap<Position, PlayerId> {
        &self.control
    }

    pub(crate) fn players(&self) -> &HashMap<PlayerId, PlayerState> {
        &self.players
    }

    pub(crate) fn waiter_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.waiters.positions()
    }

    pub(crate) fn cell(&self, pos: Position) -> &Cell {
        &self.grid[self.dims.index(pos)]
    }

    fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        let index = self.dims.index(pos);
        &mut self.grid[index]
    }

    pub(crate) fn controls(&self, player: &PlayerId, pos: Position) -> bool {
        self.control.get(&pos) == Some(player)
    }

    /// First card of the player's in-progress turn, if the turn is open.
    pub(crate) fn open_turn(&self, player: &PlayerId) -> Option<Position> {
        let state = self.players.get(player)?;
        match state.second {
            None => state.first,
            Some(_) => None,
        }
    }

    /// Drops the control entry for `pos` and pops its waiter queue.
    fn release_control(&mut self, pos: Position) -> Vec<oneshot::Sender<HandOff>> {
        self.control.remove(&pos);
        self.waiters.drain(pos)
    }

    /// Turns `pos` face-down if it holds an uncontrolled face-up card.
    /// Returns whether the face changed.
    fn settle_face_down(&mut self, pos: Position) -> bool {
        if self.control.contains_key(&pos) {
            return false;
        }
        self.cell_mut(pos).turn_down()
    }

    /// Settles the player's previous turn before a new first-card flip.
    ///
    /// A matched pair (the player still controls both positions) is removed
    /// from the board and its waiters are woken. An unmatched pair is turned
    /// back face-down wherever the card is still present, face-up,
    /// uncontrolled, and not the position being flipped next.
    pub(crate) fn cleanup_turn(
        &mut self,
        player: &PlayerId,
        target: Position,
        effects: &mut Effects,
    ) {
        let Some((first, second)) = self
            .players
            .get(player)
            .and_then(PlayerState::finished_turn)
        else {
            return;
        };

        if first == second {
            // The previous second flip failed, leaving a single tracked card.
            if first != target {
                effects.visible |= self.settle_face_down(first);
            }
        } else if self.controls(player, first) && self.controls(player, second) {
            debug!(%player, %first, %second, "removing matched pair");
            for pos in [first, second] {
                effects.wakes.extend(self.release_control(pos));
                effects.visible |= self.cell_mut(pos).remove();
            }
        } else {
            for pos in [first, second] {
                if pos != target {
                    effects.visible |= self.settle_face_down(pos);
                }
            }
        }

        if let Some(state) = self.players.get_mut(player) {
            state.clear();
        }
    }

    /// Attempts the first-card flip at `pos`.
    ///
    /// An empty cell refuses outright. A cell controlled by another player
    /// queues a hand-off waiter; the caller awaits it outside the monitor
    /// and retries. Otherwise the card is turned face-up (if needed) and the
    /// caller takes control.
    pub(crate) fn begin_first_card(
        &mut self,
        player: &PlayerId,
        pos: Position,
        effects: &mut Effects,
    ) -> FirstCard {
        if !self.cell(pos).is_present() {
            return FirstCard::Gone;
        }
        if let Some(owner) = self.control.get(&pos) {
            if owner != player {
                return FirstCard::Busy(self.waiters.enqueue(pos));
            }
        }
        effects.visible |= self.cell_mut(pos).turn_up();
        self.control.insert(pos, player.clone());
        self.players.entry(player.clone()).or_default().first = Some(pos);
        debug!(%player, %pos, "first card taken");
        FirstCard::Taken
    }

    /// Performs the second-card flip at `target`, the player's turn being
    /// open at `first`.
    ///
    /// An empty or already-controlled target fails fast instead of waiting,
    /// and the player's first card is relinquished before the error is
    /// raised, which breaks the two-player hold-and-wait cycle. On a
    /// non-match the first card is likewise relinquished; on a match the
    /// player keeps control of both cards until the next turn's cleanup
    /// removes them.
    pub(crate) fn second_card(
        &mut self,
        player: &PlayerId,
        first: Position,
        target: Position,
        effects: &mut Effects,
    ) -> Result<(), BoardError> {
        if !self.cell(target).is_present() {
            effects.wakes.extend(self.release_control(first));
            self.set_finished_turn(player, first, first);
            return Err(BoardError::no_card(target));
        }
        if self.control.contains_key(&target) {
            effects.wakes.extend(self.release_control(first));
            self.set_finished_turn(player, first, first);
            return Err(BoardError::already_controlled(target));
        }

        effects.visible |= self.cell_mut(target).turn_up();

        let matched = self.cell(first).card() == self.cell(target).card();
        if matched {
            debug!(%player, %first, %target, "second card matched");
            self.control.insert(target, player.clone());
        } else {
            debug!(%player, %first, %target, "second card did not match");
            effects.wakes.extend(self.release_control(first));
        }
        self.set_finished_turn(player, first, target);
        Ok(())
    }

    fn set_finished_turn(&mut self, player: &PlayerId, first: Position, second: Position) {
        let state = self.players.entry(player.clone()).or_default();
        state.first = Some(first);
        state.second = Some(second);
    }

    /// Groups every position that carries a card by its card value.
    pub(crate) fn cards_by_value(&self) -> HashMap<Card, Vec<Position>> {
        let mut groups: HashMap<Card, Vec<Position>> = HashMap::new();
        for pos in self.dims.positions() {
            if let Some(card) = self.cell(pos).card() {
                groups.entry(card.clone()).or_default().push(pos);
            }
        }
        groups
    }

    /// Replaces `original` with `replacement` at every position in the group
    /// that still carries `original`, preserving face and control state.
    /// Returns whether any cell changed.
    pub(crate) fn replace_group(
        &mut self,
        original: &Card,
        replacement: &Card,
        positions: &[Position],
    ) -> bool {
        let mut changed = false;
        for &pos in positions {
            // Skip positions another operation touched since the snapshot.
            if self.cell(pos).card() == Some(original) {
                self.cell_mut(pos).replace_card(replacement.clone());
                changed = true;
            }
        }
        if changed {
            debug!(%original, %replacement, "replaced card group");
        }
        changed
    }

    /// Restores the initial deal face-down, clears control and player state,
    /// and returns every queued waiter for cancellation.
    pub(crate) fn restore_initial(&mut self) -> Vec<oneshot::Sender<HandOff>> {
        for (cell, card) in self.grid.iter_mut().zip(self.initial.iter()) {
            *cell = Cell::FaceDown(card.clone());
        }
        self.control.clear();
        self.players.clear();
        self.waiters.drain_all()
    }

    pub(crate) fn register_watcher(&mut self, viewer: PlayerId) -> oneshot::Receiver<String> {
        self.watchers.register(viewer)
    }

    pub(crate) fn drain_watchers(&mut self) -> Vec<(PlayerId, oneshot::Sender<String>)> {
        self.watchers.drain()
    }

    pub(crate) fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    /// Renders the board as seen by `viewer`: a dimensions header followed
    /// by one line per cell in row-major order.
    pub(crate) fn render(&self, viewer: &PlayerId) -> String {
        let mut out = format!("{}\n", self.dims);
        for pos in self.dims.positions() {
            match self.cell(pos) {
                Cell::Empty => out.push_str("none"),
                Cell::FaceDown(_) => out.push_str("down"),
                Cell::FaceUp(card) => {
                    if self.controls(viewer, pos) {
                        out.push_str("my ");
                    } else {
                        out.push_str("up ");
                    }
                    out.push_str(card.as_str());
                }
            }
            out.push('\n');
        }
        out
    }

    /// Debug-checks the representation invariants. Compiled out in release.
    pub(crate) fn check(&self) {
        invariants::assert_all(self);
    }
}

#[cfg(test)]
impl BoardState {
    /// Test-only: plants a control entry without the usual bookkeeping, so
    /// invariant violations can be exercised.
    pub(crate) fn force_control(&mut self, pos: Position, player: PlayerId) {
        self.control.insert(pos, player);
    }
}
