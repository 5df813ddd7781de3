//! Player identities and per-player turn state.

use super::error::BoardError;
use super::position::Position;
use derive_more::Display;

/// An opaque, non-blank string distinguishing clients.
///
/// The board stores no other per-client metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct PlayerId(String);

impl PlayerId {
    /// Validates and wraps a raw identity.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::BadArgument`] when the identity is empty or
    /// whitespace-only.
    pub fn parse(raw: &str) -> Result<Self, BoardError> {
        if raw.trim().is_empty() {
            return Err(BoardError::bad_argument(
                "player id must not be blank".to_string(),
            ));
        }
        Ok(Self(raw.to_string()))
    }
}

/// The up-to-two positions a player has committed to in the current turn.
///
/// `second` is only ever set while `first` is set. When a second flip fails
/// on an empty or contested cell, both fields point at the first position so
/// the next turn's cleanup knows there is only one card to settle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PlayerState {
    /// First card of the turn.
    pub(crate) first: Option<Position>,
    /// Second card of the turn, set when the turn has finished.
    pub(crate) second: Option<Position>,
}

impl PlayerState {
    /// Both positions of a finished turn, if the turn has finished.
    pub(crate) fn finished_turn(&self) -> Option<(Position, Position)> {
        match (self.first, self.second) {
            (Some(first), Some(second)) => Some((first, second)),
            _ => None,
        }
    }

    /// Forgets the tracked turn.
    pub(crate) fn clear(&mut self) {
        self.first = None;
        self.second = None;
    }
}
