//! Card tokens and grid cells.

use super::error::BoardError;
use derive_more::Display;

/// A card value: a non-empty string with no whitespace.
///
/// Tokens are opaque byte sequences; equality of tokens is what defines a
/// "match". No Unicode normalisation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct Card(String);

impl Card {
    /// Validates and wraps a raw token.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::BadArgument`] when the token is empty or
    /// contains whitespace.
    pub fn parse(raw: &str) -> Result<Self, BoardError> {
        if raw.is_empty() || raw.chars().any(char::is_whitespace) {
            return Err(BoardError::bad_argument(format!(
                "card token {raw:?} must be non-empty with no whitespace"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// The raw token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One grid cell: either empty or carrying a card with a face state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum Cell {
    /// The card has been removed by a matched pair.
    #[default]
    Empty,
    /// A card is present, face-down.
    FaceDown(Card),
    /// A card is present, face-up.
    FaceUp(Card),
}

impl Cell {
    /// The card in this cell, if present.
    pub(crate) fn card(&self) -> Option<&Card> {
        match self {
            Cell::Empty => None,
            Cell::FaceDown(card) | Cell::FaceUp(card) => Some(card),
        }
    }

    /// Whether a card is present.
    pub(crate) fn is_present(&self) -> bool {
        !matches!(self, Cell::Empty)
    }

    /// Whether a card is present and face-up.
    pub(crate) fn is_face_up(&self) -> bool {
        matches!(self, Cell::FaceUp(_))
    }

    /// Turns a face-down card face-up. Returns whether the face changed.
    pub(crate) fn turn_up(&mut self) -> bool {
        match std::mem::take(self) {
            Cell::FaceDown(card) => {
                *self = Cell::FaceUp(card);
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Turns a face-up card face-down. Returns whether the face changed.
    pub(crate) fn turn_down(&mut self) -> bool {
        match std::mem::take(self) {
            Cell::FaceUp(card) => {
                *self = Cell::FaceDown(card);
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Removes the card. Returns whether a card was present.
    pub(crate) fn remove(&mut self) -> bool {
        match std::mem::take(self) {
            Cell::Empty => false,
            _ => true,
        }
    }

    /// Replaces the card value, preserving the face state.
    /// Does nothing on an empty cell.
    pub(crate) fn replace_card(&mut self, card: Card) {
        match self {
            Cell::Empty => {}
            Cell::FaceDown(old) | Cell::FaceUp(old) => *old = card,
        }
    }
}
