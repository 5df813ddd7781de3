//! Board error taxonomy.

use super::position::Position;
use derive_more::{Display, Error};

/// Failure kinds surfaced by board operations.
///
/// Errors never poison board state: the invariants hold on every exit path,
/// including failing ones. A failed second flip legitimately costs the
/// caller control of their first card before the error is raised.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Blank player identity, out-of-bounds position, or invalid card token.
    #[display("bad argument: {reason}")]
    BadArgument {
        /// What was wrong with the input.
        reason: String,
    },

    /// The targeted cell has no card (removed, or never present).
    #[display("no card at {row},{col}")]
    NoCardAtPosition {
        /// Row of the empty cell.
        row: usize,
        /// Column of the empty cell.
        col: usize,
    },

    /// A second-card flip targeted a cell some player already controls.
    #[display("card at {row},{col} is already controlled")]
    CardAlreadyControlled {
        /// Row of the contested cell.
        row: usize,
        /// Column of the contested cell.
        col: usize,
    },

    /// A blocked flip was unblocked by a board reset.
    #[display("operation cancelled by board reset")]
    Cancelled,
}

impl BoardError {
    pub(crate) fn bad_argument(reason: impl Into<String>) -> Self {
        Self::BadArgument {
            reason: reason.into(),
        }
    }

    pub(crate) fn no_card(pos: Position) -> Self {
        Self::NoCardAtPosition {
            row: pos.row,
            col: pos.col,
        }
    }

    pub(crate) fn already_controlled(pos: Position) -> Self {
        Self::CardAlreadyControlled {
            row: pos.row,
            col: pos.col,
        }
    }
}
