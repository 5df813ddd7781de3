//! Control entries always point at face-up cards of known players.

use super::super::state::BoardState;
use super::Invariant;

/// Invariant: every control entry refers to an in-bounds position whose cell
/// is present and face-up, held by a known player whose turn state
/// references that position.
///
/// Since an empty cell is never face-up, this also guarantees a removed card
/// is never controlled.
pub(crate) struct ControlledFaceUpInvariant;

impl Invariant<BoardState> for ControlledFaceUpInvariant {
    fn holds(state: &BoardState) -> bool {
        state.control().iter().all(|(&pos, player)| {
            if !state.dims().contains(pos) || !state.cell(pos).is_face_up() {
                return false;
            }
            match state.players().get(player) {
                Some(turn) => turn.first == Some(pos) || turn.second == Some(pos),
                None => false,
            }
        })
    }

    fn description() -> &'static str {
        "every controlled position holds a face-up card referenced by its controller's turn state"
    }
}
