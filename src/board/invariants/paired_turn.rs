//! Per-player turn state stays structurally consistent with control.

use super::super::state::BoardState;
use super::Invariant;

/// Invariant: a player's tracked turn agrees with the control map.
///
/// - A second position is only ever recorded alongside a first.
/// - An open turn (first set, second unset) means the player controls the
///   first position.
/// - Control of the second position implies control of the first, and the
///   two cards carry equal tokens (a matched pair awaiting removal).
pub(crate) struct PairedTurnInvariant;

impl Invariant<BoardState> for PairedTurnInvariant {
    fn holds(state: &BoardState) -> bool {
        state.players().iter().all(|(player, turn)| {
            match (turn.first, turn.second) {
                (None, Some(_)) => false,
                (None, None) => true,
                (Some(first), None) => state.controls(player, first),
                (Some(first), Some(second)) => {
                    if !state.controls(player, second) {
                        return true;
                    }
                    if !state.controls(player, first) {
                        return false;
                    }
                    first == second
                        || state.cell(first).card() == state.cell(second).card()
                }
            }
        })
    }

    fn description() -> &'static str {
        "turn state is paired: second implies first, open turns are controlled, \
         and a controlled pair carries equal tokens"
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::card::Card;
    use super::super::super::player::PlayerId;
    use super::super::super::position::{Dimensions, Position};
    use super::super::super::state::{BoardState, Effects};
    use super::*;

    fn board(tokens: &[&str]) -> BoardState {
        let dims = Dimensions::new(1, tokens.len()).unwrap();
        let cards = tokens.iter().map(|t| Card::parse(t).unwrap()).collect();
        BoardState::new(dims, cards)
    }

    #[test]
    fn test_open_turn_holds() {
        let mut state = board(&["A", "B"]);
        let alice = PlayerId::parse("alice").unwrap();
        let mut effects = Effects::default();
        state.begin_first_card(&alice, Position::new(0, 0), &mut effects);
        assert!(PairedTurnInvariant::holds(&state));
    }

    #[test]
    fn test_matched_pair_holds() {
        let mut state = board(&["A", "A"]);
        let alice = PlayerId::parse("alice").unwrap();
        let mut effects = Effects::default();
        let first = Position::new(0, 0);
        let second = Position::new(0, 1);
        state.begin_first_card(&alice, first, &mut effects);
        state.second_card(&alice, first, second, &mut effects).unwrap();
        assert!(PairedTurnInvariant::holds(&state));
    }

    #[test]
    fn test_unmatched_pair_holds() {
        let mut state = board(&["A", "B"]);
        let alice = PlayerId::parse("alice").unwrap();
        let mut effects = Effects::default();
        let first = Position::new(0, 0);
        let second = Position::new(0, 1);
        state.begin_first_card(&alice, first, &mut effects);
        state.second_card(&alice, first, second, &mut effects).unwrap();
        assert!(PairedTurnInvariant::holds(&state));
    }

    #[test]
    fn test_stolen_first_card_violates() {
        let mut state = board(&["A", "B"]);
        let alice = PlayerId::parse("alice").unwrap();
        let bob = PlayerId::parse("bob").unwrap();
        let mut effects = Effects::default();
        let first = Position::new(0, 0);
        state.begin_first_card(&alice, first, &mut effects);
        // Corrupt: hand alice's open first card to bob.
        state.force_control(first, bob);
        assert!(!PairedTurnInvariant::holds(&state));
    }
}
