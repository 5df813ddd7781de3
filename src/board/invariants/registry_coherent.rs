//! Waiter queues only exist for cards a player currently controls.

use super::super::state::BoardState;
use super::Invariant;

/// Invariant: every position with a queued waiter is in bounds and is
/// currently controlled (hence present and face-up).
///
/// Waiters are only ever enqueued against a controlled card, and every
/// release of control pops the position's whole queue, so a queue on an
/// uncontrolled position would be a promise nobody will ever resolve.
pub(crate) struct RegistryCoherentInvariant;

impl Invariant<BoardState> for RegistryCoherentInvariant {
    fn holds(state: &BoardState) -> bool {
        state.waiter_positions().all(|pos| {
            state.dims().contains(pos)
                && state.control().contains_key(&pos)
                && state.cell(pos).is_face_up()
        })
    }

    fn description() -> &'static str {
        "every queued waiter targets a controlled, face-up position"
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::card::Card;
    use super::super::super::player::PlayerId;
    use super::super::super::position::{Dimensions, Position};
    use super::super::super::state::{BoardState, Effects, FirstCard};
    use super::*;

    fn board() -> BoardState {
        let dims = Dimensions::new(1, 2).unwrap();
        let cards = vec![Card::parse("A").unwrap(), Card::parse("A").unwrap()];
        BoardState::new(dims, cards)
    }

    #[test]
    fn test_contested_card_holds() {
        let mut state = board();
        let alice = PlayerId::parse("alice").unwrap();
        let bob = PlayerId::parse("bob").unwrap();
        let mut effects = Effects::default();
        let pos = Position::new(0, 0);

        state.begin_first_card(&alice, pos, &mut effects);
        let FirstCard::Busy(_rx) = state.begin_first_card(&bob, pos, &mut effects) else {
            panic!("expected contested flip to wait");
        };
        assert!(RegistryCoherentInvariant::holds(&state));
    }

    #[test]
    fn test_reset_leaves_no_waiters() {
        let mut state = board();
        let alice = PlayerId::parse("alice").unwrap();
        let bob = PlayerId::parse("bob").unwrap();
        let mut effects = Effects::default();
        let pos = Position::new(0, 0);

        state.begin_first_card(&alice, pos, &mut effects);
        let _rx = state.begin_first_card(&bob, pos, &mut effects);
        let _cancelled = state.restore_initial();
        assert!(RegistryCoherentInvariant::holds(&state));
        assert_eq!(state.waiter_positions().count(), 0);
    }
}
