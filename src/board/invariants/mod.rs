//! First-class representation invariants for the board.
//!
//! Invariants are logical properties that must hold on entry and exit of
//! every monitor-guarded section. They are checked in debug builds before
//! each monitor release and can be tested independently.

use super::state::BoardState;

/// A logical property that must hold for a given state.
pub(crate) trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

pub(crate) mod controlled_face_up;
pub(crate) mod paired_turn;
pub(crate) mod registry_coherent;

pub(crate) use controlled_face_up::ControlledFaceUpInvariant;
pub(crate) use paired_turn::PairedTurnInvariant;
pub(crate) use registry_coherent::RegistryCoherentInvariant;

/// Debug-asserts every board invariant. Compiled out in release builds.
pub(crate) fn assert_all(state: &BoardState) {
    debug_assert!(
        ControlledFaceUpInvariant::holds(state),
        "{}",
        ControlledFaceUpInvariant::description()
    );
    debug_assert!(
        PairedTurnInvariant::holds(state),
        "{}",
        PairedTurnInvariant::description()
    );
    debug_assert!(
        RegistryCoherentInvariant::holds(state),
        "{}",
        RegistryCoherentInvariant::description()
    );
}
