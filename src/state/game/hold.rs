//! Hold-note state machine.
//!
//! Pure transition logic, kept apart from the timeline and from anything
//! visual so it can be tested in isolation. Every hold emits exactly two
//! judgement events over its life: one for the head, one for the tail.

use crate::models::hit_window::HitWindow;
use crate::models::judgement::Judgement;

/// Lifecycle of a single hold note during play.
///
/// `Idle -> Active -> { Released, MissedHold }`. A head that expires
/// unpressed jumps straight to `MissedHold`, forfeiting the tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldState {
    /// Head not yet judged.
    Idle,
    /// Head judged, key down, tail outstanding.
    Active,
    /// Tail judged from a release inside its window. Terminal.
    Released,
    /// Head missed, released early, or held past the tail window. Terminal.
    MissedHold,
}

impl HoldState {
    /// Returns true once both head and tail judgements have been emitted.
    pub fn is_terminal(self) -> bool {
        matches!(self, HoldState::Released | HoldState::MissedHold)
    }
}

/// Outcome of a key-up on an active hold.
///
/// The offset is measured against the hold's end time. A release inside
/// the tail window scores it like any other hit; an early release outside
/// the window forfeits the tail. A late release never reaches this point
/// because tail expiry resolves the hold first.
pub fn release_outcome(offset_ms: f64, window: &HitWindow) -> (HoldState, Judgement) {
    if window.contains(offset_ms) {
        (HoldState::Released, window.classify(offset_ms))
    } else {
        (HoldState::MissedHold, Judgement::Miss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> HitWindow {
        // 150ms outermost band, matching the classic tail tolerance.
        HitWindow::from_custom(16.0, 50.0, 65.0, 100.0, 150.0)
    }

    #[test]
    fn release_just_after_end_scores_top_tier() {
        let (state, judgement) = release_outcome(5.0, &window());
        assert_eq!(state, HoldState::Released);
        assert_eq!(judgement, Judgement::Marv);
        assert!(state.is_terminal());
    }

    #[test]
    fn release_inside_window_classifies_by_offset() {
        let (state, judgement) = release_outcome(-120.0, &window());
        assert_eq!(state, HoldState::Released);
        assert_eq!(judgement, Judgement::Bad);
    }

    #[test]
    fn early_release_forfeits_the_tail() {
        let (state, judgement) = release_outcome(-300.0, &window());
        assert_eq!(state, HoldState::MissedHold);
        assert_eq!(judgement, Judgement::Miss);
        assert!(state.is_terminal());
    }

    #[test]
    fn pending_states_are_not_terminal() {
        assert!(!HoldState::Idle.is_terminal());
        assert!(!HoldState::Active.is_terminal());
    }
}
