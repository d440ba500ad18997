//! Transition choreographer: the state machine behind the choice widget.
//!
//! Owns phase, dilemma index, released counter, and the busy guard. It never
//! touches the DOM: [`Choreographer::choose`] returns a [`TransitionPlan`]
//! describing the animation, and completion comes back as one explicit
//! [`Choreographer::complete_transition`] call from whoever drove the plan.
//! Tests drive completion synchronously, so no animation engine is needed.

use log::{debug, info};

use super::timeline::{intro_plan, Timeline, TransitionPlan};

/// Widget lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Entrance animation running; no click affordances yet.
    Intro,
    Playing,
}

/// Which of the two blocks the player picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoiceSide {
    Left,
    Right,
}

/// One of two fixed visual slots. The departing pair lives in the active
/// slot; the incoming pair is staged in the other. The index toggles on each
/// completed transition instead of swapping element identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub fn other(self) -> Slot {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }
}

/// Injected viewport dimensions (pixels). The presenter refreshes this from
/// its resize subscription; tests pass whatever geometry they like.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Observable session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub phase: Phase,
    pub dilemma_index: usize,
    pub released_count: u64,
    pub busy: bool,
}

pub struct Choreographer {
    state: SessionState,
    active_slot: Slot,
    dilemma_count: usize,
    viewport: Viewport,
}

impl Choreographer {
    /// `dilemma_count` must be non-zero; the index is always produced modulo
    /// this count, so no other validity condition exists.
    pub fn new(dilemma_count: usize, viewport: Viewport) -> Self {
        assert!(dilemma_count > 0, "dilemma source must be non-empty");
        Self {
            state: SessionState {
                phase: Phase::Intro,
                dilemma_index: 0,
                released_count: 0,
                busy: false,
            },
            active_slot: Slot::A,
            dilemma_count,
            viewport,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn dilemma_count(&self) -> usize {
        self.dilemma_count
    }

    /// Slot currently holding the visible, clickable pair.
    pub fn active_slot(&self) -> Slot {
        self.active_slot
    }

    /// Slot the next pair gets staged into.
    pub fn staged_slot(&self) -> Slot {
        self.active_slot.other()
    }

    pub fn current_index(&self) -> usize {
        self.state.dilemma_index
    }

    /// Index of the pair that will be shown after the in-flight (or next)
    /// transition completes.
    pub fn next_index(&self) -> usize {
        (self.state.dilemma_index + 1) % self.dilemma_count
    }

    /// Geometry only; safe to call while a transition is in flight.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Entrance timeline for the intro label.
    pub fn intro_timeline(&self) -> Timeline {
        intro_plan(self.viewport.height)
    }

    /// Flips Intro -> Playing exactly once; no-op afterwards.
    pub fn complete_intro(&mut self) {
        if self.state.phase == Phase::Intro {
            self.state.phase = Phase::Playing;
            info!("intro finished, presenting dilemma 0");
        }
    }

    /// Accept a choice and return the transition to run, or `None` when the
    /// click must be ignored (still in intro, or a transition is in flight —
    /// the sole guard against double submission).
    ///
    /// The counter increments here, at click time: it counts decisions, not
    /// finished animations.
    pub fn choose(&mut self, side: ChoiceSide) -> Option<TransitionPlan> {
        if self.state.phase != Phase::Playing || self.state.busy {
            debug!("ignoring {side:?} click (busy or intro)");
            return None;
        }
        let before = self.state.released_count;
        self.state.busy = true;
        self.state.released_count += 1;
        debug_assert!(self.state.released_count > before);
        info!(
            "chose {side:?} on dilemma {}, souls released: {}",
            self.state.dilemma_index, self.state.released_count
        );
        Some(TransitionPlan::new(self.viewport.width, self.viewport.height))
    }

    /// Deliver the single completion event for the in-flight transition:
    /// advances the dilemma index, flips the active slot, clears the busy
    /// flag. The text swap is atomic here — during the transition the old
    /// pair stayed visible on the departing slot.
    pub fn complete_transition(&mut self) {
        if !self.state.busy {
            return;
        }
        self.state.dilemma_index = (self.state.dilemma_index + 1) % self.dilemma_count;
        self.active_slot = self.active_slot.other();
        self.state.busy = false;
        debug_assert!(self.state.dilemma_index < self.dilemma_count);
        debug!(
            "transition done, now at dilemma {} in slot {:?}",
            self.state.dilemma_index, self.active_slot
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(count: usize) -> Choreographer {
        let mut ch = Choreographer::new(
            count,
            Viewport {
                width: 1280.0,
                height: 720.0,
            },
        );
        ch.complete_intro();
        ch
    }

    #[test]
    fn starts_in_intro_with_zeroed_state() {
        let ch = Choreographer::new(2, Viewport { width: 100.0, height: 100.0 });
        assert_eq!(ch.state().phase, Phase::Intro);
        assert_eq!(ch.state().dilemma_index, 0);
        assert_eq!(ch.state().released_count, 0);
        assert!(!ch.state().busy);
        assert_eq!(ch.active_slot(), Slot::A);
    }

    #[test]
    fn intro_completion_is_one_shot() {
        let mut ch = Choreographer::new(2, Viewport { width: 100.0, height: 100.0 });
        ch.complete_intro();
        assert_eq!(ch.state().phase, Phase::Playing);
        ch.complete_intro();
        assert_eq!(ch.state().phase, Phase::Playing);
    }

    #[test]
    fn clicks_during_intro_are_ignored() {
        let mut ch = Choreographer::new(2, Viewport { width: 100.0, height: 100.0 });
        assert!(ch.choose(ChoiceSide::Left).is_none());
        assert_eq!(ch.state().released_count, 0);
        assert!(!ch.state().busy);
    }

    #[test]
    fn counter_increments_at_click_time() {
        let mut ch = playing(2);
        let plan = ch.choose(ChoiceSide::Left);
        assert!(plan.is_some());
        // Counter reflects the decision before any animation completes.
        assert_eq!(ch.state().released_count, 1);
        assert!(ch.state().busy);
        assert_eq!(ch.state().dilemma_index, 0, "index advances only at completion");
    }

    #[test]
    fn double_click_second_call_is_ignored() {
        let mut ch = playing(2);
        assert!(ch.choose(ChoiceSide::Left).is_some());
        // Rapid second click before the completion callback fires.
        assert!(ch.choose(ChoiceSide::Right).is_none());
        assert_eq!(ch.state().released_count, 1);
        assert_eq!(ch.state().dilemma_index, 0);

        ch.complete_transition();
        assert_eq!(ch.state().dilemma_index, 1);
        assert!(!ch.state().busy);
    }

    #[test]
    fn completion_flips_the_active_slot() {
        let mut ch = playing(3);
        assert_eq!(ch.active_slot(), Slot::A);
        assert_eq!(ch.staged_slot(), Slot::B);
        ch.choose(ChoiceSide::Right).unwrap();
        assert_eq!(ch.active_slot(), Slot::A, "slot flips at completion, not at click");
        ch.complete_transition();
        assert_eq!(ch.active_slot(), Slot::B);
        assert_eq!(ch.staged_slot(), Slot::A);
    }

    #[test]
    fn five_choices_over_two_dilemmas_cycle() {
        let mut ch = playing(2);
        let mut indices = Vec::new();
        for _ in 0..5 {
            assert!(ch.choose(ChoiceSide::Left).is_some());
            ch.complete_transition();
            indices.push(ch.state().dilemma_index);
        }
        assert_eq!(indices, vec![1, 0, 1, 0, 1]);
        assert_eq!(ch.state().released_count, 5);
    }

    #[test]
    fn stray_completion_without_transition_is_a_no_op() {
        let mut ch = playing(4);
        ch.complete_transition();
        assert_eq!(ch.state().dilemma_index, 0);
        assert_eq!(ch.active_slot(), Slot::A);
    }

    #[test]
    fn next_index_wraps_modulo_count() {
        let mut ch = playing(3);
        assert_eq!(ch.next_index(), 1);
        for _ in 0..2 {
            ch.choose(ChoiceSide::Left).unwrap();
            ch.complete_transition();
        }
        assert_eq!(ch.current_index(), 2);
        assert_eq!(ch.next_index(), 0);
    }

    #[test]
    fn viewport_change_mid_transition_leaves_session_state_alone() {
        let mut ch = playing(2);
        ch.choose(ChoiceSide::Left).unwrap();
        let before = *ch.state();
        ch.set_viewport(Viewport { width: 640.0, height: 480.0 });
        assert_eq!(*ch.state(), before);
        // The next plan picks up the new geometry.
        ch.complete_transition();
        let plan = ch.choose(ChoiceSide::Right).unwrap();
        use super::super::timeline::{Prop, Target};
        assert_eq!(
            plan.timeline.value_of(Target::Chain, Prop::X, 1.0e9),
            Some(640.0)
        );
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn empty_source_is_rejected() {
        let _ = Choreographer::new(0, Viewport { width: 1.0, height: 1.0 });
    }
}
