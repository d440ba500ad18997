// Choreography scenario and property tests.
// Native-friendly: completion events are delivered by calling
// `complete_transition` directly, standing in for the animation driver.

use proptest::prelude::*;
use soul_chain::{ChoiceSide, Choreographer, Slot, Viewport};

fn playing(count: usize) -> Choreographer {
    let mut ch = Choreographer::new(count, Viewport { width: 1024.0, height: 768.0 });
    ch.complete_intro();
    ch
}

// Double-submission guard: choose, then click again before the completion fires.
#[test]
fn rapid_second_click_is_swallowed() {
    let mut ch = playing(2);
    assert!(ch.choose(ChoiceSide::Left).is_some());
    assert!(ch.choose(ChoiceSide::Right).is_none());
    assert_eq!(ch.state().released_count, 1);
    assert_eq!(ch.state().dilemma_index, 0);

    ch.complete_transition();
    assert_eq!(ch.state().dilemma_index, 1);
    assert!(!ch.state().busy);
    // The widget is live again.
    assert!(ch.choose(ChoiceSide::Right).is_some());
}

#[test]
fn five_choices_over_two_dilemmas_visit_1_0_1_0_1() {
    let mut ch = playing(2);
    let mut seen = Vec::new();
    for _ in 0..5 {
        ch.choose(ChoiceSide::Right).unwrap();
        ch.complete_transition();
        seen.push(ch.state().dilemma_index);
    }
    assert_eq!(seen, vec![1, 0, 1, 0, 1]);
}

#[test]
fn slots_alternate_per_completed_transition() {
    let mut ch = playing(3);
    let mut slots = Vec::new();
    for _ in 0..4 {
        ch.choose(ChoiceSide::Left).unwrap();
        ch.complete_transition();
        slots.push(ch.active_slot());
    }
    assert_eq!(slots, vec![Slot::B, Slot::A, Slot::B, Slot::A]);
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Choose(ChoiceSide),
    Complete,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(|left| Op::Choose(if left {
            ChoiceSide::Left
        } else {
            ChoiceSide::Right
        })),
        Just(Op::Complete),
    ]
}

proptest! {
    // For any interleaving of clicks and completions:
    // - the counter equals the number of accepted clicks,
    // - the index equals completed transitions modulo the source size,
    // - the index never leaves range and the counter never decreases.
    #[test]
    fn counter_and_index_invariants(
        ops in proptest::collection::vec(op_strategy(), 0..64),
        count in 1usize..6,
    ) {
        let mut ch = playing(count);
        let mut accepted = 0u64;
        let mut completed = 0usize;

        for op in ops {
            let count_before = ch.state().released_count;
            match op {
                Op::Choose(side) => {
                    let busy_before = ch.state().busy;
                    let plan = ch.choose(side);
                    if busy_before {
                        prop_assert!(plan.is_none());
                    } else {
                        prop_assert!(plan.is_some());
                        accepted += 1;
                    }
                }
                Op::Complete => {
                    if ch.state().busy {
                        completed += 1;
                    }
                    ch.complete_transition();
                }
            }
            prop_assert!(ch.state().released_count >= count_before);
            prop_assert_eq!(ch.state().released_count, accepted);
            prop_assert_eq!(ch.state().dilemma_index, completed % count);
            prop_assert!(ch.state().dilemma_index < count);
        }
    }
}
