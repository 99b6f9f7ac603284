//! Property-based tests for the pure progress transition.
//!
//! Invariants under test:
//! - a miss always zeroes the streak and clears the learned flag,
//!   whatever the prior state
//! - a hit extends the streak by one and the learned flag tracks the
//!   configured streak target exactly
//! - exposure counters only ever grow, and the success rate stays
//!   within [0, 100]

use chrono::Utc;
use proptest::prelude::*;

use wortquiz_core::model::WordProgress;

const MASTERY_STREAK: i64 = 3;

fn arb_progress() -> impl Strategy<Value = WordProgress> {
    (0i64..500, 0i64..50, any::<bool>()).prop_flat_map(|(times_shown, streak, learned)| {
        (0i64..=times_shown.max(0)).prop_map(move |times_correct| WordProgress {
            user_id: 1,
            word_id: 1,
            times_shown,
            times_correct,
            correct_streak: streak,
            learned,
            last_seen_at: None,
        })
    })
}

proptest! {
    #[test]
    fn a_miss_always_clears_streak_and_mastery(progress in arb_progress()) {
        let now = Utc::now().naive_utc();
        let next = progress.after_answer(false, now, MASTERY_STREAK);

        prop_assert_eq!(next.correct_streak, 0);
        prop_assert!(!next.learned);
        prop_assert_eq!(next.times_shown, progress.times_shown + 1);
        prop_assert_eq!(next.times_correct, progress.times_correct);
        prop_assert!(next.last_seen_at.is_some());
    }

    #[test]
    fn a_hit_extends_the_streak_and_tracks_the_target(progress in arb_progress()) {
        let now = Utc::now().naive_utc();
        let next = progress.after_answer(true, now, MASTERY_STREAK);

        prop_assert_eq!(next.correct_streak, progress.correct_streak + 1);
        prop_assert_eq!(next.learned, next.correct_streak >= MASTERY_STREAK);
        prop_assert_eq!(next.times_shown, progress.times_shown + 1);
        prop_assert_eq!(next.times_correct, progress.times_correct + 1);
    }

    #[test]
    fn success_rate_stays_in_bounds(progress in arb_progress()) {
        match progress.success_rate() {
            None => prop_assert_eq!(progress.times_shown, 0),
            Some(rate) => {
                prop_assert!(rate >= 0.0);
                prop_assert!(rate <= 100.0);
            }
        }
    }

    #[test]
    fn fresh_word_masters_after_exactly_the_streak_target(hits in 1usize..8) {
        let now = Utc::now().naive_utc();
        let mut state = WordProgress::fresh(1, 1);
        for _ in 0..hits {
            state = state.after_answer(true, now, MASTERY_STREAK);
        }

        prop_assert_eq!(state.correct_streak as usize, hits);
        prop_assert_eq!(state.learned, hits >= MASTERY_STREAK as usize);
    }

    #[test]
    fn custom_streak_targets_flip_mastery_at_the_boundary(target in 1i64..10) {
        let now = Utc::now().naive_utc();
        let mut state = WordProgress::fresh(1, 1);
        for _ in 0..(target - 1) {
            state = state.after_answer(true, now, target);
        }
        prop_assert!(!state.learned);

        state = state.after_answer(true, now, target);
        prop_assert!(state.learned);
    }
}
