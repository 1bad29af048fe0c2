//! Property-based tests for state enumeration and worst-case expectations.

use std::collections::HashSet;

use proptest::prelude::*;

use rust_dcm::ambiguity::{sample_mean, worst_case_expectation};
use rust_dcm::model::{Ambiguity, Measure};
use rust_dcm::state_space::{Choice, StateSpace};

/// Strategy: `(num_periods, edu_start, edu_max)` small enough to enumerate.
fn space_strategy() -> impl Strategy<Value = (usize, usize, usize)> {
    (1..=6usize, 6..=12usize, 0..=4usize).prop_map(|(t, start, width)| (t, start, start + width))
}

/// Strategy: a non-empty sample of moderate, finite values.
fn values_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e4..1.0e4f64, 1..60)
}

proptest! {
    // 1. Every enumerated state satisfies the accounting and lag rules
    #[test]
    fn states_are_consistent((t, start, max) in space_strategy()) {
        let space = StateSpace::new(t, start, max).unwrap();
        prop_assert_eq!(space.num_states(0), 1);
        for period in 0..t {
            for s in space.period_states(period) {
                prop_assert_eq!(s.period, period);
                prop_assert!(s.edu >= start && s.edu <= max, "state={s:?}");
                prop_assert!(s.exp_a + s.exp_b + (s.edu - start) <= period, "state={s:?}");
                if period > 0 {
                    let lag_ok = match s.lagged_choice {
                        Choice::WorkA => s.exp_a >= 1,
                        Choice::WorkB => s.exp_b >= 1,
                        Choice::School => s.edu > start,
                        Choice::Home => s.exp_a + s.exp_b + (s.edu - start) < period,
                    };
                    prop_assert!(lag_ok, "state={s:?}");
                }
            }
        }
    }

    // 2. Indices are unique and round-trip through state_index
    #[test]
    fn indices_are_a_bijection((t, start, max) in space_strategy()) {
        let space = StateSpace::new(t, start, max).unwrap();
        for period in 0..t {
            let states = space.period_states(period);
            let distinct: HashSet<_> = states.iter().collect();
            prop_assert_eq!(distinct.len(), states.len());
            for (i, s) in states.iter().enumerate() {
                prop_assert_eq!(
                    space.state_index(period, s.exp_a, s.exp_b, s.edu, s.lagged_choice),
                    Some(i)
                );
            }
        }
    }

    // 3. Transitions point at the successor state, and only for feasible choices
    #[test]
    fn transitions_follow_successors((t, start, max) in space_strategy()) {
        let space = StateSpace::new(t, start, max).unwrap();
        for period in 0..t.saturating_sub(1) {
            for (i, s) in space.period_states(period).iter().enumerate() {
                for choice in Choice::ALL {
                    match space.transition(period, i, choice) {
                        Some(next) => {
                            prop_assert!(space.is_feasible(s, choice));
                            prop_assert_eq!(space.state(period + 1, next), Some(&s.successor(choice)));
                        }
                        None => prop_assert!(!space.is_feasible(s, choice)),
                    }
                }
            }
        }
        for i in 0..space.num_states(t - 1) {
            prop_assert!(space.transitions(t - 1, i).unwrap().iter().all(Option::is_none));
        }
    }

    // 4. Worst-case expectations lie between the minimum and the sample mean
    #[test]
    fn worst_case_is_bounded(values in values_strategy(), level in 0.0..2.0f64, kl in any::<bool>()) {
        let measure = if kl { Measure::Kl } else { Measure::Abs };
        let ambiguity = Ambiguity::new(measure, level).unwrap();
        let worst = worst_case_expectation(&values, &ambiguity).unwrap();
        let mean = sample_mean(&values).unwrap();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let tol = 1e-8 * (1.0 + mean.abs());
        prop_assert!(worst <= mean + tol, "worst={worst} mean={mean}");
        prop_assert!(worst >= min - tol, "worst={worst} min={min}");
    }
}
