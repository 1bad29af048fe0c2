//! solve::emax — per-state value kernels shared by the solver and simulator.
//!
//! Purpose
//! -------
//! Evaluate, for a single state, the continuation values of each choice, the
//! ex-post rewards under a shock draw, and the expected maximum over the
//! draws (EMAX).
//!
//! Key behaviors
//! -------------
//! - [`choice_continuations`]: `delta · EMAX[t+1][next(c)]` per feasible
//!   choice, `Some(0.0)` in the terminal period, `None` when infeasible.
//! - [`ex_post_reward`]: wages scale multiplicatively with the
//!   (already exponentiated) wage shock; School/Home add their shock.
//! - [`exact_emax`]: max over feasible choices per draw, then the configured
//!   expectation (sample mean or worst case).
//! - [`expected_max_at_mean`]: the same maximum evaluated at the mean shock,
//!   the `maxe` regressor of the interpolation step.
//!
//! Invariants & assumptions
//! ------------------------
//! - Home is always feasible, so every maximum is over a non-empty set.
//! - `shocks` rows are in the transformed space returned by
//!   [`DrawBatch::transformed`](crate::draws::DrawBatch::transformed).
use crate::{
    ambiguity::{AmbiguityResult, worst_case_expectation},
    model::{NUM_CHOICES, options::Ambiguity, params::ModelParams},
    solve::errors::{SolveError, SolveResult},
    state_space::{Choice, StateSpace},
};
use ndarray::{Array1, Array2, ArrayView1};

/// Continuation value per choice; `None` marks an infeasible choice.
pub type Continuations = [Option<f64>; NUM_CHOICES];

/// Continuation values of every choice at `(period, index)`.
///
/// `next_emax` is the EMAX array of `period + 1`, or `None` in the terminal
/// period.
///
/// # Errors
/// - [`SolveError::StateOutOfRange`] if `(period, index)` is not a state, or
///   a successor index falls outside `next_emax`.
/// - [`SolveError::MissingTransition`] if a feasible choice has no successor.
pub fn choice_continuations(
    space: &StateSpace, period: usize, index: usize, next_emax: Option<&Array1<f64>>, delta: f64,
) -> SolveResult<Continuations> {
    let state = space.state(period, index).ok_or(SolveError::StateOutOfRange {
        period,
        index,
        num_states: space.num_states(period),
    })?;
    let mut out = [None; NUM_CHOICES];
    for choice in Choice::ALL {
        if !space.is_feasible(state, choice) {
            continue;
        }
        let value = match next_emax {
            None => 0.0,
            Some(emax) => {
                let next = space.transition(period, index, choice).ok_or(
                    SolveError::MissingTransition { period, index, choice: choice.index() },
                )?;
                let future = emax.get(next).copied().ok_or(SolveError::StateOutOfRange {
                    period: period + 1,
                    index: next,
                    num_states: emax.len(),
                })?;
                delta * future
            }
        };
        out[choice.index()] = Some(value);
    }
    Ok(out)
}

/// Realized reward of `choice` given its systematic payoff and shock.
pub fn ex_post_reward(choice: Choice, payoff: f64, shock: f64) -> f64 {
    if choice.is_work() { payoff * shock } else { payoff + shock }
}

/// Total value (reward plus continuation) of every choice under one draw.
///
/// Infeasible choices are `None`.
pub fn choice_values(
    payoffs: ArrayView1<'_, f64>, shock: ArrayView1<'_, f64>, continuations: &Continuations,
) -> [Option<f64>; NUM_CHOICES] {
    let mut out = [None; NUM_CHOICES];
    for choice in Choice::ALL {
        let c = choice.index();
        if let Some(cont) = continuations[c] {
            out[c] = Some(ex_post_reward(choice, payoffs[c], shock[c]) + cont);
        }
    }
    out
}

/// Largest feasible value and its choice; ties go to the lower index.
///
/// A NaN value is returned as soon as it is seen.
pub fn best_choice(values: &[Option<f64>; NUM_CHOICES]) -> (Choice, f64) {
    let mut best = (Choice::Home, f64::NEG_INFINITY);
    for choice in Choice::ALL {
        if let Some(v) = values[choice.index()] {
            if v.is_nan() {
                return (choice, v);
            }
            if v > best.1 || best.1 == f64::NEG_INFINITY {
                best = (choice, v);
            }
        }
    }
    best
}

/// Monte-Carlo (or worst-case) expected maximum for one state.
///
/// # Errors
/// Propagates [`AmbiguityError`](crate::ambiguity::AmbiguityError)s from the
/// expectation step.
pub fn exact_emax(
    payoffs: ArrayView1<'_, f64>, continuations: &Continuations, shocks: &Array2<f64>,
    ambiguity: &Ambiguity,
) -> AmbiguityResult<f64> {
    let maxima: Vec<f64> = shocks
        .rows()
        .into_iter()
        .map(|shock| best_choice(&choice_values(payoffs, shock, continuations)).1)
        .collect();
    worst_case_expectation(&maxima, ambiguity)
}

/// Mean of the transformed shocks: `exp(σ²/2)` for wages, zero otherwise.
///
/// Debug draws are unscaled, so every variance is one.
pub fn mean_shocks(params: &ModelParams, debug: bool) -> [f64; NUM_CHOICES] {
    let variances = if debug { [1.0; NUM_CHOICES] } else { params.shock_variances() };
    let mut out = [0.0; NUM_CHOICES];
    for choice in [Choice::WorkA, Choice::WorkB] {
        let c = choice.index();
        out[c] = (0.5 * variances[c]).exp();
    }
    out
}

/// Maximum over feasible choices of the value at the mean shock.
pub fn expected_max_at_mean(
    payoffs: ArrayView1<'_, f64>, continuations: &Continuations, mean_shocks: &[f64; NUM_CHOICES],
) -> f64 {
    let shock = ArrayView1::from(&mean_shocks[..]);
    best_choice(&choice_values(payoffs, shock, continuations)).1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::options::Measure;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Check the per-draw maximum and the average on a two-draw example.
    //
    // Given
    // -----
    // - Payoffs (10, 20, 5, 1), School infeasible, zero continuation.
    // - Draw 1 favors A (shock 3 → 30), draw 2 favors B (shock 1 → 20).
    //
    // Expect
    // ------
    // - EMAX = (30 + 20) / 2 = 25.
    fn exact_emax_averages_per_draw_maxima() {
        // Arrange
        let payoffs = array![10.0, 20.0, 5.0, 1.0];
        let conts: Continuations = [Some(0.0), Some(0.0), None, Some(0.0)];
        let shocks = array![[3.0, 0.5, 100.0, 0.0], [1.0, 1.0, 100.0, 2.0]];

        // Act
        let emax = exact_emax(payoffs.view(), &conts, &shocks, &Ambiguity::none()).unwrap();

        // Assert
        assert_relative_eq!(emax, 25.0);
    }

    #[test]
    // Purpose
    // -------
    // Ambiguity pulls EMAX towards the worst draw.
    fn ambiguity_lowers_emax() {
        let payoffs = array![10.0, 20.0, 5.0, 1.0];
        let conts: Continuations = [Some(0.0), Some(0.0), None, Some(0.0)];
        let shocks = array![[3.0, 0.5, 0.0, 0.0], [1.0, 1.0, 0.0, 2.0]];
        let amb = Ambiguity::new(Measure::Abs, 2.0).unwrap();

        let emax = exact_emax(payoffs.view(), &conts, &shocks, &amb).unwrap();

        assert_relative_eq!(emax, 20.0);
    }

    #[test]
    // Purpose
    // -------
    // Terminal continuations are zero for feasible choices and `None` for
    // School at `edu_max`; interior ones are discounted successor EMAX.
    fn continuations_follow_transitions() {
        let space = StateSpace::new(2, 10, 10).unwrap();
        let next = Array1::from(vec![4.0, 8.0, 16.0]);

        let interior = choice_continuations(&space, 0, 0, Some(&next), 0.5).unwrap();
        let terminal = choice_continuations(&space, 1, 0, None, 0.5).unwrap();

        assert_eq!(interior[Choice::School.index()], None);
        for choice in [Choice::WorkA, Choice::WorkB, Choice::Home] {
            let k = space.transition(0, 0, choice).unwrap();
            assert_eq!(interior[choice.index()], Some(0.5 * next[k]));
        }
        assert_eq!(terminal, [Some(0.0), Some(0.0), None, Some(0.0)]);
        assert!(matches!(
            choice_continuations(&space, 1, 9, None, 0.5),
            Err(SolveError::StateOutOfRange { .. })
        ));
    }

    #[test]
    fn best_choice_breaks_ties_towards_lower_index() {
        let (choice, value) = best_choice(&[Some(1.0), Some(3.0), None, Some(3.0)]);
        assert_eq!((choice, value), (Choice::WorkB, 3.0));
    }

    #[test]
    // Purpose
    // -------
    // A NaN in any feasible column wins, so the non-finite EMAX check sees it.
    //
    // Given
    // -----
    // - Finite values in the first two columns and NaN in the last.
    //
    // Expect
    // ------
    // - `best_choice` returns `Home` with a NaN value.
    fn best_choice_propagates_trailing_nan() {
        let (choice, value) = best_choice(&[Some(1.0), Some(2.0), None, Some(f64::NAN)]);
        assert_eq!(choice, Choice::Home);
        assert!(value.is_nan());
    }
}
