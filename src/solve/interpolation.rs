//! solve::interpolation — regression approximation of EMAX for large periods.
//!
//! Purpose
//! -------
//! When a period holds more states than the interpolation quota, solve only
//! a random subset exactly and predict the rest from an OLS regression of
//! the exact values on state characteristics and on `maxe`, the maximum
//! value at the mean shock.
//!
//! Key behaviors
//! -------------
//! - [`interpolation_points`]: draw `num_points` distinct state indices
//!   with a `StdRng` seeded from the solve seed and the period.
//! - [`regressors`]: `[1, exp_a, exp_b, edu, exp_a², exp_b², edu², maxe]`.
//! - [`interpolate_emax`]: regress `EMAX − maxe` on the regressors through a
//!   `nalgebra` SVD least-squares solve, optionally truncate negative
//!   predictions at zero, add `maxe` back, and keep the exact values at the
//!   points.
//!
//! Invariants & assumptions
//! ------------------------
//! - `num_points ≥` [`NUM_INTERP_REGRESSORS`] (enforced by
//!   [`Interpolation::new`](crate::model::options::Interpolation::new)).
//! - Rank-deficient designs are solved in the minimum-norm sense; singular
//!   values at or below [`SVD_EPS`] are dropped.
//!
//! Conventions
//! -----------
//! - Point indices are returned sorted so the exact-solve fan-out visits
//!   states in index order.
use crate::{
    model::options::NUM_INTERP_REGRESSORS,
    solve::errors::{SolveError, SolveResult},
    state_space::State,
};
use nalgebra::{DMatrix, DVector};
use ndarray::Array1;
use rand::{SeedableRng, rngs::StdRng, seq::index::sample};

/// Singular values at or below this are treated as zero.
pub const SVD_EPS: f64 = 1e-10;

/// Sorted, distinct state indices to solve exactly in `period`.
///
/// Deterministic in `(num_states, num_points, seed, period)`. Callers only
/// invoke this with `num_points < num_states`.
pub fn interpolation_points(num_states: usize, num_points: usize, seed: u64, period: usize) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(period as u64));
    let mut points = sample(&mut rng, num_states, num_points.min(num_states)).into_vec();
    points.sort_unstable();
    points
}

/// Regressor row of a state.
pub fn regressors(state: &State, maxe: f64) -> [f64; NUM_INTERP_REGRESSORS] {
    let exp_a = state.exp_a as f64;
    let exp_b = state.exp_b as f64;
    let edu = state.edu as f64;
    [1.0, exp_a, exp_b, edu, exp_a * exp_a, exp_b * exp_b, edu * edu, maxe]
}

/// interpolate_emax — predicted EMAX for every state of a period.
///
/// Parameters
/// ----------
/// - `period`: `usize`
///   Period being solved; only used in error reports.
/// - `states`: `&[State]`
///   All states of the period in index order.
/// - `maxe`: `&[f64]`
///   Maximum value at the mean shock for every state (same order).
/// - `points`: `&[usize]`
///   Indices of the exactly solved states.
/// - `exact`: `&[f64]`
///   Exact EMAX at `points` (same order as `points`).
/// - `truncate`: `bool`
///   Clip negative fitted gaps `EMAX − maxe` at zero.
///
/// Returns
/// -------
/// `SolveResult<Array1<f64>>`
///   EMAX for every state. Entries at `points` equal `exact`; every other
///   entry is `maxe + max(0, x·β)`, or `maxe + x·β` without truncation.
///
/// Errors
/// ------
/// - `SolveError::DimensionMismatch`
///   When the slices disagree in length.
/// - `SolveError::SingularRegression`
///   When the SVD solve fails or yields non-finite coefficients.
///
/// Notes
/// -----
/// - The regression target `EMAX − maxe` is non-negative only when the
///   expectation is the sample mean. A worst-case expectation may fall below
///   `maxe`, so callers disable truncation when ambiguity is active.
pub fn interpolate_emax(
    period: usize, states: &[State], maxe: &[f64], points: &[usize], exact: &[f64],
    truncate: bool,
) -> SolveResult<Array1<f64>> {
    if maxe.len() != states.len() {
        return Err(SolveError::DimensionMismatch {
            name: "maxe length",
            expected: states.len(),
            actual: maxe.len(),
        });
    }
    if exact.len() != points.len() {
        return Err(SolveError::DimensionMismatch {
            name: "exact EMAX length",
            expected: points.len(),
            actual: exact.len(),
        });
    }

    let mut design = DMatrix::<f64>::zeros(points.len(), NUM_INTERP_REGRESSORS);
    let mut target = DVector::<f64>::zeros(points.len());
    for (row, (&k, &value)) in points.iter().zip(exact).enumerate() {
        let state = states.get(k).ok_or(SolveError::StateOutOfRange {
            period,
            index: k,
            num_states: states.len(),
        })?;
        for (col, x) in regressors(state, maxe[k]).into_iter().enumerate() {
            design[(row, col)] = x;
        }
        target[row] = value - maxe[k];
    }

    let beta = fit_least_squares(period, design, &target)?;

    let mut emax = Array1::<f64>::zeros(states.len());
    for (k, (state, &m)) in states.iter().zip(maxe).enumerate() {
        let x = regressors(state, m);
        let fitted: f64 = x.iter().zip(beta.iter()).map(|(a, b)| a * b).sum();
        emax[k] = if truncate { m + fitted.max(0.0) } else { m + fitted };
    }
    for (&k, &value) in points.iter().zip(exact) {
        emax[k] = value;
    }
    Ok(emax)
}

// ---- Helper methods ----

fn fit_least_squares(period: usize, design: DMatrix<f64>, target: &DVector<f64>) -> SolveResult<DVector<f64>> {
    let svd = design.svd(true, true);
    let beta = svd
        .solve(target, SVD_EPS)
        .map_err(|e| SolveError::SingularRegression { period, reason: e.to_string() })?;
    if let Some(bad) = beta.iter().find(|b| !b.is_finite()) {
        return Err(SolveError::SingularRegression {
            period,
            reason: format!("non-finite coefficient {bad}"),
        });
    }
    Ok(beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_space::{Choice, StateSpace};
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Point selection is deterministic, sorted, and without replacement.
    fn points_are_sorted_distinct_and_reproducible() {
        let a = interpolation_points(200, 30, 456, 4);
        let b = interpolation_points(200, 30, 456, 4);
        let c = interpolation_points(200, 30, 456, 5);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 30);
        assert!(a.windows(2).all(|w| w[0] < w[1]));
        assert!(a.iter().all(|&k| k < 200));
    }

    #[test]
    // Purpose
    // -------
    // A target that is exactly linear in the regressors is recovered.
    //
    // Given
    // -----
    // - All states of period 5 (`edu 10..=14`).
    // - `maxe = 100 + exp_a·exp_b`, and
    //   `EMAX − maxe = 2 + 0.5·exp_a + 0.1·edu²` (non-negative).
    // - A random subset of 40 points.
    //
    // Expect
    // ------
    // - Predictions at the remaining states match the linear truth.
    fn linear_target_is_recovered_off_the_points() {
        // Arrange
        let space = StateSpace::new(6, 10, 14).unwrap();
        let states = space.period_states(5);
        let maxe: Vec<f64> = states.iter().map(|s| 100.0 + (s.exp_a * s.exp_b) as f64).collect();
        let truth = |s: &State, m: f64| m + 2.0 + 0.5 * s.exp_a as f64 + 0.1 * (s.edu * s.edu) as f64;
        let points = interpolation_points(states.len(), 40, 1, 5);
        let exact: Vec<f64> = points.iter().map(|&k| truth(&states[k], maxe[k])).collect();

        // Act
        let emax = interpolate_emax(5, states, &maxe, &points, &exact, true).unwrap();

        // Assert
        for (k, s) in states.iter().enumerate() {
            assert_relative_eq!(emax[k], truth(s, maxe[k]), epsilon = 1e-6, max_relative = 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // Negative fitted gaps are truncated so predictions never fall below
    // `maxe`, while points keep their exact values.
    fn negative_predictions_are_truncated_at_maxe() {
        let states: Vec<State> = (0..12)
            .map(|k| State { period: 3, exp_a: k % 4, exp_b: k / 4, edu: 10, lagged_choice: Choice::Home })
            .collect();
        let maxe = vec![50.0; 12];
        let points: Vec<usize> = (0..10).collect();
        let exact: Vec<f64> = points.iter().map(|&k| 50.0 - 5.0 * states[k].exp_a as f64).collect();

        let emax = interpolate_emax(3, &states, &maxe, &points, &exact, true).unwrap();

        for &k in &points {
            assert_eq!(emax[k], exact[k]);
        }
        // State 11 has exp_a = 3: fitted gap −15 is clipped.
        assert_relative_eq!(emax[11], 50.0);
    }

    #[test]
    // Purpose
    // -------
    // Without truncation, predictions may fall below `maxe`.
    //
    // Given
    // -----
    // - The same states and targets as the truncation test, where the true
    //   gap `EMAX − maxe = −5·exp_a` is negative.
    //
    // Expect
    // ------
    // - Off-point states recover the negative gap: state 11 (`exp_a = 3`)
    //   predicts `50 − 15`.
    fn untruncated_predictions_keep_negative_gaps() {
        let states: Vec<State> = (0..12)
            .map(|k| State { period: 3, exp_a: k % 4, exp_b: k / 4, edu: 10, lagged_choice: Choice::Home })
            .collect();
        let maxe = vec![50.0; 12];
        let points: Vec<usize> = (0..10).collect();
        let exact: Vec<f64> = points.iter().map(|&k| 50.0 - 5.0 * states[k].exp_a as f64).collect();

        let emax = interpolate_emax(3, &states, &maxe, &points, &exact, false).unwrap();

        assert_relative_eq!(emax[10], 40.0, epsilon = 1e-8);
        assert_relative_eq!(emax[11], 35.0, epsilon = 1e-8);
    }

    #[test]
    fn length_mismatch_is_reported() {
        let states = vec![State { period: 0, exp_a: 0, exp_b: 0, edu: 10, lagged_choice: Choice::School }];
        let res = interpolate_emax(0, &states, &[1.0, 2.0], &[0], &[1.0], true);
        assert!(matches!(res, Err(SolveError::DimensionMismatch { .. })));
    }
}
