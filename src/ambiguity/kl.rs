//! Worst-case expectation over a Kullback–Leibler ball.
//!
//! Purpose
//! -------
//! Solve
//!
//! ```text
//! min_w Σ wᵢ vᵢ   s.t.  w ∈ simplex,  Σ wᵢ ln(n wᵢ) ≤ level
//! ```
//!
//! through its scalar dual. The minimiser is an exponential tilt of the
//! uniform weights, `wᵢ(θ) ∝ exp(−θ (vᵢ − v_min))`, and the tilt `θ ≥ 0`
//! solves `KL(θ) = level`.
//!
//! Key behaviors
//! -------------
//! - `KL(θ)` increases from 0 at `θ = 0` towards `ln(n / m)`, where `m` is
//!   the number of minimisers. A level at or above that limit admits the
//!   uniform distribution over the minimisers, so the answer is `v_min`.
//! - Otherwise the tilt is bracketed by doubling and refined with
//!   `argmin::solver::brent::BrentRoot` driven by an `argmin` `Executor`.
//!
//! Conventions
//! -----------
//! - Values are shifted by `v_min` before tilting, so the normalizer is at
//!   least 1 and never overflows.
use crate::ambiguity::{
    errors::{AmbiguityError, AmbiguityResult},
    validate_values,
};
use argmin::{
    core::{CostFunction, Error, Executor, State},
    solver::brent::BrentRoot,
};

/// Tolerance on `θ` handed to the Brent solver.
const THETA_TOL: f64 = 1e-12;

/// Maximum Brent iterations.
const MAX_ITERS: u64 = 200;

/// Maximum number of doublings while bracketing the tilt.
const MAX_DOUBLINGS: usize = 128;

/// Levels this close to `ln(n / m)` are treated as reaching it.
const LIMIT_SLACK: f64 = 1e-12;

/// Worst-case expectation of `values` within a KL ball of radius `level`.
///
/// `level` is assumed validated by the caller.
///
/// # Errors
/// - [`AmbiguityError::EmptyValues`] / [`AmbiguityError::NonFiniteValue`]
///   for bad inputs.
/// - [`AmbiguityError::BracketNotFound`] if doubling fails to bracket.
/// - [`AmbiguityError::RootFindFailed`] or an argmin-mapped variant if the
///   Brent iteration fails.
pub fn worst_case_kl(values: &[f64], level: f64) -> AmbiguityResult<f64> {
    validate_values(values)?;
    let v_min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let shifted: Vec<f64> = values.iter().map(|v| v - v_min).collect();
    let num_min = shifted.iter().filter(|&&d| d == 0.0).count();
    let limit = (values.len() as f64 / num_min as f64).ln();
    if level >= limit - LIMIT_SLACK {
        return Ok(v_min);
    }
    if level <= 0.0 {
        return Ok(v_min + tilted_mean(&shifted, 0.0));
    }

    let gap = KlGap { shifted: &shifted, level };
    let (lower, upper) = bracket_theta(&gap)?;
    let theta = solve_theta(gap, lower, upper)?;
    Ok(v_min + tilted_mean(&shifted, theta))
}

/// Divergence of the tilted weights from the uniform weights.
pub fn kl_divergence(shifted: &[f64], theta: f64) -> f64 {
    let n = shifted.len() as f64;
    let (log_z, mean) = tilt_moments(shifted, theta);
    n.ln() - theta * mean - log_z
}

/// Mean of the shifted values under the tilted weights.
pub fn tilted_mean(shifted: &[f64], theta: f64) -> f64 {
    tilt_moments(shifted, theta).1
}

// ---- Helper methods ----

/// `(ln Z(θ), E_θ[d])` with `Z(θ) = Σ exp(−θ dᵢ)`.
fn tilt_moments(shifted: &[f64], theta: f64) -> (f64, f64) {
    let mut z = 0.0;
    let mut weighted = 0.0;
    for &d in shifted {
        let w = (-theta * d).exp();
        z += w;
        weighted += w * d;
    }
    (z.ln(), weighted / z)
}

/// Root function `KL(θ) − level` seen by the Brent solver.
#[derive(Debug, Clone)]
struct KlGap<'a> {
    shifted: &'a [f64],
    level: f64,
}

impl<'a> CostFunction for KlGap<'a> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        Ok(kl_divergence(self.shifted, *theta) - self.level)
    }
}

/// Find `[lower, upper]` with `KL(lower) ≤ level ≤ KL(upper)`.
fn bracket_theta(gap: &KlGap<'_>) -> AmbiguityResult<(f64, f64)> {
    let scale = gap.shifted.iter().copied().fold(0.0, f64::max);
    let mut lower = 0.0;
    let mut upper = 1.0 / scale;
    for _ in 0..MAX_DOUBLINGS {
        if gap.cost(&upper)? >= 0.0 {
            return Ok((lower, upper));
        }
        lower = upper;
        upper *= 2.0;
    }
    Err(AmbiguityError::BracketNotFound { level: gap.level, last_theta: upper })
}

fn solve_theta(gap: KlGap<'_>, lower: f64, upper: f64) -> AmbiguityResult<f64> {
    if gap.cost(&upper)? == 0.0 {
        return Ok(upper);
    }
    let level = gap.level;
    let solver = BrentRoot::new(lower, upper, THETA_TOL);
    let result = Executor::new(gap, solver).configure(|state| state.max_iters(MAX_ITERS)).run()?;
    let state = result.state();
    let theta = state.get_best_param().or(state.get_param()).copied().ok_or_else(|| {
        AmbiguityError::RootFindFailed { level, reason: "solver returned no parameter".to_string() }
    })?;
    if !theta.is_finite() || theta < 0.0 {
        return Err(AmbiguityError::RootFindFailed {
            level,
            reason: format!("tilt {theta} is not a finite non-negative number"),
        });
    }
    Ok(theta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // The tilt found by the solver attains the requested divergence.
    //
    // Given
    // -----
    // - Five distinct values and level 0.1.
    //
    // Expect
    // ------
    // - KL at the solved θ equals the level.
    // - The worst case lies strictly between `v_min` and the sample mean and
    //   equals the tilted mean at that θ.
    fn solved_tilt_attains_level() {
        // Arrange
        let values = [1.0, 2.0, 4.0, 7.0, 11.0];
        let shifted: Vec<f64> = values.iter().map(|v| v - 1.0).collect();
        let gap = KlGap { shifted: &shifted, level: 0.1 };

        // Act
        let (lo, hi) = bracket_theta(&gap).unwrap();
        let theta = solve_theta(gap.clone(), lo, hi).unwrap();
        let out = worst_case_kl(&values, 0.1).unwrap();

        // Assert
        assert_relative_eq!(kl_divergence(&shifted, theta), 0.1, epsilon = 1e-8);
        assert!(out > 1.0 && out < 5.0);
        assert_relative_eq!(out, 1.0 + tilted_mean(&shifted, theta), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Levels at or above `ln(n / m)` return the minimum exactly.
    fn level_beyond_limit_returns_minimum() {
        let values = [3.0, 3.0, 8.0, 9.0];
        // m = 2 minimisers, limit = ln 2.
        assert_eq!(worst_case_kl(&values, 2.0_f64.ln()).unwrap(), 3.0);
        assert_eq!(worst_case_kl(&[4.0, 4.0], 0.3).unwrap(), 4.0);
    }

    #[test]
    // Purpose
    // -------
    // A bigger ball never yields a larger expectation.
    fn worst_case_is_monotone_in_level() {
        let values = [0.5, 1.5, 2.0, 2.5, 10.0, 12.0];
        let mut prev = f64::INFINITY;
        for level in [1e-4, 0.01, 0.05, 0.2, 0.5, 1.0, 1.7] {
            let out = worst_case_kl(&values, level).unwrap();
            assert!(out <= prev + 1e-9, "level {level}: {out} > {prev}");
            prev = out;
        }
    }

    #[test]
    fn zero_tilt_has_zero_divergence() {
        let shifted = [0.0, 1.0, 2.0];
        assert_relative_eq!(kl_divergence(&shifted, 0.0), 0.0, epsilon = 1e-15);
        assert_relative_eq!(tilted_mean(&shifted, 0.0), 1.0, epsilon = 1e-15);
    }
}
