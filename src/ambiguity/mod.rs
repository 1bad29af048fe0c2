//! ambiguity — worst-case expectations over a divergence ball.
//!
//! Purpose
//! -------
//! Replace the Monte-Carlo sample mean of the per-draw maxima by the
//! smallest expectation attainable under any reweighting of the draws that
//! stays within `level` of the empirical (uniform) weights.
//!
//! Key behaviors
//! -------------
//! - [`worst_case_expectation`] dispatches on [`Measure`]:
//!   - [`Measure::Abs`]: closed-form L1 linear program ([`abs`]).
//!   - [`Measure::Kl`]: scalar dual root-find with argmin ([`kl`]).
//! - `level == 0` calls [`sample_mean`] directly, so an ambiguity-free solve
//!   and a zero-level solve run the same arithmetic.
//!
//! Invariants & assumptions
//! ------------------------
//! - The result never exceeds the sample mean and never falls below the
//!   minimum value.
//! - The result is non-increasing in `level`.
//!
//! Downstream usage
//! ----------------
//! - The solver calls [`worst_case_expectation`] once per state and period
//!   with the per-draw maxima of the value functions.

pub mod abs;
pub mod errors;
pub mod kl;

pub use self::errors::{AmbiguityError, AmbiguityResult};

use crate::model::options::{Ambiguity, Measure};

/// Plain Monte-Carlo average.
///
/// # Errors
/// Returns [`AmbiguityError::EmptyValues`] for an empty slice.
pub fn sample_mean(values: &[f64]) -> AmbiguityResult<f64> {
    if values.is_empty() {
        return Err(AmbiguityError::EmptyValues);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Expectation of `values` under the configured ambiguity.
///
/// # Errors
/// - [`AmbiguityError::InfeasibleLevel`] for a negative or non-finite level.
/// - Input and root-finding errors from the measure-specific solvers.
pub fn worst_case_expectation(values: &[f64], ambiguity: &Ambiguity) -> AmbiguityResult<f64> {
    let level = ambiguity.level;
    if !level.is_finite() || level < 0.0 {
        return Err(AmbiguityError::InfeasibleLevel { level });
    }
    if level == 0.0 {
        return sample_mean(values);
    }
    match ambiguity.measure {
        Measure::Abs => abs::worst_case_abs(values, level),
        Measure::Kl => kl::worst_case_kl(values, level),
    }
}

/// Reject empty inputs and non-finite entries.
pub(crate) fn validate_values(values: &[f64]) -> AmbiguityResult<()> {
    if values.is_empty() {
        return Err(AmbiguityError::EmptyValues);
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(AmbiguityError::NonFiniteValue { index, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const VALUES: [f64; 6] = [4.0, -2.0, 7.5, 0.25, 3.0, 9.0];

    #[test]
    // Purpose
    // -------
    // Level zero is the sample mean, bit for bit, for both measures.
    fn zero_level_is_exact_sample_mean() {
        let mean = sample_mean(&VALUES).unwrap();
        for measure in [Measure::Abs, Measure::Kl] {
            let amb = Ambiguity { measure, level: 0.0 };
            assert_eq!(worst_case_expectation(&VALUES, &amb).unwrap().to_bits(), mean.to_bits());
        }
    }

    #[test]
    // Purpose
    // -------
    // Positive levels land between the minimum and the mean.
    //
    // Given
    // -----
    // - Six values with mean ≈ 3.625 and minimum −2.
    //
    // Expect
    // ------
    // - `min ≤ result < mean` for both measures at level 0.3.
    fn positive_level_stays_between_minimum_and_mean() {
        let mean = sample_mean(&VALUES).unwrap();
        for measure in [Measure::Abs, Measure::Kl] {
            let out = worst_case_expectation(&VALUES, &Ambiguity { measure, level: 0.3 }).unwrap();
            assert!(out < mean && out >= -2.0, "{measure:?}: {out}");
        }
        assert_relative_eq!(mean, 21.75 / 6.0);
    }

    #[test]
    fn infeasible_level_and_bad_inputs_are_reported() {
        let amb = Ambiguity { measure: Measure::Kl, level: -0.1 };
        assert_eq!(
            worst_case_expectation(&VALUES, &amb),
            Err(AmbiguityError::InfeasibleLevel { level: -0.1 })
        );
        let amb = Ambiguity { measure: Measure::Abs, level: 0.1 };
        assert_eq!(worst_case_expectation(&[], &amb), Err(AmbiguityError::EmptyValues));
        assert!(matches!(
            worst_case_expectation(&[1.0, f64::NAN], &amb),
            Err(AmbiguityError::NonFiniteValue { index: 1, .. })
        ));
    }
}
