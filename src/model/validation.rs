//! Validation helpers for model specifications, parameters, and options.
//!
//! This module centralizes the eager checks run before any solve starts:
//!
//! - **Bounds**: [`validate_num_periods`], [`validate_education_bounds`].
//! - **Scalars**: [`validate_delta`], [`validate_ambiguity_level`].
//! - **Counts**: [`validate_num_draws`], [`validate_interp_points`],
//!   [`validate_num_threads`], [`validate_num_agents`].
//! - **Parameters**: [`validate_coeffs`], [`validate_cholesky`].
//!
//! Each helper returns the first violation as a [`ModelError`] carrying the
//! offending value, so callers can surface precise configuration errors.
use crate::model::errors::{ModelError, ModelResult};
use ndarray::{Array1, Array2};

/// Number of choices (and shock dimensions) in the model.
pub const NUM_CHOICES: usize = 4;

/// Validate that the horizon contains at least one period.
///
/// # Errors
/// Returns [`ModelError::InvalidNumPeriods`] when `num_periods == 0`.
pub fn validate_num_periods(num_periods: usize) -> ModelResult<()> {
    if num_periods == 0 {
        return Err(ModelError::InvalidNumPeriods { num_periods });
    }
    Ok(())
}

/// Validate the schooling range `[edu_start, edu_max]`.
///
/// `edu_max == edu_start` is admissible and simply removes the school choice.
///
/// # Errors
/// Returns [`ModelError::InvalidEducationBounds`] when `edu_max < edu_start`.
pub fn validate_education_bounds(edu_start: usize, edu_max: usize) -> ModelResult<()> {
    if edu_max < edu_start {
        return Err(ModelError::InvalidEducationBounds { edu_start, edu_max });
    }
    Ok(())
}

/// Validate the discount factor.
///
/// # Errors
/// Returns [`ModelError::InvalidDelta`] when `delta` is non-finite or negative.
pub fn validate_delta(delta: f64) -> ModelResult<()> {
    if !delta.is_finite() {
        return Err(ModelError::InvalidDelta { value: delta, reason: "Discount factor must be finite." });
    }
    if delta < 0.0 {
        return Err(ModelError::InvalidDelta {
            value: delta,
            reason: "Discount factor must be non-negative.",
        });
    }
    Ok(())
}

/// Validate the Monte-Carlo draw count.
///
/// # Errors
/// Returns [`ModelError::InvalidNumDraws`] when `num_draws == 0`.
pub fn validate_num_draws(num_draws: usize) -> ModelResult<()> {
    if num_draws == 0 {
        return Err(ModelError::InvalidNumDraws { num_draws });
    }
    Ok(())
}

/// Validate the interpolation quota against the number of regressors.
///
/// # Errors
/// Returns [`ModelError::InvalidInterpPoints`] when `num_points < minimum`.
pub fn validate_interp_points(num_points: usize, minimum: usize) -> ModelResult<()> {
    if num_points < minimum {
        return Err(ModelError::InvalidInterpPoints { num_points, minimum });
    }
    Ok(())
}

/// Validate an ambiguity level (radius of the divergence ball).
///
/// A negative radius describes an empty set of admissible measures and is
/// therefore infeasible.
///
/// # Errors
/// Returns [`ModelError::InvalidAmbiguityLevel`] when `level` is non-finite
/// or negative.
pub fn validate_ambiguity_level(level: f64) -> ModelResult<()> {
    if !level.is_finite() {
        return Err(ModelError::InvalidAmbiguityLevel {
            level,
            reason: "Ambiguity level must be finite.",
        });
    }
    if level < 0.0 {
        return Err(ModelError::InvalidAmbiguityLevel {
            level,
            reason: "Ambiguity level must be non-negative; no distribution lies in a ball of negative radius.",
        });
    }
    Ok(())
}

/// Validate an explicit worker count.
///
/// # Errors
/// Returns [`ModelError::InvalidNumThreads`] when `num_threads == 0`.
pub fn validate_num_threads(num_threads: usize) -> ModelResult<()> {
    if num_threads == 0 {
        return Err(ModelError::InvalidNumThreads { num_threads });
    }
    Ok(())
}

/// Validate the number of simulated agents.
///
/// # Errors
/// Returns [`ModelError::InvalidNumAgents`] when `num_agents == 0`.
pub fn validate_num_agents(num_agents: usize) -> ModelResult<()> {
    if num_agents == 0 {
        return Err(ModelError::InvalidNumAgents { num_agents });
    }
    Ok(())
}

/// Validate a coefficient vector against its expected length and finiteness.
///
/// # Errors
/// - [`ModelError::CoeffLengthMismatch`] if `coeffs.len() != expected`.
/// - [`ModelError::NonFiniteCoeff`] for the first NaN/±inf entry.
pub fn validate_coeffs(name: &'static str, coeffs: &Array1<f64>, expected: usize) -> ModelResult<()> {
    if coeffs.len() != expected {
        return Err(ModelError::CoeffLengthMismatch { name, expected, actual: coeffs.len() });
    }
    for (index, &value) in coeffs.iter().enumerate() {
        if !value.is_finite() {
            return Err(ModelError::NonFiniteCoeff { name, index, value });
        }
    }
    Ok(())
}

/// Validate a 4×4 shock matrix; optionally require lower-triangular form.
///
/// # Checks
/// 1. Shape is `NUM_CHOICES × NUM_CHOICES`.
/// 2. Every entry is finite.
/// 3. When `lower_triangular` is set, entries above the diagonal are zero.
///
/// # Errors
/// - [`ModelError::InvalidCholeskyShape`] on a shape mismatch.
/// - [`ModelError::NonFiniteCoeff`] for the first non-finite entry (row-major
///   flat index).
/// - [`ModelError::CholeskyNotLowerTriangular`] for the first non-zero entry
///   above the diagonal.
pub fn validate_cholesky(matrix: &Array2<f64>, lower_triangular: bool) -> ModelResult<()> {
    if matrix.nrows() != NUM_CHOICES || matrix.ncols() != NUM_CHOICES {
        return Err(ModelError::InvalidCholeskyShape { rows: matrix.nrows(), cols: matrix.ncols() });
    }
    for ((row, col), &value) in matrix.indexed_iter() {
        if !value.is_finite() {
            return Err(ModelError::NonFiniteCoeff {
                name: "shocks",
                index: row * NUM_CHOICES + col,
                value,
            });
        }
        if lower_triangular && col > row && value != 0.0 {
            return Err(ModelError::CholeskyNotLowerTriangular { row, col, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the boundary of each eager check: the smallest
    // admissible value passes and the first inadmissible value fails with the
    // matching variant.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Education bounds accept equality and reject an inverted range.
    fn education_bounds_accept_equal_and_reject_inverted() {
        assert!(validate_education_bounds(10, 10).is_ok());
        assert_eq!(
            validate_education_bounds(12, 10),
            Err(ModelError::InvalidEducationBounds { edu_start: 12, edu_max: 10 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Zero is a valid (myopic) discount factor; negatives and NaN are not.
    fn delta_accepts_zero_and_rejects_negative_or_nan() {
        assert!(validate_delta(0.0).is_ok());
        assert!(matches!(validate_delta(-0.1), Err(ModelError::InvalidDelta { .. })));
        assert!(matches!(validate_delta(f64::NAN), Err(ModelError::InvalidDelta { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Zero draws are rejected before any averaging could divide by zero.
    fn num_draws_rejects_zero() {
        assert_eq!(validate_num_draws(0), Err(ModelError::InvalidNumDraws { num_draws: 0 }));
        assert!(validate_num_draws(1).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // A negative ambiguity radius is infeasible; zero is admissible.
    fn ambiguity_level_rejects_negative_radius() {
        assert!(validate_ambiguity_level(0.0).is_ok());
        assert!(matches!(
            validate_ambiguity_level(-1e-3),
            Err(ModelError::InvalidAmbiguityLevel { .. })
        ));
        assert!(matches!(
            validate_ambiguity_level(f64::INFINITY),
            Err(ModelError::InvalidAmbiguityLevel { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Coefficient vectors are checked for length first, then finiteness.
    fn coeffs_report_length_then_non_finite_entry() {
        assert_eq!(
            validate_coeffs("coeffs_edu", &array![1.0, 2.0], 3),
            Err(ModelError::CoeffLengthMismatch { name: "coeffs_edu", expected: 3, actual: 2 })
        );
        let err = validate_coeffs("coeffs_home", &array![f64::NAN], 1).unwrap_err();
        assert!(matches!(err, ModelError::NonFiniteCoeff { index: 0, .. }));
    }

    #[test]
    // Purpose
    // -------
    // Shock matrices must be 4×4 and, for Cholesky factors, lower triangular.
    //
    // Given
    // -----
    // - A 3×3 identity, a 4×4 identity, and a 4×4 matrix with an entry above
    //   the diagonal.
    //
    // Expect
    // ------
    // - Shape error, success, and a triangularity error naming (0, 3).
    fn cholesky_checks_shape_and_triangularity() {
        let small = Array2::<f64>::eye(3);
        assert!(matches!(
            validate_cholesky(&small, true),
            Err(ModelError::InvalidCholeskyShape { rows: 3, cols: 3 })
        ));

        let eye = Array2::<f64>::eye(4);
        assert!(validate_cholesky(&eye, true).is_ok());

        let upper = array![
            [1.0, 0.0, 0.0, 0.5],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0]
        ];
        assert!(matches!(
            validate_cholesky(&upper, true),
            Err(ModelError::CholeskyNotLowerTriangular { row: 0, col: 3, .. })
        ));
        assert!(validate_cholesky(&upper, false).is_ok());
    }
}
