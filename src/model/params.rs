//! model::params — structural parameters of the occupational-choice model.
//!
//! Purpose
//! -------
//! Hold the coefficient vectors for the four alternatives together with the
//! Cholesky factor of the shock covariance, validated once at construction so
//! the payoff calculator and the solver can index them without checks.
//!
//! Key behaviors
//! -------------
//! - Validate coefficient lengths and finiteness ([`ModelParams::new`]).
//! - Accept a Cholesky factor directly or derive it from a covariance matrix
//!   via `nalgebra` ([`ModelParams::from_covariance`]).
//! - Expose the implied shock variances used for mean-shock evaluations.
//!
//! Invariants & assumptions
//! ------------------------
//! - `coeffs_a`, `coeffs_b` have [`NUM_COEFFS_WAGE`] entries laid out as
//!   `[intercept, schooling, exp_a, exp_a², exp_b, exp_b²]`.
//! - `coeffs_edu` has [`NUM_COEFFS_EDU`] entries:
//!   `[consumption value, post-secondary tuition, re-entry cost]`.
//! - `coeffs_home` has a single entry.
//! - `shocks_cholesky` is a finite, lower-triangular 4×4 matrix. A zero matrix
//!   is admissible and yields a deterministic model.
//!
//! Conventions
//! -----------
//! - Shock ordering follows the choice ordering `(WorkA, WorkB, School, Home)`.
//! - Wage shocks are disturbances on log wages; School/Home shocks are
//!   additive in utility levels.
use crate::model::{
    errors::{ModelError, ModelResult},
    validation::{NUM_CHOICES, validate_cholesky, validate_coeffs},
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Number of wage-equation coefficients per occupation.
pub const NUM_COEFFS_WAGE: usize = 6;

/// Number of schooling-utility coefficients.
pub const NUM_COEFFS_EDU: usize = 3;

/// Number of home-utility coefficients.
pub const NUM_COEFFS_HOME: usize = 1;

/// ModelParams — validated structural parameters.
///
/// Fields
/// ------
/// - `coeffs_a`, `coeffs_b`: log-wage equation coefficients.
/// - `coeffs_edu`: schooling utility and costs.
/// - `coeffs_home`: value of staying home.
/// - `shocks_cholesky`: lower-triangular factor `L` with `Σ = L Lᵀ`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    pub coeffs_a: Array1<f64>,
    pub coeffs_b: Array1<f64>,
    pub coeffs_edu: Array1<f64>,
    pub coeffs_home: Array1<f64>,
    pub shocks_cholesky: Array2<f64>,
}

impl ModelParams {
    /// Construct parameters from coefficient vectors and a Cholesky factor.
    ///
    /// # Errors
    /// - [`ModelError::CoeffLengthMismatch`] / [`ModelError::NonFiniteCoeff`]
    ///   for malformed coefficient vectors.
    /// - [`ModelError::InvalidCholeskyShape`] /
    ///   [`ModelError::CholeskyNotLowerTriangular`] for a malformed factor.
    pub fn new(
        coeffs_a: Array1<f64>, coeffs_b: Array1<f64>, coeffs_edu: Array1<f64>,
        coeffs_home: Array1<f64>, shocks_cholesky: Array2<f64>,
    ) -> ModelResult<Self> {
        let params = Self { coeffs_a, coeffs_b, coeffs_edu, coeffs_home, shocks_cholesky };
        params.validate()?;
        Ok(params)
    }

    /// Re-run the constructor checks; fields are public and may have been
    /// edited after construction.
    pub fn validate(&self) -> ModelResult<()> {
        validate_all_coeffs(&self.coeffs_a, &self.coeffs_b, &self.coeffs_edu, &self.coeffs_home)?;
        validate_cholesky(&self.shocks_cholesky, true)
    }

    /// Construct parameters from a shock covariance matrix.
    ///
    /// The covariance is factorized with `nalgebra`'s Cholesky decomposition.
    /// An all-zero covariance maps to an all-zero factor so that deterministic
    /// models remain expressible.
    ///
    /// # Errors
    /// - Coefficient errors as in [`ModelParams::new`].
    /// - [`ModelError::InvalidCholeskyShape`] if `shocks_cov` is not 4×4.
    /// - [`ModelError::NonPositiveDefiniteCovariance`] if the factorization
    ///   fails.
    pub fn from_covariance(
        coeffs_a: Array1<f64>, coeffs_b: Array1<f64>, coeffs_edu: Array1<f64>,
        coeffs_home: Array1<f64>, shocks_cov: &Array2<f64>,
    ) -> ModelResult<Self> {
        validate_all_coeffs(&coeffs_a, &coeffs_b, &coeffs_edu, &coeffs_home)?;
        validate_cholesky(shocks_cov, false)?;
        let shocks_cholesky = cholesky_factor(shocks_cov)?;
        Ok(Self { coeffs_a, coeffs_b, coeffs_edu, coeffs_home, shocks_cholesky })
    }

    /// Shock variances `diag(L Lᵀ)` in choice order.
    pub fn shock_variances(&self) -> [f64; NUM_CHOICES] {
        let mut variances = [0.0; NUM_CHOICES];
        for (i, variance) in variances.iter_mut().enumerate() {
            let row = self.shocks_cholesky.row(i);
            *variance = row.dot(&row);
        }
        variances
    }

    /// `true` when every shock has zero variance.
    pub fn is_deterministic(&self) -> bool {
        self.shocks_cholesky.iter().all(|&v| v == 0.0)
    }
}

// ---- Helper methods ----

fn validate_all_coeffs(
    coeffs_a: &Array1<f64>, coeffs_b: &Array1<f64>, coeffs_edu: &Array1<f64>,
    coeffs_home: &Array1<f64>,
) -> ModelResult<()> {
    validate_coeffs("coeffs_a", coeffs_a, NUM_COEFFS_WAGE)?;
    validate_coeffs("coeffs_b", coeffs_b, NUM_COEFFS_WAGE)?;
    validate_coeffs("coeffs_edu", coeffs_edu, NUM_COEFFS_EDU)?;
    validate_coeffs("coeffs_home", coeffs_home, NUM_COEFFS_HOME)?;
    Ok(())
}

/// Lower Cholesky factor of a 4×4 covariance, copied back into `ndarray`.
fn cholesky_factor(cov: &Array2<f64>) -> ModelResult<Array2<f64>> {
    if cov.iter().all(|&v| v == 0.0) {
        return Ok(Array2::zeros((NUM_CHOICES, NUM_CHOICES)));
    }
    let cov_nalg = DMatrix::<f64>::from_fn(NUM_CHOICES, NUM_CHOICES, |i, j| cov[[i, j]]);
    let chol = cov_nalg.cholesky().ok_or(ModelError::NonPositiveDefiniteCovariance)?;
    let l = chol.l();
    Ok(Array2::from_shape_fn((NUM_CHOICES, NUM_CHOICES), |(i, j)| l[(i, j)]))
}
