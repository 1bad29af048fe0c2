//! draws — reproducible Monte-Carlo shock batches.
//!
//! Purpose
//! -------
//! Generate the standard-normal draws used for EMAX integration (and, with a
//! separate seed, for forward simulation), and map them into the model's
//! shock space through the Cholesky factor of the shock covariance.
//!
//! Key behaviors
//! -------------
//! - [`create_draws`] fills a `(num_periods, num_draws, 4)` array period by
//!   period from a single `StdRng` seeded with `seed`, sampling
//!   `statrs::distribution::Normal::standard()`.
//! - [`DrawBatch::transformed`] returns `ε = L·z` per draw, with the two wage
//!   components exponentiated so they multiply wages directly.
//!
//! Invariants & assumptions
//! ------------------------
//! - The batch is a pure function of `(num_periods, num_draws, seed)`.
//! - Because generation is period-major, the draws of period `t` are the
//!   same for every horizon `T > t`.
//! - Debug batches skip the Cholesky scaling; the wage `exp` mapping still
//!   applies.
use crate::{
    model::{
        NUM_CHOICES,
        errors::ModelResult,
        validation::{validate_num_draws, validate_num_periods},
    },
    state_space::Choice,
};
use ndarray::{Array2, Array3, ArrayView2, Axis};
use rand::{SeedableRng, distributions::Distribution, rngs::StdRng};
use statrs::distribution::Normal;

/// DrawBatch — standard-normal draws for every period.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    draws: Array3<f64>,
    debug: bool,
}

/// Create a deterministic batch of standard-normal draws.
///
/// # Errors
/// - [`ModelError::InvalidNumPeriods`](crate::model::ModelError::InvalidNumPeriods)
///   when `num_periods == 0`.
/// - [`ModelError::InvalidNumDraws`](crate::model::ModelError::InvalidNumDraws)
///   when `num_draws == 0`.
pub fn create_draws(num_periods: usize, num_draws: usize, seed: u64, debug: bool) -> ModelResult<DrawBatch> {
    validate_num_periods(num_periods)?;
    validate_num_draws(num_draws)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::standard();
    let mut draws = Array3::<f64>::zeros((num_periods, num_draws, NUM_CHOICES));
    for z in draws.iter_mut() {
        *z = normal.sample(&mut rng);
    }
    Ok(DrawBatch { draws, debug })
}

impl DrawBatch {
    pub fn num_periods(&self) -> usize {
        self.draws.len_of(Axis(0))
    }

    pub fn num_draws(&self) -> usize {
        self.draws.len_of(Axis(1))
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Raw standard-normal draws of `period`, `num_draws × 4`.
    pub fn period(&self, period: usize) -> Option<ArrayView2<'_, f64>> {
        (period < self.num_periods()).then(|| self.draws.index_axis(Axis(0), period))
    }

    /// Shocks of `period` ready for payoff evaluation, `num_draws × 4`.
    ///
    /// Each row is `ε = L·z` (or `z` in debug mode); the wage columns are
    /// then replaced by `exp(ε)`.
    pub fn transformed(&self, period: usize, cholesky: &Array2<f64>) -> Option<Array2<f64>> {
        let raw = self.period(period)?;
        let mut shocks = if self.debug { raw.to_owned() } else { raw.dot(&cholesky.t()) };
        for mut row in shocks.rows_mut() {
            for choice in [Choice::WorkA, Choice::WorkB] {
                let c = choice.index();
                row[c] = row[c].exp();
            }
        }
        Some(shocks)
    }
}
