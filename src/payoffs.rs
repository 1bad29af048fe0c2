//! payoffs — systematic (shock-free) rewards of each choice.
//!
//! Purpose
//! -------
//! Map a state and the structural parameters to the deterministic component
//! of each alternative's reward. Shocks enter later, in the solver.
//!
//! Key behaviors
//! -------------
//! - Wages: `exp(coeffs · [1, edu, exp_a, exp_a², exp_b, exp_b²])` for both
//!   occupations.
//! - Schooling: consumption value, plus the post-secondary tuition term once
//!   `edu ≥ 12`, plus the re-entry cost when the last choice was not school.
//! - Home: constant.
//!
//! Conventions
//! -----------
//! - Output arrays follow the choice order `(WorkA, WorkB, School, Home)`.
//! - Pure functions; no randomness and no error paths (parameters are
//!   validated on construction).
use crate::{
    model::{NUM_CHOICES, params::ModelParams},
    state_space::{Choice, State, StateSpace},
};
use ndarray::{Array1, Array2};

/// Years of schooling from which tuition applies.
pub const TUITION_THRESHOLD: usize = 12;

/// Systematic payoff of every choice in `state`.
pub fn systematic_payoffs(state: &State, params: &ModelParams) -> [f64; NUM_CHOICES] {
    let covars = wage_covariates(state);
    let wage_a = params.coeffs_a.dot(&covars).exp();
    let wage_b = params.coeffs_b.dot(&covars).exp();

    let edu = &params.coeffs_edu;
    let mut school = edu[0];
    if state.edu >= TUITION_THRESHOLD {
        school += edu[1];
    }
    if state.lagged_choice != Choice::School {
        school += edu[2];
    }

    [wage_a, wage_b, school, params.coeffs_home[0]]
}

/// Payoff table of one period, `num_states × 4`.
///
/// Out-of-range periods produce an empty `0 × 4` table.
pub fn period_payoffs(space: &StateSpace, period: usize, params: &ModelParams) -> Array2<f64> {
    let states = space.period_states(period);
    let mut out = Array2::<f64>::zeros((states.len(), NUM_CHOICES));
    for (mut row, state) in out.rows_mut().into_iter().zip(states) {
        let payoffs = systematic_payoffs(state, params);
        for (dst, src) in row.iter_mut().zip(payoffs) {
            *dst = src;
        }
    }
    out
}

fn wage_covariates(state: &State) -> Array1<f64> {
    let exp_a = state.exp_a as f64;
    let exp_b = state.exp_b as f64;
    Array1::from(vec![1.0, state.edu as f64, exp_a, exp_a * exp_a, exp_b, exp_b * exp_b])
}
