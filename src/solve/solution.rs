//! solve::solution — immutable result of a successful solve.
//!
//! Purpose
//! -------
//! Bundle the state space (index mapping and transitions), the systematic
//! payoff tables, and the EMAX table so that simulation and inspection code
//! can query them without re-running the solver.
//!
//! Key behaviors
//! -------------
//! - Lookups by `(period, index)` return [`SolveError::PeriodOutOfRange`] or
//!   [`SolveError::StateOutOfRange`] instead of panicking.
//! - [`Solution::continuations`] reproduces exactly the continuation values
//!   the solver used, so simulated decisions are consistent with the EMAX
//!   table.
//!
//! Invariants & assumptions
//! ------------------------
//! - Only `solve` constructs a `Solution`; no field is mutable afterwards.
//! - The shock factor is kept so the simulator can reject mismatched
//!   parameters.
//! - `payoffs[t]` and `emax[t]` have `num_states(t)` rows / entries.
use crate::{
    solve::{
        emax::{Continuations, choice_continuations},
        errors::{SolveError, SolveResult},
    },
    state_space::{Choice, State, StateSpace},
};
use ndarray::{Array1, Array2, ArrayView1};

#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    space: StateSpace,
    payoffs: Vec<Array2<f64>>,
    emax: Vec<Array1<f64>>,
    delta: f64,
    shocks_cholesky: Array2<f64>,
}

impl Solution {
    pub(crate) fn new(
        space: StateSpace, payoffs: Vec<Array2<f64>>, emax: Vec<Array1<f64>>, delta: f64,
        shocks_cholesky: Array2<f64>,
    ) -> Self {
        Self { space, payoffs, emax, delta, shocks_cholesky }
    }

    pub fn num_periods(&self) -> usize {
        self.space.num_periods()
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn state_space(&self) -> &StateSpace {
        &self.space
    }

    /// Shock Cholesky factor the solution was computed with.
    pub fn shocks_cholesky(&self) -> &Array2<f64> {
        &self.shocks_cholesky
    }

    /// EMAX of every state in `period`.
    pub fn emax_period(&self, period: usize) -> SolveResult<&Array1<f64>> {
        self.emax.get(period).ok_or(SolveError::PeriodOutOfRange {
            period,
            num_periods: self.num_periods(),
        })
    }

    /// Systematic payoff table of `period`, `num_states × 4`.
    pub fn payoffs_period(&self, period: usize) -> SolveResult<&Array2<f64>> {
        self.payoffs.get(period).ok_or(SolveError::PeriodOutOfRange {
            period,
            num_periods: self.num_periods(),
        })
    }

    /// Systematic payoffs of the four choices at `(period, index)`.
    pub fn payoff_lookup(&self, period: usize, index: usize) -> SolveResult<ArrayView1<'_, f64>> {
        let table = self.payoffs_period(period)?;
        self.check_index(period, index, table.nrows())?;
        Ok(table.row(index))
    }

    /// EMAX at `(period, index)`.
    pub fn emax_lookup(&self, period: usize, index: usize) -> SolveResult<f64> {
        let emax = self.emax_period(period)?;
        self.check_index(period, index, emax.len())?;
        Ok(emax[index])
    }

    /// Dense index of a state, if reachable.
    pub fn state_index(
        &self, period: usize, exp_a: usize, exp_b: usize, edu: usize, lagged_choice: Choice,
    ) -> Option<usize> {
        self.space.state_index(period, exp_a, exp_b, edu, lagged_choice)
    }

    /// State stored at `(period, index)`.
    pub fn state(&self, period: usize, index: usize) -> SolveResult<&State> {
        self.space.state(period, index).ok_or(SolveError::StateOutOfRange {
            period,
            index,
            num_states: self.space.num_states(period),
        })
    }

    /// Successor index in `period + 1` after `choice`.
    pub fn transition(&self, period: usize, index: usize, choice: Choice) -> Option<usize> {
        self.space.transition(period, index, choice)
    }

    /// Continuation values of all four choices at `(period, index)`.
    pub fn continuations(&self, period: usize, index: usize) -> SolveResult<Continuations> {
        if period >= self.num_periods() {
            return Err(SolveError::PeriodOutOfRange { period, num_periods: self.num_periods() });
        }
        choice_continuations(&self.space, period, index, self.emax.get(period + 1), self.delta)
    }

    /// `delta · EMAX[t+1][next(choice)]`, `Some(0.0)` in the terminal period,
    /// `None` when the choice is infeasible.
    pub fn continuation(&self, period: usize, index: usize, choice: Choice) -> SolveResult<Option<f64>> {
        Ok(self.continuations(period, index)?[choice.index()])
    }

    fn check_index(&self, period: usize, index: usize, num_states: usize) -> SolveResult<()> {
        if index >= num_states {
            return Err(SolveError::StateOutOfRange { period, index, num_states });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{
            options::{ModelSpec, SolveOptions},
            params::ModelParams,
        },
        solve::solve,
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    fn small_solution() -> Solution {
        let params = ModelParams::new(
            array![9.21, 0.038, 0.033, -0.0005, 0.0, 0.0],
            array![8.48, 0.07, 0.067, -0.001, 0.022, -0.0005],
            array![0.0, 0.0, -4000.0],
            array![17750.0],
            Array2::zeros((4, 4)),
        )
        .unwrap();
        let spec = ModelSpec::new(3, 10, 12, 0.9).unwrap();
        solve(&spec, &params, &SolveOptions { num_draws: 10, ..SolveOptions::default() }).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Lookups outside the solved tables fail with typed errors.
    //
    // Given
    // -----
    // - A solved 3-period model.
    //
    // Expect
    // ------
    // - Period 3 yields PeriodOutOfRange; an index past the period yields
    //   StateOutOfRange carrying the period size.
    fn out_of_range_lookups_are_errors() {
        let solution = small_solution();
        let num_states = solution.state_space().num_states(1);

        assert!(matches!(
            solution.emax_lookup(3, 0),
            Err(SolveError::PeriodOutOfRange { period: 3, num_periods: 3 })
        ));
        assert!(matches!(
            solution.payoff_lookup(1, num_states),
            Err(SolveError::StateOutOfRange { period: 1, .. })
        ));
        assert!(matches!(solution.state(1, num_states), Err(SolveError::StateOutOfRange { .. })));
        assert!(solution.continuations(3, 0).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Continuations are `delta · EMAX[t+1][next]` before the last period and
    // zero in it.
    //
    // Given
    // -----
    // - The entry state and any terminal-period state.
    //
    // Expect
    // ------
    // - Entry continuations match the EMAX of the successor scaled by delta.
    // - Terminal continuations are `Some(0.0)` for feasible choices.
    fn continuations_match_emax_table() {
        let solution = small_solution();

        for choice in Choice::ALL {
            let cont = solution.continuation(0, 0, choice).unwrap();
            match solution.transition(0, 0, choice) {
                Some(next) => {
                    let expected = 0.9 * solution.emax_lookup(1, next).unwrap();
                    assert_relative_eq!(cont.unwrap(), expected, max_relative = 1e-12);
                }
                None => assert!(cont.is_none()),
            }
        }

        let terminal = solution.continuations(2, 0).unwrap();
        let state = *solution.state(2, 0).unwrap();
        for choice in Choice::ALL {
            let feasible = solution.state_space().is_feasible(&state, choice);
            assert_eq!(terminal[choice.index()], feasible.then_some(0.0));
        }
    }
}
