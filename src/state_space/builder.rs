//! state_space::builder — enumeration, indexing, and transitions.
//!
//! Purpose
//! -------
//! Enumerate every state an agent can occupy in each period, assign dense
//! per-period indices, and precompute for each state and choice the index of
//! the successor state in the next period.
//!
//! Key behaviors
//! -------------
//! - [`StateSpace::new`] validates the bounds before enumerating anything.
//! - Period 0 holds the single entry state `(0, 0, edu_start, School)`.
//! - Later periods hold every count combination with
//!   `exp_a + exp_b + (edu - edu_start) ≤ period` and `edu ≤ edu_max`, paired
//!   with each lag consistent with those counts.
//! - Transitions are `[Option<usize>; 4]` per state; `None` marks an
//!   infeasible choice. Terminal-period states carry no transitions.
//!
//! Invariants & assumptions
//! ------------------------
//! - Indices in a period are contiguous `0..num_states(period)` in
//!   enumeration order (`exp_a`, `exp_b`, `edu`, lag).
//! - `state_index` and `state` are inverse on each period.
//! - Every enumerated state is reachable from the entry state.
//!
//! Performance
//! -----------
//! - Lookups go through one `HashMap` per period; the solver only uses them
//!   through the precomputed transition table.
use crate::{
    model::{
        NUM_CHOICES,
        errors::ModelResult,
        validation::{validate_education_bounds, validate_num_periods},
    },
    state_space::choice::{Choice, State},
};
use std::collections::HashMap;

/// Successor index per choice; `None` when the choice is infeasible.
pub type Transitions = [Option<usize>; NUM_CHOICES];

type StateKey = (usize, usize, usize, Choice);

/// StateSpace — reachable states with index mapping and transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace {
    num_periods: usize,
    edu_start: usize,
    edu_max: usize,
    states: Vec<Vec<State>>,
    index: Vec<HashMap<StateKey, usize>>,
    transitions: Vec<Vec<Transitions>>,
}

impl StateSpace {
    /// Enumerate the state space for `num_periods` periods.
    ///
    /// # Errors
    /// - [`ModelError::InvalidNumPeriods`](crate::model::ModelError::InvalidNumPeriods)
    ///   when `num_periods == 0`.
    /// - [`ModelError::InvalidEducationBounds`](crate::model::ModelError::InvalidEducationBounds)
    ///   when `edu_max < edu_start`.
    pub fn new(num_periods: usize, edu_start: usize, edu_max: usize) -> ModelResult<Self> {
        validate_num_periods(num_periods)?;
        validate_education_bounds(edu_start, edu_max)?;

        let mut states = Vec::with_capacity(num_periods);
        let mut index = Vec::with_capacity(num_periods);
        for period in 0..num_periods {
            let period_states = enumerate_period(period, edu_start, edu_max);
            let period_index = period_states
                .iter()
                .enumerate()
                .map(|(k, s)| ((s.exp_a, s.exp_b, s.edu, s.lagged_choice), k))
                .collect::<HashMap<_, _>>();
            states.push(period_states);
            index.push(period_index);
        }

        let mut space = Self {
            num_periods,
            edu_start,
            edu_max,
            states,
            index,
            transitions: Vec::with_capacity(num_periods),
        };
        space.transitions = (0..num_periods).map(|t| space.period_transitions(t)).collect();
        Ok(space)
    }

    pub fn num_periods(&self) -> usize {
        self.num_periods
    }

    pub fn edu_start(&self) -> usize {
        self.edu_start
    }

    pub fn edu_max(&self) -> usize {
        self.edu_max
    }

    /// Number of states in `period`; zero for out-of-range periods.
    pub fn num_states(&self, period: usize) -> usize {
        self.states.get(period).map_or(0, Vec::len)
    }

    /// Largest per-period state count.
    pub fn max_states_period(&self) -> usize {
        self.states.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Total number of states over all periods.
    pub fn total_states(&self) -> usize {
        self.states.iter().map(Vec::len).sum()
    }

    /// Dense index of a state within its period, if the state is reachable.
    pub fn state_index(
        &self, period: usize, exp_a: usize, exp_b: usize, edu: usize, lagged_choice: Choice,
    ) -> Option<usize> {
        self.index.get(period)?.get(&(exp_a, exp_b, edu, lagged_choice)).copied()
    }

    /// State stored at `(period, index)`.
    pub fn state(&self, period: usize, index: usize) -> Option<&State> {
        self.states.get(period)?.get(index)
    }

    /// All states of `period` in index order.
    pub fn period_states(&self, period: usize) -> &[State] {
        self.states.get(period).map_or(&[], Vec::as_slice)
    }

    /// Successor index in `period + 1` after `choice`.
    ///
    /// `None` when the choice is infeasible, the period is terminal, or the
    /// coordinates are out of range.
    pub fn transition(&self, period: usize, index: usize, choice: Choice) -> Option<usize> {
        self.transitions.get(period)?.get(index)?[choice.index()]
    }

    /// Full transition row of a state.
    pub fn transitions(&self, period: usize, index: usize) -> Option<&Transitions> {
        self.transitions.get(period)?.get(index)
    }

    /// Whether `choice` is feasible in `state` under this space's bounds.
    pub fn is_feasible(&self, state: &State, choice: Choice) -> bool {
        state.is_feasible(choice, self.edu_max)
    }

    // ---- Helper methods ----

    fn period_transitions(&self, period: usize) -> Vec<Transitions> {
        let terminal = period + 1 == self.num_periods;
        self.period_states(period)
            .iter()
            .map(|state| {
                let mut row = [None; NUM_CHOICES];
                if terminal {
                    return row;
                }
                for choice in Choice::ALL {
                    if self.is_feasible(state, choice) {
                        let next = state.successor(choice);
                        row[choice.index()] = self.state_index(
                            next.period,
                            next.exp_a,
                            next.exp_b,
                            next.edu,
                            next.lagged_choice,
                        );
                    }
                }
                row
            })
            .collect()
    }
}

/// States of one period in enumeration order.
fn enumerate_period(period: usize, edu_start: usize, edu_max: usize) -> Vec<State> {
    if period == 0 {
        return vec![State { period: 0, exp_a: 0, exp_b: 0, edu: edu_start, lagged_choice: Choice::School }];
    }
    let mut out = Vec::new();
    for exp_a in 0..=period {
        for exp_b in 0..=(period - exp_a) {
            let max_edu_add = (period - exp_a - exp_b).min(edu_max - edu_start);
            for edu_add in 0..=max_edu_add {
                let idle = period - exp_a - exp_b - edu_add;
                for lagged_choice in Choice::ALL {
                    let consistent = match lagged_choice {
                        Choice::WorkA => exp_a >= 1,
                        Choice::WorkB => exp_b >= 1,
                        Choice::School => edu_add >= 1,
                        Choice::Home => idle >= 1,
                    };
                    if consistent {
                        out.push(State { period, exp_a, exp_b, edu: edu_start + edu_add, lagged_choice });
                    }
                }
            }
        }
    }
    out
}
