//! simulate::history — simulated agent histories.
//!
//! Rows are stored agent-major: all periods of agent 0, then agent 1, and so
//! on, so each agent's path is a contiguous slice.
use crate::{model::NUM_CHOICES, state_space::Choice};
use ndarray::Array2;

/// Number of columns produced by [`AgentHistory::to_array`].
pub const NUM_HISTORY_COLUMNS: usize = 8;

/// One agent-period observation.
///
/// `exp_a`, `exp_b`, `edu`, and `lagged_choice` describe the state at the
/// start of the period, before `choice` is taken. `earnings` is the realized
/// wage for work choices and `None` otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentRecord {
    pub agent: usize,
    pub period: usize,
    pub choice: Choice,
    pub earnings: Option<f64>,
    pub exp_a: usize,
    pub exp_b: usize,
    pub edu: usize,
    pub lagged_choice: Choice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentHistory {
    num_agents: usize,
    num_periods: usize,
    records: Vec<AgentRecord>,
}

impl AgentHistory {
    pub(crate) fn new(num_agents: usize, num_periods: usize, records: Vec<AgentRecord>) -> Self {
        Self { num_agents, num_periods, records }
    }

    pub fn num_agents(&self) -> usize {
        self.num_agents
    }

    pub fn num_periods(&self) -> usize {
        self.num_periods
    }

    pub fn records(&self) -> &[AgentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All periods of one agent, in period order.
    pub fn agent(&self, agent: usize) -> Option<&[AgentRecord]> {
        let start = agent.checked_mul(self.num_periods)?;
        self.records.get(start..start + self.num_periods)
    }

    /// Share of agents choosing each alternative in `period`.
    ///
    /// `None` for periods outside the simulated horizon.
    pub fn choice_shares(&self, period: usize) -> Option<[f64; NUM_CHOICES]> {
        if period >= self.num_periods || self.num_agents == 0 {
            return None;
        }
        let mut counts = [0usize; NUM_CHOICES];
        for record in self.records.iter().filter(|r| r.period == period) {
            counts[record.choice.index()] += 1;
        }
        let total = self.num_agents as f64;
        Some(counts.map(|c| c as f64 / total))
    }

    /// Mean realized wage among agents working in `period`.
    pub fn mean_earnings(&self, period: usize) -> Option<f64> {
        let wages: Vec<f64> =
            self.records.iter().filter(|r| r.period == period).filter_map(|r| r.earnings).collect();
        if wages.is_empty() {
            return None;
        }
        Some(wages.iter().sum::<f64>() / wages.len() as f64)
    }

    /// Dense table with columns
    /// `[agent, period, choice, earnings, exp_a, exp_b, edu, lagged_choice]`.
    ///
    /// Choices are encoded by their column index; missing earnings are NaN.
    pub fn to_array(&self) -> Array2<f64> {
        let mut out = Array2::<f64>::zeros((self.records.len(), NUM_HISTORY_COLUMNS));
        for (mut row, r) in out.rows_mut().into_iter().zip(&self.records) {
            row[0] = r.agent as f64;
            row[1] = r.period as f64;
            row[2] = r.choice.index() as f64;
            row[3] = r.earnings.unwrap_or(f64::NAN);
            row[4] = r.exp_a as f64;
            row[5] = r.exp_b as f64;
            row[6] = r.edu as f64;
            row[7] = r.lagged_choice.index() as f64;
        }
        out
    }
}
