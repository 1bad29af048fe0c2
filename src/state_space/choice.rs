//! state_space::choice — the four alternatives and the per-period state.
//!
//! Conventions
//! -----------
//! - Choice order `(WorkA, WorkB, School, Home)` is the column order of every
//!   4-vector in the crate: payoffs, shocks, transitions.
//! - `edu` is stored in absolute years of schooling.
use crate::model::NUM_CHOICES;
use std::fmt;

/// One of the four mutually exclusive alternatives available each period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Choice {
    WorkA,
    WorkB,
    School,
    Home,
}

impl Choice {
    /// All choices in column order.
    pub const ALL: [Choice; NUM_CHOICES] = [Choice::WorkA, Choice::WorkB, Choice::School, Choice::Home];

    /// Column index of the choice.
    pub fn index(self) -> usize {
        match self {
            Choice::WorkA => 0,
            Choice::WorkB => 1,
            Choice::School => 2,
            Choice::Home => 3,
        }
    }

    /// Inverse of [`Choice::index`]; `None` for indices `≥ 4`.
    pub fn from_index(index: usize) -> Option<Choice> {
        Choice::ALL.get(index).copied()
    }

    /// `true` for the two occupations, whose rewards are wages.
    pub fn is_work(self) -> bool {
        matches!(self, Choice::WorkA | Choice::WorkB)
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Choice::WorkA => "work_a",
            Choice::WorkB => "work_b",
            Choice::School => "school",
            Choice::Home => "home",
        };
        f.write_str(name)
    }
}

/// A decision state: accumulated experience, schooling, and last choice.
///
/// Invariants
/// ----------
/// - `exp_a + exp_b + (edu - edu_start) + idle == period`, where `idle` is
///   the number of past periods spent at home.
/// - `edu ≤ edu_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    pub period: usize,
    pub exp_a: usize,
    pub exp_b: usize,
    pub edu: usize,
    pub lagged_choice: Choice,
}

impl State {
    /// Whether `choice` may be taken from this state.
    ///
    /// Only schooling is ever ruled out, once `edu` reaches `edu_max`.
    pub fn is_feasible(&self, choice: Choice, edu_max: usize) -> bool {
        match choice {
            Choice::School => self.edu < edu_max,
            _ => true,
        }
    }

    /// The state reached in `period + 1` after taking `choice`.
    ///
    /// Feasibility is not checked here; see [`State::is_feasible`].
    pub fn successor(&self, choice: Choice) -> State {
        let mut next = State { period: self.period + 1, lagged_choice: choice, ..*self };
        match choice {
            Choice::WorkA => next.exp_a += 1,
            Choice::WorkB => next.exp_b += 1,
            Choice::School => next.edu += 1,
            Choice::Home => {}
        }
        next
    }
}
