//! solve::backend — serial or rayon-parallel map over the states of a period.
//!
//! Each period's states are independent given the next period's EMAX, so the
//! per-period state loop is the unit of parallel work. `map_states` fans out
//! over the indices and collects the results in index order before the
//! caller moves to the previous period, which makes the parallel result
//! identical to the serial one.
use crate::{
    model::options::Backend,
    solve::errors::{SolveError, SolveResult},
};
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};

/// Resolved execution strategy for one solve.
pub enum StateExecutor {
    Serial,
    /// rayon's global pool.
    Global,
    /// A dedicated pool with an explicit worker count.
    Pool(ThreadPool),
}

impl StateExecutor {
    /// Resolve a [`Backend`] into an executor, building a pool if needed.
    ///
    /// # Errors
    /// Returns [`SolveError::ThreadPool`] if rayon cannot spawn the pool.
    pub fn new(backend: &Backend) -> SolveResult<Self> {
        match backend {
            Backend::Serial => Ok(StateExecutor::Serial),
            Backend::Parallel { num_threads: None } => Ok(StateExecutor::Global),
            Backend::Parallel { num_threads: Some(n) } => ThreadPoolBuilder::new()
                .num_threads(*n)
                .build()
                .map(StateExecutor::Pool)
                .map_err(|e| SolveError::ThreadPool { reason: e.to_string() }),
        }
    }

    /// Evaluate `f` for every index in `indices`, preserving order.
    ///
    /// The first error (in some order) aborts the map.
    pub fn map_states<T, F>(&self, indices: &[usize], f: F) -> SolveResult<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> SolveResult<T> + Sync + Send,
    {
        match self {
            StateExecutor::Serial => indices.iter().map(|&k| f(k)).collect(),
            StateExecutor::Global => indices.par_iter().map(|&k| f(k)).collect(),
            StateExecutor::Pool(pool) => {
                pool.install(|| indices.par_iter().map(|&k| f(k)).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // All executors return results in index order.
    //
    // Given
    // -----
    // - 1000 indices and a pure function of the index.
    //
    // Expect
    // ------
    // - Serial, global, and a two-thread pool agree element-wise.
    fn executors_agree_and_preserve_order() {
        // Arrange
        let indices: Vec<usize> = (0..1000).collect();
        let f = |k: usize| -> SolveResult<f64> { Ok((k as f64).sqrt() * 3.0) };

        // Act
        let serial = StateExecutor::new(&Backend::Serial).unwrap().map_states(&indices, f).unwrap();
        let global = StateExecutor::new(&Backend::Parallel { num_threads: None })
            .unwrap()
            .map_states(&indices, f)
            .unwrap();
        let pool = StateExecutor::new(&Backend::Parallel { num_threads: Some(2) })
            .unwrap()
            .map_states(&indices, f)
            .unwrap();

        // Assert
        assert_eq!(serial, global);
        assert_eq!(serial, pool);
    }

    #[test]
    fn errors_abort_the_map() {
        let exec = StateExecutor::new(&Backend::Parallel { num_threads: Some(2) }).unwrap();
        let res: SolveResult<Vec<usize>> = exec.map_states(&[0, 1, 2, 3], |k| {
            if k == 2 {
                Err(SolveError::StateOutOfRange { period: 0, index: k, num_states: 2 })
            } else {
                Ok(k)
            }
        });
        assert!(res.is_err());
    }
}
