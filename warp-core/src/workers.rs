//! Worker pool: a fixed-size pool of N threads draining a per-chunk job
//! list, with a barrier the driver can wait on before reading any result.
//!
//! `ThreadPool::install` with a parallel map over `0..n` *is* "submit n
//! tasks, then block until every one has completed": rayon's `install` does
//! not return until every spawned task finishes, and the returned `Vec` is
//! indexed by job number regardless of completion order, so the driver can
//! read results back in chunk-index order with no extra bookkeeping.

use rayon::prelude::*;

use crate::error::Result;

pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    pub fn new(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .build()
            .map_err(|e| {
                crate::error::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("failed to build worker pool: {e}"),
                ))
            })?;
        Ok(WorkerPool { pool })
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Submits `n` jobs (one per index in `0..n`) and blocks until every
    /// job has run to completion (the barrier), returning results in
    /// job-index order. Task bodies run without holding any pool lock and
    /// must not submit further jobs to this pool.
    pub fn map_barrier<T, F>(&self, n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        self.pool.install(|| (0..n).into_par_iter().map(f).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn runs_every_job_exactly_once_and_preserves_order() {
        let pool = WorkerPool::new(4).unwrap();
        let results = pool.map_barrier(100, |i| i * 2);
        assert_eq!(results.len(), 100);
        for (i, v) in results.into_iter().enumerate() {
            assert_eq!(v, i * 2);
        }
    }

    #[test]
    fn barrier_waits_for_all_workers() {
        let pool = WorkerPool::new(8).unwrap();
        let counter = AtomicUsize::new(0);
        let results = pool.map_barrier(50, |_| counter.fetch_add(1, Ordering::SeqCst));
        assert_eq!(results.len(), 50);
        assert_eq!(counter.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn single_thread_pool_is_still_correct() {
        let pool = WorkerPool::new(1).unwrap();
        let results = pool.map_barrier(10, |i| i + 1);
        assert_eq!(results, (1..=10).collect::<Vec<_>>());
    }
}
