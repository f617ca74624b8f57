//! Worker pool for provider calls.
//!
//! An explicitly owned, bounded task scheduler. It is created at startup,
//! handed to the dispatch use case, and shut down with a grace period:
//! in-flight calls get `grace` to finish, after which every task's
//! cancellation token is triggered.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Errors from the worker pool
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("worker pool is shut down")]
    ShutDown,
}

/// How a shutdown ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every task finished within the grace period.
    Drained,
    /// The grace period elapsed and running tasks were cancelled.
    Cancelled,
}

/// Bounded pool of concurrently running tasks.
///
/// Cloning yields another handle to the same pool.
#[derive(Clone)]
pub struct WorkerPool {
    tracker: TaskTracker,
    permits: Arc<Semaphore>,
    shutdown: CancellationToken,
    size: usize,
}

impl WorkerPool {
    /// Smallest pool size: one slot per provider, so a provider waiting
    /// out its backoff never holds the slot the other one needs.
    pub const MIN_SIZE: usize = 2;

    /// Create a pool running at most `size` tasks at once (at least
    /// [`MIN_SIZE`](Self::MIN_SIZE)).
    pub fn new(size: usize) -> Self {
        let size = size.max(Self::MIN_SIZE);
        debug!("Creating worker pool with {} slots", size);
        Self {
            tracker: TaskTracker::new(),
            permits: Arc::new(Semaphore::new(size)),
            shutdown: CancellationToken::new(),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of tasks spawned and not yet finished.
    pub fn active_tasks(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.tracker.is_closed()
    }

    /// Run a task on the pool.
    ///
    /// The task receives a token that is cancelled when a shutdown's grace
    /// period runs out. It waits for a free slot before starting.
    pub fn spawn<F, Fut, T>(&self, task: F) -> Result<JoinHandle<T>, PoolError>
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        if self.tracker.is_closed() {
            return Err(PoolError::ShutDown);
        }

        let permits = Arc::clone(&self.permits);
        let token = self.shutdown.child_token();

        Ok(self.tracker.spawn(async move {
            // The semaphore is never closed, so acquiring only waits.
            let _permit = permits.acquire_owned().await.ok();
            task(token).await
        }))
    }

    /// Stop accepting work and wait for running tasks.
    ///
    /// Waits up to `grace` for tasks to finish on their own, then cancels
    /// their tokens and waits for them to observe it.
    pub async fn shutdown(&self, grace: Duration) -> ShutdownOutcome {
        self.tracker.close();

        if tokio::time::timeout(grace, self.tracker.wait()).await.is_ok() {
            info!("Worker pool drained");
            return ShutdownOutcome::Drained;
        }

        warn!(
            "Worker pool did not drain within {}s, cancelling {} task(s)",
            grace.as_secs(),
            self.tracker.len()
        );
        self.shutdown.cancel();
        self.tracker.wait().await;
        ShutdownOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drains_finished_work() {
        let pool = WorkerPool::new(2);
        let handle = pool
            .spawn(|_token| async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                7
            })
            .unwrap();

        let outcome = pool.shutdown(Duration::from_secs(5)).await;

        assert_eq!(outcome, ShutdownOutcome::Drained);
        assert_eq!(handle.await.unwrap(), 7);
        assert!(pool.is_shut_down());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_after_grace() {
        let pool = WorkerPool::new(2);
        let handle = pool
            .spawn(|token| async move {
                token.cancelled().await;
                "cancelled"
            })
            .unwrap();

        let start = Instant::now();
        let outcome = pool.shutdown(Duration::from_secs(5)).await;

        assert_eq!(outcome, ShutdownOutcome::Cancelled);
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert_eq!(handle.await.unwrap(), "cancelled");
    }

    #[tokio::test]
    async fn test_spawn_after_shutdown_is_rejected() {
        let pool = WorkerPool::new(1);
        pool.shutdown(Duration::from_millis(10)).await;

        let result = pool.spawn(|_token| async {});
        assert!(matches!(result, Err(PoolError::ShutDown)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pool_bounds_concurrency() {
        let pool = WorkerPool::new(2);
        let start = Instant::now();

        let handles: Vec<_> = (0..3)
            .map(|_| {
                pool.spawn(|_| tokio::time::sleep(Duration::from_millis(100)))
                    .unwrap()
            })
            .collect();
        assert_eq!(pool.active_tasks(), 3);

        for handle in handles {
            handle.await.unwrap();
        }

        // Third task waits for a slot.
        assert!(start.elapsed() >= Duration::from_millis(200));
        assert_eq!(pool.active_tasks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_slots_run_in_parallel() {
        let pool = WorkerPool::new(2);
        let start = Instant::now();

        let first = pool
            .spawn(|_| tokio::time::sleep(Duration::from_millis(100)))
            .unwrap();
        let second = pool
            .spawn(|_| tokio::time::sleep(Duration::from_millis(100)))
            .unwrap();

        first.await.unwrap();
        second.await.unwrap();

        assert!(start.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn test_size_is_clamped_to_one_slot_per_provider() {
        assert_eq!(WorkerPool::new(0).size(), WorkerPool::MIN_SIZE);
        assert_eq!(WorkerPool::new(1).size(), 2);
        assert_eq!(WorkerPool::new(4).size(), 4);
    }
}
