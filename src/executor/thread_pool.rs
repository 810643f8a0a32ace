use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use crate::core::runner::{run_blocking, run_once};
use crate::error::{ExecutorError, TaskError};
use crate::executor::{TaskExecutor, TaskHandle};
use crate::tasks::TaskRef;

/// Default number of worker slots.
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Runs blocking units on a bounded pool of `spawn_blocking` threads.
///
/// ```text
/// submit(task)
///   ├─ task.is_blocking() ─► acquire permit ─► spawn_blocking(run_blocking) ─► release
///   └─ otherwise          ─► tokio task (run_once)
/// ```
///
/// At most `max_workers` blocking units run at once; the rest wait for a permit
/// while already counted as live.
#[derive(Debug)]
pub struct ThreadPoolExecutor {
    tracker: TaskTracker,
    permits: Arc<Semaphore>,
    max_workers: usize,
}

impl ThreadPoolExecutor {
    pub const NAME: &'static str = "thread_pool";

    /// Creates a pool with `max_workers` slots (clamped to at least 1).
    pub fn new(max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            tracker: TaskTracker::new(),
            permits: Arc::new(Semaphore::new(max_workers)),
            max_workers,
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Runs an arbitrary blocking closure on the pool.
    ///
    /// The unit is tracked like any submitted task, so `stop()` waits for it too.
    pub fn submit_blocking<F, R>(
        &self,
        name: impl Into<Arc<str>>,
        f: F,
    ) -> Result<TaskHandle<R>, ExecutorError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.ensure_open()?;

        let name: Arc<str> = name.into();
        let label = Arc::clone(&name);
        let permits = Arc::clone(&self.permits);
        let join = self.tracker.spawn(async move {
            let res = on_pool(permits, f).await;
            if let Err(err) = &res {
                warn!(executor = Self::NAME, task = %label, error = %err, "blocking unit failed");
            }
            res
        });
        Ok(TaskHandle::new(name, join))
    }

    fn ensure_open(&self) -> Result<(), ExecutorError> {
        if self.tracker.is_closed() {
            Err(ExecutorError::Stopped {
                executor: Self::NAME,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for ThreadPoolExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORKERS)
    }
}

#[async_trait]
impl TaskExecutor for ThreadPoolExecutor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn submit(&self, task: TaskRef) -> Result<TaskHandle, ExecutorError> {
        self.ensure_open()?;

        let name = task.name().to_string();
        let join = if task.is_blocking() {
            let permits = Arc::clone(&self.permits);
            self.tracker.spawn(async move {
                let rt = Handle::current();
                let unit = Arc::clone(&task);
                let res = on_pool(permits, move || run_blocking(unit.as_ref(), &rt))
                    .await
                    .and_then(|inner| inner);
                report(task.name(), res)
            })
        } else {
            self.tracker
                .spawn(async move { report(task.name(), run_once(task.as_ref()).await) })
        };
        Ok(TaskHandle::new(name, join))
    }

    async fn start(&self) {
        debug!(executor = Self::NAME, max_workers = self.max_workers, "executor ready");
    }

    async fn stop(&self) {
        self.tracker.close();
        debug!(executor = Self::NAME, live = self.tracker.len(), "draining executor");
        self.tracker.wait().await;
        self.permits.close();
    }

    fn live(&self) -> usize {
        self.tracker.len()
    }
}

fn report(task: &str, res: Result<(), TaskError>) -> Result<(), TaskError> {
    if let Err(err) = &res {
        warn!(executor = ThreadPoolExecutor::NAME, task, error = %err, "task invocation failed");
    }
    res
}

/// Waits for a worker slot, then runs `f` on the blocking pool.
async fn on_pool<F, R>(permits: Arc<Semaphore>, f: F) -> Result<R, TaskError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let _permit = permits
        .acquire_owned()
        .await
        .map_err(|_closed| TaskError::Canceled)?;
    tokio::task::spawn_blocking(f)
        .await
        .map_err(TaskError::from_join)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SyncTaskFn, TaskFn};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn max_workers_is_clamped() {
        assert_eq!(ThreadPoolExecutor::new(0).max_workers(), 1);
        assert_eq!(ThreadPoolExecutor::default().max_workers(), 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn submit_blocking_returns_the_value() {
        let pool = ThreadPoolExecutor::new(2);
        let handle = pool.submit_blocking("sum", || (1..=10).sum::<u32>()).unwrap();
        assert_eq!(handle.wait().await, Ok(55));
        pool.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn pool_never_exceeds_max_workers() {
        let pool = ThreadPoolExecutor::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..6 {
            let running = running.clone();
            let peak = peak.clone();
            handles.push(
                pool.submit(SyncTaskFn::arc("block", move || -> Result<(), TaskError> {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(30));
                    running.fetch_sub(1, Ordering::SeqCst);
                    Ok(())
                }))
                .unwrap(),
            );
        }
        for h in handles {
            assert!(h.wait().await.is_ok());
        }
        assert!(peak.load(Ordering::SeqCst) <= 2);
        pool.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stop_waits_for_blocking_and_async_units() {
        let pool = ThreadPoolExecutor::new(1);
        let done = Arc::new(AtomicUsize::new(0));

        let d = done.clone();
        let _blocking = pool
            .submit(SyncTaskFn::arc("sync", move || -> Result<(), TaskError> {
                std::thread::sleep(Duration::from_millis(50));
                d.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }))
            .unwrap();
        let d = done.clone();
        let _async = pool
            .submit(TaskFn::arc("async", move || {
                let d = d.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    d.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }))
            .unwrap();

        pool.stop().await;
        assert_eq!(done.load(Ordering::SeqCst), 2);
        assert_eq!(pool.live(), 0);
        assert!(pool.submit_blocking("late", || ()).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn blocking_panic_is_reported() {
        let pool = ThreadPoolExecutor::default();
        let handle = pool
            .submit(SyncTaskFn::arc("boom", || -> Result<(), TaskError> {
                panic!("worker exploded")
            }))
            .unwrap();
        assert_eq!(
            handle.wait().await,
            Err(TaskError::Panicked {
                message: "worker exploded".into()
            })
        );
        pool.stop().await;
    }
}
