use async_trait::async_trait;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use crate::core::runner::run_once;
use crate::error::ExecutorError;
use crate::executor::{TaskExecutor, TaskHandle};
use crate::tasks::TaskRef;

/// Runs every unit as a tokio task on the ambient runtime.
///
/// Synchronous callables run inline inside their tokio task, so long blocking work
/// belongs on [`ThreadPoolExecutor`](crate::ThreadPoolExecutor) instead.
#[derive(Debug, Default)]
pub struct AsyncExecutor {
    tracker: TaskTracker,
}

impl AsyncExecutor {
    pub const NAME: &'static str = "async";

    pub fn new() -> Self {
        Self {
            tracker: TaskTracker::new(),
        }
    }
}

#[async_trait]
impl TaskExecutor for AsyncExecutor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn submit(&self, task: TaskRef) -> Result<TaskHandle, ExecutorError> {
        if self.tracker.is_closed() {
            return Err(ExecutorError::Stopped {
                executor: Self::NAME,
            });
        }

        let name = task.name().to_string();
        let join = self.tracker.spawn(async move {
            let res = run_once(task.as_ref()).await;
            if let Err(err) = &res {
                warn!(executor = Self::NAME, task = task.name(), error = %err, "task invocation failed");
            }
            res
        });
        Ok(TaskHandle::new(name, join))
    }

    async fn start(&self) {
        debug!(executor = Self::NAME, "executor ready");
    }

    async fn stop(&self) {
        self.tracker.close();
        debug!(executor = Self::NAME, live = self.tracker.len(), "draining executor");
        self.tracker.wait().await;
    }

    fn live(&self) -> usize {
        self.tracker.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SyncTaskFn, TaskError, TaskFn};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn failures_surface_through_the_handle() {
        let exec = AsyncExecutor::new();
        let handle = exec
            .submit(TaskFn::arc("bad", || async { Err::<(), _>(TaskError::from("nope")) }))
            .unwrap();
        assert_eq!(handle.name(), "bad");
        assert_eq!(handle.wait().await, Err(TaskError::from("nope")));

        let handle = exec
            .submit(SyncTaskFn::arc("boom", || -> Result<(), TaskError> {
                panic!("kaboom")
            }))
            .unwrap();
        assert_eq!(
            handle.wait().await,
            Err(TaskError::Panicked {
                message: "kaboom".into()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stop_drains_in_flight_units() {
        let exec = AsyncExecutor::new();
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let done = done.clone();
            let _detached = exec
                .submit(TaskFn::arc("slow", move || {
                    let done = done.clone();
                    async move {
                        tokio::time::sleep(Duration::from_secs(2)).await;
                        done.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }
                }))
                .unwrap();
        }
        assert_eq!(exec.live(), 5);

        exec.stop().await;
        assert_eq!(done.load(Ordering::SeqCst), 5);
        assert_eq!(exec.live(), 0);
    }

    #[tokio::test]
    async fn submissions_after_stop_are_rejected() {
        let exec = AsyncExecutor::new();
        exec.stop().await;
        exec.stop().await;

        let err = exec
            .submit(TaskFn::arc("late", || async { Ok::<(), TaskError>(()) }))
            .unwrap_err();
        assert_eq!(err, ExecutorError::Stopped { executor: "async" });
    }
}
