//! # Execution backends.
//!
//! A [`TaskExecutor`] answers one question for the scheduler: "run this unit of work
//! now, track it, and let me wait for all of it on shutdown".
//!
//! ```text
//! TaskLoop ── submit(TaskRef) ──► TaskExecutor ──► TaskHandle
//!                                   │
//!                                   ├─ AsyncExecutor      tokio task per unit
//!                                   └─ ThreadPoolExecutor bounded spawn_blocking pool
//!
//! TaskScheduler::stop() ──► executor.stop() ──► waits until live() == 0
//! ```
//!
//! ## Rules
//! - `submit` never blocks and never surfaces the unit's own failure.
//! - `stop` is idempotent and returns only once every submitted unit has finished.
//! - After `stop`, `submit` fails with [`ExecutorError::Stopped`](crate::ExecutorError::Stopped).

mod async_executor;
mod handle;
mod thread_pool;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ExecutorError;
use crate::tasks::TaskRef;

pub use async_executor::AsyncExecutor;
pub use handle::TaskHandle;
pub use thread_pool::{DEFAULT_MAX_WORKERS, ThreadPoolExecutor};

/// Shared reference to an executor.
pub type ExecutorRef = Arc<dyn TaskExecutor>;

/// Port between the scheduler and whatever actually runs the work.
///
/// # Example
/// ```rust
/// use chronovisor::{AsyncExecutor, TaskError, TaskExecutor, TaskFn};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let exec = AsyncExecutor::new();
///     exec.start().await;
///
///     let handle = exec
///         .submit(TaskFn::arc("hello", || async { Ok::<(), TaskError>(()) }))
///         .unwrap();
///     assert!(handle.wait().await.is_ok());
///
///     exec.stop().await;
///     assert_eq!(exec.live(), 0);
/// }
/// ```
#[async_trait]
pub trait TaskExecutor: Send + Sync + 'static {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Schedules the unit for immediate execution.
    fn submit(&self, task: TaskRef) -> Result<TaskHandle, ExecutorError>;

    /// Readiness hook called by the scheduler before any loop runs. Idempotent.
    async fn start(&self) {}

    /// Stops accepting work and waits until every submitted unit has finished.
    async fn stop(&self);

    /// Number of units currently in flight.
    fn live(&self) -> usize;
}
