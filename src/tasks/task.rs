//! # Task abstraction and the invocation adapter type.
//!
//! A [`Task`] is a zero-argument unit of work with a stable name. Calling
//! [`Task::invoke`] produces an [`Invocation`]:
//!
//! - [`Invocation::Ready`] the callable was synchronous and has already finished;
//! - [`Invocation::Pending`] the callable was asynchronous; the future must be awaited.
//!
//! Executors and loops never branch on the callable's shape themselves: the runner
//! normalizes both variants into one `Result<(), TaskError>` (see `core::runner`).
//! The common handle type is [`TaskRef`], an `Arc<dyn Task>` shared across loops.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::TaskError;

/// Boxed future returned by asynchronous callables.
pub type BoxTaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

/// Shared reference to a task.
pub type TaskRef = Arc<dyn Task>;

/// Outcome of calling a task once.
pub enum Invocation {
    /// Synchronous callable: the result is already known.
    Ready(Result<(), TaskError>),
    /// Asynchronous callable: completes when the future resolves.
    Pending(BoxTaskFuture),
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invocation::Ready(res) => f.debug_tuple("Ready").field(res).finish(),
            Invocation::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// # Schedulable unit of work.
///
/// # Example
/// ```
/// use chronovisor::{Invocation, Task, TaskError};
///
/// struct Heartbeat;
///
/// impl Task for Heartbeat {
///     fn name(&self) -> &str { "heartbeat" }
///
///     fn invoke(&self) -> Invocation {
///         Invocation::Pending(Box::pin(async {
///             // ping something...
///             Ok::<(), TaskError>(())
///         }))
///     }
/// }
/// ```
pub trait Task: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Calls the underlying callable once.
    fn invoke(&self) -> Invocation;

    /// True when `invoke` does blocking work on the calling thread.
    ///
    /// [`ThreadPoolExecutor`](crate::ThreadPoolExecutor) routes such tasks to its worker pool.
    fn is_blocking(&self) -> bool {
        false
    }
}
