//! # Function-backed tasks
//!
//! [`TaskFn`] wraps an async closure `F: Fn() -> Fut`, producing a fresh future per
//! invocation. [`SyncTaskFn`] wraps a plain closure `F: Fn() -> Result<(), TaskError>`
//! and reports itself as blocking.
//!
//! Neither keeps hidden state between invocations; share state explicitly with
//! `Arc<...>` captured by the closure.
//!
//! ## Example
//! ```rust
//! use chronovisor::{SyncTaskFn, Task, TaskError, TaskFn, TaskRef};
//!
//! let fetch: TaskRef = TaskFn::arc("fetch", || async {
//!     // await some I/O...
//!     Ok::<_, TaskError>(())
//! });
//! let compact: TaskRef = SyncTaskFn::arc("compact", || -> Result<(), TaskError> {
//!     // CPU-bound work...
//!     Ok(())
//! });
//!
//! assert_eq!(fetch.name(), "fetch");
//! assert!(compact.is_blocking());
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use crate::error::TaskError;
use crate::tasks::task::{Invocation, Task};

/// Async-closure task.
#[derive(Debug)]
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`](crate::TaskRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut> Task for TaskFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self) -> Invocation {
        Invocation::Pending(Box::pin((self.f)()))
    }
}

/// Synchronous-closure task.
#[derive(Debug)]
pub struct SyncTaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> SyncTaskFn<F> {
    /// Creates a new synchronous task.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> Task for SyncTaskFn<F>
where
    F: Fn() -> Result<(), TaskError> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self) -> Invocation {
        Invocation::Ready((self.f)())
    }

    fn is_blocking(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn async_task_yields_fresh_future_per_invocation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let task = TaskFn::new("counter", move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        for _ in 0..3 {
            match task.invoke() {
                Invocation::Pending(fut) => fut.await.unwrap(),
                Invocation::Ready(_) => panic!("async task must be pending"),
            }
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(!task.is_blocking());
    }

    #[test]
    fn sync_task_is_ready_and_blocking() {
        let task = SyncTaskFn::new("fails", || Err::<(), _>(TaskError::from("nope")));
        assert!(task.is_blocking());
        match task.invoke() {
            Invocation::Ready(Err(e)) => assert_eq!(e.as_label(), "task_failed"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
