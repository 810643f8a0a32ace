//! # Run a single invocation of a task.
//!
//! Normalizes the two shapes a callable can take into one `Result<(), TaskError>`:
//!
//! ```text
//! task.invoke()
//!   ├─ panics                 → Err(Panicked)
//!   ├─ Invocation::Ready(r)   → r
//!   └─ Invocation::Pending(f) → f.await (panic → Err(Panicked))
//! ```
//!
//! [`Observed`] wraps a task for one tick and publishes `TaskStarting` followed by
//! exactly one of `TaskCompleted` / `TaskFailed`, whichever executor runs it.
//!
//! ## Rules
//! - Panics never escape: they are converted at the invocation boundary
//! - Exactly **one** terminal event per observed invocation
//! - `run_blocking` must only be called from a blocking-pool thread

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use tokio::runtime::Handle;

use crate::{
    error::TaskError,
    events::{Bus, Event, EventKind},
    tasks::{BoxTaskFuture, Invocation, Task, TaskRef},
};

/// Calls `task` once and awaits it if needed.
pub(crate) async fn run_once(task: &dyn Task) -> Result<(), TaskError> {
    match invoke_guarded(task) {
        Ok(Invocation::Ready(res)) => res,
        Ok(Invocation::Pending(fut)) => await_guarded(fut).await,
        Err(err) => Err(err),
    }
}

/// Calls `task` once on the current (blocking) thread, driving async callables to
/// completion on `rt`.
pub(crate) fn run_blocking(task: &dyn Task, rt: &Handle) -> Result<(), TaskError> {
    match invoke_guarded(task) {
        Ok(Invocation::Ready(res)) => res,
        Ok(Invocation::Pending(fut)) => rt.block_on(await_guarded(fut)),
        Err(err) => Err(err),
    }
}

fn invoke_guarded(task: &dyn Task) -> Result<Invocation, TaskError> {
    panic::catch_unwind(AssertUnwindSafe(|| task.invoke())).map_err(TaskError::from_panic)
}

async fn await_guarded(fut: BoxTaskFuture) -> Result<(), TaskError> {
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(res) => res,
        Err(payload) => Err(TaskError::from_panic(payload)),
    }
}

/// One tick of a scheduled task, reporting its outcome to the bus.
pub(crate) struct Observed {
    inner: TaskRef,
    bus: Bus,
    tick: u64,
}

impl Observed {
    pub(crate) fn wrap(inner: TaskRef, bus: Bus, tick: u64) -> TaskRef {
        Arc::new(Self { inner, bus, tick })
    }
}

impl Task for Observed {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_blocking(&self) -> bool {
        self.inner.is_blocking()
    }

    fn invoke(&self) -> Invocation {
        publish(&self.bus, EventKind::TaskStarting, self.name(), self.tick, None);

        match invoke_guarded(self.inner.as_ref()) {
            Ok(Invocation::Pending(fut)) => {
                let bus = self.bus.clone();
                let name: Arc<str> = Arc::from(self.name());
                let tick = self.tick;
                Invocation::Pending(Box::pin(async move {
                    let res = await_guarded(fut).await;
                    publish_outcome(&bus, &name, tick, &res);
                    res
                }))
            }
            Ok(Invocation::Ready(res)) => {
                publish_outcome(&self.bus, self.name(), self.tick, &res);
                Invocation::Ready(res)
            }
            Err(err) => {
                let res = Err(err);
                publish_outcome(&self.bus, self.name(), self.tick, &res);
                Invocation::Ready(res)
            }
        }
    }
}

fn publish_outcome(bus: &Bus, name: &str, tick: u64, res: &Result<(), TaskError>) {
    match res {
        Ok(()) => publish(bus, EventKind::TaskCompleted, name, tick, None),
        Err(err) => publish(bus, EventKind::TaskFailed, name, tick, Some(err.as_message())),
    }
}

fn publish(bus: &Bus, kind: EventKind, name: &str, tick: u64, reason: Option<String>) {
    let ev = Event::new(kind).with_task(name).with_tick(tick);
    bus.publish(match reason {
        Some(reason) => ev.with_reason(reason),
        None => ev,
    });
}
