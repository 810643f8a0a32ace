//! # chronovisor
//!
//! **Chronovisor** is a periodic task scheduling engine for Rust.
//!
//! It computes fire times (cron-based and interval-based), runs one independent loop per
//! scheduled task, and delegates the actual invocation to a pluggable executor. The crate is
//! a building block: whatever discovers scheduled work only has to produce
//! [`TaskDescriptor`]s.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌────────────────┐   ┌────────────────┐   ┌────────────────┐
//!     │ TaskDescriptor │   │ TaskDescriptor │   │ TaskDescriptor │
//!     │  cron(expr)    │   │ fixed_rate(I)  │   │ fixed_delay(I) │
//!     └───────┬────────┘   └───────┬────────┘   └───────┬────────┘
//!             ▼                    ▼                    ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TaskScheduler                                                    │
//! │  - registry of descriptors (discover)                             │
//! │  - root CancellationToken (one child per loop)                    │
//! │  - Bus + SubscriberSet (runtime events)                           │
//! └───────┬────────────────────┬────────────────────┬─────────────────┘
//!         ▼                    ▼                    ▼
//!     ┌──────────┐         ┌──────────┐         ┌──────────┐
//!     │ TaskLoop │         │ TaskLoop │         │ TaskLoop │
//!     │ (cron)   │         │ (rate)   │         │ (delay)  │
//!     └────┬─────┘         └────┬─────┘         └────┬─────┘
//!          │ submit             │ submit             │ submit + await
//!          ▼                    ▼                    ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TaskExecutor: AsyncExecutor | ThreadPoolExecutor                 │
//! │  (tracks live units; stop() drains them)                          │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Created ──start()──► Started ──stop()──► Stopped
//!
//! stop():
//!   cancel loops ─► join loops ─► executor.stop() (drain) ─► SchedulerStopped
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                                |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------------|
//! | **Cron**          | Five-field expressions, next/previous fire time queries.      | [`CronExpression`]                                |
//! | **Tasks**         | Sync or async callables, bundled with exactly one trigger.    | [`Task`], [`TaskFn`], [`SyncTaskFn`], [`TaskDescriptor`] |
//! | **Executors**     | Pluggable backends with drain-on-stop.                        | [`TaskExecutor`], [`AsyncExecutor`], [`ThreadPoolExecutor`] |
//! | **Scheduling**    | One loop per descriptor, aggregate start/stop.                | [`TaskScheduler`]                                 |
//! | **Events**        | Runtime events fanned out to subscribers.                     | [`Event`], [`Subscribe`], [`LogWriter`]           |
//! | **Errors**        | Typed errors for configuration, executors and tasks.          | [`SchedulerError`], [`ExecutorError`], [`TaskError`] |
//! | **Configuration** | TOML file plus `CHRONOVISOR_*` env overrides.                 | [`SchedulerConfig`]                               |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use chronovisor::{
//!     LogWriter, SchedulerConfig, SyncTaskFn, TaskDescriptor, TaskError, TaskFn, TaskScheduler,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let refresh = TaskFn::arc("refresh-cache", || async {
//!         // await some I/O...
//!         Ok::<(), TaskError>(())
//!     });
//!     let compact = SyncTaskFn::arc("compact", || -> Result<(), TaskError> { Ok(()) });
//!
//!     let scheduler = TaskScheduler::builder(SchedulerConfig::default())
//!         .with_subscribers(vec![Arc::new(LogWriter::new())])
//!         .build();
//!
//!     scheduler.discover(vec![
//!         TaskDescriptor::fixed_delay(refresh, Duration::from_millis(10))?
//!             .with_initial_delay(Duration::from_millis(5)),
//!         TaskDescriptor::builder(compact).cron("30 2 * * MON-FRI").build()?,
//!     ]);
//!
//!     scheduler.start().await?;
//!     tokio::time::sleep(Duration::from_millis(50)).await;
//!     scheduler.stop().await?;
//!     Ok(())
//! }
//! ```
mod clock;
mod core;
mod cron;
mod error;
mod events;
mod executor;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use clock::{Clock, MonotonicClock, SystemClock};
pub use crate::core::{
    ENV_PREFIX, ExecutorKind, SchedulerBuilder, SchedulerConfig, SchedulerState, TaskScheduler,
};
pub use cron::CronExpression;
pub use error::{ExecutorError, SchedulerError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use executor::{
    AsyncExecutor, DEFAULT_MAX_WORKERS, ExecutorRef, TaskExecutor, TaskHandle, ThreadPoolExecutor,
};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use tasks::{
    BoxTaskFuture, Invocation, SyncTaskFn, Task, TaskDescriptor, TaskDescriptorBuilder, TaskFn,
    TaskRef, Trigger,
};
