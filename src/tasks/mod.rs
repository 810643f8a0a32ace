//! # Tasks and schedulable descriptors.
//!
//! This module provides:
//! - [`Task`] - trait for a named, zero-argument unit of work (sync or async)
//! - [`Invocation`] - what one call of a task produced (ready result or future)
//! - [`TaskFn`] / [`SyncTaskFn`] - closure-backed tasks
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)
//! - [`TaskDescriptor`] / [`Trigger`] - a task bundled with exactly one trigger

mod descriptor;
mod descriptor_builder;
mod task;
mod task_fn;

pub use descriptor::{TaskDescriptor, Trigger};
pub use descriptor_builder::TaskDescriptorBuilder;
pub use task::{BoxTaskFuture, Invocation, Task, TaskRef};
pub use task_fn::{SyncTaskFn, TaskFn};
