//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the scheduler, task loops
//! and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `TaskScheduler`, `TaskLoop`, `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the scheduler's listener (fans out to `SubscriberSet`) and any
//!   receiver obtained from [`TaskScheduler::bus`](crate::TaskScheduler::bus).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
