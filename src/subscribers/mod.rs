//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out and the
//! built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! TaskLoop ── publish(Event) ──► Bus ──► scheduler listener ──► SubscriberSet::emit
//!                                                                 ├──► LogWriter
//!                                                                 ├──► Metrics
//!                                                                 └──► Custom ...
//! ```
//!
//! The scheduler's listener ends after forwarding `SchedulerStopped`, then shuts the set
//! down, so every subscriber has seen every event by the time `stop()` returns.

mod log;
mod subscribe;
mod subscriber_set;

pub use log::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
