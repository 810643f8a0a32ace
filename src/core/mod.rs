//! Scheduling core: orchestration and lifecycle.
//!
//! The public API from this module is [`TaskScheduler`] (with its builder, state and
//! configuration). Internal modules:
//! - [`runner`]: runs one invocation, normalizing sync/async callables and panics;
//! - [`loops`]: one loop per descriptor (cron, fixed-rate, fixed-delay);
//! - [`scheduler`]: spawns loops, fans events out to subscribers, drains on stop;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod builder;
mod config;
mod loops;
pub(crate) mod runner;
mod scheduler;
mod shutdown;

pub use builder::SchedulerBuilder;
pub use config::{ENV_PREFIX, ExecutorKind, SchedulerConfig};
pub use scheduler::{SchedulerState, TaskScheduler};
