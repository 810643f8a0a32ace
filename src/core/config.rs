//! # Scheduler configuration.
//!
//! Provides [`SchedulerConfig`], centralized settings for a [`TaskScheduler`](crate::TaskScheduler).
//!
//! Config can be built in code (`SchedulerConfig::default()` plus field edits) or loaded with
//! [`SchedulerConfig::load`] from a TOML file merged with `CHRONOVISOR_*` environment variables:
//!
//! ```toml
//! enabled = true
//! executor = "thread_pool"        # or "async"
//! thread_pool_max_workers = 8
//! bus_capacity = 1024
//! ```
//!
//! ## Sentinel values
//! - `thread_pool_max_workers = 0` → clamped to 1
//! - `bus_capacity = 0` → clamped to 1

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;
use crate::executor::{AsyncExecutor, ExecutorRef, ThreadPoolExecutor};

/// Environment variable prefix used by [`SchedulerConfig::load`].
pub const ENV_PREFIX: &str = "CHRONOVISOR_";

/// Which built-in executor the builder creates when none is supplied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    /// [`AsyncExecutor`]: tokio tasks on the ambient runtime.
    #[default]
    Async,
    /// [`ThreadPoolExecutor`] with `thread_pool_max_workers` slots.
    ThreadPool,
}

/// Global configuration for the scheduler.
///
/// ## Field semantics
/// - `enabled`: master switch; when `false`, `start()` spawns nothing
/// - `executor`: built-in executor used when the builder was not given one
/// - `thread_pool_max_workers`: pool size for `ExecutorKind::ThreadPool`
/// - `bus_capacity`: event bus ring buffer size
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Whether `start()` spawns loops at all.
    pub enabled: bool,
    /// Built-in executor selection.
    pub executor: ExecutorKind,
    /// Worker slots for the thread pool executor.
    pub thread_pool_max_workers: usize,
    /// Capacity of the event bus broadcast channel.
    ///
    /// Receivers that lag behind more than `bus_capacity` events skip older items.
    pub bus_capacity: usize,
}

impl SchedulerConfig {
    /// Loads config from `path` (a missing file is treated as empty) with
    /// `CHRONOVISOR_*` environment overrides on top.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchedulerError> {
        let cfg = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        Ok(cfg)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns the pool size clamped to a minimum of 1.
    #[inline]
    pub fn max_workers_clamped(&self) -> usize {
        self.thread_pool_max_workers.max(1)
    }

    /// Builds the executor selected by `executor`.
    pub fn build_executor(&self) -> ExecutorRef {
        match self.executor {
            ExecutorKind::Async => std::sync::Arc::new(AsyncExecutor::new()),
            ExecutorKind::ThreadPool => {
                std::sync::Arc::new(ThreadPoolExecutor::new(self.max_workers_clamped()))
            }
        }
    }
}

impl Default for SchedulerConfig {
    /// Default configuration:
    ///
    /// - `enabled = true`
    /// - `executor = async`
    /// - `thread_pool_max_workers = 4`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            enabled: true,
            executor: ExecutorKind::Async,
            thread_pool_max_workers: crate::executor::DEFAULT_MAX_WORKERS,
            bus_capacity: 1024,
        }
    }
}
