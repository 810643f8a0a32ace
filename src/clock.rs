//! # Wall-clock sources for cron loops.
//!
//! Cron loops need calendar time ("what minute is it?") while every sleep goes through
//! `tokio::time`. [`Clock`] decouples the two:
//!
//! - [`SystemClock`] reads `chrono::Utc::now()` (default).
//! - [`MonotonicClock`] anchors a fixed wall instant to a `tokio::time::Instant` and advances
//!   with the tokio clock. Under `tokio::time::pause()` this makes cron loops fully
//!   deterministic, and in production it ignores wall-clock steps (NTP adjustments).

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

/// Source of the current calendar time.
pub trait Clock: Send + Sync + 'static {
    /// Current UTC instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Calendar time derived from the tokio clock.
///
/// `now() = anchor + (tokio::time::Instant::now() - started)`.
#[derive(Clone, Copy)]
pub struct MonotonicClock {
    anchor: DateTime<Utc>,
    started: Instant,
}

impl MonotonicClock {
    /// Anchors `wall` to the current tokio instant.
    pub fn anchored_at(wall: DateTime<Utc>) -> Self {
        Self {
            anchor: wall,
            started: Instant::now(),
        }
    }

    /// Anchors the current system time to the current tokio instant.
    pub fn from_system() -> Self {
        Self::anchored_at(Utc::now())
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> DateTime<Utc> {
        TimeDelta::from_std(self.started.elapsed())
            .ok()
            .and_then(|elapsed| self.anchor.checked_add_signed(elapsed))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl fmt::Debug for MonotonicClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonotonicClock")
            .field("anchor", &self.anchor)
            .finish_non_exhaustive()
    }
}
