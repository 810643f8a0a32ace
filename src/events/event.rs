//! # Runtime events emitted by the scheduler, its loops and subscriber workers.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Scheduler events**: lifecycle of the whole engine (started, drained, stopped)
//! - **Loop events**: lifecycle of one per-descriptor loop and its tick planning
//! - **Task events**: submission and outcome of each invocation
//! - **Subscriber events**: delivery problems inside the fan-out set
//!
//! The [`Event`] struct carries additional metadata such as timestamps, task name,
//! tick numbers, delays and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use chronovisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_task("sweep")
//!     .with_tick(3)
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task.as_deref(), Some("sweep"));
//! assert_eq!(ev.tick, Some(3));
//!
//! let planned = Event::new(EventKind::TickScheduled).with_delay(Duration::from_millis(1500));
//! assert_eq!(planned.delay_ms, Some(1500));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Scheduler events ===
    /// `start()` spawned the loops.
    ///
    /// Sets:
    /// - `reason`: number of loops, e.g. `"loops=3"`
    SchedulerStarted,

    /// The executor finished draining in-flight units during `stop()`.
    ExecutorDrained,

    /// `stop()` completed. Always the last event a scheduler publishes.
    SchedulerStopped,

    // === Loop events ===
    /// A per-descriptor loop began running.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `reason`: trigger rendering, e.g. `"cron(*/5 * * * *)"`
    LoopStarted,

    /// A per-descriptor loop exited.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `tick`: number of submissions made
    /// - `reason`: `"cancelled"` or `"rejected"` or `"exhausted"`
    LoopStopped,

    /// The loop computed its next sleep.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `tick`: number of the upcoming tick (1-based)
    /// - `delay_ms`: time until the tick fires (ms)
    TickScheduled,

    // === Task events ===
    /// A unit began running inside the executor.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `tick`: tick number (1-based, per loop)
    TaskStarting,

    /// A unit finished successfully.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `tick`: tick number
    TaskCompleted,

    /// A unit returned an error or panicked.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `tick`: tick number
    /// - `reason`: failure message
    TaskFailed,

    /// The executor refused a submission (it was already stopped).
    ///
    /// Sets:
    /// - `task`: task name
    /// - `tick`: tick number
    /// - `reason`: executor error
    SubmitRejected,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,
}

impl EventKind {
    /// Short stable label (kebab-case) used by [`LogWriter`](crate::LogWriter).
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::SchedulerStarted => "scheduler-started",
            EventKind::ExecutorDrained => "executor-drained",
            EventKind::SchedulerStopped => "scheduler-stopped",
            EventKind::LoopStarted => "loop-started",
            EventKind::LoopStopped => "loop-stopped",
            EventKind::TickScheduled => "tick-scheduled",
            EventKind::TaskStarting => "starting",
            EventKind::TaskCompleted => "completed",
            EventKind::TaskFailed => "failed",
            EventKind::SubmitRejected => "submit-rejected",
            EventKind::SubscriberPanicked => "subscriber-panicked",
            EventKind::SubscriberOverflow => "subscriber-overflow",
        }
    }
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the task (or subscriber), if applicable.
    pub task: Option<Arc<str>>,
    /// Tick number within one loop (starting from 1).
    pub tick: Option<u64>,
    /// Planned delay in milliseconds (compact).
    pub delay_ms: Option<u64>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            tick: None,
            delay_ms: None,
            reason: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a tick number.
    #[inline]
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::LoopStarted);
        let b = Event::new(EventKind::LoopStarted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn delay_is_stored_in_millis() {
        let ev = Event::new(EventKind::TickScheduled).with_delay(Duration::from_secs(3));
        assert_eq!(ev.delay_ms, Some(3000));
    }

    #[test]
    fn overflow_helper_sets_subscriber_and_reason() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert!(ev.is_subscriber_overflow());
        assert_eq!(ev.task.as_deref(), Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("full"));
    }
}
