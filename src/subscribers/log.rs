//! # LogWriter: renders events as `tracing` records.
//!
//! A minimal subscriber that turns every [`Event`] into one `tracing` record with
//! structured fields. Successful work logs at `debug`, lifecycle at `info`,
//! failures and dropped events at `warn`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO  chronovisor: scheduler-started loops=2
//! INFO  chronovisor: loop-started task="sweep" trigger=fixed_rate(10s)
//! DEBUG chronovisor: tick-scheduled task="sweep" tick=1 delay_ms=3000
//! DEBUG chronovisor: starting task="sweep" tick=1
//! WARN  chronovisor: failed task="sweep" tick=1 reason="error: connection refused"
//! INFO  chronovisor: scheduler-stopped
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let label = e.kind.as_label();
        let task = e.task.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::SchedulerStarted | EventKind::ExecutorDrained | EventKind::SchedulerStopped => {
                info!(target: "chronovisor", seq = e.seq, "{label} {reason}");
            }
            EventKind::LoopStarted => {
                info!(target: "chronovisor", seq = e.seq, task, trigger = reason, "{label}");
            }
            EventKind::LoopStopped => {
                info!(target: "chronovisor", seq = e.seq, task, ticks = e.tick, reason, "{label}");
            }
            EventKind::TickScheduled => {
                debug!(target: "chronovisor", seq = e.seq, task, tick = e.tick, delay_ms = e.delay_ms, "{label}");
            }
            EventKind::TaskStarting | EventKind::TaskCompleted => {
                debug!(target: "chronovisor", seq = e.seq, task, tick = e.tick, "{label}");
            }
            EventKind::TaskFailed | EventKind::SubmitRejected => {
                warn!(target: "chronovisor", seq = e.seq, task, tick = e.tick, reason, "{label}");
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                warn!(target: "chronovisor", seq = e.seq, subscriber = task, reason, "{label}");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
