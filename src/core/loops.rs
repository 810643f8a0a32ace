//! # TaskLoop: one execution loop per descriptor.
//!
//! A loop turns its descriptor's [`Trigger`] into a sequence of submissions to the
//! executor. It never runs task code itself.
//!
//! ## Loop shapes
//! ```text
//! Cron:
//!   loop {
//!     next = expr.next_fire_time(max(now, last_fire))
//!     publish TickScheduled ─► sleep(next - now) (cancellable)
//!     submit (not awaited)
//!   }
//!
//! FixedRate:
//!   interval_at(now + initial_delay, every), MissedTickBehavior::Skip
//!   loop { tick (cancellable) ─► submit (not awaited) }
//!
//! FixedDelay:
//!   sleep(initial_delay) (cancellable)
//!   loop { submit ─► await unit (cancellable) ─► sleep(every) (cancellable) }
//! ```
//!
//! ## Rules
//! - A failing unit never ends the loop; only cancellation, a rejected submission or an
//!   exhausted cron search do.
//! - A cancelled loop never submits again, even when its sleep and the cancellation
//!   become ready together.
//! - Cancelling a fixed-delay loop while it awaits its unit stops the wait, not the unit.
//! - Tick numbers start at 1 and grow by one per submission.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::{
    select,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    clock::Clock,
    core::runner::Observed,
    cron::CronExpression,
    events::{Bus, Event, EventKind},
    executor::{ExecutorRef, TaskHandle},
    tasks::{TaskDescriptor, Trigger},
};

/// Why a loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopExit {
    /// The scheduler cancelled the loop.
    Cancelled,
    /// The executor refused a submission.
    Rejected,
    /// The cron expression has no further fire time within chrono's range.
    Exhausted,
}

impl LoopExit {
    pub(crate) fn as_label(&self) -> &'static str {
        match self {
            LoopExit::Cancelled => "cancelled",
            LoopExit::Rejected => "rejected",
            LoopExit::Exhausted => "exhausted",
        }
    }
}

/// Drives one descriptor until cancelled.
pub(crate) struct TaskLoop {
    descriptor: TaskDescriptor,
    executor: ExecutorRef,
    bus: Bus,
    clock: Arc<dyn Clock>,
    ticks: u64,
}

impl TaskLoop {
    pub(crate) fn new(
        descriptor: TaskDescriptor,
        executor: ExecutorRef,
        bus: Bus,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            descriptor,
            executor,
            bus,
            clock,
            ticks: 0,
        }
    }

    /// Runs the loop until `token` is cancelled or the loop cannot continue.
    pub(crate) async fn run(mut self, token: CancellationToken) -> LoopExit {
        self.bus.publish(
            Event::new(EventKind::LoopStarted)
                .with_task(self.descriptor.name())
                .with_reason(self.descriptor.trigger().to_string()),
        );

        let exit = match self.descriptor.trigger().clone() {
            Trigger::Cron(expr) => self.run_cron(&expr, &token).await,
            Trigger::FixedRate(every) => self.run_fixed_rate(every, &token).await,
            Trigger::FixedDelay(every) => self.run_fixed_delay(every, &token).await,
        };

        debug!(task = self.descriptor.name(), ticks = self.ticks, exit = exit.as_label(), "loop stopped");
        self.bus.publish(
            Event::new(EventKind::LoopStopped)
                .with_task(self.descriptor.name())
                .with_tick(self.ticks)
                .with_reason(exit.as_label()),
        );
        exit
    }

    async fn run_cron(&mut self, expr: &CronExpression, token: &CancellationToken) -> LoopExit {
        let mut last_fire: Option<DateTime<Utc>> = None;

        loop {
            let now = self.clock.now();
            let base = last_fire.map_or(now, |last| last.max(now));
            let Some(next) = expr.next_fire_time(base) else {
                warn!(task = self.descriptor.name(), cron = %expr, "cron expression has no further fire time");
                return LoopExit::Exhausted;
            };

            let delay = (next - now).to_std().unwrap_or(Duration::ZERO);
            self.announce(delay);
            if !sleep_or_cancel(delay, token).await {
                return LoopExit::Cancelled;
            }

            last_fire = Some(next);
            if self.submit().is_none() {
                return LoopExit::Rejected;
            }
        }
    }

    async fn run_fixed_rate(&mut self, every: Duration, token: &CancellationToken) -> LoopExit {
        let initial = self.descriptor.effective_initial_delay().unwrap_or(Duration::ZERO);
        let mut ticker = time::interval_at(Instant::now() + initial, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut planned = initial;
        loop {
            self.announce(planned);
            select! {
                biased;
                _ = token.cancelled() => return LoopExit::Cancelled,
                _ = ticker.tick() => {}
            }
            planned = every;

            if self.submit().is_none() {
                return LoopExit::Rejected;
            }
        }
    }

    async fn run_fixed_delay(&mut self, every: Duration, token: &CancellationToken) -> LoopExit {
        if let Some(initial) = self.descriptor.effective_initial_delay() {
            self.announce(initial);
            if !sleep_or_cancel(initial, token).await {
                return LoopExit::Cancelled;
            }
        }

        loop {
            let Some(handle) = self.submit() else {
                return LoopExit::Rejected;
            };
            select! {
                biased;
                _ = token.cancelled() => return LoopExit::Cancelled,
                _ = handle.wait() => {}
            }

            self.announce(every);
            if !sleep_or_cancel(every, token).await {
                return LoopExit::Cancelled;
            }
        }
    }

    fn announce(&self, delay: Duration) {
        self.bus.publish(
            Event::new(EventKind::TickScheduled)
                .with_task(self.descriptor.name())
                .with_tick(self.ticks + 1)
                .with_delay(delay),
        );
    }

    /// Hands the next tick to the executor. `None` when the executor refused it.
    fn submit(&mut self) -> Option<TaskHandle> {
        self.ticks += 1;
        let unit = Observed::wrap(
            Arc::clone(self.descriptor.task()),
            self.bus.clone(),
            self.ticks,
        );

        match self.executor.submit(unit) {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(task = self.descriptor.name(), tick = self.ticks, error = %err, "submission rejected");
                self.bus.publish(
                    Event::new(EventKind::SubmitRejected)
                        .with_task(self.descriptor.name())
                        .with_tick(self.ticks)
                        .with_reason(err.to_string()),
                );
                None
            }
        }
    }
}

/// Sleeps for `delay`. Returns `false` if `token` was cancelled first.
async fn sleep_or_cancel(delay: Duration, token: &CancellationToken) -> bool {
    select! {
        biased;
        _ = token.cancelled() => false,
        _ = time::sleep(delay) => true,
    }
}
