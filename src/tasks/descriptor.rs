//! # Task descriptors: one task, exactly one trigger.
//!
//! [`TaskDescriptor`] is the unit the scheduler works with. It bundles:
//! - the task itself ([`TaskRef`])
//! - its [`Trigger`] (cron, fixed-rate or fixed-delay)
//! - an optional initial delay (fixed-rate and fixed-delay only)
//!
//! Descriptors are immutable value objects. Every constructor validates its input, so an
//! invalid descriptor can never reach [`TaskScheduler::discover`](crate::TaskScheduler::discover).
//!
//! ## Trigger semantics
//! ```text
//! Cron(expr)        sleep until next calendar match → submit → repeat
//! FixedRate(every)  submit → next submit at start + every   (overlap allowed)
//! FixedDelay(every) submit → await completion → sleep every → repeat
//! ```

use std::fmt;
use std::time::Duration;

use crate::cron::CronExpression;
use crate::error::SchedulerError;
use crate::tasks::descriptor_builder::TaskDescriptorBuilder;
use crate::tasks::task::TaskRef;

/// When a task fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Fire on every calendar instant matching the expression.
    Cron(CronExpression),
    /// Fire every `interval`, measured from the start of each invocation.
    FixedRate(Duration),
    /// Fire `interval` after the previous invocation finished.
    FixedDelay(Duration),
}

impl Trigger {
    /// Short stable label (snake_case) for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Trigger::Cron(_) => "cron",
            Trigger::FixedRate(_) => "fixed_rate",
            Trigger::FixedDelay(_) => "fixed_delay",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Cron(expr) => write!(f, "cron({expr})"),
            Trigger::FixedRate(every) => write!(f, "fixed_rate({every:?})"),
            Trigger::FixedDelay(every) => write!(f, "fixed_delay({every:?})"),
        }
    }
}

/// Task bundled with its trigger.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use chronovisor::{TaskDescriptor, TaskError, TaskFn, TaskRef};
///
/// let sweep: TaskRef = TaskFn::arc("sweep", || async { Ok::<(), TaskError>(()) });
///
/// let every_ten = TaskDescriptor::fixed_rate(sweep.clone(), Duration::from_secs(10))
///     .unwrap()
///     .with_initial_delay(Duration::from_secs(3));
/// assert_eq!(every_ten.initial_delay(), Some(Duration::from_secs(3)));
///
/// let nightly = TaskDescriptor::cron(sweep, "0 3 * * *").unwrap();
/// assert_eq!(nightly.trigger().as_label(), "cron");
/// ```
#[derive(Clone)]
pub struct TaskDescriptor {
    task: TaskRef,
    trigger: Trigger,
    initial_delay: Option<Duration>,
}

impl TaskDescriptor {
    /// Creates a descriptor from an already-built trigger.
    ///
    /// Fails with [`SchedulerError::InvalidInterval`] for a zero interval.
    pub fn new(task: TaskRef, trigger: Trigger) -> Result<Self, SchedulerError> {
        if let Trigger::FixedRate(every) | Trigger::FixedDelay(every) = &trigger {
            if every.is_zero() {
                return Err(SchedulerError::InvalidInterval {
                    task: task.name().to_string(),
                });
            }
        }
        Ok(Self {
            task,
            trigger,
            initial_delay: None,
        })
    }

    /// Cron-triggered descriptor; parses `expr` eagerly.
    pub fn cron(task: TaskRef, expr: &str) -> Result<Self, SchedulerError> {
        Self::new(task, Trigger::Cron(CronExpression::parse(expr)?))
    }

    /// Fixed-rate descriptor.
    pub fn fixed_rate(task: TaskRef, interval: Duration) -> Result<Self, SchedulerError> {
        Self::new(task, Trigger::FixedRate(interval))
    }

    /// Fixed-delay descriptor.
    pub fn fixed_delay(task: TaskRef, interval: Duration) -> Result<Self, SchedulerError> {
        Self::new(task, Trigger::FixedDelay(interval))
    }

    /// Starts a builder that validates the "exactly one trigger" rule at `build()`.
    pub fn builder(task: TaskRef) -> TaskDescriptorBuilder {
        TaskDescriptorBuilder::new(task)
    }

    /// Returns a new descriptor with the given initial delay.
    ///
    /// Stored for every trigger kind but only applied to fixed-rate and fixed-delay.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Returns reference to the task.
    pub fn task(&self) -> &TaskRef {
        &self.task
    }

    /// Convenience: returns the task name.
    pub fn name(&self) -> &str {
        self.task.name()
    }

    /// Returns the trigger.
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Returns the configured initial delay, if any.
    pub fn initial_delay(&self) -> Option<Duration> {
        self.initial_delay
    }

    /// The initial delay the loop actually applies: always `None` for cron triggers.
    pub fn effective_initial_delay(&self) -> Option<Duration> {
        match self.trigger {
            Trigger::Cron(_) => None,
            Trigger::FixedRate(_) | Trigger::FixedDelay(_) => self.initial_delay,
        }
    }
}

impl fmt::Debug for TaskDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDescriptor")
            .field("task", &self.task.name())
            .field("trigger", &self.trigger)
            .field("initial_delay", &self.initial_delay)
            .finish()
    }
}
