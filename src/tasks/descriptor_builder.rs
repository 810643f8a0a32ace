use std::time::Duration;

use crate::cron::CronExpression;
use crate::error::SchedulerError;
use crate::tasks::descriptor::{TaskDescriptor, Trigger};
use crate::tasks::task::TaskRef;

/// Builder for [`TaskDescriptor`] mirroring annotation-style discovery, where each
/// trigger is an independent optional attribute.
///
/// `build()` enforces that exactly one trigger was set.
#[derive(Clone)]
pub struct TaskDescriptorBuilder {
    task: TaskRef,
    cron: Option<String>,
    fixed_rate: Option<Duration>,
    fixed_delay: Option<Duration>,
    initial_delay: Option<Duration>,
}

impl TaskDescriptorBuilder {
    /// Creates a new builder for the given task.
    pub fn new(task: TaskRef) -> Self {
        Self {
            task,
            cron: None,
            fixed_rate: None,
            fixed_delay: None,
            initial_delay: None,
        }
    }

    pub fn cron(mut self, expr: impl Into<String>) -> Self {
        self.cron = Some(expr.into());
        self
    }

    pub fn fixed_rate(mut self, interval: Duration) -> Self {
        self.fixed_rate = Some(interval);
        self
    }

    pub fn fixed_delay(mut self, interval: Duration) -> Self {
        self.fixed_delay = Some(interval);
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Validates and builds the descriptor.
    ///
    /// Fails with [`SchedulerError::InvalidDescriptor`] when zero or several triggers
    /// are set, and with the usual cron/interval errors otherwise.
    pub fn build(self) -> Result<TaskDescriptor, SchedulerError> {
        let set: Vec<&str> = [
            self.cron.as_ref().map(|_| "cron"),
            self.fixed_rate.map(|_| "fixed_rate"),
            self.fixed_delay.map(|_| "fixed_delay"),
        ]
        .into_iter()
        .flatten()
        .collect();

        let trigger = match (set.len(), self.cron, self.fixed_rate, self.fixed_delay) {
            (1, Some(expr), _, _) => Trigger::Cron(CronExpression::parse(&expr)?),
            (1, _, Some(every), _) => Trigger::FixedRate(every),
            (1, _, _, Some(every)) => Trigger::FixedDelay(every),
            (0, ..) => {
                return Err(SchedulerError::InvalidDescriptor {
                    task: self.task.name().to_string(),
                    reason: "no trigger configured".to_string(),
                });
            }
            _ => {
                return Err(SchedulerError::InvalidDescriptor {
                    task: self.task.name().to_string(),
                    reason: format!("multiple triggers configured: {}", set.join(", ")),
                });
            }
        };

        let descriptor = TaskDescriptor::new(self.task, trigger)?;
        Ok(match self.initial_delay {
            Some(delay) => descriptor.with_initial_delay(delay),
            None => descriptor,
        })
    }
}
