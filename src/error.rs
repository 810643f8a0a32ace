//! Error types used by the scheduler, executors and tasks.
//!
//! This module defines three error enums:
//!
//! - [`SchedulerError`] - configuration and lifecycle errors, surfaced synchronously.
//! - [`ExecutorError`] - errors raised by a [`TaskExecutor`](crate::TaskExecutor) on submission.
//! - [`TaskError`] - errors raised by individual task invocations.
//!
//! Every type provides `as_label` (stable snake_case, for logs/metrics).
//! Execution errors never escape the engine: they travel through
//! [`TaskHandle`](crate::TaskHandle)s, runtime events and `tracing` records.

use std::any::Any;

use thiserror::Error;

/// # Errors produced by the scheduler itself.
///
/// Configuration errors (`InvalidCron`, `InvalidDescriptor`, `InvalidInterval`, `Config`)
/// are raised at construction time and never deferred to a running loop.
/// Lifecycle errors (`AlreadyStarted`, `AlreadyStopped`) signal programmer misuse.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// The cron string does not parse into exactly five valid fields.
    #[error("invalid cron expression {expr:?}: {reason}")]
    InvalidCron {
        /// The rejected source text.
        expr: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A descriptor was built with zero or more than one trigger.
    #[error("invalid descriptor for task {task:?}: {reason}")]
    InvalidDescriptor {
        /// Name of the task the descriptor was built for.
        task: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A fixed-rate or fixed-delay interval of zero.
    #[error("invalid interval for task {task:?}: interval must be greater than zero")]
    InvalidInterval {
        /// Name of the task the descriptor was built for.
        task: String,
    },

    /// Configuration could not be loaded or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// `start()` was called while loops are already running.
    #[error("scheduler already started")]
    AlreadyStarted,

    /// `start()` was called after `stop()`; the executor has been drained and released.
    #[error("scheduler already stopped")]
    AlreadyStopped,
}

impl SchedulerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use chronovisor::SchedulerError;
    ///
    /// assert_eq!(SchedulerError::AlreadyStarted.as_label(), "scheduler_already_started");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SchedulerError::InvalidCron { .. } => "scheduler_invalid_cron",
            SchedulerError::InvalidDescriptor { .. } => "scheduler_invalid_descriptor",
            SchedulerError::InvalidInterval { .. } => "scheduler_invalid_interval",
            SchedulerError::Config(_) => "scheduler_config",
            SchedulerError::AlreadyStarted => "scheduler_already_started",
            SchedulerError::AlreadyStopped => "scheduler_already_stopped",
        }
    }

    /// Indicates whether this is a configuration error (as opposed to lifecycle misuse).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SchedulerError::InvalidCron { .. }
                | SchedulerError::InvalidDescriptor { .. }
                | SchedulerError::InvalidInterval { .. }
                | SchedulerError::Config(_)
        )
    }

    pub(crate) fn invalid_cron(expr: &str, reason: impl Into<String>) -> Self {
        SchedulerError::InvalidCron {
            expr: expr.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<figment::Error> for SchedulerError {
    fn from(err: figment::Error) -> Self {
        SchedulerError::Config(Box::new(err))
    }
}

/// # Errors produced by an executor when accepting work.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    /// The executor has been stopped and accepts no more submissions.
    #[error("executor {executor} is stopped")]
    Stopped {
        /// Name of the executor that rejected the submission.
        executor: &'static str,
    },
}

impl ExecutorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ExecutorError::Stopped { .. } => "executor_stopped",
        }
    }
}

/// # Errors produced by a task invocation.
///
/// A failing invocation never terminates the loop that submitted it.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The callable returned an error.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The callable panicked; the panic was caught at the invocation boundary.
    #[error("task panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },

    /// The unit was cancelled before it could complete.
    #[error("task cancelled")]
    Canceled,
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use chronovisor::TaskError;
    ///
    /// let err = TaskError::from("boom");
    /// assert_eq!(err.as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Panicked { message } => format!("panic: {message}"),
            TaskError::Canceled => "cancelled".to_string(),
        }
    }

    /// Builds a [`TaskError::Panicked`] from a caught panic payload.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        TaskError::Panicked { message }
    }

    /// Maps a tokio join failure onto the task error model.
    pub(crate) fn from_join(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            TaskError::from_panic(err.into_panic())
        } else {
            TaskError::Canceled
        }
    }
}

impl From<String> for TaskError {
    fn from(error: String) -> Self {
        TaskError::Fail { error }
    }
}

impl From<&str> for TaskError {
    fn from(error: &str) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(
            SchedulerError::invalid_cron("* *", "expected 5 fields").as_label(),
            "scheduler_invalid_cron"
        );
        assert_eq!(
            ExecutorError::Stopped { executor: "async" }.as_label(),
            "executor_stopped"
        );
        assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
    }

    #[test]
    fn panic_payloads_are_rendered() {
        let err = TaskError::from_panic(Box::new("static str"));
        assert_eq!(
            err,
            TaskError::Panicked {
                message: "static str".into()
            }
        );

        let err = TaskError::from_panic(Box::new(String::from("owned")));
        assert_eq!(err.as_message(), "panic: owned");

        let err = TaskError::from_panic(Box::new(42_u32));
        assert_eq!(err.as_label(), "task_panicked");
    }

    #[test]
    fn configuration_errors_are_classified() {
        assert!(SchedulerError::invalid_cron("x", "bad").is_configuration());
        assert!(
            SchedulerError::InvalidInterval {
                task: "t".into()
            }
            .is_configuration()
        );
        assert!(!SchedulerError::AlreadyStarted.is_configuration());
    }
}
