use std::sync::Arc;

use crate::{
    clock::{Clock, SystemClock},
    core::{SchedulerConfig, scheduler::TaskScheduler},
    executor::ExecutorRef,
    subscribers::Subscribe,
    tasks::TaskDescriptor,
};

/// Builder for constructing a [`TaskScheduler`] with optional parts.
///
/// Everything not supplied falls back to the config: the executor comes from
/// [`SchedulerConfig::build_executor`] and the clock is [`SystemClock`].
pub struct SchedulerBuilder {
    cfg: SchedulerConfig,
    executor: Option<ExecutorRef>,
    descriptors: Vec<TaskDescriptor>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    clock: Option<Arc<dyn Clock>>,
}

impl SchedulerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: SchedulerConfig) -> Self {
        Self {
            cfg,
            executor: None,
            descriptors: Vec::new(),
            subscribers: Vec::new(),
            clock: None,
        }
    }

    /// Uses `executor` instead of the one selected by the config.
    pub fn with_executor(mut self, executor: ExecutorRef) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Registers descriptors up front (same as calling `discover` after `build`).
    pub fn with_descriptors(mut self, descriptors: Vec<TaskDescriptor>) -> Self {
        self.descriptors.extend(descriptors);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Sets the wall-clock source used by cron loops.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the scheduler. Nothing is spawned until `start()`.
    pub fn build(self) -> TaskScheduler {
        let executor = self
            .executor
            .unwrap_or_else(|| self.cfg.build_executor());
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        TaskScheduler::new_internal(
            self.cfg,
            executor,
            clock,
            self.descriptors,
            self.subscribers,
        )
    }
}
