use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::error::TaskError;

/// Completion handle for one submitted unit.
///
/// `wait()` resolves with the unit's result. Failures and panics arrive as
/// [`TaskError`]s here, never through the submitting caller. Dropping a handle
/// detaches: the unit keeps running and stays tracked by its executor.
#[must_use = "dropping a TaskHandle detaches the unit; call wait() to observe its result"]
pub struct TaskHandle<T = ()> {
    name: Arc<str>,
    join: JoinHandle<Result<T, TaskError>>,
}

impl<T> TaskHandle<T> {
    pub(crate) fn new(name: impl Into<Arc<str>>, join: JoinHandle<Result<T, TaskError>>) -> Self {
        Self {
            name: name.into(),
            join,
        }
    }

    /// Name of the submitted task.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once the unit has finished (successfully or not).
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the unit to finish and returns its result.
    pub async fn wait(self) -> Result<T, TaskError> {
        match self.join.await {
            Ok(res) => res,
            Err(err) => Err(TaskError::from_join(err)),
        }
    }
}

impl<T> fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("name", &self.name)
            .field("finished", &self.join.is_finished())
            .finish()
    }
}
