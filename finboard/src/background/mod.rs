pub mod data_loader;

use std::collections::HashMap;
use std::future::Future;
use tokio::task::JoinHandle;

/// Manages background tasks for loads and mutations.
/// Tracks running tasks by key and provides cancellation support.
pub struct BackgroundTaskManager {
    tasks: HashMap<String, JoinHandle<()>>,
}

impl BackgroundTaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    /// Spawn a background task.
    /// If a task with the same key is still running it is aborted first, so a
    /// superseded fetch never reports back.
    pub fn spawn_load_task<F>(&mut self, task_id: String, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(handle) = self.tasks.remove(&task_id) {
            if !handle.is_finished() {
                tracing::debug!("Superseding running task {}", task_id);
            }
            handle.abort();
        }

        let handle = tokio::spawn(future);
        self.tasks.insert(task_id, handle);
    }

    /// Forget tasks that already ran to completion
    pub fn prune_finished(&mut self) {
        self.tasks.retain(|_, handle| !handle.is_finished());
    }

    pub fn running(&self) -> usize {
        self.tasks
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Cancel all running tasks (used on shutdown)
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Default for BackgroundTaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BackgroundTaskManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
