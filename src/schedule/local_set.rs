//! Scheduler backed by a tokio `LocalSet`.

use super::{Scheduler, Task};
use tracing::error;

/// Posts every task with [`tokio::task::spawn_local`].
///
/// Must be used from inside a `LocalSet` (machines are `!Send`, so they live
/// on a single thread anyway). There is no caller left to hand a failing
/// task's error to, so it is logged at `error` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalTaskScheduler;

impl LocalTaskScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for LocalTaskScheduler {
    fn post(&self, task: Task) {
        tokio::task::spawn_local(async move {
            if let Err(err) = task() {
                error!(error = %err, "scheduled machine task failed");
            }
        });
    }
}
