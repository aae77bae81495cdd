//! Coalescing one-shot tick.

use super::{Scheduler, Task};
use std::cell::Cell;

/// At most one outstanding scheduled task at a time.
///
/// The engine calls [`start`](Self::start) liberally; only the first call
/// after the previous tick fired actually posts a task. Once stopped the tick
/// never posts again.
#[derive(Debug, Default)]
pub struct OneShot {
    pending: Cell<bool>,
    stopped: Cell<bool>,
}

impl OneShot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post `task` unless a tick is already pending or the tick was stopped.
    ///
    /// Returns `true` if a task was posted.
    pub fn start(&self, scheduler: &dyn Scheduler, task: Task) -> bool {
        if self.stopped.get() || self.pending.get() {
            return false;
        }
        self.pending.set(true);
        scheduler.post(task);
        true
    }

    /// Mark the pending tick as fired. Call this first thing inside the task.
    pub fn fired(&self) {
        self.pending.set(false);
    }

    pub fn stop(&self) {
        self.stopped.set(true);
        self.pending.set(false);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}
