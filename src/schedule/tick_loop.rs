//! Deterministic cooperative task loop.

use super::{Scheduler, Task};
use crate::machine::MachineError;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use tracing::{error, warn};

/// Turns a drain may take before giving up on a runaway cascade.
pub const DEFAULT_TURN_LIMIT: usize = 10_000;

/// A single-threaded FIFO of posted tasks, drained by the host.
///
/// Tasks run with no borrow of the loop held, so a task may post further
/// tasks or pump the loop re-entrantly. A task that fails stops the drain and
/// its error is handed to the host.
///
/// # Example
///
/// ```rust
/// use statehost::schedule::{Scheduler, TickLoop};
///
/// let tick_loop = TickLoop::new();
/// tick_loop.post(Box::new(|| Ok(())));
/// assert_eq!(tick_loop.pending(), 1);
/// assert_eq!(tick_loop.run_until_idle().unwrap(), 1);
/// ```
#[derive(Default)]
pub struct TickLoop {
    tasks: RefCell<VecDeque<Task>>,
    deferred_error: RefCell<Option<MachineError>>,
    turns: Cell<usize>,
}

impl TickLoop {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Tasks posted but not yet run.
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Tasks run since the loop was created.
    pub fn turns(&self) -> usize {
        self.turns.get()
    }

    /// Run the oldest pending task. Returns `false` if there was none.
    pub fn turn(&self) -> Result<bool, MachineError> {
        let task = self.tasks.borrow_mut().pop_front();
        match task {
            Some(task) => {
                self.turns.set(self.turns.get() + 1);
                task()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drain until nothing is pending, up to [`DEFAULT_TURN_LIMIT`] turns.
    pub fn run_until_idle(&self) -> Result<usize, MachineError> {
        self.run_bounded(DEFAULT_TURN_LIMIT)
    }

    /// Drain until nothing is pending, up to `limit` turns.
    ///
    /// Returns the number of tasks run. An error raised by a task during an
    /// earlier [`pump`](Scheduler::pump) is reported here first.
    pub fn run_bounded(&self, limit: usize) -> Result<usize, MachineError> {
        if let Some(err) = self.deferred_error.borrow_mut().take() {
            return Err(err);
        }

        let mut ran = 0;
        while ran < limit {
            if !self.turn()? {
                return Ok(ran);
            }
            ran += 1;
        }

        if self.pending() == 0 {
            Ok(ran)
        } else {
            warn!(limit, pending = self.pending(), "tick loop drain hit its turn limit");
            Err(MachineError::TurnLimitExceeded { limit })
        }
    }
}

impl Scheduler for TickLoop {
    fn post(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }

    /// Run the tasks that were pending when the pump started.
    ///
    /// Work those tasks post is left for the next pump or drain, so a task
    /// that keeps re-posting itself cannot spin a pump forever.
    fn pump(&self) {
        for _ in 0..self.pending() {
            match self.turn() {
                Ok(true) => {}
                Ok(false) => return,
                Err(err) => {
                    error!(error = %err, "task failed while pumping");
                    let mut deferred = self.deferred_error.borrow_mut();
                    if deferred.is_none() {
                        *deferred = Some(err);
                    }
                    return;
                }
            }
        }
    }
}

impl fmt::Debug for TickLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickLoop")
            .field("pending", &self.pending())
            .field("turns", &self.turns.get())
            .finish()
    }
}
