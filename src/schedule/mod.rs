//! Deferred execution for the trigger and effect queues.
//!
//! A machine never consumes its queues synchronously inside the caller that
//! filled them. Instead it posts a task to a [`Scheduler`], which runs it "as
//! soon as possible, but later" on the machine's cooperative thread. This
//! breaks arbitrarily deep chains of triggers firing triggers, and gives
//! pending disposal requests a chance to land between steps.
//!
//! Two schedulers ship with the crate:
//!
//! - [`TickLoop`]: a deterministic task queue the host drains explicitly.
//! - [`LocalTaskScheduler`]: posts onto a tokio `LocalSet` (feature `tokio`).

mod one_shot;
mod tick_loop;
#[cfg(feature = "tokio")]
mod local_set;

pub use one_shot::OneShot;
pub use tick_loop::{TickLoop, DEFAULT_TURN_LIMIT};
#[cfg(feature = "tokio")]
pub use local_set::LocalTaskScheduler;

use crate::machine::MachineError;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() -> Result<(), MachineError>>;

/// Capability to run a task later on the current cooperative thread.
pub trait Scheduler {
    /// Queue `task` to run on a later turn. Must never run it synchronously.
    fn post(&self, task: Task);

    /// Synchronously run whatever is already pending.
    ///
    /// Hosts whose event loop can be pumped re-entrantly override this; the
    /// engine calls it after every enqueue when
    /// [`MachineOptions::pump_on_enqueue`](crate::machine::MachineOptions) is
    /// set. The default does nothing.
    fn pump(&self) {}
}
