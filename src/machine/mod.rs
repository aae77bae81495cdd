//! The machine itself: transition engine, options and host contract.

mod error;
mod host;
mod options;
mod queue;
mod state_machine;

pub use error::MachineError;
pub use host::StateMachineHost;
pub use options::MachineOptions;
pub use queue::EffectSource;
pub use state_machine::StateMachine;

pub(crate) use state_machine::MachineParts;
