//! Contract for objects that own a machine.

use super::StateMachine;
use crate::builder::BuildError;
use crate::core::State;
use std::rc::Rc;

/// An object driven by a state machine, such as a form or a document.
///
/// The host owns its machine. The machine only keeps a `Weak` handle back to
/// the host (see [`StateMachine::host`]) and never assumes it outlives it.
pub trait StateMachineHost<S: State> {
    /// Build a fresh machine for this host.
    fn new_state_machine(&self) -> Result<Rc<StateMachine<S>>, BuildError>;

    /// The machine currently driving this host, if any.
    fn current_state_machine(&self) -> Option<Rc<StateMachine<S>>>;
}
