//! The node a machine actually sits in.

use super::state::State;
use super::trigger::{trigger_key, Trigger};
use crate::graph::StateGraph;
use crate::machine::{MachineError, StateMachine};
use std::fmt;
use std::rc::{Rc, Weak};

/// Name reported by the sentinel node of a disposed machine.
pub const DISPOSED_STATE_NAME: &str = "Disposed";

#[derive(Debug, Clone, PartialEq)]
enum NodeKind<S: State> {
    Defined(S),
    Disposed,
}

/// A state variant bound to its machine, with its trigger table.
///
/// The trigger table is built once, from the graph's transitions out of this
/// state in definition order, and never changes afterwards. Keys follow the
/// `<name>Trigger` convention; when two transitions share a trigger name the
/// first one wins.
pub struct StateNode<S: State> {
    kind: NodeKind<S>,
    machine: Weak<StateMachine<S>>,
    triggers: Vec<(String, Trigger<S>)>,
}

impl<S: State> StateNode<S> {
    pub(crate) fn new(machine: Weak<StateMachine<S>>, graph: &StateGraph<S>, state: S) -> Self {
        let mut triggers: Vec<(String, Trigger<S>)> = Vec::new();
        for name in graph.trigger_names(&state) {
            let key = trigger_key(name);
            if triggers.iter().any(|(existing, _)| *existing == key) {
                continue;
            }
            triggers.push((key, Trigger::bound(Weak::clone(&machine), name)));
        }

        Self {
            kind: NodeKind::Defined(state),
            machine,
            triggers,
        }
    }

    /// Sentinel reported as the current state of a disposed machine.
    pub(crate) fn disposed(machine: Weak<StateMachine<S>>) -> Self {
        Self {
            kind: NodeKind::Disposed,
            machine,
            triggers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            NodeKind::Defined(state) => state.name(),
            NodeKind::Disposed => DISPOSED_STATE_NAME,
        }
    }

    /// The state variant, or `None` for the disposed sentinel.
    pub fn state(&self) -> Option<&S> {
        match &self.kind {
            NodeKind::Defined(state) => Some(state),
            NodeKind::Disposed => None,
        }
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self.kind, NodeKind::Disposed)
    }

    pub fn is_condition(&self) -> bool {
        self.state().is_some_and(State::is_condition)
    }

    /// The owning machine, if it is still alive.
    pub fn machine(&self) -> Option<Rc<StateMachine<S>>> {
        self.machine.upgrade()
    }

    /// Triggers declared by this state, in definition order.
    pub fn triggers(&self) -> impl Iterator<Item = &Trigger<S>> + '_ {
        self.triggers.iter().map(|(_, trigger)| trigger)
    }

    pub fn has_trigger(&self, name: &str) -> bool {
        let key = trigger_key(name);
        self.triggers.iter().any(|(existing, _)| *existing == key)
    }

    /// Look up the trigger called `name`.
    ///
    /// An unknown name is a defect in the caller's view of the graph and is
    /// reported as [`MachineError::UnknownTrigger`].
    pub fn get_trigger(&self, name: &str) -> Result<&Trigger<S>, MachineError> {
        let key = trigger_key(name);
        self.triggers
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, trigger)| trigger)
            .ok_or_else(|| MachineError::UnknownTrigger {
                state: self.name().to_string(),
                trigger: key,
            })
    }

    /// Fire the trigger called `name`.
    pub fn fire(&self, name: &str) -> Result<(), MachineError> {
        self.get_trigger(name)?.fire();
        Ok(())
    }
}

impl<S: State> fmt::Debug for StateNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("name", &self.name())
            .field(
                "triggers",
                &self.triggers().map(Trigger::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<S: State> fmt::Display for StateNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
