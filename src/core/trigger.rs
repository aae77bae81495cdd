//! Named commands that request a transition.

use super::state::State;
use crate::machine::StateMachine;
use std::fmt;
use std::rc::{Rc, Weak};

/// Suffix appended to a trigger's name to form its key in a state's table.
pub const TRIGGER_SUFFIX: &str = "Trigger";

/// Table key for the trigger called `name`.
pub fn trigger_key(name: &str) -> String {
    format!("{name}{TRIGGER_SUFFIX}")
}

/// A named request bound to one machine.
///
/// Firing a trigger only queues it; nothing observable happens until the
/// machine consumes its trigger queue. A trigger holds a `Weak` handle, so
/// keeping one around never keeps its machine alive.
pub struct Trigger<S: State> {
    name: Rc<str>,
    machine: Weak<StateMachine<S>>,
}

impl<S: State> Trigger<S> {
    /// Create a trigger called `name` for `machine`.
    pub fn new(machine: &Rc<StateMachine<S>>, name: impl Into<String>) -> Self {
        Self::bound(Rc::downgrade(machine), name)
    }

    pub(crate) fn bound(machine: Weak<StateMachine<S>>, name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            name: Rc::from(name),
            machine,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key under which this trigger is stored in a state's trigger table.
    pub fn key(&self) -> String {
        trigger_key(&self.name)
    }

    /// The owning machine, if it is still alive.
    pub fn machine(&self) -> Option<Rc<StateMachine<S>>> {
        self.machine.upgrade()
    }

    /// Queue this trigger on its machine. A no-op once the machine is gone.
    pub fn fire(&self) {
        if let Some(machine) = self.machine.upgrade() {
            machine.process_trigger(self.clone());
        }
    }
}

impl<S: State> Clone for Trigger<S> {
    fn clone(&self) -> Self {
        Self {
            name: Rc::clone(&self.name),
            machine: Weak::clone(&self.machine),
        }
    }
}

impl<S: State> PartialEq for Trigger<S> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Weak::ptr_eq(&self.machine, &other.machine)
    }
}

impl<S: State> fmt::Debug for Trigger<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("name", &self.name)
            .field("bound", &(self.machine.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Only,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            "Only"
        }
    }

    #[test]
    fn key_appends_suffix() {
        assert_eq!(trigger_key("Go"), "GoTrigger");

        let trigger = Trigger::<TestState>::bound(Weak::new(), "Go");
        assert_eq!(trigger.name(), "Go");
        assert_eq!(trigger.key(), "GoTrigger");
    }

    #[test]
    fn firing_without_machine_is_a_no_op() {
        let trigger = Trigger::<TestState>::bound(Weak::new(), "Go");
        assert!(trigger.machine().is_none());
        trigger.fire();
    }

    #[test]
    fn clones_compare_equal() {
        let trigger = Trigger::<TestState>::bound(Weak::new(), "Go");
        let other = Trigger::<TestState>::bound(Weak::new(), "Stop");

        assert_eq!(trigger, trigger.clone());
        assert_ne!(trigger, other);
    }
}
