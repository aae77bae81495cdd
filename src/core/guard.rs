//! Guard predicates for controlling state transitions.
//!
//! A guard is evaluated right before a transition commits. Returning `false`
//! aborts the transition and leaves the machine where it was; that is a normal
//! outcome, not an error.

use super::state::State;
use crate::machine::StateMachine;
use std::fmt;
use std::rc::{Rc, Weak};

/// Predicate evaluated against the owning machine.
pub type GuardFn<S> = Rc<dyn Fn(&StateMachine<S>) -> bool>;

/// Precondition bound weakly to one machine.
///
/// The predicate runs synchronously inside the transition algorithm and may do
/// anything with the machine it is given, including disposing it. The engine
/// treats disposal during a guard as a rejection.
///
/// # Example
///
/// ```rust
/// use statehost::core::Guard;
/// # use statehost::builder::{simple_transition, MachineBuilder, StateGraphBuilder};
/// # use statehost::schedule::TickLoop;
/// # use statehost::state_enum;
/// # state_enum! { enum Light { Off, On } }
/// # let graph = StateGraphBuilder::new()
/// #     .add_transition(simple_transition(Light::Off, "Toggle", Light::On))
/// #     .build()
/// #     .unwrap();
/// # let machine = MachineBuilder::new()
/// #     .graph(graph)
/// #     .initial(Light::Off)
/// #     .scheduler(TickLoop::new())
/// #     .build()
/// #     .unwrap();
///
/// let always = Guard::permit(&machine);
/// assert!(always.execute());
///
/// let only_when_idle = Guard::new(&machine, |m| !m.is_working());
/// assert!(only_when_idle.execute());
/// ```
pub struct Guard<S: State> {
    machine: Weak<StateMachine<S>>,
    predicate: Option<GuardFn<S>>,
}

impl<S: State> Guard<S> {
    /// Guard that always allows the transition.
    pub fn permit(machine: &Rc<StateMachine<S>>) -> Self {
        Self {
            machine: Rc::downgrade(machine),
            predicate: None,
        }
    }

    /// Guard backed by `predicate`.
    pub fn new<F>(machine: &Rc<StateMachine<S>>, predicate: F) -> Self
    where
        F: Fn(&StateMachine<S>) -> bool + 'static,
    {
        Self::bound(Rc::downgrade(machine), Rc::new(predicate))
    }

    pub(crate) fn bound(machine: Weak<StateMachine<S>>, predicate: GuardFn<S>) -> Self {
        Self {
            machine,
            predicate: Some(predicate),
        }
    }

    /// The owning machine, if it is still alive.
    pub fn machine(&self) -> Option<Rc<StateMachine<S>>> {
        self.machine.upgrade()
    }

    /// Evaluate the guard.
    ///
    /// A predicate guard whose machine is gone rejects.
    pub fn execute(&self) -> bool {
        let Some(predicate) = &self.predicate else {
            return true;
        };
        match self.machine.upgrade() {
            Some(machine) => predicate(&machine),
            None => false,
        }
    }
}

impl<S: State> Clone for Guard<S> {
    fn clone(&self) -> Self {
        Self {
            machine: Weak::clone(&self.machine),
            predicate: self.predicate.clone(),
        }
    }
}

impl<S: State> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("permit", &self.predicate.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{simple_transition, MachineBuilder, StateGraphBuilder};
    use crate::schedule::TickLoop;
    use std::cell::Cell;

    crate::state_enum! {
        enum TestState {
            Initial,
            Processing,
        }
    }

    fn machine() -> Rc<StateMachine<TestState>> {
        let graph = StateGraphBuilder::new()
            .add_transition(simple_transition(
                TestState::Initial,
                "Go",
                TestState::Processing,
            ))
            .build()
            .unwrap();
        MachineBuilder::new()
            .graph(graph)
            .initial(TestState::Initial)
            .scheduler(TickLoop::new())
            .build()
            .unwrap()
    }

    #[test]
    fn permit_always_allows() {
        let machine = machine();
        let guard = Guard::permit(&machine);

        assert!(guard.execute());
        drop(machine);
        assert!(guard.execute());
    }

    #[test]
    fn predicate_sees_owning_machine() {
        let machine = machine();
        let guard = Guard::new(&machine, |m| !m.is_working());
        assert!(guard.execute());

        machine.start().unwrap();
        assert!(!guard.execute());
    }

    #[test]
    fn guard_is_deterministic() {
        let machine = machine();
        let guard = Guard::new(&machine, |m| m.name() == "unnamed");

        assert_eq!(guard.execute(), guard.execute());
    }

    #[test]
    fn predicate_guard_rejects_once_machine_is_gone() {
        let machine = machine();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let guard = Guard::new(&machine, move |_| {
            counter.set(counter.get() + 1);
            true
        });

        drop(machine);

        assert!(guard.machine().is_none());
        assert!(!guard.execute());
        assert_eq!(calls.get(), 0);
    }
}
