//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::State;
use crate::graph::{GraphViolation, StateGraph};
use crate::machine::{MachineOptions, MachineParts, StateMachine, StateMachineHost};
use crate::schedule::Scheduler;
use std::rc::{Rc, Weak};

/// Builder for constructing state machines with a fluent API.
///
/// A graph, an initial state and a scheduler are required. The machine is
/// returned unstarted; call [`StateMachine::start`] to enter the initial
/// state.
pub struct MachineBuilder<S: State> {
    graph: Option<StateGraph<S>>,
    initial: Option<S>,
    scheduler: Option<Rc<dyn Scheduler>>,
    host: Option<Weak<dyn StateMachineHost<S>>>,
    options: MachineOptions,
}

impl<S: State> MachineBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            graph: None,
            initial: None,
            scheduler: None,
            host: None,
            options: MachineOptions::default(),
        }
    }

    /// Set the state graph (required).
    pub fn graph(mut self, graph: StateGraph<S>) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Set the scheduler ticks are posted to (required).
    pub fn scheduler<T: Scheduler + 'static>(mut self, scheduler: Rc<T>) -> Self {
        let scheduler: Rc<dyn Scheduler> = scheduler;
        self.scheduler = Some(scheduler);
        self
    }

    /// Remember `host` weakly; see [`StateMachine::host`].
    pub fn host<H: StateMachineHost<S> + 'static>(mut self, host: &Rc<H>) -> Self {
        let host: Weak<H> = Rc::downgrade(host);
        let host: Weak<dyn StateMachineHost<S>> = host;
        self.host = Some(host);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options.name = name.into();
        self
    }

    pub fn options(mut self, options: MachineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn pump_on_enqueue(mut self, pump: bool) -> Self {
        self.options.pump_on_enqueue = pump;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.options.history_limit = limit;
        self
    }

    /// Build the state machine.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<Rc<StateMachine<S>>, BuildError> {
        let graph = self.graph.ok_or(BuildError::MissingGraph)?;
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let scheduler = self.scheduler.ok_or(BuildError::MissingScheduler)?;

        if initial.is_condition() && graph.trigger_names(&initial).is_empty() {
            return Err(BuildError::InvalidGraph(vec![
                GraphViolation::ConditionWithoutTriggers {
                    state: initial.name().to_string(),
                },
            ]));
        }

        Ok(StateMachine::from_parts(MachineParts {
            options: self.options,
            graph,
            initial,
            host: self.host,
            scheduler,
        }))
    }
}

impl<S: State> Default for MachineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{simple_transition, StateGraphBuilder};
    use crate::schedule::TickLoop;
    use std::cell::RefCell;

    crate::state_enum! {
        enum TestState {
            Initial,
            Decide,
            Processing,
            Complete,
        }
        condition: [Decide]
    }

    fn graph() -> StateGraph<TestState> {
        StateGraphBuilder::new()
            .add_transition(simple_transition(
                TestState::Initial,
                "Start",
                TestState::Processing,
            ))
            .add_transition(simple_transition(
                TestState::Processing,
                "Finish",
                TestState::Complete,
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn builder_validates_required_fields() {
        let result = MachineBuilder::<TestState>::new().build();
        assert!(matches!(result, Err(BuildError::MissingGraph)));

        let result = MachineBuilder::new().graph(graph()).build();
        assert!(matches!(result, Err(BuildError::MissingInitialState)));

        let result = MachineBuilder::new()
            .graph(graph())
            .initial(TestState::Initial)
            .build();
        assert!(matches!(result, Err(BuildError::MissingScheduler)));
    }

    #[test]
    fn condition_initial_state_needs_triggers() {
        let result = MachineBuilder::new()
            .graph(graph())
            .initial(TestState::Decide)
            .scheduler(TickLoop::new())
            .build();

        assert!(matches!(result, Err(BuildError::InvalidGraph(_))));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = MachineBuilder::new()
            .graph(graph())
            .initial(TestState::Initial)
            .scheduler(TickLoop::new())
            .name("checkout")
            .pump_on_enqueue(true)
            .history_limit(8)
            .build()
            .unwrap();

        assert_eq!(machine.name(), "checkout");
        assert!(machine.options().pump_on_enqueue);
        assert_eq!(machine.options().history_limit, 8);
        assert_eq!(machine.initial_state(), &TestState::Initial);
        assert!(machine.current_state().is_none());
        assert!(machine.host().is_none());
    }

    struct Panel {
        machine: RefCell<Option<Rc<StateMachine<TestState>>>>,
    }

    impl StateMachineHost<TestState> for Panel {
        fn new_state_machine(&self) -> Result<Rc<StateMachine<TestState>>, BuildError> {
            MachineBuilder::new()
                .graph(graph())
                .initial(TestState::Initial)
                .scheduler(TickLoop::new())
                .build()
        }

        fn current_state_machine(&self) -> Option<Rc<StateMachine<TestState>>> {
            self.machine.borrow().clone()
        }
    }

    #[test]
    fn host_is_held_weakly() {
        let panel = Rc::new(Panel {
            machine: RefCell::new(None),
        });
        let machine = MachineBuilder::new()
            .graph(graph())
            .initial(TestState::Initial)
            .scheduler(TickLoop::new())
            .host(&panel)
            .build()
            .unwrap();

        let host = machine.host().unwrap();
        assert!(host.current_state_machine().is_none());
        drop(host);
        assert_eq!(Rc::strong_count(&panel), 1);

        drop(panel);
        assert!(machine.host().is_none());
    }
}
