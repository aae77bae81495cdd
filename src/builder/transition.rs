//! Builders for transitions and state graphs.

use crate::builder::error::BuildError;
use crate::core::{GuardFn, State, Trigger};
use crate::graph::{validate, Hook, StateGraph, Transition};
use crate::machine::{EffectSource, StateMachine};
use std::rc::Rc;
use stillwater::validation::Validation;

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<S: State> {
    from: Option<S>,
    trigger: Option<String>,
    to: Option<S>,
    guard: Option<GuardFn<S>>,
    effect: Option<EffectSource<S>>,
}

impl<S: State> TransitionBuilder<S> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            trigger: None,
            to: None,
            guard: None,
            effect: None,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the trigger name (required).
    pub fn on(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&StateMachine<S>) -> bool + 'static,
    {
        self.guard = Some(Rc::new(predicate));
        self
    }

    /// Add a shared guard predicate (optional).
    pub fn guard(mut self, predicate: GuardFn<S>) -> Self {
        self.guard = Some(predicate);
        self
    }

    /// Raise `source` one tick after the transition commits (optional).
    pub fn effect(mut self, source: &EffectSource<S>) -> Self {
        self.effect = Some(Rc::clone(source));
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let trigger = self.trigger.ok_or(BuildError::MissingTrigger)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        Ok(Transition {
            from,
            trigger,
            to,
            guard: self.guard,
            effect: self.effect,
        })
    }
}

impl<S: State> Default for TransitionBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a validated [`StateGraph`].
pub struct StateGraphBuilder<S: State> {
    transitions: Vec<Transition<S>>,
    entry_hooks: Vec<(S, Hook<S>)>,
    exit_hooks: Vec<(S, Hook<S>)>,
}

impl<S: State> StateGraphBuilder<S> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            entry_hooks: Vec::new(),
            exit_hooks: Vec::new(),
        }
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<S>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<S>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<S>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Run `hook` every time `state` is entered. Condition states never run
    /// entry hooks.
    pub fn on_entry<F>(mut self, state: S, hook: F) -> Self
    where
        F: Fn(&StateMachine<S>, Option<&Trigger<S>>) + 'static,
    {
        self.entry_hooks.push((state, Rc::new(hook)));
        self
    }

    /// Run `hook` every time `state` is left.
    pub fn on_exit<F>(mut self, state: S, hook: F) -> Self
    where
        F: Fn(&StateMachine<S>, Option<&Trigger<S>>) + 'static,
    {
        self.exit_hooks.push((state, Rc::new(hook)));
        self
    }

    /// Build and validate the graph, reporting every violation at once.
    pub fn build(self) -> Result<StateGraph<S>, BuildError> {
        let graph = StateGraph::new(self.transitions, self.entry_hooks, self.exit_hooks);
        match validate(&graph) {
            Validation::Success(_) => Ok(graph),
            Validation::Failure(errors) => Err(BuildError::InvalidGraph(
                errors.iter().cloned().collect(),
            )),
        }
    }
}

impl<S: State> Default for StateGraphBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
