//! Declarative description of a machine's states and transitions.
//!
//! A [`StateGraph`] is plain data: the transitions between states, each
//! keyed by a trigger name, plus entry and exit hooks per state. The engine
//! consults it to build each state's trigger table and to route a fired
//! trigger to its target. Graphs are built and validated by
//! [`StateGraphBuilder`](crate::builder::StateGraphBuilder).

mod transition;
mod validation;
mod violations;

pub use transition::{Hook, Transition};
pub use validation::validate;
pub use violations::GraphViolation;

use crate::core::State;
use std::fmt;
use std::rc::Rc;

/// Transitions and hooks of one kind of machine.
///
/// Cheap to clone; hooks, guards and effect sources are shared.
pub struct StateGraph<S: State> {
    transitions: Vec<Transition<S>>,
    entry_hooks: Vec<(S, Hook<S>)>,
    exit_hooks: Vec<(S, Hook<S>)>,
}

impl<S: State> StateGraph<S> {
    pub(crate) fn new(
        transitions: Vec<Transition<S>>,
        entry_hooks: Vec<(S, Hook<S>)>,
        exit_hooks: Vec<(S, Hook<S>)>,
    ) -> Self {
        Self {
            transitions,
            entry_hooks,
            exit_hooks,
        }
    }

    /// All transitions, in definition order.
    pub fn transitions(&self) -> &[Transition<S>] {
        &self.transitions
    }

    /// Names of the triggers leaving `state`, in definition order, without
    /// duplicates.
    pub fn trigger_names(&self, state: &S) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for transition in self.transitions.iter().filter(|t| &t.from == state) {
            if !names.contains(&transition.trigger.as_str()) {
                names.push(&transition.trigger);
            }
        }
        names
    }

    /// The transition taken when `trigger` fires in `state`.
    ///
    /// When several transitions match, the first one defined wins.
    pub fn route(&self, state: &S, trigger: &str) -> Option<&Transition<S>> {
        self.transitions.iter().find(|t| t.matches(state, trigger))
    }

    /// Every state mentioned by a transition or a hook, in order of first
    /// appearance.
    pub fn states(&self) -> Vec<&S> {
        let mentioned = self
            .transitions
            .iter()
            .flat_map(|t| [&t.from, &t.to])
            .chain(self.entry_hooks.iter().map(|(state, _)| state))
            .chain(self.exit_hooks.iter().map(|(state, _)| state));

        let mut states: Vec<&S> = Vec::new();
        for state in mentioned {
            if !states.contains(&state) {
                states.push(state);
            }
        }
        states
    }

    /// Entry hooks of `state`, in registration order.
    pub(crate) fn entry_hooks(&self, state: &S) -> Vec<Hook<S>> {
        hooks_for(&self.entry_hooks, state)
    }

    /// Exit hooks of `state`, in registration order.
    pub(crate) fn exit_hooks(&self, state: &S) -> Vec<Hook<S>> {
        hooks_for(&self.exit_hooks, state)
    }
}

fn hooks_for<S: State>(hooks: &[(S, Hook<S>)], state: &S) -> Vec<Hook<S>> {
    hooks
        .iter()
        .filter(|(owner, _)| owner == state)
        .map(|(_, hook)| Rc::clone(hook))
        .collect()
}

impl<S: State> Clone for StateGraph<S> {
    fn clone(&self) -> Self {
        Self {
            transitions: self.transitions.clone(),
            entry_hooks: self.entry_hooks.clone(),
            exit_hooks: self.exit_hooks.clone(),
        }
    }
}

impl<S: State> fmt::Debug for StateGraph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateGraph")
            .field("transitions", &self.transitions)
            .field("entry_hooks", &self.entry_hooks.len())
            .field("exit_hooks", &self.exit_hooks.len())
            .finish()
    }
}
