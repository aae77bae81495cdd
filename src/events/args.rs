//! Payloads carried by machine events.

use crate::core::{State, StateNode, Trigger};
use std::fmt;
use std::rc::Rc;

/// Immutable record of one attempted transition.
///
/// The same value is delivered to `start_transition`,
/// `before_exiting_previous_state` and `end_transition`, and is the payload
/// of any effect queued by the transition.
pub struct TransitionEvent<S: State> {
    prev: Option<Rc<StateNode<S>>>,
    next: Rc<StateNode<S>>,
    why: Option<Trigger<S>>,
}

impl<S: State> TransitionEvent<S> {
    pub(crate) fn new(
        prev: Option<Rc<StateNode<S>>>,
        next: Rc<StateNode<S>>,
        why: Option<Trigger<S>>,
    ) -> Self {
        Self { prev, next, why }
    }

    /// The state being left, `None` when the machine had no state yet.
    pub fn prev(&self) -> Option<&StateNode<S>> {
        self.prev.as_deref()
    }

    pub fn next(&self) -> &StateNode<S> {
        &self.next
    }

    /// The trigger that caused the transition, if any.
    pub fn why(&self) -> Option<&Trigger<S>> {
        self.why.as_ref()
    }
}

impl<S: State> Clone for TransitionEvent<S> {
    fn clone(&self) -> Self {
        Self {
            prev: self.prev.clone(),
            next: Rc::clone(&self.next),
            why: self.why.clone(),
        }
    }
}

impl<S: State> fmt::Display for TransitionEvent<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transition event: [{}] --({})--> [{}]",
            self.prev().map(StateNode::name).unwrap_or_default(),
            self.why().map(Trigger::name).unwrap_or_default(),
            self.next.name()
        )
    }
}

impl<S: State> fmt::Debug for TransitionEvent<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionEvent")
            .field("prev", &self.prev().map(StateNode::name))
            .field("next", &self.next.name())
            .field("why", &self.why().map(Trigger::name))
            .finish()
    }
}

/// Notification that an observable machine property changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyChanged {
    pub property: &'static str,
}

impl PropertyChanged {
    /// Property name used when the current state is replaced.
    pub const CURRENT_STATE: &'static str = "current_state";
}
