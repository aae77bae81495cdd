//! Edges of a state graph.

use crate::core::{GuardFn, State, Trigger};
use crate::machine::{EffectSource, StateMachine};
use std::fmt;
use std::rc::Rc;

/// Code run when a state is entered or left.
///
/// Receives the machine and the trigger that caused the transition, if any.
/// A hook may dispose the machine; the engine checks for that right after.
pub type Hook<S> = Rc<dyn Fn(&StateMachine<S>, Option<&Trigger<S>>)>;

/// A transition from one state to another, fired by a named trigger.
pub struct Transition<S: State> {
    pub from: S,
    pub trigger: String,
    pub to: S,
    pub guard: Option<GuardFn<S>>,
    pub effect: Option<EffectSource<S>>,
}

impl<S: State> Transition<S> {
    /// Whether this transition leaves `state` on the trigger called `trigger`.
    ///
    /// Trigger names are compared exactly.
    pub fn matches(&self, state: &S, trigger: &str) -> bool {
        &self.from == state && self.trigger == trigger
    }

    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }
}

impl<S: State> Clone for Transition<S> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            trigger: self.trigger.clone(),
            to: self.to.clone(),
            guard: self.guard.clone(),
            effect: self.effect.clone(),
        }
    }
}

impl<S: State> fmt::Debug for Transition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("trigger", &self.trigger)
            .field("to", &self.to)
            .field("guarded", &self.guard.is_some())
            .field("effect", &self.effect.is_some())
            .finish()
    }
}
