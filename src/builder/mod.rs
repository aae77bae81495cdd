//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and macros for describing state
//! graphs and creating machines with minimal boilerplate while keeping the
//! state type checked.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use transition::{StateGraphBuilder, TransitionBuilder};

use crate::core::State;
use crate::graph::Transition;
use crate::machine::{EffectSource, StateMachine};
use std::rc::Rc;

/// Create an unguarded transition with no effect.
///
/// # Example
///
/// ```
/// use statehost::builder::simple_transition;
/// use statehost::state_enum;
///
/// state_enum! {
///     enum MyState {
///         Start,
///         End,
///     }
/// }
///
/// let transition = simple_transition(MyState::Start, "Finish", MyState::End);
/// assert!(transition.matches(&MyState::Start, "Finish"));
/// ```
pub fn simple_transition<S: State>(from: S, trigger: impl Into<String>, to: S) -> Transition<S> {
    Transition {
        from,
        trigger: trigger.into(),
        to,
        guard: None,
        effect: None,
    }
}

/// Create a transition with a guard predicate.
///
/// # Example
///
/// ```
/// use statehost::builder::guarded_transition;
/// use statehost::state_enum;
///
/// state_enum! {
///     enum MyState {
///         Start,
///         Middle,
///     }
/// }
///
/// let transition = guarded_transition(MyState::Start, "Next", MyState::Middle, |m| {
///     m.depth() < 2
/// });
/// assert!(transition.is_guarded());
/// ```
pub fn guarded_transition<S, F>(from: S, trigger: impl Into<String>, to: S, guard: F) -> Transition<S>
where
    S: State,
    F: Fn(&StateMachine<S>) -> bool + 'static,
{
    Transition {
        from,
        trigger: trigger.into(),
        to,
        guard: Some(Rc::new(guard)),
        effect: None,
    }
}

/// Create a transition that raises `effect` one tick after it commits.
pub fn effect_transition<S: State>(
    from: S,
    trigger: impl Into<String>,
    to: S,
    effect: &EffectSource<S>,
) -> Transition<S> {
    Transition {
        from,
        trigger: trigger.into(),
        to,
        guard: None,
        effect: Some(Rc::clone(effect)),
    }
}
