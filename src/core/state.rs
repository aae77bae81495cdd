//! Core State trait for state machine states.
//!
//! A machine's states form a closed set, normally an enum. Each variant names
//! one state; whether it is a pass-through condition state is a property of
//! the variant itself.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: the graph hands out target states by value
/// - `PartialEq`: transitions are matched against the current state
/// - `Debug`: states show up in logs and assertions
/// - `Serialize` + `Deserialize`: transition history is serializable
///
/// # Example
///
/// ```rust
/// use statehost::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Door {
///     Closed,
///     CheckLock,
///     Open,
///     Locked,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Closed => "Closed",
///             Self::CheckLock => "CheckLock",
///             Self::Open => "Open",
///             Self::Locked => "Locked",
///         }
///     }
///
///     fn is_condition(&self) -> bool {
///         matches!(self, Self::CheckLock)
///     }
/// }
/// ```
pub trait State: Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + 'static {
    /// The state's name, used for display, logging and trigger tables.
    fn name(&self) -> &str;

    /// Whether this is a condition state.
    ///
    /// Entering a condition state immediately processes its own triggers, in
    /// definition order, until one of them completes a further transition.
    ///
    /// Default implementation returns `false`.
    fn is_condition(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Decide,
        Running,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Decide => "Decide",
                Self::Running => "Running",
            }
        }

        fn is_condition(&self) -> bool {
            matches!(self, Self::Decide)
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Idle.name(), "Idle");
        assert_eq!(TestState::Decide.name(), "Decide");
        assert_eq!(TestState::Running.name(), "Running");
    }

    #[test]
    fn is_condition_identifies_pass_through_states() {
        assert!(!TestState::Idle.is_condition());
        assert!(TestState::Decide.is_condition());
        assert!(!TestState::Running.is_condition());
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::Running;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
