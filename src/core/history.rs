//! State transition history tracking.
//!
//! Every committed state swap is journaled with its timestamp, the trigger
//! that caused it and how deeply nested the swap was (condition states resolve
//! through nested transitions).

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single committed state swap.
///
/// # Example
///
/// ```rust
/// use statehost::core::{State, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum TaskState {
///     Pending,
///     Running,
/// }
///
/// impl State for TaskState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Pending => "Pending",
///             Self::Running => "Running",
///         }
///     }
/// }
///
/// let transition = StateTransition {
///     from: Some(TaskState::Pending),
///     to: TaskState::Running,
///     trigger: Some("Run".to_string()),
///     timestamp: Utc::now(),
///     depth: 1,
/// };
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being left, `None` for the first swap of a machine
    pub from: Option<S>,
    /// The state being entered
    pub to: S,
    /// Name of the trigger that caused the swap, if any
    pub trigger: Option<String>,
    /// When the swap was committed
    pub timestamp: DateTime<Utc>,
    /// Transition nesting depth at commit time (1 for a top-level transition)
    pub depth: usize,
}

/// Ordered history of state transitions.
///
/// `record` is pure and returns a new history; the machine's own journal is
/// appended in place and trimmed to its configured limit.
///
/// # Example
///
/// ```rust
/// use statehost::core::{State, StateHistory, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum WorkState {
///     Start,
///     Middle,
///     End,
/// }
///
/// impl State for WorkState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Start => "Start",
///             Self::Middle => "Middle",
///             Self::End => "End",
///         }
///     }
/// }
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: Some(WorkState::Start),
///         to: WorkState::Middle,
///         trigger: None,
///         timestamp: Utc::now(),
///         depth: 1,
///     })
///     .record(StateTransition {
///         from: Some(WorkState::Middle),
///         to: WorkState::End,
///         trigger: None,
///         timestamp: Utc::now(),
///         depth: 1,
///     });
///
/// let path = history.get_path();
/// assert_eq!(path.len(), 3); // Start -> Middle -> End
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left untouched. This is for hosts that keep
    /// their own journal alongside the machine; the machine's journal is
    /// appended in place and capped at
    /// [`MachineOptions::history_limit`](crate::machine::MachineOptions::history_limit).
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Append in place, dropping the oldest entries beyond `limit`.
    pub(crate) fn push_bounded(&mut self, transition: StateTransition<S>, limit: usize) {
        if limit == 0 {
            return;
        }
        self.transitions.push(transition);
        if self.transitions.len() > limit {
            let excess = self.transitions.len() - limit;
            self.transitions.drain(..excess);
        }
    }

    /// Get the path of states traversed.
    ///
    /// Starts with the `from` state of the first transition when there is
    /// one, then the `to` state of each transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(from) = self.transitions.first().and_then(|t| t.from.as_ref()) {
            path.push(from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Duration from the first to the last recorded transition.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Initial,
        Processing,
        Complete,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Initial => "Initial",
                Self::Processing => "Processing",
                Self::Complete => "Complete",
            }
        }
    }

    fn swap(from: Option<TestState>, to: TestState) -> StateTransition<TestState> {
        StateTransition {
            from,
            to,
            trigger: None,
            timestamp: Utc::now(),
            depth: 1,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestState> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = StateHistory::new();
        let new_history = history.record(swap(Some(TestState::Initial), TestState::Processing));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
    }

    #[test]
    fn path_skips_missing_origin() {
        let history = StateHistory::new()
            .record(swap(None, TestState::Initial))
            .record(swap(Some(TestState::Initial), TestState::Complete));

        assert_eq!(
            history.get_path(),
            vec![&TestState::Initial, &TestState::Complete]
        );
    }

    #[test]
    fn push_bounded_keeps_newest_entries() {
        let mut history = StateHistory::new();
        history.push_bounded(swap(None, TestState::Initial), 2);
        history.push_bounded(swap(Some(TestState::Initial), TestState::Processing), 2);
        history.push_bounded(swap(Some(TestState::Processing), TestState::Complete), 2);

        assert_eq!(history.len(), 2);
        assert_eq!(history.transitions()[0].to, TestState::Processing);
        assert_eq!(history.transitions()[1].to, TestState::Complete);
    }

    #[test]
    fn zero_limit_disables_journal() {
        let mut history = StateHistory::new();
        history.push_bounded(swap(None, TestState::Initial), 0);
        assert!(history.is_empty());
    }

    #[test]
    fn history_serializes_correctly() {
        let history = StateHistory::new().record(swap(None, TestState::Initial));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<TestState> = serde_json::from_str(&json).unwrap();

        assert_eq!(history.len(), deserialized.len());
        assert_eq!(deserialized.transitions()[0].to, TestState::Initial);
    }
}
