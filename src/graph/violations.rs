//! Structural problems found while validating a state graph.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphViolation {
    #[error("Condition state {state} has no outgoing transitions")]
    ConditionWithoutTriggers { state: String },

    #[error("Transition out of {state} has an empty trigger name")]
    EmptyTriggerName { state: String },

    #[error("Condition state {state} loops back to itself on trigger {trigger}")]
    ConditionSelfLoop { state: String, trigger: String },
}
