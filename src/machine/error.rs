//! Errors surfaced by the transition engine.

use thiserror::Error;

/// Fatal conditions raised while running a state machine.
///
/// Guard rejections and operations on a disposed machine are not errors: they
/// show up as `Ok(false)` or as silent no-ops. Everything here points at a
/// defect in the state graph or in the engine itself.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("State {state} has no trigger {trigger}")]
    UnknownTrigger { state: String, trigger: String },

    #[error("Condition state {state} blocked: none of its triggers completed a transition")]
    ConditionStateBlocked { state: String },

    #[error("Transition depth dropped below zero")]
    ReentrancyUnderflow,

    #[error("Scheduler still busy after {limit} turns")]
    TurnLimitExceeded { limit: usize },
}
