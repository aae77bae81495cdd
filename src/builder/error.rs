//! Build errors for graph, transition and machine builders.

use crate::graph::GraphViolation;
use thiserror::Error;

/// Errors that can occur when building state graphs, transitions and machines.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("State graph not specified. Call .graph(graph) before .build()")]
    MissingGraph,

    #[error("Scheduler not specified. Call .scheduler(scheduler) before .build()")]
    MissingScheduler,

    #[error("Transition source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Transition trigger not specified. Call .on(trigger)")]
    MissingTrigger,

    #[error("State graph has {} violation(s)", .0.len())]
    InvalidGraph(Vec<GraphViolation>),
}
