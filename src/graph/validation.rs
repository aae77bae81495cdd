//! Structural checks run when a graph is built.

use super::violations::GraphViolation;
use super::StateGraph;
use crate::core::State;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Validate `graph`, accumulating every violation rather than stopping at the
/// first.
///
/// Checked:
/// - every trigger name is non-empty
/// - every condition state the graph mentions has at least one way out
/// - no condition state transitions straight back into itself, which would
///   recurse without bound
pub fn validate<S: State>(graph: &StateGraph<S>) -> Validation<(), NonEmptyVec<GraphViolation>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<GraphViolation>>> = Vec::new();

    for transition in graph.transitions() {
        if transition.trigger.is_empty() {
            checks.push(Validation::fail(GraphViolation::EmptyTriggerName {
                state: transition.from.name().to_string(),
            }));
        }

        if transition.from.is_condition() && transition.to == transition.from {
            checks.push(Validation::fail(GraphViolation::ConditionSelfLoop {
                state: transition.from.name().to_string(),
                trigger: transition.trigger.clone(),
            }));
        }
    }

    for state in graph.states() {
        if state.is_condition() && graph.trigger_names(state).is_empty() {
            checks.push(Validation::fail(GraphViolation::ConditionWithoutTriggers {
                state: state.name().to_string(),
            }));
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::simple_transition;
    use crate::graph::Transition;

    crate::state_enum! {
        enum Gate {
            Shut,
            Check,
            Open,
        }
        condition: [Check]
    }

    fn graph(transitions: Vec<Transition<Gate>>) -> StateGraph<Gate> {
        StateGraph::new(transitions, Vec::new(), Vec::new())
    }

    #[test]
    fn well_formed_graph_passes() {
        let graph = graph(vec![
            simple_transition(Gate::Shut, "Push", Gate::Check),
            simple_transition(Gate::Check, "Unlocked", Gate::Open),
        ]);

        assert!(validate(&graph).is_success());
    }

    #[test]
    fn violations_accumulate() {
        let graph = graph(vec![
            simple_transition(Gate::Shut, "", Gate::Check),
            simple_transition(Gate::Open, "Close", Gate::Shut),
        ]);

        match validate(&graph) {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, GraphViolation::EmptyTriggerName { .. })));
                assert!(errors.iter().any(|e| matches!(
                    e,
                    GraphViolation::ConditionWithoutTriggers { state } if state == "Check"
                )));
            }
            Validation::Success(_) => panic!("Expected violations, got success"),
        }
    }

    #[test]
    fn condition_self_loop_is_rejected() {
        let graph = graph(vec![
            simple_transition(Gate::Shut, "Push", Gate::Check),
            simple_transition(Gate::Check, "Again", Gate::Check),
        ]);

        let result = validate(&graph);
        assert!(result.is_failure());
        if let Validation::Failure(errors) = result {
            assert!(errors
                .iter()
                .any(|e| matches!(e, GraphViolation::ConditionSelfLoop { .. })));
        }
    }
}
