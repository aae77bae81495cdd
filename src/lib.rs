//! Statehost: an event-driven state machine engine for long-lived objects.
//!
//! A host object (a form, a document, a connection) owns a [`StateMachine`].
//! Callers fire named triggers; the machine queues them and consumes them on a
//! later scheduler tick, running the transition algorithm: guard, exit hooks,
//! commit, deferred effect, then either entry hooks or, for a condition state,
//! an immediate attempt to resolve into a further state.
//!
//! # Core Concepts
//!
//! - **State**: a closed set of variants via the `State` trait
//! - **Graph**: transitions keyed by trigger name, with guards, effects and hooks
//! - **Triggers**: named requests, bound weakly to their machine
//! - **Scheduler**: deferred execution of the trigger and effect queues
//! - **Disposal**: a machine may be torn down from inside any of its callbacks
//!
//! # Example
//!
//! ```rust
//! use statehost::builder::{simple_transition, MachineBuilder, StateGraphBuilder};
//! use statehost::schedule::TickLoop;
//! use statehost::state_enum;
//!
//! state_enum! {
//!     enum Workflow {
//!         Initial,
//!         Processing,
//!         Complete,
//!     }
//! }
//!
//! let graph = StateGraphBuilder::new()
//!     .add_transition(simple_transition(Workflow::Initial, "Begin", Workflow::Processing))
//!     .add_transition(simple_transition(Workflow::Processing, "Finish", Workflow::Complete))
//!     .build()
//!     .unwrap();
//!
//! let tick_loop = TickLoop::new();
//! let machine = MachineBuilder::new()
//!     .graph(graph)
//!     .initial(Workflow::Initial)
//!     .scheduler(tick_loop.clone())
//!     .build()
//!     .unwrap();
//!
//! machine.start().unwrap();
//! machine.fire("Begin").unwrap();
//! tick_loop.run_until_idle().unwrap();
//!
//! assert_eq!(machine.current_state().unwrap().name(), "Processing");
//! ```

pub mod builder;
pub mod core;
pub mod events;
pub mod graph;
pub mod machine;
pub mod registry;
pub mod schedule;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder, StateGraphBuilder, TransitionBuilder};
pub use self::core::{Guard, State, StateHistory, StateNode, StateTransition, Trigger};
pub use events::{EventSource, TransitionEvent};
pub use graph::{StateGraph, Transition};
pub use machine::{MachineError, MachineOptions, StateMachine, StateMachineHost};
pub use schedule::{Scheduler, TickLoop};
