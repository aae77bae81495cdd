//! Core state machine types.
//!
//! This module contains the building blocks the engine works with:
//! - State definitions via the `State` trait
//! - `StateNode`, the bound state a machine sits in, with its trigger table
//! - Triggers and guards, bound weakly to their machine
//! - Transition history tracking

mod guard;
mod history;
mod node;
mod state;
mod trigger;

pub use guard::{Guard, GuardFn};
pub use history::{StateHistory, StateTransition};
pub use node::{StateNode, DISPOSED_STATE_NAME};
pub use state::State;
pub use trigger::{trigger_key, Trigger, TRIGGER_SUFFIX};
