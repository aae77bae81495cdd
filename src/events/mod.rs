//! Lifecycle notifications.
//!
//! Machines publish through [`EventSource`], a publish/subscribe channel that
//! only holds `Weak` handles to its subscribers. Keep the [`Handler`] `Rc`
//! alive for as long as you want to be notified, or call `unsubscribe`.

mod args;
mod source;

pub use args::{PropertyChanged, TransitionEvent};
pub use source::{handler, EventSource, Handler};
