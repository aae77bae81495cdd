//! Runtime options for a machine.

use serde::{Deserialize, Serialize};

/// Tunables a host may set when building a machine.
///
/// Missing fields fall back to their defaults when deserialized, so a host can
/// keep a partial options block in its own configuration file.
///
/// ```rust
/// use statehost::machine::MachineOptions;
///
/// let options: MachineOptions = serde_json::from_str(r#"{ "name": "checkout" }"#).unwrap();
/// assert_eq!(options.name, "checkout");
/// assert!(!options.pump_on_enqueue);
/// assert_eq!(options.history_limit, MachineOptions::DEFAULT_HISTORY_LIMIT);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineOptions {
    /// Name used in logs.
    pub name: String,

    /// Pump the scheduler synchronously after every enqueue.
    ///
    /// Mirrors hosts whose dispatch step drains pending callbacks before
    /// returning. Pending ticks may then run inside the caller's stack, which
    /// is why the trigger queue refuses to run while a guard is evaluating.
    pub pump_on_enqueue: bool,

    /// Committed transitions kept in the machine's history. Zero disables it.
    pub history_limit: usize,
}

impl MachineOptions {
    pub const DEFAULT_NAME: &'static str = "unnamed";
    pub const DEFAULT_HISTORY_LIMIT: usize = 64;
}

impl Default for MachineOptions {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            pump_on_enqueue: false,
            history_limit: Self::DEFAULT_HISTORY_LIMIT,
        }
    }
}
