//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Tunables for a hydration call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydrationConfig {
    /// Nested objects are not descended past this depth.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// A nested-object walk stops after visiting this many values.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
}

fn default_max_depth() -> usize {
    64
}

fn default_max_nodes() -> usize {
    10_000
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_nodes: default_max_nodes(),
        }
    }
}
