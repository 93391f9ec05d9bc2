//! Reference resolver.
//!
//! Pipeline: Classifier → Fallback Chain → Batch Fetcher → Field Resolver

mod chain;
mod classifier;
mod fetcher;
mod records;
mod scalar;
mod tree;

pub use chain::*;
pub use classifier::*;
pub use fetcher::*;
pub use records::*;
pub use scalar::*;
pub use tree::*;

use std::collections::BTreeSet;

use serde_json::Value;

/// Output of a field resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// The hydrated field value
    pub value: Value,
    /// Id-shaped values no chain step matched, left as their raw id
    pub unresolved: BTreeSet<String>,
}

impl Resolved {
    /// A value that needed no lookups.
    pub fn unchanged(value: Value) -> Self {
        Self {
            value,
            unresolved: BTreeSet::new(),
        }
    }
}
