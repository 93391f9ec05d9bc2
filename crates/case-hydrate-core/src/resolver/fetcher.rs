//! Batch name fetcher.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use crate::models::Category;
use crate::store::{LookupStore, StoreResult};

use super::canonical_id;

/// Resolved display names keyed by canonical (lower-case) id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMap {
    names: HashMap<String, String>,
}

impl NameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a name by id in any case.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(&canonical_id(id)).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.names.contains_key(&canonical_id(id))
    }

    /// Insert unless the id already has a name. Returns whether it was inserted.
    pub fn insert_first(&mut self, id: &str, name: String) -> bool {
        match self.names.entry(canonical_id(id)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(name);
                true
            }
        }
    }

    /// Merge `other` in; names already present win.
    pub fn merge_missing(&mut self, other: NameMap) {
        for (id, name) in other.names {
            self.names.entry(id).or_insert(name);
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Fetch display names for `ids` from one store category in a single call.
///
/// `ids` must already be canonical. An empty set returns an empty map without
/// touching the store. Rows for ids that were not requested are ignored.
pub async fn fetch_names(
    store: &dyn LookupStore,
    ids: &BTreeSet<String>,
    category: Category,
) -> StoreResult<NameMap> {
    let mut names = NameMap::new();
    if ids.is_empty() {
        return Ok(names);
    }

    let request: Vec<String> = ids.iter().cloned().collect();
    let rows = store.batch_get(&request, category).await?;

    for row in rows {
        let id = canonical_id(&row.id);
        if ids.contains(&id) {
            names.insert_first(&id, row.name);
        }
    }

    tracing::debug!(
        category = %category,
        requested = ids.len(),
        found = names.len(),
        "Batch lookup"
    );

    Ok(names)
}
