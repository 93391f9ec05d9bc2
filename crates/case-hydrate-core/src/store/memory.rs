//! In-memory lookup store.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{LookupStore, StoreResult};
use crate::models::{Category, LookupEntry, LookupName};

/// Lookup store held entirely in memory. Ids are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLookupStore {
    entries: HashMap<(Category, String), LookupName>,
}

impl InMemoryLookupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, category: Category, id: &str, name: &str) {
        self.entries.insert(
            (category, id.to_lowercase()),
            LookupName {
                id: id.to_string(),
                name: name.to_string(),
            },
        );
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_entry(mut self, category: Category, id: &str, name: &str) -> Self {
        self.insert(category, id, name);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<LookupEntry> for InMemoryLookupStore {
    fn from_iter<I: IntoIterator<Item = LookupEntry>>(iter: I) -> Self {
        let mut store = Self::new();
        for entry in iter {
            store.insert(entry.category, &entry.id, &entry.name);
        }
        store
    }
}

#[async_trait]
impl LookupStore for InMemoryLookupStore {
    async fn batch_get(&self, ids: &[String], category: Category) -> StoreResult<Vec<LookupName>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.entries.get(&(category, id.to_lowercase())))
            .cloned()
            .collect())
    }
}
