//! Lookup store interface.
//!
//! The engine's only external I/O boundary. A store answers one question:
//! given ids and a category, which of them have a display name. Ids it does
//! not recognise are simply absent from the answer.

mod memory;
mod sqlite;

pub use memory::*;
pub use sqlite::*;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::db::DbError;
use crate::models::{Category, LookupName, Source};

/// Store errors. Any of these means the lookup itself failed, as opposed
/// to an id simply not being found.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Lookup task failed: {0}")]
    Task(String),

    #[error("Lookup store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A read-only lookup source.
#[async_trait]
pub trait LookupStore: Send + Sync {
    /// Return `{ id, name }` for every id found in `category`.
    ///
    /// One round trip per call. Missing ids are not an error.
    async fn batch_get(&self, ids: &[String], category: Category) -> StoreResult<Vec<LookupName>>;
}

/// The set of stores a hydration call may read from.
#[derive(Clone)]
pub struct LookupStores {
    master: Arc<dyn LookupStore>,
    inventory: Option<Arc<dyn LookupStore>>,
}

impl LookupStores {
    /// Stores backed by master data only.
    pub fn new(master: Arc<dyn LookupStore>) -> Self {
        Self {
            master,
            inventory: None,
        }
    }

    /// Register the inventory store as the secondary medicine source.
    pub fn with_inventory(mut self, inventory: Arc<dyn LookupStore>) -> Self {
        self.inventory = Some(inventory);
        self
    }

    /// Get the store behind a source, if one is registered.
    pub fn get(&self, source: Source) -> Option<&dyn LookupStore> {
        match source {
            Source::MasterData => Some(self.master.as_ref()),
            Source::Inventory => self.inventory.as_deref(),
        }
    }
}

impl std::fmt::Debug for LookupStores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupStores")
            .field("inventory", &self.inventory.is_some())
            .finish_non_exhaustive()
    }
}
