//! Case-Hydrate Core Library
//!
//! Reference-resolution engine for clinical case documents. Case records are
//! stored with opaque ids pointing into a category-partitioned lookup store;
//! hydration replaces those ids with display names on the way out.
//!
//! # Architecture
//!
//! ```text
//!                         Case Document (JSON)
//!                                 │
//!                         ┌───────▼────────┐
//!                         │   Hydrator     │  which fields are present?
//!                         └───────┬────────┘
//!          ┌──────────────────────┼──────────────────────┐
//!          ▼                      ▼                      ▼
//!   Record arrays          Scalar-or-array         Nested objects
//!  (treatments, ...)      (diagnosis, ...)         (visionData)
//!          │                      │                      │
//!          └──────────────────────┼──────────────────────┘
//!                                 │  id-shaped values only
//!                         ┌───────▼────────┐
//!                         │ Fallback Chain │  master data → inventory
//!                         └───────┬────────┘
//!                                 │  one batch per (source, category)
//!                         ┌───────▼────────┐
//!                         │  LookupStore   │  SQLite / in-memory
//!                         └────────────────┘
//! ```
//!
//! # Core Principle
//!
//! **Hydration never loses data.** Unresolved ids stay as they were, legacy
//! free-text values pass through, and a failing lookup leaves its field as
//! stored.
//!
//! # Modules
//!
//! - [`db`]: SQLite lookup tables
//! - [`models`]: Categories, sources and lookup rows
//! - [`store`]: The async lookup store seam
//! - [`resolver`]: Classifier, batch fetcher, fallback chains and field resolvers
//! - [`hydrator`]: Document orchestrator
//! - [`config`]: Engine tunables

pub mod config;
pub mod db;
pub mod hydrator;
pub mod models;
pub mod resolver;
pub mod store;

// Re-export commonly used types
pub use config::HydrationConfig;
pub use db::{Database, DbError};
pub use hydrator::{
    FieldFailure, HydrateError, Hydrated, Hydrator, UnresolvedReference, CASE_FIELDS,
};
pub use models::{Category, InventoryMedicine, LookupEntry, LookupName, Source};
pub use resolver::{is_reference, Resolved};
pub use store::{
    InMemoryLookupStore, InventoryStore, LookupStore, LookupStores, MasterDataStore, StoreError,
};
