//! SQLite-backed lookup stores.
//!
//! rusqlite is blocking, so every query is offloaded to
//! `tokio::task::spawn_blocking` behind a shared `Mutex<Database>`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{LookupStore, StoreError, StoreResult};
use crate::db::{Database, DbResult};
use crate::models::{Category, LookupName};

/// Run a database closure on the blocking pool.
async fn with_db<T, F>(db: &Arc<Mutex<Database>>, f: F) -> StoreResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Database) -> DbResult<T> + Send + 'static,
{
    let db = Arc::clone(db);
    tokio::task::spawn_blocking(move || {
        let guard = db
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("Lock poisoned: {}", e)))?;
        f(&guard).map_err(StoreError::from)
    })
    .await
    .map_err(|e| StoreError::Task(e.to_string()))?
}

/// The shared `master_data` table.
#[derive(Clone)]
pub struct MasterDataStore {
    db: Arc<Mutex<Database>>,
}

impl MasterDataStore {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LookupStore for MasterDataStore {
    async fn batch_get(&self, ids: &[String], category: Category) -> StoreResult<Vec<LookupName>> {
        let ids = ids.to_vec();
        with_db(&self.db, move |db| db.batch_lookup_names(category, &ids)).await
    }
}

/// The `inventory_medicines` table. Answers the medicines category only.
#[derive(Clone)]
pub struct InventoryStore {
    db: Arc<Mutex<Database>>,
}

impl InventoryStore {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LookupStore for InventoryStore {
    async fn batch_get(&self, ids: &[String], category: Category) -> StoreResult<Vec<LookupName>> {
        if category != Category::Medicines {
            tracing::debug!(category = %category, "Inventory holds medicines only");
            return Ok(Vec::new());
        }
        let ids = ids.to_vec();
        with_db(&self.db, move |db| db.batch_inventory_names(&ids)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InventoryMedicine, LookupEntry};

    fn shared_db() -> Arc<Mutex<Database>> {
        Arc::new(Mutex::new(Database::open_in_memory().unwrap()))
    }

    #[tokio::test]
    async fn test_master_data_store() {
        let db = shared_db();
        let entry = LookupEntry::new(Category::EyeSelection, "Both eyes".into());
        db.lock().unwrap().upsert_lookup_entry(&entry).unwrap();

        let store = MasterDataStore::new(db);
        let names = store
            .batch_get(&[entry.id.clone()], Category::EyeSelection)
            .await
            .unwrap();
        assert_eq!(names, vec![LookupName { id: entry.id.clone(), name: "Both eyes".into() }]);

        let names = store
            .batch_get(&[entry.id.clone()], Category::Routes)
            .await
            .unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn test_inventory_store_answers_medicines_only() {
        let db = shared_db();
        let medicine = InventoryMedicine::new("Brimonidine".into());
        db.lock().unwrap().upsert_inventory_medicine(&medicine).unwrap();

        let store = InventoryStore::new(db);
        let names = store
            .batch_get(&[medicine.id.clone()], Category::Medicines)
            .await
            .unwrap();
        assert_eq!(names.len(), 1);

        let names = store
            .batch_get(&[medicine.id.clone()], Category::Dosages)
            .await
            .unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_unavailable() {
        let db = shared_db();
        let poison = Arc::clone(&db);
        let _ = std::thread::spawn(move || {
            let _guard = poison.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let store = MasterDataStore::new(db);
        let result = store
            .batch_get(&["x".to_string()], Category::Medicines)
            .await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
