//! Shared lookup store doubles for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use case_hydrate_core::models::{Category, LookupName};
use case_hydrate_core::store::{InMemoryLookupStore, LookupStore, StoreError, StoreResult};

pub const ATROPINE: &str = "11111111-1111-1111-1111-111111111111";
pub const DIABETIC_RETINOPATHY: &str = "22222222-2222-2222-2222-222222222222";
pub const PHACO: &str = "33333333-3333-3333-3333-333333333333";
pub const ONE_DROP: &str = "44444444-4444-4444-4444-444444444444";
pub const TOPICAL: &str = "55555555-5555-5555-5555-555555555555";
pub const SIX_SIX: &str = "66666666-6666-6666-6666-666666666666";
pub const RIGHT_EYE: &str = "77777777-7777-7777-7777-777777777777";
pub const HBA1C: &str = "88888888-8888-8888-8888-888888888888";
pub const UNKNOWN: &str = "99999999-9999-9999-9999-999999999999";
pub const TIMOLOL: &str = "aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa";
pub const OCT: &str = "bbbbbbbb-bbbb-4bbb-8bbb-bbbbbbbbbbbb";
pub const REDNESS: &str = "cccccccc-cccc-4ccc-8ccc-cccccccccccc";
pub const PERIBULBAR: &str = "dddddddd-dddd-4ddd-8ddd-dddddddddddd";
pub const ANTERIOR_SEGMENT: &str = "eeeeeeee-eeee-4eee-8eee-eeeeeeeeeeee";

/// Master data covering every category a case document touches.
pub fn clinic_master_data() -> InMemoryLookupStore {
    InMemoryLookupStore::new()
        .with_entry(Category::Medicines, ATROPINE, "Atropine")
        .with_entry(Category::Diagnosis, DIABETIC_RETINOPATHY, "Diabetic Retinopathy")
        .with_entry(Category::SurgeryTypes, PHACO, "Phacoemulsification")
        .with_entry(Category::Dosages, ONE_DROP, "1 drop")
        .with_entry(Category::Routes, TOPICAL, "Topical")
        .with_entry(Category::VisualAcuity, SIX_SIX, "6/6")
        .with_entry(Category::EyeSelection, RIGHT_EYE, "Right eye")
        .with_entry(Category::BloodTests, HBA1C, "HbA1c")
        .with_entry(Category::DiagnosticTests, OCT, "OCT Macula")
        .with_entry(Category::Complaints, REDNESS, "Redness")
        .with_entry(Category::ComplaintCategories, ANTERIOR_SEGMENT, "Anterior segment")
        .with_entry(Category::AnesthesiaTypes, PERIBULBAR, "Peribulbar block")
}

/// Medicines only held in the clinic's inventory.
pub fn clinic_inventory() -> InMemoryLookupStore {
    InMemoryLookupStore::new().with_entry(Category::Medicines, TIMOLOL, "Timolol 0.5%")
}

/// Records every `batch_get` call before delegating.
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryLookupStore,
    calls: Mutex<Vec<(Category, usize)>>,
}

impl CountingStore {
    pub fn new(inner: InMemoryLookupStore) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Total number of calls.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of calls per category.
    pub fn calls_by_category(&self) -> HashMap<Category, usize> {
        let mut counts = HashMap::new();
        for (category, _) in self.calls.lock().unwrap().iter() {
            *counts.entry(*category).or_insert(0) += 1;
        }
        counts
    }

    /// Size of each request in call order.
    pub fn request_sizes(&self, category: Category) -> Vec<usize> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == category)
            .map(|(_, n)| *n)
            .collect()
    }
}

#[async_trait]
impl LookupStore for CountingStore {
    async fn batch_get(&self, ids: &[String], category: Category) -> StoreResult<Vec<LookupName>> {
        self.calls.lock().unwrap().push((category, ids.len()));
        self.inner.batch_get(ids, category).await
    }
}

/// Fails every call for the given categories.
pub struct FailingStore {
    inner: InMemoryLookupStore,
    failing: HashSet<Category>,
}

impl FailingStore {
    pub fn new(inner: InMemoryLookupStore, failing: impl IntoIterator<Item = Category>) -> Self {
        Self {
            inner,
            failing: failing.into_iter().collect(),
        }
    }
}

#[async_trait]
impl LookupStore for FailingStore {
    async fn batch_get(&self, ids: &[String], category: Category) -> StoreResult<Vec<LookupName>> {
        if self.failing.contains(&category) {
            return Err(StoreError::Unavailable(format!(
                "{} backend unreachable",
                category
            )));
        }
        self.inner.batch_get(ids, category).await
    }
}

/// Never answers.
pub struct PendingStore;

#[async_trait]
impl LookupStore for PendingStore {
    async fn batch_get(&self, _ids: &[String], _category: Category) -> StoreResult<Vec<LookupName>> {
        std::future::pending().await
    }
}

pub fn shared<S: LookupStore + 'static>(store: S) -> Arc<S> {
    Arc::new(store)
}
