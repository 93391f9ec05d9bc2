//! Ordered fallback chains over (store, category) pairs.
//!
//! The chains below are the only place a field's lookup order is decided.

use std::collections::BTreeSet;

use crate::models::{Category, Source};
use crate::store::{LookupStores, StoreResult};

use super::{fetch_names, NameMap};

/// One step of a fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainStep {
    pub source: Source,
    pub category: Category,
}

impl ChainStep {
    pub const fn new(source: Source, category: Category) -> Self {
        Self { source, category }
    }

    /// A step against the shared master-data table.
    pub const fn master(category: Category) -> Self {
        Self::new(Source::MasterData, category)
    }
}

/// Master data first, then the medicine inventory.
pub const MEDICINE_CHAIN: &[ChainStep] = &[
    ChainStep::master(Category::Medicines),
    ChainStep::new(Source::Inventory, Category::Medicines),
];

/// Specific surgeries first, then the broader surgery types.
pub const SURGERY_CHAIN: &[ChainStep] = &[
    ChainStep::master(Category::Surgeries),
    ChainStep::master(Category::SurgeryTypes),
];

pub const DOSAGE_CHAIN: &[ChainStep] = &[ChainStep::master(Category::Dosages)];
pub const ROUTE_CHAIN: &[ChainStep] = &[ChainStep::master(Category::Routes)];
pub const EYE_CHAIN: &[ChainStep] = &[ChainStep::master(Category::EyeSelection)];
pub const DIAGNOSIS_CHAIN: &[ChainStep] = &[ChainStep::master(Category::Diagnosis)];
pub const COMPLAINT_CHAIN: &[ChainStep] = &[ChainStep::master(Category::Complaints)];
pub const COMPLAINT_CATEGORY_CHAIN: &[ChainStep] =
    &[ChainStep::master(Category::ComplaintCategories)];
pub const DIAGNOSTIC_TEST_CHAIN: &[ChainStep] = &[ChainStep::master(Category::DiagnosticTests)];
pub const ANESTHESIA_CHAIN: &[ChainStep] = &[ChainStep::master(Category::AnesthesiaTypes)];
pub const VISUAL_ACUITY_CHAIN: &[ChainStep] = &[ChainStep::master(Category::VisualAcuity)];
pub const BLOOD_TEST_CHAIN: &[ChainStep] = &[ChainStep::master(Category::BloodTests)];

/// Resolve `ids` against each chain step in turn.
///
/// Each step only sees the ids every earlier step missed, so the first match
/// wins. Steps whose source is not registered are skipped. Ids left over
/// after the last step are absent from the result.
pub async fn resolve_with_fallback(
    stores: &LookupStores,
    ids: &BTreeSet<String>,
    chain: &[ChainStep],
) -> StoreResult<NameMap> {
    let mut resolved = NameMap::new();
    let mut residual = ids.clone();

    for step in chain {
        if residual.is_empty() {
            break;
        }

        let Some(store) = stores.get(step.source) else {
            tracing::debug!(
                source = %step.source,
                category = %step.category,
                "Skipping chain step with no registered store"
            );
            continue;
        };

        let found = fetch_names(store, &residual, step.category).await?;
        residual.retain(|id| !found.contains(id));
        resolved.merge_missing(found);
    }

    Ok(resolved)
}
