//! Resolver for arrays of structured records.
//!
//! Each record carries several reference sub-fields (drug, dosage, route,
//! eye...). All records' values for one sub-field are resolved with a single
//! chain call, then the array is re-walked once to attach companions:
//!
//! - `name_key`: the resolved name, the literal unchanged, or the raw id when
//!   nothing matched
//! - `{name_key}_original`: the raw id, only when the value was id-shaped

use std::collections::BTreeSet;

use futures::future::try_join_all;
use serde_json::{Map, Value};

use crate::store::{LookupStores, StoreResult};

use super::chain::*;
use super::{canonical_id, is_reference, resolve_with_fallback, NameMap, Resolved};

/// One reference-bearing sub-field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordField {
    /// Key holding the stored reference or legacy literal
    pub source_key: &'static str,
    /// Key receiving the display name
    pub name_key: &'static str,
    pub chain: &'static [ChainStep],
}

impl RecordField {
    pub const fn new(
        source_key: &'static str,
        name_key: &'static str,
        chain: &'static [ChainStep],
    ) -> Self {
        Self {
            source_key,
            name_key,
            chain,
        }
    }

    /// A sub-field whose display name replaces the stored value.
    pub const fn in_place(key: &'static str, chain: &'static [ChainStep]) -> Self {
        Self::new(key, key, chain)
    }

    pub fn original_key(&self) -> String {
        format!("{}_original", self.name_key)
    }
}

const EYE: RecordField = RecordField::new("eye_id", "eye_name", EYE_CHAIN);
const DOSAGE: RecordField = RecordField::new("dosage_id", "dosage_name", DOSAGE_CHAIN);
const ROUTE: RecordField = RecordField::new("route_id", "route_name", ROUTE_CHAIN);

pub const TREATMENT_FIELDS: &[RecordField] = &[
    RecordField::new("drug_id", "drug_name", MEDICINE_CHAIN),
    DOSAGE,
    ROUTE,
    EYE,
];

pub const COMPLAINT_FIELDS: &[RecordField] = &[
    RecordField::new("complaint_id", "complaint_name", COMPLAINT_CHAIN),
    RecordField::new("category_id", "category_name", COMPLAINT_CATEGORY_CHAIN),
    EYE,
];

pub const DIAGNOSTIC_TEST_FIELDS: &[RecordField] = &[
    RecordField::new("test_id", "test_name", DIAGNOSTIC_TEST_CHAIN),
    EYE,
];

pub const PAST_MEDICATION_FIELDS: &[RecordField] = &[
    RecordField::new("medicine_id", "medicine_name", MEDICINE_CHAIN),
    DOSAGE,
    ROUTE,
    EYE,
];

pub const PAST_TREATMENT_FIELDS: &[RecordField] = &[
    RecordField::new("treatment_id", "treatment_name", SURGERY_CHAIN),
    EYE,
];

pub const SURGERY_FIELDS: &[RecordField] = &[
    RecordField::in_place("surgery_name", SURGERY_CHAIN),
    RecordField::in_place("anesthesia_type", ANESTHESIA_CHAIN),
    EYE,
];

/// The stored value of a sub-field. Missing, null, empty and non-string
/// values all count as absent.
fn stored_value<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Hydrate every record in `records` according to `fields`.
pub async fn resolve_records(
    stores: &LookupStores,
    records: &[Value],
    fields: &[RecordField],
) -> StoreResult<Resolved> {
    if records.is_empty() {
        return Ok(Resolved::unchanged(Value::Array(Vec::new())));
    }

    let lookups = fields.iter().map(|field| {
        let ids: BTreeSet<String> = records
            .iter()
            .filter_map(|record| stored_value(record, field.source_key))
            .filter(|value| is_reference(value))
            .map(canonical_id)
            .collect();

        async move {
            if ids.is_empty() {
                return Ok(NameMap::new());
            }
            resolve_with_fallback(stores, &ids, field.chain).await
        }
    });
    let names = try_join_all(lookups).await?;

    let mut unresolved = BTreeSet::new();
    let mut hydrated = Vec::with_capacity(records.len());

    for record in records {
        let Value::Object(map) = record else {
            hydrated.push(record.clone());
            continue;
        };

        let mut out: Map<String, Value> = map.clone();
        for (field, names) in fields.iter().zip(&names) {
            let Some(raw) = stored_value(record, field.source_key) else {
                continue;
            };

            if is_reference(raw) {
                let name = match names.get(raw) {
                    Some(name) => name.to_string(),
                    None => {
                        unresolved.insert(raw.to_string());
                        raw.to_string()
                    }
                };
                out.insert(field.name_key.to_string(), Value::String(name));
                out.insert(field.original_key(), Value::String(raw.to_string()));
            } else {
                out.insert(field.name_key.to_string(), Value::String(raw.to_string()));
            }
        }
        hydrated.push(Value::Object(out));
    }

    Ok(Resolved {
        value: Value::Array(hydrated),
        unresolved,
    })
}
