//! Case document orchestrator.
//!
//! Finds every known reference-bearing field in a case document, resolves the
//! present, non-empty ones concurrently, and merges the results into a copy of
//! the document. A store failure on one field leaves that field as stored and
//! does not affect the others.

use futures::future::join_all;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::HydrationConfig;
use crate::resolver::{
    resolve_records, resolve_scalar_or_array, resolve_tree, ChainStep, RecordField, Resolved,
    TreeLimits, BLOOD_TEST_CHAIN, COMPLAINT_FIELDS, DIAGNOSIS_CHAIN, DIAGNOSTIC_TEST_FIELDS,
    PAST_MEDICATION_FIELDS, PAST_TREATMENT_FIELDS, SURGERY_FIELDS, TREATMENT_FIELDS,
    VISUAL_ACUITY_CHAIN,
};
use crate::store::{LookupStores, StoreError, StoreResult};

/// Hydration errors. Store failures are not here: they are isolated per
/// field and reported in [`Hydrated::failures`].
#[derive(Error, Debug)]
pub enum HydrateError {
    #[error("Malformed document: `{field}` must be {expected}")]
    MalformedDocument {
        field: String,
        expected: &'static str,
    },
}

pub type HydrateResult<T> = Result<T, HydrateError>;

/// How a field is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Array of objects with reference sub-fields
    Records(&'static [RecordField]),
    /// One string or an array of strings
    ScalarOrArray(&'static [ChainStep]),
    /// Free-form nested object
    Tree(&'static [ChainStep]),
}

impl FieldKind {
    fn expected(&self) -> &'static str {
        match self {
            FieldKind::Records(_) => "an array",
            FieldKind::ScalarOrArray(_) => "a string or an array",
            FieldKind::Tree(_) => "an object",
        }
    }
}

/// A hydratable field, addressed by object keys from the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlot {
    pub path: &'static [&'static str],
    pub kind: FieldKind,
}

impl FieldSlot {
    pub const fn new(path: &'static [&'static str], kind: FieldKind) -> Self {
        Self { path, kind }
    }

    /// Dotted path, e.g. `examinationData.surgeries`.
    pub fn name(&self) -> String {
        self.path.join(".")
    }
}

/// Every field of a case document that carries references.
pub const CASE_FIELDS: &[FieldSlot] = &[
    FieldSlot::new(&["treatments"], FieldKind::Records(TREATMENT_FIELDS)),
    FieldSlot::new(&["complaints"], FieldKind::Records(COMPLAINT_FIELDS)),
    FieldSlot::new(&["diagnosticTests"], FieldKind::Records(DIAGNOSTIC_TEST_FIELDS)),
    FieldSlot::new(&["pastMedications"], FieldKind::Records(PAST_MEDICATION_FIELDS)),
    FieldSlot::new(&["pastHistoryMedicines"], FieldKind::Records(PAST_MEDICATION_FIELDS)),
    FieldSlot::new(&["pastTreatments"], FieldKind::Records(PAST_TREATMENT_FIELDS)),
    FieldSlot::new(&["examinationData", "surgeries"], FieldKind::Records(SURGERY_FIELDS)),
    FieldSlot::new(&["diagnosis"], FieldKind::ScalarOrArray(DIAGNOSIS_CHAIN)),
    FieldSlot::new(&["bloodTests"], FieldKind::ScalarOrArray(BLOOD_TEST_CHAIN)),
    FieldSlot::new(
        &["examinationData", "bloodInvestigation", "bloodTests"],
        FieldKind::ScalarOrArray(BLOOD_TEST_CHAIN),
    ),
    FieldSlot::new(&["visionData"], FieldKind::Tree(VISUAL_ACUITY_CHAIN)),
    FieldSlot::new(&["examinationData", "visionData"], FieldKind::Tree(VISUAL_ACUITY_CHAIN)),
];

/// A field whose lookups failed. The field is returned as stored.
#[derive(Debug)]
pub struct FieldFailure {
    pub field: String,
    pub error: StoreError,
}

/// An id-shaped value that no store in its chain knew.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub field: String,
    pub id: String,
}

/// Result of hydrating one document.
#[derive(Debug)]
pub struct Hydrated {
    pub document: Value,
    pub failures: Vec<FieldFailure>,
    pub unresolved: Vec<UnresolvedReference>,
}

impl Hydrated {
    /// True when every eligible field was resolved against the store.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Find the value at a slot's path. Absent or null values yield `None`.
fn locate<'a>(root: &'a Map<String, Value>, slot: &FieldSlot) -> HydrateResult<Option<&'a Value>> {
    let Some((last, parents)) = slot.path.split_last() else {
        return Ok(None);
    };

    let mut node = root;
    for (depth, key) in parents.iter().enumerate() {
        match node.get(*key) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Object(map)) => node = map,
            Some(_) => {
                return Err(HydrateError::MalformedDocument {
                    field: slot.path[..=depth].join("."),
                    expected: "an object",
                })
            }
        }
    }

    match node.get(*last) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(value)),
    }
}

/// Check a present value's shape. Returns whether it is non-empty.
fn check_shape(slot: &FieldSlot, value: &Value) -> HydrateResult<bool> {
    match (slot.kind, value) {
        (FieldKind::Records(_), Value::Array(items)) => Ok(!items.is_empty()),
        (FieldKind::ScalarOrArray(_), Value::String(s)) => Ok(!s.is_empty()),
        (FieldKind::ScalarOrArray(_), Value::Array(items)) => Ok(!items.is_empty()),
        (FieldKind::Tree(_), Value::Object(map)) => Ok(!map.is_empty()),
        _ => Err(HydrateError::MalformedDocument {
            field: slot.name(),
            expected: slot.kind.expected(),
        }),
    }
}

/// Replace the value at `path`. Parents were validated by [`locate`].
fn replace_at(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut node = root;
    for key in parents {
        match node.get_mut(*key) {
            Some(Value::Object(map)) => node = map,
            _ => return,
        }
    }
    node.insert(last.to_string(), value);
}

/// Hydrates case documents against a set of lookup stores.
#[derive(Debug, Clone)]
pub struct Hydrator {
    stores: LookupStores,
    config: HydrationConfig,
}

impl Hydrator {
    /// Create a hydrator with default configuration.
    pub fn new(stores: LookupStores) -> Self {
        Self::with_config(stores, HydrationConfig::default())
    }

    pub fn with_config(stores: LookupStores, config: HydrationConfig) -> Self {
        Self { stores, config }
    }

    pub fn config(&self) -> &HydrationConfig {
        &self.config
    }

    /// Hydrate a case document.
    ///
    /// The input is not modified. Field resolutions run concurrently in the
    /// caller's task; dropping the returned future abandons every in-flight
    /// lookup and nothing partial is produced.
    ///
    /// Fails only when the document is malformed, before any lookup runs.
    pub async fn hydrate(&self, document: &Value) -> HydrateResult<Hydrated> {
        let Value::Object(root) = document else {
            return Err(HydrateError::MalformedDocument {
                field: "<document>".into(),
                expected: "an object",
            });
        };

        let mut eligible = Vec::new();
        for slot in CASE_FIELDS {
            let Some(value) = locate(root, slot)? else {
                continue;
            };
            if check_shape(slot, value)? {
                eligible.push((slot, value));
            }
        }

        let limits = TreeLimits::from(&self.config);
        let results = join_all(
            eligible
                .iter()
                .map(|(slot, value)| self.resolve_field(slot, value, limits)),
        )
        .await;

        let mut output = root.clone();
        let mut failures = Vec::new();
        let mut unresolved = Vec::new();

        for ((slot, _), result) in eligible.iter().zip(results) {
            match result {
                Ok(resolved) => {
                    unresolved.extend(resolved.unresolved.into_iter().map(|id| {
                        UnresolvedReference {
                            field: slot.name(),
                            id,
                        }
                    }));
                    replace_at(&mut output, slot.path, resolved.value);
                }
                Err(error) => {
                    tracing::warn!(
                        field = %slot.name(),
                        error = %error,
                        "Field hydration failed; returning stored values"
                    );
                    failures.push(FieldFailure {
                        field: slot.name(),
                        error,
                    });
                }
            }
        }

        tracing::debug!(
            fields = eligible.len(),
            failed = failures.len(),
            unresolved = unresolved.len(),
            "Case document hydrated"
        );

        Ok(Hydrated {
            document: Value::Object(output),
            failures,
            unresolved,
        })
    }

    /// Hydrate and keep only the document.
    pub async fn hydrate_document(&self, document: &Value) -> HydrateResult<Value> {
        Ok(self.hydrate(document).await?.document)
    }

    async fn resolve_field(
        &self,
        slot: &FieldSlot,
        value: &Value,
        limits: TreeLimits,
    ) -> StoreResult<Resolved> {
        match slot.kind {
            FieldKind::Records(fields) => match value {
                Value::Array(records) => resolve_records(&self.stores, records, fields).await,
                _ => Ok(Resolved::unchanged(value.clone())),
            },
            FieldKind::ScalarOrArray(chain) => {
                resolve_scalar_or_array(&self.stores, value, chain).await
            }
            FieldKind::Tree(chain) => resolve_tree(&self.stores, value, chain, limits).await,
        }
    }
}
