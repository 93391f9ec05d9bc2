//! Resolver for fields stored as either one string or an array of strings.
//!
//! Names replace ids in place and no `_original` companion is kept. The
//! input shape is preserved: scalar in, scalar out; array in, array out.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::store::{LookupStores, StoreResult};

use super::{canonical_id, is_reference, resolve_with_fallback, ChainStep, Resolved};

pub async fn resolve_scalar_or_array(
    stores: &LookupStores,
    value: &Value,
    chain: &[ChainStep],
) -> StoreResult<Resolved> {
    let entries: Vec<&Value> = match value {
        Value::String(_) => vec![value],
        Value::Array(items) => items.iter().collect(),
        _ => return Ok(Resolved::unchanged(value.clone())),
    };

    let ids: BTreeSet<String> = entries
        .iter()
        .filter_map(|entry| entry.as_str())
        .filter(|s| is_reference(s))
        .map(canonical_id)
        .collect();

    if ids.is_empty() {
        return Ok(Resolved::unchanged(value.clone()));
    }

    let names = resolve_with_fallback(stores, &ids, chain).await?;
    let mut unresolved = BTreeSet::new();

    let mut rename = |entry: &Value| -> Value {
        match entry.as_str() {
            Some(id) if is_reference(id) => match names.get(id) {
                Some(name) => Value::String(name.to_string()),
                None => {
                    unresolved.insert(id.to_string());
                    entry.clone()
                }
            },
            _ => entry.clone(),
        }
    };

    let value = match value {
        Value::Array(items) => Value::Array(items.iter().map(&mut rename).collect()),
        scalar => rename(scalar),
    };

    Ok(Resolved { value, unresolved })
}
