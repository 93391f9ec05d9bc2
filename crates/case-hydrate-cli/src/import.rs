//! Bulk import of lookup entries.
//!
//! Input is a JSON array of `{ "id"?, "name", "category" }`. The pseudo
//! category `inventory` targets the inventory medicine table.

use anyhow::{Context, Result};
use case_hydrate_core::models::{Category, InventoryMedicine, LookupEntry};
use case_hydrate_core::{is_reference, Database};
use serde::Deserialize;

const INVENTORY: &str = "inventory";

#[derive(Debug, Deserialize)]
struct RawEntry {
    id: Option<String>,
    name: String,
    category: String,
}

/// A parsed import row.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportRecord {
    Lookup(LookupEntry),
    Inventory(InventoryMedicine),
}

impl ImportRecord {
    fn id(&self) -> &str {
        match self {
            ImportRecord::Lookup(entry) => &entry.id,
            ImportRecord::Inventory(medicine) => &medicine.id,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub lookup: usize,
    pub inventory: usize,
}

/// Parse an import file. Rows without an id get a fresh v4 UUID.
pub fn parse_entries(json: &str) -> Result<Vec<ImportRecord>> {
    let rows: Vec<RawEntry> = serde_json::from_str(json).context("Entries must be a JSON array")?;

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            let record = if row.category == INVENTORY {
                let mut medicine = InventoryMedicine::new(row.name);
                if let Some(id) = row.id {
                    medicine.id = id;
                }
                ImportRecord::Inventory(medicine)
            } else {
                let category: Category = row
                    .category
                    .parse()
                    .with_context(|| format!("Entry {}", index))?;
                match row.id {
                    Some(id) => ImportRecord::Lookup(LookupEntry::with_id(id, category, row.name)),
                    None => ImportRecord::Lookup(LookupEntry::new(category, row.name)),
                }
            };
            Ok(record)
        })
        .collect()
}

/// Upsert every record.
pub fn import_entries(db: &Database, records: &[ImportRecord]) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for record in records {
        if !is_reference(record.id()) {
            tracing::warn!(id = record.id(), "Id is not UUID-shaped; case documents cannot reference it");
        }
        match record {
            ImportRecord::Lookup(entry) => {
                db.upsert_lookup_entry(entry)
                    .with_context(|| format!("Failed to upsert {} entry {}", entry.category, entry.id))?;
                summary.lookup += 1;
            }
            ImportRecord::Inventory(medicine) => {
                db.upsert_inventory_medicine(medicine)
                    .with_context(|| format!("Failed to upsert inventory medicine {}", medicine.id))?;
                summary.inventory += 1;
            }
        }
    }

    Ok(summary)
}
