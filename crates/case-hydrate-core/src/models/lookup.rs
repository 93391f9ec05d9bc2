//! Lookup store entry models.

use serde::{Deserialize, Serialize};

use super::Category;

/// A single entry of the shared master-data lookup table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LookupEntry {
    /// Primary key (canonical UUID text)
    pub id: String,
    /// Display name shown to clinicians
    pub name: String,
    /// Partition this entry belongs to
    pub category: Category,
}

impl LookupEntry {
    /// Create an entry with a freshly generated id.
    pub fn new(category: Category, name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            category,
        }
    }

    /// Create an entry with a known id.
    pub fn with_id(id: String, category: Category, name: String) -> Self {
        Self { id, name, category }
    }
}

/// A medicine from the inventory table, the secondary medicine source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryMedicine {
    pub id: String,
    pub name: String,
}

impl InventoryMedicine {
    pub fn new(name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
        }
    }
}

/// One row of a batch lookup response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LookupName {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::is_reference;

    #[test]
    fn test_generated_ids_are_references() {
        let entry = LookupEntry::new(Category::Medicines, "Atropine".into());
        assert!(is_reference(&entry.id));

        let medicine = InventoryMedicine::new("Timolol 0.5%".into());
        assert!(is_reference(&medicine.id));
    }
}
