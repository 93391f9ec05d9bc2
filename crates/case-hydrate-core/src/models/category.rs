//! Lookup store partitions and backing sources.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A partition of the shared lookup store.
///
/// Ids are unique within a category, but a bare id may coincidentally exist
/// in several categories, so every lookup names its category explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Medicines,
    Dosages,
    Routes,
    EyeSelection,
    Diagnosis,
    Complaints,
    ComplaintCategories,
    DiagnosticTests,
    Surgeries,
    SurgeryTypes,
    AnesthesiaTypes,
    VisualAcuity,
    BloodTests,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 13] = [
        Category::Medicines,
        Category::Dosages,
        Category::Routes,
        Category::EyeSelection,
        Category::Diagnosis,
        Category::Complaints,
        Category::ComplaintCategories,
        Category::DiagnosticTests,
        Category::Surgeries,
        Category::SurgeryTypes,
        Category::AnesthesiaTypes,
        Category::VisualAcuity,
        Category::BloodTests,
    ];

    /// The category string stored in the `master_data.category` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Medicines => "medicines",
            Category::Dosages => "dosages",
            Category::Routes => "routes",
            Category::EyeSelection => "eye_selection",
            Category::Diagnosis => "diagnosis",
            Category::Complaints => "complaints",
            Category::ComplaintCategories => "complaint_categories",
            Category::DiagnosticTests => "diagnostic_tests",
            Category::Surgeries => "surgeries",
            Category::SurgeryTypes => "surgery_types",
            Category::AnesthesiaTypes => "anesthesia_types",
            Category::VisualAcuity => "visual_acuity",
            Category::BloodTests => "blood_tests",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown lookup category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// The backing store a chain step reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Shared category-partitioned lookup table.
    MasterData,
    /// Medicine inventory table (medicines only).
    Inventory,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::MasterData => f.write_str("master_data"),
            Source::Inventory => f.write_str("inventory"),
        }
    }
}
