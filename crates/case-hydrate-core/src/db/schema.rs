//! SQLite schema definition.

/// Lookup store schema.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Master Data (shared, category-partitioned lookup table)
-- ============================================================================

CREATE TABLE IF NOT EXISTS master_data (
    id TEXT NOT NULL,                            -- canonical UUID text
    category TEXT NOT NULL,                      -- medicines, dosages, routes, ...
    name TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (category, id)
);

-- Case-insensitive id lookups within a category
CREATE INDEX IF NOT EXISTS idx_master_data_category_lower_id
    ON master_data(category, lower(id));

-- ============================================================================
-- Inventory Medicines (secondary medicine source)
-- ============================================================================

CREATE TABLE IF NOT EXISTS inventory_medicines (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_inventory_medicines_lower_id
    ON inventory_medicines(lower(id));
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_is_reapplicable() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_same_id_in_two_categories() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let id = "11111111-1111-1111-1111-111111111111";
        conn.execute(
            "INSERT INTO master_data (id, category, name) VALUES (?, 'surgeries', 'Phaco')",
            [id],
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO master_data (id, category, name) VALUES (?, 'surgery_types', 'Cataract')",
            [id],
        );
        assert!(result.is_ok());

        // Duplicate within a category is rejected
        let result = conn.execute(
            "INSERT INTO master_data (id, category, name) VALUES (?, 'surgeries', 'Other')",
            [id],
        );
        assert!(result.is_err());
    }
}
