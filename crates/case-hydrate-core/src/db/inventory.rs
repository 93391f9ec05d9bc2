//! Inventory medicine table operations.

use rusqlite::params;

use super::{id_list_json, Database, DbResult};
use crate::models::{InventoryMedicine, LookupName};

impl Database {
    /// Insert or update an inventory medicine.
    pub fn upsert_inventory_medicine(&self, medicine: &InventoryMedicine) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO inventory_medicines (id, name, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                updated_at = datetime('now')
            "#,
            params![medicine.id, medicine.name],
        )?;
        Ok(())
    }

    /// Fetch inventory medicine names for a set of ids in one statement.
    pub fn batch_inventory_names(&self, ids: &[String]) -> DbResult<Vec<LookupName>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, name FROM inventory_medicines \
             WHERE lower(id) IN (SELECT value FROM json_each(?1))",
        )?;
        let rows = stmt.query_map(params![id_list_json(ids)?], |row| {
            Ok(LookupName {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }
}
