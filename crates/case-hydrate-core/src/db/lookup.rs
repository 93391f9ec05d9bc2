//! Master-data lookup table operations.

use rusqlite::{params, OptionalExtension};

use super::{id_list_json, Database, DbResult};
use crate::models::{Category, LookupEntry, LookupName};

impl Database {
    /// Insert or update a lookup entry.
    pub fn upsert_lookup_entry(&self, entry: &LookupEntry) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO master_data (id, category, name, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(category, id) DO UPDATE SET
                name = excluded.name,
                updated_at = datetime('now')
            "#,
            params![entry.id, entry.category.as_str(), entry.name],
        )?;
        Ok(())
    }

    /// Get a lookup entry by category and id.
    pub fn get_lookup_entry(&self, category: Category, id: &str) -> DbResult<Option<LookupEntry>> {
        let entry = self
            .conn
            .query_row(
                r#"
                SELECT id, name
                FROM master_data
                WHERE category = ?1 AND lower(id) = lower(?2)
                "#,
                params![category.as_str(), id],
                |row| {
                    Ok(LookupEntry {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        category,
                    })
                },
            )
            .optional()?;

        Ok(entry)
    }

    /// Fetch display names for a set of ids within one category.
    ///
    /// Runs a single statement with the ids bound as one JSON array, whatever
    /// the batch size. Ids with no entry in the category are absent from the
    /// result.
    pub fn batch_lookup_names(&self, category: Category, ids: &[String]) -> DbResult<Vec<LookupName>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name
            FROM master_data
            WHERE category = ?1 AND lower(id) IN (SELECT value FROM json_each(?2))
            "#,
        )?;
        let rows = stmt.query_map(params![category.as_str(), id_list_json(ids)?], |row| {
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
