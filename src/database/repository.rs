/*!
 * Repository layer for database operations.
 *
 * High-level access to the voiced dialogue records, keeping the SQL
 * behind typed methods.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{params, Connection};
use std::path::Path;

use super::connection::DatabaseConnection;
use super::models::DialogRecord;

/// Repository for database operations
#[derive(Debug, Clone)]
pub struct Repository {
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open a repository backed by the database file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(DatabaseConnection::new(path)?))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    fn dialog_exists_sync(conn: &Connection, character: &str, text: &str) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM dialogs WHERE character = ?1 AND text = ?2",
            params![character, text],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Insert a voiced line unless the same (character, text) pair is already stored.
    ///
    /// Returns whether a row was inserted.
    pub async fn insert_dialog(&self, record: &DialogRecord) -> Result<bool> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                if Self::dialog_exists_sync(conn, &record.character, &record.text)? {
                    debug!("Dialog for {} already stored, skipping", record.character);
                    return Ok(false);
                }

                conn.execute(
                    "INSERT INTO dialogs (quest, character, text, uri) VALUES (?1, ?2, ?3, ?4)",
                    params![record.quest, record.character, record.text, record.uri],
                )?;
                Ok(true)
            })
            .await
    }

    /// Check whether a line has already been stored for the character
    pub async fn dialog_exists(&self, character: &str, text: &str) -> Result<bool> {
        let character = character.to_string();
        let text = text.to_string();

        self.db
            .execute_async(move |conn| Self::dialog_exists_sync(conn, &character, &text))
            .await
    }

    /// Distinct quest names with at least one voiced line, sorted
    pub async fn completed_quests(&self) -> Result<Vec<String>> {
        self.db
            .execute_async(|conn| {
                let mut stmt =
                    conn.prepare("SELECT DISTINCT quest FROM dialogs ORDER BY quest")?;
                let quests = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<rusqlite::Result<Vec<String>>>()?;
                Ok(quests)
            })
            .await
    }

    /// Every stored line spoken by `character`, in insertion order
    pub async fn dialogs_by_character(&self, character: &str) -> Result<Vec<DialogRecord>> {
        let character = character.to_string();

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT quest, character, text, uri FROM dialogs WHERE character = ?1 ORDER BY rowid",
                )?;
                let records = stmt
                    .query_map([&character], DialogRecord::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(records)
            })
            .await
    }

    /// Total number of stored lines
    pub async fn count_dialogs(&self) -> Result<usize> {
        self.db
            .execute_async(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM dialogs", [], |row| row.get(0))?;
                Ok(count as usize)
            })
            .await
    }
}
