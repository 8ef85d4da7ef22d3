//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{
    from_db_timestamp, site_of, to_db_timestamp, Listing, ListingRecord, ViewedFilter,
};
use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

const SELECT_COLUMNS: &str =
    "SELECT id, title, url, description, published_at, viewed, created_at, updated_at FROM listings";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to create the parent directory or open the database
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Column values as read, before timestamp parsing
struct StoredRow {
    id: i64,
    title: String,
    url: String,
    description: String,
    published_at: Option<String>,
    viewed: Option<String>,
    created_at: String,
    updated_at: String,
}

impl StoredRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            description: row.get(3)?,
            published_at: row.get(4)?,
            viewed: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn into_record(self) -> StorageResult<ListingRecord> {
        Ok(ListingRecord {
            id: self.id,
            title: self.title,
            url: self.url,
            description: self.description,
            published_at: optional_timestamp(self.id, "published_at", self.published_at),
            viewed: optional_timestamp(self.id, "viewed", self.viewed),
            created_at: required_timestamp("created_at", &self.created_at)?,
            updated_at: required_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

fn required_timestamp(column: &'static str, value: &str) -> StorageResult<DateTime<Utc>> {
    from_db_timestamp(value).ok_or_else(|| StorageError::InvalidValue {
        column,
        value: value.to_string(),
    })
}

fn optional_timestamp(id: i64, column: &str, value: Option<String>) -> Option<DateTime<Utc>> {
    let value = value?;
    let parsed = from_db_timestamp(&value);
    if parsed.is_none() {
        tracing::warn!("Listing {} has unreadable {} '{}'", id, column, value);
    }
    parsed
}

impl Storage for SqliteStorage {
    // ===== Ingestion =====

    fn bulk_insert_ignoring_conflicts(
        &mut self,
        listings: &[Listing],
    ) -> StorageResult<Vec<ListingRecord>> {
        let now = Utc::now().trunc_subsecs(6);
        let stamp = to_db_timestamp(&now);

        let tx = self.conn.transaction()?;
        let mut created = Vec::new();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO listings (title, url, description, published_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT(url) DO NOTHING",
            )?;

            for listing in listings {
                let inserted = stmt.execute(params![
                    listing.title,
                    listing.url,
                    listing.description,
                    listing.published_at.as_ref().map(to_db_timestamp),
                    stamp,
                ])?;

                if inserted == 1 {
                    created.push(ListingRecord {
                        id: tx.last_insert_rowid(),
                        title: listing.title.clone(),
                        url: listing.url.clone(),
                        description: listing.description.clone(),
                        published_at: listing.published_at,
                        viewed: None,
                        created_at: now,
                        updated_at: now,
                    });
                }
            }
        }
        tx.commit()?;

        Ok(created)
    }

    // ===== Queries =====

    fn list_listings(&self, filter: ViewedFilter) -> StorageResult<Vec<ListingRecord>> {
        let condition = match filter {
            ViewedFilter::Unviewed => "WHERE viewed IS NULL",
            ViewedFilter::Viewed => "WHERE viewed IS NOT NULL",
            ViewedFilter::All => "",
        };

        let sql = format!(
            "{} {} ORDER BY published_at IS NULL, published_at DESC, id DESC",
            SELECT_COLUMNS, condition
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], StoredRow::read)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(StoredRow::into_record).collect()
    }

    fn get_listing(&self, id: i64) -> StorageResult<ListingRecord> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);

        let row = self
            .conn
            .query_row(&sql, params![id], StoredRow::read)
            .optional()?
            .ok_or(StorageError::ListingNotFound(id))?;

        row.into_record()
    }

    fn count_listings(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM listings", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_unviewed_by_site(&self) -> StorageResult<HashMap<String, u64>> {
        // One row per URL authority ("host[:port]"); the host is parsed below
        let mut stmt = self.conn.prepare(
            "SELECT authority, COUNT(*) FROM (
                 SELECT CASE WHEN instr(rest, '/') = 0 THEN rest
                             ELSE substr(rest, 1, instr(rest, '/') - 1) END AS authority
                 FROM (SELECT substr(url, instr(url, '://') + 3) AS rest
                       FROM listings
                       WHERE viewed IS NULL AND instr(url, '://') > 0)
             )
             GROUP BY authority",
        )?;

        let grouped = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut counts = HashMap::new();
        for (authority, count) in grouped {
            if let Some(site) = site_of(&format!("https://{}/", authority)) {
                *counts.entry(site).or_insert(0) += count as u64;
            }
        }

        Ok(counts)
    }

    // ===== Review =====

    fn mark_viewed(&mut self, id: i64, at: DateTime<Utc>) -> StorageResult<()> {
        let stamp = to_db_timestamp(&at);
        let now = to_db_timestamp(&Utc::now());

        let updated = self.conn.execute(
            "UPDATE listings SET viewed = ?1, updated_at = ?2 WHERE id = ?3",
            params![stamp, now, id],
        )?;

        if updated == 0 {
            return Err(StorageError::ListingNotFound(id));
        }
        Ok(())
    }
}
