//! Database schema definitions and migrations
//!
//! This module contains all SQL schema definitions for the Gig-Harvest database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per listing, keyed by its URL
CREATE TABLE IF NOT EXISTS listings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    published_at TEXT,
    viewed TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_listings_published ON listings(published_at);
CREATE INDEX IF NOT EXISTS idx_listings_viewed ON listings(viewed);
"#;

/// Older databases stored `viewed` as a boolean flag
///
/// A set flag becomes the row's last update time, a cleared flag becomes NULL.
const LEGACY_VIEWED_SQL: &str = r#"
UPDATE listings SET viewed = updated_at WHERE viewed IN ('1', 'true', 'True');
UPDATE listings SET viewed = NULL WHERE viewed IN ('0', 'false', 'False');
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    migrate_legacy_viewed(conn)?;
    Ok(())
}

/// Converts boolean `viewed` values into reviewed-at timestamps
pub fn migrate_legacy_viewed(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(LEGACY_VIEWED_SQL)
}
