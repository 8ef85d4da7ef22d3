//! Storage module for persisting listings
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Bulk insertion that skips URLs already stored
//! - Queries used by the presentation layer (new vs. archived listings)
//! - Marking a listing as reviewed

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

/// Opens (or creates) the listings database at `path`
pub fn open_storage(path: &std::path::Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// A validated listing ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub title: String,
    pub url: String,
    pub description: String,
    /// Absent when the source gives no usable date
    pub published_at: Option<DateTime<Utc>>,
}

/// A listing as stored in the database
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
    /// When a person reviewed the listing; None while it is still new
    pub viewed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListingRecord {
    /// Host the listing lives on, e.g. "bahr.sa"
    pub fn source(&self) -> String {
        site_of(&self.url).unwrap_or_default()
    }

    pub fn is_viewed(&self) -> bool {
        self.viewed.is_some()
    }
}

/// Which listings to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewedFilter {
    /// Not reviewed yet
    Unviewed,
    /// Already reviewed (the archive)
    Viewed,
    All,
}

/// Host part of a URL
pub fn site_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

/// Timestamps are stored as RFC 3339 UTC text so they sort lexically
pub(crate) fn to_db_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn from_db_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
