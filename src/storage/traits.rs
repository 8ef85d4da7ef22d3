//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{Listing, ListingRecord, ViewedFilter};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Listing not found: {0}")]
    ListingNotFound(i64),

    #[error("Invalid value in column {column}: {value}")]
    InvalidValue { column: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The URL column is unique; that constraint is the only deduplication the
/// ingestion pipeline relies on.
pub trait Storage {
    // ===== Ingestion =====

    /// Inserts listings as one batch, skipping any whose URL is already stored
    ///
    /// Duplicates within the batch are also skipped after the first one.
    ///
    /// # Returns
    ///
    /// Only the rows that were actually created, in input order
    fn bulk_insert_ignoring_conflicts(
        &mut self,
        listings: &[Listing],
    ) -> StorageResult<Vec<ListingRecord>>;

    // ===== Queries =====

    /// Lists listings, newest publication first, undated ones last
    fn list_listings(&self, filter: ViewedFilter) -> StorageResult<Vec<ListingRecord>>;

    /// Gets a listing by ID
    fn get_listing(&self, id: i64) -> StorageResult<ListingRecord>;

    /// Counts all stored listings
    fn count_listings(&self) -> StorageResult<u64>;

    /// Counts unreviewed listings per site host
    fn count_unviewed_by_site(&self) -> StorageResult<HashMap<String, u64>>;

    // ===== Review =====

    /// Marks a listing as reviewed at the given time
    fn mark_viewed(&mut self, id: i64, at: DateTime<Utc>) -> StorageResult<()>;
}
