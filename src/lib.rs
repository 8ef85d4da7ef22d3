//! Gig-Harvest: a multi-source listing aggregator
//!
//! This crate fetches freelance projects and job offers from several external
//! sites (HTML pages, JSON APIs and a GraphQL endpoint), normalizes them into
//! a single [`storage::Listing`] shape and stores the ones it has not seen
//! before. Deduplication relies solely on URL uniqueness in the store.

pub mod config;
pub mod fetch;
pub mod ingest;
pub mod output;
pub mod sources;
pub mod storage;

use thiserror::Error;

/// Main error type for Gig-Harvest operations
///
/// Only setup paths (loading config, opening the database, building the HTTP
/// client) return this. An ingestion run itself never fails.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Unknown source '{0}'")]
    UnknownSource(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Gig-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, ListingKind, ParserKind, SourceDescriptor};
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use ingest::Pipeline;
pub use sources::{RawCandidate, SourceAdapter};
pub use storage::{Listing, ListingRecord, SqliteStorage, Storage};
