//! Configuration module for Gig-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. The resulting [`Config`] is built once at startup and handed to the
//! ingestion pipeline explicitly.
//!
//! # Example
//!
//! ```no_run
//! use gig_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! for source in &config.sources {
//!     println!("{} ({})", source.name, source.parser);
//! }
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    builtin_sources, Config, FetchConfig, ListingKind, OutputConfig, ParserKind, SourceDescriptor,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
