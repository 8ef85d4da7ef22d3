//! Terminal output for stored listings
//!
//! This module handles:
//! - Printing new or archived listings with a compact age column
//! - Summarizing unreviewed listings per source

mod listings;
pub mod stats;

pub use listings::{print_listings, short_since};
pub use stats::{load_source_summary, print_source_summary, SourceCount};
