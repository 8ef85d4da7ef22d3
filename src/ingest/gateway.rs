//! Dedup/persistence boundary of an ingestion run

use crate::storage::{Listing, ListingRecord, Storage};

/// Stores the batch and returns only the listings that were new
///
/// URLs already present are skipped by the store. A storage failure is logged
/// and the run is treated as having created nothing.
pub fn persist_new<S: Storage + ?Sized>(store: &mut S, listings: &[Listing]) -> Vec<ListingRecord> {
    if listings.is_empty() {
        return Vec::new();
    }

    match store.bulk_insert_ignoring_conflicts(listings) {
        Ok(created) => created,
        Err(e) => {
            tracing::error!(
                "Error when bulk creating {} listings: {}",
                listings.len(),
                e
            );
            Vec::new()
        }
    }
}
