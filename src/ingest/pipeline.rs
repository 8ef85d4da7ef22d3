//! Aggregation pipeline - one ingestion run across all sources
//!
//! A run:
//! - Fetches every source concurrently; each adapter fails on its own
//! - Normalizes the candidates and concatenates them in source order
//! - Hands the whole batch to the store in a single insert
//! - Returns the listings that were new

use crate::config::Config;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::ingest::gateway::persist_new;
use crate::ingest::normalize::normalize_all;
use crate::sources::{build_adapters, SourceAdapter};
use crate::storage::{Listing, ListingRecord, Storage};
use crate::HarvestError;
use futures::future::join_all;
use std::sync::Arc;

/// Runs the registered source adapters and stores what they find
pub struct Pipeline<S> {
    adapters: Vec<Box<dyn SourceAdapter>>,
    fetcher: Arc<dyn Fetcher>,
    store: S,
}

impl<S: Storage> Pipeline<S> {
    /// Creates a pipeline with one adapter per configured source
    ///
    /// # Arguments
    ///
    /// * `config` - Loaded configuration; read once, not retained
    /// * `fetcher` - Transport shared by every adapter
    /// * `store` - Destination of new listings
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Ready to run
    /// * `Err(HarvestError)` - A configured source has no adapter
    pub fn new(config: &Config, fetcher: Arc<dyn Fetcher>, store: S) -> Result<Self, HarvestError> {
        let adapters = build_adapters(config)?;
        Ok(Self::with_adapters(adapters, fetcher, store))
    }

    /// Creates a pipeline that talks HTTP using the `[fetch]` settings
    pub fn from_config(config: &Config, store: S) -> Result<Self, HarvestError> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Self::new(config, Arc::new(fetcher), store)
    }

    /// Creates a pipeline from explicit adapters
    pub fn with_adapters(
        adapters: Vec<Box<dyn SourceAdapter>>,
        fetcher: Arc<dyn Fetcher>,
        store: S,
    ) -> Self {
        Self {
            adapters,
            fetcher,
            store,
        }
    }

    pub fn adapters(&self) -> &[Box<dyn SourceAdapter>] {
        &self.adapters
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetches and normalizes every source without storing anything
    pub async fn collect_listings(&self) -> Vec<Listing> {
        let fetcher = self.fetcher.as_ref();

        let per_source = join_all(self.adapters.iter().map(|adapter| async move {
            let name = adapter.descriptor().name.as_str();
            let candidates = adapter.fetch_candidates(fetcher).await;
            let listings = normalize_all(name, candidates);
            tracing::info!("{}: {} listings", name, listings.len());
            listings
        }))
        .await;

        per_source.into_iter().flatten().collect()
    }

    /// Runs one ingestion and returns the listings created by it
    ///
    /// This cannot fail. Broken sources and storage errors are logged and
    /// simply lead to fewer (or no) new listings.
    pub async fn run_ingestion(&mut self) -> Vec<ListingRecord> {
        let listings = self.collect_listings().await;
        tracing::debug!("Collected {} listings from {} sources", listings.len(), self.adapters.len());

        let created = persist_new(&mut self.store, &listings);

        if created.is_empty() {
            tracing::info!("No new listings found");
        } else {
            tracing::info!("Created {} new listings", created.len());
        }

        created
    }
}
