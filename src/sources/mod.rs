//! Source adapters
//!
//! One adapter per external site. Each adapter knows how to ask its site for
//! listings and how to turn the response body into [`RawCandidate`]s:
//! - HTML pages (mostaql, nafezly, baaeed) through CSS selectors
//! - JSON APIs (emploitic, bahr) by walking a fixed key path
//! - a GraphQL endpoint (ouedkniss) with a fixed query document
//!
//! Fetch and parse failures never leave an adapter: they are logged and the
//! source contributes nothing to the run.

mod baaeed;
mod bahr;
mod emploitic;
pub mod extract;
mod html;
mod mostaql;
mod nafezly;
mod ouedkniss;

pub use baaeed::Baaeed;
pub use bahr::Bahr;
pub use emploitic::Emploitic;
pub use mostaql::Mostaql;
pub use nafezly::Nafezly;
pub use ouedkniss::Ouedkniss;

use crate::config::{Config, ParserKind, SourceDescriptor};
use crate::fetch::{FetchRequest, Fetcher};
use crate::HarvestError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// A listing as read from a source, before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCandidate {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl RawCandidate {
    /// Whether the candidate points anywhere
    pub fn has_url(&self) -> bool {
        self.url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }
}

/// A response body that could not be read at all
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid CSS selector: {0}")]
    Selector(String),
}

/// Fetches and parses one external source
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Static description of the source
    fn descriptor(&self) -> &SourceDescriptor;

    /// Request sent on each run
    fn request(&self) -> FetchRequest {
        FetchRequest::get(self.descriptor().url.as_str())
    }

    /// Turns a response body into candidates
    fn parse(&self, body: &str) -> Result<Vec<RawCandidate>, ParseError>;

    /// Fetches the source and returns every candidate carrying a URL
    ///
    /// Never fails: a fetch or parse error is logged and yields an empty list.
    async fn fetch_candidates(&self, fetcher: &dyn Fetcher) -> Vec<RawCandidate> {
        let name = self.descriptor().name.as_str();

        let response = match fetcher.fetch(&self.request()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(source = name, url = e.url(), "Skipping source: {}", e);
                return Vec::new();
            }
        };

        let candidates = match self.parse(&response.body) {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(source = name, "Failed to parse response: {}", e);
                return Vec::new();
            }
        };

        let total = candidates.len();
        let kept: Vec<RawCandidate> = candidates.into_iter().filter(RawCandidate::has_url).collect();
        tracing::debug!(
            "{}: {} candidates ({} without URL dropped)",
            name,
            kept.len(),
            total - kept.len()
        );
        kept
    }
}

/// Parser kind each registered adapter handles
pub fn expected_parser(name: &str) -> Option<ParserKind> {
    match name {
        "mostaql" | "nafezly" | "baaeed" => Some(ParserKind::Html),
        "emploitic" | "bahr" => Some(ParserKind::Json),
        "ouedkniss" => Some(ParserKind::GraphQl),
        _ => None,
    }
}

/// Instantiates the adapter registered for a source
pub fn adapter_for(descriptor: &SourceDescriptor) -> Option<Box<dyn SourceAdapter>> {
    let descriptor = descriptor.clone();
    let adapter: Box<dyn SourceAdapter> = match descriptor.name.as_str() {
        "mostaql" => Box::new(Mostaql::new(descriptor)),
        "nafezly" => Box::new(Nafezly::new(descriptor)),
        "baaeed" => Box::new(Baaeed::new(descriptor)),
        "emploitic" => Box::new(Emploitic::new(descriptor)),
        "bahr" => Box::new(Bahr::new(descriptor)),
        "ouedkniss" => Box::new(Ouedkniss::new(descriptor)),
        _ => return None,
    };
    Some(adapter)
}

/// Builds the adapters for every configured source, in config order
pub fn build_adapters(config: &Config) -> Result<Vec<Box<dyn SourceAdapter>>, HarvestError> {
    config
        .sources
        .iter()
        .map(|source| {
            adapter_for(source).ok_or_else(|| HarvestError::UnknownSource(source.name.clone()))
        })
        .collect()
}
