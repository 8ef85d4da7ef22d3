//! Candidate validation and shaping into [`Listing`]s

use crate::sources::RawCandidate;
use crate::storage::Listing;
use thiserror::Error;

/// Why a candidate cannot become a listing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("candidate has no title")]
    MissingTitle,

    #[error("candidate has no URL")]
    MissingUrl,
}

/// Maps one candidate onto the canonical listing shape
///
/// Title and URL are required; a missing description becomes an empty string
/// and a missing publish date stays absent.
pub fn normalize(candidate: RawCandidate) -> Result<Listing, ValidationError> {
    let url = required(candidate.url).ok_or(ValidationError::MissingUrl)?;
    let title = required(candidate.title).ok_or(ValidationError::MissingTitle)?;

    Ok(Listing {
        title,
        url,
        description: candidate
            .description
            .map(|d| d.trim().to_string())
            .unwrap_or_default(),
        published_at: candidate.published_at,
    })
}

/// Normalizes a source's candidates, silently dropping invalid ones
pub fn normalize_all(source: &str, candidates: Vec<RawCandidate>) -> Vec<Listing> {
    candidates
        .into_iter()
        .filter_map(|candidate| match normalize(candidate) {
            Ok(listing) => Some(listing),
            Err(reason) => {
                tracing::debug!("{}: dropping candidate: {}", source, reason);
                None
            }
        })
        .collect()
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
