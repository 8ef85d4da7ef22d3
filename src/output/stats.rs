//! Per-source counts of unreviewed listings

use crate::config::Config;
use crate::storage::Storage;
use crate::HarvestError;

/// Unreviewed listings of one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCount {
    pub name: String,
    pub site: String,
    pub color: String,
    pub unviewed: u64,
}

/// Loads the unreviewed count for every configured source
///
/// Sources are returned in config order, including those with zero.
pub fn load_source_summary(
    config: &Config,
    storage: &dyn Storage,
) -> Result<Vec<SourceCount>, HarvestError> {
    let counts = storage.count_unviewed_by_site()?;

    Ok(config
        .sources
        .iter()
        .map(|source| SourceCount {
            name: source.name.clone(),
            site: source.site.clone(),
            color: source.color.clone(),
            unviewed: counts.get(&source.site).copied().unwrap_or(0),
        })
        .collect())
}

/// Prints the summary to stdout in a formatted manner
pub fn print_source_summary(summary: &[SourceCount], total: u64) {
    println!("=== New Listings by Source ===\n");

    for entry in summary {
        println!(
            "  {:<12} {:<16} {:>5}  {}",
            entry.name, entry.site, entry.unviewed, entry.color
        );
    }

    let unviewed: u64 = summary.iter().map(|e| e.unviewed).sum();
    println!();
    println!("Unreviewed: {} of {} stored listings", unviewed, total);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Listing, SqliteStorage};

    #[test]
    fn test_summary_covers_every_source() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        storage
            .bulk_insert_ignoring_conflicts(&[
                Listing {
                    title: "A".to_string(),
                    url: "https://bahr.sa/en/projects/1".to_string(),
                    description: String::new(),
                    published_at: None,
                },
                Listing {
                    title: "B".to_string(),
                    url: "https://bahr.sa/en/projects/2".to_string(),
                    description: String::new(),
                    published_at: None,
                },
            ])
            .unwrap();

        let summary = load_source_summary(&Config::default(), &storage).unwrap();
        assert_eq!(summary.len(), 6);

        let bahr = summary.iter().find(|s| s.name == "bahr").unwrap();
        assert_eq!(bahr.unviewed, 2);
        assert_eq!(bahr.color, "#f5a623");

        let mostaql = summary.iter().find(|s| s.name == "mostaql").unwrap();
        assert_eq!(mostaql.unviewed, 0);
    }
}
