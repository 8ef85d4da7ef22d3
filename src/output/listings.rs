use crate::storage::ListingRecord;
use chrono::{DateTime, Datelike, Utc};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Compact age of a timestamp relative to `now`
///
/// Seconds, minutes and hours under a day ("42s", "5m", "3h"), day and month
/// under a year ("16 Apr"), the full date beyond that.
pub fn short_since(value: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let delta = *now - *value;

    if delta.num_seconds() < 60 {
        return format!("{}s", delta.num_seconds().max(0));
    }
    if delta.num_minutes() < 60 {
        return format!("{}m", delta.num_minutes());
    }
    if delta.num_hours() < 24 {
        return format!("{}h", delta.num_hours());
    }
    if delta.num_days() < 365 {
        return format!("{} {}", value.day(), MONTHS[value.month0() as usize]);
    }
    value.format("%Y-%m-%d").to_string()
}

/// Prints listings one per line: id, age, source and title, then the URL
pub fn print_listings(listings: &[ListingRecord]) {
    if listings.is_empty() {
        println!("No listings.");
        return;
    }

    let now = Utc::now();
    for listing in listings {
        let age = listing
            .published_at
            .as_ref()
            .map(|dt| short_since(dt, &now))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "[{:>5}] {:>6}  {:<14} {}",
            listing.id,
            age,
            listing.source(),
            listing.title
        );
        println!("        {}", listing.url);
    }
}
