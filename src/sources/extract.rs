//! Field extraction helpers shared by the adapters
//!
//! Every helper returns `Option` instead of failing: a missing node, attribute
//! or unparsable date only blanks that one field.

use crate::sources::ParseError;
use chrono::{DateTime, NaiveDateTime, Utc};
use scraper::{ElementRef, Selector};
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Date format used by the sites that publish naive local timestamps
pub const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Compiles a CSS selector
pub fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|_| ParseError::Selector(css.to_string()))
}

/// Trimmed text of the first node matching `selector` under `node`
pub fn select_text(node: ElementRef<'_>, selector: &Selector) -> Option<String> {
    node.select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Attribute value of the first node matching `selector` under `node`
pub fn select_attr(node: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    node.select(selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolves a link href against the site root
///
/// Returns None for empty hrefs, fragment-only links and non-HTTP(S) results.
pub fn resolve_href(href: &str, site: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let base = Url::parse(&format!("https://{}/", site)).ok()?;
    let absolute = base.join(href).ok()?;

    if absolute.scheme() == "http" || absolute.scheme() == "https" {
        Some(absolute.to_string())
    } else {
        None
    }
}

/// Parses a source timestamp into UTC
///
/// RFC 3339 strings keep their offset; anything else is tried against
/// `naive_format` and read as UTC.
pub fn parse_timestamp(raw: Option<&str>, naive_format: &str) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    match NaiveDateTime::parse_from_str(raw, naive_format) {
        Ok(naive) => Some(naive.and_utc()),
        Err(e) => {
            tracing::debug!(
                "Could not parse datetime '{}' with format '{}': {}",
                raw,
                naive_format,
                e
            );
            None
        }
    }
}

/// Array found at a JSON pointer, or an empty slice when absent
pub fn records_at<'a>(root: &'a Value, pointer: &str) -> &'a [Value] {
    root.pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Decodes each record of the array at `pointer` independently
///
/// A record that does not fit `T` is skipped; the others are kept.
pub fn decode_records<T: DeserializeOwned>(source: &str, root: &Value, pointer: &str) -> Vec<T> {
    records_at(root, pointer)
        .iter()
        .filter_map(|record| match serde_json::from_value(record.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::debug!("Skipping malformed {} record: {}", source, e);
                None
            }
        })
        .collect()
}

/// Field deserializer that turns a value of the wrong type into `None`
///
/// Use with `#[serde(default, deserialize_with = "lenient")]` so a numeric
/// date or an object description blanks that field instead of the record.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Renders a JSON id (string or number) for use in a URL
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Drops empty strings
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
