//! Generic listing-table scraper for the HTML sources

use crate::sources::extract::{
    parse_timestamp, resolve_href, select_attr, select_text, selector, NAIVE_DATETIME_FORMAT,
};
use crate::sources::{ParseError, RawCandidate};
use scraper::Html;

/// Where the fields of one listing live in a page
#[derive(Debug, Clone, Copy)]
pub struct HtmlLayout {
    /// Repeated node holding one listing
    pub rows: &'static str,
    /// Anchor carrying both the title text and the detail URL
    pub link: &'static str,
    /// Node holding the short description
    pub description: &'static str,
    /// Node whose `datetime` attribute holds the publish date
    pub published: Option<&'static str>,
}

/// Extracts one candidate per row node
///
/// Each field is looked up on its own; a row missing a field still yields a
/// candidate with that field blank.
pub fn parse_rows(body: &str, layout: &HtmlLayout, site: &str) -> Result<Vec<RawCandidate>, ParseError> {
    let rows = selector(layout.rows)?;
    let link = selector(layout.link)?;
    let description = selector(layout.description)?;
    let published = layout.published.map(selector).transpose()?;

    let document = Html::parse_document(body);

    let candidates = document
        .select(&rows)
        .map(|row| RawCandidate {
            title: select_text(row, &link),
            url: select_attr(row, &link, "href").and_then(|href| resolve_href(&href, site)),
            description: select_text(row, &description),
            published_at: published.as_ref().and_then(|sel| {
                parse_timestamp(
                    select_attr(row, sel, "datetime").as_deref(),
                    NAIVE_DATETIME_FORMAT,
                )
            }),
        })
        .collect();

    Ok(candidates)
}
