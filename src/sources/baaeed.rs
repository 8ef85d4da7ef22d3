//! baaeed.com remote jobs (HTML table inside a card section)

use crate::config::SourceDescriptor;
use crate::sources::html::{parse_rows, HtmlLayout};
use crate::sources::{ParseError, RawCandidate, SourceAdapter};

const LAYOUT: HtmlLayout = HtmlLayout {
    rows: "section.baaeed-card table tr",
    link: ".baaeed-list__details h3.card-title a",
    description: ".card-brief a",
    published: Some("time"),
};

pub struct Baaeed {
    descriptor: SourceDescriptor,
}

impl Baaeed {
    pub fn new(descriptor: SourceDescriptor) -> Self {
        Self { descriptor }
    }
}

impl SourceAdapter for Baaeed {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    fn parse(&self, body: &str) -> Result<Vec<RawCandidate>, ParseError> {
        parse_rows(body, &LAYOUT, &self.descriptor.site)
    }
}
