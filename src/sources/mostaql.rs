//! mostaql.com freelance projects (HTML listing table)

use crate::config::SourceDescriptor;
use crate::sources::html::{parse_rows, HtmlLayout};
use crate::sources::{ParseError, RawCandidate, SourceAdapter};

const LAYOUT: HtmlLayout = HtmlLayout {
    rows: ".projects-table tbody tr",
    link: ".card--title a",
    description: ".project__brief a",
    published: Some("time"),
};

pub struct Mostaql {
    descriptor: SourceDescriptor,
}

impl Mostaql {
    pub fn new(descriptor: SourceDescriptor) -> Self {
        Self { descriptor }
    }
}

impl SourceAdapter for Mostaql {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    fn parse(&self, body: &str) -> Result<Vec<RawCandidate>, ParseError> {
        parse_rows(body, &LAYOUT, &self.descriptor.site)
    }
}
