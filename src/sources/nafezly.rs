//! nafezly.com freelance projects (HTML cards)

use crate::config::SourceDescriptor;
use crate::sources::html::{parse_rows, HtmlLayout};
use crate::sources::{ParseError, RawCandidate, SourceAdapter};

// The cards carry no machine-readable date.
const LAYOUT: HtmlLayout = HtmlLayout {
    rows: ".project-box",
    link: "a.text-truncate",
    description: "h3",
    published: None,
};

pub struct Nafezly {
    descriptor: SourceDescriptor,
}

impl Nafezly {
    pub fn new(descriptor: SourceDescriptor) -> Self {
        Self { descriptor }
    }
}

impl SourceAdapter for Nafezly {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    fn parse(&self, body: &str) -> Result<Vec<RawCandidate>, ParseError> {
        parse_rows(body, &LAYOUT, &self.descriptor.site)
    }
}
