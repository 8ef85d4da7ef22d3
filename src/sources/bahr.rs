//! bahr.sa freelance projects (JSON API)

use crate::config::SourceDescriptor;
use crate::sources::extract::{
    decode_records, id_string, lenient, non_empty, parse_timestamp, NAIVE_DATETIME_FORMAT,
};
use crate::sources::{ParseError, RawCandidate, SourceAdapter};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Project {
    #[serde(default)]
    id: Value,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<String>,
    #[serde(rename = "createdAt", default, deserialize_with = "lenient")]
    created_at: Option<String>,
}

pub struct Bahr {
    descriptor: SourceDescriptor,
}

impl Bahr {
    pub fn new(descriptor: SourceDescriptor) -> Self {
        Self { descriptor }
    }
}

impl SourceAdapter for Bahr {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    fn parse(&self, body: &str) -> Result<Vec<RawCandidate>, ParseError> {
        let root: Value = serde_json::from_str(body)?;
        let projects: Vec<Project> = decode_records(&self.descriptor.name, &root, "/data/projects");

        Ok(projects
            .into_iter()
            .map(|project| RawCandidate {
                url: id_string(&project.id)
                    .map(|id| format!("https://{}/en/projects/{}", self.descriptor.site, id)),
                title: non_empty(project.title),
                description: non_empty(project.description),
                published_at: parse_timestamp(project.created_at.as_deref(), NAIVE_DATETIME_FORMAT),
            })
            .collect())
    }
}
