//! emploitic.com job offers (JSON API)
//!
//! The API does not return a link to the offer page. The public URL is
//! rebuilt from the job alias, the company alias and the company's sector.

use crate::config::SourceDescriptor;
use crate::sources::extract::{
    decode_records, lenient, non_empty, parse_timestamp, NAIVE_DATETIME_FORMAT,
};
use crate::sources::{ParseError, RawCandidate, SourceAdapter};
use serde::Deserialize;
use slug::slugify;

#[derive(Debug, Deserialize)]
struct Job {
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    alias: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<String>,
    #[serde(rename = "publishedAt", default, deserialize_with = "lenient")]
    published_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    company: Option<Company>,
}

#[derive(Debug, Deserialize)]
struct Company {
    #[serde(default, deserialize_with = "lenient")]
    alias: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    sector: Option<Sector>,
}

#[derive(Debug, Deserialize)]
struct Sector {
    #[serde(default, deserialize_with = "lenient")]
    label: Option<String>,
}

pub struct Emploitic {
    descriptor: SourceDescriptor,
}

impl Emploitic {
    pub fn new(descriptor: SourceDescriptor) -> Self {
        Self { descriptor }
    }

    fn job_url(&self, job: &Job) -> Option<String> {
        let alias = non_empty(job.alias.clone())?;
        let company = job.company.as_ref();
        let sector = company
            .and_then(|c| c.sector.as_ref())
            .and_then(|s| s.label.as_deref())
            .map(slugify)
            .unwrap_or_default();
        let site = &self.descriptor.site;

        Some(match non_empty(company.and_then(|c| c.alias.clone())) {
            Some(company) => format!(
                "https://{}/entreprises/{}/offres-d-emploi/{}/{}/",
                site, company, sector, alias
            ),
            None => format!("https://{}/offres-d-emploi/{}/{}", site, sector, alias),
        })
    }
}

impl SourceAdapter for Emploitic {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    fn parse(&self, body: &str) -> Result<Vec<RawCandidate>, ParseError> {
        let root: serde_json::Value = serde_json::from_str(body)?;
        let jobs: Vec<Job> = decode_records(&self.descriptor.name, &root, "/results");

        Ok(jobs
            .iter()
            .map(|job| RawCandidate {
                title: non_empty(job.title.clone()),
                url: self.job_url(job),
                description: non_empty(job.description.clone()),
                published_at: parse_timestamp(job.published_at.as_deref(), NAIVE_DATETIME_FORMAT),
            })
            .collect())
    }
}
