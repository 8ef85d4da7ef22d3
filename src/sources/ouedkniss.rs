//! ouedkniss.com job offers (GraphQL search API)

use crate::config::SourceDescriptor;
use crate::fetch::FetchRequest;
use crate::sources::extract::{
    decode_records, id_string, lenient, non_empty, parse_timestamp, NAIVE_DATETIME_FORMAT,
};
use crate::sources::{ParseError, RawCandidate, SourceAdapter};
use serde::Deserialize;
use serde_json::{json, Value};

const SEARCH_QUERY: &str = r#"
query SearchQuery($q: String, $filter: SearchFilterInput) {
  search(q: $q, filter: $filter) {
    announcements {
      data {
        id
        title
        slug
        description
        createdAt: refreshedAt
        __typename
      }
      paginatorInfo {
        lastPage
        hasMorePages
        __typename
      }
      __typename
    }
    __typename
  }
}
"#;

/// IT and internet job offers
const CATEGORY_SLUG: &str = "emploi_offres-informatique-internet";
const PAGE_SIZE: u32 = 48;

#[derive(Debug, Deserialize)]
struct Announcement {
    #[serde(default)]
    id: Value,
    #[serde(default, deserialize_with = "lenient")]
    slug: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<String>,
    #[serde(rename = "createdAt", default, deserialize_with = "lenient")]
    created_at: Option<String>,
}

pub struct Ouedkniss {
    descriptor: SourceDescriptor,
}

impl Ouedkniss {
    pub fn new(descriptor: SourceDescriptor) -> Self {
        Self { descriptor }
    }

    /// GraphQL request body: operation name, filter variables and query
    pub fn payload() -> Value {
        json!({
            "operationName": "SearchQuery",
            "variables": {
                "q": null,
                "filter": {
                    "categorySlug": CATEGORY_SLUG,
                    "origin": null,
                    "connected": false,
                    "delivery": null,
                    "regionIds": [],
                    "cityIds": [],
                    "priceRange": [],
                    "exchange": false,
                    "hasPictures": false,
                    "hasPrice": false,
                    "priceUnit": null,
                    "fields": [],
                    "page": 1,
                    "count": PAGE_SIZE
                }
            },
            "query": SEARCH_QUERY
        })
    }

    fn offer_url(&self, offer: &Announcement) -> Option<String> {
        let slug = non_empty(offer.slug.clone())?;
        let id = id_string(&offer.id)?;
        Some(format!("https://{}/{}-d{}", self.descriptor.site, slug, id))
    }
}

impl SourceAdapter for Ouedkniss {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    fn request(&self) -> FetchRequest {
        FetchRequest::post_json(self.descriptor.url.as_str(), Self::payload())
    }

    fn parse(&self, body: &str) -> Result<Vec<RawCandidate>, ParseError> {
        let root: Value = serde_json::from_str(body)?;
        let offers: Vec<Announcement> = decode_records(
            &self.descriptor.name,
            &root,
            "/data/search/announcements/data",
        );

        Ok(offers
            .iter()
            .map(|offer| RawCandidate {
                title: non_empty(offer.title.clone()),
                url: self.offer_url(offer),
                description: non_empty(offer.description.clone()),
                published_at: parse_timestamp(offer.created_at.as_deref(), NAIVE_DATETIME_FORMAT),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fetch::Method;

    fn adapter() -> Ouedkniss {
        Ouedkniss::new(Config::default().source("ouedkniss").unwrap().clone())
    }

    #[test]
    fn test_url_from_slug_and_id() {
        let body = r#"{"data":{"search":{"announcements":{"data":[
            {"id": 42, "slug": "dev-job", "title": "Dev", "createdAt": "2025-04-16T09:31:00+01:00"}
        ]}}}}"#;

        let candidates = adapter().parse(body).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].url.as_deref(),
            Some("https://ouedkniss.com/dev-job-d42")
        );
        assert_eq!(candidates[0].title.as_deref(), Some("Dev"));
        assert!(candidates[0].published_at.is_some());
    }

    #[test]
    fn test_mistyped_date_keeps_the_offer() {
        let body = r#"{"data":{"search":{"announcements":{"data":[
            {"id": 44, "slug": "sysadmin", "title": "Sysadmin", "description": 12, "createdAt": {"ts": 1}}
        ]}}}}"#;

        let candidates = adapter().parse(body).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].url.as_deref(),
            Some("https://ouedkniss.com/sysadmin-d44")
        );
        assert_eq!(candidates[0].description, None);
        assert_eq!(candidates[0].published_at, None);
    }

    #[test]
    fn test_missing_slug_has_no_url() {
        let body = r#"{"data":{"search":{"announcements":{"data":[{"id": "43", "title": "No slug"}]}}}}"#;
        let candidates = adapter().parse(body).unwrap();
        assert!(!candidates[0].has_url());
    }

    #[test]
    fn test_graphql_errors_envelope() {
        let body = r#"{"errors":[{"message":"Syntax Error"}],"data":null}"#;
        assert!(adapter().parse(body).unwrap().is_empty());
    }

    #[test]
    fn test_request_is_post_with_fixed_payload() {
        let request = adapter().request();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "https://api.ouedkniss.com/graphql");

        let body = request.body.unwrap();
        assert_eq!(body["operationName"], "SearchQuery");
        assert_eq!(body["variables"]["filter"]["categorySlug"], CATEGORY_SLUG);
        assert_eq!(body["variables"]["filter"]["count"], 48);
        assert!(body["query"].as_str().unwrap().contains("announcements"));
    }
}
