//! Integration tests for the ingestion pipeline
//!
//! These tests use wiremock to stand in for the six external sites and
//! run full ingestions against a real SQLite file.

use gig_harvest::config::{parse_config, Config, FetchConfig, DEFAULT_USER_AGENT};
use gig_harvest::fetch::{FetchError, FetchRequest, Fetcher, HttpFetcher};
use gig_harvest::ingest::Pipeline;
use gig_harvest::sources::adapter_for;
use gig_harvest::storage::{SqliteStorage, Storage, ViewedFilter};
use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MOSTAQL_PAGE: &str = r#"
<table class="projects-table"><tbody>
  <tr><td>
    <h2 class="card--title"><a href="https://mostaql.com/project/1-api">Rust API</a></h2>
    <p class="project__brief"><a href="https://mostaql.com/project/1-api">Backend work</a></p>
    <time datetime="2025-04-16 09:31:00"></time>
  </td></tr>
</tbody></table>
"#;

const NAFEZLY_PAGE: &str = r#"
<div class="project-box">
  <a class="text-truncate" href="/project/2-app">Mobile app</a>
  <h3>Flutter</h3>
</div>
"#;

const BAAEED_PAGE: &str = r#"
<section class="baaeed-card"><table>
  <tr><td class="baaeed-list__details">
    <h3 class="card-title"><a href="https://baaeed.com/remote-jobs/3-dev">Remote dev</a></h3>
  </td></tr>
</table></section>
"#;

fn emploitic_body() -> serde_json::Value {
    json!({"results": [{
        "title": "Ingénieur logiciel",
        "alias": "ingenieur-logiciel-4",
        "publishedAt": "2025-04-15T08:00:00.000Z",
        "company": {"alias": "acme", "sector": {"label": "Informatique"}}
    }]})
}

fn bahr_body() -> serde_json::Value {
    json!({"data": {"projects": [
        {"id": 5, "title": "ERP", "description": "Odoo", "createdAt": "2025-04-14 10:00:00"}
    ]}})
}

fn ouedkniss_body() -> serde_json::Value {
    json!({"data": {"search": {"announcements": {"data": [
        {"id": 42, "slug": "dev-job", "title": "Dev", "createdAt": "2025-04-13T07:00:00+01:00"}
    ]}}}})
}

/// Mounts healthy responses for every source except `failing`
async fn mount_sources(server: &MockServer, failing: Option<&str>) {
    let html = [
        ("/mostaql", MOSTAQL_PAGE),
        ("/nafezly", NAFEZLY_PAGE),
        ("/baaeed", BAAEED_PAGE),
    ];
    let json_sources = [("/emploitic", emploitic_body()), ("/bahr", bahr_body())];

    for (route, page) in html {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response_for(route, failing).set_body_string(page))
            .mount(server)
            .await;
    }

    for (route, body) in json_sources {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response_for(route, failing).set_body_json(body))
            .mount(server)
            .await;
    }

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({"operationName": "SearchQuery"})))
        .respond_with(response_for("/graphql", failing).set_body_json(ouedkniss_body()))
        .mount(server)
        .await;
}

fn response_for(route: &str, failing: Option<&str>) -> ResponseTemplate {
    if failing == Some(route) {
        ResponseTemplate::new(500)
    } else {
        ResponseTemplate::new(200)
    }
}

/// Builds a config whose six sources all point at the mock server
fn create_test_config(base_url: &str, db_path: &str) -> Config {
    let content = format!(
        r##"
[fetch]
timeout-secs = 5

[output]
database-path = "{db}"

[[source]]
name = "mostaql"
site = "mostaql.com"
url = "{base}/mostaql"
parser = "html"
kind = "project"
color = "#2386c8"

[[source]]
name = "nafezly"
site = "nafezly.com"
url = "{base}/nafezly"
parser = "html"
kind = "project"
color = "#0bb07b"

[[source]]
name = "emploitic"
site = "emploitic.com"
url = "{base}/emploitic"
parser = "json"
kind = "job"
color = "#e8554e"

[[source]]
name = "baaeed"
site = "baaeed.com"
url = "{base}/baaeed"
parser = "html"
kind = "job"
color = "#7b61ff"

[[source]]
name = "bahr"
site = "bahr.sa"
url = "{base}/bahr"
parser = "json"
kind = "project"
color = "#f5a623"

[[source]]
name = "ouedkniss"
site = "ouedkniss.com"
url = "{base}/graphql"
parser = "graphql"
kind = "offer"
color = "#00a6a6"
"##,
        base = base_url,
        db = db_path
    );

    parse_config(&content).expect("test config should be valid")
}

fn open_pipeline(config: &Config) -> Pipeline<SqliteStorage> {
    let storage = SqliteStorage::new(std::path::Path::new(&config.output.database_path))
        .expect("Failed to open database");
    Pipeline::from_config(config, storage).expect("Failed to build pipeline")
}

#[tokio::test]
async fn test_full_ingestion_all_sources() {
    let mock_server = MockServer::start().await;
    mount_sources(&mock_server, None).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("listings.db");
    let config = create_test_config(&mock_server.uri(), db_path.to_str().unwrap());

    let mut pipeline = open_pipeline(&config);
    let created = pipeline.run_ingestion().await;

    let mut urls: Vec<_> = created.iter().map(|l| l.url.clone()).collect();
    urls.sort();
    assert_eq!(
        urls,
        vec![
            "https://baaeed.com/remote-jobs/3-dev",
            "https://bahr.sa/en/projects/5",
            "https://emploitic.com/entreprises/acme/offres-d-emploi/informatique/ingenieur-logiciel-4/",
            "https://mostaql.com/project/1-api",
            "https://nafezly.com/project/2-app",
            "https://ouedkniss.com/dev-job-d42",
        ]
    );

    // Newest first, the undated nafezly and baaeed listings last
    let listed = pipeline.store().list_listings(ViewedFilter::Unviewed).unwrap();
    assert_eq!(listed[0].url, "https://mostaql.com/project/1-api");
    assert!(listed[4].published_at.is_none());
    assert!(listed[5].published_at.is_none());
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let mock_server = MockServer::start().await;
    mount_sources(&mock_server, None).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("listings.db");
    let config = create_test_config(&mock_server.uri(), db_path.to_str().unwrap());

    let first = open_pipeline(&config).run_ingestion().await;
    assert_eq!(first.len(), 6);

    // A fresh process against the same database finds nothing new
    let mut pipeline = open_pipeline(&config);
    let second = pipeline.run_ingestion().await;
    assert!(second.is_empty());
    assert_eq!(pipeline.store().count_listings().unwrap(), 6);
}

#[tokio::test]
async fn test_failing_source_is_isolated() {
    let mock_server = MockServer::start().await;
    mount_sources(&mock_server, Some("/bahr")).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("listings.db");
    let config = create_test_config(&mock_server.uri(), db_path.to_str().unwrap());

    let created = open_pipeline(&config).run_ingestion().await;

    assert_eq!(created.len(), 5);
    assert!(created.iter().all(|l| l.source() != "bahr.sa"));
}

#[tokio::test]
async fn test_graphql_source_down_others_still_stored() {
    let mock_server = MockServer::start().await;
    mount_sources(&mock_server, Some("/graphql")).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("listings.db");
    let config = create_test_config(&mock_server.uri(), db_path.to_str().unwrap());

    let created = open_pipeline(&config).run_ingestion().await;
    assert_eq!(created.len(), 5);
    assert!(created.iter().all(|l| l.source() != "ouedkniss.com"));
}

#[tokio::test]
async fn test_fetcher_sends_browser_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
    let response = fetcher
        .fetch(&FetchRequest::get(format!("{}/page", mock_server.uri())))
        .await
        .expect("request with the browser user agent should succeed");

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_fetcher_reports_bad_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/gone", mock_server.uri());
    let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
    let error = fetcher.fetch(&FetchRequest::get(url.clone())).await.unwrap_err();

    assert!(matches!(error, FetchError::Status { status: 404, .. }));
    assert_eq!(error.url(), url);
}

#[tokio::test]
async fn test_fetcher_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let config = FetchConfig {
        timeout_secs: 1,
        ..FetchConfig::default()
    };
    let fetcher = HttpFetcher::new(&config).unwrap();
    let error = fetcher
        .fetch(&FetchRequest::get(format!("{}/slow", mock_server.uri())))
        .await
        .unwrap_err();

    assert!(matches!(error, FetchError::Timeout { .. }));
}

#[tokio::test]
async fn test_fetcher_posts_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({"variables": {"page": 1}})))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
    let request = FetchRequest::post_json(
        format!("{}/graphql", mock_server.uri()),
        json!({"query": "{ ping }", "variables": {"page": 1}}),
    );

    let response = fetcher.fetch(&request).await.unwrap();
    assert_eq!(response.body, "{}");
}

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_failed_fetch_is_warned_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bahr"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut descriptor = Config::default().source("bahr").unwrap().clone();
    descriptor.url = format!("{}/bahr", mock_server.uri());
    let adapter = adapter_for(&descriptor).unwrap();
    let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();

    let candidates = adapter.fetch_candidates(&fetcher).await;
    assert!(candidates.is_empty());

    let warnings: Vec<_> = logs
        .lines()
        .into_iter()
        .filter(|line| line.contains("WARN"))
        .collect();
    assert_eq!(warnings.len(), 1, "warn lines: {:?}", warnings);
    assert!(warnings[0].contains("Skipping source"));
    assert!(warnings[0].contains("503"));
}
