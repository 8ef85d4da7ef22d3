use serde::Deserialize;
use std::fmt;

/// Desktop browser identification sent to every source
///
/// Several of the sites reject requests carrying a library's default agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for Gig-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default = "builtin_sources", rename = "source")]
    pub sources: Vec<SourceDescriptor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            output: OutputConfig::default(),
            sources: builtin_sources(),
        }
    }
}

impl Config {
    /// Looks up a source by its name
    pub fn source(&self, name: &str) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Looks up the source whose listings live on the given host
    pub fn source_for_site(&self, site: &str) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|s| s.site == site)
    }
}

/// HTTP behavior shared by every source
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Total time allowed for one request, in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with each request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// Static description of one external listing source
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceDescriptor {
    /// Short identifier, also used to pick the adapter
    pub name: String,

    /// Host the canonical listing URLs point at (e.g. "bahr.sa")
    pub site: String,

    /// Endpoint queried on each run
    pub url: String,

    /// Response format of the endpoint
    pub parser: ParserKind,

    /// What the source lists
    pub kind: ListingKind,

    /// Display color, `#rrggbb`
    pub color: String,
}

/// Response format of a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    Html,
    Json,
    #[serde(rename = "graphql")]
    GraphQl,
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Html => "html",
            Self::Json => "json",
            Self::GraphQl => "graphql",
        };
        f.write_str(s)
    }
}

/// Kind of posting a source publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Project,
    Job,
    Offer,
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Project => "project",
            Self::Job => "job",
            Self::Offer => "offer",
        };
        f.write_str(s)
    }
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_database_path() -> String {
    "./listings.db".to_string()
}

fn descriptor(
    name: &str,
    site: &str,
    url: &str,
    parser: ParserKind,
    kind: ListingKind,
    color: &str,
) -> SourceDescriptor {
    SourceDescriptor {
        name: name.to_string(),
        site: site.to_string(),
        url: url.to_string(),
        parser,
        kind,
        color: color.to_string(),
    }
}

/// The six sources queried when the config file names none
pub fn builtin_sources() -> Vec<SourceDescriptor> {
    vec![
        descriptor(
            "mostaql",
            "mostaql.com",
            "https://mostaql.com/projects?category=development,support&budget_max=10000&sort=latest",
            ParserKind::Html,
            ListingKind::Project,
            "#2386c8",
        ),
        descriptor(
            "nafezly",
            "nafezly.com",
            "https://nafezly.com/projects?specialize=development&page=1",
            ParserKind::Html,
            ListingKind::Project,
            "#0bb07b",
        ),
        descriptor(
            "emploitic",
            "emploitic.com",
            "https://emploitic.com/api/v4/jobs?sort[0]=publishedAt_timestamp:desc\
             &filter=(criteria.profession.id=%27a0d04378f37973ffa3b2aa8b3e27a3f0a98de06d%27)\
             &pagination[page]=1&pagination[pageSize]=20",
            ParserKind::Json,
            ListingKind::Job,
            "#e8554e",
        ),
        descriptor(
            "baaeed",
            "baaeed.com",
            "https://baaeed.com/remote-jobs?sort=latest&categories=remote-programming-jobs,other-remote-jobs",
            ParserKind::Html,
            ListingKind::Job,
            "#7b61ff",
        ),
        descriptor(
            "bahr",
            "bahr.sa",
            "https://bahr.sa/api/projects?status[]=Open&offset=10&sort=DESC&sortBy=publishDate\
             &categories[]=0190c21f-f7cc-75f2-aef3-6d020d74e9a1\
             &categories[]=0190c21f-f7ad-7222-9410-13e74073549c\
             &categories[]=0190c21f-f7cd-7c9e-b4e5-01b4229cfc4f\
             &categories[]=0190c21f-f7cc-75f2-aef3-6d020ca6b9c7\
             &page=1",
            ParserKind::Json,
            ListingKind::Project,
            "#f5a623",
        ),
        descriptor(
            "ouedkniss",
            "ouedkniss.com",
            "https://api.ouedkniss.com/graphql",
            ParserKind::GraphQl,
            ListingKind::Offer,
            "#00a6a6",
        ),
    ]
}
