// Core structs: RawListing, ScoredListing, CategorizedListing and errors
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A job listing as produced by an upstream link scraper.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawListing {
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub deadline: Option<String>,
    pub source: String,
}

/// Wire shape accepted at the ingestion boundary. Both spellings of the
/// title and key fields are tolerated.
#[derive(Deserialize)]
struct IncomingListing {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    job_title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    deadline: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

fn first_non_empty(a: Option<String>, b: Option<String>) -> Option<String> {
    a.filter(|s| !s.trim().is_empty())
        .or_else(|| b.filter(|s| !s.trim().is_empty()))
}

impl<'de> Deserialize<'de> for RawListing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let incoming = IncomingListing::deserialize(deserializer)?;
        Ok(RawListing {
            title: first_non_empty(incoming.title, incoming.job_title).unwrap_or_default(),
            description: incoming.description,
            link: first_non_empty(incoming.link, incoming.url),
            deadline: incoming.deadline,
            source: incoming.source.unwrap_or_default(),
        })
    }
}

impl RawListing {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Identifying key used for deduplication.
    pub fn key(&self) -> Option<&str> {
        self.link.as_deref().filter(|l| !l.trim().is_empty())
    }

    /// Title and description joined by a single space.
    pub fn text(&self) -> String {
        match self.description.as_deref() {
            Some(desc) if !desc.is_empty() => format!("{} {}", self.title, desc),
            _ => self.title.clone(),
        }
    }

    pub fn malformed(&self) -> Vec<MalformedInput> {
        let mut issues = Vec::new();
        let no_desc = self.description.as_deref().is_none_or(|d| d.trim().is_empty());
        if self.title.trim().is_empty() && no_desc {
            issues.push(MalformedInput::MissingText);
        }
        if self.key().is_none() {
            issues.push(MalformedInput::MissingKey);
        }
        issues
    }
}

/// Data-shape problems that are reported but never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedInput {
    MissingText,
    MissingKey,
}

impl fmt::Display for MalformedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedInput::MissingText => write!(f, "listing has neither title nor description"),
            MalformedInput::MissingKey => write!(f, "listing has neither link nor url"),
        }
    }
}

/// Audit record of a relevance decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heuristic {
    pub keyword_hits: Vec<String>,
    pub fuzzy_score: f64,
    pub fuzzy_keyword: Option<String>,
    pub combined_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredListing {
    #[serde(flatten)]
    pub listing: RawListing,
    pub heuristic: Heuristic,
    pub details: Option<JobDetails>,
}

/// Fields extracted from a posting's detail page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDetails {
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub employment_status: Option<String>,
    pub published: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedListing {
    #[serde(flatten)]
    pub listing: RawListing,
    pub heuristic: Option<Heuristic>,
    pub details: Option<JobDetails>,
    pub category: String,
    pub collected_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("unexpected status {0} from {1}")]
    InvalidResponse(u16, String),
    #[error("failed to read source file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed listings payload: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("invalid selector `{0}`")]
    InvalidSelector(String),
    #[error("failed to fetch detail page: {0}")]
    Fetch(#[from] SourceError),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
