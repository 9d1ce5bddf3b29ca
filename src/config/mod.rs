mod defaults;

pub use defaults::{default_fuzzy_only_keywords, default_keywords, default_taxonomy};

use crate::model::ConfigError;
use crate::normalizer::normalize;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Tuning for the relevance filter and category classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Scored by fuzzy similarity only; never counted as substring hits.
    #[serde(default = "default_fuzzy_only_keywords")]
    pub fuzzy_only_keywords: Vec<String>,
    #[serde(default = "default_minimum_keyword_hits")]
    pub minimum_keyword_hits: usize,
    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: f64,
    #[serde(default = "default_fuzzy_weight")]
    pub fuzzy_weight: f64,
    #[serde(default = "default_combined_accept_threshold")]
    pub combined_accept_threshold: f64,
    #[serde(default = "default_category_confidence_threshold")]
    pub category_confidence_threshold: f64,
    #[serde(default = "default_taxonomy")]
    pub taxonomy: Vec<CategoryConfig>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            fuzzy_only_keywords: default_fuzzy_only_keywords(),
            minimum_keyword_hits: default_minimum_keyword_hits(),
            keyword_weight: default_keyword_weight(),
            fuzzy_weight: default_fuzzy_weight(),
            combined_accept_threshold: default_combined_accept_threshold(),
            category_confidence_threshold: default_category_confidence_threshold(),
            taxonomy: default_taxonomy(),
        }
    }
}

fn default_minimum_keyword_hits() -> usize { 1 }
fn default_keyword_weight() -> f64 { 0.7 }
fn default_fuzzy_weight() -> f64 { 0.3 }
fn default_combined_accept_threshold() -> f64 { 0.21 }
fn default_category_confidence_threshold() -> f64 { 60.0 }

impl ClassifierConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keywords.is_empty() {
            return Err(ConfigError::Invalid("relevance keyword list is empty".into()));
        }
        // A keyword made only of punctuation normalizes to nothing and can never match.
        if let Some(bad) = self
            .keywords
            .iter()
            .chain(&self.fuzzy_only_keywords)
            .find(|k| normalize(k).is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "relevance keyword `{bad}` has no letters or digits"
            )));
        }
        if self.taxonomy.is_empty() {
            return Err(ConfigError::Invalid("taxonomy is empty".into()));
        }
        let mut names = HashSet::new();
        for category in &self.taxonomy {
            if category.name.trim().is_empty() {
                return Err(ConfigError::Invalid("taxonomy has a category without a name".into()));
            }
            if !names.insert(category.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate category `{}`",
                    category.name
                )));
            }
            if category.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "category `{}` has no keywords",
                    category.name
                )));
            }
        }
        for (name, value) in [
            ("keyword_weight", self.keyword_weight),
            ("fuzzy_weight", self.fuzzy_weight),
            ("combined_accept_threshold", self.combined_accept_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{name} must be within 0..=1, got {value}")));
            }
        }
        if !(0.0..=100.0).contains(&self.category_confidence_threshold) {
            return Err(ConfigError::Invalid(format!(
                "category_confidence_threshold must be within 0..=100, got {}",
                self.category_confidence_threshold
            )));
        }
        Ok(())
    }
}

/// CSS selectors used to pull details out of a posting page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailSelectors {
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub employment_status: Option<String>,
    pub published: Option<String>,
    pub description: Option<String>,
    pub responsibilities: Option<String>,
    pub skills: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceKind {
    /// JSON array served over HTTP.
    Feed { url: String },
    /// JSON array written to disk by an external scraper.
    File { path: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    #[serde(flatten)]
    pub kind: SourceKind,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub apply_relevance_filter: bool,
    #[serde(default)]
    pub details: Option<DetailSelectors>,
}

fn default_true() -> bool { true }

/// Daily run window, local hours inclusive.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
        }
    }
}

fn default_start_hour() -> u32 { 1 }
fn default_end_hour() -> u32 { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default)]
    pub export_path: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    pub sources: Vec<SourceConfig>,
}

fn default_database_path() -> String { "jobs.db".to_string() }
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) JobRadarBot/0.1".to_string()
}
fn default_request_timeout_seconds() -> u64 { 30 }

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.classifier.validate()?;
        let ScheduleConfig { start_hour, end_hour } = self.schedule;
        if start_hour > 23 || end_hour > 23 || start_hour > end_hour {
            return Err(ConfigError::Invalid(format!(
                "schedule window {start_hour}..={end_hour} is not a valid hour range"
            )));
        }
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid("no sources configured".into()));
        }
        let mut names = HashSet::new();
        for source in &self.sources {
            if !names.insert(source.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate source `{}`", source.name)));
            }
        }
        Ok(())
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "sources": [
            {"name": "shomvob", "type": "file", "path": "links.json"},
            {"name": "bdjobs", "type": "feed", "url": "https://example.com/jobs.json",
             "apply_relevance_filter": false}
        ]
    }"#;

    #[test]
    fn test_defaults_applied() {
        let config = parse_config(MINIMAL).unwrap();
        let c = &config.classifier;
        assert_eq!(c.minimum_keyword_hits, 1);
        assert_eq!(c.keyword_weight, 0.7);
        assert_eq!(c.fuzzy_weight, 0.3);
        assert_eq!(c.combined_accept_threshold, 0.21);
        assert_eq!(c.category_confidence_threshold, 60.0);
        assert_eq!(c.taxonomy.first().map(|t| t.name.as_str()), Some("Software Engineering"));
        assert_eq!(config.schedule.start_hour, 1);
        assert_eq!(config.schedule.end_hour, 5);
        assert_eq!(config.database_path, "jobs.db");
    }

    #[test]
    fn test_source_kinds() {
        let config = parse_config(MINIMAL).unwrap();
        assert!(matches!(config.sources[0].kind, SourceKind::File { .. }));
        assert!(config.sources[0].apply_relevance_filter);
        assert!(matches!(config.sources[1].kind, SourceKind::Feed { ref url } if url.ends_with("jobs.json")));
        assert!(!config.sources[1].apply_relevance_filter);
    }

    #[test]
    fn test_taxonomy_order_preserved() {
        let json = r#"{
            "classifier": {"taxonomy": [
                {"name": "Zeta", "keywords": ["z"]},
                {"name": "Alpha", "keywords": ["a"]}
            ]},
            "sources": [{"name": "s", "type": "file", "path": "p"}]
        }"#;
        let config = parse_config(json).unwrap();
        let names: Vec<_> = config.classifier.taxonomy.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Zeta", "Alpha"]);
    }

    #[test]
    fn test_empty_taxonomy_rejected() {
        let json = r#"{"classifier": {"taxonomy": []}, "sources": [{"name": "s", "type": "file", "path": "p"}]}"#;
        assert!(matches!(parse_config(json), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_category_without_keywords_rejected() {
        let mut c = ClassifierConfig::default();
        c.taxonomy.push(CategoryConfig { name: "Empty".into(), keywords: vec![" ".into()] });
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let c = ClassifierConfig { keywords: vec![], ..ClassifierConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_punctuation_only_keywords_rejected() {
        let c = ClassifierConfig {
            keywords: vec!["++".into(), "#".into(), "/".into()],
            ..ClassifierConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::Invalid(_))));

        let c = ClassifierConfig {
            keywords: vec!["python".into(), " ".into()],
            ..ClassifierConfig::default()
        };
        assert!(c.validate().is_err());

        let c = ClassifierConfig {
            fuzzy_only_keywords: vec!["--".into()],
            ..ClassifierConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_fuzzy_only_keywords_configurable() {
        let json = r#"{"classifier": {"fuzzy_only_keywords": []},
            "sources": [{"name": "s", "type": "file", "path": "p"}]}"#;
        let config = parse_config(json).unwrap();
        assert!(config.classifier.fuzzy_only_keywords.is_empty());
        assert!(parse_config(MINIMAL).unwrap().classifier.fuzzy_only_keywords.contains(&"AI".to_string()));
    }

    #[test]
    fn test_threshold_bounds() {
        let c = ClassifierConfig { combined_accept_threshold: 1.5, ..ClassifierConfig::default() };
        assert!(c.validate().is_err());
        let c = ClassifierConfig { category_confidence_threshold: 120.0, ..ClassifierConfig::default() };
        assert!(c.validate().is_err());
        assert!(ClassifierConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_schedule_rejected() {
        let json = r#"{"schedule": {"start_hour": 6, "end_hour": 2},
            "sources": [{"name": "s", "type": "file", "path": "p"}]}"#;
        assert!(parse_config(json).is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_config("{"), Err(ConfigError::Parse(_))));
    }
}
