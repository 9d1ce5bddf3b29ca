// One end-to-end pass: fetch, filter, dedupe, enrich, categorize, persist
use crate::analyzer::{CategoryClassifier, RelevanceFilter};
use crate::config::{AppConfig, ClassifierConfig, SourceConfig, SourceKind};
use crate::model::{ConfigError, ScoredListing, StorageError};
use crate::parser::DetailParser;
use crate::scraper::{FileSource, HttpClient, JsonFeedSource, ListingSource};
use crate::storage::{export_json, SqliteStorage};
use futures::future::join_all;
use std::collections::{BTreeMap, HashSet};
use tracing::{info, warn};

/// A configured source with its per-source processing options.
pub struct SourceEntry {
    pub source: Box<dyn ListingSource>,
    pub apply_relevance_filter: bool,
    pub details: Option<DetailParser>,
}

impl SourceEntry {
    pub fn new(source: Box<dyn ListingSource>) -> Self {
        Self {
            source,
            apply_relevance_filter: true,
            details: None,
        }
    }

    fn from_config(cfg: &SourceConfig, client: &HttpClient) -> Result<Self, ConfigError> {
        let source: Box<dyn ListingSource> = match &cfg.kind {
            SourceKind::Feed { url } => Box::new(JsonFeedSource::new(&cfg.name, url, client.clone())),
            SourceKind::File { path } => Box::new(FileSource::new(&cfg.name, path)),
        };
        let details = cfg
            .details
            .as_ref()
            .map(DetailParser::new)
            .transpose()
            .map_err(|e| ConfigError::Invalid(format!("source `{}`: {}", cfg.name, e)))?;
        Ok(Self {
            source,
            apply_relevance_filter: cfg.apply_relevance_filter,
            details,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceReport {
    pub name: String,
    pub fetched: usize,
    pub relevant: usize,
    pub new: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pub sources: Vec<SourceReport>,
    pub saved: usize,
    pub categories: BTreeMap<String, usize>,
}

impl PipelineReport {
    pub fn fetched(&self) -> usize {
        self.sources.iter().map(|s| s.fetched).sum()
    }

    pub fn relevant(&self) -> usize {
        self.sources.iter().map(|s| s.relevant).sum()
    }
}

pub struct Pipeline {
    filter: RelevanceFilter,
    classifier: CategoryClassifier,
    sources: Vec<SourceEntry>,
    client: HttpClient,
    export_path: Option<String>,
}

impl Pipeline {
    pub fn new(
        classifier_config: &ClassifierConfig,
        sources: Vec<SourceEntry>,
        client: HttpClient,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            filter: RelevanceFilter::new(classifier_config)?,
            classifier: CategoryClassifier::new(classifier_config)?,
            sources,
            client,
            export_path: None,
        })
    }

    pub fn from_config(config: &AppConfig, client: HttpClient) -> Result<Self, ConfigError> {
        let sources = config
            .sources
            .iter()
            .filter(|s| s.enabled)
            .map(|s| SourceEntry::from_config(s, &client))
            .collect::<Result<Vec<_>, _>>()?;
        let mut pipeline = Self::new(&config.classifier, sources, client)?;
        pipeline.export_path = config.export_path.clone();
        Ok(pipeline)
    }

    pub fn with_export_path(mut self, path: impl Into<String>) -> Self {
        self.export_path = Some(path.into());
        self
    }

    /// Fetches, filters and enriches one source. Never fails: errors land in the report.
    async fn collect_source(
        &self,
        entry: &SourceEntry,
        known: &HashSet<String>,
    ) -> (SourceReport, Vec<ScoredListing>) {
        let name = entry.source.name().to_string();
        let mut report = SourceReport {
            name: name.clone(),
            ..SourceReport::default()
        };

        let raw = match entry.source.fetch_listings().await {
            Ok(listings) => listings,
            Err(e) => {
                warn!("{}: fetch failed: {}", name, e);
                report.error = Some(e.to_string());
                return (report, Vec::new());
            }
        };
        report.fetched = raw.len();
        if raw.is_empty() {
            warn!("{}: no listings found", name);
        }

        for listing in &raw {
            for issue in listing.malformed() {
                warn!(source = %name, title = %listing.title, "{}", issue);
            }
        }

        let candidates: Vec<ScoredListing> = self
            .filter
            .evaluate(&raw)
            .into_iter()
            .filter(|e| e.accepted || !entry.apply_relevance_filter)
            .map(|e| e.listing)
            .collect();
        report.relevant = candidates.len();

        let mut seen = HashSet::new();
        let mut fresh: Vec<ScoredListing> = candidates
            .into_iter()
            .filter(|s| match s.listing.key() {
                Some(key) => !known.contains(key) && seen.insert(key.to_string()),
                None => true,
            })
            .collect();
        report.new = fresh.len();
        info!(
            "{}: {} fetched, {} relevant, {} new",
            name, report.fetched, report.relevant, report.new
        );

        if let Some(parser) = &entry.details {
            for scored in fresh.iter_mut() {
                let Some(url) = scored.listing.key() else { continue };
                match parser.fetch(&self.client, url).await {
                    Ok(details) => scored.details = Some(details),
                    Err(e) => warn!("{}: details for {} failed: {}", name, url, e),
                }
            }
        }

        (report, fresh)
    }

    pub async fn run(&self, storage: &mut SqliteStorage) -> Result<PipelineReport, StorageError> {
        info!("Starting pipeline over {} sources", self.sources.len());
        let known = storage.known_keys()?;
        info!("Loaded {} existing jobs from storage", known.len());

        let results = join_all(
            self.sources
                .iter()
                .map(|entry| self.collect_source(entry, &known)),
        )
        .await;

        let mut report = PipelineReport::default();
        let mut batch_keys = HashSet::new();
        let mut batch = Vec::new();
        for (source_report, listings) in results {
            report.sources.push(source_report);
            batch.extend(listings.into_iter().filter(|s| match s.listing.key() {
                Some(key) => batch_keys.insert(key.to_string()),
                None => true,
            }));
        }

        if batch.is_empty() {
            info!("No new jobs found.");
        } else {
            let categorized = self.classifier.classify_batch(batch);
            for job in &categorized {
                *report.categories.entry(job.category.clone()).or_default() += 1;
            }
            report.saved = storage.save_jobs(&categorized)?;
            info!("Saved {} new jobs", report.saved);
        }

        if let Some(path) = &self.export_path {
            export_json(storage, path)?;
        }

        info!("Pipeline completed.");
        Ok(report)
    }
}
