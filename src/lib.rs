//! Job Radar - collects job postings, keeps the IT-relevant ones and files
//! each into a fixed category taxonomy.
//!
//! The relevance filter and category classifier in [`analyzer`] are pure and
//! synchronous; sources, detail pages and storage sit around them in
//! [`pipeline`].

pub mod analyzer;
pub mod config;
pub mod logging;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod schedule;
pub mod scraper;
pub mod storage;

pub use analyzer::{CategoryClassifier, RelevanceFilter, UNCATEGORIZED};
pub use config::{load_config, AppConfig, ClassifierConfig};
pub use model::{CategorizedListing, Heuristic, RawListing, ScoredListing};
pub use pipeline::{Pipeline, PipelineReport};
