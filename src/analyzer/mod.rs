// Analyzer module: relevance filtering and category assignment.

pub mod category;
pub mod fuzzy;
pub mod relevance;

pub use category::{CategoryClassifier, CategoryMatch, Taxonomy, UNCATEGORIZED};
pub use relevance::{Evaluation, RelevanceFilter};
