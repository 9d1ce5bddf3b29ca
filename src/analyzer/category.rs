use crate::analyzer::fuzzy::token_set_ratio;
use crate::config::ClassifierConfig;
use crate::model::{CategorizedListing, ConfigError, ScoredListing};
use crate::normalizer::normalize_title;
use chrono::Utc;

/// Category assigned when no taxonomy entry reaches the confidence floor.
pub const UNCATEGORIZED: &str = "Other / Uncategorized";

#[derive(Debug, Clone)]
struct Category {
    name: String,
    keywords: Vec<String>,
}

/// Ordered, validated mapping of category name to keywords.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let categories = config
            .taxonomy
            .iter()
            .map(|c| Category {
                name: c.name.clone(),
                keywords: c
                    .keywords
                    .iter()
                    .map(|k| normalize_title(k))
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();
        Ok(Self { categories })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Best category for a title with the score that won it.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMatch {
    pub category: String,
    pub score: f64,
}

/// Assigns each listing exactly one category from the taxonomy, using the
/// title only.
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    taxonomy: Taxonomy,
    confidence_threshold: f64,
}

impl CategoryClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            taxonomy: Taxonomy::from_config(config)?,
            confidence_threshold: config.category_confidence_threshold,
        })
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Highest-scoring category. Scores are whole numbers 0..=100 and earlier
    /// categories win ties.
    pub fn best_match(&self, title: &str) -> Option<CategoryMatch> {
        let title = normalize_title(title);
        let mut best: Option<CategoryMatch> = None;
        for category in &self.taxonomy.categories {
            let score = category
                .keywords
                .iter()
                .map(|k| token_set_ratio(&title, k).round())
                .fold(0.0, f64::max);
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(CategoryMatch {
                    category: category.name.clone(),
                    score,
                });
            }
        }
        best
    }

    pub fn classify(&self, title: &str) -> String {
        match self.best_match(title) {
            Some(m) if m.score >= self.confidence_threshold => m.category,
            _ => UNCATEGORIZED.to_string(),
        }
    }

    /// Categorizes every listing, preserving input order.
    pub fn classify_batch(&self, listings: Vec<ScoredListing>) -> Vec<CategorizedListing> {
        let collected_at = Utc::now();
        listings
            .into_iter()
            .map(|scored| {
                let category = self.classify(&scored.listing.title);
                CategorizedListing {
                    listing: scored.listing,
                    heuristic: Some(scored.heuristic),
                    details: scored.details,
                    category,
                    collected_at,
                }
            })
            .collect()
    }
}
