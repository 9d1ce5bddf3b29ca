use crate::analyzer::fuzzy::token_set_ratio;
use crate::config::ClassifierConfig;
use crate::model::{ConfigError, Heuristic, RawListing, ScoredListing};
use crate::normalizer::normalize;
use tracing::debug;

/// Outcome of scoring a single listing, kept for accepted and rejected alike.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub listing: ScoredListing,
    pub accepted: bool,
}

#[derive(Debug, Clone)]
struct Keyword {
    original: String,
    normalized: String,
    counts_as_hit: bool,
}

/// Decides whether a listing belongs to the IT domain.
///
/// The combined score gives `keyword_weight` when at least
/// `minimum_keyword_hits` keywords occur verbatim in the normalized text, plus
/// the best token-set ratio scaled by `fuzzy_weight`. Listings at or above
/// `combined_accept_threshold` are accepted. Fuzzy-only keywords take part in
/// the fuzzy score but never in the hit count.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    keywords: Vec<Keyword>,
    minimum_keyword_hits: usize,
    keyword_weight: f64,
    fuzzy_weight: f64,
    accept_threshold: f64,
}

impl RelevanceFilter {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let hit_keywords = config.keywords.iter().map(|k| (k, true));
        let fuzzy_only = config.fuzzy_only_keywords.iter().map(|k| (k, false));
        let keywords = hit_keywords
            .chain(fuzzy_only)
            .map(|(k, counts_as_hit)| Keyword {
                original: k.clone(),
                normalized: normalize(k),
                counts_as_hit,
            })
            .collect();
        Ok(Self {
            keywords,
            minimum_keyword_hits: config.minimum_keyword_hits,
            keyword_weight: config.keyword_weight,
            fuzzy_weight: config.fuzzy_weight,
            accept_threshold: config.combined_accept_threshold,
        })
    }

    /// Keywords whose normalized form is a substring of `text`, in list order.
    pub fn keyword_hits(&self, normalized_text: &str) -> Vec<String> {
        if normalized_text.is_empty() {
            return Vec::new();
        }
        self.keywords
            .iter()
            .filter(|k| k.counts_as_hit && normalized_text.contains(&k.normalized))
            .map(|k| k.original.clone())
            .collect()
    }

    /// Best token-set score and the first keyword reaching it.
    pub fn fuzzy_best(&self, normalized_text: &str) -> (f64, Option<String>) {
        let mut best = 0.0;
        let mut best_keyword = None;
        for keyword in &self.keywords {
            let score = token_set_ratio(&keyword.normalized, normalized_text);
            if score > best {
                best = score;
                best_keyword = Some(keyword.original.clone());
            }
        }
        (best, best_keyword)
    }

    pub fn score(&self, listing: &RawListing) -> Heuristic {
        let text = normalize(&listing.text());
        let keyword_hits = self.keyword_hits(&text);
        let (fuzzy_score, fuzzy_keyword) = self.fuzzy_best(&text);

        let mut score = 0.0;
        if keyword_hits.len() >= self.minimum_keyword_hits {
            score += self.keyword_weight;
        }
        score += (fuzzy_score / 100.0) * self.fuzzy_weight;

        Heuristic {
            keyword_hits,
            fuzzy_score,
            fuzzy_keyword,
            combined_score: (score * 1000.0).round() / 1000.0,
        }
    }

    pub fn is_accepted(&self, heuristic: &Heuristic) -> bool {
        heuristic.combined_score >= self.accept_threshold
    }

    /// Scores every listing, returning results in input order.
    pub fn evaluate(&self, listings: &[RawListing]) -> Vec<Evaluation> {
        listings
            .iter()
            .map(|listing| {
                let heuristic = self.score(listing);
                let accepted = self.is_accepted(&heuristic);
                debug!(
                    title = %listing.title,
                    score = heuristic.combined_score,
                    accepted,
                    "relevance scored"
                );
                Evaluation {
                    listing: ScoredListing {
                        listing: listing.clone(),
                        heuristic,
                        details: None,
                    },
                    accepted,
                }
            })
            .collect()
    }

    /// Accepted listings only, in input order.
    pub fn filter(&self, listings: &[RawListing]) -> Vec<ScoredListing> {
        self.evaluate(listings)
            .into_iter()
            .filter(|e| e.accepted)
            .map(|e| e.listing)
            .collect()
    }
}
