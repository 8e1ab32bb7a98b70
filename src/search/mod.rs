//! Retrieval pipeline: embed the query, rank against the vector index, and
//! shape every hit into a bounded, human-readable result.

pub mod excerpt;


use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::VaultError;
use crate::config::Config;
use crate::database::{VectorHit, VectorIndex};
use crate::embeddings::EmbeddingProvider;

pub use excerpt::{NO_TEXT_PLACEHOLDER, select_excerpt};

/// One ranked candidate returned from a search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// Document id of the candidate
    pub id: String,
    /// Display name, `"Unknown"` when the stored name is absent or empty
    pub name: String,
    /// Contact email, `"No Email"` when absent or empty
    pub email: String,
    /// Match score on a 0-100 scale with two-decimal precision
    pub score: f32,
    /// Bounded excerpt of the stored resume text
    pub excerpt: String,
}

/// Ordered sequence of search results, shaped one at a time as it is consumed
#[derive(Debug)]
pub struct SearchResults {
    hits: std::vec::IntoIter<VectorHit>,
    excerpt_limit: usize,
}

impl Iterator for SearchResults {
    type Item = QueryResult;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.hits
            .next()
            .map(|hit| result_from_hit(hit, self.excerpt_limit))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.hits.size_hint()
    }
}

impl ExactSizeIterator for SearchResults {}

/// Runs semantic queries against the vector index
pub struct Searcher {
    vectors: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
    excerpt_limit: usize,
}

impl Searcher {
    #[inline]
    pub fn new(
        vectors: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: &Config,
    ) -> Self {
        Self {
            vectors,
            embedder,
            top_k: config.search.top_k,
            excerpt_limit: config.search.excerpt_limit,
        }
    }

    /// Searches with the configured result budget.
    #[inline]
    pub async fn search(&self, query: &str) -> crate::Result<SearchResults> {
        self.search_top(query, self.top_k).await
    }

    /// Searches with an explicit result budget. The query is embedded before
    /// the index is touched, and hits come back in index order, best first.
    #[inline]
    pub async fn search_top(&self, query: &str, top_k: usize) -> crate::Result<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Err(VaultError::EmptyQuery);
        }

        let vector = self.embedder.embed(query)?;
        let hits = self.vectors.query(&vector, top_k, true).await?;
        debug!("Search returned {} hits", hits.len());

        Ok(SearchResults {
            hits: hits.into_iter(),
            excerpt_limit: self.excerpt_limit,
        })
    }
}

/// Scales a raw similarity to a 0-100 percentage with two-decimal precision.
/// Values above 1 are assumed to be percentages already and pass through;
/// values at or below 0 (and non-finite values) floor to 0.
#[inline]
pub fn normalize_score(raw: f32) -> f32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0.0;
    }
    if raw <= 1.0 {
        return (raw * 100.0 * 100.0).round() / 100.0;
    }
    raw
}

fn result_from_hit(hit: VectorHit, excerpt_limit: usize) -> QueryResult {
    let metadata = hit.metadata;
    let name = non_empty_or(metadata.as_ref().map(|m| m.name.as_str()), "Unknown");
    let email = non_empty_or(metadata.as_ref().map(|m| m.email.as_str()), "No Email");
    let raw_text = metadata.as_ref().map_or("", |m| m.raw_text.as_str());

    QueryResult {
        id: hit.id,
        name: name.to_string(),
        email: email.to_string(),
        score: normalize_score(hit.similarity),
        excerpt: select_excerpt(raw_text, excerpt_limit),
    }
}

fn non_empty_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.filter(|v| !v.is_empty()).unwrap_or(fallback)
}
