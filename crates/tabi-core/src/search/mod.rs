//! Search collaborator interface and candidate aggregation.
//!
//! The [`SearchSource`] trait is the only contract the itinerary engine has
//! with the outside search service. [`aggregate::CandidateAggregator`] fans a
//! destination out into several queries and folds the results into a
//! deduplicated [`aggregate::Pool`].

pub mod aggregate;

use async_trait::async_trait;

pub use aggregate::{CandidateAggregator, Pool, QuerySet};

/// Default cap on results requested per query.
pub const DEFAULT_RESULT_LIMIT: usize = 10;

/// One result row returned by a search collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
}

impl SearchHit {
    /// A hit with a title and no snippet.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: String::new(),
        }
    }
}

/// Errors a search collaborator may report. The aggregator never propagates
/// these; a failing query counts as zero results.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Transport(String),

    #[error("search request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("malformed search response: {0}")]
    Malformed(String),
}

/// A full-text search service that returns ordered result titles.
///
/// Implementations must bound their own latency (e.g. with a request
/// timeout) and report failure through [`SearchError`] rather than hanging.
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Human-readable name for logs (e.g. "wikipedia").
    fn name(&self) -> &str;

    /// Run one query, returning at most `limit` hits in relevance order.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError>;
}

// Compile-time assertion: SearchSource must be usable as a trait object.
const _: () = {
    fn _assert_object_safe(_: &dyn SearchSource) {}
};
