//! Candidate aggregation: several queries per destination, merged into one
//! deduplicated pool.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use super::{DEFAULT_RESULT_LIMIT, SearchHit, SearchSource};

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

/// Ordered, duplicate-free list of candidate titles.
///
/// Insertion order is first-seen order. Pushing a title that is already
/// present is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Pool {
    titles: Vec<String>,
    seen: HashSet<String>,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `title` unless it is already present. Returns `true` if added.
    pub fn push(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        if self.seen.contains(&title) {
            return false;
        }
        self.seen.insert(title.clone());
        self.titles.push(title);
        true
    }

    pub fn contains(&self, title: &str) -> bool {
        self.seen.contains(title)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn into_titles(self) -> Vec<String> {
        self.titles
    }
}

impl<S: Into<String>> FromIterator<S> for Pool {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut pool = Pool::new();
        for title in iter {
            pool.push(title);
        }
        pool
    }
}

impl<S: Into<String>> Extend<S> for Pool {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for title in iter {
            self.push(title);
        }
    }
}

impl PartialEq for Pool {
    fn eq(&self, other: &Self) -> bool {
        self.titles == other.titles
    }
}

impl Eq for Pool {}

// ---------------------------------------------------------------------------
// Query sets
// ---------------------------------------------------------------------------

/// Which query variants to issue for a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuerySet {
    /// Sightseeing and notable sites only.
    Basic,
    /// Adds temples and shrines.
    #[default]
    Standard,
    /// Adds history and culture on top of [`QuerySet::Standard`].
    Rich,
}

impl QuerySet {
    fn suffixes(self) -> &'static [&'static str] {
        match self {
            Self::Basic => &["観光", "名所"],
            Self::Standard => &["観光", "名所", "寺", "神社"],
            Self::Rich => &["観光", "名所", "寺", "神社", "歴史", "文化"],
        }
    }

    /// The concrete query strings for `destination`, in issue order.
    pub fn queries(self, destination: &str) -> Vec<String> {
        self.suffixes()
            .iter()
            .map(|suffix| format!("{destination} {suffix}"))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Issues a fixed set of queries against a [`SearchSource`] and merges the
/// results into a [`Pool`].
#[derive(Clone)]
pub struct CandidateAggregator {
    source: Arc<dyn SearchSource>,
    query_set: QuerySet,
    limit: usize,
}

impl CandidateAggregator {
    pub fn new(source: Arc<dyn SearchSource>) -> Self {
        Self {
            source,
            query_set: QuerySet::default(),
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    pub fn with_query_set(mut self, query_set: QuerySet) -> Self {
        self.query_set = query_set;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Collect candidates for `destination`.
    ///
    /// Queries run concurrently but their results are merged in query order,
    /// so the pool's order does not depend on response timing. A failed
    /// query contributes nothing. This never fails; the worst case is an
    /// empty pool.
    pub async fn collect(&self, destination: &str) -> Pool {
        let queries = self.query_set.queries(destination);
        let responses = join_all(
            queries
                .iter()
                .map(|query| self.source.search(query, self.limit)),
        )
        .await;

        let mut pool = Pool::new();
        for (query, response) in queries.iter().zip(responses) {
            let hits: Vec<SearchHit> = match response {
                Ok(hits) => hits,
                Err(e) => {
                    warn!(
                        source = self.source.name(),
                        query = %query,
                        error = %e,
                        "search query failed, treating as empty"
                    );
                    continue;
                }
            };
            let before = pool.len();
            pool.extend(
                hits.into_iter()
                    .take(self.limit)
                    .map(|hit| hit.title)
                    .filter(|title| !title.is_empty()),
            );
            debug!(query = %query, added = pool.len() - before, "merged search results");
        }

        debug!(destination, candidates = pool.len(), "candidate pool collected");
        pool
    }
}

impl std::fmt::Debug for CandidateAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateAggregator")
            .field("source", &self.source.name())
            .field("query_set", &self.query_set)
            .field("limit", &self.limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_keeps_first_occurrence() {
        let pool: Pool = ["金閣寺", "清水寺", "金閣寺", "伏見稲荷大社", "清水寺"]
            .into_iter()
            .collect();
        assert_eq!(pool.titles(), ["金閣寺", "清水寺", "伏見稲荷大社"]);
    }

    #[test]
    fn pool_push_reports_whether_added() {
        let mut pool = Pool::new();
        assert!(pool.push("嵐山"));
        assert!(!pool.push("嵐山"));
        assert_eq!(pool.len(), 1);
        assert!(pool.contains("嵐山"));
    }

    #[test]
    fn standard_queries_match_issue_order() {
        assert_eq!(
            QuerySet::Standard.queries("京都"),
            ["京都 観光", "京都 名所", "京都 寺", "京都 神社"]
        );
    }

    #[test]
    fn rich_queries_extend_standard() {
        let standard = QuerySet::Standard.queries("奈良");
        let rich = QuerySet::Rich.queries("奈良");
        assert!(rich.starts_with(&standard));
        assert_eq!(rich.len(), standard.len() + 2);
        assert_eq!(QuerySet::Basic.queries("奈良").len(), 2);
    }
}
