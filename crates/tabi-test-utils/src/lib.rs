//! Shared test doubles for tabi integration tests.
//!
//! - [`ScriptedSearch`]: canned results per query, optional per-query
//!   failures, and a log of every query issued.
//! - [`FailingSearch`]: every query fails.
//! - [`FlakyStore`]: an in-memory ledger store whose saves can be switched
//!   to fail.
//! - [`seeded_rng`]: deterministic randomness.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;

use tabi_core::ledger::{LedgerState, LedgerStore, MemoryLedgerStore, StoreError};
use tabi_core::search::{SearchError, SearchHit, SearchSource};

/// Deterministic rng for reproducible schedules.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

// ---------------------------------------------------------------------------
// Search fakes
// ---------------------------------------------------------------------------

/// Search source with canned results keyed by exact query string.
///
/// Unknown queries return no hits.
#[derive(Debug, Default)]
pub struct ScriptedSearch {
    results: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl ScriptedSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `titles`, in order.
    pub fn with_results<I, S>(mut self, query: &str, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.results
            .insert(query.to_string(), titles.into_iter().map(Into::into).collect());
        self
    }

    /// Make `query` fail with a transport error.
    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    /// Every `(query, limit)` issued so far, in call order.
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchSource for ScriptedSearch {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.lock().unwrap().push((query.to_string(), limit));
        if self.failing.contains(query) {
            return Err(SearchError::Transport(format!("scripted failure for {query}")));
        }
        Ok(self
            .results
            .get(query)
            .map(|titles| titles.iter().take(limit).map(SearchHit::titled).collect())
            .unwrap_or_default())
    }
}

/// Search source where every query fails.
#[derive(Debug, Default)]
pub struct FailingSearch {
    attempts: AtomicUsize,
}

impl FailingSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchSource for FailingSearch {
    fn name(&self) -> &str {
        "failing"
    }

    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SearchError::Malformed("service unavailable".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Store fakes
// ---------------------------------------------------------------------------

/// In-memory ledger store whose saves fail while `fail_saves` is on.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryLedgerStore,
    fail_saves: AtomicBool,
    failed_saves: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn failed_saves(&self) -> usize {
        self.failed_saves.load(Ordering::SeqCst)
    }
}

impl LedgerStore for FlakyStore {
    fn load(&self, key: &str) -> Result<Option<LedgerState>, StoreError> {
        self.inner.load(key)
    }

    fn save(&self, key: &str, state: &LedgerState) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            self.failed_saves.fetch_add(1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("flaky store is down".to_string()));
        }
        self.inner.save(key, state)
    }
}
