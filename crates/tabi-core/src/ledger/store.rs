//! Durable key-value storage for ledger state.

use std::collections::HashMap;
use std::sync::Mutex;

use super::LedgerState;

/// Errors from a [`LedgerStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("ledger storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger state could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("ledger storage unavailable: {0}")]
    Unavailable(String),
}

/// Loads and saves [`LedgerState`] by key.
///
/// Implementations must make a successful `save` visible to the next `load`.
pub trait LedgerStore: Send + Sync {
    /// Return the stored state for `key`, or `None` if nothing was saved.
    fn load(&self, key: &str) -> Result<Option<LedgerState>, StoreError>;

    /// Replace the stored state for `key`.
    fn save(&self, key: &str, state: &LedgerState) -> Result<(), StoreError>;
}

/// Process-local store. Values round-trip through JSON so tests see the same
/// encoding a durable store would.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw JSON saved under `key`, if any.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn load(&self, key: &str) -> Result<Option<LedgerState>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .map(|json| serde_json::from_str(json))
            .transpose()
            .map_err(StoreError::from)
    }

    fn save(&self, key: &str, state: &LedgerState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state)?;
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), json);
        Ok(())
    }
}
