//! JSON-file ledger store.
//!
//! Each key maps to `<data_dir>/<key>.json`. Writes go to a sibling temp
//! file first and are renamed into place, so a crash mid-write never leaves
//! a truncated ledger behind.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use tabi_core::ledger::{LedgerState, LedgerStore, StoreError};

use crate::config::StoreConfig;

/// File-backed [`LedgerStore`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    config: StoreConfig,
}

impl JsonFileStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::Unavailable(format!(
                "invalid ledger key {key:?}: use letters, digits, '-' or '_'"
            )));
        }
        Ok(self.config.ledger_path(key))
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<LedgerState>, StoreError> {
        let path = self.path_for(key)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), "ledger loaded");
        Ok(Some(state))
    }

    fn save(&self, key: &str, state: &LedgerState) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(self.config.data_dir())?;

        let contents = serde_json::to_string_pretty(state)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;

        debug!(path = %path.display(), entries = state.history.len(), "ledger saved");
        Ok(())
    }
}
