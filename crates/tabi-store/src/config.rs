use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "TABI_DATA_DIR";

/// Ledger storage configuration.
///
/// The CLI resolves the directory from its flag, `TABI_DATA_DIR`, the
/// config file, or [`Self::default_data_dir`] (`~/.local/share/tabi` on
/// Linux).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding one `<key>.json` file per ledger.
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Build a config from an explicit directory (useful for tests and CLI flags).
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// `dirs::data_dir()/tabi`, or `./.tabi` when the platform has none.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("tabi"))
            .unwrap_or_else(|| PathBuf::from(".tabi"))
    }

    /// Path of the file backing `key`.
    pub fn ledger_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
