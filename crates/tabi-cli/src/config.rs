//! Configuration file management for tabi.
//!
//! Provides a TOML config file at `~/.config/tabi/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tabi_core::itinerary::AssemblerOptions;
use tabi_core::search::{DEFAULT_RESULT_LIMIT, QuerySet};
use tabi_core::trip::PlannerOptions;
use tabi_store::StoreConfig;
use tabi_store::config::DATA_DIR_ENV;

use crate::wikipedia::DEFAULT_ENDPOINT;

/// Environment variable that overrides the search endpoint.
pub const SEARCH_ENDPOINT_ENV: &str = "TABI_SEARCH_ENDPOINT";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub store: StoreSection,
    pub search: SearchSection,
    pub itinerary: ItinerarySection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Directory for ledger files. Unset means the platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// MediaWiki `api.php` URL.
    pub endpoint: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Results requested per query.
    pub limit: usize,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 10,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItinerarySection {
    /// Give every day a theme.
    pub themed_days: bool,
    /// Vary tips per slot instead of repeating one.
    pub randomized_tips: bool,
    /// Also search for history and culture spots.
    pub rich_queries: bool,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the tabi config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/tabi` or `~/.config/tabi`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("tabi");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tabi")
}

/// Return the path to the tabi config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Search collaborator settings after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub endpoint: String,
    pub timeout: Duration,
    pub limit: usize,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct TabiConfig {
    pub store_config: StoreConfig,
    pub search: SearchSettings,
    pub planner: PlannerOptions,
}

impl TabiConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Data dir: `cli_data_dir` > `TABI_DATA_DIR` env > `store.data_dir` > platform data dir
    /// - Search endpoint: `TABI_SEARCH_ENDPOINT` env > `search.endpoint` > Japanese Wikipedia
    ///
    /// A missing config file is not an error; a malformed one is.
    pub fn resolve(cli_data_dir: Option<&str>) -> Result<Self> {
        let file_config = if config_path().exists() {
            load_config()?
        } else {
            ConfigFile::default()
        };

        let store_config = if let Some(dir) = cli_data_dir {
            StoreConfig::new(dir)
        } else if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            StoreConfig::new(dir)
        } else if let Some(ref dir) = file_config.store.data_dir {
            StoreConfig::new(dir)
        } else {
            StoreConfig::new(StoreConfig::default_data_dir())
        };

        let endpoint = std::env::var(SEARCH_ENDPOINT_ENV)
            .unwrap_or_else(|_| file_config.search.endpoint.clone());
        let search = SearchSettings {
            endpoint,
            timeout: Duration::from_secs(file_config.search.timeout_secs.max(1)),
            limit: file_config.search.limit.max(1),
        };

        let itinerary = &file_config.itinerary;
        let planner = PlannerOptions {
            query_set: if itinerary.rich_queries {
                QuerySet::Rich
            } else {
                QuerySet::Standard
            },
            assembler: AssemblerOptions {
                themed_days: itinerary.themed_days,
                randomized_tips: itinerary.randomized_tips,
            },
        };

        Ok(Self {
            store_config,
            search,
            planner,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
