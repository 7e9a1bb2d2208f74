//! Configuration file handling

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::paths::{config_path, LOCAL_CONFIG_FILE};
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize)]
pub struct Config {
    /// How to invoke the wrapped test runner
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Test catalog, keyed by the number used on the menu and `--test-api`
    #[serde(default = "default_tests")]
    pub tests: BTreeMap<String, TestEntry>,

    /// Log file settings
    #[serde(default)]
    pub logs: LogsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runner: RunnerConfig::default(),
            tests: default_tests(),
            logs: LogsConfig::default(),
        }
    }
}

/// Invocation settings for pyresttest
#[derive(Debug, Deserialize, Clone)]
pub struct RunnerConfig {
    /// Runner executable, resolved on PATH when not absolute
    #[serde(default = "default_program")]
    pub program: PathBuf,

    /// Base URL passed as the first positional argument
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value for `--import_extensions`
    #[serde(default = "default_extensions")]
    pub extensions: String,

    /// Value for `--log`
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            base_url: default_base_url(),
            extensions: default_extensions(),
            log_level: default_log_level(),
        }
    }
}

fn default_program() -> PathBuf {
    PathBuf::from("pyresttest")
}
fn default_base_url() -> String {
    "url".to_string()
}
fn default_extensions() -> String {
    "tests_extension".to_string()
}
fn default_log_level() -> String {
    "DEBUG".to_string()
}

/// One runnable test definition
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TestEntry {
    /// Test definition file handed to the runner
    pub file: PathBuf,

    /// Menu label
    #[serde(default)]
    pub label: Option<String>,
}

fn default_tests() -> BTreeMap<String, TestEntry> {
    let mut tests = BTreeMap::new();
    tests.insert(
        "1".to_string(),
        TestEntry {
            file: PathBuf::from("quickstart.yaml"),
            label: Some("Quick API tests (all APIs)".to_string()),
        },
    );
    tests
}

/// Log file configuration
#[derive(Debug, Deserialize)]
pub struct LogsConfig {
    /// Root directory for `logs_<YYYYMMDD>` directories
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Config {
    /// Load configuration from `./resttest.toml` or the user config file
    ///
    /// Returns default configuration if neither exists
    pub fn load() -> Result<Self> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load_from(&local);
        }
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}
