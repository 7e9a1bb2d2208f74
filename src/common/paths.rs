//! Configuration and log file paths
//!
//! Log files follow `<root>/logs_<YYYYMMDD>/log_<HH:MM:SS>.txt`. The date and
//! time always come in through a [`RunStamp`] so nothing here reads the clock.

use chrono::{Duration, Local, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Name used for the configuration directory
const APP_NAME: &str = "resttest";

/// Configuration file looked up in the working directory before the user config
pub const LOCAL_CONFIG_FILE: &str = "resttest.toml";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/resttest/`
/// - macOS: `~/Library/Application Support/resttest/`
/// - Windows: `%APPDATA%\resttest\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the user configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Point in time a log file is named after
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStamp(NaiveDateTime);

impl RunStamp {
    pub fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    /// Stamp for the current local time
    pub fn now() -> Self {
        Self(Local::now().naive_local())
    }

    /// Same stamp shifted by whole seconds
    pub fn plus_seconds(self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// `YYYYMMDD`
    pub fn day(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    /// `HH:MM:SS`
    pub fn time(&self) -> String {
        self.0.format("%H:%M:%S").to_string()
    }
}

/// Root directory under which per-day log directories are created
#[derive(Debug, Clone)]
pub struct LogLayout {
    root: PathBuf,
}

impl LogLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every log written on the stamp's day
    pub fn day_dir(&self, stamp: &RunStamp) -> PathBuf {
        self.root.join(format!("logs_{}", stamp.day()))
    }

    /// Log file for a run started at `stamp`
    pub fn log_file(&self, stamp: &RunStamp) -> PathBuf {
        self.day_dir(stamp).join(format!("log_{}.txt", stamp.time()))
    }
}
