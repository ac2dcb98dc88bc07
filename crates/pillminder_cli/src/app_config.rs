//! File-backed settings for the `pillminder` binary.
//!
//! # Invariants
//! - Every key is optional; a missing file yields defaults.
//! - Relative paths resolve against the working directory.

use crate::error::{CliError, CliResult};
use pillminder_core::{default_log_level, ReminderConfig};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_DATABASE_FILE: &str = "pillminder.db";
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    /// Stands in for the host's notification permission.
    pub notifications_enabled: bool,
    pub reminders: ReminderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_level: default_log_level().to_string(),
            notifications_enabled: true,
            reminders: ReminderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads `path` when given, otherwise returns defaults.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path).map_err(|err| {
            CliError::ConfigFile(format!("cannot read `{}`: {err}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> CliResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|err| CliError::ConfigFile(err.to_string()))?;
        config.reminders.validate()?;
        Ok(config)
    }

    /// Turns relative paths into absolute ones rooted at `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.database_path.is_relative() {
            self.database_path = base.join(&self.database_path);
        }
        if self.log_dir.is_relative() {
            self.log_dir = base.join(&self.log_dir);
        }
    }
}
