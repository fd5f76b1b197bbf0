//! Harness configuration loaded from TOML.
//!
//! ```toml
//! database = "target/fixtures.sqlite"
//! log_profile = "development"
//!
//! [[tables]]
//! name = "items"
//! primary_key = ["id"]
//! ```

#![allow(clippy::result_large_err)]

use crate::errors::{config_error, io_error, Result};
use crate::session::SqliteSource;
use fixtrack_core::logging_facility::{self, Profile};
use fixtrack_core::model::TableSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Environment variable that replaces the configured database path.
pub const DATABASE_ENV: &str = "FIXTRACK_DATABASE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    pub database: PathBuf,
    #[serde(default)]
    pub log_profile: Profile,
    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

impl HarnessConfig {
    /// Parse and validate a configuration document.
    ///
    /// # Errors
    ///
    /// - `Config` - malformed TOML or a failed validation rule
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: HarnessConfig = toml::from_str(content)
            .map_err(|e| config_error(format!("TOML parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file. A relative `database` path is taken
    /// relative to the file's directory.
    ///
    /// # Errors
    ///
    /// - `Io` - the file could not be read
    /// - `Config` - see [`Self::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| io_error("config_load", e))?;
        let mut config = Self::from_toml_str(&content)?;
        if config.database.is_relative() {
            if let Some(dir) = path.parent() {
                config.database = dir.join(&config.database);
            }
        }
        tracing::debug!(
            path = %path.display(),
            database = %config.database.display(),
            table_count = config.tables.len(),
            "Loaded harness config"
        );
        Ok(config)
    }

    /// Apply `FIXTRACK_DATABASE` if it is set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(DATABASE_ENV).filter(|v| !v.is_empty()) {
            self.database = PathBuf::from(db);
        }
        self
    }

    /// # Errors
    ///
    /// - `Config` - no tables, an empty primary key, or a repeated table name
    pub fn validate(&self) -> Result<()> {
        if self.tables.is_empty() {
            return Err(config_error("at least one [[tables]] entry is required"));
        }
        let mut seen = HashSet::new();
        for table in &self.tables {
            if !seen.insert(table.name.to_ascii_lowercase()) {
                return Err(config_error(format!("table '{}' is listed twice", table.name)));
            }
            table
                .validate()
                .map_err(|e| config_error(format!("table '{}': {}", table.name, e.message())))?;
        }
        Ok(())
    }

    /// Tables to snapshot, in configuration order.
    pub fn table_specs(&self) -> &[TableSpec] {
        &self.tables
    }

    pub fn source(&self) -> SqliteSource {
        SqliteSource::new(self.database.clone())
    }

    /// Install the configured logging profile for this process.
    pub fn init_logging(&self) {
        logging_facility::init(self.log_profile);
    }
}
