//! Store configuration.
//!
//! Selects the backend the composition root opens for [`Store::from_config`]
//! (and, with defaults, for the standard store). Loaded from TOML:
//!
//! ```toml
//! backend = "file"                      # "file" (default) or "memory"
//! path = "/var/lib/app/defaults.redb"   # optional
//! ```
//!
//! [`Store::from_config`]: crate::Store::from_config

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// Which backend the store is opened with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Persistent redb database.
    #[default]
    File,
    /// Process-local memory, lost on exit.
    Memory,
}

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Store configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// Database file for the `file` backend. Defaults to
    /// [`paths::default_store_path`].
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// In-memory configuration.
    pub fn memory() -> Self {
        Self {
            backend: BackendKind::Memory,
            path: None,
        }
    }

    /// File configuration at an explicit path.
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            backend: BackendKind::File,
            path: Some(path.into()),
        }
    }

    /// Load configuration from the specified TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - Fields are unknown or have invalid types
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or has unknown fields.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid store configuration")?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured path is empty.
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut warnings = Vec::new();

        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                bail!("store path cannot be empty");
            }
            if self.backend == BackendKind::Memory {
                warnings.push(format!(
                    "path '{}' is ignored by the memory backend",
                    path.display()
                ));
            }
        }

        Ok(ValidationResult { warnings })
    }

    /// Path of the database file: the configured one or the platform default.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is configured and the platform data
    /// directory cannot be determined.
    pub fn resolved_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => paths::default_store_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = StoreConfig::from_toml_str("").unwrap();
        assert_eq!(config.backend, BackendKind::File);
        assert!(config.path.is_none());
    }

    #[test]
    fn test_parse_memory_backend() {
        let config = StoreConfig::from_toml_str(r#"backend = "memory""#).unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
    }

    #[test]
    fn test_parse_file_backend_with_path() {
        let config = StoreConfig::from_toml_str(
            r#"
            backend = "file"
            path = "/tmp/app/defaults.redb"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.resolved_path().unwrap(),
            PathBuf::from("/tmp/app/defaults.redb")
        );
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(StoreConfig::from_toml_str(r#"backend = "redis""#).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(StoreConfig::from_toml_str("ttl = 30").is_err());
    }

    #[test]
    fn test_validate_empty_path() {
        let config = StoreConfig::file("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_warns_on_path_with_memory() {
        let config = StoreConfig {
            backend: BackendKind::Memory,
            path: Some(PathBuf::from("unused.redb")),
        };

        let result = config.validate().unwrap();
        assert!(result.has_warnings());
        assert!(result.warnings[0].contains("unused.redb"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"backend = "memory""#).unwrap();

        let config = StoreConfig::load_from(file.path()).unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = StoreConfig::load_from("/nonexistent/kvprop.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
