//! Configuration Management
//!
//! Optional JSON file with defaults for gcpri. Command-line flags always win.

use crate::gcp::client::DEFAULT_ASSET_ENDPOINT;
use crate::output::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Default output format ("json" or "csv")
    #[serde(default)]
    pub format: Option<String>,
    /// Asset types to restrict every listing to
    #[serde(default)]
    pub asset_types: Vec<String>,
    /// Page size for assets.list
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Cloud Asset API endpoint override
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Config {
    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gcpri").join("config.json"))
    }

    /// Load configuration from the default location.
    /// A missing or unreadable file yields the defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit path; any failure is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Get effective output format (CLI > config > json)
    pub fn effective_format(&self, cli: Option<OutputFormat>) -> Result<OutputFormat> {
        if let Some(format) = cli {
            return Ok(format);
        }
        match &self.format {
            Some(raw) => raw.parse::<OutputFormat>().context("Invalid format in config file"),
            None => Ok(OutputFormat::default()),
        }
    }

    /// Get effective asset type filter (CLI > config)
    pub fn effective_asset_types(&self, cli: &[String]) -> Vec<String> {
        if cli.is_empty() {
            self.asset_types.clone()
        } else {
            cli.to_vec()
        }
    }

    /// Get effective page size (CLI > config > server default)
    pub fn effective_page_size(&self, cli: Option<u32>) -> Option<u32> {
        cli.or(self.page_size)
    }

    /// Get effective endpoint (CLI > config > public API)
    pub fn effective_endpoint(&self, cli: Option<&str>) -> String {
        cli.or(self.endpoint.as_deref())
            .unwrap_or(DEFAULT_ASSET_ENDPOINT)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"format": "csv", "page_size": 250}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.format.as_deref(), Some("csv"));
        assert_eq!(config.page_size, Some(250));
        assert!(config.asset_types.is_empty());
        assert_eq!(config.endpoint, None);
    }

    #[test]
    fn test_load_from_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load_from(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_load_from_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_cli_format_wins_over_config() {
        let config = Config {
            format: Some("csv".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.effective_format(Some(OutputFormat::Json)).unwrap(),
            OutputFormat::Json
        );
        assert_eq!(config.effective_format(None).unwrap(), OutputFormat::Csv);
        assert_eq!(
            Config::default().effective_format(None).unwrap(),
            OutputFormat::Json
        );
    }

    #[test]
    fn test_unsupported_config_format_fails() {
        let config = Config {
            format: Some("xml".to_string()),
            ..Default::default()
        };
        let err = config.effective_format(None).unwrap_err();
        assert!(format!("{:#}", err).contains("Unsupported format: xml"));
    }

    #[test]
    fn test_effective_values_precedence() {
        let config = Config {
            asset_types: vec!["storage.googleapis.com/Bucket".to_string()],
            page_size: Some(100),
            endpoint: Some("http://localhost:8080".to_string()),
            ..Default::default()
        };

        assert_eq!(
            config.effective_asset_types(&[]),
            ["storage.googleapis.com/Bucket"]
        );
        assert_eq!(
            config.effective_asset_types(&["compute.googleapis.com/Disk".to_string()]),
            ["compute.googleapis.com/Disk"]
        );
        assert_eq!(config.effective_page_size(None), Some(100));
        assert_eq!(config.effective_page_size(Some(5)), Some(5));
        assert_eq!(config.effective_endpoint(None), "http://localhost:8080");
        assert_eq!(
            Config::default().effective_endpoint(None),
            DEFAULT_ASSET_ENDPOINT
        );
    }
}
