//! GCP Authentication
//!
//! Resolves access tokens from Application Default Credentials (ADC),
//! service account keys, gcloud CLI credentials, or a pre-issued token.

use anyhow::{Context, Result};
use gcp_auth::TokenProvider;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default scopes for GCP API access
pub const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

/// Environment variables consulted for the default project, in order
const PROJECT_ENV_VARS: &[&str] = &[
    "CLOUDSDK_CORE_PROJECT",
    "GOOGLE_CLOUD_PROJECT",
    "GCLOUD_PROJECT",
];

#[derive(Clone)]
enum TokenSource {
    /// ADC / gcloud provider; caches and refreshes tokens itself
    Provider(Arc<dyn TokenProvider>),
    /// Token handed to us on the command line or via environment
    Static(String),
}

/// GCP credentials holder
#[derive(Clone)]
pub struct GcpCredentials {
    source: TokenSource,
}

impl fmt::Debug for GcpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Security: never print the token itself
        let kind = match self.source {
            TokenSource::Provider(_) => "provider",
            TokenSource::Static(_) => "static",
        };
        f.debug_struct("GcpCredentials").field("source", &kind).finish()
    }
}

impl GcpCredentials {
    /// Create new GCP credentials using Application Default Credentials
    pub async fn new() -> Result<Self> {
        let provider = gcp_auth::provider().await.context(
            "Failed to initialize GCP authentication. Run 'gcloud auth application-default login'",
        )?;

        Ok(Self {
            source: TokenSource::Provider(provider),
        })
    }

    /// Use an already-issued access token (e.g. `gcloud auth print-access-token`)
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            source: TokenSource::Static(token.into()),
        }
    }

    /// Get an access token for API calls
    pub async fn get_token(&self) -> Result<String> {
        match &self.source {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::Provider(provider) => {
                let token = provider
                    .token(DEFAULT_SCOPES)
                    .await
                    .context("Failed to get access token")?;
                tracing::trace!("Access token obtained from provider");
                Ok(token.as_str().to_string())
            }
        }
    }
}

/// Get the gcloud configuration directory
pub fn get_gcloud_config_dir() -> Option<PathBuf> {
    // Check CLOUDSDK_CONFIG environment variable first
    if let Ok(path) = std::env::var("CLOUDSDK_CONFIG") {
        return Some(PathBuf::from(path));
    }

    // Default to ~/.config/gcloud on Linux/macOS
    dirs::config_dir().map(|p| p.join("gcloud"))
}

/// Validate a GCP project ID format
/// Project IDs must be 6-30 characters, lowercase letters, digits, and hyphens
/// Must start with a letter and cannot end with a hyphen
pub fn validate_project_id(project: &str) -> bool {
    if project.len() < 6 || project.len() > 30 {
        return false;
    }

    if !project.starts_with(|c: char| c.is_ascii_lowercase()) || project.ends_with('-') {
        return false;
    }

    project
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Read `key` from `[section]` of a gcloud INI-style file.
fn read_gcloud_property(path: &Path, section: &str, key: &str) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let header = format!("[{}]", section);
    let mut in_section = false;

    for line in content.lines() {
        let line = line.trim();
        // Security: Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') {
            in_section = line == header;
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some((name, value)) = line.split_once('=') {
            if name.trim() == key {
                return Some(value.trim().to_string());
            }
        }
    }

    None
}

/// Read the default project from the environment or gcloud configuration
/// Security: Validates project ID format before returning
pub fn get_default_project() -> Option<String> {
    for var in PROJECT_ENV_VARS {
        if let Ok(project) = std::env::var(var) {
            if validate_project_id(&project) {
                return Some(project);
            }
            tracing::warn!("Invalid project ID format in {}", var);
        }
    }

    let config_dir = get_gcloud_config_dir()?;
    default_project_from_dir(&config_dir)
}

fn default_project_from_dir(config_dir: &Path) -> Option<String> {
    let valid = |project: String| validate_project_id(&project).then_some(project);

    if let Some(project) =
        read_gcloud_property(&config_dir.join("properties"), "core", "project").and_then(valid)
    {
        return Some(project);
    }

    let active_config = std::fs::read_to_string(config_dir.join("active_config")).ok()?;
    let config_name = active_config.trim();

    // Security: Validate config name to prevent path traversal
    if !config_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        tracing::warn!("Invalid characters in active_config name");
        return None;
    }

    let config_path = config_dir
        .join("configurations")
        .join(format!("config_{}", config_name));

    read_gcloud_property(&config_path, "core", "project").and_then(valid)
}
