//! GCP Client
//!
//! Main client for interacting with GCP APIs, combining authentication
//! and HTTP functionality.

use super::auth::GcpCredentials;
use super::http::GcpHttpClient;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use url::Url;

/// Public Cloud Asset API endpoint
pub const DEFAULT_ASSET_ENDPOINT: &str = "https://cloudasset.googleapis.com";

/// Main GCP client
#[derive(Clone, Debug)]
pub struct GcpClient {
    pub credentials: GcpCredentials,
    http: GcpHttpClient,
    endpoint: Url,
}

impl GcpClient {
    /// Create a new GCP client against the given Cloud Asset endpoint
    pub fn new(credentials: GcpCredentials, endpoint: &str) -> Result<Self> {
        let endpoint =
            Url::parse(endpoint).with_context(|| format!("Invalid API endpoint: {}", endpoint))?;
        if endpoint.cannot_be_a_base() {
            anyhow::bail!("Invalid API endpoint: {}", endpoint);
        }

        let http = GcpHttpClient::new()?;

        Ok(Self {
            credentials,
            http,
            endpoint,
        })
    }

    /// Get the current access token
    pub async fn get_token(&self) -> Result<String> {
        self.credentials.get_token().await
    }

    /// Make a GET request to a GCP API
    pub async fn get<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let token = self.get_token().await?;
        self.http.get_json(url, &token).await
    }

    /// Build Cloud Asset API v1 URL from path segments.
    ///
    /// Each segment is percent-encoded, so `?`, `#` or `/` inside one stay part
    /// of that segment. `.` and `..` segments are dropped by `url`.
    pub fn asset_url<'s, I>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Invalid API endpoint: {}", self.endpoint))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }
}
