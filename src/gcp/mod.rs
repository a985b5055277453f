//! GCP API interaction module
//!
//! Everything needed to talk to the Cloud Asset API: credentials, an
//! authenticated HTTP client, and the paginated asset listing.
//!
//! # Module Structure
//!
//! - [`auth`] - access tokens and gcloud default project lookup
//! - [`client`] - client combining credentials, HTTP and the API endpoint
//! - [`http`] - HTTP utilities for REST API calls
//! - [`assets`] - Cloud Asset `assets.list` with page following
//!
//! # Example
//!
//! ```ignore
//! use gcpri::gcp::{assets::{AssetSource, ListAssetsRequest}, auth::GcpCredentials, client::GcpClient};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let credentials = GcpCredentials::new().await?;
//!     let client = GcpClient::new(credentials, gcpri::gcp::client::DEFAULT_ASSET_ENDPOINT)?;
//!     let assets = client.list_assets(&ListAssetsRequest::new("projects/my-project")).await?;
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod auth;
pub mod client;
pub mod http;
