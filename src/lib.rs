//! GCP Resource Inventory
//!
//! Collects a cross-scope inventory of Google Cloud resources through the
//! Cloud Asset API and writes it out as JSON or CSV.
//!
//! # Module Structure
//!
//! - [`gcp`] - credentials, HTTP plumbing and the Cloud Asset listing client
//! - [`inventory`] - scope normalization, asset flattening and the run pipeline
//! - [`output`] - JSON / CSV serialization of collected records
//! - [`config`] - optional on-disk defaults

pub mod config;
pub mod gcp;
pub mod inventory;
pub mod output;

/// Version injected at compile time via GCPRI_VERSION env var (set by CI/CD),
/// or the crate version for local builds.
pub const VERSION: &str = match option_env!("GCPRI_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
