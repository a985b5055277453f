//! Inventory pipeline
//!
//! Normalize scopes, collect and flatten assets scope by scope, then write
//! everything once at the end.

pub mod collector;
pub mod record;
pub mod scope;

pub use collector::{Collector, Verbosity};
pub use record::AssetRecord;
pub use scope::{normalize_scopes, Scope, ScopeKind};

use crate::gcp::assets::AssetSource;
use crate::output::{write_output, OutputFormat};
use anyhow::Result;
use std::path::PathBuf;

/// Everything a run needs, resolved from CLI flags and config
#[derive(Debug, Clone)]
pub struct InventoryPlan {
    pub scopes: Vec<Scope>,
    pub asset_types: Vec<String>,
    pub page_size: Option<u32>,
    pub format: OutputFormat,
    pub output: PathBuf,
    pub verbosity: Verbosity,
}

/// Collect every scope in the plan and write the output file.
///
/// Nothing is written unless all scopes were collected. Returns the record count.
pub async fn run<S: AssetSource>(source: &S, plan: &InventoryPlan) -> Result<usize> {
    if plan.scopes.is_empty() {
        anyhow::bail!("No scopes to inventory");
    }

    let records = Collector::new(source)
        .asset_types(plan.asset_types.clone())
        .page_size(plan.page_size)
        .verbosity(plan.verbosity)
        .collect_all(&plan.scopes)
        .await?;

    write_output(&records, plan.format, &plan.output)?;
    tracing::info!(
        "Wrote {} records as {} to {}",
        records.len(),
        plan.format,
        plan.output.display()
    );

    Ok(records.len())
}
