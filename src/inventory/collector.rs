//! Asset collection
//!
//! Lists each scope through an [`AssetSource`] and flattens the result into
//! [`AssetRecord`]s, one scope at a time.

use super::record::AssetRecord;
use super::scope::Scope;
use crate::gcp::assets::{AssetSource, ListAssetsRequest};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// How much progress the collector prints to the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    /// Also print a per-asset-type breakdown for each scope
    Verbose,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose > 0 {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// Sequential per-scope collector
pub struct Collector<'a, S> {
    source: &'a S,
    asset_types: Vec<String>,
    page_size: Option<u32>,
    verbosity: Verbosity,
    progress: Box<dyn Write + 'a>,
}

impl<'a, S: AssetSource> Collector<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            asset_types: Vec::new(),
            page_size: None,
            verbosity: Verbosity::default(),
            progress: Box::new(io::stdout()),
        }
    }

    /// Restrict listings to these asset types (empty = all)
    pub fn asset_types(mut self, asset_types: Vec<String>) -> Self {
        self.asset_types = asset_types;
        self
    }

    pub fn page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Where progress lines go (stdout by default)
    pub fn progress(mut self, out: impl Write + 'a) -> Self {
        self.progress = Box::new(out);
        self
    }

    /// Every asset under `scope`, flattened, in upstream order
    pub async fn collect_scope(&mut self, scope: &Scope) -> Result<Vec<AssetRecord>> {
        if self.verbosity != Verbosity::Quiet {
            writeln!(self.progress, "Collecting assets for {}...", scope)?;
        }
        tracing::info!("Listing assets for {}", scope);

        let request = ListAssetsRequest {
            parent: scope.to_string(),
            asset_types: self.asset_types.clone(),
            page_size: self.page_size,
        };

        let assets = self
            .source
            .list_assets(&request)
            .await
            .with_context(|| format!("Failed to list assets for {}", scope))?;

        let records: Vec<AssetRecord> = assets
            .into_iter()
            .map(|asset| AssetRecord::from_asset(asset, scope))
            .collect();

        tracing::info!("{}: {} assets", scope, records.len());
        if self.verbosity != Verbosity::Quiet {
            writeln!(self.progress, "Found {} assets in {}", records.len(), scope)?;
        }
        if self.verbosity == Verbosity::Verbose {
            for (asset_type, count) in count_by_type(&records) {
                writeln!(self.progress, "  {:>6}  {}", count, asset_type)?;
            }
        }
        self.progress.flush()?;

        Ok(records)
    }

    /// Collect every scope in order. The first failing scope aborts the whole run.
    pub async fn collect_all(&mut self, scopes: &[Scope]) -> Result<Vec<AssetRecord>> {
        let mut all_records = Vec::new();
        for scope in scopes {
            let records = self.collect_scope(scope).await?;
            all_records.extend(records);
        }
        Ok(all_records)
    }
}

fn count_by_type(records: &[AssetRecord]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.asset_type.as_str()).or_insert(0) += 1;
    }
    counts
}
