//! Output serialization
//!
//! Records are rendered fully in memory and then written in one go, so a
//! failed render never leaves a half-written file behind.

use crate::inventory::AssetRecord;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Indented JSON array of objects
    #[default]
    Json,
    /// Header row plus one row per record
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(anyhow::anyhow!(
                "Unsupported format: {} (expected json or csv)",
                s
            )),
        }
    }
}

/// Serialize records in the given format
pub fn render(records: &[AssetRecord], format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Json => {
            serde_json::to_vec_pretty(records).context("Failed to serialize records as JSON")
        }
        OutputFormat::Csv => render_csv(records),
    }
}

/// Columns come from the first record's fields; no records means an empty document.
/// A row whose width differs from the header fails with `UnequalLengths`.
fn render_csv(records: &[AssetRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for record in records {
        writer
            .serialize(record)
            .context("Failed to serialize record as CSV")?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))
}

/// Write records to `path`, replacing any existing content
pub fn write_output(records: &[AssetRecord], format: OutputFormat, path: &Path) -> Result<()> {
    let content = render(records, format)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output to {}", path.display()))?;
    Ok(())
}
