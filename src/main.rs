use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use gcpri::config::Config;
use gcpri::gcp::auth::{self, GcpCredentials};
use gcpri::gcp::client::GcpClient;
use gcpri::inventory::{self, normalize_scopes, InventoryPlan, Verbosity};
use gcpri::output::OutputFormat;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// GCP Resource Inventory
#[derive(Parser, Debug)]
#[command(name = "gcpri", version = gcpri::VERSION, about, long_about = None)]
struct Args {
    /// GCP project IDs to inventory (defaults to the gcloud project when no scope is given)
    #[arg(value_name = "PROJECT_ID")]
    projects: Vec<String>,

    /// Folder ID to inventory (repeatable)
    #[arg(long = "folder", value_name = "FOLDER_ID")]
    folders: Vec<String>,

    /// Organization ID to inventory (repeatable)
    #[arg(long = "organization", visible_alias = "org", value_name = "ORG_ID")]
    organizations: Vec<String>,

    /// Only list these asset types, e.g. compute.googleapis.com/Instance (repeatable)
    #[arg(long = "asset-type", value_name = "TYPE")]
    asset_types: Vec<String>,

    /// Output format, case-insensitive [default: json]
    #[arg(short, long, value_enum, ignore_case = true)]
    format: Option<OutputFormat>,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only print the final summary
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Page size for asset listings
    #[arg(long)]
    page_size: Option<u32>,

    /// Cloud Asset API endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Use this access token instead of Application Default Credentials
    #[arg(long, env = "CLOUDSDK_AUTH_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Config file [default: <config dir>/gcpri/config.json]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn log_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,gcpri=info",
        2 => "warn,gcpri=debug",
        _ => "trace",
    }
}

fn setup_logging(verbose: u8, log_file: Option<&Path>) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(verbose)));

    let (writer, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create log directory {}", parent.display())
                    })?;
                }
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(log_file.is_none())
        .with_target(true)
        .with_thread_ids(false)
        .with_file(verbose > 1)
        .with_line_number(verbose > 1)
        .init();

    tracing::info!("gcpri {} started", gcpri::VERSION);
    if let Some(path) = log_file {
        tracing::info!("Log file: {:?}", path);
    }

    Ok(guard)
}

/// Resolve flags and config into a plan. Runs before any API call, so a bad
/// format or an empty scope list fails without touching the network.
fn build_plan(args: &Args, config: &Config) -> Result<InventoryPlan> {
    let format = config.effective_format(args.format)?;

    let mut projects = args.projects.clone();
    if projects.is_empty() && args.folders.is_empty() && args.organizations.is_empty() {
        let project = auth::get_default_project().context(
            "No scope given. Pass PROJECT_ID, --folder or --organization, or set a default gcloud project",
        )?;
        tracing::info!("Using default project: {}", project);
        projects.push(project);
    }

    Ok(InventoryPlan {
        scopes: normalize_scopes(
            projects.as_slice(),
            args.folders.as_slice(),
            args.organizations.as_slice(),
        ),
        asset_types: config.effective_asset_types(&args.asset_types),
        page_size: config.effective_page_size(args.page_size),
        format,
        output: args.output.clone(),
        verbosity: Verbosity::from_flags(args.quiet, args.verbose),
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.verbose, args.log_file.as_deref())?;

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    let plan = build_plan(&args, &config)?;
    tracing::debug!("Plan: {:?}", plan);

    let credentials = match &args.access_token {
        Some(token) => GcpCredentials::from_token(token.clone()),
        None => GcpCredentials::new().await?,
    };
    let endpoint = config.effective_endpoint(args.endpoint.as_deref());
    let client = GcpClient::new(credentials, &endpoint)?;

    let count = inventory::run(&client, &plan).await?;
    println!("Wrote {} records to {}", count, plan.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv.iter().copied()).unwrap()
    }

    #[test]
    fn test_scopes_from_all_flags() {
        let args = parse(&[
            "gcpri", "p1", "p2", "--folder", "f1", "--org", "o1", "-o", "out.json",
        ]);
        let plan = build_plan(&args, &Config::default()).unwrap();
        let scopes: Vec<&str> = plan.scopes.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            scopes,
            ["projects/p1", "projects/p2", "folders/f1", "organizations/o1"]
        );
        assert_eq!(plan.format, OutputFormat::Json);
        assert_eq!(plan.verbosity, Verbosity::Normal);
    }

    #[test]
    fn test_unsupported_format_is_rejected_by_parser() {
        let result = Args::try_parse_from(["gcpri", "p1", "-f", "yaml", "-o", "out"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_flag_ignores_case_like_config() {
        let args = parse(&["gcpri", "p1", "-f", "CSV", "-o", "out.csv"]);
        assert_eq!(args.format, Some(OutputFormat::Csv));

        let config = Config {
            format: Some("Json".to_string()),
            ..Default::default()
        };
        assert_eq!(config.effective_format(None).unwrap(), OutputFormat::Json);
    }

    #[test]
    fn test_output_is_required() {
        assert!(Args::try_parse_from(["gcpri", "p1"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["gcpri", "p1", "-q", "-v", "-o", "out"]).is_err());
    }

    #[test]
    fn test_config_format_is_validated_in_plan() {
        let args = parse(&["gcpri", "p1", "-o", "out"]);
        let config = Config {
            format: Some("parquet".to_string()),
            ..Default::default()
        };
        assert!(build_plan(&args, &config).is_err());
    }

    #[test]
    fn test_csv_and_filters_from_flags() {
        let args = parse(&[
            "gcpri",
            "--folder",
            "folders/9",
            "--asset-type",
            "compute.googleapis.com/Instance",
            "--page-size",
            "200",
            "-f",
            "csv",
            "-vv",
            "-o",
            "out.csv",
        ]);
        let plan = build_plan(&args, &Config::default()).unwrap();
        assert_eq!(plan.scopes.len(), 1);
        assert_eq!(plan.scopes[0].as_str(), "folders/9");
        assert_eq!(plan.asset_types, ["compute.googleapis.com/Instance"]);
        assert_eq!(plan.page_size, Some(200));
        assert_eq!(plan.format, OutputFormat::Csv);
        assert_eq!(plan.verbosity, Verbosity::Verbose);
    }

    #[test]
    fn test_log_directive_levels() {
        assert_eq!(log_directive(0), "warn");
        assert_eq!(log_directive(2), "warn,gcpri=debug");
        assert_eq!(log_directive(9), "trace");
    }
}
