//! compass-data: benchmark dataset location and download cache.
//!
//! Given a logical dataset identifier (`opencompass/gsm8k`), compass-data
//! works out where the dataset lives: a remote registry id when a preferred
//! source is selected, an existing copy in the local cache, or a freshly
//! downloaded, checksum-verified and extracted archive.
//!
//! # Modules
//!
//! - [`locator`]: [`DatasetLocator`], its configuration and the source selector
//! - [`tables`]: Dataset registry and archive table types and readers
//! - [`fetch`]: The fetch-and-extract primitive and its HTTP implementation
//! - [`validation`]: Lookup table validation and error reporting
//! - [`logging`]: `tracing` subscriber setup for the CLI
//! - [`error`]: Error types for compass-data operations

pub mod error;
pub mod fetch;
pub mod locator;
pub mod logging;
pub mod tables;
pub mod validation;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

pub use error::{LocatorError, TransferError};
pub use locator::{DatasetLocator, DatasetSource, LocatorConfig, ResolvedLocation};

/// The compass-data CLI application.
#[derive(Parser)]
#[command(name = "compass-data")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level used when COMPASS_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log line format ('text' or 'json').
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Resolve a dataset identifier to a path or remote id.
    Resolve(ResolveArgs),
    /// Download and extract the archive for a relative dataset path.
    Fetch(FetchArgs),
    /// Validate the dataset registry and archive table.
    Check(CheckArgs),
}

/// Where the lookup tables are read from.
#[derive(clap::Args)]
struct TableArgs {
    /// Dataset registry file (JSON or YAML).
    #[arg(long, env = "COMPASS_DATASET_REGISTRY")]
    registry: PathBuf,

    /// Archive table file (JSON or YAML).
    #[arg(long, env = "COMPASS_ARCHIVE_TABLE")]
    archives: PathBuf,
}

/// Cache layout overrides.
#[derive(clap::Args)]
struct LocationArgs {
    /// Cache root directory.
    #[arg(long, env = "COMPASS_DATA_CACHE")]
    cache_root: Option<PathBuf>,

    /// Folder checked for pre-extracted datasets before downloading.
    #[arg(long)]
    default_data: Option<PathBuf>,

    /// Ignore the user-local archive override file.
    #[arg(long)]
    no_override: bool,

    /// Abort an archive download that takes longer than this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

/// Arguments for the resolve subcommand.
#[derive(clap::Args)]
struct ResolveArgs {
    /// Dataset identifier, or an absolute path.
    identifier: String,

    /// Always use the local cache, ignoring the preferred source.
    #[arg(long)]
    local_mode: bool,

    /// Preferred source ('ModelScope', 'OpenMind' or 'HF').
    #[arg(long, env = "DATASET_SOURCE")]
    source: Option<String>,

    #[command(flatten)]
    tables: TableArgs,

    #[command(flatten)]
    location: LocationArgs,
}

/// Arguments for the fetch subcommand.
#[derive(clap::Args)]
struct FetchArgs {
    /// Relative dataset path (e.g. './data/gsm8k/').
    relative_path: String,

    /// Keep the downloaded archive after extraction.
    #[arg(long)]
    keep_archive: bool,

    /// Archive table file (JSON or YAML).
    #[arg(long, env = "COMPASS_ARCHIVE_TABLE")]
    archives: PathBuf,

    #[command(flatten)]
    location: LocationArgs,
}

/// Arguments for the check subcommand.
#[derive(clap::Args)]
struct CheckArgs {
    #[command(flatten)]
    tables: TableArgs,

    /// Also report registered datasets without a matching archive entry.
    #[arg(long)]
    coverage: bool,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the compass-data CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), LocatorError> {
    let cli = Cli::parse();

    let log_format: logging::LogFormat = cli.log_format.parse()?;
    logging::init_logging(&cli.log_level, log_format);

    match cli.command {
        Some(Commands::Resolve(args)) => run_resolve(args),
        Some(Commands::Fetch(args)) => run_fetch(args),
        Some(Commands::Check(args)) => run_check(args),
        None => {
            println!("compass-data {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Benchmark dataset location and download cache.");
            println!();
            println!("Run 'compass-data --help' for usage information.");
            Ok(())
        }
    }
}

fn build_config(
    location: &LocationArgs,
    source: Option<&str>,
) -> Result<LocatorConfig, LocatorError> {
    let home = locator::home_dir().ok_or(LocatorError::NoHomeDir)?;
    let mut config =
        LocatorConfig::for_home(&home).with_source(DatasetSource::from_selector(source));

    if let Some(root) = location
        .cache_root
        .as_ref()
        .filter(|root| !root.as_os_str().is_empty())
    {
        config = config.with_cache_root(root.clone());
    }
    if let Some(folder) = &location.default_data {
        config = config.with_default_data_folder(folder.clone());
    }
    if location.no_override {
        config = config.with_override_file(None);
    }

    Ok(config)
}

fn build_fetcher(location: &LocationArgs) -> fetch::HttpArchiveFetcher {
    fetch::HttpArchiveFetcher::with_timeout(location.timeout_secs.map(Duration::from_secs))
}

/// Execute the resolve subcommand.
fn run_resolve(args: ResolveArgs) -> Result<(), LocatorError> {
    let registry = tables::io::read_registry(&args.tables.registry)?;
    let archives = tables::io::read_archive_table(&args.tables.archives)?;
    let config = build_config(&args.location, args.source.as_deref())?;

    let fetcher = build_fetcher(&args.location);
    let locator = DatasetLocator::with_fetcher(registry, archives, config, fetcher);
    let resolved = locator.resolve_path(&args.identifier, args.local_mode)?;
    println!("{}", resolved);
    Ok(())
}

/// Execute the fetch subcommand.
fn run_fetch(args: FetchArgs) -> Result<(), LocatorError> {
    let archives = tables::io::read_archive_table(&args.archives)?;
    let config = build_config(&args.location, None)?;
    let cache_root = config.cache_root.clone();

    let fetcher = build_fetcher(&args.location);
    let locator =
        DatasetLocator::with_fetcher(tables::DatasetRegistry::new(), archives, config, fetcher);
    let path =
        locator.ensure_downloaded_with(&args.relative_path, &cache_root, !args.keep_archive)?;
    println!("{}", path.display());
    Ok(())
}

/// Execute the check subcommand.
fn run_check(args: CheckArgs) -> Result<(), LocatorError> {
    let registry = tables::io::read_registry(&args.tables.registry)?;
    let archives = tables::io::read_archive_table(&args.tables.archives)?;

    let opts = validation::ValidateOptions {
        strict: args.strict,
        check_coverage: args.coverage,
    };
    let report = validation::validate_tables(&registry, &archives, &opts);

    match args.output.as_str() {
        "json" => {
            let json = serde_json::json!({
                "error_count": report.error_count(),
                "warning_count": report.warning_count(),
                "issues": &report.issues,
            });
            let rendered = serde_json::to_string_pretty(&json)
                .map_err(|e| LocatorError::UnsupportedFormat(e.to_string()))?;
            println!("{}", rendered);
        }
        "text" => print!("{}", report),
        other => {
            return Err(LocatorError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (opts.strict && has_warnings) {
        Err(LocatorError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}
