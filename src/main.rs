//! tagsize - rank the tags of a file tag store by disk usage.
//!
//! Usage:
//!   tagsize [LIMIT]                      Largest tags by total size
//!   tagsize --min-gb 10 [LIMIT]          Tags of at least 10 GiB, fewest files first
//!   SORT_BY_COUNT_WITH_MIN_GB=10 tagsize Same, configured from the environment
//!   tagsize --help                       Show help

use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tagsize_analyze::{
    AccessPattern, MissingPathPolicy, ReportConfig, ReportError, ReportRunner, TagReport,
};
use tagsize_store::SqliteStore;

const FLOOR_ENV: &str = "SORT_BY_COUNT_WITH_MIN_GB";

#[derive(Parser)]
#[command(
    name = "tagsize",
    version,
    about = "Rank the tags of a file tag store by the disk space they account for",
    long_about = "tagsize reads an awtfdb database read-only, sums the on-disk size of \
                  every tag's distinct files and prints the largest tags.\n\n\
                  With a minimum size, only tags at least that large are kept and they \
                  are ranked by file count, fewest first."
)]
struct Cli {
    /// Maximum number of tags to print
    #[arg(default_value = "50")]
    limit: usize,

    /// Only keep tags of at least this many gigabytes, ranked by file count ascending
    #[arg(long, env = FLOOR_ENV)]
    min_gb: Option<String>,

    /// Path to the database (defaults to ~/awtf.db)
    #[arg(long)]
    db: Option<PathBuf>,

    /// How tags are read from the database
    #[arg(long, default_value = "per-row")]
    access: Access,

    /// Charge missing files zero bytes and warn instead of aborting
    #[arg(long)]
    skip_missing: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Access {
    /// One tag query per file row
    #[default]
    PerRow,
    /// One tag query per distinct file hash
    Cached,
    /// A single join over all tags
    Bulk,
}

impl From<Access> for AccessPattern {
    fn from(access: Access) -> Self {
        match access {
            Access::PerRow => AccessPattern::PerRow,
            Access::Cached => AccessPattern::CachedPerFile,
            Access::Bulk => AccessPattern::BulkJoin,
        }
    }
}

impl Cli {
    /// Build the validated report configuration.
    fn report_config(&self) -> Result<ReportConfig, ReportError> {
        let min_gb = match &self.min_gb {
            Some(value) => parse_min_gb(value)?,
            None => None,
        };
        let missing_paths = if self.skip_missing {
            MissingPathPolicy::SkipAndWarn
        } else {
            MissingPathPolicy::Fail
        };
        ReportConfig::builder()
            .limit(self.limit)
            .min_gb(min_gb)
            .access(AccessPattern::from(self.access))
            .missing_paths(missing_paths)
            .build()
            .map_err(|e| ReportError::config(e.to_string()))
    }
}

/// Parse a gigabyte floor. An empty value selects the default ranking.
fn parse_min_gb(s: &str) -> Result<Option<u64>, ReportError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse()
        .map(Some)
        .map_err(|e| ReportError::config(format!("invalid minimum size {s:?}: {e}")))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    let config = cli.report_config()?;

    let db = match cli.db {
        Some(db) => db,
        None => SqliteStore::default_path()?,
    };
    let store = SqliteStore::open(&db).wrap_err_with(|| format!("Cannot read {}", db.display()))?;

    let report = ReportRunner::new(config)
        .run(&store)
        .wrap_err("Tag report failed")?;

    print_summary(&report);

    let stdout = io::stdout().lock();
    match cli.format {
        OutputFormat::Text => report.write_text(stdout)?,
        OutputFormat::Json => report.write_json(stdout)?,
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout carries only the report.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Log run counters and any skipped paths.
fn print_summary(report: &TagReport) {
    let stats = &report.stats;
    info!(
        "{} rows, {} distinct files ({}), {} tags",
        stats.rows,
        stats.distinct_paths,
        format_size(stats.total_bytes),
        stats.tags
    );
    for skipped in &report.warnings {
        warn!("charged 0 bytes for {}: {}", skipped.path.display(), skipped.message);
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
