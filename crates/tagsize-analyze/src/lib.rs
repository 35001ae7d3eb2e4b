//! Tag aggregation and ranking for tagsize.
//!
//! Turns a [`TagSource`] into a ranked report of the tags that account for
//! the most disk usage:
//!
//! 1. **Aggregate** - one forward pass over the store's file rows builds
//!    tag -> set of distinct paths, stat'ing each path once
//! 2. **Rank** - tags are measured (total size, file count), filtered and
//!    sorted by a [`RankingStrategy`]
//! 3. **Report** - surviving tags get their display text resolved
//!
//! ```rust,ignore
//! use tagsize_analyze::{ReportConfig, ReportRunner};
//! use tagsize_store::SqliteStore;
//!
//! let store = SqliteStore::open("/home/user/awtf.db")?;
//! let report = ReportRunner::new(ReportConfig::new(10)).run(&store)?;
//! report.write_text(std::io::stdout().lock())?;
//! ```
//!
//! # Ranking modes
//!
//! Without a floor, tags are ranked by total size, largest first. With a
//! floor of N gigabytes, only tags of at least N GiB survive, and they are
//! ranked by file count, fewest first ("few huge files").

mod aggregate;
mod pipeline;
mod ranking;
mod report;
mod size;

pub use aggregate::{Aggregator, TagIndex};
pub use pipeline::ReportRunner;
pub use ranking::{RankingEngine, RankingStrategy, TagMetrics};
pub use report::{bytes_to_gb, resolve_entries, ReportTimings, RunStats, TagReport, TagReportEntry};
pub use size::{FsProbe, SizeProbe, SizeResolver};

// Re-export core types
pub use tagsize_core::{
    AccessPattern, MissingPathPolicy, ReportConfig, ReportError, Result, SkippedPath, TagId,
    TagSource,
};
