//! Ranked tag report.

use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;

use tagsize_core::{Result, SkippedPath, TagId, TagSource};

use crate::ranking::{RankingStrategy, TagMetrics};

/// Convert bytes to gigabytes by successive division through KB and MB.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    let kb = bytes as f64 / 1024.0;
    let mb = kb / 1024.0;
    mb / 1024.0
}

/// One ranked tag, ready for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagReportEntry {
    /// Tag identity.
    pub tag: TagId,
    /// Display text.
    pub text: String,
    /// Aggregate size in bytes.
    pub size_bytes: u64,
    /// Aggregate size in gigabytes, unrounded.
    pub size_gb: f64,
    /// Number of distinct files.
    pub file_count: usize,
}

impl TagReportEntry {
    /// Build an entry from ranked metrics and the tag's display text.
    pub fn new(metrics: TagMetrics, text: impl Into<String>) -> Self {
        Self {
            tag: metrics.tag,
            text: text.into(),
            size_bytes: metrics.total_size,
            size_gb: bytes_to_gb(metrics.total_size),
            file_count: metrics.file_count,
        }
    }

    /// Tab-separated report line (without newline).
    ///
    /// Gigabytes use Rust's shortest round-trip float notation: `1`, not `1.0`, and
    /// plain decimals such as `0.00000027939677238464355` instead of exponents.
    pub fn line(&self) -> String {
        format!(
            "{}\t{}\t{}\tgb\t{}\tfiles",
            self.tag, self.text, self.size_gb, self.file_count
        )
    }
}

/// Resolve display text for every ranked tag.
///
/// Nothing is returned unless every tag resolves.
pub fn resolve_entries<S: TagSource + ?Sized>(
    source: &S,
    ranked: Vec<TagMetrics>,
) -> Result<Vec<TagReportEntry>> {
    ranked
        .into_iter()
        .map(|metrics| -> Result<TagReportEntry> {
            let text = source.tag_text(&metrics.tag)?;
            Ok(TagReportEntry::new(metrics, text))
        })
        .collect()
}

/// Elapsed time per run phase.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ReportTimings {
    /// Reading rows, stat'ing paths and building the index.
    pub fetch: Duration,
    /// Measuring, ranking and resolving tag text.
    pub rank: Duration,
}

/// Counters describing a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// File rows read from the store.
    pub rows: usize,
    /// Distinct paths stat'ed.
    pub distinct_paths: usize,
    /// Tags with at least one path.
    pub tags: usize,
    /// Filesystem probes performed.
    pub probes: u64,
    /// Size lookups answered from the cache.
    pub cache_hits: u64,
    /// Sum of all distinct path sizes.
    pub total_bytes: u64,
}

/// Result of a report run.
#[derive(Debug, Clone, Serialize)]
pub struct TagReport {
    /// Strategy used for ranking.
    pub strategy: RankingStrategy,
    /// Requested maximum number of entries.
    pub limit: usize,
    /// Ranked entries, best first.
    pub entries: Vec<TagReportEntry>,
    /// Phase timings.
    pub timings: ReportTimings,
    /// Run counters.
    pub stats: RunStats,
    /// Paths charged zero bytes because they could not be stat'ed.
    pub warnings: Vec<SkippedPath>,
}

impl TagReport {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no tag was ranked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if any path was skipped.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Write one tab-separated line per entry.
    pub fn write_text<W: Write>(&self, mut out: W) -> io::Result<()> {
        for entry in &self.entries {
            writeln!(out, "{}", entry.line())?;
        }
        out.flush()
    }

    /// Write the whole report as pretty JSON.
    pub fn write_json<W: Write>(&self, mut out: W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut out, self)?;
        writeln!(out)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagsize_core::GIB;
    use tagsize_store::MemorySource;

    fn report(entries: Vec<TagReportEntry>) -> TagReport {
        TagReport {
            strategy: RankingStrategy::TotalSize,
            limit: 10,
            entries,
            timings: ReportTimings::default(),
            stats: RunStats::default(),
            warnings: Vec::new(),
        }
    }

    fn metrics(tag: &str, total_size: u64, file_count: usize) -> TagMetrics {
        TagMetrics {
            tag: TagId::new(tag),
            total_size,
            file_count,
        }
    }

    #[test]
    fn test_bytes_to_gb() {
        assert_eq!(bytes_to_gb(GIB), 1.0);
        assert_eq!(bytes_to_gb(0), 0.0);
        assert!((bytes_to_gb(300) - 2.793_967_723_846_435_5e-7).abs() < 1e-18);
    }

    #[test]
    fn test_entry_line_format() {
        let entry = TagReportEntry::new(metrics("T1", GIB / 2, 3), "landscape");
        assert_eq!(entry.line(), "T1\tlandscape\t0.5\tgb\t3\tfiles");

        let entry = TagReportEntry::new(metrics("T2", 300, 1), "tiny");
        assert_eq!(
            entry.line(),
            "T2\ttiny\t0.00000027939677238464355\tgb\t1\tfiles"
        );
    }

    #[test]
    fn test_write_text_one_line_per_entry() {
        let report = report(vec![
            TagReportEntry::new(metrics("T1", 2 * GIB, 2), "a"),
            TagReportEntry::new(metrics("T2", GIB, 1), "b"),
        ]);

        let mut out = Vec::new();
        report.write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text, "T1\ta\t2\tgb\t2\tfiles\nT2\tb\t1\tgb\t1\tfiles\n");
    }

    #[test]
    fn test_write_json() {
        let report = report(vec![TagReportEntry::new(metrics("T1", GIB, 4), "cats")]);

        let mut out = Vec::new();
        report.write_json(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["strategy"]["mode"], "total-size");
        assert_eq!(value["entries"][0]["tag"], "T1");
        assert_eq!(value["entries"][0]["size_gb"], 1.0);
        assert_eq!(value["entries"][0]["file_count"], 4);
    }

    #[test]
    fn test_resolve_entries_is_all_or_nothing() {
        let source = MemorySource::new().with_tag("T1", "cats");

        let entries = resolve_entries(&source, vec![metrics("T1", 1, 1)]).unwrap();
        assert_eq!(entries[0].text, "cats");

        let result = resolve_entries(&source, vec![metrics("T1", 1, 1), metrics("T9", 1, 1)]);
        assert!(result.is_err());
    }
}
