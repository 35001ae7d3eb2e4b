//! End-to-end report run.

use std::time::Instant;

use tracing::info;

use tagsize_core::{ReportConfig, Result, TagSource};

use crate::aggregate::Aggregator;
use crate::ranking::{RankingEngine, RankingStrategy};
use crate::report::{resolve_entries, ReportTimings, RunStats, TagReport};
use crate::size::{FsProbe, SizeProbe, SizeResolver};

/// Runs the fetch and rank phases against a store.
#[derive(Debug, Clone)]
pub struct ReportRunner {
    config: ReportConfig,
}

impl ReportRunner {
    /// Create a runner for the given config.
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Run against the real filesystem.
    pub fn run<S: TagSource + ?Sized>(&self, source: &S) -> Result<TagReport> {
        self.run_with_probe(source, FsProbe)
    }

    /// Run with a custom size probe.
    ///
    /// The size cache and tag index live only for the duration of this call.
    pub fn run_with_probe<S, P>(&self, source: &S, probe: P) -> Result<TagReport>
    where
        S: TagSource + ?Sized,
        P: SizeProbe,
    {
        let strategy = RankingStrategy::from_config(&self.config);
        info!(limit = self.config.limit, %strategy, access = %self.config.access, "Starting tag report");

        let mut sizes = SizeResolver::with_probe(probe, self.config.missing_paths);

        let fetch_start = Instant::now();
        let index = Aggregator::new(self.config.access).aggregate(source, &mut sizes)?;
        let fetch = fetch_start.elapsed();
        info!(
            "took {:.2} seconds to fetch all files and stats",
            fetch.as_secs_f64()
        );

        let rank_start = Instant::now();
        let ranked = RankingEngine::new(strategy, self.config.limit).rank(&index, &mut sizes)?;
        let entries = resolve_entries(source, ranked)?;
        let rank = rank_start.elapsed();
        info!(
            "took {:.2} seconds to rank and resolve tags",
            rank.as_secs_f64()
        );

        let stats = RunStats {
            rows: index.rows(),
            distinct_paths: sizes.len(),
            tags: index.len(),
            probes: sizes.probes(),
            cache_hits: sizes.hits(),
            total_bytes: sizes.total_bytes(),
        };

        Ok(TagReport {
            strategy,
            limit: self.config.limit,
            entries,
            timings: ReportTimings { fetch, rank },
            stats,
            warnings: sizes.take_skipped(),
        })
    }
}
