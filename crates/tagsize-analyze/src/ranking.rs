//! Tag ranking strategies.

use std::cmp::Ordering;

use itertools::Itertools;
use serde::Serialize;
use strum::Display;

use tagsize_core::{ReportConfig, Result, TagId};

use crate::aggregate::TagIndex;
use crate::size::{SizeProbe, SizeResolver};

/// Derived metrics for one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagMetrics {
    /// Tag identity.
    pub tag: TagId,
    /// Sum of the sizes of the tag's distinct paths.
    pub total_size: u64,
    /// Number of distinct paths.
    pub file_count: usize,
}

/// How tags are filtered and ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum RankingStrategy {
    /// All tags, largest total size first.
    TotalSize,
    /// Tags of at least `floor_bytes`, fewest files first.
    FileCountAboveFloor {
        /// Minimum total size in bytes.
        floor_bytes: u64,
    },
}

impl RankingStrategy {
    /// Pick the strategy selected by a report config.
    pub fn from_config(config: &ReportConfig) -> Self {
        match config.floor_bytes() {
            Some(floor_bytes) => Self::FileCountAboveFloor { floor_bytes },
            None => Self::TotalSize,
        }
    }

    /// Whether a tag is eligible for ranking.
    pub fn admits(&self, metrics: &TagMetrics) -> bool {
        match self {
            Self::TotalSize => true,
            Self::FileCountAboveFloor { floor_bytes } => metrics.total_size >= *floor_bytes,
        }
    }

    /// Order two tags. Ties fall back to tag identity, ascending.
    pub fn compare(&self, a: &TagMetrics, b: &TagMetrics) -> Ordering {
        let primary = match self {
            Self::TotalSize => b.total_size.cmp(&a.total_size),
            Self::FileCountAboveFloor { .. } => a.file_count.cmp(&b.file_count),
        };
        primary.then_with(|| a.tag.cmp(&b.tag))
    }
}

/// Measures, filters, sorts and truncates tags.
#[derive(Debug, Clone, Copy)]
pub struct RankingEngine {
    strategy: RankingStrategy,
    limit: usize,
}

impl RankingEngine {
    /// Create an engine emitting at most `limit` tags.
    pub fn new(strategy: RankingStrategy, limit: usize) -> Self {
        Self { strategy, limit }
    }

    /// Compute metrics for every tag in the index.
    pub fn measure<P: SizeProbe>(
        index: &TagIndex,
        sizes: &mut SizeResolver<P>,
    ) -> Result<Vec<TagMetrics>> {
        let mut metrics = Vec::with_capacity(index.len());
        for (tag, paths) in index.iter() {
            let mut total_size = 0u64;
            for path in paths {
                total_size += sizes.size_of(path)?;
            }
            metrics.push(TagMetrics {
                tag: tag.clone(),
                total_size,
                file_count: paths.len(),
            });
        }
        Ok(metrics)
    }

    /// Rank the tags of an index.
    pub fn rank<P: SizeProbe>(
        &self,
        index: &TagIndex,
        sizes: &mut SizeResolver<P>,
    ) -> Result<Vec<TagMetrics>> {
        let metrics = Self::measure(index, sizes)?;
        Ok(self.order(metrics))
    }

    /// Filter, sort and truncate already measured tags.
    pub fn order(&self, metrics: Vec<TagMetrics>) -> Vec<TagMetrics> {
        metrics
            .into_iter()
            .filter(|m| self.strategy.admits(m))
            .sorted_by(|a, b| self.strategy.compare(a, b))
            .take(self.limit)
            .collect()
    }
}
