//! Report configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Bytes per gigabyte (binary).
pub const GIB: u64 = 1024 * 1024 * 1024;

/// How the aggregator reads the file-tag relation from the store.
///
/// Every pattern yields the same aggregation; they only differ in how many
/// round-trips the store sees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum AccessPattern {
    /// One tag lookup per file row, repeated for duplicate file identities.
    #[default]
    PerRow,
    /// One tag lookup per distinct file identity.
    CachedPerFile,
    /// A single query for the whole relation.
    BulkJoin,
}

/// What to do when a recorded path cannot be stat'ed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum MissingPathPolicy {
    /// Abort the run.
    #[default]
    Fail,
    /// Charge zero bytes, record a warning and continue.
    SkipAndWarn,
}

/// Configuration for a tag size report.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ReportConfig {
    /// Maximum number of ranked tags to emit.
    #[builder(default = "50")]
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Minimum aggregate size in gigabytes. Selects floor mode when set.
    #[builder(default)]
    #[serde(default)]
    pub min_gb: Option<u64>,

    /// Store access pattern for the file-tag relation.
    #[builder(default)]
    #[serde(default)]
    pub access: AccessPattern,

    /// Policy for paths that no longer exist.
    #[builder(default)]
    #[serde(default)]
    pub missing_paths: MissingPathPolicy,
}

fn default_limit() -> usize {
    50
}

impl ReportConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(min_gb)) = self.min_gb {
            if min_gb.checked_mul(GIB).is_none() {
                return Err(format!("Minimum size of {min_gb} GB does not fit in bytes"));
            }
        }
        Ok(())
    }
}

impl ReportConfig {
    /// Create a new report config builder.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Create a default-mode config with the given limit.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            min_gb: None,
            access: AccessPattern::default(),
            missing_paths: MissingPathPolicy::default(),
        }
    }

    /// The size floor in bytes, if floor mode is selected.
    ///
    /// Saturates for configs that bypassed the builder's validation.
    pub fn floor_bytes(&self) -> Option<u64> {
        self.min_gb.map(|gb| gb.saturating_mul(GIB))
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::new(default_limit())
    }
}
