//! Path size resolution with a per-run cache.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use tagsize_core::{MissingPathPolicy, ReportError, Result, SkippedPath};

/// Source of on-disk sizes.
pub trait SizeProbe {
    /// Return the size in bytes of an existing path.
    fn probe(&self, path: &Path) -> io::Result<u64>;
}

/// Probe backed by filesystem metadata. Follows symlinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl SizeProbe for FsProbe {
    fn probe(&self, path: &Path) -> io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }
}

impl<P: SizeProbe + ?Sized> SizeProbe for &P {
    fn probe(&self, path: &Path) -> io::Result<u64> {
        (**self).probe(path)
    }
}

/// Maps paths to byte sizes, probing each distinct path at most once.
///
/// Entries are never evicted or refreshed; the cache lives for one run.
#[derive(Debug)]
pub struct SizeResolver<P = FsProbe> {
    probe: P,
    policy: MissingPathPolicy,
    cache: HashMap<PathBuf, u64>,
    probes: u64,
    hits: u64,
    skipped: Vec<SkippedPath>,
}

impl SizeResolver<FsProbe> {
    /// Create a resolver over the real filesystem.
    pub fn new(policy: MissingPathPolicy) -> Self {
        Self::with_probe(FsProbe, policy)
    }
}

impl<P: SizeProbe> SizeResolver<P> {
    /// Create a resolver over a custom probe.
    pub fn with_probe(probe: P, policy: MissingPathPolicy) -> Self {
        Self {
            probe,
            policy,
            cache: HashMap::new(),
            probes: 0,
            hits: 0,
            skipped: Vec::new(),
        }
    }

    /// Size of `path` in bytes.
    ///
    /// The first call for a path probes it; later calls return the cached
    /// value without I/O.
    pub fn size_of(&mut self, path: &Path) -> Result<u64> {
        if let Some(&size) = self.cache.get(path) {
            self.hits += 1;
            return Ok(size);
        }

        self.probes += 1;
        let size = match self.probe.probe(path) {
            Ok(size) => size,
            Err(err) => match self.policy {
                MissingPathPolicy::Fail => return Err(ReportError::path(path, err)),
                MissingPathPolicy::SkipAndWarn => {
                    warn!("Skipping {}: {err}", path.display());
                    self.skipped.push(SkippedPath::new(path, &err));
                    0
                }
            },
        };

        self.cache.insert(path.to_path_buf(), size);
        Ok(size)
    }

    /// Cached size for `path`, without probing.
    pub fn cached(&self, path: &Path) -> Option<u64> {
        self.cache.get(path).copied()
    }

    /// Number of distinct paths resolved.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if no path has been resolved.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Number of probes performed.
    pub fn probes(&self) -> u64 {
        self.probes
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Sum of all distinct resolved sizes.
    pub fn total_bytes(&self) -> u64 {
        self.cache.values().sum()
    }

    /// Paths charged zero bytes under [`MissingPathPolicy::SkipAndWarn`].
    pub fn skipped(&self) -> &[SkippedPath] {
        &self.skipped
    }

    /// Take the skipped paths out of the resolver.
    pub fn take_skipped(&mut self) -> Vec<SkippedPath> {
        std::mem::take(&mut self.skipped)
    }
}
