//! Reverse index from tags to the distinct paths carrying them.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use tagsize_core::{AccessPattern, FileId, Result, TagId, TagSource};

use crate::size::{SizeProbe, SizeResolver};

/// Tag identity -> set of distinct paths tagged with it.
///
/// Every tag present has at least one path.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TagIndex {
    tags: BTreeMap<TagId, BTreeSet<PathBuf>>,
    rows: usize,
}

impl TagIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` under `tag`. Returns `false` if it was already there.
    pub fn insert(&mut self, tag: TagId, path: &Path) -> bool {
        self.tags.entry(tag).or_default().insert(path.to_path_buf())
    }

    /// Distinct paths for a tag.
    pub fn paths(&self, tag: &TagId) -> Option<&BTreeSet<PathBuf>> {
        self.tags.get(tag)
    }

    /// Number of distinct paths for a tag (0 for unknown tags).
    pub fn file_count(&self, tag: &TagId) -> usize {
        self.tags.get(tag).map_or(0, BTreeSet::len)
    }

    /// Iterate tags and their path sets in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&TagId, &BTreeSet<PathBuf>)> {
        self.tags.iter()
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if no tag was recorded.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Number of file rows the index was built from.
    pub fn rows(&self) -> usize {
        self.rows
    }
}

/// Builds a [`TagIndex`] in one forward pass over a store.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    access: AccessPattern,
}

impl Aggregator {
    /// Create an aggregator using the given store access pattern.
    pub fn new(access: AccessPattern) -> Self {
        Self { access }
    }

    /// Read every file row, resolve its size and file it under its tags.
    ///
    /// Sizes are resolved for every row, tagged or not, so an unavailable
    /// path surfaces here rather than halfway through a report.
    pub fn aggregate<S, P>(&self, source: &S, sizes: &mut SizeResolver<P>) -> Result<TagIndex>
    where
        S: TagSource + ?Sized,
        P: SizeProbe,
    {
        let rows = source.files()?;
        debug!("Aggregating {} file rows ({})", rows.len(), self.access);

        let mut known: HashMap<FileId, Vec<TagId>> = match self.access {
            AccessPattern::BulkJoin => group_links(source.tag_links()?),
            AccessPattern::PerRow | AccessPattern::CachedPerFile => HashMap::new(),
        };

        let mut index = TagIndex::new();
        for row in &rows {
            sizes.size_of(&row.path)?;

            let tags: Cow<'_, [TagId]> = match self.access {
                AccessPattern::PerRow => Cow::Owned(source.tags_for_file(&row.file)?),
                AccessPattern::CachedPerFile => {
                    if !known.contains_key(&row.file) {
                        let tags = source.tags_for_file(&row.file)?;
                        known.insert(row.file.clone(), tags);
                    }
                    Cow::Borrowed(known[&row.file].as_slice())
                }
                AccessPattern::BulkJoin => {
                    Cow::Borrowed(known.get(&row.file).map_or(&[][..], Vec::as_slice))
                }
            };

            for tag in tags.iter() {
                index.insert(tag.clone(), &row.path);
            }
        }

        index.rows = rows.len();
        debug!(
            "Indexed {} tags over {} distinct paths",
            index.len(),
            sizes.len()
        );
        Ok(index)
    }
}

fn group_links(links: Vec<(FileId, TagId)>) -> HashMap<FileId, Vec<TagId>> {
    let mut grouped: HashMap<FileId, Vec<TagId>> = HashMap::new();
    for (file, tag) in links {
        grouped.entry(file).or_default().push(tag);
    }
    grouped
}
