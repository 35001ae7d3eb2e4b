//! In-memory tag source.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::PathBuf;

use compact_str::CompactString;

use tagsize_core::{FileId, FileRow, ReportError, Result, TagId, TagSource};

/// A [`TagSource`] backed by plain maps.
///
/// Counts tag lookups so callers can observe how often the relation is read.
#[derive(Debug, Default)]
pub struct MemorySource {
    rows: Vec<FileRow>,
    tags: HashMap<FileId, Vec<TagId>>,
    names: HashMap<TagId, String>,
    lookups: Cell<usize>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `(file identity, path)` row.
    pub fn with_file(mut self, file: impl Into<CompactString>, path: impl Into<PathBuf>) -> Self {
        self.rows.push(FileRow::new(file, path));
        self
    }

    /// Add a tag with its display text.
    pub fn with_tag(mut self, tag: impl Into<CompactString>, text: impl Into<String>) -> Self {
        self.names.insert(TagId::new(tag), text.into());
        self
    }

    /// Attach a tag to a file identity.
    pub fn tag_file(mut self, file: impl Into<CompactString>, tag: impl Into<CompactString>) -> Self {
        self.tags
            .entry(FileId::new(file))
            .or_default()
            .push(TagId::new(tag));
        self
    }

    /// Number of `tags_for_file` calls served so far.
    pub fn tag_lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl TagSource for MemorySource {
    fn files(&self) -> Result<Vec<FileRow>> {
        Ok(self.rows.clone())
    }

    fn tags_for_file(&self, file: &FileId) -> Result<Vec<TagId>> {
        self.lookups.set(self.lookups.get() + 1);
        Ok(self.tags.get(file).cloned().unwrap_or_default())
    }

    fn tag_text(&self, tag: &TagId) -> Result<String> {
        self.names
            .get(tag)
            .cloned()
            .ok_or_else(|| ReportError::store(format!("No tag name for tag {tag}")))
    }

    fn tag_links(&self) -> Result<Vec<(FileId, TagId)>> {
        Ok(self
            .tags
            .iter()
            .flat_map(|(file, tags)| tags.iter().map(move |tag| (file.clone(), tag.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemorySource {
        MemorySource::new()
            .with_file("A", "/a")
            .with_file("B", "/b")
            .with_tag("T1", "landscape")
            .tag_file("A", "T1")
            .tag_file("B", "T1")
    }

    #[test]
    fn test_lookups_are_counted() {
        let source = sample();
        assert_eq!(source.tag_lookups(), 0);

        source.tags_for_file(&FileId::new("A")).unwrap();
        source.tags_for_file(&FileId::new("A")).unwrap();
        assert_eq!(source.tag_lookups(), 2);
    }

    #[test]
    fn test_missing_tag_text_is_store_error() {
        let source = sample();
        assert_eq!(source.tag_text(&TagId::new("T1")).unwrap(), "landscape");
        assert!(matches!(
            source.tag_text(&TagId::new("T9")),
            Err(ReportError::StoreUnavailable { .. })
        ));
    }

    #[test]
    fn test_tag_links_cover_relation() {
        let source = sample();
        let mut links = source.tag_links().unwrap();
        links.sort();
        assert_eq!(
            links,
            vec![
                (FileId::new("A"), TagId::new("T1")),
                (FileId::new("B"), TagId::new("T1")),
            ]
        );
        // bulk listing does not go through per-file lookups
        assert_eq!(source.tag_lookups(), 0);
    }
}
