//! Read contract for a file tag store.

use std::collections::HashSet;

use crate::error::Result;
use crate::ids::{FileId, FileRow, TagId};

/// Read-only view of a store mapping files to tags.
///
/// Implementations must never mutate the underlying store.
pub trait TagSource {
    /// List every `(file identity, path)` pair. Order is irrelevant.
    fn files(&self) -> Result<Vec<FileRow>>;

    /// List the tags referencing a file identity. May be empty.
    fn tags_for_file(&self, file: &FileId) -> Result<Vec<TagId>>;

    /// Resolve a tag identity to its display text.
    fn tag_text(&self, tag: &TagId) -> Result<String>;

    /// List the whole file-tag relation at once.
    ///
    /// The default walks `files()` and looks up each distinct file identity
    /// once. Relational stores should override this with a single join.
    fn tag_links(&self) -> Result<Vec<(FileId, TagId)>> {
        let mut seen: HashSet<FileId> = HashSet::new();
        let mut links = Vec::new();
        for row in self.files()? {
            if !seen.insert(row.file.clone()) {
                continue;
            }
            for tag in self.tags_for_file(&row.file)? {
                links.push((row.file.clone(), tag));
            }
        }
        Ok(links)
    }
}

impl<S: TagSource + ?Sized> TagSource for &S {
    fn files(&self) -> Result<Vec<FileRow>> {
        (**self).files()
    }

    fn tags_for_file(&self, file: &FileId) -> Result<Vec<TagId>> {
        (**self).tags_for_file(file)
    }

    fn tag_text(&self, tag: &TagId) -> Result<String> {
        (**self).tag_text(tag)
    }

    fn tag_links(&self) -> Result<Vec<(FileId, TagId)>> {
        (**self).tag_links()
    }
}
