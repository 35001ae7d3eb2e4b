//! File and tag identity types.

use std::fmt;
use std::path::PathBuf;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Content hash key identifying a file, independent of its path.
///
/// Several paths may share one `FileId` (duplicate copies of the same content).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub CompactString);

impl FileId {
    /// Create a new FileId from any string-like key.
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash-like key identifying a tag, independent of its display text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub CompactString);

impl TagId {
    /// Create a new TagId from any string-like key.
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One `(file identity, path)` pair as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRow {
    /// Content identity of the file.
    pub file: FileId,
    /// Local filesystem path recorded for it.
    pub path: PathBuf,
}

impl FileRow {
    /// Create a new file row.
    pub fn new(file: impl Into<CompactString>, path: impl Into<PathBuf>) -> Self {
        Self {
            file: FileId::new(file),
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_id_ordering() {
        let mut tags = vec![TagId::new("b"), TagId::new("a"), TagId::new("c")];
        tags.sort();
        assert_eq!(tags[0].as_str(), "a");
        assert_eq!(tags[2].to_string(), "c");
    }

    #[test]
    fn test_file_row_creation() {
        let row = FileRow::new("abc", "/data/abc.png");
        assert_eq!(row.file, FileId::new("abc"));
        assert_eq!(row.path, PathBuf::from("/data/abc.png"));
    }
}
