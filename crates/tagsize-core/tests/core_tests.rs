use std::cell::Cell;
use std::collections::HashMap;

use tagsize_core::{
    AccessPattern, FileId, FileRow, MissingPathPolicy, ReportConfig, ReportError, Result,
    SkippedPath, TagId, TagSource, GIB,
};

/// Minimal source that records how often tags are looked up.
struct CountingSource {
    rows: Vec<FileRow>,
    tags: HashMap<FileId, Vec<TagId>>,
    lookups: Cell<usize>,
}

impl TagSource for CountingSource {
    fn files(&self) -> Result<Vec<FileRow>> {
        Ok(self.rows.clone())
    }

    fn tags_for_file(&self, file: &FileId) -> Result<Vec<TagId>> {
        self.lookups.set(self.lookups.get() + 1);
        Ok(self.tags.get(file).cloned().unwrap_or_default())
    }

    fn tag_text(&self, tag: &TagId) -> Result<String> {
        Ok(format!("text of {tag}"))
    }
}

fn sample_source() -> CountingSource {
    let mut tags = HashMap::new();
    tags.insert(FileId::new("A"), vec![TagId::new("T1"), TagId::new("T2")]);
    tags.insert(FileId::new("B"), vec![TagId::new("T1")]);
    CountingSource {
        rows: vec![
            FileRow::new("A", "/a"),
            FileRow::new("A", "/a-copy"),
            FileRow::new("B", "/b"),
        ],
        tags,
        lookups: Cell::new(0),
    }
}

#[test]
fn test_default_tag_links_queries_each_file_once() {
    let source = sample_source();
    let links = source.tag_links().unwrap();

    assert_eq!(links.len(), 3);
    assert!(links.contains(&(FileId::new("A"), TagId::new("T2"))));
    assert!(links.contains(&(FileId::new("B"), TagId::new("T1"))));
    // "A" appears on two rows but is looked up once
    assert_eq!(source.lookups.get(), 2);
}

#[test]
fn test_tag_source_through_reference() {
    let source = sample_source();
    let by_ref: &dyn TagSource = &source;

    assert_eq!(by_ref.files().unwrap().len(), 3);
    assert_eq!(by_ref.tag_text(&TagId::new("T1")).unwrap(), "text of T1");
    assert!(by_ref.tags_for_file(&FileId::new("missing")).unwrap().is_empty());
}

#[test]
fn test_report_config_modes() {
    let default_mode = ReportConfig::default();
    assert_eq!(default_mode.limit, 50);
    assert!(default_mode.floor_bytes().is_none());

    let floor_mode = ReportConfig::builder()
        .limit(5usize)
        .min_gb(0u64)
        .missing_paths(MissingPathPolicy::SkipAndWarn)
        .build()
        .unwrap();
    assert_eq!(floor_mode.floor_bytes(), Some(0));
    assert_eq!(floor_mode.missing_paths, MissingPathPolicy::SkipAndWarn);
    assert_eq!(floor_mode.access, AccessPattern::PerRow);
}

#[test]
fn test_report_config_deserialize_defaults() {
    let config: ReportConfig = serde_json::from_str(r#"{"min_gb": 3}"#).unwrap();
    assert_eq!(config.limit, 50);
    assert_eq!(config.floor_bytes(), Some(3 * GIB));
    assert_eq!(config.missing_paths, MissingPathPolicy::Fail);
}

#[test]
fn test_error_taxonomy_messages() {
    let config_err = ReportError::config("limit must be an integer");
    assert!(config_err.to_string().starts_with("Invalid configuration"));

    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let skipped = SkippedPath::new("/gone", &io);
    assert_eq!(skipped.message, "gone");

    let path_err = ReportError::path("/gone", io);
    assert!(matches!(path_err, ReportError::PathUnavailable { .. }));
}
