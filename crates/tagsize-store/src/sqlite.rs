//! SQLite-backed tag store (awtfdb schema).

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use rusqlite::types::Value;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use thiserror::Error;
use tracing::debug;

use tagsize_core::{FileId, FileRow, ReportError, Result, TagId, TagSource};

/// Tables the report reads from.
const REQUIRED_TABLES: [&str; 4] = ["files", "tag_files", "hashes", "tag_names"];

const FILES_SQL: &str = "SELECT file_hash, local_path FROM files";

const TAGS_FOR_FILE_SQL: &str = "SELECT hashes.id FROM tag_files \
     JOIN hashes ON tag_files.core_hash = hashes.id \
     WHERE tag_files.file_hash IN (?1, ?2)";

const TAG_LINKS_SQL: &str = "SELECT tag_files.file_hash, hashes.id FROM tag_files \
     JOIN hashes ON tag_files.core_hash = hashes.id";

const TAG_TEXT_SQL: &str =
    "SELECT tag_text FROM tag_names WHERE core_hash IN (?1, ?2) LIMIT 1";

/// Errors raised by the SQLite backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite reported an error.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// A table the report depends on does not exist.
    #[error("Missing table `{table}` in {path}")]
    MissingTable { table: &'static str, path: PathBuf },

    /// A tag has no display text.
    #[error("No tag name for tag {tag}")]
    MissingTagText { tag: TagId },

    /// A hash column held something other than an integer or text key.
    #[error("Unsupported {kind} key in column `{column}`")]
    UnsupportedKey { column: &'static str, kind: &'static str },

    /// The home directory could not be determined.
    #[error("Could not determine home directory")]
    NoHomeDir,
}

impl From<StoreError> for ReportError {
    fn from(err: StoreError) -> Self {
        ReportError::store(err)
    }
}

/// Read-only handle on an awtfdb SQLite database.
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    /// Default database location: `$HOME/awtf.db`.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
        Ok(home.join("awtf.db"))
    }

    /// Open a database strictly read-only.
    ///
    /// Fails if the file does not exist or lacks the awtfdb tables.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(StoreError::from)?;

        let store = Self { conn, path };
        store.check_schema()?;
        debug!("Opened {} read-only", store.path.display());
        Ok(store)
    }

    /// Path of the opened database.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_schema(&self) -> Result<(), StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
        for table in REQUIRED_TABLES {
            if !stmt.exists(params![table])? {
                return Err(StoreError::MissingTable {
                    table,
                    path: self.path.clone(),
                });
            }
        }
        Ok(())
    }

    fn query_files(&self) -> Result<Vec<FileRow>, StoreError> {
        let mut stmt = self.conn.prepare(FILES_SQL)?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, Value>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut files = Vec::new();
        for row in rows {
            let (key, path) = row?;
            files.push(FileRow {
                file: FileId(key_from_value(key, "files.file_hash")?),
                path: PathBuf::from(path),
            });
        }
        debug!("Read {} file rows", files.len());
        Ok(files)
    }

    fn query_tags_for_file(&self, file: &FileId) -> Result<Vec<TagId>, StoreError> {
        let mut stmt = self.conn.prepare_cached(TAGS_FOR_FILE_SQL)?;
        let [as_stored, as_text] = key_params(file.as_str());
        let rows = stmt.query_map(params![as_stored, as_text], |row| {
            row.get::<_, Value>(0)
        })?;

        let mut tags = Vec::new();
        for key in rows {
            tags.push(TagId(key_from_value(key?, "hashes.id")?));
        }
        Ok(tags)
    }

    fn query_tag_links(&self) -> Result<Vec<(FileId, TagId)>, StoreError> {
        let mut stmt = self.conn.prepare(TAG_LINKS_SQL)?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, Value>(0)?, row.get::<_, Value>(1)?))
        })?;

        let mut links = Vec::new();
        for row in rows {
            let (file, tag) = row?;
            links.push((
                FileId(key_from_value(file, "tag_files.file_hash")?),
                TagId(key_from_value(tag, "hashes.id")?),
            ));
        }
        debug!("Read {} file-tag links", links.len());
        Ok(links)
    }

    fn query_tag_text(&self, tag: &TagId) -> Result<String, StoreError> {
        let mut stmt = self.conn.prepare_cached(TAG_TEXT_SQL)?;
        let [as_stored, as_text] = key_params(tag.as_str());
        stmt.query_row(params![as_stored, as_text], |row| row.get::<_, String>(0))
            .optional()?
            .ok_or_else(|| StoreError::MissingTagText { tag: tag.clone() })
    }
}

impl TagSource for SqliteStore {
    fn files(&self) -> Result<Vec<FileRow>> {
        Ok(self.query_files()?)
    }

    fn tags_for_file(&self, file: &FileId) -> Result<Vec<TagId>> {
        Ok(self.query_tags_for_file(file)?)
    }

    fn tag_text(&self, tag: &TagId) -> Result<String> {
        Ok(self.query_tag_text(tag)?)
    }

    fn tag_links(&self) -> Result<Vec<(FileId, TagId)>> {
        Ok(self.query_tag_links()?)
    }
}

/// Turn a hash column value into an opaque string key.
fn key_from_value(value: Value, column: &'static str) -> Result<CompactString, StoreError> {
    match value {
        Value::Integer(id) => Ok(CompactString::from(id.to_string())),
        Value::Text(text) => Ok(CompactString::from(text)),
        Value::Null => Err(StoreError::UnsupportedKey { column, kind: "null" }),
        Value::Real(_) => Err(StoreError::UnsupportedKey { column, kind: "real" }),
        Value::Blob(_) => Err(StoreError::UnsupportedKey { column, kind: "blob" }),
    }
}

/// Bind a key as every storage class it may have been read from.
///
/// A key matches a stored value when the value renders to the same string, so
/// the canonical integer form is bound next to the text form. Untyped columns
/// compare without affinity conversion and need both.
fn key_params(key: &str) -> [Value; 2] {
    let text = Value::Text(key.to_string());
    match key.parse::<i64>() {
        Ok(id) if id.to_string() == key => [Value::Integer(id), text],
        _ => [text.clone(), text],
    }
}
