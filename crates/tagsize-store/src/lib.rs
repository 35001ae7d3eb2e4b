//! Store access for tagsize.
//!
//! This crate implements the [`TagSource`] read contract:
//!
//! - **SQLite** - [`SqliteStore`] reads an awtfdb database, opened strictly
//!   read-only so it can run next to writers of the same file
//! - **Memory** - [`MemorySource`] holds the relation in maps, for tests and
//!   embedding
//!
//! ```rust,no_run
//! use tagsize_store::{SqliteStore, TagSource};
//!
//! let store = SqliteStore::open(SqliteStore::default_path().unwrap()).unwrap();
//! for row in store.files().unwrap() {
//!     println!("{} {}", row.file, row.path.display());
//! }
//! ```

mod memory;
mod sqlite;

pub use memory::MemorySource;
pub use sqlite::{SqliteStore, StoreError};

// Re-export core types for convenience
pub use tagsize_core::{FileId, FileRow, TagId, TagSource};
