//! Core types and traits for tagsize.
//!
//! This crate provides the fundamental data structures shared by the
//! tagsize crates: file and tag identities, the store read contract,
//! report configuration and the error taxonomy.

mod config;
mod error;
mod ids;
mod source;

pub use config::{AccessPattern, MissingPathPolicy, ReportConfig, ReportConfigBuilder, GIB};
pub use error::{ReportError, Result, SkippedPath};
pub use ids::{FileId, FileRow, TagId};
pub use source::TagSource;
