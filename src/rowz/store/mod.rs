//! # Storage Layer
//!
//! The [`RecordStore`] trait is the only place that touches file contents. Everything
//! above it (commands, API, CLI) works on [`Table`]s and [`Record`]s.
//!
//! ## Implementations
//!
//! - [`fs::CsvStore`]: production storage over delimited text files
//!   - Header line holds the field set, one line per record after it
//!   - Conventional CSV quoting, UTF-8, `\n` line endings on write
//!   - Full rewrites go through a temporary sibling file and a rename when
//!     atomic writes are enabled
//!
//! - [`memory::InMemoryStore`]: in-memory storage for testing
//!   - Keeps one [`Table`] per path, no persistence
//!
//! ## Consistency
//!
//! Every mutation other than append is a read-modify-write of the whole file. There is
//! no locking: two writers on the same file can lose each other's changes.

use crate::error::Result;
use crate::model::{FieldSet, FileStats, Record, Table};
use std::path::{Path, PathBuf};

pub mod fs;
pub mod memory;

/// Abstract interface over record files.
pub trait RecordStore {
    /// Whether a file exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read the header only
    fn read_fields(&self, path: &Path) -> Result<FieldSet>;

    /// Read header and every record
    fn read_table(&self, path: &Path) -> Result<Table>;

    /// Append one record, writing `fields` as the header first when the file is new
    fn append_record(&mut self, path: &Path, fields: &FieldSet, record: &Record) -> Result<()>;

    /// Replace the whole file with `table`
    fn write_table(&mut self, path: &Path, table: &Table) -> Result<()>;

    /// List files in `dir` whose name ends with `ext`, sorted by name
    fn list_files(&self, dir: &Path, ext: &str) -> Result<Vec<PathBuf>>;

    /// Size, modification time and shape of a file
    fn stats(&self, path: &Path) -> Result<FileStats>;
}
