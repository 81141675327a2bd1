//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry point
//! for every rowz operation, whatever UI drives it.
//!
//! The facade:
//! - **Dispatches** to the matching command function
//! - **Normalizes inputs** (1-based selections → 0-based indices, field lists → [`FieldSet`])
//! - **Returns** a [`CmdResult`] for every call
//!
//! No method returns `Err`. Failures arrive as `success == false` plus an error message,
//! so a caller that ignores the result will not notice a failed write. Always check
//! `success` (or `removed` for deletes).
//!
//! `RowzApi<S: RecordStore>` is generic over the storage backend:
//! - Production: `RowzApi<CsvStore>`
//! - Testing: `RowzApi<InMemoryStore>`

use crate::commands::{self, helpers::failure};
use crate::config::RowzConfig;
use crate::error::RowzError;
use crate::index::parse_selections;
use crate::model::{FieldSet, Record};
use crate::store::RecordStore;
use std::collections::BTreeSet;
use std::path::Path;

/// The main API facade for rowz operations.
pub struct RowzApi<S: RecordStore> {
    store: S,
    paths: RowzPaths,
    config: RowzConfig,
}

impl<S: RecordStore> RowzApi<S> {
    pub fn new(store: S, paths: RowzPaths, config: RowzConfig) -> Self {
        Self {
            store,
            paths,
            config,
        }
    }

    /// All records of `path`; empty (with a warning) when the file does not exist.
    pub fn load(&self, path: &Path) -> CmdResult {
        commands::load::run(&self.store, path)
    }

    pub fn append(&mut self, path: &Path, record: &Record) -> CmdResult {
        commands::append::run(&mut self.store, path, record)
    }

    /// Deletes by 0-based position. `removed` holds the count.
    pub fn delete_by_indices(&mut self, path: &Path, indices: &BTreeSet<usize>) -> CmdResult {
        commands::delete::run(&mut self.store, path, indices)
    }

    /// Deletes by the 1-based numbers (and ranges) users see, e.g. `["1", "3-4"]`.
    pub fn delete_selected<I: AsRef<str>>(&mut self, path: &Path, selections: &[I]) -> CmdResult {
        match parse_selections(selections) {
            Ok(indices) => self.delete_by_indices(path, &indices),
            Err(e) => failure("Invalid selection", &RowzError::Api(e)),
        }
    }

    pub fn rewrite_all(&mut self, path: &Path, fields: &FieldSet, records: &[Record]) -> CmdResult {
        commands::rewrite::run(&mut self.store, path, fields, records)
    }

    pub fn modify_field(&mut self, path: &Path, index: usize, field: &str, value: &str) -> CmdResult {
        commands::modify::run(&mut self.store, path, index, field, value)
    }

    pub fn replace_record(&mut self, path: &Path, index: usize, record: &Record) -> CmdResult {
        commands::modify::replace(&mut self.store, path, index, record)
    }

    pub fn create_file<F: AsRef<str>>(
        &mut self,
        path: &Path,
        fields: &[F],
        overwrite: bool,
    ) -> CmdResult {
        match FieldSet::new(fields.iter().map(|f| f.as_ref().trim().to_string())) {
            Ok(fields) => {
                commands::create::run(&mut self.store, &self.config, path, &fields, overwrite)
            }
            Err(err) => failure("Could not create file", &err),
        }
    }

    pub fn list_files(&self, dir: &Path) -> CmdResult {
        commands::files::run(&self.store, dir, self.config.get_file_ext())
    }

    pub fn info(&self, path: &Path) -> CmdResult {
        commands::info::run(&self.store, path)
    }

    pub fn config(&self, action: ConfigAction) -> CmdResult {
        commands::config::run(&self.paths, action)
    }

    pub fn settings(&self) -> &RowzConfig {
        &self.config
    }

    pub fn paths(&self) -> &RowzPaths {
        &self.paths
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel, RowzPaths};
