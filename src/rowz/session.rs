//! # Session
//!
//! Interactive front ends keep a [`Session`]: the current file, its field set and the
//! records of the latest read. Handlers receive it explicitly; nothing is global.
//!
//! ## Row identity
//!
//! Each loaded record gets a [`RowId`]. Ids live only in memory, are regenerated on
//! every reload and are never written to disk. Mutations take ids, resolve them to
//! positions in the snapshot, then re-read the file and refuse to act when the row
//! at that position no longer matches what the user was shown. This catches edits
//! made by another program between listing and acting; it is not a lock. The check
//! compares record contents only, so swapping a row for an identical one goes
//! unnoticed.
//!
//! The file stays the single source of truth: after every mutation the session
//! reloads.

use crate::api::RowzApi;
use crate::commands::helpers::failure;
use crate::commands::{CmdMessage, CmdResult, MessageLevel};
use crate::error::{Result, RowzError};
use crate::index::parse_selections;
use crate::model::{FieldSet, Record};
use crate::store::RecordStore;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(Uuid);

impl RowId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let simple = self.0.simple().to_string();
        write!(f, "{}", &simple[..8])
    }
}

#[derive(Debug, Clone)]
pub struct SessionRow {
    pub id: RowId,
    pub index: usize,
    pub record: Record,
}

impl SessionRow {
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

#[derive(Debug, Default)]
pub struct Session {
    path: Option<PathBuf>,
    fields: Option<FieldSet>,
    rows: Vec<SessionRow>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn fields(&self) -> Option<&FieldSet> {
        self.fields.as_ref()
    }

    pub fn rows(&self) -> &[SessionRow] {
        &self.rows
    }

    pub fn is_open(&self) -> bool {
        self.path.is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: RowId) -> Option<&SessionRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Looks up a row by the 1-based number shown to users.
    pub fn row_by_number(&self, number: usize) -> Option<&SessionRow> {
        number.checked_sub(1).and_then(|i| self.rows.get(i))
    }

    /// Resolves numbers and ranges (`"1"`, `"3-5"`) to row ids of the current snapshot.
    pub fn select<I: AsRef<str>>(&self, inputs: &[I]) -> Result<Vec<RowId>> {
        let indices: BTreeSet<usize> = parse_selections(inputs).map_err(RowzError::Api)?;
        indices
            .into_iter()
            .map(|i| {
                self.rows
                    .get(i)
                    .map(|r| r.id)
                    .ok_or(RowzError::IndexOutOfRange {
                        index: i,
                        len: self.rows.len(),
                    })
            })
            .collect()
    }

    /// Points the session at `path` and reads it.
    pub fn open<S: RecordStore>(&mut self, api: &RowzApi<S>, path: &Path) -> CmdResult {
        self.path = Some(path.to_path_buf());
        self.reload(api)
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// Re-reads the current file, assigning fresh ids.
    pub fn reload<S: RecordStore>(&mut self, api: &RowzApi<S>) -> CmdResult {
        let path = match self.require_path() {
            Ok(path) => path,
            Err(err) => return failure("No file open", &err),
        };

        let result = api.load(&path);
        self.fields = result.fields.clone();
        self.rows = result
            .records
            .iter()
            .map(|dr| SessionRow {
                id: RowId::new(),
                index: dr.index,
                record: dr.record.clone(),
            })
            .collect();
        result
    }

    /// Creates a header-only file and makes it the current one.
    pub fn create<S: RecordStore, F: AsRef<str>>(
        &mut self,
        api: &mut RowzApi<S>,
        path: &Path,
        fields: &[F],
    ) -> CmdResult {
        let result = api.create_file(path, fields, false);
        if let Some(created) = result.files.first() {
            self.path = Some(created.clone());
            let reloaded = self.reload(api);
            return merge_reload(result, reloaded);
        }
        result
    }

    pub fn append<S: RecordStore>(&mut self, api: &mut RowzApi<S>, record: &Record) -> CmdResult {
        let path = match self.require_path() {
            Ok(path) => path,
            Err(err) => return failure("Could not add record", &err),
        };
        let result = api.append(&path, record);
        let reloaded = self.reload(api);
        merge_reload(result, reloaded)
    }

    pub fn delete<S: RecordStore>(&mut self, api: &mut RowzApi<S>, ids: &[RowId]) -> CmdResult {
        let (path, indices) = match self.verify_fresh(api, ids) {
            Ok(resolved) => resolved,
            Err(err) => return failure("Could not delete records", &err),
        };
        let indices: BTreeSet<usize> = indices.into_iter().collect();
        let result = api.delete_by_indices(&path, &indices);
        let reloaded = self.reload(api);
        merge_reload(result, reloaded)
    }

    pub fn modify_field<S: RecordStore>(
        &mut self,
        api: &mut RowzApi<S>,
        id: RowId,
        field: &str,
        value: &str,
    ) -> CmdResult {
        let (path, indices) = match self.verify_fresh(api, &[id]) {
            Ok(resolved) => resolved,
            Err(err) => return failure("Could not modify record", &err),
        };
        let result = api.modify_field(&path, indices[0], field, value);
        let reloaded = self.reload(api);
        merge_reload(result, reloaded)
    }

    pub fn replace<S: RecordStore>(
        &mut self,
        api: &mut RowzApi<S>,
        id: RowId,
        record: &Record,
    ) -> CmdResult {
        let (path, indices) = match self.verify_fresh(api, &[id]) {
            Ok(resolved) => resolved,
            Err(err) => return failure("Could not replace record", &err),
        };
        let result = api.replace_record(&path, indices[0], record);
        let reloaded = self.reload(api);
        merge_reload(result, reloaded)
    }

    fn require_path(&self) -> Result<PathBuf> {
        self.path
            .clone()
            .ok_or_else(|| RowzError::Api("no file is open".to_string()))
    }

    /// Maps ids to positions and checks the file still holds the same rows there.
    fn verify_fresh<S: RecordStore>(
        &self,
        api: &RowzApi<S>,
        ids: &[RowId],
    ) -> Result<(PathBuf, Vec<usize>)> {
        let path = self.require_path()?;
        let current = api.load(&path);
        if !current.success {
            return Err(RowzError::Api(
                current
                    .first_error()
                    .unwrap_or("could not re-read file")
                    .to_string(),
            ));
        }
        if current.fields.is_none() {
            return Err(RowzError::NotFound(path));
        }
        if current.fields.as_ref() != self.fields.as_ref() {
            return Err(RowzError::Api(
                "the file's fields changed since it was loaded; reload first".to_string(),
            ));
        }

        ids.iter()
            .map(|id| {
                let row = self
                    .row(*id)
                    .ok_or_else(|| RowzError::Api(format!("unknown row {}", id)))?;
                match current.records.get(row.index) {
                    Some(on_disk) if on_disk.record == row.record => Ok(row.index),
                    _ => Err(RowzError::Api(format!(
                        "record {} changed on disk since it was listed; reload first",
                        row.number()
                    ))),
                }
            })
            .collect::<Result<Vec<_>>>()
            .map(|indices| (path, indices))
    }
}

/// Keeps the mutation's result, adding reload diagnostics only when something went wrong.
fn merge_reload(mut result: CmdResult, reloaded: CmdResult) -> CmdResult {
    if !reloaded.success {
        result.success = false;
    }
    result.messages.extend(
        reloaded
            .messages
            .into_iter()
            .filter(|m| m.level != MessageLevel::Info),
    );
    result.fields = reloaded.fields.or(result.fields);
    result
}

impl From<&SessionRow> for CmdMessage {
    fn from(row: &SessionRow) -> Self {
        CmdMessage::info(format!("{}: {}", row.number(), row.record.summary(50)))
    }
}
