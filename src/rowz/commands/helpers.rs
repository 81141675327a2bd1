use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, RowzError};
use crate::model::Table;
use crate::store::RecordStore;
use log::warn;
use std::path::Path;

/// Folds an error into a failed result, logging the diagnostic.
pub fn failure(context: &str, err: &RowzError) -> CmdResult {
    warn!("{}: {}", context, err);
    let mut result = CmdResult {
        success: false,
        ..CmdResult::default()
    };
    result.add_message(CmdMessage::error(format!("{}: {}", context, err)));
    result
}

/// Reads the whole file, the first half of every read-modify-write.
pub fn read_existing<S: RecordStore>(store: &S, path: &Path) -> Result<Table> {
    if !store.exists(path) {
        return Err(RowzError::NotFound(path.to_path_buf()));
    }
    store.read_table(path)
}

pub fn check_index(table: &Table, index: usize) -> Result<()> {
    if index >= table.records.len() {
        return Err(RowzError::IndexOutOfRange {
            index,
            len: table.records.len(),
        });
    }
    Ok(())
}

pub fn check_field(table: &Table, field: &str) -> Result<()> {
    if !table.fields.contains(field) {
        return Err(RowzError::ShapeMismatch(format!(
            "'{}' is not a field of this file (fields: {})",
            field, table.fields
        )));
    }
    Ok(())
}
