use crate::commands::helpers::failure;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, RowzError};
use crate::model::{FieldSet, Record};
use crate::store::RecordStore;
use log::debug;
use std::path::Path;

/// Appends one record. A missing (or empty) file gets a header built from the
/// record's own keys; an existing file requires the keys to match its header.
pub fn run<S: RecordStore>(store: &mut S, path: &Path, record: &Record) -> CmdResult {
    match append(store, path, record) {
        Ok(()) => {
            debug!("appended record to {}", path.display());
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::success(format!(
                "Record added to {}: {}",
                path.display(),
                record.summary(60)
            )));
            result
        }
        Err(err) => failure("Could not add record", &err),
    }
}

fn append<S: RecordStore>(store: &mut S, path: &Path, record: &Record) -> Result<()> {
    if record.is_empty() {
        return Err(RowzError::ShapeMismatch("record has no fields".to_string()));
    }

    let existing = if store.exists(path) {
        Some(store.read_fields(path)?)
    } else {
        None
    };

    let fields = match existing {
        Some(fields) if !fields.is_empty() => {
            fields.check_record(record)?;
            fields
        }
        _ => FieldSet::new(record.fields())?,
    };

    store.append_record(path, &fields, record)
}
