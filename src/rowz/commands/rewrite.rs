use crate::commands::helpers::failure;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, RowzError};
use crate::model::{FieldSet, Record, Table};
use crate::store::RecordStore;
use std::path::Path;

/// Replaces the whole file with `fields` as header and `records` as rows.
///
/// Every record must carry exactly the fields of the header.
pub fn run<S: RecordStore>(
    store: &mut S,
    path: &Path,
    fields: &FieldSet,
    records: &[Record],
) -> CmdResult {
    match rewrite(store, path, fields, records) {
        Ok(()) => {
            let mut result = CmdResult::default().with_fields(fields.clone());
            result.add_message(CmdMessage::success(format!(
                "Wrote {} records to {}",
                records.len(),
                path.display()
            )));
            result
        }
        Err(err) => failure("Could not rewrite file", &err),
    }
}

fn rewrite<S: RecordStore>(
    store: &mut S,
    path: &Path,
    fields: &FieldSet,
    records: &[Record],
) -> Result<()> {
    if fields.is_empty() {
        return Err(RowzError::ShapeMismatch(
            "cannot write a file without fields".to_string(),
        ));
    }
    for record in records {
        fields.check_record(record)?;
    }
    store.write_table(path, &Table::new(fields.clone(), records.to_vec()))
}
