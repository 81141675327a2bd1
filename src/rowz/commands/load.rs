use crate::commands::helpers::failure;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::RowzError;
use crate::index::index_records;
use crate::store::RecordStore;
use log::{debug, warn};
use std::path::Path;

/// Reads every record of `path`.
///
/// A missing file is not a failure: the result is empty and carries a warning.
/// A file that cannot be decoded yields no records and a failed result.
pub fn run<S: RecordStore>(store: &S, path: &Path) -> CmdResult {
    match store.read_table(path) {
        Ok(table) => {
            debug!(
                "loaded {} records from {}",
                table.records.len(),
                path.display()
            );
            CmdResult::default()
                .with_fields(table.fields)
                .with_records(index_records(table.records))
        }
        Err(RowzError::NotFound(missing)) => {
            warn!("load: {} does not exist", missing.display());
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::warning(format!(
                "File not found: {}",
                missing.display()
            )));
            result
        }
        Err(err) => failure(&format!("Could not read {}", path.display()), &err),
    }
}
