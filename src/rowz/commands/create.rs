use crate::commands::helpers::failure;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::RowzConfig;
use crate::error::{Result, RowzError};
use crate::model::{FieldSet, Table};
use crate::store::RecordStore;
use std::path::{Path, PathBuf};

/// Creates a header-only file. The configured extension is added when the name lacks it.
/// The final path is returned in `files`.
pub fn run<S: RecordStore>(
    store: &mut S,
    config: &RowzConfig,
    path: &Path,
    fields: &FieldSet,
    overwrite: bool,
) -> CmdResult {
    let target = target_path(config, path);
    match create(store, &target, fields, overwrite) {
        Ok(()) => {
            let mut result = CmdResult::default()
                .with_fields(fields.clone())
                .with_files(vec![target.clone()]);
            result.add_message(CmdMessage::success(format!(
                "Created {} with fields: {}",
                target.display(),
                fields
            )));
            result
        }
        Err(err) => failure("Could not create file", &err),
    }
}

fn target_path(config: &RowzConfig, path: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => path.with_file_name(config.with_extension(&name.to_string_lossy())),
        None => path.to_path_buf(),
    }
}

fn create<S: RecordStore>(
    store: &mut S,
    path: &Path,
    fields: &FieldSet,
    overwrite: bool,
) -> Result<()> {
    if fields.is_empty() {
        return Err(RowzError::ShapeMismatch(
            "a file needs at least one field".to_string(),
        ));
    }
    if store.exists(path) && !overwrite {
        return Err(RowzError::AlreadyExists(path.to_path_buf()));
    }
    store.write_table(path, &Table::empty(fields.clone()))
}
