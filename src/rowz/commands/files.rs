use crate::commands::helpers::failure;
use crate::commands::{CmdMessage, CmdResult};
use crate::store::RecordStore;
use std::path::Path;

pub fn run<S: RecordStore>(store: &S, dir: &Path, ext: &str) -> CmdResult {
    match store.list_files(dir, ext) {
        Ok(files) => {
            let mut result = CmdResult::default();
            if files.is_empty() {
                result.add_message(CmdMessage::info(format!(
                    "No {} files in {}",
                    ext,
                    dir.display()
                )));
            }
            result.with_files(files)
        }
        Err(err) => failure(&format!("Could not list {}", dir.display()), &err),
    }
}
