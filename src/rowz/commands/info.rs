use crate::commands::helpers::failure;
use crate::commands::CmdResult;
use crate::store::RecordStore;
use std::path::Path;

pub fn run<S: RecordStore>(store: &S, path: &Path) -> CmdResult {
    match store.stats(path) {
        Ok(stats) => CmdResult::default()
            .with_fields(stats.fields.clone())
            .with_stats(stats),
        Err(err) => failure(&format!("Could not inspect {}", path.display()), &err),
    }
}
