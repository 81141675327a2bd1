use crate::commands::helpers::{failure, read_existing};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Table;
use crate::store::RecordStore;
use log::debug;
use std::collections::BTreeSet;
use std::path::Path;

/// Removes the records at the given 0-based positions and rewrites the file.
///
/// Out-of-range positions are ignored. When nothing would be removed the file is not
/// touched. `removed` holds the number of deleted records, 0 on any failure.
pub fn run<S: RecordStore>(store: &mut S, path: &Path, indices: &BTreeSet<usize>) -> CmdResult {
    match delete(store, path, indices) {
        Ok(0) => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info("No records deleted"));
            result
        }
        Ok(removed) => {
            let mut result = CmdResult::default().with_removed(removed);
            result.add_message(CmdMessage::success(format!(
                "Deleted {} record{} from {}",
                removed,
                if removed == 1 { "" } else { "s" },
                path.display()
            )));
            result
        }
        Err(err) => failure("Could not delete records", &err),
    }
}

fn delete<S: RecordStore>(store: &mut S, path: &Path, indices: &BTreeSet<usize>) -> Result<usize> {
    let table = read_existing(store, path)?;
    if indices.is_empty() {
        return Ok(0);
    }

    let total = table.records.len();
    let (kept, removed): (Vec<_>, Vec<_>) = table
        .records
        .into_iter()
        .enumerate()
        .partition(|(i, _)| !indices.contains(i));

    let ignored = indices.iter().filter(|i| **i >= total).count();
    if ignored > 0 {
        debug!("delete: ignoring {} out-of-range indices", ignored);
    }
    if removed.is_empty() {
        return Ok(0);
    }

    let kept = Table::new(table.fields, kept.into_iter().map(|(_, r)| r).collect());
    store.write_table(path, &kept)?;
    Ok(removed.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::load;
    use crate::store::fs::CsvStore;
    use crate::store::memory::fixtures::{StoreFixture, PEOPLE};
    use crate::store::memory::InMemoryStore;
    use std::fs;
    use tempfile::TempDir;

    fn names(store: &InMemoryStore) -> Vec<String> {
        load::run(store, Path::new(PEOPLE))
            .plain_records()
            .iter()
            .map(|r| r.get("name").unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn deletes_middle_record() {
        let mut fixture = StoreFixture::new().with_people(3);
        let result = run(&mut fixture.store, Path::new(PEOPLE), &BTreeSet::from([1]));

        assert!(result.success);
        assert_eq!(result.removed, 1);
        assert_eq!(names(&fixture.store), vec!["Person 1", "Person 3"]);
    }

    #[test]
    fn empty_selection_deletes_nothing() {
        let mut fixture = StoreFixture::new().with_people(3);
        let result = run(&mut fixture.store, Path::new(PEOPLE), &BTreeSet::new());

        assert!(result.success);
        assert_eq!(result.removed, 0);
        assert_eq!(names(&fixture.store).len(), 3);
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut fixture = StoreFixture::new().with_people(3);
        let result = run(
            &mut fixture.store,
            Path::new(PEOPLE),
            &BTreeSet::from([0, 7, 99]),
        );

        assert!(result.success);
        assert_eq!(result.removed, 1);
        assert_eq!(names(&fixture.store), vec!["Person 2", "Person 3"]);
    }

    #[test]
    fn missing_file_removes_nothing() {
        let mut store = InMemoryStore::new();
        let result = run(&mut store, Path::new("missing.csv"), &BTreeSet::from([0]));

        assert!(!result.success);
        assert_eq!(result.removed, 0);
    }

    #[test]
    fn empty_selection_leaves_file_bytes_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dos.csv");
        fs::write(&path, "id,name\r\n1,\"Ana, Maria\"\r\n2,Bea\r\n").unwrap();
        let before = fs::read(&path).unwrap();

        let mut store = CsvStore::new();
        let result = run(&mut store, &path, &BTreeSet::new());

        assert!(result.success);
        assert_eq!(result.removed, 0);
        assert_eq!(fs::read(&path).unwrap(), before);
    }
}
