use crate::commands::helpers::{check_field, check_index, failure, read_existing};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::DisplayRecord;
use crate::model::Record;
use crate::store::RecordStore;
use log::debug;
use std::path::Path;

/// Sets one field of the record at `index` and rewrites the file.
///
/// Fails, leaving the file untouched, when the file is missing, the index is out of
/// range or the field is not part of the header.
pub fn run<S: RecordStore>(
    store: &mut S,
    path: &Path,
    index: usize,
    field: &str,
    value: &str,
) -> CmdResult {
    match modify_field(store, path, index, field, value) {
        Ok((old, updated)) => {
            let mut result = CmdResult::default().with_records(vec![DisplayRecord {
                index,
                record: updated,
            }]);
            result.add_message(CmdMessage::success(format!(
                "Record {} updated: {} = '{}' -> '{}'",
                index + 1,
                field,
                old,
                value
            )));
            result
        }
        Err(err) => failure("Could not modify record", &err),
    }
}

/// Replaces every value of the record at `index`. The new record must match the header.
pub fn replace<S: RecordStore>(
    store: &mut S,
    path: &Path,
    index: usize,
    record: &Record,
) -> CmdResult {
    match replace_record(store, path, index, record) {
        Ok(updated) => {
            let mut result = CmdResult::default().with_records(vec![DisplayRecord {
                index,
                record: updated,
            }]);
            result.add_message(CmdMessage::success(format!(
                "Record {} replaced",
                index + 1
            )));
            result
        }
        Err(err) => failure("Could not replace record", &err),
    }
}

fn modify_field<S: RecordStore>(
    store: &mut S,
    path: &Path,
    index: usize,
    field: &str,
    value: &str,
) -> Result<(String, Record)> {
    let mut table = read_existing(store, path)?;
    check_index(&table, index)?;
    check_field(&table, field)?;

    let record = &mut table.records[index];
    let old = record.get(field).unwrap_or_default().to_string();
    record.insert(field, value);
    let updated = record.clone();

    debug!("modify: {}[{}].{} rewritten", path.display(), index, field);
    store.write_table(path, &table)?;
    Ok((old, updated))
}

fn replace_record<S: RecordStore>(
    store: &mut S,
    path: &Path,
    index: usize,
    record: &Record,
) -> Result<Record> {
    let mut table = read_existing(store, path)?;
    check_index(&table, index)?;
    table.fields.check_record(record)?;

    let ordered = Record::from_row(&table.fields, record.values_in(&table.fields));
    table.records[index] = ordered.clone();

    store.write_table(path, &table)?;
    Ok(ordered)
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

    #[test]
    fn updates_single_field() {
        let mut fixture = StoreFixture::new().with_people(3);
        let result = run(&mut fixture.store, Path::new(PEOPLE), 1, "name", "Bea");

        assert!(result.success);
        assert_eq!(result.records[0].record.get("name"), Some("Bea"));

        let loaded = load::run(&fixture.store, Path::new(PEOPLE)).plain_records();
        assert_eq!(loaded[1].get("name"), Some("Bea"));
        assert_eq!(loaded[1].get("id"), Some("2"));
        assert_eq!(loaded[0].get("name"), Some("Person 1"));
    }

    #[test]
    fn out_of_range_index_leaves_file_unmodified() {
        let mut fixture = StoreFixture::new().with_people(3);
        let before = load::run(&fixture.store, Path::new(PEOPLE)).plain_records();

        let result = run(&mut fixture.store, Path::new(PEOPLE), 99, "name", "x");

        assert!(!result.success);
        let after = load::run(&fixture.store, Path::new(PEOPLE)).plain_records();
        assert_eq!(before, after);
    }

    #[test]
    fn unknown_field_fails() {
        let mut fixture = StoreFixture::new().with_people(1);
        let result = run(&mut fixture.store, Path::new(PEOPLE), 0, "age", "4");

        assert!(!result.success);
        assert!(result.first_error().unwrap().contains("age"));
    }

    #[test]
    fn missing_file_fails() {
        let mut store = InMemoryStore::new();
        assert!(!run(&mut store, Path::new("missing.csv"), 0, "name", "x").success);
        assert!(!store.exists(Path::new("missing.csv")));
    }

    #[test]
    fn replace_swaps_whole_record_in_header_order() {
        let mut fixture = StoreFixture::new().with_people(2);
        let record = Record::new().with("name", "New").with("id", "42");

        let result = replace(&mut fixture.store, Path::new(PEOPLE), 0, &record);
        assert!(result.success);

        let loaded = load::run(&fixture.store, Path::new(PEOPLE)).plain_records();
        assert_eq!(loaded[0].get("id"), Some("42"));
        assert_eq!(loaded[0].fields().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn replace_rejects_partial_record() {
        let mut fixture = StoreFixture::new().with_people(2);
        let record = Record::new().with("name", "Only name");

        assert!(!replace(&mut fixture.store, Path::new(PEOPLE), 0, &record).success);
    }

    #[test]
    fn out_of_range_index_leaves_file_bytes_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dos.csv");
        fs::write(&path, "id,name\r\n1,\"Ana, Maria\"\r\n2,Bea\r\n").unwrap();
        let before = fs::read(&path).unwrap();

        let mut store = CsvStore::new();
        let result = run(&mut store, &path, 99, "name", "x");

        assert!(!result.success);
        assert_eq!(fs::read(&path).unwrap(), before);
    }
}
