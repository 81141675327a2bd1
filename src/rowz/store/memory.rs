use super::RecordStore;
use crate::error::{Result, RowzError};
use crate::model::{FieldSet, FileStats, Record, Table};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

struct MemFile {
    table: Table,
    modified_at: DateTime<Utc>,
}

/// Keeps one table per path. Used by unit tests across the crate.
#[derive(Default)]
pub struct InMemoryStore {
    files: HashMap<PathBuf, MemFile>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, path: &Path) -> Result<&MemFile> {
        self.files
            .get(path)
            .ok_or_else(|| RowzError::NotFound(path.to_path_buf()))
    }

    fn put(&mut self, path: &Path, table: Table) {
        self.files.insert(
            path.to_path_buf(),
            MemFile {
                table,
                modified_at: Utc::now(),
            },
        );
    }
}

impl RecordStore for InMemoryStore {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_fields(&self, path: &Path) -> Result<FieldSet> {
        Ok(self.get(path)?.table.fields.clone())
    }

    fn read_table(&self, path: &Path) -> Result<Table> {
        Ok(self.get(path)?.table.clone())
    }

    fn append_record(&mut self, path: &Path, fields: &FieldSet, record: &Record) -> Result<()> {
        let row = Record::from_row(fields, record.values_in(fields));
        match self.files.get_mut(path) {
            Some(file) => {
                if file.table.fields.is_empty() {
                    file.table.fields = fields.clone();
                }
                file.table.records.push(row);
                file.modified_at = Utc::now();
            }
            None => self.put(path, Table::new(fields.clone(), vec![row])),
        }
        Ok(())
    }

    fn write_table(&mut self, path: &Path, table: &Table) -> Result<()> {
        self.put(path, table.clone());
        Ok(())
    }

    fn list_files(&self, dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
        let ext = ext.to_lowercase();
        let mut files: Vec<PathBuf> = self
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .filter(|p| p.to_string_lossy().to_lowercase().ends_with(&ext))
            .cloned()
            .collect();
        files.sort();
        Ok(files)
    }

    fn stats(&self, path: &Path) -> Result<FileStats> {
        let file = self.get(path)?;
        Ok(FileStats {
            path: path.display().to_string(),
            fields: file.table.fields.clone(),
            record_count: file.table.records.len(),
            size_bytes: 0,
            modified_at: Some(file.modified_at),
        })
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub const PEOPLE: &str = "people.csv";

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// `people.csv` with fields `id,name` and `count` rows named `Person 1..=count`.
        pub fn with_people(mut self, count: usize) -> Self {
            let fields = FieldSet::new(["id", "name"]).unwrap();
            let records = (1..=count)
                .map(|i| {
                    Record::new()
                        .with("id", i.to_string())
                        .with("name", format!("Person {}", i))
                })
                .collect();
            self.store
                .write_table(Path::new(PEOPLE), &Table::new(fields, records))
                .unwrap();
            self
        }

        pub fn with_table(mut self, path: &str, table: Table) -> Self {
            self.store.write_table(Path::new(path), &table).unwrap();
            self
        }
    }
}
