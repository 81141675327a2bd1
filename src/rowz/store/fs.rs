use super::RecordStore;
use crate::error::{Result, RowzError};
use crate::model::{FieldSet, FileStats, Record, Table};
use chrono::{DateTime, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DEFAULT_DELIMITER: u8 = b',';

pub struct CsvStore {
    delimiter: u8,
    atomic_writes: bool,
}

impl Default for CsvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvStore {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            atomic_writes: true,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_atomic_writes(mut self, atomic_writes: bool) -> Self {
        self.atomic_writes = atomic_writes;
        self
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    fn open(&self, path: &Path) -> Result<File> {
        File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RowzError::NotFound(path.to_path_buf()),
            _ => RowzError::Io(e),
        })
    }

    fn reader(&self, path: &Path) -> Result<csv::Reader<File>> {
        let file = self.open(path)?;
        Ok(csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(file))
    }

    fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'));
        builder
    }

    fn encode(&self, table: &Table) -> Result<Vec<u8>> {
        let mut writer = self.writer_builder().from_writer(Vec::new());
        writer.write_record(table.fields.iter())?;
        for record in &table.records {
            writer.write_record(record.values_in(&table.fields))?;
        }
        writer
            .into_inner()
            .map_err(|e| RowzError::Io(e.into_error()))
    }

    /// Writes through a temporary sibling file so a failed write never truncates `path`.
    fn replace_atomically(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "rows".to_string());
        let tmp_path = dir.join(format!(".{}-{}.tmp", name, Uuid::new_v4()));

        fs::write(&tmp_path, bytes).map_err(RowzError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(RowzError::Io(e));
        }
        Ok(())
    }
}

fn ends_with_newline(file: &mut File) -> Result<bool> {
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

impl RecordStore for CsvStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_fields(&self, path: &Path) -> Result<FieldSet> {
        let mut reader = self.reader(path)?;
        let headers = reader.headers()?;
        Ok(FieldSet::from_header(headers.iter()))
    }

    fn read_table(&self, path: &Path) -> Result<Table> {
        let mut reader = self.reader(path)?;
        let fields = FieldSet::from_header(reader.headers()?.iter());

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            records.push(Record::from_row(&fields, row.iter()));
        }

        Ok(Table::new(fields, records))
    }

    fn append_record(&mut self, path: &Path, fields: &FieldSet, record: &Record) -> Result<()> {
        let needs_header = match fs::metadata(path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(RowzError::Io(e)),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)
            .map_err(RowzError::Io)?;

        // Hand-edited files often lack the final newline
        if !needs_header && !ends_with_newline(&mut file)? {
            file.write_all(b"\n").map_err(RowzError::Io)?;
        }

        let mut writer = self.writer_builder().from_writer(file);
        if needs_header {
            writer.write_record(fields.iter())?;
        }
        writer.write_record(record.values_in(fields))?;
        writer.flush().map_err(RowzError::Io)?;
        Ok(())
    }

    fn write_table(&mut self, path: &Path, table: &Table) -> Result<()> {
        let bytes = self.encode(table)?;
        if self.atomic_writes {
            self.replace_atomically(path, &bytes)
        } else {
            fs::write(path, bytes).map_err(RowzError::Io)
        }
    }

    fn list_files(&self, dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
        let ext = ext.to_lowercase();
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(RowzError::Io)? {
            let path = entry.map_err(RowzError::Io)?.path();
            let matches = path
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase().ends_with(&ext))
                .unwrap_or(false);
            if path.is_file() && matches {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn stats(&self, path: &Path) -> Result<FileStats> {
        let meta = fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RowzError::NotFound(path.to_path_buf()),
            _ => RowzError::Io(e),
        })?;
        let modified_at = meta.modified().ok().map(DateTime::<Utc>::from);
        let table = self.read_table(path)?;

        Ok(FileStats {
            path: path.display().to_string(),
            fields: table.fields,
            record_count: table.records.len(),
            size_bytes: meta.len(),
            modified_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn people() -> Table {
        let fields = FieldSet::new(["id", "name", "note"]).unwrap();
        let records = vec![
            Record::new()
                .with("id", "1")
                .with("name", "Ana")
                .with("note", "likes, commas"),
            Record::new()
                .with("id", "2")
                .with("name", "Bea \"B\"")
                .with("note", "two\nlines"),
        ];
        Table::new(fields, records)
    }

    #[test]
    fn write_then_read_preserves_quoted_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("people.csv");
        let mut store = CsvStore::new();

        store.write_table(&path, &people()).unwrap();
        let table = store.read_table(&path).unwrap();

        assert_eq!(table, people());
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new();
        let err = store.read_table(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, RowzError::NotFound(_)));
    }

    #[test]
    fn append_writes_header_only_for_new_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.csv");
        let mut store = CsvStore::new();
        let fields = FieldSet::new(["a", "b"]).unwrap();

        store
            .append_record(&path, &fields, &Record::new().with("a", "1").with("b", "2"))
            .unwrap();
        store
            .append_record(&path, &fields, &Record::new().with("b", "4").with("a", "3"))
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,2\n3,4\n");
    }

    #[test]
    fn append_repairs_missing_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hand.csv");
        fs::write(&path, "a,b\n1,2").unwrap();
        let mut store = CsvStore::new();
        let fields = store.read_fields(&path).unwrap();

        store
            .append_record(&path, &fields, &Record::new().with("a", "3").with("b", "4"))
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,2\n3,4\n");
    }

    #[test]
    fn atomic_rewrite_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("people.csv");
        let mut store = CsvStore::new();

        store.write_table(&path, &people()).unwrap();

        for entry in fs::read_dir(dir.path()).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().into_owned();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
    }

    #[test]
    fn custom_delimiter_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("semi.csv");
        let mut store = CsvStore::new()
            .with_delimiter(b';')
            .with_atomic_writes(false);

        store.write_table(&path, &people()).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("id;name;note\n"));
        assert_eq!(store.read_table(&path).unwrap(), people());
    }

    #[test]
    fn ragged_rows_fail_to_decode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ragged.csv");
        fs::write(&path, "a,b\n1,2\n3\n").unwrap();

        let err = CsvStore::new().read_table(&path).unwrap_err();
        assert!(matches!(err, RowzError::Csv(_)));
    }

    #[test]
    fn crlf_files_are_accepted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dos.csv");
        fs::write(&path, "a,b\r\n1,2\r\n").unwrap();

        let table = CsvStore::new().read_table(&path).unwrap();
        assert_eq!(table.records[0].get("b"), Some("2"));
    }

    #[test]
    fn list_files_filters_by_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.csv"), "x\n").unwrap();
        fs::write(dir.path().join("a.CSV"), "x\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "x\n").unwrap();
        fs::create_dir(dir.path().join("dir.csv")).unwrap();

        let files = CsvStore::new().list_files(dir.path(), ".csv").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.csv"]);
    }

    #[test]
    fn stats_reports_shape_and_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("people.csv");
        let mut store = CsvStore::new();
        store.write_table(&path, &people()).unwrap();

        let stats = store.stats(&path).unwrap();
        assert_eq!(stats.record_count, 2);
        assert_eq!(stats.fields.len(), 3);
        assert_eq!(stats.size_bytes, fs::metadata(&path).unwrap().len());
        assert!(stats.modified_at.is_some());
    }
}
