use crate::error::{Result, RowzError};
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;

/// Ordered column names of a file. Defines the shape every record must have.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet(Vec<String>);

impl FieldSet {
    /// Builds a field set for a new file, rejecting empty, blank or duplicate names.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(RowzError::ShapeMismatch(
                "a file needs at least one field".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for name in &names {
            if name.trim().is_empty() {
                return Err(RowzError::ShapeMismatch(
                    "field names cannot be blank".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(RowzError::ShapeMismatch(format!(
                    "duplicate field name: {}",
                    name
                )));
            }
        }

        Ok(Self(names))
    }

    /// Takes a header exactly as it was read from disk.
    pub fn from_header<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Parses a comma separated list such as `id, name, age`.
    pub fn parse_list(list: &str) -> Result<Self> {
        Self::new(list.split(',').map(|s| s.trim().to_string()))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|f| f == field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks that a record has exactly these keys, in any order.
    pub fn check_record(&self, record: &Record) -> Result<()> {
        if let Some(extra) = record.fields().find(|f| !self.contains(f)) {
            return Err(RowzError::ShapeMismatch(format!(
                "unknown field '{}' (fields: {})",
                extra, self
            )));
        }
        if let Some(missing) = self.iter().find(|f| record.get(f).is_none()) {
            return Err(RowzError::ShapeMismatch(format!(
                "missing value for field '{}'",
                missing
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for FieldSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// One data row: field name to value, keeping the order fields were inserted in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing the previous value if the field is already present.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, v)| (f.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values laid out in `fields` order. Missing fields come back as empty strings,
    /// so callers should run [`FieldSet::check_record`] first.
    pub fn values_in<'a>(&'a self, fields: &'a FieldSet) -> impl Iterator<Item = &'a str> {
        fields.iter().map(move |f| self.get(f).unwrap_or(""))
    }

    /// Builds a record by pairing a header with one row of values.
    pub fn from_row<'a, I>(fields: &FieldSet, values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        fields
            .iter()
            .zip(values)
            .map(|(f, v)| (f.to_string(), v.to_string()))
            .collect()
    }

    /// Parses `field=value` assignments as given on the command line.
    pub fn parse_assignments<I: AsRef<str>>(assignments: &[I]) -> Result<Self> {
        let mut record = Record::new();
        for raw in assignments {
            let raw = raw.as_ref();
            let (field, value) = raw.split_once('=').ok_or_else(|| {
                RowzError::Api(format!("Expected field=value, got: {}", raw))
            })?;
            record.insert(field.trim(), value);
        }
        Ok(record)
    }

    /// A one-line summary used in selection lists and messages.
    pub fn summary(&self, max_chars: usize) -> String {
        let joined = self
            .iter()
            .map(|(f, v)| format!("{}={}", f, v))
            .collect::<Vec<_>>()
            .join(", ");
        if joined.chars().count() > max_chars {
            let cut: String = joined.chars().take(max_chars).collect();
            format!("{}...", cut)
        } else {
            joined
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// The full contents of a file: header plus rows, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub fields: FieldSet,
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(fields: FieldSet, records: Vec<Record>) -> Self {
        Self { fields, records }
    }

    pub fn empty(fields: FieldSet) -> Self {
        Self {
            fields,
            records: Vec::new(),
        }
    }
}

/// File level facts shown by `info`.
#[derive(Debug, Clone, Serialize)]
pub struct FileStats {
    pub path: String,
    pub fields: FieldSet,
    pub record_count: usize,
    pub size_bytes: u64,
    pub modified_at: Option<DateTime<Utc>>,
}
