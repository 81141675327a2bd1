//! # Record Selection
//!
//! Users pick records by the 1-based number shown next to each row ("record 3"); the
//! store works with 0-based positions within the latest read. This module converts
//! between the two.
//!
//! Supported input:
//! - Single number: `3`
//! - Range: `2-4` (expands to 2, 3, 4)
//!
//! Whether a selected record actually exists is decided later, against the file
//! contents at the time of the operation.

use crate::model::Record;
use std::collections::BTreeSet;

/// A record together with its 0-based position in the read it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    pub index: usize,
    pub record: Record,
}

impl DisplayRecord {
    /// The number shown to users.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

pub fn index_records(records: Vec<Record>) -> Vec<DisplayRecord> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| DisplayRecord { index, record })
        .collect()
}

/// Parses one displayed record number into a 0-based index.
pub fn parse_number(s: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid record number: {}", s))?;
    if n == 0 {
        return Err("Record numbers start at 1".to_string());
    }
    Ok(n - 1)
}

/// Parses a single number or an inclusive range into 0-based indices.
pub fn parse_number_or_range(s: &str) -> Result<Vec<usize>, String> {
    if let Some((start, end)) = s.split_once('-') {
        let start = parse_number(start)?;
        let end = parse_number(end)?;
        if start > end {
            return Err(format!(
                "Invalid range: start ({}) must be <= end ({})",
                start + 1,
                end + 1
            ));
        }
        return Ok((start..=end).collect());
    }
    parse_number(s).map(|i| vec![i])
}

/// Parses a list of numbers and ranges into a deduplicated set of 0-based indices.
pub fn parse_selections<I: AsRef<str>>(inputs: &[I]) -> Result<BTreeSet<usize>, String> {
    let mut indices = BTreeSet::new();
    for input in inputs {
        for part in input.as_ref().split(',').filter(|p| !p.trim().is_empty()) {
            indices.extend(parse_number_or_range(part.trim())?);
        }
    }
    Ok(indices)
}
