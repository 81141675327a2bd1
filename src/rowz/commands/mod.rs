//! # Command Layer
//!
//! One module per operation. Commands never return `Err` to their caller: every
//! failure (missing file, shape mismatch, IO) is turned into a [`CmdResult`] with
//! `success == false`, an error message and a `warn!` log line. Callers must check
//! `success` (or the count they asked for); ignoring it hides failures.

use crate::config::RowzConfig;
use crate::index::DisplayRecord;
use crate::model::{FieldSet, FileStats};
use std::path::PathBuf;

pub mod append;
pub mod config;
pub mod create;
pub mod delete;
pub mod files;
pub mod helpers;
pub mod info;
pub mod load;
pub mod modify;
pub mod rewrite;

#[derive(Debug, Clone)]
pub struct RowzPaths {
    pub config_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug)]
pub struct CmdResult {
    pub success: bool,
    pub fields: Option<FieldSet>,
    pub records: Vec<DisplayRecord>,
    pub removed: usize,
    pub files: Vec<PathBuf>,
    pub stats: Option<FileStats>,
    pub config: Option<RowzConfig>,
    pub messages: Vec<CmdMessage>,
}

impl Default for CmdResult {
    fn default() -> Self {
        Self {
            success: true,
            fields: None,
            records: Vec::new(),
            removed: 0,
            files: Vec::new(),
            stats: None,
            config: None,
            messages: Vec::new(),
        }
    }
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_fields(mut self, fields: FieldSet) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_records(mut self, records: Vec<DisplayRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn with_removed(mut self, removed: usize) -> Self {
        self.removed = removed;
        self
    }

    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }

    pub fn with_stats(mut self, stats: FileStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_config(mut self, config: RowzConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Plain records, without their display positions.
    pub fn plain_records(&self) -> Vec<crate::model::Record> {
        self.records.iter().map(|dr| dr.record.clone()).collect()
    }

    pub fn first_error(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.level == MessageLevel::Error)
            .map(|m| m.content.as_str())
    }
}
