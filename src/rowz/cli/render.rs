//! # Rendering
//!
//! Turns command results into terminal text. Layout math (column widths, truncation,
//! padding) stays in Rust because it needs Unicode-aware width handling; the templates
//! in `templates/` only arrange the pre-computed strings and pick styles.
//!
//! Every function takes `use_color` explicitly. The CLI decides it once from the
//! terminal and `--no-color`; tests pass `false` and compare plain text.

use super::styles::{names, ROWZ_THEME};
use super::templates::{
    MESSAGES_TEMPLATE, PAIRS_TEMPLATE, RECORD_TEMPLATE, TABLE_TEMPLATE, TEXT_LIST_TEMPLATE,
};
use super::theme::render_with_color;
use chrono::{DateTime, Utc};
use rowz::api::{CmdMessage, MessageLevel};
use rowz::index::DisplayRecord;
use rowz::model::{FieldSet, FileStats, Record};
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a column may grow before its cells are truncated.
pub const MAX_COLUMN_WIDTH: usize = 32;
pub const ELLIPSIS: char = '…';

#[derive(Serialize)]
struct RowData {
    number: String,
    cells: Vec<String>,
}

#[derive(Serialize)]
struct TableData {
    empty: bool,
    empty_message: String,
    number_header: String,
    header: Vec<String>,
    rows: Vec<RowData>,
    footer: String,
}

#[derive(Serialize)]
struct EntryData {
    name: String,
    value: String,
}

#[derive(Serialize)]
struct RecordData {
    title: String,
    entries: Vec<EntryData>,
}

#[derive(Serialize)]
struct PairsData {
    entries: Vec<EntryData>,
}

#[derive(Serialize)]
struct TextListData {
    lines: Vec<String>,
    empty_message: String,
}

#[derive(Serialize)]
struct MessageData {
    content: String,
    style: String,
}

#[derive(Serialize)]
struct MessagesData {
    messages: Vec<MessageData>,
}

/// Renders records as an aligned table, numbered the way users select them.
///
/// `rows` pairs each record with its 1-based number.
pub fn render_table(fields: &FieldSet, rows: &[(usize, &Record)], use_color: bool) -> String {
    if fields.is_empty() && rows.is_empty() {
        return render_empty_table("No records.", use_color);
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|(_, record)| record.values_in(fields).map(single_line).collect())
        .collect();

    let widths: Vec<usize> = fields
        .iter()
        .enumerate()
        .map(|(col, name)| {
            cells
                .iter()
                .map(|row| row[col].width())
                .chain(std::iter::once(name.width()))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let number_width = rows
        .iter()
        .map(|(n, _)| n.to_string().len())
        .max()
        .unwrap_or(1)
        .max(1);

    let header = layout_cells(fields.iter(), &widths);
    let rows = rows
        .iter()
        .zip(&cells)
        .map(|((number, _), row)| RowData {
            number: format!("{:>width$}", number, width = number_width),
            cells: layout_cells(row.iter().map(String::as_str), &widths),
        })
        .collect::<Vec<_>>();

    let footer = match rows.len() {
        0 => "No records.".to_string(),
        1 => "1 record".to_string(),
        n => format!("{} records", n),
    };

    let data = TableData {
        empty: false,
        empty_message: String::new(),
        number_header: format!("{:>width$}", "#", width = number_width),
        header,
        rows,
        footer,
    };

    render_with_color(TABLE_TEMPLATE, &data, &ROWZ_THEME, use_color)
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

/// Convenience for results coming straight from the command layer.
pub fn render_display_records(
    fields: &FieldSet,
    records: &[DisplayRecord],
    use_color: bool,
) -> String {
    let rows: Vec<(usize, &Record)> = records
        .iter()
        .map(|dr| (dr.number(), &dr.record))
        .collect();
    render_table(fields, &rows, use_color)
}

fn render_empty_table(message: &str, use_color: bool) -> String {
    let data = TableData {
        empty: true,
        empty_message: message.to_string(),
        number_header: String::new(),
        header: vec![],
        rows: vec![],
        footer: String::new(),
    };
    render_with_color(TABLE_TEMPLATE, &data, &ROWZ_THEME, use_color)
        .unwrap_or_else(|_| format!("{}\n", message))
}

/// Renders one record as `field  value` lines under a title.
pub fn render_record(number: usize, record: &Record, use_color: bool) -> String {
    let name_width = record.fields().map(|f| f.width()).max().unwrap_or(0);
    let data = RecordData {
        title: format!("Record {}", number),
        entries: record
            .iter()
            .map(|(name, value)| EntryData {
                name: pad_to_width(name, name_width),
                value: value.to_string(),
            })
            .collect(),
    };
    render_with_color(RECORD_TEMPLATE, &data, &ROWZ_THEME, use_color)
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

/// Renders `name  value` lines with the names aligned.
pub fn render_pairs(pairs: &[(String, String)], use_color: bool) -> String {
    let name_width = pairs.iter().map(|(n, _)| n.width()).max().unwrap_or(0);
    let data = PairsData {
        entries: pairs
            .iter()
            .map(|(name, value)| EntryData {
                name: pad_to_width(name, name_width),
                value: value.clone(),
            })
            .collect(),
    };
    render_with_color(PAIRS_TEMPLATE, &data, &ROWZ_THEME, use_color)
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

pub fn render_info(stats: &FileStats, use_color: bool) -> String {
    let modified = match stats.modified_at {
        Some(ts) => format!(
            "{} ({})",
            ts.format("%Y-%m-%d %H:%M:%S UTC"),
            format_time_ago(ts)
        ),
        None => "unknown".to_string(),
    };
    let pairs = vec![
        ("path".to_string(), stats.path.clone()),
        ("fields".to_string(), stats.fields.to_string()),
        ("records".to_string(), stats.record_count.to_string()),
        ("size".to_string(), format_size(stats.size_bytes)),
        ("modified".to_string(), modified),
    ];
    render_pairs(&pairs, use_color)
}

pub fn render_text_list(lines: &[String], empty_message: &str, use_color: bool) -> String {
    let data = TextListData {
        lines: lines.to_vec(),
        empty_message: empty_message.to_string(),
    };
    render_with_color(TEXT_LIST_TEMPLATE, &data, &ROWZ_THEME, use_color)
        .unwrap_or_else(|_| format!("{}\n", empty_message))
}

/// Renders command messages, one per line, styled by level.
pub fn render_messages(messages: &[CmdMessage], use_color: bool) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let data = MessagesData {
        messages: messages
            .iter()
            .map(|msg| MessageData {
                content: msg.content.clone(),
                style: message_style(msg.level).to_string(),
            })
            .collect(),
    };

    render_with_color(MESSAGES_TEMPLATE, &data, &ROWZ_THEME, use_color).unwrap_or_else(|_| {
        messages
            .iter()
            .map(|m| format!("{}\n", m.content))
            .collect()
    })
}

/// Records as a JSON array of objects, keys in header order.
pub fn render_json(records: &[DisplayRecord]) -> serde_json::Result<String> {
    let plain: Vec<&Record> = records.iter().map(|dr| &dr.record).collect();
    serde_json::to_string_pretty(&plain).map(|json| format!("{}\n", json))
}

fn message_style(level: MessageLevel) -> &'static str {
    match level {
        MessageLevel::Info => names::INFO,
        MessageLevel::Success => names::SUCCESS,
        MessageLevel::Warning => names::WARNING,
        MessageLevel::Error => names::ERROR,
    }
}

/// Truncates and pads each cell to its column width. The last column is not padded.
fn layout_cells<'a, I>(cells: I, widths: &[usize]) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    let last = widths.len().saturating_sub(1);
    cells
        .zip(widths)
        .enumerate()
        .map(|(col, (cell, width))| {
            let cell = truncate_to_width(cell, *width);
            if col == last {
                cell
            } else {
                pad_to_width(&cell, *width)
            }
        })
        .collect()
}

/// Embedded line breaks would break the table layout.
fn single_line(value: &str) -> String {
    value.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push(ELLIPSIS);
    result
}

fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    match bytes {
        b if b >= MIB => format!("{:.1} MiB", b as f64 / MIB as f64),
        b if b >= KIB => format!("{:.1} KiB", b as f64 / KIB as f64),
        1 => "1 byte".to_string(),
        b => format!("{} bytes", b),
    }
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}
