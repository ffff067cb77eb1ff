//! Writing change logs to disk.
//!
//! The file format follows the log file's extension:
//!
//! | extension | layout |
//! |-----------|--------|
//! | `.json` | pretty-printed array of entries, 4-space indent |
//! | `.csv` | `Timestamp, Changed Attribute, Change, State` table; change and state hold JSON |
//! | anything else | one entry per line, JSON with the outer braces removed |
//!
//! Every write renders the whole log and replaces the file, so the file
//! always mirrors the in-memory log.

use crate::core::LogEntry;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

mod encode;
pub mod error;

pub use encode::Encoder;
pub use error::{PersistError, PersistResult};

/// CSV header row.
pub const CSV_HEADER: [&str; 4] = ["Timestamp", "Changed Attribute", "Change", "State"];

/// Log file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Pretty-printed JSON array.
    Json,
    /// CSV table with JSON-encoded change and state columns.
    Csv,
    /// One brace-stripped JSON object per line.
    Text,
}

impl LogFormat {
    /// Infer the format from a path's extension, ignoring case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statesight::persist::LogFormat;
    ///
    /// assert_eq!(LogFormat::from_path("changes.JSON"), LogFormat::Json);
    /// assert_eq!(LogFormat::from_path("changes.csv"), LogFormat::Csv);
    /// assert_eq!(LogFormat::from_path("changes.log"), LogFormat::Text);
    /// assert_eq!(LogFormat::from_path("changes"), LogFormat::Text);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Text,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "text",
        }
    }
}

/// Render a log in the given format.
pub fn render<'a, I>(format: LogFormat, entries: I, encoder: &Encoder) -> PersistResult<Vec<u8>>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    match format {
        LogFormat::Json => render_json(entries, encoder),
        LogFormat::Csv => render_csv(entries, encoder),
        LogFormat::Text => render_text(entries, encoder),
    }
}

/// Render a log in the format implied by `path` and replace the file with it.
pub fn write_log<'a, I>(path: &Path, entries: I, encoder: &Encoder) -> PersistResult<LogFormat>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let format = LogFormat::from_path(path);
    let contents = render(format, entries, encoder)?;
    write_atomic(path, &contents)?;
    Ok(format)
}

/// Serialize with a 4-space indent.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> PersistResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}

fn render_json<'a, I>(entries: I, encoder: &Encoder) -> PersistResult<Vec<u8>>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let document: Vec<serde_json::Value> = entries
        .into_iter()
        .map(|entry| encoder.encode_entry(entry))
        .collect();
    to_pretty_json(&document)
}

fn render_csv<'a, I>(entries: I, encoder: &Encoder) -> PersistResult<Vec<u8>>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for entry in entries {
        let timestamp = entry.timestamp_iso();
        let change = serde_json::to_string(&encoder.encode_change(&entry.change))?;
        let state = serde_json::to_string(&encoder.encode_state(&entry.state))?;
        writer.write_record([
            timestamp.as_str(),
            entry.changed_attribute.as_str(),
            change.as_str(),
            state.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| PersistError::Io(err.into_error()))
}

fn render_text<'a, I>(entries: I, encoder: &Encoder) -> PersistResult<Vec<u8>>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut buffer = Vec::new();
    for entry in entries {
        let line = serde_json::to_string(&encoder.encode_entry(entry))?;
        let inner = line
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .unwrap_or(&line);
        buffer.extend_from_slice(inner.as_bytes());
        buffer.push(b'\n');
    }
    Ok(buffer)
}

/// Replace `path` with `contents` via a temporary file in the same directory.
///
/// If any step fails the previous file is left untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> PersistResult<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(contents)?;
    file.flush()?;
    file.persist(path).map_err(|err| PersistError::Replace {
        path: path.to_path_buf(),
        source: err.error,
    })?;
    Ok(())
}
