use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::{Component, Path};

/// A single loosely-typed cell read from a spreadsheet or CSV file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// Blank cell, or a CSV field that is empty or missing.
    Empty,
    /// Free text.
    Text(String),
    /// Whole number stored as such by the workbook.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean cell.
    Bool(bool),
    /// Spreadsheet date/time, already rendered as `YYYY-MM-DD HH:MM:SS`.
    DateTime(String),
    /// Spreadsheet error cell such as `#N/A`.
    Error(String),
}

impl CellValue {
    /// Build a cell from raw CSV text; an empty field becomes [`CellValue::Empty`].
    pub fn from_text(raw: &str) -> Self {
        if raw.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    /// Textual rendering of the cell, as used by every classification rule.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Empty => Cow::Borrowed(""),
            CellValue::Text(s) | CellValue::DateTime(s) | CellValue::Error(s) => {
                Cow::Borrowed(s.as_str())
            }
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
        }
    }

    /// Trimmed textual rendering.
    pub fn trimmed(&self) -> String {
        self.as_text().trim().to_string()
    }

    /// `true` when the cell renders to whitespace only.
    pub fn is_blank(&self) -> bool {
        self.as_text().trim().is_empty()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// Identifier of a logical monitoring unit taken from the inventory export.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collector(String);

impl Collector {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier as a single folder name, or `None` when joining it to
    /// a parent would escape that parent (separators, `..`, absolute paths).
    pub fn folder_name(&self) -> Option<&str> {
        let mut components = Path::new(&self.0).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if !self.0.contains('\\') => Some(&self.0),
            _ => None,
        }
    }
}

impl fmt::Display for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Collector {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// One agent (S-TAP) row classified as active or inactive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Host name, or the host placeholder when the file has no host column.
    pub host: String,
    /// Status text exactly as exported (trimmed).
    pub status: String,
    /// Agent revision, or the version placeholder when the file has no version column.
    pub version: String,
    /// Whether the status matched any active keyword.
    pub is_active: bool,
}

/// Count partition of classified agent records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub active: usize,
    pub inactive: usize,
    pub total: usize,
}

impl StatusSummary {
    /// Partition `records` by `is_active`. `total` is always `active + inactive`.
    pub fn from_records(records: &[AgentRecord]) -> Self {
        let active = records.iter().filter(|r| r.is_active).count();
        let inactive = records.len() - active;
        Self {
            active,
            inactive,
            total: active + inactive,
        }
    }
}

/// A failed (non-success) aggregation process run reported by a collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEvent {
    pub collector: Collector,
    /// Activity label such as `Purge`, `Archive` or `Export`.
    pub activity: String,
    /// Status text exactly as exported (trimmed).
    pub status: String,
    /// Occurrence timestamp as text, or the date placeholder.
    pub date: String,
}

impl FailureEvent {
    /// `"<activity> (<status>)"`, the label used in the failure table.
    pub fn failure_label(&self) -> String {
        format!("{} ({})", self.activity, self.status)
    }
}
