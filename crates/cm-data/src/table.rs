//! In-memory tabular dataset read from one export file.

use std::path::{Path, PathBuf};

use cm_core::models::CellValue;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Reference to the column a logical field resolved to in one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Position of the column in [`Table::columns`].
    pub index: usize,
    /// Literal column name as exported.
    pub name: String,
}

/// Ordered columns and rows of one spreadsheet or CSV file.
///
/// Every row has exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub source: PathBuf,
    pub columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table, padding or truncating each row to the column count.
    pub fn new(source: impl Into<PathBuf>, columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self {
            source: source.into(),
            columns,
            rows,
        }
    }

    /// A table that contributes nothing, used for unreadable files.
    pub fn empty(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            ..Default::default()
        }
    }

    /// Convenience constructor from string literals. Empty strings become
    /// [`CellValue::Empty`].
    pub fn from_text(source: &str, columns: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            source,
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| CellValue::from_text(v)).collect())
                .collect(),
        )
    }

    /// `true` when the table has no columns or no rows.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row { cells })
    }

    /// File name used in log messages.
    pub fn display_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &ColumnRef) -> &'a CellValue {
        self.cells.get(column.index).unwrap_or(&EMPTY_CELL)
    }

    /// Trimmed text of the cell in `column`.
    pub fn text(&self, column: &ColumnRef) -> String {
        self.get(column).trimmed()
    }
}
