//! Spreadsheet and CSV discovery and loading.
//!
//! Exports arrive as `.xls`, `.xlsx` or `.csv` files whose layout varies by
//! product version. Reading is lenient: a file that cannot be parsed is
//! logged and turned into an empty [`Table`], so one broken export never
//! aborts the batch.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use cm_core::models::{CellValue, Collector};
use thiserror::Error;
use tracing::{debug, warn};

use crate::table::Table;

/// File extensions accepted as tabular input (compared case-insensitively).
pub const TABULAR_EXTENSIONS: &[&str] = &["xls", "xlsx", "csv"];

// ── Errors ────────────────────────────────────────────────────────────────────

/// Why a single export file could not be turned into a [`Table`].
#[derive(Error, Debug)]
pub enum TableReadError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("workbook {0} has no worksheet")]
    NoWorksheet(PathBuf),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),
}

// ── Format detection ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Workbook,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(TableFormat::Csv),
            "xls" | "xlsx" => Some(TableFormat::Workbook),
            _ => None,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// List the tabular files directly inside `dir`, sorted by path.
///
/// Symlinks are followed. Sub-directories and files with other extensions
/// are ignored. A missing directory yields an empty list.
pub fn list_tabular_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        debug!("Source folder does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file() && TableFormat::from_path(entry.path()).is_some()
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Read one export file, returning an empty table when it cannot be read.
pub fn read_table(path: &Path) -> Table {
    match try_read_table(path) {
        Ok(table) => table,
        Err(e) => {
            warn!("Error reading {}: {}", path.display(), e);
            Table::empty(path)
        }
    }
}

/// Read one export file, reporting why it could not be parsed.
pub fn try_read_table(path: &Path) -> Result<Table, TableReadError> {
    match TableFormat::from_path(path) {
        Some(TableFormat::Csv) => read_csv(path),
        Some(TableFormat::Workbook) => read_workbook(path),
        None => Err(TableReadError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Read every tabular file in `dir`, in path order. Unreadable files are
/// kept as empty tables so callers can report how many files were seen.
pub fn load_tables(dir: &Path) -> Vec<Table> {
    let tables: Vec<Table> = list_tabular_files(dir)
        .iter()
        .map(|path| read_table(path))
        .collect();

    debug!(
        "Loaded {} files from {} ({} empty or unreadable)",
        tables.len(),
        dir.display(),
        tables.iter().filter(|t| t.is_empty()).count()
    );

    tables
}

/// Load the per-collector subfolders of `base`.
///
/// Collectors without a subfolder, or whose identifier is not a plain folder
/// name, are left out of the map.
pub fn load_partitions(base: &Path, collectors: &[Collector]) -> BTreeMap<Collector, Vec<Table>> {
    let mut partitions = BTreeMap::new();
    for collector in collectors {
        let Some(name) = collector.folder_name() else {
            warn!("Skipping collector {:?}: not a valid folder name", collector.as_str());
            continue;
        };
        let folder = base.join(name);
        if !folder.is_dir() {
            debug!("No folder for collector {}", collector);
            continue;
        }
        partitions.insert(collector.clone(), load_tables(&folder));
    }
    partitions
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn read_csv(path: &Path) -> Result<Table, TableReadError> {
    let csv_err = |source: csv::Error| TableReadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| TableReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers().map_err(csv_err)?;
    let columns = normalize_headers(headers.iter().map(str::to_string));

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        rows.push(record.iter().map(CellValue::from_text).collect());
    }

    Ok(Table::new(path, columns, rows))
}

fn read_workbook(path: &Path) -> Result<Table, TableReadError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| TableReadError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableReadError::NoWorksheet(path.to_path_buf()))?
        .map_err(|e| TableReadError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut sheet_rows = range.rows();
    let Some(header) = sheet_rows.next() else {
        return Ok(Table::empty(path));
    };
    let columns = normalize_headers(header.iter().map(|c| cell_from_data(c).as_text().into_owned()));

    let rows = sheet_rows
        .filter(|row| !row.iter().all(|c| matches!(c, Data::Empty)))
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    Ok(Table::new(path, columns, rows))
}

/// Strip a byte-order mark and name blank headers `Unnamed: <index>`.
fn normalize_headers(headers: impl Iterator<Item = String>) -> Vec<String> {
    headers
        .enumerate()
        .map(|(i, h)| {
            let h = h.trim_start_matches('\u{feff}').to_string();
            if h.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                h
            }
        })
        .collect()
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from_text(s),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::DateTime(naive.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::DateTime(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
