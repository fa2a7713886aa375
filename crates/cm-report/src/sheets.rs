//! Spreadsheet artefacts.
//!
//! Each sheet is written as its own CSV file in the output folder. A sheet
//! with no rows is not written at all. The whole result is also dumped as
//! `CM_report.json` for downstream tooling.

use std::path::{Path, PathBuf};

use cm_core::error::{CmError, Result};
use cm_data::analysis::HealthCheckResult;
use serde::Serialize;
use tracing::{debug, info};

pub const INVENTORY_SHEET: &str = "STAP_Inventory.csv";
pub const ERRORS_SHEET: &str = "Aggregation_Errors.csv";
pub const JSON_REPORT: &str = "CM_report.json";

/// Write the agent inventory and aggregation error sheets.
///
/// Returns the paths of the sheets actually written.
pub fn write_sheets(result: &HealthCheckResult, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if let Some(path) = write_sheet(&out_dir.join(INVENTORY_SHEET), &result.status.records)? {
        written.push(path);
    }
    if let Some(path) = write_sheet(&out_dir.join(ERRORS_SHEET), &result.failures)? {
        written.push(path);
    }

    info!("{} sheets written to {}", written.len(), out_dir.display());
    Ok(written)
}

/// Write the full result as pretty-printed JSON.
pub fn write_json(result: &HealthCheckResult, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(JSON_REPORT);
    let content = serde_json::to_string_pretty(result)?;
    std::fs::write(&path, content).map_err(|source| CmError::FileWrite {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn write_sheet<T: Serialize>(path: &Path, rows: &[T]) -> Result<Option<PathBuf>> {
    if rows.is_empty() {
        debug!("Skipping empty sheet {}", path.display());
        return Ok(None);
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| csv_error(path, e))?;
    }
    writer.flush().map_err(|source| CmError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(path.to_path_buf()))
}

fn csv_error(path: &Path, err: csv::Error) -> CmError {
    CmError::Render(format!("{}: {}", path.display(), err))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
