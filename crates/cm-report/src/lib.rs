//! Report rendering for the CM health check.
//!
//! Turns a [`cm_data::analysis::HealthCheckResult`] into the spreadsheet
//! sheets (one CSV per sheet plus a combined JSON document) and the
//! Markdown executive report.

pub mod document;
pub mod sheets;
pub mod table;

use std::path::{Path, PathBuf};

use cm_core::error::Result;
use cm_data::analysis::HealthCheckResult;

/// Paths of every artefact written by [`render_all`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedReport {
    pub sheets: Vec<PathBuf>,
    pub json: PathBuf,
    pub document: PathBuf,
}

/// Write all report artefacts into `out_dir`, which must exist.
pub fn render_all(result: &HealthCheckResult, out_dir: &Path, generated_on: &str) -> Result<RenderedReport> {
    let sheets = sheets::write_sheets(result, out_dir)?;
    let json = sheets::write_json(result, out_dir)?;
    let document = document::write_document(result, out_dir, generated_on)?;
    Ok(RenderedReport {
        sheets,
        json,
        document,
    })
}
