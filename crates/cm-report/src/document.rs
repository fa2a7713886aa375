//! Markdown executive report.

use std::path::{Path, PathBuf};

use cm_core::error::{CmError, Result};
use cm_data::analysis::HealthCheckResult;

use crate::table::MarkdownTable;

pub const DOCUMENT_NAME: &str = "Relatorio_Executivo.md";

/// Format used for the "Generated on" line.
pub const GENERATED_ON_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Current local time in [`GENERATED_ON_FORMAT`].
pub fn generated_on_now() -> String {
    chrono::Local::now().format(GENERATED_ON_FORMAT).to_string()
}

/// Render the executive report as Markdown.
pub fn render_document(result: &HealthCheckResult, generated_on: &str) -> String {
    let summary = &result.status.summary;
    let mut doc = String::new();

    doc.push_str("# Guardium Health Check Report\n\n");
    doc.push_str(&format!("Generated on: {}\n\n", generated_on));

    // ── 1. Agent status ───────────────────────────────────────────────────────
    doc.push_str("## 1. Agent Status (STAP)\n\n");
    doc.push_str(&format!("- Total agents detected: {}\n", summary.total));
    doc.push_str(&format!("- Active agents: {}\n", summary.active));
    doc.push_str(&format!("- **Inactive agents: {}**\n\n", summary.inactive));

    if summary.inactive > 0 {
        doc.push_str("### Detail of Inactive Agents\n\n");
        let mut table = MarkdownTable::new(&["Host", "Status", "Version (Revision)"]);
        for record in result.status.inactive() {
            table.push_row(vec![
                record.host.clone(),
                record.status.clone(),
                record.version.clone(),
            ]);
        }
        doc.push_str(&table.render());
        doc.push('\n');
    } else {
        doc.push_str("All reported agents are active.\n\n");
    }

    // ── 2. Aggregation failures ───────────────────────────────────────────────
    doc.push_str("## 2. Aggregation Process Failures\n\n");

    if result.failures.is_empty() {
        doc.push_str("No critical errors found in the provided aggregation logs.\n");
    } else {
        doc.push_str(
            "The following process failures were detected (Purge, Export, Archive, etc.):\n\n",
        );
        let mut table = MarkdownTable::new(&[
            "Collector / Appliance",
            "Failure (Process/Status)",
            "Occurrence Date",
        ]);
        for event in &result.failures {
            table.push_row(vec![
                event.collector.to_string(),
                event.failure_label(),
                event.date.clone(),
            ]);
        }
        doc.push_str(&table.render());
    }

    doc
}

/// Render and write the report into `out_dir`.
pub fn write_document(result: &HealthCheckResult, out_dir: &Path, generated_on: &str) -> Result<PathBuf> {
    let path = out_dir.join(DOCUMENT_NAME);
    std::fs::write(&path, render_document(result, generated_on)).map_err(|source| {
        CmError::FileWrite {
            path: path.clone(),
            source,
        }
    })?;
    Ok(path)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::sample_result;
    use cm_data::aggregator::StatusReport;
    use tempfile::TempDir;

    const STAMP: &str = "17/10/2026 09:30";

    #[test]
    fn test_document_sections_in_order() {
        let doc = render_document(&sample_result(), STAMP);

        let title = doc.find("# Guardium Health Check Report").unwrap();
        let stamp = doc.find("Generated on: 17/10/2026 09:30").unwrap();
        let agents = doc.find("## 1. Agent Status (STAP)").unwrap();
        let failures = doc.find("## 2. Aggregation Process Failures").unwrap();
        assert!(title < stamp && stamp < agents && agents < failures);
    }

    #[test]
    fn test_document_lists_inactive_agents_only() {
        let doc = render_document(&sample_result(), STAMP);

        assert!(doc.contains("- Total agents detected: 2"));
        assert!(doc.contains("- Active agents: 1"));
        assert!(doc.contains("**Inactive agents: 1**"));
        assert!(doc.contains("| Host | Status | Version (Revision) |"));
        assert!(doc.contains("| db02 | Down   | 11.3               |"));
        assert!(!doc.contains("db01"));
    }

    #[test]
    fn test_document_failure_rows_keep_order() {
        let doc = render_document(&sample_result(), STAMP);

        let first = doc.find("Archive (Error)").unwrap();
        let second = doc.find("Purge (Failed)").unwrap();
        assert!(first < second);
        assert!(doc.contains("Undef. Date"));
    }

    #[test]
    fn test_document_clean_run_notices() {
        let mut result = sample_result();
        result.status = StatusReport::default();
        result.failures.clear();

        let doc = render_document(&result, STAMP);
        assert!(doc.contains("- Total agents detected: 0"));
        assert!(doc.contains("All reported agents are active."));
        assert!(doc.contains("No critical errors found in the provided aggregation logs."));
        assert!(!doc.contains("| Host"));
    }

    #[test]
    fn test_document_layout_is_exact() {
        let doc = render_document(&sample_result(), STAMP);
        let expected_head = "# Guardium Health Check Report\n\n\
                             Generated on: 17/10/2026 09:30\n\n\
                             ## 1. Agent Status (STAP)\n\n\
                             - Total agents detected: 2\n\
                             - Active agents: 1\n\
                             - **Inactive agents: 1**\n\n\
                             ### Detail of Inactive Agents\n\n";
        assert!(doc.starts_with(expected_head), "{doc}");
        assert!(doc.contains("| db02 | Down   | 11.3               |\n\n## 2."));
        assert!(doc.contains("detected (Purge, Export, Archive, etc.):\n\n| Collector"));
        assert!(doc.ends_with("|\n") && !doc.ends_with("\n\n"));
    }

    #[test]
    fn test_write_document() {
        let dir = TempDir::new().unwrap();
        let path = write_document(&sample_result(), dir.path(), STAMP).unwrap();
        assert_eq!(path, dir.path().join(DOCUMENT_NAME));
        assert!(std::fs::read_to_string(path).unwrap().contains("Purge (Failed)"));
    }

    #[test]
    fn test_generated_on_format() {
        let stamp = generated_on_now();
        // dd/mm/YYYY HH:MM
        assert_eq!(stamp.len(), 16);
        assert_eq!(&stamp[2..3], "/");
        assert_eq!(&stamp[13..14], ":");
    }
}
