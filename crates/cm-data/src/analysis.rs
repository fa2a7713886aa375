//! Health-check analysis pipeline.
//!
//! Loads the status and per-collector aggregation exports, runs both
//! aggregators and returns a [`HealthCheckResult`] ready for the report
//! renderers.

use std::path::Path;

use chrono::Utc;
use cm_core::models::{Collector, FailureEvent};
use cm_core::policy::ClassificationPolicy;
use serde::Serialize;

use crate::aggregator::{aggregate_failures, aggregate_status, StatusReport};
use crate::discovery::discover_collectors;
use crate::reader::{load_partitions, load_tables};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Number of collectors the run aggregated over.
    pub collectors: usize,
    /// Status export files found.
    pub status_files: usize,
    /// Aggregation export files found across all collector folders.
    pub aggregation_files: usize,
    /// Files that were unreadable or contained no rows.
    pub empty_files: usize,
    /// Wall-clock seconds spent loading and classifying.
    pub elapsed_seconds: f64,
}

/// The complete output of [`analyze_health`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthCheckResult {
    /// Collectors in ascending order.
    pub collectors: Vec<Collector>,
    pub status: StatusReport,
    /// Failures ordered by descending `(collector, date)`.
    pub failures: Vec<FailureEvent>,
    pub metadata: AnalysisMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Read every inventory export in `inventory_dir` and discover the collectors.
pub fn discover(inventory_dir: &Path, policy: &ClassificationPolicy) -> Vec<Collector> {
    let tables = load_tables(inventory_dir);
    discover_collectors(&tables, policy)
}

/// Run both aggregations.
///
/// 1. Load the status exports from `status_dir` and classify the agents.
/// 2. Load `aggregation_dir/<collector>/` for every collector and collect
///    the failed process runs.
/// 3. Return a [`HealthCheckResult`].
pub fn analyze_health(
    status_dir: &Path,
    aggregation_dir: &Path,
    collectors: &[Collector],
    policy: &ClassificationPolicy,
) -> HealthCheckResult {
    let start = std::time::Instant::now();

    // ── Step 1: Agent status ──────────────────────────────────────────────────
    let status_tables = load_tables(status_dir);
    let status = aggregate_status(&status_tables, policy);

    // ── Step 2: Aggregation failures ──────────────────────────────────────────
    let partitions = load_partitions(aggregation_dir, collectors);
    let failures = aggregate_failures(&partitions, policy);

    // ── Step 3: Build result ──────────────────────────────────────────────────
    let aggregation_tables = partitions.values().flatten();
    let empty_files = status_tables
        .iter()
        .chain(aggregation_tables.clone())
        .filter(|t| t.is_empty())
        .count();

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        collectors: collectors.len(),
        status_files: status_tables.len(),
        aggregation_files: aggregation_tables.count(),
        empty_files,
        elapsed_seconds: start.elapsed().as_secs_f64(),
    };

    tracing::info!(
        agents = status.summary.total,
        inactive = status.summary.inactive,
        failures = failures.len(),
        "analysis complete"
    );

    HealthCheckResult {
        collectors: collectors.to_vec(),
        status,
        failures,
        metadata,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
