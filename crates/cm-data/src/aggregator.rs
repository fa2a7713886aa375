//! Agent status and aggregation-failure aggregation.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use cm_core::models::{AgentRecord, Collector, FailureEvent, StatusSummary};
use cm_core::policy::ClassificationPolicy;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::classifier::{classify_agent, classify_process, AgentColumns, ProcessColumns, ProcessOutcome};
use crate::table::Table;

// ── Status aggregation ────────────────────────────────────────────────────────

/// Every classified agent record plus the active/inactive partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusReport {
    pub records: Vec<AgentRecord>,
    pub summary: StatusSummary,
}

impl StatusReport {
    pub fn inactive(&self) -> impl Iterator<Item = &AgentRecord> {
        self.records.iter().filter(|r| !r.is_active)
    }
}

/// Classify every agent row of every status export.
///
/// Tables without a status column are skipped entirely.
pub fn aggregate_status(tables: &[Table], policy: &ClassificationPolicy) -> StatusReport {
    let mut records = Vec::new();

    for table in tables {
        let Some(columns) = AgentColumns::resolve(table, policy) else {
            debug!("Skipping {}: no status column", table.display_name());
            continue;
        };
        let before = records.len();
        records.extend(
            table
                .rows()
                .filter_map(|row| classify_agent(row, &columns, policy)),
        );
        debug!(
            "{}: {} agent records (status column {:?})",
            table.display_name(),
            records.len() - before,
            columns.status.name
        );
    }

    let summary = StatusSummary::from_records(&records);
    StatusReport { records, summary }
}

// ── Failure aggregation ───────────────────────────────────────────────────────

/// A comparator could not order two failure events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("cannot compare sort keys {left:?} and {right:?}")]
    IncomparableKeys { left: String, right: String },
}

/// Collect the failed process runs of every collector partition, ordered by
/// [`order_failures`].
pub fn aggregate_failures(
    partitions: &BTreeMap<Collector, Vec<Table>>,
    policy: &ClassificationPolicy,
) -> Vec<FailureEvent> {
    let mut events = Vec::new();

    for (collector, tables) in partitions {
        for table in tables {
            let Some(columns) = ProcessColumns::resolve(table, policy) else {
                debug!(
                    "Skipping {} for {}: no activity/status columns",
                    table.display_name(),
                    collector
                );
                continue;
            };
            for row in table.rows() {
                if let ProcessOutcome::Failed {
                    activity,
                    status,
                    date,
                } = classify_process(row, &columns, policy)
                {
                    events.push(FailureEvent {
                        collector: collector.clone(),
                        activity,
                        status,
                        date,
                    });
                }
            }
        }
    }

    order_failures(events)
}

/// Ascending comparison on `(collector, date)`, both as plain text.
///
/// Dates are compared lexicographically, not chronologically.
pub fn compare_failure_keys(a: &FailureEvent, b: &FailureEvent) -> Result<Ordering, SortError> {
    Ok(a
        .collector
        .cmp(&b.collector)
        .then_with(|| a.date.cmp(&b.date)))
}

/// Sort `events` descending by [`compare_failure_keys`]; on a comparison
/// failure the accumulation order is returned unchanged.
pub fn order_failures(events: Vec<FailureEvent>) -> Vec<FailureEvent> {
    let mut ordered = events;
    if let Err(e) = try_sort_descending(&mut ordered, compare_failure_keys) {
        warn!("Failure list left unsorted: {}", e);
    }
    ordered
}

/// Stable descending sort with a fallible comparator.
///
/// Events with equal keys keep their relative order. If any comparison
/// fails, `events` is left untouched and the first error is returned.
pub fn try_sort_descending<F>(events: &mut [FailureEvent], compare: F) -> Result<(), SortError>
where
    F: Fn(&FailureEvent, &FailureEvent) -> Result<Ordering, SortError>,
{
    let mut first_error: Option<SortError> = None;
    let mut sorted = events.to_vec();

    sorted.sort_by(|a, b| match compare(a, b) {
        Ok(ordering) => ordering.reverse(),
        Err(e) => {
            first_error.get_or_insert(e);
            Ordering::Equal
        }
    });

    match first_error {
        Some(e) => Err(e),
        None => {
            events.clone_from_slice(&sorted);
            Ok(())
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
