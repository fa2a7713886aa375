//! Row-level classification against the policy vocabulary.
//!
//! Each file is first bound to its columns ([`AgentColumns`],
//! [`ProcessColumns`]); a file lacking a required column never yields a
//! binding and so never contributes rows. Optional columns are carried as
//! `Option<ColumnRef>` and every use site substitutes the policy placeholder
//! explicitly.

use cm_core::models::AgentRecord;
use cm_core::policy::ClassificationPolicy;

use crate::resolver::resolve_column;
use crate::table::{ColumnRef, Row, Table};

/// `true` when the lower-cased `text` contains any of `keywords`.
pub fn contains_any(text: &str, keywords: &[String]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

/// Active iff the status contains an active keyword. Inactive keywords are
/// not consulted: anything without an active match is inactive.
pub fn is_active_status(status: &str, policy: &ClassificationPolicy) -> bool {
    contains_any(status, &policy.active_keywords)
}

pub fn is_success_status(status: &str, policy: &ClassificationPolicy) -> bool {
    contains_any(status, &policy.success_keywords)
}

pub fn is_collector_unit(unit_type: &str, policy: &ClassificationPolicy) -> bool {
    unit_type.to_lowercase().contains(&policy.collector_marker)
}

// ── Agent status rows ─────────────────────────────────────────────────────────

/// Column binding for an agent status export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentColumns {
    pub status: ColumnRef,
    pub host: Option<ColumnRef>,
    pub version: Option<ColumnRef>,
}

impl AgentColumns {
    /// Bind `table`; `None` when it has no status-like column.
    pub fn resolve(table: &Table, policy: &ClassificationPolicy) -> Option<Self> {
        let status = resolve_column(table, &policy.aliases.agent_status)?;
        Some(Self {
            status,
            host: resolve_column(table, &policy.aliases.agent_host),
            version: resolve_column(table, &policy.aliases.agent_version),
        })
    }
}

/// Classify one agent row. Rows with blank status are dropped.
pub fn classify_agent(
    row: Row<'_>,
    columns: &AgentColumns,
    policy: &ClassificationPolicy,
) -> Option<AgentRecord> {
    let status = row.text(&columns.status);
    if status.is_empty() {
        return None;
    }

    let host = match &columns.host {
        Some(col) => row.text(col),
        None => policy.placeholders.host.clone(),
    };
    let version = match &columns.version {
        Some(col) => row.text(col),
        None => policy.placeholders.version.clone(),
    };

    Some(AgentRecord {
        is_active: is_active_status(&status, policy),
        host,
        status,
        version,
    })
}

// ── Aggregation process rows ──────────────────────────────────────────────────

/// Column binding for an aggregation process export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessColumns {
    pub activity: ColumnRef,
    pub status: ColumnRef,
    pub date: Option<ColumnRef>,
}

impl ProcessColumns {
    /// Bind `table`; `None` when activity or status is missing.
    pub fn resolve(table: &Table, policy: &ClassificationPolicy) -> Option<Self> {
        let activity = resolve_column(table, &policy.aliases.activity)?;
        let status = resolve_column(table, &policy.aliases.process_status)?;
        Some(Self {
            activity,
            status,
            date: resolve_column(table, &policy.aliases.process_date),
        })
    }
}

/// Outcome of one aggregation process row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Activity or status is blank; the row is ignored.
    Incomplete,
    Succeeded,
    Failed {
        activity: String,
        status: String,
        date: String,
    },
}

pub fn classify_process(
    row: Row<'_>,
    columns: &ProcessColumns,
    policy: &ClassificationPolicy,
) -> ProcessOutcome {
    let status = row.text(&columns.status);
    let activity = row.text(&columns.activity);
    if status.is_empty() || activity.is_empty() {
        return ProcessOutcome::Incomplete;
    }
    if is_success_status(&status, policy) {
        return ProcessOutcome::Succeeded;
    }

    let date = match &columns.date {
        Some(col) => row.text(col),
        None => policy.placeholders.date.clone(),
    };

    ProcessOutcome::Failed {
        activity,
        status,
        date,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
