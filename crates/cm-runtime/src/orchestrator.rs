//! Phased health-check driver.
//!
//! A run moves through fixed phases: scaffold the working folder, wait for
//! the inventory export, discover collectors, create the per-collector
//! folders, wait for the remaining exports, then aggregate. The waits are
//! [`Checkpoint`]s supplied by the caller, so the driver itself has no notion
//! of a terminal.

use cm_core::error::{CmError, Result};
use cm_core::policy::ClassificationPolicy;
use cm_data::analysis::{analyze_health, discover, HealthCheckResult};
use tracing::info;

use crate::workspace::{Workspace, FOLDER_AGGREGATION, FOLDER_INVENTORY, FOLDER_STATUS};

// ── Public types ──────────────────────────────────────────────────────────────

/// A point where the run waits for the operator to place input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The inventory export must be in `Central Management`.
    InventoryReady,
    /// Status and per-collector aggregation exports must be in place.
    SourcesReady,
}

impl Phase {
    /// Operator instruction for this checkpoint.
    pub fn instruction(&self) -> String {
        match self {
            Phase::InventoryReady => format!(
                "Place the Central Management spreadsheet in the '{}' folder",
                FOLDER_INVENTORY
            ),
            Phase::SourcesReady => format!(
                "Place the files into '{}' and '{}/<collector>'",
                FOLDER_STATUS, FOLDER_AGGREGATION
            ),
        }
    }
}

/// Source of the "inputs ready" signal between phases.
#[allow(async_fn_in_trait)]
pub trait Checkpoint {
    /// Wait until the operator confirms `phase`. `Ok(false)` cancels the run.
    async fn confirm(&mut self, phase: Phase, workspace: &Workspace) -> Result<bool>;
}

/// Checkpoint that never waits, for batch runs over files already in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unattended;

impl Checkpoint for Unattended {
    async fn confirm(&mut self, _phase: Phase, _workspace: &Workspace) -> Result<bool> {
        Ok(true)
    }
}

/// How a run ended when it did not fail.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(Box<HealthCheckResult>),
    /// The operator declined to continue at `phase`.
    Cancelled { phase: Phase },
}

// ── HealthCheckOrchestrator ───────────────────────────────────────────────────

pub struct HealthCheckOrchestrator {
    workspace: Workspace,
    policy: ClassificationPolicy,
    /// Delete input files from a previous run before scaffolding.
    purge_inputs: bool,
}

impl HealthCheckOrchestrator {
    pub fn new(workspace: Workspace, policy: ClassificationPolicy) -> Self {
        Self {
            workspace,
            policy,
            purge_inputs: true,
        }
    }

    pub fn with_input_purge(mut self, purge_inputs: bool) -> Self {
        self.purge_inputs = purge_inputs;
        self
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Drive one full run.
    ///
    /// Returns [`CmError::NoCollectors`] when the inventory yields no
    /// collectors; nothing is aggregated in that case.
    pub async fn run<C: Checkpoint>(&self, checkpoint: &mut C) -> Result<RunOutcome> {
        let ws = &self.workspace;

        // ── Phase 1: scaffold ─────────────────────────────────────────────────
        if self.purge_inputs {
            let removed = ws.purge_stale_inputs();
            info!("Removed {} files from previous runs", removed);
        }
        ws.ensure_structure()?;
        info!("Directory structure verified at {}", ws.root().display());

        if !checkpoint.confirm(Phase::InventoryReady, ws).await? {
            return Ok(RunOutcome::Cancelled {
                phase: Phase::InventoryReady,
            });
        }

        // ── Phase 2: discovery ────────────────────────────────────────────────
        let collectors = discover(&ws.inventory_dir(), &self.policy);
        if collectors.is_empty() {
            return Err(CmError::NoCollectors(ws.inventory_dir()));
        }
        info!("{} collectors identified", collectors.len());
        ws.create_collector_folders(&collectors)?;

        if !checkpoint.confirm(Phase::SourcesReady, ws).await? {
            return Ok(RunOutcome::Cancelled {
                phase: Phase::SourcesReady,
            });
        }

        // ── Phase 3: aggregation ──────────────────────────────────────────────
        info!("Processing data...");
        let result = analyze_health(
            &ws.status_dir(),
            &ws.aggregation_dir(),
            &collectors,
            &self.policy,
        );

        Ok(RunOutcome::Completed(Box::new(result)))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
