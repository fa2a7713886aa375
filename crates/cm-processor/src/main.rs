mod bootstrap;
mod prompt;

use anyhow::Result;
use cm_core::policy::ClassificationPolicy;
use cm_core::settings::{SavedRun, Settings};
use cm_data::analysis::HealthCheckResult;
use cm_report::document::generated_on_now;
use cm_report::{render_all, RenderedReport};
use cm_runtime::orchestrator::{HealthCheckOrchestrator, RunOutcome, Unattended};
use cm_runtime::workspace::Workspace;

use crate::prompt::StdinCheckpoint;

#[tokio::main]
async fn main() -> Result<()> {
    let resolved = Settings::load_with_last_used();
    let settings = resolved.settings;

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("CM Processor v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(e) = resolved.store_error {
        tracing::warn!("Could not update {}: {}", SavedRun::location().display(), e);
    }

    let policy = ClassificationPolicy::load_or_default(settings.policy.as_deref())?;
    let workspace = Workspace::new(&settings.base_path);
    tracing::info!(
        "Working folder: {}, batch: {}",
        workspace.root().display(),
        settings.batch
    );

    let orchestrator = HealthCheckOrchestrator::new(workspace, policy).with_input_purge(!settings.batch);

    let outcome = if settings.batch {
        orchestrator.run(&mut Unattended).await?
    } else {
        orchestrator.run(&mut StdinCheckpoint::stdin()).await?
    };

    let result = match outcome {
        RunOutcome::Completed(result) => result,
        RunOutcome::Cancelled { phase } => {
            tracing::info!("Run cancelled at {:?}", phase);
            println!("\nOperation cancelled by user.");
            return Ok(());
        }
    };

    let report = render(orchestrator.workspace(), &result)?;
    for line in summary_lines(&result, &report) {
        println!("{}", line);
    }

    Ok(())
}

/// Clear `output/` and write every report artefact into it.
fn render(workspace: &Workspace, result: &HealthCheckResult) -> Result<RenderedReport> {
    let out_dir = workspace.ensure_output_dir()?;
    let removed = workspace.purge_outputs();
    tracing::debug!("Removed {} previous outputs", removed);

    tracing::info!("Generating reports...");
    Ok(render_all(result, &out_dir, &generated_on_now())?)
}

fn summary_lines(result: &HealthCheckResult, report: &RenderedReport) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        "Health check complete".to_string(),
        format!("  Collectors:          {}", result.collectors.len()),
        format!("  Inactive agents:     {}", result.status.summary.inactive),
        format!("  Aggregation errors:  {}", result.failures.len()),
    ];
    for sheet in &report.sheets {
        lines.push(format!("  Sheet:     {}", sheet.display()));
    }
    lines.push(format!("  JSON:      {}", report.json.display()));
    lines.push(format!("  Document:  {}", report.document.display()));
    lines
}

// ── Tests ──────────────────────────────────────────────────────────────────────
