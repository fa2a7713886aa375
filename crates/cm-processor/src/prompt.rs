//! Terminal checkpoints: print the instruction and wait for ENTER.

use std::io::Write;

use cm_core::error::Result;
use cm_runtime::orchestrator::{Checkpoint, Phase};
use cm_runtime::workspace::Workspace;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

/// Checkpoint that waits for a line on `R`.
///
/// End of input or Ctrl+C cancels the run.
pub struct LineCheckpoint<R> {
    lines: Lines<R>,
}

pub type StdinCheckpoint = LineCheckpoint<BufReader<Stdin>>;

impl StdinCheckpoint {
    pub fn stdin() -> Self {
        LineCheckpoint::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> LineCheckpoint<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: AsyncBufRead + Unpin> Checkpoint for LineCheckpoint<R> {
    async fn confirm(&mut self, phase: Phase, workspace: &Workspace) -> Result<bool> {
        println!();
        println!(">>> {}", phase.instruction());
        println!("    Working folder: {}", workspace.root().display());
        print!("    Press ENTER to continue (Ctrl+C to cancel)... ");
        std::io::stdout().flush()?;

        tokio::select! {
            biased;
            line = self.lines.next_line() => match line? {
                Some(_) => Ok(true),
                None => {
                    info!("Input closed at {:?}", phase);
                    Ok(false)
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received at {:?}", phase);
                Ok(false)
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
