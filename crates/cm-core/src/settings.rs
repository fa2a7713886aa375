//! Command-line settings and the remembered classification policy.
//!
//! A custom policy file is saved after every run and reused when the next
//! invocation omits `--policy`. The working folder is never remembered: it
//! always comes from the command line or defaults to `.`, because an
//! interactive run purges the inputs found there.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Guardium Central Management health check
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cm-processor",
    about = "Classify Central Management exports and build the health check report",
    version
)]
pub struct Settings {
    /// Directory in which the `CM` working folder is created
    #[arg(default_value = ".")]
    pub base_path: PathBuf,

    /// JSON file overriding the keyword and column-alias vocabulary
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Process the files already in place: no prompts, no input purge
    #[arg(long)]
    pub batch: bool,

    /// Log verbosity
    #[arg(
        long,
        default_value = "INFO",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"]
    )]
    pub log_level: String,

    /// Also append log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Shorthand for `--log-level DEBUG`
    #[arg(long)]
    pub debug: bool,

    /// Forget the remembered policy
    #[arg(long)]
    pub clear: bool,
}

// ── SavedRun ──────────────────────────────────────────────────────────────────

/// What the previous run used, stored as `~/.cm-processor/last_used.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedRun {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<PathBuf>,
}

impl SavedRun {
    /// Store location under the user's home directory.
    pub fn location() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::location_under(&home)
    }

    pub fn location_under(home: &Path) -> PathBuf {
        home.join(".cm-processor").join("last_used.json")
    }

    /// Read the store. A missing or unparsable file reads as "nothing saved".
    /// Keys written by older versions are ignored.
    pub fn read(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    /// Replace the store through a sibling temp file so a crash never
    /// leaves it half written.
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let body = serde_json::to_vec_pretty(self).map_err(std::io::Error::other)?;
        let staging = path.with_extension("json.tmp");
        std::fs::write(&staging, body)?;
        std::fs::rename(&staging, path)
    }

    pub fn forget(path: &Path) -> std::io::Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// Parsed settings plus any failure to update the store.
///
/// Settings are resolved before logging exists, so store problems are handed
/// back for the caller to log once the subscriber is installed.
#[derive(Debug)]
pub struct Resolved {
    pub settings: Settings,
    pub store_error: Option<std::io::Error>,
}

impl Settings {
    /// Settings for this process, backed by the store in the home directory.
    pub fn load_with_last_used() -> Resolved {
        Self::resolve(std::env::args_os().collect(), &SavedRun::location())
    }

    /// Parse `args` and fill an omitted `--policy` from the store at `store`.
    ///
    /// `--clear` empties the store and skips the merge; otherwise the
    /// effective policy is saved for the next run.
    pub fn resolve(args: Vec<OsString>, store: &Path) -> Resolved {
        let mut settings = Self::parse_from(args);

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        if settings.clear {
            let store_error = SavedRun::forget(store).err();
            return Resolved {
                settings,
                store_error,
            };
        }

        if settings.policy.is_none() {
            settings.policy = SavedRun::read(store).policy;
        }

        let current = SavedRun {
            policy: settings.policy.clone(),
        };
        let store_error = current.write(store).err();

        Resolved {
            settings,
            store_error,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
