//! The `CM` working folder.
//!
//! ```text
//! <base>/CM/
//! ├── Central Management/          inventory exports
//! ├── STAP status/                 agent status exports
//! ├── Aggregation Processes/<collector>/
//! ├── Collection Quality/<collector>/
//! └── output/                      rendered reports
//! ```

use std::path::{Path, PathBuf};

use cm_core::error::{CmError, Result};
use cm_core::models::Collector;
use tracing::{debug, warn};

pub const CM_FOLDER: &str = "CM";
pub const FOLDER_INVENTORY: &str = "Central Management";
pub const FOLDER_STATUS: &str = "STAP status";
pub const FOLDER_AGGREGATION: &str = "Aggregation Processes";
pub const FOLDER_QUALITY: &str = "Collection Quality";
pub const FOLDER_OUTPUT: &str = "output";

const BASE_SUBFOLDERS: [&str; 4] = [
    FOLDER_INVENTORY,
    FOLDER_STATUS,
    FOLDER_AGGREGATION,
    FOLDER_QUALITY,
];

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Workspace rooted at `<base>/CM`.
    pub fn new(base: &Path) -> Self {
        Self {
            root: base.join(CM_FOLDER),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn inventory_dir(&self) -> PathBuf {
        self.root.join(FOLDER_INVENTORY)
    }

    pub fn status_dir(&self) -> PathBuf {
        self.root.join(FOLDER_STATUS)
    }

    pub fn aggregation_dir(&self) -> PathBuf {
        self.root.join(FOLDER_AGGREGATION)
    }

    pub fn quality_dir(&self) -> PathBuf {
        self.root.join(FOLDER_QUALITY)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(FOLDER_OUTPUT)
    }

    /// Create the root and the four input folders. Idempotent.
    pub fn ensure_structure(&self) -> Result<()> {
        create_dir(&self.root)?;
        for sub in BASE_SUBFOLDERS {
            create_dir(&self.root.join(sub))?;
        }
        Ok(())
    }

    /// Create the output folder and return its path.
    pub fn ensure_output_dir(&self) -> Result<PathBuf> {
        let out = self.output_dir();
        create_dir(&out)?;
        Ok(out)
    }

    /// One subfolder per collector under the aggregation and quality folders.
    ///
    /// Collectors whose identifier is not a plain folder name get no folder.
    pub fn create_collector_folders(&self, collectors: &[Collector]) -> Result<()> {
        for collector in collectors {
            let Some(name) = collector.folder_name() else {
                warn!("Collector {:?} is not a valid folder name; no folder created", collector.as_str());
                continue;
            };
            create_dir(&self.aggregation_dir().join(name))?;
            create_dir(&self.quality_dir().join(name))?;
        }
        Ok(())
    }

    /// Delete input files left by a previous run. Folders are kept; the
    /// per-collector folders are emptied but not removed.
    ///
    /// Returns the number of files removed.
    pub fn purge_stale_inputs(&self) -> usize {
        clean_folder_files(&self.inventory_dir(), false)
            + clean_folder_files(&self.status_dir(), false)
            + clean_folder_files(&self.aggregation_dir(), true)
            + clean_folder_files(&self.quality_dir(), true)
    }

    /// Delete every file in the output folder.
    pub fn purge_outputs(&self) -> usize {
        clean_folder_files(&self.output_dir(), false)
    }
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| CmError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Remove the files directly inside `folder`; with `one_level`, also the
/// files directly inside each immediate subfolder. Failures are logged and
/// skipped.
fn clean_folder_files(folder: &Path, one_level: bool) -> usize {
    if !folder.is_dir() {
        return 0;
    }

    let max_depth = if one_level { 2 } else { 1 };
    let mut removed = 0;
    let files: Vec<PathBuf> = walkdir::WalkDir::new(folder)
        .follow_links(true)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();

    for file in files {
        match std::fs::remove_file(&file) {
            Ok(()) => removed += 1,
            Err(e) => warn!("Could not remove {}: {}", file.display(), e),
        }
    }

    debug!("Removed {} files from {}", removed, folder.display());
    removed
}

// ── Tests ─────────────────────────────────────────────────────────────────────
