use std::path::PathBuf;
use thiserror::Error;

/// All run-level errors produced by the CM health check.
#[derive(Error, Debug)]
pub enum CmError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report or config file could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The inventory folder yielded no collectors, so there is nothing to aggregate.
    #[error("No collectors found in {0}")]
    NoCollectors(PathBuf),

    /// A classification policy file is structurally valid JSON but unusable.
    #[error("Invalid classification policy: {0}")]
    Policy(String),

    /// A report artefact could not be rendered.
    #[error("Render error: {0}")]
    Render(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the CM crates.
pub type Result<T> = std::result::Result<T, CmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = CmError::FileRead {
            path: PathBuf::from("/cm/STAP status/agents.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("agents.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_no_collectors() {
        let err = CmError::NoCollectors(PathBuf::from("/cm/Central Management"));
        assert_eq!(err.to_string(), "No collectors found in /cm/Central Management");
    }

    #[test]
    fn test_error_display_policy() {
        let err = CmError::Policy("active_keywords must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid classification policy: active_keywords must not be empty"
        );
    }

    #[test]
    fn test_error_display_render() {
        let err = CmError::Render("sheet write failed".to_string());
        assert_eq!(err.to_string(), "Render error: sheet write failed");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CmError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: CmError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
