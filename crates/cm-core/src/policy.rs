//! Keyword vocabulary used to classify exported health-check records.
//!
//! Every engine component receives a [`ClassificationPolicy`] at call time
//! instead of reading process-wide constants, so alternate vocabularies can
//! be supplied from a JSON file (`--policy`) or substituted in tests.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CmError, Result};

// ── Defaults ──────────────────────────────────────────────────────────────────

const ACTIVE_KEYWORDS: &[&str] = &["active", "up", "running", "connected", "online"];
const INACTIVE_KEYWORDS: &[&str] = &[
    "inactive",
    "down",
    "stopped",
    "disconnected",
    "offline",
    "failed",
    "error",
];
const SUCCESS_KEYWORDS: &[&str] = &["success", "done", "completed", "ok"];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

// ── FieldAliases ──────────────────────────────────────────────────────────────

/// Ordered column-name substrings for every logical field the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldAliases {
    pub unit_name: Vec<String>,
    pub unit_type: Vec<String>,
    pub agent_status: Vec<String>,
    pub agent_host: Vec<String>,
    pub agent_version: Vec<String>,
    pub activity: Vec<String>,
    pub process_status: Vec<String>,
    pub process_date: Vec<String>,
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            unit_name: owned(&["unit name"]),
            unit_type: owned(&["unit type"]),
            agent_status: owned(&["status"]),
            agent_host: owned(&["software stap host", "stap host", "host"]),
            agent_version: owned(&["revision", "version", "s-tap revision", "stap revision"]),
            activity: owned(&["activity type", "activity", "process"]),
            process_status: owned(&["status", "execution status"]),
            process_date: owned(&["start time", "run time", "timestamp", "date"]),
        }
    }
}

impl FieldAliases {
    fn named_lists(&self) -> [(&'static str, &Vec<String>); 8] {
        [
            ("aliases.unit_name", &self.unit_name),
            ("aliases.unit_type", &self.unit_type),
            ("aliases.agent_status", &self.agent_status),
            ("aliases.agent_host", &self.agent_host),
            ("aliases.agent_version", &self.agent_version),
            ("aliases.activity", &self.activity),
            ("aliases.process_status", &self.process_status),
            ("aliases.process_date", &self.process_date),
        ]
    }
}

// ── Placeholders ──────────────────────────────────────────────────────────────

/// Text substituted for optional fields a file does not provide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub host: String,
    pub version: String,
    pub date: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            host: "N/A".to_string(),
            version: "Undef.".to_string(),
            date: "Undef. Date".to_string(),
        }
    }
}

// ── ClassificationPolicy ──────────────────────────────────────────────────────

/// Complete vocabulary for column discovery and status classification.
///
/// All keywords and aliases are lower-case substrings; the engine lower-cases
/// the text it inspects, never the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationPolicy {
    /// A status containing any of these marks an agent as active.
    pub active_keywords: Vec<String>,
    /// Carried for reporting vocabularies; classification does not consult it.
    pub inactive_keywords: Vec<String>,
    /// A process status containing any of these is not a failure.
    pub success_keywords: Vec<String>,
    /// Substring of the inventory unit type that identifies a collector.
    pub collector_marker: String,
    pub aliases: FieldAliases,
    pub placeholders: Placeholders,
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self {
            active_keywords: owned(ACTIVE_KEYWORDS),
            inactive_keywords: owned(INACTIVE_KEYWORDS),
            success_keywords: owned(SUCCESS_KEYWORDS),
            collector_marker: "collector".to_string(),
            aliases: FieldAliases::default(),
            placeholders: Placeholders::default(),
        }
    }
}

impl ClassificationPolicy {
    /// Load a policy from a JSON file. Fields absent from the file keep their
    /// default values. The result is validated before it is returned.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CmError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let policy: Self = serde_json::from_str(&content)?;
        policy.validate()?;
        tracing::debug!("Loaded classification policy from {}", path.display());
        Ok(policy)
    }

    /// Load from `path` when given, otherwise return the built-in vocabulary.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => Ok(Self::default()),
        }
    }

    /// Reject vocabularies the engine cannot match against.
    ///
    /// Every list used for matching must be non-empty, and every entry must be
    /// a non-empty lower-case string.
    pub fn validate(&self) -> Result<()> {
        let mut lists: Vec<(&str, &Vec<String>)> = vec![
            ("active_keywords", &self.active_keywords),
            ("success_keywords", &self.success_keywords),
        ];
        lists.extend(self.aliases.named_lists());

        for (name, words) in lists {
            if words.is_empty() {
                return Err(CmError::Policy(format!("{name} must not be empty")));
            }
            check_entries(name, words)?;
        }
        check_entries("inactive_keywords", &self.inactive_keywords)?;
        check_entries(
            "collector_marker",
            std::slice::from_ref(&self.collector_marker),
        )?;
        Ok(())
    }
}

fn check_entries(name: &str, words: &[String]) -> Result<()> {
    for word in words {
        if word.is_empty() {
            return Err(CmError::Policy(format!("{name} contains an empty entry")));
        }
        if word.to_lowercase() != *word {
            return Err(CmError::Policy(format!(
                "{name} entry {word:?} must be lower-case"
            )));
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_policy_is_valid() {
        ClassificationPolicy::default().validate().unwrap();
    }

    #[test]
    fn test_default_vocabulary() {
        let policy = ClassificationPolicy::default();
        assert!(policy.active_keywords.contains(&"connected".to_string()));
        assert!(policy.success_keywords.contains(&"ok".to_string()));
        assert_eq!(policy.aliases.agent_host[0], "software stap host");
        assert_eq!(policy.placeholders.date, "Undef. Date");
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("policy.json");
        std::fs::write(&path, r#"{"active_keywords": ["healthy"]}"#).unwrap();

        let policy = ClassificationPolicy::load_from(&path).unwrap();
        assert_eq!(policy.active_keywords, vec!["healthy".to_string()]);
        assert_eq!(policy.success_keywords, owned(SUCCESS_KEYWORDS));
        assert_eq!(policy.aliases, FieldAliases::default());
    }

    #[test]
    fn test_load_nested_partial_aliases() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("policy.json");
        std::fs::write(&path, r#"{"aliases": {"agent_host": ["server"]}}"#).unwrap();

        let policy = ClassificationPolicy::load_from(&path).unwrap();
        assert_eq!(policy.aliases.agent_host, vec!["server".to_string()]);
        assert_eq!(policy.aliases.unit_name, vec!["unit name".to_string()]);
    }

    #[test]
    fn test_load_missing_file_is_file_read_error() {
        let dir = TempDir::new().unwrap();
        let err = ClassificationPolicy::load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CmError::FileRead { .. }));
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("policy.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = ClassificationPolicy::load_from(&path).unwrap_err();
        assert!(matches!(err, CmError::JsonParse(_)));
    }

    #[test]
    fn test_validate_rejects_empty_list() {
        let policy = ClassificationPolicy {
            success_keywords: Vec::new(),
            ..Default::default()
        };
        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("success_keywords must not be empty"));
    }

    #[test]
    fn test_validate_rejects_upper_case_alias() {
        let mut policy = ClassificationPolicy::default();
        policy.aliases.activity = vec!["Activity".to_string()];
        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("aliases.activity"));
    }

    #[test]
    fn test_validate_rejects_empty_entry() {
        let policy = ClassificationPolicy {
            collector_marker: String::new(),
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_validate_allows_empty_inactive_keywords() {
        let policy = ClassificationPolicy {
            inactive_keywords: Vec::new(),
            ..Default::default()
        };
        policy.validate().unwrap();
    }

    #[test]
    fn test_load_or_default_without_path() {
        let policy = ClassificationPolicy::load_or_default(None).unwrap();
        assert_eq!(policy, ClassificationPolicy::default());
    }
}
