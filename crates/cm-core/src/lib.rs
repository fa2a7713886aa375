//! Shared types for the CM health check.
//!
//! Holds the record models produced by the classification engine, the
//! injected [`policy::ClassificationPolicy`] vocabulary, the run-level error
//! type and the command-line settings.

pub mod error;
pub mod models;
pub mod policy;
pub mod settings;
