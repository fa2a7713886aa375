//! Runtime layer for the CM health check.
//!
//! Owns the `CM` working folder (scaffolding and purging) and drives the
//! run through its phases, pausing at checkpoints until the operator has
//! placed the next set of exports.

pub mod orchestrator;
pub mod workspace;

pub use cm_core as core;
pub use cm_data as data;
