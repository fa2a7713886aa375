//! Classification-and-aggregation engine for the CM health check.
//!
//! Reads exported spreadsheets and CSV files into loosely-typed tables,
//! locates columns by alias keywords, classifies agent and process rows, and
//! aggregates them into the collector list, the agent status report and the
//! ordered failure list.

pub mod aggregator;
pub mod analysis;
pub mod classifier;
pub mod discovery;
pub mod reader;
pub mod resolver;
pub mod table;

pub use cm_core as core;
