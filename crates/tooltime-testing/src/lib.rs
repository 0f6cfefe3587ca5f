//! Testing infrastructure for tooltime tests.
//!
//! - `fixtures`: unified-event builders and transcript line builders per dialect
//! - `TestWorld`: isolated home + data directory for CLI integration tests

pub mod fixtures;
pub mod world;

pub use fixtures::{EventBuilder, ev, ts};
pub use world::{CliResult, TestWorld};
