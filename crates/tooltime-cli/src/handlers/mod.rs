pub mod analyze;
pub mod backfill;
pub mod sources;
pub mod stats;
