//! Transcript parsers for tooltime.
//!
//! Each supported assistant keeps its own JSONL dialect. A `ProviderAdapter`
//! pairs a `LogDiscovery` (where transcripts live) with a `TranscriptParser`
//! (how to turn one into unified tool events).

// Error types
pub mod error;

// Trait-based architecture (public API)
pub mod traits;

// Shared record plumbing
mod args;
mod correlation;
mod stream;

// Provider implementations
pub mod claude;
pub mod codex;
pub mod openclaw;

// Provider registry
pub mod registry;

pub use args::SKILL_TOOL;
pub use error::{Error, Result};
pub use traits::{EventStream, LogDiscovery, ProviderAdapter, TranscriptParser};

pub use registry::{
    ProviderMetadata, default_log_roots, expand_home_path, get_provider_metadata,
};
