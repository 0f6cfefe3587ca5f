use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tooltime_types::{Source, UnifiedEvent};
use walkdir::WalkDir;

/// Lazy, one-shot sequence of events parsed from a single transcript
pub type EventStream = Box<dyn Iterator<Item = UnifiedEvent> + Send>;

/// Transcript location
///
/// Responsibilities:
/// - Know where a source keeps its session transcripts
/// - Recognize transcript files of this source
pub trait LogDiscovery: Send + Sync {
    fn source(&self) -> Source;

    /// Well-known roots under the user's home directory
    fn default_roots(&self) -> Vec<PathBuf>;

    /// Check if a file is a transcript of this source
    fn probe(&self, path: &Path) -> bool;

    /// All transcripts under `roots`, sorted by path
    fn find_sessions(&self, roots: &[PathBuf]) -> Vec<PathBuf>;
}

/// Transcript normalization
///
/// Responsibilities:
/// - Read a transcript record by record, skipping corrupt lines
/// - Correlate call and result records by the source-native call id
/// - Yield one unified event per call, flushing unresolved calls at the end
pub trait TranscriptParser: Send + Sync {
    fn source(&self) -> Source;

    /// Open a transcript and return its events lazily.
    /// Re-reading the same file means calling this again.
    fn parse_file(&self, path: &Path) -> Result<EventStream>;
}

/// Adapter that bundles discovery and parsing for one source
pub struct ProviderAdapter {
    pub discovery: Box<dyn LogDiscovery>,
    pub parser: Box<dyn TranscriptParser>,
}

impl ProviderAdapter {
    pub fn new(discovery: Box<dyn LogDiscovery>, parser: Box<dyn TranscriptParser>) -> Self {
        Self { discovery, parser }
    }

    pub fn for_source(source: Source) -> Option<Self> {
        match source {
            Source::ClaudeCode => Some(Self::claude_code()),
            Source::Codex => Some(Self::codex()),
            Source::OpenClaw => Some(Self::openclaw()),
            Source::Unknown => None,
        }
    }

    pub fn claude_code() -> Self {
        Self::new(
            Box::new(crate::claude::ClaudeDiscovery),
            Box::new(crate::claude::ClaudeParser),
        )
    }

    pub fn codex() -> Self {
        Self::new(
            Box::new(crate::codex::CodexDiscovery),
            Box::new(crate::codex::CodexParser),
        )
    }

    pub fn openclaw() -> Self {
        Self::new(
            Box::new(crate::openclaw::OpenClawDiscovery),
            Box::new(crate::openclaw::OpenClawParser),
        )
    }

    pub fn source(&self) -> Source {
        self.parser.source()
    }

    /// Find transcripts, using the default roots unless overridden
    pub fn discover(&self, roots: Option<&[PathBuf]>) -> Vec<PathBuf> {
        match roots {
            Some(roots) => self.discovery.find_sessions(roots),
            None => self.discovery.find_sessions(&self.discovery.default_roots()),
        }
    }

    /// Parse a file through the adapter (convenience method)
    pub fn process_file(&self, path: &Path) -> Result<EventStream> {
        if !self.discovery.probe(path) {
            return Err(Error::Provider(format!(
                "Provider {} cannot handle file: {}",
                self.source(),
                path.display()
            )));
        }
        self.parser.parse_file(path)
    }
}

/// Collect `.jsonl` files under `root` (bounded depth) accepted by `accept`
pub(crate) fn walk_jsonl(
    root: &Path,
    max_depth: usize,
    accept: impl Fn(&Path) -> bool,
) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }

    WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "jsonl"))
        .filter(|p| accept(p))
        .collect()
}
