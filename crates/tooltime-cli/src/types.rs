use clap::ValueEnum;
use std::fmt;
use tooltime_types::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

/// A single transcript source
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceName {
    #[value(name = "claude-code")]
    ClaudeCode,
    #[value(name = "codex")]
    Codex,
    #[value(name = "openclaw")]
    OpenClaw,
}

impl From<SourceName> for Source {
    fn from(name: SourceName) -> Self {
        match name {
            SourceName::ClaudeCode => Source::ClaudeCode,
            SourceName::Codex => Source::Codex,
            SourceName::OpenClaw => Source::OpenClaw,
        }
    }
}

/// One source or every enabled one
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceFilter {
    #[value(name = "all")]
    All,
    #[value(name = "claude-code")]
    ClaudeCode,
    #[value(name = "codex")]
    Codex,
    #[value(name = "openclaw")]
    OpenClaw,
}

impl SourceFilter {
    pub fn source(self) -> Option<Source> {
        match self {
            SourceFilter::All => None,
            SourceFilter::ClaudeCode => Some(Source::ClaudeCode),
            SourceFilter::Codex => Some(Source::Codex),
            SourceFilter::OpenClaw => Some(Source::OpenClaw),
        }
    }
}
