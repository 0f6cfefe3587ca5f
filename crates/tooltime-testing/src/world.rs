//! TestWorld pattern for declarative integration test setup.
//!
//! Every world owns a temp directory holding a fake home (transcripts are
//! discovered there) and a data directory (the event log and reports).

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tooltime_types::UnifiedEvent;

use crate::fixtures::to_jsonl;

/// Isolated test environment.
///
/// # Example
/// ```no_run
/// use tooltime_testing::TestWorld;
///
/// let world = TestWorld::new();
/// let result = world.run(&["sources"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    home: PathBuf,
    data_dir: PathBuf,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let home = temp_dir.path().join("home");
        let data_dir = home.join(".claude").join("tool-time");
        fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        Self {
            temp_dir,
            home,
            data_dir,
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join("events.jsonl")
    }

    /// Write (replace) the event log
    pub fn with_events(self, events: &[UnifiedEvent]) -> Self {
        fs::write(self.events_path(), to_jsonl(events)).expect("Failed to write events");
        self
    }

    /// Write `config.toml` into the data directory
    pub fn with_config(self, toml: &str) -> Self {
        fs::write(self.data_dir.join("config.toml"), toml).expect("Failed to write config");
        self
    }

    fn write_lines(path: &Path, lines: &[String]) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, lines.join("\n") + "\n")?;
        Ok(path.to_path_buf())
    }

    /// `~/.claude/projects/<slug>/<session>.jsonl`
    pub fn write_claude_session(&self, slug: &str, session: &str, lines: &[String]) -> Result<PathBuf> {
        let path = self
            .home
            .join(".claude/projects")
            .join(slug)
            .join(format!("{}.jsonl", session));
        Self::write_lines(&path, lines)
    }

    /// `~/.codex/sessions/2026/01/15/<name>.jsonl`
    pub fn write_codex_rollout(&self, name: &str, lines: &[String]) -> Result<PathBuf> {
        let path = self
            .home
            .join(".codex/sessions/2026/01/15")
            .join(format!("{}.jsonl", name));
        Self::write_lines(&path, lines)
    }

    /// `~/<dot_dir>/agents/<agent>/sessions/<session>.jsonl`
    pub fn write_openclaw_session(
        &self,
        dot_dir: &str,
        agent: &str,
        session: &str,
        lines: &[String],
    ) -> Result<PathBuf> {
        let path = self
            .home
            .join(dot_dir)
            .join("agents")
            .join(agent)
            .join("sessions")
            .join(format!("{}.jsonl", session));
        Self::write_lines(&path, lines)
    }

    /// Point a CLI command at this world: fake home, explicit data dir,
    /// no inherited overrides.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--data-dir")
            .arg(self.data_dir())
            .env("HOME", &self.home)
            .env_remove("TOOLTIME_DATA_DIR")
            .env_remove("RUST_LOG")
            .env("TZ", "UTC")
            .current_dir(self.temp_dir.path());
        cmd
    }

    /// Run the `tooltime` binary with `args`.
    ///
    /// Requires the binary to be built; `cargo test` does this for the CLI crate.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("tooltime")
            .map_err(|e| anyhow::anyhow!("Failed to find tooltime binary: {}", e))?;
        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;
        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Read a JSON artifact from the data directory
    pub fn read_json(&self, name: &str) -> Result<serde_json::Value> {
        let text = fs::read_to_string(self.data_dir.join(name))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Event log lines, parsed
    pub fn read_events(&self) -> Result<Vec<serde_json::Value>> {
        let text = fs::read_to_string(self.events_path())?;
        text.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| Ok(serde_json::from_str(l)?))
            .collect()
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }
}
