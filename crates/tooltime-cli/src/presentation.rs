use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use tooltime_runtime::{BackfillReport, RootStatus, SourceStatus};

/// Colors only when stdout is a terminal and NO_COLOR is unset
#[derive(Debug, Clone, Copy)]
pub struct Style {
    color: bool,
}

impl Style {
    pub fn detect() -> Self {
        Self {
            color: std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    fn heading(&self, text: &str) -> String {
        if self.color { text.bold().to_string() } else { text.to_string() }
    }

    fn good(&self, text: &str) -> String {
        if self.color { text.green().to_string() } else { text.to_string() }
    }

    fn bad(&self, text: &str) -> String {
        if self.color { text.red().to_string() } else { text.to_string() }
    }

    fn dim(&self, text: &str) -> String {
        if self.color { text.dimmed().to_string() } else { text.to_string() }
    }
}

pub fn render_backfill(report: &BackfillReport, style: Style) -> String {
    let mut out = String::new();
    for (source, files) in &report.files {
        out.push_str(&format!("Found {} {} sessions\n", files, source));
    }

    out.push_str(&format!("\n{}\n", style.heading("Backfill complete:")));
    out.push_str(&format!("  {} new events written\n", report.new_events));
    out.push_str(&format!("  {} duplicates skipped\n", report.duplicates_skipped));
    if report.files_failed > 0 {
        let line = format!("{} sessions failed to parse", report.files_failed);
        out.push_str(&format!("  {}\n", style.bad(&line)));
    }

    if !report.by_source.is_empty() {
        out.push_str(&format!("\n{}\n", style.heading("By source:")));
        for (source, count) in &report.by_source {
            out.push_str(&format!("  {}: {}\n", source, count));
        }
    }
    if !report.top_tools.is_empty() {
        out.push_str(&format!("\n{}\n", style.heading("Top 10 tools:")));
        for (tool, count) in &report.top_tools {
            out.push_str(&format!("  {}: {}\n", tool, count));
        }
    }
    out
}

pub fn render_sources(statuses: &[SourceStatus], style: Style) -> String {
    let mut out = format!("{:<13} {:<8} ROOTS\n", "SOURCE", "ENABLED");
    for status in statuses {
        let enabled = if status.enabled { "yes" } else { "no" };
        let mut roots = status.roots.iter();
        let first = roots.next();

        out.push_str(&format!("{:<13} {:<8} ", status.source.as_str(), enabled));
        match first {
            Some(root) => out.push_str(&root_line(root, style)),
            None => out.push_str(&style.dim("(none)")),
        }
        out.push('\n');
        for root in roots {
            out.push_str(&format!("{:<22} {}\n", "", root_line(root, style)));
        }
    }
    out
}

fn root_line(root: &RootStatus, style: Style) -> String {
    let mark = if root.exists { style.good("found") } else { style.dim("missing") };
    format!("{} ({})", root.path.display(), mark)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backfill_summary_plain() {
        let mut report = BackfillReport::default();
        report.files.insert("claude-code".to_string(), 2);
        report.new_events = 5;
        report.duplicates_skipped = 1;
        report.by_source.insert("claude-code".to_string(), 5);
        report.top_tools.insert("Read".to_string(), 3);

        let text = render_backfill(&report, Style::plain());
        insta::assert_snapshot!(text, @r"
        Found 2 claude-code sessions

        Backfill complete:
          5 new events written
          1 duplicates skipped

        By source:
          claude-code: 5

        Top 10 tools:
          Read: 3
        ");
    }
}
