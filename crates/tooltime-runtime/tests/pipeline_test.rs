use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;
use tooltime_providers::ProviderAdapter;
use tooltime_runtime::ops::{ANALYSIS_FILE, run_analysis, write_json};
use tooltime_runtime::{AnalyzeRequest, BackfillService, Config, EventLog};
use tooltime_testing::fixtures::{claude, codex, openclaw};
use tooltime_testing::{TestWorld, ts};

fn seeded_world() -> Result<TestWorld> {
    let world = TestWorld::new();
    world.write_claude_session(
        "-root-projects-app",
        "c-1",
        &[
            claude::tool_use("c-1", "/root/projects/app", "2026-01-15T09:00:00Z", "t1", "Read", json!({"file_path": "/root/projects/app/a.rs"})),
            claude::tool_use("c-1", "/root/projects/app", "2026-01-15T09:01:00Z", "t2", "Edit", json!({"file_path": "/root/projects/app/a.rs"})),
            claude::tool_result("c-1", "t2", true, "old_string not found"),
            claude::tool_use("c-1", "/root/projects/app", "2026-01-15T09:02:00Z", "t3", "Edit", json!({"file_path": "/root/projects/app/a.rs"})),
        ],
    )?;
    world.write_codex_rollout(
        "rollout-2026-01-15T10-00-00-x1",
        &[
            codex::session_meta("/root/projects/cli"),
            codex::function_call("2026-01-15T10:00:00Z", "call_1", "shell", json!({"command": ["cargo", "test"]})),
            codex::function_output("2026-01-15T10:00:05Z", "call_1", "Exit code: 101\nfailures"),
        ],
    )?;
    world.write_openclaw_session(
        ".openclaw",
        "main",
        "oc-1",
        &[
            openclaw::session("oc-1", "/root/projects/bot"),
            openclaw::tool_call("2026-01-15T11:00:00Z", "tc1", "read", json!({"path": "/root/projects/bot/x.md"})),
            openclaw::tool_result("tc1", false, "ok"),
        ],
    )?;
    Ok(world)
}

fn providers(world: &TestWorld) -> Vec<(ProviderAdapter, Vec<PathBuf>)> {
    let home = world.home();
    vec![
        (ProviderAdapter::claude_code(), vec![home.join(".claude/projects")]),
        (ProviderAdapter::codex(), vec![home.join(".codex/sessions")]),
        (ProviderAdapter::openclaw(), vec![home.join(".openclaw/agents")]),
    ]
}

#[test]
fn test_backfill_then_analyze() -> Result<()> {
    let world = seeded_world()?;
    let log = EventLog::in_dir(world.data_dir());

    let report = BackfillService::new(&log, providers(&world)).run(|_| {})?;
    assert_eq!(report.new_events, 5);
    assert_eq!(report.files_failed, 0);
    assert_eq!(report.by_source["claude-code"], 3);
    assert_eq!(report.by_source["codex"], 1);
    assert_eq!(report.by_source["openclaw"], 1);

    let mut config = Config::default();
    config.analysis.timezone = Some("UTC".to_string());
    let analysis = run_analysis(&log, &config, &AnalyzeRequest::default(), ts(1, 0))?;

    assert_eq!(analysis.event_count, 5);
    assert_eq!(analysis.sessions.total, 3);
    assert_eq!(analysis.by_source["codex"].top_tools, vec!["Bash"]);
    assert_eq!(analysis.by_source["openclaw"].top_tools, vec!["Read"]);
    assert_eq!(analysis.by_source["codex"].error_rate, 1.0);

    let retries = &analysis.tool_chains.retry_patterns;
    assert_eq!(retries.len(), 1);
    assert_eq!((retries[0].tool.as_str(), retries[0].total_retries), ("Edit", 1));

    let keys: Vec<_> = analysis.projects.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["app", "cli", "bot"]);

    let path = write_json(world.data_dir(), ANALYSIS_FILE, &analysis)?;
    let written = world.read_json(ANALYSIS_FILE)?;
    assert!(path.ends_with(ANALYSIS_FILE));
    assert_eq!(written["event_count"], 5);
    Ok(())
}

#[test]
fn test_backfill_preserves_hook_events() -> Result<()> {
    let hook = tooltime_testing::ev("Bash").session("live", 1).build();
    let world = seeded_world()?.with_events(&[hook]);
    let log = EventLog::in_dir(world.data_dir());

    let report = BackfillService::new(&log, providers(&world)).run(|_| {})?;
    assert_eq!(report.new_events, 5);

    let lines = world.read_events()?;
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0]["event"], "PreToolUse");
    assert_eq!(lines[0]["id"], "live-1");
    Ok(())
}
