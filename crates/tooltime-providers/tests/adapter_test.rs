use serde_json::json;
use tooltime_providers::ProviderAdapter;
use tooltime_testing::TestWorld;
use tooltime_testing::fixtures::{claude, codex, openclaw, ts_str};
use tooltime_types::Source;

#[test]
fn test_claude_session_via_adapter() -> anyhow::Result<()> {
    let world = TestWorld::new();
    let at = ts_str(0, 9);
    let path = world.write_claude_session(
        "-home-u-proj",
        "sess1",
        &[
            claude::tool_use("sess1", "/home/u/proj", &at, "t1", "Read", json!({"file_path": "/home/u/proj/a.rs"})),
            claude::tool_use("sess1", "/home/u/proj", &at, "t2", "Edit", json!({"file_path": "/home/u/proj/a.rs"})),
            claude::tool_result("sess1", "t1", false, "fn main() {}"),
            claude::tool_result("sess1", "t2", true, "String to replace not found"),
        ],
    )?;

    let adapter = ProviderAdapter::claude_code();
    let roots = vec![world.home().join(".claude/projects")];
    assert_eq!(adapter.discover(Some(roots.as_slice())), vec![path.clone()]);

    let events: Vec<_> = adapter.process_file(&path)?.collect();
    assert_eq!(events.len(), 2, "one event per call");
    assert_eq!(events[0].id, "sess1-1");
    assert_eq!(events[0].error, None);
    assert_eq!(events[1].id, "sess1-2");
    assert_eq!(events[1].error.as_deref(), Some("String to replace not found"));
    Ok(())
}

#[test]
fn test_each_file_parses_independently() -> anyhow::Result<()> {
    let world = TestWorld::new();
    let at = ts_str(0, 9);
    let path = world.write_codex_rollout(
        "rollout-2026-01-15T09-00-00-xyz",
        &[
            codex::session_meta("/home/u/proj"),
            codex::function_call(&at, "c1", "shell", json!({"command": ["false"]})),
            codex::function_output(&at, "c1", "Exit code: 1\nOutput:\n"),
        ],
    )?;

    let adapter = ProviderAdapter::codex();
    let first: Vec<_> = adapter.process_file(&path)?.collect();
    let second: Vec<_> = adapter.process_file(&path)?.collect();
    assert_eq!(first, second, "re-parsing yields identical events");
    assert_eq!(first[0].session_id(), "rollout-2026-01-15T09-00-00-xyz");
    assert!(first[0].error.is_some());
    Ok(())
}

#[test]
fn test_openclaw_legacy_roots() -> anyhow::Result<()> {
    let world = TestWorld::new();
    let at = ts_str(0, 9);
    let lines = [
        openclaw::session("oc1", "/home/u/bot"),
        openclaw::tool_call(&at, "x1", "exec", json!({"command": "ls"})),
        openclaw::tool_result("x1", false, "a b c"),
    ];
    world.write_openclaw_session(".openclaw", "main", "oc1", &lines)?;
    world.write_openclaw_session(".clawdbot", "main", "oc1", &lines)?;
    world.write_openclaw_session(".clawdbot", "main", "oc2", &lines)?;

    let adapter = ProviderAdapter::openclaw();
    let roots = vec![
        world.home().join(".openclaw/agents"),
        world.home().join(".clawdbot/agents"),
    ];
    let found = adapter.discover(Some(roots.as_slice()));
    assert_eq!(found.len(), 2, "oc1 mirrored under two roots counts once");
    Ok(())
}

#[test]
fn test_process_file_rejects_foreign_file() -> anyhow::Result<()> {
    let world = TestWorld::new();
    let path = world.write_claude_session("-p", "not-a-rollout", &[String::from("{}")])?;
    assert!(ProviderAdapter::codex().process_file(&path).is_err());
    Ok(())
}

#[test]
fn test_missing_file_is_error() {
    let adapter = ProviderAdapter::claude_code();
    let result = adapter.parser.parse_file(std::path::Path::new("/nonexistent/x.jsonl"));
    assert!(result.is_err());
}

#[test]
fn test_all_adapters_cover_every_source() {
    let sources: Vec<Source> = Source::ALL
        .into_iter()
        .filter_map(ProviderAdapter::for_source)
        .map(|a| a.source())
        .collect();
    assert_eq!(sources, vec![Source::ClaudeCode, Source::Codex, Source::OpenClaw]);
}
