use std::path::Path;

use merlin_host::harness::{load_fixture, run_fixture};

fn assets() -> &'static Path {
    Path::new("tests/fixtures/harness/assets")
}

#[test]
fn counter_fixture_reaches_five() {
    let fixture = load_fixture("tests/fixtures/harness/counter.json").expect("load fixture");
    let output = run_fixture(&fixture, assets()).expect("run fixture");
    assert_eq!(output.steps, 5);
    assert_eq!(output.results.len(), 5);
    assert_eq!(output.final_state.get("counter"), Some(&5.0));
    assert!(output.live_session, "counter script should survive all steps");
    assert!(
        output.boot_logs.contains(&"info: counter ready".to_string()),
        "init log should land in boot_logs, got {:?}",
        output.boot_logs
    );
}

#[test]
fn command_fixture_traces_host_commands() {
    let fixture = load_fixture("tests/fixtures/harness/commands.json").expect("load fixture");
    let output = run_fixture(&fixture, assets()).expect("run fixture");
    // Commands queued during boot apply on the first frame, together with
    // that frame's own commands.
    let first = &output.results[0].commands;
    assert!(
        first.iter().any(|c| c.starts_with("clear_color:")),
        "boot clear color should apply on frame 0, got {first:?}"
    );
    assert!(first.contains(&"audio:boot".to_string()));
    assert!(first.contains(&"audio:blip".to_string()));
    assert_eq!(output.results[1].commands, vec!["audio:blip"]);
    assert_eq!(output.audio, vec!["boot", "blip", "blip"]);
}

#[test]
fn fixture_runs_are_stable_across_runs() {
    let fixture = load_fixture("tests/fixtures/harness/counter.json").expect("load fixture");
    let first = run_fixture(&fixture, assets()).expect("first run");
    let second = run_fixture(&fixture, assets()).expect("second run");
    assert_eq!(first, second, "fixture output should be identical across runs");
}
