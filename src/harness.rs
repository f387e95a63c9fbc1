use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::config::AppConfig;

/// Deterministic end-to-end fixture for the lifecycle driver: run a script
/// for a fixed number of frames against an asset directory and capture
/// everything the guest did. Used by golden-style tests and the
/// `script_harness` binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HarnessFixture {
    #[serde(default = "default_script")]
    pub script: String,
    #[serde(default = "default_steps")]
    pub steps: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HarnessOutput {
    pub script: String,
    pub steps: usize,
    /// Log lines emitted while the session booted (load + `init`).
    pub boot_logs: Vec<String>,
    pub results: Vec<StepResult>,
    pub final_state: BTreeMap<String, f64>,
    pub audio: Vec<String>,
    pub live_session: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepResult {
    pub step: usize,
    pub logs: Vec<String>,
    pub commands: Vec<String>,
}

pub fn load_fixture<P: AsRef<Path>>(path: P) -> Result<HarnessFixture> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("opening fixture '{}'", path.as_ref().display()))?;
    serde_json::from_reader(file).context("parsing fixture JSON")
}

pub fn run_fixture(fixture: &HarnessFixture, asset_root: &Path) -> Result<HarnessOutput> {
    let config = AppConfig { main_script: fixture.script.clone(), ..AppConfig::default() };
    let mut app = App::new(config, asset_root);
    app.startup(None).with_context(|| format!("starting host for '{}'", fixture.script))?;
    let boot_logs = drain_logs(&app);

    let mut results = Vec::with_capacity(fixture.steps);
    for step in 0..fixture.steps {
        app.tick();
        results.push(StepResult {
            step,
            logs: drain_logs(&app),
            commands: app.take_command_trace(),
        });
    }

    let final_state = app.hub().state_snapshot();
    let audio = app.audio_mut().drain();
    let live_session = app.has_session();
    app.shutdown();
    Ok(HarnessOutput {
        script: fixture.script.clone(),
        steps: fixture.steps,
        boot_logs,
        results,
        final_state,
        audio,
        live_session,
    })
}

fn drain_logs(app: &App) -> Vec<String> {
    app.hub()
        .take_logs()
        .into_iter()
        .map(|line| format!("{}: {}", line.level.tag(), line.message))
        .collect()
}

fn default_script() -> String {
    "main.rhai".to_string()
}

fn default_steps() -> usize {
    3
}
