use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::audio::AudioManager;
use crate::config::AppConfig;
use crate::files::FileStore;
use crate::flavor::FlavorSet;
use crate::hub::{HostCommand, HostHub};
use crate::input::{Input, InputSource};
use crate::session::ScriptSession;
use crate::time::Time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Running,
    Disposed,
}

/// Host lifecycle driver.
///
/// Owns the only [`ScriptSession`] slot. The host is `Running` even when no
/// session is live ("degraded": a broken script stops the guest program, never
/// the host); `tick` is then a no-op until the operator reloads. All session
/// teardown funnels through [`App::teardown_session`], which invokes the guest
/// `shutdown` entry point strictly before the session value drops.
pub struct App {
    phase: Phase,
    config: AppConfig,
    files: FileStore,
    hub: HostHub,
    session: Option<ScriptSession>,
    input: Input,
    time: Time,
    audio: AudioManager,
    notices: Option<String>,
    exit_requested: bool,
    clear_color: [f32; 4],
    vsync: bool,
    fullscreen: bool,
    mouse_caught: bool,
    command_trace: Vec<String>,
}

impl App {
    pub fn new(config: AppConfig, asset_root: impl Into<PathBuf>) -> Self {
        let audio = AudioManager::new(config.audio_backlog);
        let vsync = config.window.vsync;
        Self {
            phase: Phase::Uninitialized,
            files: FileStore::new(asset_root),
            hub: HostHub::new(),
            session: None,
            input: Input::new(),
            time: Time::new(),
            audio,
            notices: None,
            exit_requested: false,
            clear_color: [0.275, 0.275, 0.275, 1.0],
            vsync,
            fullscreen: false,
            mouse_caught: false,
            command_trace: Vec::new(),
            config,
        }
    }

    /// `Uninitialized → Running`. A script that fails to load or faults in
    /// `init` leaves the host in degraded Running; only interpreter creation
    /// failure propagates as a fatal error.
    pub fn startup(&mut self, project: Option<PathBuf>) -> Result<()> {
        if self.phase != Phase::Uninitialized {
            bail!("startup on a {:?} host", self.phase);
        }
        self.files.set_project_root(project);
        if let Some(root) = self.files.project_root() {
            println!("[host] project root: {}", root.display());
        }
        match self.files.read_text(&self.config.notices_file) {
            Ok(text) => self.notices = Some(text),
            Err(err) => eprintln!("[host] notices unavailable: {err:#}"),
        }
        self.refresh_flavor();
        self.phase = Phase::Running;
        self.boot_session()
    }

    /// One host frame. No-op outside `Running` and without a live session;
    /// a guest fault in `tick` tears the session down and the host carries on.
    pub fn tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.time.tick();
        if self.input.delta(InputSource::KeyF5) > 0.0 {
            self.reload();
        }
        if self.input.delta(InputSource::KeyEscape) > 0.0 {
            self.exit_requested = true;
        }
        self.hub
            .set_clock(self.time.delta_seconds(), self.time.elapsed_seconds(), self.time.frame());
        self.hub.set_input(self.input.snapshot());
        if let Some(session) = self.session.as_mut() {
            if let Err(err) = session.invoke("tick") {
                eprintln!("[script] tick: {err}");
                self.teardown_session();
            }
        }
        self.apply_commands();
        self.input.end_frame();
    }

    /// Unconditional teardown-then-boot. Safe with no live session; safe to
    /// call every frame. The old program's `shutdown` always runs (or is
    /// attempted) before the new program's `init`.
    pub fn reload(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        println!("[host] reloading guest program");
        self.teardown_session();
        self.refresh_flavor();
        if let Err(err) = self.boot_session() {
            eprintln!("[host] fatal: {err:#}");
            self.exit_requested = true;
        }
    }

    /// `→ Disposed`. Valid from any phase, including a host that never
    /// started; terminal and idempotent.
    pub fn shutdown(&mut self) {
        if self.phase == Phase::Disposed {
            return;
        }
        self.teardown_session();
        self.notices = None;
        self.audio.clear();
        self.hub.clear_state();
        self.hub.set_flavor(FlavorSet::default());
        self.phase = Phase::Disposed;
    }

    fn boot_session(&mut self) -> Result<()> {
        debug_assert!(self.session.is_none(), "boot with a live session");
        self.hub.clear_state();
        let _ = self.hub.take_commands();
        let script = self.config.main_script.clone();
        let bytes = match self.files.read(&script) {
            Ok(bytes) => bytes,
            Err(err) => {
                eprintln!("[script] cannot read '{script}': {err:#}");
                return Ok(());
            }
        };
        let mut session = ScriptSession::create(&self.hub)
            .context("interpreter creation failed; the embedding is broken")?;
        if let Err(err) = session.load(&bytes) {
            // Session is unusable past this point; drop it and stay degraded.
            eprintln!("[script] {err}");
            return Ok(());
        }
        match session.invoke("init") {
            Ok(_) => {
                println!("[script] '{script}' running");
                self.session = Some(session);
            }
            Err(err) => {
                eprintln!("[script] init: {err}");
                unwind_guest(&mut session);
            }
        }
        Ok(())
    }

    fn teardown_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            // Guest shutdown runs while the runtime is still alive; the
            // session value (and the interpreter) drops only afterwards.
            unwind_guest(&mut session);
        }
    }

    /// Push an edited parameter set from the editing collaborator. Guests see
    /// it through the `app::flavor` bindings only; nothing auto-syncs.
    pub fn update_flavor(&mut self, flavor: FlavorSet) {
        self.hub.set_flavor(flavor);
    }

    fn refresh_flavor(&mut self) {
        let path = self.files.resolve(&self.config.flavor_file);
        if !path.exists() {
            return;
        }
        match FlavorSet::load(&path) {
            Ok(flavor) => self.hub.set_flavor(flavor),
            Err(err) => eprintln!("[host] flavor unavailable: {err:#}"),
        }
    }

    fn apply_commands(&mut self) {
        for command in self.hub.take_commands() {
            match command {
                HostCommand::Exit => {
                    self.exit_requested = true;
                    self.trace("exit");
                }
                HostCommand::EnableVsync(on) => {
                    self.vsync = on;
                    self.trace(format!("vsync:{on}"));
                }
                HostCommand::EnableFullscreen(on) => {
                    self.fullscreen = on;
                    self.trace(format!("fullscreen:{on}"));
                }
                HostCommand::CatchMouse(on) => {
                    self.mouse_caught = on;
                    self.trace(format!("catch_mouse:{on}"));
                }
                HostCommand::SendToEnv(command) => {
                    println!("[host] env: {command}");
                    self.trace(format!("env:{command}"));
                }
                HostCommand::SetClearColor(color) => {
                    self.clear_color = color;
                    self.trace(format!(
                        "clear_color:{:.2},{:.2},{:.2},{:.2}",
                        color[0], color[1], color[2], color[3]
                    ));
                }
                HostCommand::PlayAudio(trigger) => {
                    self.audio.play(&trigger);
                    self.trace(format!("audio:{trigger}"));
                }
            }
        }
    }

    fn trace(&mut self, entry: impl Into<String>) {
        self.command_trace.push(entry.into());
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn hub(&self) -> &HostHub {
        &self.hub
    }

    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    pub fn notices(&self) -> Option<&str> {
        self.notices.as_deref()
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn vsync(&self) -> bool {
        self.vsync
    }

    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn mouse_caught(&self) -> bool {
        self.mouse_caught
    }

    pub fn take_command_trace(&mut self) -> Vec<String> {
        std::mem::take(&mut self.command_trace)
    }
}

fn unwind_guest(session: &mut ScriptSession) {
    if let Err(err) = session.invoke("shutdown") {
        eprintln!("[script] shutdown: {err}");
    }
}

const FRAME: Duration = Duration::from_millis(16);

/// Headless driver loop for the binary: startup, tick until the guest asks to
/// exit or the frame limit runs out, shutdown.
pub fn run(
    config: AppConfig,
    asset_root: PathBuf,
    project: Option<PathBuf>,
    frames: Option<u64>,
) -> Result<()> {
    let mut app = App::new(config, asset_root);
    app.startup(project)?;
    let mut ran: u64 = 0;
    loop {
        app.tick();
        ran += 1;
        for trigger in app.audio_mut().drain() {
            println!("[audio] {trigger}");
        }
        if app.exit_requested() {
            break;
        }
        if let Some(limit) = frames {
            if ran >= limit {
                break;
            }
        }
        thread::sleep(FRAME);
    }
    app.shutdown();
    Ok(())
}
