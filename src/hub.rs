use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use glam::Vec3;

use crate::flavor::FlavorSet;
use crate::input::{InputSnapshot, InputSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: LogLevel,
    pub message: String,
}

/// Host-side effects a guest script may request through the `app::control`,
/// `app::render` and `app::audio` namespaces. Bindings only enqueue; the
/// lifecycle driver drains and applies these between entry-point calls.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Exit,
    EnableVsync(bool),
    EnableFullscreen(bool),
    CatchMouse(bool),
    SendToEnv(String),
    SetClearColor([f32; 4]),
    PlayAudio(String),
}

#[derive(Default)]
struct HubState {
    logs: Vec<LogLine>,
    commands: Vec<HostCommand>,
    state: BTreeMap<String, f64>,
    input: InputSnapshot,
    delta: f32,
    elapsed: f32,
    frame: u64,
    flavor: FlavorSet,
}

/// Shared channel between the binding surface and the lifecycle driver.
///
/// Everything a binding reads or writes lives here, so the Binding Registry
/// stays a pure declaration and sessions never hold references into the
/// driver. Single-threaded by design (the guest runtime is the non-sync
/// build), hence `Rc<RefCell<..>>`.
#[derive(Clone, Default)]
pub struct HostHub {
    inner: Rc<RefCell<HubState>>,
}

impl HostHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Error => eprintln!("[script] {}: {message}", level.tag()),
            _ => println!("[script] {}: {message}", level.tag()),
        }
        self.inner.borrow_mut().logs.push(LogLine { level, message });
    }

    pub fn take_logs(&self) -> Vec<LogLine> {
        std::mem::take(&mut self.inner.borrow_mut().logs)
    }

    pub fn push_command(&self, command: HostCommand) {
        self.inner.borrow_mut().commands.push(command);
    }

    pub fn take_commands(&self) -> Vec<HostCommand> {
        std::mem::take(&mut self.inner.borrow_mut().commands)
    }

    // Guest-persistent named numbers. This is the state surface that survives
    // across `tick` invocations within one session; the driver clears it when
    // a new session boots.
    pub fn state_set(&self, name: &str, value: f64) {
        self.inner.borrow_mut().state.insert(name.to_string(), value);
    }

    pub fn state_number(&self, name: &str) -> Option<f64> {
        self.inner.borrow().state.get(name).copied()
    }

    pub fn state_snapshot(&self) -> BTreeMap<String, f64> {
        self.inner.borrow().state.clone()
    }

    pub fn clear_state(&self) {
        self.inner.borrow_mut().state.clear();
    }

    pub fn set_clock(&self, delta: f32, elapsed: f32, frame: u64) {
        let mut state = self.inner.borrow_mut();
        state.delta = delta;
        state.elapsed = elapsed;
        state.frame = frame;
    }

    pub fn delta(&self) -> f32 {
        self.inner.borrow().delta
    }

    pub fn elapsed(&self) -> f32 {
        self.inner.borrow().elapsed
    }

    pub fn frame(&self) -> u64 {
        self.inner.borrow().frame
    }

    pub fn set_input(&self, snapshot: InputSnapshot) {
        self.inner.borrow_mut().input = snapshot;
    }

    pub fn input_value(&self, source: InputSource) -> f32 {
        self.inner.borrow().input.get(&source).map(|(v, _)| *v).unwrap_or(0.0)
    }

    pub fn input_delta(&self, source: InputSource) -> f32 {
        self.inner.borrow().input.get(&source).map(|(_, d)| *d).unwrap_or(0.0)
    }

    pub fn set_flavor(&self, flavor: FlavorSet) {
        self.inner.borrow_mut().flavor = flavor;
    }

    pub fn flavor_number(&self, name: &str) -> Option<f64> {
        self.inner.borrow().flavor.number(name)
    }

    pub fn flavor_vec3(&self, name: &str) -> Option<Vec3> {
        self.inner.borrow().flavor.vec3(name)
    }

    pub fn flavor_has(&self, name: &str) -> bool {
        self.inner.borrow().flavor.get(name).is_some()
    }
}
