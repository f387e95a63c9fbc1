use std::collections::HashMap;

/// Logical input sources queryable from guest scripts.
///
/// The surrounding host feeds these each frame; unknown source names answer
/// zero rather than erroring, so scripts stay forward-compatible with hosts
/// that expose fewer sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    KeyEscape,
    KeyLeft,
    KeyRight,
    KeyUp,
    KeyDown,
    KeyF5,
    WindowWidth,
    WindowHeight,
    MouseX,
    MouseY,
}

impl InputSource {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "KEY_ESCAPE" => Some(Self::KeyEscape),
            "KEY_LEFT" => Some(Self::KeyLeft),
            "KEY_RIGHT" => Some(Self::KeyRight),
            "KEY_UP" => Some(Self::KeyUp),
            "KEY_DOWN" => Some(Self::KeyDown),
            "KEY_F5" => Some(Self::KeyF5),
            "WINDOW_WIDTH" => Some(Self::WindowWidth),
            "WINDOW_HEIGHT" => Some(Self::WindowHeight),
            "MOUSE_X" => Some(Self::MouseX),
            "MOUSE_Y" => Some(Self::MouseY),
            _ => None,
        }
    }

}

/// Per-frame snapshot handed to the binding hub: current value plus change
/// since the previous frame for every source the host has touched.
pub type InputSnapshot = HashMap<InputSource, (f32, f32)>;

/// Host-side input state. Keys carry 0.0/1.0, window sizes carry pixels,
/// mouse axes carry coordinates. Deltas are computed against the previous
/// frame; `end_frame` rolls the frame boundary.
#[derive(Default)]
pub struct Input {
    current: HashMap<InputSource, f32>,
    previous: HashMap<InputSource, f32>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, source: InputSource, value: f32) {
        self.current.insert(source, value);
    }

    pub fn press(&mut self, source: InputSource) {
        self.set(source, 1.0);
    }

    pub fn release(&mut self, source: InputSource) {
        self.set(source, 0.0);
    }

    pub fn value(&self, source: InputSource) -> f32 {
        self.current.get(&source).copied().unwrap_or(0.0)
    }

    pub fn delta(&self, source: InputSource) -> f32 {
        self.value(source) - self.previous.get(&source).copied().unwrap_or(0.0)
    }

    pub fn end_frame(&mut self) {
        self.previous = self.current.clone();
    }

    pub fn snapshot(&self) -> InputSnapshot {
        let mut snap = InputSnapshot::new();
        for (&source, &value) in &self.current {
            snap.insert(source, (value, self.delta(source)));
        }
        for (&source, &value) in &self.previous {
            snap.entry(source).or_insert((0.0, -value));
        }
        snap
    }
}
