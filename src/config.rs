use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "WindowConfig::default_title")]
    pub title: String,
    #[serde(default = "WindowConfig::default_width")]
    pub width: u32,
    #[serde(default = "WindowConfig::default_height")]
    pub height: u32,
    #[serde(default = "WindowConfig::default_vsync")]
    pub vsync: bool,
    #[serde(default)]
    pub fullscreen: bool,
}

impl WindowConfig {
    fn default_title() -> String {
        "Merlin Host".to_string()
    }
    const fn default_width() -> u32 {
        1280
    }
    const fn default_height() -> u32 {
        720
    }
    const fn default_vsync() -> bool {
        true
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: Self::default_title(),
            width: Self::default_width(),
            height: Self::default_height(),
            vsync: Self::default_vsync(),
            fullscreen: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    /// Logical name of the guest program's entry script, resolved through the
    /// file store (project root shadows asset root).
    #[serde(default = "AppConfig::default_main_script")]
    pub main_script: String,
    #[serde(default = "AppConfig::default_flavor_file")]
    pub flavor_file: String,
    #[serde(default = "AppConfig::default_notices_file")]
    pub notices_file: String,
    #[serde(default = "AppConfig::default_audio_backlog")]
    pub audio_backlog: usize,
}

impl AppConfig {
    fn default_main_script() -> String {
        "main.rhai".to_string()
    }
    fn default_flavor_file() -> String {
        "flavor.json".to_string()
    }
    fn default_notices_file() -> String {
        "NOTICES.txt".to_string()
    }
    const fn default_audio_backlog() -> usize {
        32
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config '{}'", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config '{}'", path.display()))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("[config] falling back to defaults: {err:#}");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &AppConfigOverrides) {
        if let Some(width) = overrides.width {
            self.window.width = width;
        }
        if let Some(height) = overrides.height {
            self.window.height = height;
        }
        if let Some(vsync) = overrides.vsync {
            self.window.vsync = vsync;
        }
        if let Some(script) = &overrides.main_script {
            self.main_script = script.clone();
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            main_script: Self::default_main_script(),
            flavor_file: Self::default_flavor_file(),
            notices_file: Self::default_notices_file(),
            audio_backlog: Self::default_audio_backlog(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfigOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub vsync: Option<bool>,
    pub main_script: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config: AppConfig = serde_json::from_str("{}").expect("parse empty config");
        assert_eq!(config.main_script, "main.rhai");
        assert_eq!(config.window.width, 1280);
        assert!(config.window.vsync);
    }

    #[test]
    fn overrides_take_precedence() {
        let mut config = AppConfig::default();
        config.apply_overrides(&AppConfigOverrides {
            width: Some(1920),
            vsync: Some(false),
            main_script: Some("demo.rhai".into()),
            ..Default::default()
        });
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.window.height, 720, "unset override leaves the default");
        assert!(!config.window.vsync);
        assert_eq!(config.main_script, "demo.rhai");
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "main_script": "game.rhai", "window": { "width": 640 } }"#)
                .expect("parse partial config");
        assert_eq!(config.main_script, "game.rhai");
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 720);
    }
}
