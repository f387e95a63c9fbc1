use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A tunable parameter as shown to the external editing collaborator:
/// a tagged value plus optional display metadata. The bridge never syncs
/// these into a live session on its own; guests read them through the
/// explicit `app::flavor` bindings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlavorValue {
    Number {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
    },
    Vec3 {
        value: [f32; 3],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlavorSet {
    values: BTreeMap<String, FlavorValue>,
}

impl FlavorSet {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading flavor file '{}'", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing flavor file '{}'", path.display()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).context("serializing flavor set")?;
        fs::write(path, text).with_context(|| format!("writing flavor file '{}'", path.display()))
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FlavorValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FlavorValue> {
        self.values.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(FlavorValue::Number { value, .. }) => Some(*value),
            _ => None,
        }
    }

    pub fn vec3(&self, name: &str) -> Option<Vec3> {
        match self.values.get(name) {
            Some(FlavorValue::Vec3 { value, .. }) => Some(Vec3::from_array(*value)),
            _ => None,
        }
    }

}
