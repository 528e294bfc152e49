use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    pub fn missing_info() -> Self {
        Self {
            message: "missing required config info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Meta>,
    #[serde(flatten)]
    pub properties: IndexMap<String, PropertyConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct Meta {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(rename = "breakPoints", default, skip_serializing_if = "IndexMap::is_empty")]
    pub break_points: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct PropertyConfig {
    // Flattened toggles serialize first so TOML emits scalar keys before
    // the [[custom]] array of tables.
    #[serde(flatten)]
    pub variants: IndexMap<String, VariantConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom: Vec<CustomEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum VariantConfig {
    Toggle(bool),
    Detailed(VariantDetail),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct VariantDetail {
    #[serde(rename = "breakPoints", default)]
    pub break_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CustomEntry {
    pub suffix: String,
    pub values: Vec<String>,
    #[serde(rename = "breakPoints", default, skip_serializing_if = "Vec::is_empty")]
    pub break_points: Vec<String>,
}

impl Config {
    // Required meta has to be complete before anything renders.
    pub fn validated_meta(&self) -> Result<&Meta, ConfigError> {
        let Some(meta) = self.config.as_ref() else {
            return Err(ConfigError::missing_info());
        };
        if meta.namespace.is_empty() || meta.start.is_empty() || meta.end.is_empty() {
            return Err(ConfigError::missing_info());
        }
        Ok(meta)
    }
}

pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|err| ConfigError {
        message: format!("failed to read config {}: {}", path.display(), err),
    })?;
    toml::from_str(&text).map_err(|err| ConfigError {
        message: format!("failed to parse config {}: {}", path.display(), err),
    })
}

#[cfg(test)]
pub fn test_meta() -> Meta {
    let mut break_points = IndexMap::new();
    break_points.insert("sm".to_string(), "767px".to_string());
    break_points.insert("md".to_string(), "992px".to_string());
    break_points.insert("lg".to_string(), "1200px".to_string());
    Meta {
        namespace: "#atomic".to_string(),
        start: "left".to_string(),
        end: "right".to_string(),
        break_points,
    }
}
