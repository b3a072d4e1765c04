//! TOML-based application configuration.
//!
//! Stores the score weights, the per-category flow plans (prompts, reminder
//! times, survey entry time), survey behavior flags, and report rendering
//! settings. Stored at `~/.config/ritmo/config.toml`; every field has a
//! serde default so a partial file always loads.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::flow::FlowPlan;
use crate::score::ScoreWeights;

/// Survey flow behavior flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Record a `"0"` event for negative answers instead of recording
    /// nothing. Off by default: absence of an event is the canonical "no".
    #[serde(default)]
    pub record_negative_answers: bool,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            record_negative_answers: false,
        }
    }
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_items")]
    pub daily_items: usize,
    #[serde(default = "default_items")]
    pub weekly_items: usize,
    #[serde(default = "default_items")]
    pub monthly_items: usize,
    /// Units suffix appended to scores and series, leading space included.
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Free-form lines appended to every completion report.
    #[serde(default)]
    pub footer_lines: Vec<String>,
    /// Content links rotated by day of year ("link of the day").
    #[serde(default)]
    pub links: Vec<String>,
}

fn default_items() -> usize {
    10
}
fn default_suffix() -> String {
    " pts".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            daily_items: default_items(),
            weekly_items: default_items(),
            monthly_items: default_items(),
            suffix: default_suffix(),
            footer_lines: Vec::new(),
            links: Vec::new(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/ritmo/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub survey: SurveyConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default = "FlowPlan::builtin")]
    pub plans: Vec<FlowPlan>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            survey: SurveyConfig::default(),
            report: ReportConfig::default(),
            plans: FlowPlan::builtin(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = match current {
                serde_json::Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                other => other.get(part)?,
            };
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(ConfigError::ParseFailed(format!(
                                "cannot parse '{value}' as number"
                            )));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value)
                            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = match current {
                serde_json::Value::Array(items) => {
                    let index = part
                        .parse::<usize>()
                        .map_err(|_| ConfigError::UnknownKey(key.to_string()))?;
                    items
                        .get_mut(index)
                        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?
                }
                other => other
                    .get_mut(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?,
            };
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Path of the config file inside the resolved data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/ritmo"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the defaults out on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning defaults on any error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist. Returns an error if the key
    /// is unknown or the value cannot be parsed into the existing type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        self.save()?;
        Ok(())
    }

    /// Plan for a category, falling back to the built-in when the config
    /// file does not carry one.
    pub fn plan_for(&self, category: crate::model::Category) -> FlowPlan {
        self.plans
            .iter()
            .find(|p| p.category == category)
            .cloned()
            .unwrap_or_else(|| match category {
                crate::model::Category::GroupA => FlowPlan::group_a(),
                crate::model::Category::GroupB => FlowPlan::group_b(),
            })
    }
}
