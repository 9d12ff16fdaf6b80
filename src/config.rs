//! Configuration for the joystick
//!
//! Loaded from YAML. Every field has a default, so an empty file (or no
//! file at all) yields the stock joystick: 200px fallback size, 50ms
//! reporting, black button and border on a transparent background.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use crate::controller::interval_from_millis;
use crate::layout::{check_ratio, LayoutPolicy, DEFAULT_SIZE, RATIO_SIZE_BORDER, RATIO_SIZE_BUTTON};
use crate::style::JoystickStyle;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JoystickConfig {
    /// Reporting interval while pressed
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// View side length when the host gives no size constraint
    #[serde(default = "default_size")]
    pub default_size: u32,

    #[serde(default = "default_button_ratio")]
    pub button_ratio: f64,

    #[serde(default = "default_border_ratio")]
    pub border_ratio: f64,

    #[serde(default)]
    pub style: JoystickStyle,
}

impl JoystickConfig {
    /// Load configuration from a YAML file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        debug!("Loaded joystick config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to null; treat it as all defaults
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content).context("Failed to parse YAML")?
        };

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        interval_from_millis(self.interval_ms)?;
        if self.default_size == 0 {
            anyhow::bail!("default_size must be > 0");
        }
        check_ratio("button", self.button_ratio)?;
        check_ratio("border", self.border_ratio)?;
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn layout_policy(&self) -> LayoutPolicy {
        LayoutPolicy {
            default_size: self.default_size,
            button_ratio: self.button_ratio,
            border_ratio: self.border_ratio,
        }
    }
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            default_size: default_size(),
            button_ratio: default_button_ratio(),
            border_ratio: default_border_ratio(),
            style: JoystickStyle::default(),
        }
    }
}

fn default_interval_ms() -> u64 {
    50
}

fn default_size() -> u32 {
    DEFAULT_SIZE
}

fn default_button_ratio() -> f64 {
    RATIO_SIZE_BUTTON
}

fn default_border_ratio() -> f64 {
    RATIO_SIZE_BORDER
}
