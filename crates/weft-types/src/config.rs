//! Layout configuration.
//!
//! Loaded from a `[layout]`-style TOML table; every field has a default so
//! an empty document yields [`LayoutConfig::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WeftError};

/// Horizontal placement of a line within its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlignment {
    #[default]
    Left,
    Right,
    Center,
}

impl TextAlignment {
    /// Offset of a line of width `used` inside a box of width `available`.
    pub fn offset(self, available: f32, used: f32) -> f32 {
        match self {
            TextAlignment::Left => 0.0,
            TextAlignment::Right => available - used,
            TextAlignment::Center => ((available - used) * 0.5).round(),
        }
    }
}

/// How flex grow/shrink shares are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexRounding {
    /// Plain proportional f32 division; the last participating child takes
    /// the remainder so the shares sum to the delta.
    #[default]
    Exact,
    /// Whole-pixel shares allocated by the largest-remainder method.
    LargestRemainder,
}

/// Tunables for layout and text flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Marker inserted by truncating overflow modes.
    pub ellipsis: String,
    pub flex_rounding: FlexRounding,
    /// Alignment used by span layouts that do not set their own.
    pub default_alignment: TextAlignment,
    /// Whether `\n` in text runs forces a line break.
    pub hard_breaks: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            ellipsis: "\u{2026}".to_string(),
            flex_rounding: FlexRounding::Exact,
            default_alignment: TextAlignment::Left,
            hard_breaks: true,
        }
    }
}

impl LayoutConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: LayoutConfig = toml::from_str(text)?;
        config.validate()?;
        log::debug!("Parsed layout config: {config:?}");
        Ok(config)
    }

    /// Reject values that deserialize but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.ellipsis.is_empty() {
            return Err(WeftError::Config("`ellipsis` must not be empty".to_string()));
        }
        Ok(())
    }

    /// Load a config file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }
}
