//! Error types for weft.

use std::io;

/// Malformed style input, reported at the setter/resolver boundary.
///
/// Layout itself never fails; these are only produced while translating
/// declarations or shorthand values into a style model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StyleError {
    #[error("`{property}` expects 1, 2 or 4 values, got {count}")]
    InvalidEdgeCount { property: String, count: usize },

    #[error("invalid value for `{property}`: {value}")]
    InvalidValue { property: String, value: String },

    #[error("`{property}` must not be negative (got {value})")]
    NegativeLength { property: String, value: f32 },

    #[error("unknown keyword `{keyword}` for `{property}`")]
    UnknownKeyword { property: String, keyword: String },
}

impl StyleError {
    pub fn invalid_value(property: &str, value: impl std::fmt::Display) -> Self {
        Self::InvalidValue {
            property: property.to_string(),
            value: value.to_string(),
        }
    }

    pub fn unknown_keyword(property: &str, keyword: &str) -> Self {
        Self::UnknownKeyword {
            property: property.to_string(),
            keyword: keyword.to_string(),
        }
    }
}

/// Errors produced by the weft crates.
#[derive(Debug, thiserror::Error)]
pub enum WeftError {
    #[error("style error: {0}")]
    Style(#[from] StyleError),

    #[error("config error: {0}")]
    Config(String),

    #[error("scene error: {0}")]
    Scene(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, WeftError>;
