//! Foundation types and traits for weft.
//!
//! This crate contains the types shared by every weft crate: geometry,
//! colors, font descriptions, the font-metrics and canvas collaborator
//! traits, layout configuration, and error types.

pub mod backend;
pub mod color;
pub mod config;
pub mod error;
pub mod font;
pub mod geometry;

pub use backend::{Canvas, FontMetrics, TextMetrics};
pub use color::{Color, GradientStop};
pub use config::{FlexRounding, LayoutConfig, TextAlignment};
pub use error::{Result, StyleError, WeftError};
pub use font::Font;
pub use geometry::{EdgeSizes, Rect, Size};
