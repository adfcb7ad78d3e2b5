//! Style value primitives: `auto`-able lengths and four-edge shorthands.

use serde::{Deserialize, Serialize};
use weft_types::{EdgeSizes, StyleError};

/// A value that is either `auto` or a concrete length.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleValue<T = f32> {
    #[default]
    Auto,
    Length(T),
}

impl<T: Copy + Default> StyleValue<T> {
    pub fn is_auto(&self) -> bool {
        matches!(self, StyleValue::Auto)
    }

    /// The concrete length, or `T::default()` (zero) when auto.
    pub fn resolve(&self) -> T {
        match self {
            StyleValue::Auto => T::default(),
            StyleValue::Length(v) => *v,
        }
    }

    /// The concrete length, or `fallback` when auto.
    pub fn resolve_or(&self, fallback: T) -> T {
        match self {
            StyleValue::Auto => fallback,
            StyleValue::Length(v) => *v,
        }
    }

    pub fn length(&self) -> Option<T> {
        match self {
            StyleValue::Auto => None,
            StyleValue::Length(v) => Some(*v),
        }
    }
}

impl From<f32> for StyleValue<f32> {
    fn from(v: f32) -> Self {
        StyleValue::Length(v)
    }
}

/// Per-edge values in left, top, right, bottom order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Edges<T> {
    pub left: T,
    pub top: T,
    pub right: T,
    pub bottom: T,
}

impl<T: Copy> Edges<T> {
    pub fn new(left: T, top: T, right: T, bottom: T) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same value on every edge.
    pub fn all(v: T) -> Self {
        Self::new(v, v, v, v)
    }

    /// `horizontal` on left/right, `vertical` on top/bottom.
    pub fn symmetric(horizontal: T, vertical: T) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
    }

    /// Expand a declaration shorthand using CSS ordering: one value for all
    /// edges, two for `vertical horizontal`, four for `top right bottom
    /// left`. Any other count is malformed.
    pub fn from_shorthand(property: &str, values: &[T]) -> Result<Self, StyleError> {
        match *values {
            [v] => Ok(Self::all(v)),
            [vertical, horizontal] => Ok(Self::symmetric(horizontal, vertical)),
            [top, right, bottom, left] => Ok(Self::new(left, top, right, bottom)),
            _ => Err(StyleError::InvalidEdgeCount {
                property: property.to_string(),
                count: values.len(),
            }),
        }
    }

    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Edges<U> {
        Edges::new(f(self.left), f(self.top), f(self.right), f(self.bottom))
    }
}

impl From<f32> for Edges<f32> {
    fn from(v: f32) -> Self {
        Edges::all(v)
    }
}

impl From<f32> for Edges<StyleValue> {
    fn from(v: f32) -> Self {
        Edges::all(StyleValue::Length(v))
    }
}

impl From<Edges<f32>> for Edges<StyleValue> {
    fn from(e: Edges<f32>) -> Self {
        e.map(StyleValue::Length)
    }
}

impl Edges<f32> {
    pub fn to_edge_sizes(&self) -> EdgeSizes {
        EdgeSizes::new(self.top, self.right, self.bottom, self.left)
    }
}

impl Edges<StyleValue> {
    /// Resolve every edge, treating `auto` as zero.
    pub fn resolved(&self) -> EdgeSizes {
        self.map(|v| v.resolve()).to_edge_sizes()
    }
}
