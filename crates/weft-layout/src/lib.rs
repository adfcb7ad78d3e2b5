//! View tree and layout engine for weft.
//!
//! Views live in a [`ViewTree`] arena, each with a [`weft_style::StyleModel`]
//! and optional content: a [`Label`], a [`SpanLayout`] of text runs and
//! embedded views, or a fixed intrinsic size. [`LayoutEngine`] computes the
//! margin, border, padding and content boxes of every view, and
//! [`paint_tree`] emits the resulting draw calls to a canvas.

pub mod engine;
pub mod flex;
pub mod float;
pub mod geometry;
pub mod label;
pub mod paint;
pub mod span;
pub mod text;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_utils;

// -----------------------------------------------------------------------
// Public re-exports
// -----------------------------------------------------------------------

pub use engine::LayoutEngine;
pub use flex::{FlexItem, distribute};
pub use float::{FloatBox, FloatContext, FloatSide};
pub use geometry::ViewGeometry;
pub use label::{Label, LineBreakMode, clip_text};
pub use paint::{paint_box, paint_tree};
pub use span::{
    LinePiece, PlacedFloat, SpanContent, SpanContext, SpanId, SpanLayout, SpanLine, SpanLines,
    SpanObject,
};
pub use text::{MonospaceMetrics, Segment, segments};
pub use tree::{ViewContent, ViewId, ViewNode, ViewTree};
