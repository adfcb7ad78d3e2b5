//! Computed view rectangles.

use serde::{Deserialize, Serialize};
use weft_types::{EdgeSizes, Rect};

/// The four nested boxes of a laid-out view, in the coordinate space of
/// the layout root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewGeometry {
    pub margin_box: Rect,
    pub border_box: Rect,
    pub padding_box: Rect,
    pub content_box: Rect,
}

impl ViewGeometry {
    /// Build outward from a content box.
    pub fn from_content_box(
        content_box: Rect,
        padding: &EdgeSizes,
        border: &EdgeSizes,
        margin: &EdgeSizes,
    ) -> Self {
        let padding_box = content_box.outset(padding);
        let border_box = padding_box.outset(border);
        let margin_box = border_box.outset(margin);
        Self {
            margin_box,
            border_box,
            padding_box,
            content_box,
        }
    }

    /// Build around a border box. Inner boxes collapse to zero size when
    /// the border box is smaller than its border and padding.
    pub fn from_border_box(
        border_box: Rect,
        padding: &EdgeSizes,
        border: &EdgeSizes,
        margin: &EdgeSizes,
    ) -> Self {
        let padding_box = border_box.inset(border);
        let content_box = padding_box.inset(padding);
        Self {
            margin_box: border_box.outset(margin),
            border_box,
            padding_box,
            content_box,
        }
    }

    /// Shift every box by `(dx, dy)`.
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            margin_box: self.margin_box.translate(dx, dy),
            border_box: self.border_box.translate(dx, dy),
            padding_box: self.padding_box.translate(dx, dy),
            content_box: self.content_box.translate(dx, dy),
        }
    }
}
