//! Collaborator traits implemented outside the layout core.
//!
//! [`FontMetrics`] supplies text measurement for intrinsic sizing and line
//! breaking. [`Canvas`] receives the primitive draw calls produced when a
//! laid-out tree is painted. Both are provided by the embedding renderer.

use crate::color::{Color, GradientStop};
use crate::font::Font;
use crate::geometry::Rect;

/// Horizontal advance and vertical extent of a measured string.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    pub advance_width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl TextMetrics {
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// Font-metrics provider.
///
/// Implementations must be pure and deterministic: measuring the same
/// `(font, text)` pair always yields the same result.
pub trait FontMetrics {
    /// Measure `text` rendered with `font`.
    fn measure(&self, font: &Font, text: &str) -> TextMetrics;

    /// Ascent and descent of `font` independent of any particular text.
    fn line_metrics(&self, font: &Font) -> TextMetrics {
        let m = self.measure(font, "");
        TextMetrics {
            advance_width: 0.0,
            ..m
        }
    }

    /// Byte offset of the longest prefix of `text` whose advance fits in
    /// `max_width`. Always a char boundary.
    fn clip_from_left(&self, font: &Font, text: &str, max_width: f32) -> usize {
        if max_width < 0.0 {
            return 0;
        }
        let bounds = char_boundaries(text);
        // Largest index into `bounds` whose prefix fits.
        let (mut lo, mut hi) = (0usize, bounds.len() - 1);
        while lo < hi {
            let mid = (lo + hi).div_ceil(2);
            if self.measure(font, &text[..bounds[mid]]).advance_width <= max_width {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        bounds[lo]
    }

    /// Byte offset where the longest suffix of `text` fitting in
    /// `max_width` begins. Returns `text.len()` when nothing fits.
    fn clip_from_right(&self, font: &Font, text: &str, max_width: f32) -> usize {
        if max_width < 0.0 {
            return text.len();
        }
        let bounds = char_boundaries(text);
        // Smallest index into `bounds` whose suffix fits.
        let (mut lo, mut hi) = (0usize, bounds.len() - 1);
        while lo < hi {
            let mid = (lo + hi) / 2;
            if self.measure(font, &text[bounds[mid]..]).advance_width <= max_width {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        bounds[lo]
    }
}

/// All char boundaries of `text`, including `0` and `text.len()`.
pub fn char_boundaries(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

/// Drawing surface consumed by the painter.
///
/// Layout issues no draw calls itself; painting a laid-out tree walks the
/// geometry and forwards primitives here.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Fill with per-corner radii `[top_left, top_right, bottom_left,
    /// bottom_right]`. Backends without rounded corners fall back to a
    /// plain fill.
    fn fill_rounded_rect(&mut self, rect: Rect, _radii: [f32; 4], color: Color) {
        self.fill_rect(rect, color);
    }

    /// Linear gradient; `angle` is in degrees, 180 meaning top to bottom.
    fn fill_gradient(&mut self, rect: Rect, angle: f32, stops: &[GradientStop]);

    fn draw_shadow(&mut self, rect: Rect, color: Color, blur: f32, inset: bool);

    fn draw_image(&mut self, rect: Rect, source: &str);

    /// Draw `text` with its baseline at `baseline_y`.
    fn draw_text(&mut self, font: &Font, x: f32, baseline_y: f32, text: &str, color: Color);
}
