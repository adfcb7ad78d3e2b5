//! Floated objects in span flow.
//!
//! A floated object is pulled out of the line it appears in and anchored
//! to the left or right edge of the span box. Lines laid out afterwards
//! query the context for the horizontal band left free by every float
//! whose vertical extent overlaps them. A float stops narrowing lines once
//! the flow has moved below its bottom edge.

use serde::{Deserialize, Serialize};
use weft_types::Rect;

/// Edge a floated object is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatSide {
    Left,
    Right,
}

/// A placed float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatBox {
    pub side: FloatSide,
    /// Position relative to the span box.
    pub rect: Rect,
}

impl FloatBox {
    fn overlaps(&self, top: f32, bottom: f32) -> bool {
        self.rect.y < bottom && self.rect.bottom() > top
    }
}

/// Active floats of one span flow.
#[derive(Debug, Default, Clone)]
pub struct FloatContext {
    floats: Vec<FloatBox>,
}

impl FloatContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor a `width` x `height` float at or below `y`.
    ///
    /// The float moves down past earlier floats until the band beside them
    /// is wide enough. When no band is ever wide enough it is placed below
    /// every float it collides with.
    pub fn place(
        &mut self,
        side: FloatSide,
        width: f32,
        height: f32,
        y: f32,
        containing_width: f32,
    ) -> FloatBox {
        let mut top = y;
        // Each step moves below at least one float, so this is bounded.
        for _ in 0..=self.floats.len() {
            if let Some(rect) = self.slot(side, width, height, top, containing_width) {
                return self.push(side, rect);
            }
            match self.next_bottom(top, height) {
                Some(next) => top = next,
                None => break,
            }
        }
        let x = match side {
            FloatSide::Left => 0.0,
            FloatSide::Right => containing_width - width,
        };
        let top = self.bottom().max(y);
        self.push(side, Rect::new(x, top, width, height))
    }

    /// Where a `width` x `height` float would go if anchored exactly at `y`,
    /// or `None` when the band there is too narrow.
    pub fn slot(
        &self,
        side: FloatSide,
        width: f32,
        height: f32,
        y: f32,
        containing_width: f32,
    ) -> Option<Rect> {
        let (left, available) = self.available_width(y, height, containing_width);
        if available < width {
            return None;
        }
        let x = match side {
            FloatSide::Left => left,
            FloatSide::Right => left + available - width,
        };
        Some(Rect::new(x, y, width, height))
    }

    fn push(&mut self, side: FloatSide, rect: Rect) -> FloatBox {
        let float = FloatBox { side, rect };
        self.floats.push(float);
        float
    }

    /// Free horizontal band at `[y, y + height)` as `(left, width)`.
    pub fn available_width(&self, y: f32, height: f32, containing_width: f32) -> (f32, f32) {
        // A zero-height band still collides with floats covering `y`.
        let bottom = y + height.max(f32::EPSILON);
        let mut left = 0.0_f32;
        let mut right = containing_width;
        for f in self.floats.iter().filter(|f| f.overlaps(y, bottom)) {
            match f.side {
                FloatSide::Left => left = left.max(f.rect.right()),
                FloatSide::Right => right = right.min(f.rect.x),
            }
        }
        (left, (right - left).max(0.0))
    }

    /// Lowest float bottom edge, or 0 without floats.
    pub fn bottom(&self) -> f32 {
        self.floats
            .iter()
            .map(|f| f.rect.bottom())
            .fold(0.0_f32, f32::max)
    }

    pub fn floats(&self) -> &[FloatBox] {
        &self.floats
    }

    pub fn is_empty(&self) -> bool {
        self.floats.is_empty()
    }

    pub fn len(&self) -> usize {
        self.floats.len()
    }

    /// Smallest bottom edge among floats overlapping `[y, y + height)`
    /// that lies below `y`.
    fn next_bottom(&self, y: f32, height: f32) -> Option<f32> {
        let bottom = y + height.max(f32::EPSILON);
        self.floats
            .iter()
            .filter(|f| f.overlaps(y, bottom))
            .map(|f| f.rect.bottom())
            .filter(|&b| b > y)
            .reduce(f32::min)
    }
}
