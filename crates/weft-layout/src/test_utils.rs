//! Shared test utilities for the layout crate.
//!
//! Provides a [`MockCanvas`] that records every draw call, and a stub
//! metrics provider with exact, integer-valued measurements.

use weft_types::{Canvas, Color, Font, GradientStop, Rect};

use crate::text::MonospaceMetrics;

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum DrawCall {
    FillRect {
        rect: Rect,
        color: Color,
    },
    FillRoundedRect {
        rect: Rect,
        radii: [f32; 4],
        color: Color,
    },
    Gradient {
        rect: Rect,
        angle: f32,
        stops: Vec<GradientStop>,
    },
    Shadow {
        rect: Rect,
        color: Color,
        blur: f32,
        inset: bool,
    },
    Image {
        rect: Rect,
        source: String,
    },
    Text {
        x: f32,
        baseline_y: f32,
        text: String,
        color: Color,
    },
}

/// A canvas that records all draw calls for test assertions.
#[derive(Default)]
pub struct MockCanvas {
    pub calls: Vec<DrawCall>,
}

impl MockCanvas {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    /// Return only the text that was drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Count of plain and rounded rect fills.
    pub fn fill_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillRect { .. } | DrawCall::FillRoundedRect { .. }))
            .count()
    }
}

impl Canvas for MockCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::FillRect { rect, color });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radii: [f32; 4], color: Color) {
        self.calls.push(DrawCall::FillRoundedRect { rect, radii, color });
    }

    fn fill_gradient(&mut self, rect: Rect, angle: f32, stops: &[GradientStop]) {
        self.calls.push(DrawCall::Gradient {
            rect,
            angle,
            stops: stops.to_vec(),
        });
    }

    fn draw_shadow(&mut self, rect: Rect, color: Color, blur: f32, inset: bool) {
        self.calls.push(DrawCall::Shadow {
            rect,
            color,
            blur,
            inset,
        });
    }

    fn draw_image(&mut self, rect: Rect, source: &str) {
        self.calls.push(DrawCall::Image {
            rect,
            source: source.to_string(),
        });
    }

    fn draw_text(&mut self, _font: &Font, x: f32, baseline_y: f32, text: &str, color: Color) {
        self.calls.push(DrawCall::Text {
            x,
            baseline_y,
            text: text.to_string(),
            color,
        });
    }
}

/// At 16px: 8px per char, ascent 12, descent 4.
pub fn stub_metrics() -> MonospaceMetrics {
    MonospaceMetrics::new(0.5, 0.75, 0.25)
}
