//! A canvas that records draw calls for JSON output.

use serde::Serialize;
use weft_types::{Canvas, Color, Font, GradientStop, Rect};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Color,
    },
    FillRoundedRect {
        rect: Rect,
        radii: [f32; 4],
        color: Color,
    },
    FillGradient {
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
        font: Font,
        x: f32,
        baseline_y: f32,
        text: String,
        color: Color,
    },
}

#[derive(Debug, Default)]
pub struct DrawList {
    pub ops: Vec<DrawOp>,
}

impl Canvas for DrawList {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radii: [f32; 4], color: Color) {
        self.ops.push(DrawOp::FillRoundedRect { rect, radii, color });
    }

    fn fill_gradient(&mut self, rect: Rect, angle: f32, stops: &[GradientStop]) {
        self.ops.push(DrawOp::FillGradient {
            rect,
            angle,
            stops: stops.to_vec(),
        });
    }

    fn draw_shadow(&mut self, rect: Rect, color: Color, blur: f32, inset: bool) {
        self.ops.push(DrawOp::Shadow {
            rect,
            color,
            blur,
            inset,
        });
    }

    fn draw_image(&mut self, rect: Rect, source: &str) {
        self.ops.push(DrawOp::Image {
            rect,
            source: source.to_string(),
        });
    }

    fn draw_text(&mut self, font: &Font, x: f32, baseline_y: f32, text: &str, color: Color) {
        self.ops.push(DrawOp::Text {
            font: font.clone(),
            x,
            baseline_y,
            text: text.to_string(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops_serialize_with_tag() {
        let mut list = DrawList::default();
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        list.draw_text(&Font::default(), 2.0, 3.0, "hi", Color::BLACK);
        let json = serde_json::to_value(&list.ops).unwrap();
        assert_eq!(json[0]["op"], "fill_rect");
        assert_eq!(json[1]["op"], "text");
        assert_eq!(json[1]["text"], "hi");
        assert_eq!(json[1]["font"]["family"], "sans-serif");
    }
}
