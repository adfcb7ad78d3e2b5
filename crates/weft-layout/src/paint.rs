//! Turning laid-out views into canvas draw calls.
//!
//! Per view, back to front: outer shadow, background fill, background
//! image, inset shadow, solid borders, then content. Children paint after
//! their parent.

use weft_style::{BackgroundFill, StyleModel};
use weft_types::{Canvas, EdgeSizes, FontMetrics, LayoutConfig, Rect};

use crate::geometry::ViewGeometry;
use crate::tree::{ViewContent, ViewId, ViewTree};

/// Paint the decorations of one box.
pub fn paint_box(style: &StyleModel, geometry: &ViewGeometry, canvas: &mut dyn Canvas) {
    let background = style.background();
    let border_box = geometry.border_box;

    let shadow = background.shadow.filter(|s| !s.color.is_transparent());
    if let Some(shadow) = shadow.filter(|s| !s.inset) {
        let rect = border_box
            .translate(shadow.offset_x, shadow.offset_y)
            .outset(&EdgeSizes::uniform(shadow.spread));
        canvas.draw_shadow(rect, shadow.color, shadow.blur, false);
    }

    let radii = style.border_radius();
    match background.fill() {
        BackgroundFill::None => {},
        BackgroundFill::Solid(color) if radii.iter().any(|&r| r > 0.0) => {
            canvas.fill_rounded_rect(border_box, radii, color);
        },
        BackgroundFill::Solid(color) => canvas.fill_rect(border_box, color),
        BackgroundFill::Gradient { angle, stops } => canvas.fill_gradient(border_box, angle, stops),
    }

    if let Some(image) = &background.image {
        canvas.draw_image(geometry.padding_box, image);
    }

    if let Some(shadow) = shadow.filter(|s| s.inset) {
        let rect = geometry.padding_box.translate(shadow.offset_x, shadow.offset_y);
        canvas.draw_shadow(rect, shadow.color, shadow.blur, true);
    }

    paint_borders(style, border_box, canvas);
}

fn paint_borders(style: &StyleModel, b: Rect, canvas: &mut dyn Canvas) {
    let sides = style.border_sides();
    let w = style.border();
    let inner_h = (b.height - w.top - w.bottom).max(0.0);
    let strips = [
        (&sides.top, Rect::new(b.x, b.y, b.width, w.top)),
        (&sides.bottom, Rect::new(b.x, b.bottom() - w.bottom, b.width, w.bottom)),
        (&sides.left, Rect::new(b.x, b.y + w.top, w.left, inner_h)),
        (&sides.right, Rect::new(b.right() - w.right, b.y + w.top, w.right, inner_h)),
    ];
    for (side, rect) in strips {
        if side.used_width() > 0.0 && !side.color.is_transparent() {
            canvas.fill_rect(rect, side.color);
        }
    }
}

/// Paint `root` and everything below it using the geometry from the last
/// layout pass.
pub fn paint_tree(
    tree: &ViewTree,
    root: ViewId,
    canvas: &mut dyn Canvas,
    metrics: &dyn FontMetrics,
    config: &LayoutConfig,
) {
    for id in tree.descendants(root) {
        let geometry = tree.geometry(id);
        paint_box(tree.style(id), &geometry, canvas);

        let content = geometry.content_box;
        match tree.content(id) {
            ViewContent::Label(label) => label.render(canvas, metrics, content, &config.ellipsis),
            ViewContent::Span(span) => match span.cached_lines() {
                Some(lines) => span.render(lines, canvas, content.x, content.y),
                None => log::debug!("span {id:?} painted before layout, skipping text"),
            },
            ViewContent::Plain | ViewContent::Intrinsic(_) => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::LayoutEngine;
    use crate::label::Label;
    use crate::test_utils::{DrawCall, MockCanvas, stub_metrics};
    use weft_types::{Color, Font, GradientStop};

    fn geometry(rect: Rect) -> ViewGeometry {
        ViewGeometry::from_border_box(rect, &EdgeSizes::ZERO, &EdgeSizes::ZERO, &EdgeSizes::ZERO)
    }

    #[test]
    fn flat_background_and_borders() {
        let mut style = StyleModel::new();
        style.set_background(Color::WHITE);
        style.set_border(Color::BLACK, 2.0);
        let g = ViewGeometry::from_border_box(
            Rect::new(0.0, 0.0, 20.0, 10.0),
            &EdgeSizes::ZERO,
            &style.border(),
            &EdgeSizes::ZERO,
        );
        let mut canvas = MockCanvas::new();
        paint_box(&style, &g, &mut canvas);
        assert_eq!(
            canvas.calls,
            vec![
                DrawCall::FillRect {
                    rect: Rect::new(0.0, 0.0, 20.0, 10.0),
                    color: Color::WHITE,
                },
                DrawCall::FillRect {
                    rect: Rect::new(0.0, 0.0, 20.0, 2.0),
                    color: Color::BLACK,
                },
                DrawCall::FillRect {
                    rect: Rect::new(0.0, 8.0, 20.0, 2.0),
                    color: Color::BLACK,
                },
                DrawCall::FillRect {
                    rect: Rect::new(0.0, 2.0, 2.0, 6.0),
                    color: Color::BLACK,
                },
                DrawCall::FillRect {
                    rect: Rect::new(18.0, 2.0, 2.0, 6.0),
                    color: Color::BLACK,
                },
            ]
        );
    }

    #[test]
    fn rounded_corners_use_rounded_fill() {
        let mut style = StyleModel::new();
        style.set_background(Color::WHITE);
        style.set_border_radius(4.0);
        let mut canvas = MockCanvas::new();
        paint_box(&style, &geometry(Rect::new(0.0, 0.0, 10.0, 10.0)), &mut canvas);
        assert!(matches!(
            canvas.calls[0],
            DrawCall::FillRoundedRect { radii, .. } if radii == [4.0; 4]
        ));
    }

    #[test]
    fn gradient_shadow_and_image_order() {
        let mut style = StyleModel::new();
        style.set_box_shadow(Color::BLACK, 2.0, 3.0, 4.0);
        style.set_background_gradient(
            90.0,
            vec![GradientStop::new(Color::WHITE, 0.0), GradientStop::new(Color::BLACK, 1.0)],
        );
        style.set_background_image("icon.png");
        let mut canvas = MockCanvas::new();
        paint_box(&style, &geometry(Rect::new(10.0, 10.0, 10.0, 10.0)), &mut canvas);
        assert_eq!(canvas.calls.len(), 3);
        assert_eq!(
            canvas.calls[0],
            DrawCall::Shadow {
                rect: Rect::new(12.0, 13.0, 10.0, 10.0),
                color: Color::BLACK,
                blur: 4.0,
                inset: false,
            }
        );
        assert!(matches!(canvas.calls[1], DrawCall::Gradient { angle, .. } if angle == 90.0));
        assert!(matches!(&canvas.calls[2], DrawCall::Image { source, .. } if source == "icon.png"));
    }

    #[test]
    fn unstyled_box_draws_nothing() {
        let mut canvas = MockCanvas::new();
        paint_box(&StyleModel::new(), &geometry(Rect::new(0.0, 0.0, 5.0, 5.0)), &mut canvas);
        assert!(canvas.calls.is_empty());
    }

    #[test]
    fn tree_paints_parents_before_children_and_content() {
        let metrics = stub_metrics();
        let config = LayoutConfig::default();
        let mut tree = ViewTree::new();
        let mut root_style = StyleModel::new();
        root_style.set_layout_vbox();
        root_style.set_background(Color::WHITE);
        let root = tree.add_view(root_style);
        let label = tree.add_view_with(
            StyleModel::new(),
            ViewContent::Label(Label::new("hi").with_font(Font::new("stub", 16.0))),
        );
        tree.add_child(root, label);
        let text = tree.add_view(StyleModel::new());
        tree.add_child(root, text);
        tree.add_span_text(text, "yo", Font::new("stub", 16.0), Color::BLACK);

        LayoutEngine::new(&metrics, &config).layout(&mut tree, root, 100.0, None);
        let mut canvas = MockCanvas::new();
        paint_tree(&tree, root, &mut canvas, &metrics, &config);
        assert_eq!(canvas.fill_count(), 1);
        assert_eq!(canvas.texts(), vec!["hi", "yo"]);
        let DrawCall::Text { baseline_y, .. } = &canvas.calls[2] else {
            panic!("expected span text");
        };
        assert_eq!(*baseline_y, 28.0);
    }
}
