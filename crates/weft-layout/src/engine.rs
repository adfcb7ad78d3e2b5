//! Box layout over a [`ViewTree`].
//!
//! A pass walks the tree top-down. Each view is given a border box by its
//! parent, derives its padding and content boxes from its style, then
//! places its in-flow children according to its layout mode:
//!
//! - `none`: children sit at their `left`/`top` offsets in the content box.
//! - `block`: children stack vertically, filling the content width unless
//!   they have an explicit width.
//! - `vbox`/`hbox`: children share the main axis through flex grow and
//!   shrink, and stretch across the cross axis.
//! - `line`: children and text flow into lines through a span layout.
//!
//! Absolutely positioned children are taken out of flow and placed against
//! the padding box of the nearest positioned ancestor, or the layout root.
//! Fixed children are always placed against the layout root.
//!
//! Intrinsic sizes are asked for bottom-up: [`LayoutEngine::preferred_width`]
//! and [`LayoutEngine::preferred_height`] return content-box sizes, and
//! [`LayoutEngine::measure`] the shrink-to-fit margin box.

use std::collections::HashMap;

use weft_style::{LayoutMode, StyleModel};
use weft_types::{EdgeSizes, FontMetrics, LayoutConfig, Rect, Size};

use crate::flex::{FlexItem, distribute};
use crate::geometry::ViewGeometry;
use crate::span::{SpanContext, SpanLayout};
use crate::tree::{ViewContent, ViewId, ViewTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn main(self, size: Size) -> f32 {
        match self {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }

    fn cross(self, size: Size) -> f32 {
        match self {
            Axis::Horizontal => size.height,
            Axis::Vertical => size.width,
        }
    }

    fn main_edges(self, edges: &EdgeSizes) -> f32 {
        match self {
            Axis::Horizontal => edges.horizontal(),
            Axis::Vertical => edges.vertical(),
        }
    }

    fn cross_edges(self, edges: &EdgeSizes) -> f32 {
        match self {
            Axis::Horizontal => edges.vertical(),
            Axis::Vertical => edges.horizontal(),
        }
    }
}

/// Rects that positioned descendants are placed against.
#[derive(Debug, Clone, Copy)]
struct Containers {
    absolute: Rect,
    fixed: Rect,
}

/// The box-model values of one view needed while placing it.
#[derive(Debug, Clone, Copy)]
struct BoxEdges {
    margin: EdgeSizes,
    /// Border plus padding.
    chrome: EdgeSizes,
}

impl BoxEdges {
    fn of(style: &StyleModel) -> Self {
        Self {
            margin: style.margin(),
            chrome: style.border() + style.padding(),
        }
    }

    fn outer(&self) -> EdgeSizes {
        self.margin + self.chrome
    }
}

/// Lays out and measures views.
pub struct LayoutEngine<'a> {
    metrics: &'a dyn FontMetrics,
    config: &'a LayoutConfig,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(metrics: &'a dyn FontMetrics, config: &'a LayoutConfig) -> Self {
        Self { metrics, config }
    }

    /// Lay out the subtree at `root` inside a `width` x `height` viewport.
    /// Without a height the root takes its preferred height.
    pub fn layout(
        &self,
        tree: &mut ViewTree,
        root: ViewId,
        width: f32,
        height: Option<f32>,
    ) -> ViewGeometry {
        log::debug!("Layout pass at {root:?}: {width} x {height:?}");
        let style = tree.style(root);
        if !style.is_static() {
            log::warn!("Layout root {root:?} is positioned; treating it as static");
        }
        let edges = BoxEdges::of(style);
        let content_w = if style.is_width_auto() {
            (width - edges.outer().horizontal()).max(0.0)
        } else {
            style.width()
        };
        let outer_h = match height {
            Some(h) => h,
            None => self.outer_height(tree, root, content_w),
        };
        let height_auto = tree.style(root).is_height_auto();
        let content_h = if height_auto {
            (outer_h - edges.outer().vertical()).max(0.0)
        } else {
            tree.style(root).height()
        };

        let border_box = Rect::new(
            edges.margin.left,
            edges.margin.top,
            content_w + edges.chrome.horizontal(),
            content_h + edges.chrome.vertical(),
        );
        self.arrange_node(tree, root, border_box, edges.margin, None);
        tree.clear_dirty(root);
        let geometry = tree.geometry(root);
        log::debug!("Layout pass done: root border box {:?}", geometry.border_box);
        geometry
    }

    /// Lay out `id` into a margin box chosen by the caller.
    pub fn arrange(&self, tree: &mut ViewTree, id: ViewId, margin_box: Rect) {
        let margin = tree.style(id).margin();
        self.arrange_node(tree, id, margin_box.inset(&margin), margin, None);
    }

    // ---------------------------------------------------------------
    // Intrinsic sizes
    // ---------------------------------------------------------------

    /// Content-box width the view would like with unlimited room.
    pub fn preferred_width(&self, tree: &mut ViewTree, id: ViewId) -> f32 {
        let style = tree.style(id);
        if !style.is_width_auto() {
            return style.width();
        }
        let mode = style.layout();
        let is_span = match tree.content(id) {
            ViewContent::Label(label) => return label.preferred_width(self.metrics),
            ViewContent::Intrinsic(size) => return size.width,
            ViewContent::Span(_) => true,
            ViewContent::Plain => false,
        };
        if is_span || mode == LayoutMode::Line {
            return self.span_preferred_width(tree, id);
        }

        let children = flow_children(tree, id);
        match mode {
            LayoutMode::Block | LayoutMode::Vbox => children
                .into_iter()
                .map(|c| self.outer_width(tree, c))
                .fold(0.0, f32::max),
            LayoutMode::Hbox => children
                .into_iter()
                .map(|c| {
                    let outer = BoxEdges::of(tree.style(c)).outer().horizontal();
                    self.flex_basis(tree, c, Axis::Horizontal, None) + outer
                })
                .sum(),
            LayoutMode::None | LayoutMode::Line => 0.0,
        }
    }

    /// Content-box height at content width `width`.
    pub fn preferred_height(&self, tree: &mut ViewTree, id: ViewId, width: f32) -> f32 {
        let style = tree.style(id);
        if !style.is_height_auto() {
            return style.height();
        }
        let mode = style.layout();
        let is_span = match tree.content(id) {
            ViewContent::Label(label) => return label.preferred_height(self.metrics),
            ViewContent::Intrinsic(size) => return size.height,
            ViewContent::Span(_) => true,
            ViewContent::Plain => false,
        };
        if is_span || mode == LayoutMode::Line {
            return self.span_height(tree, id, width);
        }

        let children = flow_children(tree, id);
        match mode {
            LayoutMode::Block => children
                .into_iter()
                .map(|c| {
                    let child_w = block_width(tree.style(c), width);
                    self.outer_height(tree, c, child_w)
                })
                .sum(),
            LayoutMode::Vbox => children
                .into_iter()
                .map(|c| {
                    let outer = BoxEdges::of(tree.style(c)).outer().vertical();
                    self.flex_basis(tree, c, Axis::Vertical, Some(width)) + outer
                })
                .sum(),
            LayoutMode::Hbox => {
                let mains = self.flex_sizes(tree, &children, Axis::Horizontal, width, None);
                children
                    .into_iter()
                    .zip(mains)
                    .map(|(c, main)| self.outer_height(tree, c, main))
                    .fold(0.0, f32::max)
            },
            LayoutMode::None | LayoutMode::Line => 0.0,
        }
    }

    /// Margin-box size with at most `available_width` of room. Auto widths
    /// shrink to fit.
    pub fn measure(&self, tree: &mut ViewTree, id: ViewId, available_width: f32) -> Size {
        let style = tree.style(id);
        let outer = BoxEdges::of(style).outer();
        let content_w = if style.is_width_auto() {
            let room = (available_width - outer.horizontal()).max(0.0);
            self.preferred_width(tree, id).min(room)
        } else {
            style.width()
        };
        let content_h = self.preferred_height(tree, id, content_w);
        Size::new(content_w + outer.horizontal(), content_h + outer.vertical())
    }

    fn outer_width(&self, tree: &mut ViewTree, id: ViewId) -> f32 {
        let outer = BoxEdges::of(tree.style(id)).outer().horizontal();
        self.preferred_width(tree, id) + outer
    }

    fn outer_height(&self, tree: &mut ViewTree, id: ViewId, content_w: f32) -> f32 {
        let outer = BoxEdges::of(tree.style(id)).outer().vertical();
        self.preferred_height(tree, id, content_w) + outer
    }

    // ---------------------------------------------------------------
    // Flex
    // ---------------------------------------------------------------

    /// Main-axis content size a child starts from. `cross` is the content
    /// width available to a vertical child.
    fn flex_basis(&self, tree: &mut ViewTree, id: ViewId, axis: Axis, cross: Option<f32>) -> f32 {
        let style = tree.style(id);
        if !style.is_flex_basis_auto() {
            return style.flex_basis();
        }
        match axis {
            Axis::Horizontal => self.preferred_width(tree, id),
            Axis::Vertical => {
                let width = match cross {
                    Some(room) => block_width(style, room),
                    None => self.preferred_width(tree, id),
                };
                self.preferred_height(tree, id, width)
            },
        }
    }

    /// Flexed main content sizes of `children` in a box whose content main
    /// size is `main`.
    fn flex_sizes(
        &self,
        tree: &mut ViewTree,
        children: &[ViewId],
        axis: Axis,
        main: f32,
        cross: Option<f32>,
    ) -> Vec<f32> {
        let mut items = Vec::with_capacity(children.len());
        let mut edges = 0.0;
        for &child in children {
            let basis = self.flex_basis(tree, child, axis, cross);
            let style = tree.style(child);
            edges += axis.main_edges(&BoxEdges::of(style).outer());
            items.push(FlexItem::new(basis, style.flex_grow(), style.flex_shrink()));
        }
        distribute(&items, main - edges, self.config.flex_rounding)
    }

    // ---------------------------------------------------------------
    // Spans
    // ---------------------------------------------------------------

    /// Views flowed inline by `id`: its span's embedded views, or for
    /// plain content in line mode, its in-flow children.
    fn inline_views(&self, tree: &ViewTree, id: ViewId) -> Vec<ViewId> {
        match tree.content(id) {
            ViewContent::Span(span) => span.embedded_views(),
            _ => flow_children(tree, id),
        }
    }

    fn inline_sizes(&self, tree: &mut ViewTree, id: ViewId, width: f32) -> HashMap<ViewId, Size> {
        self.inline_views(tree, id)
            .into_iter()
            .map(|v| (v, self.measure(tree, v, width)))
            .collect()
    }

    /// Run `f` on the span that flows `id`. Plain content gets a temporary
    /// span of its children, each sitting on the baseline.
    fn with_span<R>(
        &self,
        tree: &mut ViewTree,
        id: ViewId,
        sizes: &HashMap<ViewId, Size>,
        f: impl FnOnce(&mut SpanLayout, &SpanContext) -> R,
    ) -> R {
        let ctx = SpanContext {
            metrics: self.metrics,
            config: self.config,
            sizes,
        };
        if let ViewContent::Span(span) = &mut tree.node_mut(id).content {
            return f(span, &ctx);
        }
        let mut span = SpanLayout::new();
        for child in flow_children(tree, id) {
            let height = sizes.get(&child).map_or(0.0, |s| s.height);
            span.add_subview(child, height);
        }
        f(&mut span, &ctx)
    }

    fn span_preferred_width(&self, tree: &mut ViewTree, id: ViewId) -> f32 {
        let sizes = self.inline_sizes(tree, id, f32::INFINITY);
        self.with_span(tree, id, &sizes, |span, ctx| span.preferred_width(ctx))
    }

    fn span_height(&self, tree: &mut ViewTree, id: ViewId, width: f32) -> f32 {
        let sizes = self.inline_sizes(tree, id, width);
        self.with_span(tree, id, &sizes, |span, ctx| span.preferred_height(width, ctx))
    }

    // ---------------------------------------------------------------
    // Arrangement
    // ---------------------------------------------------------------

    fn arrange_node(
        &self,
        tree: &mut ViewTree,
        id: ViewId,
        border_box: Rect,
        margin: EdgeSizes,
        containers: Option<Containers>,
    ) {
        let style = tree.style(id);
        let geometry =
            ViewGeometry::from_border_box(border_box, &style.padding(), &style.border(), &margin);
        let containers = match containers {
            None => Containers {
                absolute: geometry.padding_box,
                fixed: geometry.padding_box,
            },
            Some(c) if !style.is_static() => Containers {
                absolute: geometry.padding_box,
                ..c
            },
            Some(c) => c,
        };
        let mode = style.layout();
        let content = geometry.content_box;
        tree.set_geometry(id, geometry);
        log::trace!("arranged {id:?} at {border_box:?}");

        let is_span = matches!(tree.content(id), ViewContent::Span(_));
        match mode {
            _ if is_span => self.arrange_inline(tree, id, content, containers),
            LayoutMode::Line => self.arrange_inline(tree, id, content, containers),
            LayoutMode::Block => self.arrange_block(tree, id, content, containers),
            LayoutMode::Vbox => self.arrange_flex(tree, id, content, Axis::Vertical, containers),
            LayoutMode::Hbox => self.arrange_flex(tree, id, content, Axis::Horizontal, containers),
            LayoutMode::None => {
                for child in flow_children(tree, id) {
                    self.arrange_offset(tree, child, content, containers);
                }
            },
        }

        for child in positioned_children(tree, id) {
            self.arrange_positioned(tree, child, containers);
        }
    }

    fn place(&self, tree: &mut ViewTree, id: ViewId, margin_box: Rect, containers: Containers) {
        let margin = tree.style(id).margin();
        self.arrange_node(tree, id, margin_box.inset(&margin), margin, Some(containers));
    }

    /// Shrink-to-fit at the view's `left`/`top` offset in `content`.
    fn arrange_offset(
        &self,
        tree: &mut ViewTree,
        id: ViewId,
        content: Rect,
        containers: Containers,
    ) {
        let size = self.measure(tree, id, content.width);
        let style = tree.style(id);
        let x = content.x + style.left();
        let y = content.y + style.top();
        self.place(tree, id, Rect::from_size(x, y, size), containers);
    }

    fn arrange_block(
        &self,
        tree: &mut ViewTree,
        id: ViewId,
        content: Rect,
        containers: Containers,
    ) {
        let mut y = content.y;
        for child in flow_children(tree, id) {
            let style = tree.style(child);
            let BoxEdges { mut margin, chrome } = BoxEdges::of(style);
            let content_w = block_width(style, content.width);
            let border_w = content_w + chrome.horizontal();
            if !style.is_width_auto()
                && style.is_margin_left_auto()
                && style.is_margin_right_auto()
            {
                let free = (content.width - border_w).max(0.0);
                margin.left = free * 0.5;
                margin.right = free - margin.left;
            }

            let content_h = self.preferred_height(tree, child, content_w);
            let border_box = Rect::new(
                content.x + margin.left,
                y + margin.top,
                border_w,
                content_h + chrome.vertical(),
            );
            self.arrange_node(tree, child, border_box, margin, Some(containers));
            y = border_box.bottom() + margin.bottom;
        }
    }

    fn arrange_flex(
        &self,
        tree: &mut ViewTree,
        id: ViewId,
        content: Rect,
        axis: Axis,
        containers: Containers,
    ) {
        let children = flow_children(tree, id);
        let size = content.size();
        let cross = axis.cross(size);
        let mains = self.flex_sizes(
            tree,
            &children,
            axis,
            axis.main(size),
            (axis == Axis::Vertical).then_some(cross),
        );

        let mut pos = match axis {
            Axis::Horizontal => content.x,
            Axis::Vertical => content.y,
        };
        for (child, main) in children.into_iter().zip(mains) {
            let style = tree.style(child);
            let BoxEdges { margin, chrome } = BoxEdges::of(style);
            let explicit_cross = match axis {
                Axis::Horizontal => (!style.is_height_auto()).then(|| style.height()),
                Axis::Vertical => (!style.is_width_auto()).then(|| style.width()),
            };
            let cross_content = explicit_cross.unwrap_or_else(|| {
                (cross - axis.cross_edges(&margin) - axis.cross_edges(&chrome)).max(0.0)
            });
            let border_main = main + axis.main_edges(&chrome);
            let border_cross = cross_content + axis.cross_edges(&chrome);

            let border_box = match axis {
                Axis::Horizontal => Rect::new(
                    pos + margin.left,
                    content.y + margin.top,
                    border_main,
                    border_cross,
                ),
                Axis::Vertical => Rect::new(
                    content.x + margin.left,
                    pos + margin.top,
                    border_cross,
                    border_main,
                ),
            };
            pos += border_main + axis.main_edges(&margin);
            self.arrange_node(tree, child, border_box, margin, Some(containers));
        }
    }

    fn arrange_inline(
        &self,
        tree: &mut ViewTree,
        id: ViewId,
        content: Rect,
        containers: Containers,
    ) {
        let sizes = self.inline_sizes(tree, id, content.width);
        let placed = self.with_span(tree, id, &sizes, |span, ctx| {
            span.place_views(content.width, ctx)
        });
        for (view, rect) in placed {
            self.place(tree, view, rect.translate(content.x, content.y), containers);
        }

        // In-flow children that are not part of the span.
        for child in flow_children(tree, id) {
            if !sizes.contains_key(&child) {
                self.arrange_offset(tree, child, content, containers);
            }
        }
    }

    fn arrange_positioned(&self, tree: &mut ViewTree, id: ViewId, containers: Containers) {
        let style = tree.style(id);
        let cb = if style.is_fixed() {
            containers.fixed
        } else {
            containers.absolute
        };
        let position = *style.position();
        let outer = BoxEdges::of(style).outer();
        let (width_auto, width) = (style.is_width_auto(), style.width());
        let (height_auto, height) = (style.is_height_auto(), style.height());
        let (left, right) = (position.left.length(), position.right.length());
        let (top, bottom) = (position.top.length(), position.bottom.length());

        let content_w = match (left, right) {
            (Some(l), Some(r)) => (cb.width - l - r - outer.horizontal()).max(0.0),
            _ if !width_auto => width,
            _ => {
                let room = (cb.width - outer.horizontal()).max(0.0);
                self.preferred_width(tree, id).min(room)
            },
        };
        let content_h = match (top, bottom) {
            (Some(t), Some(b)) => (cb.height - t - b - outer.vertical()).max(0.0),
            _ if !height_auto => height,
            _ => self.preferred_height(tree, id, content_w),
        };
        let outer_w = content_w + outer.horizontal();
        let outer_h = content_h + outer.vertical();

        let x = match (left, right) {
            (Some(l), _) => cb.x + l,
            (None, Some(r)) => cb.right() - r - outer_w,
            (None, None) => cb.x,
        };
        let y = match (top, bottom) {
            (Some(t), _) => cb.y + t,
            (None, Some(b)) => cb.bottom() - b - outer_h,
            (None, None) => cb.y,
        };
        self.place(tree, id, Rect::new(x, y, outer_w, outer_h), containers);
    }
}

/// Content width of a block child inside `room`.
fn block_width(style: &StyleModel, room: f32) -> f32 {
    if style.is_width_auto() {
        (room - BoxEdges::of(style).outer().horizontal()).max(0.0)
    } else {
        style.width()
    }
}

fn flow_children(tree: &ViewTree, id: ViewId) -> Vec<ViewId> {
    tree.children(id)
        .iter()
        .copied()
        .filter(|&c| tree.style(c).is_static())
        .collect()
}

fn positioned_children(tree: &ViewTree, id: ViewId) -> Vec<ViewId> {
    tree.children(id)
        .iter()
        .copied()
        .filter(|&c| !tree.style(c).is_static())
        .collect()
}
