//! Arena of views.
//!
//! Views are stored in a flat `Vec` and addressed by [`ViewId`]. Parent and
//! child links are handles, so a view removed from its parent (or released
//! by a span) stays valid and can be re-attached elsewhere.

use serde::{Deserialize, Serialize};
use weft_style::StyleModel;
use weft_types::{Color, Font, Size};

use crate::geometry::ViewGeometry;
use crate::label::Label;
use crate::span::{SpanId, SpanLayout};

/// Handle of a view in a [`ViewTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId(usize);

impl ViewId {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// What a view draws inside its content box.
#[derive(Debug, Clone, Default)]
pub enum ViewContent {
    /// Nothing of its own; sized by its children.
    #[default]
    Plain,
    /// A fixed intrinsic content size, such as an image.
    Intrinsic(Size),
    Label(Label),
    Span(SpanLayout),
}

#[derive(Debug, Clone, Default)]
pub struct ViewNode {
    pub style: StyleModel,
    pub content: ViewContent,
    /// Optional name for diagnostics and output.
    pub name: Option<String>,
    geometry: ViewGeometry,
    children: Vec<ViewId>,
    parent: Option<ViewId>,
    content_dirty: bool,
}

impl ViewNode {
    pub fn geometry(&self) -> &ViewGeometry {
        &self.geometry
    }

    pub fn children(&self) -> &[ViewId] {
        &self.children
    }

    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewTree {
    nodes: Vec<ViewNode>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a detached view.
    pub fn add_view(&mut self, style: StyleModel) -> ViewId {
        self.add_view_with(style, ViewContent::Plain)
    }

    pub fn add_view_with(&mut self, style: StyleModel, content: ViewContent) -> ViewId {
        let id = ViewId(self.nodes.len());
        self.nodes.push(ViewNode {
            style,
            content,
            content_dirty: true,
            ..ViewNode::default()
        });
        id
    }

    pub fn node(&self, id: ViewId) -> &ViewNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: ViewId) -> &mut ViewNode {
        &mut self.nodes[id.0]
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn add_child(&mut self, parent: ViewId, child: ViewId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        let node = &mut self.nodes[parent.0];
        node.children.push(child);
        node.content_dirty = true;
    }

    /// Remove `child` from its parent, including any span object of the
    /// parent that embeds it. Returns whether it was attached.
    pub fn detach(&mut self, child: ViewId) -> bool {
        let Some(parent) = self.nodes[child.0].parent.take() else {
            return false;
        };
        let node = &mut self.nodes[parent.0];
        node.children.retain(|&c| c != child);
        if let ViewContent::Span(span) = &mut node.content {
            span.remove_subview(child);
        }
        node.content_dirty = true;
        true
    }

    pub fn is_attached(&self, id: ViewId) -> bool {
        self.nodes[id.0].parent.is_some()
    }

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: ViewId) -> &[ViewId] {
        &self.nodes[id.0].children
    }

    pub fn style(&self, id: ViewId) -> &StyleModel {
        &self.nodes[id.0].style
    }

    /// Style setters on the returned model mark the view for layout.
    pub fn style_mut(&mut self, id: ViewId) -> &mut StyleModel {
        &mut self.nodes[id.0].style
    }

    pub fn content(&self, id: ViewId) -> &ViewContent {
        &self.nodes[id.0].content
    }

    pub fn content_mut(&mut self, id: ViewId) -> &mut ViewContent {
        let node = &mut self.nodes[id.0];
        node.content_dirty = true;
        &mut node.content
    }

    pub fn set_content(&mut self, id: ViewId, content: ViewContent) {
        *self.content_mut(id) = content;
    }

    pub fn set_name(&mut self, id: ViewId, name: impl Into<String>) {
        self.nodes[id.0].name = Some(name.into());
    }

    pub fn name(&self, id: ViewId) -> Option<&str> {
        self.nodes[id.0].name.as_deref()
    }

    pub fn label_mut(&mut self, id: ViewId) -> Option<&mut Label> {
        match self.content_mut(id) {
            ViewContent::Label(label) => Some(label),
            _ => None,
        }
    }

    /// The view's span, turning plain content into an empty span first.
    pub fn span_mut(&mut self, id: ViewId) -> Option<&mut SpanLayout> {
        let content = self.content_mut(id);
        if matches!(content, ViewContent::Plain) {
            *content = ViewContent::Span(SpanLayout::new());
        }
        match content {
            ViewContent::Span(span) => Some(span),
            _ => None,
        }
    }

    /// Append a text run to the view's span.
    pub fn add_span_text(
        &mut self,
        id: ViewId,
        text: &str,
        font: Font,
        color: Color,
    ) -> Option<SpanId> {
        Some(self.span_mut(id)?.add_text(text, font, color))
    }

    /// Attach `child` and embed it in the view's span.
    pub fn add_span_subview(
        &mut self,
        id: ViewId,
        child: ViewId,
        baseline_offset: f32,
    ) -> Option<SpanId> {
        self.span_mut(id)?;
        self.add_child(id, child);
        Some(self.span_mut(id)?.add_subview(child, baseline_offset))
    }

    /// Empty the view's span. Embedded views are detached and returned;
    /// they remain valid.
    pub fn clear_span(&mut self, id: ViewId) -> Vec<ViewId> {
        let released = match self.content_mut(id) {
            ViewContent::Span(span) => span.clear(),
            _ => return Vec::new(),
        };
        for &view in &released {
            self.detach(view);
        }
        released
    }

    pub fn geometry(&self, id: ViewId) -> ViewGeometry {
        self.nodes[id.0].geometry
    }

    pub(crate) fn set_geometry(&mut self, id: ViewId, geometry: ViewGeometry) {
        self.nodes[id.0].geometry = geometry;
    }

    /// `root` and its descendants, parents before children.
    pub fn descendants(&self, root: ViewId) -> Vec<ViewId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev());
        }
        out
    }

    /// Whether any style or content under `root` changed since the last
    /// layout pass.
    pub fn needs_layout(&self, root: ViewId) -> bool {
        self.descendants(root).into_iter().any(|id| {
            let node = &self.nodes[id.0];
            node.style.is_dirty() || node.content_dirty
        })
    }

    pub(crate) fn clear_dirty(&mut self, root: ViewId) {
        for id in self.descendants(root) {
            let node = &mut self.nodes[id.0];
            node.style.take_dirty();
            node.content_dirty = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SpanContent;

    #[test]
    fn add_child_reparents() {
        let mut tree = ViewTree::new();
        let a = tree.add_view(StyleModel::new());
        let b = tree.add_view(StyleModel::new());
        let c = tree.add_view(StyleModel::new());
        tree.add_child(a, c);
        tree.add_child(b, c);
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[c]);
        assert_eq!(tree.parent(c), Some(b));
    }

    #[test]
    fn clearing_span_detaches_embedded_views() {
        let mut tree = ViewTree::new();
        let root = tree.add_view(StyleModel::new());
        let icon = tree.add_view(StyleModel::new());
        tree.add_span_text(root, "AB", Font::new("x", 12.0), Color::rgb(255, 0, 0));
        tree.add_span_text(root, "CD", Font::new("y", 14.0), Color::rgb(0, 0, 255));
        tree.add_span_subview(root, icon, 0.0);
        assert!(tree.is_attached(icon));

        let released = tree.clear_span(root);
        assert_eq!(released, vec![icon]);
        let ViewContent::Span(span) = tree.content(root) else {
            panic!("expected span content");
        };
        assert!(span.objects().is_empty());
        assert!(!tree.is_attached(icon));
        assert!(tree.children(root).is_empty());
        // Still a live view.
        tree.style_mut(icon).set_width(10.0);
        assert_eq!(tree.style(icon).width(), 10.0);
    }

    #[test]
    fn detach_removes_span_object() {
        let mut tree = ViewTree::new();
        let root = tree.add_view(StyleModel::new());
        let icon = tree.add_view(StyleModel::new());
        tree.add_span_text(root, "x", Font::default(), Color::BLACK);
        tree.add_span_subview(root, icon, 0.0);
        assert!(tree.detach(icon));
        assert!(!tree.detach(icon));
        let ViewContent::Span(span) = tree.content(root) else {
            panic!("expected span content");
        };
        assert_eq!(span.objects().len(), 1);
        assert!(matches!(span.objects()[0].content, SpanContent::Text { .. }));
    }

    #[test]
    fn dirty_tracking_follows_style_and_content() {
        let mut tree = ViewTree::new();
        let root = tree.add_view(StyleModel::new());
        let child = tree.add_view(StyleModel::new());
        tree.add_child(root, child);
        assert!(tree.needs_layout(root));
        tree.clear_dirty(root);
        assert!(!tree.needs_layout(root));

        tree.style_mut(child).set_height(5.0);
        assert!(tree.needs_layout(root));
        tree.clear_dirty(root);

        tree.add_span_text(child, "hi", Font::default(), Color::BLACK);
        assert!(tree.needs_layout(root));
    }

    #[test]
    fn descendants_are_preorder() {
        let mut tree = ViewTree::new();
        let root = tree.add_view(StyleModel::new());
        let a = tree.add_view(StyleModel::new());
        let b = tree.add_view(StyleModel::new());
        let a1 = tree.add_view(StyleModel::new());
        tree.add_child(root, a);
        tree.add_child(root, b);
        tree.add_child(a, a1);
        assert_eq!(tree.descendants(root), vec![root, a, a1, b]);
    }
}
