//! TOML scene files.
//!
//! A scene is a flat list of named views. Each view names its parent, lists
//! style declarations in source order, and optionally carries a label, an
//! intrinsic size, or span items that mix text runs with other views:
//!
//! ```toml
//! [viewport]
//! width = 480
//!
//! [[view]]
//! name = "root"
//! style = [{ name = "layout", value = "vbox" }]
//!
//! [[view]]
//! name = "title"
//! parent = "root"
//! label = { text = "Hello" }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use weft_layout::{FloatSide, Label, ViewContent, ViewGeometry, ViewId, ViewTree};
use weft_style::{Declaration, PropertyResolver, StyleModel};
use weft_types::color::parse_color;
use weft_types::{Color, Font, LayoutConfig, Result, Size, TextAlignment, WeftError};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Viewport {
    pub width: f32,
    /// Without a height the root takes its preferred height.
    #[serde(default)]
    pub height: Option<f32>,
}

/// One item of a view's span.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SpanItem {
    Text {
        text: String,
        #[serde(default)]
        font: Option<Font>,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        float: Option<FloatSide>,
    },
    View {
        view: String,
        /// Defaults to the view's explicit height, putting its bottom edge
        /// on the baseline.
        #[serde(default)]
        baseline_offset: Option<f32>,
        #[serde(default)]
        float: Option<FloatSide>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewSpec {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub style: Vec<Declaration>,
    #[serde(default)]
    pub label: Option<Label>,
    #[serde(default)]
    pub intrinsic: Option<Size>,
    #[serde(default)]
    pub span: Vec<SpanItem>,
    #[serde(default)]
    pub text_alignment: Option<TextAlignment>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub layout: LayoutConfig,
    pub viewport: Viewport,
    #[serde(default, rename = "view")]
    pub views: Vec<ViewSpec>,
}

/// A scene turned into a view tree, ready for layout.
pub struct BuiltScene {
    pub tree: ViewTree,
    pub root: ViewId,
    pub config: LayoutConfig,
    pub viewport: Viewport,
}

/// Geometry of one view, for output.
#[derive(Debug, Serialize)]
pub struct ViewReport<'a> {
    pub name: &'a str,
    #[serde(flatten)]
    pub geometry: ViewGeometry,
}

impl Scene {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Resolve styles and link views into a tree.
    pub fn build(&self) -> Result<BuiltScene> {
        self.layout.validate()?;
        let resolver = PropertyResolver::new();
        let mut tree = ViewTree::new();
        let mut ids: HashMap<&str, ViewId> = HashMap::new();

        for spec in &self.views {
            let mut style = StyleModel::new();
            let changes = resolver.apply(&mut style, &spec.style)?;
            if !changes.ignored.is_empty() {
                log::warn!("view `{}`: ignored {:?}", spec.name, changes.ignored);
            }
            let content = match (&spec.label, spec.intrinsic, spec.span.is_empty()) {
                (Some(_), _, false) => {
                    return Err(scene_error(format!(
                        "view `{}` has both a label and a span",
                        spec.name
                    )));
                },
                (Some(label), _, true) => ViewContent::Label(label.clone()),
                (None, Some(size), _) => ViewContent::Intrinsic(size),
                (None, None, _) => ViewContent::Plain,
            };
            let id = tree.add_view_with(style, content);
            tree.set_name(id, spec.name.as_str());
            if ids.insert(spec.name.as_str(), id).is_some() {
                return Err(scene_error(format!("duplicate view name `{}`", spec.name)));
            }
        }

        let lookup = |name: &str, by: &str| {
            ids.get(name)
                .copied()
                .ok_or_else(|| scene_error(format!("view `{by}` refers to unknown view `{name}`")))
        };

        for spec in &self.views {
            if let Some(parent) = &spec.parent {
                let parent = lookup(parent, &spec.name)?;
                tree.add_child(parent, lookup(&spec.name, &spec.name)?);
            }
        }

        for spec in &self.views {
            let owner = lookup(&spec.name, &spec.name)?;
            for item in &spec.span {
                add_span_item(&mut tree, owner, item, |name| lookup(name, &spec.name))?;
            }
            if let Some(alignment) = spec.text_alignment
                && let Some(span) = tree.span_mut(owner)
            {
                span.set_text_alignment(alignment);
            }
        }

        let roots: Vec<ViewId> = ids
            .values()
            .copied()
            .filter(|&id| !tree.is_attached(id))
            .collect();
        let [root] = roots[..] else {
            return Err(scene_error(format!(
                "expected exactly one root view, found {}",
                roots.len()
            )));
        };
        log::debug!("built scene: {} views, root {root:?}", tree.len());

        Ok(BuiltScene {
            tree,
            root,
            config: self.layout.clone(),
            viewport: self.viewport,
        })
    }
}

fn scene_error(message: String) -> WeftError {
    WeftError::Scene(message)
}

fn add_span_item(
    tree: &mut ViewTree,
    owner: ViewId,
    item: &SpanItem,
    lookup: impl Fn(&str) -> Result<ViewId>,
) -> Result<()> {
    let (id, float) = match item {
        SpanItem::Text {
            text,
            font,
            color,
            float,
        } => {
            let color = match color {
                Some(c) => {
                    parse_color(c).ok_or_else(|| scene_error(format!("invalid color `{c}`")))?
                },
                None => Color::BLACK,
            };
            let font = font.clone().unwrap_or_default();
            (tree.add_span_text(owner, text, font, color), float)
        },
        SpanItem::View {
            view,
            baseline_offset,
            float,
        } => {
            let child = lookup(view)?;
            let offset = baseline_offset.unwrap_or_else(|| tree.style(child).height());
            (tree.add_span_subview(owner, child, offset), float)
        },
    };
    let Some(id) = id else {
        return Err(scene_error(format!("view {owner:?} cannot hold a span")));
    };
    if float.is_some()
        && let Some(span) = tree.span_mut(owner)
    {
        span.set_float(id, *float);
    }
    Ok(())
}

impl BuiltScene {
    /// Geometry of every view, parents first.
    pub fn report(&self) -> Vec<ViewReport<'_>> {
        self.tree
            .descendants(self.root)
            .into_iter()
            .map(|id| ViewReport {
                name: self.tree.name(id).unwrap_or_default(),
                geometry: self.tree.geometry(id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_layout::{LayoutEngine, MonospaceMetrics};
    use weft_types::Rect;

    const SCENE: &str = r##"
        [layout]
        flex_rounding = "largest_remainder"

        [viewport]
        width = 300
        height = 100

        [[view]]
        name = "root"
        style = [
            { name = "layout", value = "hbox" },
            { name = "padding", value = 10 },
        ]

        [[view]]
        name = "left"
        parent = "root"
        style = [{ name = "flex", value = "1 1 0" }]

        [[view]]
        name = "right"
        parent = "root"
        style = [{ name = "flex", value = [2, 1, 0] }]
        span = [
            { text = "Hi ", color = "#ff0000" },
            { view = "dot" },
        ]

        [[view]]
        name = "dot"
        style = [
            { name = "width", value = 8 },
            { name = "height", value = 8 },
        ]
    "##;

    fn laid_out(text: &str) -> BuiltScene {
        let mut built = Scene::from_toml_str(text).unwrap().build().unwrap();
        let metrics = MonospaceMetrics::new(0.5, 0.75, 0.25);
        let engine = LayoutEngine::new(&metrics, &built.config);
        engine.layout(&mut built.tree, built.root, built.viewport.width, built.viewport.height);
        built
    }

    fn geometry_of<'a>(report: &'a [ViewReport<'a>], name: &str) -> &'a ViewGeometry {
        &report.iter().find(|r| r.name == name).unwrap().geometry
    }

    #[test]
    fn builds_and_lays_out_scene() {
        let built = laid_out(SCENE);
        assert_eq!(built.config.flex_rounding, weft_types::FlexRounding::LargestRemainder);
        let report = built.report();
        assert_eq!(
            report.iter().map(|r| r.name).collect::<Vec<_>>(),
            vec!["root", "left", "right", "dot"]
        );
        // 280 shared 1:2.
        assert_eq!(geometry_of(&report, "left").border_box, Rect::new(10.0, 10.0, 93.0, 80.0));
        assert_eq!(geometry_of(&report, "right").border_box, Rect::new(103.0, 10.0, 187.0, 80.0));
        // "Hi " is 24px; the dot's bottom sits on the 12px baseline.
        assert_eq!(geometry_of(&report, "dot").border_box, Rect::new(127.0, 14.0, 8.0, 8.0));
    }

    #[test]
    fn report_serializes_flat_geometry() {
        let built = laid_out(SCENE);
        let json = serde_json::to_value(built.report()).unwrap();
        assert_eq!(json[0]["name"], "root");
        assert_eq!(json[0]["border_box"]["width"], 300.0);
    }

    #[test]
    fn unknown_parent_is_an_error() {
        let text = r#"
            viewport = { width = 10 }
            [[view]]
            name = "a"
            parent = "nope"
        "#;
        let err = Scene::from_toml_str(text).unwrap().build().err().unwrap();
        assert!(matches!(err, WeftError::Scene(ref m) if m.contains("nope")));
    }

    #[test]
    fn requires_single_root() {
        let text = r#"
            viewport = { width = 10 }
            [[view]]
            name = "a"
            [[view]]
            name = "b"
        "#;
        let err = Scene::from_toml_str(text).unwrap().build().err().unwrap();
        assert!(format!("{err}").contains("exactly one root"));
    }

    #[test]
    fn style_errors_propagate() {
        let text = r#"
            viewport = { width = 10 }
            [[view]]
            name = "a"
            style = [{ name = "margin", value = [1, 2, 3] }]
        "#;
        let err = Scene::from_toml_str(text).unwrap().build().err().unwrap();
        assert!(matches!(err, WeftError::Style(_)));
    }

    #[test]
    fn bad_span_color_is_an_error() {
        let text = r#"
            viewport = { width = 10 }
            [[view]]
            name = "a"
            span = [{ text = "x", color = "nope" }]
        "#;
        let err = Scene::from_toml_str(text).unwrap().build().err().unwrap();
        assert!(format!("{err}").contains("invalid color"));
    }

    #[test]
    fn empty_ellipsis_is_rejected() {
        let text = r#"
            layout = { ellipsis = "" }
            viewport = { width = 10 }
            [[view]]
            name = "a"
        "#;
        let err = Scene::from_toml_str(text).unwrap().build().err().unwrap();
        assert!(matches!(err, WeftError::Config(_)));
    }

    #[test]
    fn shipped_demo_scene_builds() {
        let text = include_str!("../scenes/demo.toml");
        let built = laid_out(text);
        assert!(built.tree.len() > 1);
        assert!(!built.tree.needs_layout(built.root));
    }
}
