//! Declaration list to style model translation.
//!
//! The resolver receives an ordered `(name, value, priority)` list that an
//! external parser has already produced and dispatches each declaration to
//! a handler registered under the property name. Declarations are applied
//! normal-first then important, each group in source order, so a later or
//! more important declaration wins.
//!
//! Application is all-or-nothing: handlers run against a scratch copy and
//! the model is only touched once every declaration has been accepted.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use weft_types::color::parse_color;
use weft_types::{Color, GradientStop, StyleError};

use crate::model::{
    BorderSide, BorderStyle, ChangedFields, LayoutMode, PositionMode, StyleField, StyleModel,
};
use crate::value::{Edges, StyleValue};

// -------------------------------------------------------------------
// Declarations
// -------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Normal,
    Important,
}

/// A parsed property value.
///
/// Keywords carry unparsed tokens such as `auto`, `10px` or `#fff`;
/// whitespace-separated keywords are treated like a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f32),
    Keyword(String),
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    /// The individual components of a value.
    fn components(&self) -> Vec<PropertyValue> {
        match self {
            PropertyValue::List(items) => items.clone(),
            PropertyValue::Keyword(k) if k.split_whitespace().nth(1).is_some() => k
                .split_whitespace()
                .map(|t| PropertyValue::Keyword(t.to_string()))
                .collect(),
            other => vec![other.clone()],
        }
    }

    fn keyword(&self) -> Option<&str> {
        match self {
            PropertyValue::Keyword(k) => Some(k.trim()),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Number(n) => write!(f, "{n}"),
            PropertyValue::Keyword(k) => f.write_str(k),
            PropertyValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            },
        }
    }
}

impl From<f32> for PropertyValue {
    fn from(n: f32) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Keyword(s.to_string())
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(items: Vec<T>) -> Self {
        PropertyValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// One `name: value [!important]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub value: PropertyValue,
    #[serde(default)]
    pub priority: Priority,
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            priority: Priority::Normal,
        }
    }

    pub fn important(mut self) -> Self {
        self.priority = Priority::Important;
        self
    }
}

/// What an [`PropertyResolver::apply`] call did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub changed: ChangedFields,
    /// Declarations with no registered handler, in input order.
    pub ignored: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    pub fn contains(&self, field: StyleField) -> bool {
        self.changed.contains(&field)
    }

    /// Whether any change can move or resize something.
    pub fn needs_layout(&self) -> bool {
        self.changed.iter().any(|f| f.affects_layout())
    }
}

// -------------------------------------------------------------------
// Resolver
// -------------------------------------------------------------------

pub type PropertyHandler = fn(&mut StyleModel, &PropertyValue) -> Result<(), StyleError>;

/// Registry of per-property handlers.
#[derive(Clone)]
pub struct PropertyResolver {
    handlers: HashMap<String, PropertyHandler>,
}

impl Default for PropertyResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PropertyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("PropertyResolver")
            .field("properties", &names)
            .finish()
    }
}

impl PropertyResolver {
    /// A resolver with every built-in property registered.
    pub fn new() -> Self {
        let mut resolver = Self::empty();
        resolver.register("layout", set_layout);
        resolver.register("margin", set_margin);
        resolver.register("margin-left", |s, v| {
            s.set_margin_left(non_negative_length("margin-left", v)?);
            Ok(())
        });
        resolver.register("margin-top", |s, v| {
            s.set_margin_top(non_negative_length("margin-top", v)?);
            Ok(())
        });
        resolver.register("margin-right", |s, v| {
            s.set_margin_right(non_negative_length("margin-right", v)?);
            Ok(())
        });
        resolver.register("margin-bottom", |s, v| {
            s.set_margin_bottom(non_negative_length("margin-bottom", v)?);
            Ok(())
        });
        resolver.register("padding", set_padding);
        resolver.register("padding-left", |s, v| {
            set_padding_side(s, "padding-left", v, |e| &mut e.left)
        });
        resolver.register("padding-top", |s, v| {
            set_padding_side(s, "padding-top", v, |e| &mut e.top)
        });
        resolver.register("padding-right", |s, v| {
            set_padding_side(s, "padding-right", v, |e| &mut e.right)
        });
        resolver.register("padding-bottom", |s, v| {
            set_padding_side(s, "padding-bottom", v, |e| &mut e.bottom)
        });
        resolver.register("border", set_border);
        resolver.register("border-width", set_border_width);
        resolver.register("border-color", set_border_color);
        resolver.register("border-radius", set_border_radius);
        resolver.register("width", |s, v| {
            match non_negative_length("width", v)? {
                StyleValue::Auto => s.set_width_auto(),
                StyleValue::Length(w) => s.set_width(w),
            }
            Ok(())
        });
        resolver.register("height", |s, v| {
            match non_negative_length("height", v)? {
                StyleValue::Auto => s.set_height_auto(),
                StyleValue::Length(h) => s.set_height(h),
            }
            Ok(())
        });
        resolver.register("position", set_position);
        resolver.register("left", |s, v| {
            s.set_left(length("left", v)?);
            Ok(())
        });
        resolver.register("top", |s, v| {
            s.set_top(length("top", v)?);
            Ok(())
        });
        resolver.register("right", |s, v| {
            s.set_right(length("right", v)?);
            Ok(())
        });
        resolver.register("bottom", |s, v| {
            s.set_bottom(length("bottom", v)?);
            Ok(())
        });
        resolver.register("flex", set_flex);
        resolver.register("flex-grow", |s, v| {
            s.set_flex_grow(factor("flex-grow", v)?);
            Ok(())
        });
        resolver.register("flex-shrink", |s, v| {
            s.set_flex_shrink(factor("flex-shrink", v)?);
            Ok(())
        });
        resolver.register("flex-basis", |s, v| {
            match non_negative_length("flex-basis", v)? {
                StyleValue::Auto => s.set_flex_basis_auto(),
                StyleValue::Length(b) => s.set_flex_basis(b),
            }
            Ok(())
        });
        resolver.register("background", set_background);
        resolver.register("background-color", |s, v| {
            s.set_background(color("background-color", v)?);
            Ok(())
        });
        resolver.register("background-gradient", set_background_gradient);
        resolver.register("background-image", set_background_image);
        resolver.register("box-shadow", set_box_shadow);
        resolver
    }

    /// A resolver with no properties registered.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register (or replace) the handler for `name`.
    pub fn register(&mut self, name: &str, handler: PropertyHandler) {
        self.handlers.insert(name.to_ascii_lowercase(), handler);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.handlers.contains_key(&name.trim().to_ascii_lowercase())
    }

    /// Apply `declarations` to `style`.
    ///
    /// On error the style is left untouched. On success at most one change
    /// notification fires, and only when some field actually changed, so
    /// reapplying the same list reports an empty change set.
    pub fn apply(
        &self,
        style: &mut StyleModel,
        declarations: &[Declaration],
    ) -> Result<ChangeSet, StyleError> {
        let mut ordered: Vec<&Declaration> = declarations.iter().collect();
        // Stable: source order is kept within each priority.
        ordered.sort_by_key(|d| d.priority);

        let mut scratch = style.clone();
        let mut ignored = Vec::new();
        for decl in ordered {
            let name = decl.name.trim().to_ascii_lowercase();
            match self.handlers.get(&name) {
                Some(handler) => handler(&mut scratch, &decl.value)?,
                None => {
                    log::warn!("Ignoring unknown style property `{}`", decl.name);
                    ignored.push(decl.name.clone());
                },
            }
        }

        let changed = style.replace(scratch.values().clone());
        Ok(ChangeSet { changed, ignored })
    }
}

// -------------------------------------------------------------------
// Value conversion
// -------------------------------------------------------------------

fn parse_number(token: &str) -> Option<f32> {
    let token = token.trim();
    token.strip_suffix("px").unwrap_or(token).parse().ok()
}

fn number(property: &str, value: &PropertyValue) -> Result<f32, StyleError> {
    match value {
        PropertyValue::Number(n) => Ok(*n),
        PropertyValue::Keyword(k) => {
            parse_number(k).ok_or_else(|| StyleError::invalid_value(property, value))
        },
        PropertyValue::List(_) => Err(StyleError::invalid_value(property, value)),
    }
}

fn factor(property: &str, value: &PropertyValue) -> Result<f32, StyleError> {
    let n = number(property, value)?;
    if n < 0.0 {
        return Err(StyleError::NegativeLength {
            property: property.to_string(),
            value: n,
        });
    }
    Ok(n)
}

fn length(property: &str, value: &PropertyValue) -> Result<StyleValue, StyleError> {
    if value.keyword().is_some_and(|k| k.eq_ignore_ascii_case("auto")) {
        return Ok(StyleValue::Auto);
    }
    number(property, value).map(StyleValue::Length)
}

fn non_negative_length(property: &str, value: &PropertyValue) -> Result<StyleValue, StyleError> {
    let v = length(property, value)?;
    if let StyleValue::Length(n) = v
        && n < 0.0
    {
        return Err(StyleError::NegativeLength {
            property: property.to_string(),
            value: n,
        });
    }
    Ok(v)
}

fn color(property: &str, value: &PropertyValue) -> Result<Color, StyleError> {
    value
        .keyword()
        .and_then(parse_color)
        .ok_or_else(|| StyleError::invalid_value(property, value))
}

fn edges<T: Copy>(
    property: &str,
    value: &PropertyValue,
    convert: impl Fn(&str, &PropertyValue) -> Result<T, StyleError>,
) -> Result<Edges<T>, StyleError> {
    let items = value
        .components()
        .iter()
        .map(|item| convert(property, item))
        .collect::<Result<Vec<T>, _>>()?;
    Edges::from_shorthand(property, &items)
}

fn keyword<'a>(property: &str, value: &'a PropertyValue) -> Result<&'a str, StyleError> {
    value
        .keyword()
        .ok_or_else(|| StyleError::invalid_value(property, value))
}

// -------------------------------------------------------------------
// Handlers
// -------------------------------------------------------------------

fn set_layout(style: &mut StyleModel, value: &PropertyValue) -> Result<(), StyleError> {
    let mode = match keyword("layout", value)?.to_ascii_lowercase().as_str() {
        "none" => LayoutMode::None,
        "block" => LayoutMode::Block,
        "line" => LayoutMode::Line,
        "vbox" => LayoutMode::Vbox,
        "hbox" => LayoutMode::Hbox,
        other => return Err(StyleError::unknown_keyword("layout", other)),
    };
    style.set_layout(mode);
    Ok(())
}

fn set_margin(style: &mut StyleModel, value: &PropertyValue) -> Result<(), StyleError> {
    style.set_margin_values(edges("margin", value, non_negative_length)?);
    Ok(())
}

fn set_padding(style: &mut StyleModel, value: &PropertyValue) -> Result<(), StyleError> {
    style.set_padding(edges("padding", value, |p, v| {
        Ok(non_negative_length(p, v)?.resolve())
    })?);
    Ok(())
}

fn set_padding_side(
    style: &mut StyleModel,
    property: &str,
    value: &PropertyValue,
    side: fn(&mut Edges<f32>) -> &mut f32,
) -> Result<(), StyleError> {
    let mut padding = style.values().box_model.padding;
    *side(&mut padding) = non_negative_length(property, value)?.resolve();
    style.set_padding(padding);
    Ok(())
}

/// `border: none` or any mix of widths (1/2/4), an optional `solid` and a
/// color. The color defaults to black.
fn set_border(style: &mut StyleModel, value: &PropertyValue) -> Result<(), StyleError> {
    if value.keyword().is_some_and(|k| k.eq_ignore_ascii_case("none")) {
        style.set_border_none();
        return Ok(());
    }
    let mut widths = Vec::new();
    let mut border_color = Color::BLACK;
    for item in value.components() {
        match item.keyword() {
            Some(k) if k.eq_ignore_ascii_case("solid") => {},
            Some(k) if parse_number(k).is_none() => border_color = color("border", &item)?,
            _ => widths.push(factor("border", &item)?),
        }
    }
    if widths.is_empty() {
        widths.push(1.0);
    }
    let widths = Edges::from_shorthand("border", &widths)?;
    style.set_border(border_color, widths);
    Ok(())
}

fn set_border_width(style: &mut StyleModel, value: &PropertyValue) -> Result<(), StyleError> {
    let widths = edges("border-width", value, factor)?;
    let current = *style.border_sides();
    let pick = |side: BorderSide, width: f32| BorderSide {
        style: BorderStyle::Solid,
        width,
        color: side.color,
    };
    style.set_border_sides(Edges::new(
        pick(current.left, widths.left),
        pick(current.top, widths.top),
        pick(current.right, widths.right),
        pick(current.bottom, widths.bottom),
    ));
    Ok(())
}

fn set_border_color(style: &mut StyleModel, value: &PropertyValue) -> Result<(), StyleError> {
    let colors = edges("border-color", value, color)?;
    let current = *style.border_sides();
    let pick = |side: BorderSide, color: Color| BorderSide { color, ..side };
    style.set_border_sides(Edges::new(
        pick(current.left, colors.left),
        pick(current.top, colors.top),
        pick(current.right, colors.right),
        pick(current.bottom, colors.bottom),
    ));
    Ok(())
}

fn set_border_radius(style: &mut StyleModel, value: &PropertyValue) -> Result<(), StyleError> {
    let radii = value
        .components()
        .iter()
        .map(|item| factor("border-radius", item))
        .collect::<Result<Vec<_>, _>>()?;
    match radii[..] {
        [r] => style.set_border_radius(r),
        [tl, tr, bl, br] => style.set_border_radii(tl, tr, bl, br),
        _ => {
            return Err(StyleError::InvalidEdgeCount {
                property: "border-radius".to_string(),
                count: radii.len(),
            });
        },
    }
    Ok(())
}

fn set_position(style: &mut StyleModel, value: &PropertyValue) -> Result<(), StyleError> {
    let mode = match keyword("position", value)?.to_ascii_lowercase().as_str() {
        "static" => PositionMode::Static,
        "absolute" => PositionMode::Absolute,
        "fixed" => PositionMode::Fixed,
        other => return Err(StyleError::unknown_keyword("position", other)),
    };
    style.set_position(mode);
    Ok(())
}

/// `flex: none | auto | <grow> [<shrink> [<basis>]]`.
fn set_flex(style: &mut StyleModel, value: &PropertyValue) -> Result<(), StyleError> {
    match value.keyword().map(str::to_ascii_lowercase).as_deref() {
        Some("none") => {
            style.set_flex_none();
            return Ok(());
        },
        Some("auto") => {
            style.set_flex(1.0, 1.0);
            return Ok(());
        },
        _ => {},
    }
    let items = value.components();
    match items.as_slice() {
        [grow] => style.set_flex(factor("flex", grow)?, 1.0),
        [grow, shrink] => style.set_flex(factor("flex", grow)?, factor("flex", shrink)?),
        [grow, shrink, basis] => {
            let (grow, shrink) = (factor("flex", grow)?, factor("flex", shrink)?);
            match non_negative_length("flex", basis)? {
                StyleValue::Auto => style.set_flex(grow, shrink),
                StyleValue::Length(b) => style.set_flex_with_basis(grow, shrink, b),
            }
        },
        _ => return Err(StyleError::invalid_value("flex", value)),
    }
    Ok(())
}

fn set_background(style: &mut StyleModel, value: &PropertyValue) -> Result<(), StyleError> {
    if value.keyword().is_some_and(|k| k.eq_ignore_ascii_case("none")) {
        style.set_background_none();
        return Ok(());
    }
    style.set_background(color("background", value)?);
    Ok(())
}

/// `background-gradient: [<angle>] <color> <color> ...`; stops are spaced
/// evenly and the angle defaults to 180 (top to bottom).
fn set_background_gradient(
    style: &mut StyleModel,
    value: &PropertyValue,
) -> Result<(), StyleError> {
    let mut items = value.components();
    let leading_angle = items
        .first()
        .and_then(|first| number("background-gradient", first).ok());
    let mut angle = 180.0;
    if let Some(a) = leading_angle {
        angle = a;
        items.remove(0);
    }
    let colors = items
        .iter()
        .map(|item| color("background-gradient", item))
        .collect::<Result<Vec<_>, _>>()?;
    let last = colors.len().saturating_sub(1).max(1) as f32;
    let stops = colors
        .into_iter()
        .enumerate()
        .map(|(i, c)| GradientStop::new(c, i as f32 / last))
        .collect();
    style.set_background_gradient(angle, stops);
    Ok(())
}

fn set_background_image(style: &mut StyleModel, value: &PropertyValue) -> Result<(), StyleError> {
    let raw = keyword("background-image", value)?;
    let url = raw
        .strip_prefix("url(")
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(raw)
        .trim_matches(|c| c == '"' || c == '\'');
    if url.is_empty() {
        return Err(StyleError::invalid_value("background-image", value));
    }
    style.set_background_image(url);
    Ok(())
}

/// `box-shadow: <x> <y> <blur> <color>`.
fn set_box_shadow(style: &mut StyleModel, value: &PropertyValue) -> Result<(), StyleError> {
    match value.components().as_slice() {
        [x, y, blur, c] => {
            style.set_box_shadow(
                color("box-shadow", c)?,
                number("box-shadow", x)?,
                number("box-shadow", y)?,
                factor("box-shadow", blur)?,
            );
            Ok(())
        },
        _ => Err(StyleError::invalid_value("box-shadow", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_types::EdgeSizes;

    fn decl(name: &str, value: impl Into<PropertyValue>) -> Declaration {
        Declaration::new(name, value)
    }

    #[test]
    fn applies_box_properties() {
        let resolver = PropertyResolver::new();
        let mut style = StyleModel::new();
        let changes = resolver
            .apply(
                &mut style,
                &[
                    decl("layout", "hbox"),
                    decl("margin", vec![4.0, 8.0]),
                    decl("padding", "2px"),
                    decl("width", 120.0),
                    decl("height", "auto"),
                ],
            )
            .unwrap();
        assert!(style.is_layout_hbox());
        assert_eq!(style.margin(), EdgeSizes::new(4.0, 8.0, 4.0, 8.0));
        assert_eq!(style.padding(), EdgeSizes::uniform(2.0));
        assert_eq!(style.width(), 120.0);
        assert!(style.is_height_auto());
        assert!(changes.contains(StyleField::Layout));
        assert!(changes.contains(StyleField::Margin));
        assert!(changes.contains(StyleField::Width));
        assert!(!changes.contains(StyleField::Height));
        assert!(changes.needs_layout());
    }

    #[test]
    fn reapplying_is_idempotent() {
        let resolver = PropertyResolver::new();
        let list = [
            decl("margin", "1 auto"),
            decl("border", "2px solid #ff0000"),
            decl("flex", vec![1.0, 1.0, 30.0]),
            decl("background-gradient", "white black"),
        ];
        let mut style = StyleModel::new();
        let first = resolver.apply(&mut style, &list).unwrap();
        assert!(!first.is_empty());
        let snapshot = style.values().clone();
        let generation = style.generation();

        let second = resolver.apply(&mut style, &list).unwrap();
        assert!(second.is_empty());
        assert_eq!(style.values(), &snapshot);
        assert_eq!(style.generation(), generation);
    }

    #[test]
    fn apply_fires_one_notification() {
        let resolver = PropertyResolver::new();
        let mut style = StyleModel::new();
        resolver
            .apply(
                &mut style,
                &[decl("width", 10.0), decl("height", 10.0), decl("left", 3.0)],
            )
            .unwrap();
        assert_eq!(style.generation(), 1);
        assert!(style.is_dirty());
    }

    #[test]
    fn important_beats_later_normal() {
        let resolver = PropertyResolver::new();
        let mut style = StyleModel::new();
        resolver
            .apply(
                &mut style,
                &[decl("width", 10.0).important(), decl("width", 20.0)],
            )
            .unwrap();
        assert_eq!(style.width(), 10.0);
    }

    #[test]
    fn later_declaration_wins_within_priority() {
        let resolver = PropertyResolver::new();
        let mut style = StyleModel::new();
        resolver
            .apply(&mut style, &[decl("margin", 5.0), decl("margin-left", "auto")])
            .unwrap();
        assert!(style.is_margin_left_auto());
        assert_eq!(style.margin_top(), 5.0);
    }

    #[test]
    fn error_leaves_style_untouched() {
        let resolver = PropertyResolver::new();
        let mut style = StyleModel::new();
        style.set_width(50.0);
        let before = style.values().clone();
        let err = resolver
            .apply(
                &mut style,
                &[decl("width", 10.0), decl("padding", vec![1.0, 2.0, 3.0])],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            StyleError::InvalidEdgeCount { count: 3, .. }
        ));
        assert_eq!(style.values(), &before);
        assert_eq!(style.generation(), 1);
    }

    #[test]
    fn negative_sizes_are_rejected() {
        let resolver = PropertyResolver::new();
        let mut style = StyleModel::new();
        let err = resolver
            .apply(&mut style, &[decl("padding", -1.0)])
            .unwrap_err();
        assert!(matches!(err, StyleError::NegativeLength { .. }));
        for property in ["margin", "margin-top"] {
            let err = resolver
                .apply(&mut style, &[decl(property, -4.0)])
                .unwrap_err();
            assert!(matches!(err, StyleError::NegativeLength { value, .. } if value == -4.0));
        }
        assert_eq!(style.margin(), EdgeSizes::ZERO);
        // Offsets may be negative; `auto` margins still parse.
        resolver
            .apply(&mut style, &[decl("margin", "0 auto"), decl("left", -2.0)])
            .unwrap();
        assert!(style.is_margin_left_auto());
        assert_eq!(style.left(), -2.0);
    }

    #[test]
    fn unknown_properties_are_reported() {
        let resolver = PropertyResolver::new();
        let mut style = StyleModel::new();
        let changes = resolver
            .apply(&mut style, &[decl("font-variant", "small-caps"), decl("width", 4.0)])
            .unwrap();
        assert_eq!(changes.ignored, vec!["font-variant".to_string()]);
        assert_eq!(style.width(), 4.0);
    }

    #[test]
    fn unknown_keyword_is_an_error() {
        let resolver = PropertyResolver::new();
        let mut style = StyleModel::new();
        let err = resolver
            .apply(&mut style, &[decl("layout", "grid")])
            .unwrap_err();
        assert_eq!(err, StyleError::unknown_keyword("layout", "grid"));
    }

    #[test]
    fn border_width_and_color_compose() {
        let resolver = PropertyResolver::new();
        let mut style = StyleModel::new();
        resolver
            .apply(
                &mut style,
                &[decl("border-width", vec![1.0, 2.0]), decl("border-color", "blue")],
            )
            .unwrap();
        assert_eq!(style.border(), EdgeSizes::new(1.0, 2.0, 1.0, 2.0));
        assert_eq!(style.border_sides().top.color, Color::rgb(0, 0, 255));
        resolver
            .apply(&mut style, &[decl("border", "none")])
            .unwrap();
        assert_eq!(style.border(), EdgeSizes::ZERO);
    }

    #[test]
    fn flex_shorthand_variants() {
        let resolver = PropertyResolver::new();
        let mut style = StyleModel::new();
        resolver.apply(&mut style, &[decl("flex", 2.0)]).unwrap();
        assert_eq!((style.flex_grow(), style.flex_shrink()), (2.0, 1.0));
        assert!(style.is_flex_basis_auto());
        resolver
            .apply(&mut style, &[decl("flex", "1 0 25px")])
            .unwrap();
        assert_eq!((style.flex_grow(), style.flex_shrink()), (1.0, 0.0));
        assert_eq!(style.flex_basis(), 25.0);
        resolver.apply(&mut style, &[decl("flex", "none")]).unwrap();
        assert_eq!((style.flex_grow(), style.flex_shrink()), (0.0, 0.0));
    }

    #[test]
    fn background_properties() {
        let resolver = PropertyResolver::new();
        let mut style = StyleModel::new();
        let changes = resolver
            .apply(
                &mut style,
                &[
                    decl("background-gradient", vec!["90", "red", "white", "blue"]),
                    decl("background-image", "url('tile.png')"),
                    decl("box-shadow", "1 2 4 black"),
                ],
            )
            .unwrap();
        let bg = style.background();
        assert_eq!(bg.angle, 90.0);
        let offsets: Vec<f32> = bg.stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
        assert_eq!(bg.image.as_deref(), Some("tile.png"));
        assert_eq!(bg.shadow.map(|s| s.blur), Some(4.0));
        assert!(!changes.needs_layout());
    }

    #[test]
    fn custom_handlers_can_be_registered() {
        let mut resolver = PropertyResolver::empty();
        assert!(!resolver.is_registered("size"));
        resolver.register("size", |s, v| {
            let n = number("size", v)?;
            s.set_width(n);
            s.set_height(n);
            Ok(())
        });
        let mut style = StyleModel::new();
        resolver.apply(&mut style, &[decl("SIZE", 8.0)]).unwrap();
        assert_eq!((style.width(), style.height()), (8.0, 8.0));
    }

    #[test]
    fn declarations_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Doc {
            decl: Vec<Declaration>,
        }
        let doc: Doc = toml::from_str(
            r#"
            [[decl]]
            name = "margin"
            value = [1, 2]

            [[decl]]
            name = "width"
            value = "auto"
            priority = "important"
            "#,
        )
        .unwrap();
        assert_eq!(
            doc.decl[0].value,
            PropertyValue::List(vec![PropertyValue::Number(1.0), PropertyValue::Number(2.0)])
        );
        assert_eq!(doc.decl[1].priority, Priority::Important);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        const NAMES: &[&str] = &[
            "layout",
            "margin",
            "margin-left",
            "padding",
            "padding-top",
            "border",
            "border-color",
            "border-radius",
            "width",
            "height",
            "position",
            "left",
            "flex",
            "flex-grow",
            "flex-basis",
            "background",
            "box-shadow",
            "font-variant",
        ];

        const KEYWORDS: &[&str] = &[
            "auto", "none", "hbox", "block", "absolute", "solid", "#336699", "red", "1 auto",
            "2 solid #000", "1 1 0", "2 2 4 #00000080", "bogus",
        ];

        fn value() -> impl Strategy<Value = PropertyValue> {
            prop_oneof![
                (-5i32..60).prop_map(|n| PropertyValue::Number(n as f32)),
                proptest::sample::select(KEYWORDS).prop_map(PropertyValue::from),
                proptest::collection::vec(0u32..20, 1..5).prop_map(|v| {
                    PropertyValue::from(v.into_iter().map(|n| n as f32).collect::<Vec<_>>())
                }),
            ]
        }

        fn declaration() -> impl Strategy<Value = Declaration> {
            (proptest::sample::select(NAMES), value(), any::<bool>()).prop_map(
                |(name, value, important)| {
                    let d = Declaration::new(name, value);
                    if important {
                        d.important()
                    } else {
                        d
                    }
                },
            )
        }

        proptest! {
            #[test]
            fn apply_is_idempotent(list in proptest::collection::vec(declaration(), 0..10)) {
                let resolver = PropertyResolver::new();
                let mut style = StyleModel::new();
                match resolver.apply(&mut style, &list) {
                    Ok(_) => {
                        let snapshot = style.values().clone();
                        let generation = style.generation();
                        let again = resolver.apply(&mut style, &list).unwrap();
                        prop_assert!(again.is_empty());
                        prop_assert_eq!(style.values(), &snapshot);
                        prop_assert_eq!(style.generation(), generation);
                    },
                    Err(_) => {
                        let fresh = StyleModel::new();
                        prop_assert_eq!(style.values(), fresh.values());
                        prop_assert_eq!(style.generation(), 0);
                    },
                }
            }
        }
    }
}
