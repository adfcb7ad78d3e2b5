//! Per-view box-model style state.
//!
//! A [`StyleModel`] is owned by exactly one view and is mutated only
//! through its setters. Every setter call fires exactly one change
//! notification: the generation counter is bumped and the dirty bit is
//! raised. The layout driver polls the dirty bit while walking the tree
//! instead of receiving callbacks, so no setter can re-enter a layout pass.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use weft_types::{Color, EdgeSizes, GradientStop, StyleError};

use crate::value::{Edges, StyleValue};

// -------------------------------------------------------------------
// Sub-models
// -------------------------------------------------------------------

/// How a view places its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Children carry explicit positions.
    #[default]
    None,
    /// Children stacked vertically at full width.
    Block,
    /// Inline flow with line breaking.
    Line,
    /// Vertical flex.
    Vbox,
    /// Horizontal flex.
    Hbox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderStyle {
    #[default]
    None,
    Solid,
}

/// One side of a border.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BorderSide {
    pub style: BorderStyle,
    pub width: f32,
    pub color: Color,
}

impl BorderSide {
    pub fn solid(width: f32, color: Color) -> Self {
        Self {
            style: BorderStyle::Solid,
            width,
            color,
        }
    }

    /// Width that takes up layout space: zero unless solid.
    pub fn used_width(&self) -> f32 {
        match self.style {
            BorderStyle::None => 0.0,
            BorderStyle::Solid => self.width,
        }
    }
}

/// Margins, border, padding and content size.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxModel {
    pub margin: Edges<StyleValue>,
    pub border: Edges<BorderSide>,
    /// Corner radii: top-left, top-right, bottom-left, bottom-right.
    pub border_radius: [f32; 4],
    pub padding: Edges<f32>,
    pub width: StyleValue,
    pub height: StyleValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionMode {
    #[default]
    Static,
    Absolute,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionModel {
    pub mode: PositionMode,
    pub left: StyleValue,
    pub top: StyleValue,
    pub right: StyleValue,
    pub bottom: StyleValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlexModel {
    pub grow: f32,
    pub shrink: f32,
    pub basis: StyleValue,
}

impl Default for FlexModel {
    fn default() -> Self {
        Self {
            grow: 0.0,
            shrink: 1.0,
            basis: StyleValue::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxShadow {
    pub inset: bool,
    pub color: Color,
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
    pub spread: f32,
}

/// What the background of a box is filled with.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundFill<'a> {
    None,
    Solid(Color),
    Gradient { angle: f32, stops: &'a [GradientStop] },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BackgroundModel {
    pub color: Color,
    /// Sorted ascending by offset.
    pub stops: Vec<GradientStop>,
    pub angle: f32,
    pub image: Option<String>,
    pub shadow: Option<BoxShadow>,
}

impl BackgroundModel {
    /// The fill to paint. Fewer than two gradient stops falls back to the
    /// flat color.
    pub fn fill(&self) -> BackgroundFill<'_> {
        if self.stops.len() >= 2 {
            BackgroundFill::Gradient {
                angle: self.angle,
                stops: &self.stops,
            }
        } else if self.color.is_transparent() {
            BackgroundFill::None
        } else {
            BackgroundFill::Solid(self.color)
        }
    }
}

// -------------------------------------------------------------------
// Change tracking
// -------------------------------------------------------------------

/// A group of style fields, used to report what a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleField {
    Layout,
    Margin,
    Border,
    BorderRadius,
    Padding,
    Width,
    Height,
    Position,
    Flex,
    Background,
}

impl StyleField {
    /// Whether a change to this field can move or resize anything.
    /// Paint-only fields just need a repaint.
    pub fn affects_layout(self) -> bool {
        !matches!(self, StyleField::BorderRadius | StyleField::Background)
    }
}

/// The set of fields that changed.
pub type ChangedFields = BTreeSet<StyleField>;

/// All style state of one view, without notification bookkeeping.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleValues {
    pub layout: LayoutMode,
    pub box_model: BoxModel,
    pub position: PositionModel,
    pub flex: FlexModel,
    pub background: BackgroundModel,
}

impl StyleValues {
    /// Fields whose value differs between `self` and `other`.
    pub fn diff(&self, other: &StyleValues) -> ChangedFields {
        let mut changed = ChangedFields::new();
        let (a, b) = (&self.box_model, &other.box_model);
        let checks = [
            (self.layout != other.layout, StyleField::Layout),
            (a.margin != b.margin, StyleField::Margin),
            (a.border != b.border, StyleField::Border),
            (a.border_radius != b.border_radius, StyleField::BorderRadius),
            (a.padding != b.padding, StyleField::Padding),
            (a.width != b.width, StyleField::Width),
            (a.height != b.height, StyleField::Height),
            (self.position != other.position, StyleField::Position),
            (self.flex != other.flex, StyleField::Flex),
            (self.background != other.background, StyleField::Background),
        ];
        for (differs, field) in checks {
            if differs {
                changed.insert(field);
            }
        }
        changed
    }
}

// -------------------------------------------------------------------
// StyleModel
// -------------------------------------------------------------------

/// Box-model style of a single view.
#[derive(Debug, Clone, Default)]
pub struct StyleModel {
    values: StyleValues,
    generation: u64,
    dirty: bool,
}

impl StyleModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &StyleValues {
        &self.values
    }

    /// Number of change notifications fired so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty bit, returning whether it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn changed(&mut self) {
        self.generation += 1;
        self.dirty = true;
    }

    /// Apply a closure to the values and fire one notification.
    fn update(&mut self, f: impl FnOnce(&mut StyleValues)) {
        f(&mut self.values);
        self.changed();
    }

    /// Replace all values at once, firing a single notification if
    /// anything differs. Returns the fields that changed.
    pub fn replace(&mut self, values: StyleValues) -> ChangedFields {
        let changed = self.values.diff(&values);
        if !changed.is_empty() {
            self.values = values;
            self.changed();
        }
        changed
    }

    // -- Layout mode ---------------------------------------------------

    pub fn set_layout(&mut self, mode: LayoutMode) {
        self.update(|v| v.layout = mode);
    }

    pub fn set_layout_none(&mut self) {
        self.set_layout(LayoutMode::None);
    }

    pub fn set_layout_block(&mut self) {
        self.set_layout(LayoutMode::Block);
    }

    pub fn set_layout_line(&mut self) {
        self.set_layout(LayoutMode::Line);
    }

    pub fn set_layout_vbox(&mut self) {
        self.set_layout(LayoutMode::Vbox);
    }

    pub fn set_layout_hbox(&mut self) {
        self.set_layout(LayoutMode::Hbox);
    }

    pub fn layout(&self) -> LayoutMode {
        self.values.layout
    }

    pub fn is_layout_none(&self) -> bool {
        self.values.layout == LayoutMode::None
    }

    pub fn is_layout_block(&self) -> bool {
        self.values.layout == LayoutMode::Block
    }

    pub fn is_layout_line(&self) -> bool {
        self.values.layout == LayoutMode::Line
    }

    pub fn is_layout_vbox(&self) -> bool {
        self.values.layout == LayoutMode::Vbox
    }

    pub fn is_layout_hbox(&self) -> bool {
        self.values.layout == LayoutMode::Hbox
    }

    // -- Flex ----------------------------------------------------------

    pub fn set_flex_grow(&mut self, grow: f32) {
        self.update(|v| v.flex.grow = grow);
    }

    pub fn set_flex_shrink(&mut self, shrink: f32) {
        self.update(|v| v.flex.shrink = shrink);
    }

    pub fn set_flex_basis_auto(&mut self) {
        self.update(|v| v.flex.basis = StyleValue::Auto);
    }

    pub fn set_flex_basis(&mut self, basis: f32) {
        self.update(|v| v.flex.basis = StyleValue::Length(basis));
    }

    /// Grow and shrink factors with an automatic basis.
    pub fn set_flex(&mut self, grow: f32, shrink: f32) {
        self.update(|v| {
            v.flex = FlexModel {
                grow,
                shrink,
                basis: StyleValue::Auto,
            }
        });
    }

    pub fn set_flex_with_basis(&mut self, grow: f32, shrink: f32, basis: f32) {
        self.update(|v| {
            v.flex = FlexModel {
                grow,
                shrink,
                basis: StyleValue::Length(basis),
            }
        });
    }

    /// Neither grow nor shrink.
    pub fn set_flex_none(&mut self) {
        self.update(|v| {
            v.flex = FlexModel {
                grow: 0.0,
                shrink: 0.0,
                basis: StyleValue::Auto,
            }
        });
    }

    pub fn flex_grow(&self) -> f32 {
        self.values.flex.grow
    }

    pub fn flex_shrink(&self) -> f32 {
        self.values.flex.shrink
    }

    pub fn is_flex_basis_auto(&self) -> bool {
        self.values.flex.basis.is_auto()
    }

    pub fn flex_basis(&self) -> f32 {
        self.values.flex.basis.resolve()
    }

    // -- Background ----------------------------------------------------

    pub fn set_background_none(&mut self) {
        self.update(|v| v.background = BackgroundModel::default());
    }

    pub fn set_background(&mut self, color: Color) {
        self.update(|v| v.background.color = color);
    }

    pub fn set_background_gradient_to_bottom(&mut self, top: Color, bottom: Color) {
        self.set_background_gradient(
            180.0,
            vec![GradientStop::new(top, 0.0), GradientStop::new(bottom, 1.0)],
        );
    }

    /// Set a linear gradient. Stop offsets are clamped to `[0, 1]` and
    /// sorted ascending.
    pub fn set_background_gradient(&mut self, angle: f32, mut stops: Vec<GradientStop>) {
        for stop in &mut stops {
            stop.offset = stop.offset.clamp(0.0, 1.0);
        }
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        self.update(|v| {
            v.background.stops = stops;
            v.background.angle = angle;
        });
    }

    pub fn set_background_image(&mut self, url: impl Into<String>) {
        let url = url.into();
        self.update(|v| v.background.image = Some(url));
    }

    pub fn set_box_shadow(&mut self, color: Color, x: f32, y: f32, blur: f32) {
        self.update(|v| {
            v.background.shadow = Some(BoxShadow {
                inset: false,
                color,
                offset_x: x,
                offset_y: y,
                blur,
                spread: 0.0,
            })
        });
    }

    pub fn background(&self) -> &BackgroundModel {
        &self.values.background
    }

    // -- Margin --------------------------------------------------------

    pub fn set_margin(&mut self, edges: impl Into<Edges<f32>>) {
        let edges = edges.into();
        self.update(|v| v.box_model.margin = edges.into());
    }

    /// Set margin from a 1/2/4-value shorthand, rejecting other counts and
    /// negative lengths without touching the model.
    pub fn try_set_margin(&mut self, values: &[f32]) -> Result<(), StyleError> {
        let edges = Edges::from_shorthand("margin", values)?;
        reject_negative("margin", values)?;
        self.set_margin(edges);
        Ok(())
    }

    /// Set every margin edge, allowing `auto`.
    pub fn set_margin_values(&mut self, edges: Edges<StyleValue>) {
        self.update(|v| v.box_model.margin = edges);
    }

    pub fn set_margin_left(&mut self, value: StyleValue) {
        self.update(|v| v.box_model.margin.left = value);
    }

    pub fn set_margin_top(&mut self, value: StyleValue) {
        self.update(|v| v.box_model.margin.top = value);
    }

    pub fn set_margin_right(&mut self, value: StyleValue) {
        self.update(|v| v.box_model.margin.right = value);
    }

    pub fn set_margin_bottom(&mut self, value: StyleValue) {
        self.update(|v| v.box_model.margin.bottom = value);
    }

    pub fn is_margin_left_auto(&self) -> bool {
        self.values.box_model.margin.left.is_auto()
    }

    pub fn is_margin_top_auto(&self) -> bool {
        self.values.box_model.margin.top.is_auto()
    }

    pub fn is_margin_right_auto(&self) -> bool {
        self.values.box_model.margin.right.is_auto()
    }

    pub fn is_margin_bottom_auto(&self) -> bool {
        self.values.box_model.margin.bottom.is_auto()
    }

    pub fn margin_left(&self) -> f32 {
        self.values.box_model.margin.left.resolve()
    }

    pub fn margin_top(&self) -> f32 {
        self.values.box_model.margin.top.resolve()
    }

    pub fn margin_right(&self) -> f32 {
        self.values.box_model.margin.right.resolve()
    }

    pub fn margin_bottom(&self) -> f32 {
        self.values.box_model.margin.bottom.resolve()
    }

    /// Resolved margins, `auto` counting as zero.
    pub fn margin(&self) -> EdgeSizes {
        self.values.box_model.margin.resolved()
    }

    // -- Border --------------------------------------------------------

    /// Solid border of `color` with the given widths.
    pub fn set_border(&mut self, color: Color, widths: impl Into<Edges<f32>>) {
        let widths = widths.into();
        self.update(|v| v.box_model.border = widths.map(|w| BorderSide::solid(w, color)));
    }

    pub fn try_set_border(&mut self, color: Color, widths: &[f32]) -> Result<(), StyleError> {
        let edges = Edges::from_shorthand("border-width", widths)?;
        reject_negative("border-width", widths)?;
        self.set_border(color, edges);
        Ok(())
    }

    pub fn set_border_sides(&mut self, sides: Edges<BorderSide>) {
        self.update(|v| v.box_model.border = sides);
    }

    pub fn set_border_none(&mut self) {
        self.update(|v| v.box_model.border = Edges::default());
    }

    pub fn set_border_radius(&mut self, radius: f32) {
        self.set_border_radii(radius, radius, radius, radius);
    }

    pub fn set_border_radii(
        &mut self,
        top_left: f32,
        top_right: f32,
        bottom_left: f32,
        bottom_right: f32,
    ) {
        self.update(|v| {
            v.box_model.border_radius = [top_left, top_right, bottom_left, bottom_right]
        });
    }

    pub fn is_border_left_solid(&self) -> bool {
        self.values.box_model.border.left.style == BorderStyle::Solid
    }

    pub fn is_border_top_solid(&self) -> bool {
        self.values.box_model.border.top.style == BorderStyle::Solid
    }

    pub fn is_border_right_solid(&self) -> bool {
        self.values.box_model.border.right.style == BorderStyle::Solid
    }

    pub fn is_border_bottom_solid(&self) -> bool {
        self.values.box_model.border.bottom.style == BorderStyle::Solid
    }

    pub fn border_left(&self) -> f32 {
        self.values.box_model.border.left.used_width()
    }

    pub fn border_top(&self) -> f32 {
        self.values.box_model.border.top.used_width()
    }

    pub fn border_right(&self) -> f32 {
        self.values.box_model.border.right.used_width()
    }

    pub fn border_bottom(&self) -> f32 {
        self.values.box_model.border.bottom.used_width()
    }

    pub fn border_sides(&self) -> &Edges<BorderSide> {
        &self.values.box_model.border
    }

    pub fn border_radius(&self) -> [f32; 4] {
        self.values.box_model.border_radius
    }

    /// Border widths that take up space.
    pub fn border(&self) -> EdgeSizes {
        self.values
            .box_model
            .border
            .map(|side| side.used_width())
            .to_edge_sizes()
    }

    // -- Padding -------------------------------------------------------

    pub fn set_padding(&mut self, edges: impl Into<Edges<f32>>) {
        let edges = edges.into();
        self.update(|v| v.box_model.padding = edges);
    }

    pub fn try_set_padding(&mut self, values: &[f32]) -> Result<(), StyleError> {
        let edges = Edges::from_shorthand("padding", values)?;
        reject_negative("padding", values)?;
        self.set_padding(edges);
        Ok(())
    }

    pub fn padding_left(&self) -> f32 {
        self.values.box_model.padding.left
    }

    pub fn padding_top(&self) -> f32 {
        self.values.box_model.padding.top
    }

    pub fn padding_right(&self) -> f32 {
        self.values.box_model.padding.right
    }

    pub fn padding_bottom(&self) -> f32 {
        self.values.box_model.padding.bottom
    }

    pub fn padding(&self) -> EdgeSizes {
        self.values.box_model.padding.to_edge_sizes()
    }

    // -- Content size --------------------------------------------------

    pub fn set_width(&mut self, width: f32) {
        self.update(|v| v.box_model.width = StyleValue::Length(width));
    }

    pub fn set_width_auto(&mut self) {
        self.update(|v| v.box_model.width = StyleValue::Auto);
    }

    pub fn set_height(&mut self, height: f32) {
        self.update(|v| v.box_model.height = StyleValue::Length(height));
    }

    pub fn set_height_auto(&mut self) {
        self.update(|v| v.box_model.height = StyleValue::Auto);
    }

    pub fn is_width_auto(&self) -> bool {
        self.values.box_model.width.is_auto()
    }

    pub fn is_height_auto(&self) -> bool {
        self.values.box_model.height.is_auto()
    }

    pub fn width(&self) -> f32 {
        self.values.box_model.width.resolve()
    }

    pub fn height(&self) -> f32 {
        self.values.box_model.height.resolve()
    }

    /// Margin + border + padding on every side.
    pub fn outer_edges(&self) -> EdgeSizes {
        self.margin() + self.border() + self.padding()
    }

    // -- Position ------------------------------------------------------

    pub fn set_position(&mut self, mode: PositionMode) {
        self.update(|v| v.position.mode = mode);
    }

    pub fn set_static(&mut self) {
        self.set_position(PositionMode::Static);
    }

    pub fn set_absolute(&mut self) {
        self.set_position(PositionMode::Absolute);
    }

    pub fn set_fixed(&mut self) {
        self.set_position(PositionMode::Fixed);
    }

    pub fn set_left(&mut self, value: StyleValue) {
        self.update(|v| v.position.left = value);
    }

    pub fn set_top(&mut self, value: StyleValue) {
        self.update(|v| v.position.top = value);
    }

    pub fn set_right(&mut self, value: StyleValue) {
        self.update(|v| v.position.right = value);
    }

    pub fn set_bottom(&mut self, value: StyleValue) {
        self.update(|v| v.position.bottom = value);
    }

    pub fn position(&self) -> &PositionModel {
        &self.values.position
    }

    pub fn is_static(&self) -> bool {
        self.values.position.mode == PositionMode::Static
    }

    pub fn is_absolute(&self) -> bool {
        self.values.position.mode == PositionMode::Absolute
    }

    pub fn is_fixed(&self) -> bool {
        self.values.position.mode == PositionMode::Fixed
    }

    pub fn is_left_auto(&self) -> bool {
        self.values.position.left.is_auto()
    }

    pub fn is_top_auto(&self) -> bool {
        self.values.position.top.is_auto()
    }

    pub fn is_right_auto(&self) -> bool {
        self.values.position.right.is_auto()
    }

    pub fn is_bottom_auto(&self) -> bool {
        self.values.position.bottom.is_auto()
    }

    pub fn left(&self) -> f32 {
        self.values.position.left.resolve()
    }

    pub fn top(&self) -> f32 {
        self.values.position.top.resolve()
    }

    pub fn right(&self) -> f32 {
        self.values.position.right.resolve()
    }

    pub fn bottom(&self) -> f32 {
        self.values.position.bottom.resolve()
    }
}

fn reject_negative(property: &str, values: &[f32]) -> Result<(), StyleError> {
    match values.iter().copied().find(|v| *v < 0.0) {
        Some(value) => Err(StyleError::NegativeLength {
            property: property.to_string(),
            value,
        }),
        None => Ok(()),
    }
}
