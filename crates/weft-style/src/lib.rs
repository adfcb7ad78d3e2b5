//! Box-model style state for weft views.
//!
//! [`StyleModel`] holds the margins, border, padding, content size,
//! positioning, flex factors and background of a single view.
//! [`PropertyResolver`] turns an already-parsed declaration list into
//! setter calls on a model and reports which fields changed.

pub mod model;
pub mod resolver;
pub mod value;

pub use model::{
    BackgroundFill, BackgroundModel, BorderSide, BorderStyle, BoxModel, BoxShadow, ChangedFields,
    FlexModel, LayoutMode, PositionMode, PositionModel, StyleField, StyleModel, StyleValues,
};
pub use resolver::{
    ChangeSet, Declaration, Priority, PropertyHandler, PropertyResolver, PropertyValue,
};
pub use value::{Edges, StyleValue};
pub use weft_types::StyleError;
