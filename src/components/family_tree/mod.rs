//! Canvas family tree: record transform, tidy layout, view state and drawing.

mod component;
mod interaction;
mod layout;
mod render;
mod state;
mod transform;
mod types;

pub use component::FamilyTreeCanvas;
pub use transform::{CanvasTextMeasure, transform_forest};
