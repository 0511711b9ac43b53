//! Person form: model, validation and the inputs shared by add and edit.

mod edit;
mod fields;
mod model;
mod occupations;

pub use edit::EditPersonOverlay;
pub use fields::PersonFields;
pub use model::{FormMode, PersonForm};
