//! Editable and read-only form rendering for amenity templates

mod renderer;
mod view_model;

pub use renderer::{commit, render_editable, render_read_only, SECRET_MASK};
pub use view_model::{FieldDisplayModel, FieldViewModel};
