//! Shared types for the amenity template engine: field metadata, validation,
//! the template aggregate and form rendering. No I/O lives here.

pub mod domain;
pub mod shared;
