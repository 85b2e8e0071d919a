pub mod a001_amenity_template;
pub mod categorize;
pub mod field_types;
pub mod system;
