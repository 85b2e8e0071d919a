//! Aggregates of the amenity template engine

pub mod a001_amenity_template;
pub mod common;
