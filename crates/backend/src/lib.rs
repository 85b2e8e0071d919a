//! Amenity template backend: template store, catalog, form API over HTTP

pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
