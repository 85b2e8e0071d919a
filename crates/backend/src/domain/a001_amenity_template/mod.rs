pub mod builtin;
pub mod catalog;
pub mod service;
pub mod store;

pub use catalog::TemplateFilter;
pub use store::{StoreError, TemplateStore};
