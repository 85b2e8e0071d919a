pub mod categorization;
pub mod form;
pub mod metadata;
