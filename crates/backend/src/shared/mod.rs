pub mod app_state;
pub mod categorization;
pub mod config;
pub mod data;
pub mod logger;
