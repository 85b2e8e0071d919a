use std::sync::Arc;

use super::categorization::CategorizationService;
use super::config::AppConfig;
use crate::domain::a001_amenity_template::TemplateStore;

/// Общее состояние для axum-обработчиков
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TemplateStore>,
    pub categorizer: Arc<dyn CategorizationService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<TemplateStore>,
        categorizer: Arc<dyn CategorizationService>,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            categorizer,
            config: Arc::new(config),
        }
    }
}
