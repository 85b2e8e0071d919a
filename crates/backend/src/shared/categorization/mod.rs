pub mod keyword;

use async_trait::async_trait;
use contracts::shared::categorization::Categorization;
use thiserror::Error;

pub use keyword::KeywordCategorizer;

/// Ошибки сервиса категоризации
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategorizationError {
    #[error("Nothing to categorize")]
    EmptyInput,

    #[error("Categorization service unavailable: {0}")]
    Unavailable(String),
}

/// Провайдер категорий для шаблонов удобств
#[async_trait]
pub trait CategorizationService: Send + Sync {
    /// Предложить категорию для свободного текста
    async fn classify(&self, text: &str) -> Result<Categorization, CategorizationError>;

    /// Название провайдера
    fn provider_name(&self) -> &str;
}
