use std::collections::HashSet;

use contracts::domain::a001_amenity_template::{
    AmenityTemplate, AmenityTemplateId, CommitRequest, CreateTemplateRequest, RenderRequest,
};
use contracts::shared::form::{self, FieldDisplayModel, FieldViewModel};
use contracts::shared::metadata::{ValidationError, ValueBag};
use thiserror::Error;

use super::store::{StoreError, TemplateStore};
use crate::shared::categorization::CategorizationService;

/// Почему не удалось применить правки формы
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommitError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<ValidationError>),
}

/// Создание шаблона; пустая категория подбирается категоризатором
pub async fn create(
    store: &TemplateStore,
    categorizer: &dyn CategorizationService,
    mut request: CreateTemplateRequest,
) -> Result<AmenityTemplate, StoreError> {
    if request.category.trim().is_empty() {
        let text = format!("{} {}", request.name, request.description);
        match categorizer.classify(&text).await {
            Ok(suggestion) => {
                tracing::debug!(
                    provider = categorizer.provider_name(),
                    category = %suggestion.category,
                    confidence = suggestion.confidence,
                    "category suggested"
                );
                request.category = suggestion.category;
            }
            Err(e) => {
                // Store подставит категорию по умолчанию
                tracing::warn!(provider = categorizer.provider_name(), "categorization failed: {}", e);
            }
        }
    }

    store.create(request)
}

/// Редактируемая форма для шаблона и текущих значений
pub fn render_form(
    store: &TemplateStore,
    id: AmenityTemplateId,
    values: &ValueBag,
) -> Result<Vec<FieldViewModel>, StoreError> {
    let template = store.get(id)?;
    Ok(form::render_editable(&template, values))
}

/// Просмотр значений (секреты скрыты, кроме раскрытых)
pub fn render_display(
    store: &TemplateStore,
    id: AmenityTemplateId,
    request: &RenderRequest,
) -> Result<Vec<FieldDisplayModel>, StoreError> {
    let template = store.get(id)?;
    let revealed: HashSet<String> = request.revealed.iter().cloned().collect();
    Ok(form::render_read_only(&template, &request.values, &revealed))
}

/// Применить правки формы к набору значений
pub fn commit(
    store: &TemplateStore,
    id: AmenityTemplateId,
    request: &CommitRequest,
) -> Result<ValueBag, CommitError> {
    let template = store.get(id)?;
    form::commit(&template, &request.values, &request.edits).map_err(|errors| {
        tracing::debug!(template_id = %id, errors = errors.len(), "commit refused");
        CommitError::Invalid(errors)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::categorization::{CategorizationError, KeywordCategorizer};
    use async_trait::async_trait;
    use contracts::shared::categorization::Categorization;
    use contracts::shared::metadata::{FieldDefinition, FieldType, FieldValue, ValidationRules};
    use serde_json::json;

    struct OfflineCategorizer;

    #[async_trait]
    impl CategorizationService for OfflineCategorizer {
        async fn classify(&self, _text: &str) -> Result<Categorization, CategorizationError> {
            Err(CategorizationError::Unavailable("offline".into()))
        }

        fn provider_name(&self) -> &str {
            "offline"
        }
    }

    fn laundry_request() -> CreateTemplateRequest {
        CreateTemplateRequest::new("Smart Laundry", "Connected washers and dryers").with_fields(
            vec![FieldDefinition::new("machineCount", "Machine Count", FieldType::Number)
                .required()
                .with_validation(ValidationRules::range(1.0, 40.0))],
        )
    }

    #[tokio::test]
    async fn test_create_suggests_category() {
        let store = TemplateStore::new();
        let template = create(&store, &KeywordCategorizer::new(), laundry_request())
            .await
            .unwrap();
        assert_eq!(template.category, "utilities");
    }

    #[tokio::test]
    async fn test_create_keeps_explicit_category() {
        let store = TemplateStore::new();
        let request = laundry_request().with_category("recreation");
        let template = create(&store, &KeywordCategorizer::new(), request)
            .await
            .unwrap();
        assert_eq!(template.category, "recreation");
    }

    #[tokio::test]
    async fn test_create_falls_back_when_categorizer_fails() {
        let store = TemplateStore::new();
        let template = create(&store, &OfflineCategorizer, laundry_request())
            .await
            .unwrap();
        assert_eq!(template.category, "general");
    }

    #[tokio::test]
    async fn test_commit_smart_laundry() {
        let store = TemplateStore::new();
        let template = create(&store, &KeywordCategorizer::new(), laundry_request())
            .await
            .unwrap();

        let request = CommitRequest {
            values: ValueBag::new(),
            edits: [("machineCount".to_string(), json!("12"))].into_iter().collect(),
        };
        let bag = commit(&store, template.id(), &request).unwrap();
        assert_eq!(bag.get("machineCount"), Some(&FieldValue::Number(12.0)));

        let invalid = CommitRequest {
            values: ValueBag::new(),
            edits: [("machineCount".to_string(), json!("0"))].into_iter().collect(),
        };
        match commit(&store, template.id(), &invalid) {
            Err(CommitError::Invalid(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(matches!(errors[0], ValidationError::OutOfRange { .. }));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_render_unknown_template() {
        let store = TemplateStore::new();
        let missing = AmenityTemplateId::new_v4();
        assert_eq!(
            render_form(&store, missing, &ValueBag::new()),
            Err(StoreError::NotFound(missing))
        );
        assert_eq!(
            commit(&store, missing, &CommitRequest::default()),
            Err(CommitError::Store(StoreError::NotFound(missing)))
        );
    }
}
