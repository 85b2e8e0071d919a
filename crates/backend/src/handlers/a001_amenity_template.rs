use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::domain::a001_amenity_template::service::{self, CommitError};
use crate::domain::a001_amenity_template::{StoreError, TemplateFilter};
use crate::shared::app_state::AppState;
use contracts::domain::a001_amenity_template::{
    AmenityTemplate, AmenityTemplateId, CategoryCount, CommitRequest, CreateTemplateRequest,
    ListTemplatesQuery, RenderRequest, UpdateTemplateRequest, UsageResponse,
};
use contracts::domain::common::AggregateId;
use contracts::shared::form::{FieldDisplayModel, FieldViewModel};
use contracts::shared::metadata::ValueBag;

pub type ApiError = (StatusCode, Json<Value>);

fn error_body(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

fn store_error(e: StoreError) -> ApiError {
    let status = match &e {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::InvalidSpec(_) => StatusCode::BAD_REQUEST,
        StoreError::KeyConflict(_) | StoreError::StaleWrite { .. } => StatusCode::CONFLICT,
    };
    tracing::warn!(status = status.as_u16(), "amenity template request refused: {}", e);
    error_body(status, e.to_string())
}

fn parse_id(id: &str) -> Result<AmenityTemplateId, ApiError> {
    AmenityTemplateId::from_string(id).map_err(|e| error_body(StatusCode::BAD_REQUEST, e))
}

/// GET /api/amenity_template
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListTemplatesQuery>,
) -> Json<Vec<AmenityTemplate>> {
    Json(state.store.list(&TemplateFilter::from(query)))
}

/// GET /api/amenity_template/categories
pub async fn categories(State(state): State<AppState>) -> Json<Vec<CategoryCount>> {
    Json(state.store.categories())
}

/// POST /api/amenity_template
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<AmenityTemplate>), ApiError> {
    let template = service::create(&state.store, state.categorizer.as_ref(), request)
        .await
        .map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/amenity_template/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AmenityTemplate>, ApiError> {
    let id = parse_id(&id)?;
    state.store.get(id).map(Json).map_err(store_error)
}

/// PUT /api/amenity_template/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateTemplateRequest>,
) -> Result<Json<AmenityTemplate>, ApiError> {
    let id = parse_id(&id)?;
    state.store.update(id, patch).map(Json).map_err(store_error)
}

/// DELETE /api/amenity_template/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.store.remove(id).map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/amenity_template/:id/duplicate
pub async fn duplicate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<AmenityTemplate>), ApiError> {
    let id = parse_id(&id)?;
    let copy = state.store.duplicate(id).map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// POST /api/amenity_template/:id/usage
pub async fn record_usage(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UsageResponse>, ApiError> {
    let id = parse_id(&id)?;
    let usage_count = state.store.record_usage(id).map_err(store_error)?;
    Ok(Json(UsageResponse {
        id: id.as_string(),
        usage_count,
    }))
}

/// POST /api/amenity_template/:id/form
pub async fn render_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<Vec<FieldViewModel>>, ApiError> {
    let id = parse_id(&id)?;
    service::render_form(&state.store, id, &request.values)
        .map(Json)
        .map_err(store_error)
}

/// POST /api/amenity_template/:id/display
pub async fn render_display(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<Vec<FieldDisplayModel>>, ApiError> {
    let id = parse_id(&id)?;
    service::render_display(&state.store, id, &request)
        .map(Json)
        .map_err(store_error)
}

/// POST /api/amenity_template/:id/commit
///
/// 422 с полным списком ошибок валидации
pub async fn commit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CommitRequest>,
) -> Result<Json<ValueBag>, ApiError> {
    let id = parse_id(&id)?;
    match service::commit(&state.store, id, &request) {
        Ok(bag) => Ok(Json(bag)),
        Err(CommitError::Store(e)) => Err(store_error(e)),
        Err(CommitError::Invalid(errors)) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": errors })),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_amenity_template::TemplateStore;
    use crate::shared::categorization::KeywordCategorizer;
    use crate::shared::config::load_config;
    use contracts::shared::metadata::{FieldDefinition, FieldType, FieldValue, ValidationRules};
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(
            Arc::new(TemplateStore::new()),
            Arc::new(KeywordCategorizer::new()),
            load_config().unwrap(),
        )
    }

    fn laundry() -> CreateTemplateRequest {
        CreateTemplateRequest::new("Smart Laundry", "Connected washers and dryers").with_fields(
            vec![
                FieldDefinition::new("machineCount", "Machine Count", FieldType::Number)
                    .required()
                    .with_validation(ValidationRules::range(1.0, 40.0)),
                FieldDefinition::new("payment", "Payment", FieldType::Select)
                    .with_options(["Card", "App"]),
            ],
        )
    }

    async fn created(state: &AppState) -> AmenityTemplate {
        let (status, Json(template)) = create(State(state.clone()), Json(laundry()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        template
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let state = state();
        let template = created(&state).await;
        assert_eq!(template.category, "utilities");

        let Json(fetched) = get_by_id(State(state.clone()), Path(template.to_string_id()))
            .await
            .unwrap();
        assert_eq!(fetched, template);
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let state = state();
        let template = created(&state).await;

        let (status, _) = get_by_id(State(state.clone()), Path("nope".into()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing = AmenityTemplateId::new_v4().as_string();
        let (status, _) = delete(State(state.clone()), Path(missing)).await.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = create(
            State(state.clone()),
            Json(CreateTemplateRequest::new("", "No name")),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let stale = UpdateTemplateRequest {
            name: Some("Laundry".into()),
            expected_version: Some(5),
            ..Default::default()
        };
        let (status, _) = update(State(state.clone()), Path(template.to_string_id()), Json(stale))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_list_and_categories() {
        let state = state();
        created(&state).await;

        let query = ListTemplatesQuery {
            category: Some("recreation".into()),
            search: None,
        };
        let Json(recreation) = list(State(state.clone()), Query(query)).await;
        assert!(recreation.is_empty());

        let Json(all) = list(State(state.clone()), Query(ListTemplatesQuery::default())).await;
        assert_eq!(all.len(), 1);

        let Json(counts) = categories(State(state.clone())).await;
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].category, "utilities");
    }

    #[tokio::test]
    async fn test_usage_and_duplicate() {
        let state = state();
        let template = created(&state).await;

        let Json(usage) = record_usage(State(state.clone()), Path(template.to_string_id()))
            .await
            .unwrap();
        assert_eq!(usage.usage_count, 1);

        let (status, Json(copy)) = duplicate(State(state.clone()), Path(template.to_string_id()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(copy.usage_count, 0);
        assert_eq!(state.store.len(), 2);
    }

    #[tokio::test]
    async fn test_commit_returns_all_errors() {
        let state = state();
        let template = created(&state).await;

        let request: CommitRequest = serde_json::from_value(json!({
            "edits": { "machineCount": "0", "payment": "Coins" }
        }))
        .unwrap();
        let (status, Json(body)) = commit(State(state.clone()), Path(template.to_string_id()), Json(request))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let kinds: Vec<_> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["kind"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(kinds, vec!["outOfRange", "invalidOption"]);

        let request: CommitRequest = serde_json::from_value(json!({
            "edits": { "machineCount": "12", "payment": "Card" }
        }))
        .unwrap();
        let Json(bag) = commit(State(state.clone()), Path(template.to_string_id()), Json(request))
            .await
            .unwrap();
        assert_eq!(bag.get("machineCount"), Some(&FieldValue::Number(12.0)));
        assert_eq!(bag.get("payment"), Some(&FieldValue::Text("Card".into())));
    }

    #[tokio::test]
    async fn test_render_form_and_display() {
        let state = state();
        let template = created(&state).await;
        let values: ValueBag = [("machineCount".to_string(), FieldValue::Number(12.0))]
            .into_iter()
            .collect();
        let request = RenderRequest {
            values,
            revealed: Vec::new(),
        };

        let Json(form) = render_form(
            State(state.clone()),
            Path(template.to_string_id()),
            Json(request.clone()),
        )
        .await
        .unwrap();
        assert_eq!(form.len(), 2);
        assert!(form[0].validation_error.is_none());

        let Json(display) = render_display(State(state.clone()), Path(template.to_string_id()), Json(request))
            .await
            .unwrap();
        assert_eq!(display[0].display, "12");
        assert!(!display[1].has_value);
    }
}
