use axum::{extract::State, http::StatusCode, Json};
use contracts::shared::categorization::{CategorizeRequest, Categorization};

use super::a001_amenity_template::ApiError;
use crate::shared::app_state::AppState;
use crate::shared::categorization::CategorizationError;

/// POST /api/categorize
pub async fn categorize(
    State(state): State<AppState>,
    Json(request): Json<CategorizeRequest>,
) -> Result<Json<Categorization>, ApiError> {
    match state.categorizer.classify(&request.text).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            let status = match e {
                CategorizationError::EmptyInput => StatusCode::BAD_REQUEST,
                CategorizationError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            };
            tracing::warn!(provider = state.categorizer.provider_name(), "categorization failed: {}", e);
            Err((status, Json(serde_json::json!({ "error": e.to_string() }))))
        }
    }
}
