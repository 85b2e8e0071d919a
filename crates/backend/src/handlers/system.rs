use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use super::a001_amenity_template::ApiError;
use crate::shared::app_state::AppState;
use crate::shared::data::snapshot;
use crate::shared::logger;

/// POST /api/system/snapshot
pub async fn save_snapshot(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(path) = state.config.snapshot_path() else {
        return Err((
            StatusCode::CONFLICT,
            Json(json!({ "error": "snapshot_path is not configured" })),
        ));
    };

    match snapshot::save_snapshot(&state.store, &path) {
        Ok(count) => {
            logger::log("snapshot", &format!("saved {} templates to {}", count, path.display()));
            Ok(Json(json!({ "path": path.display().to_string(), "count": count })))
        }
        Err(e) => {
            tracing::error!("snapshot failed: {:#}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            ))
        }
    }
}
