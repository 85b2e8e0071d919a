use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::shared::app_state::AppState;
use crate::shared::logger;

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // AMENITY TEMPLATES
        // ========================================
        .route(
            "/api/amenity_template",
            get(handlers::a001_amenity_template::list).post(handlers::a001_amenity_template::create),
        )
        .route(
            "/api/amenity_template/categories",
            get(handlers::a001_amenity_template::categories),
        )
        .route(
            "/api/amenity_template/:id",
            get(handlers::a001_amenity_template::get_by_id)
                .put(handlers::a001_amenity_template::update)
                .delete(handlers::a001_amenity_template::delete),
        )
        .route(
            "/api/amenity_template/:id/duplicate",
            post(handlers::a001_amenity_template::duplicate),
        )
        .route(
            "/api/amenity_template/:id/usage",
            post(handlers::a001_amenity_template::record_usage),
        )
        // Forms
        .route(
            "/api/amenity_template/:id/form",
            post(handlers::a001_amenity_template::render_form),
        )
        .route(
            "/api/amenity_template/:id/display",
            post(handlers::a001_amenity_template::render_display),
        )
        .route(
            "/api/amenity_template/:id/commit",
            post(handlers::a001_amenity_template::commit),
        )
        // ========================================
        // METADATA & SERVICES
        // ========================================
        .route("/api/field_types", get(handlers::field_types::list))
        .route("/api/categorize", post(handlers::categorize::categorize))
        .route("/api/system/snapshot", post(handlers::system::save_snapshot))
        .layer(middleware::from_fn(logger::request_logger))
        .with_state(state)
}
