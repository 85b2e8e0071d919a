use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, Method};
use backend::domain::a001_amenity_template::{builtin, TemplateStore};
use backend::routes::configure_routes;
use backend::shared::app_state::AppState;
use backend::shared::categorization::KeywordCategorizer;
use backend::shared::data::snapshot;
use backend::shared::{config, logger};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load_config()?;
    logger::init_tracing(&config)?;

    match &config.source {
        Some(path) => tracing::info!("Loaded config from: {}", path.display()),
        None => tracing::info!("Using default embedded configuration"),
    }

    let store = Arc::new(TemplateStore::new());
    let restored = match config.snapshot_path() {
        Some(path) => snapshot::restore_from(&store, &path)?,
        None => None,
    };
    match restored {
        Some(count) => tracing::info!(count, "templates restored from snapshot"),
        None if config.store.seed_builtin => {
            builtin::seed(&store).context("failed to seed built-in templates")?;
        }
        None => tracing::info!("starting with an empty template store"),
    }

    let state = AppState::new(store, Arc::new(KeywordCategorizer::new()), config.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = configure_routes(state).layer(cors);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    logger::log("startup", &format!("Server listening on http://{}", addr));

    axum::serve(listener, app).await?;
    Ok(())
}
