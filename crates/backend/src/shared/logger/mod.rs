//! Логирование: инициализация tracing, журнал запросов и события приложения

use std::time::Instant;

use anyhow::Context;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::AppConfig;

const LOG_FILE_NAME: &str = "backend.log";

/// Инициализация tracing: консоль + файл (без ANSI)
///
/// Фильтр берется из RUST_LOG, иначе из конфигурации.
pub fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log dir {}", log_dir.display()))?;

    let log_file_path = log_dir.join(LOG_FILE_NAME);
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .with_context(|| format!("failed to open {}", log_file_path.display()))?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.filter.clone());

    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .try_init()
        .context("tracing subscriber already installed")?;

    Ok(())
}

/// Логирование события на сервере
///
/// # Примеры
/// ```ignore
/// logger::log("startup", "Сервер запущен");
/// logger::log("snapshot", "Снимок шаблонов сохранен");
/// ```
pub fn log(category: &str, message: &str) {
    tracing::info!(target: "app_event", category, "{}", message);
}

/// Простой middleware для логирования запросов
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Читаем тело ответа, чтобы узнать реальный размер
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(
                %method,
                %path,
                status = parts.status.as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "failed to read response body: {}",
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let status = parts.status.as_u16();
    let elapsed_ms = start.elapsed().as_millis() as u64;
    let size = format_size(bytes.len());
    if parts.status.is_server_error() {
        tracing::error!(%method, %path, status, elapsed_ms, %size, "request");
    } else if parts.status.is_client_error() {
        tracing::warn!(%method, %path, status, elapsed_ms, %size, "request");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, %size, "request");
    }

    Response::from_parts(parts, Body::from(bytes))
}

/// Размер с разделителями триад: 1234567 -> "1.234.567"
fn format_size(n: usize) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0");
        assert_eq!(format_size(999), "999");
        assert_eq!(format_size(1000), "1.000");
        assert_eq!(format_size(1234567), "1.234.567");
    }
}
