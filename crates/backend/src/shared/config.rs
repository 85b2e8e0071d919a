use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,

    /// Откуда загружена конфигурация (None = встроенная)
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Seed built-in templates when no snapshot was loaded
    #[serde(default = "default_true")]
    pub seed_builtin: bool,
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub dir: String,
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_true() -> bool {
    true
}

fn default_filter() -> String {
    "info".into()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[store]
seed_builtin = true
snapshot_path = "target/data/templates.json"

[logging]
dir = "target/logs"
filter = "info,tower_http=warn"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// Tracing is not initialized yet when this runs, so messages go to stderr.
pub fn load_config() -> anyhow::Result<AppConfig> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");
            if config_path.exists() {
                return load_from_file(&config_path);
            }
            eprintln!("config.toml not found at: {}", config_path.display());
        }
    }

    parse(DEFAULT_CONFIG).context("embedded default config is invalid")
}

/// Load configuration from an explicit file
pub fn load_from_file(path: &Path) -> anyhow::Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut config =
        parse(&contents).with_context(|| format!("failed to parse {}", path.display()))?;
    config.source = Some(path.to_path_buf());
    Ok(config)
}

fn parse(contents: &str) -> anyhow::Result<AppConfig> {
    Ok(toml::from_str(contents)?)
}

impl AppConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Путь к файлу снимка шаблонов, если задан
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.store
            .snapshot_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(resolve_path)
    }

    pub fn log_dir(&self) -> PathBuf {
        resolve_path(&self.logging.dir)
    }
}

/// Resolves relative paths relative to the executable directory
pub fn resolve_path(path_str: &str) -> PathBuf {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    // Fallback: use relative to current directory
    PathBuf::from(path_str)
}
