use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use contracts::domain::a001_amenity_template::AmenityTemplate;
use serde::{Deserialize, Serialize};

use crate::domain::a001_amenity_template::TemplateStore;

/// Снимок всех шаблонов в JSON-файле
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSnapshot {
    pub exported_at: DateTime<Utc>,
    pub templates: Vec<AmenityTemplate>,
}

/// Записать снимок хранилища; возвращает количество шаблонов
pub fn save_snapshot(store: &TemplateStore, path: &Path) -> anyhow::Result<usize> {
    let snapshot = TemplateSnapshot {
        exported_at: Utc::now(),
        templates: store.snapshot(),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(&snapshot)?;
    // Пишем во временный файл и переименовываем, чтобы не оставить обрезанный снимок
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json)
        .with_context(|| format!("failed to write {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to move snapshot to {}", path.display()))?;

    tracing::info!(path = %path.display(), count = snapshot.templates.len(), "snapshot saved");
    Ok(snapshot.templates.len())
}

/// Прочитать снимок; None, если файла нет
pub fn load_snapshot(path: &Path) -> anyhow::Result<Option<TemplateSnapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let snapshot: TemplateSnapshot = serde_json::from_str(&contents)
        .with_context(|| format!("invalid snapshot {}", path.display()))?;
    Ok(Some(snapshot))
}

/// Загрузить снимок в хранилище; возвращает количество шаблонов или None
pub fn restore_from(store: &TemplateStore, path: &Path) -> anyhow::Result<Option<usize>> {
    let Some(snapshot) = load_snapshot(path)? else {
        return Ok(None);
    };
    let count = store
        .restore(snapshot.templates)
        .with_context(|| format!("snapshot {} rejected", path.display()))?;
    Ok(Some(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_amenity_template::builtin;
    use std::path::PathBuf;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("amenity-snapshot-{}", uuid::Uuid::new_v4()))
            .join("templates.json")
    }

    #[test]
    fn test_save_and_restore() {
        let path = temp_path();
        let store = TemplateStore::new();
        builtin::seed(&store).unwrap();

        assert_eq!(save_snapshot(&store, &path).unwrap(), 6);

        let restored = TemplateStore::new();
        assert_eq!(restore_from(&restored, &path).unwrap(), Some(6));
        assert_eq!(restored.snapshot(), store.snapshot());

        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).unwrap();
        }
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let path = temp_path();
        assert!(load_snapshot(&path).unwrap().is_none());
        let store = TemplateStore::new();
        assert_eq!(restore_from(&store, &path).unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let path = temp_path();
        let dir = path.parent().unwrap().to_path_buf();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert!(load_snapshot(&path).is_err());
        std::fs::remove_dir_all(dir).unwrap();
    }
}
