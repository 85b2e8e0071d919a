use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use contracts::domain::a001_amenity_template::aggregate::{assign_field_ids, check_fields};
use contracts::domain::a001_amenity_template::{
    AmenityTemplate, AmenityTemplateId, CategoryCount, CreateTemplateRequest, FieldSetError,
    UpdateTemplateRequest, DEFAULT_CATEGORY,
};
use thiserror::Error;

use super::catalog::{self, TemplateFilter};

/// Ошибки хранилища шаблонов
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Invalid template spec: {0}")]
    InvalidSpec(String),

    #[error("Field key conflict: '{0}'")]
    KeyConflict(String),

    #[error("Template not found: {0}")]
    NotFound(AmenityTemplateId),

    #[error("Stale write: expected version {expected}, current version {actual}")]
    StaleWrite { expected: u64, actual: u64 },
}

/// In-memory система учета шаблонов.
///
/// Все мутации сериализуются одним write lock; неудачная операция не меняет
/// содержимое. Порядок хранения = порядок вставки.
#[derive(Debug, Default)]
pub struct TemplateStore {
    templates: RwLock<Vec<AmenityTemplate>>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<AmenityTemplate>> {
        self.templates.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<AmenityTemplate>> {
        self.templates.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Создание нового шаблона
    pub fn create(&self, request: CreateTemplateRequest) -> Result<AmenityTemplate, StoreError> {
        let name = required_text(&request.name, "name")?;
        let description = required_text(&request.description, "description")?;

        let mut fields = request.fields;
        assign_field_ids(&mut fields);
        check_fields(&fields).map_err(|e| StoreError::InvalidSpec(e.to_string()))?;

        let mut template = AmenityTemplate::new_for_insert(
            name,
            description,
            normalize_category(&request.category),
            fields,
            request.is_custom,
        );
        template.before_write();

        self.write().push(template.clone());
        tracing::info!(
            template_id = %template.id(),
            name = %template.name(),
            fields = template.fields.len(),
            "template created"
        );
        Ok(template)
    }

    /// Копия существующего шаблона
    pub fn duplicate(&self, id: AmenityTemplateId) -> Result<AmenityTemplate, StoreError> {
        let mut templates = self.write();
        let original = templates
            .iter()
            .find(|t| t.id() == id)
            .ok_or(StoreError::NotFound(id))?;

        let copy = original.duplicate();
        templates.push(copy.clone());
        tracing::info!(source_id = %id, template_id = %copy.id(), "template duplicated");
        Ok(copy)
    }

    /// Обновление метаданных и/или полей
    pub fn update(
        &self,
        id: AmenityTemplateId,
        patch: UpdateTemplateRequest,
    ) -> Result<AmenityTemplate, StoreError> {
        let mut templates = self.write();
        let slot = templates
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or(StoreError::NotFound(id))?;

        if let Some(expected) = patch.expected_version {
            if expected != slot.version() {
                tracing::warn!(
                    template_id = %id,
                    expected,
                    actual = slot.version(),
                    "stale template update refused"
                );
                return Err(StoreError::StaleWrite {
                    expected,
                    actual: slot.version(),
                });
            }
        }

        // Изменения применяются к копии, чтобы ошибка не оставила частичную запись
        let mut candidate = slot.clone();
        if let Some(name) = &patch.name {
            candidate.base.name = required_text(name, "name")?;
        }
        if let Some(description) = &patch.description {
            candidate.base.description = required_text(description, "description")?;
        }
        if let Some(category) = &patch.category {
            candidate.category = normalize_category(category);
        }
        if let Some(mut fields) = patch.fields {
            assign_field_ids(&mut fields);
            check_fields(&fields).map_err(|e| match e {
                FieldSetError::DuplicateKey(key) => StoreError::KeyConflict(key),
                other => StoreError::InvalidSpec(other.to_string()),
            })?;
            candidate.fields = fields;
        }

        candidate.base.metadata.increment_version();
        candidate.before_write();
        *slot = candidate.clone();

        tracing::info!(template_id = %id, version = candidate.version(), "template updated");
        Ok(candidate)
    }

    /// Удаление шаблона; уже собранные ValueBag не затрагиваются
    pub fn remove(&self, id: AmenityTemplateId) -> Result<(), StoreError> {
        let mut templates = self.write();
        let index = templates
            .iter()
            .position(|t| t.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = templates.remove(index);
        tracing::info!(template_id = %id, name = %removed.name(), "template removed");
        Ok(())
    }

    /// Учет использования: каждый вызов = одно использование
    pub fn record_usage(&self, id: AmenityTemplateId) -> Result<u64, StoreError> {
        let mut templates = self.write();
        let template = templates
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        template.usage_count += 1;
        tracing::debug!(template_id = %id, usage_count = template.usage_count, "template used");
        Ok(template.usage_count)
    }

    pub fn get(&self, id: AmenityTemplateId) -> Result<AmenityTemplate, StoreError> {
        self.read()
            .iter()
            .find(|t| t.id() == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Каталог: шаблоны, подходящие под фильтр, в порядке вставки
    pub fn list(&self, filter: &TemplateFilter) -> Vec<AmenityTemplate> {
        let templates = self.read();
        catalog::select(&templates, filter)
    }

    pub fn categories(&self) -> Vec<CategoryCount> {
        catalog::category_counts(&self.read())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Все шаблоны для экспорта
    pub fn snapshot(&self) -> Vec<AmenityTemplate> {
        self.read().clone()
    }

    /// Заменить содержимое шаблонами из снимка (с проверкой инвариантов)
    pub fn restore(&self, templates: Vec<AmenityTemplate>) -> Result<usize, StoreError> {
        let mut seen = std::collections::HashSet::new();
        for template in &templates {
            template
                .validate()
                .map_err(|e| StoreError::InvalidSpec(format!("{}: {}", template.id(), e)))?;
            if !seen.insert(template.id()) {
                return Err(StoreError::InvalidSpec(format!(
                    "duplicate template id {}",
                    template.id()
                )));
            }
        }

        let count = templates.len();
        *self.write() = templates;
        tracing::info!(count, "template store restored");
        Ok(count)
    }
}

fn required_text(value: &str, what: &str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidSpec(format!("template {} is required", what)));
    }
    Ok(trimmed.to_string())
}

fn normalize_category(category: &str) -> String {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}
