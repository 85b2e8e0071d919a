use crate::domain::common::{AggregateId, BaseAggregate};
use crate::shared::metadata::FieldDefinition;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Категория по умолчанию для шаблонов без категории
pub const DEFAULT_CATEGORY: &str = "general";

/// ID типа для агрегата Amenity Template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AmenityTemplateId(pub Uuid);

impl AmenityTemplateId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for AmenityTemplateId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s.trim())
            .map(AmenityTemplateId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

impl fmt::Display for AmenityTemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a set of field definitions was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSetError {
    DuplicateKey(String),
    DuplicateId(String),
    InvalidField(String),
}

impl fmt::Display for FieldSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey(key) => write!(f, "duplicate field key '{}'", key),
            Self::DuplicateId(id) => write!(f, "duplicate field id '{}'", id),
            Self::InvalidField(reason) => f.write_str(reason),
        }
    }
}

/// Агрегат Amenity Template: именованный набор типизированных полей
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenityTemplate {
    #[serde(flatten)]
    pub base: BaseAggregate<AmenityTemplateId>,

    /// Категория для каталога (например, "recreation")
    pub category: String,

    /// Упорядоченный список полей с уникальными ключами
    pub fields: Vec<FieldDefinition>,

    /// Создан оператором (а не встроенный)
    pub is_custom: bool,

    /// Сколько раз шаблон был привязан к объекту
    pub usage_count: u64,
}

impl AmenityTemplate {
    pub fn new_for_insert(
        name: String,
        description: String,
        category: String,
        fields: Vec<FieldDefinition>,
        is_custom: bool,
    ) -> Self {
        let base = BaseAggregate::new(AmenityTemplateId::new_v4(), name, description);
        Self {
            base,
            category,
            fields,
            is_custom,
            usage_count: 0,
        }
    }

    pub fn id(&self) -> AmenityTemplateId {
        self.base.id
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn description(&self) -> &str {
        &self.base.description
    }

    pub fn version(&self) -> u64 {
        self.base.metadata.version
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Поле по ключу
    pub fn field(&self, key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.name.trim().is_empty() {
            return Err("Template name cannot be empty".into());
        }
        if self.base.description.trim().is_empty() {
            return Err("Template description cannot be empty".into());
        }
        check_fields(&self.fields).map_err(|e| e.to_string())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }

    /// Глубокая копия с новым ID, сброшенным счетчиком и новой датой создания
    pub fn duplicate(&self) -> Self {
        let mut copy = Self::new_for_insert(
            format!("{} (Copy)", self.base.name),
            self.base.description.clone(),
            self.category.clone(),
            self.fields.clone(),
            true,
        );
        copy.usage_count = 0;
        copy
    }
}

/// Assign ids to fields that arrived without one
pub fn assign_field_ids(fields: &mut [FieldDefinition]) {
    for field in fields.iter_mut().filter(|f| f.id.trim().is_empty()) {
        field.id = Uuid::new_v4().to_string();
    }
}

/// Check field invariants and key/id uniqueness
pub fn check_fields(fields: &[FieldDefinition]) -> Result<(), FieldSetError> {
    let mut keys = HashSet::new();
    let mut ids = HashSet::new();
    for field in fields {
        field.check().map_err(FieldSetError::InvalidField)?;
        if !keys.insert(field.key.as_str()) {
            return Err(FieldSetError::DuplicateKey(field.key.clone()));
        }
        if !field.id.is_empty() && !ids.insert(field.id.as_str()) {
            return Err(FieldSetError::DuplicateId(field.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metadata::FieldType;

    fn laundry() -> AmenityTemplate {
        AmenityTemplate::new_for_insert(
            "Smart Laundry".into(),
            "Connected washers and dryers".into(),
            "utilities".into(),
            vec![FieldDefinition::new("machineCount", "Machine Count", FieldType::Number)
                .with_id("f1")],
            false,
        )
    }

    #[test]
    fn test_duplicate_resets_identity() {
        let mut original = laundry();
        original.usage_count = 7;
        let copy = original.duplicate();

        assert_ne!(copy.id(), original.id());
        assert_eq!(copy.name(), "Smart Laundry (Copy)");
        assert_eq!(copy.usage_count, 0);
        assert!(copy.is_custom);
        assert_eq!(copy.fields, original.fields);
    }

    #[test]
    fn test_check_fields_rejects_duplicate_keys() {
        let fields = vec![
            FieldDefinition::new("hours", "Hours", FieldType::TimeRange),
            FieldDefinition::new("hours", "Opening Hours", FieldType::TimeRange),
        ];
        assert_eq!(
            check_fields(&fields),
            Err(FieldSetError::DuplicateKey("hours".into()))
        );
    }

    #[test]
    fn test_assign_field_ids_fills_blanks_only() {
        let mut fields = vec![
            FieldDefinition::new("a", "A", FieldType::Text).with_id("keep"),
            FieldDefinition::new("b", "B", FieldType::Text),
        ];
        assign_field_ids(&mut fields);
        assert_eq!(fields[0].id, "keep");
        assert!(!fields[1].id.is_empty());
        assert!(check_fields(&fields).is_ok());
    }

    #[test]
    fn test_wire_format_is_flat() {
        let template = laundry();
        let json = serde_json::to_value(&template).unwrap();
        assert_eq!(json["name"], "Smart Laundry");
        assert_eq!(json["isCustom"], false);
        assert_eq!(json["usageCount"], 0);
        assert!(json["metadata"]["createdAt"].is_string());

        let back: AmenityTemplate = serde_json::from_value(json).unwrap();
        assert_eq!(back, template);
    }

    #[test]
    fn test_id_from_string() {
        let id = AmenityTemplateId::new_v4();
        assert_eq!(AmenityTemplateId::from_string(&id.as_string()), Ok(id));
        assert!(AmenityTemplateId::from_string("not-a-uuid").is_err());
    }
}
