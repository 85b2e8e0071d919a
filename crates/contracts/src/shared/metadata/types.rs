//! Field definitions for amenity templates

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::field_type::FieldType;
use super::validation::{self, ValidationError, ValidationRules};
use super::value::FieldValue;

// ============================================================================
// Field-level metadata
// ============================================================================

/// Metadata for a single typed field within a template
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Stable identifier, unique within the template.
    /// Left empty on input, the store assigns one.
    #[serde(default)]
    pub id: String,
    /// Machine name used to index the ValueBag
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Present and non-empty only for `select`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    /// Shown instead of the literal value in read-only views
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reveal_text: Option<String>,
}

impl FieldDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_validation(mut self, rules: ValidationRules) -> Self {
        self.validation = Some(rules);
        self
    }

    pub fn with_reveal_text(mut self, text: impl Into<String>) -> Self {
        self.reveal_text = Some(text.into());
        self
    }

    /// Check if field is optional
    pub fn is_optional(&self) -> bool {
        !self.required
    }

    /// Validate a raw value against this field
    pub fn validate(&self, raw: &Value) -> Result<FieldValue, ValidationError> {
        validation::validate(self, raw)
    }

    /// Check the definition's own invariants
    pub fn check(&self) -> Result<(), String> {
        if self.key.trim().is_empty() {
            return Err(format!("field '{}' has an empty key", self.label));
        }

        let has_options = self.options.as_ref().map_or(false, |o| !o.is_empty());
        match (self.field_type, has_options) {
            (FieldType::Select, false) => {
                return Err(format!("select field '{}' needs at least one option", self.key));
            }
            (FieldType::Select, true) => {}
            (other, _) if self.options.is_some() => {
                return Err(format!(
                    "field '{}' of type {} cannot carry options",
                    self.key, other
                ));
            }
            _ => {}
        }

        if let Some(rules) = &self.validation {
            rules.check().map_err(|e| format!("field '{}': {}", self.key, e))?;
        }

        Ok(())
    }
}
