use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::shared::metadata::{FieldDefinition, ValueBag};

/// Raw edits submitted from a form, keyed by field key
pub type FieldEdits = BTreeMap<String, Value>;

fn default_true() -> bool {
    true
}

/// Request to create a template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    pub name: String,
    pub description: String,
    /// Blank means "let the categorizer suggest one"
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default = "default_true")]
    pub is_custom: bool,
}

impl CreateTemplateRequest {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            is_custom: true,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldDefinition>) -> Self {
        self.fields = fields;
        self
    }

    pub fn built_in(mut self) -> Self {
        self.is_custom = false;
        self
    }
}

/// Patch for an existing template. Absent members stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Replaces the whole field list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldDefinition>>,
    /// Version the caller last saw; a mismatch is a stale write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
}

/// Query for the template catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTemplatesQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Body for editable and read-only rendering
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    #[serde(default)]
    pub values: ValueBag,
    /// Keys of secret fields the viewer chose to reveal
    #[serde(default)]
    pub revealed: Vec<String>,
}

/// Body for committing form edits into a ValueBag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    #[serde(default)]
    pub values: ValueBag,
    #[serde(default)]
    pub edits: FieldEdits,
}
