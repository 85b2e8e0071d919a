use serde::{Deserialize, Serialize};

use crate::shared::metadata::{ControlKind, FieldDefinition, FieldType, FieldValue, ValidationError};

/// One field of an editable form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViewModel {
    pub field: FieldDefinition,
    pub current_value: FieldValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<ValidationError>,
    pub control_kind: ControlKind,
}

/// One field of a read-only view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDisplayModel {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Text to show: reveal text, mask, or the formatted value
    pub display: String,
    /// True when `display` hides a secret value
    pub masked: bool,
    /// True when a secret value is shown because the viewer revealed it
    pub revealed: bool,
    /// True when the bag holds a value for the field
    pub has_value: bool,
}
