//! Field type enumeration and the registry describing each type
//!
//! The registry is a static table indexed by [`FieldType`]: one row per type with
//! the stored value shape, the default validator, the control used by editable
//! forms and the formatter used by read-only views.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::value::FieldValue;

/// Kind of an amenity template field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Boolean,
    MultilineText,
    Select,
    TimeRange,
    DateRange,
    Currency,
    Phone,
    Url,
    Secret,
    Checkbox,
}

impl FieldType {
    /// All field types in registry order
    pub const ALL: [FieldType; 12] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::MultilineText,
        FieldType::Select,
        FieldType::TimeRange,
        FieldType::DateRange,
        FieldType::Currency,
        FieldType::Phone,
        FieldType::Url,
        FieldType::Secret,
        FieldType::Checkbox,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::MultilineText => "multilineText",
            Self::Select => "select",
            Self::TimeRange => "timeRange",
            Self::DateRange => "dateRange",
            Self::Currency => "currency",
            Self::Phone => "phone",
            Self::Url => "url",
            Self::Secret => "secret",
            Self::Checkbox => "checkbox",
        }
    }

    /// Registry row for this type
    pub fn describe(&self) -> &'static FieldTypeDescriptor {
        describe(*self)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a field type arrives as text and names no variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldTypeError {
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),
}

impl FromStr for FieldType {
    type Err = FieldTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| FieldTypeError::UnknownFieldType(name.to_string()))
    }
}

/// Shape of the value stored in a ValueBag for a field type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueShape {
    Text,
    Number,
    Boolean,
    TimeRange,
    DateRange,
}

impl ValueShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::TimeRange => "time range",
            Self::DateRange => "date range",
        }
    }
}

/// Check applied to every value of a type, before template-specific rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefaultValidator {
    None,
    Finite,
    NonNegative,
    OneOfOptions,
    OrderedRange,
    Phone,
    Url,
}

/// Control an editable form uses for a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlKind {
    TextInput,
    NumberInput,
    Toggle,
    TextArea,
    Dropdown,
    TimeRangePicker,
    DateRangePicker,
    CurrencyInput,
    PhoneInput,
    UrlInput,
    PasswordInput,
    Checkbox,
}

/// One registry row
pub struct FieldTypeDescriptor {
    pub field_type: FieldType,
    pub value_shape: ValueShape,
    pub default_validator: DefaultValidator,
    pub control_kind: ControlKind,
    /// Read-only formatter for values of this type
    pub format: fn(&FieldValue) -> String,
}

impl fmt::Debug for FieldTypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTypeDescriptor")
            .field("field_type", &self.field_type)
            .field("value_shape", &self.value_shape)
            .field("default_validator", &self.default_validator)
            .field("control_kind", &self.control_kind)
            .finish_non_exhaustive()
    }
}

/// Serializable view of a registry row, for clients building their own widgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTypeInfo {
    pub field_type: FieldType,
    pub value_shape: ValueShape,
    pub default_validator: DefaultValidator,
    pub control_kind: ControlKind,
}

impl From<&FieldTypeDescriptor> for FieldTypeInfo {
    fn from(d: &FieldTypeDescriptor) -> Self {
        Self {
            field_type: d.field_type,
            value_shape: d.value_shape,
            default_validator: d.default_validator,
            control_kind: d.control_kind,
        }
    }
}

// Rows follow the declaration order of FieldType so `type as usize` indexes them.
static REGISTRY: [FieldTypeDescriptor; 12] = [
    FieldTypeDescriptor {
        field_type: FieldType::Text,
        value_shape: ValueShape::Text,
        default_validator: DefaultValidator::None,
        control_kind: ControlKind::TextInput,
        format: format_plain,
    },
    FieldTypeDescriptor {
        field_type: FieldType::Number,
        value_shape: ValueShape::Number,
        default_validator: DefaultValidator::Finite,
        control_kind: ControlKind::NumberInput,
        format: format_plain,
    },
    FieldTypeDescriptor {
        field_type: FieldType::Boolean,
        value_shape: ValueShape::Boolean,
        default_validator: DefaultValidator::None,
        control_kind: ControlKind::Toggle,
        format: format_boolean,
    },
    FieldTypeDescriptor {
        field_type: FieldType::MultilineText,
        value_shape: ValueShape::Text,
        default_validator: DefaultValidator::None,
        control_kind: ControlKind::TextArea,
        format: format_plain,
    },
    FieldTypeDescriptor {
        field_type: FieldType::Select,
        value_shape: ValueShape::Text,
        default_validator: DefaultValidator::OneOfOptions,
        control_kind: ControlKind::Dropdown,
        format: format_plain,
    },
    FieldTypeDescriptor {
        field_type: FieldType::TimeRange,
        value_shape: ValueShape::TimeRange,
        default_validator: DefaultValidator::OrderedRange,
        control_kind: ControlKind::TimeRangePicker,
        format: format_plain,
    },
    FieldTypeDescriptor {
        field_type: FieldType::DateRange,
        value_shape: ValueShape::DateRange,
        default_validator: DefaultValidator::OrderedRange,
        control_kind: ControlKind::DateRangePicker,
        format: format_plain,
    },
    FieldTypeDescriptor {
        field_type: FieldType::Currency,
        value_shape: ValueShape::Number,
        default_validator: DefaultValidator::NonNegative,
        control_kind: ControlKind::CurrencyInput,
        format: format_currency,
    },
    FieldTypeDescriptor {
        field_type: FieldType::Phone,
        value_shape: ValueShape::Text,
        default_validator: DefaultValidator::Phone,
        control_kind: ControlKind::PhoneInput,
        format: format_plain,
    },
    FieldTypeDescriptor {
        field_type: FieldType::Url,
        value_shape: ValueShape::Text,
        default_validator: DefaultValidator::Url,
        control_kind: ControlKind::UrlInput,
        format: format_plain,
    },
    FieldTypeDescriptor {
        field_type: FieldType::Secret,
        value_shape: ValueShape::Text,
        default_validator: DefaultValidator::None,
        control_kind: ControlKind::PasswordInput,
        format: format_plain,
    },
    FieldTypeDescriptor {
        field_type: FieldType::Checkbox,
        value_shape: ValueShape::Boolean,
        default_validator: DefaultValidator::None,
        control_kind: ControlKind::Checkbox,
        format: format_boolean,
    },
];

/// Look up the registry row for a field type
pub fn describe(field_type: FieldType) -> &'static FieldTypeDescriptor {
    &REGISTRY[field_type as usize]
}

/// Iterate over every registry row
pub fn registry() -> impl Iterator<Item = &'static FieldTypeDescriptor> {
    REGISTRY.iter()
}

fn format_plain(value: &FieldValue) -> String {
    match value {
        FieldValue::Unset => String::new(),
        FieldValue::Text(s) => s.clone(),
        FieldValue::Number(n) => format_number(*n),
        FieldValue::Bool(b) => format_boolean(&FieldValue::Bool(*b)),
        FieldValue::TimeRange(start, end) => {
            format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"))
        }
        FieldValue::DateRange(start, end) => {
            format!("{} - {}", start.format("%b %-d, %Y"), end.format("%b %-d, %Y"))
        }
    }
}

fn format_boolean(value: &FieldValue) -> String {
    match value {
        FieldValue::Bool(true) => "Yes".to_string(),
        FieldValue::Bool(false) => "No".to_string(),
        other => format_plain(other),
    }
}

fn format_currency(value: &FieldValue) -> String {
    match value {
        FieldValue::Number(n) => format!("${:.2}", n),
        other => format_plain(other),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_registry_rows_match_their_index() {
        for field_type in FieldType::ALL {
            assert_eq!(describe(field_type).field_type, field_type);
        }
        assert_eq!(registry().count(), FieldType::ALL.len());
    }

    #[test]
    fn test_parse_field_type_names() {
        assert_eq!("multilineText".parse::<FieldType>(), Ok(FieldType::MultilineText));
        assert_eq!("TIMERANGE".parse::<FieldType>(), Ok(FieldType::TimeRange));
        assert_eq!(
            "slider".parse::<FieldType>(),
            Err(FieldTypeError::UnknownFieldType("slider".to_string()))
        );
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for field_type in FieldType::ALL {
            let json = serde_json::to_string(&field_type).unwrap();
            assert_eq!(json, format!("\"{}\"", field_type.as_str()));
        }
    }

    #[test]
    fn test_formatters() {
        let currency = describe(FieldType::Currency).format;
        assert_eq!(currency(&FieldValue::Number(4.5)), "$4.50");

        let boolean = describe(FieldType::Checkbox).format;
        assert_eq!(boolean(&FieldValue::Bool(true)), "Yes");

        let number = describe(FieldType::Number).format;
        assert_eq!(number(&FieldValue::Number(12.0)), "12");
        assert_eq!(number(&FieldValue::Number(2.5)), "2.5");

        let hours = describe(FieldType::TimeRange).format;
        let open = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
        let close = NaiveTime::from_hms_opt(22, 30, 0).unwrap();
        assert_eq!(hours(&FieldValue::TimeRange(open, close)), "06:00 - 22:30");

        let season = describe(FieldType::DateRange).format;
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        assert_eq!(
            season(&FieldValue::DateRange(start, end)),
            "Jun 1, 2025 - Sep 15, 2025"
        );
    }
}
