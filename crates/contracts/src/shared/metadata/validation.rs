//! Validation rules and value validation for template fields

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

use super::field_type::{DefaultValidator, FieldType, ValueShape};
use super::types::FieldDefinition;
use super::value::FieldValue;

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9(][0-9 ()\-.]{5,22}[0-9]$").expect("static phone pattern"));

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[A-Za-z0-9](?:[A-Za-z0-9\-.]*[A-Za-z0-9])?(?::[0-9]{1,5})?(?:[/?#]\S*)?$")
        .expect("static url pattern")
});

static PATTERN_CACHE: Lazy<RwLock<HashMap<String, Regex>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Field patterns are compiled once per process
fn compiled(pattern: &str) -> Result<Regex, regex::Error> {
    if let Some(re) = PATTERN_CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(pattern)
    {
        return Ok(re.clone());
    }
    let re = Regex::new(pattern)?;
    PATTERN_CACHE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(pattern.to_string(), re.clone());
    Ok(re)
}

/// Template-specific constraints on a field.
///
/// `min`/`max` bound the value for number-shaped types and the character count
/// for text-shaped types. `pattern` applies to text-shaped types only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationRules {
    /// Create empty validation rules (no constraints)
    pub fn none() -> Self {
        Self::default()
    }

    pub fn range(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Self::default()
        }
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Check the rules themselves are coherent
    pub fn check(&self) -> Result<(), String> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(format!("min ({}) is greater than max ({})", min, max));
            }
        }
        if let Some(pattern) = &self.pattern {
            compiled(pattern).map_err(|e| format!("invalid pattern '{}': {}", pattern, e))?;
        }
        Ok(())
    }

    /// Validate a number against min/max
    pub fn validate_number(&self, value: f64, field_label: &str) -> Result<(), String> {
        let out_of_range = self.min.map_or(false, |min| value < min)
            || self.max.map_or(false, |max| value > max);
        if out_of_range {
            return Err(self.message_or(|| bounds_message(field_label, self.min, self.max, "")));
        }
        Ok(())
    }

    /// Validate a string against length bounds and pattern.
    /// The second tuple element tells whether the failure was a pattern mismatch.
    pub fn validate_string(&self, value: &str, field_label: &str) -> Result<(), (String, bool)> {
        let length = value.chars().count() as f64;
        let too_short = self.min.map_or(false, |min| length < min);
        let too_long = self.max.map_or(false, |max| length > max);
        if too_short || too_long {
            let message =
                self.message_or(|| bounds_message(field_label, self.min, self.max, " characters"));
            return Err((message, false));
        }

        if let Some(pattern) = &self.pattern {
            // `check()` refuses bad patterns on template write; this only fires for
            // definitions that bypassed it
            let re = compiled(pattern).map_err(|e| {
                (format!("{}: invalid pattern '{}': {}", field_label, pattern, e), true)
            })?;
            if !re.is_match(value) {
                let message = self.message_or(|| format!("{} has an invalid format", field_label));
                return Err((message, true));
            }
        }

        Ok(())
    }

    fn message_or(&self, generate: impl FnOnce() -> String) -> String {
        self.message.clone().unwrap_or_else(generate)
    }
}

fn bounds_message(label: &str, min: Option<f64>, max: Option<f64>, unit: &str) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{} must be between {} and {}{}", label, min, max, unit),
        (Some(min), None) => format!("{} must be at least {}{}", label, min, unit),
        (None, Some(max)) => format!("{} must be at most {}{}", label, max, unit),
        (None, None) => format!("{} is out of range", label),
    }
}

/// Structured reason a candidate value was rejected for a field
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationError {
    #[error("{label} is required")]
    Required { key: String, label: String },

    #[error("{label}: expected a {expected} value")]
    TypeMismatch {
        key: String,
        label: String,
        expected: String,
    },

    #[error("{message}")]
    OutOfRange { key: String, message: String },

    #[error("{message}")]
    PatternMismatch { key: String, message: String },

    #[error("{label}: '{value}' is not one of the allowed options")]
    InvalidOption {
        key: String,
        label: String,
        value: String,
    },
}

impl ValidationError {
    pub fn required(field: &FieldDefinition) -> Self {
        Self::Required {
            key: field.key.clone(),
            label: field.label.clone(),
        }
    }

    fn type_mismatch(field: &FieldDefinition, shape: ValueShape) -> Self {
        Self::TypeMismatch {
            key: field.key.clone(),
            label: field.label.clone(),
            expected: shape.as_str().to_string(),
        }
    }

    fn out_of_range(field: &FieldDefinition, message: String) -> Self {
        Self::OutOfRange {
            key: field.key.clone(),
            message,
        }
    }

    fn pattern_mismatch(field: &FieldDefinition, message: String) -> Self {
        Self::PatternMismatch {
            key: field.key.clone(),
            message,
        }
    }

    /// Key of the field the error belongs to
    pub fn key(&self) -> &str {
        match self {
            Self::Required { key, .. }
            | Self::TypeMismatch { key, .. }
            | Self::OutOfRange { key, .. }
            | Self::PatternMismatch { key, .. }
            | Self::InvalidOption { key, .. } => key,
        }
    }
}

/// Validate a raw value for a field and produce the typed value.
///
/// Checks run in order: required, coercion into the type's shape, the type's
/// default validator and the field's min/max/pattern rules, then select options.
pub fn validate(field: &FieldDefinition, raw: &Value) -> Result<FieldValue, ValidationError> {
    if is_empty(raw) {
        if field.required {
            return Err(ValidationError::required(field));
        }
        return Ok(FieldValue::Unset);
    }

    let descriptor = field.field_type.describe();
    let value = coerce(raw, descriptor.value_shape, field.field_type)
        .ok_or_else(|| ValidationError::type_mismatch(field, descriptor.value_shape))?;

    check_default(field, descriptor.default_validator, &value)?;
    check_rules(field, &value)?;

    if field.field_type == FieldType::Select {
        let chosen = value.as_text().unwrap_or_default();
        let allowed = field
            .options
            .as_ref()
            .map_or(false, |options| options.iter().any(|o| o == chosen));
        if !allowed {
            return Err(ValidationError::InvalidOption {
                key: field.key.clone(),
                label: field.label.clone(),
                value: chosen.to_string(),
            });
        }
    }

    Ok(value)
}

/// Null, blank strings, empty arrays and empty objects count as "no value"
pub fn is_empty(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn coerce(raw: &Value, shape: ValueShape, field_type: FieldType) -> Option<FieldValue> {
    match shape {
        ValueShape::Text => match raw {
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Number(n) => Some(FieldValue::Text(n.to_string())),
            Value::Bool(b) => Some(FieldValue::Text(b.to_string())),
            _ => None,
        },
        ValueShape::Number => {
            let number = match raw {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => parse_number(s, field_type == FieldType::Currency),
                _ => None,
            }?;
            number.is_finite().then_some(FieldValue::Number(number))
        }
        ValueShape::Boolean => match raw {
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(FieldValue::Bool(false)),
                Some(1) => Some(FieldValue::Bool(true)),
                _ => None,
            },
            Value::String(s) => parse_bool(s).map(FieldValue::Bool),
            _ => None,
        },
        ValueShape::TimeRange => {
            let (start, end) = range_parts(raw, |s| s.split_once('-'))?;
            Some(FieldValue::TimeRange(parse_time(&start)?, parse_time(&end)?))
        }
        ValueShape::DateRange => {
            let (start, end) = range_parts(raw, |s| {
                s.split_once("..")
                    .or_else(|| s.split_once(" - "))
                    .or_else(|| s.split_once(" to "))
            })?;
            Some(FieldValue::DateRange(parse_date(&start)?, parse_date(&end)?))
        }
    }
}

fn parse_number(s: &str, currency: bool) -> Option<f64> {
    let trimmed = s.trim();
    if currency {
        let cleaned: String = trimmed
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();
        cleaned.trim().parse().ok()
    } else {
        trimmed.parse().ok()
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Start/end strings from `[start, end]`, `{start, end}` or a delimited string
fn range_parts(
    raw: &Value,
    split: impl Fn(&str) -> Option<(&str, &str)>,
) -> Option<(String, String)> {
    match raw {
        Value::Array(items) if items.len() == 2 => {
            Some((items[0].as_str()?.to_string(), items[1].as_str()?.to_string()))
        }
        Value::Object(map) => Some((
            map.get("start")?.as_str()?.to_string(),
            map.get("end")?.as_str()?.to_string(),
        )),
        Value::String(s) => split(s).map(|(a, b)| (a.to_string(), b.to_string())),
        _ => None,
    }
}

fn check_default(
    field: &FieldDefinition,
    validator: DefaultValidator,
    value: &FieldValue,
) -> Result<(), ValidationError> {
    let custom = field.validation.as_ref().and_then(|r| r.message.clone());
    match (validator, value) {
        (DefaultValidator::NonNegative, FieldValue::Number(n)) if *n < 0.0 => {
            Err(ValidationError::out_of_range(
                field,
                custom.unwrap_or_else(|| format!("{} cannot be negative", field.label)),
            ))
        }
        (DefaultValidator::OrderedRange, FieldValue::TimeRange(start, end)) if start >= end => {
            Err(ValidationError::out_of_range(
                field,
                custom.unwrap_or_else(|| format!("{} must end after it starts", field.label)),
            ))
        }
        (DefaultValidator::OrderedRange, FieldValue::DateRange(start, end)) if start > end => {
            Err(ValidationError::out_of_range(
                field,
                custom.unwrap_or_else(|| {
                    format!("{} must not end before it starts", field.label)
                }),
            ))
        }
        (DefaultValidator::Phone, FieldValue::Text(s)) => {
            let digits = s.chars().filter(char::is_ascii_digit).count();
            if PHONE_PATTERN.is_match(s.trim()) && digits >= 7 {
                Ok(())
            } else {
                Err(ValidationError::pattern_mismatch(
                    field,
                    custom.unwrap_or_else(|| {
                        format!("{} must be a valid phone number", field.label)
                    }),
                ))
            }
        }
        (DefaultValidator::Url, FieldValue::Text(s)) if !URL_PATTERN.is_match(s.trim()) => {
            Err(ValidationError::pattern_mismatch(
                field,
                custom.unwrap_or_else(|| format!("{} must be an http(s) link", field.label)),
            ))
        }
        _ => Ok(()),
    }
}

fn check_rules(field: &FieldDefinition, value: &FieldValue) -> Result<(), ValidationError> {
    let Some(rules) = &field.validation else {
        return Ok(());
    };
    match value {
        FieldValue::Number(n) => rules
            .validate_number(*n, &field.label)
            .map_err(|message| ValidationError::out_of_range(field, message)),
        FieldValue::Text(s) => rules
            .validate_string(s, &field.label)
            .map_err(|(message, is_pattern)| {
                if is_pattern {
                    ValidationError::pattern_mismatch(field, message)
                } else {
                    ValidationError::out_of_range(field, message)
                }
            }),
        _ => Ok(()),
    }
}
