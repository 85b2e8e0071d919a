//! Typed field values and the ValueBag that holds them

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Time format used for the plain (JSON) form of time ranges
pub const TIME_FORMAT: &str = "%H:%M:%S";
/// Date format used for the plain (JSON) form of date ranges
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated value for one field.
///
/// Serializes untagged, so a bag is a plain JSON object of primitives and
/// two-element arrays.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Unset,
    Bool(bool),
    Number(f64),
    Text(String),
    TimeRange(NaiveTime, NaiveTime),
    DateRange(NaiveDate, NaiveDate),
}

impl FieldValue {
    pub fn is_unset(&self) -> bool {
        matches!(self, FieldValue::Unset)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Plain structured form, accepted back by validation
    pub fn to_plain(&self) -> Value {
        match self {
            FieldValue::Unset => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::TimeRange(start, end) => Value::Array(vec![
                Value::String(start.format(TIME_FORMAT).to_string()),
                Value::String(end.format(TIME_FORMAT).to_string()),
            ]),
            FieldValue::DateRange(start, end) => Value::Array(vec![
                Value::String(start.format(DATE_FORMAT).to_string()),
                Value::String(end.format(DATE_FORMAT).to_string()),
            ]),
        }
    }
}

/// Values captured for one instance of a template, keyed by field key.
///
/// Owned by the caller; the engine never persists it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueBag(BTreeMap<String, FieldValue>);

impl ValueBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Plain form of every value, keyed by field key
    pub fn to_plain(&self) -> BTreeMap<String, Value> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_plain()))
            .collect()
    }
}

impl FromIterator<(String, FieldValue)> for ValueBag {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bag_serializes_to_plain_object() {
        let open = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let close = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
        let bag: ValueBag = [
            ("machineCount".to_string(), FieldValue::Number(12.0)),
            ("hours".to_string(), FieldValue::TimeRange(open, close)),
            ("notes".to_string(), FieldValue::Unset),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_value(&bag).unwrap();
        assert_eq!(
            json,
            json!({"hours": ["09:00:00", "17:00:00"], "machineCount": 12.0, "notes": null})
        );

        let back: ValueBag = serde_json::from_value(json).unwrap();
        assert_eq!(back, bag);
    }

    #[test]
    fn test_date_range_deserializes_after_time_range_fails() {
        let bag: ValueBag =
            serde_json::from_value(json!({"season": ["2025-06-01", "2025-09-01"]})).unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        assert_eq!(bag.get("season"), Some(&FieldValue::DateRange(start, end)));
    }

    #[test]
    fn test_to_plain_matches_serde_form() {
        let value = FieldValue::Text("Guest-5G".to_string());
        assert_eq!(value.to_plain(), serde_json::to_value(&value).unwrap());
        assert_eq!(FieldValue::Unset.to_plain(), Value::Null);
    }
}
