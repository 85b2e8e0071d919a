//! Form rendering over a template and a ValueBag
//!
//! Nothing here touches the template store, so renders can run in parallel.

use std::collections::HashSet;

use crate::domain::a001_amenity_template::{AmenityTemplate, FieldEdits};
use crate::shared::metadata::{self, FieldType, FieldValue, ValidationError, ValueBag};

use super::view_model::{FieldDisplayModel, FieldViewModel};

/// Shown in place of an unrevealed secret
pub const SECRET_MASK: &str = "••••••••";

/// Editable representation: one view model per template field, in template order.
///
/// `validation_error` reflects the current value, so a required field with no
/// value reports `Required`.
pub fn render_editable(template: &AmenityTemplate, values: &ValueBag) -> Vec<FieldViewModel> {
    template
        .fields
        .iter()
        .map(|field| {
            let current_value = values.get(&field.key).cloned().unwrap_or_default();
            let validation_error = field.validate(&current_value.to_plain()).err();
            FieldViewModel {
                field: field.clone(),
                current_value,
                validation_error,
                control_kind: field.field_type.describe().control_kind,
            }
        })
        .collect()
}

/// Read-only representation.
///
/// Secret fields stay masked unless their key is in `revealed`; `reveal_text`
/// replaces the value whatever the reveal state.
pub fn render_read_only(
    template: &AmenityTemplate,
    values: &ValueBag,
    revealed: &HashSet<String>,
) -> Vec<FieldDisplayModel> {
    template
        .fields
        .iter()
        .map(|field| {
            let value = values.get(&field.key).cloned().unwrap_or_default();
            let has_value = !value.is_unset();
            let is_secret = field.field_type == FieldType::Secret;
            let is_revealed = is_secret && revealed.contains(&field.key);

            let (display, masked) = match &field.reveal_text {
                Some(text) => (text.clone(), is_secret),
                None if is_secret && has_value && !is_revealed => (SECRET_MASK.to_string(), true),
                None => ((field.field_type.describe().format)(&value), false),
            };

            FieldDisplayModel {
                key: field.key.clone(),
                label: field.label.clone(),
                field_type: field.field_type,
                display,
                masked,
                revealed: is_revealed && field.reveal_text.is_none(),
                has_value,
            }
        })
        .collect()
}

/// Validate `edits` and fold them into a copy of `values`.
///
/// Every failing field is reported, in template order. Fields missing from
/// `edits` keep their value; required fields that are neither edited nor set
/// fail with `Required`. Keys unknown to the template are ignored in `edits`
/// and carried through untouched in `values`.
pub fn commit(
    template: &AmenityTemplate,
    values: &ValueBag,
    edits: &FieldEdits,
) -> Result<ValueBag, Vec<ValidationError>> {
    let mut next = values.clone();
    let mut errors = Vec::new();

    for field in &template.fields {
        match edits.get(&field.key) {
            Some(raw) => match field.validate(raw) {
                // clearing a field that already holds no value is not a change
                Ok(FieldValue::Unset) if is_blank(values.get(&field.key)) => {}
                Ok(value) => {
                    next.insert(field.key.clone(), value);
                }
                Err(e) => errors.push(e),
            },
            None => {
                if field.required && is_blank(values.get(&field.key)) {
                    errors.push(ValidationError::required(field));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(next)
    } else {
        Err(errors)
    }
}

/// Absent, unset, or stored in a form that reads as no value (e.g. `Text("")`)
fn is_blank(current: Option<&FieldValue>) -> bool {
    current.map_or(true, |value| metadata::is_empty(&value.to_plain()))
}
