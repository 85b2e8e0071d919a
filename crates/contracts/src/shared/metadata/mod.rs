//! Metadata types describing amenity template fields
//!
//! ## Usage
//!
//! ```rust,ignore
//! use contracts::shared::metadata::{FieldDefinition, FieldType, ValidationRules};
//!
//! let field = FieldDefinition::new("machineCount", "Machine Count", FieldType::Number)
//!     .required()
//!     .with_validation(ValidationRules::range(1.0, 40.0));
//!
//! let value = field.validate(&serde_json::json!("12"))?;
//! println!("{}: {:?} ({:?})", field.label, value, field.field_type.describe().control_kind);
//! ```

mod field_type;
mod types;
mod validation;
mod value;

pub use field_type::{
    describe, registry, ControlKind, DefaultValidator, FieldType, FieldTypeDescriptor,
    FieldTypeError, FieldTypeInfo, ValueShape,
};
pub use types::FieldDefinition;
pub use validation::{is_empty, validate, ValidationError, ValidationRules};
pub use value::{FieldValue, ValueBag, DATE_FORMAT, TIME_FORMAT};
