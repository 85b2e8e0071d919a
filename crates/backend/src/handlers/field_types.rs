use axum::Json;
use contracts::shared::metadata::{registry, FieldTypeInfo};

/// GET /api/field_types
pub async fn list() -> Json<Vec<FieldTypeInfo>> {
    Json(registry().map(FieldTypeInfo::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::metadata::{ControlKind, FieldType};

    #[tokio::test]
    async fn test_lists_every_field_type() {
        let Json(types) = list().await;
        assert_eq!(types.len(), FieldType::ALL.len());
        let secret = types
            .iter()
            .find(|t| t.field_type == FieldType::Secret)
            .unwrap();
        assert_eq!(secret.control_kind, ControlKind::PasswordInput);
    }
}
