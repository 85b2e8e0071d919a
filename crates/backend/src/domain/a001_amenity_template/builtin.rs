use contracts::domain::a001_amenity_template::CreateTemplateRequest;
use contracts::shared::metadata::{FieldDefinition, FieldType, ValidationRules};

use super::store::{StoreError, TemplateStore};

/// Встроенные шаблоны удобств (isCustom = false)
pub fn builtin_templates() -> Vec<CreateTemplateRequest> {
    vec![
        CreateTemplateRequest::new("Wi-Fi", "Building wireless internet for residents")
            .with_category("connectivity")
            .with_fields(vec![
                FieldDefinition::new("networkName", "Network Name", FieldType::Text)
                    .required()
                    .with_placeholder("Building-WiFi"),
                FieldDefinition::new("password", "Password", FieldType::Secret).required(),
                FieldDefinition::new("speedMbps", "Speed (Mbps)", FieldType::Number)
                    .with_validation(ValidationRules::range(1.0, 10_000.0)),
                FieldDefinition::new("supportUrl", "Support Page", FieldType::Url),
            ])
            .built_in(),
        CreateTemplateRequest::new("Smart Laundry", "Connected washers and dryers")
            .with_category("utilities")
            .with_fields(vec![
                FieldDefinition::new("machineCount", "Machine Count", FieldType::Number)
                    .required()
                    .with_validation(
                        ValidationRules::range(1.0, 40.0)
                            .with_message("Machine count must be between 1 and 40"),
                    ),
                FieldDefinition::new("pricePerCycle", "Price per Cycle", FieldType::Currency),
                FieldDefinition::new("hours", "Hours", FieldType::TimeRange),
                FieldDefinition::new("payment", "Payment Method", FieldType::Select)
                    .with_options(["Card", "App", "Coins"]),
                FieldDefinition::new("appAccessCode", "App Access Code", FieldType::Secret)
                    .with_reveal_text("Ask the front desk"),
            ])
            .built_in(),
        CreateTemplateRequest::new("Swimming Pool", "Outdoor heated pool")
            .with_category("recreation")
            .with_fields(vec![
                FieldDefinition::new("hours", "Hours", FieldType::TimeRange).required(),
                FieldDefinition::new("season", "Season", FieldType::DateRange),
                FieldDefinition::new("heated", "Heated", FieldType::Boolean),
                FieldDefinition::new("lifeguard", "Lifeguard on Duty", FieldType::Checkbox),
                FieldDefinition::new("rules", "Pool Rules", FieldType::MultilineText),
            ])
            .built_in(),
        CreateTemplateRequest::new("Fitness Center", "Gym with cardio and weight equipment")
            .with_category("fitness")
            .with_fields(vec![
                FieldDefinition::new("hours", "Hours", FieldType::TimeRange).required(),
                FieldDefinition::new("accessCode", "Door Code", FieldType::Secret),
                FieldDefinition::new("cleaning", "Cleaning Schedule", FieldType::Select)
                    .with_options(["Daily", "Weekly", "Monthly"]),
                FieldDefinition::new("personalTraining", "Personal Training", FieldType::Checkbox),
            ])
            .built_in(),
        CreateTemplateRequest::new("Parking", "Resident garage and guest parking")
            .with_category("parking")
            .with_fields(vec![
                FieldDefinition::new("spaces", "Spaces", FieldType::Number)
                    .with_validation(ValidationRules::range(0.0, 5_000.0)),
                FieldDefinition::new("monthlyFee", "Monthly Fee", FieldType::Currency),
                FieldDefinition::new("evCharging", "EV Charging", FieldType::Boolean),
                FieldDefinition::new("gatePhone", "Gate Phone", FieldType::Phone),
            ])
            .built_in(),
        CreateTemplateRequest::new("Package Lockers", "Secure lockers for parcel deliveries")
            .with_category("security")
            .with_fields(vec![
                FieldDefinition::new("provider", "Provider", FieldType::Text).required(),
                FieldDefinition::new("lockerCode", "Master Code", FieldType::Secret)
                    .with_validation(
                        ValidationRules::pattern(r"^\d{4,8}$")
                            .with_message("Code must be 4 to 8 digits"),
                    ),
                FieldDefinition::new("supportPhone", "Support Phone", FieldType::Phone),
                FieldDefinition::new("trackingUrl", "Tracking Site", FieldType::Url),
            ])
            .built_in(),
    ]
}

/// Заполнить хранилище встроенными шаблонами
pub fn seed(store: &TemplateStore) -> Result<usize, StoreError> {
    let templates = builtin_templates();
    let count = templates.len();
    for request in templates {
        store.create(request)?;
    }
    tracing::info!(count, "built-in templates seeded");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_amenity_template::catalog::TemplateFilter;
    use std::collections::HashSet;

    #[test]
    fn test_seed_creates_builtin_templates() {
        let store = TemplateStore::new();
        let count = seed(&store).unwrap();

        assert_eq!(count, 6);
        let all = store.list(&TemplateFilter::new());
        assert_eq!(all.len(), 6);
        assert!(all.iter().all(|t| !t.is_custom && t.usage_count == 0));
    }

    #[test]
    fn test_builtins_cover_every_field_type() {
        let used: HashSet<FieldType> = builtin_templates()
            .iter()
            .flat_map(|t| t.fields.iter().map(|f| f.field_type))
            .collect();
        for field_type in FieldType::ALL {
            assert!(used.contains(&field_type), "{} not covered", field_type);
        }
    }
}
