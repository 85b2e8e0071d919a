use contracts::domain::a001_amenity_template::{AmenityTemplate, CategoryCount, ListTemplatesQuery};

/// Фильтр каталога шаблонов. Пустые значения не фильтруют.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFilter {
    pub category: Option<String>,
    pub search_text: Option<String>,
}

impl TemplateFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(category.into());
        self
    }

    pub fn with_search(mut self, search_text: impl Into<String>) -> Self {
        self.search_text = non_blank(search_text.into());
        self
    }

    pub fn matches(&self, template: &AmenityTemplate) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |category| template.category == category);

        let search_ok = self.search_text.as_deref().map_or(true, |needle| {
            let needle = needle.to_lowercase();
            template.name().to_lowercase().contains(&needle)
                || template.description().to_lowercase().contains(&needle)
        });

        category_ok && search_ok
    }
}

impl From<ListTemplatesQuery> for TemplateFilter {
    fn from(query: ListTemplatesQuery) -> Self {
        Self {
            category: query.category.and_then(non_blank),
            search_text: query.search.and_then(non_blank),
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Шаблоны, подходящие под фильтр, в порядке вставки
pub fn select(templates: &[AmenityTemplate], filter: &TemplateFilter) -> Vec<AmenityTemplate> {
    templates
        .iter()
        .filter(|t| filter.matches(t))
        .cloned()
        .collect()
}

/// Категории в порядке первого появления с количеством шаблонов
pub fn category_counts(templates: &[AmenityTemplate]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for template in templates {
        match counts.iter_mut().find(|c| c.category == template.category) {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount {
                category: template.category.clone(),
                count: 1,
            }),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str, description: &str, category: &str) -> AmenityTemplate {
        AmenityTemplate::new_for_insert(
            name.into(),
            description.into(),
            category.into(),
            Vec::new(),
            true,
        )
    }

    fn catalog() -> Vec<AmenityTemplate> {
        vec![
            template("Wi-Fi", "Building wireless internet", "connectivity"),
            template("Swimming Pool", "Outdoor heated pool", "recreation"),
            template("Rooftop Lounge", "Shared terrace with a view", "recreation"),
            template("Smart Laundry", "Connected washers and dryers", "utilities"),
        ]
    }

    #[test]
    fn test_empty_filter_returns_all_in_order() {
        let templates = catalog();
        assert_eq!(select(&templates, &TemplateFilter::new()), templates);
    }

    #[test]
    fn test_category_filter() {
        let templates = catalog();
        let result = select(&templates, &TemplateFilter::new().with_category("recreation"));
        let names: Vec<_> = result.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Swimming Pool", "Rooftop Lounge"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_description() {
        let templates = catalog();
        let by_name = select(&templates, &TemplateFilter::new().with_search("POOL"));
        assert_eq!(by_name.len(), 1);

        let by_description = select(&templates, &TemplateFilter::new().with_search("washers"));
        assert_eq!(by_description[0].name(), "Smart Laundry");
    }

    #[test]
    fn test_filters_are_anded() {
        let templates = catalog();
        let filter = TemplateFilter::new()
            .with_category("recreation")
            .with_search("terrace");
        let result = select(&templates, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name(), "Rooftop Lounge");

        let none = TemplateFilter::new()
            .with_category("utilities")
            .with_search("pool");
        assert!(select(&templates, &none).is_empty());
    }

    #[test]
    fn test_category_match_is_exact() {
        let mut templates = catalog();
        templates.push(template("Зал", "Тренажерный зал", "Спорт"));

        let exact = select(&templates, &TemplateFilter::new().with_category("Спорт"));
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].name(), "Зал");

        assert!(select(&templates, &TemplateFilter::new().with_category("спорт")).is_empty());
        assert!(select(&templates, &TemplateFilter::new().with_category("RECREATION")).is_empty());
    }

    #[test]
    fn test_blank_query_values_are_ignored() {
        let filter = TemplateFilter::from(ListTemplatesQuery {
            category: Some("  ".into()),
            search: Some(String::new()),
        });
        assert_eq!(filter, TemplateFilter::new());
    }

    #[test]
    fn test_category_counts_first_seen_order() {
        let counts = category_counts(&catalog());
        assert_eq!(
            counts,
            vec![
                CategoryCount {
                    category: "connectivity".into(),
                    count: 1,
                },
                CategoryCount {
                    category: "recreation".into(),
                    count: 2,
                },
                CategoryCount {
                    category: "utilities".into(),
                    count: 1,
                },
            ]
        );
    }
}
