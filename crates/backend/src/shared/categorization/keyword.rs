use async_trait::async_trait;
use contracts::domain::a001_amenity_template::DEFAULT_CATEGORY;
use contracts::shared::categorization::Categorization;

use super::{CategorizationError, CategorizationService};

/// Уверенность, когда ни одно ключевое слово не найдено
const FALLBACK_CONFIDENCE: f64 = 0.1;

/// Категории и ключевые слова в порядке приоритета
const KEYWORDS: &[(&str, &[&str])] = &[
    (
        "connectivity",
        &["wifi", "wi fi", "internet", "wireless", "router", "network", "broadband", "cable tv"],
    ),
    (
        "utilities",
        &["laundry", "washer", "washers", "dryer", "dryers", "trash", "recycling", "water", "electricity"],
    ),
    (
        "recreation",
        &["pool", "spa", "sauna", "lounge", "rooftop", "playground", "bbq", "grill", "theater", "game room"],
    ),
    (
        "fitness",
        &["gym", "fitness", "yoga", "cardio", "weights", "weight", "training", "treadmill"],
    ),
    (
        "parking",
        &["parking", "garage", "ev", "charging", "carport", "bike storage"],
    ),
    (
        "security",
        &["locker", "lockers", "package", "parcel", "gate", "camera", "concierge", "doorman", "access control"],
    ),
];

/// Категоризатор по таблице ключевых слов (без внешних вызовов)
#[derive(Debug, Clone, Default)]
pub struct KeywordCategorizer;

impl KeywordCategorizer {
    pub fn new() -> Self {
        Self
    }

    fn classify_sync(&self, text: &str) -> Result<Categorization, CategorizationError> {
        let normalized = normalize(text);
        if normalized.trim().is_empty() {
            return Err(CategorizationError::EmptyInput);
        }

        let mut best: Option<(&str, Vec<String>)> = None;
        let mut total = 0usize;
        for (category, keywords) in KEYWORDS {
            let matched: Vec<String> = keywords
                .iter()
                .filter(|kw| normalized.contains(&format!(" {} ", kw)))
                .map(|kw| kw.to_string())
                .collect();
            total += matched.len();
            let better = best
                .as_ref()
                .map_or(!matched.is_empty(), |(_, current)| matched.len() > current.len());
            if better {
                best = Some((*category, matched));
            }
        }

        Ok(match best {
            Some((category, matched)) => Categorization {
                category: category.to_string(),
                confidence: matched.len() as f64 / total as f64,
                matched_keywords: matched,
            },
            None => Categorization {
                category: DEFAULT_CATEGORY.to_string(),
                confidence: FALLBACK_CONFIDENCE,
                matched_keywords: Vec::new(),
            },
        })
    }
}

#[async_trait]
impl CategorizationService for KeywordCategorizer {
    async fn classify(&self, text: &str) -> Result<Categorization, CategorizationError> {
        self.classify_sync(text)
    }

    fn provider_name(&self) -> &str {
        "keyword"
    }
}

/// Нижний регистр, только буквы и цифры, слова разделены одним пробелом
fn normalize(text: &str) -> String {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    format!(" {} ", words.join(" "))
}
