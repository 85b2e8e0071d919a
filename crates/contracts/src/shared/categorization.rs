use serde::{Deserialize, Serialize};

/// Suggested catalog category for a piece of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Categorization {
    pub category: String,
    /// 0.0 to 1.0
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
}

/// DTO для запроса категоризации
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizeRequest {
    pub text: String,
}
