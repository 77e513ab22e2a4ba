//! Tunable thresholds for matching and validation, and the schema type policy.

use serde::{Deserialize, Serialize};

/// How schema definitions with questionable validation settings are treated
/// when a registry is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypePolicy {
    /// Unknown `validate_type` tags pass every value; fields with an invalid
    /// regex are kept and every value is reported invalid with the reason.
    #[default]
    Permissive,
    /// Either defect rejects the whole schema at load time.
    Strict,
}

/// Options controlling the matching cascade and validation reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Content candidates must exceed this valid percentage.
    pub content_min_percentage: f64,
    /// A content match above this percentage wins without looking at names.
    pub content_accept_percentage: f64,
    /// Fuzzy candidates below this name similarity (0-100) are discarded.
    pub fuzzy_similarity_floor: f64,
    pub fuzzy_similarity_weight: f64,
    pub fuzzy_content_weight: f64,
    /// Non-empty sample values kept per column profile.
    pub sample_size: usize,
    /// Error messages and invalid samples kept per validation summary.
    pub error_sample_size: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            content_min_percentage: 50.0,
            content_accept_percentage: 70.0,
            fuzzy_similarity_floor: 60.0,
            fuzzy_similarity_weight: 0.3,
            fuzzy_content_weight: 0.7,
            sample_size: 5,
            error_sample_size: 5,
        }
    }
}
