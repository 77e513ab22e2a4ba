//! Field-to-column match results.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How a field was bound to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    ExactFieldName,
    ExactSlug,
    CaseInsensitiveField,
    CaseInsensitive,
    NormalizedMatch,
    Fuzzy,
    ContentValidation,
    ManualMapping,
    NotMapped,
    None,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactFieldName => "exact_field_name",
            Self::ExactSlug => "exact_slug",
            Self::CaseInsensitiveField => "case_insensitive_field",
            Self::CaseInsensitive => "case_insensitive",
            Self::NormalizedMatch => "normalized_match",
            Self::Fuzzy => "fuzzy",
            Self::ContentValidation => "content_validation",
            Self::ManualMapping => "manual_mapping",
            Self::NotMapped => "not_mapped",
            Self::None => "none",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating every value of one column against one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub valid_count: usize,
    pub total_count: usize,
    /// `valid_count / total_count * 100`, 0 when nothing was counted.
    pub valid_percentage: f64,
    /// Bounded sample of error messages.
    pub errors: Vec<String>,
    /// Bounded sample of distinct offending values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalid_samples: Vec<String>,
}

impl ValidationSummary {
    /// A summary with nothing counted and a single explanatory error.
    pub fn empty_with_error(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            ..Self::default()
        }
    }

    pub fn all_valid(&self) -> bool {
        self.valid_count == self.total_count
    }
}

/// Binding of one (possibly synthetic) field identity to a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
    /// Field identity; `"{definition}_{k}"` for extra repeating claims.
    pub field: String,
    /// Name of the schema field definition this match was made for.
    pub definition: String,
    pub column: Option<String>,
    pub match_type: MatchType,
    /// Always within `[0, 100]`.
    pub score: f64,
    /// Raw name similarity, recorded for fuzzy matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    pub validation: ValidationSummary,
}

impl FieldMatch {
    pub fn new(
        field: impl Into<String>,
        column: impl Into<String>,
        match_type: MatchType,
        score: f64,
        validation: ValidationSummary,
    ) -> Self {
        let field = field.into();
        Self {
            definition: field.clone(),
            field,
            column: Some(column.into()),
            match_type,
            score: clamp_score(score),
            similarity: None,
            validation,
        }
    }

    /// No usable column was found for the field.
    pub fn unmatched(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            definition: field.clone(),
            field,
            column: None,
            match_type: MatchType::None,
            score: 0.0,
            similarity: None,
            validation: ValidationSummary::empty_with_error("No matching column found"),
        }
    }

    /// The field is absent from a caller-supplied mapping.
    pub fn not_mapped(field: impl Into<String>) -> Self {
        Self {
            match_type: MatchType::NotMapped,
            validation: ValidationSummary::default(),
            ..Self::unmatched(field)
        }
    }

    pub fn with_similarity(mut self, similarity: f64) -> Self {
        self.similarity = Some(similarity);
        self
    }

    /// Re-labels the match under a synthetic identity, keeping its definition.
    pub fn renamed(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn is_matched(&self) -> bool {
        self.column.is_some()
    }
}

/// Clamps a score into `[0, 100]`; NaN becomes 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// Ordered collection of field matches keyed by field identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMatches {
    entries: Vec<FieldMatch>,
}

impl FieldMatches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry with the same field identity.
    pub fn insert(&mut self, entry: FieldMatch) {
        match self.entries.iter_mut().find(|m| m.field == entry.field) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldMatch> {
        self.entries.iter().find(|m| m.field == field)
    }

    pub fn column_for(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(|m| m.column.as_deref())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldMatch> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn matched(&self) -> impl Iterator<Item = &FieldMatch> {
        self.entries.iter().filter(|m| m.is_matched())
    }

    /// Reverse map from column to the match that claimed it.
    ///
    /// When two entries name the same column the later one wins.
    pub fn by_column(&self) -> BTreeMap<&str, &FieldMatch> {
        let mut map = BTreeMap::new();
        for entry in &self.entries {
            if let Some(column) = entry.column.as_deref() {
                map.insert(column, entry);
            }
        }
        map
    }
}

impl<'a> IntoIterator for &'a FieldMatches {
    type Item = &'a FieldMatch;
    type IntoIter = std::slice::Iter<'a, FieldMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<FieldMatch> for FieldMatches {
    fn from_iter<T: IntoIterator<Item = FieldMatch>>(iter: T) -> Self {
        let mut matches = Self::new();
        for entry in iter {
            matches.insert(entry);
        }
        matches
    }
}

/// Coverage score of one schema against a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaScore {
    pub schema_name: String,
    pub document_type: String,
    pub score: f64,
}
