//! Binding a single schema field to the best unclaimed column.
//!
//! The cascade runs in a fixed order and the first step that produces a
//! column wins:
//!
//! 1. content validation above the acceptance threshold
//! 2. exact field name (100)
//! 3. exact slug (100)
//! 4. case-insensitive field name (98)
//! 5. case-insensitive slug (95)
//! 6. normalized name, ignoring case, spaces and underscores (90)
//! 7. fuzzy name similarity weighted with content validity
//! 8. the best content match that cleared the minimum threshold
//!
//! When nothing applies the field is reported unmatched.

use std::collections::BTreeSet;

use tracing::debug;

use docmatch_model::{
    ColumnProfile, Dataset, EngineOptions, FieldDefinition, FieldMatch, MatchType, Schema,
    ValidationSummary,
};
use docmatch_validate::{similarity, validate_field_values};

const EXACT_SCORE: f64 = 100.0;
const CASE_INSENSITIVE_FIELD_SCORE: f64 = 98.0;
const CASE_INSENSITIVE_SLUG_SCORE: f64 = 95.0;
const NORMALIZED_SCORE: f64 = 90.0;

/// Column candidate with its content validation for the current field.
struct Candidate<'c> {
    column: &'c str,
    validation: ValidationSummary,
}

/// Matches fields of one schema against the columns of one dataset.
#[derive(Debug, Clone, Copy)]
pub struct FieldMatcher<'a> {
    schema: &'a Schema,
    dataset: &'a Dataset,
    columns: &'a [ColumnProfile],
    options: &'a EngineOptions,
}

impl<'a> FieldMatcher<'a> {
    pub fn new(
        schema: &'a Schema,
        dataset: &'a Dataset,
        columns: &'a [ColumnProfile],
        options: &'a EngineOptions,
    ) -> Self {
        Self {
            schema,
            dataset,
            columns,
            options,
        }
    }

    /// Finds the best column for `field` among columns not in `claimed`.
    pub fn find_best(&self, field: &FieldDefinition, claimed: &BTreeSet<String>) -> FieldMatch {
        let candidates: Vec<Candidate<'_>> = self
            .columns
            .iter()
            .filter(|profile| !claimed.contains(&profile.name))
            .map(|profile| Candidate {
                column: profile.name.as_str(),
                validation: validate_field_values(
                    &profile.name,
                    field,
                    &self.dataset.rows,
                    self.schema,
                    self.options,
                ),
            })
            .collect();

        let found = self.resolve(field, &candidates);
        match &found.column {
            Some(column) => debug!(
                field = %field.name,
                column = %column,
                strategy = %found.match_type,
                score = found.score,
                "field matched"
            ),
            None => debug!(field = %field.name, "no matching column"),
        }
        found
    }

    fn resolve(&self, field: &FieldDefinition, candidates: &[Candidate<'_>]) -> FieldMatch {
        let content = best_content(candidates, self.options.content_min_percentage);
        if let Some(best) = content
            && best.validation.valid_percentage > self.options.content_accept_percentage
        {
            return content_match(field, best);
        }

        if let Some(found) = name_match(field, candidates) {
            return found;
        }

        if let Some(found) = self.fuzzy_match(field, candidates) {
            return found;
        }

        match content {
            Some(best) => content_match(field, best),
            None => FieldMatch::unmatched(&field.name),
        }
    }

    fn fuzzy_match(&self, field: &FieldDefinition, candidates: &[Candidate<'_>]) -> Option<FieldMatch> {
        let options = self.options;
        let mut best: Option<(&Candidate<'_>, f64, f64)> = None;
        for candidate in candidates {
            let column = fuzzy_key(candidate.column);
            for slug in &field.slug {
                let name_similarity = similarity(&fuzzy_key(slug), &column);
                if name_similarity < options.fuzzy_similarity_floor {
                    continue;
                }
                let combined = name_similarity * options.fuzzy_similarity_weight
                    + candidate.validation.valid_percentage * options.fuzzy_content_weight;
                if best.is_none_or(|(_, score, _)| combined > score) {
                    best = Some((candidate, combined, name_similarity));
                }
            }
        }
        best.map(|(candidate, combined, name_similarity)| {
            FieldMatch::new(
                &field.name,
                candidate.column,
                MatchType::Fuzzy,
                combined,
                candidate.validation.clone(),
            )
            .with_similarity(name_similarity)
        })
    }
}

/// Highest valid percentage strictly above `minimum`; earlier columns win ties.
fn best_content<'c, 'a>(candidates: &'c [Candidate<'a>], minimum: f64) -> Option<&'c Candidate<'a>> {
    let mut best: Option<&Candidate<'_>> = None;
    for candidate in candidates {
        let pct = candidate.validation.valid_percentage;
        if pct > minimum && best.is_none_or(|b| pct > b.validation.valid_percentage) {
            best = Some(candidate);
        }
    }
    best
}

fn content_match(field: &FieldDefinition, candidate: &Candidate<'_>) -> FieldMatch {
    FieldMatch::new(
        &field.name,
        candidate.column,
        MatchType::ContentValidation,
        candidate.validation.valid_percentage,
        candidate.validation.clone(),
    )
}

/// Name heuristics in decreasing order of specificity.
fn name_match(field: &FieldDefinition, candidates: &[Candidate<'_>]) -> Option<FieldMatch> {
    let bind = |candidate: &Candidate<'_>, match_type, score| {
        FieldMatch::new(
            &field.name,
            candidate.column,
            match_type,
            score,
            candidate.validation.clone(),
        )
    };
    let find = |pred: &dyn Fn(&str) -> bool| candidates.iter().find(|c| pred(c.column));

    if let Some(c) = find(&|column| column == field.name) {
        return Some(bind(c, MatchType::ExactFieldName, EXACT_SCORE));
    }

    for slug in &field.slug {
        if let Some(c) = find(&|column| column == slug) {
            return Some(bind(c, MatchType::ExactSlug, EXACT_SCORE));
        }
    }

    let field_lower = field.name.to_lowercase();
    if let Some(c) = find(&|column| column.to_lowercase() == field_lower) {
        return Some(bind(c, MatchType::CaseInsensitiveField, CASE_INSENSITIVE_FIELD_SCORE));
    }

    let slugs_lower: Vec<String> = field.slug.iter().map(|s| s.to_lowercase()).collect();
    if let Some(c) = find(&|column| slugs_lower.contains(&column.to_lowercase())) {
        return Some(bind(c, MatchType::CaseInsensitive, CASE_INSENSITIVE_SLUG_SCORE));
    }

    let targets = std::iter::once(&field.name).chain(field.slug.iter());
    for target in targets {
        let key = normalized_key(target);
        if let Some(c) = find(&|column| normalized_key(column) == key) {
            return Some(bind(c, MatchType::NormalizedMatch, NORMALIZED_SCORE));
        }
    }

    None
}

/// Lowercase with spaces and underscores removed.
pub fn normalized_key(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| *c != '_' && *c != ' ')
        .collect()
}

/// Lowercase with underscores read as spaces.
pub fn fuzzy_key(name: &str) -> String {
    name.to_lowercase().replace('_', " ")
}
