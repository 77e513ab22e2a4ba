//! Scoring every schema against a dataset and picking the best cover.

use std::collections::BTreeSet;

use tracing::{debug_span, info};

use docmatch_model::{
    ClaimPhase, ColumnProfile, Dataset, EngineOptions, FieldDefinition, FieldMatch, FieldMatches,
    Schema, SchemaScore, clamp_score,
};

use crate::error::DetectionError;
use crate::matcher::FieldMatcher;
use crate::profile::profile;

/// Field matches of one schema and their coverage score.
#[derive(Debug, Clone)]
pub struct SchemaMatch {
    pub score: f64,
    pub matches: FieldMatches,
}

/// The chosen schema for a dataset.
#[derive(Debug, Clone)]
pub struct Selection<'s> {
    pub schema: &'s Schema,
    pub score: f64,
    pub matches: FieldMatches,
    /// Score of every schema considered, in evaluation order.
    pub candidates: Vec<SchemaScore>,
}

/// Assigns dataset columns to the fields of `schema`.
///
/// Single-match fields claim columns first, in declaration order. Repeating
/// fields then claim up to `max_matches` further columns each, recorded as
/// `FIELD`, `FIELD_2`, `FIELD_3`, and stop at the first miss.
pub fn match_schema(
    schema: &Schema,
    dataset: &Dataset,
    columns: &[ColumnProfile],
    options: &EngineOptions,
) -> SchemaMatch {
    let _span = debug_span!("match_schema", schema = %schema.name).entered();
    let matcher = FieldMatcher::new(schema, dataset, columns, options);
    let mut claimed: BTreeSet<String> = BTreeSet::new();
    let mut matches = FieldMatches::new();

    for (phase, field) in schema.claim_plan() {
        match phase {
            ClaimPhase::Single => {
                let found = matcher.find_best(field, &claimed);
                claim(&mut claimed, &found);
                matches.insert(found);
            }
            ClaimPhase::Repeating(_) => {
                let first = matcher.find_best(field, &claimed);
                let matched = claim(&mut claimed, &first);
                matches.insert(first);
                if !matched {
                    continue;
                }
                for synthetic in field.extra_match_names() {
                    let extra = matcher.find_best(field, &claimed);
                    if !claim(&mut claimed, &extra) {
                        break;
                    }
                    matches.insert(extra.renamed(synthetic));
                }
            }
        }
    }

    SchemaMatch {
        score: coverage_score(schema, &matches),
        matches,
    }
}

fn claim(claimed: &mut BTreeSet<String>, found: &FieldMatch) -> bool {
    match &found.column {
        Some(column) => {
            claimed.insert(column.clone());
            true
        }
        None => false,
    }
}

/// Percentage of required fields bound to a column, or of all fields when
/// the schema declares none as required.
///
/// Only primary matches count, so repeating fields never push the score
/// past 100.
pub fn coverage_score(schema: &Schema, matches: &FieldMatches) -> f64 {
    let is_bound = |field: &FieldDefinition| {
        matches
            .get(&field.name)
            .is_some_and(FieldMatch::is_matched)
    };
    let required: Vec<&FieldDefinition> = schema.required_fields().collect();
    let (bound, total) = if required.is_empty() {
        let fields = schema.fields();
        (fields.iter().filter(|&f| is_bound(f)).count(), fields.len())
    } else {
        (required.iter().filter(|&&f| is_bound(f)).count(), required.len())
    };
    if total == 0 {
        return 0.0;
    }
    clamp_score(bound as f64 / total as f64 * 100.0)
}

/// Runs [`match_schema`] for every schema and keeps the highest score.
///
/// Ties go to the schema evaluated first.
pub fn select<'s, I>(
    schemas: I,
    dataset: &Dataset,
    options: &EngineOptions,
) -> Result<Selection<'s>, DetectionError>
where
    I: IntoIterator<Item = &'s Schema>,
{
    let columns = profile(dataset, options.sample_size);
    let mut candidates = Vec::new();
    let mut best: Option<(&'s Schema, SchemaMatch)> = None;

    for schema in schemas {
        let result = match_schema(schema, dataset, &columns, options);
        info!(
            "Schema {} match score: {:.2}%",
            schema.name, result.score
        );
        candidates.push(SchemaScore {
            schema_name: schema.name.clone(),
            document_type: schema.document_type.clone(),
            score: result.score,
        });
        if best
            .as_ref()
            .is_none_or(|(_, current)| result.score > current.score)
        {
            best = Some((schema, result));
        }
    }

    let (schema, result) = best.ok_or(DetectionError::NoSchemas)?;
    info!(
        "Best matching schema: {} with score {:.2}%",
        schema.name, result.score
    );
    Ok(Selection {
        schema,
        score: result.score,
        matches: result.matches,
        candidates,
    })
}
