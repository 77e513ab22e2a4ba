//! Rebuilding field matches from a previously saved mapping.

use tracing::{info, warn};

use docmatch_model::{Dataset, EngineOptions, FieldMatch, FieldMatches, MatchType, Schema, SchemaScore};
use docmatch_validate::validate_field_values;

use crate::artifact::FieldMappingArtifact;
use crate::error::DetectionError;
use crate::selector::{Selection, coverage_score};

const MANUAL_SCORE: f64 = 100.0;

/// Selects a schema and field matches straight from `mapping`.
///
/// The schema is the first one (in iteration order) that defines the field
/// of the first mapped column; dataset columns are consulted before any
/// mapping-only columns. Every mapped column is still validated so the
/// report reflects the data.
pub fn apply_mapping<'s, I>(
    schemas: I,
    dataset: &Dataset,
    mapping: &FieldMappingArtifact,
    options: &EngineOptions,
) -> Result<Selection<'s>, DetectionError>
where
    I: IntoIterator<Item = &'s Schema>,
{
    let schemas: Vec<&'s Schema> = schemas.into_iter().collect();
    let first = schemas.first().copied().ok_or(DetectionError::NoSchemas)?;
    let columns = mapped_columns(dataset, mapping);

    let owner = columns.iter().find_map(|column| {
        let field = mapping.field_for(column)?;
        schemas.iter().copied().find(|schema| schema.has_field(field))
    });
    let schema = match owner {
        Some(schema) => schema,
        None => {
            warn!(
                "Couldn't determine schema from mapping, using {}",
                first.name
            );
            first
        }
    };

    let mut matches = FieldMatches::new();
    for field in schema.fields() {
        let mapped: Vec<&str> = columns
            .iter()
            .copied()
            .filter(|column| mapping.field_for(column) == Some(field.name.as_str()))
            .take(field.max_matches as usize)
            .collect();
        if mapped.is_empty() {
            matches.insert(FieldMatch::not_mapped(&field.name));
            continue;
        }
        let identities = std::iter::once(field.name.clone()).chain(field.extra_match_names());
        for (identity, column) in identities.zip(mapped) {
            let validation = validate_field_values(column, field, &dataset.rows, schema, options);
            let found = FieldMatch::new(
                &field.name,
                column,
                MatchType::ManualMapping,
                MANUAL_SCORE,
                validation,
            );
            matches.insert(found.renamed(identity));
        }
    }

    let score = coverage_score(schema, &matches);
    info!(
        "Using existing mapping for schema: {} with calculated score {:.2}%",
        schema.name, score
    );
    Ok(Selection {
        schema,
        score,
        candidates: vec![SchemaScore {
            schema_name: schema.name.clone(),
            document_type: schema.document_type.clone(),
            score,
        }],
        matches,
    })
}

/// Mapped columns present in the dataset, in dataset order, followed by
/// the mapping's remaining columns in name order.
fn mapped_columns<'a>(dataset: &'a Dataset, mapping: &'a FieldMappingArtifact) -> Vec<&'a str> {
    let mut columns: Vec<&str> = Vec::new();
    let present = dataset
        .columns
        .iter()
        .map(String::as_str)
        .filter(|column| mapping.get(column).is_some());
    for column in present.chain(mapping.iter().map(|(column, _)| column)) {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    columns
}
