//! End-to-end detection: pick a schema, bind columns, validate rows.

use serde::Serialize;
use tracing::{info, info_span};

use docmatch_model::{
    AggregateValidationReport, Dataset, EngineOptions, FieldMatches, RowValidationResult,
    SchemaScore,
};
use docmatch_schemas::SchemaStore;
use docmatch_validate::RowValidator;

use crate::artifact::FieldMappingArtifact;
use crate::error::DetectionError;
use crate::manual::apply_mapping;
use crate::profile::profile;
use crate::selector::{Selection, SchemaMatch, match_schema, select};

/// How the field matches of a run were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingSource {
    /// Every registered schema was scored.
    Detected,
    /// The caller named the schema.
    Forced,
    /// A saved mapping was replayed.
    Manual,
}

/// Everything a detection pass produces for one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationRun {
    pub schema_name: String,
    pub document_type: String,
    pub match_score: f64,
    pub source: MappingSource,
    pub field_matches: FieldMatches,
    pub candidates: Vec<SchemaScore>,
    pub rows: Vec<RowValidationResult>,
    pub report: AggregateValidationReport,
    pub all_columns: Vec<String>,
}

/// Configures and runs detection against a schema store.
#[derive(Debug, Clone, Copy)]
pub struct Detector<'a> {
    store: &'a SchemaStore,
    options: &'a EngineOptions,
    mapping: Option<&'a FieldMappingArtifact>,
    schema: Option<&'a str>,
}

impl<'a> Detector<'a> {
    pub fn new(store: &'a SchemaStore, options: &'a EngineOptions) -> Self {
        Self {
            store,
            options,
            mapping: None,
            schema: None,
        }
    }

    /// Replays a saved mapping instead of scoring schemas. Empty mappings
    /// are ignored.
    pub fn with_mapping(mut self, mapping: Option<&'a FieldMappingArtifact>) -> Self {
        self.mapping = mapping.filter(|m| !m.is_empty());
        self
    }

    /// Matches against one named schema only.
    pub fn with_schema(mut self, schema: Option<&'a str>) -> Self {
        self.schema = schema;
        self
    }

    pub fn run(&self, dataset: &Dataset) -> Result<ValidationRun, DetectionError> {
        let _span = info_span!(
            "detect",
            columns = dataset.columns.len(),
            rows = dataset.row_count()
        )
        .entered();

        let (selection, source) = self.select(dataset)?;
        let validator = RowValidator::new(selection.schema, &selection.matches);
        let rows = validator.validate_rows(&dataset.rows);
        let report = validator.report(selection.score, &rows);
        info!(
            schema = %selection.schema.name,
            valid_rows = report.valid_rows,
            invalid_rows = report.invalid_rows,
            "validation complete"
        );

        Ok(ValidationRun {
            schema_name: selection.schema.name.clone(),
            document_type: selection.schema.document_type.clone(),
            match_score: selection.score,
            source,
            field_matches: selection.matches,
            candidates: selection.candidates,
            rows,
            report,
            all_columns: dataset.columns.clone(),
        })
    }

    fn select(&self, dataset: &Dataset) -> Result<(Selection<'a>, MappingSource), DetectionError> {
        if let Some(name) = self.schema {
            let schema = self.store.get_required(name)?;
            return match self.mapping {
                Some(mapping) => Ok((
                    apply_mapping([schema], dataset, mapping, self.options)?,
                    MappingSource::Manual,
                )),
                None => {
                    let columns = profile(dataset, self.options.sample_size);
                    let SchemaMatch { score, matches } =
                        match_schema(schema, dataset, &columns, self.options);
                    info!("Schema {} match score: {:.2}%", schema.name, score);
                    let candidates = vec![SchemaScore {
                        schema_name: schema.name.clone(),
                        document_type: schema.document_type.clone(),
                        score,
                    }];
                    Ok((
                        Selection {
                            schema,
                            score,
                            matches,
                            candidates,
                        },
                        MappingSource::Forced,
                    ))
                }
            };
        }

        match self.mapping {
            Some(mapping) => Ok((
                apply_mapping(self.store.schemas(), dataset, mapping, self.options)?,
                MappingSource::Manual,
            )),
            None => Ok((
                select(self.store.schemas(), dataset, self.options)?,
                MappingSource::Detected,
            )),
        }
    }
}

/// Detects the document type of `dataset` and validates every row.
///
/// A non-empty `mapping` bypasses schema scoring.
pub fn validate_dataset(
    dataset: &Dataset,
    store: &SchemaStore,
    mapping: Option<&FieldMappingArtifact>,
    options: &EngineOptions,
) -> Result<ValidationRun, DetectionError> {
    Detector::new(store, options).with_mapping(mapping).run(dataset)
}
