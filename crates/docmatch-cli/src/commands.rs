use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span, trace, warn};

use docmatch_cli::input::{read_dataset, read_mapping, write_json};
use docmatch_cli::logging::redact_value;
use docmatch_map::{Detector, FieldMappingArtifact};
use docmatch_model::{EngineOptions, TypePolicy};
use docmatch_schemas::{SchemaStore, default_schemas_dir};

use crate::cli::{DetectArgs, RegistryArgs, SchemasArgs};
use crate::summary::{apply_table_style, print_defects};
use crate::types::DetectResult;

pub fn run_schemas(args: &SchemasArgs) -> Result<()> {
    let store = open_store(&args.registry)?;
    let mut table = Table::new();
    table.set_header(vec!["Schema", "Document type", "Fields", "Required", "Description"]);
    apply_table_style(&mut table);
    for schema in store.schemas() {
        table.add_row(vec![
            schema.name.clone(),
            schema.document_type.clone(),
            schema.fields().len().to_string(),
            schema.required_fields().count().to_string(),
            schema.description.clone().unwrap_or_default(),
        ]);
    }
    println!("{table}");
    print_defects(store.defects());
    Ok(())
}

pub fn run_detect(args: &DetectArgs) -> Result<DetectResult> {
    let span = info_span!("run", input = %args.input.display());
    let _guard = span.enter();

    let store = open_store(&args.registry)?;
    let options = EngineOptions::default();
    let dataset = read_dataset(&args.input)?;
    info!(
        columns = dataset.columns.len(),
        rows = dataset.row_count(),
        "loaded dataset"
    );
    let mapping = args
        .mapping
        .as_deref()
        .map(read_mapping)
        .transpose()?;
    if mapping.as_ref().is_some_and(FieldMappingArtifact::is_empty) {
        warn!("mapping file is empty, detecting schema instead");
    }

    let run = Detector::new(&store, &options)
        .with_mapping(mapping.as_ref())
        .with_schema(args.schema.as_deref())
        .run(&dataset)
        .context("detect document type")?;

    for row in &run.rows {
        for error in row.errors() {
            trace!(
                row = row.row_id,
                field = %error.field,
                value = redact_value(error.value.as_deref().unwrap_or("")),
                "{}",
                error.errors.join("; ")
            );
        }
    }

    let mut missing_required = Vec::new();
    if let Some(path) = &args.write_mapping {
        let schema = store.get_required(&run.schema_name)?;
        let generated = FieldMappingArtifact::from_matches(schema, &run.field_matches);
        for field in &generated.missing_required {
            warn!(field = %field, "required field has no column in the written mapping");
        }
        write_json(path, &generated.mapping)?;
        info!(path = %path.display(), columns = generated.mapping.len(), "wrote mapping");
        missing_required = generated.missing_required;
    }
    if let Some(path) = &args.output {
        write_json(path, &run)?;
        info!(path = %path.display(), "wrote result");
    }

    Ok(DetectResult {
        input: args.input.clone(),
        run,
        missing_required,
        mapping_written: args.write_mapping.clone(),
        output_written: args.output.clone(),
    })
}

fn open_store(registry: &RegistryArgs) -> Result<SchemaStore> {
    let dir = registry.schemas.clone().unwrap_or_else(default_schemas_dir);
    let policy = if registry.strict {
        TypePolicy::Strict
    } else {
        TypePolicy::Permissive
    };
    SchemaStore::open(&dir, policy).with_context(|| format!("load schemas: {}", dir.display()))
}
