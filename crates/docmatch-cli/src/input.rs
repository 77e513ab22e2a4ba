//! File I/O around the engine: CSV datasets and mapping artifacts.

use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Serialize;

use docmatch_map::FieldMappingArtifact;
use docmatch_model::{Dataset, Row};

/// Reads a CSV file with a header row into a [`Dataset`].
///
/// Header names lose a leading byte-order mark and surrounding whitespace.
/// Cell values are kept verbatim; short records leave their trailing
/// columns absent.
pub fn read_dataset(path: &Path) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;

    let columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("read headers: {}", path.display()))?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let row: Row = columns
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.clone(), value.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(Dataset::new(columns, rows))
}

/// Loads a saved column mapping.
pub fn read_mapping(path: &Path) -> Result<FieldMappingArtifact> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read mapping: {}", path.display()))?;
    FieldMappingArtifact::from_json(&text)
        .with_context(|| format!("parse mapping: {}", path.display()))
}

/// Writes `value` as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize json")?;
    std::fs::write(path, text).with_context(|| format!("write {}", path.display()))
}
