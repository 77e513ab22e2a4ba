//! Integration tests for CSV and mapping file handling.

use std::fs;

use docmatch_cli::input::{read_dataset, read_mapping, write_json};
use docmatch_map::{FieldMappingArtifact, MappingSource, validate_dataset};
use docmatch_model::EngineOptions;
use docmatch_schemas::SchemaStore;

const PAYMENTS_SCHEMA: &str = r#"{
    "type": "PAYMENT_RUN",
    "fields": {
        "ACCOUNT_NUMBER": {"validate_type": "BANK_ACCOUNT_NUMBER", "required": true, "slug": ["ACCOUNT"]},
        "AMOUNT": {"validate_type": "DECIMAL_AMOUNT", "required": true, "slug": ["AMOUNT"]}
    }
}"#;

#[test]
fn reads_headers_without_bom_and_keeps_cells_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.csv");
    fs::write(&path, "\u{feff}Account, Amount \n 12345678 ,100.50\n87654321,\n").unwrap();

    let dataset = read_dataset(&path).unwrap();
    assert_eq!(dataset.columns, vec!["Account", "Amount"]);
    assert_eq!(dataset.row_count(), 2);
    assert_eq!(dataset.rows[0]["Account"], " 12345678 ");
    assert_eq!(dataset.rows[1]["Amount"], "");
}

#[test]
fn short_records_leave_columns_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ragged.csv");
    fs::write(&path, "A,B,C\n1,2\n").unwrap();

    let dataset = read_dataset(&path).unwrap();
    assert_eq!(dataset.rows[0].get("C"), None);
    assert_eq!(dataset.column_values("C").collect::<Vec<_>>(), vec![""]);
}

#[test]
fn missing_csv_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");
    let error = read_dataset(&path).unwrap_err();
    assert!(format!("{error:#}").contains("absent.csv"));
}

#[test]
fn malformed_mapping_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mapping.json");
    fs::write(&path, "[1, 2]").unwrap();
    let error = read_mapping(&path).unwrap_err();
    assert!(format!("{error:#}").contains("parse mapping"));
}

#[test]
fn written_mapping_replays_the_detection() {
    let dir = tempfile::tempdir().unwrap();
    let schemas = dir.path().join("schemas");
    fs::create_dir(&schemas).unwrap();
    fs::write(schemas.join("payments.json"), PAYMENTS_SCHEMA).unwrap();
    let csv = dir.path().join("input.csv");
    fs::write(&csv, "ACCOUNT,AMOUNT\n12345678,100.50\n87654321,abc\n").unwrap();

    let store = SchemaStore::open(&schemas, Default::default()).unwrap();
    let dataset = read_dataset(&csv).unwrap();
    let options = EngineOptions::default();
    let detected = validate_dataset(&dataset, &store, None, &options).unwrap();
    assert_eq!(detected.source, MappingSource::Detected);
    assert_eq!(detected.schema_name, "payments");
    assert_eq!(detected.report.invalid_rows, 1);

    let schema = store.get_required(&detected.schema_name).unwrap();
    let generated = FieldMappingArtifact::from_matches(schema, &detected.field_matches);
    assert!(generated.missing_required.is_empty());
    let mapping_path = dir.path().join("mapping.json");
    write_json(&mapping_path, &generated.mapping).unwrap();

    let mapping = read_mapping(&mapping_path).unwrap();
    assert_eq!(mapping, generated.mapping);
    let replayed = validate_dataset(&dataset, &store, Some(&mapping), &options).unwrap();
    assert_eq!(replayed.source, MappingSource::Manual);
    assert_eq!(replayed.schema_name, "payments");
    assert_eq!(replayed.match_score, 100.0);
    assert_eq!(replayed.report, detected.report);
}
