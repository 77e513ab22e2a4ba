use std::fs;
use std::path::Path;

use docmatch_model::{ModelError, TypePolicy, ValidateType};
use docmatch_schemas::{DefectKind, SchemaStore, SchemaStoreError};

const SHAREHOLDERS: &str = r#"{
    "type": "SHAREHOLDER_REGISTER",
    "fields": {
        "SHAREHOLDER_ID_NUMBER": {"validate_type": "SA_ID_NUMBER", "required": true, "slug": ["ID_NUMBER"]},
        "COMPANY_NAME": {"required": true, "slug": ["COMPANY"]}
    }
}"#;

const BANKING: &str = r#"{
    "type": "BANKING_DETAILS",
    "schema": {
        "ACCOUNT_NUMBER": {"validate_type": "BANK_ACCOUNT_NUMBER", "required": true},
        "PHONE": {"validate_type": "TELEPHONE"}
    }
}"#;

fn write(dir: &Path, file: &str, contents: &str) {
    fs::write(dir.join(file), contents).expect("write schema");
}

#[test]
fn loads_json_documents_by_file_stem() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "shareholders.json", SHAREHOLDERS);
    write(dir.path(), "banking.json", BANKING);
    write(dir.path(), "README.md", "not a schema");

    let store = SchemaStore::open(dir.path(), TypePolicy::Permissive).expect("open");
    assert_eq!(store.len(), 2);
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["banking", "shareholders"]);

    let schema = store.get_required("shareholders").expect("schema");
    assert_eq!(schema.document_type, "SHAREHOLDER_REGISTER");
    assert_eq!(
        schema.field("SHAREHOLDER_ID_NUMBER").map(|f| f.validate_type()),
        Some(ValidateType::SaIdNumber)
    );
}

#[test]
fn unknown_type_is_tolerated_when_permissive() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "banking.json", BANKING);

    let store = SchemaStore::open(dir.path(), TypePolicy::Permissive).expect("open");
    let phone = store
        .get("banking")
        .and_then(|s| s.field("PHONE"))
        .expect("phone field");
    assert_eq!(phone.validate_type(), ValidateType::None);
    assert_eq!(store.defects().len(), 1);
    assert!(!store.defects()[0].kind.is_fatal());
}

#[test]
fn unknown_type_rejects_schema_when_strict() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "banking.json", BANKING);
    write(dir.path(), "shareholders.json", SHAREHOLDERS);

    let store = SchemaStore::open(dir.path(), TypePolicy::Strict).expect("open");
    assert_eq!(store.policy(), TypePolicy::Strict);
    assert!(store.get("banking").is_none());
    assert_eq!(store.len(), 1);
    assert!(store.defects()[0].kind.is_fatal());
}

#[test]
fn schema_without_fields_is_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "empty.json", r#"{"type": "EMPTY"}"#);
    write(dir.path(), "broken.json", "{ not json");
    write(dir.path(), "shareholders.json", SHAREHOLDERS);

    let store = SchemaStore::open(dir.path(), TypePolicy::Permissive).expect("open");
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["shareholders"]);

    let kinds: Vec<&DefectKind> = store.defects().iter().map(|d| &d.kind).collect();
    assert!(matches!(kinds[0], DefectKind::Malformed(_)));
    assert_eq!(kinds[1], &DefectKind::MissingFields);
}

#[test]
fn extra_match_name_shadowing_a_field_rejects_schema() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "contacts.json",
        r#"{"fields": {"PHONE": {"max_matches": 2}, "PHONE_2": {"slug": ["MOBILE"]}}}"#,
    );
    write(dir.path(), "shareholders.json", SHAREHOLDERS);

    let store = SchemaStore::open(dir.path(), TypePolicy::Permissive).expect("open");
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["shareholders"]);
    let defect = &store.defects()[0];
    assert_eq!(defect.schema, "contacts");
    assert!(matches!(
        &defect.kind,
        DefectKind::Rejected(ModelError::SyntheticNameCollision { synthetic, .. }) if synthetic == "PHONE_2"
    ));
}

#[test]
fn missing_registry_is_a_configuration_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = SchemaStore::open(dir.path().join("absent"), TypePolicy::Permissive).unwrap_err();
    assert!(matches!(err, SchemaStoreError::RegistryMissing { .. }));
    assert!(err.is_configuration_error());
}

#[test]
fn registry_without_valid_schemas_is_a_configuration_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "empty.json", r#"{"type": "EMPTY"}"#);

    let err = SchemaStore::open(dir.path(), TypePolicy::Permissive).unwrap_err();
    assert!(matches!(
        err,
        SchemaStoreError::NoValidSchemas { skipped: 1, .. }
    ));
}

#[test]
fn reload_picks_up_changes_and_keeps_state_on_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "shareholders.json", SHAREHOLDERS);

    let mut store = SchemaStore::open(dir.path(), TypePolicy::Permissive).expect("open");
    assert_eq!(store.len(), 1);

    write(dir.path(), "banking.json", BANKING);
    store.reload().expect("reload");
    assert_eq!(store.len(), 2);

    fs::remove_file(dir.path().join("banking.json")).expect("remove");
    fs::remove_file(dir.path().join("shareholders.json")).expect("remove");
    assert!(store.reload().is_err());
    assert_eq!(store.len(), 2);
}

#[test]
fn unknown_schema_lookup() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "shareholders.json", SHAREHOLDERS);

    let store = SchemaStore::open(dir.path(), TypePolicy::Permissive).expect("open");
    let err = store.get_required("invoices").unwrap_err();
    assert!(!err.is_configuration_error());
}

#[test]
fn in_memory_store_requires_a_schema() {
    let err = SchemaStore::from_schemas(Vec::new()).unwrap_err();
    assert!(matches!(err, SchemaStoreError::NoValidSchemas { .. }));
}
