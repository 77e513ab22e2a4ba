use docmatch_schemas::SchemaStoreError;

/// Failures that abort a detection pass.
///
/// Unmatched fields and invalid values are reported in the result, never
/// raised.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no schemas available for detection")]
    NoSchemas,

    #[error(transparent)]
    Store(#[from] SchemaStoreError),
}
