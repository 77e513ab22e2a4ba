#![deny(unsafe_code)]

use std::path::PathBuf;

use docmatch_model::ModelError;

/// Registry-level failures. These are the only errors that abort a
/// detection pass.
#[derive(Debug, thiserror::Error)]
pub enum SchemaStoreError {
    #[error("schema registry not found: {path}")]
    RegistryMissing { path: PathBuf },

    #[error("failed to read schema registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no valid schemas found in {location} ({skipped} skipped)")]
    NoValidSchemas { location: String, skipped: usize },

    #[error("unknown schema: {name}")]
    UnknownSchema { name: String },
}

impl SchemaStoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures that mean the registry itself is unusable.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, Self::UnknownSchema { .. })
    }
}

/// Problem found in a single schema document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DefectKind {
    #[error("unreadable: {0}")]
    Unreadable(String),
    #[error("malformed JSON: {0}")]
    Malformed(String),
    #[error("'fields' map not found")]
    MissingFields,
    #[error("rejected: {0}")]
    Rejected(ModelError),
    #[error("tolerated: {0}")]
    Tolerated(ModelError),
}

impl DefectKind {
    /// True when the schema was skipped because of this defect.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Tolerated(_))
    }
}

/// A defect attributed to a schema document.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDefect {
    pub schema: String,
    pub path: Option<PathBuf>,
    pub kind: DefectKind,
}

impl std::fmt::Display for SchemaDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} ({}): {}", self.schema, path.display(), self.kind),
            None => write!(f, "{}: {}", self.schema, self.kind),
        }
    }
}
