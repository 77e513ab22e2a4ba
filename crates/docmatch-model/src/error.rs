use thiserror::Error;

/// Defects found while building schema or dataset values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("field {field}: unknown validate_type '{value}'")]
    UnknownValidateType { field: String, value: String },
    #[error("field {field}: invalid regex '{pattern}': {message}")]
    InvalidRegex {
        field: String,
        pattern: String,
        message: String,
    },
    #[error("field {field}: validate_type {validate_type} requires '{parameter}'")]
    MissingParameter {
        field: String,
        validate_type: &'static str,
        parameter: &'static str,
    },
    #[error("field {field}: enum '{name}' is not declared by the schema")]
    UnknownEnum { field: String, name: String },
    #[error("field {field}: list '{name}' is not declared by the schema")]
    UnknownList { field: String, name: String },
    #[error("field {field}: distance {distance} is outside 0-100")]
    DistanceOutOfRange { field: String, distance: String },
    #[error("field {field}: max_matches must be at least 1")]
    ZeroMaxMatches { field: String },
    #[error("duplicate field definition: {field}")]
    DuplicateField { field: String },
    #[error("field {field}: extra match {synthetic} collides with a declared field")]
    SyntheticNameCollision { field: String, synthetic: String },
    #[error("row {row} has {found} values but the header has {expected} columns")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
