#![deny(unsafe_code)]

//! Document type detection: column profiling, field matching, schema
//! selection and the end-to-end validation pipeline.

mod artifact;
mod error;
mod manual;
pub mod matcher;
mod pipeline;
mod profile;
mod selector;

pub use artifact::{FieldMappingArtifact, GeneratedMapping, MappingEntry};
pub use error::DetectionError;
pub use manual::apply_mapping;
pub use matcher::FieldMatcher;
pub use pipeline::{Detector, MappingSource, ValidationRun, validate_dataset};
pub use profile::profile;
pub use selector::{SchemaMatch, Selection, coverage_score, match_schema, select};
