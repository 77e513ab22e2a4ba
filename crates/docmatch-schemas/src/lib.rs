#![deny(unsafe_code)]

pub mod definition;
pub mod error;
pub mod paths;
pub mod store;

pub use crate::definition::{DEFAULT_LEV_DISTANCE, RawField, RawSchema, compile_schema, parse_schema};
pub use crate::error::{DefectKind, SchemaDefect, SchemaStoreError};
pub use crate::paths::{DEFAULT_SCHEMAS_DIR, SCHEMAS_ENV_VAR, default_schemas_dir};
pub use crate::store::SchemaStore;
