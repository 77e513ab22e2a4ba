//! Schema registry path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the schema registry directory.
pub const SCHEMAS_ENV_VAR: &str = "DOCMATCH_SCHEMAS_DIR";

/// Directory name used when no override is set.
pub const DEFAULT_SCHEMAS_DIR: &str = "schemas";

/// Get the schema registry directory.
///
/// Resolution order:
/// 1. `DOCMATCH_SCHEMAS_DIR` environment variable
/// 2. `schemas/` relative to the working directory
pub fn default_schemas_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(SCHEMAS_ENV_VAR)
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }
    PathBuf::from(DEFAULT_SCHEMAS_DIR)
}
