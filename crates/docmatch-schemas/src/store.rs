#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use docmatch_model::{Schema, TypePolicy};

use crate::definition::{compile_schema, parse_schema};
use crate::error::{DefectKind, SchemaDefect, SchemaStoreError};

const MEMORY_LOCATION: &str = "<in-memory>";

/// Loaded schema registry.
///
/// A store is built once and handed to every consumer by reference. Schemas
/// never change underneath a caller; picking up edited documents requires an
/// explicit [`SchemaStore::reload`].
#[derive(Debug, Clone)]
pub struct SchemaStore {
    dir: Option<PathBuf>,
    policy: TypePolicy,
    schemas: BTreeMap<String, Schema>,
    defects: Vec<SchemaDefect>,
}

impl SchemaStore {
    /// Loads every `*.json` schema document in `dir`.
    pub fn open(dir: impl Into<PathBuf>, policy: TypePolicy) -> Result<Self, SchemaStoreError> {
        let dir = dir.into();
        let (schemas, defects) = load_registry(&dir, policy)?;
        Ok(Self {
            dir: Some(dir),
            policy,
            schemas,
            defects,
        })
    }

    /// Builds a store from schema values already in memory.
    pub fn from_schemas<I>(schemas: I) -> Result<Self, SchemaStoreError>
    where
        I: IntoIterator<Item = Schema>,
    {
        let schemas: BTreeMap<String, Schema> = schemas
            .into_iter()
            .map(|schema| (schema.name.clone(), schema))
            .collect();
        if schemas.is_empty() {
            return Err(SchemaStoreError::NoValidSchemas {
                location: MEMORY_LOCATION.to_string(),
                skipped: 0,
            });
        }
        Ok(Self {
            dir: None,
            policy: TypePolicy::default(),
            schemas,
            defects: Vec::new(),
        })
    }

    /// Re-reads the registry directory.
    ///
    /// On failure the previously loaded schemas stay in place. In-memory
    /// stores have nothing to re-read.
    pub fn reload(&mut self) -> Result<(), SchemaStoreError> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        let (schemas, defects) = load_registry(dir, self.policy)?;
        self.schemas = schemas;
        self.defects = defects;
        Ok(())
    }

    /// Schemas ordered by name.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn get_required(&self, name: &str) -> Result<&Schema, SchemaStoreError> {
        self.get(name).ok_or_else(|| SchemaStoreError::UnknownSchema {
            name: name.to_string(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Problems found during the last load, skipped and tolerated alike.
    pub fn defects(&self) -> &[SchemaDefect] {
        &self.defects
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn policy(&self) -> TypePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

type Loaded = (BTreeMap<String, Schema>, Vec<SchemaDefect>);

fn load_registry(dir: &Path, policy: TypePolicy) -> Result<Loaded, SchemaStoreError> {
    if !dir.is_dir() {
        return Err(SchemaStoreError::RegistryMissing {
            path: dir.to_path_buf(),
        });
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| SchemaStoreError::io(dir, e))? {
        let entry = entry.map_err(|e| SchemaStoreError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() && is_json(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut schemas = BTreeMap::new();
    let mut defects = Vec::new();
    let mut skipped = 0usize;

    for path in paths {
        let name = schema_name(&path);
        match load_document(&name, &path, policy) {
            Ok((schema, tolerated)) => {
                for err in tolerated {
                    warn!(schema = %name, "schema defect tolerated: {err}");
                    defects.push(SchemaDefect {
                        schema: name.clone(),
                        path: Some(path.clone()),
                        kind: DefectKind::Tolerated(err),
                    });
                }
                debug!(
                    schema = %name,
                    document_type = %schema.document_type,
                    fields = schema.fields().len(),
                    "loaded schema"
                );
                schemas.insert(name, schema);
            }
            Err(kind) => {
                warn!(schema = %name, path = %path.display(), "skipping schema: {kind}");
                skipped += 1;
                defects.push(SchemaDefect {
                    schema: name,
                    path: Some(path),
                    kind,
                });
            }
        }
    }

    if schemas.is_empty() {
        return Err(SchemaStoreError::NoValidSchemas {
            location: dir.display().to_string(),
            skipped,
        });
    }

    info!(
        count = schemas.len(),
        skipped,
        dir = %dir.display(),
        "loaded schema registry"
    );
    Ok((schemas, defects))
}

fn load_document(
    name: &str,
    path: &Path,
    policy: TypePolicy,
) -> Result<(Schema, Vec<docmatch_model::ModelError>), DefectKind> {
    let text =
        std::fs::read_to_string(path).map_err(|e| DefectKind::Unreadable(e.to_string()))?;
    let raw = parse_schema(&text)?;
    let compiled = compile_schema(name, raw, policy)?;
    Ok((compiled.schema, compiled.tolerated))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn schema_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
