//! Persistable column-to-field mapping.
//!
//! A mapping is a JSON object keyed by column name:
//!
//! ```json
//! {
//!   "ID Number": {
//!     "type": "SHAREHOLDER_ID_NUMBER",
//!     "validation": "SA_ID_NUMBER",
//!     "required": true,
//!     "slug": ["ID_NUMBER"]
//!   },
//!   "Company": "COMPANY_NAME"
//! }
//! ```
//!
//! The bare string form is an older layout that only names the field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use docmatch_model::{FieldDefinition, FieldMatches, Schema, ValidationRule};

/// Mapping of one column to a schema field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EntryRepr")]
pub struct MappingEntry {
    /// Name of the schema field the column holds.
    #[serde(rename = "type")]
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slug: Vec<String>,
}

impl MappingEntry {
    /// An entry naming only the field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            validation: None,
            validation_type: None,
            required: None,
            description: None,
            regex: None,
            enum_name: None,
            list: None,
            distance: None,
            slug: Vec::new(),
        }
    }

    /// An entry carrying the field's schema properties.
    pub fn for_field(field: &FieldDefinition) -> Self {
        let tag = field.validate_type().as_str().to_string();
        let mut entry = Self::new(&field.name);
        entry.validation = Some(tag.clone());
        entry.validation_type = Some(tag);
        entry.required = field.required.then_some(true);
        entry.description = field.description.clone();
        entry.slug = field.slug.clone();
        match &field.rule {
            ValidationRule::Regex(rule) => entry.regex = Some(rule.pattern().to_string()),
            ValidationRule::Enum { name } => entry.enum_name = Some(name.clone()),
            ValidationRule::LevDistance { list, distance } => {
                entry.list = Some(list.clone());
                entry.distance = Some(*distance);
            }
            _ => {}
        }
        entry
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntryRepr {
    Legacy(String),
    Full(FullEntry),
}

#[derive(Deserialize)]
struct FullEntry {
    #[serde(rename = "type")]
    field: String,
    #[serde(default)]
    validation: Option<String>,
    #[serde(default)]
    validation_type: Option<String>,
    #[serde(default)]
    required: Option<bool>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    regex: Option<String>,
    #[serde(rename = "enum", default)]
    enum_name: Option<String>,
    #[serde(default)]
    list: Option<String>,
    #[serde(default)]
    distance: Option<f64>,
    #[serde(default)]
    slug: Vec<String>,
}

impl From<EntryRepr> for MappingEntry {
    fn from(repr: EntryRepr) -> Self {
        match repr {
            EntryRepr::Legacy(field) => Self::new(field),
            EntryRepr::Full(e) => Self {
                field: e.field,
                validation: e.validation,
                validation_type: e.validation_type,
                required: e.required,
                description: e.description,
                regex: e.regex,
                enum_name: e.enum_name,
                list: e.list,
                distance: e.distance,
                slug: e.slug,
            },
        }
    }
}

/// Column name to [`MappingEntry`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMappingArtifact {
    entries: BTreeMap<String, MappingEntry>,
}

/// A mapping built from detection results plus required fields it misses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedMapping {
    pub mapping: FieldMappingArtifact,
    pub missing_required: Vec<String>,
}

impl FieldMappingArtifact {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping from the matched columns of a detection pass.
    ///
    /// Extra columns of a repeating field are recorded under the field's own
    /// name so the mapping can be replayed.
    pub fn from_matches(schema: &Schema, matches: &FieldMatches) -> GeneratedMapping {
        let mut mapping = Self::new();
        for found in matches.matched() {
            let Some(column) = found.column.as_deref() else {
                continue;
            };
            let entry = match schema.field(&found.definition) {
                Some(field) => MappingEntry::for_field(field),
                None => MappingEntry::new(&found.definition),
            };
            mapping.insert(column, entry);
        }

        let missing_required = schema
            .required_fields()
            .filter(|field| mapping.columns_for(&field.name).next().is_none())
            .map(|field| field.name.clone())
            .collect();

        GeneratedMapping {
            mapping,
            missing_required,
        }
    }

    pub fn insert(&mut self, column: impl Into<String>, entry: MappingEntry) {
        self.entries.insert(column.into(), entry);
    }

    pub fn get(&self, column: &str) -> Option<&MappingEntry> {
        self.entries.get(column)
    }

    /// Field mapped to `column`.
    pub fn field_for(&self, column: &str) -> Option<&str> {
        self.get(column).map(|e| e.field.as_str())
    }

    /// Columns mapped to `field`, in column name order.
    pub fn columns_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(_, entry)| entry.field == field)
            .map(|(column, _)| column.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappingEntry)> {
        self.entries.iter().map(|(c, e)| (c.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_legacy_and_full_entries() {
        let artifact = FieldMappingArtifact::from_json(
            r#"{
                "Company": "COMPANY_NAME",
                "ID Number": {"type": "SHAREHOLDER_ID_NUMBER", "validation": "SA_ID_NUMBER", "required": true}
            }"#,
        )
        .expect("parse");

        assert_eq!(artifact.len(), 2);
        assert_eq!(artifact.field_for("Company"), Some("COMPANY_NAME"));
        let entry = artifact.get("ID Number").expect("entry");
        assert_eq!(entry.field, "SHAREHOLDER_ID_NUMBER");
        assert_eq!(entry.required, Some(true));
        assert_eq!(
            artifact.columns_for("SHAREHOLDER_ID_NUMBER").collect::<Vec<_>>(),
            vec!["ID Number"]
        );
    }

    #[test]
    fn rejects_entries_without_a_type() {
        assert!(FieldMappingArtifact::from_json(r#"{"A": {"validation": "NONE"}}"#).is_err());
    }
}
