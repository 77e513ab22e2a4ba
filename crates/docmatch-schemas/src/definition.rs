//! Decoding schema documents and compiling them into typed [`Schema`] values.
//!
//! A schema document looks like:
//!
//! ```json
//! {
//!   "type": "SHAREHOLDER_REGISTER",
//!   "fields": {
//!     "SHAREHOLDER_ID_NUMBER": {
//!       "validate_type": "SA_ID_NUMBER",
//!       "required": true,
//!       "slug": ["ID_NUMBER", "ID Number"]
//!     }
//!   },
//!   "enums": { "countries": ["ZA", "NA"] },
//!   "lists": { "banks": [{ "name": "First National Bank", "aliases": ["FNB"] }] }
//! }
//! ```
//!
//! The field map may also be keyed `schema`. Field order in the document is
//! preserved because it drives column claiming.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::de::{MapAccess, Visitor};

use docmatch_model::{
    FieldDefinition, ListItem, ModelError, RegexRule, Schema, TypePolicy, UnknownValidateType,
    ValidateType, ValidationRule,
};

use crate::error::DefectKind;

/// Similarity threshold used when a LEV_DISTANCE field omits `distance`.
pub const DEFAULT_LEV_DISTANCE: f64 = 80.0;

/// A schema document as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSchema {
    #[serde(rename = "type")]
    pub document_type: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "schema")]
    pub fields: Option<OrderedFields>,
    #[serde(default)]
    pub enums: BTreeMap<String, Vec<serde_json::Value>>,
    #[serde(default)]
    pub lists: BTreeMap<String, Vec<ListItem>>,
}

/// A field entry as written on disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawField {
    pub validate_type: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub slug: Option<Vec<String>>,
    pub regex: Option<String>,
    #[serde(rename = "enum")]
    pub enum_name: Option<String>,
    pub list: Option<String>,
    pub distance: Option<f64>,
    pub max_matches: Option<u32>,
    pub description: Option<String>,
}

/// Field map decoded in document order.
#[derive(Debug, Clone, Default)]
pub struct OrderedFields(pub Vec<(String, RawField)>);

impl<'de> Deserialize<'de> for OrderedFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = OrderedFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field name to field definition")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, field)) = access.next_entry::<String, RawField>()? {
                    fields.push((name, field));
                }
                Ok(OrderedFields(fields))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// A compiled schema plus the defects tolerated while compiling it.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub schema: Schema,
    pub tolerated: Vec<ModelError>,
}

/// Parses a schema document from JSON text.
pub fn parse_schema(text: &str) -> Result<RawSchema, DefectKind> {
    serde_json::from_str(text).map_err(|e| DefectKind::Malformed(e.to_string()))
}

/// Compiles a decoded document into a [`Schema`] named `name`.
///
/// Unknown `validate_type` tags and invalid regex patterns are tolerated
/// under [`TypePolicy::Permissive`] and rejected under
/// [`TypePolicy::Strict`]. Missing rule parameters and dangling enum/list
/// references always reject the schema.
pub fn compile_schema(
    name: &str,
    raw: RawSchema,
    policy: TypePolicy,
) -> Result<Compiled, DefectKind> {
    let Some(OrderedFields(raw_fields)) = raw.fields else {
        return Err(DefectKind::MissingFields);
    };

    let mut tolerated = Vec::new();
    let mut fields = Vec::with_capacity(raw_fields.len());
    for (field_name, raw_field) in raw_fields {
        let field = compile_field(field_name, raw_field, policy, &mut tolerated)
            .map_err(DefectKind::Rejected)?;
        fields.push(field);
    }

    let enums = raw
        .enums
        .into_iter()
        .map(|(key, values)| (key, values.iter().map(enum_value_text).collect()))
        .collect();

    let schema = Schema::new(name, raw.document_type, fields, enums, raw.lists)
        .map_err(DefectKind::Rejected)?
        .with_description(raw.description);
    Ok(Compiled { schema, tolerated })
}

fn compile_field(
    name: String,
    raw: RawField,
    policy: TypePolicy,
    tolerated: &mut Vec<ModelError>,
) -> Result<FieldDefinition, ModelError> {
    let tag = raw.validate_type.as_deref().unwrap_or("NONE");
    let validate_type = match tag.parse::<ValidateType>() {
        Ok(validate_type) => validate_type,
        Err(UnknownValidateType(value)) => {
            let err = ModelError::UnknownValidateType {
                field: name.clone(),
                value,
            };
            tolerate(err, policy, tolerated)?;
            ValidateType::None
        }
    };

    let rule = match validate_type {
        ValidateType::None => ValidationRule::None,
        ValidateType::Regex => {
            let pattern = required_parameter(&name, validate_type, "regex", raw.regex)?;
            let rule = RegexRule::new(pattern);
            if let Some(message) = rule.error() {
                let err = ModelError::InvalidRegex {
                    field: name.clone(),
                    pattern: rule.pattern().to_string(),
                    message: message.to_string(),
                };
                tolerate(err, policy, tolerated)?;
            }
            ValidationRule::Regex(rule)
        }
        ValidateType::SaIdNumber => ValidationRule::SaIdNumber,
        ValidateType::BankAccountNumber => ValidationRule::BankAccountNumber,
        ValidateType::DecimalAmount => ValidationRule::DecimalAmount,
        ValidateType::UnixDate => ValidationRule::UnixDate,
        ValidateType::PostalCode => ValidationRule::PostalCode,
        ValidateType::Enum => ValidationRule::Enum {
            name: required_parameter(&name, validate_type, "enum", raw.enum_name)?,
        },
        ValidateType::LevDistance => ValidationRule::LevDistance {
            list: required_parameter(&name, validate_type, "list", raw.list)?,
            distance: raw.distance.unwrap_or(DEFAULT_LEV_DISTANCE),
        },
    };

    let mut field = FieldDefinition::new(name, rule)
        .with_required(raw.required)
        .with_max_matches(raw.max_matches.unwrap_or(1));
    if let Some(slug) = raw.slug {
        field = field.with_slug(slug);
    }
    if let Some(description) = raw.description {
        field = field.with_description(description);
    }
    Ok(field)
}

fn tolerate(
    err: ModelError,
    policy: TypePolicy,
    tolerated: &mut Vec<ModelError>,
) -> Result<(), ModelError> {
    match policy {
        TypePolicy::Strict => Err(err),
        TypePolicy::Permissive => {
            tolerated.push(err);
            Ok(())
        }
    }
}

fn required_parameter(
    field: &str,
    validate_type: ValidateType,
    parameter: &'static str,
    value: Option<String>,
) -> Result<String, ModelError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ModelError::MissingParameter {
            field: field.to_string(),
            validate_type: validate_type.as_str(),
            parameter,
        })
}

fn enum_value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
