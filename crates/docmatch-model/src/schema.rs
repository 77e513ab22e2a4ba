//! Document schema definitions.
//!
//! A [`Schema`] describes one document type: an ordered list of fields, each
//! carrying a closed [`ValidationRule`] and the column-name aliases (slugs)
//! that may identify it in a spreadsheet. Schemas are immutable once built;
//! [`Schema::new`] checks every cross reference up front so validators never
//! have to check for missing parameters.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Validation type tag as written in schema documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidateType {
    None,
    Regex,
    SaIdNumber,
    BankAccountNumber,
    DecimalAmount,
    UnixDate,
    PostalCode,
    Enum,
    LevDistance,
}

impl ValidateType {
    pub const ALL: [ValidateType; 9] = [
        ValidateType::None,
        ValidateType::Regex,
        ValidateType::SaIdNumber,
        ValidateType::BankAccountNumber,
        ValidateType::DecimalAmount,
        ValidateType::UnixDate,
        ValidateType::PostalCode,
        ValidateType::Enum,
        ValidateType::LevDistance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Regex => "REGEX",
            Self::SaIdNumber => "SA_ID_NUMBER",
            Self::BankAccountNumber => "BANK_ACCOUNT_NUMBER",
            Self::DecimalAmount => "DECIMAL_AMOUNT",
            Self::UnixDate => "UNIX_DATE",
            Self::PostalCode => "POSTAL_CODE",
            Self::Enum => "ENUM",
            Self::LevDistance => "LEV_DISTANCE",
        }
    }
}

impl fmt::Display for ValidateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a tag is not one of the closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValidateType(pub String);

impl FromStr for ValidateType {
    type Err = UnknownValidateType;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownValidateType(trimmed.to_string()))
    }
}

/// A compiled REGEX rule.
///
/// The pattern is matched from the start of the value but not anchored at
/// the end. A pattern that fails to compile is kept together with the
/// compiler message so every value can be reported as invalid with a reason.
#[derive(Debug, Clone)]
pub struct RegexRule {
    pattern: String,
    compiled: std::result::Result<Regex, String>,
}

impl RegexRule {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let compiled = Regex::new(&format!("^(?:{pattern})")).map_err(|e| e.to_string());
        Self { pattern, compiled }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Compiler message when the pattern is unusable.
    pub fn error(&self) -> Option<&str> {
        self.compiled.as_ref().err().map(String::as_str)
    }

    pub fn regex(&self) -> std::result::Result<&Regex, &str> {
        self.compiled.as_ref().map_err(String::as_str)
    }
}

/// Closed set of per-field validation rules, each with its own parameters.
#[derive(Debug, Clone)]
pub enum ValidationRule {
    /// Pass-through: every value is valid.
    None,
    Regex(RegexRule),
    SaIdNumber,
    BankAccountNumber,
    DecimalAmount,
    UnixDate,
    PostalCode,
    /// Membership in `Schema::enums[name]`.
    Enum { name: String },
    /// Similarity (0-100) against an entry of `Schema::lists[list]`.
    LevDistance { list: String, distance: f64 },
}

impl ValidationRule {
    pub fn validate_type(&self) -> ValidateType {
        match self {
            Self::None => ValidateType::None,
            Self::Regex(_) => ValidateType::Regex,
            Self::SaIdNumber => ValidateType::SaIdNumber,
            Self::BankAccountNumber => ValidateType::BankAccountNumber,
            Self::DecimalAmount => ValidateType::DecimalAmount,
            Self::UnixDate => ValidateType::UnixDate,
            Self::PostalCode => ValidateType::PostalCode,
            Self::Enum { .. } => ValidateType::Enum,
            Self::LevDistance { .. } => ValidateType::LevDistance,
        }
    }
}

/// An entry of a named reference list used by LEV_DISTANCE rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl ListItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }
}

/// Which column-claiming phase a field takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimPhase {
    /// `max_matches <= 1`: resolved first, claims at most one column.
    Single,
    /// `max_matches > 1`: resolved after every single-match field.
    Repeating(u32),
}

/// A semantic field of a document schema.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub name: String,
    pub rule: ValidationRule,
    pub required: bool,
    /// Candidate column names; never empty once the schema is built.
    pub slug: Vec<String>,
    pub max_matches: u32,
    pub description: Option<String>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, rule: ValidationRule) -> Self {
        let name = name.into();
        Self {
            slug: vec![name.clone()],
            name,
            rule,
            required: false,
            max_matches: 1,
            description: None,
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Replaces the slug list; an empty list falls back to the field name.
    pub fn with_slug<I, S>(mut self, slug: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slug = slug.into_iter().map(Into::into).collect();
        if self.slug.is_empty() {
            self.slug.push(self.name.clone());
        }
        self
    }

    pub fn with_max_matches(mut self, max_matches: u32) -> Self {
        self.max_matches = max_matches;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate_type(&self) -> ValidateType {
        self.rule.validate_type()
    }

    /// Identities of the extra columns a repeating field may claim:
    /// `FIELD_2` up to `FIELD_{max_matches}`.
    pub fn extra_match_names(&self) -> impl Iterator<Item = String> + '_ {
        (2..=self.max_matches).map(|k| format!("{}_{k}", self.name))
    }

    pub fn claim_phase(&self) -> ClaimPhase {
        if self.max_matches <= 1 {
            ClaimPhase::Single
        } else {
            ClaimPhase::Repeating(self.max_matches)
        }
    }
}

/// A document-type definition.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Registry name (file stem of the schema document).
    pub name: String,
    /// Document type identifier reported to collaborators.
    pub document_type: String,
    pub description: Option<String>,
    fields: Vec<FieldDefinition>,
    enums: BTreeMap<String, Vec<String>>,
    lists: BTreeMap<String, Vec<ListItem>>,
}

impl Schema {
    /// Builds a schema, rejecting duplicate fields, dangling references and
    /// extra-match identities (`FIELD_2`, ...) that shadow a declared field.
    pub fn new(
        name: impl Into<String>,
        document_type: Option<String>,
        fields: Vec<FieldDefinition>,
        enums: BTreeMap<String, Vec<String>>,
        lists: BTreeMap<String, Vec<ListItem>>,
    ) -> Result<Self> {
        let name = name.into();
        let mut seen = BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ModelError::DuplicateField {
                    field: field.name.clone(),
                });
            }
            if field.max_matches == 0 {
                return Err(ModelError::ZeroMaxMatches {
                    field: field.name.clone(),
                });
            }
            match &field.rule {
                ValidationRule::Enum { name } if !enums.contains_key(name) => {
                    return Err(ModelError::UnknownEnum {
                        field: field.name.clone(),
                        name: name.clone(),
                    });
                }
                ValidationRule::LevDistance { list, distance } => {
                    if !lists.contains_key(list) {
                        return Err(ModelError::UnknownList {
                            field: field.name.clone(),
                            name: list.clone(),
                        });
                    }
                    if !(0.0..=100.0).contains(distance) {
                        return Err(ModelError::DistanceOutOfRange {
                            field: field.name.clone(),
                            distance: distance.to_string(),
                        });
                    }
                }
                _ => {}
            }
        }
        for field in &fields {
            if let Some(synthetic) = field
                .extra_match_names()
                .find(|synthetic| seen.contains(synthetic.as_str()))
            {
                return Err(ModelError::SyntheticNameCollision {
                    field: field.name.clone(),
                    synthetic,
                });
            }
        }
        Ok(Self {
            document_type: document_type.unwrap_or_else(|| name.clone()),
            name,
            description: None,
            fields,
            enums,
            lists,
        })
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Column-claiming order: every single-match field in declaration
    /// order, followed by every repeating field in declaration order.
    pub fn claim_plan(&self) -> Vec<(ClaimPhase, &FieldDefinition)> {
        let single = self
            .fields
            .iter()
            .filter(|f| f.claim_phase() == ClaimPhase::Single);
        let repeating = self
            .fields
            .iter()
            .filter(|f| f.claim_phase() != ClaimPhase::Single);
        single
            .chain(repeating)
            .map(|f| (f.claim_phase(), f))
            .collect()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn enums(&self) -> &BTreeMap<String, Vec<String>> {
        &self.enums
    }

    pub fn lists(&self) -> &BTreeMap<String, Vec<ListItem>> {
        &self.lists
    }

    pub fn enum_values(&self, name: &str) -> &[String] {
        self.enums.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn list_items(&self, name: &str) -> &[ListItem] {
        self.lists.get(name).map(Vec::as_slice).unwrap_or_default()
    }
}
