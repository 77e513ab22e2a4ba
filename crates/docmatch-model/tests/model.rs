use std::collections::BTreeMap;

use docmatch_model::{
    ClaimPhase, FieldDefinition, FieldMatch, FieldMatches, ListItem, MatchType, ModelError,
    RegexRule, Schema, ValidateType, ValidationRule, ValidationSummary,
};

fn lists() -> BTreeMap<String, Vec<ListItem>> {
    let mut lists = BTreeMap::new();
    lists.insert(
        "banks".to_string(),
        vec![ListItem::new("First National Bank").with_aliases(["FNB"])],
    );
    lists
}

#[test]
fn validate_type_parses_case_insensitively() {
    assert_eq!("sa_id_number".parse::<ValidateType>(), Ok(ValidateType::SaIdNumber));
    assert_eq!(" LEV_DISTANCE ".parse::<ValidateType>(), Ok(ValidateType::LevDistance));
    assert!("PHONE".parse::<ValidateType>().is_err());
}

#[test]
fn regex_rule_matches_from_start_only() {
    let rule = RegexRule::new("[A-Z]{2}");
    let regex = rule.regex().expect("valid pattern");
    assert!(regex.is_match("AB123"));
    assert!(!regex.is_match("1AB"));
}

#[test]
fn regex_rule_keeps_compile_error() {
    let rule = RegexRule::new("([a-z");
    assert!(rule.error().is_some());
    assert_eq!(rule.pattern(), "([a-z");
}

#[test]
fn schema_rejects_unknown_list() {
    let field = FieldDefinition::new(
        "BANK",
        ValidationRule::LevDistance {
            list: "missing".to_string(),
            distance: 80.0,
        },
    );
    let err = Schema::new("s", None, vec![field], BTreeMap::new(), lists()).unwrap_err();
    assert!(matches!(err, ModelError::UnknownList { .. }));
}

#[test]
fn schema_rejects_distance_out_of_range() {
    let field = FieldDefinition::new(
        "BANK",
        ValidationRule::LevDistance {
            list: "banks".to_string(),
            distance: 120.0,
        },
    );
    let err = Schema::new("s", None, vec![field], BTreeMap::new(), lists()).unwrap_err();
    assert!(matches!(err, ModelError::DistanceOutOfRange { .. }));
}

#[test]
fn schema_rejects_duplicate_fields() {
    let fields = vec![
        FieldDefinition::new("A", ValidationRule::None),
        FieldDefinition::new("A", ValidationRule::None),
    ];
    let err = Schema::new("s", None, fields, BTreeMap::new(), BTreeMap::new()).unwrap_err();
    assert_eq!(
        err,
        ModelError::DuplicateField {
            field: "A".to_string()
        }
    );
}

#[test]
fn schema_rejects_extra_match_name_shadowing_a_field() {
    let fields = vec![
        FieldDefinition::new("PHONE", ValidationRule::None).with_max_matches(2),
        FieldDefinition::new("PHONE_2", ValidationRule::None),
    ];
    let err = Schema::new("s", None, fields, BTreeMap::new(), BTreeMap::new()).unwrap_err();
    assert_eq!(
        err,
        ModelError::SyntheticNameCollision {
            field: "PHONE".to_string(),
            synthetic: "PHONE_2".to_string(),
        }
    );
}

#[test]
fn extra_match_names_follow_max_matches() {
    let phone = FieldDefinition::new("PHONE", ValidationRule::None).with_max_matches(3);
    assert_eq!(
        phone.extra_match_names().collect::<Vec<_>>(),
        vec!["PHONE_2", "PHONE_3"]
    );
    let name = FieldDefinition::new("NAME", ValidationRule::None);
    assert_eq!(name.extra_match_names().count(), 0);
}

#[test]
fn document_type_defaults_to_name() {
    let schema = Schema::new("shareholders", None, vec![], BTreeMap::new(), BTreeMap::new())
        .expect("empty schema");
    assert_eq!(schema.document_type, "shareholders");
}

#[test]
fn claim_plan_puts_repeating_fields_last() {
    let fields = vec![
        FieldDefinition::new("PHONE", ValidationRule::None).with_max_matches(2),
        FieldDefinition::new("NAME", ValidationRule::None),
        FieldDefinition::new("EMAIL", ValidationRule::None),
    ];
    let schema =
        Schema::new("contacts", None, fields, BTreeMap::new(), BTreeMap::new()).expect("schema");
    let plan: Vec<(ClaimPhase, &str)> = schema
        .claim_plan()
        .into_iter()
        .map(|(phase, f)| (phase, f.name.as_str()))
        .collect();
    assert_eq!(
        plan,
        vec![
            (ClaimPhase::Single, "NAME"),
            (ClaimPhase::Single, "EMAIL"),
            (ClaimPhase::Repeating(2), "PHONE"),
        ]
    );
}

#[test]
fn empty_slug_falls_back_to_name() {
    let field = FieldDefinition::new("NAME", ValidationRule::None).with_slug(Vec::<String>::new());
    assert_eq!(field.slug, vec!["NAME".to_string()]);
}

#[test]
fn field_matches_replace_by_identity() {
    let mut matches = FieldMatches::new();
    matches.insert(FieldMatch::unmatched("NAME"));
    matches.insert(FieldMatch::new(
        "NAME",
        "Full Name",
        MatchType::Fuzzy,
        140.0,
        ValidationSummary::default(),
    ));
    assert_eq!(matches.len(), 1);
    assert_eq!(matches.column_for("NAME"), Some("Full Name"));
    assert_eq!(matches.get("NAME").map(|m| m.score), Some(100.0));
}

#[test]
fn renamed_match_keeps_definition() {
    let entry = FieldMatch::new(
        "PHONE",
        "Phone 2",
        MatchType::ExactSlug,
        100.0,
        ValidationSummary::default(),
    )
    .renamed("PHONE_2");
    assert_eq!(entry.field, "PHONE_2");
    assert_eq!(entry.definition, "PHONE");
}
