//! Per-value predicates, one per validation type.
//!
//! Every check takes the raw cell text and returns an explicit
//! [`ValidationOutcome`]; nothing here panics or returns an error for a
//! malformed value.

use chrono::NaiveDate;
use rapidfuzz::distance::indel;

use docmatch_model::{FieldDefinition, ListItem, Schema, ValidationOutcome, ValidationRule};

/// Latest accepted Unix timestamp (3000-01-01T00:00:00Z).
pub const MAX_UNIX_TIMESTAMP: f64 = 32_503_680_000.0;

/// Accepted date layouts, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%m.%d.%Y",
    "%Y/%m/%d",
    "%d %b %Y", // 15 Jan 2024
    "%d %B %Y", // 15 January 2024
];

const CURRENCY_SYMBOLS: &[char] = &['$', '£', '€'];

/// True for cells that carry no data.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Thirteen digits once whitespace and hyphens are removed.
pub fn is_sa_id_number(value: &str) -> bool {
    let digits: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    digits.len() == 13 && digits.chars().all(|c| c.is_ascii_digit())
}

/// Six to twelve digits or `*` once whitespace, hyphens and commas are removed.
pub fn is_bank_account_number(value: &str) -> bool {
    let cleaned: Vec<char> = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != ',')
        .collect();
    (6..=12).contains(&cleaned.len()) && cleaned.iter().all(|c| c.is_ascii_digit() || *c == '*')
}

/// A floating-point number once currency symbols, whitespace and commas are removed.
pub fn is_decimal_amount(value: &str) -> bool {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && !CURRENCY_SYMBOLS.contains(c))
        .collect();
    !cleaned.is_empty() && cleaned.parse::<f64>().is_ok()
}

/// A calendar date in one of the accepted layouts, or a Unix timestamp
/// between 1970 and 3000 inclusive.
pub fn is_date(value: &str) -> bool {
    let value = value.trim();
    if DATE_FORMATS
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(value, fmt).is_ok())
    {
        return true;
    }
    value
        .parse::<f64>()
        .is_ok_and(|ts| (0.0..=MAX_UNIX_TIMESTAMP).contains(&ts))
}

/// Four to ten digits or hyphens once whitespace is removed.
pub fn is_postal_code(value: &str) -> bool {
    let cleaned: Vec<char> = value.chars().filter(|c| !c.is_whitespace()).collect();
    (4..=10).contains(&cleaned.len()) && cleaned.iter().all(|c| c.is_ascii_digit() || *c == '-')
}

/// Normalised InDel similarity of two strings on a 0-100 scale.
pub fn similarity(a: &str, b: &str) -> f64 {
    indel::normalized_similarity(a.chars(), b.chars()) * 100.0
}

/// Best case-insensitive similarity between `value` and any list entry
/// name or alias. Returns the entry name and its score.
pub fn closest_list_item<'a>(value: &str, items: &'a [ListItem]) -> Option<(&'a str, f64)> {
    let value = value.to_lowercase();
    let mut best: Option<(&str, f64)> = None;
    for item in items {
        let candidates = std::iter::once(&item.name).chain(item.aliases.iter());
        for candidate in candidates {
            let score = similarity(&candidate.to_lowercase(), &value);
            if best.is_none_or(|(_, current)| score > current) {
                best = Some((item.name.as_str(), score));
            }
        }
    }
    best
}

/// True when any entry name or alias reaches `distance`.
pub fn matches_list(value: &str, items: &[ListItem], distance: f64) -> bool {
    let value = value.to_lowercase();
    items.iter().any(|item| {
        std::iter::once(&item.name)
            .chain(item.aliases.iter())
            .any(|candidate| similarity(&candidate.to_lowercase(), &value) >= distance)
    })
}

/// Applies the field's rule to a non-empty value.
///
/// Emptiness is decided by the caller; see
/// [`validate_single_value`](crate::validate_single_value).
pub fn check_value(value: &str, field: &FieldDefinition, schema: &Schema) -> ValidationOutcome {
    match &field.rule {
        ValidationRule::None => ValidationOutcome::valid(),
        ValidationRule::Regex(rule) => {
            let outcome = match rule.regex() {
                Ok(regex) => ValidationOutcome::from_check(regex.is_match(value), || {
                    format!("Value does not match pattern: {}", rule.pattern())
                }),
                Err(message) => ValidationOutcome::invalid(format!(
                    "Invalid regex pattern {}: {message}",
                    rule.pattern()
                )),
            };
            outcome.with_expected(format!("Match pattern {}", rule.pattern()))
        }
        ValidationRule::SaIdNumber => {
            ValidationOutcome::from_check(is_sa_id_number(value), || {
                "Invalid South African ID number".to_string()
            })
            .with_expected("Valid SA ID Number")
        }
        ValidationRule::BankAccountNumber => {
            ValidationOutcome::from_check(is_bank_account_number(value), || {
                "Invalid bank account number".to_string()
            })
            .with_expected("Valid bank account number")
        }
        ValidationRule::DecimalAmount => {
            ValidationOutcome::from_check(is_decimal_amount(value), || {
                "Invalid decimal amount".to_string()
            })
            .with_expected("Decimal amount (e.g. 123.45)")
        }
        ValidationRule::UnixDate => {
            ValidationOutcome::from_check(is_date(value), || "Invalid date format".to_string())
                .with_expected("Valid date")
        }
        ValidationRule::PostalCode => {
            ValidationOutcome::from_check(is_postal_code(value), || {
                "Invalid postal code".to_string()
            })
            .with_expected("Valid postal code")
        }
        ValidationRule::Enum { name } => {
            let values = schema.enum_values(name);
            ValidationOutcome::from_check(values.iter().any(|v| v == value), || {
                format!("Value not in allowed list: {name}")
            })
            .with_expected(format!("One of: {}", values.join(", ")))
        }
        ValidationRule::LevDistance { list, distance } => {
            let items = schema.list_items(list);
            let outcome = match closest_list_item(value, items) {
                Some((_, score)) if score >= *distance => ValidationOutcome::valid(),
                Some((best, score)) => ValidationOutcome::invalid(format!(
                    "No close match found (best: {best}, score: {score:.1}%)"
                )),
                None => ValidationOutcome::invalid(format!("List {list} has no entries")),
            };
            outcome.with_expected(format!("Match an item in list: {list}"))
        }
    }
}

/// Cheaper variant of [`check_value`] for bulk column scoring.
pub(crate) fn value_passes(value: &str, field: &FieldDefinition, schema: &Schema) -> bool {
    match &field.rule {
        ValidationRule::None => true,
        ValidationRule::Regex(rule) => rule.regex().is_ok_and(|regex| regex.is_match(value)),
        ValidationRule::SaIdNumber => is_sa_id_number(value),
        ValidationRule::BankAccountNumber => is_bank_account_number(value),
        ValidationRule::DecimalAmount => is_decimal_amount(value),
        ValidationRule::UnixDate => is_date(value),
        ValidationRule::PostalCode => is_postal_code(value),
        ValidationRule::Enum { name } => schema.enum_values(name).iter().any(|v| v == value),
        ValidationRule::LevDistance { list, distance } => {
            matches_list(value, schema.list_items(list), *distance)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sa_id_number() {
        assert!(is_sa_id_number("123456789 0123"));
        assert!(is_sa_id_number("800101-5009-087"));
        assert!(!is_sa_id_number("123"));
        assert!(!is_sa_id_number("12345678901234"));
        assert!(!is_sa_id_number("12345678901a3"));
    }

    #[test]
    fn bank_account_number() {
        assert!(is_bank_account_number("62-000-123 456"));
        assert!(is_bank_account_number("****1234"));
        assert!(!is_bank_account_number("12345"));
        assert!(!is_bank_account_number("1234567890123"));
        assert!(!is_bank_account_number("ACC123456"));
    }

    #[test]
    fn decimal_amount() {
        assert!(is_decimal_amount("$1,234.56"));
        assert!(is_decimal_amount("€ 10"));
        assert!(is_decimal_amount("-0.5"));
        assert!(!is_decimal_amount("abc"));
        assert!(!is_decimal_amount("$"));
    }

    #[test]
    fn dates_and_timestamps() {
        assert!(is_date("2024-01-15"));
        assert!(is_date("15/01/2024"));
        assert!(is_date("01/15/2024"));
        assert!(is_date("15.01.2024"));
        assert!(is_date("15 Jan 2024"));
        assert!(is_date("15 January 2024"));
        assert!(is_date("0"));
        assert!(is_date("1705276800"));
        assert!(is_date("32503680000"));
        assert!(!is_date("32503680001"));
        assert!(!is_date("-1"));
        assert!(!is_date("not-a-date"));
        assert!(!is_date("2024-13-45"));
    }

    #[test]
    fn postal_code() {
        assert!(is_postal_code("0181"));
        assert!(is_postal_code("90210-1234"));
        assert!(is_postal_code(" 2 0 0 0 "));
        assert!(!is_postal_code("123"));
        assert!(!is_postal_code("SW1A 1AA"));
    }

    #[test]
    fn similarity_is_a_percentage() {
        assert_eq!(similarity("bank", "bank"), 100.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        let partial = similarity("first national", "first natinal");
        assert!(partial > 90.0 && partial < 100.0);
    }

    #[test]
    fn closest_list_item_reports_entry_name_for_alias_hits() {
        let items = vec![
            ListItem::new("First National Bank").with_aliases(["FNB"]),
            ListItem::new("Standard Bank"),
        ];
        let (name, score) = closest_list_item("fnb", &items).expect("match");
        assert_eq!(name, "First National Bank");
        assert_eq!(score, 100.0);
        assert!(closest_list_item("fnb", &[]).is_none());
    }
}
