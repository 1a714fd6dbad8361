//! Field rules for product payloads.
//!
//! Rules run against the raw JSON body so that an explicit `null` or a value
//! of the wrong type is distinguishable from a field that was never sent.

use serde_json::{Map, Value};

pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

static NULL: Value = Value::Null;

/// Whether every field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Create: all fields are required.
    Full,
    /// Update: fields absent from the payload are skipped.
    Partial,
}

/// Collect every violated rule for `payload`.
///
/// An empty result means the payload is acceptable. Violations are reported in
/// field order: name, description, price, category, inStock.
pub fn validate_product(payload: &Value, mode: Mode) -> Vec<String> {
    let Some(fields) = payload.as_object() else {
        return vec!["Request body must be a JSON object".to_owned()];
    };

    let mut violations = Vec::new();

    if let Some(value) = field(fields, "name", mode) {
        check_text(value, "Name", Some(NAME_MAX_CHARS), &mut violations);
    }
    if let Some(value) = field(fields, "description", mode) {
        check_text(value, "Description", Some(DESCRIPTION_MAX_CHARS), &mut violations);
    }
    if let Some(value) = field(fields, "price", mode) {
        match value {
            Value::Null => violations.push("Price is required".to_owned()),
            Value::Number(n) if n.as_f64().is_some_and(|p| p >= 0.0) => {}
            _ => violations.push("Price must be a non-negative number".to_owned()),
        }
    }
    if let Some(value) = field(fields, "category", mode) {
        check_text(value, "Category", None, &mut violations);
    }
    if let Some(value) = field(fields, "inStock", mode) {
        if !value.is_boolean() {
            violations.push("inStock must be a boolean value".to_owned());
        }
    }

    violations
}

/// Returns the value to check, or `None` when the rule is skipped.
///
/// In [`Mode::Full`] an absent field is checked as `null`.
fn field<'a>(fields: &'a Map<String, Value>, key: &str, mode: Mode) -> Option<&'a Value> {
    match (fields.get(key), mode) {
        (Some(value), _) => Some(value),
        (None, Mode::Full) => Some(&NULL),
        (None, Mode::Partial) => None,
    }
}

fn check_text(value: &Value, label: &str, max_chars: Option<usize>, violations: &mut Vec<String>) {
    let trimmed = match value.as_str().map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => {
            violations.push(format!("{label} is required and must be a non-empty string"));
            return;
        }
    };
    if let Some(max) = max_chars {
        if trimmed.chars().count() > max {
            violations.push(format!("{label} must be at most {max} characters"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full() -> Value {
        json!({
            "name": "Kettle",
            "description": "1.7L electric kettle",
            "price": 39.99,
            "category": "Kitchen",
            "inStock": true
        })
    }

    #[test]
    fn valid_payload_has_no_violations() {
        assert!(validate_product(&full(), Mode::Full).is_empty());
    }

    #[test]
    fn empty_object_reports_every_field() {
        let v = validate_product(&json!({}), Mode::Full);
        assert_eq!(v.len(), 5);
        assert!(v[0].starts_with("Name"));
        assert!(v[1].starts_with("Description"));
        assert_eq!(v[2], "Price is required");
        assert!(v[3].starts_with("Category"));
        assert!(v[4].starts_with("inStock"));
    }

    #[test]
    fn empty_object_is_valid_partial_update() {
        assert!(validate_product(&json!({}), Mode::Partial).is_empty());
    }

    #[test]
    fn partial_checks_explicit_null() {
        let v = validate_product(&json!({"name": null, "price": null}), Mode::Partial);
        assert_eq!(
            v,
            vec![
                "Name is required and must be a non-empty string".to_owned(),
                "Price is required".to_owned(),
            ]
        );
    }

    #[test]
    fn partial_checks_wrong_type() {
        let v = validate_product(&json!({"inStock": "yes"}), Mode::Partial);
        assert_eq!(v, vec!["inStock must be a boolean value".to_owned()]);
    }

    #[test]
    fn whitespace_only_name_is_rejected() {
        let mut p = full();
        p["name"] = json!("   ");
        let v = validate_product(&p, Mode::Full);
        assert_eq!(v.len(), 1);
        assert!(v[0].contains("Name"));
    }

    #[test]
    fn name_length_is_measured_after_trimming() {
        let mut p = full();
        p["name"] = json!(format!("  {}  ", "a".repeat(NAME_MAX_CHARS)));
        assert!(validate_product(&p, Mode::Full).is_empty());

        p["name"] = json!("a".repeat(NAME_MAX_CHARS + 1));
        let v = validate_product(&p, Mode::Full);
        assert_eq!(v, vec!["Name must be at most 100 characters".to_owned()]);
    }

    #[test]
    fn name_length_counts_chars_not_bytes() {
        let mut p = full();
        p["name"] = json!("é".repeat(NAME_MAX_CHARS));
        assert!(validate_product(&p, Mode::Full).is_empty());
    }

    #[test]
    fn description_too_long() {
        let mut p = full();
        p["description"] = json!("d".repeat(DESCRIPTION_MAX_CHARS + 1));
        let v = validate_product(&p, Mode::Full);
        assert_eq!(v, vec!["Description must be at most 500 characters".to_owned()]);
    }

    #[test]
    fn price_rules() {
        let mut p = full();
        p["price"] = json!(0);
        assert!(validate_product(&p, Mode::Full).is_empty());

        p["price"] = json!(-0.01);
        assert_eq!(
            validate_product(&p, Mode::Full),
            vec!["Price must be a non-negative number".to_owned()]
        );

        p["price"] = json!("10");
        assert_eq!(
            validate_product(&p, Mode::Full),
            vec!["Price must be a non-negative number".to_owned()]
        );
    }

    #[test]
    fn violations_are_collected_not_short_circuited() {
        let p = json!({
            "name": "",
            "description": 7,
            "price": -1,
            "category": "x",
            "inStock": 1
        });
        assert_eq!(validate_product(&p, Mode::Full).len(), 4);
    }

    #[test]
    fn non_object_body_is_rejected() {
        for body in [json!([]), json!("text"), json!(null)] {
            assert_eq!(
                validate_product(&body, Mode::Partial),
                vec!["Request body must be a JSON object".to_owned()]
            );
        }
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut p = full();
        p["colour"] = json!("red");
        assert!(validate_product(&p, Mode::Full).is_empty());
    }
}
