//! Settings validation against catalog field rules
//!
//! Validation collects every field violation instead of stopping at the first,
//! and normalizes accepted values (digit strings to integers, form checkbox
//! input to booleans) into the settings map that gets persisted.

use super::catalog::ServiceCatalog;
use crate::contract::{
    ContentId, FieldConstraint, FieldError, FieldRule, FieldType, ServiceDefinition,
    ServiceSettings, SiteServicesError, ValidationResult,
};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// Message shown when an include names a service outside the catalog
pub const UNKNOWN_SERVICE_MESSAGE: &str = "Unrecognized third-party service selected.";

/// Maximum length of an include machine name
pub const MAX_INCLUDE_ID_LENGTH: usize = 64;

/// Validates proposed include settings against the catalog
#[derive(Debug, Clone)]
pub struct SettingsValidator {
    catalog: Arc<ServiceCatalog>,
}

impl SettingsValidator {
    pub fn new(catalog: Arc<ServiceCatalog>) -> Self {
        Self { catalog }
    }

    /// Validate and normalize `proposed` for `service_name`.
    ///
    /// Never fails: an unknown service is reported as an error on `service_name`.
    pub fn validate(&self, service_name: &str, proposed: &Map<String, Value>) -> ValidationResult {
        match self.catalog.get_definition(service_name) {
            Ok(definition) => validate_settings(definition, proposed),
            Err(_) => ValidationResult::Invalid(vec![FieldError::new(
                "service_name",
                UNKNOWN_SERVICE_MESSAGE,
            )]),
        }
    }
}

/// Validate `proposed` against every field of `definition`.
///
/// Keys not declared by the definition are dropped. Absent optional text
/// fields become `""` and absent optional numbers become `null`, so the
/// returned map always has exactly the declared keys.
pub fn validate_settings(
    definition: &ServiceDefinition,
    proposed: &Map<String, Value>,
) -> ValidationResult {
    let mut settings = ServiceSettings::with_capacity(definition.fields.len());
    let mut errors = Vec::new();

    for rule in &definition.fields {
        match validate_field(rule, proposed.get(&rule.name)) {
            Ok(value) => {
                settings.insert(rule.name.clone(), value);
            }
            Err(message) => errors.push(FieldError::new(rule.name.clone(), message)),
        }
    }

    if errors.is_empty() {
        ValidationResult::Valid(settings)
    } else {
        ValidationResult::Invalid(errors)
    }
}

fn validate_field(rule: &FieldRule, raw: Option<&Value>) -> Result<Value, String> {
    match rule.field_type {
        FieldType::Text => validate_text(rule, raw),
        FieldType::Number => validate_number(rule, raw),
        FieldType::Checkbox => validate_checkbox(rule, raw),
    }
}

fn required_message(rule: &FieldRule) -> String {
    format!("{} is required.", rule.label)
}

fn validate_text(rule: &FieldRule, raw: Option<&Value>) -> Result<Value, String> {
    let text = match raw {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => return Err(format!("{} must be text.", rule.label)),
    };

    if text.is_empty() {
        return if rule.required {
            Err(required_message(rule))
        } else {
            Ok(Value::String(text))
        };
    }

    let length = text.chars().count();
    match &rule.constraint {
        FieldConstraint::Pattern {
            regex,
            min_length,
            max_length,
        } => {
            // Pattern and length are one predicate: the pattern alone does not bound length.
            if !within_length(length, *min_length, *max_length) || !regex.is_match(&text) {
                return Err(match (min_length, max_length) {
                    (Some(min), Some(max)) if min == max => format!(
                        "{} must be exactly {} characters in the expected format.",
                        rule.label, min
                    ),
                    _ => format!("{} is not in the expected format.", rule.label),
                });
            }
        }
        FieldConstraint::Length {
            min_length,
            max_length,
        } => {
            if !within_length(length, *min_length, *max_length) {
                return Err(length_message(rule, *min_length, *max_length));
            }
        }
        FieldConstraint::None | FieldConstraint::Range { .. } => {}
    }

    Ok(Value::String(text))
}

fn within_length(length: usize, min: Option<usize>, max: Option<usize>) -> bool {
    min.map_or(true, |min| length >= min) && max.map_or(true, |max| length <= max)
}

fn length_message(rule: &FieldRule, min: Option<usize>, max: Option<usize>) -> String {
    match (min, max) {
        (Some(min), Some(max)) if min == max => {
            format!("{} must be exactly {} characters.", rule.label, min)
        }
        (Some(min), Some(max)) => {
            format!("{} must be between {} and {} characters.", rule.label, min, max)
        }
        (Some(min), None) => format!("{} must be at least {} characters.", rule.label, min),
        (None, Some(max)) => format!("{} must be at most {} characters.", rule.label, max),
        (None, None) => format!("{} has an invalid length.", rule.label),
    }
}

fn validate_number(rule: &FieldRule, raw: Option<&Value>) -> Result<Value, String> {
    let not_a_number = || format!("{} must be a whole number.", rule.label);

    let parsed: Option<i64> = match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            let digits = s.trim();
            if digits.is_empty() {
                None
            } else if digits.bytes().all(|b| b.is_ascii_digit()) {
                // Too many digits for i64 is out of any configured range.
                Some(digits.parse::<i64>().unwrap_or(i64::MAX))
            } else {
                return Err(not_a_number());
            }
        }
        Some(Value::Number(n)) => match (n.as_i64(), n.as_u64()) {
            (Some(v), _) if v >= 0 => Some(v),
            (None, Some(_)) => Some(i64::MAX),
            _ => return Err(not_a_number()),
        },
        Some(_) => return Err(not_a_number()),
    };

    let Some(value) = parsed else {
        return if rule.required {
            Err(required_message(rule))
        } else {
            Ok(Value::Null)
        };
    };

    if let FieldConstraint::Range { min, max } = rule.constraint {
        if value < min || value > max {
            return Err(format!("{} must be between {} and {}.", rule.label, min, max));
        }
    }

    Ok(Value::from(value))
}

fn validate_checkbox(rule: &FieldRule, raw: Option<&Value>) -> Result<Value, String> {
    let checked = raw.map_or(false, is_truthy);
    if rule.required && !checked {
        return Err(required_message(rule));
    }
    Ok(Value::Bool(checked))
}

/// Interpret form input as a checkbox state
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => {
            let s = s.trim().to_ascii_lowercase();
            !matches!(s.as_str(), "" | "0" | "false" | "off" | "no")
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Validate an include machine name: lowercase letters, digits and underscores
pub fn validate_include_id(id: &str) -> Result<(), SiteServicesError> {
    if id.is_empty() {
        return Err(SiteServicesError::InvalidInput {
            message: "id cannot be empty".to_string(),
        });
    }

    if id.len() > MAX_INCLUDE_ID_LENGTH {
        return Err(SiteServicesError::InvalidInput {
            message: format!(
                "id '{}' is longer than {} characters",
                id, MAX_INCLUDE_ID_LENGTH
            ),
        });
    }

    let is_machine_name = id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !is_machine_name {
        return Err(SiteServicesError::InvalidInput {
            message: format!(
                "id '{}' contains invalid characters. Only lowercase letters, digits and '_' are allowed",
                id
            ),
        });
    }

    Ok(())
}

/// Validate an include label
pub fn validate_label(label: &str, max_length: usize) -> Result<(), SiteServicesError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(SiteServicesError::Validation {
            errors: vec![FieldError::new("label", "Label is required.")],
        });
    }
    if label.chars().count() > max_length {
        return Err(SiteServicesError::Validation {
            errors: vec![FieldError::new(
                "label",
                format!("Label must be at most {} characters.", max_length),
            )],
        });
    }
    Ok(())
}

/// Collapse duplicate content ids, keeping the first occurrence
pub fn normalize_content_ids(content_ids: Vec<ContentId>) -> Vec<ContentId> {
    let mut seen = HashSet::with_capacity(content_ids.len());
    content_ids
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> SettingsValidator {
        SettingsValidator::new(Arc::new(ServiceCatalog::builtin().unwrap()))
    }

    fn settings(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_livechat_license_id_must_be_numeric() {
        let v = validator();

        let result = v.validate("livechat", &settings(json!({"license_id": "abc"})));
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].field, "license_id");

        let result = v.validate("livechat", &settings(json!({"license_id": "123456"})));
        assert!(result.is_valid());
        let normalized = result.into_result().unwrap();
        assert_eq!(normalized.get("license_id"), Some(&json!("123456")));
    }

    #[test]
    fn test_statuspage_page_id_boundaries() {
        let v = validator();
        let check = |page_id: &str| v.validate("statuspage", &settings(json!({"page_id": page_id})));

        assert!(check("abcdef123456").is_valid());
        assert!(check("000000000000").is_valid());

        for bad in ["abcdef12345", "abcdef1234567", "Abcdef123456", "abcdef12345!", "abcdef 12345"] {
            let result = check(bad);
            assert_eq!(result.errors().len(), 1, "page_id {:?} should fail once", bad);
            assert_eq!(result.errors()[0].field, "page_id");
        }
    }

    #[test]
    fn test_required_fields_reported() {
        let v = validator();
        let result = v.validate("statuspage", &Map::new());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].field, "page_id");
        assert!(result.errors()[0].message.contains("required"));

        let blank = v.validate("livechat", &settings(json!({"license_id": "   "})));
        assert!(blank.errors()[0].message.contains("required"));
    }

    #[test]
    fn test_all_errors_reported_in_declaration_order() {
        let v = validator();
        let result = v.validate(
            "salesforce",
            &settings(json!({
                "endpoint_url": "http://insecure.example.com",
                "salesforce_id": "short",
            })),
        );
        let fields: Vec<&str> = result.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["salesforce_id", "embedded_service_name", "endpoint_url", "scrt2_url"]
        );
    }

    #[test]
    fn test_checkbox_and_delay_normalization() {
        let v = validator();
        let result = v.validate(
            "servicecloud",
            &settings(json!({
                "auto_open": "1",
                "auto_open_delay": "15",
                "eyecatcher": "0",
            })),
        );
        let normalized = result.into_result().unwrap();
        assert_eq!(normalized.get("auto_open"), Some(&json!(true)));
        assert_eq!(normalized.get("auto_open_delay"), Some(&json!(15)));
        assert_eq!(normalized.get("eyecatcher"), Some(&json!(false)));
    }

    #[test]
    fn test_delay_range_and_format() {
        let v = validator();
        let delay = |raw: Value| v.validate("servicecloud", &settings(json!({"auto_open_delay": raw})));

        assert!(delay(json!("0")).is_valid());
        assert!(delay(json!("99")).is_valid());
        assert!(delay(json!(42)).is_valid());
        assert!(!delay(json!("100")).is_valid());
        assert!(!delay(json!("-1")).is_valid());
        assert!(!delay(json!("1.5")).is_valid());
        assert!(!delay(json!("ten")).is_valid());
        assert!(!delay(json!(-3)).is_valid());
        assert!(!delay(json!("99999999999999999999999")).is_valid());

        let empty = delay(json!("")).into_result().unwrap();
        assert_eq!(empty.get("auto_open_delay"), Some(&Value::Null));
    }

    #[test]
    fn test_truthiness() {
        for truthy in [json!(true), json!(1), json!("1"), json!("on"), json!("yes"), json!("TRUE")] {
            assert!(is_truthy(&truthy), "{} should be truthy", truthy);
        }
        for falsy in [json!(false), json!(0), json!("0"), json!(""), json!("off"), json!("No"), Value::Null] {
            assert!(!is_truthy(&falsy), "{} should be falsy", falsy);
        }
    }

    #[test]
    fn test_undeclared_keys_dropped_and_optional_defaults_filled() {
        let v = validator();
        let result = v.validate(
            "mainstay",
            &settings(json!({"bot_token": "tok_123", "favourite_colour": "teal"})),
        );
        let normalized = result.into_result().unwrap();
        let keys: Vec<&str> = normalized.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["bot_token", "college_id"]);
        assert_eq!(normalized.get("college_id"), Some(&json!("")));
    }

    #[test]
    fn test_numeric_json_accepted_for_text_fields() {
        let v = validator();
        let result = v.validate("livechat", &settings(json!({"license_id": 123456})));
        assert_eq!(
            result.into_result().unwrap().get("license_id"),
            Some(&json!("123456"))
        );

        let result = v.validate("livechat", &settings(json!({"license_id": ["1"]})));
        assert_eq!(result.errors()[0].field, "license_id");
    }

    #[test]
    fn test_unknown_service_reported_on_service_name() {
        let v = validator();
        let result = v.validate("myspace", &Map::new());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].field, "service_name");
        assert_eq!(result.errors()[0].message, UNKNOWN_SERVICE_MESSAGE);
    }

    #[test]
    fn test_validate_is_pure() {
        let v = validator();
        let input = settings(json!({"page_id": "abcdef123456"}));
        let first = v.validate("statuspage", &input);
        let second = v.validate("statuspage", &input);
        assert_eq!(first, second);
        assert_eq!(input, settings(json!({"page_id": "abcdef123456"})));
    }

    #[test]
    fn test_validate_include_id() {
        assert!(validate_include_id("livechat_main").is_ok());
        assert!(validate_include_id("status2").is_ok());
        assert!(validate_include_id("").is_err());
        assert!(validate_include_id("LiveChat").is_err());
        assert!(validate_include_id("live-chat").is_err());
        assert!(validate_include_id("live chat").is_err());
        assert!(validate_include_id(&"a".repeat(MAX_INCLUDE_ID_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_label() {
        assert!(validate_label("Main chat", 255).is_ok());
        assert!(matches!(
            validate_label("  ", 255),
            Err(SiteServicesError::Validation { .. })
        ));
        assert!(validate_label("abcdef", 5).is_err());
    }

    #[test]
    fn test_normalize_content_ids() {
        assert_eq!(normalize_content_ids(vec![42, 7, 42, 9, 7]), vec![42, 7, 9]);
        assert!(normalize_content_ids(Vec::new()).is_empty());
    }
}
