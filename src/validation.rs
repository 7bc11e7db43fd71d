//! Multi-stage validation pipeline for form description text
//!
//! Stages run in a fixed order and the first failure short-circuits the rest:
//! parse → shape → url → fields.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::{FieldError, FormError};
use crate::types::{FieldDescription, FieldKind, FormDescription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStage {
    Parse,
    Shape,
    Url,
    Fields,
    Complete,
}

impl ValidationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStage::Parse => "parse",
            ValidationStage::Shape => "shape",
            ValidationStage::Url => "url",
            ValidationStage::Fields => "fields",
            ValidationStage::Complete => "complete",
        }
    }
}

fn form_action_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^https?://").expect("static regex is valid"))
}

/// True when `action` looks like an absolute http(s) URL.
pub fn is_valid_form_action(action: &str) -> bool {
    !action.is_empty() && form_action_pattern().is_match(action)
}

/// Check the raw `fields` value.
///
/// Stops at the first offending field. Keys are not checked for uniqueness
/// and an empty `options` array is accepted.
pub fn validate_fields(fields: &Value) -> Result<(), FieldError> {
    let fields = match fields.as_array() {
        Some(list) if !list.is_empty() => list,
        _ => return Err(FieldError::NoFields),
    };

    for field in fields {
        let Some(field_type) = string_member(field, "type") else {
            return Err(FieldError::MalformedField);
        };
        if string_member(field, "label").is_none() || string_member(field, "key").is_none() {
            return Err(FieldError::MalformedField);
        }
        if FieldKind::from_tag(field_type).requires_options()
            && !field.get("options").is_some_and(Value::is_array)
        {
            return Err(FieldError::MissingOptions);
        }
    }

    Ok(())
}

fn string_member<'a>(value: &'a Value, name: &str) -> Option<&'a str> {
    value.get(name).and_then(Value::as_str)
}

/// Run the full pipeline over description text.
pub fn parse_description(text: &str) -> Result<FormDescription, FormError> {
    // Stage 1: parse
    let value: Value = serde_json::from_str(text).map_err(|e| FormError::invalid_json(&e))?;
    debug!(stage = ValidationStage::Parse.as_str(), "description parsed");

    // Stage 2: shape
    let Some(raw_fields) = value.get("fields").filter(|f| f.is_array()) else {
        return Err(FormError::Shape);
    };

    // Stage 3: form action
    let form_action = match value.get("formAction").and_then(Value::as_str) {
        Some(action) if is_valid_form_action(action) => action,
        _ => return Err(FormError::MissingUrl),
    };

    // Stage 4: fields
    validate_fields(raw_fields)?;

    let fields: Vec<FieldDescription> = raw_fields
        .as_array()
        .map(|list| list.iter().filter_map(FieldDescription::from_value).collect())
        .unwrap_or_default();
    debug!(
        stage = ValidationStage::Complete.as_str(),
        field_count = fields.len(),
        "description validated"
    );

    Ok(FormDescription::new(form_action, fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_must_be_non_empty_array() {
        assert_eq!(validate_fields(&json!([])), Err(FieldError::NoFields));
        assert_eq!(validate_fields(&json!({})), Err(FieldError::NoFields));
        assert_eq!(validate_fields(&Value::Null), Err(FieldError::NoFields));
    }

    #[test]
    fn test_fields_need_string_label_type_key() {
        assert_eq!(
            validate_fields(&json!([{"label": "A", "type": "text"}])),
            Err(FieldError::MalformedField)
        );
        assert_eq!(
            validate_fields(&json!([{"label": 1, "type": "text", "key": "a"}])),
            Err(FieldError::MalformedField)
        );
        assert_eq!(
            validate_fields(&json!(["not an object"])),
            Err(FieldError::MalformedField)
        );
    }

    #[test]
    fn test_select_and_radio_need_options_array() {
        assert_eq!(
            validate_fields(&json!([{"label": "G", "type": "select", "key": "g"}])),
            Err(FieldError::MissingOptions)
        );
        assert_eq!(
            validate_fields(&json!([
                {"label": "P", "type": "radio", "key": "p", "options": "Free"}
            ])),
            Err(FieldError::MissingOptions)
        );
        assert_eq!(
            validate_fields(&json!([{"label": "P", "type": "radio", "key": "p", "options": []}])),
            Ok(())
        );
    }

    #[test]
    fn test_first_offending_field_wins() {
        let fields = json!([
            {"label": "G", "type": "select", "key": "g"},
            {"label": "A"}
        ]);
        assert_eq!(validate_fields(&fields), Err(FieldError::MissingOptions));
    }

    #[test]
    fn test_duplicate_keys_are_tolerated() {
        let fields = json!([
            {"label": "A", "type": "text", "key": "a"},
            {"label": "B", "type": "text", "key": "a"}
        ]);
        assert_eq!(validate_fields(&fields), Ok(()));
    }

    #[test]
    fn test_form_action_pattern() {
        assert!(is_valid_form_action("https://api.example.com/submit"));
        assert!(is_valid_form_action("http://"));
        assert!(!is_valid_form_action(""));
        assert!(!is_valid_form_action("ftp://x"));
        assert!(!is_valid_form_action(" https://x.com"));
        assert!(!is_valid_form_action("HTTPS://x.com"));
    }

    #[test]
    fn test_pipeline_stage_order() {
        assert!(matches!(
            parse_description("{"),
            Err(FormError::InvalidJson { .. })
        ));
        assert_eq!(
            parse_description(r#"{"formAction":"https://x.com"}"#),
            Err(FormError::Shape)
        );
        assert_eq!(parse_description("[1, 2]"), Err(FormError::Shape));
        // URL is checked before the field list
        assert_eq!(
            parse_description(r#"{"formAction":"ftp://x","fields":[]}"#),
            Err(FormError::MissingUrl)
        );
        assert_eq!(
            parse_description(r#"{"formAction":5,"fields":[]}"#),
            Err(FormError::MissingUrl)
        );
        assert_eq!(
            parse_description(r#"{"formAction":"https://x.com","fields":[]}"#),
            Err(FormError::Field(FieldError::NoFields))
        );
    }

    #[test]
    fn test_pipeline_success_normalizes_fields() {
        let desc = parse_description(
            r#"{
                "formAction": "https://x.com/submit",
                "fields": [
                    {"label": "Name", "type": "text", "key": "name", "required": true},
                    {"label": "Plan", "type": "radio", "key": "plan", "options": ["Free", "Pro"]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(desc.form_action, "https://x.com/submit");
        assert_eq!(desc.fields.len(), 2);
        assert!(desc.fields[0].required);
        assert_eq!(desc.fields[1].options(), ["Free", "Pro"]);
    }

    #[test]
    fn test_out_of_range_number_is_invalid_json() {
        let err = parse_description(concat!(
            r#"{"formAction":"https://x.com","#,
            r#""fields":[{"label":"A","type":"text","key":"a","value":1e400}]}"#
        ))
        .unwrap_err();
        assert_eq!(err.stage(), ValidationStage::Parse);
        assert!(err.to_string().starts_with("Invalid JSON: number out of range"));
    }
}
