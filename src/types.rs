//! Form description data model.
//!
//! `FormDescription` and `FieldDescription` are the validated, normalized view
//! of the JSON a user types. They are rebuilt from scratch on every edit and
//! never mutated afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// FIELD KIND
// ============================================================================

/// Classification of a field's `type` tag.
///
/// Built-in kinds get their own variant; any other tag is carried verbatim in
/// `Other` and resolved against the renderer registry at build time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Number,
    Select,
    Radio,
    Other(String),
}

impl FieldKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "text" => FieldKind::Text,
            "number" => FieldKind::Number,
            "select" => FieldKind::Select,
            "radio" => FieldKind::Radio,
            other => FieldKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Select => "select",
            FieldKind::Radio => "radio",
            FieldKind::Other(tag) => tag,
        }
    }

    /// Kinds that must declare an `options` array.
    pub fn requires_options(&self) -> bool {
        matches!(self, FieldKind::Select | FieldKind::Radio)
    }

    /// The built-in tags, in registry order.
    pub fn builtin_tags() -> [&'static str; 4] {
        ["text", "number", "select", "radio"]
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FIELD DESCRIPTION
// ============================================================================

/// One declared form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescription {
    pub label: String,
    /// Tag into the renderer registry
    #[serde(rename = "type")]
    pub field_type: String,
    /// Control name, control id, and result key
    pub key: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Initial value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldDescription {
    /// Create a field with only the mandatory members set
    pub fn new(
        label: impl Into<String>,
        field_type: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            field_type: field_type.into(),
            key: key.into(),
            required: false,
            placeholder: None,
            value: None,
            options: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Declared options, empty when none were given.
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// Label text as displayed, with the required marker appended.
    pub fn display_label(&self) -> String {
        if self.required {
            format!("{} *", self.label)
        } else {
            self.label.clone()
        }
    }

    /// Normalize a field that already passed structural validation.
    ///
    /// Optional members are read leniently: `required` and `placeholder` are
    /// truthy-checked, everything else is stringified the way a browser would
    /// assign it to a control, except that a `null` value becomes "".
    /// Returns `None` when `label`, `type` or `key` is not a string.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let label = obj.get("label")?.as_str()?;
        let field_type = obj.get("type")?.as_str()?;
        let key = obj.get("key")?.as_str()?;

        let required = obj.get("required").is_some_and(is_truthy);
        let placeholder = obj
            .get("placeholder")
            .filter(|v| is_truthy(v))
            .map(stringify);
        let initial = obj
            .get("value")
            .map(|v| if v.is_null() { String::new() } else { stringify(v) });
        let options = obj
            .get("options")
            .and_then(Value::as_array)
            .map(|opts| opts.iter().map(stringify).collect());

        Some(Self {
            label: label.to_string(),
            field_type: field_type.to_string(),
            key: key.to_string(),
            required,
            placeholder,
            value: initial,
            options,
        })
    }
}

// ============================================================================
// FORM DESCRIPTION
// ============================================================================

/// A validated form: target URL plus a non-empty, ordered field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDescription {
    pub form_action: String,
    pub fields: Vec<FieldDescription>,
}

impl FormDescription {
    pub fn new(form_action: impl Into<String>, fields: Vec<FieldDescription>) -> Self {
        Self {
            form_action: form_action.into(),
            fields,
        }
    }
}

// ============================================================================
// VALUE COERCION HELPERS
// ============================================================================

/// Truthiness of a loosely-typed JSON member.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a JSON member as the string a control would display.
///
/// Follows script string conversion: `null` is "null", integral numbers drop
/// their fraction, arrays join their elements with commas.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map(number_to_string).unwrap_or_else(|| n.to_string()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => stringify(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Shortest round-trip digits, plain notation for magnitudes in [1e-6, 1e21).
fn number_to_string(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return f.to_string();
    }

    let sci = format!("{:e}", f);
    match sci.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => sci,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_kind_from_tag() {
        assert_eq!(FieldKind::from_tag("text"), FieldKind::Text);
        assert_eq!(FieldKind::from_tag("radio"), FieldKind::Radio);
        assert_eq!(
            FieldKind::from_tag("email"),
            FieldKind::Other("email".to_string())
        );
        assert_eq!(FieldKind::from_tag("email").as_str(), "email");
        assert!(FieldKind::Select.requires_options());
        assert!(!FieldKind::Number.requires_options());
    }

    #[test]
    fn test_display_label_marks_required() {
        let field = FieldDescription::new("Name", "text", "name").required();
        assert_eq!(field.display_label(), "Name *");
        let field = FieldDescription::new("Age", "number", "age");
        assert_eq!(field.display_label(), "Age");
    }

    #[test]
    fn test_from_value_minimal() {
        let field =
            FieldDescription::from_value(&json!({"label": "A", "type": "text", "key": "a"}))
                .unwrap();
        assert_eq!(field, FieldDescription::new("A", "text", "a"));
    }

    #[test]
    fn test_from_value_coerces_optional_members() {
        let field = FieldDescription::from_value(&json!({
            "label": "Qty",
            "type": "number",
            "key": "qty",
            "required": 1,
            "placeholder": "",
            "value": 3,
            "options": ["x", 2, true]
        }))
        .unwrap();
        assert!(field.required);
        assert_eq!(field.placeholder, None);
        assert_eq!(field.value.as_deref(), Some("3"));
        assert_eq!(field.options(), ["x", "2", "true"]);
    }

    #[test]
    fn test_from_value_null_value_is_empty_string() {
        let field = FieldDescription::from_value(
            &json!({"label": "A", "type": "text", "key": "a", "value": null, "required": false}),
        )
        .unwrap();
        assert_eq!(field.value.as_deref(), Some(""));
        assert!(!field.required);
    }

    #[test]
    fn test_from_value_formats_integral_floats_without_fraction() {
        let field: Value = serde_json::from_str(
            r#"{"label":"Q","type":"number","key":"q","value":1e2,"placeholder":3.0,
                "options":[1.0,null,2.5,-0.0]}"#,
        )
        .unwrap();
        let field = FieldDescription::from_value(&field).unwrap();
        assert_eq!(field.value.as_deref(), Some("100"));
        assert_eq!(field.placeholder.as_deref(), Some("3"));
        assert_eq!(field.options(), ["1", "null", "2.5", "0"]);
    }

    #[test]
    fn test_stringify_numbers() {
        assert_eq!(stringify(&json!(3.0)), "3");
        assert_eq!(stringify(&json!(-42)), "-42");
        assert_eq!(stringify(&json!(0.1)), "0.1");
        assert_eq!(stringify(&json!(1e20)), "100000000000000000000");
        assert_eq!(stringify(&json!(1e21)), "1e+21");
        assert_eq!(stringify(&json!(1.5e-7)), "1.5e-7");
        assert_eq!(stringify(&json!(0.000001)), "0.000001");
        assert_eq!(stringify(&json!(u64::MAX)), "18446744073709552000");
    }

    #[test]
    fn test_stringify_null_and_compound_values() {
        assert_eq!(stringify(&Value::Null), "null");
        assert_eq!(stringify(&json!([1, null, "a", [2, 3]])), "1,,a,2,3");
        assert_eq!(stringify(&json!({"a": 1})), "[object Object]");
    }

    #[test]
    fn test_from_value_rejects_non_string_key() {
        assert!(
            FieldDescription::from_value(&json!({"label": "A", "type": "text", "key": 1}))
                .is_none()
        );
        assert!(FieldDescription::from_value(&json!("text")).is_none());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let desc = FormDescription::new(
            "https://x.com",
            vec![FieldDescription::new("Plan", "radio", "plan").with_options(["Free", "Pro"])],
        );
        let value = serde_json::to_value(&desc).unwrap();
        assert_eq!(value["formAction"], "https://x.com");
        assert_eq!(value["fields"][0]["type"], "radio");
        assert!(value["fields"][0].get("placeholder").is_none());

        let back: FormDescription = serde_json::from_value(value).unwrap();
        assert_eq!(back, desc);
    }
}
