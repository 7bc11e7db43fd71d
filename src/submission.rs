//! Submission extraction.
//!
//! Reads the live control values of a rendered form back into a flat payload
//! keyed by field key, in declaration order. The payload is only displayed;
//! nothing is sent to the form's action URL.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::builder::{Control, RenderedForm};

/// A submit trigger. Extraction always prevents the default navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Field key → submitted value, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionResult {
    values: Map<String, Value>,
}

impl SubmissionResult {
    /// Record a value. A repeated key keeps its first position and takes the
    /// latest value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), Value::String(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pretty-printed JSON, two-space indentation.
    pub fn to_pretty_json(&self) -> String {
        // A map of strings always serializes
        serde_json::to_string_pretty(&self.values).unwrap_or_default()
    }
}

/// Read-only area showing the last submitted payload, with its caption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadDisplay {
    pub text: String,
    pub visible: bool,
    pub label_visible: bool,
}

impl PayloadDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop stale payload text; visibility is left as is.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    fn show(&mut self, text: String) {
        self.text = text;
        self.visible = true;
        self.label_visible = true;
    }
}

/// Collect the current value of every declared field.
///
/// Radio groups yield the checked option's value or "" when none is checked.
/// A field without a control (unregistered type) yields "".
pub fn extract(form: &RenderedForm) -> SubmissionResult {
    let mut result = SubmissionResult::default();
    for row in form.rows() {
        let value = row.control.as_ref().map(Control::value).unwrap_or_default();
        result.insert(row.field.key.clone(), value);
    }
    result
}

/// Handle a submit trigger: prevent navigation, extract, and display the payload.
pub fn submit(
    form: &RenderedForm,
    event: &mut SubmitEvent,
    display: &mut PayloadDisplay,
) -> SubmissionResult {
    event.prevent_default();

    let result = extract(form);
    display.show(result.to_pretty_json());

    info!(
        action = %form.action,
        fields = result.len(),
        "form submitted (payload displayed, not sent)"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_form, RenderSurface};
    use crate::registry::RendererRegistry;
    use crate::types::{FieldDescription, FormDescription};

    fn rendered(fields: Vec<FieldDescription>) -> RenderSurface {
        let mut surface = RenderSurface::new();
        build_form(
            &FormDescription::new("https://api.example.com/submit", fields),
            &RendererRegistry::builtin(),
            &mut surface,
        );
        surface
    }

    #[test]
    fn test_submit_prevents_default_and_displays_payload() {
        let mut surface = rendered(vec![
            FieldDescription::new("Name", "text", "name").required(),
            FieldDescription::new("Plan", "radio", "plan").with_options(["Free", "Pro"]),
        ]);
        let form = surface.form_mut().unwrap();
        form.set_value("name", "Ada").unwrap();
        form.check("plan", "Pro").unwrap();

        let mut event = SubmitEvent::new();
        let mut display = PayloadDisplay::new();
        let result = submit(form, &mut event, &mut display);

        assert!(event.default_prevented());
        assert_eq!(result.keys().collect::<Vec<_>>(), ["name", "plan"]);
        assert_eq!(display.text, "{\n  \"name\": \"Ada\",\n  \"plan\": \"Pro\"\n}");
        assert!(display.visible);
        assert!(display.label_visible);
    }

    #[test]
    fn test_unchecked_radio_is_empty_string() {
        let surface = rendered(vec![
            FieldDescription::new("Plan", "radio", "plan").with_options(["Free", "Pro"])
        ]);
        let result = extract(surface.form().unwrap());
        assert_eq!(result.get("plan"), Some(""));
    }

    #[test]
    fn test_initial_values_are_submitted() {
        let surface = rendered(vec![
            FieldDescription::new("Age", "number", "age").with_value("7"),
            FieldDescription::new("Gender", "select", "gender").with_options(["Male", "Female"]),
        ]);
        let result = extract(surface.form().unwrap());
        assert_eq!(result.get("age"), Some("7"));
        assert_eq!(result.get("gender"), Some("Male"));
    }

    #[test]
    fn test_field_without_control_is_empty_string() {
        let surface = rendered(vec![FieldDescription::new("Mood", "slider", "mood")]);
        let result = extract(surface.form().unwrap());
        assert_eq!(result.get("mood"), Some(""));
    }

    #[test]
    fn test_duplicate_keys_last_write_wins() {
        let mut surface = rendered(vec![
            FieldDescription::new("A", "text", "dup").with_value("first"),
            FieldDescription::new("B", "text", "other"),
            FieldDescription::new("C", "text", "dup").with_value("second"),
        ]);
        let result = extract(surface.form().unwrap());
        assert_eq!(result.keys().collect::<Vec<_>>(), ["dup", "other"]);
        assert_eq!(result.get("dup"), Some("second"));

        // edits reach every control sharing the key
        surface.form_mut().unwrap().set_value("dup", "both").unwrap();
        let result = extract(surface.form().unwrap());
        assert_eq!(result.get("dup"), Some("both"));
    }
}
