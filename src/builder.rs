//! Form Builder
//!
//! Turns a validated `FormDescription` into a `RenderedForm`: one labeled row
//! per declared field plus a trailing submit control. The rendered form is a
//! plain in-memory structure; controls keep live values that can be edited
//! before submission, and `html` materializes it into markup.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::error::ControlError;
use crate::registry::RendererRegistry;
use crate::types::{FieldDescription, FormDescription};

/// Identifier of the single rendered form.
pub const FORM_ID: &str = "dynamic-form";

/// Text of the trailing submit control.
pub const SUBMIT_LABEL: &str = "Submit";

// =============================================================================
// CONTROLS
// =============================================================================

/// The `type` attribute of an input control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Number,
    /// Any other input type provided by a custom renderer (`email`, `date`, ...)
    Other(String),
}

impl InputKind {
    pub fn as_str(&self) -> &str {
        match self {
            InputKind::Text => "text",
            InputKind::Number => "number",
            InputKind::Other(kind) => kind,
        }
    }

    /// Apply the value sanitization a browser performs for this input type.
    pub fn sanitize(&self, value: &str) -> String {
        match self {
            InputKind::Number if !is_valid_number(value) => String::new(),
            _ => value.to_string(),
        }
    }
}

impl Serialize for InputKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

fn is_valid_number(value: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    value.is_empty()
        || PATTERN
            .get_or_init(|| {
                Regex::new(r"^-?(?:\d+(?:\.\d+)?|\.\d+)(?:[eE][+-]?\d+)?$")
                    .expect("static regex is valid")
            })
            .is_match(value)
}

/// Single-line input (`<input type=...>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputControl {
    pub kind: InputKind,
    pub id: String,
    pub name: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub value: String,
}

impl InputControl {
    /// Input named and identified by the field's key, carrying its constraints
    pub fn for_field(kind: InputKind, field: &FieldDescription) -> Self {
        let value = field
            .value
            .as_deref()
            .map(|v| kind.sanitize(v))
            .unwrap_or_default();
        Self {
            id: field.key.clone(),
            name: field.key.clone(),
            required: field.required,
            placeholder: field.placeholder.clone(),
            value,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
    pub selected: bool,
}

/// Choice control (`<select>`). The first option is selected initially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectControl {
    pub id: String,
    pub name: String,
    pub options: Vec<SelectOption>,
}

impl SelectControl {
    pub fn value(&self) -> &str {
        self.options
            .iter()
            .find(|o| o.selected)
            .map(|o| o.value.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadioOption {
    /// `key + "_" + option`, addressed by the option's own label
    pub id: String,
    /// Group name, shared by every option of the group
    pub name: String,
    pub value: String,
    pub label: String,
    pub checked: bool,
}

/// Mutually exclusive radio inputs sharing one group name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadioGroup {
    pub name: String,
    pub options: Vec<RadioOption>,
}

impl RadioGroup {
    /// Value of the checked option, if any.
    pub fn checked_value(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.checked)
            .map(|o| o.value.as_str())
    }
}

/// A concrete interactive control produced by a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Input(InputControl),
    Select(SelectControl),
    RadioGroup(RadioGroup),
}

impl Control {
    /// Live value as a submission would read it.
    pub fn value(&self) -> String {
        match self {
            Control::Input(input) => input.value.clone(),
            Control::Select(select) => select.value().to_string(),
            Control::RadioGroup(group) => group.checked_value().unwrap_or("").to_string(),
        }
    }

    /// Type a value into an input or pick a select option by value.
    ///
    /// Returns `Ok(false)` when the value is not one of a select's options.
    fn set_value(&mut self, value: &str) -> Result<bool, &'static str> {
        match self {
            Control::Input(input) => {
                input.value = input.kind.sanitize(value);
                Ok(true)
            }
            Control::Select(select) => {
                if !select.options.iter().any(|o| o.value == value) {
                    return Ok(false);
                }
                for option in &mut select.options {
                    option.selected = option.value == value;
                }
                Ok(true)
            }
            Control::RadioGroup(_) => Err("set_value"),
        }
    }

    /// Check one radio option and uncheck the rest of the group.
    fn check(&mut self, option: &str) -> Result<bool, &'static str> {
        match self {
            Control::RadioGroup(group) => {
                if !group.options.iter().any(|o| o.value == option) {
                    return Ok(false);
                }
                for radio in &mut group.options {
                    radio.checked = radio.value == option;
                }
                Ok(true)
            }
            _ => Err("check"),
        }
    }
}

// =============================================================================
// RENDERED FORM
// =============================================================================

/// `<label>` of a field row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldLabel {
    pub text: String,
    /// Always the field key, also for radio groups
    #[serde(rename = "for")]
    pub for_id: String,
}

/// One field: its label and, when the type tag is registered, its control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRow {
    pub field: FieldDescription,
    pub label: FieldLabel,
    pub control: Option<Control>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedForm {
    pub id: String,
    pub action: String,
    pub rows: Vec<FieldRow>,
    pub submit_label: String,
}

impl RenderedForm {
    /// Rows in declaration order.
    pub fn rows(&self) -> &[FieldRow] {
        &self.rows
    }

    /// First row declared with `key`.
    pub fn row(&self, key: &str) -> Option<&FieldRow> {
        self.rows.iter().find(|r| r.field.key == key)
    }

    /// Control rendered for the first row declared with `key`.
    pub fn control(&self, key: &str) -> Option<&Control> {
        self.row(key).and_then(|r| r.control.as_ref())
    }

    /// Edit the value of every input/select rendered under `key`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ControlError> {
        self.edit(key, "set_value", value, |control| control.set_value(value))
    }

    /// Check `option` in every radio group rendered under `key`.
    pub fn check(&mut self, key: &str, option: &str) -> Result<(), ControlError> {
        self.edit(key, "check", option, |control| control.check(option))
    }

    fn edit<F>(
        &mut self,
        key: &str,
        operation: &'static str,
        argument: &str,
        mut apply: F,
    ) -> Result<(), ControlError>
    where
        F: FnMut(&mut Control) -> Result<bool, &'static str>,
    {
        let mut found = false;
        let mut applied = false;
        let mut missing_option = false;

        for control in self
            .rows
            .iter_mut()
            .filter(|r| r.field.key == key)
            .filter_map(|r| r.control.as_mut())
        {
            found = true;
            match apply(control) {
                Ok(true) => applied = true,
                Ok(false) => missing_option = true,
                Err(_) => {}
            }
        }

        if applied {
            debug!(key, operation, "control edited");
            Ok(())
        } else if missing_option {
            Err(ControlError::UnknownOption {
                key: key.to_string(),
                option: argument.to_string(),
            })
        } else if found {
            Err(ControlError::UnsupportedOperation {
                key: key.to_string(),
                operation,
            })
        } else {
            Err(ControlError::UnknownKey {
                key: key.to_string(),
            })
        }
    }
}

// =============================================================================
// RENDER SURFACE
// =============================================================================

/// Caller-owned container the builder renders into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSurface {
    form: Option<RenderedForm>,
}

impl RenderSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.form = None;
    }

    pub fn is_empty(&self) -> bool {
        self.form.is_none()
    }

    pub fn form(&self) -> Option<&RenderedForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut RenderedForm> {
        self.form.as_mut()
    }
}

// =============================================================================
// BUILD
// =============================================================================

/// Replace the surface's contents with a freshly built form.
pub fn build_form<'a>(
    description: &FormDescription,
    registry: &RendererRegistry,
    surface: &'a mut RenderSurface,
) -> &'a RenderedForm {
    surface.clear();

    let rows = description
        .fields
        .iter()
        .map(|field| {
            let control = registry.render(field);
            if control.is_none() {
                debug!(
                    key = %field.key,
                    field_type = %field.field_type,
                    "no renderer for field type"
                );
            }
            FieldRow {
                label: FieldLabel {
                    text: field.display_label(),
                    for_id: field.key.clone(),
                },
                field: field.clone(),
                control,
            }
        })
        .collect::<Vec<_>>();

    info!(
        action = %description.form_action,
        rows = rows.len(),
        "form built"
    );

    surface.form.insert(RenderedForm {
        id: FORM_ID.to_string(),
        action: description.form_action.clone(),
        rows,
        submit_label: SUBMIT_LABEL.to_string(),
    })
}
