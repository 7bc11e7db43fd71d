//! Typed error model for the preview pipeline.
//!
//! Every failure of the text → form pipeline maps to exactly one `FormError`
//! variant, and its `Display` is the message shown in the error label.
//!
//! ```text
//! Stage 1: parse   → InvalidJson
//! Stage 2: shape   → Shape
//! Stage 3: url     → MissingUrl
//! Stage 4: fields  → Field(NoFields | MalformedField | MissingOptions)
//! ```

use crate::validation::ValidationStage;

// ---------------------------------------------------------------------------
// FormError: the pipeline error
// ---------------------------------------------------------------------------

/// All ways a description text can fail to become a form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// The text is not valid JSON; carries the parser's message.
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    /// Top-level value is not an object with a `fields` array.
    #[error("JSON must be an object with a \"fields\" array and optional \"formAction\" string.")]
    Shape,

    /// `formAction` missing, empty, or not an absolute http(s) URL.
    #[error("Form URL should be provided.")]
    MissingUrl,

    /// A per-field structural violation.
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl FormError {
    pub fn invalid_json(err: &serde_json::Error) -> Self {
        Self::InvalidJson {
            message: err.to_string(),
        }
    }

    /// The pipeline stage that produced this error.
    pub fn stage(&self) -> ValidationStage {
        match self {
            FormError::InvalidJson { .. } => ValidationStage::Parse,
            FormError::Shape => ValidationStage::Shape,
            FormError::MissingUrl => ValidationStage::Url,
            FormError::Field(_) => ValidationStage::Fields,
        }
    }
}

// ---------------------------------------------------------------------------
// FieldError: per-field validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Please add at least one form field.")]
    NoFields,

    #[error("Each field must have label, type, and key as strings.")]
    MalformedField,

    #[error("Select and radio fields must have an options array.")]
    MissingOptions,
}

// ---------------------------------------------------------------------------
// Control and materialization errors
// ---------------------------------------------------------------------------

/// Errors raised when editing a rendered form in memory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("No control registered under key '{key}'")]
    UnknownKey { key: String },

    #[error("Control '{key}' does not accept {operation}")]
    UnsupportedOperation { key: String, operation: &'static str },

    #[error("Control '{key}' has no option '{option}'")]
    UnknownOption { key: String, option: String },
}

/// Errors raised while turning a rendered form into HTML.
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Template registration failed: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Template render failed: {0}")]
    Render(#[from] handlebars::RenderError),
}
