//! Form Preview - declarative form descriptions rendered and submitted in memory
//!
//! A JSON form description is validated, each declared field is mapped to a
//! control through a renderer registry, and the resulting form can be edited
//! and submitted to produce a flat key/value payload.
//!
//! # Architecture
//!
//! ```text
//! raw text ──► validation ──► builder ──► RenderedForm ──► submission ──► payload
//!                 │              │              │
//!                 │          registry          html (materialization)
//!                 └──────── driver (PreviewSession owns all state) ───────┘
//! ```
//!
//! Interpretation (`validation`, `builder`, `submission`) is pure and works on
//! plain data; only `html` turns a rendered form into markup.
//!
//! # Example
//!
//! ```
//! use form_preview::PreviewSession;
//!
//! let mut session = PreviewSession::with_default_registry();
//! session.set_source(r#"{
//!     "formAction": "https://api.example.com/submit",
//!     "fields": [{ "label": "Name", "type": "text", "key": "name" }]
//! }"#).unwrap();
//! assert!(!session.error_label().visible);
//!
//! session.form_mut().unwrap().set_value("name", "Ada").unwrap();
//! let result = session.submit().unwrap();
//! assert_eq!(result.get("name"), Some("Ada"));
//! ```

pub mod builder;
pub mod driver;
pub mod error;
pub mod html;
pub mod registry;
pub mod submission;
pub mod types;
pub mod validation;

pub use builder::{
    build_form, Control, FieldRow, InputControl, InputKind, RenderSurface, RenderedForm,
};
pub use driver::{ErrorLabel, PreviewSession, DEFAULT_DESCRIPTION};
pub use error::{ControlError, FieldError, FormError, HtmlError};
pub use html::HtmlRenderer;
pub use registry::{registry, FieldRenderer, RendererRegistry};
pub use submission::{extract, submit, PayloadDisplay, SubmissionResult, SubmitEvent};
pub use types::{FieldDescription, FieldKind, FormDescription};
pub use validation::{parse_description, validate_fields, ValidationStage};
