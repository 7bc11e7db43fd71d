//! Live-update driver.
//!
//! `PreviewSession` owns every piece of mutable state: the description text,
//! the render surface, the error label, and the payload display. Each text
//! change re-runs the whole pipeline and replaces the previous render; a
//! failure at any stage leaves the surface empty and shows one message.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::builder::{build_form, RenderSurface, RenderedForm};
use crate::error::FormError;
use crate::registry::{registry, RendererRegistry};
use crate::submission::{submit, PayloadDisplay, SubmissionResult, SubmitEvent};
use crate::types::FormDescription;
use crate::validation::parse_description;

/// Example description loaded when a session starts.
pub const DEFAULT_DESCRIPTION: &str = r#"{
  "formAction": "https://api.example.com/submit",
  "fields": [
    {
      "label": "Name",
      "type": "text",
      "key": "name",
      "required": true
    },
    {
      "label": "Age",
      "type": "number",
      "key": "age",
      "required": false
    },
    {
      "label": "Gender",
      "type": "select",
      "key": "gender",
      "options": [
        "Male",
        "Female"
      ]
    },
    {
      "label": "Subscription",
      "type": "radio",
      "key": "subscription",
      "options": [
        "Free",
        "Premium",
        "Enterprise"
      ],
      "required": true
    }
  ]
}"#;

/// Single-line error message area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLabel {
    pub text: String,
    pub visible: bool,
}

impl ErrorLabel {
    fn show(&mut self, message: String) {
        self.text = message;
        self.visible = true;
    }

    fn hide(&mut self) {
        self.text.clear();
        self.visible = false;
    }
}

#[derive(Debug)]
pub struct PreviewSession {
    registry: Arc<RendererRegistry>,
    source: String,
    description: Option<FormDescription>,
    surface: RenderSurface,
    error_label: ErrorLabel,
    payload: PayloadDisplay,
    last_submit: Option<SubmitEvent>,
}

impl PreviewSession {
    /// Start a session on the built-in example description.
    pub fn new(registry: Arc<RendererRegistry>) -> Self {
        Self::with_source(registry, DEFAULT_DESCRIPTION)
    }

    /// Start a session with the process-wide built-in registry.
    pub fn with_default_registry() -> Self {
        Self::new(registry())
    }

    /// Start a session on `source`, rendering it immediately.
    pub fn with_source(registry: Arc<RendererRegistry>, source: impl Into<String>) -> Self {
        let mut session = Self {
            registry,
            source: source.into(),
            description: None,
            surface: RenderSurface::new(),
            error_label: ErrorLabel::default(),
            payload: PayloadDisplay::new(),
            last_submit: None,
        };
        // Failures are reported through the error label
        let _ = session.refresh();
        session
    }

    /// Text-change notification: store the new text and re-render.
    pub fn set_source(&mut self, source: impl Into<String>) -> Result<(), FormError> {
        self.source = source.into();
        self.refresh()
    }

    /// Re-run the pipeline over the current text.
    pub fn refresh(&mut self) -> Result<(), FormError> {
        self.error_label.hide();

        match parse_description(&self.source) {
            Ok(description) => {
                build_form(&description, &self.registry, &mut self.surface);
                self.description = Some(description);
                self.payload.clear();
                self.last_submit = None;
                debug!("preview refreshed");
                Ok(())
            }
            Err(err) => {
                warn!(stage = err.stage().as_str(), error = %err, "description rejected");
                self.surface.clear();
                self.description = None;
                self.payload.clear();
                self.last_submit = None;
                self.error_label.show(err.to_string());
                Err(err)
            }
        }
    }

    /// Submit trigger. `None` when no form is rendered.
    pub fn submit(&mut self) -> Option<SubmissionResult> {
        let form = self.surface.form()?;
        let event = self.last_submit.insert(SubmitEvent::new());
        Some(submit(form, event, &mut self.payload))
    }

    /// The event handled by the most recent submit since the last render.
    pub fn last_submit_event(&self) -> Option<&SubmitEvent> {
        self.last_submit.as_ref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The last successfully validated description.
    pub fn description(&self) -> Option<&FormDescription> {
        self.description.as_ref()
    }

    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn form(&self) -> Option<&RenderedForm> {
        self.surface.form()
    }

    pub fn form_mut(&mut self) -> Option<&mut RenderedForm> {
        self.surface.form_mut()
    }

    pub fn error_label(&self) -> &ErrorLabel {
        &self.error_label
    }

    pub fn payload(&self) -> &PayloadDisplay {
        &self.payload
    }
}
