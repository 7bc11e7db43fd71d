//! Field Renderer Registry
//!
//! Maps a field's `type` tag to the renderer that produces its control.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               RendererRegistry               │
//! ├──────────────────────────────────────────────┤
//! │  Built-in (BuiltinRenderer, per FieldKind):  │
//! │  ├── text    → Input(Text)                   │
//! │  ├── number  → Input(Number)                 │
//! │  ├── select  → Select                        │
//! │  └── radio   → RadioGroup                    │
//! │  Extensions: register(tag, renderer)         │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The builder only ever calls `RendererRegistry::render`, so a new field type
//! needs nothing more than a `register` call.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::builder::{
    Control, InputControl, InputKind, RadioGroup, RadioOption, SelectControl, SelectOption,
};
use crate::types::{FieldDescription, FieldKind};

// =============================================================================
// RENDERER CAPABILITY
// =============================================================================

/// Produces the control for one field description.
///
/// Renderers are pure: the same description always yields the same control.
pub trait FieldRenderer: Send + Sync {
    fn render(&self, field: &FieldDescription) -> Control;
}

impl<F> FieldRenderer for F
where
    F: Fn(&FieldDescription) -> Control + Send + Sync,
{
    fn render(&self, field: &FieldDescription) -> Control {
        self(field)
    }
}

/// Renderer for one of the built-in field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinRenderer {
    Text,
    Number,
    Select,
    Radio,
}

impl BuiltinRenderer {
    pub fn for_kind(kind: &FieldKind) -> Option<Self> {
        match kind {
            FieldKind::Text => Some(BuiltinRenderer::Text),
            FieldKind::Number => Some(BuiltinRenderer::Number),
            FieldKind::Select => Some(BuiltinRenderer::Select),
            FieldKind::Radio => Some(BuiltinRenderer::Radio),
            FieldKind::Other(_) => None,
        }
    }
}

impl FieldRenderer for BuiltinRenderer {
    fn render(&self, field: &FieldDescription) -> Control {
        match self {
            BuiltinRenderer::Text => {
                Control::Input(InputControl::for_field(InputKind::Text, field))
            }
            BuiltinRenderer::Number => {
                Control::Input(InputControl::for_field(InputKind::Number, field))
            }
            BuiltinRenderer::Select => Control::Select(render_select(field)),
            BuiltinRenderer::Radio => Control::RadioGroup(render_radio(field)),
        }
    }
}

fn render_select(field: &FieldDescription) -> SelectControl {
    let options = field
        .options()
        .iter()
        .enumerate()
        .map(|(index, opt)| SelectOption {
            value: opt.clone(),
            text: opt.clone(),
            selected: index == 0,
        })
        .collect();

    SelectControl {
        id: field.key.clone(),
        name: field.key.clone(),
        options,
    }
}

fn render_radio(field: &FieldDescription) -> RadioGroup {
    let options = field
        .options()
        .iter()
        .map(|opt| RadioOption {
            id: format!("{}_{}", field.key, opt),
            name: field.key.clone(),
            value: opt.clone(),
            label: opt.clone(),
            checked: false,
        })
        .collect();

    RadioGroup {
        name: field.key.clone(),
        options,
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// The default registry - built-ins only, initialized once
static DEFAULT_REGISTRY: OnceLock<Arc<RendererRegistry>> = OnceLock::new();

/// Process-wide read-only registry with the built-in renderers.
pub fn registry() -> Arc<RendererRegistry> {
    DEFAULT_REGISTRY
        .get_or_init(|| Arc::new(RendererRegistry::builtin()))
        .clone()
}

#[derive(Clone, Default)]
pub struct RendererRegistry {
    /// Renderers indexed by type tag
    renderers: HashMap<String, Arc<dyn FieldRenderer>>,
}

impl RendererRegistry {
    /// Empty registry: every field renders as a bare label.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `text`, `number`, `select` and `radio`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for tag in FieldKind::builtin_tags() {
            if let Some(renderer) = BuiltinRenderer::for_kind(&FieldKind::from_tag(tag)) {
                registry.register(tag, renderer);
            }
        }
        registry
    }

    /// Add or replace the renderer for `tag`.
    pub fn register<R>(&mut self, tag: impl Into<String>, renderer: R) -> &mut Self
    where
        R: FieldRenderer + 'static,
    {
        self.renderers.insert(tag.into(), Arc::new(renderer));
        self
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.renderers.contains_key(tag)
    }

    pub fn get(&self, tag: &str) -> Option<&dyn FieldRenderer> {
        self.renderers.get(tag).map(|r| r.as_ref())
    }

    /// Render `field`, or `None` when its type tag is not registered.
    pub fn render(&self, field: &FieldDescription) -> Option<Control> {
        self.get(&field.field_type).map(|r| r.render(field))
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}
