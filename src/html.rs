//! HTML materialization of rendered forms
//!
//! The only environment-bound step: a `RenderedForm` (or a whole preview
//! session) is turned into markup with handlebars templates. Every text and
//! attribute value goes through handlebars' HTML escaping.

use handlebars::Handlebars;
use serde_json::json;
use tracing::debug;

use crate::builder::RenderedForm;
use crate::driver::PreviewSession;
use crate::error::HtmlError;

const FORM_TEMPLATE: &str = r#"<form id="{{id}}" action="{{action}}">
  <div class="form-fields-wrapper">
{{#each rows}}
    <div class="form-field-row">
      <label for="{{label.for}}">{{label.text}}</label>
{{#with control.input}}
      <input type="{{kind}}" id="{{id}}" name="{{name}}"{{#if required}} required{{/if}}{{#if placeholder}} placeholder="{{placeholder}}"{{/if}} value="{{value}}">
{{/with}}
{{#with control.select}}
      <select id="{{id}}" name="{{name}}">
{{#each options}}
        <option value="{{value}}"{{#if selected}} selected{{/if}}>{{text}}</option>
{{/each}}
      </select>
{{/with}}
{{#with control.radio_group}}
      <div>
{{#each options}}
        <input type="radio" name="{{name}}" value="{{value}}" id="{{id}}"{{#if checked}} checked{{/if}}><label for="{{id}}">{{label}}</label>
{{/each}}
      </div>
{{/with}}
    </div>
{{/each}}
  </div>
  <button type="submit">{{submit_label}}</button>
</form>
"#;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Form Preview</title>
</head>
<body>
  <textarea id="json-input">{{source}}</textarea>
  <div id="json-error-label"{{#unless error_visible}} style="display:none"{{/unless}}>{{error}}</div>
  <div id="rendered-elements">
{{{form}}}  </div>
  <label id="api-call-label"{{#unless payload_label_visible}} style="display:none"{{/unless}}>API payload</label>
  <textarea id="api-payload" readonly{{#unless payload_visible}} style="display:none"{{/unless}}>{{payload}}</textarea>
</body>
</html>
"#;

pub struct HtmlRenderer {
    handlebars: Handlebars<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self, HtmlError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_template_string("form", FORM_TEMPLATE)?;
        handlebars.register_template_string("page", PAGE_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    /// Markup for a single rendered form.
    pub fn render_form(&self, form: &RenderedForm) -> Result<String, HtmlError> {
        let html = self.handlebars.render("form", form)?;
        debug!(rows = form.rows.len(), bytes = html.len(), "form materialized");
        Ok(html)
    }

    /// Standalone preview page: editor text, error label, form, and payload area.
    pub fn render_session(&self, session: &PreviewSession) -> Result<String, HtmlError> {
        let form = match session.form() {
            Some(form) => self.render_form(form)?,
            None => String::new(),
        };
        let payload = session.payload();
        let data = json!({
            "source": session.source(),
            "error": session.error_label().text,
            "error_visible": session.error_label().visible,
            "form": form,
            "payload": payload.text,
            "payload_visible": payload.visible,
            "payload_label_visible": payload.label_visible,
        });
        Ok(self.handlebars.render("page", &data)?)
    }
}
