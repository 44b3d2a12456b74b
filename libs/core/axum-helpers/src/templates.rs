//! Server-rendered HTML via Handlebars.

use crate::errors::AppError;
use axum::response::Html;
use handlebars::{Handlebars, TemplateError};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Registry of compiled page templates, cheap to clone into handler state.
#[derive(Clone)]
pub struct HtmlTemplates {
    handlebars: Arc<Handlebars<'static>>,
}

impl HtmlTemplates {
    /// Compile the given `(name, source)` pairs. Strict mode is on, so a
    /// template referencing a missing field fails to render instead of
    /// printing an empty string.
    pub fn new<'a>(
        templates: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        for (name, source) in templates {
            handlebars.register_template_string(name, source)?;
            debug!(template = name, "Registered template");
        }

        Ok(Self {
            handlebars: Arc::new(handlebars),
        })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }

    pub fn render_string<T: Serialize>(&self, name: &str, data: &T) -> Result<String, AppError> {
        Ok(self.handlebars.render(name, data)?)
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<Html<String>, AppError> {
        self.render_string(name, data).map(Html)
    }
}

/// Serializes `value` for inlining inside a `<script>` element.
///
/// `</` is escaped so a string value can never close the script tag.
pub fn script_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}
