//! Client-side rendering of a [`ServiceState`].
//!
//! Templates use Handlebars syntax over the state's JSON shape:
//! `{{status}}` plus `{{info.ip}}`, `{{info.asn}}`, `{{info.as_name}}`,
//! `{{info.as_domain}}`, `{{info.country_code}}`, `{{info.country}}`,
//! `{{info.continent_code}}` and `{{info.continent}}`. While no lookup has
//! ever succeeded, `info` is null and its placeholders render empty.

use handlebars::{Handlebars, no_escape};
use thiserror::Error;

use crate::state::ServiceState;

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;

const TEMPLATE_NAME: &str = "info";

/// Error type for template operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template does not compile.
    #[error("Invalid template: {reason}")]
    InvalidTemplate {
        /// Parser message
        reason: String,
    },

    /// The template compiled but could not be rendered.
    #[error("Failed to render template: {reason}")]
    Render {
        /// Renderer message
        reason: String,
    },
}

/// A compiled output template.
#[derive(Debug)]
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Compiles `template`.
    ///
    /// Output is plain text: values are not HTML-escaped.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidTemplate`] on a syntax error.
    pub fn new(template: &str) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| RenderError::InvalidTemplate {
                reason: e.to_string(),
            })?;
        Ok(Self { registry })
    }

    /// Renders `state` through the template.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Render`] if a helper fails.
    pub fn render(&self, state: &ServiceState) -> Result<String, RenderError> {
        self.registry
            .render(TEMPLATE_NAME, state)
            .map_err(|e| RenderError::Render {
                reason: e.to_string(),
            })
    }
}

/// Checks template syntax without keeping the compiled form.
///
/// # Errors
///
/// Returns [`RenderError::InvalidTemplate`] on a syntax error.
pub fn validate_template(template: &str) -> Result<(), RenderError> {
    Renderer::new(template).map(|_| ())
}
