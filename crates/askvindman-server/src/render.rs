//! The hand-off point to whatever turns a page context into a document.

use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::context::Context;
use crate::error::ServerError;

/// Turns a named template plus its context into an HTTP response.
pub trait Renderer: Send + Sync {
    fn render(&self, template: &str, context: &Context) -> Result<Response, ServerError>;
}

/// Responds with the template name and the context as JSON. Useful for API
/// clients and for inspecting exactly what a page would be rendered from.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, template: &str, context: &Context) -> Result<Response, ServerError> {
        let body = serde_json::json!({
            "template": template,
            "context": context,
        });
        Ok(Json(body).into_response())
    }
}
