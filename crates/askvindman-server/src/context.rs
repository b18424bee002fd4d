//! Flat name → value mapping handed to the renderer.

use askvindman_store::Database;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::viewer::Viewer;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Context(Map<String, Value>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values shared by every page: title, route name, viewer flag and the
    /// popular tags / popular users sidebars.
    pub fn base(
        db: &Database,
        config: &ServerConfig,
        viewer: Viewer,
        title: &str,
        url_name: &str,
    ) -> Result<Self, ServerError> {
        Self::new()
            .with("title", title)?
            .with("url_name", url_name)?
            .with("has_auth", viewer)?
            .with("popular_tags", db.popular_tags(config.popular_limit)?)?
            .with("popular_users", db.popular_profiles(config.popular_limit)?)
    }

    pub fn insert(&mut self, key: &str, value: impl Serialize) -> Result<(), ServerError> {
        let value = serde_json::to_value(value)
            .map_err(|e| ServerError::Render(format!("context value {key}: {e}")))?;
        self.0.insert(key.to_string(), value);
        Ok(())
    }

    pub fn with(mut self, key: &str, value: impl Serialize) -> Result<Self, ServerError> {
        self.insert(key, value)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_context_has_sidebars() {
        let db = Database::open_in_memory().unwrap();
        db.create_tag("rust").unwrap();

        let ctx = Context::base(&db, &ServerConfig::default(), Viewer::Guest, "Ask", "ask")
            .unwrap();
        let ctx = serde_json::to_value(&ctx).unwrap();
        assert_eq!(ctx["title"], "Ask");
        assert_eq!(ctx["url_name"], "ask");
        assert_eq!(ctx["has_auth"], "guest");
        assert_eq!(ctx["popular_tags"][0]["name"], "rust");
        assert_eq!(ctx["popular_tags"][0]["questions_count"], 0);
        assert_eq!(ctx["popular_users"], Value::Array(Vec::new()));
    }

    #[test]
    fn test_context_serializes_flat() {
        let ctx = Context::new().with("need_user_link", true).unwrap();
        assert_eq!(
            serde_json::to_value(&ctx).unwrap(),
            serde_json::json!({ "need_user_link": true })
        );
    }
}
