//! Who is looking at the page.
//!
//! The viewer is resolved for every request and travels in the request
//! extensions. `?in=true` / `?in=false` switches it for the current request
//! and stores the choice in a cookie on that client, so later requests from
//! the same browser keep it. Nothing is shared between clients.

use axum::{
    body::Body,
    extract::Query,
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, Request,
    },
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};

pub const AUTH_COOKIE: &str = "has_auth";

const SET_AUTHENTICATED: &str = "has_auth=1; Path=/; HttpOnly; SameSite=Lax";
const CLEAR_AUTHENTICATED: &str = "has_auth=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewer {
    Guest,
    Authenticated,
}

#[derive(Deserialize)]
struct ViewerQuery {
    #[serde(rename = "in")]
    toggle: Option<String>,
}

pub async fn viewer_middleware(mut req: Request<Body>, next: Next) -> Response {
    let toggle = Query::<ViewerQuery>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(q)| q.toggle)
        .and_then(|value| match value.as_str() {
            "true" => Some(Viewer::Authenticated),
            "false" => Some(Viewer::Guest),
            _ => None,
        });

    let viewer = toggle.unwrap_or_else(|| viewer_from_cookie(req.headers()));
    req.extensions_mut().insert(viewer);

    let mut response = next.run(req).await;

    if let Some(viewer) = toggle {
        let cookie = match viewer {
            Viewer::Authenticated => SET_AUTHENTICATED,
            Viewer::Guest => CLEAR_AUTHENTICATED,
        };
        response
            .headers_mut()
            .append(SET_COOKIE, HeaderValue::from_static(cookie));
    }

    response
}

fn viewer_from_cookie(headers: &HeaderMap) -> Viewer {
    let authenticated = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == AUTH_COOKIE && value == "1");

    if authenticated {
        Viewer::Authenticated
    } else {
        Viewer::Guest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_cookie_marks_authenticated() {
        assert_eq!(
            viewer_from_cookie(&headers_with_cookie("theme=dark; has_auth=1")),
            Viewer::Authenticated
        );
    }

    #[test]
    fn test_missing_or_cleared_cookie_is_guest() {
        assert_eq!(viewer_from_cookie(&HeaderMap::new()), Viewer::Guest);
        assert_eq!(
            viewer_from_cookie(&headers_with_cookie("has_auth=")),
            Viewer::Guest
        );
        assert_eq!(
            viewer_from_cookie(&headers_with_cookie("not_has_auth=1")),
            Viewer::Guest
        );
    }

    #[test]
    fn test_viewer_serializes_like_template_flag() {
        assert_eq!(
            serde_json::to_value(Viewer::Authenticated).unwrap(),
            "authenticated"
        );
        assert_eq!(serde_json::to_value(Viewer::Guest).unwrap(), "guest");
    }
}
