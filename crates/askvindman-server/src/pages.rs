//! Page controllers.
//!
//! Every handler takes the database lock once, runs its queries
//! synchronously, and passes a template name plus a flat [`Context`] to the
//! configured renderer.

use std::convert::Infallible;

use askvindman_shared::pagination::{PageRequest, Paginator};
use askvindman_shared::types::QuestionId;
use askvindman_store::{Database, StoreError};
use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, Uri},
    response::Response,
    Extension,
};
use tracing::debug;

use crate::api::AppState;
use crate::context::Context;
use crate::error::ServerError;
use crate::viewer::Viewer;

/// The requested page. Extraction never fails: a missing, repeated or
/// malformed `page` parameter still yields a page to clamp, and the last
/// `page` value in the query string wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageQuery(PageRequest);

impl PageQuery {
    fn request(&self) -> PageRequest {
        self.0
    }

    fn from_uri(uri: &Uri) -> Self {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();
        let raw = pairs
            .into_iter()
            .rev()
            .find(|(key, _)| key == "page")
            .map(|(_, value)| value);
        Self(PageRequest::parse(raw.as_deref()))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for PageQuery {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_uri(&parts.uri))
    }
}

fn base(
    state: &AppState,
    db: &Database,
    viewer: Viewer,
    title: &str,
    url_name: &str,
) -> Result<Context, ServerError> {
    Context::base(db, &state.config, viewer, title, url_name)
}

fn paginator(state: &AppState) -> Paginator {
    Paginator::new(state.config.page_size)
}

// ---------------------------------------------------------------------------
// Question listings
// ---------------------------------------------------------------------------

pub async fn index(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    query: PageQuery,
) -> Result<Response, ServerError> {
    let db = state.db.lock().await;
    let questions = paginator(&state).page(&db.recent(), query.request())?;

    let ctx = base(&state, &db, viewer, &state.config.site_title, "recent")?
        .with("quest_type", "recent")?
        .with("questions", questions)?
        .with("need_user_link", false)?;

    state.renderer.render("questions/index.html", &ctx)
}

pub async fn hot(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    query: PageQuery,
) -> Result<Response, ServerError> {
    let db = state.db.lock().await;
    let questions = paginator(&state).page(&db.hot(), query.request())?;

    let ctx = base(&state, &db, viewer, "Hot Questions", "hot")?
        .with("quest_type", "hot")?
        .with("questions", questions)?
        .with("need_user_link", false)?;

    state.renderer.render("questions/index.html", &ctx)
}

pub async fn tag(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(name): Path<String>,
    query: PageQuery,
) -> Result<Response, ServerError> {
    let db = state.db.lock().await;
    let questions = paginator(&state).page(&db.by_tag(&name), query.request())?;

    let ctx = base(&state, &db, viewer, "Tag", "tag")?
        .with("chosen_tag", &name)?
        .with("questions", questions)?
        .with("need_user_link", true)?;

    state.renderer.render("questions/tags.html", &ctx)
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(nickname): Path<String>,
    query: PageQuery,
) -> Result<Response, ServerError> {
    let db = state.db.lock().await;
    let profile = db.get_profile_by_nickname(&nickname).map_err(|e| match e {
        StoreError::NotFound => ServerError::ProfileNotFound(nickname.clone()),
        other => other.into(),
    })?;
    let questions = paginator(&state).page(&db.by_user(profile.id), query.request())?;

    let ctx = base(&state, &db, viewer, "Profile", "user_profile")?
        .with("user", &profile)?
        .with("questions", questions)?
        .with("need_user_link", true)?;

    state.renderer.render("questions/profile.html", &ctx)
}

// ---------------------------------------------------------------------------
// Single question
// ---------------------------------------------------------------------------

pub async fn question(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(raw_id): Path<String>,
    query: PageQuery,
) -> Result<Response, ServerError> {
    // Route ids are integers; anything else cannot name a question.
    let id: QuestionId = raw_id.parse().map_err(|_| {
        debug!(id = %raw_id, "non-numeric question id");
        ServerError::QuestionNotFound(raw_id.clone())
    })?;

    let db = state.db.lock().await;
    let cur_question = db.question_summary(id).map_err(|e| match e {
        StoreError::NotFound => ServerError::QuestionNotFound(raw_id.clone()),
        other => other.into(),
    })?;
    let answers = paginator(&state).page(&db.answers_for_question(id), query.request())?;

    let ctx = base(&state, &db, viewer, "Question", "conc_question")?
        .with("cur_question", &cur_question)?
        .with("answers", answers)?
        .with("need_user_link", true)?;

    state.renderer.render("questions/question.html", &ctx)
}

// ---------------------------------------------------------------------------
// Static pages
// ---------------------------------------------------------------------------

async fn static_page(
    state: &AppState,
    viewer: Viewer,
    template: &str,
    title: &str,
    url_name: &str,
) -> Result<Response, ServerError> {
    let db = state.db.lock().await;
    let ctx = base(state, &db, viewer, title, url_name)?;
    state.renderer.render(template, &ctx)
}

pub async fn ask(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Result<Response, ServerError> {
    static_page(&state, viewer, "questions/ask.html", "Ask", "ask").await
}

pub async fn signup(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Result<Response, ServerError> {
    static_page(&state, viewer, "questions/signup.html", "Sign Up", "signup").await
}

pub async fn login(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Result<Response, ServerError> {
    static_page(&state, viewer, "questions/login.html", "Log In", "login").await
}

pub async fn settings(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Result<Response, ServerError> {
    static_page(&state, viewer, "questions/settings.html", "Settings", "settings").await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(uri: &str) -> PageRequest {
        PageQuery::from_uri(&uri.parse::<Uri>().unwrap()).request()
    }

    #[test]
    fn test_last_page_value_wins() {
        assert_eq!(page_of("/?page=1&page=2"), PageRequest::parse(Some("2")));
        assert_eq!(page_of("/?page=3&in=true&page=abc"), PageRequest::default());
    }

    #[test]
    fn test_missing_or_odd_query_is_first_page() {
        assert_eq!(page_of("/"), PageRequest::default());
        assert_eq!(page_of("/?page"), PageRequest::default());
        assert_eq!(page_of("/?page&&=&x=1"), PageRequest::default());
    }
}
