use std::sync::Arc;

use askvindman_store::Database;
use axum::{middleware, routing::get, Router};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::pages;
use crate::render::Renderer;
use crate::viewer::viewer_middleware;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub renderer: Arc<dyn Renderer>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, renderer: impl Renderer + 'static, config: ServerConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            renderer: Arc::new(renderer),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/hot/", get(pages::hot))
        .route("/question/{id}/", get(pages::question))
        .route("/ask/", get(pages::ask))
        .route("/tag/{name}/", get(pages::tag))
        .route("/profile/{user}/", get(pages::profile))
        .route("/signup/", get(pages::signup))
        .route("/login/", get(pages::login))
        .route("/settings/", get(pages::settings))
        .fallback(not_found)
        .layer(middleware::from_fn(viewer_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> ServerError {
    ServerError::PageNotFound
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
