//! # askvindman-server
//!
//! Question-and-answer site backend.
//!
//! This binary provides:
//! - **HTTP pages** (axum) for the recent/hot feeds, single questions, tag
//!   and profile listings, and the static ask/signup/login/settings pages
//! - **`fill-db`** to populate the database with generated content for
//!   local development

mod api;
mod config;
mod context;
mod error;
mod pages;
mod render;
mod viewer;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use askvindman_store::Database;

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::render::JsonRenderer;

#[derive(Parser)]
#[command(name = "askvindman-server", version, about = "AskVindman Q&A server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Populate the database with generated users, questions, answers and likes.
    FillDb {
        /// Scale factor: RATIO users and tags, 10x questions, 100x answers, 200x likes.
        ratio: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,askvindman_server=debug")),
        )
        .init();

    let cli = Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Load configuration and open the database
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    let db = match &config.database_path {
        Some(path) => Database::open_at(path)?,
        None => Database::new()?,
    };
    info!(path = ?db.path(), "Opened database");

    match cli.command.unwrap_or(Command::Serve) {
        Command::FillDb { ratio } => {
            let report = db.fill(ratio, &mut rand::thread_rng())?;
            info!(?report, "Fill complete");
        }
        Command::Serve => {
            info!("Starting AskVindman server v{}", env!("CARGO_PKG_VERSION"));
            let http_addr = config.http_addr;
            let state = AppState::new(db, JsonRenderer, config);

            // -----------------------------------------------------------------
            // 3. Run the HTTP server until it fails or Ctrl+C arrives
            // -----------------------------------------------------------------
            tokio::select! {
                result = api::serve(state, http_addr) => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "HTTP server failed");
                        return Err(e);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received Ctrl+C, shutting down");
                }
            }
        }
    }

    Ok(())
}
