//! # askvindman-store
//!
//! SQLite-backed storage for the AskVindman Q&A site.
//!
//! The crate exposes a synchronous `Database` handle that wraps a
//! `rusqlite::Connection`, runs the embedded migrations on open, and provides
//! typed helpers for every domain model plus the read-side listings used by
//! the pages: recent and hot questions, questions by tag or author, answers
//! of a question, popular profiles and popular tags.

pub mod answers;
pub mod database;
pub mod likes;
pub mod migrations;
pub mod models;
pub mod questions;
pub mod seed;
pub mod tags;
pub mod users;

mod codec;
mod error;

pub use answers::AnswerListing;
pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
pub use questions::{QuestionFilter, QuestionListing, QuestionOrder};
pub use seed::FillReport;

#[cfg(test)]
mod testing;
