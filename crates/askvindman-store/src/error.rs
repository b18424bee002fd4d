use askvindman_shared::error::ValidationError;
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A lookup matched no row, or a write referenced a row that does not exist.
    #[error("Record not found")]
    NotFound,

    /// A unique column (username, nickname, tag name) already holds this value.
    #[error("{0} already exists")]
    Conflict(&'static str),

    /// The profile has already voted on this question or answer.
    #[error("Like already recorded for this profile")]
    DuplicateLike,

    /// Input rejected before touching the database.
    #[error("Invalid input: {0}")]
    Invalid(#[from] ValidationError),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Password hashing failure.
    #[error("Password hash error: {0}")]
    PasswordHash(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Translate constraint failures into domain errors.
    ///
    /// `unique` names the conflicting field for UNIQUE violations. Foreign key
    /// failures mean the referenced row is gone and map to [`StoreError::NotFound`].
    pub(crate) fn from_constraint(err: rusqlite::Error, unique: StoreError) -> StoreError {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                unique
            }
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                StoreError::NotFound
            }
            _ => StoreError::Sqlite(err),
        }
    }

    /// Map `QueryReturnedNoRows` to [`StoreError::NotFound`].
    pub(crate) fn from_lookup(err: rusqlite::Error) -> StoreError {
        match err {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            other => StoreError::Sqlite(other),
        }
    }
}
