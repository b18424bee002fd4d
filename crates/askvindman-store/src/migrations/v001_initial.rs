//! v001 -- Initial schema creation.
//!
//! Creates the content tables: `users`, `profiles`, `questions`, `answers`,
//! `tags` and the `question_tags` link.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users (accounts)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL,
    first_name    TEXT NOT NULL DEFAULT '',
    last_name     TEXT NOT NULL DEFAULT '',
    password_hash TEXT NOT NULL,               -- Argon2 PHC string
    created_at    TEXT NOT NULL                -- RFC-3339, microseconds, UTC
);

-- ----------------------------------------------------------------
-- Profiles (one per user)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS profiles (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id  INTEGER NOT NULL UNIQUE,
    nickname TEXT NOT NULL UNIQUE,             -- public URL key
    avatar   TEXT,
    about    TEXT NOT NULL DEFAULT '',

    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

-- ----------------------------------------------------------------
-- Questions
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS questions (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    title      TEXT NOT NULL,
    text       TEXT NOT NULL,
    rating     INTEGER NOT NULL DEFAULT 0,     -- sum of question_likes.value
    profile_id INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,

    FOREIGN KEY (profile_id) REFERENCES profiles(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_questions_created ON questions(created_at DESC, id DESC);
CREATE INDEX IF NOT EXISTS idx_questions_profile ON questions(profile_id);

-- ----------------------------------------------------------------
-- Answers
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS answers (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    text        TEXT NOT NULL,
    is_correct  INTEGER NOT NULL DEFAULT 0,    -- boolean 0/1
    rating      INTEGER NOT NULL DEFAULT 0,    -- sum of answer_likes.value
    profile_id  INTEGER NOT NULL,
    question_id INTEGER NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,

    FOREIGN KEY (profile_id)  REFERENCES profiles(id)  ON DELETE CASCADE,
    FOREIGN KEY (question_id) REFERENCES questions(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_answers_question_ts
    ON answers(question_id, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_answers_profile ON answers(profile_id);

-- ----------------------------------------------------------------
-- Tags
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS tags (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

-- ----------------------------------------------------------------
-- Question <-> Tag link, both sides mandatory
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS question_tags (
    question_id INTEGER NOT NULL,
    tag_id      INTEGER NOT NULL,

    PRIMARY KEY (question_id, tag_id),
    FOREIGN KEY (question_id) REFERENCES questions(id) ON DELETE CASCADE,
    FOREIGN KEY (tag_id)      REFERENCES tags(id)      ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_question_tags_tag ON question_tags(tag_id);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
