use rusqlite::Connection;

const UP_SQL: &str = r#"
-- Votes on questions, one per (profile, question)
CREATE TABLE IF NOT EXISTS question_likes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    value       INTEGER NOT NULL CHECK (value IN (1, -1)),
    profile_id  INTEGER NOT NULL,              -- FK -> profiles(id)
    question_id INTEGER NOT NULL,              -- FK -> questions(id)
    created_at  TEXT NOT NULL,

    FOREIGN KEY (profile_id)  REFERENCES profiles(id)  ON DELETE CASCADE,
    FOREIGN KEY (question_id) REFERENCES questions(id) ON DELETE CASCADE
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_question_likes_unique
    ON question_likes(profile_id, question_id);
CREATE INDEX IF NOT EXISTS idx_question_likes_question ON question_likes(question_id);

-- Votes on answers, one per (profile, answer)
CREATE TABLE IF NOT EXISTS answer_likes (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    value      INTEGER NOT NULL CHECK (value IN (1, -1)),
    profile_id INTEGER NOT NULL,               -- FK -> profiles(id)
    answer_id  INTEGER NOT NULL,               -- FK -> answers(id)
    created_at TEXT NOT NULL,

    FOREIGN KEY (profile_id) REFERENCES profiles(id) ON DELETE CASCADE,
    FOREIGN KEY (answer_id)  REFERENCES answers(id)  ON DELETE CASCADE
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_answer_likes_unique
    ON answer_likes(profile_id, answer_id);
CREATE INDEX IF NOT EXISTS idx_answer_likes_answer ON answer_likes(answer_id);
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
