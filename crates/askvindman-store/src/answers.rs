//! CRUD operations for [`Answer`] records and the per-question answer listing.

use askvindman_shared::pagination::PageSource;
use askvindman_shared::types::{AnswerId, ProfileId, QuestionId};
use rusqlite::params;

use crate::codec::{decode_ts, encode_ts, now};
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Answer, AnswerEntry, NewAnswer};

/// Answers of one question, newest first.
pub struct AnswerListing<'db> {
    db: &'db Database,
    question_id: QuestionId,
}

impl AnswerListing<'_> {
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.db.conn().query_row(
            "SELECT COUNT(*) FROM answers WHERE question_id = ?1",
            params![self.question_id.0],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub fn fetch(&self, offset: usize, limit: usize) -> Result<Vec<AnswerEntry>> {
        self.select(limit as i64, offset as i64)
    }

    pub fn all(&self) -> Result<Vec<AnswerEntry>> {
        self.select(-1, 0)
    }

    fn select(&self, limit: i64, offset: i64) -> Result<Vec<AnswerEntry>> {
        let mut stmt = self.db.conn().prepare_cached(
            "SELECT a.id, a.text, a.is_correct, a.rating, a.profile_id, a.question_id,
                    a.created_at, a.updated_at, p.nickname
             FROM answers a
             JOIN profiles p ON p.id = a.profile_id
             WHERE a.question_id = ?1
             ORDER BY a.created_at DESC, a.id DESC
             LIMIT ?2 OFFSET ?3",
        )?;

        let rows = stmt.query_map(params![self.question_id.0, limit, offset], |row| {
            Ok(AnswerEntry {
                answer: row_to_answer(row)?,
                author: row.get(8)?,
            })
        })?;

        let mut answers = Vec::new();
        for row in rows {
            answers.push(row?);
        }
        Ok(answers)
    }
}

impl PageSource for AnswerListing<'_> {
    type Item = AnswerEntry;
    type Error = StoreError;

    fn total(&self) -> Result<usize> {
        self.count()
    }

    fn slice(&self, offset: usize, limit: usize) -> Result<Vec<AnswerEntry>> {
        self.fetch(offset, limit)
    }
}

impl Database {
    pub fn create_answer(&self, new: &NewAnswer) -> Result<Answer> {
        let ts = now();
        self.conn()
            .prepare_cached(
                "INSERT INTO answers (text, is_correct, rating, profile_id, question_id, created_at, updated_at)
                 VALUES (?1, ?2, 0, ?3, ?4, ?5, ?5)",
            )?
            .execute(params![
                new.text,
                new.is_correct,
                new.profile_id.0,
                new.question_id.0,
                encode_ts(&ts),
            ])
            .map_err(|e| StoreError::from_constraint(e, StoreError::Conflict("answer")))?;

        Ok(Answer {
            id: AnswerId(self.conn().last_insert_rowid()),
            text: new.text.clone(),
            is_correct: new.is_correct,
            rating: 0,
            profile_id: new.profile_id,
            question_id: new.question_id,
            created_at: ts,
            updated_at: ts,
        })
    }

    pub fn get_answer(&self, id: AnswerId) -> Result<Answer> {
        self.conn()
            .query_row(
                "SELECT id, text, is_correct, rating, profile_id, question_id, created_at, updated_at
                 FROM answers WHERE id = ?1",
                params![id.0],
                row_to_answer,
            )
            .map_err(StoreError::from_lookup)
    }

    /// Answers of `question`, newest first.
    pub fn answers_for_question(&self, question: QuestionId) -> AnswerListing<'_> {
        AnswerListing {
            db: self,
            question_id: question,
        }
    }
}

fn row_to_answer(row: &rusqlite::Row<'_>) -> rusqlite::Result<Answer> {
    let created_str: String = row.get(6)?;
    let updated_str: String = row.get(7)?;

    Ok(Answer {
        id: AnswerId(row.get(0)?),
        text: row.get(1)?,
        is_correct: row.get(2)?,
        rating: row.get(3)?,
        profile_id: ProfileId(row.get(4)?),
        question_id: QuestionId(row.get(5)?),
        created_at: decode_ts(6, &created_str)?,
        updated_at: decode_ts(7, &updated_str)?,
    })
}
