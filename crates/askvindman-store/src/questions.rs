//! Questions: creation, lookup and the listing queries behind the home, hot,
//! tag and profile pages.
//!
//! Listings are lazy. [`QuestionListing`] only describes *which* questions and
//! in *what order*; rows are read when the caller asks for a count or a
//! slice. Every fetched row is annotated with its answer count and author
//! nickname in the same statement, and the tags of a whole slice are loaded
//! with one extra query.

use std::collections::HashMap;

use askvindman_shared::constants::MAX_TITLE_LEN;
use askvindman_shared::error::{check_len, ValidationError};
use askvindman_shared::pagination::PageSource;
use askvindman_shared::types::{ProfileId, QuestionId, TagId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};

use crate::codec::{decode_ts, encode_ts, now};
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{NewQuestion, Question, QuestionSummary, Tag};

/// SQLite's default bound-parameter limit is far above this; chunking keeps
/// `all()` on large tables safe anyway.
const TAG_BATCH: usize = 500;

const SUMMARY_COLUMNS: &str = "
    SELECT q.id, q.title, q.text, q.rating, q.profile_id, q.created_at, q.updated_at,
           p.nickname,
           (SELECT COUNT(*) FROM answers a WHERE a.question_id = q.id) AS answer_count
    FROM questions q
    JOIN profiles p ON p.id = q.profile_id";

/// Which questions a listing contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionFilter {
    All,
    /// Questions linked to a tag with exactly this name (case-sensitive).
    Tag(String),
    /// Questions authored by this profile.
    Author(ProfileId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOrder {
    /// Newest first; equal timestamps resolve to the later insert.
    Recent,
    /// Most answers first; equal counts resolve to the later insert.
    Hot,
}

impl QuestionFilter {
    fn where_clause(&self) -> (&'static str, Vec<Value>) {
        match self {
            QuestionFilter::All => ("", Vec::new()),
            QuestionFilter::Tag(name) => (
                " WHERE EXISTS (SELECT 1 FROM question_tags qt
                                 JOIN tags t ON t.id = qt.tag_id
                                WHERE qt.question_id = q.id AND t.name = ?)",
                vec![Value::Text(name.clone())],
            ),
            QuestionFilter::Author(profile) => {
                (" WHERE q.profile_id = ?", vec![Value::Integer(profile.0)])
            }
        }
    }
}

impl QuestionOrder {
    fn order_clause(self) -> &'static str {
        match self {
            QuestionOrder::Recent => " ORDER BY q.created_at DESC, q.id DESC",
            QuestionOrder::Hot => " ORDER BY answer_count DESC, q.id DESC",
        }
    }
}

/// A filtered, ordered view over the questions table.
pub struct QuestionListing<'db> {
    db: &'db Database,
    filter: QuestionFilter,
    order: QuestionOrder,
}

impl<'db> QuestionListing<'db> {
    pub fn new(db: &'db Database, filter: QuestionFilter, order: QuestionOrder) -> Self {
        Self { db, filter, order }
    }

    /// Number of questions in the listing.
    pub fn count(&self) -> Result<usize> {
        let (where_sql, params) = self.filter.where_clause();
        let sql = format!("SELECT COUNT(*) FROM questions q{where_sql}");
        let count: i64 = self
            .db
            .conn()
            .prepare_cached(&sql)?
            .query_row(params_from_iter(params), |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Up to `limit` questions starting at position `offset`.
    pub fn fetch(&self, offset: usize, limit: usize) -> Result<Vec<QuestionSummary>> {
        self.select(Some(limit as i64), offset as i64)
    }

    /// Every question in the listing.
    pub fn all(&self) -> Result<Vec<QuestionSummary>> {
        self.select(None, 0)
    }

    fn select(&self, limit: Option<i64>, offset: i64) -> Result<Vec<QuestionSummary>> {
        let (where_sql, mut params) = self.filter.where_clause();
        let sql = format!(
            "{SUMMARY_COLUMNS}{where_sql}{} LIMIT ? OFFSET ?",
            self.order.order_clause()
        );
        // LIMIT -1 means no limit in SQLite.
        params.push(Value::Integer(limit.unwrap_or(-1)));
        params.push(Value::Integer(offset));
        self.db.select_summaries(&sql, params)
    }
}

impl PageSource for QuestionListing<'_> {
    type Item = QuestionSummary;
    type Error = StoreError;

    fn total(&self) -> Result<usize> {
        self.count()
    }

    fn slice(&self, offset: usize, limit: usize) -> Result<Vec<QuestionSummary>> {
        self.fetch(offset, limit)
    }
}

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    pub fn create_question(&self, new: &NewQuestion) -> Result<Question> {
        check_len("title", &new.title, MAX_TITLE_LEN, |len, max| {
            ValidationError::TitleTooLong { len, max }
        })?;

        let ts = now();
        self.conn()
            .prepare_cached(
                "INSERT INTO questions (title, text, rating, profile_id, created_at, updated_at)
                 VALUES (?1, ?2, 0, ?3, ?4, ?4)",
            )?
            .execute(params![new.title, new.text, new.profile_id.0, encode_ts(&ts)])
            .map_err(|e| StoreError::from_constraint(e, StoreError::Conflict("question")))?;

        Ok(Question {
            id: QuestionId(self.conn().last_insert_rowid()),
            title: new.title.clone(),
            text: new.text.clone(),
            rating: 0,
            profile_id: new.profile_id,
            created_at: ts,
            updated_at: ts,
        })
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_question(&self, id: QuestionId) -> Result<Question> {
        self.conn()
            .query_row(
                "SELECT id, title, text, rating, profile_id, created_at, updated_at
                 FROM questions WHERE id = ?1",
                params![id.0],
                row_to_question,
            )
            .map_err(StoreError::from_lookup)
    }

    /// A single question with the same annotations as listing rows.
    pub fn question_summary(&self, id: QuestionId) -> Result<QuestionSummary> {
        let sql = format!("{SUMMARY_COLUMNS} WHERE q.id = ?");
        self.select_summaries(&sql, vec![Value::Integer(id.0)])?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    /// All questions, newest first.
    pub fn recent(&self) -> QuestionListing<'_> {
        QuestionListing::new(self, QuestionFilter::All, QuestionOrder::Recent)
    }

    /// All questions, most answered first.
    pub fn hot(&self) -> QuestionListing<'_> {
        QuestionListing::new(self, QuestionFilter::All, QuestionOrder::Hot)
    }

    /// Questions carrying the tag `name`, newest first. Each question appears
    /// once however many matching links it has.
    pub fn by_tag(&self, name: &str) -> QuestionListing<'_> {
        QuestionListing::new(
            self,
            QuestionFilter::Tag(name.to_string()),
            QuestionOrder::Recent,
        )
    }

    /// Questions authored by `profile`, newest first.
    pub fn by_user(&self, profile: ProfileId) -> QuestionListing<'_> {
        QuestionListing::new(self, QuestionFilter::Author(profile), QuestionOrder::Recent)
    }

    /// Tags linked to each of `ids`, ordered by name. One query per
    /// [`TAG_BATCH`] ids.
    pub fn tags_for_questions(&self, ids: &[QuestionId]) -> Result<HashMap<QuestionId, Vec<Tag>>> {
        let mut map: HashMap<QuestionId, Vec<Tag>> = HashMap::new();

        for chunk in ids.chunks(TAG_BATCH) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT qt.question_id, t.id, t.name
                 FROM question_tags qt
                 JOIN tags t ON t.id = qt.tag_id
                 WHERE qt.question_id IN ({placeholders})
                 ORDER BY t.name ASC, t.id ASC"
            );

            let mut stmt = self.conn().prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter().map(|id| id.0)), |row| {
                Ok((
                    QuestionId(row.get(0)?),
                    Tag {
                        id: TagId(row.get(1)?),
                        name: row.get(2)?,
                    },
                ))
            })?;

            for row in rows {
                let (question_id, tag) = row?;
                map.entry(question_id).or_default().push(tag);
            }
        }

        Ok(map)
    }

    /// Run a `SUMMARY_COLUMNS` query and attach tags to the result.
    fn select_summaries(&self, sql: &str, params: Vec<Value>) -> Result<Vec<QuestionSummary>> {
        let mut stmt = self.conn().prepare_cached(sql)?;
        let rows = stmt.query_map(params_from_iter(params), |row| {
            Ok(QuestionSummary {
                question: row_to_question(row)?,
                author: row.get(7)?,
                answer_count: row.get(8)?,
                tags: Vec::new(),
            })
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }

        let ids: Vec<QuestionId> = summaries.iter().map(|s| s.question.id).collect();
        let mut tags = self.tags_for_questions(&ids)?;
        for summary in &mut summaries {
            summary.tags = tags.remove(&summary.question.id).unwrap_or_default();
        }

        Ok(summaries)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map the first seven columns of a row to a [`Question`].
fn row_to_question(row: &rusqlite::Row<'_>) -> rusqlite::Result<Question> {
    let created_str: String = row.get(5)?;
    let updated_str: String = row.get(6)?;

    Ok(Question {
        id: QuestionId(row.get(0)?),
        title: row.get(1)?,
        text: row.get(2)?,
        rating: row.get(3)?,
        profile_id: ProfileId(row.get(4)?),
        created_at: decode_ts(5, &created_str)?,
        updated_at: decode_ts(6, &updated_str)?,
    })
}
