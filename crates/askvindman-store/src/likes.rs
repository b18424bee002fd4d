//! Likes and dislikes on questions and answers.
//!
//! A profile votes at most once per target. `rating` on the target is kept
//! equal to the sum of its vote values: every write path here recomputes it.
//!
//! Two insert modes exist. The single-vote calls are strict and report a
//! repeated vote as [`StoreError::DuplicateLike`]. The bulk calls skip
//! repeated votes silently and report how many rows were actually written.

use std::collections::BTreeSet;

use askvindman_shared::types::{AnswerId, LikeValue, ProfileId, QuestionId};
use rusqlite::params;

use crate::codec::{conversion_error, decode_ts, encode_ts, now};
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{AnswerLike, NewAnswerLike, NewQuestionLike, QuestionLike};

impl Database {
    // ------------------------------------------------------------------
    // Questions
    // ------------------------------------------------------------------

    pub fn like_question(&self, like: &NewQuestionLike) -> Result<QuestionLike> {
        let created_at = now();
        self.in_transaction(|db| {
            db.conn()
                .prepare_cached(
                    "INSERT INTO question_likes (value, profile_id, question_id, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                )?
                .execute(params![
                    like.value.as_i64(),
                    like.profile_id.0,
                    like.question_id.0,
                    encode_ts(&created_at),
                ])
                .map_err(|e| StoreError::from_constraint(e, StoreError::DuplicateLike))?;
            db.refresh_question_rating(like.question_id)
        })?;

        Ok(QuestionLike {
            profile_id: like.profile_id,
            question_id: like.question_id,
            value: like.value,
            created_at,
        })
    }

    /// Insert many votes, skipping any (profile, question) pair that already
    /// voted. Returns the number of rows written.
    pub fn bulk_question_likes(&self, likes: &[NewQuestionLike]) -> Result<usize> {
        let created_at = encode_ts(&now());
        self.in_transaction(|db| {
            let mut stmt = db.conn().prepare_cached(
                "INSERT OR IGNORE INTO question_likes (value, profile_id, question_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;

            let mut inserted = 0;
            let mut touched = BTreeSet::new();
            for like in likes {
                let n = stmt
                    .execute(params![
                        like.value.as_i64(),
                        like.profile_id.0,
                        like.question_id.0,
                        created_at,
                    ])
                    .map_err(|e| StoreError::from_constraint(e, StoreError::DuplicateLike))?;
                if n > 0 {
                    inserted += n;
                    touched.insert(like.question_id);
                }
            }

            drop(stmt);

            for question_id in touched {
                db.refresh_question_rating(question_id)?;
            }

            let skipped = likes.len() - inserted;
            if skipped > 0 {
                tracing::debug!(skipped, "dropped duplicate question likes");
            }
            Ok(inserted)
        })
    }

    /// Withdraw a vote. Returns `true` if one existed.
    pub fn remove_question_like(&self, profile_id: ProfileId, question_id: QuestionId) -> Result<bool> {
        self.in_transaction(|db| {
            let affected = db.conn().execute(
                "DELETE FROM question_likes WHERE profile_id = ?1 AND question_id = ?2",
                params![profile_id.0, question_id.0],
            )?;
            db.refresh_question_rating(question_id)?;
            Ok(affected > 0)
        })
    }

    pub fn question_likes(&self, question_id: QuestionId) -> Result<Vec<QuestionLike>> {
        let mut stmt = self.conn().prepare_cached(
            "SELECT profile_id, question_id, value, created_at
             FROM question_likes WHERE question_id = ?1 ORDER BY created_at ASC, id ASC",
        )?;

        let rows = stmt.query_map(params![question_id.0], |row| {
            let value: i64 = row.get(2)?;
            let ts_str: String = row.get(3)?;
            Ok(QuestionLike {
                profile_id: ProfileId(row.get(0)?),
                question_id: QuestionId(row.get(1)?),
                value: LikeValue::try_from(value).map_err(|e| conversion_error(2, e))?,
                created_at: decode_ts(3, &ts_str)?,
            })
        })?;

        let mut likes = Vec::new();
        for row in rows {
            likes.push(row?);
        }
        Ok(likes)
    }

    fn refresh_question_rating(&self, question_id: QuestionId) -> Result<()> {
        self.conn()
            .prepare_cached(
                "UPDATE questions
                 SET rating = COALESCE((SELECT SUM(value) FROM question_likes WHERE question_id = ?1), 0)
                 WHERE id = ?1",
            )?
            .execute(params![question_id.0])?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Answers
    // ------------------------------------------------------------------

    pub fn like_answer(&self, like: &NewAnswerLike) -> Result<AnswerLike> {
        let created_at = now();
        self.in_transaction(|db| {
            db.conn()
                .prepare_cached(
                    "INSERT INTO answer_likes (value, profile_id, answer_id, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                )?
                .execute(params![
                    like.value.as_i64(),
                    like.profile_id.0,
                    like.answer_id.0,
                    encode_ts(&created_at),
                ])
                .map_err(|e| StoreError::from_constraint(e, StoreError::DuplicateLike))?;
            db.refresh_answer_rating(like.answer_id)
        })?;

        Ok(AnswerLike {
            profile_id: like.profile_id,
            answer_id: like.answer_id,
            value: like.value,
            created_at,
        })
    }

    /// Answer counterpart of [`Database::bulk_question_likes`].
    pub fn bulk_answer_likes(&self, likes: &[NewAnswerLike]) -> Result<usize> {
        let created_at = encode_ts(&now());
        self.in_transaction(|db| {
            let mut stmt = db.conn().prepare_cached(
                "INSERT OR IGNORE INTO answer_likes (value, profile_id, answer_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;

            let mut inserted = 0;
            let mut touched = BTreeSet::new();
            for like in likes {
                let n = stmt
                    .execute(params![
                        like.value.as_i64(),
                        like.profile_id.0,
                        like.answer_id.0,
                        created_at,
                    ])
                    .map_err(|e| StoreError::from_constraint(e, StoreError::DuplicateLike))?;
                if n > 0 {
                    inserted += n;
                    touched.insert(like.answer_id);
                }
            }

            drop(stmt);

            for answer_id in touched {
                db.refresh_answer_rating(answer_id)?;
            }

            let skipped = likes.len() - inserted;
            if skipped > 0 {
                tracing::debug!(skipped, "dropped duplicate answer likes");
            }
            Ok(inserted)
        })
    }

    pub fn remove_answer_like(&self, profile_id: ProfileId, answer_id: AnswerId) -> Result<bool> {
        self.in_transaction(|db| {
            let affected = db.conn().execute(
                "DELETE FROM answer_likes WHERE profile_id = ?1 AND answer_id = ?2",
                params![profile_id.0, answer_id.0],
            )?;
            db.refresh_answer_rating(answer_id)?;
            Ok(affected > 0)
        })
    }

    pub fn answer_likes(&self, answer_id: AnswerId) -> Result<Vec<AnswerLike>> {
        let mut stmt = self.conn().prepare_cached(
            "SELECT profile_id, answer_id, value, created_at
             FROM answer_likes WHERE answer_id = ?1 ORDER BY created_at ASC, id ASC",
        )?;

        let rows = stmt.query_map(params![answer_id.0], |row| {
            let value: i64 = row.get(2)?;
            let ts_str: String = row.get(3)?;
            Ok(AnswerLike {
                profile_id: ProfileId(row.get(0)?),
                answer_id: AnswerId(row.get(1)?),
                value: LikeValue::try_from(value).map_err(|e| conversion_error(2, e))?,
                created_at: decode_ts(3, &ts_str)?,
            })
        })?;

        let mut likes = Vec::new();
        for row in rows {
            likes.push(row?);
        }
        Ok(likes)
    }

    fn refresh_answer_rating(&self, answer_id: AnswerId) -> Result<()> {
        self.conn()
            .prepare_cached(
                "UPDATE answers
                 SET rating = COALESCE((SELECT SUM(value) FROM answer_likes WHERE answer_id = ?1), 0)
                 WHERE id = ?1",
            )?
            .execute(params![answer_id.0])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{add_answer, add_profile, ask, question_like};

    #[test]
    fn test_second_like_is_rejected_in_strict_mode() {
        let db = Database::open_in_memory().unwrap();
        let alice = add_profile(&db, "alice");
        let bob = add_profile(&db, "bob");
        let q = ask(&db, &alice, "q");

        db.like_question(&question_like(&bob, &q, LikeValue::Like))
            .unwrap();
        let err = db
            .like_question(&question_like(&bob, &q, LikeValue::Dislike))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateLike));

        let likes = db.question_likes(q.id).unwrap();
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].value, LikeValue::Like);
        assert_eq!(db.get_question(q.id).unwrap().rating, 1);
    }

    #[test]
    fn test_bulk_likes_drop_duplicates_silently() {
        let db = Database::open_in_memory().unwrap();
        let alice = add_profile(&db, "alice");
        let bob = add_profile(&db, "bob");
        let carol = add_profile(&db, "carol");
        let q = ask(&db, &alice, "q");

        let inserted = db
            .bulk_question_likes(&[
                question_like(&bob, &q, LikeValue::Like),
                question_like(&bob, &q, LikeValue::Like),
                question_like(&carol, &q, LikeValue::Dislike),
                question_like(&alice, &q, LikeValue::Like),
            ])
            .unwrap();

        assert_eq!(inserted, 3);
        assert_eq!(db.question_likes(q.id).unwrap().len(), 3);
        assert_eq!(db.get_question(q.id).unwrap().rating, 1);

        // A later batch repeating an existing pair is skipped too.
        let inserted = db
            .bulk_question_likes(&[question_like(&carol, &q, LikeValue::Like)])
            .unwrap();
        assert_eq!(inserted, 0);
        assert_eq!(db.get_question(q.id).unwrap().rating, 1);
    }

    #[test]
    fn test_like_on_missing_question_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let alice = add_profile(&db, "alice");
        let err = db
            .like_question(&NewQuestionLike {
                profile_id: alice.id,
                question_id: QuestionId(404),
                value: LikeValue::Like,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn test_removing_like_recomputes_rating() {
        let db = Database::open_in_memory().unwrap();
        let alice = add_profile(&db, "alice");
        let bob = add_profile(&db, "bob");
        let q = ask(&db, &alice, "q");

        db.like_question(&question_like(&bob, &q, LikeValue::Dislike))
            .unwrap();
        assert_eq!(db.get_question(q.id).unwrap().rating, -1);

        assert!(db.remove_question_like(bob.id, q.id).unwrap());
        assert!(!db.remove_question_like(bob.id, q.id).unwrap());
        assert_eq!(db.get_question(q.id).unwrap().rating, 0);
    }

    #[test]
    fn test_answer_likes() {
        let db = Database::open_in_memory().unwrap();
        let alice = add_profile(&db, "alice");
        let bob = add_profile(&db, "bob");
        let q = ask(&db, &alice, "q");
        let a = add_answer(&db, &bob, &q);

        let vote = |profile: &crate::models::Profile, value| NewAnswerLike {
            profile_id: profile.id,
            answer_id: a.id,
            value,
        };

        db.like_answer(&vote(&alice, LikeValue::Like)).unwrap();
        assert!(matches!(
            db.like_answer(&vote(&alice, LikeValue::Like)),
            Err(StoreError::DuplicateLike)
        ));
        assert_eq!(
            db.bulk_answer_likes(&[vote(&alice, LikeValue::Dislike), vote(&bob, LikeValue::Like)])
                .unwrap(),
            1
        );
        assert_eq!(db.get_answer(a.id).unwrap().rating, 2);
        assert_eq!(db.answer_likes(a.id).unwrap().len(), 2);

        assert!(db.remove_answer_like(alice.id, a.id).unwrap());
        assert_eq!(db.get_answer(a.id).unwrap().rating, 1);
    }
}
