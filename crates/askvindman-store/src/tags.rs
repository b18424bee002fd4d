use askvindman_shared::constants::MAX_TAG_NAME_LEN;
use askvindman_shared::error::{check_len, ValidationError};
use askvindman_shared::types::{QuestionId, TagId};
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{PopularTag, Tag};

impl Database {
    pub fn create_tag(&self, name: &str) -> Result<Tag> {
        check_len("tag name", name, MAX_TAG_NAME_LEN, |len, max| {
            ValidationError::TagNameTooLong { len, max }
        })?;

        self.conn()
            .prepare_cached("INSERT INTO tags (name) VALUES (?1)")?
            .execute(params![name])
            .map_err(|e| StoreError::from_constraint(e, StoreError::Conflict("tag")))?;

        Ok(Tag {
            id: TagId(self.conn().last_insert_rowid()),
            name: name.to_string(),
        })
    }

    pub fn get_tag_by_name(&self, name: &str) -> Result<Tag> {
        self.conn()
            .query_row(
                "SELECT id, name FROM tags WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Tag {
                        id: TagId(row.get(0)?),
                        name: row.get(1)?,
                    })
                },
            )
            .map_err(StoreError::from_lookup)
    }

    /// Link a tag to a question. Returns `false` if the link already existed.
    pub fn tag_question(&self, question_id: QuestionId, tag_id: TagId) -> Result<bool> {
        let inserted = self
            .conn()
            .prepare_cached("INSERT OR IGNORE INTO question_tags (question_id, tag_id) VALUES (?1, ?2)")?
            .execute(params![question_id.0, tag_id.0])
            .map_err(|e| StoreError::from_constraint(e, StoreError::Conflict("question tag")))?;
        Ok(inserted > 0)
    }

    pub fn tags_for_question(&self, question_id: QuestionId) -> Result<Vec<Tag>> {
        Ok(self
            .tags_for_questions(&[question_id])?
            .remove(&question_id)
            .unwrap_or_default())
    }

    /// Tags ordered by the number of distinct questions carrying them.
    pub fn popular_tags(&self, limit: usize) -> Result<Vec<PopularTag>> {
        let mut stmt = self.conn().prepare_cached(
            "SELECT t.id, t.name,
                    (SELECT COUNT(DISTINCT qt.question_id)
                       FROM question_tags qt
                      WHERE qt.tag_id = t.id) AS questions_count
             FROM tags t
             ORDER BY questions_count DESC, t.id ASC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(PopularTag {
                tag: Tag {
                    id: TagId(row.get(0)?),
                    name: row.get(1)?,
                },
                questions_count: row.get(2)?,
            })
        })?;

        let mut tags = Vec::new();
        for row in rows {
            tags.push(row?);
        }
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{add_profile, add_tag, ask};

    #[test]
    fn test_popular_tags_by_question_count() {
        let db = Database::open_in_memory().unwrap();
        let p = add_profile(&db, "p");
        let rust = add_tag(&db, "rust");
        let sql = add_tag(&db, "sql");
        let unused = add_tag(&db, "unused");

        let q1 = ask(&db, &p, "one");
        let q2 = ask(&db, &p, "two");
        db.tag_question(q1.id, sql.id).unwrap();
        db.tag_question(q2.id, sql.id).unwrap();
        db.tag_question(q2.id, rust.id).unwrap();

        let popular = db.popular_tags(30).unwrap();
        let ranked: Vec<(&str, i64)> = popular
            .iter()
            .map(|t| (t.tag.name.as_str(), t.questions_count))
            .collect();
        assert_eq!(ranked, vec![("sql", 2), ("rust", 1), ("unused", 0)]);
        assert_eq!(popular[2].tag, unused);

        assert_eq!(db.popular_tags(2).unwrap().len(), 2);
    }

    #[test]
    fn test_link_is_idempotent_and_checked() {
        let db = Database::open_in_memory().unwrap();
        let p = add_profile(&db, "p");
        let tag = add_tag(&db, "rust");
        let q = ask(&db, &p, "q");

        assert!(db.tag_question(q.id, tag.id).unwrap());
        assert!(!db.tag_question(q.id, tag.id).unwrap());
        assert_eq!(db.tags_for_question(q.id).unwrap(), vec![tag.clone()]);

        assert!(matches!(
            db.tag_question(q.id, TagId(999)),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            db.tag_question(QuestionId(999), tag.id),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_tag_names_are_unique_and_bounded() {
        let db = Database::open_in_memory().unwrap();
        add_tag(&db, "rust");
        assert!(matches!(db.create_tag("rust"), Err(StoreError::Conflict("tag"))));
        assert!(matches!(
            db.create_tag(&"x".repeat(MAX_TAG_NAME_LEN + 1)),
            Err(StoreError::Invalid(ValidationError::TagNameTooLong { .. }))
        ));
        assert_eq!(db.get_tag_by_name("rust").unwrap().name, "rust");
        assert!(matches!(db.get_tag_by_name("go"), Err(StoreError::NotFound)));
    }
}
