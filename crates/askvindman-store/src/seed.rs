//! Synthetic data for local development and load testing.
//!
//! [`Database::fill`] creates, for a ratio `r`: `r` users with profiles, `r`
//! tags, `10r` questions (each linked to 1..=5 tags), `100r` answers and up
//! to `200r` likes split evenly between questions and answers. Everything
//! happens inside one transaction.

use std::collections::HashSet;

use askvindman_shared::constants::{MAX_NICKNAME_LEN, MAX_TAG_NAME_LEN, MAX_TITLE_LEN};
use askvindman_shared::types::LikeValue;
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::database::Database;
use crate::error::Result;
use crate::models::{
    Answer, NewAnswer, NewAnswerLike, NewProfile, NewQuestion, NewQuestionLike, NewUser, Profile,
    Question, Tag,
};
use crate::users::hash_password;

/// Password given to every generated account.
pub const FILL_PASSWORD: &str = "password123";

const MAX_TAGS_PER_QUESTION: usize = 5;
const MAX_QUESTION_TEXT: usize = 1000;
const MAX_ANSWER_TEXT: usize = 500;

/// Share of generated votes that are likes rather than dislikes.
const LIKE_PROBABILITY: f64 = 0.7;

/// How many rows [`Database::fill`] wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillReport {
    pub users: usize,
    pub tags: usize,
    pub questions: usize,
    pub question_tags: usize,
    pub answers: usize,
    pub question_likes: usize,
    pub answer_likes: usize,
}

impl Database {
    /// Populate the database with `ratio`-scaled random content.
    pub fn fill<R: Rng>(&self, ratio: usize, rng: &mut R) -> Result<FillReport> {
        info!(ratio, "starting database fill");

        // One hash for every account; Argon2 is deliberately slow.
        let password_hash = hash_password(FILL_PASSWORD)?;

        let report = self.in_transaction(|db| {
            let mut report = FillReport::default();

            info!("creating users and profiles");
            let profiles = db.fill_profiles(ratio, &password_hash, rng)?;
            report.users = profiles.len();

            info!("creating tags");
            let tags = db.fill_tags(ratio, rng)?;
            report.tags = tags.len();

            info!("creating questions");
            let questions = db.fill_questions(ratio * 10, &profiles, rng)?;
            report.questions = questions.len();

            info!("linking questions and tags");
            report.question_tags = db.fill_question_tags(&questions, &tags, rng)?;

            info!("creating answers");
            let answers = db.fill_answers(ratio * 100, &profiles, &questions, rng)?;
            report.answers = answers.len();

            info!("creating likes");
            let (question_likes, answer_likes) =
                db.fill_likes(ratio * 200, &profiles, &questions, &answers, rng)?;
            report.question_likes = question_likes;
            report.answer_likes = answer_likes;

            Ok(report)
        })?;

        info!(
            users = report.users,
            tags = report.tags,
            questions = report.questions,
            question_tags = report.question_tags,
            answers = report.answers,
            question_likes = report.question_likes,
            answer_likes = report.answer_likes,
            "database filled"
        );

        Ok(report)
    }

    fn fill_profiles<R: Rng>(
        &self,
        count: usize,
        password_hash: &str,
        rng: &mut R,
    ) -> Result<Vec<Profile>> {
        let mut profiles = Vec::with_capacity(count);
        for i in 0..count {
            // The index suffix keeps usernames and nicknames unique.
            let username: String = Username().fake_with_rng(rng);
            let user = self.insert_user_with_hash(
                &NewUser {
                    username: format!("{username}_{i}"),
                    email: SafeEmail().fake_with_rng(rng),
                    first_name: FirstName().fake_with_rng(rng),
                    last_name: LastName().fake_with_rng(rng),
                    password: String::new(),
                },
                password_hash,
            )?;

            let nickname: String = Username().fake_with_rng(rng);
            let about = if rng.gen_bool(0.5) {
                Paragraph(2..5).fake_with_rng(rng)
            } else {
                String::new()
            };

            profiles.push(self.create_profile(&NewProfile {
                user_id: user.id,
                nickname: truncate(&format!("{nickname}_{i}"), MAX_NICKNAME_LEN),
                avatar: None,
                about,
            })?);
        }
        Ok(profiles)
    }

    fn fill_tags<R: Rng>(&self, count: usize, rng: &mut R) -> Result<Vec<Tag>> {
        let mut tags = Vec::with_capacity(count);
        for i in 0..count {
            let word: String = Word().fake_with_rng(rng);
            tags.push(self.create_tag(&truncate(&format!("{word}_{i}"), MAX_TAG_NAME_LEN))?);
        }
        Ok(tags)
    }

    fn fill_questions<R: Rng>(
        &self,
        count: usize,
        profiles: &[Profile],
        rng: &mut R,
    ) -> Result<Vec<Question>> {
        let mut questions = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(author) = profiles.choose(rng) else {
                break;
            };
            let title: String = Sentence(4..10).fake_with_rng(rng);
            let text: String = Paragraph(3..8).fake_with_rng(rng);

            questions.push(self.create_question(&NewQuestion {
                profile_id: author.id,
                title: truncate(&title, MAX_TITLE_LEN),
                text: truncate(&text, MAX_QUESTION_TEXT),
            })?);
        }
        Ok(questions)
    }

    fn fill_question_tags<R: Rng>(
        &self,
        questions: &[Question],
        tags: &[Tag],
        rng: &mut R,
    ) -> Result<usize> {
        if tags.is_empty() {
            return Ok(0);
        }

        let mut links = 0;
        for question in questions {
            let wanted = rng.gen_range(1..=MAX_TAGS_PER_QUESTION.min(tags.len()));
            for tag in tags.choose_multiple(rng, wanted) {
                if self.tag_question(question.id, tag.id)? {
                    links += 1;
                }
            }
        }
        Ok(links)
    }

    fn fill_answers<R: Rng>(
        &self,
        count: usize,
        profiles: &[Profile],
        questions: &[Question],
        rng: &mut R,
    ) -> Result<Vec<Answer>> {
        let mut answers = Vec::with_capacity(count);
        for _ in 0..count {
            let (Some(author), Some(question)) = (profiles.choose(rng), questions.choose(rng))
            else {
                break;
            };
            let text: String = Paragraph(2..5).fake_with_rng(rng);

            answers.push(self.create_answer(&NewAnswer {
                profile_id: author.id,
                question_id: question.id,
                text: truncate(&text, MAX_ANSWER_TEXT),
                is_correct: rng.gen_bool(0.1),
            })?);
        }
        Ok(answers)
    }

    /// Draw distinct (profile, target) pairs, giving up after three draws per
    /// wanted vote, then bulk insert so any pair that is already stored is
    /// dropped rather than failing the batch.
    fn fill_likes<R: Rng>(
        &self,
        count: usize,
        profiles: &[Profile],
        questions: &[Question],
        answers: &[Answer],
        rng: &mut R,
    ) -> Result<(usize, usize)> {
        let question_target = count / 2;
        let answer_target = count - question_target;

        let question_likes: Vec<NewQuestionLike> =
            draw_pairs(question_target, profiles.len(), questions.len(), rng)
                .into_iter()
                .map(|(p, q, value)| NewQuestionLike {
                    profile_id: profiles[p].id,
                    question_id: questions[q].id,
                    value,
                })
                .collect();

        let answer_likes: Vec<NewAnswerLike> =
            draw_pairs(answer_target, profiles.len(), answers.len(), rng)
                .into_iter()
                .map(|(p, a, value)| NewAnswerLike {
                    profile_id: profiles[p].id,
                    answer_id: answers[a].id,
                    value,
                })
                .collect();

        Ok((
            self.bulk_question_likes(&question_likes)?,
            self.bulk_answer_likes(&answer_likes)?,
        ))
    }
}

/// Up to `wanted` distinct (profile index, target index) pairs with a random vote.
fn draw_pairs<R: Rng>(
    wanted: usize,
    profiles: usize,
    targets: usize,
    rng: &mut R,
) -> Vec<(usize, usize, LikeValue)> {
    if profiles == 0 || targets == 0 {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut pairs = Vec::with_capacity(wanted);
    let mut attempts = 0;

    while pairs.len() < wanted && attempts < wanted * 3 {
        attempts += 1;
        let pair = (rng.gen_range(0..profiles), rng.gen_range(0..targets));
        if seen.insert(pair) {
            let value = if rng.gen_bool(LIKE_PROBABILITY) {
                LikeValue::Like
            } else {
                LikeValue::Dislike
            };
            pairs.push((pair.0, pair.1, value));
        }
    }

    pairs
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fill_scales_with_ratio() {
        let db = Database::open_in_memory().unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let report = db.fill(3, &mut rng).unwrap();
        assert_eq!(report.users, 3);
        assert_eq!(report.tags, 3);
        assert_eq!(report.questions, 30);
        assert_eq!(report.answers, 300);
        assert!(report.question_tags >= 30);
        // Only 3 * 30 distinct (profile, question) pairs exist.
        assert!(report.question_likes <= 90);
        assert!(report.question_likes > 0);
        assert!(report.answer_likes <= 300);

        assert_eq!(db.recent().count().unwrap(), 30);
        assert_eq!(db.popular_profiles(30).unwrap().len(), 3);

        let hot = db.hot().all().unwrap();
        let total_answers: i64 = hot.iter().map(|q| q.answer_count).sum();
        assert_eq!(total_answers, 300);
        assert!(hot.iter().all(|q| !q.tags.is_empty()));
    }

    #[test]
    fn test_ratings_match_likes_after_fill() {
        let db = Database::open_in_memory().unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        db.fill(2, &mut rng).unwrap();

        for summary in db.recent().all().unwrap() {
            let expected: i64 = db
                .question_likes(summary.question.id)
                .unwrap()
                .iter()
                .map(|l| l.value.as_i64())
                .sum();
            assert_eq!(summary.question.rating, expected);
        }
    }

    #[test]
    fn test_fill_zero_is_empty() {
        let db = Database::open_in_memory().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(db.fill(0, &mut rng).unwrap(), FillReport::default());
    }
}
