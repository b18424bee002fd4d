//! Domain model structs persisted in the SQLite database.
//!
//! Every struct derives `Serialize` so it can be handed directly to the page
//! context. Insert payloads (`New*`) carry only caller-supplied fields; ids and
//! timestamps are assigned by the store.

use askvindman_shared::types::{AnswerId, LikeValue, ProfileId, QuestionId, TagId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// User / Profile
// ---------------------------------------------------------------------------

/// An account row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 PHC string. Never rendered.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// The public face of a user: nickname, avatar and bio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub nickname: String,
    /// Reference to an avatar image, if the user uploaded one.
    pub avatar: Option<String>,
    pub about: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProfile {
    pub user_id: UserId,
    pub nickname: String,
    pub avatar: Option<String>,
    pub about: String,
}

/// A profile ranked by how many distinct profiles answered its questions.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PopularProfile {
    #[serde(flatten)]
    pub profile: Profile,
    pub unique_answerers: i64,
}

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub text: String,
    /// Sum of all like values cast on this question.
    pub rating: i64,
    pub profile_id: ProfileId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub profile_id: ProfileId,
    pub title: String,
    pub text: String,
}

/// A question as shown in listings: author nickname, answer count and tags
/// resolved alongside the row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QuestionSummary {
    #[serde(flatten)]
    pub question: Question,
    pub author: String,
    pub answer_count: i64,
    pub tags: Vec<Tag>,
}

// ---------------------------------------------------------------------------
// Answer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Answer {
    pub id: AnswerId,
    pub text: String,
    pub is_correct: bool,
    /// Sum of all like values cast on this answer.
    pub rating: i64,
    pub profile_id: ProfileId,
    pub question_id: QuestionId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAnswer {
    pub profile_id: ProfileId,
    pub question_id: QuestionId,
    pub text: String,
    pub is_correct: bool,
}

/// An answer with its author's nickname.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnswerEntry {
    #[serde(flatten)]
    pub answer: Answer,
    pub author: String,
}

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// A tag ranked by the number of distinct questions carrying it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PopularTag {
    #[serde(flatten)]
    pub tag: Tag,
    pub questions_count: i64,
}

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionLike {
    pub profile_id: ProfileId,
    pub question_id: QuestionId,
    pub value: LikeValue,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct NewQuestionLike {
    pub profile_id: ProfileId,
    pub question_id: QuestionId,
    pub value: LikeValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerLike {
    pub profile_id: ProfileId,
    pub answer_id: AnswerId,
    pub value: LikeValue,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct NewAnswerLike {
    pub profile_id: ProfileId,
    pub answer_id: AnswerId,
    pub value: LikeValue,
}
