//! Fixtures shared by the unit tests of this crate.

use askvindman_shared::types::LikeValue;

use crate::database::Database;
use crate::models::{
    Answer, NewAnswer, NewProfile, NewQuestion, NewQuestionLike, NewUser, Profile, Question, Tag,
};

/// Create a user and its profile, both named `nickname`. Skips password hashing.
pub(crate) fn add_profile(db: &Database, nickname: &str) -> Profile {
    let user = db
        .insert_user_with_hash(
            &NewUser {
                username: nickname.to_string(),
                email: format!("{nickname}@example.com"),
                first_name: String::new(),
                last_name: String::new(),
                password: String::new(),
            },
            "not-a-real-hash",
        )
        .unwrap();

    db.create_profile(&NewProfile {
        user_id: user.id,
        nickname: nickname.to_string(),
        avatar: None,
        about: String::new(),
    })
    .unwrap()
}

pub(crate) fn ask(db: &Database, author: &Profile, title: &str) -> Question {
    db.create_question(&NewQuestion {
        profile_id: author.id,
        title: title.to_string(),
        text: format!("{title}?"),
    })
    .unwrap()
}

pub(crate) fn add_answer(db: &Database, author: &Profile, question: &Question) -> Answer {
    db.create_answer(&NewAnswer {
        profile_id: author.id,
        question_id: question.id,
        text: "because".to_string(),
        is_correct: false,
    })
    .unwrap()
}

pub(crate) fn add_tag(db: &Database, name: &str) -> Tag {
    db.create_tag(name).unwrap()
}

pub(crate) fn question_like(
    profile: &Profile,
    question: &Question,
    value: LikeValue,
) -> NewQuestionLike {
    NewQuestionLike {
        profile_id: profile.id,
        question_id: question.id,
        value,
    }
}
