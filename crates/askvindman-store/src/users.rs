//! Accounts, profiles and the popular-profiles ranking.

use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use askvindman_shared::constants::MAX_NICKNAME_LEN;
use askvindman_shared::error::{check_len, ValidationError};
use askvindman_shared::types::{ProfileId, UserId};
use rand::RngCore;
use rusqlite::params;

use crate::codec::{decode_ts, encode_ts, now};
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{NewProfile, NewUser, PopularProfile, Profile, User};

/// Hash a password into an Argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);

    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| StoreError::PasswordHash(e.to_string()))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

impl Database {
    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Create an account. The password is hashed before it is stored.
    pub fn create_user(&self, new: &NewUser) -> Result<User> {
        let hash = hash_password(&new.password)?;
        self.insert_user_with_hash(new, &hash)
    }

    /// Insert an account whose password has already been hashed. Bulk
    /// population hashes once and reuses the result.
    pub(crate) fn insert_user_with_hash(&self, new: &NewUser, password_hash: &str) -> Result<User> {
        if new.username.trim().is_empty() {
            return Err(ValidationError::Empty("username").into());
        }

        let created_at = now();
        self.conn()
            .prepare_cached(
                "INSERT INTO users (username, email, first_name, last_name, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?
            .execute(params![
                new.username,
                new.email,
                new.first_name,
                new.last_name,
                password_hash,
                encode_ts(&created_at),
            ])
            .map_err(|e| StoreError::from_constraint(e, StoreError::Conflict("username")))?;

        Ok(User {
            id: UserId(self.conn().last_insert_rowid()),
            username: new.username.clone(),
            email: new.email.clone(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            password_hash: password_hash.to_string(),
            created_at,
        })
    }

    pub fn get_user(&self, id: UserId) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT id, username, email, first_name, last_name, password_hash, created_at
                 FROM users WHERE id = ?1",
                params![id.0],
                |row| {
                    let created_str: String = row.get(6)?;
                    Ok(User {
                        id: UserId(row.get(0)?),
                        username: row.get(1)?,
                        email: row.get(2)?,
                        first_name: row.get(3)?,
                        last_name: row.get(4)?,
                        password_hash: row.get(5)?,
                        created_at: decode_ts(6, &created_str)?,
                    })
                },
            )
            .map_err(StoreError::from_lookup)
    }

    /// Delete an account. The profile and everything it authored or voted on
    /// goes with it. Returns `true` if a row was deleted.
    pub fn delete_user(&self, id: UserId) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![id.0])?;
        Ok(affected > 0)
    }

    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    pub fn create_profile(&self, new: &NewProfile) -> Result<Profile> {
        check_len("nickname", &new.nickname, MAX_NICKNAME_LEN, |len, max| {
            ValidationError::NicknameTooLong { len, max }
        })?;

        self.conn()
            .prepare_cached(
                "INSERT INTO profiles (user_id, nickname, avatar, about) VALUES (?1, ?2, ?3, ?4)",
            )?
            .execute(params![new.user_id.0, new.nickname, new.avatar, new.about])
            .map_err(|e| StoreError::from_constraint(e, StoreError::Conflict("profile")))?;

        Ok(Profile {
            id: ProfileId(self.conn().last_insert_rowid()),
            user_id: new.user_id,
            nickname: new.nickname.clone(),
            avatar: new.avatar.clone(),
            about: new.about.clone(),
        })
    }

    pub fn get_profile(&self, id: ProfileId) -> Result<Profile> {
        self.conn()
            .query_row(
                "SELECT id, user_id, nickname, avatar, about FROM profiles WHERE id = ?1",
                params![id.0],
                row_to_profile,
            )
            .map_err(StoreError::from_lookup)
    }

    /// Look a profile up by its public nickname (the `/profile/{user}/` key).
    pub fn get_profile_by_nickname(&self, nickname: &str) -> Result<Profile> {
        self.conn()
            .query_row(
                "SELECT id, user_id, nickname, avatar, about FROM profiles WHERE nickname = ?1",
                params![nickname],
                row_to_profile,
            )
            .map_err(StoreError::from_lookup)
    }

    /// Profiles ordered by the number of distinct profiles that answered any
    /// of their questions, highest first.
    pub fn popular_profiles(&self, limit: usize) -> Result<Vec<PopularProfile>> {
        let mut stmt = self.conn().prepare_cached(
            "SELECT p.id, p.user_id, p.nickname, p.avatar, p.about,
                    (SELECT COUNT(DISTINCT a.profile_id)
                       FROM questions q
                       JOIN answers a ON a.question_id = q.id
                      WHERE q.profile_id = p.id) AS unique_answerers
             FROM profiles p
             ORDER BY unique_answerers DESC, p.id ASC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(PopularProfile {
                profile: row_to_profile(row)?,
                unique_answerers: row.get(5)?,
            })
        })?;

        let mut profiles = Vec::new();
        for row in rows {
            profiles.push(row?);
        }
        Ok(profiles)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map the first five columns of a row to a [`Profile`].
fn row_to_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: ProfileId(row.get(0)?),
        user_id: UserId(row.get(1)?),
        nickname: row.get(2)?,
        avatar: row.get(3)?,
        about: row.get(4)?,
    })
}
