use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A locally registered user profile.
///
/// `password_hash` is an Argon2id PHC string; the plaintext password is
/// never stored, and the hash string is safe to persist unencrypted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,

    /// Display name shown in the profile.
    pub name: String,

    /// Login identifier; compared case-insensitively.
    pub email: String,

    /// PHC-formatted Argon2id hash of the password.
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}
