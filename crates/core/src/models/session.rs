use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single persisted login session.
///
/// At most one exists at a time: a successful login replaces any prior
/// record, logout deletes it. The token is an opaque bearer credential
/// for callers that hit authenticated endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Id of the user this session belongs to.
    pub user_id: Uuid,

    /// Opaque credential handed to authenticated calls. Never logged.
    pub token: String,

    pub created_at: DateTime<Utc>,

    /// When the session stops being valid. `None` means no expiry is
    /// tracked and the session lives until an explicit logout.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(user_id: Uuid, ttl: Option<Duration>) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            token: Uuid::new_v4().to_string(),
            created_at: now,
            expires_at: ttl.map(|t| now + t),
        }
    }

    /// Whether the session has passed its expiry as of `now`.
    /// Sessions without an expiry never expire.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}
