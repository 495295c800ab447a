use std::sync::{Arc, Mutex};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use tracing::debug;

use crate::errors::CoreError;
use crate::models::session::Session;
use crate::models::user::User;
use crate::store::LocalStore;

/// Login state and the single persisted session record.
///
/// Writes (`sign_up`, `login`, `logout`) are serialized by an internal
/// mutex so two racing logins cannot interleave their store writes. Reads
/// go straight to the store and treat an expired record as absent.
pub struct SessionManager {
    store: Arc<dyn LocalStore>,
    /// Lifetime stamped onto new sessions. `None` means no expiry.
    session_ttl: Option<Duration>,
    /// Held across every session/user write. Guards nothing else.
    write_guard: Mutex<()>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn LocalStore>, session_ttl: Option<Duration>) -> Self {
        Self {
            store,
            session_ttl,
            write_guard: Mutex::new(()),
        }
    }

    /// Register a new local user profile. Does not log the user in.
    ///
    /// The password is stored as an Argon2id PHC hash, never in plaintext.
    /// An already-registered email is `UserExists`; blank name, email or
    /// password is `InvalidCredentials`.
    pub fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User, CoreError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(CoreError::InvalidCredentials);
        }

        let _guard = self.write_guard.lock().unwrap_or_else(|e| e.into_inner());

        if self.store.read_user(email)?.is_some() {
            return Err(CoreError::UserExists(email.to_string()));
        }

        let user = User::new(name, email, hash_password(password)?);
        self.store.upsert_user(user.clone())?;
        debug!(user_id = %user.id, "registered user");
        Ok(user)
    }

    /// Validate credentials and persist a fresh session, replacing any
    /// prior one.
    ///
    /// Unknown email and wrong password are indistinguishable: both are
    /// `InvalidCredentials`.
    pub fn login(&self, email: &str, password: &str) -> Result<Session, CoreError> {
        let _guard = self.write_guard.lock().unwrap_or_else(|e| e.into_inner());

        let user = self
            .store
            .read_user(email.trim())?
            .ok_or(CoreError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        let session = Session::new(user.id, self.session_ttl);
        self.store.write_session(session.clone())?;
        debug!(user_id = %session.user_id, "session opened");
        Ok(session)
    }

    /// Delete the persisted session. Idempotent: logging out with no
    /// session is not an error.
    pub fn logout(&self) -> Result<(), CoreError> {
        let _guard = self.write_guard.lock().unwrap_or_else(|e| e.into_inner());
        self.store.delete_session()?;
        debug!("session closed");
        Ok(())
    }

    /// Read the persisted session. An expired record reads as absent; it
    /// is not deleted here (the next login overwrites it anyway).
    pub fn current_session(&self) -> Result<Option<Session>, CoreError> {
        let session = self.store.read_session()?;
        Ok(session.filter(|s| !s.is_expired(Utc::now())))
    }

    /// Whether a valid (non-expired) session exists.
    pub fn is_authenticated(&self) -> Result<bool, CoreError> {
        Ok(self.current_session()?.is_some())
    }

    /// Bearer token for authenticated calls, if a valid session exists.
    pub fn auth_token(&self) -> Result<Option<String>, CoreError> {
        Ok(self.current_session()?.map(|s| s.token))
    }

    /// Profile of the currently logged-in user, if any.
    pub fn current_user(&self) -> Result<Option<User>, CoreError> {
        match self.current_session()? {
            Some(session) => self.store.read_user_by_id(session.user_id),
            None => Ok(None),
        }
    }
}

// ── Password hashing helpers ────────────────────────────────────────

/// Hash a password into a PHC string with Argon2id and a fresh random salt.
fn hash_password(password: &str) -> Result<String, CoreError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|e| CoreError::StorageCorrupt(format!("Failed to generate hash salt: {e}")))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| CoreError::StorageCorrupt(format!("Failed to encode hash salt: {e}")))?;

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::StorageCorrupt(format!("Password hashing failed: {e}")))?
        .to_string())
}

/// Verify a password against a stored PHC hash string.
/// A mismatch is `InvalidCredentials`; an unreadable stored hash is
/// `StorageCorrupt` (the record itself is damaged).
fn verify_password(password: &str, stored_hash: &str) -> Result<(), CoreError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| CoreError::StorageCorrupt(format!("Stored password hash unreadable: {e}")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| CoreError::InvalidCredentials)
}
