pub mod format;

// Store implementations
pub mod file;
pub mod memory;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::coin::{CachedCoin, ListSnapshot};
use crate::models::session::Session;
use crate::models::user::User;

/// Durable storage contract for the data core: pure CRUD, no staleness
/// policy, no network awareness.
///
/// Implementations must keep every operation atomic per scope (a reader
/// never observes a half-written list) and report unrecoverable corruption
/// as `StorageCorrupt`. No other failure mode is expected of local storage.
pub trait LocalStore: Send + Sync {
    /// Replace the cached list snapshot and refresh the per-coin record of
    /// every coin in it, as one atomic update.
    fn upsert_list(&self, snapshot: ListSnapshot) -> Result<(), CoreError>;

    /// Read the cached list snapshot, if one was ever written.
    fn read_list(&self) -> Result<Option<ListSnapshot>, CoreError>;

    /// Replace the cached record for a single coin. Leaves the list
    /// snapshot untouched: the two scopes refresh independently.
    fn upsert_one(&self, record: CachedCoin) -> Result<(), CoreError>;

    /// Read the cached record for a single coin id.
    fn read_one(&self, id: &str) -> Result<Option<CachedCoin>, CoreError>;

    /// Persist the session record, replacing any prior one.
    fn write_session(&self, session: Session) -> Result<(), CoreError>;

    /// Read the persisted session record, if any.
    fn read_session(&self) -> Result<Option<Session>, CoreError>;

    /// Delete the persisted session record. Idempotent.
    fn delete_session(&self) -> Result<(), CoreError>;

    /// Insert or replace a user profile.
    fn upsert_user(&self, user: User) -> Result<(), CoreError>;

    /// Look up a user profile by email, case-insensitively.
    fn read_user(&self, email: &str) -> Result<Option<User>, CoreError>;

    /// Look up a user profile by id.
    fn read_user_by_id(&self, id: Uuid) -> Result<Option<User>, CoreError>;
}

/// Everything the store persists, as one serializable unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreState {
    /// The full-list snapshot, written by list-scope refreshes.
    pub list: Option<ListSnapshot>,

    /// Per-coin records, keyed by coin id. Written by both scopes.
    pub coins: HashMap<String, CachedCoin>,

    /// The single session record.
    pub session: Option<Session>,

    /// Registered user profiles, keyed by lowercased email.
    pub users: HashMap<String, User>,
}

impl StoreState {
    /// Apply a full-list replace: swap the snapshot and refresh the
    /// per-coin record of every listed coin with the snapshot's timestamp.
    pub fn replace_list(&mut self, snapshot: ListSnapshot) {
        for coin in &snapshot.coins {
            self.coins.insert(
                coin.id.clone(),
                CachedCoin {
                    coin: coin.clone(),
                    fetched_at: snapshot.fetched_at,
                },
            );
        }
        self.list = Some(snapshot);
    }
}
