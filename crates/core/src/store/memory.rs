use std::sync::RwLock;

use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::coin::{CachedCoin, ListSnapshot};
use crate::models::session::Session;
use crate::models::user::User;

use super::{LocalStore, StoreState};

/// In-memory store for tests and ephemeral embeddings.
/// State lives exactly as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn upsert_list(&self, snapshot: ListSnapshot) -> Result<(), CoreError> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.replace_list(snapshot);
        Ok(())
    }

    fn read_list(&self) -> Result<Option<ListSnapshot>, CoreError> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state.list.clone())
    }

    fn upsert_one(&self, record: CachedCoin) -> Result<(), CoreError> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.coins.insert(record.coin.id.clone(), record);
        Ok(())
    }

    fn read_one(&self, id: &str) -> Result<Option<CachedCoin>, CoreError> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state.coins.get(id).cloned())
    }

    fn write_session(&self, session: Session) -> Result<(), CoreError> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.session = Some(session);
        Ok(())
    }

    fn read_session(&self) -> Result<Option<Session>, CoreError> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state.session.clone())
    }

    fn delete_session(&self) -> Result<(), CoreError> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.session = None;
        Ok(())
    }

    fn upsert_user(&self, user: User) -> Result<(), CoreError> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.users.insert(user.email.to_lowercase(), user);
        Ok(())
    }

    fn read_user(&self, email: &str) -> Result<Option<User>, CoreError> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state.users.get(&email.to_lowercase()).cloned())
    }

    fn read_user_by_id(&self, id: Uuid) -> Result<Option<User>, CoreError> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state.users.values().find(|u| u.id == id).cloned())
    }
}
