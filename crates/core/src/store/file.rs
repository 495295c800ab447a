use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::coin::{CachedCoin, ListSnapshot};
use crate::models::session::Session;
use crate::models::user::User;

use super::{format, LocalStore, StoreState};

/// File-backed store: the full state is held in memory behind a lock and
/// re-persisted on every mutation.
///
/// Flow: StoreState → bincode → CTRK snapshot bytes → temp file → rename.
/// The rename makes each persist all-or-nothing, so a crash mid-write
/// leaves the previous snapshot intact. If the disk write fails, the
/// in-memory state is left unchanged as well.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl FileStore {
    /// Open the snapshot at `path`. A missing file opens as the empty
    /// state; a file that exists but cannot be parsed is `StorageCorrupt`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let state = match fs::read(&path) {
            Ok(bytes) => Self::decode(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreState::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(bytes: &[u8]) -> Result<StoreState, CoreError> {
        let (_header, payload) = format::read_file(bytes)?;
        Ok(bincode::deserialize(payload)?)
    }

    /// Serialize and atomically replace the snapshot on disk.
    /// Uses write-to-temp-then-rename so readers of the file never see a
    /// partial snapshot.
    fn persist(&self, state: &StoreState) -> Result<(), CoreError> {
        let payload = bincode::serialize(state)?;
        let bytes = format::write_file(format::CURRENT_VERSION, &payload);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;

        // Helper to clean up temp file on failure
        let cleanup_and_err = |e: std::io::Error| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(&bytes).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        Ok(())
    }

    /// Run a mutation against a copy of the state, persist it, then commit
    /// the copy. Holding the write lock across the persist keeps mutations
    /// serialized; committing after the persist keeps memory and disk in
    /// step when the write fails.
    fn mutate(&self, apply: impl FnOnce(&mut StoreState)) -> Result<(), CoreError> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let mut next = state.clone();
        apply(&mut next);
        self.persist(&next)?;
        *state = next;
        Ok(())
    }
}

impl LocalStore for FileStore {
    fn upsert_list(&self, snapshot: ListSnapshot) -> Result<(), CoreError> {
        self.mutate(|state| state.replace_list(snapshot))
    }

    fn read_list(&self) -> Result<Option<ListSnapshot>, CoreError> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state.list.clone())
    }

    fn upsert_one(&self, record: CachedCoin) -> Result<(), CoreError> {
        self.mutate(|state| {
            state.coins.insert(record.coin.id.clone(), record);
        })
    }

    fn read_one(&self, id: &str) -> Result<Option<CachedCoin>, CoreError> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state.coins.get(id).cloned())
    }

    fn write_session(&self, session: Session) -> Result<(), CoreError> {
        self.mutate(|state| state.session = Some(session))
    }

    fn read_session(&self) -> Result<Option<Session>, CoreError> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state.session.clone())
    }

    fn delete_session(&self) -> Result<(), CoreError> {
        self.mutate(|state| state.session = None)
    }

    fn upsert_user(&self, user: User) -> Result<(), CoreError> {
        self.mutate(|state| {
            state.users.insert(user.email.to_lowercase(), user);
        })
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
