pub mod config;
pub mod connectivity;
pub mod errors;
pub mod models;
pub mod remote;
pub mod services;
pub mod store;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use config::TrackerConfig;
use connectivity::{ConnectivityProbe, TcpProbe};
use errors::CoreError;
use models::coin::Coin;
use models::session::Session;
use models::user::User;
use remote::http::HttpCoinSource;
use remote::traits::CoinSource;
use services::coin_repository::{CoinRepository, Served, SourceStatus};
use services::session_manager::SessionManager;
use store::file::FileStore;
use store::LocalStore;

/// Main entry point for the Coin Tracker core library.
/// Wires the local store, remote source and connectivity probe into the
/// coin repository and session manager, assembled once at process start.
#[must_use]
pub struct CoinTracker {
    coins: CoinRepository,
    session: SessionManager,
}

impl CoinTracker {
    /// Wire a tracker from explicit components. The embedder owns every
    /// choice: which feed, which store, which reachability signal.
    pub fn new(
        remote: Arc<dyn CoinSource>,
        store: Arc<dyn LocalStore>,
        connectivity: Arc<dyn ConnectivityProbe>,
        config: TrackerConfig,
    ) -> Self {
        let coins = CoinRepository::new(
            remote,
            Arc::clone(&store),
            connectivity,
            config.freshness_ttl,
        );
        let session = SessionManager::new(store, config.session_ttl);
        Self { coins, session }
    }

    /// Open a file-backed tracker against the default HTTP feed and TCP
    /// connectivity probe: the common embedding, wired in one call.
    pub fn open(data_path: impl Into<PathBuf>, config: TrackerConfig) -> Result<Self, CoreError> {
        let store: Arc<dyn LocalStore> = Arc::new(FileStore::open(data_path)?);
        Ok(Self::new(
            Arc::new(HttpCoinSource::new()),
            store,
            Arc::new(TcpProbe::default()),
            config,
        ))
    }

    // ── Coins ───────────────────────────────────────────────────────

    /// Cache-first read of the coin list. `force_refresh` skips the
    /// freshness check and attempts a fetch when the network allows.
    pub async fn get_coins(&self, force_refresh: bool) -> Result<Served<Vec<Coin>>, CoreError> {
        self.coins.get_coins(force_refresh).await
    }

    /// Cache-first read of a single coin by its feed identifier.
    pub async fn get_coin_by_id(&self, id: &str) -> Result<Served<Coin>, CoreError> {
        self.coins.get_coin_by_id(id).await
    }

    /// Unconditional refresh of the coin list cache (pull-to-refresh).
    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.coins.refresh().await
    }

    /// Lifecycle state of the list scope, for status indicators.
    pub fn list_status(&self) -> Result<SourceStatus, CoreError> {
        self.coins.list_status()
    }

    /// Lifecycle state of one coin's scope.
    pub fn coin_status(&self, id: &str) -> Result<SourceStatus, CoreError> {
        self.coins.coin_status(id)
    }

    /// When the cached coin list was last refreshed, if ever.
    pub fn last_refreshed(&self) -> Result<Option<DateTime<Utc>>, CoreError> {
        self.coins.last_refreshed()
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Register a new local user profile. Does not log the user in.
    pub fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User, CoreError> {
        self.session.sign_up(name, email, password)
    }

    /// Validate credentials and open a session, replacing any prior one.
    pub fn login(&self, email: &str, password: &str) -> Result<Session, CoreError> {
        self.session.login(email, password)
    }

    /// Close the current session. Idempotent.
    pub fn logout(&self) -> Result<(), CoreError> {
        self.session.logout()
    }

    /// The persisted session, if one exists and has not expired.
    pub fn current_session(&self) -> Result<Option<Session>, CoreError> {
        self.session.current_session()
    }

    /// Whether a valid session exists.
    pub fn is_authenticated(&self) -> Result<bool, CoreError> {
        self.session.is_authenticated()
    }

    /// Bearer token for authenticated calls, if a valid session exists.
    pub fn auth_token(&self) -> Result<Option<String>, CoreError> {
        self.session.auth_token()
    }

    /// Profile of the currently logged-in user, if any.
    pub fn current_user(&self) -> Result<Option<User>, CoreError> {
        self.session.current_user()
    }

    // ── Component access ────────────────────────────────────────────

    /// The coin repository, for callers that hold it directly.
    #[must_use]
    pub fn coins(&self) -> &CoinRepository {
        &self.coins
    }

    /// The session manager, for callers that hold it directly.
    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }
}
