use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::connectivity::ConnectivityProbe;
use crate::errors::CoreError;
use crate::models::coin::{CachedCoin, Coin, ListSnapshot};
use crate::remote::traits::CoinSource;
use crate::store::LocalStore;

use super::fetch_gate::FetchGate;

/// How served data relates to the freshness policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// A within-TTL cache hit, or the result of a successful remote fetch
    /// made by this very call.
    Fresh,
    /// A cache fallback: a refresh was due but offline state or a remote
    /// failure prevented it.
    Stale,
}

/// A repository reply: the data, the staleness signal, and the timestamp
/// the data was originally fetched at (for "last updated" rendering).
#[derive(Debug, Clone, PartialEq)]
pub struct Served<T> {
    pub data: T,
    pub freshness: Freshness,
    pub as_of: DateTime<Utc>,
}

impl<T> Served<T> {
    fn fresh(data: T, as_of: DateTime<Utc>) -> Self {
        Self {
            data,
            freshness: Freshness::Fresh,
            as_of,
        }
    }

    fn stale(data: T, as_of: DateTime<Utc>) -> Self {
        Self {
            data,
            freshness: Freshness::Stale,
            as_of,
        }
    }

    /// Whether this reply carries the stale-data signal.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.freshness == Freshness::Stale
    }
}

/// Lifecycle of one fetch scope, for status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    /// Nothing cached, nothing in flight.
    Empty,
    /// Cached data within the freshness window.
    Fresh,
    /// Cached data past the freshness window.
    Stale,
    /// A fetch is in flight right now.
    Fetching,
    /// The most recent fetch failed; cached data, if any, still serves.
    Failed,
}

/// Cache-first read API over the remote feed and the local store.
///
/// Decision order for every read: serve a within-TTL cache hit; otherwise
/// consult the connectivity probe and make at most one remote attempt; on
/// offline or remote failure fall back to whatever the cache holds, marked
/// stale. Stale-but-present always beats no data, so `Unavailable` only
/// ever means the cache is empty too. Failed fetches are never retried
/// here; retry is the caller's concern via re-invocation.
pub struct CoinRepository {
    remote: Arc<dyn CoinSource>,
    store: Arc<dyn LocalStore>,
    connectivity: Arc<dyn ConnectivityProbe>,
    /// Cached records younger than this are served without a fetch.
    freshness_ttl: Duration,
    list_gate: FetchGate,
    /// Per-coin gates, created on first fetch of each id.
    coin_gates: Mutex<HashMap<String, Arc<FetchGate>>>,
}

impl CoinRepository {
    pub fn new(
        remote: Arc<dyn CoinSource>,
        store: Arc<dyn LocalStore>,
        connectivity: Arc<dyn ConnectivityProbe>,
        freshness_ttl: Duration,
    ) -> Self {
        Self {
            remote,
            store,
            connectivity,
            freshness_ttl,
            list_gate: FetchGate::new(),
            coin_gates: Mutex::new(HashMap::new()),
        }
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Get the coin list, cache-first.
    ///
    /// `force_refresh` skips the freshness check and goes straight to the
    /// fetch decision; it does not bypass the offline/failure fallbacks.
    pub async fn get_coins(&self, force_refresh: bool) -> Result<Served<Vec<Coin>>, CoreError> {
        if !force_refresh {
            if let Some(snapshot) = self.store.read_list()? {
                if snapshot.is_fresh(Utc::now(), self.freshness_ttl) {
                    debug!("serving coin list from cache");
                    return Ok(Served::fresh(snapshot.coins, snapshot.fetched_at));
                }
            }
        }

        if !self.connectivity.is_online() {
            debug!("offline, serving cached coin list");
            return self.serve_cached_list();
        }

        match self.fetch_list().await {
            Ok(snapshot) => Ok(Served::fresh(snapshot.coins, snapshot.fetched_at)),
            Err(CoreError::StorageCorrupt(detail)) => Err(CoreError::StorageCorrupt(detail)),
            Err(e) => {
                warn!(
                    source = self.remote.name(),
                    error = %e,
                    "coin list fetch failed, falling back to cache"
                );
                self.serve_cached_list()
            }
        }
    }

    /// Get one coin by id, cache-first, with the same fallback policy as
    /// `get_coins` scoped to that id.
    ///
    /// `NotFound` is returned only when the id is absent from both the
    /// cache and the remote source; a cached copy of an id the feed has
    /// since dropped still serves, marked stale.
    pub async fn get_coin_by_id(&self, id: &str) -> Result<Served<Coin>, CoreError> {
        if let Some(record) = self.store.read_one(id)? {
            if record.is_fresh(Utc::now(), self.freshness_ttl) {
                debug!(id, "serving coin from cache");
                return Ok(Served::fresh(record.coin, record.fetched_at));
            }
        }

        if !self.connectivity.is_online() {
            debug!(id, "offline, serving cached coin");
            return self.serve_cached_coin(id);
        }

        match self.fetch_one(id).await {
            Ok(record) => Ok(Served::fresh(record.coin, record.fetched_at)),
            Err(CoreError::NotFound(missing)) => match self.store.read_one(id)? {
                Some(record) => {
                    warn!(id, "remote no longer lists coin, serving cached copy");
                    Ok(Served::stale(record.coin, record.fetched_at))
                }
                None => Err(CoreError::NotFound(missing)),
            },
            Err(CoreError::StorageCorrupt(detail)) => Err(CoreError::StorageCorrupt(detail)),
            Err(e) => {
                warn!(
                    id,
                    source = self.remote.name(),
                    error = %e,
                    "coin fetch failed, falling back to cache"
                );
                self.serve_cached_coin(id)
            }
        }
    }

    /// Unconditionally attempt a remote fetch of the list and update the
    /// cache (pull-to-refresh). A refresh that cannot happen, because the
    /// device is offline or the remote failed, is `Unavailable`; the prior
    /// cache is left untouched in that case.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        if !self.connectivity.is_online() {
            debug!("refresh requested while offline");
            return Err(CoreError::Unavailable);
        }

        match self.fetch_list().await {
            Ok(_) => Ok(()),
            Err(CoreError::StorageCorrupt(detail)) => Err(CoreError::StorageCorrupt(detail)),
            Err(e) => {
                warn!(source = self.remote.name(), error = %e, "refresh failed");
                Err(CoreError::Unavailable)
            }
        }
    }

    // ── Scope status ────────────────────────────────────────────────

    /// Lifecycle state of the list scope. An in-flight fetch reports
    /// `Fetching` regardless of cache contents; a settled failure reports
    /// `Failed` until the next successful fetch.
    pub fn list_status(&self) -> Result<SourceStatus, CoreError> {
        if self.list_gate.is_fetching() {
            return Ok(SourceStatus::Fetching);
        }
        if self.list_gate.last_fetch_failed() {
            return Ok(SourceStatus::Failed);
        }
        Ok(match self.store.read_list()? {
            None => SourceStatus::Empty,
            Some(s) if s.is_fresh(Utc::now(), self.freshness_ttl) => SourceStatus::Fresh,
            Some(_) => SourceStatus::Stale,
        })
    }

    /// Lifecycle state of one coin's scope.
    pub fn coin_status(&self, id: &str) -> Result<SourceStatus, CoreError> {
        if let Some(gate) = self.existing_coin_gate(id) {
            if gate.is_fetching() {
                return Ok(SourceStatus::Fetching);
            }
            if gate.last_fetch_failed() {
                return Ok(SourceStatus::Failed);
            }
        }
        Ok(match self.store.read_one(id)? {
            None => SourceStatus::Empty,
            Some(r) if r.is_fresh(Utc::now(), self.freshness_ttl) => SourceStatus::Fresh,
            Some(_) => SourceStatus::Stale,
        })
    }

    /// When the cached list snapshot was fetched, if one exists.
    pub fn last_refreshed(&self) -> Result<Option<DateTime<Utc>>, CoreError> {
        Ok(self.store.read_list()?.map(|s| s.fetched_at))
    }

    // ── Internal ────────────────────────────────────────────────────

    fn serve_cached_list(&self) -> Result<Served<Vec<Coin>>, CoreError> {
        match self.store.read_list()? {
            Some(snapshot) => Ok(Served::stale(snapshot.coins, snapshot.fetched_at)),
            None => Err(CoreError::Unavailable),
        }
    }

    fn serve_cached_coin(&self, id: &str) -> Result<Served<Coin>, CoreError> {
        match self.store.read_one(id)? {
            Some(record) => Ok(Served::stale(record.coin, record.fetched_at)),
            None => Err(CoreError::Unavailable),
        }
    }

    /// One sequenced fetch of the full list. On success the snapshot goes
    /// to the store through the gate; the caller receives this fetch's own
    /// snapshot even if a later fetch already superseded it in the cache.
    async fn fetch_list(&self) -> Result<ListSnapshot, CoreError> {
        let ticket = self.list_gate.begin();
        match self.remote.fetch_coins().await {
            Ok(coins) => {
                let snapshot = ListSnapshot::new(coins);
                let written = snapshot.clone();
                let applied = self
                    .list_gate
                    .commit(ticket, || self.store.upsert_list(written))?;
                if !applied {
                    debug!("discarding superseded coin list fetch");
                }
                Ok(snapshot)
            }
            Err(e) => {
                self.list_gate.abort(ticket);
                Err(e)
            }
        }
    }

    /// One sequenced fetch of a single coin.
    async fn fetch_one(&self, id: &str) -> Result<CachedCoin, CoreError> {
        let gate = self.coin_gate(id);
        let ticket = gate.begin();
        match self.remote.fetch_coin(id).await {
            Ok(coin) => {
                let record = CachedCoin::new(coin);
                let written = record.clone();
                let applied = gate.commit(ticket, || self.store.upsert_one(written))?;
                if !applied {
                    debug!(id, "discarding superseded coin fetch");
                }
                Ok(record)
            }
            Err(e) => {
                gate.abort(ticket);
                Err(e)
            }
        }
    }

    /// Gate for a coin id, created on first use.
    fn coin_gate(&self, id: &str) -> Arc<FetchGate> {
        let mut gates = self.coin_gates.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(gates.entry(id.to_string()).or_default())
    }

    fn existing_coin_gate(&self, id: &str) -> Option<Arc<FetchGate>> {
        let gates = self.coin_gates.lock().unwrap_or_else(|e| e.into_inner());
        gates.get(id).cloned()
    }
}
