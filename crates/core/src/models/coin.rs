use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single tracked coin, as last reported by the remote source.
///
/// Records are replaced whole on refresh, never field-patched: every copy
/// sitting in the local store is a verbatim remote response from some point
/// in time, with the fetch timestamp tracked alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    /// Unique identifier assigned by the remote source (e.g., "bitcoin").
    pub id: String,

    /// Display name (e.g., "Bitcoin").
    pub name: String,

    /// Ticker symbol (e.g., "BTC").
    pub symbol: String,

    /// Latest price in the feed's quote currency.
    pub price: f64,

    /// Market-cap rank, if the feed provides one.
    #[serde(default)]
    pub rank: Option<u32>,

    /// Market capitalization, if the feed provides one.
    #[serde(default)]
    pub market_cap: Option<f64>,

    /// Price change over the trailing 24 hours, in percent.
    #[serde(default)]
    pub change_24h: Option<f64>,
}

impl Coin {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            price,
            rank: None,
            market_cap: None,
            change_24h: None,
        }
    }
}

/// A cached coin list snapshot: the coins exactly as received, in the
/// remote source's ranking order, plus when they were fetched.
///
/// Ordering is part of the data: the store must hand the list back in
/// the same order it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSnapshot {
    pub coins: Vec<Coin>,

    /// When this snapshot was fetched from the remote source.
    pub fetched_at: DateTime<Utc>,
}

impl ListSnapshot {
    pub fn new(coins: Vec<Coin>) -> Self {
        Self {
            coins,
            fetched_at: Utc::now(),
        }
    }

    /// Whether the snapshot is younger than `ttl` as of `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.fetched_at < ttl
    }
}

/// A single cached coin with its own freshness timestamp.
/// The by-id scope refreshes independently of the full-list scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedCoin {
    pub coin: Coin,

    /// When this record was fetched from the remote source.
    pub fetched_at: DateTime<Utc>,
}

impl CachedCoin {
    pub fn new(coin: Coin) -> Self {
        Self {
            coin,
            fetched_at: Utc::now(),
        }
    }

    /// Whether the record is younger than `ttl` as of `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.fetched_at < ttl
    }
}
