use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use super::traits::CoinSource;
use crate::errors::CoreError;
use crate::models::coin::Coin;

/// Default public endpoint for the coin price API.
pub const DEFAULT_BASE_URL: &str = "https://api.cointracker.dev/v1";

/// HTTP client for the coin price API.
///
/// - **Endpoints**: `GET {base}/coins` (full listing, ranking order) and
///   `GET {base}/coins/{id}` (single coin).
/// - **Failures**: transport errors, non-success statuses and malformed
///   bodies all surface as `RemoteFailure`; a 404 from the by-id endpoint
///   surfaces as `NotFound`.
pub struct HttpCoinSource {
    client: Client,
    base_url: String,
}

impl HttpCoinSource {
    /// Client against the default public endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against a custom endpoint (self-hosted mirror, test server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
        }
    }
}

impl Default for HttpCoinSource {
    fn default() -> Self {
        Self::new()
    }
}

// ── Coin API response types ─────────────────────────────────────────

#[derive(Deserialize)]
struct CoinDto {
    id: String,
    name: String,
    symbol: String,
    price: f64,
    #[serde(default)]
    rank: Option<u32>,
    #[serde(default, rename = "marketCap")]
    market_cap: Option<f64>,
    #[serde(default, rename = "change24h")]
    change_24h: Option<f64>,
}

impl From<CoinDto> for Coin {
    fn from(dto: CoinDto) -> Self {
        Coin {
            id: dto.id,
            name: dto.name,
            symbol: dto.symbol,
            price: dto.price,
            rank: dto.rank,
            market_cap: dto.market_cap,
            change_24h: dto.change_24h,
        }
    }
}

/// Decode a listing response body into coins, preserving order.
/// Split out from the transport so malformed-body handling is testable
/// without a live server.
pub fn parse_coin_list(body: &[u8]) -> Result<Vec<Coin>, CoreError> {
    let dtos: Vec<CoinDto> = serde_json::from_slice(body)?;
    Ok(dtos.into_iter().map(Coin::from).collect())
}

/// Decode a single-coin response body.
pub fn parse_coin(body: &[u8]) -> Result<Coin, CoreError> {
    let dto: CoinDto = serde_json::from_slice(body)?;
    Ok(dto.into())
}

#[async_trait]
impl CoinSource for HttpCoinSource {
    fn name(&self) -> &str {
        "coin-api"
    }

    async fn fetch_coins(&self) -> Result<Vec<Coin>, CoreError> {
        let url = format!("{}/coins", self.base_url);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::RemoteFailure(format!(
                "coin listing returned HTTP {status}"
            )));
        }

        let body = resp.bytes().await?;
        parse_coin_list(&body)
    }

    async fn fetch_coin(&self, id: &str) -> Result<Coin, CoreError> {
        let url = format!("{}/coins/{id}", self.base_url);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CoreError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(CoreError::RemoteFailure(format!(
                "coin {id} returned HTTP {status}"
            )));
        }

        let body = resp.bytes().await?;
        parse_coin(&body)
    }
}
