use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::coin::Coin;

/// Trait abstraction over the upstream price feed.
///
/// The repository needs exactly two things from the feed: the full listing
/// and one coin by id. Everything else about the feed (base URL, auth,
/// transport tuning) is the implementor's business, so swapping feeds or
/// substituting a mock in tests touches nothing but this trait.
#[async_trait]
pub trait CoinSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the full coin listing, in the feed's ranking order.
    async fn fetch_coins(&self) -> Result<Vec<Coin>, CoreError>;

    /// Fetch a single coin by its feed identifier.
    /// An id the feed does not know is `NotFound`.
    async fn fetch_coin(&self, id: &str) -> Result<Coin, CoreError>;
}
