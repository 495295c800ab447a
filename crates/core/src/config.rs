use chrono::Duration;

/// Policy configuration for the data core, fixed at construction time.
///
/// Freshness and expiry windows are set by the embedder, not hard-coded
/// in the repository or session manager.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// How long a cached record counts as fresh. A cache hit younger than
    /// this is served without touching the network.
    pub freshness_ttl: Duration,

    /// Lifetime of a login session. `None` means sessions never expire
    /// and stay valid until an explicit logout.
    pub session_ttl: Option<Duration>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            freshness_ttl: Duration::hours(1),
            session_ttl: None,
        }
    }
}

impl TrackerConfig {
    #[must_use]
    pub fn with_freshness_ttl(mut self, ttl: Duration) -> Self {
        self.freshness_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.session_ttl = ttl;
        self
    }
}
