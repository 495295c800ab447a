use thiserror::Error;

/// Unified error type for the entire coin-tracker-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Data availability ───────────────────────────────────────────
    #[error("Data unavailable: remote source unreachable and no cached copy")]
    Unavailable,

    #[error("Coin not found: {0}")]
    NotFound(String),

    // ── Remote source ───────────────────────────────────────────────
    #[error("Remote source failure: {0}")]
    RemoteFailure(String),

    // ── Authentication ──────────────────────────────────────────────
    // One message for unknown email and wrong password; callers must not
    // be able to tell which part failed.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists: {0}")]
    UserExists(String),

    // ── Local store ─────────────────────────────────────────────────
    #[error("Local store corrupted: {0}")]
    StorageCorrupt(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::StorageCorrupt(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::StorageCorrupt(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::RemoteFailure(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // URLs in transport errors may carry API keys in the query
        // string; strip everything after '?' before the message can
        // reach logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::RemoteFailure(sanitized)
    }
}
