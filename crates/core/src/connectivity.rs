use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

/// Network reachability hint.
///
/// A `true` answer is strictly a hint: the remote call that follows must
/// still handle failure on its own. A `false` answer lets the repository
/// short-circuit to the cache without burning a transport timeout.
pub trait ConnectivityProbe: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Probe that attempts a TCP connect to a well-known endpoint, bounded by
/// a short timeout. No result caching: every call asks the network again.
pub struct TcpProbe {
    addr: SocketAddr,
    timeout: Duration,
}

impl TcpProbe {
    /// Probe a specific endpoint.
    pub fn new(addr: SocketAddr, timeout: Duration) -> Self {
        Self { addr, timeout }
    }
}

impl Default for TcpProbe {
    /// Probes a public DNS resolver on the HTTPS port with a one-second
    /// timeout.
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([1, 1, 1, 1], 443)),
            timeout: Duration::from_secs(1),
        }
    }
}

impl ConnectivityProbe for TcpProbe {
    fn is_online(&self) -> bool {
        TcpStream::connect_timeout(&self.addr, self.timeout).is_ok()
    }
}

/// Probe that always reports online. For embedders that carry their own
/// reachability signal, and for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl ConnectivityProbe for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}
