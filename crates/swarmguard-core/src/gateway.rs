//! Capability traits for everything outside the decision engine.
//!
//! The daemon RPC client, the echo probe, name resolution and desktop
//! notification are injected through these traits so the engine can be
//! driven by in-memory fakes.

use crate::error::Result;
use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Reads and mutates the daemon's active filter set
///
/// Filters are daemon multiaddrs of the form `/ip4/<network>/ipcidr/<len>`.
#[async_trait]
pub trait FilterGateway: Send + Sync {
    /// List the filter entries currently enforced
    async fn list_filters(&self) -> Result<Vec<String>>;

    /// Add one filter entry
    async fn add_filter(&self, filter: &str) -> Result<()>;

    /// Remove one filter entry
    async fn remove_filter(&self, filter: &str) -> Result<()>;
}

/// Reports how many peers the node is connected to
#[async_trait]
pub trait PeerCounter: Send + Sync {
    /// Current connected-peer count
    async fn peer_count(&self) -> Result<usize>;
}

/// Lists the node's configured bootstrap peers
#[async_trait]
pub trait BootstrapSource: Send + Sync {
    /// Bootstrap peer multiaddrs, as configured on the daemon
    async fn bootstrap_peers(&self) -> Result<Vec<String>>;
}

/// Issues a single bounded echo probe
#[async_trait]
pub trait Prober: Send + Sync {
    /// Round-trip time in milliseconds
    async fn probe(&self) -> Result<f64>;
}

/// Resolves host names to IPv4 addresses
#[async_trait]
pub trait Resolver: Send + Sync {
    /// First IPv4 address for `host`
    async fn resolve_v4(&self, host: &str) -> Result<Ipv4Addr>;
}

/// Delivers a user-facing alert
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show an alert with the given title and body
    async fn notify(&self, title: &str, body: &str) -> Result<()>;
}
