//! Name resolution through the system resolver.

use crate::error::{ProbeError, ProbeResult};
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr};
use swarmguard_core::{Resolver, Result};
use tokio::net::lookup_host;
use tracing::debug;

/// Resolver backed by the operating system (`getaddrinfo`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl SystemResolver {
    /// Create a resolver using the system configuration
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolve hostname to IP addresses
    pub async fn lookup(&self, hostname: &str) -> ProbeResult<Vec<IpAddr>> {
        // Port is irrelevant; lookup_host wants a socket address.
        let addrs = lookup_host((hostname, 0))
            .await
            .map_err(|e| ProbeError::Dns(format!("{hostname}: {e}")))?;

        Ok(addrs.map(|a| a.ip()).collect())
    }

    /// First IPv4 address of `hostname`
    pub async fn lookup_v4(&self, hostname: &str) -> ProbeResult<Ipv4Addr> {
        let addrs = self.lookup(hostname).await?;
        debug!(hostname, ?addrs, "resolved");
        first_v4(&addrs).ok_or_else(|| ProbeError::Dns(format!("{hostname}: no IPv4 address")))
    }
}

#[async_trait]
impl Resolver for SystemResolver {
    async fn resolve_v4(&self, host: &str) -> Result<Ipv4Addr> {
        Ok(self.lookup_v4(host).await?)
    }
}

fn first_v4(addrs: &[IpAddr]) -> Option<Ipv4Addr> {
    addrs.iter().find_map(|addr| match addr {
        IpAddr::V4(v4) => Some(*v4),
        IpAddr::V6(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;

    #[test]
    fn test_first_v4_skips_v6() {
        let addrs = [
            IpAddr::V6(Ipv6Addr::LOCALHOST),
            IpAddr::V4(Ipv4Addr::new(139, 178, 91, 71)),
            IpAddr::V4(Ipv4Addr::new(147, 75, 87, 27)),
        ];
        assert_eq!(first_v4(&addrs), Some(Ipv4Addr::new(139, 178, 91, 71)));
        assert_eq!(first_v4(&[IpAddr::V6(Ipv6Addr::LOCALHOST)]), None);
    }

    #[tokio::test]
    async fn test_literal_address_resolves() {
        let ip = SystemResolver::new().lookup_v4("127.0.0.1").await.unwrap();
        assert_eq!(ip, Ipv4Addr::LOCALHOST);
    }
}
