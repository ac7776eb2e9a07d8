//! Bootstrap peers are always reachable: their addresses join the allow list
//! once at startup.

use crate::error::{GuardError, Result};
use crate::gateway::Resolver;
use crate::range::{single, AddressRange};
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::{debug, info, warn};

/// Address component of a bootstrap multiaddr, by scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapAddr {
    /// `/ip4/<addr>/...`
    Ip4(Ipv4Addr),
    /// `/ip6/<addr>/...`, never filtered
    Ip6(Ipv6Addr),
    /// `/dnsaddr/<host>`, `/dns/<host>` or `/dns4/<host>`
    Dns(String),
    /// Anything else, kept verbatim
    Unsupported(String),
}

impl BootstrapAddr {
    /// Classify a multiaddr by its leading protocol component
    ///
    /// Returns an error for entries that are not multiaddrs at all.
    pub fn parse(multiaddr: &str) -> Result<Self> {
        if !multiaddr.contains('/') {
            return Err(GuardError::InvalidMultiaddr(multiaddr.to_string()));
        }

        let mut parts = multiaddr.split('/').filter(|p| !p.is_empty());
        let (Some(scheme), Some(address)) = (parts.next(), parts.next()) else {
            return Ok(Self::Unsupported(multiaddr.to_string()));
        };

        let parsed = match scheme {
            "ip4" => address.parse().ok().map(Self::Ip4),
            "ip6" => address.parse().ok().map(Self::Ip6),
            "dnsaddr" | "dns" | "dns4" => Some(Self::Dns(address.to_string())),
            _ => None,
        };
        Ok(parsed.unwrap_or_else(|| Self::Unsupported(multiaddr.to_string())))
    }
}

/// Append a `/32` allow entry for every IPv4-reachable bootstrap peer
///
/// IPv6 peers, unresolvable names and unsupported entries are logged and
/// skipped. Returns the number of entries added.
pub async fn augment_allow_list(
    allow: &mut Vec<AddressRange>,
    peers: &[String],
    resolver: &dyn Resolver,
) -> usize {
    let before = allow.len();

    for multiaddr in peers {
        let addr = match BootstrapAddr::parse(multiaddr) {
            Ok(addr) => addr,
            Err(e) => {
                debug!(error = %e, "skipping bootstrap entry");
                continue;
            }
        };

        let ip = match addr {
            BootstrapAddr::Ip4(ip) => Some(ip),
            BootstrapAddr::Ip6(ip) => {
                info!(%ip, "not filtering IPv6 bootstrap peer");
                None
            }
            BootstrapAddr::Dns(host) => match resolver.resolve_v4(&host).await {
                Ok(ip) => Some(ip),
                Err(e) => {
                    warn!(%host, error = %e, "failed to resolve bootstrap domain");
                    None
                }
            },
            BootstrapAddr::Unsupported(raw) => {
                warn!(multiaddr = %raw, "failed to parse bootstrap multiaddr");
                None
            }
        };

        if let Some(ip) = ip {
            allow.push(single(ip));
        }
    }

    info!("whitelist:");
    for range in allow.iter() {
        info!("  {range}");
    }

    allow.len() - before
}
