//! IPv4 address ranges and their daemon filter encoding.
//!
//! Ranges are [`Ipv4Net`] values kept in canonical form: the base address
//! always has its host bits cleared. Two CIDR blocks either nest or are
//! disjoint, which is what the containment helpers below rely on.

use crate::error::{GuardError, Result};
use ipnet::Ipv4Net;
use std::net::Ipv4Addr;

/// A CIDR block with a canonical network address
pub type AddressRange = Ipv4Net;

const FILTER_PREFIX: &str = "/ip4/";
const FILTER_CIDR: &str = "/ipcidr/";

/// The range spanning the whole IPv4 address space (`0.0.0.0/0`)
#[must_use]
pub fn full_space() -> AddressRange {
    Ipv4Net::default()
}

/// Parse `a.b.c.d/n` (or a bare address, taken as `/32`)
///
/// Host bits are cleared, so `10.1.2.3/8` yields `10.0.0.0/8`.
pub fn parse_range(input: &str) -> Result<AddressRange> {
    let trimmed = input.trim();
    let net = if trimmed.contains('/') {
        trimmed
            .parse::<Ipv4Net>()
            .map_err(|_| GuardError::InvalidRange(input.to_string()))?
    } else {
        trimmed
            .parse::<Ipv4Addr>()
            .map(Ipv4Net::from)
            .map_err(|_| GuardError::InvalidRange(input.to_string()))?
    };
    Ok(net.trunc())
}

/// A single-address (`/32`) range
#[must_use]
pub fn single(addr: Ipv4Addr) -> AddressRange {
    Ipv4Net::from(addr)
}

/// Returns true if every address of `inner` lies in `outer`
#[must_use]
pub fn covers(outer: &AddressRange, inner: &AddressRange) -> bool {
    outer.prefix_len() <= inner.prefix_len()
        && u32::from(inner.network()) & u32::from(outer.netmask()) == u32::from(outer.network())
}

/// Split a range into its two halves, or `None` for a `/32`
#[must_use]
pub fn halves(range: &AddressRange) -> Option<(AddressRange, AddressRange)> {
    let prefix = range.prefix_len().checked_add(1).filter(|p| *p <= 32)?;
    let base = u32::from(range.network());
    let upper = base | (1u32 << (32 - u32::from(prefix)));
    let lo = Ipv4Net::new(Ipv4Addr::from(base), prefix).ok()?;
    let hi = Ipv4Net::new(Ipv4Addr::from(upper), prefix).ok()?;
    Some((lo, hi))
}

/// Encode a range as a daemon filter multiaddr, `/ip4/<network>/ipcidr/<len>`
#[must_use]
pub fn to_filter(range: &AddressRange) -> String {
    format!(
        "{FILTER_PREFIX}{}{FILTER_CIDR}{}",
        range.network(),
        range.prefix_len()
    )
}
