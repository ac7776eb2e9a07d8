//! HTTP RPC client for the node daemon.
//!
//! [`SwarmClient`] speaks the daemon's `/api/v0` surface and implements the
//! [`FilterGateway`](swarmguard_core::FilterGateway),
//! [`PeerCounter`](swarmguard_core::PeerCounter) and
//! [`BootstrapSource`](swarmguard_core::BootstrapSource) capabilities.

mod client;
mod gateway;
pub mod api;

pub use client::{SwarmClient, SwarmClientBuilder, DEFAULT_API_URL};
pub use swarmguard_core::{GuardError, Result};
