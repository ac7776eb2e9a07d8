//! Capability implementations backed by the RPC client.

use crate::SwarmClient;
use async_trait::async_trait;
use swarmguard_core::{BootstrapSource, FilterGateway, PeerCounter, Result};

#[async_trait]
impl FilterGateway for SwarmClient {
    async fn list_filters(&self) -> Result<Vec<String>> {
        self.swarm().filters().await
    }

    async fn add_filter(&self, filter: &str) -> Result<()> {
        self.swarm().add_filter(filter).await
    }

    async fn remove_filter(&self, filter: &str) -> Result<()> {
        self.swarm().remove_filter(filter).await
    }
}

#[async_trait]
impl PeerCounter for SwarmClient {
    async fn peer_count(&self) -> Result<usize> {
        self.swarm().peer_count().await
    }
}

#[async_trait]
impl BootstrapSource for SwarmClient {
    async fn bootstrap_peers(&self) -> Result<Vec<String>> {
        self.bootstrap().list().await
    }
}
