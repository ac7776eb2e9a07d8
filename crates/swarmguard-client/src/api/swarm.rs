//! Swarm endpoints: connected peers and address filters.

use crate::SwarmClient;
use serde::Deserialize;
use swarmguard_core::Result;

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FilterList {
    #[serde(default)]
    strings: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PeerList {
    #[serde(default)]
    peers: Option<Vec<serde_json::Value>>,
}

/// Swarm API endpoints
pub struct SwarmApi<'a> {
    client: &'a SwarmClient,
}

impl<'a> SwarmApi<'a> {
    pub(crate) const fn new(client: &'a SwarmClient) -> Self {
        Self { client }
    }

    /// Number of peers the node is connected to
    pub async fn peer_count(&self) -> Result<usize> {
        let list: PeerList = self.client.call("swarm/peers", None).await?;
        Ok(list.peers.map_or(0, |peers| peers.len()))
    }

    /// Address filters currently enforced
    pub async fn filters(&self) -> Result<Vec<String>> {
        let list: FilterList = self.client.call("swarm/filters", None).await?;
        Ok(list.strings.unwrap_or_default())
    }

    /// Add an address filter (`/ip4/<network>/ipcidr/<len>`)
    pub async fn add_filter(&self, filter: &str) -> Result<()> {
        self.client.call_empty("swarm/filters/add", Some(filter)).await
    }

    /// Remove an address filter
    pub async fn remove_filter(&self, filter: &str) -> Result<()> {
        self.client.call_empty("swarm/filters/rm", Some(filter)).await
    }
}
