//! Bootstrap list endpoints.

use crate::SwarmClient;
use serde::Deserialize;
use swarmguard_core::Result;

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BootstrapList {
    #[serde(default)]
    peers: Option<Vec<String>>,
}

/// Bootstrap API endpoints
pub struct BootstrapApi<'a> {
    client: &'a SwarmClient,
}

impl<'a> BootstrapApi<'a> {
    pub(crate) const fn new(client: &'a SwarmClient) -> Self {
        Self { client }
    }

    /// Bootstrap peer multiaddrs configured on the node
    pub async fn list(&self) -> Result<Vec<String>> {
        let list: BootstrapList = self.client.call("bootstrap/list", None).await?;
        Ok(list.peers.unwrap_or_default())
    }
}
