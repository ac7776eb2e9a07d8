//! swarmguard - swarm filter controller for IPFS nodes

use anyhow::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    swarmguard_cli::run().await
}
