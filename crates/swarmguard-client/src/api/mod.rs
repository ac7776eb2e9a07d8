//! API endpoint modules.

mod bootstrap;
mod swarm;

pub use bootstrap::BootstrapApi;
pub use swarm::SwarmApi;
