//! Host-side collaborators for swarmguard.
//!
//! Implementations of the engine's capability traits that talk to the local
//! machine: the `ping` echo probe, the system resolver and desktop alerts.

mod error;

pub mod dns;
pub mod notify;
pub mod ping;

pub use dns::SystemResolver;
pub use error::{ProbeError, ProbeResult};
pub use notify::{DesktopNotifier, LogNotifier};
pub use ping::PingProber;
