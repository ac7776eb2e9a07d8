//! Decision engine for the swarmguard peer filter controller.
//!
//! This crate holds everything swarmguard decides, with no I/O of its own:
//!
//! - **Ranges**: IPv4 CIDR helpers and the daemon's filter multiaddr encoding
//! - **Complement**: the minimal block list that leaves only the allow list reachable
//! - **Latency**: the rolling average fed by one echo probe per tick
//! - **Controller**: the hysteresis rule for entering and leaving restriction
//! - **Throttle**: one high-latency alert per episode
//! - **Guard**: the reconciliation tick tying them to injected [`gateway`] traits
//!
//! # Example
//!
//! ```rust,ignore
//! use swarmguard_core::{complement, parse_range, to_filter};
//!
//! let allow = vec![parse_range("10.0.0.0/8")?];
//! for range in complement(&allow, &[]) {
//!     println!("{}", to_filter(&range));
//! }
//! ```

pub mod bootstrap;
pub mod complement;
pub mod controller;
mod error;
pub mod gateway;
pub mod guard;
pub mod latency;
pub mod range;
pub mod throttle;

pub use bootstrap::{augment_allow_list, BootstrapAddr};
pub use complement::complement;
pub use controller::{Decision, Observation, Thresholds};
pub use error::{GuardError, Result};
pub use gateway::{BootstrapSource, FilterGateway, Notifier, PeerCounter, Prober, Resolver};
pub use guard::{Collaborators, Guard, GuardSettings, TickReport};
pub use latency::{LatencySampler, LatencyWindow};
pub use range::{parse_range, to_filter, AddressRange};
pub use throttle::NotificationThrottle;
