//! # swarmguard
//!
//! Keeps an IPFS node from drowning its uplink. Every second swarmguard pings
//! a fixed host, counts the node's peers and reads back its swarm filters;
//! when latency or peer count climbs past its thresholds it switches the
//! node to an allow-list (everything outside the whitelist and bootstrap
//! peers is filtered), and lifts it again once latency has recovered.
//!
//! ## Features
//!
//! - **Hysteresis**: separate enter/exit latency thresholds to avoid flapping
//! - **Reconciliation**: filter state is read from the daemon every tick
//! - **Alerts**: one desktop notification per high-latency episode
//! - **Logs**: a CSV-style tick line on stdout and in a rotated log file

pub mod cli;
pub mod config;
pub mod logging;
pub mod monitor;

pub use cli::run;
