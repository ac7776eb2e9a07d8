//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Keeps an IPFS node usable on a congested link by switching its swarm
/// filters to an allow-list when latency or peer count climbs.
#[derive(Debug, Parser)]
#[command(name = "swarmguard", version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(short, long, env = "SWARMGUARD_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Daemon RPC address, overriding the config file
    #[arg(long, env = "SWARMGUARD_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Directory for rotated log files (default: platform data dir)
    #[arg(long, env = "SWARMGUARD_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log alerts instead of showing desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Verbose output (debug level unless RUST_LOG is set)
    #[arg(short, long)]
    pub verbose: bool,
}
