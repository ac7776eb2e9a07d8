//! CLI argument parsing and process wiring.

pub mod args;

use anyhow::Result;
use args::Cli;
use clap::Parser;
use std::time::Duration;
use swarmguard_client::{SwarmClient, DEFAULT_API_URL};
use swarmguard_core::{Collaborators, Notifier};
use swarmguard_probe::{DesktopNotifier, LogNotifier, PingProber, SystemResolver};
use tracing::{info, warn};

use crate::config::{self, Config, MonitorConfig};
use crate::{logging, monitor};

/// Run the monitor until interrupted
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let log_dir = match cli.log_dir {
        Some(dir) => dir,
        None => config::default_log_dir()?,
    };
    let _log_guard = logging::init(&log_dir, cli.verbose)?;

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::path()?,
    };
    let mut config = Config::load(&config_path);
    if let Some(url) = cli.api_url {
        config.monitor.api_url = url;
    }

    let client = connect(&config.monitor)?;
    info!(api = %client.base_url(), "using daemon");

    let prober = PingProber::new(config.monitor.ping_target.clone())
        .timeout(Duration::from_secs(config.monitor.ping_timeout_secs));
    let notifier: Box<dyn Notifier> = if cli.no_notify {
        Box::new(LogNotifier)
    } else {
        Box::new(DesktopNotifier::default())
    };

    let interval = Duration::from_secs(config.monitor.interval_secs);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };
    tokio::pin!(shutdown);

    let Some(bootstrap) = monitor::wait_for_bootstrap(&client, interval, &mut shutdown).await
    else {
        return Ok(());
    };
    let mut guard = monitor::prepare(
        &config,
        config.monitor.guard_settings(),
        &bootstrap,
        &SystemResolver::new(),
    )
    .await;
    monitor::reset(&guard, &client).await;

    let with = Collaborators {
        prober: &prober,
        peers: &client,
        gateway: &client,
        notifier: notifier.as_ref(),
    };
    monitor::run(&mut guard, with, interval, &mut shutdown).await;
    Ok(())
}

/// Build the daemon client, falling back to the default address if the
/// configured one is unusable.
fn connect(monitor: &MonitorConfig) -> Result<SwarmClient> {
    let timeout = Duration::from_secs(monitor.request_timeout_secs);
    match SwarmClient::builder(&monitor.api_url).timeout(timeout).build() {
        Ok(client) => Ok(client),
        Err(e) => {
            warn!(error = %e, "invalid daemon address, using {DEFAULT_API_URL}");
            Ok(SwarmClient::builder(DEFAULT_API_URL).timeout(timeout).build()?)
        }
    }
}
