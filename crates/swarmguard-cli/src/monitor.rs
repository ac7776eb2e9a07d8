//! Startup and the tick loop.

use std::future::Future;
use std::time::Duration;
use swarmguard_core::{
    augment_allow_list, BootstrapSource, Collaborators, FilterGateway, Guard, GuardSettings,
    Resolver, TickReport,
};
use tracing::{error, info, warn};

use crate::config::Config;

/// List the node's bootstrap peers, retrying every `interval` until the
/// daemon answers.
///
/// Returns `None` if `shutdown` completes first.
pub async fn wait_for_bootstrap(
    source: &dyn BootstrapSource,
    interval: Duration,
    shutdown: impl Future<Output = ()>,
) -> Option<Vec<String>> {
    tokio::pin!(shutdown);

    loop {
        match source.bootstrap_peers().await {
            Ok(peers) => return Some(peers),
            Err(e) => warn!(error = %e, "failed to list bootstrap peers, retrying"),
        }

        tokio::select! {
            () = &mut shutdown => {
                info!("shutting down");
                return None;
            }
            () = tokio::time::sleep(interval) => {}
        }
    }
}

/// Build the guard: configured lists plus the node's bootstrap peers
pub async fn prepare(
    config: &Config,
    settings: GuardSettings,
    bootstrap: &[String],
    resolver: &dyn Resolver,
) -> Guard {
    let mut allow = config.whitelist.clone();
    let added = augment_allow_list(&mut allow, bootstrap, resolver).await;
    info!(added, "whitelisted bootstrap peers");

    let guard = Guard::new(settings, &allow, config.blacklist.clone());
    info!(filters = guard.expected_filters().len(), "strict filter set computed");
    guard
}

/// Start from a known state: no strict filters, deny list applied
pub async fn reset(guard: &Guard, gateway: &dyn FilterGateway) {
    if let Err(e) = guard.remove_strict(gateway).await {
        error!(error = %e, "failed to reset filters at startup");
    }
}

/// Run one tick, logging instead of propagating failure
pub async fn tick(guard: &mut Guard, with: Collaborators<'_>) -> Option<TickReport> {
    match guard.tick(with).await {
        Ok(report) => Some(report),
        Err(e) if e.is_transport() => {
            error!(error = %e, "daemon unreachable, skipping tick");
            None
        }
        Err(e) => {
            error!(error = %e, "tick failed");
            None
        }
    }
}

/// Tick until `shutdown` completes
///
/// Ticks never overlap: a slow tick delays the next one, and missed
/// intervals are not caught up.
pub async fn run(
    guard: &mut Guard,
    with: Collaborators<'_>,
    interval: Duration,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);

    loop {
        tick(guard, with).await;

        tokio::select! {
            () = &mut shutdown => {
                info!("shutting down");
                return;
            }
            () = tokio::time::sleep(interval) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::net::Ipv4Addr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use swarmguard_core::{Decision, GuardError, Notifier, PeerCounter, Prober, Result};

    const BOOTSTRAP_HOST: &str = "/ip4/104.131.131.82/ipcidr/32";

    #[derive(Default)]
    struct FakeDaemon {
        filters: Mutex<BTreeSet<String>>,
        bootstrap: Vec<String>,
        // Bootstrap listings that fail before the daemon comes up.
        offline_listings: AtomicUsize,
        listings: AtomicUsize,
    }

    impl FakeDaemon {
        fn late(offline_listings: usize) -> Self {
            Self {
                bootstrap: vec![
                    "/ip4/104.131.131.82/tcp/4001/p2p/QmaCpDM".into(),
                    "/dnsaddr/bootstrap.libp2p.io/p2p/QmNnoo".into(),
                ],
                offline_listings: AtomicUsize::new(offline_listings),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl FilterGateway for FakeDaemon {
        async fn list_filters(&self) -> Result<Vec<String>> {
            Ok(self.filters.lock().unwrap().iter().cloned().collect())
        }

        async fn add_filter(&self, filter: &str) -> Result<()> {
            self.filters.lock().unwrap().insert(filter.to_string());
            Ok(())
        }

        async fn remove_filter(&self, filter: &str) -> Result<()> {
            self.filters.lock().unwrap().remove(filter);
            Ok(())
        }
    }

    #[async_trait]
    impl PeerCounter for FakeDaemon {
        async fn peer_count(&self) -> Result<usize> {
            Ok(12)
        }
    }

    #[async_trait]
    impl BootstrapSource for FakeDaemon {
        async fn bootstrap_peers(&self) -> Result<Vec<String>> {
            self.listings.fetch_add(1, Ordering::SeqCst);
            let offline = self
                .offline_listings
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if offline {
                return Err(GuardError::Connection("connection refused".into()));
            }
            Ok(self.bootstrap.clone())
        }
    }

    struct StaticResolver;

    #[async_trait]
    impl Resolver for StaticResolver {
        async fn resolve_v4(&self, _host: &str) -> Result<Ipv4Addr> {
            Ok(Ipv4Addr::new(147, 75, 87, 27))
        }
    }

    struct FixedProber(f64);

    #[async_trait]
    impl Prober for FixedProber {
        async fn probe(&self) -> Result<f64> {
            Ok(self.0)
        }
    }

    struct SilentNotifier;

    #[async_trait]
    impl Notifier for SilentNotifier {
        async fn notify(&self, _title: &str, _body: &str) -> Result<()> {
            Ok(())
        }
    }

    fn config() -> Config {
        Config {
            blacklist: vec![swarmguard_core::parse_range("10.66.0.0/16").unwrap()],
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_prepare_whitelists_bootstrap_peers() {
        let daemon = FakeDaemon::late(0);
        let peers = daemon.bootstrap_peers().await.unwrap();

        let guard = prepare(&config(), GuardSettings::default(), &peers, &StaticResolver).await;

        let filters = guard.expected_filters();
        assert!(!filters.is_empty());
        // Neighbours of the bootstrap hosts are blocked, the hosts themselves are not.
        assert!(filters.contains(&"/ip4/104.131.131.83/ipcidr/32".to_string()));
        assert!(!filters.iter().any(|f| f.starts_with("/ip4/104.131.131.82/")));
        assert!(filters.contains(&"/ip4/147.75.87.26/ipcidr/32".to_string()));
        assert!(filters.contains(&"/ip4/10.66.0.0/ipcidr/16".to_string()));
    }

    #[tokio::test]
    async fn test_bootstrap_listing_retried_until_daemon_is_up() {
        let daemon = FakeDaemon::late(3);

        let peers = wait_for_bootstrap(&daemon, Duration::from_millis(1), std::future::pending())
            .await
            .unwrap();
        assert_eq!(daemon.listings.load(Ordering::SeqCst), 4);

        let mut guard = prepare(&config(), GuardSettings::default(), &peers, &StaticResolver).await;
        reset(&guard, &daemon).await;
        let with = Collaborators {
            prober: &FixedProber(75.0),
            peers: &daemon,
            gateway: &daemon,
            notifier: &SilentNotifier,
        };
        tick(&mut guard, with).await.unwrap();

        let active = daemon.filters.lock().unwrap().clone();
        assert!(!active.is_empty());
        let host: Ipv4Addr = "104.131.131.82".parse().unwrap();
        let blocked = active.iter().any(|f| {
            let (net, len) = f
                .trim_start_matches("/ip4/")
                .split_once("/ipcidr/")
                .unwrap();
            let net = swarmguard_core::parse_range(&format!("{net}/{len}")).unwrap();
            net.contains(&host)
        });
        assert!(!blocked, "bootstrap host blocked under restriction");
        assert!(!active.contains(BOOTSTRAP_HOST));
    }

    #[tokio::test]
    async fn test_bootstrap_wait_stops_on_shutdown() {
        let daemon = FakeDaemon::late(usize::MAX);

        let peers =
            wait_for_bootstrap(&daemon, Duration::from_secs(3600), std::future::ready(())).await;

        assert!(peers.is_none());
        assert_eq!(daemon.listings.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reset_then_restrict() {
        let daemon = FakeDaemon::default();
        daemon
            .filters
            .lock()
            .unwrap()
            .insert("/ip4/1.0.0.0/ipcidr/8".into());
        let mut guard = prepare(&config(), GuardSettings::default(), &[], &StaticResolver).await;

        reset(&guard, &daemon).await;
        assert_eq!(
            daemon.list_filters().await.unwrap(),
            vec!["/ip4/10.66.0.0/ipcidr/16".to_string()]
        );

        let with = Collaborators {
            prober: &FixedProber(75.0),
            peers: &daemon,
            gateway: &daemon,
            notifier: &SilentNotifier,
        };
        let report = tick(&mut guard, with).await.unwrap();
        assert_eq!(report.action, Decision::Restrict);
        assert_eq!(report.to_string(), "75,12,0");
        assert!(guard.is_restricted(&daemon).await.unwrap());
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let daemon = FakeDaemon::default();
        let mut guard = prepare(&config(), GuardSettings::default(), &[], &StaticResolver).await;
        let with = Collaborators {
            prober: &FixedProber(10.0),
            peers: &daemon,
            gateway: &daemon,
            notifier: &SilentNotifier,
        };

        run(&mut guard, with, Duration::from_secs(3600), std::future::ready(())).await;

        assert_eq!(guard.sampler().window().len(), 1);
    }
}
