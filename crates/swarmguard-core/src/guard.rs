//! The reconciliation tick.
//!
//! [`Guard`] owns everything that lives across ticks (the latency window and
//! the alert flag) plus the immutable allow/deny lists. Restriction state is
//! never cached here: each tick asks the daemon whether its filter set equals
//! the strict set and issues corrective calls only.

use crate::complement::complement;
use crate::controller::{Decision, Observation, Thresholds};
use crate::error::Result;
use crate::gateway::{FilterGateway, Notifier, PeerCounter, Prober};
use crate::latency::{LatencySampler, DEFAULT_WINDOW_SIZE};
use crate::range::{to_filter, AddressRange};
use crate::throttle::{NotificationThrottle, DEFAULT_NOTIFY_THRESHOLD_MS};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info, warn};

/// Log target of the per-tick record
pub const TICK_TARGET: &str = "swarmguard::tick";

/// Tunables for a [`Guard`]
#[derive(Debug, Clone)]
pub struct GuardSettings {
    /// Enter/exit thresholds
    pub thresholds: Thresholds,
    /// Alert threshold in milliseconds
    pub notify_threshold_ms: f64,
    /// Number of samples in the rolling average
    pub window_size: usize,
    /// Host the latency probe targets, used in alert text
    pub probe_target: String,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            notify_threshold_ms: DEFAULT_NOTIFY_THRESHOLD_MS,
            window_size: DEFAULT_WINDOW_SIZE,
            probe_target: String::from("8.8.8.8"),
        }
    }
}

/// Collaborators borrowed for one tick
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    /// Echo probe
    pub prober: &'a dyn Prober,
    /// Connected-peer source
    pub peers: &'a dyn PeerCounter,
    /// Daemon filter access
    pub gateway: &'a dyn FilterGateway,
    /// Alert delivery
    pub notifier: &'a dyn Notifier,
}

/// Outcome of a completed tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Rolling average after this tick's probe
    pub average_ms: Option<f64>,
    /// Connected peers
    pub peers: usize,
    /// Whether strict filtering was active when the tick started
    pub filter_active: bool,
    /// Action taken
    pub action: Decision,
}

impl fmt::Display for TickReport {
    /// `<average>,<peers>,<0|1>` with an empty average when unknown
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}",
            Average(self.average_ms),
            self.peers,
            u8::from(self.filter_active)
        )
    }
}

/// Tick line for a tick abandoned before the daemon answered: the average
/// with empty peer and restriction fields.
fn abandoned_tick_line(average_ms: Option<f64>) -> String {
    format!("{},,", Average(average_ms))
}

struct Average(Option<f64>);

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(avg) => write!(f, "{avg}"),
            None => Ok(()),
        }
    }
}

/// Controller context, built once at startup and driven once per tick
#[derive(Debug)]
pub struct Guard {
    settings: GuardSettings,
    deny: Vec<AddressRange>,
    strict: Vec<String>,
    sampler: LatencySampler,
    throttle: NotificationThrottle,
}

impl Guard {
    /// Build a guard for fixed allow/deny lists
    pub fn new(settings: GuardSettings, allow: &[AddressRange], deny: Vec<AddressRange>) -> Self {
        let strict = complement(allow, &deny).iter().map(to_filter).collect();
        Self {
            sampler: LatencySampler::new(settings.window_size),
            throttle: NotificationThrottle::new(settings.notify_threshold_ms),
            settings,
            deny,
            strict,
        }
    }

    /// The strict filter set, as daemon filter multiaddrs
    pub fn expected_filters(&self) -> &[String] {
        &self.strict
    }

    /// Settings in use
    pub const fn settings(&self) -> &GuardSettings {
        &self.settings
    }

    /// The latency sampler
    pub const fn sampler(&self) -> &LatencySampler {
        &self.sampler
    }

    /// Run one tick
    ///
    /// An error means the tick was abandoned after the latency sample. The
    /// alert check still runs and a tick line is still logged, with empty
    /// daemon fields.
    pub async fn tick(&mut self, with: Collaborators<'_>) -> Result<TickReport> {
        let average_ms = self.sampler.sample(with.prober).await;
        let outcome = self.reconcile(with, average_ms).await;
        self.check_alert(with.notifier, average_ms).await;

        match outcome {
            Ok(report) => {
                info!(target: TICK_TARGET, "{report}");
                Ok(report)
            }
            Err(e) => {
                info!(target: TICK_TARGET, "{}", abandoned_tick_line(average_ms));
                Err(e)
            }
        }
    }

    async fn reconcile(&self, with: Collaborators<'_>, average_ms: Option<f64>) -> Result<TickReport> {
        let peers = with.peers.peer_count().await?;
        let filter_active = self.is_restricted(with.gateway).await?;

        let observation = Observation {
            average_ms,
            peers,
            filter_active,
        };
        let action = self.settings.thresholds.decide(&observation);
        match action {
            Decision::Restrict => self.apply_strict(with.gateway).await?,
            Decision::Unrestrict => self.remove_strict(with.gateway).await?,
            Decision::Hold => {}
        }

        Ok(TickReport {
            average_ms,
            peers,
            filter_active,
            action,
        })
    }

    async fn check_alert(&mut self, notifier: &dyn Notifier, average_ms: Option<f64>) {
        if !self.throttle.observe(average_ms) {
            return;
        }
        let Some(avg) = average_ms else {
            return;
        };

        #[allow(clippy::cast_possible_truncation)]
        let body = format!(
            "Average ping to {} is {}ms (>{}ms)",
            self.settings.probe_target,
            avg as i64,
            self.throttle.threshold_ms()
        );
        warn!(average_ms = avg, "high ping latency");
        if let Err(e) = notifier.notify("High ping latency", &body).await {
            warn!(error = %e, "failed to deliver notification");
        }
    }

    /// Whether the daemon's filter set is exactly the strict set
    pub async fn is_restricted(&self, gateway: &dyn FilterGateway) -> Result<bool> {
        let active: BTreeSet<String> = gateway.list_filters().await?.into_iter().collect();
        let expected: BTreeSet<&str> = self.strict.iter().map(String::as_str).collect();
        let restricted = active.len() == expected.len()
            && active.iter().all(|f| expected.contains(f.as_str()));
        debug!(restricted, "strict filter check");
        Ok(restricted)
    }

    /// Replace whatever the daemon enforces with the strict set
    pub async fn apply_strict(&self, gateway: &dyn FilterGateway) -> Result<()> {
        info!("applying strict filters");
        clear_all(gateway).await?;
        for filter in &self.strict {
            debug!(%filter, "adding filter");
            add_entry(gateway, filter).await?;
        }
        Ok(())
    }

    /// Replace whatever the daemon enforces with the deny list alone
    pub async fn remove_strict(&self, gateway: &dyn FilterGateway) -> Result<()> {
        info!("removing strict filters and applying blacklist");
        clear_all(gateway).await?;
        for range in &self.deny {
            let filter = to_filter(range);
            info!(%filter, "blacklisting");
            add_entry(gateway, &filter).await?;
        }
        Ok(())
    }
}

/// Remove every filter entry the daemon reports
pub async fn clear_all(gateway: &dyn FilterGateway) -> Result<()> {
    info!("removing all filters");
    for filter in gateway.list_filters().await? {
        debug!(%filter, "removing filter");
        match gateway.remove_filter(&filter).await {
            Err(e) if e.is_benign() => debug!(error = %e, "ignoring filter removal response"),
            other => other?,
        }
    }
    Ok(())
}

async fn add_entry(gateway: &dyn FilterGateway, filter: &str) -> Result<()> {
    match gateway.add_filter(filter).await {
        Err(e) if e.is_benign() => {
            debug!(error = %e, "ignoring filter add response");
            Ok(())
        }
        other => other,
    }
}
