//! ICMP echo probe via the system `ping` binary.
//!
//! `ping` is setuid or capability-enabled on most systems, so shelling out
//! avoids needing raw socket privileges here.

use crate::error::{ProbeError, ProbeResult};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use swarmguard_core::{Prober, Result};
use tokio::process::Command;
use tracing::trace;

const PING: &str = "ping";

/// Extra time granted to the process beyond its own deadline
const KILL_GRACE: Duration = Duration::from_secs(1);

/// Single-packet latency probe
#[derive(Debug, Clone)]
pub struct PingProber {
    target: String,
    timeout: Duration,
}

impl Default for PingProber {
    fn default() -> Self {
        Self::new("8.8.8.8")
    }
}

impl PingProber {
    /// Create a prober for `target` with a 2 second deadline
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            timeout: Duration::from_secs(2),
        }
    }

    /// Set the probe deadline (whole seconds, minimum 1)
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.max(Duration::from_secs(1));
        self
    }

    /// Probe target
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Send one echo request and return the round-trip time in milliseconds
    pub async fn ping_once(&self) -> ProbeResult<f64> {
        let deadline = self.timeout.as_secs().max(1).to_string();
        let mut command = Command::new(PING);
        command
            .args(["-c", "1", "-w", &deadline, &self.target])
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout + KILL_GRACE, command.output())
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
            .map_err(|source| ProbeError::Spawn {
                command: PING,
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::Exit {
                command: PING,
                code: output.status.code(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        trace!(%stdout, "ping output");
        parse_rtt(&stdout).ok_or_else(|| ProbeError::Unparsable(stdout.trim().to_string()))
    }
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self) -> Result<f64> {
        Ok(self.ping_once().await?)
    }
}

/// Extract the `time=<ms>` value from `ping` output
fn parse_rtt(output: &str) -> Option<f64> {
    output.lines().find_map(|line| {
        let (_, rest) = line.split_once("time=")?;
        let value = rest.split_whitespace().next()?;
        let value = value.strip_suffix("ms").unwrap_or(value);
        value.parse::<f64>().ok().filter(|ms| ms.is_finite() && *ms >= 0.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_linux_output() {
        let output = "PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.\n\
                      64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=13.4 ms\n\
                      \n\
                      --- 8.8.8.8 ping statistics ---\n\
                      1 packets transmitted, 1 received, 0% packet loss, time 0ms\n\
                      rtt min/avg/max/mdev = 13.412/13.412/13.412/0.000 ms\n";
        assert_eq!(parse_rtt(output), Some(13.4));
    }

    #[test]
    fn test_parse_busybox_output() {
        let output = "64 bytes from 1.1.1.1: seq=0 ttl=57 time=7.981 ms\n";
        assert_eq!(parse_rtt(output), Some(7.981));
    }

    #[test]
    fn test_parse_compact_unit() {
        assert_eq!(parse_rtt("reply from 1.1.1.1: time=12ms"), Some(12.0));
    }

    #[test]
    fn test_parse_without_reply() {
        let output = "PING 10.255.255.1 (10.255.255.1) 56(84) bytes of data.\n\n\
                      --- 10.255.255.1 ping statistics ---\n\
                      1 packets transmitted, 0 received, 100% packet loss, time 0ms\n";
        assert_eq!(parse_rtt(output), None);
        assert_eq!(parse_rtt(""), None);
        assert_eq!(parse_rtt("time=abc ms"), None);
    }

    #[test]
    fn test_timeout_floor() {
        let prober = PingProber::new("9.9.9.9").timeout(Duration::from_millis(10));
        assert_eq!(prober.timeout, Duration::from_secs(1));
        assert_eq!(prober.target(), "9.9.9.9");
    }
}
