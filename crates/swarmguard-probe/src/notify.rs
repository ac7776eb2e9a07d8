//! Desktop alert delivery.

use crate::error::ProbeError;
use async_trait::async_trait;
use std::process::Stdio;
use swarmguard_core::{Notifier, Result};
use tokio::process::Command;
use tracing::warn;

const NOTIFY_SEND: &str = "notify-send";

/// Shows alerts through the freedesktop notification daemon (`notify-send`)
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new("swarmguard")
    }
}

impl DesktopNotifier {
    /// Create a notifier that labels alerts with `app_name`
    #[must_use]
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<()> {
        let status = Command::new(NOTIFY_SEND)
            .args(["--urgency=normal", "--app-name", &self.app_name, title, body])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| ProbeError::Spawn {
                command: NOTIFY_SEND,
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ProbeError::Exit {
                command: NOTIFY_SEND,
                code: status.code(),
            }
            .into())
        }
    }
}

/// Writes alerts to the log only, for headless hosts
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<()> {
        warn!(%title, "{body}");
        Ok(())
    }
}
