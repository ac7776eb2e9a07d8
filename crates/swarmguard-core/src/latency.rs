//! Rolling latency average fed by one echo probe per tick.

use crate::gateway::Prober;
use std::collections::VecDeque;
use tracing::debug;

/// Default number of samples averaged
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Bounded FIFO of round-trip samples in milliseconds
#[derive(Debug, Clone)]
pub struct LatencyWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl Default for LatencyWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl LatencyWindow {
    /// Create a window holding at most `capacity` samples (minimum 1)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one past capacity
    pub fn push(&mut self, sample_ms: f64) {
        self.samples.push_back(sample_ms);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Drop every sample
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Arithmetic mean of the current samples, `None` when empty
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let len = self.samples.len() as f64;
        Some(self.samples.iter().sum::<f64>() / len)
    }

    /// Number of samples held
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if no sample is held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples held
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Issues probes and keeps the rolling window up to date
#[derive(Debug, Clone, Default)]
pub struct LatencySampler {
    window: LatencyWindow,
}

impl LatencySampler {
    /// Create a sampler averaging over `window_size` samples
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        Self {
            window: LatencyWindow::new(window_size),
        }
    }

    /// Probe once and return the updated average
    ///
    /// A failed probe clears the window: lost connectivity invalidates the
    /// trend, so no average is reported until fresh samples arrive.
    pub async fn sample(&mut self, prober: &dyn Prober) -> Option<f64> {
        match prober.probe().await {
            Ok(rtt_ms) => self.record(Some(rtt_ms)),
            Err(e) => {
                debug!(error = %e, "latency probe failed");
                self.record(None)
            }
        }
    }

    /// Fold one probe outcome into the window
    pub fn record(&mut self, sample_ms: Option<f64>) -> Option<f64> {
        match sample_ms {
            Some(ms) if ms.is_finite() => {
                self.window.push(ms);
                self.window.average()
            }
            _ => {
                self.window.clear();
                None
            }
        }
    }

    /// The underlying window
    #[must_use]
    pub const fn window(&self) -> &LatencyWindow {
        &self.window
    }
}
