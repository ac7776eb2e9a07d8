//! Edge-triggered high-latency alerting.

/// Default latency above which the user is alerted
pub const DEFAULT_NOTIFY_THRESHOLD_MS: f64 = 300.0;

/// Allows one alert per contiguous high-latency episode
#[derive(Debug, Clone, Copy)]
pub struct NotificationThrottle {
    threshold_ms: f64,
    notified: bool,
}

impl Default for NotificationThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFY_THRESHOLD_MS)
    }
}

impl NotificationThrottle {
    /// Create a throttle for the given threshold
    #[must_use]
    pub const fn new(threshold_ms: f64) -> Self {
        Self {
            threshold_ms,
            notified: false,
        }
    }

    /// Feed one tick's average; returns true when an alert should go out
    ///
    /// The flag re-arms as soon as the average is at or below the threshold
    /// or unavailable.
    pub fn observe(&mut self, average_ms: Option<f64>) -> bool {
        match average_ms {
            Some(avg) if avg > self.threshold_ms => {
                let fire = !self.notified;
                self.notified = true;
                fire
            }
            _ => {
                self.notified = false;
                false
            }
        }
    }

    /// Whether an alert has already gone out for the current episode
    #[must_use]
    pub const fn is_suppressed(&self) -> bool {
        self.notified
    }

    /// Alert threshold in milliseconds
    #[must_use]
    pub const fn threshold_ms(&self) -> f64 {
        self.threshold_ms
    }
}
