//! Hysteresis decision for entering and leaving restricted mode.
//!
//! The controller keeps no notion of its own state. Whether restriction is
//! active comes from the daemon each tick ([`Observation::filter_active`]);
//! the decision only says which corrective action, if any, to take.

use std::fmt;

/// Default latency above which restriction is entered
pub const DEFAULT_LIMIT_THRESHOLD_MS: f64 = 40.0;
/// Default latency below which restriction may be lifted
pub const DEFAULT_UNLIMIT_THRESHOLD_MS: f64 = 30.0;
/// Default connected-peer ceiling
pub const DEFAULT_MAX_PEERS: usize = 800;

/// Enter/exit thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Enter restriction when the average rises above this
    pub limit_ms: f64,
    /// Leave restriction only when the average falls below this
    pub unlimit_ms: f64,
    /// Enter restriction when the peer count rises above this
    pub max_peers: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            limit_ms: DEFAULT_LIMIT_THRESHOLD_MS,
            unlimit_ms: DEFAULT_UNLIMIT_THRESHOLD_MS,
            max_peers: DEFAULT_MAX_PEERS,
        }
    }
}

/// Signals gathered during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Rolling average latency, `None` while connectivity is unknown
    pub average_ms: Option<f64>,
    /// Connected-peer count
    pub peers: usize,
    /// Whether the daemon's filter set equals the strict filter set
    pub filter_active: bool,
}

/// Corrective action for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Install the strict filter set
    Restrict,
    /// Drop the strict filter set, keeping only deny-list entries
    Unrestrict,
    /// Leave the daemon as it is
    Hold,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Restrict => write!(f, "restrict"),
            Self::Unrestrict => write!(f, "unrestrict"),
            Self::Hold => write!(f, "hold"),
        }
    }
}

impl Thresholds {
    /// Returns true if the enter threshold sits strictly above the exit one
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.unlimit_ms < self.limit_ms
    }

    /// Decide the action for an observation
    ///
    /// Peer pressure alone can start a restriction but never ends one:
    /// leaving always needs a confirmed low average.
    #[must_use]
    pub fn decide(&self, observation: &Observation) -> Decision {
        let Observation {
            average_ms,
            peers,
            filter_active,
        } = *observation;

        if filter_active {
            let latency_low = average_ms.is_some_and(|avg| avg < self.unlimit_ms);
            if latency_low && peers < self.max_peers {
                return Decision::Unrestrict;
            }
        } else {
            let latency_high = average_ms.is_some_and(|avg| avg > self.limit_ms);
            if peers > self.max_peers || latency_high {
                return Decision::Restrict;
            }
        }
        Decision::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(average_ms: Option<f64>, peers: usize, filter_active: bool) -> Observation {
        Observation {
            average_ms,
            peers,
            filter_active,
        }
    }

    /// Feeds averages through the decision, tracking the daemon state the
    /// way a cooperative daemon would.
    fn run(thresholds: &Thresholds, averages: &[Option<f64>], peers: usize) -> Vec<bool> {
        let mut active = false;
        averages
            .iter()
            .map(|avg| {
                match thresholds.decide(&obs(*avg, peers, active)) {
                    Decision::Restrict => active = true,
                    Decision::Unrestrict => active = false,
                    Decision::Hold => {}
                }
                active
            })
            .collect()
    }

    #[test]
    fn test_hysteresis_sequence() {
        let t = Thresholds::default();
        let states = run(&t, &[Some(50.0), Some(50.0), Some(35.0), Some(25.0)], 10);
        assert_eq!(states, vec![true, true, true, false]);
    }

    #[test]
    fn test_band_holds_in_both_states() {
        let t = Thresholds::default();
        assert_eq!(t.decide(&obs(Some(35.0), 10, false)), Decision::Hold);
        assert_eq!(t.decide(&obs(Some(35.0), 10, true)), Decision::Hold);
        assert_eq!(t.decide(&obs(Some(40.0), 10, false)), Decision::Hold);
        assert_eq!(t.decide(&obs(Some(30.0), 10, true)), Decision::Hold);
    }

    #[test]
    fn test_peer_count_only_enters() {
        let t = Thresholds::default();
        assert_eq!(t.decide(&obs(None, 801, false)), Decision::Restrict);
        assert_eq!(t.decide(&obs(Some(5.0), 801, false)), Decision::Restrict);
        assert_eq!(t.decide(&obs(None, 799, true)), Decision::Hold);
        assert_eq!(t.decide(&obs(Some(5.0), 799, true)), Decision::Unrestrict);
    }

    #[test]
    fn test_peer_ceiling_blocks_exit() {
        let t = Thresholds::default();
        assert_eq!(t.decide(&obs(Some(5.0), 800, true)), Decision::Hold);
        assert_eq!(t.decide(&obs(Some(5.0), 900, true)), Decision::Hold);
        // Exactly at the ceiling does not trigger entry either.
        assert_eq!(t.decide(&obs(Some(5.0), 800, false)), Decision::Hold);
    }

    #[test]
    fn test_unknown_latency_never_exits() {
        let t = Thresholds::default();
        let states = run(&t, &[Some(90.0), None, None, Some(10.0)], 0);
        assert_eq!(states, vec![true, true, true, false]);
    }

    #[test]
    fn test_consistency() {
        assert!(Thresholds::default().is_consistent());
        let inverted = Thresholds {
            limit_ms: 20.0,
            unlimit_ms: 30.0,
            max_peers: 10,
        };
        assert!(!inverted.is_consistent());
    }
}
