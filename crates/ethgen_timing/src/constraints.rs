//! Timing constraint types.

use serde::{Deserialize, Serialize};

/// Clock net of the system clock domain.
pub const SYS_CLK: &str = "sys_clk";
/// Clock net of the PHY receive domain.
pub const ETH_RX_CLK: &str = "eth_rx_clk";
/// Clock net of the PHY transmit domain.
pub const ETH_TX_CLK: &str = "eth_tx_clk";

/// The timing constraints attached to a generated core.
///
/// Entries keep their derivation order; rendering emits them in that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSet {
    /// Period constraints, one per PHY clock.
    pub periods: Vec<PeriodConstraint>,
    /// Clock pairs excluded from timing analysis.
    pub false_paths: Vec<FalsePath>,
}

impl ConstraintSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of constraints.
    pub fn len(&self) -> usize {
        self.periods.len() + self.false_paths.len()
    }

    /// Returns `true` if the set holds no constraint.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the period constraint on the given clock, if any.
    pub fn period(&self, clock: &str) -> Option<&PeriodConstraint> {
        self.periods.iter().find(|p| p.clock == clock)
    }
}

/// A clock period requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodConstraint {
    /// Clock net name.
    pub clock: String,
    /// Period in nanoseconds.
    pub period_ns: f64,
}

impl PeriodConstraint {
    /// Returns the clock frequency in MHz.
    pub fn frequency_mhz(&self) -> f64 {
        if self.period_ns > 0.0 {
            1000.0 / self.period_ns
        } else {
            0.0
        }
    }
}

/// An unordered pair of asynchronous clocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FalsePath {
    /// First clock net.
    pub from: String,
    /// Second clock net.
    pub to: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set() {
        let set = ConstraintSet::new();
        assert!(set.is_empty());
        assert!(set.period(ETH_RX_CLK).is_none());
    }

    #[test]
    fn period_frequency() {
        let p = PeriodConstraint {
            clock: ETH_RX_CLK.into(),
            period_ns: 8.0,
        };
        assert!((p.frequency_mhz() - 125.0).abs() < 1e-9);
    }

    #[test]
    fn serde_roundtrip() {
        let set = ConstraintSet {
            periods: vec![PeriodConstraint {
                clock: ETH_TX_CLK.into(),
                period_ns: 40.0,
            }],
            false_paths: vec![FalsePath {
                from: SYS_CLK.into(),
                to: ETH_TX_CLK.into(),
            }],
        };
        let json = serde_json::to_string(&set).unwrap();
        let back: ConstraintSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
        assert_eq!(back.len(), 2);
    }
}
