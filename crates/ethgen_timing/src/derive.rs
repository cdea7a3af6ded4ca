//! Constraint derivation from the selected PHY.

use crate::constraints::{ConstraintSet, FalsePath, PeriodConstraint, ETH_RX_CLK, ETH_TX_CLK, SYS_CLK};
use ethgen_phy::PhyKind;
use tracing::debug;

/// Derives the constraint set for a PHY.
///
/// Yields the receive and transmit clock periods followed by the false paths
/// between the system clock and each of them. A PHY without physical clocks
/// (the simulation model) yields an empty set.
pub fn derive(phy: PhyKind) -> ConstraintSet {
    let (Some(rx), Some(tx)) = (phy.rx_clk_freq(), phy.tx_clk_freq()) else {
        debug!(phy = %phy, "no physical clocks, constraints skipped");
        return ConstraintSet::new();
    };

    let set = ConstraintSet {
        periods: vec![
            PeriodConstraint {
                clock: ETH_RX_CLK.to_string(),
                period_ns: rx.period_ns(),
            },
            PeriodConstraint {
                clock: ETH_TX_CLK.to_string(),
                period_ns: tx.period_ns(),
            },
        ],
        false_paths: [ETH_RX_CLK, ETH_TX_CLK]
            .into_iter()
            .map(|clk| FalsePath {
                from: SYS_CLK.to_string(),
                to: clk.to_string(),
            })
            .collect(),
    };
    debug!(phy = %phy, constraints = set.len(), "constraints derived");
    set
}
