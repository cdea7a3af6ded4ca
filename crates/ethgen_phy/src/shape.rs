//! Required pad shapes per PHY variant.

use crate::kind::PhyKind;
use ethgen_common::{GenError, GenResult};
use ethgen_platform::PortBundle;

/// A signal a PHY needs on one of its bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalReq {
    /// Signal name.
    pub name: &'static str,
    /// Exact width in bits.
    pub width: u32,
}

const fn req(name: &'static str, width: u32) -> SignalReq {
    SignalReq { name, width }
}

const MII_CLOCKS: &[SignalReq] = &[req("tx", 1), req("rx", 1)];
const MII_DATA: &[SignalReq] = &[
    req("rst_n", 1),
    req("mdio", 1),
    req("mdc", 1),
    req("rx_dv", 1),
    req("rx_er", 1),
    req("rx_data", 4),
    req("tx_en", 1),
    req("tx_data", 4),
    req("col", 1),
    req("crs", 1),
];
const RMII_CLOCKS: &[SignalReq] = &[req("ref_clk", 1)];
const RMII_DATA: &[SignalReq] = &[
    req("rst_n", 1),
    req("rx_data", 2),
    req("crs_dv", 1),
    req("tx_en", 1),
    req("tx_data", 2),
    req("mdc", 1),
    req("mdio", 1),
];
// Pure GMII runs without the MII transmit clock.
const GMII_CLOCKS: &[SignalReq] = &[req("gtx", 1), req("rx", 1)];
const GMII_MII_CLOCKS: &[SignalReq] = &[req("tx", 1), req("gtx", 1), req("rx", 1)];
const GMII_DATA: &[SignalReq] = &[
    req("rst_n", 1),
    req("int_n", 1),
    req("mdio", 1),
    req("mdc", 1),
    req("rx_dv", 1),
    req("rx_er", 1),
    req("rx_data", 8),
    req("tx_en", 1),
    req("tx_er", 1),
    req("tx_data", 8),
    req("col", 1),
    req("crs", 1),
];
const RGMII_CLOCKS: &[SignalReq] = &[req("tx", 1), req("rx", 1)];
const RGMII_DATA: &[SignalReq] = &[
    req("rst_n", 1),
    req("int_n", 1),
    req("mdio", 1),
    req("mdc", 1),
    req("rx_ctl", 1),
    req("rx_data", 4),
    req("tx_ctl", 1),
    req("tx_data", 4),
];

impl PhyKind {
    /// Signals the PHY needs on its clock bundle.
    pub fn clock_requirements(self) -> &'static [SignalReq] {
        match self {
            PhyKind::Mii => MII_CLOCKS,
            PhyKind::Rmii => RMII_CLOCKS,
            PhyKind::Gmii => GMII_CLOCKS,
            PhyKind::GmiiMii => GMII_MII_CLOCKS,
            PhyKind::S6Rgmii | PhyKind::S7Rgmii | PhyKind::UsRgmii | PhyKind::Ecp5Rgmii => {
                RGMII_CLOCKS
            }
            PhyKind::Model => &[],
        }
    }

    /// Signals the PHY needs on its data bundle.
    pub fn pad_requirements(self) -> &'static [SignalReq] {
        match self {
            PhyKind::Mii => MII_DATA,
            PhyKind::Rmii => RMII_DATA,
            PhyKind::Gmii | PhyKind::GmiiMii => GMII_DATA,
            PhyKind::S6Rgmii | PhyKind::S7Rgmii | PhyKind::UsRgmii | PhyKind::Ecp5Rgmii => {
                RGMII_DATA
            }
            PhyKind::Model => &[],
        }
    }
}

/// Checks that the supplied bundles carry every signal `kind` needs, at the
/// exact width.
///
/// The data bundle must match the full catalog shape of the PHY's family,
/// management and status signals included. Extra signals are allowed.
pub fn validate_shape(
    kind: PhyKind,
    clock_pads: &PortBundle,
    pads: &PortBundle,
) -> GenResult<()> {
    check(kind, "clock", clock_pads, kind.clock_requirements())?;
    check(kind, "data", pads, kind.pad_requirements())
}

fn check(kind: PhyKind, role: &str, bundle: &PortBundle, reqs: &[SignalReq]) -> GenResult<()> {
    for r in reqs {
        match bundle.width(r.name) {
            Some(w) if w == r.width => {}
            Some(w) => {
                return Err(GenError::config(
                    "phy",
                    format!(
                        "{kind} needs {role} signal `{}` of width {}, `{}` has width {w}",
                        r.name, r.width, bundle.name
                    ),
                ))
            }
            None => {
                return Err(GenError::config(
                    "phy",
                    format!(
                        "{kind} needs {role} signal `{}`, missing from `{}`",
                        r.name, bundle.name
                    ),
                ))
            }
        }
    }
    Ok(())
}
