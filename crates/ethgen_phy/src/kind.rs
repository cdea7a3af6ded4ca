//! PHY variants and their construction facts.

use ethgen_common::{Frequency, GenError, GenResult, NotFoundKind};
use ethgen_platform::Vendor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A catalog pad family: one clock bundle plus one data bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadFamily {
    /// `mii_eth_clocks` / `mii_eth`.
    Mii,
    /// `rmii_eth_clocks` / `rmii_eth`.
    Rmii,
    /// `gmii_eth_clocks` / `gmii_eth`.
    Gmii,
    /// `rgmii_eth_clocks` / `rgmii_eth`.
    Rgmii,
}

impl PadFamily {
    /// Resolves a family by name (case-insensitive).
    pub fn from_name(name: &str) -> GenResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mii" => Ok(PadFamily::Mii),
            "rmii" => Ok(PadFamily::Rmii),
            "gmii" => Ok(PadFamily::Gmii),
            "rgmii" => Ok(PadFamily::Rgmii),
            _ => Err(GenError::not_found(NotFoundKind::Value, name)),
        }
    }

    /// Name of the clock pad bundle.
    pub fn clock_bundle(self) -> &'static str {
        match self {
            PadFamily::Mii => "mii_eth_clocks",
            PadFamily::Rmii => "rmii_eth_clocks",
            PadFamily::Gmii => "gmii_eth_clocks",
            PadFamily::Rgmii => "rgmii_eth_clocks",
        }
    }

    /// Name of the data pad bundle.
    pub fn data_bundle(self) -> &'static str {
        match self {
            PadFamily::Mii => "mii_eth",
            PadFamily::Rmii => "rmii_eth",
            PadFamily::Gmii => "gmii_eth",
            PadFamily::Rgmii => "rgmii_eth",
        }
    }
}

/// Every PHY variant the generator can instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhyKind {
    /// 10/100 MII.
    Mii,
    /// 10/100 RMII.
    Rmii,
    /// Pure 1000 GMII.
    Gmii,
    /// 10/100/1000 GMII with MII fallback.
    GmiiMii,
    /// RGMII on Spartan-6.
    S6Rgmii,
    /// RGMII on 7-series.
    S7Rgmii,
    /// RGMII on UltraScale.
    UsRgmii,
    /// RGMII on ECP5.
    Ecp5Rgmii,
    /// Behavioral simulation stand-in without physical pads or clocks.
    Model,
}

impl PhyKind {
    /// All variants, in declaration order.
    pub const ALL: [PhyKind; 9] = [
        PhyKind::Mii,
        PhyKind::Rmii,
        PhyKind::Gmii,
        PhyKind::GmiiMii,
        PhyKind::S6Rgmii,
        PhyKind::S7Rgmii,
        PhyKind::UsRgmii,
        PhyKind::Ecp5Rgmii,
        PhyKind::Model,
    ];

    /// Resolves a PHY by its configuration name.
    ///
    /// Accepts the short names (`mii`, `gmii_mii`, `s7rgmii`, ...) and the
    /// legacy class names (`LiteEthPHYMII`, `LiteEthS7PHYRGMII`, ...),
    /// case-insensitively.
    pub fn from_name(name: &str) -> GenResult<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let short = lower
            .strip_prefix("liteeth")
            .map(|rest| rest.replacen("phy", "", 1))
            .unwrap_or(lower);
        match short.as_str() {
            "mii" => Ok(PhyKind::Mii),
            "rmii" => Ok(PhyKind::Rmii),
            "gmii" => Ok(PhyKind::Gmii),
            "gmii_mii" | "gmiimii" => Ok(PhyKind::GmiiMii),
            "s6rgmii" => Ok(PhyKind::S6Rgmii),
            "s7rgmii" => Ok(PhyKind::S7Rgmii),
            "usrgmii" => Ok(PhyKind::UsRgmii),
            "ecp5rgmii" => Ok(PhyKind::Ecp5Rgmii),
            "model" => Ok(PhyKind::Model),
            _ => Err(GenError::not_found(NotFoundKind::Phy, name)),
        }
    }

    /// Returns the canonical configuration name.
    pub fn name(self) -> &'static str {
        match self {
            PhyKind::Mii => "mii",
            PhyKind::Rmii => "rmii",
            PhyKind::Gmii => "gmii",
            PhyKind::GmiiMii => "gmii_mii",
            PhyKind::S6Rgmii => "s6rgmii",
            PhyKind::S7Rgmii => "s7rgmii",
            PhyKind::UsRgmii => "usrgmii",
            PhyKind::Ecp5Rgmii => "ecp5rgmii",
            PhyKind::Model => "model",
        }
    }

    /// The catalog pad family this PHY is built on; `None` for the model.
    pub fn family(self) -> Option<PadFamily> {
        match self {
            PhyKind::Mii => Some(PadFamily::Mii),
            PhyKind::Rmii => Some(PadFamily::Rmii),
            PhyKind::Gmii | PhyKind::GmiiMii => Some(PadFamily::Gmii),
            PhyKind::S6Rgmii | PhyKind::S7Rgmii | PhyKind::UsRgmii | PhyKind::Ecp5Rgmii => {
                Some(PadFamily::Rgmii)
            }
            PhyKind::Model => None,
        }
    }

    /// Receive clock frequency; `None` when there is no physical clock.
    pub fn rx_clk_freq(self) -> Option<Frequency> {
        self.line_clock()
    }

    /// Transmit clock frequency; `None` when there is no physical clock.
    pub fn tx_clk_freq(self) -> Option<Frequency> {
        self.line_clock()
    }

    fn line_clock(self) -> Option<Frequency> {
        match self {
            PhyKind::Mii => Some(Frequency::from_hz(25_000_000)),
            PhyKind::Rmii => Some(Frequency::from_hz(50_000_000)),
            PhyKind::Gmii
            | PhyKind::GmiiMii
            | PhyKind::S6Rgmii
            | PhyKind::S7Rgmii
            | PhyKind::UsRgmii
            | PhyKind::Ecp5Rgmii => Some(Frequency::from_hz(125_000_000)),
            PhyKind::Model => None,
        }
    }

    /// Width of the PHY's internal data stream in bits.
    pub fn data_width(self) -> u32 {
        8
    }

    /// The vendor this PHY is tied to, if it uses vendor I/O primitives.
    pub fn vendor(self) -> Option<Vendor> {
        match self {
            PhyKind::S6Rgmii | PhyKind::S7Rgmii | PhyKind::UsRgmii => Some(Vendor::Xilinx),
            PhyKind::Ecp5Rgmii => Some(Vendor::Lattice),
            _ => None,
        }
    }

    /// Whether the PHY consumes `phy_tx_delay` / `phy_rx_delay`.
    pub fn uses_delays(self) -> bool {
        self.family() == Some(PadFamily::Rgmii)
    }

    /// Whether the PHY needs the system clock frequency for its dividers.
    pub fn needs_clk_freq(self) -> bool {
        self == PhyKind::GmiiMii
    }

    /// Whether the PHY exposes control/status registers.
    pub fn has_csrs(self) -> bool {
        !self.is_model()
    }

    /// Whether this is the behavioral simulation stand-in.
    pub fn is_model(self) -> bool {
        self == PhyKind::Model
    }
}

impl fmt::Display for PhyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
