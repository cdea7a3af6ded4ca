//! Typed configuration produced by the loader.

use ethgen_common::{Frequency, GenError, GenResult, MacAddress, NotFoundKind};
use ethgen_phy::{PadFamily, PhyKind};
use ethgen_platform::{Platform, SocMaps};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;

/// A fully validated core configuration.
///
/// Every value has been normalized and checked against the others (vendor vs.
/// toolchain, RGMII variant vs. vendor, core kind vs. its required keys).
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    /// System clock frequency.
    pub clk_freq: Frequency,
    /// Vendor, device and toolchain.
    pub platform: Platform,
    /// How the PHY is chosen.
    pub phy: PhySelection,
    /// RGMII clock skew; `None` for every PHY that does not take one.
    pub phy_delays: Option<PhyDelays>,
    /// The core built on top of the PHY.
    pub core: CoreSettings,
    /// Base SoC arguments and map overrides.
    pub soc: SocOptions,
}

/// How the PHY variant is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhySelection {
    /// The configured PHY, built on its own catalog pads.
    Explicit(PhyKind),
    /// Inferred from the shape of the named catalog pad family.
    Auto(PadFamily),
}

impl PhySelection {
    /// The explicit kind, if any.
    pub fn explicit(self) -> Option<PhyKind> {
        match self {
            PhySelection::Explicit(kind) => Some(kind),
            PhySelection::Auto(_) => None,
        }
    }

    /// The catalog pad family to request; `None` for the simulation model.
    pub fn pad_family(self) -> Option<PadFamily> {
        match self {
            PhySelection::Explicit(kind) => kind.family(),
            PhySelection::Auto(family) => Some(family),
        }
    }
}

/// RGMII transmit/receive clock skew in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhyDelays {
    /// Transmit clock delay.
    pub tx_ns: u32,
    /// Receive clock delay.
    pub rx_ns: u32,
}

impl PhyDelays {
    /// Delay applied when none is configured.
    pub const DEFAULT_NS: u32 = 2;
}

impl Default for PhyDelays {
    fn default() -> Self {
        Self {
            tx_ns: Self::DEFAULT_NS,
            rx_ns: Self::DEFAULT_NS,
        }
    }
}

/// Which core is built on top of the PHY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreKind {
    /// Bus-attached MAC with slot buffers.
    Mac,
    /// Hardware UDP/IP stack with streaming ports.
    Udp,
}

impl CoreKind {
    /// Resolves a core kind by name; `wishbone` is accepted for the MAC.
    pub fn from_name(name: &str) -> GenResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mac" | "wishbone" => Ok(CoreKind::Mac),
            "udp" => Ok(CoreKind::Udp),
            _ => Err(GenError::not_found(NotFoundKind::Core, name)),
        }
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            CoreKind::Mac => "mac",
            CoreKind::Udp => "udp",
        }
    }
}

impl fmt::Display for CoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte order of the MAC's bus-facing buffers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Network byte order.
    #[default]
    Big,
    /// Little-endian.
    Little,
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Endianness::Big => "big",
            Endianness::Little => "little",
        })
    }
}

/// Core-specific settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreSettings {
    /// MAC core.
    Mac(MacSettings),
    /// UDP/IP core.
    Udp(UdpSettings),
}

impl CoreSettings {
    /// The kind of core these settings describe.
    pub fn kind(&self) -> CoreKind {
        match self {
            CoreSettings::Mac(_) => CoreKind::Mac,
            CoreSettings::Udp(_) => CoreKind::Udp,
        }
    }
}

/// Settings of the bus-attached MAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacSettings {
    /// Receive slot count.
    pub nrxslots: u32,
    /// Transmit slot count.
    pub ntxslots: u32,
    /// Whether the slot memories use full-width write enables.
    pub full_memory_we: bool,
    /// Buffer byte order.
    pub endianness: Endianness,
}

impl MacSettings {
    /// Slot count used for either direction when not configured.
    pub const DEFAULT_SLOTS: u32 = 2;
}

impl Default for MacSettings {
    fn default() -> Self {
        Self {
            nrxslots: Self::DEFAULT_SLOTS,
            ntxslots: Self::DEFAULT_SLOTS,
            full_memory_we: false,
            endianness: Endianness::Big,
        }
    }
}

/// Settings of the UDP/IP core.
///
/// An absent address is sourced from the `mac_address` / `ip_address` pads at
/// run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdpSettings {
    /// Literal MAC address.
    pub mac_address: Option<MacAddress>,
    /// Literal IPv4 address.
    pub ip_address: Option<Ipv4Addr>,
    /// The UDP port bound on the crossbar.
    pub port: u16,
}

/// Base SoC construction arguments and map overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocOptions {
    /// Arguments forwarded verbatim.
    pub args: BTreeMap<String, toml::Value>,
    /// Entries merged over the default maps.
    pub maps: SocMaps,
}
