//! FPGA vendors, their toolchains, and the platform descriptor.

use ethgen_common::{GenError, GenResult, NotFoundKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// FPGA vendors the generator can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// Lattice Semiconductor (ECP5 and friends).
    Lattice,
    /// Xilinx (AMD) 6-series, 7-series and UltraScale.
    Xilinx,
}

impl Vendor {
    /// Resolves a vendor by its configuration name (case-insensitive).
    pub fn from_name(name: &str) -> GenResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "lattice" => Ok(Vendor::Lattice),
            "xilinx" | "amd" => Ok(Vendor::Xilinx),
            _ => Err(GenError::not_found(NotFoundKind::Vendor, name)),
        }
    }

    /// Returns the canonical configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Vendor::Lattice => "lattice",
            Vendor::Xilinx => "xilinx",
        }
    }

    /// Returns the toolchain used when the configuration names none.
    pub fn default_toolchain(self) -> Toolchain {
        match self {
            Vendor::Lattice => Toolchain::Diamond,
            Vendor::Xilinx => Toolchain::Vivado,
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Vendor toolchains the generated constraints can be written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toolchain {
    /// Lattice Diamond.
    Diamond,
    /// Yosys + nextpnr-ecp5 (Project Trellis).
    Trellis,
    /// Lattice Radiant.
    Radiant,
    /// Xilinx Vivado.
    Vivado,
    /// F4PGA / SymbiFlow.
    Symbiflow,
}

impl Toolchain {
    /// Resolves a toolchain by name (case-insensitive).
    pub fn from_name(name: &str) -> GenResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "diamond" => Ok(Toolchain::Diamond),
            "trellis" | "nextpnr" => Ok(Toolchain::Trellis),
            "radiant" => Ok(Toolchain::Radiant),
            "vivado" => Ok(Toolchain::Vivado),
            "symbiflow" | "f4pga" => Ok(Toolchain::Symbiflow),
            _ => Err(GenError::not_found(NotFoundKind::Toolchain, name)),
        }
    }

    /// Returns the canonical toolchain name.
    pub fn name(self) -> &'static str {
        match self {
            Toolchain::Diamond => "diamond",
            Toolchain::Trellis => "trellis",
            Toolchain::Radiant => "radiant",
            Toolchain::Vivado => "vivado",
            Toolchain::Symbiflow => "symbiflow",
        }
    }

    /// Returns the vendor whose devices this toolchain builds for.
    pub fn vendor(self) -> Vendor {
        match self {
            Toolchain::Diamond | Toolchain::Trellis | Toolchain::Radiant => Vendor::Lattice,
            Toolchain::Vivado | Toolchain::Symbiflow => Vendor::Xilinx,
        }
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The target platform a core is generated for.
///
/// The device may be empty: a standalone core is frequently generated before
/// the exact part is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// The FPGA vendor.
    pub vendor: Vendor,
    /// The full part number, possibly empty.
    pub device: String,
    /// The toolchain the constraint file is written for.
    pub toolchain: Toolchain,
}

impl Platform {
    /// Creates a platform, checking that the toolchain belongs to the vendor.
    pub fn new(vendor: Vendor, device: impl Into<String>, toolchain: Toolchain) -> GenResult<Self> {
        if toolchain.vendor() != vendor {
            return Err(GenError::config(
                "toolchain",
                format!("toolchain '{toolchain}' does not build {vendor} devices"),
            ));
        }
        Ok(Self {
            vendor,
            device: device.into(),
            toolchain,
        })
    }
}
