//! Base SoC context: platform, system clock, bus and register maps.

use crate::bus::{BusAddressMap, CsrSpace};
use crate::region::Region;
use crate::vendor::Platform;
use ethgen_common::{Frequency, GenError, GenResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Named overrides for the SoC's CSR, interrupt and memory maps.
///
/// Entries are merged over the built-in defaults (an entry for an existing
/// name replaces it) rather than replacing whole maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocMaps {
    /// Component name → CSR page location.
    pub csr_map: BTreeMap<String, u32>,
    /// Component name → interrupt number.
    pub interrupt_map: BTreeMap<String, u32>,
    /// Region name → bus origin.
    pub mem_map: BTreeMap<String, u64>,
}

impl SocMaps {
    /// The maps every SoC starts from.
    pub fn defaults() -> Self {
        Self {
            csr_map: BTreeMap::new(),
            interrupt_map: BTreeMap::new(),
            mem_map: BTreeMap::from([("csr".to_string(), CsrSpace::DEFAULT_BASE)]),
        }
    }

    /// Merges `other` into `self`, entry by entry.
    pub fn update(&mut self, other: &SocMaps) {
        self.csr_map
            .extend(other.csr_map.iter().map(|(k, v)| (k.clone(), *v)));
        self.interrupt_map
            .extend(other.interrupt_map.iter().map(|(k, v)| (k.clone(), *v)));
        self.mem_map
            .extend(other.mem_map.iter().map(|(k, v)| (k.clone(), *v)));
    }
}

/// The base SoC a core is composed into.
///
/// Owns the bus address map and CSR window for one build. Forwarded
/// construction arguments are kept verbatim; the few the generator itself
/// understands (`bus_address_width`, `csr_paging`, `csr_address_width`)
/// shape the bus.
#[derive(Debug, Clone)]
pub struct SocContext {
    /// Target platform.
    pub platform: Platform,
    /// System clock frequency.
    pub clk_freq: Frequency,
    /// Construction arguments forwarded from the configuration.
    pub args: BTreeMap<String, toml::Value>,
    /// Merged maps.
    pub maps: SocMaps,
    /// Bus slave placement.
    pub bus: BusAddressMap,
    /// CSR pages.
    pub csr: CsrSpace,
}

impl SocContext {
    /// Builds the base SoC.
    ///
    /// The CSR window is reserved on the bus at `mem_map["csr"]` before any
    /// slave is added.
    pub fn new(
        platform: Platform,
        clk_freq: Frequency,
        args: BTreeMap<String, toml::Value>,
        overrides: &SocMaps,
    ) -> GenResult<Self> {
        let mut maps = SocMaps::defaults();
        maps.update(overrides);

        let address_width = int_arg(&args, "bus_address_width")?
            .unwrap_or(u64::from(BusAddressMap::DEFAULT_ADDRESS_WIDTH));
        if !(1..=64).contains(&address_width) {
            return Err(GenError::config(
                "soc.bus_address_width",
                format!("{address_width} is not a valid address width"),
            ));
        }
        let paging = int_arg(&args, "csr_paging")?.unwrap_or(CsrSpace::DEFAULT_PAGING);
        if paging == 0 || !paging.is_power_of_two() {
            return Err(GenError::config(
                "soc.csr_paging",
                format!("{paging:#x} is not a power of two"),
            ));
        }
        let n_locations = match int_arg(&args, "csr_address_width")? {
            // Address width counts 32-bit words.
            Some(aw) if aw < 48 => u32::try_from(((1u64 << aw) * 4) / paging).unwrap_or(u32::MAX),
            Some(aw) => {
                return Err(GenError::config(
                    "soc.csr_address_width",
                    format!("{aw} is too wide"),
                ))
            }
            None => CsrSpace::DEFAULT_LOCATIONS,
        };

        let csr_base = maps
            .mem_map
            .get("csr")
            .copied()
            .unwrap_or(CsrSpace::DEFAULT_BASE);
        let csr = CsrSpace::new(csr_base, paging, n_locations, maps.csr_map.clone())?;

        let mut bus = BusAddressMap::new(address_width as u32);
        bus.add_slave(
            "csr",
            Region {
                origin: Some(csr_base),
                size: csr.size(),
                cached: false,
            },
        )?;

        debug!(
            vendor = %platform.vendor,
            toolchain = %platform.toolchain,
            clk_freq = %clk_freq,
            "base SoC created"
        );
        Ok(Self {
            platform,
            clk_freq,
            args,
            maps,
            bus,
            csr,
        })
    }

    /// Returns the fixed origin configured for a region, if any.
    pub fn mem_origin(&self, name: &str) -> Option<u64> {
        self.maps.mem_map.get(name).copied()
    }

    /// Returns the interrupt number mapped to a component, if any.
    pub fn interrupt(&self, name: &str) -> Option<u32> {
        self.maps.interrupt_map.get(name).copied()
    }
}

fn int_arg(args: &BTreeMap<String, toml::Value>, name: &str) -> GenResult<Option<u64>> {
    match args.get(name) {
        None => Ok(None),
        Some(toml::Value::Integer(v)) if *v >= 0 => Ok(Some(*v as u64)),
        Some(other) => Err(GenError::config(
            format!("soc.{name}"),
            format!("expected a non-negative integer, found {other}"),
        )),
    }
}
