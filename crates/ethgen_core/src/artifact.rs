//! The composed core and its exports.

use crate::graph::CoreGraph;
use ethgen_config::CoreKind;
use ethgen_phy::PhyKind;
use ethgen_platform::{BusAddressMap, CsrSpace, Platform};
use ethgen_timing::{render, ConstraintFormat, ConstraintSet};
use serde::Serialize;
use std::collections::BTreeMap;

/// Bus placement, register pages and interrupt numbers of a composed core.
#[derive(Debug, Clone, Serialize)]
pub struct AddressMap {
    /// Bus slaves, including the register window.
    pub bus: BusAddressMap,
    /// Register pages.
    pub csr: CsrSpace,
    /// Interrupt numbers by component name.
    pub interrupts: BTreeMap<String, u32>,
}

/// A composed core.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    /// The target platform.
    pub platform: Platform,
    /// The PHY that was built.
    pub phy: PhyKind,
    /// The core built on top of it.
    pub core: CoreKind,
    /// Components, pads and connections.
    pub graph: CoreGraph,
    /// Bus and register layout.
    pub address_map: AddressMap,
    /// Timing constraints; empty for the simulation model.
    pub constraints: ConstraintSet,
}

impl Artifact {
    /// Serializes the artifact as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Names of all requested pad bundles, in request order.
    pub fn requested_pads(&self) -> Vec<&str> {
        self.graph.pads().map(|p| p.name.as_str()).collect()
    }

    /// The constraint dialect of the target toolchain.
    pub fn constraint_format(&self) -> ConstraintFormat {
        ConstraintFormat::for_toolchain(self.platform.toolchain)
    }

    /// Renders the timing constraints for the target toolchain.
    pub fn constraint_file(&self) -> String {
        render(&self.constraints, self.constraint_format())
    }

    /// Lists register pages, interrupts and memory regions as CSV.
    ///
    /// One row per entry, `kind,name,value,size,mode`; unused columns are
    /// left empty.
    pub fn csr_csv(&self) -> String {
        let mut rows = Vec::new();
        for r in self.address_map.csr.regions() {
            rows.push(format!("csr_base,{},{:#010x},,", r.name, r.origin));
        }
        for (name, irq) in &self.address_map.interrupts {
            rows.push(format!("constant,{name}_interrupt,{irq},,"));
        }
        for r in self.address_map.bus.regions() {
            let mode = if r.cached { "cached" } else { "io" };
            rows.push(format!(
                "memory_region,{},{:#010x},{},{mode}",
                r.name, r.origin, r.size
            ));
        }
        let mut out = rows.join("\n");
        out.push('\n');
        out
    }
}
