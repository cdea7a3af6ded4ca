//! Instantiated components of a generated core.
//!
//! A [`Component`] is one hardware unit (clock/reset generator, PHY, MAC,
//! UDP/IP core, UDP port) described only through its construction contract:
//! parameters, ports, the clock domains it owns and, for bus slaves, its
//! placed region and register page.

use ethgen_common::Frequency;
use ethgen_phy::PhyKind;
use ethgen_platform::{CsrRegion, Direction, PlacedRegion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// What a component is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Clock and reset generator.
    Crg,
    /// Physical-layer adapter.
    Phy(PhyKind),
    /// Media access controller with bus-mapped slot buffers.
    Mac,
    /// Hardware UDP/IP stack.
    UdpIpCore,
    /// A port bound on the UDP crossbar.
    UdpPort,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Crg => f.write_str("crg"),
            ComponentKind::Phy(kind) => write!(f, "phy({kind})"),
            ComponentKind::Mac => f.write_str("mac"),
            ComponentKind::UdpIpCore => f.write_str("udp_ip_core"),
            ComponentKind::UdpPort => f.write_str("udp_port"),
        }
    }
}

/// A resolved construction parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// An integer.
    Int(u64),
    /// A boolean.
    Bool(bool),
    /// A string.
    Str(String),
}

impl ParamValue {
    /// Returns the integer value, if this is one.
    pub fn as_int(&self) -> Option<u64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string value, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(u64::from(v))
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

/// A port on a component boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentPort {
    /// Port name, unique within the component.
    pub name: String,
    /// Width in bits.
    pub width: u32,
    /// Direction relative to the component.
    pub direction: Direction,
}

/// A clock domain owned by a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockDomain {
    /// Domain name (`sys`, `eth_rx`, `eth_tx`).
    pub name: String,
    /// Clock net driving the domain.
    pub clock: String,
    /// Nominal frequency; `None` when the clock is not physical.
    pub frequency: Option<Frequency>,
}

impl ClockDomain {
    /// Creates a domain whose clock net is `<name>_clk`.
    pub fn new(name: &str, frequency: Option<Frequency>) -> Self {
        Self {
            name: name.to_string(),
            clock: format!("{name}_clk"),
            frequency,
        }
    }
}

/// An instantiated unit of the generated core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Instance name, unique within the core.
    pub name: String,
    /// What the component is.
    pub kind: ComponentKind,
    /// Construction parameters.
    pub params: BTreeMap<String, ParamValue>,
    /// Boundary ports.
    pub ports: Vec<ComponentPort>,
    /// Clock domains created by this component.
    pub clock_domains: Vec<ClockDomain>,
    /// Bus region, for bus slaves.
    pub region: Option<PlacedRegion>,
    /// Register page, for components exposing registers.
    pub csr: Option<CsrRegion>,
    /// Interrupt number, when one is mapped.
    pub irq: Option<u32>,
}

impl Component {
    /// Creates a component with no parameters or ports.
    pub fn new(name: &str, kind: ComponentKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            params: BTreeMap::new(),
            ports: Vec::new(),
            clock_domains: Vec::new(),
            region: None,
            csr: None,
            irq: None,
        }
    }

    /// Sets a parameter, builder-style.
    pub fn with_param(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Adds a port, builder-style.
    pub fn with_port(mut self, name: &str, width: u32, direction: Direction) -> Self {
        self.add_port(name, width, direction);
        self
    }

    /// Adds a clock domain, builder-style.
    pub fn with_clock_domain(mut self, domain: ClockDomain) -> Self {
        self.clock_domains.push(domain);
        self
    }

    /// Adds a port; an existing port of the same name is replaced.
    pub fn add_port(&mut self, name: &str, width: u32, direction: Direction) {
        let port = ComponentPort {
            name: name.to_string(),
            width,
            direction,
        };
        match self.ports.iter_mut().find(|p| p.name == name) {
            Some(existing) => *existing = port,
            None => self.ports.push(port),
        }
    }

    /// Returns a parameter value.
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Returns a port by name.
    pub fn port(&self, name: &str) -> Option<&ComponentPort> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Returns `true` if the component owns the named clock domain.
    pub fn owns_domain(&self, name: &str) -> bool {
        self.clock_domains.iter().any(|d| d.name == name)
    }
}
