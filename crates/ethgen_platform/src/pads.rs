//! Pad declarations and the bundles handed out for them.
//!
//! An [`IoDecl`] is one entry of the platform catalog: a named, indexed set
//! of width-typed signals. Requesting it from the registry yields a
//! [`PortBundle`], which carries the same shape plus the top-level port
//! prefix the generated design uses for it.

use serde::{Deserialize, Serialize};

/// The direction of a pad signal, seen from the generated core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Driven from outside, read by the core.
    Input,
    /// Driven by the core.
    Output,
    /// Bidirectional (e.g. MDIO).
    InOut,
}

/// One width-typed signal of a pad declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsignal {
    /// The signal name within its bundle (e.g. `rx_data`).
    pub name: String,
    /// Width in bits.
    pub width: u32,
    /// Direction relative to the core.
    pub direction: Direction,
}

impl Subsignal {
    /// Declares an input signal.
    pub fn input(name: &str, width: u32) -> Self {
        Self::new(name, width, Direction::Input)
    }

    /// Declares an output signal.
    pub fn output(name: &str, width: u32) -> Self {
        Self::new(name, width, Direction::Output)
    }

    /// Declares a bidirectional signal.
    pub fn inout(name: &str, width: u32) -> Self {
        Self::new(name, width, Direction::InOut)
    }

    fn new(name: &str, width: u32, direction: Direction) -> Self {
        Self {
            name: name.to_string(),
            width,
            direction,
        }
    }
}

/// A catalog entry: a named, indexed pad declaration.
///
/// A *record* declaration groups several subsignals (`mii_eth`); a plain
/// *pins* declaration is a single signal named after the declaration itself
/// (`sys_clock`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoDecl {
    /// The declaration name.
    pub name: String,
    /// The declaration index (several entries may share a name).
    pub index: u32,
    /// The declared signals.
    pub signals: Vec<Subsignal>,
    /// `true` for a record of subsignals, `false` for plain pins.
    pub record: bool,
}

impl IoDecl {
    /// Declares plain pins of the given width.
    pub fn pins(name: &str, index: u32, width: u32, direction: Direction) -> Self {
        Self {
            name: name.to_string(),
            index,
            signals: vec![Subsignal {
                name: name.to_string(),
                width,
                direction,
            }],
            record: false,
        }
    }

    /// Declares a record of subsignals.
    pub fn record(name: &str, index: u32, signals: Vec<Subsignal>) -> Self {
        Self {
            name: name.to_string(),
            index,
            signals,
            record: true,
        }
    }
}

/// A pad declaration acquired for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortBundle {
    /// The declaration name.
    pub name: String,
    /// The declaration index.
    pub index: u32,
    /// The signals of this bundle.
    pub signals: Vec<Subsignal>,
    /// `true` for a record of subsignals.
    pub record: bool,
    /// Prefix of the top-level ports created for this bundle.
    pub port_prefix: String,
}

impl PortBundle {
    /// Builds a bundle from a declaration with the given port prefix.
    pub fn from_decl(decl: &IoDecl, port_prefix: impl Into<String>) -> Self {
        Self {
            name: decl.name.clone(),
            index: decl.index,
            signals: decl.signals.clone(),
            record: decl.record,
            port_prefix: port_prefix.into(),
        }
    }

    /// An empty bundle, standing in for pads a component does not use.
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            index: 0,
            signals: Vec::new(),
            record: true,
            port_prefix: name.to_string(),
        }
    }

    /// Returns the signal with the given name, if present.
    pub fn signal(&self, name: &str) -> Option<&Subsignal> {
        self.signals.iter().find(|s| s.name == name)
    }

    /// Returns `true` if the bundle has a signal with the given name.
    pub fn has(&self, name: &str) -> bool {
        self.signal(name).is_some()
    }

    /// Returns the width of the named signal, if present.
    pub fn width(&self, name: &str) -> Option<u32> {
        self.signal(name).map(|s| s.width)
    }

    /// Returns `true` if the bundle declares no signals.
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Returns the top-level port name of the named signal.
    pub fn port_name(&self, signal: &str) -> String {
        if self.record {
            format!("{}_{}", self.port_prefix, signal)
        } else {
            self.port_prefix.clone()
        }
    }

    /// Returns the sum of all signal widths.
    pub fn total_width(&self) -> u32 {
        self.signals.iter().map(|s| s.width).sum()
    }
}
