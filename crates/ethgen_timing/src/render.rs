//! Constraint file rendering per toolchain.

use crate::constraints::ConstraintSet;
use ethgen_platform::Toolchain;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Constraint file dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintFormat {
    /// Xilinx design constraints.
    Xdc,
    /// Lattice preference file.
    Lpf,
    /// Synopsys design constraints.
    Sdc,
}

impl ConstraintFormat {
    /// The dialect read by a toolchain.
    pub fn for_toolchain(toolchain: Toolchain) -> Self {
        match toolchain {
            Toolchain::Vivado | Toolchain::Symbiflow => ConstraintFormat::Xdc,
            Toolchain::Diamond => ConstraintFormat::Lpf,
            Toolchain::Trellis | Toolchain::Radiant => ConstraintFormat::Sdc,
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            ConstraintFormat::Xdc => "xdc",
            ConstraintFormat::Lpf => "lpf",
            ConstraintFormat::Sdc => "sdc",
        }
    }
}

/// Renders a constraint set as constraint file text.
///
/// False paths are written in both directions. An empty set renders as an
/// empty string.
pub fn render(set: &ConstraintSet, format: ConstraintFormat) -> String {
    if set.is_empty() {
        return String::new();
    }
    Rendered { set, format }.to_string()
}

struct Rendered<'a> {
    set: &'a ConstraintSet,
    format: ConstraintFormat,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Ethernet core timing constraints")?;

        for p in &self.set.periods {
            match self.format {
                ConstraintFormat::Xdc | ConstraintFormat::Sdc => writeln!(
                    f,
                    "create_clock -name {0} -period {1:.3} [get_nets {0}]",
                    p.clock, p.period_ns
                )?,
                ConstraintFormat::Lpf => writeln!(
                    f,
                    "FREQUENCY NET \"{}\" {:.6} MHz;",
                    p.clock,
                    p.frequency_mhz()
                )?,
            }
        }

        for fp in &self.set.false_paths {
            for (from, to) in [(&fp.from, &fp.to), (&fp.to, &fp.from)] {
                match self.format {
                    ConstraintFormat::Xdc => writeln!(
                        f,
                        "set_false_path -quiet -from [get_clocks {from}] -to [get_clocks {to}]"
                    )?,
                    ConstraintFormat::Sdc => writeln!(
                        f,
                        "set_false_path -from [get_clocks {from}] -to [get_clocks {to}]"
                    )?,
                    ConstraintFormat::Lpf => writeln!(
                        f,
                        "BLOCK PATH FROM CLKNET \"{from}\" TO CLKNET \"{to}\";"
                    )?,
                }
            }
        }
        Ok(())
    }
}
