//! Target platform model for the ethgen core generator.
//!
//! This crate describes everything the generated core is built *against*:
//! the FPGA vendor and toolchain, the fixed catalog of external pad bundles
//! and the registry handing them out, and the SoC bus with its memory regions,
//! CSR pages and interrupt numbers.
//!
//! # Architecture
//!
//! - [`vendor`]: vendors, toolchains and the [`Platform`] descriptor
//! - [`pads`]: typed pad declarations and requested [`PortBundle`]s
//! - [`catalog`]: the standard pad catalog every build starts from
//! - [`registry`]: the once-per-build [`PadRegistry`]
//! - [`region`]: the slot-buffer [`Region`] allocator
//! - [`bus`]: region placement, CSR allocation and interrupt numbers
//! - [`soc`]: the base SoC context combining all of the above

#![warn(missing_docs)]

pub mod bus;
pub mod catalog;
pub mod pads;
pub mod region;
pub mod registry;
pub mod soc;
pub mod vendor;

pub use bus::{BusAddressMap, CsrRegion, CsrSpace, PlacedRegion};
pub use catalog::standard_io;
pub use pads::{Direction, IoDecl, PortBundle, Subsignal};
pub use region::{allocate, Region};
pub use registry::PadRegistry;
pub use soc::{SocContext, SocMaps};
pub use vendor::{Platform, Toolchain, Vendor};
