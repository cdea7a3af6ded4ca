//! Ethernet physical-layer variants and PHY selection.
//!
//! [`PhyKind`] enumerates every PHY the generator can instantiate together
//! with the construction facts the composer and the constraint emitter need
//! (pad family, clock frequencies, vendor restriction). [`select`] resolves
//! the PHY to build, either by validating an explicit choice against the
//! supplied pads or by inferring it from the pad shapes.

#![warn(missing_docs)]

pub mod kind;
pub mod select;
pub mod shape;

pub use kind::{PadFamily, PhyKind};
pub use select::{infer, select, InferenceRule, Selection, Verdict, INFERENCE_RULES};
pub use shape::{validate_shape, SignalReq};
