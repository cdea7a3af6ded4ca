//! Shared foundational types used across the ethgen core generator.
//!
//! This crate provides the error taxonomy shared by every generator stage,
//! integer frequency values with unit parsing, and the MAC address literal
//! type used by the UDP/IP core configuration.

#![warn(missing_docs)]

pub mod address;
pub mod error;
pub mod frequency;

pub use address::{MacAddress, ParseMacAddressError};
pub use error::{GenError, GenResult, NotFoundKind};
pub use frequency::{Frequency, ParseFrequencyError};
