//! Loading and validation of core generator configurations.
//!
//! A configuration is a flat key/value mapping (a [`toml::Table`]) with one
//! nested `soc` table. This crate normalizes it, rejects deprecated and
//! inconsistent keys, and produces a strongly-typed [`CoreConfig`] the
//! composer consumes without further checks.

#![warn(missing_docs)]

pub mod loader;
pub mod soc;
pub mod types;

pub use loader::load_config_from_str;
pub use soc::split_soc;
pub use types::*;
