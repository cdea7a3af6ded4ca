//! Timing constraints for the generated Ethernet core.
//!
//! The constraint set is derived from the selected PHY alone: one period
//! constraint per PHY clock and a false path between the system clock and
//! each PHY clock. [`render`] turns the set into the constraint file text of
//! the target toolchain.

#![warn(missing_docs)]

pub mod constraints;
pub mod derive;
pub mod render;

pub use constraints::{ConstraintSet, FalsePath, PeriodConstraint, ETH_RX_CLK, ETH_TX_CLK, SYS_CLK};
pub use derive::derive;
pub use render::{render, ConstraintFormat};
