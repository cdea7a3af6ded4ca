//! Composition of standalone Ethernet cores.
//!
//! Takes a validated [`CoreConfig`](ethgen_config::CoreConfig) and builds the
//! core as a graph of components (clock/reset generator, PHY, MAC or UDP/IP
//! core) connected to each other and to requested external pads. The result
//! is an [`Artifact`] carrying the graph, the bus and register layout, and the
//! timing constraints of the selected PHY.
//!
//! # Architecture
//!
//! - [`component`]: instantiated components with parameters, ports and clock
//!   domains
//! - [`graph`]: the component/pad graph
//! - [`wiring`]: table-driven stream wiring
//! - [`context`]: per-composition state
//! - [`compose`]: the build order
//! - [`artifact`]: the result and its exports

#![warn(missing_docs)]

pub mod artifact;
pub mod component;
pub mod compose;
pub mod context;
pub mod graph;
pub mod wiring;

pub use artifact::{AddressMap, Artifact};
pub use component::{ClockDomain, Component, ComponentKind, ComponentPort, ParamValue};
pub use compose::compose;
pub use context::CompositionContext;
pub use graph::{Connection, CoreGraph, Node};
pub use wiring::{
    wire_stream, FieldGroup, Flow, StreamDirection, StreamField, UDP_STREAM_FIELDS,
};
