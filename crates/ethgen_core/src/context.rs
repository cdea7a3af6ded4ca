//! Mutable composition state.
//!
//! [`CompositionContext`] owns everything one composition mutates: the base
//! SoC (bus and register maps), the pad registry and the component graph
//! under construction. It is created per call to
//! [`compose`](crate::compose::compose) and consumed into the artifact.

use crate::graph::CoreGraph;
use ethgen_common::GenResult;
use ethgen_diagnostics::DiagnosticSink;
use ethgen_platform::{PadRegistry, SocContext};
use petgraph::graph::NodeIndex;

/// State carried through the composition steps.
pub struct CompositionContext<'a> {
    /// The base SoC the core is composed into.
    pub soc: SocContext,
    /// Pads still available to components.
    pub pads: PadRegistry,
    /// The graph being built.
    pub graph: CoreGraph,
    /// The diagnostic sink for non-fatal findings.
    pub sink: &'a DiagnosticSink,
}

impl<'a> CompositionContext<'a> {
    /// Creates a context over the standard pad catalog.
    pub fn new(soc: SocContext, sink: &'a DiagnosticSink) -> Self {
        Self {
            soc,
            pads: PadRegistry::with_standard_io(),
            graph: CoreGraph::new(),
            sink,
        }
    }

    /// Requests a pad bundle and adds it to the graph.
    pub fn request_pad(&mut self, name: &str) -> GenResult<NodeIndex> {
        let bundle = self.pads.request(name, None)?;
        self.graph.add_pad(bundle)
    }

    /// Requests a pad bundle and connects it to `component`.
    ///
    /// See [`CoreGraph::connect_bundle`] for how `prefix` names the
    /// component ports.
    pub fn attach_pad(
        &mut self,
        component: NodeIndex,
        name: &str,
        prefix: &str,
    ) -> GenResult<NodeIndex> {
        let pad = self.request_pad(name)?;
        self.graph.connect_bundle(component, pad, prefix)?;
        Ok(pad)
    }
}
