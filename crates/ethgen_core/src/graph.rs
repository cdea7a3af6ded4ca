//! The component graph of a generated core.
//!
//! Nodes are components and the external pad bundles they were given; edges
//! are signal connections pointing from driver to receiver.

use crate::component::Component;
use ethgen_common::{GenError, GenResult};
use ethgen_platform::{Direction, PortBundle};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node of the component graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    /// An instantiated component.
    Component(Component),
    /// An external pad bundle.
    Pad(PortBundle),
}

impl Node {
    /// The unique node name: the instance name, or the pad's port prefix.
    pub fn name(&self) -> &str {
        match self {
            Node::Component(c) => &c.name,
            Node::Pad(p) => &p.port_prefix,
        }
    }
}

/// A signal connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Port on the driving node.
    pub from_port: String,
    /// Port on the receiving node.
    pub to_port: String,
    /// Width in bits.
    pub width: u32,
}

impl Connection {
    /// Creates a connection.
    pub fn new(from_port: impl Into<String>, to_port: impl Into<String>, width: u32) -> Self {
        Self {
            from_port: from_port.into(),
            to_port: to_port.into(),
            width,
        }
    }
}

/// Components, pads and their connections.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoreGraph {
    graph: DiGraph<Node, Connection>,
    #[serde(skip)]
    by_name: BTreeMap<String, NodeIndex>,
}

impl CoreGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    fn add_node(&mut self, node: Node) -> GenResult<NodeIndex> {
        let name = node.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(GenError::ResourceConflict { name, index: 0 });
        }
        let idx = self.graph.add_node(node);
        self.by_name.insert(name, idx);
        Ok(idx)
    }

    /// Adds a component.
    ///
    /// # Errors
    ///
    /// [`GenError::ResourceConflict`] if a node of the same name exists.
    pub fn add_component(&mut self, component: Component) -> GenResult<NodeIndex> {
        self.add_node(Node::Component(component))
    }

    /// Adds a requested pad bundle.
    ///
    /// # Errors
    ///
    /// [`GenError::ResourceConflict`] if a node of the same name exists.
    pub fn add_pad(&mut self, bundle: PortBundle) -> GenResult<NodeIndex> {
        self.add_node(Node::Pad(bundle))
    }

    /// Adds a connection from `from` to `to`.
    pub fn connect(&mut self, from: NodeIndex, to: NodeIndex, connection: Connection) {
        self.graph.add_edge(from, to, connection);
    }

    /// Connects every signal of a pad bundle to a component port.
    ///
    /// Record signals land on `<prefix>_<signal>`; plain pins land on
    /// `prefix` itself. An empty prefix keeps the signal name.
    ///
    /// Inputs are driven by the pad; outputs and bidirectional signals by the
    /// component. Returns the number of connections added.
    pub fn connect_bundle(
        &mut self,
        component: NodeIndex,
        pad: NodeIndex,
        prefix: &str,
    ) -> GenResult<usize> {
        let bundle = self
            .pad_at(pad)
            .cloned()
            .ok_or_else(|| GenError::config("pads", "connection target is not a pad"))?;
        for signal in &bundle.signals {
            let local = match (prefix.is_empty(), bundle.record) {
                (true, _) => signal.name.clone(),
                (false, true) => format!("{prefix}_{}", signal.name),
                (false, false) => prefix.to_string(),
            };
            let external = bundle.port_name(&signal.name);
            match signal.direction {
                Direction::Input => {
                    self.connect(pad, component, Connection::new(external, local, signal.width))
                }
                Direction::Output | Direction::InOut => {
                    self.connect(component, pad, Connection::new(local, external, signal.width))
                }
            }
        }
        Ok(bundle.signals.len())
    }

    /// Looks up a node by name.
    pub fn node(&self, name: &str) -> Option<NodeIndex> {
        self.by_name.get(name).copied()
    }

    /// Returns the component with the given instance name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.node(name).and_then(|idx| self.component_at(idx))
    }

    /// Returns the component at a node index.
    pub fn component_at(&self, idx: NodeIndex) -> Option<&Component> {
        match self.graph.node_weight(idx) {
            Some(Node::Component(c)) => Some(c),
            _ => None,
        }
    }

    /// Returns the component at a node index, mutably.
    pub fn component_at_mut(&mut self, idx: NodeIndex) -> Option<&mut Component> {
        match self.graph.node_weight_mut(idx) {
            Some(Node::Component(c)) => Some(c),
            _ => None,
        }
    }

    /// Returns the pad bundle with the given port prefix.
    pub fn pad(&self, name: &str) -> Option<&PortBundle> {
        self.node(name).and_then(|idx| self.pad_at(idx))
    }

    /// Returns the pad bundle at a node index.
    pub fn pad_at(&self, idx: NodeIndex) -> Option<&PortBundle> {
        match self.graph.node_weight(idx) {
            Some(Node::Pad(p)) => Some(p),
            _ => None,
        }
    }

    /// Iterates over components in insertion order.
    pub fn components(&self) -> impl Iterator<Item = &Component> + '_ {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.component_at(idx))
    }

    /// Iterates over pad bundles in insertion order.
    pub fn pads(&self) -> impl Iterator<Item = &PortBundle> + '_ {
        self.graph.node_indices().filter_map(move |idx| self.pad_at(idx))
    }

    /// Iterates over `(driver, connection, receiver)` triples by node name.
    pub fn connections(&self) -> impl Iterator<Item = (&str, &Connection, &str)> + '_ {
        self.graph.edge_references().map(move |e| {
            (
                self.graph[e.source()].name(),
                e.weight(),
                self.graph[e.target()].name(),
            )
        })
    }

    /// Returns the connections between two named nodes, in either direction.
    pub fn connections_between<'a>(
        &'a self,
        a: &'a str,
        b: &'a str,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections()
            .filter(move |(from, _, to)| (*from == a && *to == b) || (*from == b && *to == a))
            .map(|(_, c, _)| c)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of connections.
    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }
}
