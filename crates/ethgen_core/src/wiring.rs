//! Declarative field-by-field stream wiring.
//!
//! A stream endpoint is connected to a pad bundle by walking a field table
//! instead of spelling out each assignment. Each field flows either with the
//! stream or against it (`ready`); combined with the stream direction this
//! decides which side drives the field.

use crate::graph::{CoreGraph, Connection};
use ethgen_common::{GenError, GenResult, NotFoundKind};
use ethgen_platform::Direction;
use petgraph::graph::NodeIndex;
use tracing::debug;

/// Field grouping, used for ordering and logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    /// Handshake.
    Control,
    /// Per-packet metadata.
    Param,
    /// Per-beat data.
    Payload,
}

/// Which way a field travels relative to the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Same direction as the data.
    Forward,
    /// Opposite direction (back-pressure).
    Backward,
}

/// One field of a stream endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamField {
    /// Field name, shared by the pad signal and the endpoint port.
    pub name: &'static str,
    /// Group the field belongs to.
    pub group: FieldGroup,
    /// Direction relative to the stream.
    pub flow: Flow,
}

const fn field(name: &'static str, group: FieldGroup, flow: Flow) -> StreamField {
    StreamField { name, group, flow }
}

/// Fields of a UDP user stream.
pub const UDP_STREAM_FIELDS: &[StreamField] = &[
    field("valid", FieldGroup::Control, Flow::Forward),
    field("last", FieldGroup::Control, Flow::Forward),
    field("ready", FieldGroup::Control, Flow::Backward),
    field("src_port", FieldGroup::Param, Flow::Forward),
    field("dst_port", FieldGroup::Param, Flow::Forward),
    field("ip_address", FieldGroup::Param, Flow::Forward),
    field("length", FieldGroup::Param, Flow::Forward),
    field("data", FieldGroup::Payload, Flow::Forward),
    field("error", FieldGroup::Payload, Flow::Forward),
];

/// Which side of the boundary the stream data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamDirection {
    /// Pads feed the endpoint.
    Ingress,
    /// The endpoint feeds the pads.
    Egress,
}

/// Wires a stream endpoint of `component` to the pad bundle at `pad`.
///
/// For every field the component gains a port `<endpoint>_<field>` with the
/// pad signal's width, and one connection is added from the driving side.
/// Returns the number of connections added.
///
/// # Errors
///
/// [`GenError::NotFound`] if the pad bundle lacks a field, or if either node
/// is of the wrong kind.
pub fn wire_stream(
    graph: &mut CoreGraph,
    component: NodeIndex,
    endpoint: &str,
    pad: NodeIndex,
    direction: StreamDirection,
    fields: &[StreamField],
) -> GenResult<usize> {
    let bundle = graph
        .pad_at(pad)
        .cloned()
        .ok_or_else(|| GenError::not_found(NotFoundKind::Pad, endpoint))?;

    let mut wired = Vec::with_capacity(fields.len());
    for f in fields {
        let width = bundle.width(f.name).ok_or_else(|| {
            GenError::not_found(NotFoundKind::Pad, format!("{}.{}", bundle.name, f.name))
        })?;
        let pad_drives = matches!(
            (direction, f.flow),
            (StreamDirection::Ingress, Flow::Forward) | (StreamDirection::Egress, Flow::Backward)
        );
        wired.push((f, width, pad_drives));
    }

    let target = graph
        .component_at_mut(component)
        .ok_or_else(|| GenError::not_found(NotFoundKind::Value, endpoint))?;
    for (f, width, pad_drives) in &wired {
        let dir = if *pad_drives {
            Direction::Input
        } else {
            Direction::Output
        };
        target.add_port(&format!("{endpoint}_{}", f.name), *width, dir);
    }

    for (f, width, pad_drives) in &wired {
        let local = format!("{endpoint}_{}", f.name);
        let external = bundle.port_name(f.name);
        debug!(
            endpoint,
            field = f.name,
            group = ?f.group,
            pad_drives = *pad_drives,
            "stream field wired"
        );
        if *pad_drives {
            graph.connect(pad, component, Connection::new(external, local, *width));
        } else {
            graph.connect(component, pad, Connection::new(local, external, *width));
        }
    }
    Ok(wired.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, ComponentKind};
    use ethgen_platform::{IoDecl, PadRegistry, PortBundle, Subsignal};

    fn setup(pad_name: &str) -> (CoreGraph, NodeIndex, NodeIndex) {
        let mut reg = PadRegistry::with_standard_io();
        let bundle = reg.request(pad_name, None).unwrap();
        let mut g = CoreGraph::new();
        let port = g
            .add_component(Component::new("udp_port", ComponentKind::UdpPort))
            .unwrap();
        let pad = g.add_pad(bundle).unwrap();
        (g, port, pad)
    }

    #[test]
    fn table_covers_all_groups() {
        assert_eq!(UDP_STREAM_FIELDS.len(), 9);
        let backward: Vec<&str> = UDP_STREAM_FIELDS
            .iter()
            .filter(|f| f.flow == Flow::Backward)
            .map(|f| f.name)
            .collect();
        assert_eq!(backward, ["ready"]);
        assert_eq!(
            UDP_STREAM_FIELDS
                .iter()
                .filter(|f| f.group == FieldGroup::Param)
                .count(),
            4
        );
    }

    #[test]
    fn ingress_pad_drives_all_but_ready() {
        let (mut g, port, pad) = setup("udp_sink");
        let n = wire_stream(&mut g, port, "sink", pad, StreamDirection::Ingress, UDP_STREAM_FIELDS)
            .unwrap();
        assert_eq!(n, 9);

        let into_port = g
            .connections()
            .filter(|(from, _, to)| *from == "udp_sink" && *to == "udp_port")
            .count();
        assert_eq!(into_port, 8);
        let (_, ready, _) = g
            .connections()
            .find(|(from, _, _)| *from == "udp_port")
            .unwrap();
        assert_eq!(ready.from_port, "sink_ready");
        assert_eq!(ready.to_port, "udp_sink_ready");

        let c = g.component("udp_port").unwrap();
        assert_eq!(c.port("sink_data").unwrap().width, 32);
        assert_eq!(c.port("sink_valid").unwrap().direction, Direction::Input);
        assert_eq!(c.port("sink_ready").unwrap().direction, Direction::Output);
    }

    #[test]
    fn egress_endpoint_drives_all_but_ready() {
        let (mut g, port, pad) = setup("udp_source");
        wire_stream(&mut g, port, "source", pad, StreamDirection::Egress, UDP_STREAM_FIELDS)
            .unwrap();
        let driven_by_pad: Vec<&str> = g
            .connections()
            .filter(|(from, _, _)| *from == "udp_source")
            .map(|(_, c, _)| c.to_port.as_str())
            .collect();
        assert_eq!(driven_by_pad, ["source_ready"]);
        let c = g.component("udp_port").unwrap();
        assert_eq!(c.port("source_length").unwrap().width, 16);
        assert_eq!(c.port("source_length").unwrap().direction, Direction::Output);
    }

    #[test]
    fn missing_field_rejected_without_partial_wiring() {
        let decl = IoDecl::record("short", 0, vec![Subsignal::input("valid", 1)]);
        let mut g = CoreGraph::new();
        let port = g
            .add_component(Component::new("udp_port", ComponentKind::UdpPort))
            .unwrap();
        let pad = g.add_pad(PortBundle::from_decl(&decl, "short")).unwrap();
        let err = wire_stream(&mut g, port, "sink", pad, StreamDirection::Ingress, UDP_STREAM_FIELDS)
            .unwrap_err();
        assert!(matches!(err, GenError::NotFound { .. }));
        assert_eq!(g.connection_count(), 0);
        assert!(g.component("udp_port").unwrap().ports.is_empty());
    }
}
