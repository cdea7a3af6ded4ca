//! Core composition.
//!
//! [`compose`] runs the fixed build order: base SoC, clock/reset generator,
//! PHY, then either the MAC or the UDP/IP core, and finally the timing
//! constraints. Any error aborts the whole composition.

use crate::artifact::{AddressMap, Artifact};
use crate::component::{ClockDomain, Component, ComponentKind};
use crate::context::CompositionContext;
use crate::graph::Connection;
use crate::wiring::{wire_stream, StreamDirection, UDP_STREAM_FIELDS};
use ethgen_common::{Frequency, GenResult};
use ethgen_config::{CoreConfig, CoreSettings, MacSettings, UdpSettings};
use ethgen_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use ethgen_phy::{select, PhyKind};
use ethgen_platform::catalog::UDP_DATA_WIDTH;
use ethgen_platform::{allocate, Direction, PortBundle, SocContext};
use ethgen_timing::{derive, ConstraintSet};
use petgraph::graph::NodeIndex;
use tracing::{debug, info};

/// Largest Ethernet frame a slot holds, in bytes.
pub const ETH_MTU: u64 = 1530;
/// Size of one MAC slot buffer.
pub const SLOT_BUFFER_SIZE: u64 = ETH_MTU.next_power_of_two();
/// Width of the MAC's bus interface.
pub const MAC_DATA_WIDTH: u32 = 32;
/// Queue depth of the UDP crossbar port.
pub const UDP_PORT_DEPTH: u32 = 8;

/// Clock/reset generator instance name.
pub const CRG: &str = "crg";
/// PHY instance name.
pub const ETHPHY: &str = "ethphy";
/// MAC instance name; also its bus region and register page name.
pub const ETHMAC: &str = "ethmac";
/// UDP/IP core instance name.
pub const ETHCORE: &str = "ethcore";
/// UDP port instance name.
pub const UDP_PORT: &str = "udp_port";

/// Composes a core from a validated configuration.
pub fn compose(config: &CoreConfig, sink: &DiagnosticSink) -> GenResult<Artifact> {
    let soc = SocContext::new(
        config.platform.clone(),
        config.clk_freq,
        config.soc.args.clone(),
        &config.soc.maps,
    )?;
    info!(
        vendor = %config.platform.vendor,
        core = %config.core.kind(),
        clk_freq = %config.clk_freq,
        "composing core"
    );
    let mut ctx = CompositionContext::new(soc, sink);

    build_crg(&mut ctx, config.clk_freq)?;
    let (phy, phy_idx) = build_phy(&mut ctx, config)?;
    match &config.core {
        CoreSettings::Mac(mac) => build_mac(&mut ctx, phy, phy_idx, mac)?,
        CoreSettings::Udp(udp) => build_udp(&mut ctx, phy, phy_idx, udp, config.clk_freq)?,
    }

    let constraints = constraints_for(phy, sink);
    let CompositionContext { soc, graph, .. } = ctx;
    let interrupts = soc.maps.interrupt_map.clone();
    info!(
        phy = %phy,
        components = graph.components().count(),
        constraints = constraints.len(),
        "core composed"
    );
    Ok(Artifact {
        platform: soc.platform,
        phy,
        core: config.core.kind(),
        graph,
        address_map: AddressMap {
            bus: soc.bus,
            csr: soc.csr,
            interrupts,
        },
        constraints,
    })
}

fn build_crg(ctx: &mut CompositionContext<'_>, clk_freq: Frequency) -> GenResult<NodeIndex> {
    let crg = Component::new(CRG, ComponentKind::Crg)
        .with_param("clk_freq", clk_freq.hz())
        .with_port("clk", 1, Direction::Input)
        .with_port("rst", 1, Direction::Input)
        .with_clock_domain(ClockDomain::new("sys", Some(clk_freq)));
    let idx = ctx.graph.add_component(crg)?;
    ctx.attach_pad(idx, "sys_clock", "clk")?;
    ctx.attach_pad(idx, "sys_reset", "rst")?;
    debug!(clk_freq = %clk_freq, "CRG built");
    Ok(idx)
}

fn build_phy(
    ctx: &mut CompositionContext<'_>,
    config: &CoreConfig,
) -> GenResult<(PhyKind, NodeIndex)> {
    let (clock_pads, pads) = match config.phy.pad_family() {
        Some(family) => (
            ctx.pads.request(family.clock_bundle(), None)?,
            ctx.pads.request(family.data_bundle(), None)?,
        ),
        None => (
            PortBundle::empty("model_clock_pads"),
            PortBundle::empty("model_pads"),
        ),
    };
    let selection = select(config.phy.explicit(), clock_pads, pads)?;
    let kind = selection.kind;

    let width = kind.data_width();
    let mut phy = Component::new(ETHPHY, ComponentKind::Phy(kind))
        .with_param("dw", width)
        .with_port("source", width, Direction::Output)
        .with_port("sink", width, Direction::Input)
        .with_clock_domain(ClockDomain::new("eth_rx", kind.rx_clk_freq()))
        .with_clock_domain(ClockDomain::new("eth_tx", kind.tx_clk_freq()));
    for (prefix, bundle) in [
        ("clock_pads", &selection.clock_pads),
        ("pads", &selection.pads),
    ] {
        for s in &bundle.signals {
            phy.add_port(&format!("{prefix}_{}", s.name), s.width, s.direction);
        }
    }
    if kind.needs_clk_freq() {
        phy = phy.with_param("clk_freq", config.clk_freq.hz());
    }
    if kind.uses_delays() {
        let delays = config.phy_delays.unwrap_or_default();
        phy = phy
            .with_param("tx_delay_ns", delays.tx_ns)
            .with_param("rx_delay_ns", delays.rx_ns)
            .with_param("with_hw_init_reset", false);
    }
    if kind.has_csrs() {
        phy.csr = Some(ctx.soc.csr.alloc(ETHPHY)?);
    }

    let idx = ctx.graph.add_component(phy)?;
    if !kind.is_model() {
        let clock_pad = ctx.graph.add_pad(selection.clock_pads)?;
        ctx.graph.connect_bundle(idx, clock_pad, "clock_pads")?;
        let data_pad = ctx.graph.add_pad(selection.pads)?;
        ctx.graph.connect_bundle(idx, data_pad, "pads")?;
    }
    debug!(phy = %kind, "PHY built");
    Ok((kind, idx))
}

/// Connects the PHY's data streams to the component built on top of it.
fn bind_phy(ctx: &mut CompositionContext<'_>, phy: PhyKind, phy_idx: NodeIndex, idx: NodeIndex) {
    let width = phy.data_width();
    ctx.graph
        .connect(phy_idx, idx, Connection::new("source", "phy_rx", width));
    ctx.graph
        .connect(idx, phy_idx, Connection::new("phy_tx", "sink", width));
}

fn build_mac(
    ctx: &mut CompositionContext<'_>,
    phy: PhyKind,
    phy_idx: NodeIndex,
    settings: &MacSettings,
) -> GenResult<()> {
    let region = allocate(
        settings.nrxslots,
        settings.ntxslots,
        SLOT_BUFFER_SIZE,
        ctx.soc.mem_origin(ETHMAC),
    );
    let placed = ctx.soc.bus.add_slave(ETHMAC, region)?.clone();
    let csr = ctx.soc.csr.alloc(ETHMAC)?;

    let mut mac = Component::new(ETHMAC, ComponentKind::Mac)
        .with_param("dw", MAC_DATA_WIDTH)
        .with_param("interface", "wishbone")
        .with_param("endianness", settings.endianness.to_string())
        .with_param("with_preamble_crc", true)
        .with_param("nrxslots", settings.nrxslots)
        .with_param("ntxslots", settings.ntxslots)
        .with_param("full_memory_we", settings.full_memory_we)
        .with_port("phy_rx", phy.data_width(), Direction::Input)
        .with_port("phy_tx", phy.data_width(), Direction::Output)
        .with_port("bus", MAC_DATA_WIDTH, Direction::InOut)
        .with_port("irq", 1, Direction::Output);
    mac.irq = ctx.soc.interrupt(ETHMAC);
    mac.csr = Some(csr);
    mac.region = Some(placed.clone());

    let idx = ctx.graph.add_component(mac)?;
    bind_phy(ctx, phy, phy_idx, idx);
    ctx.attach_pad(idx, "interrupt", "irq")?;
    info!(
        origin = format_args!("{:#010x}", placed.origin),
        size = placed.size,
        "MAC region placed"
    );
    Ok(())
}

fn build_udp(
    ctx: &mut CompositionContext<'_>,
    phy: PhyKind,
    phy_idx: NodeIndex,
    settings: &UdpSettings,
    clk_freq: Frequency,
) -> GenResult<()> {
    let mut core = Component::new(ETHCORE, ComponentKind::UdpIpCore)
        .with_param("clk_freq", clk_freq.hz())
        .with_port("phy_rx", phy.data_width(), Direction::Input)
        .with_port("phy_tx", phy.data_width(), Direction::Output);
    // Addresses not given literally are read from pads at run time.
    core = match settings.mac_address {
        Some(mac) => core.with_param("mac_address", mac.to_u64()),
        None => core.with_port("mac_address", 48, Direction::Input),
    };
    core = match settings.ip_address {
        Some(ip) => core.with_param("ip_address", u64::from(u32::from(ip))),
        None => core.with_port("ip_address", 32, Direction::Input),
    };
    let core_idx = ctx.graph.add_component(core)?;
    bind_phy(ctx, phy, phy_idx, core_idx);
    if settings.mac_address.is_none() {
        ctx.attach_pad(core_idx, "mac_address", "mac_address")?;
    }
    if settings.ip_address.is_none() {
        ctx.attach_pad(core_idx, "ip_address", "ip_address")?;
    }

    let data_width = UDP_DATA_WIDTH;
    let port = Component::new(UDP_PORT, ComponentKind::UdpPort)
        .with_param("port", u32::from(settings.port))
        .with_param("depth", UDP_PORT_DEPTH)
        .with_param("dw", data_width);
    let port_idx = ctx.graph.add_component(port)?;
    ctx.graph
        .connect(core_idx, port_idx, Connection::new("crossbar", "crossbar", data_width));

    let sink_pad = ctx.request_pad("udp_sink")?;
    wire_stream(
        &mut ctx.graph,
        port_idx,
        "sink",
        sink_pad,
        StreamDirection::Ingress,
        UDP_STREAM_FIELDS,
    )?;
    let source_pad = ctx.request_pad("udp_source")?;
    wire_stream(
        &mut ctx.graph,
        port_idx,
        "source",
        source_pad,
        StreamDirection::Egress,
        UDP_STREAM_FIELDS,
    )?;
    info!(port = settings.port, depth = UDP_PORT_DEPTH, "UDP port bound");
    Ok(())
}

fn constraints_for(phy: PhyKind, sink: &DiagnosticSink) -> ConstraintSet {
    let set = derive(phy);
    if set.is_empty() {
        sink.emit(
            Diagnostic::note(
                DiagnosticCode::CONSTRAINTS_SKIPPED,
                format!("{phy} has no physical clocks, no timing constraints emitted"),
            )
            .with_subject(ETHPHY),
        );
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethgen_config::load_config_from_str;

    fn compose_str(text: &str) -> GenResult<Artifact> {
        let sink = DiagnosticSink::new();
        let config = load_config_from_str(text, &sink)?;
        compose(&config, &sink)
    }

    #[test]
    fn slot_buffer_is_mtu_rounded_up() {
        assert_eq!(SLOT_BUFFER_SIZE, 2048);
    }

    #[test]
    fn crg_owns_sys_domain_and_requests_clock_pads() {
        let art = compose_str(
            "clk_freq = 100000000\nvendor = \"xilinx\"\nphy = \"mii\"\ncore = \"mac\"\n",
        )
        .unwrap();
        let crg = art.graph.component(CRG).unwrap();
        assert!(crg.owns_domain("sys"));
        assert_eq!(crg.clock_domains[0].frequency.unwrap().hz(), 100_000_000);
        let clk = art.graph.connections_between("sys_clock", CRG).next().unwrap();
        assert_eq!(clk.to_port, "clk");
        assert!(art.graph.pad("sys_reset").is_some());
    }

    #[test]
    fn phy_ports_mirror_pads() {
        let art = compose_str(
            "clk_freq = 100000000\nvendor = \"xilinx\"\nphy = \"rmii\"\ncore = \"mac\"\n",
        )
        .unwrap();
        let phy = art.graph.component(ETHPHY).unwrap();
        assert_eq!(phy.kind, ComponentKind::Phy(PhyKind::Rmii));
        assert_eq!(phy.port("clock_pads_ref_clk").unwrap().width, 1);
        assert_eq!(phy.port("pads_tx_data").unwrap().width, 2);
        assert_eq!(
            phy.port("pads_mdio").unwrap().direction,
            Direction::InOut
        );
        assert!(phy.owns_domain("eth_rx") && phy.owns_domain("eth_tx"));
        assert_eq!(phy.csr.as_ref().unwrap().location, 0);
    }

    #[test]
    fn gmii_mii_gets_clk_freq() {
        let art = compose_str(
            "clk_freq = 125000000\nvendor = \"xilinx\"\nphy_pads = \"gmii\"\ncore = \"mac\"\n",
        )
        .unwrap();
        assert_eq!(art.phy, PhyKind::GmiiMii);
        let phy = art.graph.component(ETHPHY).unwrap();
        assert_eq!(
            phy.param("clk_freq").and_then(|v| v.as_int()),
            Some(125_000_000)
        );
        assert!(phy.param("tx_delay_ns").is_none());
    }

    #[test]
    fn rgmii_gets_delays() {
        let art = compose_str(
            "clk_freq = 125000000\nvendor = \"xilinx\"\nphy = \"s7rgmii\"\nphy_tx_delay = 1\ncore = \"mac\"\n",
        )
        .unwrap();
        let phy = art.graph.component(ETHPHY).unwrap();
        assert_eq!(phy.param("tx_delay_ns").and_then(|v| v.as_int()), Some(1));
        assert_eq!(phy.param("rx_delay_ns").and_then(|v| v.as_int()), Some(2));
        assert_eq!(
            phy.param("with_hw_init_reset").and_then(|v| v.as_bool()),
            Some(false)
        );
    }

    #[test]
    fn model_requests_no_phy_pads() {
        let sink = DiagnosticSink::new();
        let config = load_config_from_str(
            "clk_freq = 100000000\nvendor = \"xilinx\"\nphy = \"model\"\ncore = \"mac\"\n",
            &sink,
        )
        .unwrap();
        let art = compose(&config, &sink).unwrap();
        let pads: Vec<&str> = art.graph.pads().map(|p| p.name.as_str()).collect();
        assert_eq!(pads, ["sys_clock", "sys_reset", "interrupt"]);
        assert!(art.constraints.is_empty());
        let phy = art.graph.component(ETHPHY).unwrap();
        assert!(phy.csr.is_none());
        assert!(phy.clock_domains.iter().all(|d| d.frequency.is_none()));
        assert!(sink.contains(DiagnosticCode::CONSTRAINTS_SKIPPED));
        // The MAC takes the first register page when the PHY has none.
        assert_eq!(art.graph.component(ETHMAC).unwrap().csr.as_ref().unwrap().location, 0);
    }

    #[test]
    fn mac_irq_drives_interrupt_pad() {
        let art = compose_str(
            "clk_freq = 100000000\nvendor = \"xilinx\"\nphy = \"mii\"\ncore = \"mac\"\n",
        )
        .unwrap();
        let irq = art.graph.connections_between(ETHMAC, "interrupt").next().unwrap();
        assert_eq!((irq.from_port.as_str(), irq.to_port.as_str()), ("irq", "interrupt"));
        let to_mac = art.graph.connections_between(ETHPHY, ETHMAC).count();
        assert_eq!(to_mac, 2);
    }

    #[test]
    fn mem_map_origin_used() {
        let art = compose_str(
            r#"
clk_freq = 100000000
vendor = "xilinx"
phy = "mii"
core = "mac"

[soc.mem_map]
ethmac = 0x50000000

[soc.interrupt_map]
ethmac = 3
"#,
        )
        .unwrap();
        let mac = art.graph.component(ETHMAC).unwrap();
        assert_eq!(mac.region.as_ref().unwrap().origin, 0x5000_0000);
        assert_eq!(mac.irq, Some(3));
        assert_eq!(art.address_map.interrupts["ethmac"], 3);
    }

    #[test]
    fn misaligned_origin_aborts() {
        let err = compose_str(
            r#"
clk_freq = 100000000
vendor = "xilinx"
phy = "mii"
core = "mac"

[soc.mem_map]
ethmac = 0x50000100
"#,
        )
        .unwrap_err();
        assert_eq!(err.key(), Some("soc.mem_map.ethmac"));
    }

    #[test]
    fn udp_literal_addresses_request_no_pads() {
        let art = compose_str(
            r#"
clk_freq = 125000000
vendor = "xilinx"
phy = "gmii"
core = "udp"
port = 1234
mac_address = "10:e2:d5:00:00:00"
ip_address = "10.0.0.2"
"#,
        )
        .unwrap();
        assert!(art.graph.pad("mac_address").is_none());
        assert!(art.graph.pad("ip_address").is_none());
        let core = art.graph.component(ETHCORE).unwrap();
        assert_eq!(
            core.param("mac_address").and_then(|v| v.as_int()),
            Some(0x10e2_d500_0000)
        );
        assert!(core.port("mac_address").is_none());
    }

    #[test]
    fn udp_without_literals_requests_both_pads() {
        let art = compose_str(
            "clk_freq = 125000000\nvendor = \"xilinx\"\nphy = \"gmii\"\ncore = \"udp\"\nport = 1\n",
        )
        .unwrap();
        let core = art.graph.component(ETHCORE).unwrap();
        assert_eq!(core.port("mac_address").unwrap().width, 48);
        assert_eq!(core.port("ip_address").unwrap().width, 32);
        assert!(art.graph.connections_between("mac_address", ETHCORE).next().is_some());
        assert!(art.graph.connections_between("ip_address", ETHCORE).next().is_some());
    }

    #[test]
    fn udp_streams_fully_wired() {
        let art = compose_str(
            "clk_freq = 125000000\nvendor = \"xilinx\"\nphy = \"gmii\"\ncore = \"udp\"\nport = 1\n",
        )
        .unwrap();
        let sink_edges = art.graph.connections_between("udp_sink", UDP_PORT).count();
        let source_edges = art.graph.connections_between("udp_source", UDP_PORT).count();
        assert_eq!((sink_edges, source_edges), (9, 9));
        assert!(art.graph.component(ETHMAC).is_none());
        assert!(art.graph.pad("interrupt").is_none());
    }
}
