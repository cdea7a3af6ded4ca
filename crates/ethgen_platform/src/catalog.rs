//! The standard pad catalog of a standalone core.
//!
//! Shapes here must stay exactly as listed: PHY auto-detection tells the pad
//! families apart purely by which signals exist and how wide they are.

use crate::pads::{Direction, IoDecl, Subsignal};

/// Width of the UDP stream payload.
pub const UDP_DATA_WIDTH: u32 = 32;

/// Returns the catalog every build starts from.
pub fn standard_io() -> Vec<IoDecl> {
    use Subsignal as S;

    vec![
        // Clk / Rst
        IoDecl::pins("sys_clock", 0, 1, Direction::Input),
        IoDecl::pins("sys_reset", 1, 1, Direction::Input),
        // IP/MAC address
        IoDecl::pins("mac_address", 0, 48, Direction::Input),
        IoDecl::pins("ip_address", 0, 32, Direction::Input),
        // Interrupt
        IoDecl::pins("interrupt", 0, 1, Direction::Output),
        // MII
        IoDecl::record(
            "mii_eth_clocks",
            0,
            vec![S::input("tx", 1), S::input("rx", 1)],
        ),
        IoDecl::record(
            "mii_eth",
            0,
            vec![
                S::output("rst_n", 1),
                S::inout("mdio", 1),
                S::output("mdc", 1),
                S::input("rx_dv", 1),
                S::input("rx_er", 1),
                S::input("rx_data", 4),
                S::output("tx_en", 1),
                S::output("tx_data", 4),
                S::input("col", 1),
                S::input("crs", 1),
            ],
        ),
        // RMII
        IoDecl::record("rmii_eth_clocks", 0, vec![S::input("ref_clk", 1)]),
        IoDecl::record(
            "rmii_eth",
            0,
            vec![
                S::output("rst_n", 1),
                S::input("rx_data", 2),
                S::input("crs_dv", 1),
                S::output("tx_en", 1),
                S::output("tx_data", 2),
                S::output("mdc", 1),
                S::inout("mdio", 1),
            ],
        ),
        // GMII
        IoDecl::record(
            "gmii_eth_clocks",
            0,
            vec![S::input("tx", 1), S::output("gtx", 1), S::input("rx", 1)],
        ),
        IoDecl::record(
            "gmii_eth",
            0,
            vec![
                S::output("rst_n", 1),
                S::input("int_n", 1),
                S::inout("mdio", 1),
                S::output("mdc", 1),
                S::input("rx_dv", 1),
                S::input("rx_er", 1),
                S::input("rx_data", 8),
                S::output("tx_en", 1),
                S::output("tx_er", 1),
                S::output("tx_data", 8),
                S::input("col", 1),
                S::input("crs", 1),
            ],
        ),
        // RGMII
        IoDecl::record(
            "rgmii_eth_clocks",
            0,
            vec![S::output("tx", 1), S::input("rx", 1)],
        ),
        IoDecl::record(
            "rgmii_eth",
            0,
            vec![
                S::output("rst_n", 1),
                S::input("int_n", 1),
                S::inout("mdio", 1),
                S::output("mdc", 1),
                S::input("rx_ctl", 1),
                S::input("rx_data", 4),
                S::output("tx_ctl", 1),
                S::output("tx_data", 4),
            ],
        ),
        // UDP
        IoDecl::record("udp_sink", 0, udp_stream(Direction::Input)),
        IoDecl::record("udp_source", 0, udp_stream(Direction::Output)),
    ]
}

/// The UDP stream pad shape; `forward` is the direction of everything but
/// `ready`, which always flows the other way.
fn udp_stream(forward: Direction) -> Vec<Subsignal> {
    let backward = match forward {
        Direction::Input => Direction::Output,
        _ => Direction::Input,
    };
    let sig = |name: &str, width: u32, direction: Direction| Subsignal {
        name: name.to_string(),
        width,
        direction,
    };
    vec![
        // Control
        sig("valid", 1, forward),
        sig("last", 1, forward),
        sig("ready", 1, backward),
        // Param
        sig("src_port", 16, forward),
        sig("dst_port", 16, forward),
        sig("ip_address", 32, forward),
        sig("length", 16, forward),
        // Payload
        sig("data", UDP_DATA_WIDTH, forward),
        sig("error", 4, forward),
    ]
}
