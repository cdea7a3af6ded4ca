//! Configuration loading, normalization and validation.

use crate::soc::split_soc;
use crate::types::{
    CoreConfig, CoreKind, CoreSettings, Endianness, MacSettings, PhyDelays, PhySelection,
    UdpSettings,
};
use ethgen_common::{Frequency, GenError, GenResult, MacAddress};
use ethgen_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use ethgen_phy::{PadFamily, PhyKind};
use ethgen_platform::{Platform, Toolchain, Vendor};
use std::net::Ipv4Addr;
use tracing::debug;

/// Top-level keys interpreted by the loader; anything else is forwarded to
/// the base SoC.
pub const RECOGNIZED_KEYS: &[&str] = &[
    "clk_freq",
    "vendor",
    "device",
    "toolchain",
    "phy",
    "phy_pads",
    "phy_tx_delay",
    "phy_rx_delay",
    "core",
    "endianness",
    "mac_address",
    "ip_address",
    "port",
    "nrxslots",
    "ntxslots",
    "full_memory_we",
    "soc",
];

/// Top-level keys that used to be accepted and now must live under `soc`.
const DEPRECATED_KEYS: &[&str] = &["csr_map", "mem_map"];

/// Parses and validates a configuration from TOML text.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str, sink: &DiagnosticSink) -> GenResult<CoreConfig> {
    let table: toml::Table = content
        .parse()
        .map_err(|e: toml::de::Error| GenError::config("<document>", e.message()))?;
    CoreConfig::from_table(&table, sink)
}

impl CoreConfig {
    /// Builds a typed configuration from a flat mapping.
    ///
    /// Deprecated top-level keys are rejected before anything else is
    /// looked at. Non-fatal findings (ignored delays, forwarded keys) are
    /// reported to `sink`.
    pub fn from_table(table: &toml::Table, sink: &DiagnosticSink) -> GenResult<Self> {
        for key in DEPRECATED_KEYS {
            if table.contains_key(*key) {
                return Err(GenError::config(
                    *key,
                    format!("top-level `{key}` is no longer supported, move it under `soc`"),
                ));
            }
        }
        let table = normalize(table);

        let clk_freq = clk_freq(table.get("clk_freq"))?;

        let vendor = Vendor::from_name(required_str(&table, "vendor")?)?;
        let device = optional_str(&table, "device")?.unwrap_or_default();
        let toolchain = match optional_str(&table, "toolchain")? {
            Some(name) => Toolchain::from_name(name)?,
            None => vendor.default_toolchain(),
        };
        let platform = Platform::new(vendor, device, toolchain)?;

        let phy = phy_selection(&table, vendor)?;
        let phy_delays = phy_delays(&table, phy, sink)?;

        let core = match CoreKind::from_name(required_str(&table, "core")?)? {
            CoreKind::Mac => CoreSettings::Mac(mac_settings(&table)?),
            CoreKind::Udp => CoreSettings::Udp(udp_settings(&table)?),
        };

        let mut soc = split_soc(table.get("soc"))?;
        for (key, value) in &table {
            if RECOGNIZED_KEYS.contains(&key.as_str()) {
                continue;
            }
            if soc.args.contains_key(key) {
                sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::SHADOWED_KEY,
                        format!("top-level `{key}` is shadowed by `soc.{key}`"),
                    )
                    .with_subject(key.clone()),
                );
            } else {
                sink.emit(
                    Diagnostic::note(
                        DiagnosticCode::FORWARDED_KEY,
                        format!("unrecognized key `{key}` forwarded to the SoC"),
                    )
                    .with_subject(key.clone()),
                );
                soc.args.insert(key.clone(), value.clone());
            }
        }

        debug!(
            vendor = %platform.vendor,
            toolchain = %platform.toolchain,
            core = %core.kind(),
            "configuration loaded"
        );
        Ok(Self {
            clk_freq,
            platform,
            phy,
            phy_delays,
            core,
            soc,
        })
    }
}

/// Replaces the literal strings `"True"` / `"False"` with booleans and drops
/// entries set to `"None"`, at any nesting depth.
fn normalize(table: &toml::Table) -> toml::Table {
    table
        .iter()
        .filter_map(|(k, v)| normalize_value(v).map(|v| (k.clone(), v)))
        .collect()
}

fn normalize_value(value: &toml::Value) -> Option<toml::Value> {
    match value {
        toml::Value::String(s) => match s.as_str() {
            "True" => Some(toml::Value::Boolean(true)),
            "False" => Some(toml::Value::Boolean(false)),
            "None" => None,
            _ => Some(value.clone()),
        },
        toml::Value::Table(t) => Some(toml::Value::Table(normalize(t))),
        toml::Value::Array(items) => Some(toml::Value::Array(
            items.iter().filter_map(normalize_value).collect(),
        )),
        other => Some(other.clone()),
    }
}

fn missing(key: &str) -> GenError {
    GenError::config(key, "missing required key")
}

fn required_str<'a>(table: &'a toml::Table, key: &str) -> GenResult<&'a str> {
    optional_str(table, key)?.ok_or_else(|| missing(key))
}

fn optional_str<'a>(table: &'a toml::Table, key: &str) -> GenResult<Option<&'a str>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(GenError::config(
            key,
            format!("expected a string, found {other}"),
        )),
    }
}

fn optional_uint(table: &toml::Table, key: &str, max: u64) -> GenResult<Option<u64>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::Integer(v)) if *v >= 0 && (*v as u64) <= max => Ok(Some(*v as u64)),
        Some(toml::Value::Integer(v)) => Err(GenError::config(
            key,
            format!("{v} is out of range 0..={max}"),
        )),
        Some(other) => Err(GenError::config(
            key,
            format!("expected an integer, found {other}"),
        )),
    }
}

fn optional_bool(table: &toml::Table, key: &str) -> GenResult<Option<bool>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::Boolean(b)) => Ok(Some(*b)),
        Some(other) => Err(GenError::config(
            key,
            format!("expected a boolean, found {other}"),
        )),
    }
}

fn clk_freq(value: Option<&toml::Value>) -> GenResult<Frequency> {
    const KEY: &str = "clk_freq";
    let freq = match value.ok_or_else(|| missing(KEY))? {
        toml::Value::Integer(hz) if *hz > 0 => Some(Frequency::from_hz(*hz as u64)),
        toml::Value::Float(hz) => Frequency::from_hz_f64(*hz),
        toml::Value::String(s) => s.parse::<Frequency>().ok(),
        _ => None,
    };
    match freq {
        Some(f) if f.hz() > 0 => Ok(f),
        _ => Err(GenError::config(
            KEY,
            format!("{} is not a positive frequency", value.map_or(String::new(), ToString::to_string)),
        )),
    }
}

fn phy_selection(table: &toml::Table, vendor: Vendor) -> GenResult<PhySelection> {
    let pads = optional_str(table, "phy_pads")?
        .map(PadFamily::from_name)
        .transpose()?;
    match optional_str(table, "phy")? {
        None => auto_selection(pads),
        Some(name) if name.eq_ignore_ascii_case("auto") => auto_selection(pads),
        Some(name) => {
            let kind = PhyKind::from_name(name)?;
            if let Some(required) = kind.vendor() {
                if required != vendor {
                    return Err(GenError::config(
                        "phy",
                        format!("{kind} is only available on {required} devices, not {vendor}"),
                    ));
                }
            }
            if let Some(family) = pads {
                if kind.family() != Some(family) {
                    return Err(GenError::config(
                        "phy_pads",
                        format!(
                            "{kind} is not built on `{}` pads",
                            family.data_bundle()
                        ),
                    ));
                }
            }
            Ok(PhySelection::Explicit(kind))
        }
    }
}

fn auto_selection(pads: Option<PadFamily>) -> GenResult<PhySelection> {
    pads.map(PhySelection::Auto).ok_or_else(|| {
        GenError::config(
            "phy_pads",
            "required when `phy` is absent or `auto` (one of mii, rmii, gmii, rgmii)",
        )
    })
}

fn phy_delays(
    table: &toml::Table,
    phy: PhySelection,
    sink: &DiagnosticSink,
) -> GenResult<Option<PhyDelays>> {
    let max = u64::from(u32::MAX);
    let tx = optional_uint(table, "phy_tx_delay", max)?;
    let rx = optional_uint(table, "phy_rx_delay", max)?;

    match phy.explicit() {
        Some(kind) if kind.uses_delays() => Ok(Some(PhyDelays {
            tx_ns: tx.map_or(PhyDelays::DEFAULT_NS, |v| v as u32),
            rx_ns: rx.map_or(PhyDelays::DEFAULT_NS, |v| v as u32),
        })),
        _ => {
            let target = phy
                .explicit()
                .map_or_else(|| "an auto-detected PHY".to_string(), |k| k.to_string());
            for (key, value) in [("phy_tx_delay", tx), ("phy_rx_delay", rx)] {
                if value.is_some() {
                    sink.emit(
                        Diagnostic::warning(
                            DiagnosticCode::UNUSED_PHY_DELAY,
                            format!("`{key}` has no effect on {target}"),
                        )
                        .with_subject(key)
                        .with_help("clock delays only apply to RGMII PHYs"),
                    );
                }
            }
            Ok(None)
        }
    }
}

fn mac_settings(table: &toml::Table) -> GenResult<MacSettings> {
    let slots = |key: &str| -> GenResult<u32> {
        match optional_uint(table, key, u64::from(u32::MAX))? {
            None => Ok(MacSettings::DEFAULT_SLOTS),
            Some(0) => Err(GenError::config(key, "at least one slot is required")),
            Some(n) => Ok(n as u32),
        }
    };
    let endianness = match table.get("endianness") {
        None => Endianness::default(),
        Some(value) => value.clone().try_into().map_err(|_| {
            GenError::config("endianness", format!("expected `big` or `little`, found {value}"))
        })?,
    };
    Ok(MacSettings {
        nrxslots: slots("nrxslots")?,
        ntxslots: slots("ntxslots")?,
        full_memory_we: optional_bool(table, "full_memory_we")?.unwrap_or(false),
        endianness,
    })
}

fn udp_settings(table: &toml::Table) -> GenResult<UdpSettings> {
    let port = optional_uint(table, "port", u64::from(u16::MAX))?.ok_or_else(|| missing("port"))?;
    Ok(UdpSettings {
        mac_address: mac_address(table.get("mac_address"))?,
        ip_address: ip_address(table.get("ip_address"))?,
        port: port as u16,
    })
}

fn mac_address(value: Option<&toml::Value>) -> GenResult<Option<MacAddress>> {
    const KEY: &str = "mac_address";
    let Some(value) = value else {
        return Ok(None);
    };
    let parsed = match value {
        toml::Value::Integer(v) if *v >= 0 => MacAddress::from_u64(*v as u64),
        toml::Value::String(s) => s.parse().ok(),
        _ => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| GenError::config(KEY, format!("{value} is not a MAC address")))
}

fn ip_address(value: Option<&toml::Value>) -> GenResult<Option<Ipv4Addr>> {
    const KEY: &str = "ip_address";
    let Some(value) = value else {
        return Ok(None);
    };
    let parsed = match value {
        toml::Value::Integer(v) => u32::try_from(*v).ok().map(Ipv4Addr::from),
        toml::Value::String(s) => s.parse().ok(),
        _ => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| GenError::config(KEY, format!("{value} is not an IPv4 address")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethgen_diagnostics::Severity;

    fn load(text: &str) -> (GenResult<CoreConfig>, DiagnosticSink) {
        let sink = DiagnosticSink::new();
        let result = load_config_from_str(text, &sink);
        (result, sink)
    }

    #[test]
    fn minimal_mac_config() {
        let (cfg, sink) = load(
            r#"
clk_freq = 100000000
vendor = "xilinx"
phy = "mii"
core = "mac"
"#,
        );
        let cfg = cfg.unwrap();
        assert_eq!(cfg.clk_freq.hz(), 100_000_000);
        assert_eq!(cfg.platform.toolchain, Toolchain::Vivado);
        assert_eq!(cfg.platform.device, "");
        assert_eq!(cfg.phy, PhySelection::Explicit(PhyKind::Mii));
        assert_eq!(cfg.core, CoreSettings::Mac(MacSettings::default()));
        assert!(cfg.phy_delays.is_none());
        assert!(sink.is_empty());
    }

    #[test]
    fn lattice_defaults_to_diamond() {
        let (cfg, _) = load(
            r#"
clk_freq = 50e6
vendor = "lattice"
phy = "LiteEthPHYRMII"
core = "wishbone"
"#,
        );
        let cfg = cfg.unwrap();
        assert_eq!(cfg.platform.toolchain, Toolchain::Diamond);
        assert_eq!(cfg.clk_freq.hz(), 50_000_000);
        assert_eq!(cfg.core.kind(), CoreKind::Mac);
    }

    #[test]
    fn clk_freq_string_forms() {
        for text in ["\"125e6\"", "\"125MHz\"", "125000000", "125.0e6"] {
            let (cfg, _) = load(&format!(
                "clk_freq = {text}\nvendor = \"xilinx\"\nphy = \"mii\"\ncore = \"mac\"\n"
            ));
            assert_eq!(cfg.unwrap().clk_freq.hz(), 125_000_000, "{text}");
        }
    }

    #[test]
    fn zero_clk_freq_rejected() {
        let (cfg, _) = load("clk_freq = 0\nvendor = \"xilinx\"\nphy = \"mii\"\ncore = \"mac\"\n");
        assert_eq!(cfg.unwrap_err().key(), Some("clk_freq"));
    }

    #[test]
    fn deprecated_top_level_maps_rejected_first() {
        // Rejected even though the rest of the document is invalid.
        let (cfg, _) = load(
            r#"
vendor = "altera"
[mem_map]
ethmac = 0x50000000
"#,
        );
        assert_eq!(cfg.unwrap_err().key(), Some("mem_map"));

        let (cfg, _) = load("[csr_map]\nethmac = 3\n");
        assert_eq!(cfg.unwrap_err().key(), Some("csr_map"));
    }

    #[test]
    fn unknown_vendor_not_found() {
        let (cfg, _) = load("clk_freq = 1\nvendor = \"altera\"\nphy = \"mii\"\ncore = \"mac\"\n");
        assert!(matches!(cfg.unwrap_err(), GenError::NotFound { .. }));
    }

    #[test]
    fn foreign_toolchain_rejected() {
        let (cfg, _) = load(
            r#"
clk_freq = 100000000
vendor = "xilinx"
toolchain = "diamond"
phy = "mii"
core = "mac"
"#,
        );
        assert_eq!(cfg.unwrap_err().key(), Some("toolchain"));
    }

    #[test]
    fn rgmii_vendor_mismatch_rejected() {
        let (cfg, _) = load(
            r#"
clk_freq = 125000000
vendor = "lattice"
phy = "s7rgmii"
core = "mac"
"#,
        );
        assert_eq!(cfg.unwrap_err().key(), Some("phy"));
    }

    #[test]
    fn rgmii_delays_default_and_override() {
        let (cfg, sink) = load(
            r#"
clk_freq = 125000000
vendor = "lattice"
phy = "ecp5rgmii"
phy_rx_delay = 0
core = "mac"
"#,
        );
        let delays = cfg.unwrap().phy_delays.unwrap();
        assert_eq!((delays.tx_ns, delays.rx_ns), (2, 0));
        assert!(sink.is_empty());
    }

    #[test]
    fn delays_on_non_rgmii_warn_and_drop() {
        let (cfg, sink) = load(
            r#"
clk_freq = 125000000
vendor = "xilinx"
phy = "gmii"
phy_tx_delay = 1
core = "mac"
"#,
        );
        assert!(cfg.unwrap().phy_delays.is_none());
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::UNUSED_PHY_DELAY);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert_eq!(diags[0].subject.as_deref(), Some("phy_tx_delay"));
    }

    #[test]
    fn auto_needs_pad_family() {
        let (cfg, _) = load("clk_freq = 1\nvendor = \"xilinx\"\ncore = \"mac\"\n");
        assert_eq!(cfg.unwrap_err().key(), Some("phy_pads"));

        let (cfg, _) = load(
            "clk_freq = 1\nvendor = \"xilinx\"\nphy = \"auto\"\nphy_pads = \"gmii\"\ncore = \"mac\"\n",
        );
        assert_eq!(cfg.unwrap().phy, PhySelection::Auto(PadFamily::Gmii));
    }

    #[test]
    fn explicit_phy_on_foreign_pads_rejected() {
        let (cfg, _) = load(
            "clk_freq = 1\nvendor = \"xilinx\"\nphy = \"mii\"\nphy_pads = \"gmii\"\ncore = \"mac\"\n",
        );
        assert_eq!(cfg.unwrap_err().key(), Some("phy_pads"));
    }

    #[test]
    fn python_literals_normalized() {
        let (cfg, _) = load(
            r#"
clk_freq = 100000000
vendor = "xilinx"
device = "None"
phy = "mii"
core = "mac"
full_memory_we = "True"
"#,
        );
        let cfg = cfg.unwrap();
        assert_eq!(cfg.platform.device, "");
        match cfg.core {
            CoreSettings::Mac(mac) => assert!(mac.full_memory_we),
            other => panic!("unexpected core {other:?}"),
        }
    }

    #[test]
    fn mac_settings_parsed() {
        let (cfg, _) = load(
            r#"
clk_freq = 100000000
vendor = "xilinx"
phy = "mii"
core = "mac"
nrxslots = 3
ntxslots = 1
endianness = "little"
"#,
        );
        let CoreSettings::Mac(mac) = cfg.unwrap().core else {
            panic!("expected a MAC core");
        };
        assert_eq!((mac.nrxslots, mac.ntxslots), (3, 1));
        assert_eq!(mac.endianness, Endianness::Little);
    }

    #[test]
    fn zero_slots_rejected() {
        let (cfg, _) = load(
            "clk_freq = 1\nvendor = \"xilinx\"\nphy = \"mii\"\ncore = \"mac\"\nnrxslots = 0\n",
        );
        assert_eq!(cfg.unwrap_err().key(), Some("nrxslots"));
    }

    #[test]
    fn bad_endianness_rejected() {
        let (cfg, _) = load(
            "clk_freq = 1\nvendor = \"xilinx\"\nphy = \"mii\"\ncore = \"mac\"\nendianness = \"middle\"\n",
        );
        assert_eq!(cfg.unwrap_err().key(), Some("endianness"));
    }

    #[test]
    fn udp_settings_parsed() {
        let (cfg, _) = load(
            r#"
clk_freq = 125000000
vendor = "xilinx"
phy = "gmii"
core = "udp"
port = 6000
ip_address = "192.168.1.50"
mac_address = 0x10e2d5000000
"#,
        );
        let CoreSettings::Udp(udp) = cfg.unwrap().core else {
            panic!("expected a UDP core");
        };
        assert_eq!(udp.port, 6000);
        assert_eq!(udp.ip_address, Some(Ipv4Addr::new(192, 168, 1, 50)));
        assert_eq!(udp.mac_address.unwrap().to_string(), "10:e2:d5:00:00:00");
    }

    #[test]
    fn udp_integer_ip() {
        let (cfg, _) = load(
            "clk_freq = 1\nvendor = \"xilinx\"\nphy = \"gmii\"\ncore = \"udp\"\nport = 1\nip_address = 3232235826\n",
        );
        let CoreSettings::Udp(udp) = cfg.unwrap().core else {
            panic!("expected a UDP core");
        };
        assert_eq!(udp.ip_address, Some(Ipv4Addr::new(192, 168, 1, 50)));
        assert_eq!(udp.mac_address, None);
    }

    #[test]
    fn udp_requires_port_in_range() {
        let (cfg, _) = load("clk_freq = 1\nvendor = \"xilinx\"\nphy = \"gmii\"\ncore = \"udp\"\n");
        assert_eq!(cfg.unwrap_err().key(), Some("port"));

        let (cfg, _) = load(
            "clk_freq = 1\nvendor = \"xilinx\"\nphy = \"gmii\"\ncore = \"udp\"\nport = 70000\n",
        );
        assert_eq!(cfg.unwrap_err().key(), Some("port"));
    }

    #[test]
    fn bad_ip_rejected() {
        let (cfg, _) = load(
            "clk_freq = 1\nvendor = \"xilinx\"\nphy = \"gmii\"\ncore = \"udp\"\nport = 1\nip_address = \"192.168.1\"\n",
        );
        assert_eq!(cfg.unwrap_err().key(), Some("ip_address"));
    }

    #[test]
    fn unknown_core_not_found() {
        let (cfg, _) = load("clk_freq = 1\nvendor = \"xilinx\"\nphy = \"mii\"\ncore = \"pcie\"\n");
        assert!(matches!(cfg.unwrap_err(), GenError::NotFound { .. }));
    }

    #[test]
    fn unknown_keys_forwarded_with_note() {
        let (cfg, sink) = load(
            r#"
clk_freq = 100000000
vendor = "xilinx"
phy = "mii"
core = "mac"
ident = "top"
integrated_rom_size = 0

[soc]
integrated_rom_size = 4096
"#,
        );
        let cfg = cfg.unwrap();
        assert_eq!(cfg.soc.args["ident"].as_str(), Some("top"));
        assert_eq!(cfg.soc.args["integrated_rom_size"].as_integer(), Some(4096));
        let codes: Vec<DiagnosticCode> = sink.take_all().iter().map(|d| d.code).collect();
        assert!(codes.contains(&DiagnosticCode::FORWARDED_KEY));
        assert!(codes.contains(&DiagnosticCode::SHADOWED_KEY));
    }

    #[test]
    fn invalid_toml_rejected() {
        let (cfg, _) = load("this is not valid toml {{{}}}");
        assert_eq!(cfg.unwrap_err().key(), Some("<document>"));
    }
}
