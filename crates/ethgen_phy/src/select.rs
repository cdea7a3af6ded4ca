//! Physical-layer selection.
//!
//! An explicit PHY is authoritative and only checked against the supplied
//! pads. Without one, [`INFERENCE_RULES`] are evaluated in order and the
//! first rule whose predicate matches decides the outcome.

use crate::kind::PhyKind;
use crate::shape::validate_shape;
use ethgen_common::{GenError, GenResult};
use ethgen_platform::PortBundle;
use tracing::debug;

/// The outcome of a successful selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// The PHY to build.
    pub kind: PhyKind,
    /// The clock pads the PHY is built on.
    pub clock_pads: PortBundle,
    /// The data pads the PHY is built on.
    pub pads: PortBundle,
}

/// What a matching inference rule decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Build this PHY.
    Resolve(PhyKind),
    /// The shape is recognized but needs an explicit choice.
    Unsupported(&'static str),
}

/// One entry of the auto-detection decision list.
#[derive(Debug, Clone, Copy)]
pub struct InferenceRule {
    /// Short rule name, used in logs.
    pub name: &'static str,
    /// Predicate over `(clock_pads, pads)`.
    pub applies: fn(&PortBundle, &PortBundle) -> bool,
    /// Outcome when the predicate holds.
    pub verdict: Verdict,
}

fn gigabit(clock_pads: &PortBundle, pads: &PortBundle) -> bool {
    clock_pads.has("gtx") && pads.width("tx_data") == Some(8)
}

fn gigabit_with_mii_clock(clock_pads: &PortBundle, pads: &PortBundle) -> bool {
    gigabit(clock_pads, pads) && clock_pads.has("tx")
}

fn combined_control(_clock_pads: &PortBundle, pads: &PortBundle) -> bool {
    pads.has("rx_ctl")
}

fn nibble_data(_clock_pads: &PortBundle, pads: &PortBundle) -> bool {
    pads.width("tx_data") == Some(4)
}

/// The auto-detection decision list. Order is significant.
pub const INFERENCE_RULES: &[InferenceRule] = &[
    InferenceRule {
        name: "gmii-with-mii-fallback",
        applies: gigabit_with_mii_clock,
        verdict: Verdict::Resolve(PhyKind::GmiiMii),
    },
    InferenceRule {
        name: "gmii",
        applies: gigabit,
        verdict: Verdict::Resolve(PhyKind::Gmii),
    },
    InferenceRule {
        name: "rgmii",
        applies: combined_control,
        verdict: Verdict::Unsupported(
            "RGMII pads need a vendor-specific PHY; set `phy` to one of \
             s6rgmii, s7rgmii, usrgmii, ecp5rgmii",
        ),
    },
    InferenceRule {
        name: "mii",
        applies: nibble_data,
        verdict: Verdict::Resolve(PhyKind::Mii),
    },
];

/// Infers the PHY from pad shapes alone.
///
/// # Errors
///
/// - [`GenError::UnsupportedConfiguration`] for shapes that need an explicit
///   vendor-specific choice.
/// - [`GenError::AmbiguousConfiguration`] when no rule matches.
pub fn infer(clock_pads: &PortBundle, pads: &PortBundle) -> GenResult<PhyKind> {
    let rule = INFERENCE_RULES
        .iter()
        .find(|r| (r.applies)(clock_pads, pads))
        .ok_or_else(|| {
            GenError::AmbiguousConfiguration(format!(
                "pads `{}`/`{}` match no known PHY shape; set `phy` explicitly",
                clock_pads.name, pads.name
            ))
        })?;
    debug!(rule = rule.name, "PHY inference rule matched");
    match rule.verdict {
        Verdict::Resolve(kind) => Ok(kind),
        Verdict::Unsupported(reason) => Err(GenError::UnsupportedConfiguration(reason.to_string())),
    }
}

/// Resolves the PHY to build.
///
/// Performs no pad acquisition: the bundles are passed in by the caller and
/// handed back inside the [`Selection`].
///
/// # Errors
///
/// With an explicit kind, a [`GenError::Configuration`] on key `phy` when
/// the pads lack a required signal. Otherwise see [`infer`].
pub fn select(
    explicit: Option<PhyKind>,
    clock_pads: PortBundle,
    pads: PortBundle,
) -> GenResult<Selection> {
    let kind = match explicit {
        Some(kind) => {
            validate_shape(kind, &clock_pads, &pads)?;
            kind
        }
        None => infer(&clock_pads, &pads)?,
    };
    debug!(phy = %kind, explicit = explicit.is_some(), "PHY selected");
    Ok(Selection {
        kind,
        clock_pads,
        pads,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethgen_platform::{standard_io, IoDecl, Subsignal};

    fn catalog(name: &str) -> PortBundle {
        let io = standard_io();
        let decl = io.iter().find(|d| d.name == name).unwrap();
        PortBundle::from_decl(decl, name)
    }

    fn bundle(name: &str, signals: Vec<Subsignal>) -> PortBundle {
        PortBundle::from_decl(&IoDecl::record(name, 0, signals), name)
    }

    #[test]
    fn explicit_kind_with_matching_pads_is_identity() {
        for kind in PhyKind::ALL {
            let (clocks, pads) = match kind.family() {
                Some(f) => (catalog(f.clock_bundle()), catalog(f.data_bundle())),
                None => (PortBundle::empty("clocks"), PortBundle::empty("pads")),
            };
            let sel = select(Some(kind), clocks.clone(), pads.clone()).unwrap();
            assert_eq!(sel.kind, kind);
            assert_eq!(sel.clock_pads, clocks);
            assert_eq!(sel.pads, pads);
        }
    }

    #[test]
    fn explicit_kind_overrides_inference() {
        // The catalog GMII clocks would infer GmiiMii.
        let sel = select(
            Some(PhyKind::Gmii),
            catalog("gmii_eth_clocks"),
            catalog("gmii_eth"),
        )
        .unwrap();
        assert_eq!(sel.kind, PhyKind::Gmii);
    }

    #[test]
    fn explicit_kind_with_wrong_pads_rejected() {
        let err = select(
            Some(PhyKind::Rmii),
            catalog("mii_eth_clocks"),
            catalog("mii_eth"),
        )
        .unwrap_err();
        assert_eq!(err.key(), Some("phy"));
    }

    #[test]
    fn auto_gmii_with_tx_clock_is_combined() {
        let sel = select(None, catalog("gmii_eth_clocks"), catalog("gmii_eth")).unwrap();
        assert_eq!(sel.kind, PhyKind::GmiiMii);
    }

    #[test]
    fn auto_gmii_without_tx_clock_is_pure() {
        let clocks = bundle(
            "gmii_eth_clocks",
            vec![Subsignal::output("gtx", 1), Subsignal::input("rx", 1)],
        );
        let sel = select(None, clocks, catalog("gmii_eth")).unwrap();
        assert_eq!(sel.kind, PhyKind::Gmii);
    }

    #[test]
    fn auto_mii() {
        let sel = select(None, catalog("mii_eth_clocks"), catalog("mii_eth")).unwrap();
        assert_eq!(sel.kind, PhyKind::Mii);
    }

    #[test]
    fn auto_rgmii_is_unsupported() {
        let err = select(None, catalog("rgmii_eth_clocks"), catalog("rgmii_eth")).unwrap_err();
        assert!(matches!(err, GenError::UnsupportedConfiguration(_)));
    }

    #[test]
    fn rx_ctl_without_gigabit_match_always_unsupported() {
        // rx_ctl wins over a nibble-wide tx_data and over any clock shape.
        for clocks in [
            catalog("mii_eth_clocks"),
            catalog("rmii_eth_clocks"),
            PortBundle::empty("none"),
        ] {
            let pads = bundle(
                "odd",
                vec![Subsignal::input("rx_ctl", 1), Subsignal::output("tx_data", 4)],
            );
            let err = infer(&clocks, &pads).unwrap_err();
            assert!(matches!(err, GenError::UnsupportedConfiguration(_)));
        }
    }

    #[test]
    fn auto_rmii_is_ambiguous() {
        let err = select(None, catalog("rmii_eth_clocks"), catalog("rmii_eth")).unwrap_err();
        assert!(matches!(err, GenError::AmbiguousConfiguration(_)));
    }

    #[test]
    fn gigabit_rule_precedes_control_rule() {
        let pads = bundle(
            "hybrid",
            vec![Subsignal::input("rx_ctl", 1), Subsignal::output("tx_data", 8)],
        );
        assert_eq!(
            infer(&catalog("gmii_eth_clocks"), &pads).unwrap(),
            PhyKind::GmiiMii
        );
    }

    #[test]
    fn rule_order_is_fixed() {
        let names: Vec<&str> = INFERENCE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, ["gmii-with-mii-fallback", "gmii", "rgmii", "mii"]);
    }
}
