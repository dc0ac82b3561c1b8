//! Baseplate anchor pattern (ACI 318 Chapter 17, allowable-stress form)
//!
//! Four anchors on a square pattern around the member. The spacing is the
//! member depth plus plate clearance on each side; embedment and edge
//! distance scale with the bolt diameter. Bolt diameters are tried in pack
//! order (ascending) and the first one passing both checks is used.
//!
//! ```text
//! T = M / (2·s) − W / 4                  tension per anchor
//! V = F / 4                              shear per anchor
//! Nsa = φt · Ab · futa                   steel tension
//! Nb  = φb · kc · √f'c · hef^1.5 · min(1, s / 3hef)
//! Vsa = φv · Ab · futa                   steel shear
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::catalog::CatalogSection;
use crate::errors::{CalcError, CalcResult};
use crate::loads::{find_governing_combination, LoadCase, LoadType};
use crate::references::{Citation, CodeReference};
use crate::standards::{AnchorRules, StandardsPack};
use crate::units::{FtLb, InLb, Precision};

use super::{FailureMode, FoundationDesign, FoundationLoads, PierRequirements, SAFETY_FACTOR_CAP};

/// Anchors per pattern
pub const ANCHOR_COUNT: u32 = 4;

/// Checked anchor pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorDesign {
    pub count: u32,
    pub bolt_diameter_in: f64,
    /// Center-to-center spacing, each direction (in)
    pub spacing_in: f64,
    pub embedment_in: f64,
    pub edge_distance_in: f64,
    /// Governing factored tension per anchor (lbf)
    pub tension_per_anchor_lbf: f64,
    pub shear_per_anchor_lbf: f64,
    pub tension_capacity_lbf: f64,
    pub shear_capacity_lbf: f64,
    pub tension_ratio: f64,
    pub shear_ratio: f64,
    pub tension_passes: bool,
    pub shear_passes: bool,
    pub governing_combination: String,
    /// Schedule reference, e.g. `4-AB-0.75-E9-S12.6`
    pub schedule_ref: String,
    pub references: Vec<Citation>,
}

impl AnchorDesign {
    pub fn passes(&self) -> bool {
        self.tension_passes && self.shear_passes
    }

    pub fn rounded(&self) -> AnchorDesign {
        AnchorDesign {
            spacing_in: Precision::Dimension.round(self.spacing_in),
            embedment_in: Precision::Dimension.round(self.embedment_in),
            edge_distance_in: Precision::Dimension.round(self.edge_distance_in),
            tension_per_anchor_lbf: Precision::Force.round(self.tension_per_anchor_lbf),
            shear_per_anchor_lbf: Precision::Force.round(self.shear_per_anchor_lbf),
            tension_capacity_lbf: Precision::Force.round(self.tension_capacity_lbf),
            shear_capacity_lbf: Precision::Force.round(self.shear_capacity_lbf),
            tension_ratio: Precision::Ratio.round(self.tension_ratio),
            shear_ratio: Precision::Ratio.round(self.shear_ratio),
            ..self.clone()
        }
    }
}

/// Largest bolt tried when no listed diameter passes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorShortfall {
    pub bolt_diameter_in: f64,
    pub tension_ratio: f64,
    pub shear_ratio: f64,
}

impl AnchorShortfall {
    pub fn rounded(&self) -> AnchorShortfall {
        AnchorShortfall {
            bolt_diameter_in: Precision::Dimension.round(self.bolt_diameter_in),
            tension_ratio: Precision::Ratio.round(self.tension_ratio),
            shear_ratio: Precision::Ratio.round(self.shear_ratio),
        }
    }
}

/// Per-anchor demand, worst over combinations
#[derive(Debug, Clone)]
struct AnchorDemand {
    tension_lbf: f64,
    shear_lbf: f64,
    combination: String,
}

fn demand(pack: &StandardsPack, loads: &FoundationLoads, spacing_in: f64) -> AnchorDemand {
    let count = f64::from(ANCHOR_COUNT);
    let moment: InLb = FtLb(loads.moment_ftlb).into();

    // Dead load relieves tension, so it enters with a negative sign
    let tension_case = LoadCase::new("anchor tension")
        .with_load(LoadType::Dead, -loads.dead_load_lbf / count)
        .with_load(LoadType::Wind, moment.0 / (2.0 * spacing_in));
    let shear_case = LoadCase::new("anchor shear").with_load(LoadType::Wind, loads.shear_lbf / count);

    let (tension_lbf, combination) = find_governing_combination(&tension_case, &pack.combinations)
        .map(|(combo, t)| (t.max(0.0), combo.name.clone()))
        .unwrap_or((0.0, String::new()));
    let shear_lbf = find_governing_combination(&shear_case, &pack.combinations)
        .map(|(_, v)| v)
        .unwrap_or(0.0);

    AnchorDemand {
        tension_lbf,
        shear_lbf,
        combination,
    }
}

/// Tension and shear capacity of one anchor (lbf)
fn capacities(rules: &AnchorRules, bolt_diameter_in: f64, spacing_in: f64) -> (f64, f64) {
    let ab = PI * bolt_diameter_in * bolt_diameter_in / 4.0;
    let futa = rules.steel_strength_ksi * 1000.0;
    let hef = rules.embedment_ratio * bolt_diameter_in;

    let steel_tension = rules.tension_strength_factor * ab * futa;
    let group = (spacing_in / (3.0 * hef)).min(1.0);
    let breakout = rules.breakout_strength_factor
        * rules.breakout_coefficient
        * rules.concrete_strength_psi.sqrt()
        * hef.powf(1.5)
        * group;
    let steel_shear = rules.shear_strength_factor * ab * futa;

    (steel_tension.min(breakout), steel_shear)
}

fn schedule_ref(bolt_diameter_in: f64, embedment_in: f64, spacing_in: f64) -> String {
    format!(
        "{}-AB-{}-E{}-S{}",
        ANCHOR_COUNT,
        bolt_diameter_in,
        Precision::Dimension.round(embedment_in),
        Precision::Dimension.round(spacing_in)
    )
}

/// Smallest passing bolt for the member's reactions, or the largest listed
/// bolt (failing) when none passes
pub fn select_anchors(
    pack: &StandardsPack,
    loads: &FoundationLoads,
    section: &CatalogSection,
) -> CalcResult<AnchorDesign> {
    let rules = &pack.anchors;
    if rules.bolt_diameters_in.is_empty() {
        return Err(CalcError::missing_pack_data(pack.id.as_str(), "anchors.bolt_diameters_in"));
    }

    let spacing_in = section.depth_in + 2.0 * rules.plate_clearance_in;
    let demand = demand(pack, loads, spacing_in);

    let mut last = None;
    for &bolt in &rules.bolt_diameters_in {
        let (tension_capacity, shear_capacity) = capacities(rules, bolt, spacing_in);
        let tension_ratio = demand.tension_lbf / tension_capacity;
        let shear_ratio = demand.shear_lbf / shear_capacity;
        let embedment_in = rules.embedment_ratio * bolt;

        let anchors = AnchorDesign {
            count: ANCHOR_COUNT,
            bolt_diameter_in: bolt,
            spacing_in,
            embedment_in,
            edge_distance_in: rules.edge_distance_ratio * bolt,
            tension_per_anchor_lbf: demand.tension_lbf,
            shear_per_anchor_lbf: demand.shear_lbf,
            tension_capacity_lbf: tension_capacity,
            shear_capacity_lbf: shear_capacity,
            tension_ratio,
            shear_ratio,
            tension_passes: tension_ratio <= 1.0,
            shear_passes: shear_ratio <= 1.0,
            governing_combination: demand.combination.clone(),
            schedule_ref: schedule_ref(bolt, embedment_in, spacing_in),
            references: vec![
                Citation::new("anchor steel tension", CodeReference::aci318("17.6.1")),
                Citation::new("anchor breakout", CodeReference::aci318("17.6.2")),
                Citation::new("anchor steel shear", CodeReference::aci318("17.7.1")),
            ],
        };
        if anchors.passes() {
            tracing::debug!(anchor = %anchors.schedule_ref, "anchor pattern selected");
            return Ok(anchors);
        }
        last = Some(anchors);
    }

    let largest = last.ok_or_else(|| CalcError::internal("no anchor diameters evaluated"))?;
    tracing::debug!(
        bolt_diameter_in = largest.bolt_diameter_in,
        tension_ratio = largest.tension_ratio,
        shear_ratio = largest.shear_ratio,
        "no anchor diameter passes"
    );
    Ok(largest)
}

/// Pier geometry needed to hold this pattern
pub fn pier_requirements(anchors: &AnchorDesign) -> PierRequirements {
    PierRequirements {
        min_diameter_in: anchors.spacing_in + 2.0 * anchors.edge_distance_in,
        min_depth_in: anchors.embedment_in,
    }
}

/// `ConstraintsInfeasible` for a failing pattern on `pier`.
///
/// `actual` is capacity over demand of the governing check against 1.0; the
/// pier dimensions and safety factors are those of the pier sized for the
/// same reactions.
pub fn anchor_shortfall(anchors: &AnchorDesign, pier: &FoundationDesign) -> CalcError {
    let (governing, ratio) = if anchors.tension_ratio >= anchors.shear_ratio {
        (FailureMode::AnchorTension, anchors.tension_ratio)
    } else {
        (FailureMode::AnchorShear, anchors.shear_ratio)
    };
    let actual = if ratio > 0.0 { (1.0 / ratio).min(SAFETY_FACTOR_CAP) } else { SAFETY_FACTOR_CAP };

    CalcError::ConstraintsInfeasible {
        governing,
        actual,
        required: 1.0,
        shortfall: 1.0 - actual,
        diameter_in: pier.diameter_in,
        depth_in: pier.depth_in,
        best_effort: pier.safety_factors,
        anchor: Some(AnchorShortfall {
            bolt_diameter_in: anchors.bolt_diameter_in,
            tension_ratio: anchors.tension_ratio,
            shear_ratio: anchors.shear_ratio,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogProvider, SupportFamily};
    use crate::foundation::{direct_burial, size_limits};
    use crate::request::SizeConstraints;
    use crate::standards::{PackId, PackStore, SoilClass};
    use std::sync::Arc;

    fn pack() -> Arc<StandardsPack> {
        PackStore::builtin().load(PackId::UsAsce7_16).unwrap()
    }

    fn pipe8() -> CatalogSection {
        CatalogProvider::builtin()
            .catalog(SupportFamily::Pipe)
            .unwrap()
            .lookup("Pipe8STD")
            .unwrap()
            .clone()
    }

    fn loads(scale: f64) -> FoundationLoads {
        FoundationLoads {
            moment_ftlb: 22_455.0 * scale,
            shear_lbf: 1_497.0 * scale,
            dead_load_lbf: 880.0,
        }
    }

    #[test]
    fn test_smallest_bolt_passes_scenario_a() {
        let p = pack();
        let a = select_anchors(&p, &loads(1.0), &pipe8()).unwrap();
        assert_eq!(a.bolt_diameter_in, 0.75);
        assert!((a.spacing_in - 12.625).abs() < 1e-12);
        assert_eq!(a.embedment_in, 9.0);
        assert_eq!(a.edge_distance_in, 4.5);
        assert_eq!(a.schedule_ref, "4-AB-0.75-E9-S12.6");
        assert!(a.passes());
    }

    #[test]
    fn test_tension_hand_check() {
        let p = pack();
        let a = select_anchors(&p, &loads(1.0), &pipe8()).unwrap();
        // 0.6D + 0.6W leaves the least dead load against uplift
        let m_inlb = 0.6 * 22_455.0 * 12.0;
        let expected = m_inlb / (2.0 * 12.625) - 0.6 * 880.0 / 4.0;
        assert!((a.tension_per_anchor_lbf - expected).abs() < 1e-9);
        assert_eq!(a.governing_combination, "ASD-7");
        assert!((a.shear_per_anchor_lbf - 0.6 * 1_497.0 / 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_larger_moment_needs_larger_bolt() {
        let p = pack();
        let small = select_anchors(&p, &loads(1.0), &pipe8()).unwrap();
        let large = select_anchors(&p, &loads(1.5), &pipe8()).unwrap();
        assert!(large.bolt_diameter_in > small.bolt_diameter_in);
    }

    fn stand_in_pier(p: &StandardsPack) -> FoundationDesign {
        let limits = size_limits(&p.foundation, &SizeConstraints::default(), None).unwrap();
        let soil = p.soil(SoilClass::Clay).unwrap();
        direct_burial::design(p, soil, &loads(1.0), &limits, &PierRequirements::default()).unwrap()
    }

    #[test]
    fn test_no_bolt_passes_reports_largest() {
        let p = pack();
        let a = select_anchors(&p, &loads(3.0), &pipe8()).unwrap();
        assert_eq!(a.bolt_diameter_in, 2.0);
        assert!(!a.tension_passes);
        assert!(a.shear_passes);
        // 0.6 · 3 · 22455 · 12 / (2 · 12.625) − 0.6 · 880 / 4 over the 2 in breakout
        assert!((a.tension_ratio - 1.385).abs() < 0.01);
    }

    #[test]
    fn test_tension_shortfall_carries_pier() {
        let p = pack();
        let pier = stand_in_pier(&p);
        let a = select_anchors(&p, &loads(3.0), &pipe8()).unwrap();
        match anchor_shortfall(&a, &pier) {
            CalcError::ConstraintsInfeasible {
                governing,
                actual,
                required,
                shortfall,
                diameter_in,
                depth_in,
                best_effort,
                anchor,
            } => {
                assert_eq!(governing, FailureMode::AnchorTension);
                assert!((actual - 1.0 / a.tension_ratio).abs() < 1e-12);
                assert_eq!(required, 1.0);
                assert!((shortfall - (1.0 - actual)).abs() < 1e-12);
                assert_eq!((diameter_in, depth_in), (pier.diameter_in, pier.depth_in));
                assert_eq!(best_effort, pier.safety_factors);
                let anchor = anchor.unwrap();
                assert_eq!(anchor.bolt_diameter_in, 2.0);
                assert_eq!(anchor.tension_ratio, a.tension_ratio);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_shear_only_shortfall() {
        let p = pack();
        let heavy_shear = FoundationLoads {
            moment_ftlb: 100.0,
            shear_lbf: 500_000.0,
            dead_load_lbf: 880.0,
        };
        let a = select_anchors(&p, &heavy_shear, &pipe8()).unwrap();
        assert_eq!(a.bolt_diameter_in, 2.0);
        assert_eq!(a.tension_per_anchor_lbf, 0.0);
        assert!(a.tension_passes);
        // 0.6 · 500000 / 4 against 0.39 · π · 2² / 4 · 58000
        let expected = 75_000.0 / (0.39 * PI * 58_000.0);
        assert!((a.shear_ratio - expected).abs() < 1e-9);
        assert!(a.shear_ratio > 1.0);

        let err = anchor_shortfall(&a, &stand_in_pier(&p));
        match &err {
            CalcError::ConstraintsInfeasible { governing, actual, .. } => {
                assert_eq!(*governing, FailureMode::AnchorShear);
                assert!((actual - 1.0 / expected).abs() < 1e-9);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("anchor shear"));
    }

    #[test]
    fn test_pier_requirements_from_pattern() {
        let p = pack();
        let a = select_anchors(&p, &loads(1.0), &pipe8()).unwrap();
        let req = pier_requirements(&a);
        // 12.625 + 2 · 4.5
        assert!((req.min_diameter_in - 21.625).abs() < 1e-12);
        assert_eq!(req.min_depth_in, 9.0);
    }

    #[test]
    fn test_dead_load_can_zero_tension() {
        let p = pack();
        let light = FoundationLoads {
            moment_ftlb: 10.0,
            shear_lbf: 1.0,
            dead_load_lbf: 5_000.0,
        };
        let a = select_anchors(&p, &light, &pipe8()).unwrap();
        assert_eq!(a.tension_per_anchor_lbf, 0.0);
    }
}
