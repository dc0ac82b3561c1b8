//! # Foundation Design
//!
//! Sizes the concrete pier under the support and, for baseplate mounts,
//! checks the anchor bolt pattern.
//!
//! - [`direct_burial`]: pier diameter and depth walked along a fixed growth
//!   chain until all four safety factors meet the pack minimum
//! - [`baseplate`]: 4-bolt symmetric anchor pattern; the pier under it is
//!   also wide enough for the pattern plus edge distance and deep enough for
//!   the bolt embedment
//!
//! Both paths check caller size caps before any sizing starts. Caps that
//! admit no geometry at all are `ContradictoryConstraints`; caps that only
//! stop the chain short of a passing size are `ConstraintsInfeasible`.

pub mod baseplate;
pub mod direct_burial;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::CatalogSection;
use crate::errors::{CalcError, CalcResult};
use crate::loads::{LoadCase, LoadType};
use crate::references::Citation;
use crate::request::{EmbedType, SizeConstraints};
use crate::standards::{FoundationRules, SoilClass, StandardsPack};
use crate::units::Precision;

pub use baseplate::{AnchorDesign, AnchorShortfall};
pub use direct_burial::{GrowthChain, PierRequirements};

/// Reporting cap for safety factors; also keeps unloaded modes finite
pub const SAFETY_FACTOR_CAP: f64 = 10.0;

/// Foundation or anchor failure modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    Overturning,
    Bearing,
    Sliding,
    Uplift,
    /// Pier shallower than the required embedment
    Embedment,
    AnchorTension,
    AnchorShear,
    /// Anchor pattern plus edge distance wider than the pier
    AnchorEdgeDistance,
}

impl FailureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureMode::Overturning => "overturning",
            FailureMode::Bearing => "bearing",
            FailureMode::Sliding => "sliding",
            FailureMode::Uplift => "uplift",
            FailureMode::Embedment => "embedment",
            FailureMode::AnchorTension => "anchor tension",
            FailureMode::AnchorShear => "anchor shear",
            FailureMode::AnchorEdgeDistance => "anchor edge distance",
        }
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four pier safety factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyFactors {
    pub overturning: f64,
    pub bearing: f64,
    pub sliding: f64,
    pub uplift: f64,
}

impl SafetyFactors {
    pub fn entries(&self) -> [(FailureMode, f64); 4] {
        [
            (FailureMode::Overturning, self.overturning),
            (FailureMode::Bearing, self.bearing),
            (FailureMode::Sliding, self.sliding),
            (FailureMode::Uplift, self.uplift),
        ]
    }

    /// Lowest factor and its mode; ties keep the earlier mode
    pub fn governing(&self) -> (FailureMode, f64) {
        let entries = self.entries();
        let mut governing = entries[0];
        for entry in &entries[1..] {
            if entry.1 < governing.1 {
                governing = *entry;
            }
        }
        governing
    }

    pub fn meets(&self, minimum: f64) -> bool {
        self.governing().1 >= minimum
    }

    /// Element-wise minimum (worst case over load combinations)
    pub fn min(&self, other: &SafetyFactors) -> SafetyFactors {
        SafetyFactors {
            overturning: self.overturning.min(other.overturning),
            bearing: self.bearing.min(other.bearing),
            sliding: self.sliding.min(other.sliding),
            uplift: self.uplift.min(other.uplift),
        }
    }

    pub fn rounded(&self) -> SafetyFactors {
        SafetyFactors {
            overturning: Precision::SafetyFactor.round(self.overturning),
            bearing: Precision::SafetyFactor.round(self.bearing),
            sliding: Precision::SafetyFactor.round(self.sliding),
            uplift: Precision::SafetyFactor.round(self.uplift),
        }
    }
}

/// Nominal reactions at grade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoundationLoads {
    /// Overturning moment from wind (ft-lb)
    pub moment_ftlb: f64,
    /// Horizontal shear from wind (lbf)
    pub shear_lbf: f64,
    /// Sign plus member weight (lbf), excluding the pier
    pub dead_load_lbf: f64,
}

/// Sized pier and, for baseplates, the anchor pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundationDesign {
    pub embed: EmbedType,
    pub diameter_in: f64,
    pub depth_in: f64,
    /// Pier concrete volume (yd³)
    pub concrete_volume_yd3: f64,
    /// IBC Eq. 18-1 depth at the chosen diameter (in)
    pub required_embedment_in: f64,
    pub safety_factors: SafetyFactors,
    pub min_safety_factor: f64,
    pub governing_mode: FailureMode,
    /// Load combination producing the lowest safety factor
    pub governing_combination: String,
    /// Growth chain positions evaluated, including the accepted one
    pub chain_steps: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchors: Option<AnchorDesign>,
    pub references: Vec<Citation>,
}

impl FoundationDesign {
    pub fn rounded(&self) -> FoundationDesign {
        FoundationDesign {
            diameter_in: Precision::Dimension.round(self.diameter_in),
            depth_in: Precision::Dimension.round(self.depth_in),
            concrete_volume_yd3: Precision::Volume.round(self.concrete_volume_yd3),
            required_embedment_in: Precision::Dimension.round(self.required_embedment_in),
            safety_factors: self.safety_factors.rounded(),
            anchors: self.anchors.as_ref().map(AnchorDesign::rounded),
            ..self.clone()
        }
    }
}

/// Effective size limits after merging caller caps with pack limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLimits {
    pub start_diameter_in: f64,
    pub start_depth_in: f64,
    pub max_diameter_in: f64,
    pub max_depth_in: f64,
}

/// Merge caller caps and frost depth with pack limits.
///
/// Fails with `ContradictoryConstraints` when no geometry can exist; every
/// conflict found is listed in the one diagnostic.
pub fn size_limits(
    rules: &FoundationRules,
    constraints: &SizeConstraints,
    frost_depth_in: Option<f64>,
) -> CalcResult<SizeLimits> {
    let mut conflicts = Vec::new();

    if let Some(cap) = constraints.max_foundation_dia_in {
        if !cap.is_finite() || cap <= 0.0 {
            conflicts.push(format!("max_foundation_dia_in {} is not positive", cap));
        } else if cap < rules.min_diameter_in {
            conflicts.push(format!(
                "max_foundation_dia_in {} in is below the {} in minimum pier diameter",
                cap, rules.min_diameter_in
            ));
        }
    }
    if let Some(cap) = constraints.max_embed_in {
        if !cap.is_finite() || cap <= 0.0 {
            conflicts.push(format!("max_embed_in {} is not positive", cap));
        } else if cap < rules.min_depth_in {
            conflicts.push(format!(
                "max_embed_in {} in is below the {} in minimum embedment",
                cap, rules.min_depth_in
            ));
        }
    }

    let max_diameter_in = constraints
        .max_foundation_dia_in
        .map_or(rules.max_diameter_in, |cap| cap.min(rules.max_diameter_in));
    let max_depth_in = constraints
        .max_embed_in
        .map_or(rules.max_depth_in, |cap| cap.min(rules.max_depth_in));

    let frost = frost_depth_in.unwrap_or(0.0);
    if frost > max_depth_in && max_depth_in >= rules.min_depth_in {
        conflicts.push(format!(
            "frost depth {} in is deeper than the {} in embedment limit",
            frost, max_depth_in
        ));
    }

    if !conflicts.is_empty() {
        return Err(CalcError::contradictory(conflicts.join("; ")));
    }

    Ok(SizeLimits {
        start_diameter_in: rules.min_diameter_in,
        start_depth_in: rules.min_depth_in.max(frost),
        max_diameter_in,
        max_depth_in,
    })
}

/// Foundation designer bound to one pack
#[derive(Debug, Clone, Copy)]
pub struct FoundationDesigner<'a> {
    pack: &'a StandardsPack,
}

impl<'a> FoundationDesigner<'a> {
    pub fn new(pack: &'a StandardsPack) -> Self {
        FoundationDesigner { pack }
    }

    /// Design the foundation for the chosen embedment type.
    ///
    /// `section` is the selected support member; the baseplate path uses its
    /// depth for the bolt spacing.
    pub fn design(
        &self,
        embed: EmbedType,
        loads: &FoundationLoads,
        soil: SoilClass,
        frost_depth_in: Option<f64>,
        constraints: &SizeConstraints,
        section: &CatalogSection,
    ) -> CalcResult<FoundationDesign> {
        LoadCase::new("base reactions")
            .with_load(LoadType::Dead, loads.dead_load_lbf)
            .with_load(LoadType::Wind, loads.moment_ftlb)
            .validate()?;
        let limits = size_limits(&self.pack.foundation, constraints, frost_depth_in)?;
        let soil_props = self.pack.soil(soil)?;

        let design = match embed {
            EmbedType::DirectBurial => direct_burial::design(
                self.pack,
                soil_props,
                loads,
                &limits,
                &PierRequirements::default(),
            )?,
            EmbedType::Baseplate => {
                let anchors = baseplate::select_anchors(self.pack, loads, section)?;
                if !anchors.passes() {
                    let pier = direct_burial::design(
                        self.pack,
                        soil_props,
                        loads,
                        &limits,
                        &PierRequirements::default(),
                    )?;
                    return Err(baseplate::anchor_shortfall(&anchors, &pier));
                }
                let mut pier = direct_burial::design(
                    self.pack,
                    soil_props,
                    loads,
                    &limits,
                    &baseplate::pier_requirements(&anchors),
                )?;
                pier.embed = EmbedType::Baseplate;
                pier.references.extend(anchors.references.iter().cloned());
                pier.anchors = Some(anchors);
                pier
            }
        };

        tracing::debug!(
            embed = embed.as_str(),
            diameter_in = design.diameter_in,
            depth_in = design.depth_in,
            governing = %design.governing_mode,
            "foundation designed"
        );
        Ok(design)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogProvider, SupportFamily};
    use crate::standards::{PackId, PackStore};
    use std::sync::Arc;

    fn rules() -> FoundationRules {
        PackStore::builtin()
            .load(PackId::UsAsce7_16)
            .unwrap()
            .foundation
            .clone()
    }

    #[test]
    fn test_governing_mode_is_lowest() {
        let sf = SafetyFactors {
            overturning: 2.0,
            bearing: 10.0,
            sliding: 1.2,
            uplift: 3.0,
        };
        assert_eq!(sf.governing(), (FailureMode::Sliding, 1.2));
        assert!(!sf.meets(1.5));
        assert!(sf.meets(1.2));
    }

    #[test]
    fn test_limits_merge_caps() {
        let caps = SizeConstraints {
            max_foundation_dia_in: Some(30.0),
            max_embed_in: Some(500.0),
        };
        let limits = size_limits(&rules(), &caps, Some(48.0)).unwrap();
        assert_eq!(limits.max_diameter_in, 30.0);
        assert_eq!(limits.max_depth_in, 240.0);
        assert_eq!(limits.start_depth_in, 48.0);
    }

    #[test]
    fn test_contradictory_caps_single_diagnostic() {
        let caps = SizeConstraints {
            max_foundation_dia_in: Some(6.0),
            max_embed_in: Some(12.0),
        };
        let err = size_limits(&rules(), &caps, None).unwrap_err();
        match err {
            CalcError::ContradictoryConstraints { reason } => {
                assert!(reason.contains("max_foundation_dia_in"));
                assert!(reason.contains("max_embed_in"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_positive_cap_is_contradictory() {
        let caps = SizeConstraints {
            max_foundation_dia_in: Some(0.0),
            max_embed_in: None,
        };
        let err = size_limits(&rules(), &caps, None).unwrap_err();
        assert_eq!(err.error_code(), "CONTRADICTORY_CONSTRAINTS");
    }

    #[test]
    fn test_frost_below_depth_cap_is_contradictory() {
        let caps = SizeConstraints {
            max_foundation_dia_in: None,
            max_embed_in: Some(48.0),
        };
        let err = size_limits(&rules(), &caps, Some(60.0)).unwrap_err();
        assert!(err.to_string().contains("frost depth"));
    }

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
    fn test_baseplate_pier_holds_anchor_pattern() {
        let p = pack();
        for scale in [0.5, 1.0, 2.0] {
            let design = FoundationDesigner::new(&p)
                .design(
                    EmbedType::Baseplate,
                    &loads(scale),
                    SoilClass::Clay,
                    None,
                    &SizeConstraints::default(),
                    &pipe8(),
                )
                .unwrap();
            let anchors = design.anchors.as_ref().unwrap();
            assert!(anchors.passes());
            assert!(
                design.diameter_in >= anchors.spacing_in + 2.0 * anchors.edge_distance_in,
                "pattern wider than pier at scale {}",
                scale
            );
            assert!(design.depth_in >= anchors.embedment_in);
            assert!(design.depth_in >= design.required_embedment_in);
        }
    }

    #[test]
    fn test_baseplate_failure_reports_real_pier() {
        let p = pack();
        let soil = p.soil(SoilClass::Clay).unwrap();
        let limits = size_limits(&p.foundation, &SizeConstraints::default(), None).unwrap();
        let pier =
            direct_burial::design(&p, soil, &loads(3.0), &limits, &PierRequirements::default())
                .unwrap();

        let err = FoundationDesigner::new(&p)
            .design(
                EmbedType::Baseplate,
                &loads(3.0),
                SoilClass::Clay,
                None,
                &SizeConstraints::default(),
                &pipe8(),
            )
            .unwrap_err();
        match err {
            CalcError::ConstraintsInfeasible {
                governing,
                diameter_in,
                depth_in,
                best_effort,
                anchor,
                ..
            } => {
                assert_eq!(governing, FailureMode::AnchorTension);
                assert_eq!((diameter_in, depth_in), (pier.diameter_in, pier.depth_in));
                assert_eq!(best_effort, pier.safety_factors);
                assert!(best_effort.meets(p.foundation.min_safety_factor));
                assert_eq!(anchor.map(|a| a.bolt_diameter_in), Some(2.0));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_pier_capped_below_anchor_footprint() {
        let p = pack();
        let light = FoundationLoads {
            moment_ftlb: 2_000.0,
            shear_lbf: 20.0,
            dead_load_lbf: 880.0,
        };
        let caps = SizeConstraints {
            max_foundation_dia_in: Some(18.0),
            max_embed_in: Some(60.0),
        };
        let err = FoundationDesigner::new(&p)
            .design(EmbedType::Baseplate, &light, SoilClass::Sand, None, &caps, &pipe8())
            .unwrap_err();
        match err {
            CalcError::ConstraintsInfeasible { governing, actual, required, anchor, .. } => {
                assert_eq!(governing, FailureMode::AnchorEdgeDistance);
                assert_eq!(actual, 18.0);
                // 0.75 in bolts: 12.625 + 2 · 4.5
                assert!((required - 21.625).abs() < 1e-12);
                assert!(anchor.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_direct_burial_has_no_anchor_floor() {
        let p = pack();
        let light = FoundationLoads {
            moment_ftlb: 2_000.0,
            shear_lbf: 20.0,
            dead_load_lbf: 880.0,
        };
        let caps = SizeConstraints {
            max_foundation_dia_in: Some(18.0),
            max_embed_in: Some(60.0),
        };
        let design = FoundationDesigner::new(&p)
            .design(EmbedType::DirectBurial, &light, SoilClass::Sand, None, &caps, &pipe8())
            .unwrap();
        assert_eq!(design.diameter_in, 18.0);
        assert!(design.anchors.is_none());
    }

    #[test]
    fn test_failure_mode_display() {
        assert_eq!(FailureMode::AnchorTension.to_string(), "anchor tension");
        let json = serde_json::to_string(&FailureMode::Overturning).unwrap();
        assert_eq!(json, "\"overturning\"");
    }
}
