//! Direct-burial pier sizing (IBC 1807.3 style, simplified)
//!
//! With `d` the pier diameter and `D` the embedment (ft), `W` the factored
//! dead load including the pier, `M`/`F` the factored wind moment and shear,
//! `S1` the allowable lateral bearing per foot of depth and `m` the pack's
//! lateral bearing multiplier:
//!
//! ```text
//! overturning = (W·d/2 + m·S1·D³·d/6) / (M + F·D)
//! bearing     = q_allow / max(W/A − γs·D, ε)
//! sliding     = (μ·W + m·S1·D²·d/2) / F
//! uplift      = (W + fs·π·d·D) / (c_up·F)
//! ```
//!
//! Every factor is evaluated for each load combination; the worst value of
//! each governs. A position is accepted only when it is also at least as
//! deep as IBC Eq. 18-1 asks for at its diameter:
//!
//! ```text
//! d = (4.36·h/b)·√(P/S)    d ≥ 36 in
//! ```
//!
//! with `P` the largest factored wind shear, `h` its height above grade,
//! `b` the pier diameter and `S = m·S1`. Geometry follows a [`GrowthChain`];
//! every acceptance test only gets harder as the load grows, so a larger
//! moment can only move the accepted position further along the chain.

use std::f64::consts::PI;

use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadType;
use crate::references::{Citation, CodeReference};
use crate::request::EmbedType;
use crate::standards::{SoilProperties, StandardsPack};

use super::{
    FailureMode, FoundationDesign, FoundationLoads, SafetyFactors, SizeLimits, SAFETY_FACTOR_CAP,
};

const EPS: f64 = 1e-9;

/// Minimum net bearing pressure (psf) used as the bearing denominator
const MIN_NET_PRESSURE_PSF: f64 = 1e-6;

const CUBIC_FT_PER_CUBIC_YD: f64 = 27.0;

/// Floor on the IBC Eq. 18-1 embedment (in)
pub const IBC_MIN_EMBEDMENT_IN: f64 = 36.0;

/// Geometry the pier must provide besides its safety factors
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PierRequirements {
    /// Anchor pattern width plus edge distance on both sides (in)
    pub min_diameter_in: f64,
    /// Anchor embedment the pier has to contain (in)
    pub min_depth_in: f64,
}

/// Sequence of (diameter, depth) positions in inches.
///
/// Depth grows by one step while it stays within `ratio × diameter`;
/// otherwise diameter grows. Once a dimension reaches its cap only the other
/// one grows. Both dimensions are non-decreasing along the chain and the
/// chain does not depend on the loads.
#[derive(Debug, Clone)]
pub struct GrowthChain {
    diameter_in: f64,
    depth_in: f64,
    step_in: f64,
    ratio: f64,
    max_diameter_in: f64,
    max_depth_in: f64,
    started: bool,
}

impl GrowthChain {
    pub fn new(limits: &SizeLimits, step_in: f64, ratio: f64) -> Self {
        GrowthChain {
            diameter_in: limits.start_diameter_in,
            depth_in: limits.start_depth_in,
            step_in,
            ratio,
            max_diameter_in: limits.max_diameter_in,
            max_depth_in: limits.max_depth_in,
            started: false,
        }
    }
}

impl Iterator for GrowthChain {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<(f64, f64)> {
        if !self.started {
            self.started = true;
            return Some((self.diameter_in, self.depth_in));
        }

        let next_depth = self.depth_in + self.step_in;
        let next_diameter = self.diameter_in + self.step_in;
        let depth_fits = next_depth <= self.max_depth_in + EPS;
        let diameter_fits = next_diameter <= self.max_diameter_in + EPS;

        if depth_fits && next_depth <= self.ratio * self.diameter_in + EPS {
            self.depth_in = next_depth;
        } else if diameter_fits {
            self.diameter_in = next_diameter;
        } else if depth_fits {
            self.depth_in = next_depth;
        } else {
            return None;
        }
        Some((self.diameter_in, self.depth_in))
    }
}

/// IBC 1807.3.2.1 Eq. 18-1 embedment (in) for a round post of diameter `b`
/// carrying `P` (lbf) at `h` (in) above grade, in soil with allowable
/// lateral bearing `S` (psf).
pub fn ibc_embedment_in(
    arm_in: f64,
    diameter_in: f64,
    lateral_lbf: f64,
    lateral_bearing_psf: f64,
) -> f64 {
    if lateral_lbf <= 0.0 || arm_in <= 0.0 {
        return IBC_MIN_EMBEDMENT_IN;
    }
    let depth = 4.36 * arm_in / diameter_in * (lateral_lbf / lateral_bearing_psf).sqrt();
    depth.max(IBC_MIN_EMBEDMENT_IN)
}

/// Eq. 18-1 depth at one diameter for these reactions
fn embedment_required_in(
    pack: &StandardsPack,
    soil: &SoilProperties,
    loads: &FoundationLoads,
    diameter_in: f64,
) -> f64 {
    let lateral = pack
        .combinations
        .iter()
        .map(|combo| combo.factored(LoadType::Wind, loads.shear_lbf))
        .fold(0.0, f64::max);
    let arm_in = if loads.shear_lbf > 0.0 {
        loads.moment_ftlb / loads.shear_lbf * 12.0
    } else {
        0.0
    };
    let s = pack.foundation.lateral_bearing_multiplier * soil.lateral_bearing_psf_per_ft;
    ibc_embedment_in(arm_in, diameter_in, lateral, s)
}

/// Pier concrete volume (yd³)
pub fn concrete_volume_yd3(diameter_in: f64, depth_in: f64) -> f64 {
    let d = diameter_in / 12.0;
    let depth = depth_in / 12.0;
    PI * d * d / 4.0 * depth / CUBIC_FT_PER_CUBIC_YD
}

/// Worst-case safety factors at one geometry, with the governing combination
pub fn safety_factors(
    pack: &StandardsPack,
    soil: &SoilProperties,
    loads: &FoundationLoads,
    diameter_in: f64,
    depth_in: f64,
) -> (SafetyFactors, String) {
    let rules = &pack.foundation;
    let d = diameter_in / 12.0;
    let depth = depth_in / 12.0;
    let area = PI * d * d / 4.0;
    let pier_weight = rules.concrete_unit_weight_pcf * area * depth;
    let s1 = soil.lateral_bearing_psf_per_ft;
    let m = rules.lateral_bearing_multiplier;

    let mut worst: Option<(SafetyFactors, f64, String)> = None;
    for combo in &pack.combinations {
        let w = combo.factored(LoadType::Dead, loads.dead_load_lbf + pier_weight);
        let moment = combo.factored(LoadType::Wind, loads.moment_ftlb);
        let shear = combo.factored(LoadType::Wind, loads.shear_lbf);

        let overturning = (w * d / 2.0 + m * s1 * depth.powi(3) * d / 6.0) / (moment + shear * depth);
        let net_pressure = (w / area - soil.unit_weight_pcf * depth).max(MIN_NET_PRESSURE_PSF);
        let bearing = soil.vertical_bearing_psf / net_pressure;
        let sliding = (soil.friction_coefficient * w + m * s1 * depth * depth * d / 2.0) / shear;
        let uplift = (w + soil.skin_friction_psf * PI * d * depth) / (rules.uplift_coefficient * shear);

        let factors = SafetyFactors {
            overturning: cap(overturning),
            bearing: cap(bearing),
            sliding: cap(sliding),
            uplift: cap(uplift),
        };
        let lowest = factors.governing().1;

        worst = Some(match worst {
            None => (factors, lowest, combo.name.clone()),
            Some((acc, acc_lowest, acc_name)) => {
                let merged = acc.min(&factors);
                if lowest < acc_lowest {
                    (merged, lowest, combo.name.clone())
                } else {
                    (merged, acc_lowest, acc_name)
                }
            }
        });
    }

    match worst {
        Some((factors, _, name)) => (factors, name),
        None => (
            SafetyFactors {
                overturning: SAFETY_FACTOR_CAP,
                bearing: SAFETY_FACTOR_CAP,
                sliding: SAFETY_FACTOR_CAP,
                uplift: SAFETY_FACTOR_CAP,
            },
            String::new(),
        ),
    }
}

/// Non-finite or very large factors (zero demand) report at the cap
fn cap(sf: f64) -> f64 {
    if sf.is_nan() {
        SAFETY_FACTOR_CAP
    } else {
        sf.min(SAFETY_FACTOR_CAP)
    }
}

/// Walk the growth chain to the first geometry that meets the minimum
/// factor, the Eq. 18-1 depth and `requirements`
pub fn design(
    pack: &StandardsPack,
    soil: &SoilProperties,
    loads: &FoundationLoads,
    limits: &SizeLimits,
    requirements: &PierRequirements,
) -> CalcResult<FoundationDesign> {
    if pack.combinations.is_empty() {
        return Err(CalcError::missing_pack_data(pack.id.as_str(), "combinations"));
    }
    let rules = &pack.foundation;
    let required = rules.min_safety_factor;

    let mut last = None;
    for (steps, (diameter_in, depth_in)) in
        GrowthChain::new(limits, rules.step_in, rules.depth_to_diameter_ratio).enumerate()
    {
        let (factors, combination) = safety_factors(pack, soil, loads, diameter_in, depth_in);
        let embedment_in = embedment_required_in(pack, soil, loads, diameter_in);
        let required_depth_in = embedment_in.max(requirements.min_depth_in);

        let fits = depth_in + EPS >= required_depth_in
            && diameter_in + EPS >= requirements.min_diameter_in;
        if fits && factors.meets(required) {
            let (governing_mode, _) = factors.governing();
            return Ok(FoundationDesign {
                embed: EmbedType::DirectBurial,
                diameter_in,
                depth_in,
                concrete_volume_yd3: concrete_volume_yd3(diameter_in, depth_in),
                required_embedment_in: embedment_in,
                safety_factors: factors,
                min_safety_factor: required,
                governing_mode,
                governing_combination: combination,
                chain_steps: steps + 1,
                anchors: None,
                references: vec![
                    Citation::new("embedment", CodeReference::ibc("1807.3")),
                    Citation::new("embedment depth (Eq. 18-1)", CodeReference::ibc("1807.3.2.1")),
                    Citation::new("soil", CodeReference::ibc("1806.2")),
                ],
            });
        }
        last = Some((factors, diameter_in, depth_in, required_depth_in));
    }

    let (best_effort, diameter_in, depth_in, required_depth_in) = last.ok_or_else(|| {
        CalcError::internal("foundation growth chain produced no positions")
    })?;
    let (governing, actual, needed) = if !best_effort.meets(required) {
        let (mode, sf) = best_effort.governing();
        (mode, sf, required)
    } else if depth_in + EPS < required_depth_in {
        (FailureMode::Embedment, depth_in, required_depth_in)
    } else {
        (FailureMode::AnchorEdgeDistance, diameter_in, requirements.min_diameter_in)
    };
    tracing::debug!(
        governing = %governing,
        actual,
        required = needed,
        diameter_in,
        depth_in,
        "foundation size limits exhausted"
    );
    Err(CalcError::ConstraintsInfeasible {
        governing,
        actual,
        required: needed,
        shortfall: needed - actual,
        diameter_in,
        depth_in,
        best_effort,
        anchor: None,
    })
}
