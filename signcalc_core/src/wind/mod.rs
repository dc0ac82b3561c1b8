//! # Wind Load Engine
//!
//! Velocity pressure and resultant force/moment on a flat sign panel. The
//! engine has one strategy per standard family:
//!
//! - **ASCE 7** ([`asce7`]): `qz = K·Kz·Kzt·Kd·Ke·V²`, `F = qz·G·Cf·Iw·A`
//! - **EN 1991-1-4** ([`en1991`]): `qp(z) = Ce(z)·Ce,T·qb`, `F = cs·cd·cf·qp·Aref`
//!
//! The two share an output shape but not their coefficients: `Kz` and
//! `Ce(z)` are different physical quantities, so each strategy reports its
//! own coefficient set.
//!
//! Heights are clipped up to the standard minimum before any table lookup.
//! Heights above the table (or `z_max`) fail with `MissingPackData`; the
//! engine never extrapolates.
//!
//! Forces and moments are nominal (unfactored). Load combination factors are
//! applied by the member and foundation checks.

pub mod asce7;
pub mod en1991;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::references::Citation;
use crate::request::{SignDesignRequest, WindOverrides};
use crate::standards::{
    Asce7WindData, En1991WindData, ExposureCategory, ImportanceClass, StandardCode, StandardsPack,
    WindData,
};
use crate::units::Precision;

/// Inputs to a wind calculation
#[derive(Debug, Clone, PartialEq)]
pub struct WindInput {
    pub exposure: ExposureCategory,
    pub importance: ImportanceClass,
    /// Height of the resultant above grade (ft)
    pub height_ft: f64,
    /// Projected area (ft²)
    pub area_sqft: f64,
    pub elevation_ft: f64,
    /// Native unit of the standard (mph or m/s); pack default when `None`
    pub basic_wind_speed: Option<f64>,
    pub overrides: WindOverrides,
}

impl WindInput {
    pub fn from_request(request: &SignDesignRequest) -> Self {
        WindInput {
            exposure: request.site.exposure,
            importance: request.standard.importance,
            height_ft: request.sign.centroid_height_ft,
            area_sqft: request.sign.area_sqft(),
            elevation_ft: request.site.elevation_ft,
            basic_wind_speed: request.site.basic_wind_speed,
            overrides: request.wind_overrides,
        }
    }
}

/// ASCE 7 coefficients used for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asce7Coefficients {
    /// Basic wind speed V (mph)
    pub basic_wind_speed_mph: f64,
    /// Height actually used for the Kz lookup (ft)
    pub height_used_ft: f64,
    pub velocity_constant: f64,
    pub kz: f64,
    pub kzt: f64,
    pub kd: f64,
    pub ke: f64,
    pub gust_factor: f64,
    pub force_coefficient: f64,
    pub importance_factor: f64,
}

/// EN 1991-1-4 coefficients used for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct En1991Coefficients {
    /// Fundamental basic wind velocity vb,0 (m/s)
    pub vb0_ms: f64,
    /// Basic wind velocity vb (m/s)
    pub vb_ms: f64,
    /// Basic velocity pressure qb (Pa)
    pub qb_pa: f64,
    pub terrain_category: String,
    /// Height actually used (m)
    pub z_used_m: f64,
    pub z0_m: f64,
    pub kr: f64,
    pub cr: f64,
    pub co: f64,
    pub iv: f64,
    pub ce: f64,
    pub ce_t: f64,
    /// Peak velocity pressure qp (Pa)
    pub qp_pa: f64,
    pub cs_cd: f64,
    pub cf: f64,
    pub importance_factor: f64,
}

/// Coefficient set, tagged by the standard that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "standard")]
pub enum WindCoefficients {
    #[serde(rename = "ASCE7")]
    Asce7(Asce7Coefficients),
    #[serde(rename = "EN1991")]
    En1991(En1991Coefficients),
}

/// Wind load on the sign panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindLoadResult {
    /// Velocity pressure qz (ASCE 7) or peak pressure qp (EN 1991), psf
    pub pressure_psf: f64,
    /// Nominal resultant force (lbf)
    pub force_lbf: f64,
    /// Resultant overturning moment at grade (ft-lb)
    pub moment_ftlb: f64,
    /// Moment arm above grade (ft)
    pub arm_ft: f64,
    /// Loaded area (ft²)
    pub area_sqft: f64,
    pub coefficients: WindCoefficients,
    pub references: Vec<Citation>,
    /// Normalization notes (defaults applied, clipping)
    pub assumptions: Vec<String>,
}

impl WindLoadResult {
    /// Copy with every reported number at reporting precision
    pub fn rounded(&self) -> WindLoadResult {
        let coefficients = match &self.coefficients {
            WindCoefficients::Asce7(c) => WindCoefficients::Asce7(Asce7Coefficients {
                basic_wind_speed_mph: Precision::Speed.round(c.basic_wind_speed_mph),
                height_used_ft: Precision::Height.round(c.height_used_ft),
                velocity_constant: c.velocity_constant,
                kz: Precision::Coefficient.round(c.kz),
                kzt: Precision::Coefficient.round(c.kzt),
                kd: Precision::Coefficient.round(c.kd),
                ke: Precision::Coefficient.round(c.ke),
                gust_factor: Precision::Coefficient.round(c.gust_factor),
                force_coefficient: Precision::Coefficient.round(c.force_coefficient),
                importance_factor: Precision::Coefficient.round(c.importance_factor),
            }),
            WindCoefficients::En1991(c) => WindCoefficients::En1991(En1991Coefficients {
                vb0_ms: Precision::Speed.round(c.vb0_ms),
                vb_ms: Precision::Speed.round(c.vb_ms),
                qb_pa: Precision::Pressure.round(c.qb_pa),
                terrain_category: c.terrain_category.clone(),
                z_used_m: Precision::Height.round(c.z_used_m),
                z0_m: c.z0_m,
                kr: Precision::Coefficient.round(c.kr),
                cr: Precision::Coefficient.round(c.cr),
                co: Precision::Coefficient.round(c.co),
                iv: Precision::Coefficient.round(c.iv),
                ce: Precision::Coefficient.round(c.ce),
                ce_t: Precision::Coefficient.round(c.ce_t),
                qp_pa: Precision::Pressure.round(c.qp_pa),
                cs_cd: Precision::Coefficient.round(c.cs_cd),
                cf: Precision::Coefficient.round(c.cf),
                importance_factor: Precision::Coefficient.round(c.importance_factor),
            }),
        };
        WindLoadResult {
            pressure_psf: Precision::Pressure.round(self.pressure_psf),
            force_lbf: Precision::Force.round(self.force_lbf),
            moment_ftlb: Precision::Force.round(self.moment_ftlb),
            arm_ft: Precision::Dimension.round(self.arm_ft),
            area_sqft: Precision::Dimension.round(self.area_sqft),
            coefficients,
            references: self.references.clone(),
            assumptions: self.assumptions.clone(),
        }
    }

    /// Kz when computed under ASCE 7
    pub fn kz(&self) -> Option<f64> {
        match &self.coefficients {
            WindCoefficients::Asce7(c) => Some(c.kz),
            WindCoefficients::En1991(_) => None,
        }
    }
}

/// Wind strategy bound to one loaded pack
#[derive(Debug, Clone, Copy)]
pub enum WindLoadEngine<'a> {
    Asce7 {
        pack: &'a StandardsPack,
        wind: &'a Asce7WindData,
    },
    En1991 {
        pack: &'a StandardsPack,
        wind: &'a En1991WindData,
    },
}

impl<'a> WindLoadEngine<'a> {
    /// Select the strategy matching the pack's code
    pub fn for_pack(pack: &'a StandardsPack) -> Self {
        match &pack.wind {
            WindData::Asce7(wind) => WindLoadEngine::Asce7 { pack, wind },
            WindData::En1991(wind) => WindLoadEngine::En1991 { pack, wind },
        }
    }

    pub fn standard(&self) -> StandardCode {
        match self {
            WindLoadEngine::Asce7 { .. } => StandardCode::Asce7,
            WindLoadEngine::En1991 { .. } => StandardCode::En1991,
        }
    }

    /// Compute the wind load (unrounded)
    pub fn compute(&self, input: &WindInput) -> CalcResult<WindLoadResult> {
        let result = match self {
            WindLoadEngine::Asce7 { pack, wind } => asce7::compute(pack, wind, input)?,
            WindLoadEngine::En1991 { pack, wind } => en1991::compute(pack, wind, input)?,
        };
        tracing::debug!(
            standard = self.standard().as_str(),
            pressure_psf = result.pressure_psf,
            force_lbf = result.force_lbf,
            moment_ftlb = result.moment_ftlb,
            "wind load computed"
        );
        Ok(result)
    }
}
