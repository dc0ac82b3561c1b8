//! # Sign Design Request
//!
//! The structured input to the pipeline. Every field is plain data with serde
//! support; validation lives in [`SignDesignRequest::validate`].
//!
//! ## JSON Format
//!
//! ```json
//! {
//!   "jurisdiction": "US",
//!   "standard": { "code": "ASCE7", "version": "7-16", "importance": "II" },
//!   "site": { "exposure": "C", "elevation_ft": 0.0, "soil": "clay",
//!             "basic_wind_speed": 115.0 },
//!   "sign": { "width_ft": 10.0, "height_ft": 6.0,
//!             "centroid_height_ft": 15.0, "gross_weight_lbf": 450.0 },
//!   "supports": ["pipe", "tube", "W"],
//!   "embed": { "type": "direct" }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::SupportFamily;
use crate::errors::{CalcError, CalcResult};
use crate::standards::{ExposureCategory, ImportanceClass, Jurisdiction, SoilClass, StandardCode};

/// Standard descriptor: code family, edition and importance class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardSelection {
    pub code: StandardCode,
    /// Edition, e.g. "7-16", "7-22", "1-4"
    pub version: String,
    pub importance: ImportanceClass,
}

/// Site conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConditions {
    pub exposure: ExposureCategory,

    /// Ground elevation above sea level (ft)
    #[serde(default)]
    pub elevation_ft: f64,

    pub soil: SoilClass,

    /// Basic wind speed in the standard's native unit (mph for ASCE 7,
    /// m/s for EN 1991). The pack default is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_wind_speed: Option<f64>,

    /// Local frost depth (in); the pier bottom is kept below it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frost_depth_in: Option<f64>,
}

/// Sign panel geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignGeometry {
    pub width_ft: f64,
    pub height_ft: f64,
    /// Height of the panel centroid above grade (ft)
    pub centroid_height_ft: f64,
    /// Panel and attachment weight (lbf), excluding the support member
    #[serde(default)]
    pub gross_weight_lbf: f64,
}

impl SignGeometry {
    /// Projected panel area (ft²)
    pub fn area_sqft(&self) -> f64 {
        self.width_ft * self.height_ft
    }

    /// Overall height from grade to the top of the panel (ft)
    pub fn top_height_ft(&self) -> f64 {
        self.centroid_height_ft + self.height_ft / 2.0
    }
}

/// Foundation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmbedType {
    /// Pole cast directly into a drilled concrete pier
    #[serde(rename = "direct")]
    DirectBurial,
    /// Pole on a baseplate anchored to a concrete pier
    #[serde(rename = "baseplate")]
    Baseplate,
}

impl EmbedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedType::DirectBurial => "direct",
            EmbedType::Baseplate => "baseplate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Embedment {
    #[serde(rename = "type")]
    pub kind: EmbedType,
}

/// Optional caller-imposed foundation size caps
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_foundation_dia_in: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_embed_in: Option<f64>,
}

/// Explicit wind coefficient overrides; each replaces the pack value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kzt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ke: Option<f64>,
    /// G (ASCE 7) or cs·cd (EN 1991)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gust_factor: Option<f64>,
    /// Cf (ASCE 7) or cf (EN 1991)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_coefficient: Option<f64>,
}

impl WindOverrides {
    fn entries(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("kzt", self.kzt),
            ("kd", self.kd),
            ("ke", self.ke),
            ("gust_factor", self.gust_factor),
            ("force_coefficient", self.force_coefficient),
        ]
    }
}

/// A complete sign design request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignDesignRequest {
    pub jurisdiction: Jurisdiction,
    pub standard: StandardSelection,
    pub site: SiteConditions,
    pub sign: SignGeometry,
    /// Acceptable support families in preference order
    pub supports: Vec<SupportFamily>,
    pub embed: Embedment,
    #[serde(default)]
    pub constraints: SizeConstraints,
    #[serde(default)]
    pub wind_overrides: WindOverrides,
}

impl SignDesignRequest {
    /// Validate request values.
    ///
    /// Size caps are not checked here; caps that admit no geometry are a
    /// design outcome reported by the foundation designer.
    pub fn validate(&self) -> CalcResult<()> {
        if self.standard.code.jurisdiction() != self.jurisdiction {
            return Err(CalcError::invalid_input(
                "standard.code",
                self.standard.code.as_str(),
                format!(
                    "{} is not a {:?} standard",
                    self.standard.code, self.jurisdiction
                ),
            ));
        }

        positive("sign.width_ft", self.sign.width_ft)?;
        positive("sign.height_ft", self.sign.height_ft)?;
        positive("sign.centroid_height_ft", self.sign.centroid_height_ft)?;
        non_negative("sign.gross_weight_lbf", self.sign.gross_weight_lbf)?;
        if self.sign.centroid_height_ft < self.sign.height_ft / 2.0 {
            return Err(CalcError::invalid_input(
                "sign.centroid_height_ft",
                self.sign.centroid_height_ft.to_string(),
                "Panel would extend below grade (centroid lower than half the panel height)",
            ));
        }

        if !self.site.elevation_ft.is_finite() {
            return Err(CalcError::invalid_input(
                "site.elevation_ft",
                self.site.elevation_ft.to_string(),
                "Elevation must be finite",
            ));
        }
        if let Some(v) = self.site.basic_wind_speed {
            positive("site.basic_wind_speed", v)?;
        }
        if let Some(frost) = self.site.frost_depth_in {
            non_negative("site.frost_depth_in", frost)?;
        }

        for (name, value) in self.wind_overrides.entries() {
            if let Some(v) = value {
                positive(&format!("wind_overrides.{}", name), v)?;
            }
        }

        if self.supports.is_empty() {
            return Err(CalcError::invalid_input(
                "supports",
                "[]",
                "At least one support family is required",
            ));
        }
        for (i, family) in self.supports.iter().enumerate() {
            if self.supports[..i].contains(family) {
                return Err(CalcError::invalid_input(
                    "supports",
                    family.as_str(),
                    "Support family listed more than once",
                ));
            }
        }

        Ok(())
    }
}

fn positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Must be a positive number",
        ));
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Must be zero or positive",
        ));
    }
    Ok(())
}

/// Baseline request used across unit tests (scenario A geometry)
#[cfg(test)]
pub(crate) fn sample_request() -> SignDesignRequest {
    SignDesignRequest {
        jurisdiction: Jurisdiction::Us,
        standard: StandardSelection {
            code: StandardCode::Asce7,
            version: "7-16".to_string(),
            importance: ImportanceClass::II,
        },
        site: SiteConditions {
            exposure: ExposureCategory::C,
            elevation_ft: 0.0,
            soil: SoilClass::Clay,
            basic_wind_speed: Some(115.0),
            frost_depth_in: None,
        },
        sign: SignGeometry {
            width_ft: 10.0,
            height_ft: 6.0,
            centroid_height_ft: 15.0,
            gross_weight_lbf: 450.0,
        },
        supports: vec![SupportFamily::Pipe],
        embed: Embedment {
            kind: EmbedType::DirectBurial,
        },
        constraints: SizeConstraints::default(),
        wind_overrides: WindOverrides::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        assert!(sample_request().validate().is_ok());
    }

    #[test]
    fn test_jurisdiction_mismatch() {
        let mut req = sample_request();
        req.jurisdiction = Jurisdiction::Eu;
        let err = req.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let mut req = sample_request();
        req.sign.width_ft = 0.0;
        assert!(req.validate().is_err());

        let mut req = sample_request();
        req.sign.centroid_height_ft = 2.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_family() {
        let mut req = sample_request();
        req.supports = vec![SupportFamily::Pipe, SupportFamily::Tube, SupportFamily::Pipe];
        assert!(req.validate().is_err());
        req.supports.clear();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_override() {
        let mut req = sample_request();
        req.wind_overrides.kzt = Some(0.0);
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("wind_overrides.kzt"));
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "jurisdiction": "US",
            "standard": {"code": "ASCE7", "version": "7-22", "importance": "III"},
            "site": {"exposure": "B", "soil": "sandy_gravel"},
            "sign": {"width_ft": 8, "height_ft": 4, "centroid_height_ft": 12},
            "supports": ["W", "tube"],
            "embed": {"type": "baseplate"},
            "constraints": {"max_foundation_dia_in": 30}
        }"#;
        let req: SignDesignRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.embed.kind, EmbedType::Baseplate);
        assert_eq!(req.supports, vec![SupportFamily::WideFlange, SupportFamily::Tube]);
        assert_eq!(req.site.elevation_ft, 0.0);
        assert_eq!(req.sign.gross_weight_lbf, 0.0);
        assert_eq!(req.constraints.max_foundation_dia_in, Some(30.0));
        assert!(req.validate().is_ok());
    }
}
