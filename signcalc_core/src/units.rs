//! # Unit Types
//!
//! Type-safe wrappers for the handful of units that cross a standard
//! boundary. The US path works natively in feet, pounds and psf; the EU path
//! works in metres, newtons and pascals and converts its resultant into the
//! US units shared by the downstream components.
//!
//! ## Example
//!
//! ```rust
//! use signcalc_core::units::{Feet, Inches, Newtons, Pounds};
//!
//! let arm = Feet(12.0);
//! let arm_in: Inches = arm.into();
//! assert_eq!(arm_in.0, 144.0);
//!
//! let force: Pounds = Newtons(1000.0).into();
//! assert!((force.0 - 224.809).abs() < 1e-3);
//! ```
//!
//! The module also owns the reporting precision policy (see [`Precision`]).

use serde::{Deserialize, Serialize};

// ============================================================================
// Length Units
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

impl From<Feet> for Meters {
    fn from(ft: Feet) -> Self {
        Meters(ft.0 * 0.3048)
    }
}

// ============================================================================
// Force Units
// ============================================================================

/// Force in pounds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pounds(pub f64);

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

impl From<Newtons> for Pounds {
    fn from(n: Newtons) -> Self {
        Pounds(n.0 * 0.224_809)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqFt(pub f64);

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqM(pub f64);

impl From<SqFt> for SqM {
    fn from(sqft: SqFt) -> Self {
        SqM(sqft.0 * 0.092_903)
    }
}

// ============================================================================
// Pressure Units
// ============================================================================

/// Pressure in pounds per square foot
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Psf(pub f64);

/// Pressure in pascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pascals(pub f64);

impl From<Pascals> for Psf {
    fn from(pa: Pascals) -> Self {
        Psf(pa.0 * 0.020_885_4)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in foot-pounds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FtLb(pub f64);

/// Moment in inch-pounds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InLb(pub f64);

impl From<FtLb> for InLb {
    fn from(ftlb: FtLb) -> Self {
        InLb(ftlb.0 * 12.0)
    }
}

impl From<InLb> for FtLb {
    fn from(inlb: InLb) -> Self {
        FtLb(inlb.0 / 12.0)
    }
}

// ============================================================================
// Reporting Precision
// ============================================================================

/// Decimal places used when a value is written into a result.
///
/// Checks always run on unrounded values; rounding happens once, when the
/// result envelope is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Forces and moments (1 dp)
    Force,
    /// Pressures (2 dp)
    Pressure,
    /// Dimensionless coefficients (3 dp)
    Coefficient,
    /// Demand/capacity ratios (3 dp)
    Ratio,
    /// Safety factors (2 dp)
    SafetyFactor,
    /// Dimensions (1 dp)
    Dimension,
    /// Volumes (2 dp)
    Volume,
    /// Wind speeds, mph or m/s (2 dp)
    Speed,
    /// Heights used in wind profiles, ft or m (2 dp)
    Height,
}

impl Precision {
    /// Number of decimal places for this quantity
    pub fn places(self) -> i32 {
        match self {
            Precision::Force | Precision::Dimension => 1,
            Precision::Pressure
            | Precision::SafetyFactor
            | Precision::Volume
            | Precision::Speed
            | Precision::Height => 2,
            Precision::Coefficient | Precision::Ratio => 3,
        }
    }

    /// Round half away from zero to this precision
    pub fn round(self, value: f64) -> f64 {
        let scale = 10f64.powi(self.places());
        (value * scale).round() / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversions() {
        let inches: Inches = Feet(2.5).into();
        assert_eq!(inches.0, 30.0);
        let feet: Feet = Inches(18.0).into();
        assert_eq!(feet.0, 1.5);
        let m: Meters = Feet(10.0).into();
        assert!((m.0 - 3.048).abs() < 1e-9);
    }

    #[test]
    fn test_si_to_us() {
        let area: SqM = SqFt(100.0).into();
        assert!((area.0 - 9.2903).abs() < 1e-6);
        let p: Psf = Pascals(1000.0).into();
        assert!((p.0 - 20.885).abs() < 1e-3);
    }

    #[test]
    fn test_moment_conversions() {
        let m: InLb = FtLb(1000.0).into();
        assert_eq!(m.0, 12000.0);
        let back: FtLb = m.into();
        assert_eq!(back.0, 1000.0);
    }

    #[test]
    fn test_precision_rounding() {
        assert_eq!(Precision::Pressure.round(24.4567), 24.46);
        assert_eq!(Precision::SafetyFactor.round(1.499), 1.5);
        assert_eq!(Precision::Ratio.round(0.12345), 0.123);
        assert_eq!(Precision::Force.round(-2.25), -2.3);
        assert_eq!(Precision::Speed.round(26.046), 26.05);
        assert_eq!(Precision::Height.round(4.004), 4.0);
    }

    #[test]
    fn test_rounding_never_drops_below_floor() {
        // A factor that passes at >= 1.5 must still read >= 1.5 after rounding
        for raw in [1.5, 1.5001, 1.504, 1.555] {
            assert!(Precision::SafetyFactor.round(raw) >= 1.5);
        }
    }
}
