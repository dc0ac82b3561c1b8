//! Structural Section Catalogs (AISC)
//!
//! Ordered section tables for the three support families a sign may stand
//! on: round pipe, wide-flange and square hollow structural sections.
//!
//! ## Ordering
//!
//! Every catalog is sorted ascending by nominal weight, ties broken by
//! designation. The member selector returns the first passing entry, so this
//! order is what makes the selection least-weight and repeatable. A catalog
//! found out of order at selection time is an internal defect, not a design
//! outcome.
//!
//! ## Example
//!
//! ```rust
//! use signcalc_core::catalog::{CatalogProvider, SupportFamily};
//!
//! let provider = CatalogProvider::builtin();
//! let pipes = provider.sections(SupportFamily::Pipe).unwrap();
//! assert!(pipes.windows(2).all(|w| w[0].weight_plf <= w[1].weight_plf));
//! ```

pub mod builtin;
pub mod csv;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::{CalcError, CalcResult};
use crate::standards::{ContentHash, MaterialGrade};

pub use csv::{load_catalog_csv, parse_catalog_csv};

/// Support member family
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SupportFamily {
    /// Round steel pipe
    #[serde(rename = "pipe")]
    Pipe,
    /// Wide-flange (W-shape)
    #[serde(rename = "W")]
    WideFlange,
    /// Square hollow structural section
    #[serde(rename = "tube")]
    Tube,
}

impl SupportFamily {
    pub const ALL: [SupportFamily; 3] =
        [SupportFamily::Pipe, SupportFamily::WideFlange, SupportFamily::Tube];

    pub fn as_str(&self) -> &'static str {
        match self {
            SupportFamily::Pipe => "pipe",
            SupportFamily::WideFlange => "W",
            SupportFamily::Tube => "tube",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SupportFamily::Pipe => "Pipe",
            SupportFamily::WideFlange => "Wide Flange (W)",
            SupportFamily::Tube => "HSS Square",
        }
    }

    /// Grade assumed when a catalog row does not name one
    pub fn default_grade(&self) -> MaterialGrade {
        match self {
            SupportFamily::Pipe => MaterialGrade::A53B,
            SupportFamily::WideFlange => MaterialGrade::A992,
            SupportFamily::Tube => MaterialGrade::A500C,
        }
    }
}

impl FromStr for SupportFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pipe" => Ok(SupportFamily::Pipe),
            "w" | "wide_flange" | "wide-flange" => Ok(SupportFamily::WideFlange),
            "tube" | "hss" | "square_tube" => Ok(SupportFamily::Tube),
            other => Err(format!("unknown support family '{}'", other)),
        }
    }
}

impl fmt::Display for SupportFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One catalog entry
///
/// Dimensional values are in US customary units (inches, in², in³, in⁴).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSection {
    pub family: SupportFamily,

    /// AISC Manual label (e.g., "Pipe6STD", "W12X26", "HSS6X6X1/4")
    pub designation: String,

    /// Nominal weight per linear foot (lb/ft)
    pub weight_plf: f64,

    /// Cross-sectional area (in²)
    pub area_in2: f64,

    /// Strong-axis moment of inertia (in⁴)
    pub ix_in4: f64,

    /// Strong-axis elastic section modulus (in³)
    pub sx_in3: f64,

    /// Overall depth or outside diameter (in)
    pub depth_in: f64,

    pub grade: MaterialGrade,
}

impl CatalogSection {
    /// Catalog ordering: weight, then designation
    pub fn catalog_order(&self, other: &CatalogSection) -> Ordering {
        self.weight_plf
            .total_cmp(&other.weight_plf)
            .then_with(|| self.designation.cmp(&other.designation))
    }

    fn validate(&self) -> CalcResult<()> {
        let props = [
            ("weight_plf", self.weight_plf),
            ("area_in2", self.area_in2),
            ("ix_in4", self.ix_in4),
            ("sx_in3", self.sx_in3),
            ("depth_in", self.depth_in),
        ];
        for (name, value) in props {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_input(
                    format!("{}.{}", self.designation, name),
                    value.to_string(),
                    "Section properties must be positive",
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for CatalogSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.2} plf, A={:.2} in², Ix={:.1} in⁴, Sx={:.2} in³)",
            self.designation, self.weight_plf, self.area_in2, self.ix_in4, self.sx_in3
        )
    }
}

/// Ordered section table for one family
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    family: SupportFamily,
    sections: Vec<CatalogSection>,
    /// Human-readable origin ("builtin", a CSV path)
    pub source: String,
}

impl Catalog {
    /// Build a catalog, sorting into catalog order.
    ///
    /// Every section must belong to `family` and have positive properties.
    pub fn new(
        family: SupportFamily,
        mut sections: Vec<CatalogSection>,
        source: impl Into<String>,
    ) -> CalcResult<Self> {
        let mut seen = std::collections::BTreeSet::new();
        for section in &sections {
            if !seen.insert(section.designation.to_uppercase()) {
                return Err(CalcError::invalid_input(
                    "catalog.designation",
                    section.designation.clone(),
                    "Duplicate designation in catalog",
                ));
            }
            if section.family != family {
                return Err(CalcError::invalid_input(
                    "catalog.family",
                    section.designation.clone(),
                    format!("Section belongs to {}, not {}", section.family, family),
                ));
            }
            section.validate()?;
        }
        sections.sort_by(CatalogSection::catalog_order);
        Ok(Catalog {
            family,
            sections,
            source: source.into(),
        })
    }

    pub fn family(&self) -> SupportFamily {
        self.family
    }

    pub fn sections(&self) -> &[CatalogSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Look up a section by designation (case-insensitive)
    pub fn lookup(&self, designation: &str) -> Option<&CatalogSection> {
        self.sections
            .iter()
            .find(|s| s.designation.eq_ignore_ascii_case(designation))
    }

    /// Confirm the ascending-weight invariant.
    pub fn verify_order(&self) -> CalcResult<()> {
        for pair in self.sections.windows(2) {
            if pair[0].catalog_order(&pair[1]) != Ordering::Less {
                return Err(CalcError::internal(format!(
                    "{} catalog out of order at {} -> {}",
                    self.family.as_str(),
                    pair[0].designation,
                    pair[1].designation
                )));
            }
        }
        Ok(())
    }

    /// SHA-256 over the canonical JSON of the ordered sections
    pub fn content_hash(&self) -> CalcResult<ContentHash> {
        let bytes = serde_json::to_vec(&self.sections)
            .map_err(|e| CalcError::internal(format!("catalog serialization failed: {}", e)))?;
        Ok(ContentHash::from_bytes(&bytes))
    }
}

/// Read-only set of catalogs, one per family
#[derive(Debug, Clone)]
pub struct CatalogProvider {
    catalogs: BTreeMap<SupportFamily, Catalog>,
}

impl CatalogProvider {
    /// Provider over the built-in AISC tables
    pub fn builtin() -> Self {
        let mut catalogs = BTreeMap::new();
        for family in SupportFamily::ALL {
            catalogs.insert(family, builtin::builtin_catalog(family));
        }
        CatalogProvider { catalogs }
    }

    /// Replace one family's catalog (builder pattern)
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        tracing::info!(
            family = catalog.family().as_str(),
            sections = catalog.len(),
            source = %catalog.source,
            "catalog override installed"
        );
        self.catalogs.insert(catalog.family(), catalog);
        self
    }

    pub fn catalog(&self, family: SupportFamily) -> CalcResult<&Catalog> {
        self.catalogs
            .get(&family)
            .ok_or_else(|| CalcError::internal(format!("no catalog registered for {}", family.as_str())))
    }

    /// Sections of one family in catalog order.
    ///
    /// Fails with `Internal` if the ordering invariant does not hold.
    pub fn sections(&self, family: SupportFamily) -> CalcResult<&[CatalogSection]> {
        let catalog = self.catalog(family)?;
        catalog.verify_order()?;
        Ok(catalog.sections())
    }

    /// Combined hash over the catalogs of the given families, in the order given
    pub fn hash(&self, families: &[SupportFamily]) -> CalcResult<ContentHash> {
        let mut bytes = Vec::new();
        for family in families {
            let catalog = self.catalog(*family)?;
            bytes.extend_from_slice(family.as_str().as_bytes());
            bytes.push(b':');
            bytes.extend_from_slice(catalog.content_hash()?.as_str().as_bytes());
            bytes.push(b'\n');
        }
        Ok(ContentHash::from_bytes(&bytes))
    }
}

impl Default for CatalogProvider {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(designation: &str, weight: f64) -> CatalogSection {
        CatalogSection {
            family: SupportFamily::Pipe,
            designation: designation.to_string(),
            weight_plf: weight,
            area_in2: 1.0,
            ix_in4: 1.0,
            sx_in3: 1.0,
            depth_in: 2.0,
            grade: MaterialGrade::A53B,
        }
    }

    #[test]
    fn test_family_parsing() {
        assert_eq!("pipe".parse::<SupportFamily>(), Ok(SupportFamily::Pipe));
        assert_eq!("W".parse::<SupportFamily>(), Ok(SupportFamily::WideFlange));
        assert_eq!("HSS".parse::<SupportFamily>(), Ok(SupportFamily::Tube));
        assert!("angle".parse::<SupportFamily>().is_err());
        let json = serde_json::to_string(&SupportFamily::WideFlange).unwrap();
        assert_eq!(json, "\"W\"");
    }

    #[test]
    fn test_builtin_catalogs_ordered() {
        let provider = CatalogProvider::builtin();
        for family in SupportFamily::ALL {
            let sections = provider.sections(family).unwrap();
            assert!(sections.len() >= 10);
            assert!(sections.iter().all(|s| s.family == family));
        }
    }

    #[test]
    fn test_ties_broken_by_designation() {
        let catalog = Catalog::new(
            SupportFamily::Pipe,
            vec![section("Pipe8STD", 28.6), section("Pipe6XS", 28.6), section("Pipe2STD", 3.65)],
            "test",
        )
        .unwrap();
        let names: Vec<&str> = catalog.sections().iter().map(|s| s.designation.as_str()).collect();
        assert_eq!(names, vec!["Pipe2STD", "Pipe6XS", "Pipe8STD"]);
    }

    #[test]
    fn test_out_of_order_is_internal_error() {
        let catalog = Catalog {
            family: SupportFamily::Pipe,
            sections: vec![section("B", 10.0), section("A", 5.0)],
            source: "corrupt".to_string(),
        };
        let err = catalog.verify_order().unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert!(!err.is_abstain());
    }

    #[test]
    fn test_rejects_wrong_family_and_bad_props() {
        let mut w = section("W8X18", 18.0);
        w.family = SupportFamily::WideFlange;
        assert!(Catalog::new(SupportFamily::Pipe, vec![w], "test").is_err());

        let mut bad = section("Pipe0", 1.0);
        bad.sx_in3 = 0.0;
        assert!(Catalog::new(SupportFamily::Pipe, vec![bad], "test").is_err());
    }

    #[test]
    fn test_hash_tracks_content() {
        let provider = CatalogProvider::builtin();
        let families = [SupportFamily::Pipe, SupportFamily::Tube];
        let a = provider.hash(&families).unwrap();
        assert_eq!(a, provider.hash(&families).unwrap());

        let replaced = Catalog::new(
            SupportFamily::Pipe,
            vec![section("Pipe2STD", 3.65)],
            "override",
        )
        .unwrap();
        let provider = provider.with_catalog(replaced);
        assert_ne!(a, provider.hash(&families).unwrap());
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let provider = CatalogProvider::builtin();
        let catalog = provider.catalog(SupportFamily::WideFlange).unwrap();
        let shape = catalog.lookup("w12x26").unwrap();
        assert_eq!(shape.designation, "W12X26");
        assert!(catalog.lookup("W99X999").is_none());
    }
}
