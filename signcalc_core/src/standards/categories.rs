//! Closed categorical dimensions used to key pack tables.
//!
//! Every table lookup in a standards pack is indexed by one of these enums.
//! Pack files spell the keys as strings; they are parsed here once, at load
//! time, so nothing downstream matches on open strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Design-code family selected by the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StandardCode {
    /// ASCE 7 (US)
    #[serde(rename = "ASCE7")]
    Asce7,
    /// EN 1991-1-4 (EU)
    #[serde(rename = "EN1991")]
    En1991,
}

impl StandardCode {
    /// Code string as written in packs and requests
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardCode::Asce7 => "ASCE7",
            StandardCode::En1991 => "EN1991",
        }
    }

    /// Jurisdiction that publishes this code
    pub fn jurisdiction(&self) -> Jurisdiction {
        match self {
            StandardCode::Asce7 => Jurisdiction::Us,
            StandardCode::En1991 => Jurisdiction::Eu,
        }
    }
}

impl FromStr for StandardCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ASCE7" => Ok(StandardCode::Asce7),
            "EN1991" => Ok(StandardCode::En1991),
            other => Err(format!("unknown standard code '{}'", other)),
        }
    }
}

impl fmt::Display for StandardCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Jurisdiction of the project site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jurisdiction {
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "EU")]
    Eu,
}

/// Wind exposure category (terrain roughness), ASCE 7 Section 26.7
///
/// EN 1991 packs map these onto terrain categories III, II and I.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExposureCategory {
    /// Urban and suburban terrain, wooded areas
    B,
    /// Open terrain with scattered obstructions
    C,
    /// Flat, unobstructed areas and water surfaces
    D,
}

impl ExposureCategory {
    pub const ALL: [ExposureCategory; 3] =
        [ExposureCategory::B, ExposureCategory::C, ExposureCategory::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExposureCategory::B => "B",
            ExposureCategory::C => "C",
            ExposureCategory::D => "D",
        }
    }
}

impl FromStr for ExposureCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "B" => Ok(ExposureCategory::B),
            "C" => Ok(ExposureCategory::C),
            "D" => Ok(ExposureCategory::D),
            other => Err(format!("unknown exposure category '{}'", other)),
        }
    }
}

impl fmt::Display for ExposureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Importance / risk class, ASCE 7 Table 1.5-1 (consequence class for EN 1990)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImportanceClass {
    I,
    II,
    III,
    IV,
}

impl ImportanceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportanceClass::I => "I",
            ImportanceClass::II => "II",
            ImportanceClass::III => "III",
            ImportanceClass::IV => "IV",
        }
    }
}

impl FromStr for ImportanceClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "I" => Ok(ImportanceClass::I),
            "II" => Ok(ImportanceClass::II),
            "III" => Ok(ImportanceClass::III),
            "IV" => Ok(ImportanceClass::IV),
            other => Err(format!("unknown importance class '{}'", other)),
        }
    }
}

impl fmt::Display for ImportanceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Presumptive soil class, after IBC Table 1806.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilClass {
    /// Class 1: crystalline bedrock
    Bedrock,
    /// Class 2: sedimentary and foliated rock
    SedimentaryRock,
    /// Class 3: sandy gravel and/or gravel (GW, GP)
    SandyGravel,
    /// Class 4: sand, silty sand, clayey sand (SW, SP, SM, SC, GM, GC)
    Sand,
    /// Class 5: clay, sandy clay, silty clay (CL, ML, MH, CH)
    Clay,
}

impl SoilClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilClass::Bedrock => "bedrock",
            SoilClass::SedimentaryRock => "sedimentary_rock",
            SoilClass::SandyGravel => "sandy_gravel",
            SoilClass::Sand => "sand",
            SoilClass::Clay => "clay",
        }
    }
}

impl FromStr for SoilClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bedrock" => Ok(SoilClass::Bedrock),
            "sedimentary_rock" => Ok(SoilClass::SedimentaryRock),
            "sandy_gravel" => Ok(SoilClass::SandyGravel),
            "sand" => Ok(SoilClass::Sand),
            "clay" => Ok(SoilClass::Clay),
            other => Err(format!("unknown soil class '{}'", other)),
        }
    }
}

impl fmt::Display for SoilClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Steel material grade of a catalog section
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MaterialGrade {
    /// ASTM A53 Grade B pipe
    A53B,
    /// ASTM A500 Grade C hollow structural section
    A500C,
    /// ASTM A992 wide-flange
    A992,
}

impl MaterialGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialGrade::A53B => "A53B",
            MaterialGrade::A500C => "A500C",
            MaterialGrade::A992 => "A992",
        }
    }
}

impl FromStr for MaterialGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace([' ', '-'], "").as_str() {
            "A53B" | "A53GRB" => Ok(MaterialGrade::A53B),
            "A500C" | "A500GRC" => Ok(MaterialGrade::A500C),
            "A992" => Ok(MaterialGrade::A992),
            other => Err(format!("unknown material grade '{}'", other)),
        }
    }
}

impl fmt::Display for MaterialGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
