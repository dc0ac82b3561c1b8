//! # Code References
//!
//! Clause citations attached to computed values so a report can show where
//! every coefficient and check came from.
//!
//! ```rust
//! use signcalc_core::references::CodeReference;
//!
//! let cite = CodeReference::asce7("7-22", "26.10.2");
//! assert_eq!(cite.citation(), "ASCE 7-22 Section 26.10.2");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a structural engineering code or standard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum CodeReference {
    /// ASCE 7 - Minimum Design Loads for Buildings
    ASCE7 { edition: String, section: String },
    /// EN 1991-1-4 - Actions on structures, wind actions
    EN1991 { part: String, clause: String },
    /// AISC 360 - Specification for Structural Steel Buildings
    AISC360 { year: u16, chapter: String },
    /// ACI 318 - Building Code Requirements for Structural Concrete
    ACI318 { year: u16, section: String },
    /// International Building Code
    IBC { year: u16, section: String },
    /// Fundamental mechanics (no specific code reference needed)
    Mechanics,
}

impl CodeReference {
    pub fn asce7(edition: &str, section: &str) -> Self {
        CodeReference::ASCE7 {
            edition: edition.to_string(),
            section: section.to_string(),
        }
    }

    pub fn en1991(clause: &str) -> Self {
        CodeReference::EN1991 {
            part: "1-4".to_string(),
            clause: clause.to_string(),
        }
    }

    pub fn aisc360(chapter: &str) -> Self {
        CodeReference::AISC360 {
            year: 2016,
            chapter: chapter.to_string(),
        }
    }

    pub fn aci318(section: &str) -> Self {
        CodeReference::ACI318 {
            year: 2019,
            section: section.to_string(),
        }
    }

    pub fn ibc(section: &str) -> Self {
        CodeReference::IBC {
            year: 2021,
            section: section.to_string(),
        }
    }

    /// Format the reference for display in reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::ASCE7 { edition, section } => {
                format!("ASCE {} Section {}", edition, section)
            }
            CodeReference::EN1991 { part, clause } => {
                format!("EN 1991-{} Clause {}", part, clause)
            }
            CodeReference::AISC360 { year, chapter } => {
                format!("AISC 360-{} Chapter {}", year % 100, chapter)
            }
            CodeReference::ACI318 { year, section } => {
                format!("ACI 318-{} Section {}", year % 100, section)
            }
            CodeReference::IBC { year, section } => format!("IBC {} Section {}", year, section),
            CodeReference::Mechanics => "Fundamental Mechanics".to_string(),
        }
    }

    /// Short form for inline references
    pub fn short_form(&self) -> &'static str {
        match self {
            CodeReference::ASCE7 { .. } => "ASCE 7",
            CodeReference::EN1991 { .. } => "EN 1991",
            CodeReference::AISC360 { .. } => "AISC 360",
            CodeReference::ACI318 { .. } => "ACI 318",
            CodeReference::IBC { .. } => "IBC",
            CodeReference::Mechanics => "Mechanics",
        }
    }
}

impl fmt::Display for CodeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.citation())
    }
}

/// A citation tied to the quantity it supports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Quantity or check the reference supports (e.g. "Kz", "bending")
    pub quantity: String,
    pub reference: CodeReference,
}

impl Citation {
    pub fn new(quantity: impl Into<String>, reference: CodeReference) -> Self {
        Citation {
            quantity: quantity.into(),
            reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citations() {
        assert_eq!(CodeReference::en1991("4.5").citation(), "EN 1991-1-4 Clause 4.5");
        assert_eq!(CodeReference::aisc360("F").citation(), "AISC 360-16 Chapter F");
        assert_eq!(CodeReference::aci318("17.6.2").citation(), "ACI 318-19 Section 17.6.2");
        assert_eq!(CodeReference::ibc("1807.3").citation(), "IBC 2021 Section 1807.3");
        assert_eq!(CodeReference::Mechanics.short_form(), "Mechanics");
    }

    #[test]
    fn test_reference_serialization() {
        let cite = Citation::new("qz", CodeReference::asce7("7-16", "26.10-1"));
        let json = serde_json::to_string(&cite).unwrap();
        assert!(json.contains("\"code\":\"ASCE7\""));
        let back: Citation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cite);
    }
}
