//! Load cases and load combinations for sign structures
//!
//! A sign structure sees two load types: the dead weight of the sign and its
//! support, and the wind resultant. Combinations come from the loaded
//! standards pack, so an ASCE 7 pack yields `D + 0.6W` style ASD combinations
//! and an EN 1991 pack yields `G + W` style characteristic combinations.
//!
//! # Example
//!
//! ```
//! use signcalc_core::loads::{LoadCase, LoadCombination, LoadType};
//!
//! let case = LoadCase::new("Pole base")
//!     .with_load(LoadType::Dead, 500.0)
//!     .with_load(LoadType::Wind, 2000.0);
//!
//! let combo = LoadCombination::new("ASD-5", "D + 0.6W")
//!     .with_factor(LoadType::Dead, 1.0)
//!     .with_factor(LoadType::Wind, 0.6);
//!
//! assert!((combo.apply(&case) - 1700.0).abs() < 1e-9);
//! ```

pub mod combinations;

pub use combinations::{find_governing_combination, LoadCombination};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{CalcError, CalcResult};

/// Load types acting on a sign structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoadType {
    /// D / G - Dead load (sign panel, support self-weight)
    Dead,
    /// W - Wind load
    Wind,
}

impl LoadType {
    pub const ALL: [LoadType; 2] = [LoadType::Dead, LoadType::Wind];

    /// Standard abbreviation code
    pub fn code(&self) -> &'static str {
        match self {
            LoadType::Dead => "D",
            LoadType::Wind => "W",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LoadType::Dead => "Dead load",
            LoadType::Wind => "Wind load",
        }
    }
}

/// Unfactored load values by type for one loading scenario
///
/// Units depend on context (lbf for forces, ft-lb for moments).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCase {
    pub label: String,
    pub loads: BTreeMap<LoadType, f64>,
}

impl LoadCase {
    pub fn new(label: impl Into<String>) -> Self {
        LoadCase {
            label: label.into(),
            loads: BTreeMap::new(),
        }
    }

    /// Add or update a load value (builder pattern)
    pub fn with_load(mut self, load_type: LoadType, value: f64) -> Self {
        self.loads.insert(load_type, value);
        self
    }

    /// Get the load value for a type, defaulting to 0.0 if not set
    pub fn get(&self, load_type: LoadType) -> f64 {
        self.loads.get(&load_type).copied().unwrap_or(0.0)
    }

    /// Dead load must be non-negative; wind is a magnitude.
    pub fn validate(&self) -> CalcResult<()> {
        for (load_type, value) in &self.loads {
            if !value.is_finite() || *value < 0.0 {
                return Err(CalcError::invalid_input(
                    format!("load_{}", load_type.code()),
                    value.to_string(),
                    format!("{} must be a finite, non-negative value", load_type.description()),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_case_defaults() {
        let case = LoadCase::new("Sign").with_load(LoadType::Dead, 450.0);
        assert_eq!(case.get(LoadType::Dead), 450.0);
        assert_eq!(case.get(LoadType::Wind), 0.0);
    }

    #[test]
    fn test_validate_rejects_negative() {
        let case = LoadCase::new("Bad").with_load(LoadType::Dead, -10.0);
        assert!(case.validate().is_err());
        let ok = LoadCase::new("Ok").with_load(LoadType::Wind, 1200.0);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_load_case_serializes_in_type_order() {
        let case = LoadCase::new("Pole")
            .with_load(LoadType::Wind, 2.0)
            .with_load(LoadType::Dead, 1.0);
        let json = serde_json::to_string(&case).unwrap();
        assert!(json.find("Dead").unwrap() < json.find("Wind").unwrap());
    }
}
