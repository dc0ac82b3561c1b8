//! Load combinations supplied by a standards pack
//!
//! ASCE 7 packs ship ASD combinations (Section 2.4.1), e.g. `D + 0.6W` and
//! `0.6D + 0.6W`; the second one governs uplift and overturning where dead
//! load helps. EN 1991 packs ship characteristic combinations (`G + W`,
//! `0.9G + W`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{LoadCase, LoadType};

/// A load combination with factors for each load type
///
/// # Example
/// ```
/// use signcalc_core::loads::{LoadCombination, LoadCase, LoadType};
///
/// let combo = LoadCombination::new("ASD-7", "0.6D + 0.6W")
///     .with_factor(LoadType::Dead, 0.6)
///     .with_factor(LoadType::Wind, 0.6);
///
/// let case = LoadCase::new("Base").with_load(LoadType::Dead, 100.0);
/// assert!((combo.apply(&case) - 60.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Combination identifier (e.g., "ASD-5", "CHR-1")
    pub name: String,

    /// Human-readable equation for display (e.g., "D + 0.6W")
    pub equation: String,

    /// Load factors keyed by load type
    pub factors: BTreeMap<LoadType, f64>,
}

impl LoadCombination {
    pub fn new(name: impl Into<String>, equation: impl Into<String>) -> Self {
        LoadCombination {
            name: name.into(),
            equation: equation.into(),
            factors: BTreeMap::new(),
        }
    }

    /// Add a load factor (builder pattern)
    pub fn with_factor(mut self, load_type: LoadType, factor: f64) -> Self {
        self.factors.insert(load_type, factor);
        self
    }

    /// Apply this combination to a LoadCase, returning the total factored load
    ///
    /// Load types not in the combination are treated as having factor 0.
    pub fn apply(&self, case: &LoadCase) -> f64 {
        self.factors
            .iter()
            .map(|(load_type, factor)| factor * case.get(*load_type))
            .sum()
    }

    /// Get the factor for a specific load type (0.0 if not in combination)
    pub fn get_factor(&self, load_type: LoadType) -> f64 {
        self.factors.get(&load_type).copied().unwrap_or(0.0)
    }

    /// Factored value of a single load component
    pub fn factored(&self, load_type: LoadType, value: f64) -> f64 {
        self.get_factor(load_type) * value
    }
}

/// Find the combination producing the maximum factored load
///
/// Ties keep the earlier combination, so the result depends only on pack order.
pub fn find_governing_combination<'a>(
    case: &LoadCase,
    combinations: &'a [LoadCombination],
) -> Option<(&'a LoadCombination, f64)> {
    let mut governing: Option<(&LoadCombination, f64)> = None;
    for combo in combinations {
        let load = combo.apply(case);
        match governing {
            Some((_, max)) if load <= max => {}
            _ => governing = Some((combo, load)),
        }
    }
    governing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asd_pair() -> Vec<LoadCombination> {
        vec![
            LoadCombination::new("ASD-5", "D + 0.6W")
                .with_factor(LoadType::Dead, 1.0)
                .with_factor(LoadType::Wind, 0.6),
            LoadCombination::new("ASD-7", "0.6D + 0.6W")
                .with_factor(LoadType::Dead, 0.6)
                .with_factor(LoadType::Wind, 0.6),
        ]
    }

    #[test]
    fn test_apply_combination() {
        let case = LoadCase::new("Base")
            .with_load(LoadType::Dead, 500.0)
            .with_load(LoadType::Wind, 1000.0);
        let combos = asd_pair();
        assert!((combos[0].apply(&case) - 1100.0).abs() < 1e-9);
        assert!((combos[1].apply(&case) - 900.0).abs() < 1e-9);
    }

    #[test]
    fn test_find_governing() {
        let case = LoadCase::new("Base")
            .with_load(LoadType::Dead, 500.0)
            .with_load(LoadType::Wind, 1000.0);
        let combos = asd_pair();
        let (combo, load) = find_governing_combination(&case, &combos).unwrap();
        assert_eq!(combo.name, "ASD-5");
        assert!((load - 1100.0).abs() < 1e-9);
    }

    #[test]
    fn test_governing_tie_keeps_first() {
        let case = LoadCase::new("Wind only").with_load(LoadType::Wind, 1000.0);
        let combos = asd_pair();
        let (combo, _) = find_governing_combination(&case, &combos).unwrap();
        assert_eq!(combo.name, "ASD-5");
    }

    #[test]
    fn test_missing_factor_is_zero() {
        let combo = LoadCombination::new("W", "W").with_factor(LoadType::Wind, 1.0);
        assert_eq!(combo.get_factor(LoadType::Dead), 0.0);
        assert_eq!(combo.factored(LoadType::Wind, 12.5), 12.5);
    }

    #[test]
    fn test_empty_combinations() {
        let case = LoadCase::new("Empty");
        assert!(find_governing_combination(&case, &[]).is_none());
    }
}
