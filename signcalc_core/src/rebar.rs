//! Pier reinforcement schedule
//!
//! A three-tier lookup on pier size. Whichever of diameter or depth reaches
//! a higher tier governs:
//!
//! | Tier   | Diameter | Depth  | Verticals | Ties        |
//! |--------|----------|--------|-----------|-------------|
//! | Large  | ≥ 36 in  | ≥ 72 in| 8 - #6    | #4 @ 12 in  |
//! | Medium | ≥ 24 in  | ≥ 48 in| 6 - #5    | #3 @ 12 in  |
//! | Small  | else     | else   | 4 - #4    | #3 @ 12 in  |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reinforcement tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebarTier {
    Small,
    Medium,
    Large,
}

impl RebarTier {
    pub fn for_pier(diameter_in: f64, depth_in: f64) -> RebarTier {
        if diameter_in >= 36.0 || depth_in >= 72.0 {
            RebarTier::Large
        } else if diameter_in >= 24.0 || depth_in >= 48.0 {
            RebarTier::Medium
        } else {
            RebarTier::Small
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RebarTier::Small => "S",
            RebarTier::Medium => "M",
            RebarTier::Large => "L",
        }
    }
}

impl fmt::Display for RebarTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RebarTier::Small => "small",
            RebarTier::Medium => "medium",
            RebarTier::Large => "large",
        };
        f.write_str(name)
    }
}

/// Bar layout for one pier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebarSchedule {
    pub tier: RebarTier,
    /// Schedule reference, e.g. `RS-M`
    pub schedule_ref: String,
    pub vertical_bar: String,
    pub vertical_count: u32,
    pub tie_bar: String,
    pub tie_spacing_in: f64,
}

impl RebarSchedule {
    /// Human-readable callout, e.g. `6 - #5 vert, #3 ties @ 12 in`
    pub fn callout(&self) -> String {
        format!(
            "{} - {} vert, {} ties @ {} in",
            self.vertical_count, self.vertical_bar, self.tie_bar, self.tie_spacing_in
        )
    }
}

/// Select the reinforcement schedule for a pier
pub fn schedule(diameter_in: f64, depth_in: f64) -> RebarSchedule {
    let tier = RebarTier::for_pier(diameter_in, depth_in);
    let (vertical_bar, vertical_count, tie_bar) = match tier {
        RebarTier::Large => ("#6", 8, "#4"),
        RebarTier::Medium => ("#5", 6, "#3"),
        RebarTier::Small => ("#4", 4, "#3"),
    };
    RebarSchedule {
        tier,
        schedule_ref: format!("RS-{}", tier.code()),
        vertical_bar: vertical_bar.to_string(),
        vertical_count,
        tie_bar: tie_bar.to_string(),
        tie_spacing_in: 12.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(RebarTier::for_pier(18.0, 36.0), RebarTier::Small);
        assert_eq!(RebarTier::for_pier(24.0, 36.0), RebarTier::Medium);
        assert_eq!(RebarTier::for_pier(18.0, 48.0), RebarTier::Medium);
        assert_eq!(RebarTier::for_pier(36.0, 36.0), RebarTier::Large);
        assert_eq!(RebarTier::for_pier(18.0, 72.0), RebarTier::Large);
        assert_eq!(RebarTier::for_pier(23.9, 47.9), RebarTier::Small);
    }

    #[test]
    fn test_either_dimension_governs() {
        // Small diameter, deep pier
        assert_eq!(schedule(18.0, 96.0).schedule_ref, "RS-L");
        // Wide, shallow pier
        assert_eq!(schedule(30.0, 36.0).schedule_ref, "RS-M");
    }

    #[test]
    fn test_tier_never_drops_with_size() {
        let mut last = RebarTier::Small;
        for (d, h) in [(18.0, 36.0), (18.0, 48.0), (24.0, 60.0), (30.0, 72.0), (42.0, 96.0)] {
            let tier = RebarTier::for_pier(d, h);
            assert!(tier >= last);
            last = tier;
        }
    }

    #[test]
    fn test_callout() {
        assert_eq!(schedule(24.0, 48.0).callout(), "6 - #5 vert, #3 ties @ 12 in");
    }
}
