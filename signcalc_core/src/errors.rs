//! # Error Types
//!
//! Structured error types for signcalc_core. Every variant serializes to JSON
//! so the response layer can hand it to a caller unchanged.
//!
//! Two families live in the same enum:
//!
//! - **Abstain conditions** ([`CalcError::is_abstain`]): the inputs or the
//!   loaded data do not admit a valid design. The pipeline reports these as an
//!   `Abstained` result, never as a crash.
//! - **Hard errors**: malformed requests and internal invariant violations.
//!   These are returned as `Err` from the pipeline.
//!
//! ## Example
//!
//! ```rust
//! use signcalc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_width(width_ft: f64) -> CalcResult<()> {
//!     if width_ft <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "sign.width_ft",
//!             width_ft.to_string(),
//!             "Width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_width(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::foundation::{AnchorShortfall, FailureMode, SafetyFactors};
use crate::member::SectionCandidate;

/// Result type alias for signcalc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for design operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, inconsistent, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// No standards pack exists for the requested code and edition
    #[error("Standards pack not found: {pack}")]
    PackNotFound { pack: String },

    /// Pack bytes could not be parsed
    #[error("Pack parse error in {pack}: {reason}")]
    PackParse { pack: String, reason: String },

    /// Requested combination is absent from the loaded pack
    #[error("Missing pack data in {pack}: {}", .keys.join(", "))]
    MissingPackData { pack: String, keys: Vec<String> },

    /// No catalog entry in any requested family satisfies the member checks
    #[error("No passing section ({} families checked)", .candidates.len())]
    NoPassingSection { candidates: Vec<SectionCandidate> },

    /// Size constraints prevent a passing foundation.
    ///
    /// `actual`/`required` are safety factors for the pier modes, inches for
    /// embedment and anchor edge distance, and capacity over demand for
    /// anchor tension and shear. `diameter_in`, `depth_in` and `best_effort`
    /// always describe a sized pier.
    #[error(
        "Constraints infeasible: {governing} {actual:.2} below required {required:.2} (shortfall {shortfall:.2})"
    )]
    ConstraintsInfeasible {
        governing: FailureMode,
        actual: f64,
        required: f64,
        shortfall: f64,
        diameter_in: f64,
        depth_in: f64,
        best_effort: SafetyFactors,
        /// Largest bolt tried, when no anchor diameter passes
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchor: Option<AnchorShortfall>,
    },

    /// Constraints admit no foundation geometry at all
    #[error("Contradictory constraints: {reason}")]
    ContradictoryConstraints { reason: String },

    /// Catalog source could not be read
    #[error("Catalog error: {operation} on '{path}' - {reason}")]
    CatalogLoad {
        operation: String,
        path: String,
        reason: String,
    },

    /// Internal invariant violated (programming defect)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a PackNotFound error
    pub fn pack_not_found(pack: impl Into<String>) -> Self {
        CalcError::PackNotFound { pack: pack.into() }
    }

    /// Create a PackParse error
    pub fn pack_parse(pack: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::PackParse {
            pack: pack.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingPackData error for a single key
    pub fn missing_pack_data(pack: impl Into<String>, key: impl Into<String>) -> Self {
        CalcError::MissingPackData {
            pack: pack.into(),
            keys: vec![key.into()],
        }
    }

    /// Create a ContradictoryConstraints error
    pub fn contradictory(reason: impl Into<String>) -> Self {
        CalcError::ContradictoryConstraints {
            reason: reason.into(),
        }
    }

    /// Create a CatalogLoad error
    pub fn catalog_load(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::CatalogLoad {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        CalcError::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a domain-level abstain condition.
    ///
    /// Abstain conditions are deterministic consequences of the inputs and
    /// pack data. Retrying will not change them.
    pub fn is_abstain(&self) -> bool {
        matches!(
            self,
            CalcError::PackNotFound { .. }
                | CalcError::MissingPackData { .. }
                | CalcError::NoPassingSection { .. }
                | CalcError::ConstraintsInfeasible { .. }
                | CalcError::ContradictoryConstraints { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::PackNotFound { .. } => "PACK_NOT_FOUND",
            CalcError::PackParse { .. } => "PACK_PARSE",
            CalcError::MissingPackData { .. } => "MISSING_PACK_DATA",
            CalcError::NoPassingSection { .. } => "NO_PASSING_SECTION",
            CalcError::ConstraintsInfeasible { .. } => "CONSTRAINTS_INFEASIBLE",
            CalcError::ContradictoryConstraints { .. } => "CONTRADICTORY_CONSTRAINTS",
            CalcError::CatalogLoad { .. } => "CATALOG_LOAD",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::missing_pack_data("us.asce7-16", "wind.kz.D");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"MissingPackData\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::pack_not_found("x").error_code(), "PACK_NOT_FOUND");
        assert_eq!(
            CalcError::contradictory("caps").error_code(),
            "CONTRADICTORY_CONSTRAINTS"
        );
        assert_eq!(CalcError::internal("bug").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_abstain_classification() {
        assert!(CalcError::missing_pack_data("p", "k").is_abstain());
        assert!(CalcError::contradictory("caps").is_abstain());
        assert!(CalcError::NoPassingSection { candidates: vec![] }.is_abstain());
        assert!(!CalcError::invalid_input("f", "v", "r").is_abstain());
        assert!(!CalcError::internal("catalog out of order").is_abstain());
        assert!(!CalcError::pack_parse("p", "bad toml").is_abstain());
    }

    #[test]
    fn test_missing_keys_message() {
        let error = CalcError::MissingPackData {
            pack: "eu.en1991-1-4".to_string(),
            keys: vec!["wind.rho_air".to_string(), "terrain.C".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Missing pack data in eu.en1991-1-4: wind.rho_air, terrain.C"
        );
    }
}
