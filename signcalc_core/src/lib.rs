//! # signcalc_core - Sign Structure Design Engine
//!
//! `signcalc_core` designs single-pole sign structures: wind load on the
//! panel, the support member, its foundation and the pier reinforcement. All
//! inputs and outputs are JSON-serializable, and every result carries a trace
//! (input, pack and catalog hashes) so a calculation can be audited and
//! reproduced.
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: Same request and pack bytes, same result bytes
//! - **Data-driven**: Code editions live in versioned TOML packs
//! - **Abstain, don't guess**: Missing data or infeasible constraints yield
//!   an `Abstained` result with reasons, never a substituted value
//! - **JSON-First**: All types implement Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use signcalc_core::{CatalogProvider, PackStore, SignDesigner};
//!
//! let designer = SignDesigner::new(
//!     Arc::new(PackStore::builtin()),
//!     Arc::new(CatalogProvider::builtin()),
//! );
//! let request = serde_json::from_str(r#"{
//!   "jurisdiction": "US",
//!   "standard": {"code": "ASCE7", "version": "7-22", "importance": "II"},
//!   "site": {"exposure": "C", "soil": "sand", "basic_wind_speed": 110},
//!   "sign": {"width_ft": 8, "height_ft": 4, "centroid_height_ft": 12, "gross_weight_lbf": 300},
//!   "supports": ["pipe", "tube"], "embed": {"type": "direct"}
//! }"#).unwrap();
//!
//! let result = designer.design(&request).unwrap();
//! println!("{}", serde_json::to_string_pretty(&result).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`standards`] - Versioned standards packs and the pack cache
//! - [`catalog`] - Ordered section catalogs (pipe, W, tube)
//! - [`wind`] - Wind load engine (ASCE 7, EN 1991-1-4)
//! - [`member`] - Support member selection
//! - [`foundation`] - Pier sizing and anchor patterns
//! - [`rebar`] - Pier reinforcement schedule
//! - [`pipeline`] - Orchestration, confidence and trace
//! - [`config`] - Engine configuration
//! - [`errors`] - Structured error types

pub mod catalog;
pub mod config;
pub mod errors;
pub mod foundation;
pub mod loads;
pub mod member;
pub mod pipeline;
pub mod rebar;
pub mod references;
pub mod request;
pub mod standards;
pub mod units;
pub mod wind;

// Re-export commonly used types at crate root for convenience
pub use catalog::CatalogProvider;
pub use config::EngineConfig;
pub use errors::{CalcError, CalcResult};
pub use pipeline::{DesignStatus, SignDesignResult, SignDesigner};
pub use request::SignDesignRequest;
pub use standards::{PackId, PackStore};
