//! # Design Pipeline
//!
//! Runs the components in order and assembles the audited result:
//!
//! ```text
//! request ─► LoadsComputed ─► MemberSelected ─► FoundationDesigned ─► RebarScheduled ─► Complete
//!                 │                 │                   │
//!                 └─────────────────┴───────────────────┴──► Abstained
//! ```
//!
//! A domain condition (missing pack data, no passing section, infeasible or
//! contradictory constraints, unknown pack) stops the run at the stage it
//! occurs and yields `Ok` with status `Abstained`, the outputs computed so
//! far and a reason list. Malformed requests and internal defects are `Err`.
//!
//! Checks run on unrounded values. Every reported number is rounded once,
//! here, when the result is assembled.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use signcalc_core::catalog::CatalogProvider;
//! use signcalc_core::pipeline::{DesignStatus, SignDesigner};
//! use signcalc_core::request::SignDesignRequest;
//! use signcalc_core::standards::PackStore;
//!
//! let designer = SignDesigner::new(
//!     Arc::new(PackStore::builtin()),
//!     Arc::new(CatalogProvider::builtin()),
//! );
//! let request: SignDesignRequest = serde_json::from_str(r#"{
//!   "jurisdiction": "US",
//!   "standard": {"code": "ASCE7", "version": "7-16", "importance": "II"},
//!   "site": {"exposure": "C", "soil": "clay", "basic_wind_speed": 115},
//!   "sign": {"width_ft": 10, "height_ft": 6, "centroid_height_ft": 15, "gross_weight_lbf": 450},
//!   "supports": ["pipe"], "embed": {"type": "direct"}
//! }"#).unwrap();
//!
//! let result = designer.design(&request).unwrap();
//! assert_eq!(result.status, DesignStatus::Complete);
//! assert!(result.confidence > 0.0);
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::CatalogProvider;
use crate::config::EngineConfig;
use crate::errors::{CalcError, CalcResult};
use crate::foundation::{
    AnchorShortfall, FailureMode, FoundationDesign, FoundationDesigner, FoundationLoads,
};
use crate::member::{MemberSelection, MemberSelector};
use crate::rebar::{self, RebarSchedule};
use crate::request::SignDesignRequest;
use crate::standards::{ContentHash, PackId, PackStore};
use crate::units::Precision;
use crate::wind::{WindInput, WindLoadEngine, WindLoadResult};

/// Result schema identifier
pub const SCHEMA_VERSION: &str = "sign-1.0";

/// Pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignStage {
    LoadsComputed,
    MemberSelected,
    FoundationDesigned,
    RebarScheduled,
    Complete,
    Abstained,
}

/// Terminal outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignStatus {
    Complete,
    Abstained,
}

/// Why a run abstained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstainReason {
    /// Component that reported the condition ("packs", "wind", ...)
    pub component: String,
    pub code: String,
    pub message: String,
    pub detail: CalcError,
}

impl AbstainReason {
    fn new(component: &str, error: CalcError) -> Self {
        let detail = rounded_detail(error);
        AbstainReason {
            component: component.to_string(),
            code: detail.error_code().to_string(),
            message: detail.to_string(),
            detail,
        }
    }
}

/// Provenance of a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignTrace {
    /// SHA-256 of the canonical JSON request
    pub inputs_sha256: String,
    pub standards_pack: Option<PackId>,
    /// SHA-256 of the pack file bytes
    pub standards_pack_sha256: Option<String>,
    /// SHA-256 over the requested families' catalogs
    pub catalog_sha256: String,
    /// SHA-256 of this result serialized with an empty `data_sha256`
    pub data_sha256: String,
    pub code_version: String,
    pub schema_version: String,
}

/// Complete output of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignDesignResult {
    pub status: DesignStatus,
    /// Stages entered, in order, ending with `Complete` or `Abstained`
    pub stages: Vec<DesignStage>,
    pub loads: Option<WindLoadResult>,
    pub member: Option<MemberSelection>,
    pub foundation: Option<FoundationDesign>,
    pub rebar: Option<RebarSchedule>,
    pub assumptions: Vec<String>,
    /// Minimum normalized margin over all checks, 0 when abstained
    pub confidence: f64,
    pub abstain_reasons: Vec<AbstainReason>,
    pub trace: DesignTrace,
}

impl SignDesignResult {
    pub fn is_complete(&self) -> bool {
        self.status == DesignStatus::Complete
    }

    /// Last stage reached before the terminal state
    pub fn stage_reached(&self) -> Option<DesignStage> {
        self.stages
            .iter()
            .rev()
            .find(|s| !matches!(s, DesignStage::Complete | DesignStage::Abstained))
            .copied()
    }
}

/// Outputs accumulated while the pipeline advances
struct Progress {
    stages: Vec<DesignStage>,
    loads: Option<WindLoadResult>,
    member: Option<MemberSelection>,
    foundation: Option<FoundationDesign>,
    rebar: Option<RebarSchedule>,
    assumptions: Vec<String>,
    trace: DesignTrace,
}

impl Progress {
    fn enter(&mut self, stage: DesignStage) {
        tracing::debug!(stage = ?stage, "pipeline transition");
        self.stages.push(stage);
    }
}

/// Sign design service.
///
/// Holds shared, read-only pack and catalog caches; any number of threads may
/// call [`SignDesigner::design`] concurrently.
#[derive(Debug, Clone)]
pub struct SignDesigner {
    packs: Arc<PackStore>,
    catalogs: Arc<CatalogProvider>,
    code_version: String,
}

impl SignDesigner {
    pub fn new(packs: Arc<PackStore>, catalogs: Arc<CatalogProvider>) -> Self {
        SignDesigner {
            packs,
            catalogs,
            code_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Build a designer from configuration (loads any catalog overrides)
    pub fn from_config(config: &EngineConfig) -> CalcResult<Self> {
        Ok(SignDesigner {
            packs: Arc::new(config.pack_store()),
            catalogs: Arc::new(config.catalog_provider()?),
            code_version: config.code_version(),
        })
    }

    /// Override the trace version label (builder pattern)
    pub fn with_code_version(mut self, version: impl Into<String>) -> Self {
        self.code_version = version.into();
        self
    }

    pub fn packs(&self) -> &Arc<PackStore> {
        &self.packs
    }

    pub fn catalogs(&self) -> &Arc<CatalogProvider> {
        &self.catalogs
    }

    /// Run the full design pipeline for one request
    pub fn design(&self, request: &SignDesignRequest) -> CalcResult<SignDesignResult> {
        request.validate()?;

        let inputs_sha256 = sha256_json(request)?;
        let catalog_sha256 = self.catalogs.hash(&request.supports)?.to_string();
        let mut progress = Progress {
            stages: Vec::new(),
            loads: None,
            member: None,
            foundation: None,
            rebar: None,
            assumptions: Vec::new(),
            trace: DesignTrace {
                inputs_sha256,
                standards_pack: None,
                standards_pack_sha256: None,
                catalog_sha256,
                data_sha256: String::new(),
                code_version: self.code_version.clone(),
                schema_version: SCHEMA_VERSION.to_string(),
            },
        };

        let pack = match PackId::resolve(request.standard.code, &request.standard.version)
            .and_then(|id| self.packs.load(id))
        {
            Ok(pack) => pack,
            Err(e) => return self.abstain(progress, "packs", e),
        };
        progress.trace.standards_pack = Some(pack.id);
        progress.trace.standards_pack_sha256 = Some(pack.hash.to_string());

        // Loads
        let wind = match WindLoadEngine::for_pack(&pack).compute(&WindInput::from_request(request)) {
            Ok(wind) => wind,
            Err(e) => return self.abstain(progress, "wind", e),
        };
        progress.assumptions.extend(wind.assumptions.iter().cloned());
        progress.loads = Some(wind.clone());
        progress.enter(DesignStage::LoadsComputed);

        // Member
        let span_ft = request.sign.centroid_height_ft;
        let selector = MemberSelector::new(&pack, &self.catalogs);
        let member = match selector.select(&request.supports, &wind, request.sign.gross_weight_lbf, span_ft) {
            Ok(member) => member,
            Err(e) => return self.abstain(progress, "member", e),
        };
        progress.assumptions.push(format!(
            "Member checked as a {} ft cantilever from grade to the panel centroid",
            span_ft
        ));
        progress.member = Some(member.clone());
        progress.enter(DesignStage::MemberSelected);

        // Foundation
        if request.site.frost_depth_in.is_none() {
            progress
                .assumptions
                .push("No frost depth supplied: pier starts at the minimum embedment".to_string());
        }
        let loads = FoundationLoads {
            moment_ftlb: wind.moment_ftlb,
            shear_lbf: wind.force_lbf,
            dead_load_lbf: member.dead_load_lbf,
        };
        let foundation = match FoundationDesigner::new(&pack).design(
            request.embed.kind,
            &loads,
            request.site.soil,
            request.site.frost_depth_in,
            &request.constraints,
            &member.section,
        ) {
            Ok(foundation) => foundation,
            Err(e) => return self.abstain(progress, "foundation", e),
        };
        check_safety_floor(&foundation)?;
        progress.foundation = Some(foundation.clone());
        progress.enter(DesignStage::FoundationDesigned);

        // Rebar
        progress.rebar = Some(rebar::schedule(foundation.diameter_in, foundation.depth_in));
        progress.enter(DesignStage::RebarScheduled);

        let confidence = confidence(&member, &foundation);
        progress.enter(DesignStage::Complete);
        self.finish(progress, DesignStatus::Complete, confidence, Vec::new())
    }

    fn abstain(
        &self,
        mut progress: Progress,
        component: &str,
        error: CalcError,
    ) -> CalcResult<SignDesignResult> {
        if !error.is_abstain() {
            return Err(error);
        }
        tracing::warn!(component, code = error.error_code(), reason = %error, "design abstained");
        progress.enter(DesignStage::Abstained);
        let reasons = vec![AbstainReason::new(component, error)];
        self.finish(progress, DesignStatus::Abstained, 0.0, reasons)
    }

    fn finish(
        &self,
        progress: Progress,
        status: DesignStatus,
        confidence: f64,
        abstain_reasons: Vec<AbstainReason>,
    ) -> CalcResult<SignDesignResult> {
        let mut result = SignDesignResult {
            status,
            stages: progress.stages,
            loads: progress.loads.as_ref().map(WindLoadResult::rounded),
            member: progress.member.as_ref().map(MemberSelection::rounded),
            foundation: progress.foundation.as_ref().map(FoundationDesign::rounded),
            rebar: progress.rebar,
            assumptions: progress.assumptions,
            confidence: Precision::Ratio.round(confidence),
            abstain_reasons,
            trace: progress.trace,
        };
        result.trace.data_sha256 = sha256_json(&result)?;
        Ok(result)
    }
}

/// A foundation below its own minimum is a sizing defect, never an abstain
fn check_safety_floor(foundation: &FoundationDesign) -> CalcResult<()> {
    if foundation.safety_factors.meets(foundation.min_safety_factor) {
        return Ok(());
    }
    let (mode, sf) = foundation.safety_factors.governing();
    Err(CalcError::internal(format!(
        "foundation returned below minimum safety factor ({} {})",
        mode, sf
    )))
}

/// Minimum normalized margin over member, pier and anchor checks
fn confidence(member: &MemberSelection, foundation: &FoundationDesign) -> f64 {
    let mut utilizations = vec![member.governing_ratio];
    let (_, lowest_sf) = foundation.safety_factors.governing();
    if lowest_sf > 0.0 {
        utilizations.push(foundation.min_safety_factor / lowest_sf);
    } else {
        utilizations.push(1.0);
    }
    if let Some(anchors) = &foundation.anchors {
        utilizations.push(anchors.tension_ratio);
        utilizations.push(anchors.shear_ratio);
    }
    utilizations
        .into_iter()
        .map(|u| (1.0 - u).clamp(0.0, 1.0))
        .fold(1.0, f64::min)
}

/// Round the numeric payload of an abstain diagnostic
fn rounded_detail(error: CalcError) -> CalcError {
    match error {
        CalcError::ConstraintsInfeasible {
            governing,
            actual,
            required,
            shortfall,
            diameter_in,
            depth_in,
            best_effort,
            anchor,
        } => {
            // Geometric shortfalls are lengths, the rest are factors
            let precision = match governing {
                FailureMode::Embedment | FailureMode::AnchorEdgeDistance => Precision::Dimension,
                _ => Precision::SafetyFactor,
            };
            CalcError::ConstraintsInfeasible {
                governing,
                actual: precision.round(actual),
                required: precision.round(required),
                shortfall: precision.round(shortfall),
                diameter_in: Precision::Dimension.round(diameter_in),
                depth_in: Precision::Dimension.round(depth_in),
                best_effort: best_effort.rounded(),
                anchor: anchor.as_ref().map(AnchorShortfall::rounded),
            }
        }
        CalcError::NoPassingSection { candidates } => CalcError::NoPassingSection {
            candidates: candidates
                .into_iter()
                .map(|mut c| {
                    c.governing_ratio = Precision::Ratio.round(c.governing_ratio);
                    c
                })
                .collect(),
        },
        other => other,
    }
}

fn sha256_json<T: Serialize>(value: &T) -> CalcResult<String> {
    let bytes = serde_json::to_vec(value)
        .map_err(|e| CalcError::internal(format!("serialization failed: {}", e)))?;
    Ok(ContentHash::from_bytes(&bytes).to_string())
}
