//! # Support Member Selection
//!
//! Picks the lightest catalog section that carries the sign as a vertical
//! cantilever fixed at grade. Each candidate is checked for every load
//! combination in the pack:
//!
//! | Check       | Ratio                              |
//! |-------------|------------------------------------|
//! | Bending     | `fb / Fb`, `fb = M / Sx`           |
//! | Shear       | `fv / Fv`, `fv = V / A`            |
//! | Deflection  | `δ / (L / limit)`, `δ = M·L²/3EI`  |
//! | Interaction | `fa / Fa + fb / Fb`                |
//!
//! Allowable stresses are pack fractions of Fy (e.g. `Fb = 0.66·Fy`). The
//! axial load is the sign weight plus the member self-weight over the span.
//!
//! Families are tried in the caller's order and each catalog in ascending
//! weight; the first passing section in the first family that has one wins.
//! There is no cross-family optimization.
//!
//! ## Example
//!
//! ```rust
//! use signcalc_core::catalog::{CatalogProvider, SupportFamily};
//! use signcalc_core::member::MemberSelector;
//! use signcalc_core::standards::{PackId, PackStore};
//! use signcalc_core::wind::{WindInput, WindLoadEngine};
//! # use signcalc_core::request::*;
//! # use signcalc_core::standards::*;
//! # let request: SignDesignRequest = serde_json::from_str(r#"{
//! #   "jurisdiction": "US",
//! #   "standard": {"code": "ASCE7", "version": "7-16", "importance": "II"},
//! #   "site": {"exposure": "C", "soil": "clay", "basic_wind_speed": 115},
//! #   "sign": {"width_ft": 10, "height_ft": 6, "centroid_height_ft": 15, "gross_weight_lbf": 450},
//! #   "supports": ["pipe"], "embed": {"type": "direct"}
//! # }"#).unwrap();
//!
//! let store = PackStore::builtin();
//! let pack = store.load(PackId::UsAsce7_16).unwrap();
//! let catalogs = CatalogProvider::builtin();
//! let load = WindLoadEngine::for_pack(&pack)
//!     .compute(&WindInput::from_request(&request))
//!     .unwrap();
//!
//! let selector = MemberSelector::new(&pack, &catalogs);
//! let member = selector.select(&[SupportFamily::Pipe], &load, 450.0, 15.0).unwrap();
//! assert!(member.passes());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::{CatalogProvider, CatalogSection, SupportFamily};
use crate::errors::{CalcError, CalcResult};
use crate::loads::{LoadCombination, LoadType};
use crate::references::{Citation, CodeReference};
use crate::standards::StandardsPack;
use crate::units::{Feet, Inches, InLb, FtLb, Precision};
use crate::wind::WindLoadResult;

/// Member check kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberCheck {
    Bending,
    Shear,
    Deflection,
    Interaction,
}

impl fmt::Display for MemberCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemberCheck::Bending => "bending",
            MemberCheck::Shear => "shear",
            MemberCheck::Deflection => "deflection",
            MemberCheck::Interaction => "interaction",
        };
        f.write_str(name)
    }
}

/// Best (lowest governing ratio) section of one family, for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionCandidate {
    pub family: SupportFamily,
    pub designation: String,
    pub governing_ratio: f64,
    pub governing_check: MemberCheck,
}

/// Demand/capacity ratios of one section, each the maximum over combinations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberRatios {
    pub bending: f64,
    pub shear: f64,
    pub deflection: f64,
    pub interaction: f64,
}

impl MemberRatios {
    /// (ratio, check) with the largest ratio; ties keep the earlier check
    pub fn governing(&self) -> (f64, MemberCheck) {
        let checks = [
            (self.bending, MemberCheck::Bending),
            (self.shear, MemberCheck::Shear),
            (self.deflection, MemberCheck::Deflection),
            (self.interaction, MemberCheck::Interaction),
        ];
        let mut governing = checks[0];
        for check in &checks[1..] {
            if check.0 > governing.0 {
                governing = *check;
            }
        }
        governing
    }

    pub fn passes(&self) -> bool {
        self.governing().0 <= 1.0
    }
}

/// Chosen support member and its checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSelection {
    pub family: SupportFamily,
    pub section: CatalogSection,
    /// Yield strength used (psi)
    pub fy_psi: f64,
    pub span_ft: f64,
    pub ratios: MemberRatios,
    pub governing_ratio: f64,
    pub governing_check: MemberCheck,
    /// Load combination producing the governing ratio
    pub governing_combination: String,
    /// Deflection at the load point under the governing combination (in)
    pub deflection_in: f64,
    pub allowable_deflection_in: f64,
    /// Design base moment under the governing combination (ft-lb)
    pub design_moment_ftlb: f64,
    /// Sign plus member self-weight (lbf)
    pub dead_load_lbf: f64,
    /// Sections evaluated before this one was accepted
    pub sections_checked: usize,
    pub references: Vec<Citation>,
}

impl MemberSelection {
    pub fn passes(&self) -> bool {
        self.ratios.passes()
    }

    /// Copy with every reported number at reporting precision
    pub fn rounded(&self) -> MemberSelection {
        MemberSelection {
            fy_psi: Precision::Force.round(self.fy_psi),
            span_ft: Precision::Dimension.round(self.span_ft),
            ratios: MemberRatios {
                bending: Precision::Ratio.round(self.ratios.bending),
                shear: Precision::Ratio.round(self.ratios.shear),
                deflection: Precision::Ratio.round(self.ratios.deflection),
                interaction: Precision::Ratio.round(self.ratios.interaction),
            },
            governing_ratio: Precision::Ratio.round(self.governing_ratio),
            deflection_in: Precision::Coefficient.round(self.deflection_in),
            allowable_deflection_in: Precision::Coefficient.round(self.allowable_deflection_in),
            design_moment_ftlb: Precision::Force.round(self.design_moment_ftlb),
            dead_load_lbf: Precision::Force.round(self.dead_load_lbf),
            ..self.clone()
        }
    }
}

/// Per-section evaluation, kept for the winner and for diagnostics
#[derive(Debug, Clone)]
struct Evaluation {
    ratios: MemberRatios,
    governing_ratio: f64,
    governing_check: MemberCheck,
    governing_combination: String,
    deflection_in: f64,
    allowable_deflection_in: f64,
    design_moment_ftlb: f64,
    dead_load_lbf: f64,
    fy_psi: f64,
}

/// Catalog walker bound to a pack and catalog set
#[derive(Debug, Clone, Copy)]
pub struct MemberSelector<'a> {
    pack: &'a StandardsPack,
    catalogs: &'a CatalogProvider,
}

impl<'a> MemberSelector<'a> {
    pub fn new(pack: &'a StandardsPack, catalogs: &'a CatalogProvider) -> Self {
        MemberSelector { pack, catalogs }
    }

    /// Select the support member.
    ///
    /// `dead_load_lbf` is the sign weight without the member; `span_ft` is
    /// the cantilever length from grade to the resultant.
    pub fn select(
        &self,
        families: &[SupportFamily],
        load: &WindLoadResult,
        dead_load_lbf: f64,
        span_ft: f64,
    ) -> CalcResult<MemberSelection> {
        if self.pack.combinations.is_empty() {
            return Err(CalcError::missing_pack_data(self.pack.id.as_str(), "combinations"));
        }

        let mut candidates = Vec::new();
        for &family in families {
            let sections = self.catalogs.sections(family)?;
            let mut best: Option<SectionCandidate> = None;

            for (i, section) in sections.iter().enumerate() {
                let eval = self.evaluate(section, load, dead_load_lbf, span_ft)?;
                if eval.ratios.passes() {
                    tracing::debug!(
                        family = family.as_str(),
                        section = %section.designation,
                        ratio = eval.governing_ratio,
                        check = %eval.governing_check,
                        "member selected"
                    );
                    return Ok(self.selection(family, section, span_ft, i + 1, eval));
                }
                if best.as_ref().map_or(true, |b| eval.governing_ratio < b.governing_ratio) {
                    best = Some(SectionCandidate {
                        family,
                        designation: section.designation.clone(),
                        governing_ratio: eval.governing_ratio,
                        governing_check: eval.governing_check,
                    });
                }
            }

            tracing::debug!(family = family.as_str(), "no passing section in family");
            candidates.extend(best);
        }

        Err(CalcError::NoPassingSection { candidates })
    }

    /// Ratios for one section under every combination
    fn evaluate(
        &self,
        section: &CatalogSection,
        load: &WindLoadResult,
        sign_weight_lbf: f64,
        span_ft: f64,
    ) -> CalcResult<Evaluation> {
        let rules = &self.pack.member;
        let fy = self.pack.yield_strength(section.grade)?;
        let fb_allow = rules.allowable_bending * fy;
        let fv_allow = rules.allowable_shear * fy;
        let fa_allow = rules.allowable_axial * fy;
        let e = rules.elastic_modulus_psi;

        let span_in: Inches = Feet(span_ft).into();
        let allowable_deflection_in = span_in.0 / rules.deflection_limit_ratio;
        let dead_load_lbf = sign_weight_lbf + section.weight_plf * span_ft;

        let mut ratios = MemberRatios {
            bending: 0.0,
            shear: 0.0,
            deflection: 0.0,
            interaction: 0.0,
        };
        let mut governing: Option<(f64, &LoadCombination)> = None;
        let mut deflection_in = 0.0;
        let mut design_moment_ftlb = 0.0;

        for combo in &self.pack.combinations {
            let m: InLb = FtLb(combo.factored(LoadType::Wind, load.moment_ftlb)).into();
            let v = combo.factored(LoadType::Wind, load.force_lbf);
            let p = combo.factored(LoadType::Dead, dead_load_lbf);

            let fb = m.0 / section.sx_in3;
            let bending = fb / fb_allow;
            let shear = v / (section.area_in2 * fv_allow);
            let delta = m.0 * span_in.0 * span_in.0 / (3.0 * e * section.ix_in4);
            let deflection = delta / allowable_deflection_in;
            let interaction = (p / section.area_in2) / fa_allow + bending;

            ratios.bending = ratios.bending.max(bending);
            ratios.shear = ratios.shear.max(shear);
            ratios.deflection = ratios.deflection.max(deflection);
            ratios.interaction = ratios.interaction.max(interaction);

            let combo_max = bending.max(shear).max(deflection).max(interaction);
            if governing.map_or(true, |(g, _)| combo_max > g) {
                governing = Some((combo_max, combo));
                deflection_in = delta;
                design_moment_ftlb = FtLb::from(m).0;
            }
        }

        let (governing_ratio, governing_check) = ratios.governing();
        let governing_combination = governing
            .map(|(_, c)| c.name.clone())
            .unwrap_or_default();

        Ok(Evaluation {
            ratios,
            governing_ratio,
            governing_check,
            governing_combination,
            deflection_in,
            allowable_deflection_in,
            design_moment_ftlb,
            dead_load_lbf,
            fy_psi: fy,
        })
    }

    fn selection(
        &self,
        family: SupportFamily,
        section: &CatalogSection,
        span_ft: f64,
        sections_checked: usize,
        eval: Evaluation,
    ) -> MemberSelection {
        let references = match self.pack.code {
            crate::standards::StandardCode::Asce7 => vec![
                Citation::new("bending", CodeReference::aisc360("F")),
                Citation::new("shear", CodeReference::aisc360("G")),
                Citation::new("interaction", CodeReference::aisc360("H")),
                Citation::new("deflection", CodeReference::Mechanics),
                Citation::new("combinations", CodeReference::asce7(&self.pack.edition, "2.4.1")),
            ],
            crate::standards::StandardCode::En1991 => vec![
                Citation::new("bending", CodeReference::aisc360("F")),
                Citation::new("shear", CodeReference::aisc360("G")),
                Citation::new("interaction", CodeReference::aisc360("H")),
                Citation::new("deflection", CodeReference::Mechanics),
            ],
        };

        MemberSelection {
            family,
            section: section.clone(),
            fy_psi: eval.fy_psi,
            span_ft,
            ratios: eval.ratios,
            governing_ratio: eval.governing_ratio,
            governing_check: eval.governing_check,
            governing_combination: eval.governing_combination,
            deflection_in: eval.deflection_in,
            allowable_deflection_in: eval.allowable_deflection_in,
            design_moment_ftlb: eval.design_moment_ftlb,
            dead_load_lbf: eval.dead_load_lbf,
            sections_checked,
            references,
        }
    }
}
