//! # Standards Packs
//!
//! A standards pack is one design-code edition expressed as data: wind
//! coefficients, importance factors, load combinations, member design
//! factors, material strengths, foundation rules, soil properties and anchor
//! rules. Packs are TOML files; the SHA-256 of the raw bytes identifies the
//! exact data a result was computed against.
//!
//! Parsing happens in two steps. The file is first deserialized into raw
//! structs where every field is optional, then validated into
//! [`StandardsPack`]. Validation collects every missing required key and
//! reports them together in one `MissingPackData`, so a broken pack is fixed
//! in one pass rather than one key at a time.
//!
//! Table keys (exposure, importance class, grade, soil class) are parsed into
//! closed enums here. Nothing past this module looks up pack data by string.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::{CalcError, CalcResult};
use crate::loads::{LoadCombination, LoadType};

use super::categories::{
    ExposureCategory, ImportanceClass, MaterialGrade, SoilClass, StandardCode,
};

// ============================================================================
// Identity
// ============================================================================

/// Closed set of packs this build knows how to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PackId {
    #[serde(rename = "us.asce7-16")]
    UsAsce7_16,
    #[serde(rename = "us.asce7-22")]
    UsAsce7_22,
    #[serde(rename = "eu.en1991-1-4")]
    EuEn1991_1_4,
}

impl PackId {
    pub const ALL: [PackId; 3] = [PackId::UsAsce7_16, PackId::UsAsce7_22, PackId::EuEn1991_1_4];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackId::UsAsce7_16 => "us.asce7-16",
            PackId::UsAsce7_22 => "us.asce7-22",
            PackId::EuEn1991_1_4 => "eu.en1991-1-4",
        }
    }

    /// Design code the pack implements
    pub fn code(&self) -> StandardCode {
        match self {
            PackId::UsAsce7_16 | PackId::UsAsce7_22 => StandardCode::Asce7,
            PackId::EuEn1991_1_4 => StandardCode::En1991,
        }
    }

    /// Position in [`PackId::ALL`]
    pub fn index(&self) -> usize {
        match self {
            PackId::UsAsce7_16 => 0,
            PackId::UsAsce7_22 => 1,
            PackId::EuEn1991_1_4 => 2,
        }
    }

    /// File name of the pack inside a pack directory
    pub fn file_name(&self) -> String {
        format!("{}.toml", self.as_str())
    }

    /// Pack source compiled into the binary
    pub fn builtin_source(&self) -> &'static str {
        match self {
            PackId::UsAsce7_16 => include_str!("../../packs/us.asce7-16.toml"),
            PackId::UsAsce7_22 => include_str!("../../packs/us.asce7-22.toml"),
            PackId::EuEn1991_1_4 => include_str!("../../packs/eu.en1991-1-4.toml"),
        }
    }

    /// Resolve a request's (code, edition) pair to a pack.
    ///
    /// Editions are accepted in the common spellings: `7-16`, `16`, `2016`
    /// for ASCE 7 and `1-4`, `2005`, `EN1991-1-4` for EN 1991.
    ///
    /// # Example
    ///
    /// ```rust
    /// use signcalc_core::standards::{PackId, StandardCode};
    ///
    /// assert_eq!(PackId::resolve(StandardCode::Asce7, "7-22").unwrap(), PackId::UsAsce7_22);
    /// assert!(PackId::resolve(StandardCode::Asce7, "7-10").is_err());
    /// ```
    pub fn resolve(code: StandardCode, edition: &str) -> CalcResult<PackId> {
        let normalized = edition.trim().to_uppercase().replace(' ', "");
        let resolved = match code {
            StandardCode::Asce7 => match normalized.trim_start_matches("ASCE") {
                "7-16" | "16" | "2016" => Some(PackId::UsAsce7_16),
                "7-22" | "22" | "2022" => Some(PackId::UsAsce7_22),
                _ => None,
            },
            StandardCode::En1991 => match normalized.as_str() {
                "1-4" | "2005" | "EN1991-1-4" | "EN1991-1-4:2005" => Some(PackId::EuEn1991_1_4),
                _ => None,
            },
        };
        resolved.ok_or_else(|| CalcError::pack_not_found(format!("{} {}", code, edition)))
    }
}

impl FromStr for PackId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown pack id '{}'", s))
    }
}

impl fmt::Display for PackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hex SHA-256 digest of raw bytes
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let hash = Sha256::digest(bytes);
        ContentHash(format!("{hash:x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Validated pack
// ============================================================================

/// Kz table: velocity pressure exposure coefficients by height band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KzTable {
    /// Band heights in feet, strictly ascending
    pub heights_ft: Vec<f64>,
    /// One column per exposure, same length as `heights_ft`
    pub columns: BTreeMap<ExposureCategory, Vec<f64>>,
}

impl KzTable {
    pub fn column(&self, exposure: ExposureCategory) -> Option<&[f64]> {
        self.columns.get(&exposure).map(Vec::as_slice)
    }

    pub fn max_height_ft(&self) -> f64 {
        self.heights_ft.last().copied().unwrap_or(0.0)
    }
}

/// ASCE 7 wind data (Chapter 26/29)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asce7WindData {
    /// 0.00256 in qz = 0.00256 Kz Kzt Kd Ke V^2 (psf, V in mph)
    pub velocity_constant: f64,
    pub default_basic_wind_speed: f64,
    pub min_height_ft: f64,
    pub kd: f64,
    pub kzt: f64,
    pub ke: f64,
    /// When present, Ke = exp(-c * elevation_ft) (ASCE 7-22 Table 26.9-1 note)
    pub ke_elevation_coefficient: Option<f64>,
    pub gust_factor: f64,
    pub force_coefficient: f64,
    pub kz: KzTable,
}

/// EN 1991-1-4 terrain category parameters (Table 4.1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainParameters {
    pub category: String,
    pub z0_m: f64,
    pub z_min_m: f64,
}

/// EN 1991-1-4 wind data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct En1991WindData {
    pub rho_air: f64,
    pub default_basic_wind_speed: f64,
    pub c_dir: f64,
    pub c_season: f64,
    pub orography_factor: f64,
    pub turbulence_factor: f64,
    pub terrain_factor: f64,
    pub structural_factor: f64,
    pub force_coefficient: f64,
    pub z_max_m: f64,
    pub reference_roughness_m: f64,
    pub terrain: BTreeMap<ExposureCategory, TerrainParameters>,
}

/// Wind data, shaped by the pack's code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum WindData {
    Asce7(Asce7WindData),
    En1991(En1991WindData),
}

/// Allowable stress factors for the support member
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberRules {
    /// Fb = allowable_bending * Fy
    pub allowable_bending: f64,
    /// Fv = allowable_shear * Fy
    pub allowable_shear: f64,
    /// Fa = allowable_axial * Fy
    pub allowable_axial: f64,
    pub elastic_modulus_psi: f64,
    /// Deflection limit L / ratio
    pub deflection_limit_ratio: f64,
}

/// Pier sizing rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoundationRules {
    pub min_safety_factor: f64,
    pub min_diameter_in: f64,
    pub max_diameter_in: f64,
    pub min_depth_in: f64,
    pub max_depth_in: f64,
    pub step_in: f64,
    pub depth_to_diameter_ratio: f64,
    pub concrete_unit_weight_pcf: f64,
    pub lateral_bearing_multiplier: f64,
    pub uplift_coefficient: f64,
}

/// Presumptive soil properties (IBC Table 1806.2 style)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilProperties {
    pub vertical_bearing_psf: f64,
    pub lateral_bearing_psf_per_ft: f64,
    pub friction_coefficient: f64,
    pub skin_friction_psf: f64,
    pub unit_weight_pcf: f64,
}

/// Anchor bolt rules for baseplate foundations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorRules {
    /// Candidate diameters, ascending
    pub bolt_diameters_in: Vec<f64>,
    pub steel_strength_ksi: f64,
    pub concrete_strength_psi: f64,
    pub embedment_ratio: f64,
    pub edge_distance_ratio: f64,
    pub plate_clearance_in: f64,
    pub tension_strength_factor: f64,
    pub shear_strength_factor: f64,
    pub breakout_coefficient: f64,
    pub breakout_strength_factor: f64,
}

/// A loaded, validated standards pack. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardsPack {
    pub id: PackId,
    pub code: StandardCode,
    pub edition: String,
    pub title: String,
    pub hash: ContentHash,
    pub wind: WindData,
    pub importance: BTreeMap<ImportanceClass, f64>,
    pub combinations: Vec<LoadCombination>,
    pub member: MemberRules,
    pub materials: BTreeMap<MaterialGrade, f64>,
    pub foundation: FoundationRules,
    pub soils: BTreeMap<SoilClass, SoilProperties>,
    pub anchors: AnchorRules,
}

impl StandardsPack {
    /// Parse and validate pack source text.
    ///
    /// The content hash is taken over the exact bytes given.
    pub fn parse(id: PackId, source: &str) -> CalcResult<Self> {
        let hash = ContentHash::from_bytes(source.as_bytes());
        let raw: RawPack =
            toml::from_str(source).map_err(|e| CalcError::pack_parse(id.as_str(), e.to_string()))?;
        validate(id, hash, raw)
    }

    /// Wind importance factor for a class
    pub fn importance_factor(&self, class: ImportanceClass) -> CalcResult<f64> {
        self.importance
            .get(&class)
            .copied()
            .ok_or_else(|| CalcError::missing_pack_data(self.id.as_str(), format!("importance.{}", class)))
    }

    /// Minimum yield strength Fy (psi) for a grade
    pub fn yield_strength(&self, grade: MaterialGrade) -> CalcResult<f64> {
        self.materials
            .get(&grade)
            .copied()
            .ok_or_else(|| CalcError::missing_pack_data(self.id.as_str(), format!("materials.{}", grade)))
    }

    pub fn soil(&self, class: SoilClass) -> CalcResult<&SoilProperties> {
        self.soils
            .get(&class)
            .ok_or_else(|| CalcError::missing_pack_data(self.id.as_str(), format!("soil.{}", class)))
    }
}

// ============================================================================
// Raw (file) representation
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct RawPack {
    meta: Option<RawMeta>,
    wind: Option<RawWind>,
    terrain: Option<BTreeMap<String, RawTerrain>>,
    importance: Option<BTreeMap<String, f64>>,
    combinations: Option<Vec<RawCombination>>,
    member: Option<RawMember>,
    materials: Option<BTreeMap<String, f64>>,
    foundation: Option<RawFoundation>,
    soil: Option<BTreeMap<String, RawSoil>>,
    anchors: Option<RawAnchors>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMeta {
    id: Option<String>,
    code: Option<String>,
    edition: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawWind {
    default_basic_wind_speed: Option<f64>,
    force_coefficient: Option<f64>,
    // ASCE 7
    velocity_constant: Option<f64>,
    min_height_ft: Option<f64>,
    kd: Option<f64>,
    kzt: Option<f64>,
    ke: Option<f64>,
    ke_elevation_coefficient: Option<f64>,
    gust_factor: Option<f64>,
    kz: Option<BTreeMap<String, Vec<f64>>>,
    // EN 1991
    rho_air: Option<f64>,
    c_dir: Option<f64>,
    c_season: Option<f64>,
    orography_factor: Option<f64>,
    turbulence_factor: Option<f64>,
    terrain_factor: Option<f64>,
    structural_factor: Option<f64>,
    z_max_m: Option<f64>,
    reference_roughness_m: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTerrain {
    category: Option<String>,
    z0_m: Option<f64>,
    z_min_m: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCombination {
    name: Option<String>,
    equation: Option<String>,
    dead: Option<f64>,
    wind: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMember {
    allowable_bending: Option<f64>,
    allowable_shear: Option<f64>,
    allowable_axial: Option<f64>,
    elastic_modulus_psi: Option<f64>,
    deflection_limit_ratio: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFoundation {
    min_safety_factor: Option<f64>,
    min_diameter_in: Option<f64>,
    max_diameter_in: Option<f64>,
    min_depth_in: Option<f64>,
    max_depth_in: Option<f64>,
    step_in: Option<f64>,
    depth_to_diameter_ratio: Option<f64>,
    concrete_unit_weight_pcf: Option<f64>,
    lateral_bearing_multiplier: Option<f64>,
    uplift_coefficient: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSoil {
    vertical_bearing_psf: Option<f64>,
    lateral_bearing_psf_per_ft: Option<f64>,
    friction_coefficient: Option<f64>,
    skin_friction_psf: Option<f64>,
    unit_weight_pcf: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAnchors {
    bolt_diameters_in: Option<Vec<f64>>,
    steel_strength_ksi: Option<f64>,
    concrete_strength_psi: Option<f64>,
    embedment_ratio: Option<f64>,
    edge_distance_ratio: Option<f64>,
    plate_clearance_in: Option<f64>,
    tension_strength_factor: Option<f64>,
    shear_strength_factor: Option<f64>,
    breakout_coefficient: Option<f64>,
    breakout_strength_factor: Option<f64>,
}

// ============================================================================
// Validation
// ============================================================================

/// Records every absent required key; placeholder values are never used
/// because `finish` fails whenever anything was recorded.
struct RequiredKeys {
    missing: Vec<String>,
}

impl RequiredKeys {
    fn new() -> Self {
        RequiredKeys { missing: Vec::new() }
    }

    fn req<T: Default>(&mut self, value: Option<T>, key: impl Into<String>) -> T {
        match value {
            Some(v) => v,
            None => {
                self.missing.push(key.into());
                T::default()
            }
        }
    }

    fn finish(self, id: PackId) -> CalcResult<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(CalcError::MissingPackData {
                pack: id.as_str().to_string(),
                keys: self.missing,
            })
        }
    }
}

fn parse_key<K: FromStr<Err = String>>(id: PackId, table: &str, key: &str) -> CalcResult<K> {
    key.parse::<K>()
        .map_err(|e| CalcError::pack_parse(id.as_str(), format!("[{}] {}", table, e)))
}

fn validate(id: PackId, hash: ContentHash, raw: RawPack) -> CalcResult<StandardsPack> {
    let mut keys = RequiredKeys::new();

    let meta = keys.req(raw.meta, "meta");
    let meta_id = keys.req(meta.id, "meta.id");
    let code_str = keys.req(meta.code, "meta.code");
    let edition = keys.req(meta.edition, "meta.edition");
    let title = meta.title.unwrap_or_default();

    if !meta_id.is_empty() && meta_id != id.as_str() {
        return Err(CalcError::pack_parse(
            id.as_str(),
            format!("meta.id '{}' does not match requested pack", meta_id),
        ));
    }
    // Required keys depend on the code, so an unreadable code ends validation here
    let code = if code_str.is_empty() {
        id.code()
    } else {
        parse_key::<StandardCode>(id, "meta", &code_str)?
    };
    if code != id.code() {
        return Err(CalcError::pack_parse(
            id.as_str(),
            format!("meta.code {} does not match pack family {}", code, id.code()),
        ));
    }

    let wind_raw = keys.req(raw.wind, "wind");
    let wind = match code {
        StandardCode::Asce7 => WindData::Asce7(validate_asce7_wind(id, wind_raw, &mut keys)?),
        StandardCode::En1991 => {
            WindData::En1991(validate_en1991_wind(id, wind_raw, raw.terrain, &mut keys)?)
        }
    };

    let mut importance = BTreeMap::new();
    for (key, factor) in keys.req(raw.importance, "importance") {
        importance.insert(parse_key::<ImportanceClass>(id, "importance", &key)?, factor);
    }

    let mut combinations = Vec::new();
    let raw_combos = keys.req(raw.combinations, "combinations");
    if raw_combos.is_empty() && !keys.missing.iter().any(|k| k == "combinations") {
        keys.missing.push("combinations".to_string());
    }
    for (i, combo) in raw_combos.into_iter().enumerate() {
        let name = keys.req(combo.name, format!("combinations[{}].name", i));
        let equation = keys.req(combo.equation, format!("combinations[{}].equation", i));
        let dead = keys.req(combo.dead, format!("combinations[{}].dead", i));
        let wind_factor = keys.req(combo.wind, format!("combinations[{}].wind", i));
        combinations.push(
            LoadCombination::new(name, equation)
                .with_factor(LoadType::Dead, dead)
                .with_factor(LoadType::Wind, wind_factor),
        );
    }

    let m = keys.req(raw.member, "member");
    let member = MemberRules {
        allowable_bending: keys.req(m.allowable_bending, "member.allowable_bending"),
        allowable_shear: keys.req(m.allowable_shear, "member.allowable_shear"),
        allowable_axial: keys.req(m.allowable_axial, "member.allowable_axial"),
        elastic_modulus_psi: keys.req(m.elastic_modulus_psi, "member.elastic_modulus_psi"),
        deflection_limit_ratio: keys.req(m.deflection_limit_ratio, "member.deflection_limit_ratio"),
    };

    let mut materials = BTreeMap::new();
    for (key, fy) in keys.req(raw.materials, "materials") {
        materials.insert(parse_key::<MaterialGrade>(id, "materials", &key)?, fy);
    }

    let f = keys.req(raw.foundation, "foundation");
    let foundation = FoundationRules {
        min_safety_factor: keys.req(f.min_safety_factor, "foundation.min_safety_factor"),
        min_diameter_in: keys.req(f.min_diameter_in, "foundation.min_diameter_in"),
        max_diameter_in: keys.req(f.max_diameter_in, "foundation.max_diameter_in"),
        min_depth_in: keys.req(f.min_depth_in, "foundation.min_depth_in"),
        max_depth_in: keys.req(f.max_depth_in, "foundation.max_depth_in"),
        step_in: keys.req(f.step_in, "foundation.step_in"),
        depth_to_diameter_ratio: keys.req(f.depth_to_diameter_ratio, "foundation.depth_to_diameter_ratio"),
        concrete_unit_weight_pcf: keys.req(f.concrete_unit_weight_pcf, "foundation.concrete_unit_weight_pcf"),
        lateral_bearing_multiplier: keys.req(f.lateral_bearing_multiplier, "foundation.lateral_bearing_multiplier"),
        uplift_coefficient: keys.req(f.uplift_coefficient, "foundation.uplift_coefficient"),
    };

    let mut soils = BTreeMap::new();
    for (key, s) in keys.req(raw.soil, "soil") {
        let class = parse_key::<SoilClass>(id, "soil", &key)?;
        let prefix = format!("soil.{}", key);
        soils.insert(
            class,
            SoilProperties {
                vertical_bearing_psf: keys.req(s.vertical_bearing_psf, format!("{prefix}.vertical_bearing_psf")),
                lateral_bearing_psf_per_ft: keys
                    .req(s.lateral_bearing_psf_per_ft, format!("{prefix}.lateral_bearing_psf_per_ft")),
                friction_coefficient: keys.req(s.friction_coefficient, format!("{prefix}.friction_coefficient")),
                skin_friction_psf: keys.req(s.skin_friction_psf, format!("{prefix}.skin_friction_psf")),
                unit_weight_pcf: keys.req(s.unit_weight_pcf, format!("{prefix}.unit_weight_pcf")),
            },
        );
    }

    let a = keys.req(raw.anchors, "anchors");
    let anchors = AnchorRules {
        bolt_diameters_in: keys.req(a.bolt_diameters_in, "anchors.bolt_diameters_in"),
        steel_strength_ksi: keys.req(a.steel_strength_ksi, "anchors.steel_strength_ksi"),
        concrete_strength_psi: keys.req(a.concrete_strength_psi, "anchors.concrete_strength_psi"),
        embedment_ratio: keys.req(a.embedment_ratio, "anchors.embedment_ratio"),
        edge_distance_ratio: keys.req(a.edge_distance_ratio, "anchors.edge_distance_ratio"),
        plate_clearance_in: keys.req(a.plate_clearance_in, "anchors.plate_clearance_in"),
        tension_strength_factor: keys.req(a.tension_strength_factor, "anchors.tension_strength_factor"),
        shear_strength_factor: keys.req(a.shear_strength_factor, "anchors.shear_strength_factor"),
        breakout_coefficient: keys.req(a.breakout_coefficient, "anchors.breakout_coefficient"),
        breakout_strength_factor: keys.req(a.breakout_strength_factor, "anchors.breakout_strength_factor"),
    };

    keys.finish(id)?;

    check_ascending(id, "anchors.bolt_diameters_in", &anchors.bolt_diameters_in)?;
    if foundation.step_in <= 0.0 {
        return Err(CalcError::pack_parse(id.as_str(), "foundation.step_in must be positive"));
    }

    tracing::debug!(pack = id.as_str(), hash = %hash, "pack validated");

    Ok(StandardsPack {
        id,
        code,
        edition,
        title,
        hash,
        wind,
        importance,
        combinations,
        member,
        materials,
        foundation,
        soils,
        anchors,
    })
}

fn validate_asce7_wind(id: PackId, w: RawWind, keys: &mut RequiredKeys) -> CalcResult<Asce7WindData> {
    let mut kz_raw = keys.req(w.kz, "wind.kz");
    let heights_ft = if kz_raw.is_empty() {
        Vec::new()
    } else {
        keys.req(kz_raw.remove("heights_ft"), "wind.kz.heights_ft")
    };

    let mut columns = BTreeMap::new();
    for (key, column) in kz_raw {
        let exposure = parse_key::<ExposureCategory>(id, "wind.kz", &key)?;
        if column.len() != heights_ft.len() {
            return Err(CalcError::pack_parse(
                id.as_str(),
                format!(
                    "wind.kz.{} has {} values for {} heights",
                    key,
                    column.len(),
                    heights_ft.len()
                ),
            ));
        }
        columns.insert(exposure, column);
    }
    check_ascending(id, "wind.kz.heights_ft", &heights_ft)?;

    Ok(Asce7WindData {
        velocity_constant: keys.req(w.velocity_constant, "wind.velocity_constant"),
        default_basic_wind_speed: keys.req(w.default_basic_wind_speed, "wind.default_basic_wind_speed"),
        min_height_ft: keys.req(w.min_height_ft, "wind.min_height_ft"),
        kd: keys.req(w.kd, "wind.kd"),
        kzt: keys.req(w.kzt, "wind.kzt"),
        ke: keys.req(w.ke, "wind.ke"),
        ke_elevation_coefficient: w.ke_elevation_coefficient,
        gust_factor: keys.req(w.gust_factor, "wind.gust_factor"),
        force_coefficient: keys.req(w.force_coefficient, "wind.force_coefficient"),
        kz: KzTable { heights_ft, columns },
    })
}

fn validate_en1991_wind(
    id: PackId,
    w: RawWind,
    terrain: Option<BTreeMap<String, RawTerrain>>,
    keys: &mut RequiredKeys,
) -> CalcResult<En1991WindData> {
    let mut terrain_params = BTreeMap::new();
    for (key, t) in keys.req(terrain, "terrain") {
        let exposure = parse_key::<ExposureCategory>(id, "terrain", &key)?;
        terrain_params.insert(
            exposure,
            TerrainParameters {
                category: keys.req(t.category, format!("terrain.{key}.category")),
                z0_m: keys.req(t.z0_m, format!("terrain.{key}.z0_m")),
                z_min_m: keys.req(t.z_min_m, format!("terrain.{key}.z_min_m")),
            },
        );
    }

    Ok(En1991WindData {
        rho_air: keys.req(w.rho_air, "wind.rho_air"),
        default_basic_wind_speed: keys.req(w.default_basic_wind_speed, "wind.default_basic_wind_speed"),
        c_dir: keys.req(w.c_dir, "wind.c_dir"),
        c_season: keys.req(w.c_season, "wind.c_season"),
        orography_factor: keys.req(w.orography_factor, "wind.orography_factor"),
        turbulence_factor: keys.req(w.turbulence_factor, "wind.turbulence_factor"),
        terrain_factor: keys.req(w.terrain_factor, "wind.terrain_factor"),
        structural_factor: keys.req(w.structural_factor, "wind.structural_factor"),
        force_coefficient: keys.req(w.force_coefficient, "wind.force_coefficient"),
        z_max_m: keys.req(w.z_max_m, "wind.z_max_m"),
        reference_roughness_m: keys.req(w.reference_roughness_m, "wind.reference_roughness_m"),
        terrain: terrain_params,
    })
}

fn check_ascending(id: PackId, key: &str, values: &[f64]) -> CalcResult<()> {
    if values.windows(2).any(|w| w[1] <= w[0]) {
        return Err(CalcError::pack_parse(
            id.as_str(),
            format!("{} must be strictly ascending", key),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin(id: PackId) -> StandardsPack {
        StandardsPack::parse(id, id.builtin_source()).unwrap()
    }

    #[test]
    fn test_builtin_packs_validate() {
        for id in PackId::ALL {
            let pack = builtin(id);
            assert_eq!(pack.id, id);
            assert_eq!(pack.code, id.code());
            assert_eq!(pack.soils.len(), 5);
            assert!(!pack.combinations.is_empty());
        }
    }

    #[test]
    fn test_asce7_22_has_elevation_ke() {
        let pack = builtin(PackId::UsAsce7_22);
        match &pack.wind {
            WindData::Asce7(w) => assert!(w.ke_elevation_coefficient.is_some()),
            WindData::En1991(_) => panic!("expected ASCE 7 wind data"),
        }
        let pack = builtin(PackId::UsAsce7_16);
        match &pack.wind {
            WindData::Asce7(w) => assert!(w.ke_elevation_coefficient.is_none()),
            WindData::En1991(_) => panic!("expected ASCE 7 wind data"),
        }
    }

    #[test]
    fn test_resolve_editions() {
        assert_eq!(PackId::resolve(StandardCode::Asce7, "7-16").unwrap(), PackId::UsAsce7_16);
        assert_eq!(PackId::resolve(StandardCode::Asce7, "ASCE 7-22").unwrap(), PackId::UsAsce7_22);
        assert_eq!(PackId::resolve(StandardCode::Asce7, "2016").unwrap(), PackId::UsAsce7_16);
        assert_eq!(PackId::resolve(StandardCode::En1991, "1-4").unwrap(), PackId::EuEn1991_1_4);
        let err = PackId::resolve(StandardCode::En1991, "7-16").unwrap_err();
        assert_eq!(err.error_code(), "PACK_NOT_FOUND");
    }

    #[test]
    fn test_hash_is_stable_and_sensitive() {
        let src = PackId::UsAsce7_16.builtin_source();
        let a = ContentHash::from_bytes(src.as_bytes());
        let b = ContentHash::from_bytes(src.as_bytes());
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);

        let altered = src.replacen("kd = 0.85", "kd = 0.86", 1);
        assert_ne!(altered, src);
        assert_ne!(ContentHash::from_bytes(altered.as_bytes()), a);
    }

    #[test]
    fn test_missing_keys_reported_together() {
        let src = PackId::UsAsce7_16
            .builtin_source()
            .replacen("kd = 0.85\n", "", 1)
            .replacen("gust_factor = 0.85\n", "", 1);
        let err = StandardsPack::parse(PackId::UsAsce7_16, &src).unwrap_err();
        match err {
            CalcError::MissingPackData { pack, keys } => {
                assert_eq!(pack, "us.asce7-16");
                assert!(keys.contains(&"wind.kd".to_string()));
                assert!(keys.contains(&"wind.gust_factor".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_en_pack_requires_terrain() {
        let src = PackId::EuEn1991_1_4.builtin_source();
        let cut = src.find("[terrain.B]").unwrap();
        let end = src.find("# K_FI").unwrap();
        let stripped = format!("{}{}", &src[..cut], &src[end..]);
        let err = StandardsPack::parse(PackId::EuEn1991_1_4, &stripped).unwrap_err();
        match err {
            CalcError::MissingPackData { keys, .. } => assert_eq!(keys, vec!["terrain".to_string()]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = StandardsPack::parse(PackId::UsAsce7_16, "[meta\nid = ").unwrap_err();
        assert_eq!(err.error_code(), "PACK_PARSE");
        assert!(!err.is_abstain());
    }

    #[test]
    fn test_unknown_table_key_rejected() {
        let src = PackId::UsAsce7_16
            .builtin_source()
            .replacen("[soil.clay]", "[soil.peat]", 1);
        let err = StandardsPack::parse(PackId::UsAsce7_16, &src).unwrap_err();
        assert_eq!(err.error_code(), "PACK_PARSE");
    }

    #[test]
    fn test_lookup_missing_entry() {
        let mut pack = builtin(PackId::UsAsce7_16);
        pack.importance.remove(&ImportanceClass::IV);
        let err = pack.importance_factor(ImportanceClass::IV).unwrap_err();
        assert_eq!(
            err,
            CalcError::missing_pack_data("us.asce7-16", "importance.IV")
        );
        assert!((pack.importance_factor(ImportanceClass::II).unwrap() - 1.0).abs() < 1e-12);
    }
}
