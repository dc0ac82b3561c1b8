//! EN 1991-1-4 wind force on a sign board (Sections 4 and 5, 7.4.3)
//!
//! ```text
//! vb    = c_dir · c_season · vb,0                 (4.1)
//! qb    = ½ · ρ · vb²                             (4.10)
//! kr    = 0.19 · (z0 / z0,II)^0.07                (4.5)
//! cr(z) = kr · ln(z / z0)                         (4.4)
//! Iv(z) = kI / (co · ln(z / z0))                  (4.7)
//! Ce(z) = (1 + 7·Iv) · cr² · co²
//! qp(z) = Ce(z) · Ce,T · qb                       (4.8)
//! Fw    = cs·cd · cf · qp(ze) · Aref              (5.3)
//! ```
//!
//! The site exposure selects the terrain category through the pack's
//! `[terrain]` table. The force is converted to pound-force for the member and
//! foundation checks and multiplied by the consequence-class factor.

use crate::errors::{CalcError, CalcResult};
use crate::references::{Citation, CodeReference};
use crate::standards::{En1991WindData, StandardsPack};
use crate::units::{Feet, Meters, Newtons, Pascals, Pounds, Psf, SqFt, SqM};

use super::{En1991Coefficients, WindCoefficients, WindInput, WindLoadResult};

/// Compute the EN 1991-1-4 wind load for a sign board
pub fn compute(pack: &StandardsPack, wind: &En1991WindData, input: &WindInput) -> CalcResult<WindLoadResult> {
    let mut assumptions = Vec::new();
    let overrides = &input.overrides;

    let terrain = wind.terrain.get(&input.exposure).ok_or_else(|| {
        CalcError::missing_pack_data(pack.id.as_str(), format!("terrain.{}", input.exposure))
    })?;

    let vb0 = match input.basic_wind_speed {
        Some(v) => v,
        None => {
            assumptions.push(format!(
                "Basic wind velocity defaulted to {:?} m/s: no site wind speed supplied",
                wind.default_basic_wind_speed
            ));
            wind.default_basic_wind_speed
        }
    };
    let vb = wind.c_dir * wind.c_season * vb0;
    let qb = 0.5 * wind.rho_air * vb * vb;

    let z: Meters = Feet(input.height_ft).into();
    let z_used = if z.0 < terrain.z_min_m {
        assumptions.push(format!(
            "Height {:.2} m raised to z_min {} m for terrain category {}",
            z.0, terrain.z_min_m, terrain.category
        ));
        terrain.z_min_m
    } else {
        z.0
    };
    if z_used > wind.z_max_m {
        return Err(CalcError::missing_pack_data(
            pack.id.as_str(),
            format!("wind.z_max_m (height {:.2} m)", z_used),
        ));
    }

    let ln_z = (z_used / terrain.z0_m).ln();
    let kr = 0.19 * (terrain.z0_m / wind.reference_roughness_m).powf(0.07);
    let co = wind.orography_factor;
    let cr = kr * ln_z;
    let iv = wind.turbulence_factor / (co * ln_z);
    let ce = (1.0 + 7.0 * iv) * cr * cr * co * co;
    let qp = ce * wind.terrain_factor * qb;

    let cs_cd = overrides.gust_factor.unwrap_or(wind.structural_factor);
    let cf = overrides.force_coefficient.unwrap_or(wind.force_coefficient);
    if overrides.kzt.is_some() || overrides.kd.is_some() || overrides.ke.is_some() {
        assumptions.push("Kzt/Kd/Ke overrides ignored: not used by EN 1991-1-4".to_string());
    }
    let importance_factor = pack.importance_factor(input.importance)?;

    let area: SqM = SqFt(input.area_sqft).into();
    let force_n = cs_cd * cf * qp * area.0 * importance_factor;
    let force: Pounds = Newtons(force_n).into();
    let pressure: Psf = Pascals(qp).into();
    let moment_ftlb = force.0 * input.height_ft;

    let references = vec![
        Citation::new("vb", CodeReference::en1991("4.2")),
        Citation::new("qb", CodeReference::en1991("4.5(1)")),
        Citation::new("cr", CodeReference::en1991("4.3.2")),
        Citation::new("Iv", CodeReference::en1991("4.4")),
        Citation::new("qp", CodeReference::en1991("4.5")),
        Citation::new("cs_cd", CodeReference::en1991("6.2")),
        Citation::new("cf", CodeReference::en1991("7.4.3")),
        Citation::new("Fw", CodeReference::en1991("5.3")),
    ];

    Ok(WindLoadResult {
        pressure_psf: pressure.0,
        force_lbf: force.0,
        moment_ftlb,
        arm_ft: input.height_ft,
        area_sqft: input.area_sqft,
        coefficients: WindCoefficients::En1991(En1991Coefficients {
            vb0_ms: vb0,
            vb_ms: vb,
            qb_pa: qb,
            terrain_category: terrain.category.clone(),
            z_used_m: z_used,
            z0_m: terrain.z0_m,
            kr,
            cr,
            co,
            iv,
            ce,
            ce_t: wind.terrain_factor,
            qp_pa: qp,
            cs_cd,
            cf,
            importance_factor,
        }),
        references,
        assumptions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::sample_request;
    use crate::standards::{ExposureCategory, PackId, PackStore, WindData};

    fn eu_pack() -> StandardsPack {
        (*PackStore::builtin().load(PackId::EuEn1991_1_4).unwrap()).clone()
    }

    fn run(pack: &StandardsPack, input: &WindInput) -> CalcResult<WindLoadResult> {
        match &pack.wind {
            WindData::En1991(w) => compute(pack, w, input),
            WindData::Asce7(_) => panic!("expected EN 1991 pack"),
        }
    }

    fn input(height_ft: f64) -> WindInput {
        let mut i = WindInput::from_request(&sample_request());
        i.basic_wind_speed = Some(26.0);
        i.height_ft = height_ft;
        i
    }

    fn coefficients(r: &WindLoadResult) -> &En1991Coefficients {
        match &r.coefficients {
            WindCoefficients::En1991(c) => c,
            WindCoefficients::Asce7(_) => panic!("wrong coefficients"),
        }
    }

    #[test]
    fn test_exposure_factor_terrain_ii() {
        let p = eu_pack();
        // 5 m above grade, terrain II: Ce ~ 1.93
        let r = run(&p, &input(5.0 / 0.3048)).unwrap();
        let c = coefficients(&r);
        assert_eq!(c.terrain_category, "II");
        assert!((c.kr - 0.19).abs() < 1e-12);
        assert!((c.ce - 1.929).abs() < 0.005);
        assert!((c.qb_pa - 422.5).abs() < 1e-9);
    }

    #[test]
    fn test_force_in_pounds() {
        let p = eu_pack();
        let r = run(&p, &input(15.0)).unwrap();
        let c = coefficients(&r);
        let area_m2 = 60.0 * 0.092_903;
        let expected_n = c.cs_cd * c.cf * c.qp_pa * area_m2 * c.importance_factor;
        assert!((r.force_lbf - expected_n * 0.224_809).abs() < 1e-6);
        assert!((r.pressure_psf - c.qp_pa * 0.020_885_4).abs() < 1e-9);
        assert!((r.moment_ftlb - r.force_lbf * 15.0).abs() < 1e-6);
    }

    #[test]
    fn test_z_min_clip() {
        let p = eu_pack();
        let mut a = input(8.0);
        a.exposure = ExposureCategory::B; // terrain III, z_min 5 m
        let mut b = input(5.0 / 0.3048);
        b.exposure = ExposureCategory::B;
        let ra = run(&p, &a).unwrap();
        let rb = run(&p, &b).unwrap();
        assert!((coefficients(&ra).ce - coefficients(&rb).ce).abs() < 1e-12);
        assert!(ra.assumptions.iter().any(|s| s.contains("raised to z_min")));
    }

    #[test]
    fn test_above_z_max_is_missing_data() {
        let p = eu_pack();
        let err = run(&p, &input(700.0)).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_PACK_DATA");
    }

    #[test]
    fn test_missing_terrain_entry() {
        let mut p = eu_pack();
        if let WindData::En1991(w) = &mut p.wind {
            w.terrain.remove(&ExposureCategory::D);
        }
        let mut i = input(15.0);
        i.exposure = ExposureCategory::D;
        let err = run(&p, &i).unwrap_err();
        assert_eq!(err, CalcError::missing_pack_data("eu.en1991-1-4", "terrain.D"));
    }

    #[test]
    fn test_rougher_terrain_lowers_pressure() {
        let p = eu_pack();
        let mut open = input(20.0);
        open.exposure = ExposureCategory::D;
        let mut urban = input(20.0);
        urban.exposure = ExposureCategory::B;
        assert!(run(&p, &open).unwrap().pressure_psf > run(&p, &urban).unwrap().pressure_psf);
    }

    #[test]
    fn test_us_overrides_noted() {
        let p = eu_pack();
        let mut i = input(15.0);
        i.overrides.kzt = Some(1.1);
        let r = run(&p, &i).unwrap();
        assert!(r.assumptions.iter().any(|s| s.contains("overrides ignored")));
    }
}
