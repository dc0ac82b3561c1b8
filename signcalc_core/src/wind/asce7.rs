//! ASCE 7 wind loads on solid freestanding signs (Chapters 26 and 29)
//!
//! ```text
//! qz = K · Kz · Kzt · Kd · Ke · V²          (Eq. 26.10-1, psf)
//! F  = qz · G · Cf · Iw · As                (Eq. 29.3-1)
//! M  = F · h
//! ```
//!
//! `Kz` is linearly interpolated between table bands. Heights below the
//! standard minimum use the minimum's coefficient.

use crate::errors::{CalcError, CalcResult};
use crate::references::{Citation, CodeReference};
use crate::standards::{Asce7WindData, ExposureCategory, KzTable, StandardsPack};

use super::{Asce7Coefficients, WindCoefficients, WindInput, WindLoadResult};

/// Velocity pressure exposure coefficient Kz at a height.
///
/// `height_ft` must already be clipped to the standard minimum. Heights below
/// the first band use the first band's value; heights above the last band
/// fail with `MissingPackData`.
pub fn interpolate_kz(
    pack: &StandardsPack,
    table: &KzTable,
    exposure: ExposureCategory,
    height_ft: f64,
) -> CalcResult<f64> {
    let column = table
        .column(exposure)
        .ok_or_else(|| CalcError::missing_pack_data(pack.id.as_str(), format!("wind.kz.{}", exposure)))?;
    let heights = &table.heights_ft;

    if heights.is_empty() || height_ft > table.max_height_ft() {
        return Err(CalcError::missing_pack_data(
            pack.id.as_str(),
            format!("wind.kz.{} at {} ft", exposure, height_ft),
        ));
    }
    if height_ft <= heights[0] {
        return Ok(column[0]);
    }

    for i in 1..heights.len() {
        if height_ft <= heights[i] {
            let (h0, h1) = (heights[i - 1], heights[i]);
            let (k0, k1) = (column[i - 1], column[i]);
            return Ok(k0 + (k1 - k0) * (height_ft - h0) / (h1 - h0));
        }
    }

    Err(CalcError::internal(format!(
        "Kz interpolation fell through at {} ft",
        height_ft
    )))
}

/// Compute the ASCE 7 wind load for a sign panel
pub fn compute(pack: &StandardsPack, wind: &Asce7WindData, input: &WindInput) -> CalcResult<WindLoadResult> {
    let mut assumptions = Vec::new();
    let overrides = &input.overrides;

    let v = match input.basic_wind_speed {
        Some(v) => v,
        None => {
            assumptions.push(format!(
                "Basic wind speed defaulted to {:?} mph: no site wind speed supplied",
                wind.default_basic_wind_speed
            ));
            wind.default_basic_wind_speed
        }
    };

    let height_used_ft = if input.height_ft < wind.min_height_ft {
        assumptions.push(format!(
            "Height {} ft raised to the {} ft minimum for Kz",
            input.height_ft, wind.min_height_ft
        ));
        wind.min_height_ft
    } else {
        input.height_ft
    };
    let kz = interpolate_kz(pack, &wind.kz, input.exposure, height_used_ft)?;

    let kzt = match overrides.kzt {
        Some(k) => k,
        None => {
            assumptions.push(format!("Kzt defaulted to {:?}: no topographic data supplied", wind.kzt));
            wind.kzt
        }
    };
    let kd = match overrides.kd {
        Some(k) => k,
        None => {
            assumptions.push(format!("Kd defaulted to {:?}: sign directionality", wind.kd));
            wind.kd
        }
    };
    let ke = match (overrides.ke, wind.ke_elevation_coefficient) {
        (Some(k), _) => k,
        (None, Some(c)) => {
            let ke = (-c * input.elevation_ft.max(0.0)).exp();
            assumptions.push(format!(
                "Ke = {:.3} from site elevation {} ft",
                ke, input.elevation_ft
            ));
            ke
        }
        (None, None) => {
            assumptions.push(format!("Ke defaulted to {:?}: ground elevation factor not applied", wind.ke));
            wind.ke
        }
    };
    let gust_factor = overrides.gust_factor.unwrap_or(wind.gust_factor);
    let force_coefficient = overrides.force_coefficient.unwrap_or(wind.force_coefficient);
    let importance_factor = pack.importance_factor(input.importance)?;

    let qz = wind.velocity_constant * kz * kzt * kd * ke * v * v;
    let force_lbf = qz * gust_factor * force_coefficient * importance_factor * input.area_sqft;
    let moment_ftlb = force_lbf * input.height_ft;

    let ed = pack.edition.as_str();
    let references = vec![
        Citation::new("Kz", CodeReference::asce7(ed, "26.10.1")),
        Citation::new("Kzt", CodeReference::asce7(ed, "26.8")),
        Citation::new("Kd", CodeReference::asce7(ed, "26.6")),
        Citation::new("Ke", CodeReference::asce7(ed, "26.9")),
        Citation::new("qz", CodeReference::asce7(ed, "26.10.2")),
        Citation::new("G", CodeReference::asce7(ed, "26.11")),
        Citation::new("F", CodeReference::asce7(ed, "29.3.1")),
        Citation::new("Iw", CodeReference::asce7(ed, "1.5")),
    ];

    Ok(WindLoadResult {
        pressure_psf: qz,
        force_lbf,
        moment_ftlb,
        arm_ft: input.height_ft,
        area_sqft: input.area_sqft,
        coefficients: WindCoefficients::Asce7(Asce7Coefficients {
            basic_wind_speed_mph: v,
            height_used_ft,
            velocity_constant: wind.velocity_constant,
            kz,
            kzt,
            kd,
            ke,
            gust_factor,
            force_coefficient,
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
    use crate::standards::{ImportanceClass, PackId, PackStore, WindData};
    use std::sync::Arc;

    fn pack(id: PackId) -> Arc<StandardsPack> {
        PackStore::builtin().load(id).unwrap()
    }

    fn run(pack: &StandardsPack, input: &WindInput) -> CalcResult<WindLoadResult> {
        match &pack.wind {
            WindData::Asce7(w) => compute(pack, w, input),
            WindData::En1991(_) => panic!("expected ASCE 7 pack"),
        }
    }

    fn input() -> WindInput {
        WindInput::from_request(&sample_request())
    }

    #[test]
    fn test_scenario_a_velocity_pressure() {
        let p = pack(PackId::UsAsce7_16);
        let r = run(&p, &input()).unwrap();
        // 0.00256 * 0.85 * 1.0 * 0.85 * 1.0 * 115^2
        assert!((r.pressure_psf - 24.46).abs() < 0.1);
        assert_eq!(r.kz(), Some(0.85));
        match &r.coefficients {
            WindCoefficients::Asce7(c) => assert_eq!(c.importance_factor, 1.0),
            WindCoefficients::En1991(_) => panic!("wrong coefficients"),
        }
    }

    #[test]
    fn test_scenario_b_kz_increases_with_height() {
        let p = pack(PackId::UsAsce7_16);
        let mut i = input();
        i.height_ft = 50.0;
        let r = run(&p, &i).unwrap();
        assert!((r.kz().unwrap() - 1.09).abs() < 1e-9);
        assert!(r.pressure_psf > 24.46);
    }

    #[test]
    fn test_height_below_minimum_is_clipped() {
        let p = pack(PackId::UsAsce7_16);
        let mut low = input();
        low.height_ft = 10.0;
        let mut at_min = input();
        at_min.height_ft = 15.0;
        let a = run(&p, &low).unwrap();
        let b = run(&p, &at_min).unwrap();
        assert_eq!(a.kz(), b.kz());
        assert_eq!(a.pressure_psf, b.pressure_psf);
        assert!(a.assumptions.iter().any(|s| s.contains("raised to the 15 ft minimum")));
        // The arm is the real height, not the clipped one
        assert_eq!(a.arm_ft, 10.0);
    }

    #[test]
    fn test_interpolation_between_bands() {
        let p = pack(PackId::UsAsce7_16);
        let table = match &p.wind {
            WindData::Asce7(w) => &w.kz,
            WindData::En1991(_) => unreachable!(),
        };
        // C: 0.90 at 20 ft, 0.94 at 25 ft
        let kz = interpolate_kz(&p, table, ExposureCategory::C, 22.5).unwrap();
        assert!((kz - 0.92).abs() < 1e-9);
    }

    #[test]
    fn test_height_above_table_is_missing_data() {
        let p = pack(PackId::UsAsce7_16);
        let mut i = input();
        i.height_ft = 400.0;
        let err = run(&p, &i).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_PACK_DATA");
    }

    #[test]
    fn test_missing_exposure_column() {
        let mut p = (*pack(PackId::UsAsce7_16)).clone();
        if let WindData::Asce7(w) = &mut p.wind {
            w.kz.columns.remove(&ExposureCategory::D);
        }
        let mut i = input();
        i.exposure = ExposureCategory::D;
        let err = run(&p, &i).unwrap_err();
        assert_eq!(err, CalcError::missing_pack_data("us.asce7-16", "wind.kz.D"));
    }

    #[test]
    fn test_defaults_logged_and_overrides_win() {
        let p = pack(PackId::UsAsce7_16);
        let r = run(&p, &input()).unwrap();
        assert!(r
            .assumptions
            .contains(&"Kzt defaulted to 1.0: no topographic data supplied".to_string()));

        let mut i = input();
        i.overrides.kzt = Some(1.2);
        let r2 = run(&p, &i).unwrap();
        assert!(r2.assumptions.iter().all(|s| !s.starts_with("Kzt")));
        assert!((r2.pressure_psf / r.pressure_psf - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_default_wind_speed() {
        let p = pack(PackId::UsAsce7_16);
        let mut i = input();
        i.basic_wind_speed = None;
        let r = run(&p, &i).unwrap();
        assert!(r.assumptions[0].starts_with("Basic wind speed defaulted to 115.0 mph"));
    }

    #[test]
    fn test_elevation_ke_in_7_22() {
        let p = pack(PackId::UsAsce7_22);
        let mut i = input();
        i.elevation_ft = 5000.0;
        let r = run(&p, &i).unwrap();
        let ke = match &r.coefficients {
            WindCoefficients::Asce7(c) => c.ke,
            WindCoefficients::En1991(_) => unreachable!(),
        };
        assert!((ke - (-0.0000362f64 * 5000.0).exp()).abs() < 1e-12);
        assert!(ke < 1.0);
    }

    #[test]
    fn test_force_and_moment() {
        let p = pack(PackId::UsAsce7_16);
        let mut i = input();
        i.importance = ImportanceClass::III;
        let r = run(&p, &i).unwrap();
        let expected_f = r.pressure_psf * 0.85 * 1.2 * 1.15 * 60.0;
        assert!((r.force_lbf - expected_f).abs() < 1e-9);
        assert!((r.moment_ftlb - expected_f * 15.0).abs() < 1e-6);
    }
}
