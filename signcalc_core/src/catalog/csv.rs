//! Catalog import from AISC Shapes Database CSV exports
//!
//! The CSV should be exported from the AISC Shapes Database Excel file. Only
//! the columns the member checks need are read: `Type`, `AISC_Manual_Label`,
//! `W`, `A`, `Ix`, `Sx` and a depth column (`d`, `Ht` or `OD`). An optional
//! `Grade` column overrides the family default grade.

use std::path::Path;
use std::str::FromStr;

use crate::errors::{CalcError, CalcResult};
use crate::standards::MaterialGrade;

use super::{Catalog, CatalogSection, SupportFamily};

/// Load one family's catalog from a CSV file.
///
/// Rows of other shape types are skipped, so the full AISC export can be used
/// directly for every family.
pub fn load_catalog_csv(path: &Path, family: SupportFamily) -> CalcResult<Catalog> {
    let display = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|e| {
        CalcError::catalog_load("open", &display, format!("Failed to open CSV: {}", e))
    })?;
    parse_catalog_csv(&text, &display, family)
}

/// Parse catalog CSV text; `origin` names the source in errors and in the catalog.
pub fn parse_catalog_csv(text: &str, origin: &str, family: SupportFamily) -> CalcResult<Catalog> {
    let mut lines = text.lines();

    let header_line = lines
        .next()
        .ok_or_else(|| CalcError::catalog_load("read", origin, "CSV file is empty"))?;
    let headers: Vec<&str> = header_line.split(',').map(str::trim).collect();
    let col_index =
        |name: &str| -> Option<usize> { headers.iter().position(|h| *h == name) };
    let required = |name: &str| -> CalcResult<usize> {
        col_index(name).ok_or_else(|| {
            CalcError::catalog_load("parse", origin, format!("Missing '{}' column", name))
        })
    };

    let type_idx = required("Type")?;
    let label_idx = required("AISC_Manual_Label")?;
    let w_idx = required("W")?;
    let a_idx = required("A")?;
    let ix_idx = required("Ix")?;
    let sx_idx = required("Sx")?;
    let d_idx = col_index("d");
    let ht_idx = col_index("Ht");
    let od_idx = col_index("OD");
    let grade_idx = col_index("Grade");

    let mut sections = Vec::new();
    let mut line_num = 1;

    for line in lines {
        line_num += 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        let field = |idx: Option<usize>| idx.and_then(|i| fields.get(i)).copied();

        let label = field(Some(label_idx)).unwrap_or("").trim();
        if label.is_empty() {
            continue; // Skip rows without a label
        }

        let od = field(od_idx).and_then(parse_optional_f64);
        let row_family = match field(Some(type_idx)).unwrap_or("").trim().to_uppercase().as_str() {
            "PIPE" => Some(SupportFamily::Pipe),
            "W" => Some(SupportFamily::WideFlange),
            // Round HSS carry an OD; only square tubes belong to the tube family
            "HSS" if od.is_none() => Some(SupportFamily::Tube),
            _ => None,
        };
        if row_family != Some(family) {
            continue;
        }

        let number = |idx: usize, name: &str| -> CalcResult<f64> {
            field(Some(idx)).and_then(parse_optional_f64).ok_or_else(|| {
                CalcError::catalog_load(
                    "parse",
                    origin,
                    format!("Line {}: '{}' has no numeric {}", line_num, label, name),
                )
            })
        };

        let depth_in = field(d_idx)
            .and_then(parse_optional_f64)
            .or_else(|| field(ht_idx).and_then(parse_optional_f64))
            .or(od)
            .ok_or_else(|| {
                CalcError::catalog_load(
                    "parse",
                    origin,
                    format!("Line {}: '{}' has no depth (d, Ht or OD)", line_num, label),
                )
            })?;

        let grade = match field(grade_idx).map(str::trim).filter(|g| !g.is_empty()) {
            Some(g) => MaterialGrade::from_str(g).map_err(|e| {
                CalcError::catalog_load("parse", origin, format!("Line {}: {}", line_num, e))
            })?,
            None => family.default_grade(),
        };

        sections.push(CatalogSection {
            family,
            designation: label.to_string(),
            weight_plf: number(w_idx, "W")?,
            area_in2: number(a_idx, "A")?,
            ix_in4: number(ix_idx, "Ix")?,
            sx_in3: number(sx_idx, "Sx")?,
            depth_in,
            grade,
        });
    }

    if sections.is_empty() {
        return Err(CalcError::catalog_load(
            "parse",
            origin,
            format!("No {} rows found", family.as_str()),
        ));
    }

    Catalog::new(family, sections, origin)
}

/// Parse an optional f64 from a CSV field
///
/// Returns None for empty strings, dashes, or invalid numbers.
fn parse_optional_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "—" {
        return None;
    }
    f64::from_str(trimmed).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Type,AISC_Manual_Label,W,A,d,Ht,OD,Ix,Sx,Grade
W,W8X31,31,9.12,8.0,-,-,110,27.5,
W,W8X18,18,5.26,8.14,-,-,61.9,15.2,
HSS,HSS6X6X1/4,19.02,5.24,-,6,-,28.6,9.54,A500 Gr C
HSS,HSS6.625X0.280,19.0,5.20,-,-,6.625,26.5,8.0,
PIPE,Pipe6STD,19.0,5.20,-,-,6.625,26.5,8.00,A53 Gr B
";

    #[test]
    fn test_parse_family_rows_sorted() {
        let catalog = parse_catalog_csv(SAMPLE, "sample.csv", SupportFamily::WideFlange).unwrap();
        let names: Vec<&str> = catalog.sections().iter().map(|s| s.designation.as_str()).collect();
        assert_eq!(names, vec!["W8X18", "W8X31"]);
        assert_eq!(catalog.sections()[0].grade, MaterialGrade::A992);
        assert_eq!(catalog.source, "sample.csv");
    }

    #[test]
    fn test_round_hss_excluded_from_tubes() {
        let catalog = parse_catalog_csv(SAMPLE, "sample.csv", SupportFamily::Tube).unwrap();
        assert_eq!(catalog.len(), 1);
        let tube = &catalog.sections()[0];
        assert_eq!(tube.designation, "HSS6X6X1/4");
        assert_eq!(tube.depth_in, 6.0);
        assert_eq!(tube.grade, MaterialGrade::A500C);
    }

    #[test]
    fn test_pipe_depth_from_od() {
        let catalog = parse_catalog_csv(SAMPLE, "sample.csv", SupportFamily::Pipe).unwrap();
        assert!((catalog.sections()[0].depth_in - 6.625).abs() < 1e-9);
    }

    #[test]
    fn test_missing_column() {
        let err = parse_catalog_csv("Type,AISC_Manual_Label,W\n", "bad.csv", SupportFamily::Pipe)
            .unwrap_err();
        assert_eq!(err.error_code(), "CATALOG_LOAD");
        assert!(err.to_string().contains("Missing 'A' column"));
    }

    #[test]
    fn test_non_numeric_property() {
        let text = "Type,AISC_Manual_Label,W,A,d,Ix,Sx\nW,W8X18,18,5.26,8.14,-,15.2\n";
        let err = parse_catalog_csv(text, "bad.csv", SupportFamily::WideFlange).unwrap_err();
        assert!(err.to_string().contains("no numeric Ix"));
    }

    #[test]
    fn test_no_rows_for_family() {
        let text = "Type,AISC_Manual_Label,W,A,d,Ix,Sx\nW,W8X18,18,5.26,8.14,61.9,15.2\n";
        let err = parse_catalog_csv(text, "w-only.csv", SupportFamily::Pipe).unwrap_err();
        assert_eq!(err.error_code(), "CATALOG_LOAD");
    }

    #[test]
    fn test_parse_optional_f64() {
        assert_eq!(parse_optional_f64("123.45"), Some(123.45));
        assert_eq!(parse_optional_f64("  456  "), Some(456.0));
        assert_eq!(parse_optional_f64(""), None);
        assert_eq!(parse_optional_f64("-"), None);
        assert_eq!(parse_optional_f64("not a number"), None);
    }
}
