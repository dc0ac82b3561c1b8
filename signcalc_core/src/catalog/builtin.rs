//! Built-in section tables (for use without a CSV file)
//!
//! A representative subset of the AISC Shapes Database v16.0 covering the
//! sizes commonly used for single-pole sign supports.

use super::{Catalog, CatalogSection, SupportFamily};

/// (label, W plf, A in², Ix in⁴, Sx in³, depth or OD in)
type Row = (&'static str, f64, f64, f64, f64, f64);

/// Standard (STD) and extra strong (XS) pipe, ASTM A53 Gr. B
const PIPE_ROWS: &[Row] = &[
    ("Pipe2STD", 3.65, 1.02, 0.627, 0.528, 2.375),
    ("Pipe2-1/2STD", 5.79, 1.61, 1.45, 1.01, 2.875),
    ("Pipe3STD", 7.58, 2.07, 2.85, 1.63, 3.5),
    ("Pipe3-1/2STD", 9.11, 2.50, 4.52, 2.26, 4.0),
    ("Pipe4STD", 10.8, 2.96, 6.82, 3.03, 4.5),
    ("Pipe5STD", 14.6, 4.01, 14.3, 5.14, 5.563),
    ("Pipe4XS", 15.0, 4.14, 9.12, 4.05, 4.5),
    ("Pipe6STD", 19.0, 5.20, 26.5, 8.00, 6.625),
    ("Pipe5XS", 20.8, 5.73, 19.5, 7.02, 5.563),
    ("Pipe8STD", 28.6, 7.85, 68.1, 15.8, 8.625),
    ("Pipe6XS", 28.6, 7.83, 38.3, 11.6, 6.625),
    ("Pipe10STD", 40.5, 11.1, 151.0, 28.1, 10.75),
    ("Pipe8XS", 43.4, 11.9, 100.0, 23.1, 8.625),
    ("Pipe12STD", 49.6, 13.7, 262.0, 41.0, 12.75),
    ("Pipe10XS", 54.8, 15.0, 199.0, 37.0, 10.75),
    ("Pipe12XS", 65.5, 17.9, 339.0, 53.2, 12.75),
];

/// Common W-shapes (AISC Manual 16th Ed), ASTM A992
const W_ROWS: &[Row] = &[
    ("W6X9", 9.0, 2.68, 16.4, 5.56, 5.9),
    ("W6X15", 15.0, 4.43, 29.1, 9.72, 5.99),
    ("W8X18", 18.0, 5.26, 61.9, 15.2, 8.14),
    ("W8X24", 24.0, 7.08, 82.7, 20.9, 7.93),
    ("W8X31", 31.0, 9.12, 110.0, 27.5, 8.0),
    ("W10X22", 22.0, 6.49, 118.0, 23.2, 10.2),
    ("W10X33", 33.0, 9.71, 170.0, 35.0, 9.73),
    ("W10X49", 49.0, 14.4, 272.0, 54.6, 10.0),
    ("W12X19", 19.0, 5.57, 130.0, 21.3, 12.2),
    ("W12X26", 26.0, 7.65, 204.0, 33.4, 12.2),
    ("W12X40", 40.0, 11.7, 307.0, 51.5, 11.9),
    ("W12X58", 58.0, 17.0, 475.0, 78.0, 12.2),
    ("W14X22", 22.0, 6.49, 199.0, 29.0, 13.7),
    ("W14X30", 30.0, 8.85, 291.0, 42.0, 13.8),
    ("W14X48", 48.0, 14.1, 485.0, 70.2, 13.8),
    ("W14X90", 90.0, 26.5, 999.0, 143.0, 14.0),
    ("W16X26", 26.0, 7.68, 301.0, 38.4, 15.7),
    ("W16X36", 36.0, 10.6, 448.0, 56.5, 15.9),
    ("W18X35", 35.0, 10.3, 510.0, 57.6, 17.7),
    ("W18X50", 50.0, 14.7, 800.0, 88.9, 18.0),
    ("W21X44", 44.0, 13.0, 843.0, 81.6, 20.7),
    ("W21X62", 62.0, 18.3, 1330.0, 127.0, 21.0),
    ("W24X55", 55.0, 16.2, 1350.0, 114.0, 23.6),
    ("W24X76", 76.0, 22.4, 2100.0, 176.0, 23.9),
    ("W24X94", 94.0, 27.7, 2700.0, 222.0, 24.3),
];

/// Square HSS, ASTM A500 Gr. C
const TUBE_ROWS: &[Row] = &[
    ("HSS3X3X1/4", 8.81, 2.44, 3.02, 2.01, 3.0),
    ("HSS4X4X1/4", 12.21, 3.37, 7.80, 3.90, 4.0),
    ("HSS5X5X1/4", 15.62, 4.30, 16.0, 6.41, 5.0),
    ("HSS4X4X3/8", 17.27, 4.78, 10.3, 5.13, 4.0),
    ("HSS6X6X1/4", 19.02, 5.24, 28.6, 9.54, 6.0),
    ("HSS5X5X3/8", 22.37, 6.18, 21.7, 8.68, 5.0),
    ("HSS8X8X1/4", 25.82, 7.10, 70.7, 17.7, 8.0),
    ("HSS6X6X3/8", 27.48, 7.58, 39.5, 13.2, 6.0),
    ("HSS8X8X3/8", 37.69, 10.4, 100.0, 25.1, 8.0),
    ("HSS10X10X3/8", 47.90, 13.2, 202.0, 40.4, 10.0),
    ("HSS8X8X1/2", 48.85, 13.5, 125.0, 31.2, 8.0),
    ("HSS12X12X3/8", 58.10, 16.0, 357.0, 59.5, 12.0),
    ("HSS10X10X1/2", 62.46, 17.2, 256.0, 51.2, 10.0),
    ("HSS12X12X1/2", 76.07, 21.0, 457.0, 76.2, 12.0),
    ("HSS14X14X1/2", 89.68, 24.6, 736.0, 105.0, 14.0),
    ("HSS16X16X1/2", 103.3, 28.3, 1120.0, 140.0, 16.0),
];

/// Sections for a family from the built-in tables, in table order
pub fn builtin_sections(family: SupportFamily) -> Vec<CatalogSection> {
    let rows = match family {
        SupportFamily::Pipe => PIPE_ROWS,
        SupportFamily::WideFlange => W_ROWS,
        SupportFamily::Tube => TUBE_ROWS,
    };
    rows.iter()
        .map(|&(label, w, a, ix, sx, depth)| CatalogSection {
            family,
            designation: label.to_string(),
            weight_plf: w,
            area_in2: a,
            ix_in4: ix,
            sx_in3: sx,
            depth_in: depth,
            grade: family.default_grade(),
        })
        .collect()
}

/// Built-in catalog for a family, sorted into catalog order
pub fn builtin_catalog(family: SupportFamily) -> Catalog {
    let mut sections = builtin_sections(family);
    sections.sort_by(CatalogSection::catalog_order);
    Catalog {
        family,
        sections,
        source: "builtin".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_pass_validation() {
        for family in SupportFamily::ALL {
            let sections = builtin_sections(family);
            let catalog = Catalog::new(family, sections, "builtin").unwrap();
            assert_eq!(catalog, builtin_catalog(family));
        }
    }

    #[test]
    fn test_w_table_sorted_by_weight_not_label() {
        let catalog = builtin_catalog(SupportFamily::WideFlange);
        let first: Vec<&str> = catalog.sections()[..4]
            .iter()
            .map(|s| s.designation.as_str())
            .collect();
        assert_eq!(first, vec!["W6X9", "W6X15", "W8X18", "W12X19"]);
    }

    #[test]
    fn test_grades_by_family() {
        use crate::standards::MaterialGrade;
        let pipes = builtin_sections(SupportFamily::Pipe);
        assert!(pipes.iter().all(|s| s.grade == MaterialGrade::A53B));
        let tubes = builtin_sections(SupportFamily::Tube);
        assert!(tubes.iter().all(|s| s.grade == MaterialGrade::A500C));
    }
}
