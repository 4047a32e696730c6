//! Named historical materials from the Santarella handbooks.
//!
//! Concretes C150 … C400 carry their handbook admissible compression and
//! shear; the admissible simple compression is the lower of the handbook
//! value and the cement-type row. Steels are every [`SteelGrade`].
//!
//! The catalogue is built once on first use.

use once_cell::sync::Lazy;

use super::{CementType, Concrete, Material, Steel, SteelGrade};
use crate::equations::historical::concrete_elastic_modulus_kgf_cm2;
use crate::errors::{CalcError, CalcResult};
use crate::tables::concrete::admissible_concrete_stresses;
use crate::units::kgf_cm2_to_mpa;

/// (name, cement, water/cement ratio, resistance, admissible compression, admissible shear), kgf/cm²
const HISTORICAL_CONCRETES: [(&str, CementType, f64, f64, f64, f64); 6] = [
    ("C150", CementType::Normal, 1.10, 150.0, 15.0, 2.5),
    ("C200", CementType::Normal, 0.95, 200.0, 20.0, 3.0),
    ("C240", CementType::Normal, 0.80, 240.0, 24.0, 3.5),
    ("C280", CementType::Normal, 0.70, 280.0, 28.0, 4.0),
    ("C330", CementType::HighStrength, 0.60, 330.0, 33.0, 4.5),
    ("C400", CementType::HighStrength, 0.50, 400.0, 40.0, 5.0),
];

static CONCRETES: Lazy<Vec<Concrete>> = Lazy::new(|| {
    HISTORICAL_CONCRETES
        .iter()
        .map(|&(name, cement, wc, resistance, compression, shear)| {
            let row = admissible_concrete_stresses(cement);
            Concrete {
                class_id: name.to_string(),
                cement,
                resistance_mpa: kgf_cm2_to_mpa(resistance),
                simple_compression_mpa: kgf_cm2_to_mpa(compression.min(row.simple_compression_kgf_cm2)),
                flexural_compression_mpa: kgf_cm2_to_mpa(compression),
                shear_mpa: kgf_cm2_to_mpa(shear),
                tension_mpa: 0.0,
                elastic_modulus_mpa: kgf_cm2_to_mpa(concrete_elastic_modulus_kgf_cm2(resistance)),
                water_cement_ratio: Some(wc),
            }
        })
        .collect()
});

static STEELS: Lazy<Vec<Steel>> = Lazy::new(|| {
    SteelGrade::ALL
        .iter()
        .filter_map(|&grade| Steel::from_grade(grade).ok())
        .collect()
});

/// All catalogue concretes
pub fn concretes() -> &'static [Concrete] {
    &CONCRETES
}

/// All catalogue steels
pub fn steels() -> &'static [Steel] {
    &STEELS
}

/// Look up a catalogue material by name (case-insensitive).
///
/// Concretes are matched on their class id ("C280"), steels on their
/// designation or grade name ("FeB38k", "mild").
pub fn find(name: &str) -> CalcResult<Material> {
    let key = name.trim();
    if let Some(c) = CONCRETES.iter().find(|c| c.class_id.eq_ignore_ascii_case(key)) {
        return Ok(Material::Concrete(c.clone()));
    }
    if let Some(s) = STEELS.iter().find(|s| s.designation.eq_ignore_ascii_case(key)) {
        return Ok(Material::Steel(s.clone()));
    }
    match SteelGrade::from_str_flexible(key) {
        Ok(grade) => Ok(Material::Steel(Steel::from_grade(grade)?)),
        Err(_) => Err(CalcError::material_not_found(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_catalogue_is_valid() {
        assert_eq!(concretes().len(), 6);
        for c in concretes() {
            c.validate().unwrap();
        }
        assert_eq!(steels().len(), SteelGrade::ALL.len());
    }

    #[test]
    fn test_find_concrete() {
        match find("c280").unwrap() {
            Material::Concrete(c) => {
                assert_relative_eq!(c.resistance_kgf_cm2(), 280.0, epsilon = 1e-9);
                assert_eq!(c.cement, CementType::Normal);
            }
            other => panic!("expected concrete, got {other:?}"),
        }
    }

    #[test]
    fn test_find_steel() {
        assert!(matches!(find("FeB44k").unwrap(), Material::Steel(_)));
        assert!(matches!(find("semiduro").unwrap(), Material::Steel(_)));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(find("C999").unwrap_err().error_code(), "MATERIAL_NOT_FOUND");
    }
}
