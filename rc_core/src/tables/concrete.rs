//! Concrete tables: RD 2229/1939 Table II and the admissible ("carichi di
//! sicurezza") stresses for each cement type.
//!
//! All values are in kgf/cm², as printed.

use serde::{Deserialize, Serialize};

use super::InterpolationTable;
use crate::errors::CalcResult;
use crate::materials::CementType;
use crate::units::kgf_cm2_to_mpa;

// =============================================================================
// TABLE II - WATER/CEMENT RATIO → 28-DAY CUBE RESISTANCE
// =============================================================================

/// Table II, normal Portland cement
pub const TABLE_II_NORMAL: InterpolationTable<1> = InterpolationTable {
    name: "Table II - normal cement",
    rows: &[
        (0.40, [380.0]),
        (0.45, [330.0]),
        (0.50, [280.0]),
        (0.55, [250.0]),
        (0.60, [225.0]),
        (0.70, [180.0]),
        (0.80, [140.0]),
    ],
};

/// Table II, high-resistance cement
pub const TABLE_II_HIGH_STRENGTH: InterpolationTable<1> = InterpolationTable {
    name: "Table II - high-resistance cement",
    rows: &[
        (0.40, [500.0]),
        (0.45, [400.0]),
        (0.50, [350.0]),
        (0.55, [290.0]),
        (0.60, [250.0]),
        (0.70, [200.0]),
        (0.80, [170.0]),
    ],
};

/// Table II, aluminous cement (only the three richest mixes are tabulated)
pub const TABLE_II_ALUMINOUS: InterpolationTable<1> = InterpolationTable {
    name: "Table II - aluminous cement",
    rows: &[(0.40, [400.0]), (0.45, [330.0]), (0.50, [280.0])],
};

/// Table II for a cement type
pub fn table_ii(cement: CementType) -> &'static InterpolationTable<1> {
    match cement {
        CementType::Normal => &TABLE_II_NORMAL,
        CementType::HighStrength => &TABLE_II_HIGH_STRENGTH,
        CementType::Aluminous => &TABLE_II_ALUMINOUS,
    }
}

/// 28-day cube resistance [kgf/cm²] for a cement type and water/cement ratio.
///
/// # Example
/// ```rust
/// use rc_core::materials::CementType;
/// use rc_core::tables::concrete_resistance_kgf_cm2;
///
/// let sigma = concrete_resistance_kgf_cm2(CementType::Normal, 0.65).unwrap();
/// assert!((sigma - 202.5).abs() < 1e-9);
/// ```
pub fn concrete_resistance_kgf_cm2(cement: CementType, water_cement_ratio: f64) -> CalcResult<f64> {
    Ok(table_ii(cement).lookup(water_cement_ratio)?[0])
}

// =============================================================================
// ADMISSIBLE CONCRETE STRESSES
// =============================================================================

/// One row of admissible concrete stresses [kgf/cm²].
///
/// Rows are selected by cement type; there is no interpolation between rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdmissibleConcreteStresses {
    /// Simply compressed members (axially loaded columns)
    pub simple_compression_kgf_cm2: f64,
    /// Members in bending or combined bending and compression
    pub flexural_compression_kgf_cm2: f64,
    /// Tangential (shear) stress carried by the concrete alone
    pub shear_kgf_cm2: f64,
}

impl AdmissibleConcreteStresses {
    pub fn simple_compression_mpa(&self) -> f64 {
        kgf_cm2_to_mpa(self.simple_compression_kgf_cm2)
    }

    pub fn flexural_compression_mpa(&self) -> f64 {
        kgf_cm2_to_mpa(self.flexural_compression_kgf_cm2)
    }

    pub fn shear_mpa(&self) -> f64 {
        kgf_cm2_to_mpa(self.shear_kgf_cm2)
    }
}

const ADMISSIBLE_NORMAL: AdmissibleConcreteStresses = AdmissibleConcreteStresses {
    simple_compression_kgf_cm2: 35.0,
    flexural_compression_kgf_cm2: 40.0,
    shear_kgf_cm2: 4.0,
};

const ADMISSIBLE_HIGH_STRENGTH: AdmissibleConcreteStresses = AdmissibleConcreteStresses {
    simple_compression_kgf_cm2: 45.0,
    flexural_compression_kgf_cm2: 50.0,
    shear_kgf_cm2: 6.0,
};

// Aluminous cement shares the normal compression limits with the higher shear value.
const ADMISSIBLE_ALUMINOUS: AdmissibleConcreteStresses = AdmissibleConcreteStresses {
    simple_compression_kgf_cm2: 35.0,
    flexural_compression_kgf_cm2: 40.0,
    shear_kgf_cm2: 6.0,
};

/// Admissible concrete stresses for a cement type
pub fn admissible_concrete_stresses(cement: CementType) -> AdmissibleConcreteStresses {
    match cement {
        CementType::Normal => ADMISSIBLE_NORMAL,
        CementType::HighStrength => ADMISSIBLE_HIGH_STRENGTH,
        CementType::Aluminous => ADMISSIBLE_ALUMINOUS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tabulated_values() {
        assert_eq!(concrete_resistance_kgf_cm2(CementType::Normal, 0.50).unwrap(), 280.0);
        assert_eq!(concrete_resistance_kgf_cm2(CementType::HighStrength, 0.40).unwrap(), 500.0);
        assert_eq!(concrete_resistance_kgf_cm2(CementType::Aluminous, 0.45).unwrap(), 330.0);
    }

    #[test]
    fn test_interpolated_value() {
        // halfway between 0.60 (225) and 0.70 (180)
        assert_relative_eq!(
            concrete_resistance_kgf_cm2(CementType::Normal, 0.65).unwrap(),
            202.5,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_resistance_decreases_with_water() {
        for cement in CementType::ALL {
            let (lo, hi) = table_ii(cement).range();
            let mut prev = f64::INFINITY;
            let steps = 40;
            for i in 0..=steps {
                let wc = lo + (hi - lo) * i as f64 / steps as f64;
                let sigma = concrete_resistance_kgf_cm2(cement, wc).unwrap();
                assert!(sigma <= prev, "{cement}: {sigma} > {prev} at w/c {wc}");
                prev = sigma;
            }
        }
    }

    #[test]
    fn test_aluminous_range_is_shorter() {
        let err = concrete_resistance_kgf_cm2(CementType::Aluminous, 0.60).unwrap_err();
        assert_eq!(err.error_code(), "OUT_OF_TABLE_RANGE");
        assert!(concrete_resistance_kgf_cm2(CementType::Normal, 0.85).is_err());
        assert!(concrete_resistance_kgf_cm2(CementType::Normal, 0.35).is_err());
    }

    #[test]
    fn test_admissible_rows() {
        let normal = admissible_concrete_stresses(CementType::Normal);
        assert_eq!(normal.flexural_compression_kgf_cm2, 40.0);
        assert_eq!(normal.shear_kgf_cm2, 4.0);
        let high = admissible_concrete_stresses(CementType::HighStrength);
        assert_eq!(high.simple_compression_kgf_cm2, 45.0);
        assert_relative_eq!(high.flexural_compression_mpa(), 50.0 / 10.197);
    }
}
