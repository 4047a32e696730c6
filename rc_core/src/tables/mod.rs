//! # Historical Data Tables
//!
//! Tabulated data from RD 2229/1939 and the Santarella handbooks, with the
//! single lookup rule every table in this module follows:
//!
//! - an exact match of the independent variable returns the tabulated row;
//! - a value strictly between two rows is interpolated linearly, column by column;
//! - a value outside the tabulated range is an [`CalcError::OutOfTableRange`]
//!   error. Nothing is ever extrapolated.
//!
//! ## Modules
//!
//! - [`concrete`] - Table II (water/cement ratio → cube resistance) and admissible stresses
//! - [`mortar`] - Table III (cement:sand ratio → quantities per m³)
//!
//! ## Example
//!
//! ```rust
//! use rc_core::tables::mortar::mortar_mix;
//!
//! let mix = mortar_mix(2.0).unwrap();
//! assert!((mix.cement_kg - 705.0).abs() < 1e-9);
//! ```

pub mod concrete;
pub mod mortar;

pub use concrete::{
    admissible_concrete_stresses, concrete_resistance_kgf_cm2, AdmissibleConcreteStresses,
};
pub use mortar::{mortar_for_volume, mortar_mix, MortarMix};

use crate::errors::{CalcError, CalcResult};

/// Two tabulated abscissae closer than this are treated as the same row
const EXACT_MATCH_TOLERANCE: f64 = 1e-9;

/// A static lookup table with `C` dependent columns.
///
/// Rows must be sorted by strictly increasing independent value.
#[derive(Debug, Clone, Copy)]
pub struct InterpolationTable<const C: usize> {
    /// Name used in error messages (e.g. "Table II - normal cement")
    pub name: &'static str,
    /// `(independent value, dependent columns)` rows
    pub rows: &'static [(f64, [f64; C])],
}

impl<const C: usize> InterpolationTable<C> {
    /// Smallest and largest tabulated independent values
    pub fn range(&self) -> (f64, f64) {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => (first.0, last.0),
            _ => (f64::NAN, f64::NAN),
        }
    }

    /// Look up `x`, interpolating linearly between bracketing rows.
    pub fn lookup(&self, x: f64) -> CalcResult<[f64; C]> {
        if !x.is_finite() {
            return Err(CalcError::invalid_input(
                self.name,
                x.to_string(),
                "Lookup value must be finite",
            ));
        }
        let (min, max) = self.range();
        if self.rows.is_empty() || x < min - EXACT_MATCH_TOLERANCE || x > max + EXACT_MATCH_TOLERANCE {
            return Err(CalcError::out_of_range(self.name, x, min, max));
        }

        if let Some((_, row)) = self
            .rows
            .iter()
            .find(|(key, _)| (key - x).abs() <= EXACT_MATCH_TOLERANCE)
        {
            return Ok(*row);
        }

        for pair in self.rows.windows(2) {
            let (x0, lo) = pair[0];
            let (x1, hi) = pair[1];
            if x > x0 && x < x1 {
                let t = (x - x0) / (x1 - x0);
                let mut out = [0.0; C];
                for (i, value) in out.iter_mut().enumerate() {
                    *value = lo[i] + t * (hi[i] - lo[i]);
                }
                return Ok(out);
            }
        }

        Err(CalcError::out_of_range(self.name, x, min, max))
    }
}

// =============================================================================
// COLUMN MINIMUM LONGITUDINAL REINFORCEMENT
// =============================================================================

/// Minimum longitudinal steel ratio for columns, keyed by concrete area in cm².
///
/// Not less than 0.8 % below 2000 cm², 0.5 % above 8000 cm², linear between.
pub const COLUMN_MIN_STEEL_RATIO: InterpolationTable<1> = InterpolationTable {
    name: "column minimum steel ratio",
    rows: &[(2000.0, [0.008]), (8000.0, [0.005])],
};

/// Minimum longitudinal steel ratio for a column of the given concrete area.
///
/// Areas outside the tabulated span take the end values, as the rule itself
/// states them as bounds ("below 2000 cm²", "above 8000 cm²").
pub fn column_min_steel_ratio(concrete_area_mm2: f64) -> CalcResult<f64> {
    if !(concrete_area_mm2 > 0.0) {
        return Err(CalcError::invalid_input(
            "concrete_area_mm2",
            concrete_area_mm2.to_string(),
            "Concrete area must be positive",
        ));
    }
    let area_cm2 = concrete_area_mm2 / 100.0;
    let (min, max) = COLUMN_MIN_STEEL_RATIO.range();
    let clamped = area_cm2.clamp(min, max);
    Ok(COLUMN_MIN_STEEL_RATIO.lookup(clamped)?[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TWO_COLUMN: InterpolationTable<2> = InterpolationTable {
        name: "test",
        rows: &[(1.0, [10.0, 100.0]), (2.0, [20.0, 50.0]), (4.0, [40.0, 0.0])],
    };

    #[test]
    fn test_exact_row_returned() {
        assert_eq!(TWO_COLUMN.lookup(2.0).unwrap(), [20.0, 50.0]);
        assert_eq!(TWO_COLUMN.lookup(4.0).unwrap(), [40.0, 0.0]);
    }

    #[test]
    fn test_linear_interpolation_per_column() {
        let row = TWO_COLUMN.lookup(3.0).unwrap();
        assert_relative_eq!(row[0], 30.0);
        assert_relative_eq!(row[1], 25.0);
    }

    #[test]
    fn test_out_of_range_is_error() {
        let err = TWO_COLUMN.lookup(4.5).unwrap_err();
        assert_eq!(err.error_code(), "OUT_OF_TABLE_RANGE");
        assert!(TWO_COLUMN.lookup(0.99).is_err());
    }

    #[test]
    fn test_nan_is_invalid_input() {
        let err = TWO_COLUMN.lookup(f64::NAN).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_column_min_ratio() {
        // 30x30 cm = 900 cm²
        assert_relative_eq!(column_min_steel_ratio(90_000.0).unwrap(), 0.008);
        // 5000 cm² is halfway
        assert_relative_eq!(column_min_steel_ratio(500_000.0).unwrap(), 0.0065, epsilon = 1e-12);
        assert_relative_eq!(column_min_steel_ratio(1_000_000.0).unwrap(), 0.005);
        assert!(column_min_steel_ratio(0.0).is_err());
    }
}
