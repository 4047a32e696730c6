//! RD 2229/1939 Table III: cement and sand quantities for one cubic metre of
//! mortar, keyed by the volumetric cement:sand ratio (1:1 … 1:3.70).

use serde::{Deserialize, Serialize};

use super::InterpolationTable;
use crate::errors::{CalcError, CalcResult};

/// Columns: cement kg/m³, sand kg/m³, apparent density kg/m³
pub const TABLE_III_MORTAR: InterpolationTable<3> = InterpolationTable {
    name: "Table III - mortar",
    rows: &[
        (1.00, [1050.0, 900.0, 1100.0]),
        (1.40, [800.0, 1080.0, 1080.0]),
        (1.85, [715.0, 1215.0, 1080.0]),
        (2.30, [685.0, 1405.0, 1080.0]),
        (2.70, [625.0, 1520.0, 1100.0]),
        (3.70, [385.0, 1530.0, 1070.0]),
    ],
};

/// Mortar quantities for a mix (per m³, or for the requested volume)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortarMix {
    /// Sand parts per part of cement (the "x" in 1:x)
    pub sand_ratio: f64,
    /// Cement [kg]
    pub cement_kg: f64,
    /// Sand [kg]
    pub sand_kg: f64,
    /// Apparent density of the fresh mortar [kg/m³]
    pub apparent_density_kg_m3: f64,
}

/// Quantities for one cubic metre of 1:`sand_ratio` mortar.
pub fn mortar_mix(sand_ratio: f64) -> CalcResult<MortarMix> {
    let [cement_kg, sand_kg, apparent_density_kg_m3] = TABLE_III_MORTAR.lookup(sand_ratio)?;
    Ok(MortarMix {
        sand_ratio,
        cement_kg,
        sand_kg,
        apparent_density_kg_m3,
    })
}

/// Quantities for `volume_m3` cubic metres of mortar.
///
/// The apparent density is an intensive property and is not scaled.
pub fn mortar_for_volume(sand_ratio: f64, volume_m3: f64) -> CalcResult<MortarMix> {
    if !(volume_m3 > 0.0) || !volume_m3.is_finite() {
        return Err(CalcError::invalid_input(
            "volume_m3",
            volume_m3.to_string(),
            "Mortar volume must be positive",
        ));
    }
    let per_m3 = mortar_mix(sand_ratio)?;
    Ok(MortarMix {
        cement_kg: per_m3.cement_kg * volume_m3,
        sand_kg: per_m3.sand_kg * volume_m3,
        ..per_m3
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tabulated_row() {
        let mix = mortar_mix(2.70).unwrap();
        assert_eq!(mix.cement_kg, 625.0);
        assert_eq!(mix.sand_kg, 1520.0);
        assert_eq!(mix.apparent_density_kg_m3, 1100.0);
    }

    #[test]
    fn test_one_to_two_between_neighbours() {
        // 2.00 lies a third of the way from 1.85 to 2.30
        let mix = mortar_mix(2.00).unwrap();
        assert_relative_eq!(mix.cement_kg, 715.0 + (685.0 - 715.0) / 3.0, epsilon = 1e-9);
        assert_relative_eq!(mix.sand_kg, 1215.0 + (1405.0 - 1215.0) / 3.0, epsilon = 1e-9);
        assert_relative_eq!(mix.apparent_density_kg_m3, 1080.0, epsilon = 1e-9);
    }

    #[test]
    fn test_volume_scaling() {
        let mix = mortar_for_volume(1.0, 0.5).unwrap();
        assert_relative_eq!(mix.cement_kg, 525.0);
        assert_relative_eq!(mix.sand_kg, 450.0);
        assert_relative_eq!(mix.apparent_density_kg_m3, 1100.0);
        assert!(mortar_for_volume(1.0, 0.0).is_err());
    }

    #[test]
    fn test_lean_mix_out_of_range() {
        assert_eq!(mortar_mix(4.0).unwrap_err().error_code(), "OUT_OF_TABLE_RANGE");
    }
}
