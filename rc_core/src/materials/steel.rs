//! Reinforcing steel per RD 2229/1939.
//!
//! Two families of grades are supported:
//!
//! - the 1939 grades (mild, semi-hard, hard), with admissible stresses taken
//!   directly from the code (hard steel depends on the bar diameter);
//! - the later FeB grades, whose admissible stress is the yield stress divided
//!   by 2.3 (mild, FeB24k/FeB32k) or 2.5 (FeB38k/FeB44k).
//!
//! ## Example
//!
//! ```rust
//! use rc_core::materials::{Steel, SteelGrade};
//!
//! let steel = Steel::from_grade(SteelGrade::Mild).unwrap();
//! assert!((steel.admissible_tension_kgf_cm2() - 1400.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::historical::STEEL_ELASTIC_MODULUS_KGF_CM2;
use crate::errors::{CalcError, CalcResult};
use crate::units::{kgf_cm2_to_mpa, mpa_to_kgf_cm2};

/// Bars from this diameter up use the higher admissible stress of hard steel
pub const HARD_STEEL_LARGE_BAR_MM: f64 = 26.0;

/// Reinforcing steel grades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteelGrade {
    /// Acciaio dolce
    #[serde(rename = "mild")]
    Mild,
    /// Acciaio semiduro
    #[serde(rename = "semi_hard")]
    SemiHard,
    /// Acciaio duro
    #[serde(rename = "hard")]
    Hard,
    #[serde(rename = "FeB24k")]
    FeB24k,
    #[serde(rename = "FeB32k")]
    FeB32k,
    #[serde(rename = "FeB38k")]
    FeB38k,
    #[serde(rename = "FeB44k")]
    FeB44k,
}

impl SteelGrade {
    /// All grades for iteration
    pub const ALL: [SteelGrade; 7] = [
        SteelGrade::Mild,
        SteelGrade::SemiHard,
        SteelGrade::Hard,
        SteelGrade::FeB24k,
        SteelGrade::FeB32k,
        SteelGrade::FeB38k,
        SteelGrade::FeB44k,
    ];

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "mild" | "dolce" | "acciaio_dolce" => Ok(SteelGrade::Mild),
            "semi_hard" | "semihard" | "semiduro" => Ok(SteelGrade::SemiHard),
            "hard" | "duro" => Ok(SteelGrade::Hard),
            "feb24k" => Ok(SteelGrade::FeB24k),
            "feb32k" => Ok(SteelGrade::FeB32k),
            "feb38k" => Ok(SteelGrade::FeB38k),
            "feb44k" => Ok(SteelGrade::FeB44k),
            _ => Err(CalcError::material_not_found(format!("steel grade '{s}'"))),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SteelGrade::Mild => "Mild steel",
            SteelGrade::SemiHard => "Semi-hard steel",
            SteelGrade::Hard => "Hard steel",
            SteelGrade::FeB24k => "FeB24k",
            SteelGrade::FeB32k => "FeB32k",
            SteelGrade::FeB38k => "FeB38k",
            SteelGrade::FeB44k => "FeB44k",
        }
    }

    /// Yield stress (kgf/cm²)
    pub fn yield_kgf_cm2(&self) -> f64 {
        match self {
            SteelGrade::Mild => 2300.0,
            SteelGrade::SemiHard => 2700.0,
            SteelGrade::Hard => 3100.0,
            SteelGrade::FeB24k => mpa_to_kgf_cm2(235.0),
            SteelGrade::FeB32k => mpa_to_kgf_cm2(320.0),
            SteelGrade::FeB38k => mpa_to_kgf_cm2(375.0),
            SteelGrade::FeB44k => mpa_to_kgf_cm2(430.0),
        }
    }

    /// Admissible tensile stress (kgf/cm²) for bars of the given diameter
    pub fn admissible_kgf_cm2(&self, bar_diameter_mm: f64) -> f64 {
        match self {
            SteelGrade::Mild => 1400.0,
            SteelGrade::SemiHard => 1800.0,
            SteelGrade::Hard if bar_diameter_mm < HARD_STEEL_LARGE_BAR_MM => 1600.0,
            SteelGrade::Hard => 2000.0,
            SteelGrade::FeB24k | SteelGrade::FeB32k => self.yield_kgf_cm2() / 2.3,
            SteelGrade::FeB38k | SteelGrade::FeB44k => self.yield_kgf_cm2() / 2.5,
        }
    }

    /// Ribbed (improved bond) bars
    pub fn improved_bond(&self) -> bool {
        matches!(self, SteelGrade::FeB38k | SteelGrade::FeB44k)
    }
}

impl std::fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Reinforcing steel material. Stresses in MPa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Steel {
    /// Designation (grade name or user label)
    pub designation: String,

    /// Grade, when built from one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<SteelGrade>,

    /// Yield stress (MPa)
    pub yield_mpa: f64,

    /// Admissible tensile stress (MPa)
    pub admissible_tension_mpa: f64,

    /// Admissible compressive stress (MPa)
    pub admissible_compression_mpa: f64,

    /// Elastic modulus Es (MPa)
    pub elastic_modulus_mpa: f64,

    /// Ribbed bars with improved bond
    #[serde(default)]
    pub improved_bond: bool,
}

impl Steel {
    /// Build from a grade, using the admissible stress valid for every bar
    /// diameter (the small-bar value for hard steel).
    pub fn from_grade(grade: SteelGrade) -> CalcResult<Self> {
        Self::from_grade_for_bars(grade, 0.0)
    }

    /// Build from a grade for bars of the given maximum diameter.
    pub fn from_grade_for_bars(grade: SteelGrade, bar_diameter_mm: f64) -> CalcResult<Self> {
        let admissible = kgf_cm2_to_mpa(grade.admissible_kgf_cm2(bar_diameter_mm));
        Self::explicit(Steel {
            designation: grade.display_name().to_string(),
            grade: Some(grade),
            yield_mpa: kgf_cm2_to_mpa(grade.yield_kgf_cm2()),
            admissible_tension_mpa: admissible,
            admissible_compression_mpa: admissible,
            elastic_modulus_mpa: kgf_cm2_to_mpa(STEEL_ELASTIC_MODULUS_KGF_CM2),
            improved_bond: grade.improved_bond(),
        })
    }

    /// Build from explicit values, validating the invariants.
    pub fn explicit(steel: Steel) -> CalcResult<Self> {
        steel.validate()?;
        for note in steel.advisories() {
            log::warn!("steel {}: {}", steel.designation, note);
        }
        Ok(steel)
    }

    /// Validate: positive yield and modulus, admissibles in (0, yield].
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.yield_mpa > 0.0) {
            return Err(CalcError::invalid_input(
                "yield_mpa",
                self.yield_mpa.to_string(),
                "Yield stress must be positive",
            ));
        }
        if !(self.elastic_modulus_mpa > 0.0) {
            return Err(CalcError::invalid_input(
                "elastic_modulus_mpa",
                self.elastic_modulus_mpa.to_string(),
                "Elastic modulus must be positive",
            ));
        }
        for (field, value) in [
            ("admissible_tension_mpa", self.admissible_tension_mpa),
            ("admissible_compression_mpa", self.admissible_compression_mpa),
        ] {
            if !(value > 0.0) {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Admissible stress must be positive",
                ));
            }
            if value > self.yield_mpa {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    format!("Admissible stress exceeds the yield stress {:.1} MPa", self.yield_mpa),
                ));
            }
        }
        Ok(())
    }

    /// Parameters that are legal but unusual.
    pub fn advisories(&self) -> Vec<String> {
        let mut notes = Vec::new();
        let ratio = self.admissible_tension_mpa / self.yield_mpa;
        if !(0.35..=0.70).contains(&ratio) {
            notes.push(format!(
                "admissible stress is {:.0}% of yield (typical 40-70%)",
                ratio * 100.0
            ));
        }
        let es_kgf = mpa_to_kgf_cm2(self.elastic_modulus_mpa);
        if !(1_900_000.0..=2_200_000.0).contains(&es_kgf) {
            notes.push(format!("elastic modulus {es_kgf:.0} kgf/cm² outside 1.9e6-2.2e6"));
        }
        notes
    }

    /// Admissible tension in kgf/cm²
    pub fn admissible_tension_kgf_cm2(&self) -> f64 {
        mpa_to_kgf_cm2(self.admissible_tension_mpa)
    }

    /// Admissible bond stress (MPa) for a bar diameter.
    ///
    /// 1.5 MPa for improved bond, 0.5 MPa for smooth bars, reduced by 20/φ
    /// above φ 20 mm.
    pub fn admissible_bond_stress_mpa(&self, bar_diameter_mm: f64) -> f64 {
        let base = if self.improved_bond { 1.5 } else { 0.5 };
        if bar_diameter_mm > 20.0 {
            base * 20.0 / bar_diameter_mm
        } else {
            base
        }
    }

    /// Basic anchorage length (mm): max(σs·φ / (4·τb), 20·φ)
    pub fn anchorage_length_mm(&self, bar_diameter_mm: f64) -> f64 {
        let tau = self.admissible_bond_stress_mpa(bar_diameter_mm);
        let length = self.admissible_tension_mpa * bar_diameter_mm / (4.0 * tau);
        length.max(20.0 * bar_diameter_mm)
    }
}
