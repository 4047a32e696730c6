//! Concrete (calcestruzzo) per RD 2229/1939.
//!
//! A [`Concrete`] is an immutable value: strength class, tabulated
//! resistance, the four admissible stresses and the elastic modulus. It can
//! be given explicitly or derived from Table II (cement type + water/cement
//! ratio) through the code formula Ec = 550000·σr/(σr+200).
//!
//! All stresses are stored in MPa.

use serde::{Deserialize, Serialize};

use crate::equations::historical::{concrete_elastic_modulus_kgf_cm2, STEEL_ELASTIC_MODULUS_KGF_CM2};
use crate::errors::{CalcError, CalcResult};
use crate::tables::concrete::{admissible_concrete_stresses, concrete_resistance_kgf_cm2};
use crate::units::{kgf_cm2_to_mpa, mpa_to_kgf_cm2};

/// Cement families of Table II
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CementType {
    /// Normal Portland cement
    #[default]
    Normal,
    /// High-resistance ("alta resistenza") cement
    HighStrength,
    /// Aluminous cement
    Aluminous,
}

impl CementType {
    /// All cement types for iteration
    pub const ALL: [CementType; 3] = [
        CementType::Normal,
        CementType::HighStrength,
        CementType::Aluminous,
    ];

    /// Parse from common string representations (English or Italian)
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "normal" | "normale" | "portland" => Ok(CementType::Normal),
            "high_strength" | "high_resistance" | "alta_resistenza" => Ok(CementType::HighStrength),
            "aluminous" | "alluminoso" => Ok(CementType::Aluminous),
            _ => Err(CalcError::material_not_found(format!("cement type '{s}'"))),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            CementType::Normal => "Normal cement",
            CementType::HighStrength => "High-resistance cement",
            CementType::Aluminous => "Aluminous cement",
        }
    }

    /// Conventional modular ratio used in period hand calculations
    pub fn conventional_modular_ratio(&self) -> f64 {
        match self {
            CementType::Normal => 10.0,
            CementType::HighStrength => 8.0,
            CementType::Aluminous => 6.0,
        }
    }
}

impl std::fmt::Display for CementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Concrete material.
///
/// ## JSON Example
///
/// ```json
/// {
///   "class_id": "RD2229 normal w/c 0.50",
///   "cement": "normal",
///   "resistance_mpa": 27.46,
///   "simple_compression_mpa": 3.43,
///   "flexural_compression_mpa": 3.92,
///   "shear_mpa": 0.39,
///   "tension_mpa": 0.0,
///   "elastic_modulus_mpa": 31467.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concrete {
    /// Strength class identifier
    pub class_id: String,

    /// Cement family
    #[serde(default)]
    pub cement: CementType,

    /// Tabulated 28-day cube resistance σr (MPa)
    pub resistance_mpa: f64,

    /// Admissible stress for simply compressed members (MPa)
    pub simple_compression_mpa: f64,

    /// Admissible stress for bending and combined bending (MPa)
    pub flexural_compression_mpa: f64,

    /// Admissible shear stress carried by concrete (MPa)
    pub shear_mpa: f64,

    /// Admissible tension (MPa); zero in the cracked-section model
    #[serde(default)]
    pub tension_mpa: f64,

    /// Elastic modulus Ec (MPa)
    pub elastic_modulus_mpa: f64,

    /// Water/cement ratio the material was derived from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_cement_ratio: Option<f64>,
}

impl Concrete {
    /// Build from Table II: cement type and water/cement ratio.
    ///
    /// # Example
    /// ```rust
    /// use rc_core::materials::{CementType, Concrete};
    ///
    /// let c = Concrete::from_table(CementType::Normal, 0.50).unwrap();
    /// assert!((c.resistance_kgf_cm2() - 280.0).abs() < 1e-9);
    /// ```
    pub fn from_table(cement: CementType, water_cement_ratio: f64) -> CalcResult<Self> {
        let resistance = concrete_resistance_kgf_cm2(cement, water_cement_ratio)?;
        let mut concrete = Self::from_resistance(cement, resistance)?;
        concrete.class_id = format!("RD2229 {} w/c {:.2}", cement_key(cement), water_cement_ratio);
        concrete.water_cement_ratio = Some(water_cement_ratio);
        Ok(concrete)
    }

    /// Build from a known cube resistance [kgf/cm²] and cement type.
    ///
    /// Admissible stresses come from the cement-type row, Ec from the code formula.
    pub fn from_resistance(cement: CementType, resistance_kgf_cm2: f64) -> CalcResult<Self> {
        if !(resistance_kgf_cm2 > 0.0) || !resistance_kgf_cm2.is_finite() {
            return Err(CalcError::invalid_input(
                "resistance_kgf_cm2",
                resistance_kgf_cm2.to_string(),
                "Resistance must be positive",
            ));
        }
        let admissible = admissible_concrete_stresses(cement);
        let concrete = Concrete {
            class_id: format!("R{:.0} {}", resistance_kgf_cm2, cement_key(cement)),
            cement,
            resistance_mpa: kgf_cm2_to_mpa(resistance_kgf_cm2),
            simple_compression_mpa: admissible.simple_compression_mpa(),
            flexural_compression_mpa: admissible.flexural_compression_mpa(),
            shear_mpa: admissible.shear_mpa(),
            tension_mpa: 0.0,
            elastic_modulus_mpa: kgf_cm2_to_mpa(concrete_elastic_modulus_kgf_cm2(resistance_kgf_cm2)),
            water_cement_ratio: None,
        };
        concrete.validate()?;
        concrete.log_advisories();
        Ok(concrete)
    }

    /// Build from explicit values, validating the invariants.
    pub fn explicit(concrete: Concrete) -> CalcResult<Self> {
        concrete.validate()?;
        concrete.log_advisories();
        Ok(concrete)
    }

    /// Validate: positive resistance and modulus, admissibles within the resistance.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.resistance_mpa > 0.0) {
            return Err(CalcError::invalid_input(
                "resistance_mpa",
                self.resistance_mpa.to_string(),
                "Resistance must be positive",
            ));
        }
        if !(self.elastic_modulus_mpa > 0.0) {
            return Err(CalcError::invalid_input(
                "elastic_modulus_mpa",
                self.elastic_modulus_mpa.to_string(),
                "Elastic modulus must be positive",
            ));
        }
        let admissibles = [
            ("simple_compression_mpa", self.simple_compression_mpa),
            ("flexural_compression_mpa", self.flexural_compression_mpa),
            ("shear_mpa", self.shear_mpa),
            ("tension_mpa", self.tension_mpa),
        ];
        for (field, value) in admissibles {
            if value < 0.0 || !value.is_finite() {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Admissible stress cannot be negative",
                ));
            }
            if value > self.resistance_mpa {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    format!(
                        "Admissible stress exceeds the resistance {:.2} MPa",
                        self.resistance_mpa
                    ),
                ));
            }
        }
        if !(self.flexural_compression_mpa > 0.0) {
            return Err(CalcError::invalid_input(
                "flexural_compression_mpa",
                self.flexural_compression_mpa.to_string(),
                "Admissible compression must be positive",
            ));
        }
        Ok(())
    }

    /// Parameters that are legal but unusual for period concretes.
    pub fn advisories(&self) -> Vec<String> {
        let mut notes = Vec::new();
        let resistance = self.resistance_kgf_cm2();

        // RD 2229 caps the admissible bending stress at a third of the resistance
        let ratio = self.flexural_compression_mpa / self.resistance_mpa;
        if ratio > 1.0 / 3.0 {
            notes.push(format!(
                "admissible compression is {:.1}% of the resistance (limit 33.3%)",
                ratio * 100.0
            ));
        } else if ratio < 0.08 {
            notes.push(format!(
                "admissible compression is only {:.1}% of the resistance (typical 8-12%)",
                ratio * 100.0
            ));
        }

        let shear_ratio = self.shear_mpa / self.flexural_compression_mpa;
        if !(0.08..=0.20).contains(&shear_ratio) {
            notes.push(format!(
                "admissible shear is {:.1}% of admissible compression (typical 10-15%)",
                shear_ratio * 100.0
            ));
        }

        let expected_ec = kgf_cm2_to_mpa(concrete_elastic_modulus_kgf_cm2(resistance));
        let ec_error = (self.elastic_modulus_mpa - expected_ec).abs() / expected_ec;
        if ec_error > 0.20 {
            notes.push(format!(
                "elastic modulus {:.0} MPa differs by {:.0}% from the code formula ({:.0} MPa)",
                self.elastic_modulus_mpa,
                ec_error * 100.0,
                expected_ec
            ));
        }

        if !(100.0..=500.0).contains(&resistance) {
            notes.push(format!(
                "resistance {resistance:.0} kgf/cm² outside the historical range 100-500"
            ));
        }
        notes
    }

    fn log_advisories(&self) {
        for note in self.advisories() {
            log::warn!("concrete {}: {}", self.class_id, note);
        }
    }

    /// Resistance in kgf/cm²
    pub fn resistance_kgf_cm2(&self) -> f64 {
        mpa_to_kgf_cm2(self.resistance_mpa)
    }

    /// Ec in kgf/cm²
    pub fn elastic_modulus_kgf_cm2(&self) -> f64 {
        mpa_to_kgf_cm2(self.elastic_modulus_mpa)
    }

    /// Modular ratio against the code steel modulus (Es = 2 000 000 kgf/cm²)
    pub fn code_modular_ratio(&self) -> f64 {
        STEEL_ELASTIC_MODULUS_KGF_CM2 / self.elastic_modulus_kgf_cm2()
    }

    /// Santarella enhancement of the concrete shear contribution for the
    /// longitudinal steel percentage ρ (in percent).
    ///
    /// 1.0 below 0.5 %, rising linearly by 0.2 per percent, capped at 1.2.
    pub fn shear_enhancement(&self, steel_percentage: f64) -> f64 {
        if steel_percentage < 0.5 {
            1.0
        } else if steel_percentage <= 1.5 {
            1.0 + 0.2 * (steel_percentage - 0.5)
        } else {
            1.2
        }
    }
}

fn cement_key(cement: CementType) -> &'static str {
    match cement {
        CementType::Normal => "normal",
        CementType::HighStrength => "high-strength",
        CementType::Aluminous => "aluminous",
    }
}
