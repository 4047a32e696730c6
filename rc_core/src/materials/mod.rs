//! # Materials
//!
//! Concrete and reinforcing-steel definitions for working-stress checks.
//!
//! ## Material Types
//!
//! - **Concrete**: Table II resistance, admissible stresses by cement type,
//!   Ec = 550000·σr/(σr+200) kgf/cm²
//! - **Steel**: 1939 grades (mild/semi-hard/hard) and FeB grades, Es = 2 000 000 kgf/cm²
//!
//! ## Example
//!
//! ```rust
//! use rc_core::materials::{build_material, Material, MaterialSpec, CementType};
//!
//! let spec = MaterialSpec::ConcreteTable {
//!     cement: CementType::Normal,
//!     water_cement_ratio: 0.55,
//! };
//! let material = build_material(&spec).unwrap();
//! assert!(matches!(material, Material::Concrete(_)));
//! ```

pub mod catalogue;
pub mod concrete;
pub mod steel;

pub use concrete::{CementType, Concrete};
pub use steel::{Steel, SteelGrade};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Unified material enum
///
/// ## JSON Serialization
///
/// ```json
/// { "type": "Concrete", "class_id": "C280", "resistance_mpa": 27.46, ... }
/// { "type": "Steel", "designation": "FeB38k", "yield_mpa": 375.0, ... }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Material {
    Concrete(Concrete),
    Steel(Steel),
}

impl Material {
    /// Material identifier
    pub fn name(&self) -> &str {
        match self {
            Material::Concrete(c) => &c.class_id,
            Material::Steel(s) => &s.designation,
        }
    }

    /// Elastic modulus (MPa)
    pub fn elastic_modulus_mpa(&self) -> f64 {
        match self {
            Material::Concrete(c) => c.elastic_modulus_mpa,
            Material::Steel(s) => s.elastic_modulus_mpa,
        }
    }

    /// Validate the material invariants
    pub fn validate(&self) -> CalcResult<()> {
        match self {
            Material::Concrete(c) => c.validate(),
            Material::Steel(s) => s.validate(),
        }
    }
}

/// How to build a material.
///
/// Family names arriving as free text go through [`MaterialSpec::Catalogue`],
/// [`CementType::from_str_flexible`] or [`SteelGrade::from_str_flexible`], all of
/// which report unknown names as `MaterialNotFound`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum MaterialSpec {
    /// Concrete from Table II
    ConcreteTable {
        cement: CementType,
        water_cement_ratio: f64,
    },
    /// Concrete from a known cube resistance
    ConcreteResistance {
        cement: CementType,
        resistance_kgf_cm2: f64,
    },
    /// Fully specified concrete
    ConcreteExplicit { concrete: Concrete },
    /// Steel from a grade (optionally for a maximum bar diameter)
    SteelGrade {
        grade: SteelGrade,
        #[serde(default)]
        bar_diameter_mm: Option<f64>,
    },
    /// Fully specified steel
    SteelExplicit { steel: Steel },
    /// Named historical material
    Catalogue { name: String },
}

/// Build a validated material from its specification.
pub fn build_material(spec: &MaterialSpec) -> CalcResult<Material> {
    let material = match spec {
        MaterialSpec::ConcreteTable {
            cement,
            water_cement_ratio,
        } => Material::Concrete(Concrete::from_table(*cement, *water_cement_ratio)?),
        MaterialSpec::ConcreteResistance {
            cement,
            resistance_kgf_cm2,
        } => Material::Concrete(Concrete::from_resistance(*cement, *resistance_kgf_cm2)?),
        MaterialSpec::ConcreteExplicit { concrete } => {
            Material::Concrete(Concrete::explicit(concrete.clone())?)
        }
        MaterialSpec::SteelGrade {
            grade,
            bar_diameter_mm,
        } => Material::Steel(Steel::from_grade_for_bars(
            *grade,
            bar_diameter_mm.unwrap_or(0.0),
        )?),
        MaterialSpec::SteelExplicit { steel } => Material::Steel(Steel::explicit(steel.clone())?),
        MaterialSpec::Catalogue { name } => catalogue::find(name)?,
    };
    log::debug!("built material {}", material.name());
    Ok(material)
}

/// The concrete/steel pair a section is verified with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Materials {
    pub concrete: Concrete,
    pub steel: Steel,
}

impl Materials {
    pub fn new(concrete: Concrete, steel: Steel) -> Self {
        Self { concrete, steel }
    }

    /// Assemble from two built materials, checking each is of the right kind.
    pub fn from_pair(concrete: Material, steel: Material) -> CalcResult<Self> {
        match (concrete, steel) {
            (Material::Concrete(c), Material::Steel(s)) => Ok(Self::new(c, s)),
            (c, s) => Err(CalcError::invalid_input(
                "materials",
                format!("{} / {}", c.name(), s.name()),
                "Expected a concrete and a steel",
            )),
        }
    }

    /// Modular ratio n = Es/Ec
    pub fn modular_ratio(&self) -> f64 {
        crate::equations::historical::modular_ratio(
            self.steel.elastic_modulus_mpa,
            self.concrete.elastic_modulus_mpa,
        )
    }

    pub fn validate(&self) -> CalcResult<()> {
        self.concrete.validate()?;
        self.steel.validate()
    }
}
