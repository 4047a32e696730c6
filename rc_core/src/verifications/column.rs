//! # Column Verification (straight pressoflexure)
//!
//! Axial compression with bending about the horizontal axis.
//!
//! ## Procedure
//!
//! 1. First-order moment raised to `N·e_min`, `e_min = max(h/30, 20 mm)`
//!    (optional, on by default)
//! 2. For `λ = l0/h ≥ 15`, moment amplified by `1/(1 − N/Ncr)` with
//!    `Ncr = π²·Ec·I/l0²` on the gross section; `N ≥ Ncr` fails the check
//! 3. Section solved under the design forces
//! 4. Extreme concrete fibre against the flexural admissible, mean compression
//!    against the simple-compression admissible, steel against its admissible
//!
//! The longitudinal steel ratio is reported against the code minimum.

use serde::{Deserialize, Serialize};

use super::{min_ratio, resisting_moment, summary_line, CalculationMethod, CheckDetails, CheckKind, StressCheck, VerificationResult};
use crate::equations::historical::{euler_critical_load, minimum_eccentricity_mm, moment_amplification};
use crate::errors::{CalcError, CalcResult};
use crate::materials::Materials;
use crate::section::Section;
use crate::solver::{solve, AdmissibleLimits, InternalForces, NeutralAxis, SolverSettings};
use crate::tables::column_min_steel_ratio;
use crate::units::{kn_to_n, n_to_kn};

fn default_label() -> String {
    "Column".to_string()
}

fn default_true() -> bool {
    true
}

/// Input for a column check.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Pillar P3",
///   "section": { "shape": { "kind": "rectangular", "width_mm": 400, "height_mm": 400 }, "bars": [ ... ] },
///   "materials": { ... },
///   "forces": { "axial_kn": -600.0, "mx_knm": 25.0 },
///   "buckling_length_mm": 6500
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInput {
    #[serde(default = "default_label")]
    pub label: String,
    pub section: Section,
    pub materials: Materials,
    /// `axial_kn` must be negative (compression)
    pub forces: InternalForces,
    /// Free length between inflection points; no slenderness effects without it
    #[serde(default)]
    pub buckling_length_mm: Option<f64>,
    #[serde(default = "default_true")]
    pub minimum_eccentricity: bool,
    #[serde(default)]
    pub settings: SolverSettings,
}

impl ColumnInput {
    pub fn new(section: Section, materials: Materials, forces: InternalForces) -> Self {
        Self {
            label: default_label(),
            section,
            materials,
            forces,
            buckling_length_mm: None,
            minimum_eccentricity: true,
            settings: SolverSettings::default(),
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        self.materials.validate()?;
        self.forces.validate()?;
        if !(self.forces.axial_kn < 0.0) {
            return Err(CalcError::invalid_input(
                "axial_kn",
                self.forces.axial_kn.to_string(),
                "Column check needs axial compression (negative)",
            ));
        }
        if self.forces.my_knm != 0.0 {
            return Err(CalcError::invalid_input(
                "my_knm",
                self.forces.my_knm.to_string(),
                "Two moments need the biaxial check",
            ));
        }
        if let Some(l0) = self.buckling_length_mm {
            if !(l0 > 0.0 && l0.is_finite()) {
                return Err(CalcError::invalid_input(
                    "buckling_length_mm",
                    l0.to_string(),
                    "Buckling length must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Column-specific results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDetails {
    /// l0/h, when a buckling length is given
    pub slenderness: Option<f64>,
    pub critical_load_kn: Option<f64>,
    /// `None` when the column is unstable
    pub amplification: Option<f64>,
    pub unstable: bool,
    /// Eccentricity floor applied (mm), 0 when disabled
    pub minimum_eccentricity_mm: f64,
    /// Moment the section was solved for (kN·m, signed)
    pub design_moment_knm: f64,
    pub neutral_axis: Option<NeutralAxis>,
    pub concrete_stress_mpa: f64,
    pub mean_compression_mpa: f64,
    pub steel_tension_mpa: f64,
    pub steel_compression_mpa: f64,
    /// Longitudinal steel over gross concrete area
    pub steel_ratio: f64,
    pub min_steel_ratio: f64,
    pub below_min_steel: bool,
}

/// Verify a column in straight pressoflexure.
pub fn calculate(input: &ColumnInput) -> CalcResult<VerificationResult> {
    input.validate()?;
    let section = &input.section;
    let materials = &input.materials;
    let compression = kn_to_n(-input.forces.axial_kn);
    let h = section.height();

    let steel_ratio = section.steel_area() / section.area();
    let min_steel_ratio = column_min_steel_ratio(section.area())?;
    let below_min_steel = steel_ratio < min_steel_ratio;
    if below_min_steel {
        log::warn!(
            "{}: longitudinal steel ratio {:.2}% below the minimum {:.2}%",
            input.label,
            steel_ratio * 100.0,
            min_steel_ratio * 100.0
        );
    }

    let e_min = if input.minimum_eccentricity {
        minimum_eccentricity_mm(h)
    } else {
        0.0
    };
    let first_order = input.forces.mx_knm.abs().max(input.forces.axial_kn.abs() * e_min / 1000.0);
    let sign = if input.forces.mx_knm < 0.0 { -1.0 } else { 1.0 };

    let (slenderness, critical) = match input.buckling_length_mm {
        Some(l0) => {
            let (ix, _) = section.second_moment_about_centroid();
            (
                Some(l0 / h),
                Some(euler_critical_load(materials.concrete.elastic_modulus_mpa, ix, l0)),
            )
        }
        None => (None, None),
    };
    let amplification = match (slenderness, critical) {
        (Some(lambda), Some(ncr)) => moment_amplification(compression, ncr, lambda),
        _ => Some(1.0),
    };

    let mut details = ColumnDetails {
        slenderness,
        critical_load_kn: critical.map(n_to_kn),
        amplification,
        unstable: amplification.is_none(),
        minimum_eccentricity_mm: e_min,
        design_moment_knm: sign * first_order,
        neutral_axis: None,
        concrete_stress_mpa: 0.0,
        mean_compression_mpa: 0.0,
        steel_tension_mpa: 0.0,
        steel_compression_mpa: 0.0,
        steel_ratio,
        min_steel_ratio,
        below_min_steel,
    };

    let eta = match amplification {
        Some(eta) => eta,
        None => {
            // Ncr is Some whenever the amplification is undefined
            let ncr = critical.unwrap_or(0.0);
            let safety_ratio = Some(ncr / compression);
            log::warn!(
                "{}: N = {:.1} kN reaches the critical load {:.1} kN",
                input.label,
                n_to_kn(compression),
                n_to_kn(ncr)
            );
            return Ok(VerificationResult {
                label: input.label.clone(),
                check: CheckKind::Column,
                method: CalculationMethod::default(),
                passes: false,
                demand: first_order,
                capacity: None,
                safety_ratio,
                summary: summary_line(&input.label, false, safety_ratio, "unstable column"),
                stresses: Vec::new(),
                details: CheckDetails::Column(details),
            });
        }
    };

    let design_moment = sign * first_order * eta;
    details.design_moment_knm = design_moment;
    let forces = InternalForces::combined(input.forces.axial_kn, design_moment);
    let eq = solve(section, materials, &forces, &input.settings)?;

    let homogenized = section.homogenized(eq.modular_ratio);
    let mean_compression = compression / homogenized.area_mm2;
    let flexural = AdmissibleLimits::flexural(materials);

    let mut stresses = vec![
        StressCheck::new("Concrete extreme fibre", eq.concrete_max_compression_mpa, flexural.concrete_mpa),
        StressCheck::new(
            "Mean compression",
            mean_compression,
            materials.concrete.simple_compression_mpa,
        ),
    ];
    if eq.steel_max_tension_mpa > 0.0 {
        stresses.push(StressCheck::new("Steel tension", eq.steel_max_tension_mpa, flexural.steel_tension_mpa));
    }
    if eq.steel_max_compression_mpa > 0.0 {
        stresses.push(StressCheck::new(
            "Steel compression",
            eq.steel_max_compression_mpa,
            flexural.steel_compression_mpa,
        ));
    }
    let passes = stresses.iter().all(StressCheck::passes);
    let safety_ratio = min_ratio(&stresses);
    let governing = stresses
        .iter()
        .filter_map(|c| c.ratio().map(|r| (r, c.label.as_str())))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map_or("no stress", |(_, label)| label);

    let capacity = resisting_moment(section, materials, input.forces.axial_kn, sign > 0.0, &input.settings)?;

    details.neutral_axis = Some(eq.neutral_axis);
    details.concrete_stress_mpa = eq.concrete_max_compression_mpa;
    details.mean_compression_mpa = mean_compression;
    details.steel_tension_mpa = eq.steel_max_tension_mpa;
    details.steel_compression_mpa = eq.steel_max_compression_mpa;

    Ok(VerificationResult {
        label: input.label.clone(),
        check: CheckKind::Column,
        method: CalculationMethod::default(),
        passes,
        demand: design_moment.abs(),
        capacity,
        safety_ratio,
        summary: summary_line(&input.label, passes, safety_ratio, governing),
        stresses,
        details: CheckDetails::Column(details),
    })
}
