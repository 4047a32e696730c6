//! # Shear Verification
//!
//! Resisting shear as the sum of three contributions:
//!
//! ```text
//! Vc = η · k(ρ) · τc · bw · d        concrete (η from the method, k from the steel ratio)
//! Vs = Σ (Asw / s) · σs · d          stirrups
//! Vb = Σ Ab · σs · sin α             bent bars, once per bar
//! ```
//!
//! The check fails when `Vc + Vs + Vb < V`. A stirrup spacing is also designed
//! for the shear left over by the concrete and the bent bars.

use serde::{Deserialize, Serialize};

use super::{summary_line, CalculationMethod, CheckDetails, CheckKind, StressCheck, VerificationResult};
use crate::equations::section::bar_area;
use crate::errors::{CalcError, CalcResult};
use crate::materials::Materials;
use crate::section::{BarRole, Section};
use crate::units::{kn_to_n, n_to_kn};

/// Stirrup spacing cap (mm), besides d/2
pub const MAX_STIRRUP_SPACING_MM: f64 = 300.0;

/// Depth samples used to find the narrowest web
const WIDTH_SAMPLES: usize = 64;

fn default_label() -> String {
    "Shear".to_string()
}

fn default_true() -> bool {
    true
}

fn default_stirrup_diameter() -> f64 {
    8.0
}

fn default_legs() -> u32 {
    2
}

/// Input for a shear check.
///
/// ## JSON Example
///
/// ```json
/// {
///   "section": { "shape": { "kind": "rectangular", "width_mm": 300, "height_mm": 500 },
///                "bars": [ { "diameter_mm": 8, "count": 2,
///                            "role": { "kind": "stirrup", "spacing_mm": 200 } } ] },
///   "materials": { ... },
///   "shear_kn": 80.0,
///   "method": "giangreco",
///   "effective_depth_mm": 460
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearInput {
    #[serde(default = "default_label")]
    pub label: String,
    pub section: Section,
    pub materials: Materials,
    pub shear_kn: f64,
    #[serde(default)]
    pub method: CalculationMethod,
    /// Overrides the depth derived from the tension bars
    #[serde(default)]
    pub effective_depth_mm: Option<f64>,
    /// Count the concrete contribution
    #[serde(default = "default_true")]
    pub include_concrete: bool,
    /// Stirrups used for the spacing design
    #[serde(default = "default_stirrup_diameter")]
    pub design_stirrup_diameter_mm: f64,
    #[serde(default = "default_legs")]
    pub design_stirrup_legs: u32,
}

impl ShearInput {
    pub fn new(section: Section, materials: Materials, shear_kn: f64, method: CalculationMethod) -> Self {
        Self {
            label: default_label(),
            section,
            materials,
            shear_kn,
            method,
            effective_depth_mm: None,
            include_concrete: true,
            design_stirrup_diameter_mm: default_stirrup_diameter(),
            design_stirrup_legs: default_legs(),
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        self.materials.validate()?;
        if !self.shear_kn.is_finite() {
            return Err(CalcError::invalid_input(
                "shear_kn",
                self.shear_kn.to_string(),
                "Shear must be finite",
            ));
        }
        if let Some(d) = self.effective_depth_mm {
            if !(d > 0.0 && d <= self.section.height()) {
                return Err(CalcError::invalid_input(
                    "effective_depth_mm",
                    d.to_string(),
                    "Effective depth must lie within the section height",
                ));
            }
        }
        if !(self.design_stirrup_diameter_mm > 0.0) || self.design_stirrup_legs == 0 {
            return Err(CalcError::invalid_input(
                "design_stirrup_diameter_mm",
                self.design_stirrup_diameter_mm.to_string(),
                "Design stirrups need a positive diameter and at least one leg",
            ));
        }
        Ok(())
    }

    /// Effective depth: the override, or the centroid of the bars below the
    /// gross centroid.
    pub fn effective_depth(&self) -> CalcResult<f64> {
        self.effective_depth_mm
            .or_else(|| self.section.effective_depth())
            .ok_or_else(|| {
                CalcError::invalid_input(
                    "effective_depth_mm",
                    "none",
                    "No tension bars to derive the effective depth from",
                )
            })
    }
}

/// Stirrup spacing for the shear not carried by concrete and bent bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StirrupDesign {
    pub diameter_mm: f64,
    pub legs: u32,
    /// Spacing from equilibrium alone; `None` when no stirrups are needed
    pub required_spacing_mm: Option<f64>,
    /// min(d/2, 300 mm)
    pub max_spacing_mm: f64,
    /// Spacing to adopt
    pub spacing_mm: f64,
    pub stirrups_needed: bool,
}

/// Shear-specific results (forces in kN)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearDetails {
    pub effective_depth_mm: f64,
    pub web_width_mm: f64,
    /// Tension steel ratio (percent)
    pub steel_percentage: f64,
    pub concrete_enhancement: f64,
    pub concrete_kn: f64,
    pub stirrups_kn: f64,
    pub bent_bars_kn: f64,
    pub resisting_kn: f64,
    /// V / (bw·d) (MPa)
    pub nominal_stress_mpa: f64,
    pub stirrup_design: StirrupDesign,
}

/// Narrowest concrete width between the gross centroid and the effective depth.
fn web_width(section: &Section, d: f64) -> CalcResult<f64> {
    let top = section.centroid_from_top().min(d);
    let mut bw = f64::INFINITY;
    for i in 0..=WIDTH_SAMPLES {
        let y = top + (d - top) * i as f64 / WIDTH_SAMPLES as f64;
        let w = section.width_at_depth(y)?;
        if w > 0.0 {
            bw = bw.min(w);
        }
    }
    if bw.is_finite() {
        Ok(bw)
    } else {
        Err(CalcError::invalid_geometry("No concrete web between the centroid and the effective depth"))
    }
}

/// Verify a section in shear.
pub fn calculate(input: &ShearInput) -> CalcResult<VerificationResult> {
    input.validate()?;
    let section = &input.section;
    let steel = &input.materials.steel;
    let concrete = &input.materials.concrete;
    let coefficients = input.method.coefficients();

    let d = input.effective_depth()?;
    let bw = web_width(section, d)?;
    let v = kn_to_n(input.shear_kn.abs());

    let yg = section.centroid_from_top();
    let tension_area: f64 = section
        .steel_points()
        .iter()
        .filter(|p| p.y > yg)
        .map(|p| p.area_mm2)
        .sum();
    let steel_percentage = 100.0 * tension_area / (bw * d);
    let enhancement = concrete.shear_enhancement(steel_percentage);

    let vc = if input.include_concrete {
        coefficients.shear_concrete_fraction * enhancement * concrete.shear_mpa * bw * d
    } else {
        0.0
    };
    let sigma_s = steel.admissible_tension_mpa;
    let vs: f64 = section
        .stirrups()
        .filter_map(|bar| match bar.role {
            BarRole::Stirrup { spacing_mm } => Some(bar.area_mm2() / spacing_mm * sigma_s * d),
            _ => None,
        })
        .sum();
    let vb: f64 = section
        .bent_bars()
        .filter_map(|bar| match bar.role {
            BarRole::BentBar { inclination_deg } => {
                Some(bar.area_mm2() * sigma_s * inclination_deg.to_radians().sin())
            }
            _ => None,
        })
        .sum();
    let vr = vc + vs + vb;
    log::debug!(
        "shear ({}): Vc={:.1} Vs={:.1} Vb={:.1} kN, bw={bw:.0} d={d:.0}",
        input.method,
        n_to_kn(vc),
        n_to_kn(vs),
        n_to_kn(vb)
    );

    let stirrup_design = design_stirrups(
        v - vc - vb,
        d,
        input.design_stirrup_diameter_mm,
        input.design_stirrup_legs,
        sigma_s,
    );

    let passes = v <= vr;
    let safety_ratio = (v > 0.0).then(|| vr / v);
    let stresses = vec![StressCheck::new("Nominal shear stress", v / (bw * d), vr / (bw * d))];

    Ok(VerificationResult {
        label: input.label.clone(),
        check: CheckKind::Shear,
        method: input.method,
        passes,
        demand: n_to_kn(v),
        capacity: Some(n_to_kn(vr)),
        safety_ratio,
        summary: summary_line(&input.label, passes, safety_ratio, "shear reinforcement"),
        stresses,
        details: CheckDetails::Shear(ShearDetails {
            effective_depth_mm: d,
            web_width_mm: bw,
            steel_percentage,
            concrete_enhancement: enhancement,
            concrete_kn: n_to_kn(vc),
            stirrups_kn: n_to_kn(vs),
            bent_bars_kn: n_to_kn(vb),
            resisting_kn: n_to_kn(vr),
            nominal_stress_mpa: v / (bw * d),
            stirrup_design,
        }),
    })
}

/// Spacing `s = Asw·σs·d / V_stirrups`, capped at min(d/2, 300 mm).
fn design_stirrups(residual_n: f64, d: f64, diameter_mm: f64, legs: u32, sigma_s: f64) -> StirrupDesign {
    let max_spacing = (d / 2.0).min(MAX_STIRRUP_SPACING_MM);
    let required = (residual_n > 0.0).then(|| bar_area(diameter_mm, legs) * sigma_s * d / residual_n);
    StirrupDesign {
        diameter_mm,
        legs,
        required_spacing_mm: required,
        max_spacing_mm: max_spacing,
        spacing_mm: required.map_or(max_spacing, |s| s.min(max_spacing)),
        stirrups_needed: required.is_some(),
    }
}
