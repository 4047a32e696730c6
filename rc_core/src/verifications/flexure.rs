//! # Flexure Verification
//!
//! Bending about the horizontal axis, optionally with an axial force.
//!
//! ## Checks
//!
//! - Peak concrete compression ≤ admissible flexural compression
//! - Peak steel tension ≤ admissible steel stress
//! - Peak steel compression ≤ admissible steel compression
//!
//! Also reported: resisting moment at the same axial force, governing
//! material, anchorage length of the tension bars.
//!
//! ## Inverse Sizing
//!
//! [`size_tension_steel`] returns the minimum tension steel that keeps both
//! materials within their admissible stresses: closed form for a singly
//! reinforced rectangle, bar-by-bar trial otherwise.

use serde::{Deserialize, Serialize};

use super::{min_ratio, resisting_moment, summary_line, CalculationMethod, CheckDetails, CheckKind, StressCheck, VerificationResult};
use crate::equations::section::bar_area;
use crate::errors::{CalcError, CalcResult};
use crate::materials::Materials;
use crate::section::{BarRole, Section, Shape};
use crate::solver::{solve, AdmissibleLimits, GoverningMaterial, InternalForces, NeutralAxis, SolverSettings};
use crate::units::knm_to_nmm;

/// Bar count at which the trial sizing gives up
const MAX_TRIAL_BARS: u32 = 60;

fn default_label() -> String {
    "Flexure".to_string()
}

/// Input for a flexure check.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Beam B1 midspan",
///   "section": { "shape": { "kind": "rectangular", "width_mm": 300, "height_mm": 500 },
///                "bars": [ { "diameter_mm": 16, "count": 4, "role": { "kind": "tension" },
///                            "placement": { "layout": "row", "depth_mm": 462 } } ] },
///   "materials": { "concrete": { ... }, "steel": { ... } },
///   "forces": { "mx_knm": 20.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexureInput {
    #[serde(default = "default_label")]
    pub label: String,
    pub section: Section,
    pub materials: Materials,
    pub forces: InternalForces,
    #[serde(default)]
    pub settings: SolverSettings,
}

impl FlexureInput {
    pub fn validate(&self) -> CalcResult<()> {
        self.materials.validate()?;
        self.forces.validate()?;
        if self.forces.my_knm != 0.0 {
            return Err(CalcError::invalid_input(
                "my_knm",
                self.forces.my_knm.to_string(),
                "Two moments need the biaxial check",
            ));
        }
        Ok(())
    }
}

/// Flexure-specific results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexureDetails {
    pub neutral_axis: NeutralAxis,
    pub modular_ratio: f64,
    pub concrete_stress_mpa: f64,
    pub steel_tension_mpa: f64,
    pub steel_compression_mpa: f64,
    pub governing: Option<GoverningMaterial>,
    /// Moment at first binding under the same axial force; `None` in axial tension
    pub resisting_moment_knm: Option<f64>,
    /// Basic anchorage length of the largest bar
    pub anchorage_length_mm: Option<f64>,
}

/// Verify a section in bending.
pub fn calculate(input: &FlexureInput) -> CalcResult<VerificationResult> {
    input.validate()?;
    let materials = &input.materials;
    let limits = AdmissibleLimits::flexural(materials);
    let eq = solve(&input.section, materials, &input.forces, &input.settings)?;

    let mut stresses = vec![
        StressCheck::new(
            "Concrete compression",
            eq.concrete_max_compression_mpa,
            limits.concrete_mpa,
        ),
        StressCheck::new("Steel tension", eq.steel_max_tension_mpa, limits.steel_tension_mpa),
    ];
    if eq.steel_max_compression_mpa > 0.0 {
        stresses.push(StressCheck::new(
            "Steel compression",
            eq.steel_max_compression_mpa,
            limits.steel_compression_mpa,
        ));
    }
    let passes = stresses.iter().all(StressCheck::passes);
    let safety_ratio = min_ratio(&stresses);
    let governing = eq.governing_for(&limits, input.settings.balance_tolerance);

    let resisting = resisting_moment(
        &input.section,
        materials,
        input.forces.axial_kn,
        input.forces.mx_knm >= 0.0,
        &input.settings,
    )?;
    let largest_bar = input.section.max_bar_diameter();
    let anchorage = (largest_bar > 0.0).then(|| materials.steel.anchorage_length_mm(largest_bar));

    let governing_name = governing.map_or("no stress", |g| g.material.display_name());
    Ok(VerificationResult {
        label: input.label.clone(),
        check: CheckKind::Flexure,
        method: CalculationMethod::default(),
        passes,
        demand: input.forces.mx_knm.abs(),
        capacity: resisting,
        safety_ratio,
        summary: summary_line(&input.label, passes, safety_ratio, governing_name),
        stresses,
        details: CheckDetails::Flexure(FlexureDetails {
            neutral_axis: eq.neutral_axis,
            modular_ratio: eq.modular_ratio,
            concrete_stress_mpa: eq.concrete_max_compression_mpa,
            steel_tension_mpa: eq.steel_max_tension_mpa,
            steel_compression_mpa: eq.steel_max_compression_mpa,
            governing: governing.map(|g| g.material),
            resisting_moment_knm: resisting,
            anchorage_length_mm: anchorage,
        }),
    })
}

// =============================================================================
// INVERSE SIZING
// =============================================================================

fn default_bar_diameter() -> f64 {
    16.0
}

/// Input for tension-steel sizing.
///
/// The section carries whatever bars it already has (e.g. compression bars);
/// the tension steel is added as a row at `tension_depth_mm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingInput {
    pub section: Section,
    pub materials: Materials,
    /// Positive bending moment (kN·m)
    pub moment_knm: f64,
    pub tension_depth_mm: f64,
    #[serde(default = "default_bar_diameter")]
    pub bar_diameter_mm: f64,
    #[serde(default)]
    pub settings: SolverSettings,
}

/// How the required area was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingMethod {
    ClosedForm,
    Trial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    pub required_area_mm2: f64,
    /// Bars of the requested diameter providing at least the required area
    pub bar_count: u32,
    pub provided_area_mm2: f64,
    pub neutral_axis_mm: f64,
    pub governing: GoverningMaterial,
    pub method: SizingMethod,
}

impl SizingInput {
    pub fn validate(&self) -> CalcResult<()> {
        self.materials.validate()?;
        if !(self.moment_knm > 0.0 && self.moment_knm.is_finite()) {
            return Err(CalcError::invalid_input(
                "moment_knm",
                self.moment_knm.to_string(),
                "Sizing needs a positive bending moment",
            ));
        }
        if !(self.tension_depth_mm > 0.0 && self.tension_depth_mm < self.section.height()) {
            return Err(CalcError::invalid_input(
                "tension_depth_mm",
                self.tension_depth_mm.to_string(),
                "Tension steel must lie inside the section height",
            ));
        }
        if !(self.bar_diameter_mm > 0.0) {
            return Err(CalcError::invalid_input(
                "bar_diameter_mm",
                self.bar_diameter_mm.to_string(),
                "Bar diameter must be positive",
            ));
        }
        Ok(())
    }
}

/// Singly reinforced rectangle: required tension steel for each material
/// reaching its admissible stress, the larger one governs.
///
/// Concrete at σc,adm:
/// ```text
/// x = (3d − √(9d² − 24M/(σc·b))) / 2
/// As = b·x² / (2n(d − x))
/// ```
/// Steel at σs,adm: the depth `x` for which `As(x)·σs·(d − x/3) = M`, found by
/// bisection on `x ∈ (0, d)`.
fn rectangle_closed_form(
    b: f64,
    d: f64,
    m_nmm: f64,
    n: f64,
    sigma_c: f64,
    sigma_s: f64,
    settings: &SolverSettings,
) -> CalcResult<(f64, f64, GoverningMaterial)> {
    let disc = 9.0 * d * d - 24.0 * m_nmm / (sigma_c * b);
    if disc < 0.0 {
        return Err(CalcError::invalid_geometry(
            "Moment exceeds the concrete capacity of a singly reinforced section; compression steel is needed",
        ));
    }
    let x_c = (3.0 * d - disc.sqrt()) / 2.0;
    let area = |x: f64| b * x * x / (2.0 * n * (d - x));
    let as_c = area(x_c);

    // steel condition: moment carried with σs = σs,adm grows with x
    let moment_at = |x: f64| area(x) * sigma_s * (d - x / 3.0);
    let (mut lo, mut hi) = (0.0, d * (1.0 - 1e-9));
    let mut converged = false;
    for _ in 0..settings.max_iterations {
        let mid = 0.5 * (lo + hi);
        if moment_at(mid) < m_nmm {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= settings.tolerance * d {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(CalcError::non_convergence(
            "steel-governed sizing depth",
            settings.max_iterations,
            (hi - lo) / d,
        ));
    }
    let x_s = 0.5 * (lo + hi);
    let as_s = area(x_s);

    Ok(if as_c >= as_s {
        (as_c, x_c, GoverningMaterial::Concrete)
    } else {
        (as_s, x_s, GoverningMaterial::Steel)
    })
}

/// Minimum tension steel for a positive moment.
pub fn size_tension_steel(input: &SizingInput) -> CalcResult<SizingResult> {
    input.validate()?;
    let materials = &input.materials;
    let limits = AdmissibleLimits::flexural(materials);
    let single = bar_area(input.bar_diameter_mm, 1);

    let singly_rectangle = matches!(input.section.shape(), Shape::Rectangular { .. })
        && input.section.steel_points().is_empty();

    if singly_rectangle {
        let n = input.section.modular_ratio_for(materials);
        let (required, x, governing) = rectangle_closed_form(
            input.section.width(),
            input.tension_depth_mm,
            knm_to_nmm(input.moment_knm),
            n,
            limits.concrete_mpa,
            limits.steel_tension_mpa,
            &input.settings,
        )?;
        let bar_count = (required / single).ceil().max(1.0) as u32;
        log::debug!("closed-form sizing: As={required:.1} mm² ({bar_count} bars)");
        return Ok(SizingResult {
            required_area_mm2: required,
            bar_count,
            provided_area_mm2: bar_area(input.bar_diameter_mm, bar_count),
            neutral_axis_mm: x,
            governing,
            method: SizingMethod::ClosedForm,
        });
    }

    let forces = InternalForces::bending(input.moment_knm);
    for count in 1..=MAX_TRIAL_BARS {
        let mut trial = input.section.clone();
        trial.add_layer(input.bar_diameter_mm, count, input.tension_depth_mm, BarRole::Tension)?;
        let eq = solve(&trial, materials, &forces, &input.settings)?;
        let Some(limit) = eq.governing_for(&limits, input.settings.balance_tolerance) else {
            continue;
        };
        log::trace!("trial sizing: {count} bars, multiplier {:.3}", limit.multiplier);
        if limit.multiplier >= 1.0 {
            return Ok(SizingResult {
                required_area_mm2: bar_area(input.bar_diameter_mm, count),
                bar_count: count,
                provided_area_mm2: bar_area(input.bar_diameter_mm, count),
                neutral_axis_mm: eq.neutral_axis.depth_mm().unwrap_or(0.0),
                governing: limit.material,
                method: SizingMethod::Trial,
            });
        }
    }
    Err(CalcError::invalid_geometry(format!(
        "No tension steel up to {MAX_TRIAL_BARS} bars of {} mm satisfies the admissible stresses",
        input.bar_diameter_mm
    )))
}
