//! # Equilibrium Solver
//!
//! Finds the neutral axis of a homogenized reinforced-concrete section under
//! an axial force and one or two bending moments, and the stresses that go
//! with it.
//!
//! ## Model
//!
//! - Plane sections remain plane; both materials are linear elastic
//! - Concrete carries compression only
//! - Steel stress = n × (concrete-fibre stress at the bar); compressed bars add
//!   `(n − 1)·As`, tensioned bars `n·As`
//! - Moments are taken about the centroid of the uncracked homogenized section
//!
//! ## Cases
//!
//! | Demand | Path |
//! |---|---|
//! | `M = 0` | uniform stress, no root finding |
//! | whole section compressed | uncracked linear field |
//! | pure flexure, rectangle or T | closed-form depth |
//! | `Mx` only | bisection on the depth |
//! | `Mx` only, section not symmetric about the vertical axis | inclined axis as for `Mx` and `My` |
//! | `Mx` and `My` | nested bisection, angle outside, depth inside |
//!
//! ## Example
//!
//! ```rust
//! use rc_core::materials::{CementType, Concrete, Materials, Steel, SteelGrade};
//! use rc_core::section::{BarRole, Section, Shape};
//! use rc_core::solver::{solve, InternalForces, NeutralAxis, SolverSettings};
//!
//! let mut section = Section::new(Shape::Rectangular { width_mm: 300.0, height_mm: 500.0 }).unwrap();
//! section.add_layer(16.0, 4, 462.0, BarRole::Tension).unwrap();
//! section.set_modular_ratio(Some(10.0)).unwrap();
//!
//! let materials = Materials::new(
//!     Concrete::from_resistance(CementType::Normal, 280.0).unwrap(),
//!     Steel::from_grade(SteelGrade::Mild).unwrap(),
//! );
//! let result = solve(&section, &materials, &InternalForces::bending(20.0), &SolverSettings::default()).unwrap();
//! match result.neutral_axis {
//!     NeutralAxis::Interior { depth_mm, .. } => assert!(depth_mm > 130.0 && depth_mm < 150.0),
//!     _ => unreachable!(),
//! }
//! ```

mod biaxial;
mod frame;
mod uniaxial;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::Materials;
use crate::section::{BarRole, Section};
use crate::units::{kn_to_n, knm_to_nmm, n_to_kn, nmm_to_knm};

use frame::{Frame, StressField};

// =============================================================================
// SETTINGS
// =============================================================================

/// Root-finding controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Hard cap per bisection loop
    pub max_iterations: usize,
    /// Relative bracket width at which a bisection stops
    pub tolerance: f64,
    /// Relative gap between the concrete and steel multipliers reported as balanced
    pub balance_tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-9,
            balance_tolerance: 0.01,
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> CalcResult<()> {
        if self.max_iterations == 0 {
            return Err(CalcError::invalid_input(
                "max_iterations",
                "0",
                "At least one iteration is required",
            ));
        }
        if !(self.tolerance > 0.0 && self.tolerance < 0.1) {
            return Err(CalcError::invalid_input(
                "tolerance",
                self.tolerance.to_string(),
                "Tolerance must be in (0, 0.1)",
            ));
        }
        if !(self.balance_tolerance >= 0.0 && self.balance_tolerance.is_finite()) {
            return Err(CalcError::invalid_input(
                "balance_tolerance",
                self.balance_tolerance.to_string(),
                "Balance tolerance cannot be negative",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// INPUT / OUTPUT TYPES
// =============================================================================

/// Internal forces at the section.
///
/// - `axial_kn`: negative in compression
/// - `mx_knm`: positive when it compresses the top fibre
/// - `my_knm`: positive when it compresses the right fibre
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InternalForces {
    #[serde(default)]
    pub axial_kn: f64,
    #[serde(default)]
    pub mx_knm: f64,
    #[serde(default)]
    pub my_knm: f64,
    #[serde(default)]
    pub shear_kn: f64,
}

impl InternalForces {
    /// Pure bending about the horizontal axis
    pub fn bending(mx_knm: f64) -> Self {
        Self {
            mx_knm,
            ..Default::default()
        }
    }

    /// Axial force with bending about the horizontal axis
    pub fn combined(axial_kn: f64, mx_knm: f64) -> Self {
        Self {
            axial_kn,
            mx_knm,
            ..Default::default()
        }
    }

    pub fn biaxial(axial_kn: f64, mx_knm: f64, my_knm: f64) -> Self {
        Self {
            axial_kn,
            mx_knm,
            my_knm,
            shear_kn: 0.0,
        }
    }

    pub fn shear(shear_kn: f64) -> Self {
        Self {
            shear_kn,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("axial_kn", self.axial_kn),
            ("mx_knm", self.mx_knm),
            ("my_knm", self.my_knm),
            ("shear_kn", self.shear_kn),
        ] {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(field, value.to_string(), "Force must be finite"));
            }
        }
        Ok(())
    }

    /// Same forces with the moments scaled
    pub fn with_moment_factor(&self, factor: f64) -> Self {
        Self {
            mx_knm: self.mx_knm * factor,
            my_knm: self.my_knm * factor,
            ..*self
        }
    }
}

/// Where the neutral axis ended up.
///
/// Depths are measured from the most compressed concrete fibre, perpendicular
/// to the axis; the angle is the direction of that fibre (0° top, 90° right,
/// 180° bottom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NeutralAxis {
    Interior { depth_mm: f64, angle_deg: f64 },
    OutsideSection { depth_mm: f64, angle_deg: f64 },
    Uniform,
}

impl NeutralAxis {
    pub fn depth_mm(&self) -> Option<f64> {
        match *self {
            NeutralAxis::Interior { depth_mm, .. } | NeutralAxis::OutsideSection { depth_mm, .. } => {
                Some(depth_mm)
            }
            NeutralAxis::Uniform => None,
        }
    }
}

/// Stress in one bar (negative in compression, like the axial force)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarStress {
    pub z_mm: f64,
    pub y_mm: f64,
    pub area_mm2: f64,
    pub role: BarRole,
    pub stress_mpa: f64,
    pub strain: f64,
}

/// Material that reaches its admissible stress first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoverningMaterial {
    Concrete,
    Steel,
    Balanced,
}

impl GoverningMaterial {
    pub fn display_name(&self) -> &'static str {
        match self {
            GoverningMaterial::Concrete => "Concrete-governed",
            GoverningMaterial::Steel => "Steel-governed",
            GoverningMaterial::Balanced => "Balanced",
        }
    }
}

/// Result of scaling the solved state until the first admissible stress binds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoverningLimit {
    pub material: GoverningMaterial,
    /// Load multiplier at first binding (> 1 means spare capacity)
    pub multiplier: f64,
    /// Peak concrete compression at the multiplied load
    pub concrete_stress_mpa: f64,
    /// Peak steel stress magnitude at the multiplied load
    pub steel_stress_mpa: f64,
}

/// Admissible stresses the governing limit is measured against (MPa).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdmissibleLimits {
    pub concrete_mpa: f64,
    pub steel_tension_mpa: f64,
    pub steel_compression_mpa: f64,
}

impl AdmissibleLimits {
    /// Bending, with or without axial force
    pub fn flexural(materials: &Materials) -> Self {
        Self {
            concrete_mpa: materials.concrete.flexural_compression_mpa,
            steel_tension_mpa: materials.steel.admissible_tension_mpa,
            steel_compression_mpa: materials.steel.admissible_compression_mpa,
        }
    }

    /// Centred compression
    pub fn axial(materials: &Materials) -> Self {
        Self {
            concrete_mpa: materials.concrete.simple_compression_mpa,
            ..Self::flexural(materials)
        }
    }
}

/// Solved stress state of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumResult {
    pub neutral_axis: NeutralAxis,
    pub modular_ratio: f64,
    pub concrete_max_compression_mpa: f64,
    pub concrete_max_strain: f64,
    pub steel_max_tension_mpa: f64,
    pub steel_max_tension_strain: f64,
    pub steel_max_compression_mpa: f64,
    pub bars: Vec<BarStress>,
    /// Forces obtained by integrating the solved stresses back over the section
    pub resultant: InternalForces,
    /// `None` when nothing is stressed
    pub governing: Option<GoverningLimit>,
    pub iterations: usize,
}

impl EquilibriumResult {
    /// Largest steel stress magnitude
    pub fn steel_max_mpa(&self) -> f64 {
        self.steel_max_tension_mpa.max(self.steel_max_compression_mpa)
    }

    /// Governing limit against other admissible stresses
    pub fn governing_for(&self, limits: &AdmissibleLimits, balance_tolerance: f64) -> Option<GoverningLimit> {
        classify(
            self.concrete_max_compression_mpa,
            self.steel_max_tension_mpa,
            self.steel_max_compression_mpa,
            limits,
            balance_tolerance,
        )
    }
}

/// Concrete- or steel-governed, from the peak stresses of a state.
pub fn classify(
    concrete_mpa: f64,
    steel_tension_mpa: f64,
    steel_compression_mpa: f64,
    limits: &AdmissibleLimits,
    balance_tolerance: f64,
) -> Option<GoverningLimit> {
    let lc = (concrete_mpa > 0.0).then(|| limits.concrete_mpa / concrete_mpa);
    let lt = (steel_tension_mpa > 0.0).then(|| limits.steel_tension_mpa / steel_tension_mpa);
    let lsc = (steel_compression_mpa > 0.0).then(|| limits.steel_compression_mpa / steel_compression_mpa);
    let ls = match (lt, lsc) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    let (material, multiplier) = match (lc, ls) {
        (None, None) => return None,
        (Some(c), None) => (GoverningMaterial::Concrete, c),
        (None, Some(s)) => (GoverningMaterial::Steel, s),
        (Some(c), Some(s)) => {
            if (c - s).abs() <= balance_tolerance * c.min(s) {
                (GoverningMaterial::Balanced, c.min(s))
            } else if c < s {
                (GoverningMaterial::Concrete, c)
            } else {
                (GoverningMaterial::Steel, s)
            }
        }
    };
    Some(GoverningLimit {
        material,
        multiplier,
        concrete_stress_mpa: concrete_mpa * multiplier,
        steel_stress_mpa: steel_tension_mpa.max(steel_compression_mpa) * multiplier,
    })
}

// =============================================================================
// SOLVE
// =============================================================================

/// Solve the section equilibrium under the given forces.
///
/// # Errors
///
/// - `InvalidInput` for non-finite forces or bad settings
/// - `InvalidGeometry` when no concrete can be engaged (section in tension,
///   or no steel to balance a bending moment)
/// - `NonConvergence` when a bisection hits `max_iterations`
pub fn solve(
    section: &Section,
    materials: &Materials,
    forces: &InternalForces,
    settings: &SolverSettings,
) -> CalcResult<EquilibriumResult> {
    forces.validate()?;
    settings.validate()?;
    let n = section.modular_ratio_for(materials);
    let frame = Frame::new(section, n);

    // compression positive inside the solver
    let p = -kn_to_n(forces.axial_kn);
    let mx = knm_to_nmm(forces.mx_knm);
    let my = knm_to_nmm(forces.my_knm);

    let (field, iterations) = if mx == 0.0 && my == 0.0 {
        (pure_axial(&frame, p)?, 0)
    } else if my == 0.0 {
        straight(section, &frame, p, mx, settings)?
    } else {
        biaxial::solve(&frame, p, mx, my, settings)?
    };

    let result = assemble(&frame, &field, materials, iterations, settings);
    log::debug!(
        "equilibrium: {:?} σc={:.3} MPa σs={:.3} MPa after {} iterations",
        result.neutral_axis,
        result.concrete_max_compression_mpa,
        result.steel_max_mpa(),
        iterations
    );
    Ok(result)
}

/// Bending about the horizontal axis. The horizontal neutral axis only holds
/// when it leaves no moment about the vertical axis; otherwise (L shapes,
/// off-centre bars) the axis is inclined until `My` vanishes.
fn straight(
    section: &Section,
    frame: &Frame,
    p: f64,
    mx: f64,
    settings: &SolverSettings,
) -> CalcResult<(StressField, usize)> {
    let (field, iterations) = uniaxial::solve(section, frame, p, mx, settings)?;
    let stray = knm_to_nmm(resultant(frame, &field).my_knm);
    let scale = mx.abs() + p.abs() * section.width().max(section.height());
    if stray.abs() <= settings.tolerance * scale {
        return Ok((field, iterations));
    }
    log::debug!("horizontal axis leaves My = {stray:.4e} N·mm, inclining it");
    let (field, more) = biaxial::solve(frame, p, mx, 0.0, settings)?;
    Ok((field, iterations + more))
}

fn pure_axial(frame: &Frame, p: f64) -> CalcResult<StressField> {
    if p < 0.0 {
        return Err(CalcError::invalid_geometry(
            "Section fully in tension: no concrete is engaged",
        ));
    }
    Ok(StressField::Uniform {
        sigma: p / frame.homogenized.area_mm2,
    })
}

fn neutral_axis(frame: &Frame, field: &StressField) -> NeutralAxis {
    match *field {
        StressField::Uniform { .. } => NeutralAxis::Uniform,
        StressField::Uncracked(ref f) => {
            let gradient = f.alpha.hypot(f.beta);
            if gradient == 0.0 {
                return NeutralAxis::Uniform;
            }
            NeutralAxis::OutsideSection {
                depth_mm: frame.max_concrete_stress(field) / gradient,
                angle_deg: f.alpha.atan2(-f.beta).to_degrees(),
            }
        }
        StressField::Cracked { theta, c, .. } => {
            let (w_min, _) = frame.w_range(theta);
            let deg = theta.to_degrees().rem_euclid(360.0);
            NeutralAxis::Interior {
                depth_mm: c - w_min,
                angle_deg: if deg > 180.0 { deg - 360.0 } else { deg },
            }
        }
    }
}

fn assemble(
    frame: &Frame,
    field: &StressField,
    materials: &Materials,
    iterations: usize,
    settings: &SolverSettings,
) -> EquilibriumResult {
    let ec = materials.concrete.elastic_modulus_mpa;
    let es = materials.steel.elastic_modulus_mpa;

    let bars: Vec<BarStress> = frame
        .bars
        .iter()
        .map(|b| {
            let stress_mpa = -frame.n * frame.stress_at(field, b.z, b.y);
            BarStress {
                z_mm: b.z,
                y_mm: b.y,
                area_mm2: b.area_mm2,
                role: b.role,
                stress_mpa,
                strain: stress_mpa / es,
            }
        })
        .collect();

    let concrete = frame.max_concrete_stress(field);
    let steel_t = bars.iter().map(|b| b.stress_mpa).fold(0.0, f64::max);
    let steel_c = bars.iter().map(|b| -b.stress_mpa).fold(0.0, f64::max);

    let limits = match field {
        StressField::Uniform { .. } => AdmissibleLimits::axial(materials),
        _ => AdmissibleLimits::flexural(materials),
    };

    EquilibriumResult {
        neutral_axis: neutral_axis(frame, field),
        modular_ratio: frame.n,
        concrete_max_compression_mpa: concrete,
        concrete_max_strain: concrete / ec,
        steel_max_tension_mpa: steel_t,
        steel_max_tension_strain: steel_t / es,
        steel_max_compression_mpa: steel_c,
        bars,
        resultant: resultant(frame, field),
        governing: classify(concrete, steel_t, steel_c, &limits, settings.balance_tolerance),
        iterations,
    }
}

fn resultant(frame: &Frame, field: &StressField) -> InternalForces {
    let h = &frame.homogenized;
    let (p, mx, my) = match *field {
        StressField::Uniform { sigma } => (sigma * h.area_mm2, 0.0, 0.0),
        StressField::Uncracked(f) => (
            f.sigma0 * h.area_mm2,
            -(f.alpha * h.ixy_mm4 + f.beta * h.ix_mm4),
            f.alpha * h.iy_mm4 + f.beta * h.ixy_mm4,
        ),
        StressField::Cracked { theta, c, k } => {
            let r = frame.response(theta, c);
            (k * r.force, k * r.mx, k * r.my)
        }
    };
    InternalForces {
        axial_kn: -n_to_kn(p),
        mx_knm: nmm_to_knm(mx),
        my_knm: nmm_to_knm(my),
        shear_kn: 0.0,
    }
}
