//! # Verification Engines
//!
//! Each engine follows the same pattern:
//!
//! - `*Input` - section, materials, forces and options (JSON-serializable)
//! - `calculate(&input) -> CalcResult<VerificationResult>`
//!
//! A check that is not satisfied is a normal result with `passes == false`;
//! errors are reserved for bad input and numerical failures.
//!
//! ## Available Checks
//!
//! - [`flexure`] - bending with axial force, resisting moment, inverse sizing
//! - [`shear`] - concrete, stirrup and bent-bar contributions, stirrup spacing
//! - [`column`] - straight pressoflexure with slenderness and minimum eccentricity
//! - [`biaxial`] - deviated pressoflexure with the power-law interaction

pub mod biaxial;
pub mod column;
pub mod flexure;
pub mod shear;

pub use biaxial::{BiaxialDetails, BiaxialInput};
pub use column::{ColumnDetails, ColumnInput};
pub use flexure::{FlexureDetails, FlexureInput, SizingInput, SizingResult};
pub use shear::{ShearDetails, ShearInput, StirrupDesign};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{CalcError, CalcResult};
use crate::materials::Materials;
use crate::section::Section;
use crate::solver::{solve, AdmissibleLimits, InternalForces, SolverSettings};

// =============================================================================
// CALCULATION METHOD
// =============================================================================

/// Historical calculation convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    #[default]
    Santarella,
    Giangreco,
}

/// Empirical coefficients of a [`CalculationMethod`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodCoefficients {
    /// Fraction of the admissible concrete shear stress counted in the
    /// concrete contribution
    pub shear_concrete_fraction: f64,
    /// Exponent α of (Mx/Mrx)^α + (My/Mry)^α ≤ 1
    pub interaction_exponent: f64,
}

impl CalculationMethod {
    pub const ALL: [CalculationMethod; 2] = [CalculationMethod::Santarella, CalculationMethod::Giangreco];

    pub fn display_name(&self) -> &'static str {
        match self {
            CalculationMethod::Santarella => "Santarella",
            CalculationMethod::Giangreco => "Giangreco",
        }
    }

    /// Parse a method name, ignoring case
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "santarella" => Ok(CalculationMethod::Santarella),
            "giangreco" => Ok(CalculationMethod::Giangreco),
            _ => Err(CalcError::invalid_input(
                "method",
                s,
                "Expected \"santarella\" or \"giangreco\"",
            )),
        }
    }

    pub fn coefficients(&self) -> MethodCoefficients {
        match self {
            CalculationMethod::Santarella => MethodCoefficients {
                shear_concrete_fraction: 1.0,
                interaction_exponent: 1.5,
            },
            CalculationMethod::Giangreco => MethodCoefficients {
                shear_concrete_fraction: 0.8,
                interaction_exponent: 2.0,
            },
        }
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// =============================================================================
// COMMON RESULT
// =============================================================================

/// Which engine produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckKind {
    Flexure,
    Shear,
    Column,
    Biaxial,
}

/// One actual-vs-admissible stress comparison (MPa).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressCheck {
    pub label: String,
    pub actual_mpa: f64,
    pub admissible_mpa: f64,
}

impl StressCheck {
    pub fn new(label: impl Into<String>, actual_mpa: f64, admissible_mpa: f64) -> Self {
        Self {
            label: label.into(),
            actual_mpa,
            admissible_mpa,
        }
    }

    /// admissible / actual, `None` when unstressed
    pub fn ratio(&self) -> Option<f64> {
        (self.actual_mpa > 0.0).then(|| self.admissible_mpa / self.actual_mpa)
    }

    pub fn passes(&self) -> bool {
        self.actual_mpa <= self.admissible_mpa
    }
}

/// Engine-specific numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CheckDetails {
    Flexure(FlexureDetails),
    Shear(ShearDetails),
    Column(ColumnDetails),
    Biaxial(BiaxialDetails),
}

/// Outcome of one verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub label: String,
    pub check: CheckKind,
    pub method: CalculationMethod,
    pub passes: bool,
    /// Demanded action (kN·m for bending checks, kN for shear)
    pub demand: f64,
    /// Resisting action in the same unit, when defined
    pub capacity: Option<f64>,
    /// Smallest admissible/actual (or capacity/demand) ratio; `None` when unstressed
    pub safety_ratio: Option<f64>,
    pub stresses: Vec<StressCheck>,
    pub summary: String,
    pub details: CheckDetails,
}

impl VerificationResult {
    /// Largest actual/admissible ratio, 0 when unstressed
    pub fn utilization(&self) -> f64 {
        self.safety_ratio.map_or(0.0, |r| 1.0 / r)
    }
}

/// Minimum ratio over the stressed checks
pub(crate) fn min_ratio(checks: &[StressCheck]) -> Option<f64> {
    checks.iter().filter_map(StressCheck::ratio).reduce(f64::min)
}

pub(crate) fn summary_line(label: &str, passes: bool, safety_ratio: Option<f64>, governing: &str) -> String {
    let verdict = if passes { "OK" } else { "NOT VERIFIED" };
    match safety_ratio {
        Some(r) => format!("{label}: {verdict} (safety ratio {r:.2}, {governing})"),
        None => format!("{label}: {verdict} (unstressed)"),
    }
}

// =============================================================================
// RESISTING MOMENT
// =============================================================================

/// Bending moment (kN·m, magnitude) at which the first admissible stress is
/// reached under a fixed axial force, about the horizontal axis.
///
/// `positive` selects the sign of the moment (top or bottom fibre compressed).
/// Returns `None` for axial tension, where the resisting moment is not
/// defined in this model.
pub fn resisting_moment(
    section: &Section,
    materials: &Materials,
    axial_kn: f64,
    positive: bool,
    settings: &SolverSettings,
) -> CalcResult<Option<f64>> {
    if axial_kn > 0.0 {
        return Ok(None);
    }
    let limits = AdmissibleLimits::flexural(materials);
    let sign = if positive { 1.0 } else { -1.0 };
    let utilization = |m: f64| -> CalcResult<f64> {
        let eq = solve(section, materials, &InternalForces::combined(axial_kn, sign * m), settings)?;
        Ok(eq
            .governing_for(&limits, settings.balance_tolerance)
            .map_or(0.0, |g| 1.0 / g.multiplier))
    };

    // stresses are proportional to the moment in pure bending
    if axial_kn == 0.0 {
        let u = utilization(1.0)?;
        return Ok(Some(if u > 0.0 { 1.0 / u } else { 0.0 }));
    }

    if utilization(0.0)? >= 1.0 {
        return Ok(Some(0.0));
    }
    let mut lo = 0.0;
    let mut hi = axial_kn.abs().max(1.0) * section.height() / 1000.0;
    let mut doublings = 0;
    while utilization(hi)? < 1.0 {
        lo = hi;
        hi *= 2.0;
        doublings += 1;
        if doublings > 60 {
            return Err(CalcError::non_convergence("resisting moment bracket", doublings, hi));
        }
    }
    for _ in 0..settings.max_iterations {
        let mid = 0.5 * (lo + hi);
        if utilization(mid)? < 1.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= settings.tolerance.max(1e-9) * hi {
            return Ok(Some(0.5 * (lo + hi)));
        }
    }
    Err(CalcError::non_convergence(
        "resisting moment",
        settings.max_iterations,
        (hi - lo) / hi,
    ))
}
