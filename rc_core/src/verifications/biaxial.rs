//! # Biaxial Verification (deviated pressoflexure)
//!
//! Axial compression with moments about both axes. Two criteria must hold:
//!
//! - the stresses of the inclined-axis solution stay within the admissibles
//! - the power-law interaction of the uniaxial capacities
//!
//! ```text
//! (|Mx| / Mrx)^α + (|My| / Mry)^α ≤ 1
//! ```
//!
//! `Mrx` and `Mry` are resisting moments at the same axial force, computed
//! independently; `Mry` on the section turned a quarter so that the right
//! fibre becomes the top. `α` comes from the calculation method.

use serde::{Deserialize, Serialize};

use super::{min_ratio, resisting_moment, summary_line, CalculationMethod, CheckDetails, CheckKind, StressCheck, VerificationResult};
use crate::errors::{CalcError, CalcResult};
use crate::materials::Materials;
use crate::section::Section;
use crate::solver::{solve, AdmissibleLimits, GoverningMaterial, InternalForces, NeutralAxis, SolverSettings};

fn default_label() -> String {
    "Biaxial".to_string()
}

/// Input for a biaxial check.
///
/// ## JSON Example
///
/// ```json
/// {
///   "section": { "shape": { "kind": "rectangular", "width_mm": 400, "height_mm": 400 }, "bars": [ ... ] },
///   "materials": { ... },
///   "forces": { "axial_kn": -500.0, "mx_knm": 40.0, "my_knm": 30.0 },
///   "method": "giangreco"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiaxialInput {
    #[serde(default = "default_label")]
    pub label: String,
    pub section: Section,
    pub materials: Materials,
    pub forces: InternalForces,
    #[serde(default)]
    pub method: CalculationMethod,
    #[serde(default)]
    pub settings: SolverSettings,
}

impl BiaxialInput {
    pub fn new(section: Section, materials: Materials, forces: InternalForces, method: CalculationMethod) -> Self {
        Self {
            label: default_label(),
            section,
            materials,
            forces,
            method,
            settings: SolverSettings::default(),
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        self.materials.validate()?;
        self.forces.validate()?;
        if self.forces.axial_kn > 0.0 {
            return Err(CalcError::invalid_input(
                "axial_kn",
                self.forces.axial_kn.to_string(),
                "Resisting moments are not defined under axial tension",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiaxialDetails {
    pub neutral_axis: NeutralAxis,
    pub modular_ratio: f64,
    pub concrete_stress_mpa: f64,
    pub steel_tension_mpa: f64,
    pub steel_compression_mpa: f64,
    pub governing: Option<GoverningMaterial>,
    pub resisting_mx_knm: f64,
    pub resisting_my_knm: f64,
    pub interaction_exponent: f64,
    /// Left-hand side of the interaction formula
    pub interaction: f64,
    pub iterations: usize,
}

/// `(M / Mr)^α`, unbounded when a moment meets no capacity
fn interaction_term(moment: f64, resisting: f64, exponent: f64) -> f64 {
    if moment == 0.0 {
        0.0
    } else if resisting <= 0.0 {
        f64::MAX
    } else {
        (moment / resisting).powf(exponent)
    }
}

/// Verify a section under axial force and two moments.
pub fn calculate(input: &BiaxialInput) -> CalcResult<VerificationResult> {
    input.validate()?;
    let section = &input.section;
    let materials = &input.materials;
    let forces = &input.forces;
    let alpha = input.method.coefficients().interaction_exponent;
    let limits = AdmissibleLimits::flexural(materials);

    let eq = solve(section, materials, forces, &input.settings)?;
    let mut stresses = vec![
        StressCheck::new("Concrete compression", eq.concrete_max_compression_mpa, limits.concrete_mpa),
        StressCheck::new("Steel tension", eq.steel_max_tension_mpa, limits.steel_tension_mpa),
    ];
    if eq.steel_max_compression_mpa > 0.0 {
        stresses.push(StressCheck::new(
            "Steel compression",
            eq.steel_max_compression_mpa,
            limits.steel_compression_mpa,
        ));
    }

    // validate() rules out tension, so both capacities exist
    let mrx = resisting_moment(section, materials, forces.axial_kn, forces.mx_knm >= 0.0, &input.settings)?
        .unwrap_or(0.0);
    let mry = resisting_moment(
        &section.rotated(),
        materials,
        forces.axial_kn,
        forces.my_knm >= 0.0,
        &input.settings,
    )?
    .unwrap_or(0.0);

    let interaction =
        interaction_term(forces.mx_knm.abs(), mrx, alpha) + interaction_term(forces.my_knm.abs(), mry, alpha);
    log::debug!(
        "biaxial ({}): Mrx={mrx:.2} Mry={mry:.2} kN·m, interaction {interaction:.4}",
        input.method
    );

    let stresses_pass = stresses.iter().all(StressCheck::passes);
    let passes = stresses_pass && interaction <= 1.0;

    // moments scaled by k change the interaction by k^α
    let interaction_ratio = (interaction > 0.0).then(|| interaction.powf(-1.0 / alpha));
    let safety_ratio = match (min_ratio(&stresses), interaction_ratio) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    let governing = if interaction_ratio.is_some_and(|r| min_ratio(&stresses).map_or(true, |s| r < s)) {
        "interaction"
    } else {
        eq.governing_for(&limits, input.settings.balance_tolerance)
            .map_or("no stress", |g| g.material.display_name())
    };

    let demand = forces.mx_knm.hypot(forces.my_knm);
    Ok(VerificationResult {
        label: input.label.clone(),
        check: CheckKind::Biaxial,
        method: input.method,
        passes,
        demand,
        capacity: interaction_ratio.map(|r| demand * r),
        safety_ratio,
        summary: summary_line(&input.label, passes, safety_ratio, governing),
        stresses,
        details: CheckDetails::Biaxial(BiaxialDetails {
            neutral_axis: eq.neutral_axis,
            modular_ratio: eq.modular_ratio,
            concrete_stress_mpa: eq.concrete_max_compression_mpa,
            steel_tension_mpa: eq.steel_max_tension_mpa,
            steel_compression_mpa: eq.steel_max_compression_mpa,
            governing: eq
                .governing_for(&limits, input.settings.balance_tolerance)
                .map(|g| g.material),
            resisting_mx_knm: mrx,
            resisting_my_knm: mry,
            interaction_exponent: alpha,
            interaction,
            iterations: eq.iterations,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{CementType, Concrete, Steel, SteelGrade};
    use crate::section::{BarPlacement, BarRole, ReinforcementBar, Shape};
    use approx::assert_relative_eq;

    fn materials() -> Materials {
        Materials::new(
            Concrete::from_resistance(CementType::Normal, 280.0).unwrap(),
            Steel::from_grade(SteelGrade::Mild).unwrap(),
        )
    }

    /// 400×400 with 8 bars symmetric about both axes
    fn square_column() -> Section {
        let mut s = Section::new(Shape::Rectangular {
            width_mm: 400.0,
            height_mm: 400.0,
        })
        .unwrap();
        for depth in [50.0, 350.0] {
            s.add_bar(ReinforcementBar {
                diameter_mm: 20.0,
                count: 3,
                role: BarRole::Tension,
                placement: Some(BarPlacement::Row {
                    depth_mm: depth,
                    spread_mm: Some([50.0, 350.0]),
                }),
            })
            .unwrap();
        }
        for offset in [50.0, 350.0] {
            s.add_bar(ReinforcementBar {
                diameter_mm: 20.0,
                count: 1,
                role: BarRole::Tension,
                placement: Some(BarPlacement::Column {
                    offset_mm: offset,
                    spread_mm: Some([200.0, 200.0]),
                }),
            })
            .unwrap();
        }
        s
    }

    fn details(r: &VerificationResult) -> &BiaxialDetails {
        match &r.details {
            CheckDetails::Biaxial(d) => d,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_symmetric_section_has_equal_capacities() {
        let input = BiaxialInput::new(
            square_column(),
            materials(),
            InternalForces::biaxial(-500.0, 30.0, 20.0),
            CalculationMethod::Santarella,
        );
        let r = calculate(&input).unwrap();
        let d = details(&r);
        assert_relative_eq!(d.resisting_mx_knm, d.resisting_my_knm, max_relative = 1e-6);
        let expected = (30.0 / d.resisting_mx_knm).powf(1.5) + (20.0 / d.resisting_my_knm).powf(1.5);
        assert_relative_eq!(d.interaction, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_method_changes_the_exponent() {
        let forces = InternalForces::biaxial(-500.0, 30.0, 20.0);
        let s = calculate(&BiaxialInput::new(square_column(), materials(), forces, CalculationMethod::Santarella)).unwrap();
        let g = calculate(&BiaxialInput::new(square_column(), materials(), forces, CalculationMethod::Giangreco)).unwrap();
        assert_eq!(details(&s).interaction_exponent, 1.5);
        assert_eq!(details(&g).interaction_exponent, 2.0);
        // below the capacities a higher exponent gives a smaller interaction
        assert!(details(&g).interaction < details(&s).interaction);
        // the stress solution does not depend on the method
        assert_relative_eq!(details(&g).concrete_stress_mpa, details(&s).concrete_stress_mpa);
    }

    #[test]
    fn test_overload_fails_interaction() {
        let input = BiaxialInput::new(
            square_column(),
            materials(),
            InternalForces::biaxial(-500.0, 150.0, 150.0),
            CalculationMethod::Santarella,
        );
        let r = calculate(&input).unwrap();
        assert!(!r.passes);
        assert!(details(&r).interaction > 1.0);
        assert!(r.safety_ratio.unwrap() < 1.0);
    }

    #[test]
    fn test_interaction_term_edges() {
        assert_eq!(interaction_term(0.0, 0.0, 2.0), 0.0);
        assert_eq!(interaction_term(5.0, 0.0, 2.0), f64::MAX);
        assert_relative_eq!(interaction_term(5.0, 10.0, 2.0), 0.25);
    }

    #[test]
    fn test_tension_rejected() {
        let input = BiaxialInput::new(
            square_column(),
            materials(),
            InternalForces::biaxial(50.0, 10.0, 10.0),
            CalculationMethod::Santarella,
        );
        assert_eq!(calculate(&input).unwrap_err().error_code(), "INVALID_INPUT");
    }
}
