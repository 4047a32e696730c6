//! Worked cases and cross-module consistency checks.

use approx::assert_relative_eq;
use rc_core::materials::{CementType, Concrete, Materials, Steel, SteelGrade};
use rc_core::section::{BarPlacement, BarRole, ReinforcementBar, Section, Shape};
use rc_core::solver::{solve, InternalForces, NeutralAxis, SolverSettings};
use rc_core::tables::mortar::mortar_mix;
use rc_core::verifications::{
    biaxial, flexure, shear, BiaxialInput, CalculationMethod, CheckDetails, FlexureInput, ShearInput,
};

fn materials() -> Materials {
    Materials::new(
        Concrete::from_table(CementType::Normal, 0.50).unwrap(),
        Steel::from_grade(SteelGrade::Mild).unwrap(),
    )
}

/// 300×500, 4Ø16 at cover 30 (d = 500 − 30 − 8), n = 10
fn scenario_a_section() -> Section {
    let mut s = Section::new(Shape::Rectangular {
        width_mm: 300.0,
        height_mm: 500.0,
    })
    .unwrap();
    s.add_layer(16.0, 4, 462.0, BarRole::Tension).unwrap();
    s.set_modular_ratio(Some(10.0)).unwrap();
    s
}

fn depth(axis: &NeutralAxis) -> f64 {
    match axis {
        NeutralAxis::Interior { depth_mm, .. } => *depth_mm,
        other => panic!("expected a cracked section, got {other:?}"),
    }
}

// =============================================================================
// WORKED SCENARIOS
// =============================================================================

#[test]
fn scenario_a_rectangular_beam_neutral_axis() {
    let s = scenario_a_section();
    let eq = solve(&s, &materials(), &InternalForces::bending(30.0), &SolverSettings::default()).unwrap();
    let x = depth(&eq.neutral_axis);
    assert!(x > 130.0 && x < 150.0, "x = {x}");

    // b·x²/2 = n·As·(d − x)
    let as_ = 4.0 * std::f64::consts::PI * 8.0 * 8.0;
    assert_relative_eq!(300.0 * x * x / 2.0, 10.0 * as_ * (462.0 - x), max_relative = 1e-9);
}

fn scenario_a_flexure(m_knm: f64) -> rc_core::verifications::VerificationResult {
    let input = FlexureInput {
        label: "A".into(),
        section: scenario_a_section(),
        materials: materials(),
        forces: InternalForces::bending(m_knm),
        settings: SolverSettings::default(),
    };
    flexure::calculate(&input).unwrap()
}

#[test]
fn scenario_a_at_80_knm_is_overstressed() {
    // x = 132.85, z = d − x/3 = 417.72
    let result = scenario_a_flexure(80.0);
    let CheckDetails::Flexure(details) = &result.details else {
        panic!("wrong details");
    };
    assert_relative_eq!(depth(&details.neutral_axis), 132.846, max_relative = 1e-4);
    assert_relative_eq!(details.concrete_stress_mpa, 9.611, max_relative = 1e-3);
    assert_relative_eq!(details.steel_tension_mpa, 238.13, max_relative = 1e-3);

    assert!(!result.passes);
    assert_eq!(result.stresses.len(), 2);
    let concrete = result.stresses[0].ratio().unwrap();
    let steel = result.stresses[1].ratio().unwrap();
    assert!(concrete < steel && steel < 1.0, "concrete {concrete}, steel {steel}");
    assert_relative_eq!(concrete, 0.4082, max_relative = 2e-3);
    assert_relative_eq!(steel, 0.5766, max_relative = 2e-3);
    assert_relative_eq!(result.safety_ratio.unwrap(), concrete, max_relative = 1e-12);
    // first binding is on the concrete, well below the demand
    let capacity = result.capacity.unwrap();
    assert!(capacity > 30.0 && capacity < 35.0, "Mr = {capacity}");
}

#[test]
fn scenario_a_at_30_knm_passes() {
    let result = scenario_a_flexure(30.0);
    assert!(result.passes);
    assert_eq!(result.stresses.len(), 2);
    for check in &result.stresses {
        assert!(check.ratio().unwrap() >= 1.0, "{}: {:?}", check.label, check.ratio());
    }
    assert_relative_eq!(result.stresses[0].ratio().unwrap(), 1.088, max_relative = 2e-3);
    assert_relative_eq!(result.stresses[1].ratio().unwrap(), 1.537, max_relative = 2e-3);
}

#[test]
fn scenario_b_mortar_interpolation() {
    let low = mortar_mix(1.85).unwrap();
    let high = mortar_mix(2.30).unwrap();
    let mid = mortar_mix(2.00).unwrap();
    let t = (2.00 - 1.85) / (2.30 - 1.85);
    assert_relative_eq!(mid.cement_kg, low.cement_kg + t * (high.cement_kg - low.cement_kg), epsilon = 1e-9);
    assert_relative_eq!(mid.sand_kg, low.sand_kg + t * (high.sand_kg - low.sand_kg), epsilon = 1e-9);
    assert!(mid.cement_kg < low.cement_kg && mid.cement_kg > high.cement_kg);
}

#[test]
fn scenario_c_shear_without_reinforcement_fails() {
    let input = ShearInput::new(scenario_a_section(), materials(), 100.0, CalculationMethod::Santarella);
    let result = shear::calculate(&input).unwrap();
    let CheckDetails::Shear(details) = &result.details else {
        panic!("wrong details");
    };
    assert_eq!(details.stirrups_kn, 0.0);
    assert_eq!(details.bent_bars_kn, 0.0);
    assert!(details.concrete_kn < 100.0);
    assert!(!result.passes);
    assert!(result.safety_ratio.unwrap() < 1.0);
}

// =============================================================================
// EQUILIBRIUM
// =============================================================================

#[test]
fn cracked_solution_balances_the_applied_forces() {
    let mut s = Section::new(Shape::Rectangular {
        width_mm: 300.0,
        height_mm: 500.0,
    })
    .unwrap();
    s.add_layer(16.0, 2, 40.0, BarRole::Compression).unwrap();
    s.add_layer(16.0, 4, 460.0, BarRole::Tension).unwrap();
    s.set_modular_ratio(Some(10.0)).unwrap();

    let (n_kn, m_knm) = (-200.0, 60.0);
    let eq = solve(&s, &materials(), &InternalForces::combined(n_kn, m_knm), &SolverSettings::default()).unwrap();
    let x = depth(&eq.neutral_axis);
    let n = eq.modular_ratio;
    let yc = s.homogenized(n).centroid_from_top_mm;

    // triangular concrete block over the full width
    let c = eq.concrete_max_compression_mpa * 300.0 * x / 2.0;
    let mut force = c;
    let mut moment = c * (yc - x / 3.0);
    for bar in &eq.bars {
        // compressed bars replace concrete already counted in the block
        let f = if bar.stress_mpa < 0.0 {
            -bar.stress_mpa * bar.area_mm2 * (n - 1.0) / n
        } else {
            -bar.stress_mpa * bar.area_mm2
        };
        force += f;
        moment += f * (yc - bar.y_mm);
    }
    assert_relative_eq!(force, -n_kn * 1e3, max_relative = 1e-6);
    assert_relative_eq!(moment, m_knm * 1e6, max_relative = 1e-6);
}

fn ring(diameter_mm: f64, count: u32, radius_mm: f64) -> ReinforcementBar {
    ReinforcementBar {
        diameter_mm,
        count,
        role: BarRole::Tension,
        placement: Some(BarPlacement::Ring {
            radius_mm,
            start_deg: 0.0,
        }),
    }
}

/// One reinforced section per shape.
fn every_shape() -> Vec<(&'static str, Section)> {
    let cases = [
        (
            Shape::Rectangular {
                width_mm: 300.0,
                height_mm: 500.0,
            },
            vec![
                ReinforcementBar::row(16.0, 2, 40.0, BarRole::Compression),
                ReinforcementBar::row(16.0, 4, 460.0, BarRole::Tension),
            ],
        ),
        (
            Shape::Tee {
                flange_width_mm: 800.0,
                flange_thickness_mm: 120.0,
                web_width_mm: 250.0,
                height_mm: 600.0,
            },
            vec![
                ReinforcementBar::row(12.0, 4, 40.0, BarRole::Compression),
                ReinforcementBar::row(20.0, 4, 560.0, BarRole::Tension),
            ],
        ),
        (
            Shape::IShape {
                top_flange_width_mm: 600.0,
                top_flange_thickness_mm: 120.0,
                web_width_mm: 150.0,
                bottom_flange_width_mm: 400.0,
                bottom_flange_thickness_mm: 150.0,
                height_mm: 900.0,
            },
            vec![
                ReinforcementBar::row(12.0, 4, 50.0, BarRole::Compression),
                ReinforcementBar::row(20.0, 4, 850.0, BarRole::Tension),
            ],
        ),
        (
            Shape::LShape {
                width_mm: 500.0,
                height_mm: 600.0,
                leg_thickness_mm: 200.0,
                flange_thickness_mm: 150.0,
            },
            vec![
                ReinforcementBar::row(16.0, 2, 40.0, BarRole::Compression),
                ReinforcementBar::row(20.0, 3, 560.0, BarRole::Tension),
            ],
        ),
        (
            Shape::UShape {
                width_mm: 800.0,
                height_mm: 500.0,
                wall_thickness_mm: 120.0,
                base_thickness_mm: 150.0,
            },
            vec![
                ReinforcementBar::row(16.0, 4, 40.0, BarRole::Compression),
                ReinforcementBar::row(20.0, 5, 460.0, BarRole::Tension),
            ],
        ),
        (
            Shape::BoxShape {
                width_mm: 1000.0,
                height_mm: 800.0,
                wall_thickness_mm: 150.0,
                top_thickness_mm: 180.0,
                bottom_thickness_mm: 150.0,
            },
            vec![
                ReinforcementBar::row(16.0, 6, 50.0, BarRole::Compression),
                ReinforcementBar::row(16.0, 2, 400.0, BarRole::Compression),
                ReinforcementBar::row(20.0, 6, 750.0, BarRole::Tension),
            ],
        ),
        (Shape::Circular { diameter_mm: 500.0 }, vec![ring(16.0, 8, 190.0)]),
        (
            Shape::HollowCircular {
                outer_diameter_mm: 800.0,
                inner_diameter_mm: 500.0,
            },
            vec![ring(16.0, 12, 325.0)],
        ),
    ];
    cases
        .into_iter()
        .map(|(shape, bars)| {
            let name = shape.display_name();
            let mut section = Section::new(shape).unwrap();
            for bar in bars {
                section.add_bar(bar).unwrap();
            }
            section.set_modular_ratio(Some(10.0)).unwrap();
            (name, section)
        })
        .collect()
}

#[test]
fn every_shape_balances_straight_and_inclined_loads() {
    let loads = [
        InternalForces::bending(60.0),
        InternalForces::bending(-45.0),
        InternalForces::combined(-300.0, 80.0),
        InternalForces::biaxial(-250.0, 50.0, 30.0),
        InternalForces::biaxial(-150.0, -40.0, 25.0),
    ];
    let m = materials();
    for (name, section) in every_shape() {
        for load in &loads {
            let eq = solve(&section, &m, load, &SolverSettings::default())
                .unwrap_or_else(|e| panic!("{name} under {load:?}: {e}"));
            let r = &eq.resultant;
            let tol = 1e-6 * (load.axial_kn.abs() + load.mx_knm.abs() + load.my_knm.abs());
            for (what, got, want) in [
                ("N", r.axial_kn, load.axial_kn),
                ("Mx", r.mx_knm, load.mx_knm),
                ("My", r.my_knm, load.my_knm),
            ] {
                assert!(
                    (got - want).abs() <= tol,
                    "{name} under {load:?}: {what} resultant {got} vs demand {want}"
                );
            }
        }
    }
}

#[test]
fn pure_axial_load_gives_uniform_stress() {
    let mut s = Section::new(Shape::Rectangular {
        width_mm: 400.0,
        height_mm: 400.0,
    })
    .unwrap();
    s.add_layer(20.0, 3, 50.0, BarRole::Compression).unwrap();
    s.add_layer(20.0, 3, 350.0, BarRole::Compression).unwrap();
    let m = materials();
    let eq = solve(&s, &m, &InternalForces::combined(-800.0, 0.0), &SolverSettings::default()).unwrap();

    assert_eq!(eq.neutral_axis, NeutralAxis::Uniform);
    assert_eq!(eq.iterations, 0);
    let sigma = 800e3 / s.homogenized(eq.modular_ratio).area_mm2;
    assert_relative_eq!(eq.concrete_max_compression_mpa, sigma, max_relative = 1e-12);
    for bar in &eq.bars {
        assert_relative_eq!(bar.stress_mpa, -eq.modular_ratio * sigma, max_relative = 1e-12);
    }
}

#[test]
fn pure_axial_tension_is_invalid_geometry() {
    let err = solve(
        &scenario_a_section(),
        &materials(),
        &InternalForces::combined(50.0, 0.0),
        &SolverSettings::default(),
    )
    .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_GEOMETRY");
}

#[test]
fn closed_form_matches_bisection() {
    let s = scenario_a_section();
    let settings = SolverSettings::default();
    let closed = solve(&s, &materials(), &InternalForces::bending(30.0), &settings).unwrap();
    // a negligible axial force takes the bisection path
    let bisected = solve(&s, &materials(), &InternalForces::combined(-1e-6, 30.0), &settings).unwrap();
    assert_eq!(closed.iterations, 0);
    assert!(bisected.iterations > 0);
    assert_relative_eq!(depth(&closed.neutral_axis), depth(&bisected.neutral_axis), max_relative = 1e-6);
    assert_relative_eq!(
        closed.concrete_max_compression_mpa,
        bisected.concrete_max_compression_mpa,
        max_relative = 1e-6
    );
}

#[test]
fn negative_moment_compresses_the_bottom() {
    let mut s = Section::new(Shape::Rectangular {
        width_mm: 300.0,
        height_mm: 500.0,
    })
    .unwrap();
    s.add_layer(16.0, 4, 38.0, BarRole::Tension).unwrap();
    s.set_modular_ratio(Some(10.0)).unwrap();
    let eq = solve(&s, &materials(), &InternalForces::bending(-30.0), &SolverSettings::default()).unwrap();
    let NeutralAxis::Interior { depth_mm, angle_deg } = eq.neutral_axis else {
        panic!("expected a cracked section");
    };
    assert_relative_eq!(angle_deg, 180.0);

    // the hogging section is Scenario A upside down
    let sagging = solve(
        &scenario_a_section(),
        &materials(),
        &InternalForces::bending(30.0),
        &SolverSettings::default(),
    )
    .unwrap();
    assert_relative_eq!(depth_mm, depth(&sagging.neutral_axis), max_relative = 1e-9);
}

// =============================================================================
// ROTATION AND BIAXIAL CONSISTENCY
// =============================================================================

#[test]
fn quarter_turn_swaps_principal_quantities() {
    let s = Section::new(Shape::Tee {
        flange_width_mm: 800.0,
        flange_thickness_mm: 120.0,
        web_width_mm: 250.0,
        height_mm: 600.0,
    })
    .unwrap();
    let r = s.rotated();
    assert_relative_eq!(r.width(), s.height());
    assert_relative_eq!(r.height(), s.width());
    assert_relative_eq!(r.area(), s.area(), max_relative = 1e-12);
    let (ix, iy) = s.second_moment_about_centroid();
    let (rx, ry) = r.second_moment_about_centroid();
    assert_relative_eq!(rx, iy, max_relative = 1e-9);
    assert_relative_eq!(ry, ix, max_relative = 1e-9);

    let full = r.rotated().rotated().rotated();
    assert_eq!(full.quarter_turns(), 0);
    assert_relative_eq!(full.centroid_from_top(), s.centroid_from_top(), max_relative = 1e-9);
}

#[test]
fn biaxial_with_vanishing_second_moment_matches_uniaxial() {
    let mut s = Section::new(Shape::Rectangular {
        width_mm: 400.0,
        height_mm: 400.0,
    })
    .unwrap();
    s.add_layer(20.0, 3, 50.0, BarRole::Compression).unwrap();
    s.add_layer(20.0, 3, 350.0, BarRole::Tension).unwrap();
    let m = materials();
    let settings = SolverSettings::default();

    let uniaxial = solve(&s, &m, &InternalForces::combined(-300.0, 60.0), &settings).unwrap();
    let deviated = solve(&s, &m, &InternalForces::biaxial(-300.0, 60.0, 0.01), &settings).unwrap();
    assert_relative_eq!(
        uniaxial.concrete_max_compression_mpa,
        deviated.concrete_max_compression_mpa,
        max_relative = 1e-2
    );
    assert_relative_eq!(uniaxial.steel_max_tension_mpa, deviated.steel_max_tension_mpa, max_relative = 1e-2);
}

#[test]
fn biaxial_check_runs_both_methods() {
    let mut s = Section::new(Shape::Rectangular {
        width_mm: 400.0,
        height_mm: 500.0,
    })
    .unwrap();
    s.add_layer(20.0, 3, 50.0, BarRole::Compression).unwrap();
    s.add_layer(20.0, 3, 450.0, BarRole::Tension).unwrap();
    let forces = InternalForces::biaxial(-400.0, 40.0, 15.0);
    for method in CalculationMethod::ALL {
        let r = biaxial::calculate(&BiaxialInput::new(s.clone(), materials(), forces, method)).unwrap();
        assert_eq!(r.method, method);
        let CheckDetails::Biaxial(d) = &r.details else {
            panic!("wrong details");
        };
        assert!(d.resisting_mx_knm > d.resisting_my_knm, "deeper axis is stronger");
        assert_eq!(d.interaction_exponent, method.coefficients().interaction_exponent);
    }
}

// =============================================================================
// SOLVER CONTROLS
// =============================================================================

#[test]
fn iteration_cap_reports_non_convergence() {
    let mut s = Section::new(Shape::Circular { diameter_mm: 500.0 }).unwrap();
    s.add_layer(20.0, 3, 420.0, BarRole::Tension).unwrap();
    let settings = SolverSettings {
        max_iterations: 3,
        ..Default::default()
    };
    let err = solve(&s, &materials(), &InternalForces::bending(50.0), &settings).unwrap_err();
    assert_eq!(err.error_code(), "NON_CONVERGENCE");
    assert!(err.is_recoverable());
}

#[test]
fn flexure_result_serializes() {
    let result = flexure::calculate(&FlexureInput {
        label: "B1".to_string(),
        section: scenario_a_section(),
        materials: materials(),
        forces: InternalForces::bending(25.0),
        settings: SolverSettings::default(),
    })
    .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["check"], "Flexure");
    assert_eq!(json["details"]["type"], "Flexure");
    assert_eq!(json["details"]["neutral_axis"]["state"], "interior");
}
