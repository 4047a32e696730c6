//! Bending about the horizontal axis, with or without axial force.
//!
//! The neutral axis stays horizontal; a negative moment compresses the bottom
//! fibre (`θ = π`).

use std::f64::consts::PI;

use crate::equations::historical::{cracked_rectangle_neutral_axis, cracked_tee_neutral_axis};
use crate::errors::{CalcError, CalcResult};
use crate::section::{Section, Shape};

use super::frame::{direction, Frame, StressField};
use super::SolverSettings;

/// Reclassification passes before the closed form gives up
const MAX_CLASSIFICATION_PASSES: usize = 8;

/// Compressed band for which a closed-form depth exists.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ClosedForm {
    Rectangle { width: f64 },
    Tee { flange_width: f64, flange_thickness: f64, web_width: f64 },
}

fn closed_form(section: &Section, theta: f64) -> Option<ClosedForm> {
    match *section.shape() {
        // any quarter turn of a rectangle is still a rectangle
        Shape::Rectangular { .. } => Some(ClosedForm::Rectangle {
            width: section.width(),
        }),
        Shape::Tee { .. } if section.quarter_turns() == 0 && theta == 0.0 => {
            section.shape().as_flanged().map(|(b, t, bw)| ClosedForm::Tee {
                flange_width: b,
                flange_thickness: t,
                web_width: bw,
            })
        }
        _ => None,
    }
}

/// Lumped `(area, depth)` of the bars above and below `x`
fn lumped(bars: &[(f64, f64)], x: f64) -> ((f64, f64), (f64, f64)) {
    let mut comp = (0.0, 0.0);
    let mut tens = (0.0, 0.0);
    for &(t, a) in bars {
        let acc = if t < x { &mut comp } else { &mut tens };
        acc.0 += a;
        acc.1 += a * t;
    }
    let depth = |(a, s): (f64, f64)| if a > 0.0 { s / a } else { 0.0 };
    ((comp.0, depth(comp)), (tens.0, depth(tens)))
}

/// Pure-flexure depth from the quadratic, bars given as `(depth, area)`
/// measured from the compressed edge.
fn closed_form_depth(form: ClosedForm, bars: &[(f64, f64)], n: f64, height: f64) -> Option<f64> {
    let depth_for = |x_guess: f64| {
        let ((ac, dc), (at, d)) = lumped(bars, x_guess);
        if at <= 0.0 {
            return None;
        }
        Some(match form {
            ClosedForm::Rectangle { width } => cracked_rectangle_neutral_axis(width, d, at, ac, dc, n),
            ClosedForm::Tee {
                flange_width,
                flange_thickness,
                web_width,
            } => {
                let x = cracked_rectangle_neutral_axis(flange_width, d, at, ac, dc, n);
                if x <= flange_thickness {
                    x
                } else {
                    cracked_tee_neutral_axis(flange_width, flange_thickness, web_width, d, at, ac, dc, n)
                }
            }
        })
    };

    // start with every bar in tension
    let mut x = depth_for(0.0)?;
    for _ in 0..MAX_CLASSIFICATION_PASSES {
        let next = depth_for(x)?;
        let same = bars.iter().all(|&(t, _)| (t < x) == (t < next));
        x = next;
        if same {
            return (x > 0.0 && x < height).then_some(x);
        }
    }
    None
}

/// Solve `P`, `Mx` (N, N·mm; compression positive) with a horizontal axis.
pub(crate) fn solve(
    section: &Section,
    frame: &Frame,
    p: f64,
    mx: f64,
    settings: &SolverSettings,
) -> CalcResult<(StressField, usize)> {
    let (theta, phi) = if mx > 0.0 { (0.0, 0.0) } else { (PI, PI) };
    let md = mx.abs();

    let linear = frame.linear_field(p, mx, 0.0, true);
    if p > 0.0 && frame.min_stress(&linear) >= 0.0 {
        log::debug!("uniaxial: section fully compressed");
        return Ok((StressField::Uncracked(linear), 0));
    }

    let (w_min, _) = frame.w_range(theta);

    if p == 0.0 {
        if let Some(form) = closed_form(section, theta) {
            let (dz, dy) = direction(theta);
            let bars: Vec<(f64, f64)> = frame
                .bars
                .iter()
                .map(|b| (dz * b.z + dy * b.y - w_min, b.area_mm2))
                .collect();
            if let Some(x) = closed_form_depth(form, &bars, frame.n, section.height()) {
                let along = frame.response(theta, w_min + x).along(phi);
                if along > 0.0 {
                    log::debug!("uniaxial: closed-form depth {x:.3} mm ({form:?})");
                    return Ok((
                        StressField::Cracked {
                            theta,
                            c: w_min + x,
                            k: md / along,
                        },
                        0,
                    ));
                }
            }
        }
    }

    let root = frame.solve_depth(theta, p, md, phi, settings)?.ok_or_else(|| {
        CalcError::invalid_geometry(
            "No neutral-axis position balances the demand: section fully in tension or no tension steel",
        )
    })?;
    let along = root.response.along(phi);
    if along <= 0.0 {
        return Err(CalcError::invalid_geometry(
            "Compressed zone cannot resist the bending moment",
        ));
    }
    log::debug!(
        "uniaxial: depth {:.3} mm after {} iterations",
        root.c - w_min,
        root.iterations
    );
    Ok((
        StressField::Cracked {
            theta,
            c: root.c,
            k: md / along,
        },
        root.iterations,
    ))
}
