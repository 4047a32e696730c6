//! Deviated bending: two moments, inclined neutral axis.
//!
//! For a trial inclination the depth is solved so that the axial force and the
//! moment component along the demand match; the inclination is then bisected
//! until the internal moment vector is parallel to the demand.

use std::f64::consts::PI;

use crate::errors::{CalcError, CalcResult};

use super::frame::{DepthRoot, Frame, StressField};
use super::SolverSettings;

/// Angular step of the bracket search (rad)
const BRACKET_STEP: f64 = 0.05;

/// Sine of the angle between the internal moment and the demand, at the
/// depth that balances the force; `None` when that depth does not exist or
/// points the wrong way.
fn misalignment(
    frame: &Frame,
    theta: f64,
    p: f64,
    md: f64,
    phi: f64,
    settings: &SolverSettings,
) -> CalcResult<Option<(f64, DepthRoot)>> {
    let root = match frame.solve_depth(theta, p, md, phi, settings)? {
        Some(root) => root,
        None => return Ok(None),
    };
    let r = root.response;
    if r.along(phi) <= 0.0 {
        return Ok(None);
    }
    Ok(Some((r.across(phi) / r.mx.hypot(r.my), root)))
}

/// Solve `P`, `Mx`, `My` (N, N·mm; compression positive).
pub(crate) fn solve(
    frame: &Frame,
    p: f64,
    mx: f64,
    my: f64,
    settings: &SolverSettings,
) -> CalcResult<(StressField, usize)> {
    let md = mx.hypot(my);
    let phi = my.atan2(mx);

    let linear = frame.linear_field(p, mx, my, false);
    if p > 0.0 && frame.min_stress(&linear) >= 0.0 {
        log::debug!("biaxial: section fully compressed");
        return Ok((StressField::Uncracked(linear), 0));
    }

    // the uncracked axis is the starting guess
    let theta0 = linear.alpha.atan2(-linear.beta);
    let mut iterations = 0;

    let first = misalignment(frame, theta0, p, md, phi, settings)?;
    if let Some((g, root)) = first {
        iterations += root.iterations;
        if g.abs() <= settings.tolerance {
            return Ok((cracked(theta0, root, md, phi), iterations));
        }
    }

    // walk outwards on both sides until the misalignment changes sign
    let steps = (PI / BRACKET_STEP).ceil() as usize;
    let mut bracket = None;
    'search: for side in [1.0, -1.0] {
        let mut prev = first.map(|(g, _)| (theta0, g));
        for j in 1..=steps {
            let theta = theta0 + side * BRACKET_STEP * j as f64;
            if let Some((g, root)) = misalignment(frame, theta, p, md, phi, settings)? {
                iterations += root.iterations;
                if let Some((t_prev, g_prev)) = prev {
                    if g_prev.signum() != g.signum() {
                        bracket = Some(((t_prev, g_prev), (theta, g)));
                        break 'search;
                    }
                }
                prev = Some((theta, g));
            }
        }
    }
    let ((mut lo, mut g_lo), (mut hi, _)) = bracket.ok_or_else(|| {
        CalcError::invalid_geometry("No inclined neutral axis balances the demand")
    })?;

    for i in 1..=settings.max_iterations {
        let mid = 0.5 * (lo + hi);
        let (g, root) = misalignment(frame, mid, p, md, phi, settings)?.ok_or_else(|| {
            CalcError::invalid_geometry("Neutral axis lost inside the inclination bracket")
        })?;
        iterations += root.iterations;
        log::trace!("inclination bisection i={i} θ={mid:.6} misalignment={g:.3e}");
        if g.abs() <= settings.tolerance || 0.5 * (hi - lo).abs() <= settings.tolerance {
            log::debug!(
                "biaxial: θ={:.3}° after {} outer / {} total iterations",
                mid.to_degrees(),
                i,
                iterations
            );
            return Ok((cracked(mid, root, md, phi), iterations));
        }
        if g.signum() == g_lo.signum() {
            lo = mid;
            g_lo = g;
        } else {
            hi = mid;
        }
    }
    Err(CalcError::non_convergence(
        "neutral-axis inclination",
        settings.max_iterations,
        (hi - lo).abs(),
    ))
}

fn cracked(theta: f64, root: DepthRoot, md: f64, phi: f64) -> StressField {
    StressField::Cracked {
        theta,
        c: root.c,
        k: md / root.response.along(phi),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{BarPlacement, BarRole, ReinforcementBar, Section, Shape};
    use approx::assert_relative_eq;

    fn column() -> Section {
        let mut s = Section::new(Shape::Rectangular {
            width_mm: 400.0,
            height_mm: 400.0,
        })
        .unwrap();
        s.add_layer(20.0, 3, 50.0, BarRole::Compression).unwrap();
        s.add_layer(20.0, 3, 350.0, BarRole::Tension).unwrap();
        s
    }

    #[test]
    fn test_resultant_parallel_to_demand() {
        let s = column();
        let frame = Frame::new(&s, 15.0);
        let (p, mx, my) = (200e3, 80e6, 50e6);
        let (field, _) = solve(&frame, p, mx, my, &SolverSettings::default()).unwrap();
        let StressField::Cracked { theta, c, k } = field else {
            panic!("expected a cracked section");
        };
        let r = frame.response(theta, c);
        assert_relative_eq!(k * r.force, p, max_relative = 1e-6);
        assert_relative_eq!(k * r.mx, mx, max_relative = 1e-6);
        assert_relative_eq!(k * r.my, my, max_relative = 1e-6);
    }

    #[test]
    fn test_square_diagonal_symmetry() {
        // symmetric bars on all four faces, equal moments: axis at 45°
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
        let frame = Frame::new(&s, 15.0);
        let (field, _) = solve(&frame, 0.0, 60e6, 60e6, &SolverSettings::default()).unwrap();
        let StressField::Cracked { theta, .. } = field else {
            panic!("expected a cracked section");
        };
        assert_relative_eq!(theta, PI / 4.0, epsilon = 1e-6);
    }
}
