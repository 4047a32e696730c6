//! Stress fields over a resolved section and the integrals the root finders
//! work on.
//!
//! The neutral axis is described by an angle `θ` and a position `c` along the
//! unit vector `d = (−sin θ, cos θ)`: a point `p` lies in the compressed zone
//! when `w(p) = d·p < c`, and the compressive stress there is `k·(c − w(p))`.
//! `θ = 0` compresses the top fibre, `θ = π` the bottom one, `θ = π/2` the
//! right-hand one.

use crate::errors::{CalcError, CalcResult};
use crate::section::{HomogenizedProperties, Profile, Section, SteelPoint};

use super::SolverSettings;

/// Unit vector pointing from the compressed edge into the section
#[inline]
pub(crate) fn direction(theta: f64) -> (f64, f64) {
    (-theta.sin(), theta.cos())
}

/// Section data the solver integrates over
pub(crate) struct Frame<'a> {
    pub profile: &'a Profile,
    pub bars: &'a [SteelPoint],
    pub n: f64,
    pub homogenized: HomogenizedProperties,
}

/// Resultants of the stress field `(c − w)` (unit gradient), about the
/// homogenized centroid. Compression positive; moments follow the
/// `Mx`/`My` sign convention.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ZoneResponse {
    pub force: f64,
    pub mx: f64,
    pub my: f64,
}

impl ZoneResponse {
    /// Moment component along the demand direction `φ` in the (Mx, My) plane
    pub fn along(&self, phi: f64) -> f64 {
        self.mx * phi.cos() + self.my * phi.sin()
    }

    /// Moment component across the demand direction
    pub fn across(&self, phi: f64) -> f64 {
        -self.mx * phi.sin() + self.my * phi.cos()
    }
}

/// Uncracked linear field `σ = σ0 + α·(z − zc) + β·(y − yc)`, compression positive
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LinearField {
    pub sigma0: f64,
    pub alpha: f64,
    pub beta: f64,
}

/// A solved concrete-fibre stress field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum StressField {
    /// Whole section under one stress
    Uniform { sigma: f64 },
    /// Whole section compressed, neutral axis outside it
    Uncracked(LinearField),
    /// Neutral axis crosses the section, concrete below it ignored
    Cracked { theta: f64, c: f64, k: f64 },
}

/// Root of the depth equation for a fixed angle
#[derive(Debug, Clone, Copy)]
pub(crate) struct DepthRoot {
    pub c: f64,
    pub response: ZoneResponse,
    pub iterations: usize,
}

impl<'a> Frame<'a> {
    pub fn new(section: &'a Section, n: f64) -> Self {
        Frame {
            profile: section.profile(),
            bars: section.steel_points(),
            n,
            homogenized: section.integrated_homogenized(n),
        }
    }

    /// Solid concrete vertices (voids cannot hold an extreme fibre)
    fn vertices(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.profile
            .outlines()
            .iter()
            .filter(|(sign, _)| *sign > 0.0)
            .flat_map(|(_, poly)| poly.iter())
    }

    /// Range of `w` over the concrete
    pub fn w_range(&self, theta: f64) -> (f64, f64) {
        let (dz, dy) = direction(theta);
        self.vertices()
            .map(|&(z, y)| dz * z + dy * y)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), w| (lo.min(w), hi.max(w)))
    }

    pub fn response(&self, theta: f64, c: f64) -> ZoneResponse {
        let (dz, dy) = direction(theta);
        // compressed zone: c − dz·z − dy·y ≥ 0
        let m = self.profile.clipped_moments(-dz, -dy, c);
        let mut force = c * m.area - dz * m.sz - dy * m.sy;
        let mut fy = c * m.sy - dz * m.izy - dy * m.iyy;
        let mut fz = c * m.sz - dz * m.izz - dy * m.izy;

        for bar in self.bars {
            let e = c - (dz * bar.z + dy * bar.y);
            // compressed bars displace concrete already counted
            let ratio = if e > 0.0 { self.n - 1.0 } else { self.n };
            let f = ratio * bar.area_mm2 * e;
            force += f;
            fy += f * bar.y;
            fz += f * bar.z;
        }

        let yc = self.homogenized.centroid_from_top_mm;
        let zc = self.homogenized.centroid_from_left_mm;
        ZoneResponse {
            force,
            mx: yc * force - fy,
            my: fz - zc * force,
        }
    }

    /// Uncracked field carrying `p` (N, compression positive) and the moments
    /// (N·mm). With `restrained` the neutral axis is kept horizontal.
    pub fn linear_field(&self, p: f64, mx: f64, my: f64, restrained: bool) -> LinearField {
        let h = &self.homogenized;
        let sigma0 = p / h.area_mm2;
        if restrained {
            return LinearField {
                sigma0,
                alpha: 0.0,
                beta: -mx / h.ix_mm4,
            };
        }
        // [Iy Ixy; Ixy Ix]·[α; β] = [My; −Mx]
        let det = h.iy_mm4 * h.ix_mm4 - h.ixy_mm4 * h.ixy_mm4;
        LinearField {
            sigma0,
            alpha: (my * h.ix_mm4 + mx * h.ixy_mm4) / det,
            beta: (-mx * h.iy_mm4 - my * h.ixy_mm4) / det,
        }
    }

    /// Smallest fibre stress of a linear field over the concrete
    pub fn min_stress(&self, field: &LinearField) -> f64 {
        self.vertices()
            .map(|&(z, y)| self.linear_at(field, z, y))
            .fold(f64::INFINITY, f64::min)
    }

    fn linear_at(&self, field: &LinearField, z: f64, y: f64) -> f64 {
        let h = &self.homogenized;
        field.sigma0
            + field.alpha * (z - h.centroid_from_left_mm)
            + field.beta * (y - h.centroid_from_top_mm)
    }

    /// Concrete-fibre stress of a field at a point (compression positive,
    /// negative values are the strain-compatible tension the concrete does not carry)
    pub fn stress_at(&self, field: &StressField, z: f64, y: f64) -> f64 {
        match *field {
            StressField::Uniform { sigma } => sigma,
            StressField::Uncracked(ref f) => self.linear_at(f, z, y),
            StressField::Cracked { theta, c, k } => {
                let (dz, dy) = direction(theta);
                k * (c - dz * z - dy * y)
            }
        }
    }

    /// Largest concrete compression of a field
    pub fn max_concrete_stress(&self, field: &StressField) -> f64 {
        self.vertices()
            .map(|&(z, y)| self.stress_at(field, z, y))
            .fold(0.0, f64::max)
    }

    /// Solve `p·M∥(c) = md·F(c)` for the neutral-axis position at a fixed angle.
    ///
    /// `Ok(None)` when no root is bracketed over the section (the demand
    /// cannot be carried with this inclination).
    pub fn solve_depth(
        &self,
        theta: f64,
        p: f64,
        md: f64,
        phi: f64,
        settings: &SolverSettings,
    ) -> CalcResult<Option<DepthRoot>> {
        let (w_min, w_max) = self.w_range(theta);
        let span = w_max - w_min;
        let residual = |c: f64| {
            let r = self.response(theta, c);
            (p * r.along(phi) - md * r.force, r)
        };

        let mut lo = w_min + span * 1e-9;
        let mut hi = w_max;
        let (mut h_lo, r_lo) = residual(lo);
        let (h_hi, r_hi) = residual(hi);
        if h_lo == 0.0 {
            return Ok(Some(DepthRoot { c: lo, response: r_lo, iterations: 0 }));
        }
        if h_hi == 0.0 {
            return Ok(Some(DepthRoot { c: hi, response: r_hi, iterations: 0 }));
        }
        if h_lo.signum() == h_hi.signum() {
            return Ok(None);
        }

        for i in 1..=settings.max_iterations {
            let mid = 0.5 * (lo + hi);
            let (h_mid, r_mid) = residual(mid);
            log::trace!("depth bisection θ={theta:.4} i={i} c={mid:.4} h={h_mid:.4e}");
            if h_mid == 0.0 || 0.5 * (hi - lo) <= settings.tolerance * span {
                return Ok(Some(DepthRoot { c: mid, response: r_mid, iterations: i }));
            }
            if h_mid.signum() == h_lo.signum() {
                lo = mid;
                h_lo = h_mid;
            } else {
                hi = mid;
            }
        }
        Err(CalcError::non_convergence(
            "neutral-axis depth",
            settings.max_iterations,
            (hi - lo) / span,
        ))
    }
}
