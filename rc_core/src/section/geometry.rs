//! Resolved section geometry.
//!
//! Every shape is decomposed into signed leaves (rectangles and disks, voids
//! carrying a negative sign). Gross properties are computed exactly from the
//! leaves; integrals over a compressed zone bounded by a straight neutral axis
//! use the leaf outlines as polygons (disks as area-matched regular polygons),
//! clipped by the half-plane and integrated with Green's theorem.
//!
//! Coordinates: `z` rightward from the left edge, `y` downward from the top edge.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

use crate::equations::section::{
    area_matched_polygon_radius, circular_area, circular_chord, circular_moment_of_inertia,
    parallel_axis, rectangular_area, rectangular_moment_of_inertia,
};
use crate::errors::{CalcError, CalcResult};

/// Segments used for a disk outline
pub const DISK_SEGMENTS: usize = 96;

const EDGE_TOLERANCE: f64 = 1e-9;

/// A signed primitive piece of concrete.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Leaf {
    Rect {
        z0: f64,
        z1: f64,
        y0: f64,
        y1: f64,
        sign: f64,
    },
    Disk {
        zc: f64,
        yc: f64,
        r: f64,
        sign: f64,
    },
}

impl Leaf {
    pub fn rect(z0: f64, z1: f64, y0: f64, y1: f64) -> Self {
        Leaf::Rect { z0, z1, y0, y1, sign: 1.0 }
    }

    pub fn void_rect(z0: f64, z1: f64, y0: f64, y1: f64) -> Self {
        Leaf::Rect { z0, z1, y0, y1, sign: -1.0 }
    }

    pub fn disk(zc: f64, yc: f64, r: f64) -> Self {
        Leaf::Disk { zc, yc, r, sign: 1.0 }
    }

    pub fn void_disk(zc: f64, yc: f64, r: f64) -> Self {
        Leaf::Disk { zc, yc, r, sign: -1.0 }
    }

    pub fn sign(&self) -> f64 {
        match *self {
            Leaf::Rect { sign, .. } | Leaf::Disk { sign, .. } => sign,
        }
    }

    /// Unsigned area
    pub fn area(&self) -> f64 {
        match *self {
            Leaf::Rect { z0, z1, y0, y1, .. } => rectangular_area(z1 - z0, y1 - y0),
            Leaf::Disk { r, .. } => circular_area(r),
        }
    }

    /// Centroid `(z, y)`
    pub fn centroid(&self) -> (f64, f64) {
        match *self {
            Leaf::Rect { z0, z1, y0, y1, .. } => ((z0 + z1) / 2.0, (y0 + y1) / 2.0),
            Leaf::Disk { zc, yc, .. } => (zc, yc),
        }
    }

    /// Own second moments `(about horizontal axis, about vertical axis)`
    pub fn own_inertia(&self) -> (f64, f64) {
        match *self {
            Leaf::Rect { z0, z1, y0, y1, .. } => (
                rectangular_moment_of_inertia(z1 - z0, y1 - y0),
                rectangular_moment_of_inertia(y1 - y0, z1 - z0),
            ),
            Leaf::Disk { r, .. } => {
                let i = circular_moment_of_inertia(r);
                (i, i)
            }
        }
    }

    /// Horizontal extent of the leaf at depth `y` (width "just below" `y`)
    fn span_at(&self, y: f64) -> Option<(f64, f64)> {
        match *self {
            Leaf::Rect { z0, z1, y0, y1, .. } => (y >= y0 && y < y1).then_some((z0, z1)),
            Leaf::Disk { zc, yc, r, .. } => {
                let c = circular_chord(r, y - yc);
                (c > 0.0).then_some((zc - c / 2.0, zc + c / 2.0))
            }
        }
    }

    /// Vertical extent of the leaf at offset `z`
    fn vertical_span_at(&self, z: f64) -> Option<(f64, f64)> {
        match *self {
            Leaf::Rect { z0, z1, y0, y1, .. } => (z >= z0 && z <= z1).then_some((y0, y1)),
            Leaf::Disk { zc, yc, r, .. } => {
                let c = circular_chord(r, z - zc);
                (c > 0.0).then_some((yc - c / 2.0, yc + c / 2.0))
            }
        }
    }

    /// Point inside the leaf; `closed` includes the boundary
    fn contains(&self, z: f64, y: f64, closed: bool) -> bool {
        let tol = if closed { EDGE_TOLERANCE } else { -EDGE_TOLERANCE };
        match *self {
            Leaf::Rect { z0, z1, y0, y1, .. } => {
                z >= z0 - tol && z <= z1 + tol && y >= y0 - tol && y <= y1 + tol
            }
            Leaf::Disk { zc, yc, r, .. } => {
                let d = ((z - zc).powi(2) + (y - yc).powi(2)).sqrt();
                d <= r + tol
            }
        }
    }

    /// Rotate a quarter turn counter-clockwise inside a frame of the given width:
    /// `(z, y) → (y, width − z)`.
    pub fn rotated_ccw(&self, width: f64) -> Leaf {
        match *self {
            Leaf::Rect { z0, z1, y0, y1, sign } => Leaf::Rect {
                z0: y0,
                z1: y1,
                y0: width - z1,
                y1: width - z0,
                sign,
            },
            Leaf::Disk { zc, yc, r, sign } => Leaf::Disk {
                zc: yc,
                yc: width - zc,
                r,
                sign,
            },
        }
    }

    /// Counter-clockwise outline (in a y-down frame the orientation flips; the
    /// moment routines normalise it)
    pub fn outline(&self) -> Vec<(f64, f64)> {
        match *self {
            Leaf::Rect { z0, z1, y0, y1, .. } => vec![(z0, y0), (z1, y0), (z1, y1), (z0, y1)],
            Leaf::Disk { zc, yc, r, .. } => {
                let big_r = area_matched_polygon_radius(r, DISK_SEGMENTS);
                (0..DISK_SEGMENTS)
                    .map(|i| {
                        let a = 2.0 * std::f64::consts::PI * i as f64 / DISK_SEGMENTS as f64;
                        (zc + big_r * a.cos(), yc + big_r * a.sin())
                    })
                    .collect()
            }
        }
    }
}

/// Area and first/second moments of a plane region about the frame origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaMoments {
    /// ∫ dA
    pub area: f64,
    /// ∫ z dA
    pub sz: f64,
    /// ∫ y dA
    pub sy: f64,
    /// ∫ z² dA
    pub izz: f64,
    /// ∫ y² dA
    pub iyy: f64,
    /// ∫ z·y dA
    pub izy: f64,
}

impl Add for AreaMoments {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        AreaMoments {
            area: self.area + rhs.area,
            sz: self.sz + rhs.sz,
            sy: self.sy + rhs.sy,
            izz: self.izz + rhs.izz,
            iyy: self.iyy + rhs.iyy,
            izy: self.izy + rhs.izy,
        }
    }
}

impl Mul<f64> for AreaMoments {
    type Output = Self;
    fn mul(self, k: f64) -> Self {
        AreaMoments {
            area: self.area * k,
            sz: self.sz * k,
            sy: self.sy * k,
            izz: self.izz * k,
            iyy: self.iyy * k,
            izy: self.izy * k,
        }
    }
}

/// Moments of a simple polygon (Green's theorem), independent of orientation.
pub fn polygon_moments(poly: &[(f64, f64)]) -> AreaMoments {
    let n = poly.len();
    if n < 3 {
        return AreaMoments::default();
    }
    let mut m = AreaMoments::default();
    for i in 0..n {
        let (z0, y0) = poly[i];
        let (z1, y1) = poly[(i + 1) % n];
        let cross = z0 * y1 - z1 * y0;
        m.area += cross;
        m.sz += (z0 + z1) * cross;
        m.sy += (y0 + y1) * cross;
        m.izz += (z0 * z0 + z0 * z1 + z1 * z1) * cross;
        m.iyy += (y0 * y0 + y0 * y1 + y1 * y1) * cross;
        m.izy += (z0 * y1 + 2.0 * z0 * y0 + 2.0 * z1 * y1 + z1 * y0) * cross;
    }
    m.area /= 2.0;
    m.sz /= 6.0;
    m.sy /= 6.0;
    m.izz /= 12.0;
    m.iyy /= 12.0;
    m.izy /= 24.0;
    if m.area < 0.0 {
        m * -1.0
    } else {
        m
    }
}

/// Clip a convex or concave polygon to the half-plane `a·z + b·y + c ≥ 0`
/// (Sutherland–Hodgman against a single edge).
pub fn clip_half_plane(poly: &[(f64, f64)], a: f64, b: f64, c: f64) -> Vec<(f64, f64)> {
    let g = |p: (f64, f64)| a * p.0 + b * p.1 + c;
    let n = poly.len();
    let mut out = Vec::with_capacity(n + 2);
    for i in 0..n {
        let cur = poly[i];
        let next = poly[(i + 1) % n];
        let gc = g(cur);
        let gn = g(next);
        if gc >= 0.0 {
            out.push(cur);
        }
        if (gc >= 0.0) != (gn >= 0.0) {
            let t = gc / (gc - gn);
            out.push((cur.0 + t * (next.0 - cur.0), cur.1 + t * (next.1 - cur.1)));
        }
    }
    out
}

/// Resolved concrete geometry in the current orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub leaves: Vec<Leaf>,
    pub width: f64,
    pub height: f64,
    outlines: Vec<(f64, Vec<(f64, f64)>)>,
}

/// Gross (concrete-only) properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrossProperties {
    pub area_mm2: f64,
    pub centroid_from_top_mm: f64,
    pub centroid_from_left_mm: f64,
    /// Second moment about the horizontal centroidal axis
    pub ix_mm4: f64,
    /// Second moment about the vertical centroidal axis
    pub iy_mm4: f64,
    /// Product of inertia about the centroid (zero for symmetric shapes)
    pub ixy_mm4: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl GrossProperties {
    /// Ix / distance from centroid to the top fibre
    pub fn section_modulus_top_mm3(&self) -> f64 {
        self.ix_mm4 / self.centroid_from_top_mm
    }

    /// Ix / distance from centroid to the bottom fibre
    pub fn section_modulus_bottom_mm3(&self) -> f64 {
        self.ix_mm4 / (self.height_mm - self.centroid_from_top_mm)
    }
}

impl Profile {
    pub fn new(leaves: Vec<Leaf>, width: f64, height: f64) -> Self {
        let outlines = leaves.iter().map(|l| (l.sign(), l.outline())).collect();
        Profile {
            leaves,
            width,
            height,
            outlines,
        }
    }

    /// Quarter turn counter-clockwise
    pub fn rotated_ccw(&self) -> Profile {
        let leaves = self.leaves.iter().map(|l| l.rotated_ccw(self.width)).collect();
        Profile::new(leaves, self.height, self.width)
    }

    /// Exact gross properties from the leaves
    pub fn gross_properties(&self) -> GrossProperties {
        let mut area = 0.0;
        let mut sz = 0.0;
        let mut sy = 0.0;
        for leaf in &self.leaves {
            let a = leaf.sign() * leaf.area();
            let (zc, yc) = leaf.centroid();
            area += a;
            sz += a * zc;
            sy += a * yc;
        }
        let z_bar = sz / area;
        let y_bar = sy / area;

        let mut ix = 0.0;
        let mut iy = 0.0;
        let mut ixy = 0.0;
        for leaf in &self.leaves {
            let s = leaf.sign();
            let a = leaf.area();
            let (zc, yc) = leaf.centroid();
            let (ix_own, iy_own) = leaf.own_inertia();
            ix += s * parallel_axis(ix_own, a, yc - y_bar);
            iy += s * parallel_axis(iy_own, a, zc - z_bar);
            ixy += s * a * (zc - z_bar) * (yc - y_bar);
        }

        GrossProperties {
            area_mm2: area,
            centroid_from_top_mm: y_bar,
            centroid_from_left_mm: z_bar,
            ix_mm4: ix,
            iy_mm4: iy,
            ixy_mm4: ixy,
            width_mm: self.width,
            height_mm: self.height,
        }
    }

    /// Gross properties integrated over the outline polygons, i.e. over the
    /// geometry the compressed-zone integrals see. Matches
    /// [`Profile::gross_properties`] except on disks, whose area-matched
    /// polygons carry second moments about 1e-7 larger.
    pub fn integrated_properties(&self) -> GrossProperties {
        let m = self.clipped_moments(0.0, 0.0, 1.0);
        let z_bar = m.sz / m.area;
        let y_bar = m.sy / m.area;
        GrossProperties {
            area_mm2: m.area,
            centroid_from_top_mm: y_bar,
            centroid_from_left_mm: z_bar,
            ix_mm4: m.iyy - m.area * y_bar * y_bar,
            iy_mm4: m.izz - m.area * z_bar * z_bar,
            ixy_mm4: m.izy - m.area * z_bar * y_bar,
            width_mm: self.width,
            height_mm: self.height,
        }
    }

    fn check_depth(&self, y: f64) -> CalcResult<()> {
        if !(y >= -EDGE_TOLERANCE && y <= self.height + EDGE_TOLERANCE) {
            return Err(CalcError::invalid_input(
                "depth_mm",
                y.to_string(),
                format!("Depth outside the section [0, {}]", self.height),
            ));
        }
        Ok(())
    }

    /// Width of concrete at depth `y` (outer minus voids).
    ///
    /// At a step the width just below the step is returned; at the bottom edge,
    /// the width just above it.
    pub fn width_at_depth(&self, y: f64) -> CalcResult<f64> {
        self.check_depth(y)?;
        let at = y.clamp(0.0, self.height * (1.0 - 1e-12));
        Ok(self
            .leaves
            .iter()
            .filter_map(|l| l.span_at(at).map(|(a, b)| l.sign() * (b - a)))
            .sum::<f64>()
            .max(0.0))
    }

    /// Solid concrete intervals `(z0, z1)` at depth `y`, left to right, with
    /// voids cut out.
    pub fn horizontal_segments(&self, y: f64) -> CalcResult<Vec<(f64, f64)>> {
        self.check_depth(y)?;
        let at = y.clamp(0.0, self.height * (1.0 - 1e-12));
        let mut spans: Vec<(f64, f64)> = self
            .leaves
            .iter()
            .filter(|l| l.sign() > 0.0)
            .filter_map(|l| l.span_at(at))
            .collect();
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut solid: Vec<(f64, f64)> = Vec::with_capacity(spans.len());
        for (a, b) in spans {
            match solid.last_mut() {
                Some(last) if a <= last.1 + EDGE_TOLERANCE => last.1 = last.1.max(b),
                _ => solid.push((a, b)),
            }
        }

        let voids = self
            .leaves
            .iter()
            .filter(|l| l.sign() < 0.0)
            .filter_map(|l| l.span_at(at));
        for (v0, v1) in voids {
            solid = solid
                .into_iter()
                .flat_map(|(a, b)| {
                    [(a, b.min(v0)), (a.max(v1), b)]
                        .into_iter()
                        .filter(|(lo, hi)| hi - lo > EDGE_TOLERANCE)
                })
                .collect();
        }
        Ok(solid)
    }

    /// Outermost concrete at offset `z`: `(y_min, y_max)`
    pub fn vertical_extent(&self, z: f64) -> Option<(f64, f64)> {
        self.leaves
            .iter()
            .filter(|l| l.sign() > 0.0)
            .filter_map(|l| l.vertical_span_at(z))
            .reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)))
    }

    /// Point inside the concrete envelope (boundary included, voids excluded)
    pub fn contains(&self, z: f64, y: f64) -> bool {
        let in_solid = self
            .leaves
            .iter()
            .any(|l| l.sign() > 0.0 && l.contains(z, y, true));
        let in_void = self
            .leaves
            .iter()
            .any(|l| l.sign() < 0.0 && l.contains(z, y, false));
        in_solid && !in_void
    }

    /// Moments of the concrete region where `a·z + b·y + c ≥ 0`
    pub fn clipped_moments(&self, a: f64, b: f64, c: f64) -> AreaMoments {
        self.outlines
            .iter()
            .map(|(sign, poly)| polygon_moments(&clip_half_plane(poly, a, b, c)) * *sign)
            .fold(AreaMoments::default(), |acc, m| acc + m)
    }

    /// Moments of the band `y ∈ [0, depth]` (top compressed zone)
    pub fn moments_above(&self, depth: f64) -> AreaMoments {
        // keep y ≤ depth  ⇔  −y + depth ≥ 0
        self.clipped_moments(0.0, -1.0, depth)
    }

    /// Outline polygons with their signs, in the current orientation
    pub fn outlines(&self) -> &[(f64, Vec<(f64, f64)>)] {
        &self.outlines
    }
}
