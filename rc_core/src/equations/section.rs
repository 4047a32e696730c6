//! # Cross-Section Property Formulas
//!
//! Closed-form geometric properties of the primitive pieces every concrete
//! shape is assembled from (rectangles and disks), plus bar areas.
//!
//! ## Notation
//!
//! - `A` = Cross-sectional area
//! - `I` = Second moment of area about the piece's own centroidal axis
//! - `b` = Width of a rectangle (horizontal)
//! - `h` = Height of a rectangle (vertical)
//! - `r` = Radius of a disk
//!
//! ## References
//!
//! - Santarella, *Il cemento armato*, Vol. I, section properties
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table A.1

use std::f64::consts::PI;

// =============================================================================
// RECTANGULAR PIECES
// =============================================================================

/// Area of a rectangle
///
/// ```text
///     ┌─────────┐
///     │         │
///   h │         │
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// A = b × h
///
/// # Example
/// ```rust
/// use rc_core::equations::section::rectangular_area;
///
/// let area = rectangular_area(300.0, 500.0);
/// assert_eq!(area, 150_000.0);
/// ```
#[inline]
pub fn rectangular_area(b: f64, h: f64) -> f64 {
    b * h
}

/// Second moment of a rectangle about its horizontal centroidal axis
///
/// ```text
///     ┌─────────┐
///     │         │
///   h │ ════════│ ← axis at h/2
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// I = b·h³/12
///
/// For the vertical axis swap the arguments: I = h·b³/12.
///
/// # Example
/// ```rust
/// use rc_core::equations::section::rectangular_moment_of_inertia;
///
/// let i = rectangular_moment_of_inertia(300.0, 500.0);
/// assert!((i - 3.125e9).abs() < 1.0);
/// ```
#[inline]
pub fn rectangular_moment_of_inertia(b: f64, h: f64) -> f64 {
    b * h.powi(3) / 12.0
}

/// Elastic section modulus of a rectangle: S = b·h²/6
#[inline]
pub fn rectangular_section_modulus(b: f64, h: f64) -> f64 {
    b * h.powi(2) / 6.0
}

// =============================================================================
// CIRCULAR PIECES
// =============================================================================

/// Area of a disk: A = π·r²
#[inline]
pub fn circular_area(r: f64) -> f64 {
    PI * r * r
}

/// Second moment of a disk about any centroidal axis: I = π·r⁴/4
#[inline]
pub fn circular_moment_of_inertia(r: f64) -> f64 {
    PI * r.powi(4) / 4.0
}

/// Chord of a disk at distance `offset` from its centre
///
/// ```text
///        ___
///      /     \
///     |───────|  ← chord at offset
///     |   ·   |
///      \_____/
/// ```
///
/// # Formula
/// c = 2·√(r² − offset²), zero outside the disk
#[inline]
pub fn circular_chord(r: f64, offset: f64) -> f64 {
    let q = r * r - offset * offset;
    if q <= 0.0 {
        0.0
    } else {
        2.0 * q.sqrt()
    }
}

/// Circumradius of a regular `n`-gon with the same area as a disk of radius `r`
///
/// Used when a disk is integrated as a polygon.
///
/// # Formula
/// R = r·√(2π / (n·sin(2π/n)))
pub fn area_matched_polygon_radius(r: f64, n: usize) -> f64 {
    let n = n as f64;
    r * (2.0 * PI / (n * (2.0 * PI / n).sin())).sqrt()
}

// =============================================================================
// COMPOSITION
// =============================================================================

/// Transfer a second moment to a parallel axis (Steiner)
///
/// # Formula
/// I = I₀ + A·d²
#[inline]
pub fn parallel_axis(own_inertia: f64, area: f64, distance: f64) -> f64 {
    own_inertia + area * distance * distance
}

/// Area of `count` round bars of diameter `phi`
///
/// # Example
/// ```rust
/// use rc_core::equations::section::bar_area;
///
/// // 4Ø16
/// assert!((bar_area(16.0, 4) - 804.25).abs() < 0.01);
/// ```
#[inline]
pub fn bar_area(phi: f64, count: u32) -> f64 {
    count as f64 * PI * phi * phi / 4.0
}

// =============================================================================
// UNIT TESTS
// =============================================================================
