//! # Historical Working-Stress Formulas
//!
//! Closed-form relations from RD 2229/1939 and the Santarella handbooks.
//! Formulas marked *(kgf/cm²)* are evaluated in technical units, exactly as
//! printed; callers convert at the boundary with [`crate::units`].
//!
//! ## Notation
//!
//! - `σr` = 28-day cube resistance of the concrete
//! - `Ec`, `Es` = elastic moduli of concrete and steel
//! - `n` = modular ratio Es/Ec
//! - `b`, `d` = width and effective depth of a rectangular section
//! - `x` = neutral-axis depth from the compressed edge

/// Steel elastic modulus prescribed by the code *(kgf/cm²)*
pub const STEEL_ELASTIC_MODULUS_KGF_CM2: f64 = 2_000_000.0;

// =============================================================================
// ELASTIC MODULI
// =============================================================================

/// Concrete elastic modulus from cube resistance *(kgf/cm²)*
///
/// # Formula
/// Ec = 550000 · σr / (σr + 200)
///
/// # Example
/// ```rust
/// use rc_core::equations::historical::concrete_elastic_modulus_kgf_cm2;
///
/// // σr = 200 gives exactly half the asymptote
/// assert_eq!(concrete_elastic_modulus_kgf_cm2(200.0), 275_000.0);
/// ```
#[inline]
pub fn concrete_elastic_modulus_kgf_cm2(resistance_kgf_cm2: f64) -> f64 {
    550_000.0 * resistance_kgf_cm2 / (resistance_kgf_cm2 + 200.0)
}

/// Modular ratio n = Es / Ec
#[inline]
pub fn modular_ratio(steel_modulus: f64, concrete_modulus: f64) -> f64 {
    steel_modulus / concrete_modulus
}

// =============================================================================
// CRACKED RECTANGULAR SECTION (PURE BENDING)
// =============================================================================

/// Neutral-axis depth of a cracked rectangular section in pure bending
///
/// Concrete below the neutral axis is ignored; tension steel `As` at depth
/// `d`, compression steel `As'` at depth `d'`. Compression steel is counted
/// with `(n-1)` (the concrete it displaces is already in the compressed
/// block); the tension steel with `n`.
///
/// ```text
///     ┌─────────────┐ ─┬─
///     │  ○    ○   ○ │  │ d'      compression steel As'
///     │▓▓▓▓▓▓▓▓▓▓▓▓▓│  x
///     │─────────────│ ─┴─ neutral axis
///     │             │
///     │  ●    ●   ● │ ─── d     tension steel As
///     └─────────────┘
///            b
/// ```
///
/// # Formula
/// b·x²/2 + (n−1)·As'·(x − d') − n·As·(d − x) = 0
///
/// solved as the positive root of the quadratic in x.
///
/// # Example
/// ```rust
/// use rc_core::equations::historical::cracked_rectangle_neutral_axis;
///
/// // 300 x 500, 4Ø16 at d = 462 mm, n = 10
/// let x = cracked_rectangle_neutral_axis(300.0, 462.0, 804.25, 0.0, 0.0, 10.0);
/// assert!(x > 130.0 && x < 150.0);
/// ```
pub fn cracked_rectangle_neutral_axis(
    b: f64,
    d: f64,
    tension_area: f64,
    compression_area: f64,
    compression_depth: f64,
    n: f64,
) -> f64 {
    let a = b / 2.0;
    let bq = (n - 1.0) * compression_area + n * tension_area;
    let c = -(n - 1.0) * compression_area * compression_depth - n * tension_area * d;
    (-bq + (bq * bq - 4.0 * a * c).sqrt()) / (2.0 * a)
}

/// Cracked second moment of area about the neutral axis of a rectangle
///
/// # Formula
/// I = b·x³/3 + (n−1)·As'·(x − d')² + n·As·(d − x)²
pub fn cracked_rectangle_inertia(
    b: f64,
    d: f64,
    x: f64,
    tension_area: f64,
    compression_area: f64,
    compression_depth: f64,
    n: f64,
) -> f64 {
    b * x.powi(3) / 3.0
        + (n - 1.0) * compression_area * (x - compression_depth).powi(2)
        + n * tension_area * (d - x).powi(2)
}

/// Neutral-axis depth of a T section in pure bending with the axis below the flange
///
/// The web contribution inside the flange is counted once (flange width over
/// the flange, web width below it).
///
/// # Formula
/// bw·x²/2 + (B−bw)·t·(x − t/2) + (n−1)·As'·(x − d') − n·As·(d − x) = 0
#[allow(clippy::too_many_arguments)]
pub fn cracked_tee_neutral_axis(
    flange_width: f64,
    flange_thickness: f64,
    web_width: f64,
    d: f64,
    tension_area: f64,
    compression_area: f64,
    compression_depth: f64,
    n: f64,
) -> f64 {
    let overhang = (flange_width - web_width) * flange_thickness;
    let a = web_width / 2.0;
    let bq = overhang + (n - 1.0) * compression_area + n * tension_area;
    let c = -overhang * flange_thickness / 2.0
        - (n - 1.0) * compression_area * compression_depth
        - n * tension_area * d;
    (-bq + (bq * bq - 4.0 * a * c).sqrt()) / (2.0 * a)
}

// =============================================================================
// COLUMNS
// =============================================================================

/// Slenderness l0/h below which second-order effects are neglected
pub const SLENDERNESS_THRESHOLD: f64 = 15.0;

/// Euler critical load of a pin-ended strut
///
/// # Formula
/// Ncr = π²·E·I / l0²
#[inline]
pub fn euler_critical_load(elastic_modulus: f64, inertia: f64, buckling_length: f64) -> f64 {
    std::f64::consts::PI.powi(2) * elastic_modulus * inertia / buckling_length.powi(2)
}

/// Slenderness amplification of the first-order moment
///
/// Returns `None` when the axial load reaches the critical load (the strut
/// is unstable and no finite amplification exists).
///
/// # Formula
/// η = 1                   for l0/h < 15
/// η = 1 / (1 − N/Ncr)     otherwise
pub fn moment_amplification(
    axial_compression: f64,
    critical_load: f64,
    slenderness: f64,
) -> Option<f64> {
    if slenderness < SLENDERNESS_THRESHOLD || axial_compression <= 0.0 {
        return Some(1.0);
    }
    let ratio = axial_compression / critical_load;
    if ratio >= 1.0 {
        None
    } else {
        Some(1.0 / (1.0 - ratio))
    }
}

/// Minimum accidental eccentricity: max(h/30, 20 mm)
#[inline]
pub fn minimum_eccentricity_mm(depth_mm: f64) -> f64 {
    (depth_mm / 30.0).max(20.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_elastic_modulus_monotonic() {
        let mut prev = 0.0;
        for sigma in [100.0, 140.0, 225.0, 280.0, 380.0, 500.0] {
            let ec = concrete_elastic_modulus_kgf_cm2(sigma);
            assert!(ec > prev);
            assert!(ec < 550_000.0);
            prev = ec;
        }
    }

    #[test]
    fn test_cracked_rectangle_satisfies_equilibrium() {
        let (b, d, a_s, a_sc, d_c, n) = (300.0, 460.0, 942.0, 402.0, 40.0, 12.0);
        let x = cracked_rectangle_neutral_axis(b, d, a_s, a_sc, d_c, n);
        let residual = b * x * x / 2.0 + (n - 1.0) * a_sc * (x - d_c) - n * a_s * (d - x);
        assert!(residual.abs() < 1e-6 * b * d * d);
    }

    #[test]
    fn test_tee_reduces_to_rectangle() {
        let x_rect = cracked_rectangle_neutral_axis(250.0, 500.0, 1200.0, 0.0, 0.0, 10.0);
        let x_tee = cracked_tee_neutral_axis(250.0, 80.0, 250.0, 500.0, 1200.0, 0.0, 0.0, 10.0);
        assert_relative_eq!(x_rect, x_tee, epsilon = 1e-9);
    }

    #[test]
    fn test_amplification_grows_with_load() {
        let ncr = euler_critical_load(30_000.0, 300.0_f64.powi(4) / 12.0, 6000.0);
        assert_eq!(moment_amplification(0.5 * ncr, ncr, 10.0), Some(1.0));
        let low = moment_amplification(0.2 * ncr, ncr, 20.0).unwrap();
        let high = moment_amplification(0.6 * ncr, ncr, 20.0).unwrap();
        assert_relative_eq!(low, 1.25, epsilon = 1e-12);
        assert!(high > low);
        assert_eq!(moment_amplification(ncr, ncr, 20.0), None);
    }

    #[test]
    fn test_minimum_eccentricity() {
        assert_eq!(minimum_eccentricity_mm(300.0), 20.0);
        assert_eq!(minimum_eccentricity_mm(900.0), 30.0);
    }
}
