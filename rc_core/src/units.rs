//! # Units
//!
//! Plain `f64` conversion helpers used throughout the engines, plus thin
//! newtypes for callers that want the unit carried in the type.
//!
//! ## Internal Units
//!
//! rc_core computes in SI with millimetres:
//! - Length: millimetres (mm)
//! - Force: newtons (N), inputs in kilonewtons (kN)
//! - Moment: newton-millimetres (N·mm), inputs in kilonewton-metres (kN·m)
//! - Stress: megapascals (MPa = N/mm²)
//!
//! The historical tables are written in technical units (kgf/cm²). The code
//! conversion factor is fixed at 1 MPa = 10.197 kgf/cm² and both directions
//! use the same factor, so a round trip is exact up to floating-point error.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::units::{KgfCm2, Mpa};
//!
//! let sigma = KgfCm2(1400.0);
//! let sigma_mpa: Mpa = sigma.into();
//! assert!((sigma_mpa.0 - 137.295).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// kgf/cm² per MPa, as fixed by the historical tables
pub const KGF_CM2_PER_MPA: f64 = 10.197;

/// Convert a stress from MPa to kgf/cm²
#[inline]
pub fn mpa_to_kgf_cm2(mpa: f64) -> f64 {
    mpa * KGF_CM2_PER_MPA
}

/// Convert a stress from kgf/cm² to MPa
#[inline]
pub fn kgf_cm2_to_mpa(kgf_cm2: f64) -> f64 {
    kgf_cm2 / KGF_CM2_PER_MPA
}

/// kN → N
#[inline]
pub fn kn_to_n(kn: f64) -> f64 {
    kn * 1.0e3
}

/// kN·m → N·mm
#[inline]
pub fn knm_to_nmm(knm: f64) -> f64 {
    knm * 1.0e6
}

/// N → kN
#[inline]
pub fn n_to_kn(n: f64) -> f64 {
    n / 1.0e3
}

/// N·mm → kN·m
#[inline]
pub fn nmm_to_knm(nmm: f64) -> f64 {
    nmm / 1.0e6
}

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in megapascals (N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mpa(pub f64);

/// Stress in kilogram-force per square centimetre (technical units)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgfCm2(pub f64);

impl From<Mpa> for KgfCm2 {
    fn from(mpa: Mpa) -> Self {
        KgfCm2(mpa_to_kgf_cm2(mpa.0))
    }
}

impl From<KgfCm2> for Mpa {
    fn from(kgf: KgfCm2) -> Self {
        Mpa(kgf_cm2_to_mpa(kgf.0))
    }
}

// ============================================================================
// Force Units
// ============================================================================

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilonewtons(pub f64);

impl From<Kilonewtons> for Newtons {
    fn from(kn: Kilonewtons) -> Self {
        Newtons(kn_to_n(kn.0))
    }
}

impl From<Newtons> for Kilonewtons {
    fn from(n: Newtons) -> Self {
        Kilonewtons(n_to_kn(n.0))
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in newton-millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewtonMm(pub f64);

/// Moment in kilonewton-metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KilonewtonM(pub f64);

impl From<KilonewtonM> for NewtonMm {
    fn from(knm: KilonewtonM) -> Self {
        NewtonMm(knm_to_nmm(knm.0))
    }
}

impl From<NewtonMm> for KilonewtonM {
    fn from(nmm: NewtonMm) -> Self {
        KilonewtonM(nmm_to_knm(nmm.0))
    }
}

// ============================================================================
// Length and Area Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in centimetres (historical drawings)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

impl From<Centimeters> for Millimeters {
    fn from(cm: Centimeters) -> Self {
        Millimeters(cm.0 * 10.0)
    }
}

impl From<Millimeters> for Centimeters {
    fn from(mm: Millimeters) -> Self {
        Centimeters(mm.0 / 10.0)
    }
}

/// Area in square millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMm(pub f64);

/// Area in square centimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqCm(pub f64);

impl From<SqCm> for SqMm {
    fn from(cm2: SqCm) -> Self {
        SqMm(cm2.0 * 100.0)
    }
}

impl From<SqMm> for SqCm {
    fn from(mm2: SqMm) -> Self {
        SqCm(mm2.0 / 100.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Mpa);
impl_arithmetic!(KgfCm2);
impl_arithmetic!(Newtons);
impl_arithmetic!(Kilonewtons);
impl_arithmetic!(NewtonMm);
impl_arithmetic!(KilonewtonM);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Centimeters);
impl_arithmetic!(SqMm);
impl_arithmetic!(SqCm);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mild_steel_admissible_in_mpa() {
        let mpa: Mpa = KgfCm2(1400.0).into();
        assert!((mpa.0 - 137.295).abs() < 1e-3);
    }

    #[test]
    fn test_stress_round_trip() {
        for v in [0.1, 4.0, 35.0, 1400.0, 2_000_000.0] {
            let back: KgfCm2 = Mpa::from(KgfCm2(v)).into();
            assert!(((back.0 - v) / v).abs() < 1e-12);
        }
    }

    #[test]
    fn test_force_and_moment() {
        let n: Newtons = Kilonewtons(12.5).into();
        assert_eq!(n.0, 12_500.0);
        let nmm: NewtonMm = KilonewtonM(80.0).into();
        assert_eq!(nmm.0, 80.0e6);
        let back: KilonewtonM = nmm.into();
        assert_eq!(back.0, 80.0);
    }

    #[test]
    fn test_area_units() {
        let mm2: SqMm = SqCm(2000.0).into();
        assert_eq!(mm2.0, 200_000.0);
    }

    #[test]
    fn test_arithmetic() {
        let a = Mpa(10.0);
        let b = Mpa(4.0);
        assert_eq!((a + b).0, 14.0);
        assert_eq!((a - b).0, 6.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let s = Mpa(12.5);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "12.5");
        let roundtrip: Mpa = serde_json::from_str(&json).unwrap();
        assert_eq!(s, roundtrip);
    }
}
