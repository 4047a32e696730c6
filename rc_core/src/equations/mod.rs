//! # Structural Equations
//!
//! Closed-form formulas used across the crate. Keeping them in one place
//! makes them easy to check against the code text and the handbooks.
//!
//! ## Modules
//!
//! - [`section`] - Geometric properties of rectangles, disks and bars
//! - [`historical`] - RD 2229/1939 material formulas, cracked-section closed forms,
//!   column slenderness
//!
//! ## Sign Conventions
//!
//! - **Depth `y`**: measured downward from the top edge of the section
//! - **Offset `z`**: measured rightward from the left edge
//! - **Axial force N**: negative in compression
//! - **Moment Mx**: positive when it compresses the top fibre
//! - **Moment My**: positive when it compresses the right fibre
//! - **Stresses**: reported as positive magnitudes with an explicit label
//!   (compression or tension)

pub mod historical;
pub mod section;

pub use section::{
    bar_area,
    circular_area,
    circular_chord,
    circular_moment_of_inertia,
    parallel_axis,
    rectangular_area,
    rectangular_moment_of_inertia,
    rectangular_section_modulus,
};

pub use historical::{
    concrete_elastic_modulus_kgf_cm2,
    cracked_rectangle_neutral_axis,
    cracked_tee_neutral_axis,
    euler_critical_load,
    minimum_eccentricity_mm,
    modular_ratio,
    moment_amplification,
};
