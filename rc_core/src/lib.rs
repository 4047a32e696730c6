//! # rc_core - Working-Stress Verification of Reinforced-Concrete Sections
//!
//! `rc_core` checks reinforced-concrete sections under the admissible-stress
//! rules of RD 2229/1939, with the Santarella and Giangreco conventions for
//! shear and biaxial bending. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: engines are pure functions from an input to a result
//! - **JSON-First**: every value object implements Serialize/Deserialize
//! - **Rich Errors**: structured [`CalcError`] variants, never panics on bad input
//! - **Failure is a result**: an overstressed section returns `passes == false`
//!
//! ## Quick Start
//!
//! ```rust
//! use rc_core::materials::{CementType, Concrete, Materials, Steel, SteelGrade};
//! use rc_core::section::{BarRole, Section, Shape};
//! use rc_core::solver::{InternalForces, SolverSettings};
//! use rc_core::verifications::{flexure, FlexureInput};
//!
//! let materials = Materials::new(
//!     Concrete::from_table(CementType::Normal, 0.50).unwrap(),
//!     Steel::from_grade(SteelGrade::Mild).unwrap(),
//! );
//! let mut section = Section::new(Shape::Rectangular { width_mm: 300.0, height_mm: 500.0 }).unwrap();
//! section.add_layer(16.0, 4, 462.0, BarRole::Tension).unwrap();
//!
//! let result = flexure::calculate(&FlexureInput {
//!     label: "B1".to_string(),
//!     section,
//!     materials,
//!     forces: InternalForces::bending(20.0),
//!     settings: SolverSettings::default(),
//! })
//! .unwrap();
//! assert!(result.passes);
//! ```
//!
//! ## Modules
//!
//! - [`tables`] - Tabulated historical data with linear interpolation
//! - [`materials`] - Concrete and steel built from the tables, grades or explicit values
//! - [`section`] - Shapes, reinforcement, gross and homogenized properties
//! - [`solver`] - Neutral-axis equilibrium (uniaxial, biaxial, pure axial)
//! - [`verifications`] - Flexure, shear, column and biaxial checks
//! - [`batch`] - Independent checks run together
//! - [`equations`] - Closed-form formulas
//! - [`units`] - Unit conversions and newtype wrappers
//! - [`errors`] - Structured error types

pub mod batch;
pub mod equations;
pub mod errors;
pub mod materials;
pub mod section;
pub mod solver;
pub mod tables;
pub mod units;
pub mod verifications;

// Re-export commonly used types at crate root for convenience
pub use batch::{verify_batch, BatchJob, BatchOutcome, BatchReport, CheckRequest};
pub use errors::{CalcError, CalcResult};
pub use materials::{build_material, Material, MaterialSpec, Materials};
pub use section::{Section, SectionSpec, Shape};
pub use solver::{solve, EquilibriumResult, InternalForces, SolverSettings};
pub use verifications::{CalculationMethod, VerificationResult};
