//! # Batch Verification
//!
//! Runs a list of independent checks. Each request owns its section and
//! materials, so with the `parallel` feature the requests run on the rayon
//! pool; results always come back in request order.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "title": "Floor 2 beams",
//!   "checks": [
//!     { "check": "flexure", "section": { ... }, "materials": { ... }, "forces": { "mx_knm": 20 } },
//!     { "check": "shear", "section": { ... }, "materials": { ... }, "shear_kn": 45, "method": "giangreco" }
//!   ]
//! }
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::CalcError;
use crate::verifications::flexure::{self, SizingInput, SizingResult};
use crate::verifications::{biaxial, column, shear, BiaxialInput, ColumnInput, FlexureInput, ShearInput, VerificationResult};

/// One check of a batch, tagged by `"check"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum CheckRequest {
    Flexure(FlexureInput),
    Shear(ShearInput),
    Column(ColumnInput),
    Biaxial(BiaxialInput),
    /// Inverse design of the tension steel
    Sizing(SizingInput),
}

/// Result of one request; errors stay per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Verified { result: VerificationResult },
    Sized { result: SizingResult },
    Failed { error: CalcError },
}

impl BatchOutcome {
    /// `true` for a verification that passed
    pub fn passed(&self) -> bool {
        matches!(self, BatchOutcome::Verified { result } if result.passes)
    }
}

impl CheckRequest {
    pub fn run(&self) -> BatchOutcome {
        let outcome = match self {
            CheckRequest::Flexure(input) => flexure::calculate(input).map(|result| BatchOutcome::Verified { result }),
            CheckRequest::Shear(input) => shear::calculate(input).map(|result| BatchOutcome::Verified { result }),
            CheckRequest::Column(input) => column::calculate(input).map(|result| BatchOutcome::Verified { result }),
            CheckRequest::Biaxial(input) => biaxial::calculate(input).map(|result| BatchOutcome::Verified { result }),
            CheckRequest::Sizing(input) => {
                flexure::size_tension_steel(input).map(|result| BatchOutcome::Sized { result })
            }
        };
        outcome.unwrap_or_else(|error| {
            log::warn!("check failed with {}: {error}", error.error_code());
            BatchOutcome::Failed { error }
        })
    }
}

/// Run every request, keeping request order.
pub fn verify_batch(requests: &[CheckRequest]) -> Vec<BatchOutcome> {
    #[cfg(feature = "parallel")]
    let iterator = requests.par_iter();

    #[cfg(not(feature = "parallel"))]
    let iterator = requests.iter();

    let outcomes: Vec<BatchOutcome> = iterator.map(CheckRequest::run).collect();
    log::debug!("batch of {} checks done", outcomes.len());
    outcomes
}

/// A job file: a titled list of checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchJob {
    #[serde(default)]
    pub title: Option<String>,
    pub checks: Vec<CheckRequest>,
}

/// Outcomes of a job with pass/fail counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    #[serde(default)]
    pub title: Option<String>,
    pub outcomes: Vec<BatchOutcome>,
    pub passed: usize,
    pub not_verified: usize,
    pub errors: usize,
}

impl BatchJob {
    pub fn run(&self) -> BatchReport {
        let outcomes = verify_batch(&self.checks);
        let passed = outcomes.iter().filter(|o| o.passed()).count();
        let errors = outcomes
            .iter()
            .filter(|o| matches!(o, BatchOutcome::Failed { .. }))
            .count();
        let not_verified = outcomes
            .iter()
            .filter(|o| matches!(o, BatchOutcome::Verified { result } if !result.passes))
            .count();
        BatchReport {
            title: self.title.clone(),
            outcomes,
            passed,
            not_verified,
            errors,
        }
    }
}
