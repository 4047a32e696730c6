//! # rc_cli
//!
//! Runs a JSON job file of section checks and prints the outcomes.
//!
//! ```text
//! rc_cli job.json
//! RUST_LOG=debug rc_cli job.json
//! ```
//!
//! The job file is a [`BatchJob`]: an optional title and a list of checks
//! tagged by `"check"` (`flexure`, `shear`, `column`, `biaxial`, `sizing`).

use std::fs;
use std::process::ExitCode;

use rc_core::{BatchJob, BatchOutcome, CalcError};

fn load_job(path: &str) -> Result<BatchJob, CalcError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CalcError::invalid_input("job", path, format!("Cannot read file: {e}")))?;
    Ok(serde_json::from_str(&text)?)
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: rc_cli <job.json>");
        return ExitCode::from(2);
    };

    let job = match load_job(&path) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            return ExitCode::from(2);
        }
    };
    log::info!("loaded {} checks from {}", job.checks.len(), path);

    let report = job.run();

    println!("═══════════════════════════════════════");
    println!("  {}", report.title.as_deref().unwrap_or("SECTION CHECKS"));
    println!("═══════════════════════════════════════");
    for (i, outcome) in report.outcomes.iter().enumerate() {
        match outcome {
            BatchOutcome::Verified { result } => {
                println!("{:>3}. {} {}", i + 1, status_icon(result.passes), result.summary);
                for check in &result.stresses {
                    println!(
                        "       {:<24} {:>9.3} / {:>9.3} MPa",
                        check.label, check.actual_mpa, check.admissible_mpa
                    );
                }
            }
            BatchOutcome::Sized { result } => {
                println!(
                    "{:>3}. [SIZED] As = {:.0} mm² -> {} bars ({:.0} mm²), x = {:.1} mm ({})",
                    i + 1,
                    result.required_area_mm2,
                    result.bar_count,
                    result.provided_area_mm2,
                    result.neutral_axis_mm,
                    result.governing.display_name()
                );
            }
            BatchOutcome::Failed { error } => {
                println!("{:>3}. [ERROR] {} ({})", i + 1, error, error.error_code());
            }
        }
    }
    println!("═══════════════════════════════════════");
    println!(
        "  {} verified, {} not verified, {} errors",
        report.passed, report.not_verified, report.errors
    );
    println!("═══════════════════════════════════════");

    println!();
    println!("JSON Output:");
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: {}", e),
    }

    if report.errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
