//! game-fv: verify the game module's behavioral contracts.
//!
//! Usage:
//!   game-fv [--verbose] [--json] [DIR]
//!
//! DIR defaults to the current directory and must contain the conventional
//! artifacts: `artifacts/game.bc` (compiled module) and `specs/game.cry`
//! (reference spec). The prover binary is located via `GAME_FV_PROVER` or
//! PATH.
//!
//! Exit codes: 0 = suite passed, 1 = at least one contract failed,
//! 2 = environment or specification error.

use std::path::PathBuf;
use std::process::ExitCode;

use colored::Colorize;

use game_fv_backend::{ProverConfig, Session, SubprocessProver};
use game_fv_harness::driver::{SuitePlan, verify_game_suite};
use game_fv_harness::report::print_suite_report;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let mut verbose = false;
    let mut json = false;
    let mut dir = PathBuf::from(".");
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--verbose" => verbose = true,
            "--json" => json = true,
            "--help" | "-h" => {
                eprintln!("usage: game-fv [--verbose] [--json] [DIR]");
                return ExitCode::SUCCESS;
            }
            other => dir = PathBuf::from(other),
        }
    }

    let config = match ProverConfig::auto_detect() {
        Ok(config) => config,
        Err(err) => return fatal(&err),
    };

    let mut session = match Session::connect(SubprocessProver::new(config), true) {
        Ok(session) => session,
        Err(err) => return fatal(&err),
    };

    let plan = SuitePlan::from_dir(&dir);
    let report = match verify_game_suite(&mut session, &plan) {
        Ok(report) => report,
        Err(err) => return fatal(&err),
    };

    if let Err(err) = session.close() {
        tracing::warn!("failed to close prover session: {err}");
    }

    if json {
        match serde_json::to_string_pretty(&report.to_json()) {
            Ok(text) => println!("{text}"),
            Err(err) => return fatal(&err),
        }
    } else {
        print_suite_report(&report, verbose);
    }

    if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn fatal(err: &dyn std::error::Error) -> ExitCode {
    eprintln!("{} {err}", "error:".red().bold());
    ExitCode::from(2)
}
