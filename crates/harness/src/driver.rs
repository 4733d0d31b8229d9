//! Sequential verification driver.
//!
//! Loads the reference arithmetic model and the target module, builds the
//! seven contract instances, and submits them to the proof backend in fixed
//! order. Verification failures are recorded per contract and never stop the
//! remaining contracts; specification and environment errors abort the run
//! before (or instead of) further verification.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use game_fv_backend::{BackendError, ProofBackend, Session};
use game_fv_contract::SpecError;
use game_fv_layout::LayoutModel;

use crate::contracts::suite;
use crate::report::SuiteReport;

/// A fatal error: the suite produced no report.
#[derive(Debug)]
pub enum HarnessError {
    /// A contract was internally inconsistent (fails fast, before the
    /// backend sees it).
    Spec(SpecError),
    /// The environment is unusable: missing artifacts, prover not found,
    /// prover crashed mid-query.
    Backend(BackendError),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::Spec(err) => write!(f, "specification error: {err}"),
            HarnessError::Backend(err) => write!(f, "backend error: {err}"),
        }
    }
}

impl std::error::Error for HarnessError {}

impl From<SpecError> for HarnessError {
    fn from(err: SpecError) -> Self {
        HarnessError::Spec(err)
    }
}

impl From<BackendError> for HarnessError {
    fn from(err: BackendError) -> Self {
        HarnessError::Backend(err)
    }
}

/// File inputs for one verification run, located by convention relative to a
/// working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuitePlan {
    /// Compiled module artifact.
    pub module: PathBuf,
    /// Reference-spec source for the damage model.
    pub reference_spec: PathBuf,
}

impl SuitePlan {
    pub fn new(module: PathBuf, reference_spec: PathBuf) -> Self {
        Self {
            module,
            reference_spec,
        }
    }

    /// The conventional layout under a working directory.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            module: dir.join("artifacts/game.bc"),
            reference_spec: dir.join("specs/game.cry"),
        }
    }
}

/// Verify the whole game suite: seven contracts, one verdict each.
pub fn verify_game_suite<B: ProofBackend>(
    session: &mut Session<B>,
    plan: &SuitePlan,
) -> Result<SuiteReport, HarnessError> {
    // Environment first: without the reference model and the module no
    // verification is meaningful.
    session.load_reference_spec(&plan.reference_spec)?;
    let module = session.load_module(&plan.module)?;

    let layout = LayoutModel::game();
    let contracts = suite(&layout)?;

    let mut report = SuiteReport::new();
    for (id, contract) in contracts {
        tracing::debug!(contract = %id, "verifying");
        let started = Instant::now();
        let verdict = session.verify(&module, id.function, &contract)?;
        let elapsed = started.elapsed();
        tracing::info!(contract = %id, success = verdict.is_success(), "verdict received");
        report.record(id, verdict, elapsed);
    }
    Ok(report)
}
