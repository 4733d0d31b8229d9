//! Suite-level result aggregation and reporting.
//!
//! The aggregator holds one verdict per contract in submission order and
//! exposes a single pass/fail predicate: the logical AND of all verdicts.
//! Counterexample detail is opt-in and never affects the predicate.

use std::time::Duration;

use colored::Colorize;
use serde::{Deserialize, Serialize};

use game_fv_backend::Verdict;

use crate::contracts::ContractId;

/// One contract's outcome.
#[derive(Debug, Clone)]
pub struct ContractOutcome {
    pub id: ContractId,
    pub verdict: Verdict,
    pub duration: Duration,
}

/// Ordered collection of contract outcomes for one run.
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    outcomes: Vec<ContractOutcome>,
}

impl SuiteReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: ContractId, verdict: Verdict, duration: Duration) {
        self.outcomes.push(ContractOutcome {
            id,
            verdict,
            duration,
        });
    }

    pub fn outcomes(&self) -> &[ContractOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// The suite passes only if every contract was proved.
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.verdict.is_success())
    }

    pub fn proved_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.verdict.is_success())
            .count()
    }

    pub fn refuted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.verdict.is_refuted())
            .count()
    }

    pub fn unknown_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.verdict.is_unknown())
            .count()
    }

    /// Machine-readable form of the report.
    pub fn to_json(&self) -> JsonSuiteReport {
        JsonSuiteReport {
            passed: self.all_passed(),
            total: self.len(),
            proved: self.proved_count(),
            refuted: self.refuted_count(),
            unknown: self.unknown_count(),
            contracts: self
                .outcomes
                .iter()
                .map(|o| JsonContractOutcome {
                    contract: o.id.to_string(),
                    status: match &o.verdict {
                        Verdict::Proved => "proved".to_string(),
                        Verdict::Refuted(_) => "refuted".to_string(),
                        Verdict::Unknown(_) => "unknown".to_string(),
                    },
                    duration_ms: o.duration.as_millis() as u64,
                    counterexample: o.verdict.counterexample().map(|cex| {
                        cex.assignments
                            .iter()
                            .map(|(name, value)| JsonAssignment {
                                name: name.clone(),
                                value: value.clone(),
                            })
                            .collect()
                    }),
                    reason: match &o.verdict {
                        Verdict::Unknown(reason) => Some(reason.clone()),
                        _ => None,
                    },
                })
                .collect(),
        }
    }
}

/// JSON form of the suite report.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSuiteReport {
    pub passed: bool,
    pub total: usize,
    pub proved: usize,
    pub refuted: usize,
    pub unknown: usize,
    pub contracts: Vec<JsonContractOutcome>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonContractOutcome {
    pub contract: String,
    pub status: String,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterexample: Option<Vec<JsonAssignment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonAssignment {
    pub name: String,
    pub value: String,
}

/// Print per-contract results with color-coded status.
///
/// Output format:
/// ```text
///   [OK]      initDefaultPlayer (312ms)
///   [FAIL]    resolveAttack[normal]
///   [UNKNOWN] checkStats[fail] (timeout)
///
/// Suite: 5 OK, 1 FAIL, 1 UNKNOWN
/// ```
///
/// With `verbose`, counterexample assignments are listed under each failing
/// contract.
pub fn print_suite_report(report: &SuiteReport, verbose: bool) {
    eprintln!();
    for outcome in report.outcomes() {
        match &outcome.verdict {
            Verdict::Proved => {
                eprintln!(
                    "  {}      {} ({}ms)",
                    "[OK]".green().bold(),
                    outcome.id,
                    outcome.duration.as_millis(),
                );
            }
            Verdict::Refuted(cex) => {
                eprintln!("  {}    {}", "[FAIL]".red().bold(), outcome.id);
                if verbose && let Some(cex) = cex {
                    for (name, value) in &cex.assignments {
                        eprintln!("            {} = {}", name.dimmed(), value);
                    }
                }
            }
            Verdict::Unknown(reason) => {
                eprintln!(
                    "  {} {} ({reason})",
                    "[UNKNOWN]".yellow().bold(),
                    outcome.id,
                );
            }
        }
    }

    let mut parts = Vec::new();
    if report.proved_count() > 0 {
        parts.push(format!("{} {}", report.proved_count(), "OK".green()));
    }
    if report.refuted_count() > 0 {
        parts.push(format!("{} {}", report.refuted_count(), "FAIL".red()));
    }
    if report.unknown_count() > 0 {
        parts.push(format!("{} {}", report.unknown_count(), "UNKNOWN".yellow()));
    }

    eprintln!();
    eprintln!("Suite: {}", parts.join(", "));
    eprintln!();
}
