//! # game-fv-harness
//!
//! Behavioral contracts for the game module's character and sprite logic,
//! checked by symbolic execution through an external proof backend.
//!
//! Four functions are under contract: default player initialization, default
//! sprite initialization, attack resolution (three disjoint cases), and stat
//! validation (pass and fail cases). The driver submits all seven contract
//! instances in a fixed order and aggregates the verdicts into a single
//! suite result; one unprovable contract never stops the rest.

pub mod consts;
pub mod contracts;
pub mod driver;
pub mod report;

pub use contracts::{AttackCase, ContractId, StatsCase};
pub use driver::{HarnessError, SuitePlan, verify_game_suite};
pub use report::SuiteReport;
