//! # game-fv-backend
//!
//! Interface to the external proof backend.
//!
//! The backend is a black box from the harness's point of view: it accepts a
//! function name, a contract, and a loaded module, and answers with a
//! [`Verdict`]. This crate provides the [`ProofBackend`] trait, an explicit
//! [`Session`] handle with open/close lifecycle, and [`SubprocessProver`],
//! a client that spawns the symbolic-execution engine once per verification
//! query and speaks JSON over stdin/stdout.
//!
//! Every query is self-contained; the only state shared between queries is
//! the read-only loaded module and reference spec.

pub mod config;
pub mod error;
pub mod prover;
pub mod session;
pub mod verdict;
pub mod wire;

pub use config::ProverConfig;
pub use error::BackendError;
pub use prover::SubprocessProver;
pub use session::{ModuleHandle, ProofBackend, Session, SpecHandle};
pub use verdict::{Counterexample, Verdict};
