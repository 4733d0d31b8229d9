//! # game-fv-contract
//!
//! Symbolic values and the contract-specification builder.
//!
//! A contract binds one modeled function to a prestate (symbolic allocations
//! and preconditions), an execution step, and a poststate (memory assertions
//! and a return value). Contracts are pure data once built; the proof backend
//! evaluates them, not this crate.
//!
//! The builder fails fast: an internally inconsistent specification (a
//! duplicate variable name, a reference to an undeclared field, a
//! postcondition declared before the execution step) surfaces as a
//! [`SpecError`] at construction time, before the backend is ever invoked.
//!
//! ## Building a contract
//!
//! ```
//! use game_fv_contract::{ContractSpec, Term, Value};
//! use game_fv_layout::{LayoutModel, Shape};
//!
//! let mut spec = ContractSpec::new("checkStats", LayoutModel::game());
//! let (character, character_p) =
//!     spec.fresh_and_bind(Shape::record("character_t"), "character")?;
//! spec.precondition(Term::var(&character).field("hp").le(Term::u32(100)))?;
//! spec.execute(vec![Value::ptr(&character_p)])?;
//! spec.returns(Term::u32(170))?;
//! let contract = spec.finish()?;
//! assert_eq!(contract.function(), "checkStats");
//! # Ok::<(), game_fv_contract::SpecError>(())
//! ```

pub mod eval;
pub mod spec;
pub mod sym;
pub mod term;
pub mod value;

pub use spec::{Allocation, ContractSpec, PointsTo, ReturnSpec, SpecError};
pub use sym::{Location, Place, SymVar};
pub use term::Term;
pub use value::Value;
