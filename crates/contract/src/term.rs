use serde::{Deserialize, Serialize};

use game_fv_layout::Shape;

use crate::sym::SymVar;

/// A predicate or expression over symbolic values.
///
/// Terms appear in preconditions (boolean terms over the prestate),
/// postcondition values, and return-value assertions. They are data only;
/// the proof backend interprets them. Comparisons are unsigned, and
/// arithmetic is fixed-width with wraparound, matching the bitvector
/// semantics of the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
    /// 32-bit unsigned literal.
    U32(u32),
    /// Reference to a fresh symbolic variable.
    Var(SymVar),
    /// Field of a record-shaped term, selected by name.
    Field(Box<Term>, String),
    /// The all-zero value of a shape.
    Zero(Shape),
    /// One byte repeated across a fixed-length buffer.
    RepeatByte { byte: u8, len: usize },
    /// Application of a function from the loaded reference spec.
    ///
    /// The harness never evaluates these during verification; the backend
    /// resolves the name against the reference spec and treats the result
    /// as ground truth.
    Apply(String, Vec<Term>),
    /// `a + b` (wrapping, 32-bit).
    Add(Box<Term>, Box<Term>),
    /// `a == b`.
    Eq(Box<Term>, Box<Term>),
    /// `a <= b` (unsigned).
    Le(Box<Term>, Box<Term>),
    /// `a < b` (unsigned).
    Lt(Box<Term>, Box<Term>),
    /// `a >= b` (unsigned).
    Ge(Box<Term>, Box<Term>),
    /// `a > b` (unsigned).
    Gt(Box<Term>, Box<Term>),
    /// N-ary conjunction.
    And(Vec<Term>),
    /// N-ary disjunction.
    Or(Vec<Term>),
    /// Negation.
    Not(Box<Term>),
}

impl Term {
    pub fn u32(value: u32) -> Self {
        Term::U32(value)
    }

    pub fn var(var: &SymVar) -> Self {
        Term::Var(var.clone())
    }

    pub fn zero(shape: Shape) -> Self {
        Term::Zero(shape)
    }

    pub fn repeat_byte(byte: u8, len: usize) -> Self {
        Term::RepeatByte { byte, len }
    }

    pub fn apply(function: impl Into<String>, args: Vec<Term>) -> Self {
        Term::Apply(function.into(), args)
    }

    pub fn field(self, name: impl Into<String>) -> Self {
        Term::Field(Box::new(self), name.into())
    }

    pub fn add(self, rhs: Term) -> Self {
        Term::Add(Box::new(self), Box::new(rhs))
    }

    /// Equality predicate (distinct from `PartialEq` on terms themselves).
    pub fn equals(self, rhs: Term) -> Self {
        Term::Eq(Box::new(self), Box::new(rhs))
    }

    pub fn le(self, rhs: Term) -> Self {
        Term::Le(Box::new(self), Box::new(rhs))
    }

    pub fn lt(self, rhs: Term) -> Self {
        Term::Lt(Box::new(self), Box::new(rhs))
    }

    pub fn ge(self, rhs: Term) -> Self {
        Term::Ge(Box::new(self), Box::new(rhs))
    }

    pub fn gt(self, rhs: Term) -> Self {
        Term::Gt(Box::new(self), Box::new(rhs))
    }

    /// Conjunction of all given predicates.
    pub fn all(terms: Vec<Term>) -> Self {
        Term::And(terms)
    }

    /// Disjunction: any one of the given predicates suffices.
    pub fn any(terms: Vec<Term>) -> Self {
        Term::Or(terms)
    }

    pub fn negate(self) -> Self {
        Term::Not(Box::new(self))
    }

    /// Whether the term denotes a boolean (a predicate rather than a value).
    pub fn is_boolean(&self) -> bool {
        matches!(
            self,
            Term::Eq(..)
                | Term::Le(..)
                | Term::Lt(..)
                | Term::Ge(..)
                | Term::Gt(..)
                | Term::And(_)
                | Term::Or(_)
                | Term::Not(_)
        )
    }

    /// Visit every symbolic variable referenced by this term.
    pub fn for_each_var<'a>(&'a self, f: &mut impl FnMut(&'a SymVar)) {
        match self {
            Term::Var(var) => f(var),
            Term::Field(inner, _) | Term::Not(inner) => inner.for_each_var(f),
            Term::Add(a, b)
            | Term::Eq(a, b)
            | Term::Le(a, b)
            | Term::Lt(a, b)
            | Term::Ge(a, b)
            | Term::Gt(a, b) => {
                a.for_each_var(f);
                b.for_each_var(f);
            }
            Term::Apply(_, terms) | Term::And(terms) | Term::Or(terms) => {
                for term in terms {
                    term.for_each_var(f);
                }
            }
            Term::U32(_) | Term::Zero(_) | Term::RepeatByte { .. } => {}
        }
    }
}
