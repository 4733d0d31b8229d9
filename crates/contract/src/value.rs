use serde::{Deserialize, Serialize};

use crate::sym::{Location, SymVar};
use crate::term::Term;

/// A setup value: something bound to symbolic memory or passed as a call
/// argument.
///
/// Values describe prestate contents (`alloc_with`), call arguments
/// (`execute`), and poststate memory contents (`points_to`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// A fresh symbolic variable.
    Sym(SymVar),
    /// Pointer to a symbolic allocation, by location id.
    Ptr(u32),
    /// Record literal, fields in declaration order.
    Record(Vec<Value>),
    /// An expression term.
    Expr(Term),
}

impl Value {
    pub fn sym(var: &SymVar) -> Self {
        Value::Sym(var.clone())
    }

    pub fn ptr(location: &Location) -> Self {
        Value::Ptr(location.id())
    }

    pub fn record(fields: Vec<Value>) -> Self {
        Value::Record(fields)
    }

    pub fn expr(term: Term) -> Self {
        Value::Expr(term)
    }

    pub fn u32(value: u32) -> Self {
        Value::Expr(Term::u32(value))
    }

    /// Visit every symbolic variable referenced by this value.
    pub fn for_each_var<'a>(&'a self, f: &mut impl FnMut(&'a SymVar)) {
        match self {
            Value::Sym(var) => f(var),
            Value::Ptr(_) => {}
            Value::Record(fields) => {
                for field in fields {
                    field.for_each_var(f);
                }
            }
            Value::Expr(term) => term.for_each_var(f),
        }
    }

    /// Visit every location id referenced by this value.
    pub fn for_each_ptr(&self, f: &mut impl FnMut(u32)) {
        match self {
            Value::Ptr(id) => f(*id),
            Value::Record(fields) => {
                for field in fields {
                    field.for_each_ptr(f);
                }
            }
            Value::Sym(_) | Value::Expr(_) => {}
        }
    }
}
