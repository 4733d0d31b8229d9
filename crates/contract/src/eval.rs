//! Concrete evaluation of spec terms.
//!
//! Verification always goes through the proof backend; this module exists so
//! tests and pre-submission sanity checks can evaluate a contract's
//! predicates against concrete assignments, for example checking that a
//! case split's preconditions cover the legal input domain. Arithmetic is
//! 32-bit wrapping, matching the bitvector semantics the backend uses.

use std::collections::HashMap;
use std::fmt;

use game_fv_layout::{LayoutModel, Shape};

use crate::term::Term;

/// A concrete value produced by evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CVal {
    U32(u32),
    Byte(u8),
    Bool(bool),
    Array(Vec<CVal>),
    Record(Vec<CVal>),
}

impl CVal {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CVal::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            CVal::U32(v) => Some(*v),
            _ => None,
        }
    }
}

/// Evaluation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A variable had no binding in the environment.
    UnboundVar(String),
    /// An applied function was not registered.
    UnknownFunction(String),
    /// A field selection failed to resolve.
    UnknownField(String),
    /// An operation received a value of the wrong kind.
    TypeMismatch(&'static str),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnboundVar(name) => write!(f, "unbound variable: {name}"),
            EvalError::UnknownFunction(name) => {
                write!(f, "unknown reference function: {name}")
            }
            EvalError::UnknownField(name) => write!(f, "cannot resolve field: {name}"),
            EvalError::TypeMismatch(context) => write!(f, "type mismatch in {context}"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Concrete bindings: variable assignments plus registered pure functions
/// standing in for the reference arithmetic model.
#[derive(Default)]
pub struct Env {
    vars: HashMap<String, CVal>,
    funs: HashMap<String, Box<dyn Fn(&[u32]) -> u32>>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable by name.
    pub fn bind(&mut self, name: impl Into<String>, value: CVal) -> &mut Self {
        self.vars.insert(name.into(), value);
        self
    }

    pub fn bind_u32(&mut self, name: impl Into<String>, value: u32) -> &mut Self {
        self.bind(name, CVal::U32(value))
    }

    /// Register a pure function by its reference-spec name.
    pub fn register_fn(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&[u32]) -> u32 + 'static,
    ) -> &mut Self {
        self.funs.insert(name.into(), Box::new(f));
        self
    }
}

/// Evaluate a term under the given environment and layout.
pub fn eval(term: &Term, env: &Env, layout: &LayoutModel) -> Result<CVal, EvalError> {
    match term {
        Term::U32(v) => Ok(CVal::U32(*v)),
        Term::Var(var) => env
            .vars
            .get(var.name())
            .cloned()
            .ok_or_else(|| EvalError::UnboundVar(var.name().to_string())),
        Term::Field(inner, field) => {
            let record = record_name(inner, layout)
                .ok_or_else(|| EvalError::UnknownField(field.clone()))?;
            let (index, _) = layout
                .field(&record, field)
                .map_err(|_| EvalError::UnknownField(field.clone()))?;
            match eval(inner, env, layout)? {
                CVal::Record(fields) => fields
                    .into_iter()
                    .nth(index)
                    .ok_or(EvalError::TypeMismatch("field selection")),
                _ => Err(EvalError::TypeMismatch("field selection")),
            }
        }
        Term::Zero(shape) => zero_value(shape, layout),
        Term::RepeatByte { byte, len } => Ok(CVal::Array(vec![CVal::Byte(*byte); *len])),
        Term::Apply(name, args) => {
            let f = env
                .funs
                .get(name)
                .ok_or_else(|| EvalError::UnknownFunction(name.clone()))?;
            let mut concrete = Vec::with_capacity(args.len());
            for arg in args {
                concrete.push(
                    eval(arg, env, layout)?
                        .as_u32()
                        .ok_or(EvalError::TypeMismatch("reference function argument"))?,
                );
            }
            Ok(CVal::U32(f(&concrete)))
        }
        Term::Add(a, b) => {
            let a = eval_u32(a, env, layout)?;
            let b = eval_u32(b, env, layout)?;
            Ok(CVal::U32(a.wrapping_add(b)))
        }
        Term::Eq(a, b) => {
            let a = eval(a, env, layout)?;
            let b = eval(b, env, layout)?;
            Ok(CVal::Bool(a == b))
        }
        Term::Le(a, b) => compare(a, b, env, layout, |a, b| a <= b),
        Term::Lt(a, b) => compare(a, b, env, layout, |a, b| a < b),
        Term::Ge(a, b) => compare(a, b, env, layout, |a, b| a >= b),
        Term::Gt(a, b) => compare(a, b, env, layout, |a, b| a > b),
        Term::And(terms) => {
            for t in terms {
                if !eval_bool(t, env, layout)? {
                    return Ok(CVal::Bool(false));
                }
            }
            Ok(CVal::Bool(true))
        }
        Term::Or(terms) => {
            for t in terms {
                if eval_bool(t, env, layout)? {
                    return Ok(CVal::Bool(true));
                }
            }
            Ok(CVal::Bool(false))
        }
        Term::Not(inner) => Ok(CVal::Bool(!eval_bool(inner, env, layout)?)),
    }
}

/// Evaluate a boolean term, erroring on value terms.
pub fn eval_bool(term: &Term, env: &Env, layout: &LayoutModel) -> Result<bool, EvalError> {
    eval(term, env, layout)?
        .as_bool()
        .ok_or(EvalError::TypeMismatch("boolean position"))
}

fn eval_u32(term: &Term, env: &Env, layout: &LayoutModel) -> Result<u32, EvalError> {
    eval(term, env, layout)?
        .as_u32()
        .ok_or(EvalError::TypeMismatch("32-bit position"))
}

fn compare(
    a: &Term,
    b: &Term,
    env: &Env,
    layout: &LayoutModel,
    op: impl Fn(u32, u32) -> bool,
) -> Result<CVal, EvalError> {
    Ok(CVal::Bool(op(
        eval_u32(a, env, layout)?,
        eval_u32(b, env, layout)?,
    )))
}

/// Record name of a record-shaped term, for field-index resolution.
fn record_name(term: &Term, layout: &LayoutModel) -> Option<String> {
    match term {
        Term::Var(var) => match var.shape() {
            Shape::Record(name) => Some(name.clone()),
            _ => None,
        },
        Term::Field(inner, field) => {
            let record = record_name(inner, layout)?;
            match layout.field(&record, field).ok()?.1 {
                Shape::Record(name) => Some(name.clone()),
                _ => None,
            }
        }
        _ => None,
    }
}

fn zero_value(shape: &Shape, layout: &LayoutModel) -> Result<CVal, EvalError> {
    match shape {
        Shape::UInt { bits: 8 } => Ok(CVal::Byte(0)),
        Shape::UInt { bits: 32 } => Ok(CVal::U32(0)),
        Shape::UInt { .. } => Err(EvalError::TypeMismatch("unsupported integer width")),
        Shape::Array { len, elem } => {
            let zero = zero_value(elem, layout)?;
            Ok(CVal::Array(vec![zero; *len]))
        }
        Shape::Record(name) => {
            let record = layout
                .record(name)
                .map_err(|_| EvalError::UnknownField(name.clone()))?;
            let mut fields = Vec::with_capacity(record.field_count());
            for (_, field_shape) in record.fields() {
                fields.push(zero_value(field_shape, layout)?);
            }
            Ok(CVal::Record(fields))
        }
        Shape::Ptr(_) => Err(EvalError::TypeMismatch("pointer has no concrete value")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ContractSpec;
    use crate::sym::SymVar;

    fn layout() -> LayoutModel {
        LayoutModel::game()
    }

    /// A character record value with the given stats, name zeroed.
    fn character(level: u32, hp: u32, atk: u32, def: u32, spd: u32) -> CVal {
        CVal::Record(vec![
            CVal::Array(vec![CVal::Byte(0); game_fv_layout::MAX_NAME_LENGTH]),
            CVal::U32(level),
            CVal::U32(hp),
            CVal::U32(atk),
            CVal::U32(def),
            CVal::U32(spd),
        ])
    }

    fn stat_vars() -> (SymVar, SymVar) {
        let mut spec = ContractSpec::new("f", layout());
        let target = spec
            .fresh_var(Shape::record("character_t"), "target")
            .unwrap();
        let atk = spec.fresh_var(Shape::u32(), "atk").unwrap();
        (target, atk)
    }

    #[test]
    fn field_selection_reads_record_fields() {
        let (target, _) = stat_vars();
        let mut env = Env::new();
        env.bind("target", character(1, 10, 5, 4, 3));

        let hp = eval(&Term::var(&target).field("hp"), &env, &layout()).unwrap();
        assert_eq!(hp, CVal::U32(10));
        let spd = eval(&Term::var(&target).field("spd"), &env, &layout()).unwrap();
        assert_eq!(spd, CVal::U32(3));
    }

    #[test]
    fn arithmetic_wraps_at_32_bits() {
        let (_, atk) = stat_vars();
        let mut env = Env::new();
        env.bind_u32("atk", u32::MAX);

        let sum = eval(&Term::var(&atk).add(Term::u32(2)), &env, &layout()).unwrap();
        assert_eq!(sum, CVal::U32(1));
    }

    #[test]
    fn comparisons_are_unsigned() {
        let (_, atk) = stat_vars();
        let mut env = Env::new();
        env.bind_u32("atk", 100);

        let le = Term::var(&atk).le(Term::u32(100));
        assert!(eval_bool(&le, &env, &layout()).unwrap());
        let gt = Term::var(&atk).gt(Term::u32(100));
        assert!(!eval_bool(&gt, &env, &layout()).unwrap());
    }

    #[test]
    fn disjunction_short_circuits() {
        let (_, atk) = stat_vars();
        let mut env = Env::new();
        env.bind_u32("atk", 101);

        let any = Term::any(vec![
            Term::var(&atk).gt(Term::u32(100)),
            // would error if evaluated: unbound variable
            Term::var(&SymVar::new(9, "missing", Shape::u32())).gt(Term::u32(0)),
        ]);
        assert!(eval_bool(&any, &env, &layout()).unwrap());
    }

    #[test]
    fn registered_function_applies() {
        let (target, atk) = stat_vars();
        let mut env = Env::new();
        env.bind("target", character(1, 80, 5, 10, 3));
        env.bind_u32("atk", 50);
        env.register_fn("resolveAttack", |args| args[0] - (args[2] - args[1]));

        let term = Term::apply(
            "resolveAttack",
            vec![
                Term::var(&target).field("hp"),
                Term::var(&target).field("def"),
                Term::var(&atk),
            ],
        );
        assert_eq!(eval(&term, &env, &layout()).unwrap(), CVal::U32(40));
    }

    #[test]
    fn unregistered_function_errors() {
        let env = Env::new();
        let err = eval(&Term::apply("resolveAttack", vec![]), &env, &layout()).unwrap_err();
        assert_eq!(
            err,
            EvalError::UnknownFunction("resolveAttack".to_string())
        );
    }

    #[test]
    fn unbound_variable_errors() {
        let (_, atk) = stat_vars();
        let env = Env::new();
        let err = eval(&Term::var(&atk), &env, &layout()).unwrap_err();
        assert_eq!(err, EvalError::UnboundVar("atk".to_string()));
    }

    #[test]
    fn zero_and_repeat_shapes() {
        let env = Env::new();
        let zero = eval(
            &Term::zero(Shape::byte_array(3)),
            &env,
            &layout(),
        )
        .unwrap();
        assert_eq!(zero, CVal::Array(vec![CVal::Byte(0); 3]));

        let name = eval(&Term::repeat_byte(0x41, 2), &env, &layout()).unwrap();
        assert_eq!(name, CVal::Array(vec![CVal::Byte(0x41); 2]));
    }
}
