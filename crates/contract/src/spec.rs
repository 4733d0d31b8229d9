use std::fmt;

use serde::{Deserialize, Serialize};

use game_fv_layout::{LayoutError, LayoutModel, Shape};

use crate::sym::{Location, Place, SymVar};
use crate::term::Term;
use crate::value::Value;

/// Specification errors, raised while a contract is being built.
///
/// These all indicate an internally inconsistent contract and surface before
/// the proof backend is invoked; they are distinct from verification
/// failures, which arrive as non-success verdicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// A fresh variable name was reused within one contract.
    DuplicateVar(String),
    /// A term or value references a variable this contract never declared.
    UnknownVar(String),
    /// A place or pointer references an allocation this contract never made.
    UnknownLocation(u32),
    /// A record or field name failed to resolve against the layout model.
    Layout(LayoutError),
    /// A predicate position received a non-boolean term.
    NotBoolean(&'static str),
    /// A disjunction with no disjuncts, which no input could ever satisfy.
    EmptyDisjunction,
    /// A specification step was declared out of order.
    Phase(&'static str),
    /// The contract was finished without a required step.
    Incomplete(&'static str),
    /// Shapes disagree between a value and the memory it describes.
    ShapeMismatch(String),
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecError::DuplicateVar(name) => {
                write!(f, "symbolic variable declared twice: {name}")
            }
            SpecError::UnknownVar(name) => {
                write!(f, "reference to undeclared symbolic variable: {name}")
            }
            SpecError::UnknownLocation(id) => {
                write!(f, "reference to unknown allocation: location {id}")
            }
            SpecError::Layout(err) => write!(f, "layout error: {err}"),
            SpecError::NotBoolean(context) => {
                write!(f, "{context} requires a boolean predicate")
            }
            SpecError::EmptyDisjunction => {
                write!(f, "disjunction has no disjuncts and is unsatisfiable")
            }
            SpecError::Phase(msg) => write!(f, "specification step out of order: {msg}"),
            SpecError::Incomplete(msg) => write!(f, "incomplete contract: {msg}"),
            SpecError::ShapeMismatch(msg) => write!(f, "shape mismatch: {msg}"),
        }
    }
}

impl std::error::Error for SpecError {}

impl From<LayoutError> for SpecError {
    fn from(err: LayoutError) -> Self {
        SpecError::Layout(err)
    }
}

/// One symbolic allocation, with optional prestate contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: u32,
    pub shape: Shape,
    pub init: Option<Value>,
}

/// A poststate memory assertion: after execution, `place` holds `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsTo {
    pub place: Place,
    pub value: Value,
}

/// The asserted return value of the modeled call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnSpec {
    Void,
    Value(Term),
}

/// One contract instance: a modeled function, its symbolic prestate, the
/// execution step, and the asserted poststate.
///
/// Build order is enforced: fresh variables, allocations, and preconditions
/// describe the prestate and must precede [`execute`](Self::execute);
/// [`points_to`](Self::points_to) and [`returns`](Self::returns) describe
/// the poststate and must follow it. [`finish`](Self::finish) checks
/// completeness and seals the contract for submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractSpec {
    function: String,
    layout: LayoutModel,
    vars: Vec<SymVar>,
    allocs: Vec<Allocation>,
    preconditions: Vec<Term>,
    args: Vec<Value>,
    executed: bool,
    postconditions: Vec<PointsTo>,
    ret: Option<ReturnSpec>,
}

impl ContractSpec {
    pub fn new(function: impl Into<String>, layout: LayoutModel) -> Self {
        Self {
            function: function.into(),
            layout,
            vars: Vec::new(),
            allocs: Vec::new(),
            preconditions: Vec::new(),
            args: Vec::new(),
            executed: false,
            postconditions: Vec::new(),
            ret: None,
        }
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn layout(&self) -> &LayoutModel {
        &self.layout
    }

    pub fn vars(&self) -> &[SymVar] {
        &self.vars
    }

    pub fn allocations(&self) -> &[Allocation] {
        &self.allocs
    }

    pub fn preconditions(&self) -> &[Term] {
        &self.preconditions
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn postconditions(&self) -> &[PointsTo] {
        &self.postconditions
    }

    pub fn return_spec(&self) -> Option<&ReturnSpec> {
        self.ret.as_ref()
    }

    /// Introduce a fresh, unconstrained symbolic variable.
    ///
    /// Names are unique within one contract so later constraints cannot
    /// silently shadow an earlier variable.
    pub fn fresh_var(&mut self, shape: Shape, name: &str) -> Result<SymVar, SpecError> {
        if self.executed {
            return Err(SpecError::Phase("fresh variable declared after execute"));
        }
        if self.vars.iter().any(|v| v.name() == name) {
            return Err(SpecError::DuplicateVar(name.to_string()));
        }
        let shape = self.canonicalize_shape(&shape)?;
        let var = SymVar::new(self.vars.len() as u32, name, shape);
        self.vars.push(var.clone());
        Ok(var)
    }

    /// Allocate symbolic memory of the given shape, contents unconstrained.
    ///
    /// Record and pointer names inside the shape may be typedef aliases; they
    /// are resolved to canonical names here.
    pub fn alloc(&mut self, shape: Shape) -> Result<Location, SpecError> {
        self.alloc_inner(shape, None)
    }

    /// Allocate symbolic memory pre-populated with `init`.
    pub fn alloc_with(&mut self, shape: Shape, init: Value) -> Result<Location, SpecError> {
        self.alloc_inner(shape, Some(init))
    }

    /// Fresh variable plus an allocation bound to it, as a pair.
    ///
    /// The location is a true alias of the variable: reading it inside the
    /// modeled function observes the variable, so postconditions written
    /// against the variable describe the memory's prestate.
    pub fn fresh_and_bind(
        &mut self,
        shape: Shape,
        name: &str,
    ) -> Result<(SymVar, Location), SpecError> {
        let var = self.fresh_var(shape, name)?;
        let location = self.alloc_with(var.shape().clone(), Value::sym(&var))?;
        Ok((var, location))
    }

    /// Constrain the prestate.
    pub fn precondition(&mut self, term: Term) -> Result<(), SpecError> {
        if self.executed {
            return Err(SpecError::Phase("precondition declared after execute"));
        }
        if !term.is_boolean() {
            return Err(SpecError::NotBoolean("precondition"));
        }
        self.validate_term(&term)?;
        self.preconditions.push(term);
        Ok(())
    }

    /// Declare the call of the modeled function with the given arguments.
    ///
    /// Flips the contract from prestate to poststate specification; exactly
    /// one execution step is allowed.
    pub fn execute(&mut self, args: Vec<Value>) -> Result<(), SpecError> {
        if self.executed {
            return Err(SpecError::Phase("execute declared twice"));
        }
        for arg in &args {
            self.validate_value(arg, None)?;
        }
        self.args = args;
        self.executed = true;
        Ok(())
    }

    /// Assert poststate memory contents.
    pub fn points_to(&mut self, place: Place, value: Value) -> Result<(), SpecError> {
        if !self.executed {
            return Err(SpecError::Phase("points_to declared before execute"));
        }
        let expected = self.place_shape(&place)?;
        self.validate_value(&value, Some(&expected))?;
        self.postconditions.push(PointsTo { place, value });
        Ok(())
    }

    /// Assert the return value of the modeled call.
    pub fn returns(&mut self, term: Term) -> Result<(), SpecError> {
        if !self.executed {
            return Err(SpecError::Phase("return asserted before execute"));
        }
        if self.ret.is_some() {
            return Err(SpecError::Phase("return asserted twice"));
        }
        self.validate_term(&term)?;
        self.ret = Some(ReturnSpec::Value(term));
        Ok(())
    }

    /// Declare that the modeled call returns nothing.
    pub fn returns_void(&mut self) -> Result<(), SpecError> {
        if !self.executed {
            return Err(SpecError::Phase("return asserted before execute"));
        }
        if self.ret.is_some() {
            return Err(SpecError::Phase("return asserted twice"));
        }
        self.ret = Some(ReturnSpec::Void);
        Ok(())
    }

    /// Completeness check: an execution step and a return declaration are
    /// required before the contract can be submitted.
    pub fn finish(self) -> Result<ContractSpec, SpecError> {
        if !self.executed {
            return Err(SpecError::Incomplete("no execution step declared"));
        }
        if self.ret.is_none() {
            return Err(SpecError::Incomplete("no return value declared"));
        }
        Ok(self)
    }

    fn alloc_inner(&mut self, shape: Shape, init: Option<Value>) -> Result<Location, SpecError> {
        if self.executed {
            return Err(SpecError::Phase("allocation declared after execute"));
        }
        let shape = self.canonicalize_shape(&shape)?;
        if let Some(init) = &init {
            self.validate_value(init, Some(&shape))?;
        }
        let id = self.allocs.len() as u32;
        self.allocs.push(Allocation {
            id,
            shape: shape.clone(),
            init,
        });
        Ok(Location::new(id, shape))
    }

    /// Resolve typedef aliases inside a shape to canonical record names.
    fn canonicalize_shape(&self, shape: &Shape) -> Result<Shape, SpecError> {
        match shape {
            Shape::UInt { .. } => Ok(shape.clone()),
            Shape::Array { len, elem } => Ok(Shape::Array {
                len: *len,
                elem: Box::new(self.canonicalize_shape(elem)?),
            }),
            Shape::Record(name) => Ok(Shape::Record(self.layout.resolve(name)?.to_string())),
            Shape::Ptr(name) => Ok(Shape::Ptr(self.layout.resolve(name)?.to_string())),
        }
    }

    /// Shape of the memory a place denotes, following its field path.
    fn place_shape(&self, place: &Place) -> Result<Shape, SpecError> {
        let alloc = self
            .allocs
            .iter()
            .find(|a| a.id == place.location())
            .ok_or(SpecError::UnknownLocation(place.location()))?;
        let mut shape = alloc.shape.clone();
        for field in place.path() {
            match shape {
                Shape::Record(name) => {
                    shape = self.layout.field(&name, field)?.1.clone();
                }
                other => {
                    return Err(SpecError::ShapeMismatch(format!(
                        "field {field} selected from non-record shape {other:?}"
                    )));
                }
            }
        }
        Ok(shape)
    }

    /// Validate a term: all variables declared here, all field selections
    /// layout-valid, boolean/value positions consistent. Returns the term's
    /// shape, or `None` for boolean terms.
    fn validate_term(&self, term: &Term) -> Result<Option<Shape>, SpecError> {
        match term {
            Term::U32(_) => Ok(Some(Shape::u32())),
            Term::Var(var) => {
                let declared = self
                    .vars
                    .get(var.id() as usize)
                    .is_some_and(|v| v == var);
                if !declared {
                    return Err(SpecError::UnknownVar(var.name().to_string()));
                }
                Ok(Some(var.shape().clone()))
            }
            Term::Field(inner, field) => match self.validate_term(inner)? {
                Some(Shape::Record(record)) => {
                    Ok(Some(self.layout.field(&record, field)?.1.clone()))
                }
                Some(other) => Err(SpecError::ShapeMismatch(format!(
                    "field {field} selected from non-record shape {other:?}"
                ))),
                None => Err(SpecError::ShapeMismatch(format!(
                    "field {field} selected from a boolean term"
                ))),
            },
            Term::Zero(shape) => Ok(Some(self.canonicalize_shape(shape)?)),
            Term::RepeatByte { len, .. } => Ok(Some(Shape::byte_array(*len))),
            Term::Apply(_, args) => {
                // Reference-spec functions take and return 32-bit values.
                for arg in args {
                    self.expect_u32(arg, "reference function argument")?;
                }
                Ok(Some(Shape::u32()))
            }
            Term::Add(a, b) => {
                self.expect_u32(a, "arithmetic operand")?;
                self.expect_u32(b, "arithmetic operand")?;
                Ok(Some(Shape::u32()))
            }
            Term::Eq(a, b) => {
                let left = self.validate_term(a)?;
                let right = self.validate_term(b)?;
                match (left, right) {
                    (Some(l), Some(r)) if l == r => Ok(None),
                    (l, r) => Err(SpecError::ShapeMismatch(format!(
                        "equality between incompatible shapes {l:?} and {r:?}"
                    ))),
                }
            }
            Term::Le(a, b) | Term::Lt(a, b) | Term::Ge(a, b) | Term::Gt(a, b) => {
                self.expect_u32(a, "comparison operand")?;
                self.expect_u32(b, "comparison operand")?;
                Ok(None)
            }
            Term::And(terms) => {
                for t in terms {
                    self.expect_boolean(t, "conjunct")?;
                }
                Ok(None)
            }
            Term::Or(terms) => {
                if terms.is_empty() {
                    return Err(SpecError::EmptyDisjunction);
                }
                for t in terms {
                    self.expect_boolean(t, "disjunct")?;
                }
                Ok(None)
            }
            Term::Not(inner) => {
                self.expect_boolean(inner, "negated term")?;
                Ok(None)
            }
        }
    }

    fn expect_u32(&self, term: &Term, context: &str) -> Result<(), SpecError> {
        match self.validate_term(term)? {
            Some(shape) if shape.is_uint(32) => Ok(()),
            other => Err(SpecError::ShapeMismatch(format!(
                "{context} must be 32-bit, got {other:?}"
            ))),
        }
    }

    fn expect_boolean(&self, term: &Term, context: &'static str) -> Result<(), SpecError> {
        match self.validate_term(term)? {
            None => Ok(()),
            Some(_) => Err(SpecError::NotBoolean(context)),
        }
    }

    /// Validate a value, optionally against the shape of the memory it
    /// describes.
    fn validate_value(&self, value: &Value, expected: Option<&Shape>) -> Result<(), SpecError> {
        match value {
            Value::Sym(var) => {
                let declared = self
                    .vars
                    .get(var.id() as usize)
                    .is_some_and(|v| v == var);
                if !declared {
                    return Err(SpecError::UnknownVar(var.name().to_string()));
                }
                if let Some(expected) = expected
                    && var.shape() != expected
                {
                    return Err(SpecError::ShapeMismatch(format!(
                        "variable {} has shape {:?}, memory expects {expected:?}",
                        var.name(),
                        var.shape()
                    )));
                }
                Ok(())
            }
            Value::Ptr(id) => {
                let alloc = self
                    .allocs
                    .iter()
                    .find(|a| a.id == *id)
                    .ok_or(SpecError::UnknownLocation(*id))?;
                if let Some(expected) = expected {
                    let points_to_record = match expected {
                        Shape::Ptr(name) => Some(name),
                        _ => None,
                    };
                    let Some(record) = points_to_record else {
                        return Err(SpecError::ShapeMismatch(format!(
                            "pointer value where memory expects {expected:?}"
                        )));
                    };
                    if alloc.shape != Shape::Record(record.clone()) {
                        return Err(SpecError::ShapeMismatch(format!(
                            "pointer to {:?} where memory expects pointer to {record}",
                            alloc.shape
                        )));
                    }
                }
                Ok(())
            }
            Value::Record(fields) => {
                let Some(expected) = expected else {
                    for field in fields {
                        self.validate_value(field, None)?;
                    }
                    return Ok(());
                };
                let Shape::Record(name) = expected else {
                    return Err(SpecError::ShapeMismatch(format!(
                        "record literal where memory expects {expected:?}"
                    )));
                };
                let record = self.layout.record(name)?;
                if record.field_count() != fields.len() {
                    return Err(SpecError::ShapeMismatch(format!(
                        "record literal for {name} has {} fields, layout declares {}",
                        fields.len(),
                        record.field_count()
                    )));
                }
                for (value, (_, shape)) in fields.iter().zip(record.fields()) {
                    self.validate_value(value, Some(shape))?;
                }
                Ok(())
            }
            Value::Expr(term) => {
                let shape = self.validate_term(term)?;
                match (shape, expected) {
                    (_, None) => Ok(()),
                    (Some(shape), Some(expected)) if &shape == expected => Ok(()),
                    (Some(shape), Some(expected)) => Err(SpecError::ShapeMismatch(format!(
                        "expression has shape {shape:?}, memory expects {expected:?}"
                    ))),
                    (None, Some(expected)) => Err(SpecError::ShapeMismatch(format!(
                        "boolean expression where memory expects {expected:?}"
                    ))),
                }
            }
        }
    }
}
