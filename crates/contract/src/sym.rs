use serde::{Deserialize, Serialize};

use game_fv_layout::Shape;

/// A named, freshly introduced, unconstrained symbolic value.
///
/// Fresh variables are scoped to the contract that introduced them and never
/// alias across contracts; [`ContractSpec::fresh_var`](crate::ContractSpec::fresh_var)
/// rejects duplicate names within one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymVar {
    id: u32,
    name: String,
    shape: Shape,
}

impl SymVar {
    pub(crate) fn new(id: u32, name: impl Into<String>, shape: Shape) -> Self {
        Self {
            id,
            name: name.into(),
            shape,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

/// A scoped symbolic allocation.
///
/// Reading the location inside the modeled function observes whatever value
/// the contract bound to it at specification time; postconditions address it
/// through [`Place`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    id: u32,
    shape: Shape,
}

impl Location {
    pub(crate) fn new(id: u32, shape: Shape) -> Self {
        Self { id, shape }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Canonical shape of the allocation (aliases already resolved).
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The whole allocation as an assertable place.
    pub fn place(&self) -> Place {
        Place {
            location: self.id,
            path: Vec::new(),
        }
    }

    /// Shorthand for selecting one field of a record allocation.
    pub fn field(&self, name: impl Into<String>) -> Place {
        self.place().field(name)
    }
}

/// A memory place: an allocation plus a (possibly empty) field path into it.
///
/// Field names are validated against the layout when the place is used in a
/// postcondition, not when it is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    location: u32,
    path: Vec<String>,
}

impl Place {
    pub fn location(&self) -> u32 {
        self.location
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Extend the path by one field selection.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.path.push(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_of_whole_location_has_empty_path() {
        let loc = Location::new(3, Shape::record("character_t"));
        let place = loc.place();
        assert_eq!(place.location(), 3);
        assert!(place.path().is_empty());
    }

    #[test]
    fn field_selection_extends_path() {
        let loc = Location::new(0, Shape::record("character_t"));
        let place = loc.field("hp");
        assert_eq!(place.path(), ["hp".to_string()]);

        let nested = loc.place().field("a").field("b");
        assert_eq!(nested.path(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn sym_var_accessors() {
        let var = SymVar::new(1, "atk", Shape::u32());
        assert_eq!(var.id(), 1);
        assert_eq!(var.name(), "atk");
        assert!(var.shape().is_uint(32));
    }
}
