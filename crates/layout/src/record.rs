use serde::{Deserialize, Serialize};

use crate::shape::Shape;

/// Ordered field layout of one record type.
///
/// Field order and widths must match the target binary exactly; postcondition
/// assertions select fields by the indices declared here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLayout {
    name: String,
    fields: Vec<(String, Shape)>,
}

impl RecordLayout {
    pub fn new(name: impl Into<String>, fields: Vec<(&str, Shape)>) -> Self {
        Self {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(n, s)| (n.to_string(), s))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[(String, Shape)] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Look up a field by name, returning its declaration index and shape.
    pub fn field(&self, name: &str) -> Option<(usize, &Shape)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, (n, _))| n == name)
            .map(|(i, (_, shape))| (i, shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecordLayout {
        RecordLayout::new(
            "point_t",
            vec![("x", Shape::u32()), ("y", Shape::u32())],
        )
    }

    #[test]
    fn field_lookup_returns_index_and_shape() {
        let record = sample();
        let (index, shape) = record.field("y").unwrap();
        assert_eq!(index, 1);
        assert_eq!(*shape, Shape::u32());
    }

    #[test]
    fn unknown_field_is_none() {
        assert!(sample().field("z").is_none());
    }

    #[test]
    fn fields_preserve_declaration_order() {
        let record = sample();
        let names: Vec<&str> = record.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(record.field_count(), 2);
    }
}
