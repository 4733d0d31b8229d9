use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::RecordLayout;
use crate::shape::Shape;
use crate::{ANIMATION_STEPS, DIRECTIONS, GAITS, MAX_NAME_LENGTH};

/// Errors from layout lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// No record or alias registered under this name.
    UnknownRecord(String),
    /// The record exists but has no such field.
    UnknownField { record: String, field: String },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::UnknownRecord(name) => write!(f, "unknown record type: {name}"),
            LayoutError::UnknownField { record, field } => {
                write!(f, "record {record} has no field named {field}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Registry of record layouts plus an explicit typedef-alias table.
///
/// Aliases are resolved through [`LayoutModel::resolve`] rather than by name
/// identity, so a contract can allocate through the typedef name the target
/// function is declared with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutModel {
    records: Vec<RecordLayout>,
    aliases: Vec<(String, String)>,
}

impl LayoutModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&mut self, record: RecordLayout) {
        self.records.push(record);
    }

    pub fn add_alias(&mut self, alias: impl Into<String>, canonical: impl Into<String>) {
        self.aliases.push((alias.into(), canonical.into()));
    }

    /// Resolve a type name to its canonical record name, following aliases.
    pub fn resolve<'a>(&'a self, name: &'a str) -> Result<&'a str, LayoutError> {
        let mut current = name;
        // Hop bound rejects cyclic alias tables instead of spinning.
        for _ in 0..=self.aliases.len() {
            if let Some((_, canonical)) = self.aliases.iter().find(|(a, _)| a == current) {
                current = canonical;
                continue;
            }
            if self.records.iter().any(|r| r.name() == current) {
                return Ok(current);
            }
            break;
        }
        Err(LayoutError::UnknownRecord(name.to_string()))
    }

    /// Look up a record layout by name or alias.
    pub fn record(&self, name: &str) -> Result<&RecordLayout, LayoutError> {
        let canonical = self.resolve(name)?;
        self.records
            .iter()
            .find(|r| r.name() == canonical)
            .ok_or_else(|| LayoutError::UnknownRecord(name.to_string()))
    }

    /// Look up a field of a record, returning its index and shape.
    pub fn field(&self, record: &str, field: &str) -> Result<(usize, &Shape), LayoutError> {
        let layout = self.record(record)?;
        layout.field(field).ok_or_else(|| LayoutError::UnknownField {
            record: layout.name().to_string(),
            field: field.to_string(),
        })
    }

    /// Exact size of a shape in bytes, as laid out in the target binary.
    ///
    /// Pointers count at the target's pointer width (8 bytes).
    pub fn byte_size(&self, shape: &Shape) -> Result<usize, LayoutError> {
        match shape {
            Shape::UInt { bits } => Ok((*bits as usize).div_ceil(8)),
            Shape::Array { len, elem } => Ok(len * self.byte_size(elem)?),
            Shape::Ptr(_) => Ok(8),
            Shape::Record(name) => {
                let record = self.record(name)?;
                let mut total = 0;
                for (_, field_shape) in record.fields() {
                    total += self.byte_size(field_shape)?;
                }
                Ok(total)
            }
        }
    }

    /// The layout model of the game module under verification.
    pub fn game() -> Self {
        let mut model = Self::new();
        model.add_record(RecordLayout::new(
            "character_t",
            vec![
                ("name", Shape::byte_array(MAX_NAME_LENGTH)),
                ("level", Shape::u32()),
                ("hp", Shape::u32()),
                ("atk", Shape::u32()),
                ("def", Shape::u32()),
                ("spd", Shape::u32()),
            ],
        ));
        model.add_record(RecordLayout::new(
            "sprite_t",
            vec![
                ("character", Shape::ptr("character_t")),
                ("frames", frames_shape()),
                ("xPos", Shape::u32()),
                ("yPos", Shape::u32()),
            ],
        ));
        // player_t is a typedef of character_t in the target headers.
        model.add_alias("player_t", "character_t");
        model
    }
}

/// Shape of a sprite's frame store: `[GAITS][DIRECTIONS][ANIMATION_STEPS]`
/// single bytes.
pub fn frames_shape() -> Shape {
    Shape::array(
        GAITS,
        Shape::array(DIRECTIONS, Shape::byte_array(ANIMATION_STEPS)),
    )
}
