use serde::{Deserialize, Serialize};

/// An element shape the proof backend can represent.
///
/// Shapes describe symbolic values and symbolic allocations: fixed-width
/// unsigned integers, fixed-size arrays (arbitrarily nested), named records,
/// and pointers to named records. Record and pointer names refer into a
/// [`LayoutModel`](crate::LayoutModel), which owns field order and widths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// Fixed-width unsigned integer.
    UInt { bits: u32 },
    /// Fixed-size array of a single element shape.
    Array { len: usize, elem: Box<Shape> },
    /// A record laid out under this name in the layout model.
    Record(String),
    /// Pointer to a named record.
    Ptr(String),
}

impl Shape {
    /// Single byte.
    pub fn u8() -> Self {
        Shape::UInt { bits: 8 }
    }

    /// 32-bit unsigned integer, the width of every scalar stat field.
    pub fn u32() -> Self {
        Shape::UInt { bits: 32 }
    }

    /// Fixed-size array of `elem`.
    pub fn array(len: usize, elem: Shape) -> Self {
        Shape::Array {
            len,
            elem: Box::new(elem),
        }
    }

    /// Flat byte buffer of the given length.
    pub fn byte_array(len: usize) -> Self {
        Self::array(len, Self::u8())
    }

    /// Named record shape.
    pub fn record(name: impl Into<String>) -> Self {
        Shape::Record(name.into())
    }

    /// Pointer to a named record.
    pub fn ptr(name: impl Into<String>) -> Self {
        Shape::Ptr(name.into())
    }

    /// Returns `true` for fixed-width integer shapes of the given width.
    pub fn is_uint(&self, bits: u32) -> bool {
        matches!(self, Shape::UInt { bits: b } if *b == bits)
    }
}
