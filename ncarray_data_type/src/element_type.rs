//! Element types and the type catalog.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FillValue;

/// An unrecognised or unsupported element type name.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown element type `{0}`")]
pub struct InvalidTypeError(String);

impl InvalidTypeError {
    /// Create a new [`InvalidTypeError`].
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Return the offending type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// The size of an element type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementTypeSize {
    /// A fixed number of bytes per element.
    Fixed(usize),
    /// A variable number of bytes per element.
    Variable,
}

/// A primitive element type.
///
/// The variants follow the classic netCDF type names.
/// [`ElementType::Char`] is an alias of an unsigned 8-bit integer used for character data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// A signed 8-bit integer.
    Byte,
    /// An 8-bit character.
    Char,
    /// A signed 16-bit integer.
    Short,
    /// A signed 32-bit integer.
    Int,
    /// A 32-bit IEEE 754 floating point number.
    Float,
    /// A 64-bit IEEE 754 floating point number.
    Double,
    /// An unsigned 8-bit integer.
    UByte,
    /// An unsigned 16-bit integer.
    UShort,
    /// An unsigned 32-bit integer.
    UInt,
    /// A signed 64-bit integer.
    Int64,
    /// A variable-length UTF-8 string.
    String,
}

/// An entry in the [`TYPE_CATALOG`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeCatalogEntry {
    /// The element type.
    pub element_type: ElementType,
    /// The human-readable name of the element type.
    pub name: &'static str,
    /// The size of one element.
    pub size: ElementTypeSize,
}

const fn entry(element_type: ElementType, name: &'static str, size: usize) -> TypeCatalogEntry {
    TypeCatalogEntry {
        element_type,
        name,
        size: if size == 0 {
            ElementTypeSize::Variable
        } else {
            ElementTypeSize::Fixed(size)
        },
    }
}

/// The type catalog, in [`ElementType`] declaration order.
pub static TYPE_CATALOG: [TypeCatalogEntry; 11] = [
    entry(ElementType::Byte, "byte", 1),
    entry(ElementType::Char, "char", 1),
    entry(ElementType::Short, "short", 2),
    entry(ElementType::Int, "int", 4),
    entry(ElementType::Float, "float", 4),
    entry(ElementType::Double, "double", 8),
    entry(ElementType::UByte, "ubyte", 1),
    entry(ElementType::UShort, "ushort", 2),
    entry(ElementType::UInt, "uint", 4),
    entry(ElementType::Int64, "int64", 8),
    entry(ElementType::String, "string", 0),
];

/// Return the size in bytes of one element of `element_type`, or `0` if it is variable-length.
#[must_use]
pub const fn size_of(element_type: ElementType) -> usize {
    match TYPE_CATALOG[element_type as usize].size {
        ElementTypeSize::Fixed(size) => size,
        ElementTypeSize::Variable => 0,
    }
}

/// Look up an element type by name.
///
/// Returns [`None`] if `name` is not in the [`TYPE_CATALOG`].
/// Callers must treat [`None`] as an input validation failure.
#[must_use]
pub fn tag_of(name: &str) -> Option<ElementType> {
    TYPE_CATALOG
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.element_type)
}

/// Return the human-readable name of `element_type`.
#[must_use]
pub const fn name_of(element_type: ElementType) -> &'static str {
    TYPE_CATALOG[element_type as usize].name
}

impl ElementType {
    /// All element types, in catalog order.
    pub const ALL: [ElementType; 11] = [
        Self::Byte,
        Self::Char,
        Self::Short,
        Self::Int,
        Self::Float,
        Self::Double,
        Self::UByte,
        Self::UShort,
        Self::UInt,
        Self::Int64,
        Self::String,
    ];

    /// Return the name of the element type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        name_of(self)
    }

    /// Return the size of the element type.
    #[must_use]
    pub const fn size(self) -> ElementTypeSize {
        TYPE_CATALOG[self as usize].size
    }

    /// Return the fixed size of the element type, or [`None`] if it is variable-length.
    #[must_use]
    pub const fn fixed_size(self) -> Option<usize> {
        match self.size() {
            ElementTypeSize::Fixed(size) => Some(size),
            ElementTypeSize::Variable => None,
        }
    }

    /// Returns true if the element type is the variable-length string type.
    #[must_use]
    pub const fn is_string(self) -> bool {
        matches!(self, Self::String)
    }

    /// Return the default fill value of the element type.
    ///
    /// These match the netCDF default fill values.
    #[must_use]
    pub fn default_fill_value(self) -> FillValue {
        match self {
            Self::Byte => FillValue::from(-127i8),
            Self::Char => FillValue::from(0u8),
            Self::Short => FillValue::from(-32767i16),
            Self::Int => FillValue::from(-2_147_483_647i32),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float => FillValue::from(9.969_209_968_386_869e36_f64 as f32),
            Self::Double => FillValue::from(9.969_209_968_386_869e36_f64),
            Self::UByte => FillValue::from(255u8),
            Self::UShort => FillValue::from(65535u16),
            Self::UInt => FillValue::from(4_294_967_295u32),
            Self::Int64 => FillValue::from(-9_223_372_036_854_775_806i64),
            Self::String => FillValue::from(""),
        }
    }
}

impl Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementType {
    type Err = InvalidTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        tag_of(s).ok_or_else(|| InvalidTypeError::new(s))
    }
}

impl TryFrom<&str> for ElementType {
    type Error = InvalidTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
