//! Fill values.
//!
//! A fill value is the element value reported for portions of a variable that have not been written.

use thiserror::Error;

use crate::ElementType;

/// An element type and fill value incompatibility error.
#[derive(Clone, Debug, Error)]
#[error("incompatible fill value {1} for element type {0}")]
pub struct ElementTypeFillValueError(ElementType, FillValue);

impl ElementTypeFillValueError {
    /// Create a new incompatible fill value error.
    #[must_use]
    pub const fn new(element_type: ElementType, fill_value: FillValue) -> Self {
        Self(element_type, fill_value)
    }
}

/// A fill value.
///
/// Holds the native-endian bytes of exactly one element.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FillValue(Vec<u8>);

impl core::fmt::Display for FillValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<&[u8]> for FillValue {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl From<Vec<u8>> for FillValue {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

macro_rules! impl_fill_value_from_ne_bytes {
    ($($t:ty),+) => {
        $(
            impl From<$t> for FillValue {
                fn from(value: $t) -> Self {
                    Self(value.to_ne_bytes().to_vec())
                }
            }
        )+
    };
}

impl_fill_value_from_ne_bytes!(u8, u16, u32, i8, i16, i32, i64, f32, f64);

impl From<String> for FillValue {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<&str> for FillValue {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl FillValue {
    /// Create a new fill value composed of `bytes`.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the size in bytes of the fill value.
    #[must_use]
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Return the byte representation of the fill value.
    #[must_use]
    pub fn as_ne_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the fill value and return its bytes.
    #[must_use]
    pub fn into_ne_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Check that the fill value is a valid single element of `element_type`.
    ///
    /// # Errors
    /// Returns [`ElementTypeFillValueError`] if the size of the fill value does not match the element size.
    pub fn validate(&self, element_type: ElementType) -> Result<(), ElementTypeFillValueError> {
        match element_type.fixed_size() {
            Some(size) if size != self.size() => Err(ElementTypeFillValueError::new(
                element_type,
                self.clone(),
            )),
            _ => Ok(()),
        }
    }

    /// Check if the bytes are equal to a sequence of the fill value.
    #[must_use]
    pub fn equals_all(&self, bytes: &[u8]) -> bool {
        let fill_value_bytes = &self.0;
        if fill_value_bytes.is_empty() {
            return bytes.is_empty();
        }
        if !bytes.len().is_multiple_of(fill_value_bytes.len()) {
            return false;
        }
        bytes
            .chunks_exact(fill_value_bytes.len())
            .all(|element| element == fill_value_bytes.as_slice())
    }

    /// Return `num_elements` repetitions of the fill value.
    #[must_use]
    pub fn repeat(&self, num_elements: usize) -> Vec<u8> {
        self.0.repeat(num_elements)
    }
}
