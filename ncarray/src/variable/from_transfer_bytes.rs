//! The [`FromTransferBytes`] trait for converting bytes read from a variable into other types.

use ncarray_data_type::ElementType;
use ncarray_storage::Bytes;

use super::TypedBuffer;
use super::element::ElementOwned;
use crate::NcError;

/// A trait for types that can be constructed from the bytes of a hyperslab read, its shape, and an [`ElementType`].
pub trait FromTransferBytes: Sized {
    /// Validate the element type before a read is issued.
    ///
    /// # Errors
    /// Returns [`NcError::TypeMismatch`] if `Self` cannot hold elements of `element_type`.
    fn validate_element_type(element_type: ElementType) -> Result<(), NcError>;

    /// Convert native-endian `bytes` into `Self`.
    ///
    /// # Arguments
    /// * `bytes` - The bytes read from the store
    /// * `shape` - The count of the hyperslab that was read
    /// * `element_type` - The element type of the variable
    ///
    /// # Errors
    /// Returns an [`NcError`] if the conversion fails.
    fn from_transfer_bytes(
        bytes: Bytes,
        shape: &[u64],
        element_type: ElementType,
    ) -> Result<Self, NcError>;
}

impl FromTransferBytes for Bytes {
    fn validate_element_type(_element_type: ElementType) -> Result<(), NcError> {
        Ok(())
    }

    fn from_transfer_bytes(
        bytes: Bytes,
        _shape: &[u64],
        _element_type: ElementType,
    ) -> Result<Self, NcError> {
        Ok(bytes)
    }
}

impl<T: ElementOwned> FromTransferBytes for Vec<T> {
    fn validate_element_type(element_type: ElementType) -> Result<(), NcError> {
        Ok(T::validate_element_type(element_type)?)
    }

    fn from_transfer_bytes(
        bytes: Bytes,
        _shape: &[u64],
        element_type: ElementType,
    ) -> Result<Self, NcError> {
        Ok(T::from_transfer_bytes(element_type, &bytes)?)
    }
}

impl FromTransferBytes for TypedBuffer {
    fn validate_element_type(_element_type: ElementType) -> Result<(), NcError> {
        Ok(())
    }

    fn from_transfer_bytes(
        bytes: Bytes,
        _shape: &[u64],
        element_type: ElementType,
    ) -> Result<Self, NcError> {
        Ok(Self::from_ne_bytes(element_type, &bytes)?)
    }
}

#[cfg(feature = "ndarray")]
impl<T: ElementOwned, D: ndarray::Dimension> FromTransferBytes for ndarray::Array<T, D> {
    fn validate_element_type(element_type: ElementType) -> Result<(), NcError> {
        Ok(T::validate_element_type(element_type)?)
    }

    fn from_transfer_bytes(
        bytes: Bytes,
        shape: &[u64],
        element_type: ElementType,
    ) -> Result<Self, NcError> {
        let elements = T::from_transfer_bytes(element_type, &bytes)?;
        let length = elements.len();
        let shape_usize = shape
            .iter()
            .map(|&s| usize::try_from(s))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| NcError::OutOfRange(format!("`shape` {shape:?} exceeds usize")))?;
        let arrayd = ndarray::ArrayD::from_shape_vec(shape_usize, elements).map_err(|_| {
            NcError::SizeMismatch {
                got: length as u64,
                expected: shape.iter().fold(1, |product, &s| product.saturating_mul(s)),
            }
        })?;
        arrayd.into_dimensionality::<D>().map_err(|_| NcError::RankMismatch {
            got: D::NDIM.unwrap_or(0),
            expected: shape.len(),
        })
    }
}
