//! The [`IntoTransferBytes`] trait for converting input types into bytes written to a variable.

use ncarray_data_type::ElementType;

use super::element::Element;
use super::{TransferBytes, TypedBuffer};
use crate::NcError;

/// A trait for types that can be converted into [`TransferBytes`] for a hyperslab write.
pub trait IntoTransferBytes<'a> {
    /// Convert `self` into native-endian [`TransferBytes`].
    ///
    /// # Arguments
    /// * `element_type` - The element type of the variable.
    ///
    /// # Errors
    /// Returns [`NcError::TypeMismatch`] if `self` does not hold elements of `element_type`.
    fn into_transfer_bytes(self, element_type: ElementType) -> Result<TransferBytes<'a>, NcError>;
}

impl<T: Element> IntoTransferBytes<'static> for Vec<T> {
    fn into_transfer_bytes(
        self,
        element_type: ElementType,
    ) -> Result<TransferBytes<'static>, NcError> {
        Ok(T::into_transfer_bytes(element_type, self)?)
    }
}

impl<'a, T: Element> IntoTransferBytes<'a> for &'a Vec<T> {
    fn into_transfer_bytes(self, element_type: ElementType) -> Result<TransferBytes<'a>, NcError> {
        Ok(T::to_transfer_bytes(element_type, self)?)
    }
}

impl<'a, T: Element> IntoTransferBytes<'a> for &'a [T] {
    fn into_transfer_bytes(self, element_type: ElementType) -> Result<TransferBytes<'a>, NcError> {
        Ok(T::to_transfer_bytes(element_type, self)?)
    }
}

impl<'a, T: Element, const N: usize> IntoTransferBytes<'a> for &'a [T; N] {
    fn into_transfer_bytes(self, element_type: ElementType) -> Result<TransferBytes<'a>, NcError> {
        Ok(T::to_transfer_bytes(element_type, self)?)
    }
}

impl IntoTransferBytes<'static> for TypedBuffer {
    fn into_transfer_bytes(
        self,
        element_type: ElementType,
    ) -> Result<TransferBytes<'static>, NcError> {
        Ok(self.into_ne_bytes(element_type)?)
    }
}

impl<'a> IntoTransferBytes<'a> for &'a TypedBuffer {
    fn into_transfer_bytes(self, element_type: ElementType) -> Result<TransferBytes<'a>, NcError> {
        Ok(self.to_ne_bytes(element_type)?)
    }
}

#[cfg(feature = "ndarray")]
impl<T: Element, D: ndarray::Dimension> IntoTransferBytes<'static> for ndarray::Array<T, D> {
    fn into_transfer_bytes(
        self,
        element_type: ElementType,
    ) -> Result<TransferBytes<'static>, NcError> {
        let elements = if self.is_standard_layout() {
            let length = self.len();
            let (mut elements, offset) = self.into_raw_vec_and_offset();
            // The logical elements are contiguous from `offset` within the allocation
            let offset = offset.unwrap_or(0).min(elements.len());
            elements.truncate(offset + length);
            elements.drain(..offset);
            elements
        } else {
            self.iter().cloned().collect()
        };
        Ok(T::into_transfer_bytes(element_type, elements)?)
    }
}
