use ncarray_data_type::ElementType;

use super::TransferBytes;

mod error;
mod pod;
mod string;

pub use error::ElementError;

/// A trait representing a variable element type.
pub trait Element: Sized + Clone {
    /// Validate the element type.
    ///
    /// # Errors
    /// Returns an [`ElementError`] if the element type is incompatible with [`Element`].
    fn validate_element_type(element_type: ElementType) -> Result<(), ElementError>;

    /// Convert a slice of elements into [`TransferBytes`].
    ///
    /// # Errors
    /// Returns an [`ElementError`] if the element type is incompatible with [`Element`].
    fn to_transfer_bytes(
        element_type: ElementType,
        elements: &[Self],
    ) -> Result<TransferBytes<'_>, ElementError>;

    /// Convert a vector of elements into [`TransferBytes`].
    ///
    /// Avoids an extra copy compared to `to_transfer_bytes` when possible.
    ///
    /// # Errors
    /// Returns an [`ElementError`] if the element type is incompatible with [`Element`].
    fn into_transfer_bytes(
        element_type: ElementType,
        elements: Vec<Self>,
    ) -> Result<TransferBytes<'static>, ElementError>;
}

/// A trait representing an owned variable element type.
pub trait ElementOwned: Element {
    /// Convert native-endian bytes into a [`Vec<ElementOwned>`].
    ///
    /// # Errors
    /// Returns an [`ElementError`] if the element type is incompatible with [`Element`] or the bytes are not valid elements.
    fn from_transfer_bytes(element_type: ElementType, bytes: &[u8])
    -> Result<Vec<Self>, ElementError>;
}
