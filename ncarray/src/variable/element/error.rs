//! Element error types.

use ncarray_data_type::ElementType;

/// An element error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ElementError {
    /// Incompatible element type.
    #[error("incompatible element for element type `{_0}`")]
    IncompatibleElementType(ElementType),
    /// Invalid element value.
    ///
    /// For example, text with invalid UTF-8 encoding.
    #[error("invalid element value")]
    InvalidElementValue,
    /// Text is transferred as exactly one element.
    #[error("text is transferred as a single element, got {_0} elements")]
    InvalidTextElementCount(usize),
    /// The number of bytes is not a multiple of the element size.
    #[error("got {got} bytes, expected a multiple of the element size {element_size}")]
    InvalidBytesLength {
        /// The number of bytes.
        got: usize,
        /// The size of an element.
        element_size: usize,
    },
}
