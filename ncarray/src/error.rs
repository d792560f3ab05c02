use ncarray_data_type::InvalidTypeError;
use ncarray_hyperslab::HyperslabError;
use ncarray_storage::StorageError;
use thiserror::Error;

use crate::variable::ElementError;

/// `ncarray` errors.
///
/// Every failure is detected before any transfer to or from a store begins, except for a [`StorageError`] reported by the store itself.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum NcError {
    /// An unrecognised or unsupported element type.
    #[error("invalid element type `{_0}`")]
    InvalidType(String),
    /// The rank of a hyperslab or chunk size vector does not match the dimensionality of a variable.
    #[error("got rank {got}, expected {expected}")]
    RankMismatch {
        /// The supplied rank.
        got: usize,
        /// The dimensionality of the variable.
        expected: usize,
    },
    /// An address or value exceeds its valid range.
    #[error("out of range: {_0}")]
    OutOfRange(String),
    /// The number of elements in a buffer does not match the number of addressed elements.
    #[error("got {got} elements, expected {expected}")]
    SizeMismatch {
        /// The number of elements in the buffer.
        got: u64,
        /// The number of addressed elements.
        expected: u64,
    },
    /// A buffer element type does not match the element type of a variable or attribute.
    #[error(transparent)]
    TypeMismatch(#[from] ElementError),
    /// A store error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
}

impl From<InvalidTypeError> for NcError {
    fn from(err: InvalidTypeError) -> Self {
        Self::InvalidType(err.name().to_string())
    }
}

impl From<HyperslabError> for NcError {
    fn from(err: HyperslabError) -> Self {
        match err {
            HyperslabError::IncompatibleDimensionality { got, expected } => {
                Self::RankMismatch { got, expected }
            }
            HyperslabError::ZeroStride { .. }
            | HyperslabError::OutOfRange { .. }
            | HyperslabError::TooManyElements { .. } => Self::OutOfRange(err.to_string()),
        }
    }
}
