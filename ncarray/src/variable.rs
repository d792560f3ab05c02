//! Variables.
//!
//! A variable is a typed, multidimensional array of elements stored in a container (group) of an array store.
//! Its shape is given by an ordered list of dimensions, and its element type is one of the [`ElementType`]s of the type catalog.
//!
//! Use [`Variable::open`] to open an existing variable, or [`Group::add_variable`](crate::group::Group::add_variable) to define a new one.
//!
//! ## Reading and Writing
//! Data is transferred by hyperslab with
//!  - [`read_full`](Variable::read_full) / [`write_full`](Variable::write_full): every element at the current dimension lengths,
//!  - [`read_slice`](Variable::read_slice) / [`write_slice`](Variable::write_slice): a rectangular region given by `start` and `count`,
//!  - [`read_strided`](Variable::read_strided) / [`write_strided`](Variable::write_strided): a rectangular region with a `stride` along each dimension, and
//!  - [`read_scalar`](Variable::read_scalar) / [`write_scalar`](Variable::write_scalar): the single element of a scalar variable.
//!
//! Reads return any type implementing [`FromTransferBytes`], such as [`Vec<T>`], a [`TypedBuffer`], or (with the `ndarray` feature) an [`ndarray::ArrayD<T>`].
//! Writes accept any type implementing [`IntoTransferBytes`].
//! Every request is validated against the dimensionality, current dimension lengths, and element type of the variable before any transfer to or from the store begins.
//!
//! ## Storage Layout
//! The chunking, compression, fill, byte order, and checksum of a variable are configured with the getters and setters in [`storage_layout`].
//! A store rejects layout changes once data has been written to the variable.
//!
//! ## Concurrency
//! A [`Variable`] is [`Send`] and [`Sync`] if its store is.
//! Concurrent use of one container must be serialised by the caller unless the store guarantees otherwise.

mod element;
mod from_transfer_bytes;
mod into_transfer_bytes;
pub mod storage_layout;
mod typed_buffer;
mod variable_catalog;
mod variable_sync_readable;
mod variable_sync_writable;

use std::borrow::Cow;
use std::sync::Arc;

pub use self::element::{Element, ElementError, ElementOwned};
pub use self::from_transfer_bytes::FromTransferBytes;
pub use self::into_transfer_bytes::IntoTransferBytes;
pub use self::typed_buffer::TypedBuffer;

use ncarray_data_type::ElementType;
use ncarray_hyperslab::Hyperslab;
use ncarray_storage::{DimensionId, VariableId, VariableInfo};

use crate::NcError;

/// Native-endian element bytes passed to or from a store.
///
/// Borrowed where the caller buffer can be viewed as bytes without a copy.
pub type TransferBytes<'a> = Cow<'a, [u8]>;

/// A variable.
///
/// A handle to a variable in a store.
/// The element type and dimensions are fixed when the handle is created, but dimension lengths are queried on every transfer.
#[derive(Debug)]
pub struct Variable<TStorage: ?Sized> {
    /// The storage.
    storage: Arc<TStorage>,
    /// The id, name, element type, and dimensions of the variable.
    info: VariableInfo,
}

impl<TStorage: ?Sized> Clone for Variable<TStorage> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            info: self.info.clone(),
        }
    }
}

impl<TStorage: ?Sized> Variable<TStorage> {
    /// Create a variable handle in `storage` from `info` returned by the store.
    ///
    /// The store is not queried.
    #[must_use]
    pub fn new_with_info(storage: Arc<TStorage>, info: VariableInfo) -> Self {
        Self { storage, info }
    }

    /// Get the underlying storage backing the variable.
    #[must_use]
    pub fn storage(&self) -> Arc<TStorage> {
        self.storage.clone()
    }

    /// Get the variable id.
    #[must_use]
    pub const fn id(&self) -> VariableId {
        self.info.id
    }

    /// Get the variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Get the element type.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.info.element_type
    }

    /// Get the ordered dimensions of the variable.
    #[must_use]
    pub fn dimension_ids(&self) -> &[DimensionId] {
        &self.info.dimensions
    }

    /// Get the dimensionality of the variable.
    #[must_use]
    pub fn ndims(&self) -> usize {
        self.info.ndims()
    }

    /// Fails if the element type cannot be transferred by hyperslab.
    ///
    /// String is an attribute-only element type.
    fn validate_transfer_type(&self) -> Result<(), NcError> {
        if self.element_type().is_string() {
            Err(NcError::InvalidType(self.element_type().name().to_string()))
        } else {
            Ok(())
        }
    }

    /// Fails if the rank of a request does not match the dimensionality of the variable.
    fn validate_rank(&self, rank: usize) -> Result<(), NcError> {
        if rank == self.ndims() {
            Ok(())
        } else {
            Err(NcError::RankMismatch {
                got: rank,
                expected: self.ndims(),
            })
        }
    }

    /// Create a hyperslab from `start`, `count`, and `stride`, checking their rank.
    fn hyperslab(&self, start: &[u64], count: &[u64], stride: &[u64]) -> Result<Hyperslab, NcError> {
        self.validate_rank(start.len())?;
        self.validate_rank(count.len())?;
        self.validate_rank(stride.len())?;
        Ok(Hyperslab::new_with_start_count_stride(
            start.to_vec(),
            count.to_vec(),
            stride.to_vec(),
        )?)
    }
}

/// Convert from `&[u8]` to `Vec<T>`.
#[must_use]
pub(crate) fn convert_from_bytes_slice<T: bytemuck::Pod>(from: &[u8]) -> Vec<T> {
    bytemuck::allocation::pod_collect_to_vec(from)
}

/// Convert from `&[T]` to `Vec<u8>`.
#[must_use]
fn convert_to_bytes_vec<T: bytemuck::NoUninit>(from: &[T]) -> Vec<u8> {
    bytemuck::allocation::pod_collect_to_vec(from)
}

/// Transmute from `Vec<T>` to `Vec<u8>`.
#[must_use]
pub(crate) fn transmute_to_bytes_vec<T: bytemuck::NoUninit>(from: Vec<T>) -> Vec<u8> {
    bytemuck::allocation::try_cast_vec(from)
        .unwrap_or_else(|(_err, from)| convert_to_bytes_vec(&from))
}

/// Transmute from `&[T]` to `&[u8]`.
#[must_use]
pub(crate) fn transmute_to_bytes<T: bytemuck::NoUninit>(from: &[T]) -> &[u8] {
    bytemuck::must_cast_slice(from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transmute_bytes() {
        let elements = vec![1u16, 2, 3];
        let bytes = transmute_to_bytes(&elements);
        assert_eq!(bytes.len(), 6);
        assert_eq!(convert_from_bytes_slice::<u16>(bytes), elements);
        assert_eq!(transmute_to_bytes_vec(elements.clone()), bytes.to_vec());
        assert_eq!(convert_to_bytes_vec(&[0x0102u16]), 0x0102u16.to_ne_bytes());
    }
}
