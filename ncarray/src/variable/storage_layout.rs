//! Storage layout configuration of a [`Variable`].
//!
//! Each property of a [`StorageLayout`] has a getter and a setter on [`Variable`].
//! Getters read the layout from the store and have no side effects.
//! Setters validate their arguments against the variable, then forward a partial [`LayoutUpdate`] to the store.
//!
//! Stores reject layout changes after data has been written to the variable.
//! The in-memory store also applies netCDF-4 rules, for example:
//!  - enabling a filter on a contiguous variable switches it to chunked storage, and
//!  - contiguous storage is rejected for a variable with an unlimited dimension.

use ncarray_data_type::FillValue;
use ncarray_storage::{
    ChecksumMode, ChunkMode, Endianness, FillMode, LayoutUpdate, ReadableStorageTraits,
    ReadableWritableStorageTraits, StorageLayout, storage_layout::DEFLATE_LEVEL_MAX,
};

use super::element::{Element, ElementOwned};
use super::{ElementError, Variable};
use crate::NcError;

impl<TStorage: ?Sized + ReadableStorageTraits + 'static> Variable<TStorage> {
    /// Return the storage layout of the variable.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the layout cannot be retrieved from the store.
    pub fn storage_layout(&self) -> Result<StorageLayout, NcError> {
        Ok(self.storage.get_layout(self.id())?)
    }

    /// Return the chunk mode.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the layout cannot be retrieved from the store.
    pub fn chunk_mode(&self) -> Result<ChunkMode, NcError> {
        Ok(self.storage_layout()?.chunk_mode)
    }

    /// Return the chunk sizes, or [`None`] if the variable is contiguous.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the layout cannot be retrieved from the store.
    pub fn chunk_sizes(&self) -> Result<Option<Vec<u64>>, NcError> {
        Ok(self.storage_layout()?.chunk_sizes)
    }

    /// Returns true if the shuffle filter is enabled.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the layout cannot be retrieved from the store.
    pub fn compression_shuffle(&self) -> Result<bool, NcError> {
        Ok(self.storage_layout()?.shuffle)
    }

    /// Returns true if the deflate filter is enabled.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the layout cannot be retrieved from the store.
    pub fn compression_deflate(&self) -> Result<bool, NcError> {
        Ok(self.storage_layout()?.deflate)
    }

    /// Return the deflate level.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the layout cannot be retrieved from the store.
    pub fn compression_level(&self) -> Result<u32, NcError> {
        Ok(self.storage_layout()?.deflate_level)
    }

    /// Return the fill mode.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the layout cannot be retrieved from the store.
    pub fn fill_mode(&self) -> Result<FillMode, NcError> {
        Ok(self.storage_layout()?.fill_mode)
    }

    /// Return the fill value.
    ///
    /// # Errors
    /// Returns an [`NcError`] if `T` is incompatible with the element type of the variable or the layout cannot be retrieved from the store.
    pub fn fill_value<T: ElementOwned>(&self) -> Result<T, NcError> {
        T::validate_element_type(self.element_type())?;
        let fill_value = self.storage_layout()?.fill_value;
        let elements = T::from_transfer_bytes(self.element_type(), fill_value.as_ne_bytes())?;
        let got = elements.len() as u64;
        match <[T; 1]>::try_from(elements) {
            Ok([element]) => Ok(element),
            Err(_) => Err(NcError::SizeMismatch { got, expected: 1 }),
        }
    }

    /// Return the byte order of stored elements.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the layout cannot be retrieved from the store.
    pub fn endianness(&self) -> Result<Endianness, NcError> {
        Ok(self.storage_layout()?.endianness)
    }

    /// Return the checksum mode.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the layout cannot be retrieved from the store.
    pub fn checksum_mode(&self) -> Result<ChecksumMode, NcError> {
        Ok(self.storage_layout()?.checksum)
    }
}

impl<TStorage: ?Sized + ReadableWritableStorageTraits + 'static> Variable<TStorage> {
    /// Set the chunk mode.
    ///
    /// Chunked storage without explicit chunk sizes uses the default chunk sizes of the store.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the store rejects the change.
    pub fn set_chunk_mode(&self, chunk_mode: ChunkMode) -> Result<(), NcError> {
        self.update_storage_layout(&LayoutUpdate::default().with_chunk_mode(chunk_mode))
    }

    /// Set the chunk sizes, one per dimension.
    ///
    /// # Errors
    /// Returns [`NcError::RankMismatch`] if the length of `chunk_sizes` does not match the dimensionality of the variable,
    /// or [`NcError::StorageError`] if the store rejects the change.
    pub fn set_chunk_sizes(&self, chunk_sizes: &[u64]) -> Result<(), NcError> {
        self.update_storage_layout(&LayoutUpdate::default().with_chunk_sizes(chunk_sizes.to_vec()))
    }

    /// Enable or disable the shuffle filter.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the store rejects the change.
    pub fn set_compression_shuffle(&self, shuffle: bool) -> Result<(), NcError> {
        self.update_storage_layout(&LayoutUpdate::default().with_shuffle(shuffle))
    }

    /// Enable or disable the deflate filter.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the store rejects the change.
    pub fn set_compression_deflate(&self, deflate: bool) -> Result<(), NcError> {
        self.update_storage_layout(&LayoutUpdate::default().with_deflate(deflate))
    }

    /// Set the deflate level.
    ///
    /// The level is recorded whether or not the deflate filter is enabled.
    ///
    /// # Errors
    /// Returns [`NcError::OutOfRange`] if `level` exceeds [`DEFLATE_LEVEL_MAX`],
    /// or [`NcError::StorageError`] if the store rejects the change.
    pub fn set_compression_level(&self, level: u32) -> Result<(), NcError> {
        self.update_storage_layout(&LayoutUpdate::default().with_deflate_level(level))
    }

    /// Set the fill mode.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the store rejects the change.
    pub fn set_fill_mode(&self, fill_mode: FillMode) -> Result<(), NcError> {
        self.update_storage_layout(&LayoutUpdate::default().with_fill_mode(fill_mode))
    }

    /// Set the fill value.
    ///
    /// # Errors
    /// Returns [`NcError::TypeMismatch`] if `value` is incompatible with the element type of the variable,
    /// or [`NcError::StorageError`] if the store rejects the change.
    pub fn set_fill_value<T: Element>(&self, value: T) -> Result<(), NcError> {
        let bytes = T::into_transfer_bytes(self.element_type(), vec![value])?;
        let fill_value = FillValue::new(bytes.into_owned());
        self.update_storage_layout(&LayoutUpdate::default().with_fill_value(fill_value))
    }

    /// Set the byte order of stored elements.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the store rejects the change.
    pub fn set_endianness(&self, endianness: Endianness) -> Result<(), NcError> {
        self.update_storage_layout(&LayoutUpdate::default().with_endianness(endianness))
    }

    /// Set the checksum mode.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the store rejects the change.
    pub fn set_checksum_mode(&self, checksum: ChecksumMode) -> Result<(), NcError> {
        self.update_storage_layout(&LayoutUpdate::default().with_checksum(checksum))
    }

    /// Apply a partial update to the storage layout.
    ///
    /// # Errors
    /// Returns an [`NcError`] if
    ///  - the chunk sizes do not match the dimensionality of the variable,
    ///  - the deflate level exceeds [`DEFLATE_LEVEL_MAX`],
    ///  - the fill value is not one element of the element type of the variable, or
    ///  - the store rejects the change.
    pub fn update_storage_layout(&self, update: &LayoutUpdate) -> Result<(), NcError> {
        if let Some(chunk_sizes) = &update.chunk_sizes {
            self.validate_rank(chunk_sizes.len())?;
        }
        if let Some(level) = update.deflate_level
            && level > DEFLATE_LEVEL_MAX
        {
            return Err(NcError::OutOfRange(format!(
                "deflate level {level} exceeds {DEFLATE_LEVEL_MAX}"
            )));
        }
        if let Some(fill_value) = &update.fill_value {
            fill_value
                .validate(self.element_type())
                .map_err(|_| ElementError::IncompatibleElementType(self.element_type()))?;
        }
        Ok(self.storage.set_layout(self.id(), update)?)
    }
}
