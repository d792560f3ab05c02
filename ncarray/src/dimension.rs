//! Dimensions.
//!
//! A dimension is a named axis defined in a group.
//! It is either fixed, or unlimited and extended by writes to the variables that use it.

use std::sync::Arc;

use ncarray_storage::{CatalogStorageTraits, DimensionId, DimensionInfo, ReadableStorageTraits};
use serde_json::{Value, json};

use crate::NcError;

/// A dimension.
#[derive(Debug)]
pub struct Dimension<TStorage: ?Sized> {
    storage: Arc<TStorage>,
    id: DimensionId,
}

impl<TStorage: ?Sized> Clone for Dimension<TStorage> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            id: self.id,
        }
    }
}

impl<TStorage: ?Sized> Dimension<TStorage> {
    /// Create a handle to the dimension `id` in `storage`.
    #[must_use]
    pub fn new(storage: Arc<TStorage>, id: DimensionId) -> Self {
        Self { storage, id }
    }

    /// Get the dimension id.
    #[must_use]
    pub const fn id(&self) -> DimensionId {
        self.id
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits + 'static> Dimension<TStorage> {
    /// Return the name, current length, and kind of the dimension.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the dimension does not exist.
    pub fn info(&self) -> Result<DimensionInfo, NcError> {
        Ok(self.storage.dimension_info(self.id)?)
    }

    /// Return the name of the dimension.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the dimension does not exist.
    pub fn name(&self) -> Result<String, NcError> {
        Ok(self.info()?.name)
    }

    /// Return the current length of the dimension.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the dimension does not exist.
    pub fn len(&self) -> Result<u64, NcError> {
        Ok(self.storage.dimension_length(self.id)?)
    }

    /// Returns true if the current length of the dimension is zero.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the dimension does not exist.
    pub fn is_empty(&self) -> Result<bool, NcError> {
        Ok(self.len()? == 0)
    }

    /// Returns true if the dimension is unlimited.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the dimension does not exist.
    pub fn is_unlimited(&self) -> Result<bool, NcError> {
        Ok(self.info()?.unlimited)
    }

    /// Return a JSON summary of the dimension with its `id`, `name`, and current `length`.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the dimension does not exist.
    pub fn to_json(&self) -> Result<Value, NcError> {
        let info = self.info()?;
        Ok(json!({
            "id": self.id.local,
            "name": info.name,
            "length": info.length,
        }))
    }
}

impl<TStorage: ?Sized + CatalogStorageTraits + 'static> Dimension<TStorage> {
    /// Rename the dimension.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the dimension does not exist or the new name is invalid or in use.
    pub fn rename(&self, name: &str) -> Result<(), NcError> {
        Ok(self.storage.rename_dimension(self.id, name)?)
    }
}
