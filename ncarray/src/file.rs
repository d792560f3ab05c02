//! Files.
//!
//! A [`File`] is the entry point to the hierarchy of an array store.
//! The store is supplied by the caller, for example a [`MemoryStore`](ncarray_storage::store::MemoryStore).
//!
//! ```rust
//! # use std::sync::Arc;
//! # use ncarray::file::File;
//! # use ncarray::storage::{DimensionLength, store::MemoryStore};
//! let store = Arc::new(MemoryStore::new());
//! let file = File::create(store)?;
//! let root = file.root();
//! root.add_dimension("time", DimensionLength::Unlimited)?;
//! let temp = root.add_variable("temp", "float", &["time"])?;
//! temp.write_slice(&[0], &[2], vec![20.5f32, 21.0])?;
//! assert_eq!(temp.read_full::<Vec<f32>>()?, vec![20.5, 21.0]);
//! file.close()?;
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

use std::sync::Arc;

use ncarray_storage::{
    AttributeOwner, CatalogStorageTraits, ContainerId, ReadableCatalogStorageTraits, StorageError,
    codes,
};
use serde_json::Value;

use crate::NcError;
use crate::group::Group;

/// A file.
///
/// Holds the store and its root group.
#[derive(Debug)]
pub struct File<TStorage: ?Sized> {
    storage: Arc<TStorage>,
    root: ContainerId,
}

impl<TStorage: ?Sized + CatalogStorageTraits + 'static> File<TStorage> {
    /// Create a new file in `storage`.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the root group of `storage` is not empty.
    pub fn create(storage: Arc<TStorage>) -> Result<Self, NcError> {
        let root = storage.root_group()?;
        let is_empty = storage.subgroups(root)?.is_empty()
            && storage.dimensions(root)?.is_empty()
            && storage.variables(root)?.is_empty()
            && storage
                .attribute_names(AttributeOwner::Group(root))?
                .is_empty();
        if !is_empty {
            return Err(StorageError::new(
                codes::NC_EEXIST,
                "NetCDF: File exists && NC_NOCLOBBER",
            )
            .into());
        }
        Ok(Self { storage, root })
    }

    /// Open an existing file in `storage`.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if `storage` has no root group.
    pub fn open(storage: Arc<TStorage>) -> Result<Self, NcError> {
        let root = storage.root_group()?;
        Ok(Self { storage, root })
    }

    /// Return the root group.
    #[must_use]
    pub fn root(&self) -> Group<TStorage> {
        Group::new(self.storage.clone(), self.root)
    }

    /// Flush any buffered state to the store.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the flush fails.
    pub fn sync(&self) -> Result<(), NcError> {
        Ok(self.storage.flush()?)
    }

    /// Flush and close the file.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the flush fails.
    pub fn close(self) -> Result<(), NcError> {
        self.sync()
    }
}

impl<TStorage: ?Sized + ReadableCatalogStorageTraits + 'static> File<TStorage> {
    /// Return a JSON summary of the root group and everything it contains.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if any part of the hierarchy cannot be retrieved.
    pub fn to_json(&self) -> Result<Value, NcError> {
        self.root().to_json()
    }
}
