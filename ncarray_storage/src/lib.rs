//! The storage API for the [`ncarray`](https://docs.rs/ncarray/latest/ncarray/index.html) crate.
//!
//! An array store holds a hierarchy of groups, each with dimensions, variables, and attributes.
//! The variable data engine of `ncarray` addresses it only through the traits in this crate:
//!  - [`ReadableStorageTraits`]: resolve variables and dimensions, read hyperslabs, and query storage layouts,
//!  - [`WritableStorageTraits`]: write hyperslabs and update storage layouts, and
//!  - [`CatalogStorageTraits`]: define and navigate groups, dimensions, variables, and attributes.
//!
//! Every failure is reported as a [`StorageError`] carrying a netCDF error code (see [`codes`]) and message.
//!
//! This crate includes an in-memory store implementation, [`MemoryStore`](store::MemoryStore).
//!
//! ## Licence
//! `ncarray_storage` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

mod ids;
pub mod storage_adapter;
mod storage_error;
pub mod storage_layout;
mod storage_sync;
pub mod store;

use std::sync::Arc;

pub use self::ids::{
    AttributeData, AttributeOwner, ContainerId, DimensionId, DimensionInfo, DimensionLength,
    VariableId, VariableInfo,
};
pub use self::storage_error::{StorageError, codes};
pub use self::storage_layout::{
    ChecksumMode, ChunkMode, Endianness, FillMode, LayoutUpdate, StorageLayout,
};
pub use self::storage_sync::{
    CatalogStorageTraits, ReadableCatalogStorageTraits, ReadableStorageTraits,
    ReadableWritableCatalogStorageTraits, ReadableWritableStorageTraits, WritableStorageTraits,
};

/// [`Arc`] wrapped readable storage.
pub type ReadableStorage = Arc<dyn ReadableStorageTraits>;

/// [`Arc`] wrapped writable storage.
pub type WritableStorage = Arc<dyn WritableStorageTraits>;

/// [`Arc`] wrapped readable and writable storage.
pub type ReadableWritableStorage = Arc<dyn ReadableWritableStorageTraits>;

/// [`Arc`] wrapped catalog storage.
pub type CatalogStorage = Arc<dyn CatalogStorageTraits>;

/// [`Arc`] wrapped readable and catalog storage.
pub type ReadableCatalogStorage = Arc<dyn ReadableCatalogStorageTraits>;

/// [`Arc`] wrapped readable, writable, and catalog storage.
pub type ReadableWritableCatalogStorage = Arc<dyn ReadableWritableCatalogStorageTraits>;

/// The type for bytes used in store get and put methods.
///
/// An alias for [`bytes::Bytes`].
pub type Bytes = bytes::Bytes;
