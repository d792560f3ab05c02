use auto_impl::auto_impl;
use ncarray_data_type::ElementType;

use crate::{
    AttributeData, AttributeOwner, Bytes, ContainerId, DimensionId, DimensionInfo,
    DimensionLength, LayoutUpdate, StorageError, StorageLayout, VariableId, VariableInfo,
};

/// Readable storage traits.
///
/// The read half of the array store contract used by the variable data engine.
#[auto_impl(Arc)]
pub trait ReadableStorageTraits: Send + Sync {
    /// Resolve the variable named `name` in `container`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the container or variable does not exist.
    fn open_variable(&self, container: ContainerId, name: &str)
    -> Result<VariableInfo, StorageError>;

    /// Return information about `variable`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the variable does not exist.
    fn variable_info(&self, variable: VariableId) -> Result<VariableInfo, StorageError>;

    /// Return information about `dimension`, including its current length.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the dimension does not exist.
    fn dimension_info(&self, dimension: DimensionId) -> Result<DimensionInfo, StorageError>;

    /// Return the current length of `dimension`.
    ///
    /// The length of an unlimited dimension reflects every write so far.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the dimension does not exist.
    fn dimension_length(&self, dimension: DimensionId) -> Result<u64, StorageError> {
        Ok(self.dimension_info(dimension)?.length)
    }

    /// Read the elements of `variable` addressed by `start`, `count`, and `stride`.
    ///
    /// Returns the native-endian bytes of the elements in C order.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the variable does not exist, the region is out of bounds, or stored data cannot be decoded.
    fn get_bytes(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[u64],
    ) -> Result<Bytes, StorageError>;

    /// Return the storage layout of `variable`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the variable does not exist.
    fn get_layout(&self, variable: VariableId) -> Result<StorageLayout, StorageError>;
}

/// Writable storage traits.
///
/// The write half of the array store contract used by the variable data engine.
#[auto_impl(Arc)]
pub trait WritableStorageTraits: Send + Sync {
    /// Write the native-endian `bytes` of the elements of `variable` addressed by `start`, `count`, and `stride`.
    ///
    /// Writing beyond the current length of an unlimited dimension extends it.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only, the variable does not exist, the region is out of bounds, or `bytes` has the wrong length.
    fn put_bytes(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[u64],
        bytes: Bytes,
    ) -> Result<(), StorageError>;

    /// Apply a partial update to the storage layout of `variable`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only, the variable does not exist, the update is invalid, or data has already been written to the variable.
    fn set_layout(&self, variable: VariableId, update: &LayoutUpdate)
    -> Result<(), StorageError>;
}

/// Catalog storage traits.
///
/// Groups, dimensions, variable definitions, and attributes.
#[auto_impl(Arc)]
pub trait CatalogStorageTraits: Send + Sync {
    /// Return the root group.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store has no root group.
    fn root_group(&self) -> Result<ContainerId, StorageError>;

    /// Return the name of `group`. The root group is named `/`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the group does not exist.
    fn group_name(&self, group: ContainerId) -> Result<String, StorageError>;

    /// Return the parent of `group`, or [`None`] for the root group.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the group does not exist.
    fn group_parent(&self, group: ContainerId) -> Result<Option<ContainerId>, StorageError>;

    /// Return the full path name of `group`, such as `/forecast/surface`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the group does not exist.
    fn group_full_name(&self, group: ContainerId) -> Result<String, StorageError> {
        let mut names = vec![];
        let mut current = Some(group);
        while let Some(group) = current {
            current = self.group_parent(group)?;
            if current.is_some() {
                names.push(self.group_name(group)?);
            }
        }
        names.reverse();
        Ok(format!("/{}", names.join("/")))
    }

    /// Return the subgroups of `group` in definition order.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the group does not exist.
    fn subgroups(&self, group: ContainerId) -> Result<Vec<ContainerId>, StorageError>;

    /// Define a new subgroup of `parent`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only, the parent does not exist, or the name is invalid or in use.
    fn define_group(&self, parent: ContainerId, name: &str) -> Result<ContainerId, StorageError>;

    /// Return the dimensions defined in `group` in definition order.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the group does not exist.
    fn dimensions(&self, group: ContainerId) -> Result<Vec<DimensionId>, StorageError>;

    /// Find the dimension named `name` visible from `group`.
    ///
    /// Dimensions defined in ancestor groups are visible.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the group does not exist or no such dimension is visible.
    fn find_dimension(&self, group: ContainerId, name: &str) -> Result<DimensionId, StorageError>;

    /// Define a new dimension in `group`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only, the group does not exist, or the name is invalid or in use.
    fn define_dimension(
        &self,
        group: ContainerId,
        name: &str,
        length: DimensionLength,
    ) -> Result<DimensionId, StorageError>;

    /// Rename `dimension`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only, the dimension does not exist, or the name is invalid or in use.
    fn rename_dimension(&self, dimension: DimensionId, name: &str) -> Result<(), StorageError>;

    /// Return the unlimited dimensions defined in `group`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the group does not exist.
    fn unlimited_dimensions(&self, group: ContainerId) -> Result<Vec<DimensionId>, StorageError>;

    /// Return the variables defined in `group` in definition order.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the group does not exist.
    fn variables(&self, group: ContainerId) -> Result<Vec<VariableId>, StorageError>;

    /// Define a new variable in `group`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only, the group or a dimension does not exist, the element type is unsupported, or the name is invalid or in use.
    fn define_variable(
        &self,
        group: ContainerId,
        name: &str,
        element_type: ElementType,
        dimensions: &[DimensionId],
    ) -> Result<VariableId, StorageError>;

    /// Rename `variable`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only, the variable does not exist, or the name is invalid or in use.
    fn rename_variable(&self, variable: VariableId, name: &str) -> Result<(), StorageError>;

    /// Return the attribute names of `owner` in definition order.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the owner does not exist.
    fn attribute_names(&self, owner: AttributeOwner) -> Result<Vec<String>, StorageError>;

    /// Return the attribute `name` of `owner`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the owner or attribute does not exist.
    fn get_attribute(&self, owner: AttributeOwner, name: &str)
    -> Result<AttributeData, StorageError>;

    /// Create or replace the attribute `name` of `owner`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only, the owner does not exist, or the name is invalid.
    fn put_attribute(
        &self,
        owner: AttributeOwner,
        name: &str,
        data: AttributeData,
    ) -> Result<(), StorageError>;

    /// Rename the attribute `name` of `owner`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only, the attribute does not exist, or the new name is invalid or in use.
    fn rename_attribute(
        &self,
        owner: AttributeOwner,
        name: &str,
        new_name: &str,
    ) -> Result<(), StorageError>;

    /// Delete the attribute `name` of `owner`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store is read only or the attribute does not exist.
    fn delete_attribute(&self, owner: AttributeOwner, name: &str) -> Result<(), StorageError>;

    /// Flush any buffered state to the underlying storage.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the flush fails.
    fn flush(&self) -> Result<(), StorageError>;
}

/// A supertrait of [`ReadableStorageTraits`] and [`WritableStorageTraits`].
pub trait ReadableWritableStorageTraits: ReadableStorageTraits + WritableStorageTraits {}

impl<T: ?Sized> ReadableWritableStorageTraits for T where T: ReadableStorageTraits + WritableStorageTraits {}

/// A supertrait of [`ReadableStorageTraits`] and [`CatalogStorageTraits`].
pub trait ReadableCatalogStorageTraits: ReadableStorageTraits + CatalogStorageTraits {}

impl<T: ?Sized> ReadableCatalogStorageTraits for T where T: ReadableStorageTraits + CatalogStorageTraits {}

/// A supertrait of [`ReadableStorageTraits`], [`WritableStorageTraits`], and [`CatalogStorageTraits`].
pub trait ReadableWritableCatalogStorageTraits:
    ReadableStorageTraits + WritableStorageTraits + CatalogStorageTraits
{
}

impl<T: ?Sized> ReadableWritableCatalogStorageTraits for T where
    T: ReadableStorageTraits + WritableStorageTraits + CatalogStorageTraits
{
}
