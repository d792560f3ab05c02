//! A storage adapter which records performance metrics.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use ncarray_data_type::ElementType;

use crate::{
    AttributeData, AttributeOwner, Bytes, CatalogStorageTraits, ContainerId, DimensionId,
    DimensionInfo, DimensionLength, LayoutUpdate, ReadableStorageTraits, StorageError,
    StorageLayout, VariableId, VariableInfo, WritableStorageTraits,
};

/// Request and byte counts for one direction of transfer.
#[derive(Debug, Default)]
struct TransferCounter {
    requests: AtomicUsize,
    bytes: AtomicUsize,
}

impl TransferCounter {
    fn record(&self, bytes: usize) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    fn bytes(&self) -> usize {
        self.bytes.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.requests.store(0, Ordering::Relaxed);
        self.bytes.store(0, Ordering::Relaxed);
    }
}

/// A storage adapter counting the data transfers and layout updates passed to a store.
///
/// Every [`get_bytes`](ReadableStorageTraits::get_bytes) and [`put_bytes`](WritableStorageTraits::put_bytes) request is counted, including requests the store rejects.
/// Rejected reads count zero bytes.
/// Catalog requests are forwarded without being counted.
///
/// ### Example
/// ```rust
/// # use std::sync::Arc;
/// # use ncarray_data_type::ElementType;
/// # use ncarray_storage::{Bytes, CatalogStorageTraits, DimensionLength, ReadableStorageTraits, WritableStorageTraits};
/// # use ncarray_storage::store::MemoryStore;
/// # use ncarray_storage::storage_adapter::performance_metrics::PerformanceMetricsStorageAdapter;
/// let store = Arc::new(PerformanceMetricsStorageAdapter::new(Arc::new(MemoryStore::new())));
/// let root = store.root_group()?;
/// let x = store.define_dimension(root, "x", DimensionLength::Fixed(2))?;
/// let v = store.define_variable(root, "v", ElementType::UByte, &[x])?;
/// store.put_bytes(v, &[0], &[2], &[1], Bytes::from_static(&[1, 2]))?;
/// store.get_bytes(v, &[1], &[1], &[1])?;
/// assert_eq!((store.writes(), store.bytes_written()), (1, 2));
/// assert_eq!((store.reads(), store.bytes_read()), (1, 1));
/// # Ok::<_, ncarray_storage::StorageError>(())
/// ```
#[derive(Debug)]
pub struct PerformanceMetricsStorageAdapter<TStorage: ?Sized> {
    storage: Arc<TStorage>,
    read: TransferCounter,
    written: TransferCounter,
    layout_updates: AtomicUsize,
}

impl<TStorage: ?Sized> PerformanceMetricsStorageAdapter<TStorage> {
    /// Wrap `storage`, starting with every count at zero.
    #[must_use]
    pub fn new(storage: Arc<TStorage>) -> Self {
        Self {
            storage,
            read: TransferCounter::default(),
            written: TransferCounter::default(),
            layout_updates: AtomicUsize::default(),
        }
    }

    /// Set every count back to zero.
    pub fn reset(&self) {
        self.read.reset();
        self.written.reset();
        self.layout_updates.store(0, Ordering::Relaxed);
    }

    /// Total bytes returned by [`get_bytes`](ReadableStorageTraits::get_bytes).
    pub fn bytes_read(&self) -> usize {
        self.read.bytes()
    }

    /// Total bytes passed to [`put_bytes`](WritableStorageTraits::put_bytes).
    pub fn bytes_written(&self) -> usize {
        self.written.bytes()
    }

    /// Count of [`get_bytes`](ReadableStorageTraits::get_bytes) requests.
    pub fn reads(&self) -> usize {
        self.read.requests()
    }

    /// Count of [`put_bytes`](WritableStorageTraits::put_bytes) requests.
    pub fn writes(&self) -> usize {
        self.written.requests()
    }

    /// Count of [`set_layout`](WritableStorageTraits::set_layout) requests.
    pub fn layout_updates(&self) -> usize {
        self.layout_updates.load(Ordering::Relaxed)
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> ReadableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn open_variable(
        &self,
        container: ContainerId,
        name: &str,
    ) -> Result<VariableInfo, StorageError> {
        self.storage.open_variable(container, name)
    }

    fn variable_info(&self, variable: VariableId) -> Result<VariableInfo, StorageError> {
        self.storage.variable_info(variable)
    }

    fn dimension_info(&self, dimension: DimensionId) -> Result<DimensionInfo, StorageError> {
        self.storage.dimension_info(dimension)
    }

    fn get_bytes(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[u64],
    ) -> Result<Bytes, StorageError> {
        let bytes = self.storage.get_bytes(variable, start, count, stride);
        self.read.record(bytes.as_ref().map_or(0, Bytes::len));
        bytes
    }

    fn get_layout(&self, variable: VariableId) -> Result<StorageLayout, StorageError> {
        self.storage.get_layout(variable)
    }
}

impl<TStorage: ?Sized + WritableStorageTraits> WritableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn put_bytes(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[u64],
        bytes: Bytes,
    ) -> Result<(), StorageError> {
        self.written.record(bytes.len());
        self.storage.put_bytes(variable, start, count, stride, bytes)
    }

    fn set_layout(
        &self,
        variable: VariableId,
        update: &LayoutUpdate,
    ) -> Result<(), StorageError> {
        self.layout_updates.fetch_add(1, Ordering::Relaxed);
        self.storage.set_layout(variable, update)
    }
}

impl<TStorage: ?Sized + CatalogStorageTraits> CatalogStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn root_group(&self) -> Result<ContainerId, StorageError> {
        self.storage.root_group()
    }

    fn group_name(&self, group: ContainerId) -> Result<String, StorageError> {
        self.storage.group_name(group)
    }

    fn group_parent(&self, group: ContainerId) -> Result<Option<ContainerId>, StorageError> {
        self.storage.group_parent(group)
    }

    fn subgroups(&self, group: ContainerId) -> Result<Vec<ContainerId>, StorageError> {
        self.storage.subgroups(group)
    }

    fn define_group(&self, parent: ContainerId, name: &str) -> Result<ContainerId, StorageError> {
        self.storage.define_group(parent, name)
    }

    fn dimensions(&self, group: ContainerId) -> Result<Vec<DimensionId>, StorageError> {
        self.storage.dimensions(group)
    }

    fn find_dimension(&self, group: ContainerId, name: &str) -> Result<DimensionId, StorageError> {
        self.storage.find_dimension(group, name)
    }

    fn define_dimension(
        &self,
        group: ContainerId,
        name: &str,
        length: DimensionLength,
    ) -> Result<DimensionId, StorageError> {
        self.storage.define_dimension(group, name, length)
    }

    fn rename_dimension(&self, dimension: DimensionId, name: &str) -> Result<(), StorageError> {
        self.storage.rename_dimension(dimension, name)
    }

    fn unlimited_dimensions(&self, group: ContainerId) -> Result<Vec<DimensionId>, StorageError> {
        self.storage.unlimited_dimensions(group)
    }

    fn variables(&self, group: ContainerId) -> Result<Vec<VariableId>, StorageError> {
        self.storage.variables(group)
    }

    fn define_variable(
        &self,
        group: ContainerId,
        name: &str,
        element_type: ElementType,
        dimensions: &[DimensionId],
    ) -> Result<VariableId, StorageError> {
        self.storage
            .define_variable(group, name, element_type, dimensions)
    }

    fn rename_variable(&self, variable: VariableId, name: &str) -> Result<(), StorageError> {
        self.storage.rename_variable(variable, name)
    }

    fn attribute_names(&self, owner: AttributeOwner) -> Result<Vec<String>, StorageError> {
        self.storage.attribute_names(owner)
    }

    fn get_attribute(
        &self,
        owner: AttributeOwner,
        name: &str,
    ) -> Result<AttributeData, StorageError> {
        self.storage.get_attribute(owner, name)
    }

    fn put_attribute(
        &self,
        owner: AttributeOwner,
        name: &str,
        data: AttributeData,
    ) -> Result<(), StorageError> {
        self.storage.put_attribute(owner, name, data)
    }

    fn rename_attribute(
        &self,
        owner: AttributeOwner,
        name: &str,
        new_name: &str,
    ) -> Result<(), StorageError> {
        self.storage.rename_attribute(owner, name, new_name)
    }

    fn delete_attribute(&self, owner: AttributeOwner, name: &str) -> Result<(), StorageError> {
        self.storage.delete_attribute(owner, name)
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.storage.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn performance_metrics_counts_rejected_requests() -> Result<(), Box<dyn std::error::Error>> {
        let store = PerformanceMetricsStorageAdapter::new(Arc::new(MemoryStore::new()));
        let root = store.root_group()?;
        let x = store.define_dimension(root, "x", DimensionLength::Fixed(4))?;
        let var = store.define_variable(root, "v", ElementType::Short, &[x])?;

        store.put_bytes(var, &[0], &[2], &[1], Bytes::from_static(&[1, 0, 2, 0]))?;
        store.get_bytes(var, &[0], &[4], &[1])?;
        store.get_bytes(var, &[1], &[2], &[2])?;
        assert!(store.get_bytes(var, &[3], &[2], &[1]).is_err());
        assert!(
            store
                .set_layout(var, &LayoutUpdate::default().with_shuffle(true))
                .is_err()
        );
        assert_eq!(store.bytes_written(), 4);
        assert_eq!(store.writes(), 1);
        assert_eq!(store.bytes_read(), 12);
        assert_eq!(store.reads(), 3);
        assert_eq!(store.layout_updates(), 1);

        store.reset();
        assert_eq!(
            (store.reads(), store.writes(), store.bytes_read(), store.layout_updates()),
            (0, 0, 0, 0)
        );
        Ok(())
    }
}
