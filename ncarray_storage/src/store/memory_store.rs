//! A synchronous in-memory store.

mod catalog;
mod chunk_codec;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use itertools::Itertools;
use ncarray_data_type::ElementType;
use ncarray_hyperslab::{Access, ArrayIndices, Extent, Hyperslab, HyperslabError, ravel_indices};
use parking_lot::Mutex;

use self::catalog::{
    Catalog, DimensionEntry, GroupEntry, VariableEntry, attribute_not_found, default_chunk_sizes,
    name_in_use, validate_name,
};
use self::chunk_codec::ChunkCodec;
use crate::storage_error::codes;
use crate::{
    AttributeData, AttributeOwner, Bytes, CatalogStorageTraits, ChunkMode, ContainerId,
    DimensionId, DimensionInfo, DimensionLength, FillMode, LayoutUpdate, ReadableStorageTraits,
    StorageError, StorageLayout, VariableId, VariableInfo, WritableStorageTraits,
    storage_layout::DEFLATE_LEVEL_MAX,
};

/// Options for a [`MemoryStore`].
#[derive(Debug, Clone, Copy)]
pub struct MemoryStoreOptions {
    validate_checksums: bool,
}

impl Default for MemoryStoreOptions {
    fn default() -> Self {
        Self {
            validate_checksums: true,
        }
    }
}

impl MemoryStoreOptions {
    /// Return whether fletcher32 checksums are validated when chunks are read.
    #[must_use]
    pub fn validate_checksums(&self) -> bool {
        self.validate_checksums
    }

    /// Set whether fletcher32 checksums are validated when chunks are read.
    pub fn set_validate_checksums(&mut self, validate_checksums: bool) -> &mut Self {
        self.validate_checksums = validate_checksums;
        self
    }
}

/// A synchronous in-memory store.
///
/// Variable data is held in chunks keyed by chunk indices, encoded according to the [`StorageLayout`] of the variable.
/// A contiguous variable is held as a single chunk.
/// Chunks that have never been written read as the fill value, or as zeros when the fill mode is [`FillMode::NoFill`].
#[derive(Debug)]
pub struct MemoryStore {
    catalog: Mutex<Catalog>,
    options: MemoryStoreOptions,
    read_only: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The per-element copy plan of a transfer, grouped by chunk.
///
/// Maps chunk indices to `(transfer element index, element index within the chunk)` pairs.
type ChunkPlan = BTreeMap<ArrayIndices, Vec<(usize, usize)>>;

fn hyperslab_error(err: &HyperslabError) -> StorageError {
    match err {
        HyperslabError::IncompatibleDimensionality { .. } => {
            StorageError::new(codes::NC_EINVAL, format!("NetCDF: Invalid argument: {err}"))
        }
        HyperslabError::ZeroStride { .. } => {
            StorageError::new(codes::NC_ESTRIDE, format!("NetCDF: Illegal stride: {err}"))
        }
        HyperslabError::OutOfRange { .. } => StorageError::new(
            codes::NC_EEDGE,
            format!("NetCDF: Start+count exceeds dimension bound: {err}"),
        ),
        HyperslabError::TooManyElements { .. } => {
            StorageError::new(codes::NC_EINVAL, format!("NetCDF: Invalid argument: {err}"))
        }
    }
}

fn transfer_size(hyperslab: &Hyperslab, element_size: usize) -> Result<usize, StorageError> {
    hyperslab
        .num_elements_usize()
        .and_then(|num_elements| num_elements.checked_mul(element_size))
        .ok_or_else(|| {
            StorageError::new(
                codes::NC_EINVAL,
                format!("NetCDF: Invalid argument: {hyperslab} is too large to transfer"),
            )
        })
}

fn element_size(element_type: ElementType) -> Result<usize, StorageError> {
    element_type.fixed_size().ok_or_else(|| {
        StorageError::new(
            codes::NC_EBADTYPE,
            format!("NetCDF: Not a valid data type: {element_type}"),
        )
    })
}

fn chunk_plan(hyperslab: &Hyperslab, chunk_shape: &[u64]) -> Result<ChunkPlan, StorageError> {
    let mut plan = ChunkPlan::new();
    for (position, indices) in hyperslab.indices().into_iter().enumerate() {
        let chunk_indices: ArrayIndices = std::iter::zip(&indices, chunk_shape)
            .map(|(index, chunk)| index / chunk)
            .collect();
        let within: ArrayIndices = std::iter::zip(&indices, chunk_shape)
            .map(|(index, chunk)| index % chunk)
            .collect();
        let within = ravel_indices(&within, chunk_shape)
            .and_then(|within| usize::try_from(within).ok())
            .ok_or_else(|| StorageError::new(codes::NC_EINVALCOORDS, "NetCDF: Index exceeds dimension bound"))?;
        plan.entry(chunk_indices).or_default().push((position, within));
    }
    Ok(plan)
}

fn num_elements_usize(shape: &[u64]) -> Result<usize, StorageError> {
    usize::try_from(shape.iter().product::<u64>())
        .map_err(|_| StorageError::new(codes::NC_EINVAL, "NetCDF: Invalid argument: chunk too large"))
}

impl MemoryStore {
    /// Create a new memory store holding an empty root group.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_options(MemoryStoreOptions::default())
    }

    /// Create a new memory store with non-default options.
    #[must_use]
    pub fn new_with_options(options: MemoryStoreOptions) -> Self {
        Self {
            catalog: Mutex::new(Catalog::new()),
            options,
            read_only: AtomicBool::new(false),
        }
    }

    /// Returns true if the store is read only.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::Relaxed)
    }

    /// Set whether the store is read only.
    ///
    /// Every mutating operation on a read only store fails.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::Relaxed);
    }

    /// Return the number of stored chunks of `variable`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the variable does not exist.
    pub fn chunk_count(&self, variable: VariableId) -> Result<usize, StorageError> {
        Ok(self.catalog.lock().variable(variable)?.chunks.len())
    }

    /// Return the total size in bytes of the encoded chunks of `variable`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the variable does not exist.
    pub fn stored_size(&self, variable: VariableId) -> Result<usize, StorageError> {
        Ok(self
            .catalog
            .lock()
            .variable(variable)?
            .chunks
            .values()
            .map(Bytes::len)
            .sum())
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.is_read_only() {
            Err(StorageError::read_only())
        } else {
            Ok(())
        }
    }

    fn codec(&self, variable: &VariableEntry) -> Result<ChunkCodec, StorageError> {
        Ok(ChunkCodec::new(
            &variable.layout,
            element_size(variable.element_type)?,
            self.options.validate_checksums,
        ))
    }

    /// Return the decoded bytes of a chunk, or its initial contents if it has never been written.
    fn retrieve_chunk(
        &self,
        variable: &VariableEntry,
        chunk_indices: &[u64],
        chunk_elements: usize,
    ) -> Result<Vec<u8>, StorageError> {
        let element_size = element_size(variable.element_type)?;
        if let Some(encoded) = variable.chunks.get(chunk_indices) {
            let decoded = self.codec(variable)?.decode(encoded)?;
            if decoded.len() == chunk_elements * element_size {
                Ok(decoded)
            } else {
                Err(StorageError::new(
                    codes::NC_EHDFERR,
                    format!(
                        "NetCDF: HDF error: decoded chunk {chunk_indices:?} has {} bytes, expected {}",
                        decoded.len(),
                        chunk_elements * element_size
                    ),
                ))
            }
        } else {
            match variable.layout.fill_mode {
                FillMode::Fill => Ok(variable.layout.fill_value.repeat(chunk_elements)),
                FillMode::NoFill => Ok(vec![0; chunk_elements * element_size]),
            }
        }
    }

    fn hyperslab(
        catalog: &Catalog,
        variable: &VariableEntry,
        start: &[u64],
        count: &[u64],
        stride: &[u64],
        access: Access,
    ) -> Result<(Hyperslab, Vec<Extent>), StorageError> {
        let hyperslab =
            Hyperslab::new_with_start_count_stride(start.to_vec(), count.to_vec(), stride.to_vec())
                .map_err(|err| hyperslab_error(&err))?;
        let extents = catalog.extents(variable)?;
        hyperslab
            .validate(&extents, access)
            .map_err(|err| hyperslab_error(&err))?;
        Ok((hyperslab, extents))
    }

    fn apply_layout_update(
        catalog: &Catalog,
        variable: &VariableEntry,
        update: &LayoutUpdate,
    ) -> Result<StorageLayout, StorageError> {
        let extents = catalog.extents(variable)?;
        let ndims = extents.len();
        let mut layout = variable.layout.clone();

        if let Some(chunk_sizes) = &update.chunk_sizes {
            if chunk_sizes.len() != ndims {
                return Err(StorageError::new(
                    codes::NC_EINVAL,
                    format!(
                        "NetCDF: Invalid argument: {} chunk sizes for a variable with {ndims} dimensions",
                        chunk_sizes.len()
                    ),
                ));
            }
            let bad_chunk = std::iter::zip(chunk_sizes, &extents).any(|(&chunk, extent)| {
                chunk == 0 || (!extent.unlimited && extent.length > 0 && chunk > extent.length)
            });
            if bad_chunk {
                return Err(StorageError::new(
                    codes::NC_EBADCHUNK,
                    format!("NetCDF: Bad chunk sizes: {chunk_sizes:?}"),
                ));
            }
            layout.chunk_mode = ChunkMode::Chunked;
            layout.chunk_sizes = Some(chunk_sizes.clone());
        }
        if let Some(chunk_mode) = update.chunk_mode {
            layout.chunk_mode = chunk_mode;
        }
        if let Some(shuffle) = update.shuffle {
            layout.shuffle = shuffle;
        }
        if let Some(deflate) = update.deflate {
            layout.deflate = deflate;
        }
        if let Some(deflate_level) = update.deflate_level {
            if deflate_level > DEFLATE_LEVEL_MAX {
                return Err(StorageError::new(
                    codes::NC_EINVAL,
                    format!("NetCDF: Invalid argument: deflate level {deflate_level}"),
                ));
            }
            layout.deflate_level = deflate_level;
        }
        if let Some(fill_mode) = update.fill_mode {
            layout.fill_mode = fill_mode;
        }
        if let Some(fill_value) = &update.fill_value {
            fill_value.validate(variable.element_type).map_err(|err| {
                StorageError::new(
                    codes::NC_EBADTYPE,
                    format!("NetCDF: Not a valid data type or _FillValue type mismatch: {err}"),
                )
            })?;
            layout.fill_value = fill_value.clone();
        }
        if let Some(endianness) = update.endianness {
            layout.endianness = endianness;
        }
        if let Some(checksum) = update.checksum {
            layout.checksum = checksum;
        }

        if ndims == 0 && (layout.chunk_mode == ChunkMode::Chunked || layout.has_filters()) {
            return Err(StorageError::new(
                codes::NC_EINVAL,
                "NetCDF: Invalid argument: a scalar variable cannot be chunked or filtered",
            ));
        }
        if layout.chunk_mode == ChunkMode::Contiguous {
            if extents.iter().any(|extent| extent.unlimited) {
                return Err(StorageError::new(
                    codes::NC_EINVAL,
                    "NetCDF: Invalid argument: contiguous storage is not supported for a variable with an unlimited dimension",
                ));
            }
            if layout.has_filters() {
                if update.chunk_mode == Some(ChunkMode::Contiguous) {
                    return Err(StorageError::new(
                        codes::NC_EINVAL,
                        "NetCDF: Invalid argument: contiguous storage is not supported for a filtered variable",
                    ));
                }
                log::warn!(
                    "variable `{}` switched to chunked storage to enable filters",
                    variable.name
                );
                layout.chunk_mode = ChunkMode::Chunked;
            }
        }
        match layout.chunk_mode {
            ChunkMode::Contiguous => layout.chunk_sizes = None,
            ChunkMode::Chunked => {
                if layout.chunk_sizes.is_none() {
                    layout.chunk_sizes = Some(default_chunk_sizes(&extents));
                }
            }
        }
        Ok(layout)
    }
}

impl ReadableStorageTraits for MemoryStore {
    fn open_variable(
        &self,
        container: ContainerId,
        name: &str,
    ) -> Result<VariableInfo, StorageError> {
        let catalog = self.catalog.lock();
        let local = catalog
            .group(container)?
            .variables
            .iter()
            .position(|variable| variable.name == name)
            .ok_or_else(|| {
                StorageError::new(
                    codes::NC_ENOTVAR,
                    format!("NetCDF: Variable not found: `{name}`"),
                )
            })?;
        let id = VariableId {
            container,
            local: u32::try_from(local).unwrap_or(u32::MAX),
        };
        drop(catalog);
        self.variable_info(id)
    }

    fn variable_info(&self, variable: VariableId) -> Result<VariableInfo, StorageError> {
        let catalog = self.catalog.lock();
        let entry = catalog.variable(variable)?;
        Ok(VariableInfo {
            id: variable,
            name: entry.name.clone(),
            element_type: entry.element_type,
            dimensions: entry.dimensions.clone(),
        })
    }

    fn dimension_info(&self, dimension: DimensionId) -> Result<DimensionInfo, StorageError> {
        self.catalog.lock().dimension_info(dimension)
    }

    fn get_bytes(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[u64],
    ) -> Result<Bytes, StorageError> {
        let catalog = self.catalog.lock();
        let entry = catalog.variable(variable)?;
        let element_size = element_size(entry.element_type)?;
        let (hyperslab, _extents) =
            Self::hyperslab(&catalog, entry, start, count, stride, Access::Read)?;
        if hyperslab.is_empty() {
            return Ok(Bytes::new());
        }

        let chunk_shape = catalog.chunk_shape(entry)?;
        let chunk_elements = num_elements_usize(&chunk_shape)?;
        let mut bytes = vec![0u8; transfer_size(&hyperslab, element_size)?];
        for (chunk_indices, copies) in chunk_plan(&hyperslab, &chunk_shape)? {
            let chunk = self.retrieve_chunk(entry, &chunk_indices, chunk_elements)?;
            for (position, within) in copies {
                bytes[position * element_size..(position + 1) * element_size]
                    .copy_from_slice(&chunk[within * element_size..(within + 1) * element_size]);
            }
        }
        Ok(Bytes::from(bytes))
    }

    fn get_layout(&self, variable: VariableId) -> Result<StorageLayout, StorageError> {
        Ok(self.catalog.lock().variable(variable)?.layout.clone())
    }
}

impl WritableStorageTraits for MemoryStore {
    fn put_bytes(
        &self,
        variable: VariableId,
        start: &[u64],
        count: &[u64],
        stride: &[u64],
        bytes: Bytes,
    ) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut catalog = self.catalog.lock();
        let entry = catalog.variable(variable)?;
        let element_size = element_size(entry.element_type)?;
        let (hyperslab, extents) =
            Self::hyperslab(&catalog, entry, start, count, stride, Access::Write)?;
        let expected = transfer_size(&hyperslab, element_size)?;
        if bytes.len() != expected {
            return Err(StorageError::new(
                codes::NC_EINVAL,
                format!(
                    "NetCDF: Invalid argument: {} bytes supplied for {hyperslab}, expected {expected}",
                    bytes.len()
                ),
            ));
        }
        if hyperslab.is_empty() {
            return Ok(());
        }

        let chunk_shape = catalog.chunk_shape(entry)?;
        let chunk_elements = num_elements_usize(&chunk_shape)?;
        let codec = self.codec(entry)?;
        let mut encoded_chunks = Vec::new();
        for (chunk_indices, copies) in chunk_plan(&hyperslab, &chunk_shape)? {
            let mut chunk = self.retrieve_chunk(entry, &chunk_indices, chunk_elements)?;
            for (position, within) in copies {
                chunk[within * element_size..(within + 1) * element_size]
                    .copy_from_slice(&bytes[position * element_size..(position + 1) * element_size]);
            }
            encoded_chunks.push((chunk_indices, Bytes::from(codec.encode(&chunk)?)));
        }

        // Grow unlimited dimensions to cover the written region
        let dimensions = entry.dimensions.clone();
        for ((dimension, extent), required) in dimensions
            .into_iter()
            .zip_eq(extents)
            .zip_eq(hyperslab.extent_required())
        {
            if extent.unlimited && required > extent.length {
                let dimension = catalog.dimension_mut(dimension)?;
                dimension.length = dimension.length.max(required);
            }
        }

        let entry = catalog.variable_mut(variable)?;
        entry.chunks.extend(encoded_chunks);
        entry.written = true;
        Ok(())
    }

    fn set_layout(
        &self,
        variable: VariableId,
        update: &LayoutUpdate,
    ) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut catalog = self.catalog.lock();
        let entry = catalog.variable(variable)?;
        if update.is_empty() {
            return Ok(());
        }
        if entry.written {
            return Err(StorageError::late_definition(
                "var properties, like chunking or deflate,",
            ));
        }
        let layout = Self::apply_layout_update(&catalog, entry, update)?;
        catalog.variable_mut(variable)?.layout = layout;
        Ok(())
    }
}

impl CatalogStorageTraits for MemoryStore {
    fn root_group(&self) -> Result<ContainerId, StorageError> {
        Ok(ContainerId(0))
    }

    fn group_name(&self, group: ContainerId) -> Result<String, StorageError> {
        Ok(self.catalog.lock().group(group)?.name.clone())
    }

    fn group_parent(&self, group: ContainerId) -> Result<Option<ContainerId>, StorageError> {
        Ok(self.catalog.lock().group(group)?.parent)
    }

    fn subgroups(&self, group: ContainerId) -> Result<Vec<ContainerId>, StorageError> {
        Ok(self.catalog.lock().group(group)?.subgroups.clone())
    }

    fn define_group(&self, parent: ContainerId, name: &str) -> Result<ContainerId, StorageError> {
        self.check_writable()?;
        validate_name(name)?;
        let mut catalog = self.catalog.lock();
        let in_use = catalog.has_subgroup(parent, name)?
            || catalog.group(parent)?.variables.iter().any(|v| v.name == name);
        if in_use {
            return Err(name_in_use(name));
        }
        let group = catalog.push_group(GroupEntry::new(name.to_string(), Some(parent)));
        catalog.group_mut(parent)?.subgroups.push(group);
        Ok(group)
    }

    fn dimensions(&self, group: ContainerId) -> Result<Vec<DimensionId>, StorageError> {
        let catalog = self.catalog.lock();
        let count = catalog.group(group)?.dimensions.len();
        Ok((0..count)
            .map(|local| DimensionId {
                container: group,
                local: u32::try_from(local).unwrap_or(u32::MAX),
            })
            .collect())
    }

    fn find_dimension(&self, group: ContainerId, name: &str) -> Result<DimensionId, StorageError> {
        let catalog = self.catalog.lock();
        let mut current = Some(group);
        while let Some(group) = current {
            let entry = catalog.group(group)?;
            if let Some(local) = entry.dimensions.iter().position(|d| d.name == name) {
                return Ok(DimensionId {
                    container: group,
                    local: u32::try_from(local).unwrap_or(u32::MAX),
                });
            }
            current = entry.parent;
        }
        Err(StorageError::new(
            codes::NC_EBADDIM,
            format!("NetCDF: Invalid dimension ID or name: `{name}`"),
        ))
    }

    fn define_dimension(
        &self,
        group: ContainerId,
        name: &str,
        length: DimensionLength,
    ) -> Result<DimensionId, StorageError> {
        self.check_writable()?;
        validate_name(name)?;
        let mut catalog = self.catalog.lock();
        let entry = catalog.group_mut(group)?;
        if entry.dimensions.iter().any(|d| d.name == name) {
            return Err(name_in_use(name));
        }
        let (length, unlimited) = match length {
            DimensionLength::Fixed(length) => (length, false),
            DimensionLength::Unlimited => (0, true),
        };
        entry.dimensions.push(DimensionEntry {
            name: name.to_string(),
            length,
            unlimited,
        });
        Ok(DimensionId {
            container: group,
            local: u32::try_from(entry.dimensions.len() - 1).unwrap_or(u32::MAX),
        })
    }

    fn rename_dimension(&self, dimension: DimensionId, name: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        validate_name(name)?;
        let mut catalog = self.catalog.lock();
        catalog.dimension(dimension)?;
        let group = catalog.group(dimension.container)?;
        if group
            .dimensions
            .iter()
            .enumerate()
            .any(|(local, d)| d.name == name && local != dimension.local as usize)
        {
            return Err(name_in_use(name));
        }
        catalog.dimension_mut(dimension)?.name = name.to_string();
        Ok(())
    }

    fn unlimited_dimensions(&self, group: ContainerId) -> Result<Vec<DimensionId>, StorageError> {
        let catalog = self.catalog.lock();
        Ok(catalog
            .group(group)?
            .dimensions
            .iter()
            .positions(|d| d.unlimited)
            .map(|local| DimensionId {
                container: group,
                local: u32::try_from(local).unwrap_or(u32::MAX),
            })
            .collect())
    }

    fn variables(&self, group: ContainerId) -> Result<Vec<VariableId>, StorageError> {
        let catalog = self.catalog.lock();
        let count = catalog.group(group)?.variables.len();
        Ok((0..count)
            .map(|local| VariableId {
                container: group,
                local: u32::try_from(local).unwrap_or(u32::MAX),
            })
            .collect())
    }

    fn define_variable(
        &self,
        group: ContainerId,
        name: &str,
        element_type: ElementType,
        dimensions: &[DimensionId],
    ) -> Result<VariableId, StorageError> {
        self.check_writable()?;
        validate_name(name)?;
        element_size(element_type)?;
        let mut catalog = self.catalog.lock();
        let group_entry = catalog.group(group)?;
        if group_entry.variables.iter().any(|v| v.name == name) || catalog.has_subgroup(group, name)? {
            return Err(name_in_use(name));
        }
        let mut extents = Vec::with_capacity(dimensions.len());
        for &dimension in dimensions {
            let entry = catalog.dimension(dimension)?;
            if !catalog.is_ancestor(dimension.container, group)? {
                return Err(StorageError::new(
                    codes::NC_EBADDIM,
                    format!("NetCDF: Invalid dimension ID or name: `{}` is not visible", entry.name),
                ));
            }
            extents.push(Extent {
                length: entry.length,
                unlimited: entry.unlimited,
            });
        }

        let mut layout = StorageLayout::new(element_type.default_fill_value());
        if extents.iter().any(|extent| extent.unlimited) {
            layout.chunk_mode = ChunkMode::Chunked;
            layout.chunk_sizes = Some(default_chunk_sizes(&extents));
        }
        let group_entry = catalog.group_mut(group)?;
        group_entry.variables.push(VariableEntry {
            name: name.to_string(),
            element_type,
            dimensions: dimensions.to_vec(),
            layout,
            written: false,
            chunks: BTreeMap::new(),
            attributes: vec![],
        });
        Ok(VariableId {
            container: group,
            local: u32::try_from(group_entry.variables.len() - 1).unwrap_or(u32::MAX),
        })
    }

    fn rename_variable(&self, variable: VariableId, name: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        validate_name(name)?;
        let mut catalog = self.catalog.lock();
        catalog.variable(variable)?;
        let group = catalog.group(variable.container)?;
        if group
            .variables
            .iter()
            .enumerate()
            .any(|(local, v)| v.name == name && local != variable.local as usize)
            || catalog.has_subgroup(variable.container, name)?
        {
            return Err(name_in_use(name));
        }
        catalog.variable_mut(variable)?.name = name.to_string();
        Ok(())
    }

    fn attribute_names(&self, owner: AttributeOwner) -> Result<Vec<String>, StorageError> {
        let catalog = self.catalog.lock();
        Ok(catalog
            .attributes(owner)?
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn get_attribute(
        &self,
        owner: AttributeOwner,
        name: &str,
    ) -> Result<AttributeData, StorageError> {
        let catalog = self.catalog.lock();
        catalog
            .attributes(owner)?
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| attribute_not_found(name))
    }

    fn put_attribute(
        &self,
        owner: AttributeOwner,
        name: &str,
        data: AttributeData,
    ) -> Result<(), StorageError> {
        self.check_writable()?;
        validate_name(name)?;
        if let Some(size) = data.element_type.fixed_size()
            && !data.bytes.len().is_multiple_of(size)
        {
            return Err(StorageError::new(
                codes::NC_EINVAL,
                format!(
                    "NetCDF: Invalid argument: {} bytes is not a whole number of {} elements",
                    data.bytes.len(),
                    data.element_type
                ),
            ));
        }
        let mut catalog = self.catalog.lock();
        let attributes = catalog.attributes_mut(owner)?;
        if let Some((_, existing)) = attributes.iter_mut().find(|(attribute, _)| attribute == name) {
            *existing = data;
        } else {
            attributes.push((name.to_string(), data));
        }
        Ok(())
    }

    fn rename_attribute(
        &self,
        owner: AttributeOwner,
        name: &str,
        new_name: &str,
    ) -> Result<(), StorageError> {
        self.check_writable()?;
        validate_name(new_name)?;
        let mut catalog = self.catalog.lock();
        let attributes = catalog.attributes_mut(owner)?;
        if name != new_name && attributes.iter().any(|(attribute, _)| attribute == new_name) {
            return Err(name_in_use(new_name));
        }
        let (attribute, _) = attributes
            .iter_mut()
            .find(|(attribute, _)| attribute == name)
            .ok_or_else(|| attribute_not_found(name))?;
        *attribute = new_name.to_string();
        Ok(())
    }

    fn delete_attribute(&self, owner: AttributeOwner, name: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut catalog = self.catalog.lock();
        let attributes = catalog.attributes_mut(owner)?;
        let position = attributes
            .iter()
            .position(|(attribute, _)| attribute == name)
            .ok_or_else(|| attribute_not_found(name))?;
        attributes.remove(position);
        Ok(())
    }

    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use ncarray_data_type::FillValue;

    use super::*;
    use crate::{ChecksumMode, Endianness};

    fn to_bytes(values: &[f32]) -> Bytes {
        Bytes::from(values.iter().flat_map(|v| v.to_ne_bytes()).collect::<Vec<u8>>())
    }

    fn from_bytes(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes(b.try_into().unwrap()))
            .collect()
    }

    /// A store with `temp(time: unlimited, lat: 3, lon: 4)` and `grid(lat, lon)` float variables.
    fn store_temp() -> Result<(MemoryStore, VariableId, VariableId, DimensionId), StorageError> {
        let store = MemoryStore::new();
        let root = store.root_group()?;
        let time = store.define_dimension(root, "time", DimensionLength::Unlimited)?;
        let lat = store.define_dimension(root, "lat", DimensionLength::Fixed(3))?;
        let lon = store.define_dimension(root, "lon", DimensionLength::Fixed(4))?;
        let temp = store.define_variable(root, "temp", ElementType::Float, &[time, lat, lon])?;
        let grid = store.define_variable(root, "grid", ElementType::Float, &[lat, lon])?;
        Ok((store, temp, grid, time))
    }

    #[test]
    fn memory_store_default_layout() -> Result<(), Box<dyn Error>> {
        let (store, temp, grid, _) = store_temp()?;
        let layout = store.get_layout(temp)?;
        assert_eq!(layout.chunk_mode, ChunkMode::Chunked);
        assert_eq!(layout.chunk_sizes, Some(vec![1, 3, 4]));
        assert_eq!(layout.fill_value, ElementType::Float.default_fill_value());
        let layout = store.get_layout(grid)?;
        assert_eq!(layout.chunk_mode, ChunkMode::Contiguous);
        assert_eq!(layout.chunk_sizes, None);
        Ok(())
    }

    #[test]
    fn memory_store_write_read() -> Result<(), Box<dyn Error>> {
        let (store, temp, _, time) = store_temp()?;
        let data: Vec<f32> = (0..12).map(|i| i as f32).collect();
        store.put_bytes(temp, &[0, 0, 0], &[1, 3, 4], &[1, 1, 1], to_bytes(&data))?;
        assert_eq!(store.dimension_length(time)?, 1);
        let bytes = store.get_bytes(temp, &[0, 0, 0], &[1, 3, 4], &[1, 1, 1])?;
        assert_eq!(from_bytes(&bytes), data);
        let bytes = store.get_bytes(temp, &[0, 1, 1], &[1, 2, 2], &[1, 1, 2])?;
        assert_eq!(from_bytes(&bytes), vec![5.0, 7.0, 9.0, 11.0]);
        assert!(
            store
                .get_bytes(temp, &[1, 0, 0], &[1, 3, 4], &[1, 1, 1])
                .is_err()
        );
        Ok(())
    }

    #[test]
    fn memory_store_unlimited_growth() -> Result<(), Box<dyn Error>> {
        let (store, temp, _, time) = store_temp()?;
        let data = vec![1.0f32; 4];
        store.put_bytes(temp, &[3, 2, 0], &[1, 1, 4], &[1, 1, 1], to_bytes(&data))?;
        assert_eq!(store.dimension_length(time)?, 4);
        let bytes = store.get_bytes(temp, &[0, 0, 0], &[1, 1, 1], &[1, 1, 1])?;
        assert!(ElementType::Float.default_fill_value().equals_all(&bytes));
        assert_eq!(store.chunk_count(temp)?, 1);
        Ok(())
    }

    #[test]
    fn memory_store_bounds() -> Result<(), Box<dyn Error>> {
        let (store, temp, grid, _) = store_temp()?;
        let err = store
            .put_bytes(grid, &[0, 4], &[1, 1], &[1, 1], to_bytes(&[0.0]))
            .unwrap_err();
        assert_eq!(err.code(), codes::NC_EEDGE);
        let err = store
            .put_bytes(grid, &[0, 0], &[1, 2], &[1, 1], to_bytes(&[0.0]))
            .unwrap_err();
        assert_eq!(err.code(), codes::NC_EINVAL);
        let err = store
            .get_bytes(temp, &[0, 0, 0], &[0, 1, 1], &[1, 0, 1])
            .unwrap_err();
        assert_eq!(err.code(), codes::NC_ESTRIDE);
        assert!(store.get_bytes(temp, &[0, 0, 0], &[0, 3, 4], &[1, 1, 1])?.is_empty());
        Ok(())
    }

    #[test]
    fn memory_store_oversized_transfer() -> Result<(), Box<dyn Error>> {
        let (store, temp, _, time) = store_temp()?;
        // The element count overflows
        let err = store
            .put_bytes(temp, &[0, 0, 0], &[1 << 62, 3, 4], &[1, 1, 1], Bytes::new())
            .unwrap_err();
        assert_eq!(err.code(), codes::NC_EINVAL);
        // The byte count overflows
        let err = store
            .put_bytes(temp, &[0, 0, 0], &[1 << 62, 1, 1], &[1, 1, 1], Bytes::new())
            .unwrap_err();
        assert_eq!(err.code(), codes::NC_EINVAL);
        assert_eq!(store.dimension_length(time)?, 0);
        assert_eq!(store.chunk_count(temp)?, 0);
        Ok(())
    }

    #[test]
    fn memory_store_nofill() -> Result<(), Box<dyn Error>> {
        let (store, _, grid, _) = store_temp()?;
        store.set_layout(grid, &LayoutUpdate::default().with_fill_mode(FillMode::NoFill))?;
        let bytes = store.get_bytes(grid, &[0, 0], &[1, 2], &[1, 1])?;
        assert_eq!(from_bytes(&bytes), vec![0.0, 0.0]);
        store.set_layout(grid, &LayoutUpdate::default().with_fill_mode(FillMode::Fill).with_fill_value(FillValue::from(-1.0f32)))?;
        let bytes = store.get_bytes(grid, &[2, 3], &[1, 1], &[1, 1])?;
        assert_eq!(from_bytes(&bytes), vec![-1.0]);
        Ok(())
    }

    #[test]
    fn memory_store_layout_late_definition() -> Result<(), Box<dyn Error>> {
        let (store, temp, _, _) = store_temp()?;
        store.set_layout(temp, &LayoutUpdate::default().with_chunk_sizes(vec![1, 3, 4]))?;
        store.put_bytes(temp, &[0, 0, 0], &[1, 1, 1], &[1, 1, 1], to_bytes(&[1.0]))?;
        let err = store
            .set_layout(temp, &LayoutUpdate::default().with_chunk_sizes(vec![1, 3, 4]))
            .unwrap_err();
        assert_eq!(err.code(), codes::NC_ELATEDEF);
        Ok(())
    }

    #[test]
    fn memory_store_layout_validation() -> Result<(), Box<dyn Error>> {
        let (store, temp, grid, _) = store_temp()?;
        let update = LayoutUpdate::default().with_chunk_mode(ChunkMode::Contiguous);
        assert_eq!(store.set_layout(temp, &update).unwrap_err().code(), codes::NC_EINVAL);
        let update = LayoutUpdate::default().with_chunk_sizes(vec![1, 0, 4]);
        assert_eq!(store.set_layout(temp, &update).unwrap_err().code(), codes::NC_EBADCHUNK);
        let update = LayoutUpdate::default().with_chunk_sizes(vec![4, 5]);
        assert_eq!(store.set_layout(grid, &update).unwrap_err().code(), codes::NC_EBADCHUNK);
        let update = LayoutUpdate::default().with_deflate_level(10);
        assert_eq!(store.set_layout(grid, &update).unwrap_err().code(), codes::NC_EINVAL);
        let update = LayoutUpdate::default().with_fill_value(FillValue::from(1.0f64));
        assert_eq!(store.set_layout(grid, &update).unwrap_err().code(), codes::NC_EBADTYPE);
        assert_eq!(store.get_layout(grid)?.chunk_mode, ChunkMode::Contiguous);
        Ok(())
    }

    #[test]
    fn memory_store_filters_switch_to_chunked() -> Result<(), Box<dyn Error>> {
        testing_logger::setup();
        let (store, _, grid, _) = store_temp()?;
        store.set_layout(
            grid,
            &LayoutUpdate::default()
                .with_deflate(true)
                .with_deflate_level(6)
                .with_shuffle(true)
                .with_checksum(ChecksumMode::Fletcher32)
                .with_endianness(Endianness::Big),
        )?;
        let layout = store.get_layout(grid)?;
        assert_eq!(layout.chunk_mode, ChunkMode::Chunked);
        assert_eq!(layout.chunk_sizes, Some(vec![3, 4]));
        testing_logger::validate(|captured_logs| {
            assert_eq!(captured_logs.len(), 1);
            assert_eq!(captured_logs[0].level, log::Level::Warn);
            assert!(captured_logs[0].body.contains("grid"));
        });

        let data = [0.0f32; 12];
        store.put_bytes(grid, &[0, 0], &[3, 4], &[1, 1], to_bytes(&data))?;
        assert!(store.stored_size(grid)? < 48);
        let bytes = store.get_bytes(grid, &[0, 0], &[3, 4], &[1, 1])?;
        assert_eq!(from_bytes(&bytes), data);
        Ok(())
    }

    #[test]
    fn memory_store_read_only() -> Result<(), Box<dyn Error>> {
        let (store, _, grid, _) = store_temp()?;
        store.set_read_only(true);
        let err = store
            .put_bytes(grid, &[0, 0], &[1, 1], &[1, 1], to_bytes(&[1.0]))
            .unwrap_err();
        assert_eq!(err, StorageError::read_only());
        assert!(store.define_group(store.root_group()?, "sub").is_err());
        assert!(store.get_bytes(grid, &[0, 0], &[1, 1], &[1, 1]).is_ok());
        Ok(())
    }

    #[test]
    fn memory_store_catalog() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let root = store.root_group()?;
        assert_eq!(store.group_name(root)?, "/");
        assert_eq!(store.group_full_name(root)?, "/");
        let time = store.define_dimension(root, "time", DimensionLength::Unlimited)?;
        let forecast = store.define_group(root, "forecast")?;
        let surface = store.define_group(forecast, "surface")?;
        assert_eq!(store.group_full_name(surface)?, "/forecast/surface");
        assert!(store.define_group(root, "forecast").is_err());
        assert_eq!(store.subgroups(root)?, vec![forecast]);

        assert_eq!(store.find_dimension(surface, "time")?, time);
        assert!(store.find_dimension(surface, "depth").is_err());
        assert_eq!(store.unlimited_dimensions(root)?, vec![time]);
        assert!(store.unlimited_dimensions(surface)?.is_empty());

        let depth = store.define_dimension(surface, "depth", DimensionLength::Fixed(2))?;
        assert!(store.define_variable(root, "bad", ElementType::Int, &[depth]).is_err());
        let err = store
            .define_variable(surface, "names", ElementType::String, &[depth])
            .unwrap_err();
        assert_eq!(err.code(), codes::NC_EBADTYPE);
        let var = store.define_variable(surface, "t", ElementType::Int, &[time, depth])?;
        assert_eq!(store.open_variable(surface, "t")?.id, var);
        assert!(store.open_variable(root, "t").is_err());
        store.rename_variable(var, "t2")?;
        assert_eq!(store.variable_info(var)?.name, "t2");
        store.rename_dimension(depth, "level")?;
        assert_eq!(store.dimension_info(depth)?.name, "level");

        let owner = AttributeOwner::Variable(var);
        let data = AttributeData {
            element_type: ElementType::String,
            bytes: Bytes::from_static(b"kelvin"),
        };
        store.put_attribute(owner, "units", data.clone())?;
        store.put_attribute(
            owner,
            "scale",
            AttributeData {
                element_type: ElementType::Double,
                bytes: Bytes::from(1.5f64.to_ne_bytes().to_vec()),
            },
        )?;
        assert_eq!(store.attribute_names(owner)?, vec!["units", "scale"]);
        assert!(store.rename_attribute(owner, "units", "scale").is_err());
        store.rename_attribute(owner, "units", "unit")?;
        assert_eq!(store.get_attribute(owner, "unit")?, data);
        store.delete_attribute(owner, "unit")?;
        assert!(store.get_attribute(owner, "unit").is_err());
        assert!(store.delete_attribute(owner, "unit").is_err());
        let bad = AttributeData {
            element_type: ElementType::Int,
            bytes: Bytes::from_static(&[0, 1, 2]),
        };
        assert!(store.put_attribute(owner, "bad", bad).is_err());
        store.flush()?;
        Ok(())
    }

    #[test]
    fn memory_store_checksum_validation() -> Result<(), Box<dyn Error>> {
        let mut options = MemoryStoreOptions::default();
        options.set_validate_checksums(false);
        let store = MemoryStore::new_with_options(options);
        assert!(!store.options.validate_checksums());
        let root = store.root_group()?;
        let x = store.define_dimension(root, "x", DimensionLength::Fixed(4))?;
        let var = store.define_variable(root, "v", ElementType::Float, &[x])?;
        store.set_layout(var, &LayoutUpdate::default().with_checksum(ChecksumMode::Fletcher32))?;
        store.put_bytes(var, &[0], &[4], &[1], to_bytes(&[1.0, 2.0, 3.0, 4.0]))?;
        // Corrupt the stored checksum
        {
            let mut catalog = store.catalog.lock();
            let chunk = catalog.variable_mut(var)?.chunks.values_mut().next().unwrap();
            let mut corrupted = chunk.to_vec();
            let last = corrupted.len() - 1;
            corrupted[last] ^= 0xff;
            *chunk = Bytes::from(corrupted);
        }
        let bytes = store.get_bytes(var, &[0], &[4], &[1])?;
        assert_eq!(from_bytes(&bytes), vec![1.0, 2.0, 3.0, 4.0]);
        Ok(())
    }
}
