//! The in-memory catalog of groups, dimensions, variables, and attributes.

use std::collections::BTreeMap;

use itertools::Itertools;
use ncarray_data_type::ElementType;
use ncarray_hyperslab::{ArrayIndices, Extent};

use crate::storage_error::codes;
use crate::{
    AttributeData, AttributeOwner, Bytes, ChunkMode, ContainerId, DimensionId, DimensionInfo,
    StorageError, StorageLayout, VariableId,
};

pub(super) type Attributes = Vec<(String, AttributeData)>;

#[derive(Debug)]
pub(super) struct GroupEntry {
    pub(super) name: String,
    pub(super) parent: Option<ContainerId>,
    pub(super) subgroups: Vec<ContainerId>,
    pub(super) dimensions: Vec<DimensionEntry>,
    pub(super) variables: Vec<VariableEntry>,
    pub(super) attributes: Attributes,
}

impl GroupEntry {
    pub(super) fn new(name: String, parent: Option<ContainerId>) -> Self {
        Self {
            name,
            parent,
            subgroups: vec![],
            dimensions: vec![],
            variables: vec![],
            attributes: vec![],
        }
    }
}

#[derive(Debug)]
pub(super) struct DimensionEntry {
    pub(super) name: String,
    pub(super) length: u64,
    pub(super) unlimited: bool,
}

#[derive(Debug)]
pub(super) struct VariableEntry {
    pub(super) name: String,
    pub(super) element_type: ElementType,
    pub(super) dimensions: Vec<DimensionId>,
    pub(super) layout: StorageLayout,
    /// Set by the first non-empty write. The layout is fixed from then on.
    pub(super) written: bool,
    pub(super) chunks: BTreeMap<ArrayIndices, Bytes>,
    pub(super) attributes: Attributes,
}

#[derive(Debug)]
pub(super) struct Catalog {
    groups: Vec<GroupEntry>,
}

fn local_index(local: u32) -> usize {
    local as usize
}

pub(super) fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() || name.contains(['/', '\0']) || name.trim() != name {
        Err(StorageError::new(
            codes::NC_EBADNAME,
            format!("NetCDF: Name contains illegal characters: `{name}`"),
        ))
    } else {
        Ok(())
    }
}

pub(super) fn name_in_use(name: &str) -> StorageError {
    StorageError::new(
        codes::NC_ENAMEINUSE,
        format!("NetCDF: String match to name in use: `{name}`"),
    )
}

impl Catalog {
    pub(super) fn new() -> Self {
        Self {
            groups: vec![GroupEntry::new("/".to_string(), None)],
        }
    }

    pub(super) fn push_group(&mut self, group: GroupEntry) -> ContainerId {
        let id = ContainerId(u32::try_from(self.groups.len()).unwrap_or(u32::MAX));
        self.groups.push(group);
        id
    }

    pub(super) fn group(&self, group: ContainerId) -> Result<&GroupEntry, StorageError> {
        self.groups
            .get(local_index(group.0))
            .ok_or_else(|| StorageError::new(codes::NC_ENOGRP, format!("NetCDF: No group found: {group}")))
    }

    pub(super) fn group_mut(&mut self, group: ContainerId) -> Result<&mut GroupEntry, StorageError> {
        self.groups
            .get_mut(local_index(group.0))
            .ok_or_else(|| StorageError::new(codes::NC_ENOGRP, format!("NetCDF: No group found: {group}")))
    }

    /// Returns true if `group` has a subgroup named `name`.
    pub(super) fn has_subgroup(&self, group: ContainerId, name: &str) -> Result<bool, StorageError> {
        self.group(group)?
            .subgroups
            .iter()
            .map(|&subgroup| self.group(subgroup).map(|entry| entry.name == name))
            .fold_ok(false, |acc, matches| acc || matches)
    }

    /// Returns true if `ancestor` is `group` or one of its ancestors.
    pub(super) fn is_ancestor(
        &self,
        ancestor: ContainerId,
        group: ContainerId,
    ) -> Result<bool, StorageError> {
        let mut current = Some(group);
        while let Some(group) = current {
            if group == ancestor {
                return Ok(true);
            }
            current = self.group(group)?.parent;
        }
        Ok(false)
    }

    pub(super) fn dimension(&self, dimension: DimensionId) -> Result<&DimensionEntry, StorageError> {
        self.group(dimension.container)?
            .dimensions
            .get(local_index(dimension.local))
            .ok_or_else(|| bad_dimension(dimension))
    }

    pub(super) fn dimension_mut(
        &mut self,
        dimension: DimensionId,
    ) -> Result<&mut DimensionEntry, StorageError> {
        self.group_mut(dimension.container)?
            .dimensions
            .get_mut(local_index(dimension.local))
            .ok_or_else(|| bad_dimension(dimension))
    }

    pub(super) fn dimension_info(&self, dimension: DimensionId) -> Result<DimensionInfo, StorageError> {
        let entry = self.dimension(dimension)?;
        Ok(DimensionInfo {
            id: dimension,
            name: entry.name.clone(),
            length: entry.length,
            unlimited: entry.unlimited,
        })
    }

    pub(super) fn variable(&self, variable: VariableId) -> Result<&VariableEntry, StorageError> {
        self.group(variable.container)?
            .variables
            .get(local_index(variable.local))
            .ok_or_else(|| not_a_variable(variable))
    }

    pub(super) fn variable_mut(
        &mut self,
        variable: VariableId,
    ) -> Result<&mut VariableEntry, StorageError> {
        self.group_mut(variable.container)?
            .variables
            .get_mut(local_index(variable.local))
            .ok_or_else(|| not_a_variable(variable))
    }

    /// Return the current extents of the dimensions of `variable`.
    pub(super) fn extents(&self, variable: &VariableEntry) -> Result<Vec<Extent>, StorageError> {
        variable
            .dimensions
            .iter()
            .map(|&dimension| {
                let entry = self.dimension(dimension)?;
                Ok(Extent {
                    length: entry.length,
                    unlimited: entry.unlimited,
                })
            })
            .collect()
    }

    /// Return the shape of the chunks of `variable`.
    ///
    /// A contiguous variable is stored as a single chunk spanning its (fixed) dimensions.
    pub(super) fn chunk_shape(&self, variable: &VariableEntry) -> Result<Vec<u64>, StorageError> {
        match (&variable.layout.chunk_mode, &variable.layout.chunk_sizes) {
            (ChunkMode::Chunked, Some(chunk_sizes)) => Ok(chunk_sizes.clone()),
            _ => Ok(default_chunk_sizes(&self.extents(variable)?)),
        }
    }

    pub(super) fn attributes(&self, owner: AttributeOwner) -> Result<&Attributes, StorageError> {
        match owner {
            AttributeOwner::Group(group) => Ok(&self.group(group)?.attributes),
            AttributeOwner::Variable(variable) => Ok(&self.variable(variable)?.attributes),
        }
    }

    pub(super) fn attributes_mut(
        &mut self,
        owner: AttributeOwner,
    ) -> Result<&mut Attributes, StorageError> {
        match owner {
            AttributeOwner::Group(group) => Ok(&mut self.group_mut(group)?.attributes),
            AttributeOwner::Variable(variable) => Ok(&mut self.variable_mut(variable)?.attributes),
        }
    }
}

/// The default chunk sizes for dimensions with `extents`.
///
/// One along unlimited dimensions and the full length (at least one) elsewhere.
pub(super) fn default_chunk_sizes(extents: &[Extent]) -> Vec<u64> {
    extents
        .iter()
        .map(|extent| {
            if extent.unlimited {
                1
            } else {
                extent.length.max(1)
            }
        })
        .collect()
}

fn bad_dimension(dimension: DimensionId) -> StorageError {
    StorageError::new(
        codes::NC_EBADDIM,
        format!("NetCDF: Invalid dimension ID or name: {dimension}"),
    )
}

fn not_a_variable(variable: VariableId) -> StorageError {
    StorageError::new(
        codes::NC_ENOTVAR,
        format!("NetCDF: Variable not found: {variable}"),
    )
}

pub(super) fn attribute_not_found(name: &str) -> StorageError {
    StorageError::new(
        codes::NC_ENOTATT,
        format!("NetCDF: Attribute not found: `{name}`"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(validate_name("temp").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name(" lead").is_err());
    }

    #[test]
    fn default_chunks() {
        assert_eq!(
            default_chunk_sizes(&[Extent::unlimited(7), Extent::fixed(3), Extent::fixed(0)]),
            vec![1, 3, 1]
        );
    }
}
