//! Groups.
//!
//! A group is a container of dimensions, variables, attributes, and subgroups.
//! Every store has a root group named `/`.
//!
//! Dimensions and variables have separate namespaces within a group, while variables and subgroups share one.
//! Dimensions defined in a group are visible to the variables of its subgroups.

use std::sync::Arc;

use ncarray_data_type::ElementType;
use ncarray_storage::{
    AttributeOwner, CatalogStorageTraits, ContainerId, DimensionLength, ReadableCatalogStorageTraits,
    StorageError, VariableInfo, codes,
};
use serde_json::{Value, json};

use crate::NcError;
use crate::attribute::Attribute;
use crate::dimension::Dimension;
use crate::variable::{TypedBuffer, Variable};

/// A group.
#[derive(Debug)]
pub struct Group<TStorage: ?Sized> {
    storage: Arc<TStorage>,
    id: ContainerId,
}

impl<TStorage: ?Sized> Clone for Group<TStorage> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            id: self.id,
        }
    }
}

impl<TStorage: ?Sized> Group<TStorage> {
    /// Create a handle to the group `id` in `storage`.
    #[must_use]
    pub fn new(storage: Arc<TStorage>, id: ContainerId) -> Self {
        Self { storage, id }
    }

    /// Get the group id.
    #[must_use]
    pub const fn id(&self) -> ContainerId {
        self.id
    }

    /// Get the underlying storage backing the group.
    #[must_use]
    pub fn storage(&self) -> Arc<TStorage> {
        self.storage.clone()
    }
}

impl<TStorage: ?Sized + CatalogStorageTraits + 'static> Group<TStorage> {
    /// Return the name of the group. The root group is named `/`.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the group does not exist.
    pub fn name(&self) -> Result<String, NcError> {
        Ok(self.storage.group_name(self.id)?)
    }

    /// Return the full path name of the group, such as `/forecast/surface`.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the group does not exist.
    pub fn full_name(&self) -> Result<String, NcError> {
        Ok(self.storage.group_full_name(self.id)?)
    }

    /// Return the parent of the group, or [`None`] for the root group.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the group does not exist.
    pub fn parent(&self) -> Result<Option<Self>, NcError> {
        Ok(self
            .storage
            .group_parent(self.id)?
            .map(|parent| Self::new(self.storage.clone(), parent)))
    }

    /// Return the subgroups of the group in definition order.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the group does not exist.
    pub fn subgroups(&self) -> Result<Vec<Self>, NcError> {
        Ok(self
            .storage
            .subgroups(self.id)?
            .into_iter()
            .map(|subgroup| Self::new(self.storage.clone(), subgroup))
            .collect())
    }

    /// Return the subgroup `name`.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the group or subgroup does not exist.
    pub fn subgroup(&self, name: &str) -> Result<Self, NcError> {
        for subgroup in self.storage.subgroups(self.id)? {
            if self.storage.group_name(subgroup)? == name {
                return Ok(Self::new(self.storage.clone(), subgroup));
            }
        }
        Err(StorageError::new(codes::NC_ENOGRP, format!("NetCDF: No group found: `{name}`")).into())
    }

    /// Define a new subgroup `name`.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the name is invalid or in use, or the store is read only.
    pub fn add_subgroup(&self, name: &str) -> Result<Self, NcError> {
        let subgroup = self.storage.define_group(self.id, name)?;
        Ok(Self::new(self.storage.clone(), subgroup))
    }

    /// Return the dimensions defined in the group in definition order.
    ///
    /// Dimensions inherited from ancestor groups are not included.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the group does not exist.
    pub fn dimensions(&self) -> Result<Vec<Dimension<TStorage>>, NcError> {
        Ok(self
            .storage
            .dimensions(self.id)?
            .into_iter()
            .map(|dimension| Dimension::new(self.storage.clone(), dimension))
            .collect())
    }

    /// Return the dimension `name` visible from the group.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if no such dimension is visible.
    pub fn dimension(&self, name: &str) -> Result<Dimension<TStorage>, NcError> {
        let dimension = self.storage.find_dimension(self.id, name)?;
        Ok(Dimension::new(self.storage.clone(), dimension))
    }

    /// Return the unlimited dimensions defined in the group.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the group does not exist.
    pub fn unlimited(&self) -> Result<Vec<Dimension<TStorage>>, NcError> {
        Ok(self
            .storage
            .unlimited_dimensions(self.id)?
            .into_iter()
            .map(|dimension| Dimension::new(self.storage.clone(), dimension))
            .collect())
    }

    /// Define a new dimension `name` with `length`.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the name is invalid or in use, or the store is read only.
    pub fn add_dimension(
        &self,
        name: &str,
        length: DimensionLength,
    ) -> Result<Dimension<TStorage>, NcError> {
        let dimension = self.storage.define_dimension(self.id, name, length)?;
        Ok(Dimension::new(self.storage.clone(), dimension))
    }

    /// Define a new variable `name` with the element type named `element_type` and the dimensions named `dimensions`.
    ///
    /// `element_type` is one of the names in the type catalog, such as `double` or `int64`.
    ///
    /// # Errors
    /// Returns [`NcError::InvalidType`] if `element_type` is not a known element type,
    /// otherwise see [`add_variable_with_element_type`](Self::add_variable_with_element_type).
    pub fn add_variable(
        &self,
        name: &str,
        element_type: &str,
        dimensions: &[&str],
    ) -> Result<Variable<TStorage>, NcError> {
        self.add_variable_with_element_type(name, element_type.parse::<ElementType>()?, dimensions)
    }

    /// Define a new variable `name` with `element_type` and the dimensions named `dimensions`.
    ///
    /// Dimensions are resolved from the group and its ancestors.
    ///
    /// # Errors
    /// Returns an [`NcError`] if
    ///  - `element_type` is [`ElementType::String`], which is only supported for attributes,
    ///  - a dimension is not visible from the group, or
    ///  - the name is invalid or in use.
    pub fn add_variable_with_element_type(
        &self,
        name: &str,
        element_type: ElementType,
        dimensions: &[&str],
    ) -> Result<Variable<TStorage>, NcError> {
        if element_type.is_string() {
            return Err(NcError::InvalidType(element_type.name().to_string()));
        }
        let dimensions = dimensions
            .iter()
            .map(|dimension| self.storage.find_dimension(self.id, dimension))
            .collect::<Result<Vec<_>, _>>()?;
        let id = self
            .storage
            .define_variable(self.id, name, element_type, &dimensions)?;
        Ok(Variable::new_with_info(
            self.storage.clone(),
            VariableInfo {
                id,
                name: name.to_string(),
                element_type,
                dimensions,
            },
        ))
    }

    /// Return the attributes of the group in definition order.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the group does not exist.
    pub fn attributes(&self) -> Result<Vec<Attribute<TStorage>>, NcError> {
        let owner = AttributeOwner::Group(self.id);
        Ok(self
            .storage
            .attribute_names(owner)?
            .iter()
            .map(|name| Attribute::new(self.storage.clone(), owner, name))
            .collect())
    }

    /// Return the attribute `name` of the group.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the attribute does not exist.
    pub fn attribute(&self, name: &str) -> Result<Attribute<TStorage>, NcError> {
        Attribute::open(self.storage.clone(), self.id.into(), name)
    }

    /// Create or replace the attribute `name` of the group.
    ///
    /// # Errors
    /// Returns [`NcError::TypeMismatch`] if `value` is incompatible with `element_type`,
    /// or [`NcError::StorageError`] if the store rejects the attribute.
    pub fn add_attribute(
        &self,
        name: &str,
        element_type: ElementType,
        value: impl Into<TypedBuffer>,
    ) -> Result<Attribute<TStorage>, NcError> {
        Attribute::create(self.storage.clone(), self.id.into(), name, element_type, value)
    }
}

impl<TStorage: ?Sized + ReadableCatalogStorageTraits + 'static> Group<TStorage> {
    /// Return the variables defined in the group in definition order.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the group does not exist.
    pub fn variables(&self) -> Result<Vec<Variable<TStorage>>, NcError> {
        self.storage
            .variables(self.id)?
            .into_iter()
            .map(|variable| {
                let info = self.storage.variable_info(variable)?;
                Ok::<_, NcError>(Variable::new_with_info(self.storage.clone(), info))
            })
            .collect()
    }

    /// Return the variable `name`.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the variable does not exist.
    pub fn variable(&self, name: &str) -> Result<Variable<TStorage>, NcError> {
        Variable::open(self.storage.clone(), self.id, name)
    }

    /// Return a JSON summary of the group and everything it contains.
    ///
    /// The summary holds the `id`, `name`, and `fullname` of the group and arrays of its `dimensions`, `variables`, `attributes`, and `subgroups`.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if any part of the group cannot be retrieved.
    pub fn to_json(&self) -> Result<Value, NcError> {
        let dimensions = self
            .dimensions()?
            .iter()
            .map(Dimension::to_json)
            .collect::<Result<Vec<_>, _>>()?;
        let variables = self
            .variables()?
            .iter()
            .map(Variable::to_json)
            .collect::<Result<Vec<_>, _>>()?;
        let attributes = self
            .attributes()?
            .iter()
            .map(Attribute::to_json)
            .collect::<Result<Vec<_>, _>>()?;
        let subgroups = self
            .subgroups()?
            .iter()
            .map(Self::to_json)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(json!({
            "id": self.id.0,
            "name": self.name()?,
            "fullname": self.full_name()?,
            "dimensions": dimensions,
            "variables": variables,
            "attributes": attributes,
            "subgroups": subgroups,
        }))
    }
}
