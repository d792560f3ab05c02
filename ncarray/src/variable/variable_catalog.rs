use ncarray_data_type::ElementType;
use ncarray_storage::{AttributeOwner, CatalogStorageTraits, ReadableCatalogStorageTraits};
use serde_json::{Value, json};

use super::{TypedBuffer, Variable};
use crate::NcError;
use crate::attribute::Attribute;
use crate::dimension::Dimension;

impl<TStorage: ?Sized> Variable<TStorage> {
    /// Return the ordered dimensions of the variable.
    #[must_use]
    pub fn dimensions(&self) -> Vec<Dimension<TStorage>> {
        self.dimension_ids()
            .iter()
            .map(|&dimension| Dimension::new(self.storage.clone(), dimension))
            .collect()
    }
}

impl<TStorage: ?Sized + CatalogStorageTraits + 'static> Variable<TStorage> {
    /// Rename the variable.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the new name is invalid or in use, or the store is read only.
    pub fn rename(&mut self, name: &str) -> Result<(), NcError> {
        self.storage.rename_variable(self.id(), name)?;
        name.clone_into(&mut self.info.name);
        Ok(())
    }

    /// Return the attributes of the variable in definition order.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the variable does not exist.
    pub fn attributes(&self) -> Result<Vec<Attribute<TStorage>>, NcError> {
        let owner = AttributeOwner::Variable(self.id());
        Ok(self
            .storage
            .attribute_names(owner)?
            .iter()
            .map(|name| Attribute::new(self.storage.clone(), owner, name))
            .collect())
    }

    /// Return the attribute `name` of the variable.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the attribute does not exist.
    pub fn attribute(&self, name: &str) -> Result<Attribute<TStorage>, NcError> {
        Attribute::open(self.storage.clone(), self.id().into(), name)
    }

    /// Create or replace the attribute `name` of the variable.
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
        Attribute::create(self.storage.clone(), self.id().into(), name, element_type, value)
    }
}

impl<TStorage: ?Sized + ReadableCatalogStorageTraits + 'static> Variable<TStorage> {
    /// Return a JSON summary of the variable.
    ///
    /// The summary holds the `id`, `name`, `type`, dimension names, and attributes of the variable.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if a dimension or attribute cannot be retrieved.
    pub fn to_json(&self) -> Result<Value, NcError> {
        let dimensions = self
            .dimensions()
            .iter()
            .map(Dimension::name)
            .collect::<Result<Vec<_>, _>>()?;
        let attributes = self
            .attributes()?
            .iter()
            .map(Attribute::to_json)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(json!({
            "id": self.id().local,
            "name": self.name(),
            "type": self.element_type().name(),
            "dimensions": dimensions,
            "attributes": attributes,
        }))
    }
}
