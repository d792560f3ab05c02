//! Attributes.
//!
//! An attribute is a named, typed value attached to a group or a variable.
//! Its value is a [`TypedBuffer`]: a sequence of numbers (a single number is a scalar), character data, or text.

use std::sync::Arc;

use ncarray_data_type::ElementType;
use ncarray_storage::{AttributeData, AttributeOwner, Bytes, CatalogStorageTraits};
use serde_json::{Value, json};

use crate::NcError;
use crate::variable::TypedBuffer;

/// An attribute of a group or a variable.
#[derive(Debug)]
pub struct Attribute<TStorage: ?Sized> {
    storage: Arc<TStorage>,
    owner: AttributeOwner,
    name: String,
}

impl<TStorage: ?Sized> Clone for Attribute<TStorage> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            owner: self.owner,
            name: self.name.clone(),
        }
    }
}

impl<TStorage: ?Sized> Attribute<TStorage> {
    /// Create a handle to the attribute `name` of `owner` in `storage`.
    ///
    /// The store is not queried.
    #[must_use]
    pub fn new(storage: Arc<TStorage>, owner: AttributeOwner, name: &str) -> Self {
        Self {
            storage,
            owner,
            name: name.to_string(),
        }
    }

    /// Get the attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the owner of the attribute.
    #[must_use]
    pub const fn owner(&self) -> AttributeOwner {
        self.owner
    }
}

impl<TStorage: ?Sized + CatalogStorageTraits + 'static> Attribute<TStorage> {
    /// Open the existing attribute `name` of `owner`.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the owner or attribute does not exist.
    pub fn open(storage: Arc<TStorage>, owner: AttributeOwner, name: &str) -> Result<Self, NcError> {
        storage.get_attribute(owner, name)?;
        Ok(Self::new(storage, owner, name))
    }

    /// Create or replace the attribute `name` of `owner` with `value` stored as `element_type`.
    ///
    /// Text is accepted for both the `char` and `string` element types.
    ///
    /// # Errors
    /// Returns [`NcError::TypeMismatch`] if `value` is incompatible with `element_type`,
    /// or [`NcError::StorageError`] if the store rejects the attribute.
    pub fn create(
        storage: Arc<TStorage>,
        owner: AttributeOwner,
        name: &str,
        element_type: ElementType,
        value: impl Into<TypedBuffer>,
    ) -> Result<Self, NcError> {
        let data = attribute_data(element_type, value.into())?;
        storage.put_attribute(owner, name, data)?;
        Ok(Self::new(storage, owner, name))
    }

    /// Return the element type of the attribute.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the attribute does not exist.
    pub fn element_type(&self) -> Result<ElementType, NcError> {
        Ok(self.storage.get_attribute(self.owner, &self.name)?.element_type)
    }

    /// Return the value of the attribute.
    ///
    /// 64-bit integers are returned at full width.
    ///
    /// # Errors
    /// Returns an [`NcError`] if the attribute does not exist or its stored bytes are not valid elements of its type.
    pub fn value(&self) -> Result<TypedBuffer, NcError> {
        let data = self.storage.get_attribute(self.owner, &self.name)?;
        Ok(TypedBuffer::from_ne_bytes(data.element_type, &data.bytes)?)
    }

    /// Replace the value of the attribute with `value` stored as `element_type`.
    ///
    /// # Errors
    /// Returns [`NcError::TypeMismatch`] if `value` is incompatible with `element_type`,
    /// or [`NcError::StorageError`] if the store rejects the attribute.
    pub fn set_value(
        &self,
        element_type: ElementType,
        value: impl Into<TypedBuffer>,
    ) -> Result<(), NcError> {
        let data = attribute_data(element_type, value.into())?;
        Ok(self.storage.put_attribute(self.owner, &self.name, data)?)
    }

    /// Rename the attribute.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the attribute does not exist or the new name is invalid or in use.
    pub fn rename(&mut self, name: &str) -> Result<(), NcError> {
        self.storage.rename_attribute(self.owner, &self.name, name)?;
        name.clone_into(&mut self.name);
        Ok(())
    }

    /// Delete the attribute.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the attribute does not exist or the store is read only.
    pub fn delete(self) -> Result<(), NcError> {
        Ok(self.storage.delete_attribute(self.owner, &self.name)?)
    }

    /// Return a JSON summary of the attribute with its `name` and `value`.
    ///
    /// # Errors
    /// Returns an [`NcError`] if the value cannot be retrieved.
    pub fn to_json(&self) -> Result<Value, NcError> {
        Ok(json!({
            "name": self.name,
            "value": self.value()?.to_json_value(),
        }))
    }
}

/// Encode `value` as the stored bytes of an attribute of `element_type`.
fn attribute_data(element_type: ElementType, value: TypedBuffer) -> Result<AttributeData, NcError> {
    let bytes = match (element_type, value) {
        (ElementType::Char, TypedBuffer::Text(text)) => text.into_bytes(),
        (element_type, value) => value.into_ne_bytes(element_type)?.into_owned(),
    };
    Ok(AttributeData {
        element_type,
        bytes: Bytes::from(bytes),
    })
}
