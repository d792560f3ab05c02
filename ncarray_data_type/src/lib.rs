//! The element type catalog for the [`ncarray`](https://docs.rs/ncarray/latest/ncarray/index.html) crate.
//!
//! Every variable and attribute in an `ncarray` container has one of a fixed set of primitive [`ElementType`]s.
//! The [`TYPE_CATALOG`] maps each of them to its human-readable name and its size in bytes, and is never mutated.
//!
//! ## Licence
//! `ncarray_data_type` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

mod element_type;
mod fill_value;

pub use element_type::{
    ElementType, ElementTypeSize, InvalidTypeError, TYPE_CATALOG, TypeCatalogEntry, name_of,
    size_of, tag_of,
};
pub use fill_value::{ElementTypeFillValueError, FillValue};
