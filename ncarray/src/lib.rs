//! `ncarray` is a Rust library for typed hyperslab access to hierarchical, netCDF-style array data.
//!
//! A container holds a tree of [groups](group::Group), each with named [dimensions](dimension::Dimension), typed [variables](variable::Variable), [attributes](attribute::Attribute), and subgroups.
//! The core of `ncarray` is its variable data engine, which moves binary array data between an array store and typed buffers:
//! - every variable has one of a fixed catalog of primitive [element types](ncarray_data_type::ElementType),
//! - data is read and written by [hyperslab](ncarray_hyperslab::Hyperslab): the full variable, a rectangular slice, or a strided slice,
//! - requests are validated against the dimensionality, current dimension lengths, and element type of a variable before any transfer, and
//! - writes may extend unlimited dimensions.
//!
//! The [storage layout](variable::storage_layout) of each variable (chunking, compression, fill, byte order, and checksum) is configurable until data is first written to it.
//!
//! ## Stores
//! `ncarray` accesses data only through the storage traits of [`ncarray_storage`], re-exported as [`storage`].
//! [`MemoryStore`](storage::store::MemoryStore) is an in-memory store implementing netCDF-4 storage semantics, including chunking, the shuffle, deflate, and fletcher32 filters, and fill values.
//! Wrap a store in a [`PerformanceMetricsStorageAdapter`](storage::storage_adapter::performance_metrics::PerformanceMetricsStorageAdapter) to count transfers.
//!
//! ## Logging
//! `ncarray` logs information and warnings using the [`log`] crate.
//! A logging implementation must be enabled to capture logs.
//! Transfers are logged at the `debug` level if [transfer tracing](config::Config#transfer-tracing) is enabled.
//!
//! ## Examples
//! ```rust
//! # use std::sync::Arc;
//! use ncarray::file::File;
//! use ncarray::storage::{DimensionLength, store::MemoryStore};
//! use ncarray::data_type::ElementType;
//!
//! let file = File::create(Arc::new(MemoryStore::new()))?;
//! let root = file.root();
//! root.add_dimension("time", DimensionLength::Unlimited)?;
//! root.add_dimension("station", DimensionLength::Fixed(3))?;
//!
//! let temp = root.add_variable("temp", "double", &["time", "station"])?;
//! temp.add_attribute("units", ElementType::Char, "K")?;
//! temp.set_chunk_sizes(&[1, 3])?;
//!
//! // Append two records
//! temp.write_slice(&[0, 0], &[2, 3], vec![280.0f64, 281.5, 279.0, 282.0, 283.5, 281.0])?;
//! assert_eq!(temp.shape()?, vec![2, 3]);
//!
//! // Read every second station of the last record
//! let values: Vec<f64> = temp.read_strided(&[1, 0], &[1, 2], &[1, 2])?;
//! assert_eq!(values, vec![282.0, 281.0]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crate Features
//! #### Default
//!  - `ndarray`: read variables into and write variables from [`ndarray`] arrays.
//!
//! ## Licence
//! `ncarray` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted for inclusion in the work by you, as defined in the Apache-2.0 license, shall be dual licensed as above, without any additional terms or conditions.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(clippy::wildcard_enum_match_arm)]

pub mod attribute;
pub mod config;
pub mod dimension;
mod error;
pub mod file;
pub mod group;
pub mod variable;

pub use error::NcError;

pub use ncarray_data_type as data_type;
pub use ncarray_hyperslab as hyperslab;
pub use ncarray_storage as storage;
