use thiserror::Error;

/// Storage error codes.
///
/// Codes follow the numbering of the netCDF C library.
/// The engine never inspects a code beyond treating it as a failure.
pub mod codes {
    /// Not a valid id.
    pub const NC_EBADID: i32 = -33;
    /// File exists and no clobber was requested.
    pub const NC_EEXIST: i32 = -35;
    /// Invalid argument.
    pub const NC_EINVAL: i32 = -36;
    /// Write to read only.
    pub const NC_EPERM: i32 = -37;
    /// Index exceeds dimension bound.
    pub const NC_EINVALCOORDS: i32 = -40;
    /// String match to name in use.
    pub const NC_ENAMEINUSE: i32 = -42;
    /// Attribute not found.
    pub const NC_ENOTATT: i32 = -43;
    /// Not a valid data type or `_FillValue` type mismatch.
    pub const NC_EBADTYPE: i32 = -45;
    /// Invalid dimension id or name.
    pub const NC_EBADDIM: i32 = -46;
    /// Variable not found.
    pub const NC_ENOTVAR: i32 = -49;
    /// Start+count exceeds dimension bound.
    pub const NC_EEDGE: i32 = -57;
    /// Illegal stride.
    pub const NC_ESTRIDE: i32 = -58;
    /// Attribute or variable name contains illegal characters.
    pub const NC_EBADNAME: i32 = -59;
    /// Error at the storage layer, such as a failed checksum or decompression.
    pub const NC_EHDFERR: i32 = -101;
    /// Attempt to define var properties after data has been written.
    pub const NC_ELATEDEF: i32 = -123;
    /// No group found.
    pub const NC_ENOGRP: i32 = -125;
    /// Bad chunk sizes.
    pub const NC_EBADCHUNK: i32 = -127;
}

/// A storage error.
///
/// A `(code, message)` pair reported by a store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct StorageError {
    code: i32,
    message: String,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A write operation was attempted on a read only store.
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(codes::NC_EPERM, "NetCDF: Write to read only")
    }

    /// A storage layout change was attempted after data was written.
    #[must_use]
    pub fn late_definition(what: &str) -> Self {
        Self::new(
            codes::NC_ELATEDEF,
            format!("NetCDF: Attempt to define {what} after data has been written"),
        )
    }

    /// Return the error code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// Return the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::new(codes::NC_EHDFERR, err.to_string())
    }
}

impl From<&str> for StorageError {
    fn from(err: &str) -> Self {
        Self::new(codes::NC_EINVAL, err)
    }
}

impl From<String> for StorageError {
    fn from(err: String) -> Self {
        Self::new(codes::NC_EINVAL, err)
    }
}
