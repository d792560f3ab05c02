use std::sync::Arc;

use ncarray_hyperslab::{Access, Extent, Hyperslab};
use ncarray_storage::{Bytes, ContainerId, ReadableStorageTraits};

use super::element::ElementOwned;
use super::{FromTransferBytes, Variable};
use crate::NcError;
use crate::config::global_config;

impl<TStorage: ?Sized + ReadableStorageTraits + 'static> Variable<TStorage> {
    /// Open the variable named `name` in the container `container` of `storage`.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if the container or variable does not exist.
    pub fn open(storage: Arc<TStorage>, container: ContainerId, name: &str) -> Result<Self, NcError> {
        let info = storage.open_variable(container, name)?;
        Ok(Self::new_with_info(storage, info))
    }

    /// Return the current lengths of the dimensions of the variable.
    ///
    /// Unlimited dimensions report their length after every write so far.
    ///
    /// # Errors
    /// Returns [`NcError::StorageError`] if a dimension cannot be queried.
    pub fn shape(&self) -> Result<Vec<u64>, NcError> {
        Ok(self
            .dimension_ids()
            .iter()
            .map(|&dimension| self.storage.dimension_length(dimension))
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Return the current extents of the dimensions of the variable.
    pub(super) fn extents(&self) -> Result<Vec<Extent>, NcError> {
        Ok(self
            .dimension_ids()
            .iter()
            .map(|&dimension| {
                self.storage.dimension_info(dimension).map(|info| Extent {
                    length: info.length,
                    unlimited: info.unlimited,
                })
            })
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// The hyperslab addressing the single element of a scalar variable.
    ///
    /// A one-dimensional variable of length one is a scalar if [`scalar_length_one`](crate::config::Config#scalar-length-one) is enabled.
    pub(super) fn scalar_hyperslab(&self) -> Result<Hyperslab, NcError> {
        match self.ndims() {
            0 => Ok(Hyperslab::default()),
            1 if global_config().scalar_length_one() => {
                let length = self.shape()?[0];
                if length == 1 {
                    Ok(Hyperslab::new_full(&[1]))
                } else {
                    Err(NcError::SizeMismatch {
                        got: 1,
                        expected: length,
                    })
                }
            }
            ndims => Err(NcError::RankMismatch {
                got: 0,
                expected: ndims,
            }),
        }
    }

    /// Read every element of the variable at its current dimension lengths.
    ///
    /// # Errors
    /// Returns an [`NcError`] if
    ///  - the element type of the variable is not supported for transfers,
    ///  - `T` is incompatible with the element type of the variable, or
    ///  - there is a store error.
    pub fn read_full<T: FromTransferBytes>(&self) -> Result<T, NcError> {
        let hyperslab = Hyperslab::new_full(&self.shape()?);
        self.read_hyperslab(&hyperslab)
    }

    /// Read the rectangular region of the variable given by `start` and `count`.
    ///
    /// # Errors
    /// Returns an [`NcError`] if
    ///  - `start` or `count` do not match the dimensionality of the variable,
    ///  - the region extends beyond the current length of any dimension,
    ///  - the element type of the variable is not supported for transfers,
    ///  - `T` is incompatible with the element type of the variable, or
    ///  - there is a store error.
    pub fn read_slice<T: FromTransferBytes>(&self, start: &[u64], count: &[u64]) -> Result<T, NcError> {
        let stride = vec![1; start.len()];
        self.read_strided(start, count, &stride)
    }

    /// Read the elements of the variable at `start[i] + k * stride[i]` for `k` in `0..count[i]` along each dimension `i`.
    ///
    /// # Errors
    /// Returns an [`NcError`] if
    ///  - `start`, `count`, or `stride` do not match the dimensionality of the variable,
    ///  - a stride is zero,
    ///  - the region extends beyond the current length of any dimension,
    ///  - the element type of the variable is not supported for transfers,
    ///  - `T` is incompatible with the element type of the variable, or
    ///  - there is a store error.
    pub fn read_strided<T: FromTransferBytes>(
        &self,
        start: &[u64],
        count: &[u64],
        stride: &[u64],
    ) -> Result<T, NcError> {
        let hyperslab = self.hyperslab(start, count, stride)?;
        self.read_hyperslab(&hyperslab)
    }

    /// Read the single element of a scalar variable.
    ///
    /// # Errors
    /// Returns an [`NcError`] if the variable is not a scalar, `T` is incompatible with its element type, or there is a store error.
    pub fn read_scalar<T: ElementOwned>(&self) -> Result<T, NcError> {
        let hyperslab = self.scalar_hyperslab()?;
        let elements: Vec<T> = self.read_hyperslab(&hyperslab)?;
        let got = elements.len() as u64;
        elements
            .into_iter()
            .next()
            .ok_or(NcError::SizeMismatch { got, expected: 1 })
    }

    /// Read the elements of the variable addressed by `hyperslab`.
    ///
    /// An empty hyperslab is not read from the store.
    ///
    /// # Errors
    /// Returns an [`NcError`] if
    ///  - the dimensionality of `hyperslab` does not match the variable,
    ///  - `hyperslab` is not valid for the current dimension lengths,
    ///  - the element type of the variable is not supported for transfers,
    ///  - `T` is incompatible with the element type of the variable, or
    ///  - there is a store error.
    pub fn read_hyperslab<T: FromTransferBytes>(&self, hyperslab: &Hyperslab) -> Result<T, NcError> {
        self.validate_transfer_type()?;
        self.validate_rank(hyperslab.dimensionality())?;
        hyperslab.validate(&self.extents()?, Access::Read)?;
        T::validate_element_type(self.element_type())?;

        let bytes = if hyperslab.is_empty() {
            Bytes::new()
        } else {
            self.storage.get_bytes(
                self.id(),
                hyperslab.start(),
                hyperslab.count(),
                hyperslab.stride(),
            )?
        };
        if global_config().trace_transfers() {
            log::debug!(
                "read {} bytes from variable `{}` ({}) at {hyperslab}",
                bytes.len(),
                self.name(),
                self.id()
            );
        }
        T::from_transfer_bytes(bytes, hyperslab.count(), self.element_type())
    }
}
