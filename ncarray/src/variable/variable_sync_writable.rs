use ncarray_hyperslab::{Access, Hyperslab, HyperslabError};
use ncarray_storage::{Bytes, ReadableWritableStorageTraits};

use super::element::Element;
use super::{IntoTransferBytes, Variable};
use crate::NcError;
use crate::config::global_config;

impl<TStorage: ?Sized + ReadableWritableStorageTraits + 'static> Variable<TStorage> {
    /// Write every element of the variable at its current dimension lengths.
    ///
    /// An unlimited dimension of length zero is not extended; use [`write_slice`](Variable::write_slice) to append.
    ///
    /// # Errors
    /// Returns an [`NcError`] if
    ///  - the element type of the variable is not supported for transfers,
    ///  - `data` is incompatible with the element type of the variable,
    ///  - the number of elements in `data` does not match the number of elements in the variable, or
    ///  - there is a store error.
    pub fn write_full<'a>(&self, data: impl IntoTransferBytes<'a>) -> Result<(), NcError> {
        let hyperslab = Hyperslab::new_full(&self.shape()?);
        self.write_hyperslab(&hyperslab, data)
    }

    /// Write the rectangular region of the variable given by `start` and `count`.
    ///
    /// A region beyond the current length of an unlimited dimension extends it.
    ///
    /// # Errors
    /// Returns an [`NcError`] if
    ///  - `start` or `count` do not match the dimensionality of the variable,
    ///  - the region extends beyond the length of any fixed dimension,
    ///  - the element type of the variable is not supported for transfers,
    ///  - `data` is incompatible with the element type of the variable,
    ///  - the number of elements in `data` does not match the number of elements in the region, or
    ///  - there is a store error.
    pub fn write_slice<'a>(
        &self,
        start: &[u64],
        count: &[u64],
        data: impl IntoTransferBytes<'a>,
    ) -> Result<(), NcError> {
        let stride = vec![1; start.len()];
        self.write_strided(start, count, &stride, data)
    }

    /// Write the elements of the variable at `start[i] + k * stride[i]` for `k` in `0..count[i]` along each dimension `i`.
    ///
    /// # Errors
    /// Returns an [`NcError`] if
    ///  - `start`, `count`, or `stride` do not match the dimensionality of the variable,
    ///  - a stride is zero,
    ///  - the region extends beyond the length of any fixed dimension,
    ///  - the element type of the variable is not supported for transfers,
    ///  - `data` is incompatible with the element type of the variable,
    ///  - the number of elements in `data` does not match the number of elements in the region, or
    ///  - there is a store error.
    pub fn write_strided<'a>(
        &self,
        start: &[u64],
        count: &[u64],
        stride: &[u64],
        data: impl IntoTransferBytes<'a>,
    ) -> Result<(), NcError> {
        let hyperslab = self.hyperslab(start, count, stride)?;
        self.write_hyperslab(&hyperslab, data)
    }

    /// Write the single element of a scalar variable.
    ///
    /// # Errors
    /// Returns an [`NcError`] if the variable is not a scalar, `value` is incompatible with its element type, or there is a store error.
    pub fn write_scalar<T: Element>(&self, value: T) -> Result<(), NcError> {
        let hyperslab = self.scalar_hyperslab()?;
        self.write_hyperslab(&hyperslab, vec![value])
    }

    /// Write the elements of the variable addressed by `hyperslab`.
    ///
    /// An empty hyperslab with no data is not written to the store.
    ///
    /// # Errors
    /// Returns an [`NcError`] if
    ///  - the dimensionality of `hyperslab` does not match the variable,
    ///  - `hyperslab` is not valid for the current dimension lengths,
    ///  - the element type of the variable is not supported for transfers,
    ///  - `data` is incompatible with the element type of the variable,
    ///  - the number of elements in `data` does not match the number of elements in `hyperslab`, or
    ///  - there is a store error.
    pub fn write_hyperslab<'a>(
        &self,
        hyperslab: &Hyperslab,
        data: impl IntoTransferBytes<'a>,
    ) -> Result<(), NcError> {
        self.validate_transfer_type()?;
        self.validate_rank(hyperslab.dimensionality())?;
        hyperslab.validate(&self.extents()?, Access::Write)?;

        let element_type = self.element_type();
        let bytes = data.into_transfer_bytes(element_type)?;
        let element_size = element_type
            .fixed_size()
            .ok_or_else(|| NcError::InvalidType(element_type.name().to_string()))?;
        let got = (bytes.len() / element_size) as u64;
        let expected = hyperslab
            .num_elements()
            .ok_or_else(|| HyperslabError::TooManyElements {
                count: hyperslab.count().to_vec(),
            })?;
        if got != expected {
            return Err(NcError::SizeMismatch { got, expected });
        }
        if hyperslab.is_empty() {
            return Ok(());
        }

        let bytes = Bytes::from(bytes.into_owned());
        let num_bytes = bytes.len();
        self.storage.put_bytes(
            self.id(),
            hyperslab.start(),
            hyperslab.count(),
            hyperslab.stride(),
            bytes,
        )?;
        if global_config().trace_transfers() {
            log::debug!(
                "wrote {num_bytes} bytes to variable `{}` ({}) at {hyperslab}",
                self.name(),
                self.id()
            );
        }
        Ok(())
    }
}
