use std::fmt::Display;

use itertools::izip;
use thiserror::Error;

use crate::iterators::HyperslabIndices;
use crate::{ArrayIndices, ArrayShape};

/// A hyperslab error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum HyperslabError {
    /// Incompatible dimensionality.
    #[error("incompatible dimensionality {got}, expected {expected}")]
    IncompatibleDimensionality { got: usize, expected: usize },
    /// Zero stride.
    #[error("stride of dimension {dimension} is zero")]
    ZeroStride { dimension: usize },
    /// The hyperslab extends beyond the current length of a dimension.
    #[error(
        "start {start} count {count} stride {stride} of dimension {dimension} exceeds its length {length}"
    )]
    OutOfRange {
        dimension: usize,
        start: u64,
        count: u64,
        stride: u64,
        length: u64,
    },
    /// The number of elements addressed by the hyperslab is not representable.
    #[error("count {count:?} addresses more elements than can be represented")]
    TooManyElements { count: Vec<u64> },
}

/// The current extent of a dimension.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extent {
    /// The current length of the dimension.
    pub length: u64,
    /// Whether the dimension is unlimited.
    pub unlimited: bool,
}

impl Extent {
    /// Create a fixed-length extent.
    #[must_use]
    pub const fn fixed(length: u64) -> Self {
        Self {
            length,
            unlimited: false,
        }
    }

    /// Create an unlimited extent with a current length of `length`.
    #[must_use]
    pub const fn unlimited(length: u64) -> Self {
        Self {
            length,
            unlimited: true,
        }
    }
}

/// The direction of a transfer, which affects hyperslab validation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Access {
    /// A read. Every dimension is bounded by its current length.
    #[display("read")]
    Read,
    /// A write. Unlimited dimensions may be extended.
    #[display("write")]
    Write,
}

/// A hyperslab.
///
/// A rectangular region of a variable with per-dimension `start`, `count` and `stride`.
/// The indices addressed along dimension `i` are `start[i] + k * stride[i]` for `k` in `0..count[i]`.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Hyperslab {
    start: ArrayIndices,
    count: ArrayShape,
    stride: ArrayShape,
}

impl Display for Hyperslab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, (start, count, stride)) in izip!(&self.start, &self.count, &self.stride).enumerate()
        {
            if i > 0 {
                write!(f, ", ")?;
            }
            if *stride == 1 {
                write!(f, "{start}..{}", start.saturating_add(*count))?;
            } else {
                let end = start.saturating_add(count.saturating_mul(*stride));
                write!(f, "{start}..{end};{stride}")?;
            }
        }
        write!(f, "]")
    }
}

impl Hyperslab {
    /// Create a hyperslab covering every element of a variable with dimension `lengths`.
    #[must_use]
    pub fn new_full(lengths: &[u64]) -> Self {
        Self {
            start: vec![0; lengths.len()],
            count: lengths.to_vec(),
            stride: vec![1; lengths.len()],
        }
    }

    /// Create a hyperslab with unit stride.
    ///
    /// # Errors
    /// Returns [`HyperslabError::IncompatibleDimensionality`] if `start` and `count` differ in length.
    pub fn new_with_start_count(
        start: ArrayIndices,
        count: ArrayShape,
    ) -> Result<Self, HyperslabError> {
        let stride = vec![1; start.len()];
        Self::new_with_start_count_stride(start, count, stride)
    }

    /// Create a strided hyperslab.
    ///
    /// # Errors
    /// Returns [`HyperslabError::IncompatibleDimensionality`] if `start`, `count`, and `stride` differ in length.
    pub fn new_with_start_count_stride(
        start: ArrayIndices,
        count: ArrayShape,
        stride: ArrayShape,
    ) -> Result<Self, HyperslabError> {
        if count.len() != start.len() {
            Err(HyperslabError::IncompatibleDimensionality {
                got: count.len(),
                expected: start.len(),
            })
        } else if stride.len() != start.len() {
            Err(HyperslabError::IncompatibleDimensionality {
                got: stride.len(),
                expected: start.len(),
            })
        } else {
            Ok(Self {
                start,
                count,
                stride,
            })
        }
    }

    /// Validate the hyperslab against the current `extents` of a variable.
    ///
    /// For [`Access::Write`], unlimited dimensions are not bounded by their current length.
    ///
    /// # Errors
    /// Returns a [`HyperslabError`] if
    ///  - the dimensionality of the hyperslab does not match the number of `extents`,
    ///  - any stride is zero,
    ///  - `start + (count - 1) * stride` is not less than the length of a dimension (or `start` exceeds the length when `count` is zero), or
    ///  - the number of addressed elements does not fit in a [`usize`].
    pub fn validate(&self, extents: &[Extent], access: Access) -> Result<(), HyperslabError> {
        if extents.len() != self.dimensionality() {
            return Err(HyperslabError::IncompatibleDimensionality {
                got: self.dimensionality(),
                expected: extents.len(),
            });
        }
        for (dimension, (&start, &count, &stride, extent)) in
            izip!(&self.start, &self.count, &self.stride, extents).enumerate()
        {
            if stride == 0 {
                return Err(HyperslabError::ZeroStride { dimension });
            }
            let out_of_range = || HyperslabError::OutOfRange {
                dimension,
                start,
                count,
                stride,
                length: extent.length,
            };
            let bounded = !(extent.unlimited && access == Access::Write);
            if count == 0 {
                if bounded && start > extent.length {
                    return Err(out_of_range());
                }
            } else {
                let last = (count - 1)
                    .checked_mul(stride)
                    .and_then(|offset| start.checked_add(offset))
                    .ok_or_else(out_of_range)?;
                if bounded && last >= extent.length {
                    return Err(out_of_range());
                }
            }
        }
        if self.num_elements_usize().is_none() {
            return Err(HyperslabError::TooManyElements {
                count: self.count.clone(),
            });
        }
        Ok(())
    }

    /// Return the start of the hyperslab.
    #[must_use]
    pub fn start(&self) -> &[u64] {
        &self.start
    }

    /// Return the count of the hyperslab.
    #[must_use]
    pub fn count(&self) -> &[u64] {
        &self.count
    }

    /// Return the stride of the hyperslab.
    #[must_use]
    pub fn stride(&self) -> &[u64] {
        &self.stride
    }

    /// Return the dimensionality of the hyperslab.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.start.len()
    }

    /// Return the number of elements of the hyperslab.
    ///
    /// Equal to the product of the components of its count.
    /// A zero-dimensional hyperslab addresses exactly one element.
    /// Returns [`None`] if the product overflows a [`u64`].
    #[must_use]
    pub fn num_elements(&self) -> Option<u64> {
        if self.is_empty() {
            return Some(0);
        }
        self.count
            .iter()
            .try_fold(1u64, |product, &count| product.checked_mul(count))
    }

    /// Return the number of elements of the hyperslab as a [`usize`].
    ///
    /// Returns [`None`] if [`num_elements()`](Self::num_elements()) is [`None`] or greater than [`usize::MAX`].
    #[must_use]
    pub fn num_elements_usize(&self) -> Option<usize> {
        self.num_elements()
            .and_then(|num_elements| usize::try_from(num_elements).ok())
    }

    /// Returns true if the hyperslab addresses no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count.contains(&0)
    }

    /// Returns true if every stride is one.
    #[must_use]
    pub fn is_unit_stride(&self) -> bool {
        self.stride.iter().all(|&s| s == 1)
    }

    /// Return the last addressed index along each dimension.
    ///
    /// Returns [`None`] if the hyperslab is empty.
    #[must_use]
    pub fn end_inclusive(&self) -> Option<ArrayIndices> {
        if self.is_empty() {
            return None;
        }
        izip!(&self.start, &self.count, &self.stride)
            .map(|(&start, &count, &stride)| {
                (count - 1)
                    .checked_mul(stride)
                    .and_then(|offset| start.checked_add(offset))
            })
            .collect()
    }

    /// Return the minimum dimension lengths that contain every addressed element.
    ///
    /// An empty hyperslab requires nothing, so the result is all zeros.
    #[must_use]
    pub fn extent_required(&self) -> ArrayShape {
        self.end_inclusive().map_or_else(
            || vec![0; self.dimensionality()],
            |end| end.into_iter().map(|e| e.saturating_add(1)).collect(),
        )
    }

    /// Returns an iterator over the indices of elements within the hyperslab in C order.
    #[must_use]
    pub fn indices(&self) -> HyperslabIndices {
        HyperslabIndices::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyperslab_new() {
        assert!(Hyperslab::new_with_start_count(vec![0, 0], vec![1, 2]).is_ok());
        assert_eq!(
            Hyperslab::new_with_start_count(vec![0, 0], vec![1]),
            Err(HyperslabError::IncompatibleDimensionality {
                got: 1,
                expected: 2
            })
        );
        assert!(Hyperslab::new_with_start_count_stride(vec![0], vec![1], vec![1, 1]).is_err());
        let full = Hyperslab::new_full(&[2, 3]);
        assert_eq!(full.start(), &[0, 0]);
        assert_eq!(full.count(), &[2, 3]);
        assert_eq!(full.stride(), &[1, 1]);
        assert_eq!(full.num_elements(), Some(6));
        assert!(full.is_unit_stride());
        assert_eq!(full.to_string(), "[0..2, 0..3]");
    }

    #[test]
    fn hyperslab_validate() {
        let extents = [Extent::fixed(4), Extent::fixed(5)];
        let hyperslab = Hyperslab::new_with_start_count(vec![1, 2], vec![3, 3]).unwrap();
        assert!(hyperslab.validate(&extents, Access::Read).is_ok());
        assert_eq!(
            hyperslab.validate(&extents[..1], Access::Read),
            Err(HyperslabError::IncompatibleDimensionality {
                got: 2,
                expected: 1
            })
        );

        let hyperslab = Hyperslab::new_with_start_count(vec![2, 0], vec![3, 1]).unwrap();
        assert!(matches!(
            hyperslab.validate(&extents, Access::Read),
            Err(HyperslabError::OutOfRange { dimension: 0, .. })
        ));
        let hyperslab = Hyperslab::new_with_start_count(vec![0, 5], vec![1, 1]).unwrap();
        assert!(matches!(
            hyperslab.validate(&extents, Access::Write),
            Err(HyperslabError::OutOfRange { dimension: 1, .. })
        ));

        let hyperslab =
            Hyperslab::new_with_start_count_stride(vec![0, 0], vec![2, 3], vec![3, 2]).unwrap();
        assert!(hyperslab.validate(&extents, Access::Read).is_ok());
        let hyperslab =
            Hyperslab::new_with_start_count_stride(vec![0, 1], vec![2, 3], vec![3, 2]).unwrap();
        assert!(hyperslab.validate(&extents, Access::Read).is_err());
        let hyperslab =
            Hyperslab::new_with_start_count_stride(vec![0, 0], vec![1, 1], vec![0, 1]).unwrap();
        assert_eq!(
            hyperslab.validate(&extents, Access::Read),
            Err(HyperslabError::ZeroStride { dimension: 0 })
        );
    }

    #[test]
    fn hyperslab_validate_empty() {
        let extents = [Extent::fixed(4)];
        let at_end = Hyperslab::new_with_start_count(vec![4], vec![0]).unwrap();
        assert!(at_end.validate(&extents, Access::Read).is_ok());
        assert!(at_end.is_empty());
        assert_eq!(at_end.num_elements(), Some(0));
        let past_end = Hyperslab::new_with_start_count(vec![5], vec![0]).unwrap();
        assert!(past_end.validate(&extents, Access::Read).is_err());
    }

    #[test]
    fn hyperslab_validate_unlimited() {
        let extents = [Extent::unlimited(0), Extent::fixed(3)];
        let hyperslab = Hyperslab::new_with_start_count(vec![0, 0], vec![2, 3]).unwrap();
        assert!(hyperslab.validate(&extents, Access::Write).is_ok());
        assert!(hyperslab.validate(&extents, Access::Read).is_err());
        let hyperslab = Hyperslab::new_with_start_count(vec![0, 1], vec![2, 3]).unwrap();
        assert!(hyperslab.validate(&extents, Access::Write).is_err());
    }

    #[test]
    fn hyperslab_extent_required() {
        let hyperslab =
            Hyperslab::new_with_start_count_stride(vec![1, 0], vec![2, 3], vec![2, 1]).unwrap();
        assert_eq!(hyperslab.end_inclusive(), Some(vec![3, 2]));
        assert_eq!(hyperslab.extent_required(), vec![4, 3]);
        assert_eq!(hyperslab.to_string(), "[1..5;2, 0..3]");
        let empty = Hyperslab::new_with_start_count(vec![1, 0], vec![0, 3]).unwrap();
        assert_eq!(empty.end_inclusive(), None);
        assert_eq!(empty.extent_required(), vec![0, 0]);
    }

    #[test]
    fn hyperslab_too_many_elements() {
        let extents = [Extent::unlimited(0), Extent::unlimited(0)];
        let hyperslab = Hyperslab::new_with_start_count(vec![0, 0], vec![1 << 32, 1 << 32]).unwrap();
        assert_eq!(hyperslab.num_elements(), None);
        assert_eq!(hyperslab.num_elements_usize(), None);
        assert_eq!(
            hyperslab.validate(&extents, Access::Write),
            Err(HyperslabError::TooManyElements {
                count: vec![1 << 32, 1 << 32]
            })
        );

        // A zero count wins over an overflowing product
        let empty =
            Hyperslab::new_with_start_count(vec![0, 0, 0], vec![u64::MAX, u64::MAX, 0]).unwrap();
        assert_eq!(empty.num_elements(), Some(0));
        assert!(empty.validate(&[Extent::unlimited(0); 3], Access::Write).is_ok());
    }

    #[test]
    fn hyperslab_display_saturates() {
        let hyperslab =
            Hyperslab::new_with_start_count_stride(vec![1], vec![2], vec![u64::MAX]).unwrap();
        assert_eq!(
            hyperslab.to_string(),
            format!("[1..{};{}]", u64::MAX, u64::MAX)
        );
        let hyperslab = Hyperslab::new_with_start_count(vec![u64::MAX], vec![1]).unwrap();
        assert_eq!(hyperslab.to_string(), format!("[{}..{}]", u64::MAX, u64::MAX));
    }

    #[test]
    fn hyperslab_scalar() {
        let scalar = Hyperslab::new_full(&[]);
        assert_eq!(scalar.num_elements(), Some(1));
        assert!(!scalar.is_empty());
        assert!(scalar.validate(&[], Access::Read).is_ok());
        assert_eq!(scalar.indices().into_iter().count(), 1);
    }
}
