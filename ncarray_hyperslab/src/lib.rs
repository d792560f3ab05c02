//! Hyperslab addressing for the [`ncarray`](https://docs.rs/ncarray/latest/ncarray/index.html) crate.
//!
//! A [`Hyperslab`] selects a rectangular, optionally strided, region of an N-dimensional variable with per-dimension `start`, `count` and `stride` vectors.
//! It is validated against the current [`Extent`]s of the variable's dimensions with [`Hyperslab::validate`].
//!
//! ## Licence
//! `ncarray_hyperslab` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

mod hyperslab;
pub mod iterators;

pub use hyperslab::{Access, Extent, Hyperslab, HyperslabError};

/// An ND index to an element in a variable or chunk.
pub type ArrayIndices = Vec<u64>;

/// The shape of a variable or chunk.
pub type ArrayShape = Vec<u64>;

/// An ND index to an element in a variable or chunk.
/// Uses [`TinyVec`](tinyvec::TinyVec) for stack allocation up to 4 dimensions.
pub type ArrayIndicesTinyVec = tinyvec::TinyVec<[u64; 4]>;

/// Ravel ND indices to a linearised index in C order.
///
/// Returns [`None`] if any `indices` are out-of-bounds of `shape`.
#[must_use]
pub fn ravel_indices(indices: &[u64], shape: &[u64]) -> Option<u64> {
    if indices.len() != shape.len() {
        return None;
    }
    let mut index: u64 = 0;
    let mut count = 1;
    for (i, s) in std::iter::zip(indices, shape).rev() {
        if i >= s {
            return None;
        }
        index += i * count;
        count *= s;
    }
    Some(index)
}

/// Unravel a linearised index to ND indices in C order.
///
/// Returns [`None`] if `index` is out-of-bounds of `shape`.
#[must_use]
pub fn unravel_index(mut index: u64, shape: &[u64]) -> Option<ArrayIndicesTinyVec> {
    let total_size: u64 = shape
        .iter()
        .try_fold(1u64, |acc, &dim| acc.checked_mul(dim))?;
    if index >= total_size {
        return None;
    }
    let mut indices: ArrayIndicesTinyVec = std::iter::repeat_n(0, shape.len()).collect();
    for (i, &dim) in indices.iter_mut().zip(shape).rev() {
        *i = index % dim;
        index /= dim;
    }
    Some(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ravel_unravel() {
        let shape = [2, 3, 4];
        assert_eq!(ravel_indices(&[0, 0, 0], &shape), Some(0));
        assert_eq!(ravel_indices(&[1, 2, 3], &shape), Some(23));
        assert_eq!(ravel_indices(&[1, 0, 1], &shape), Some(13));
        assert_eq!(ravel_indices(&[2, 0, 0], &shape), None);
        assert_eq!(ravel_indices(&[0, 0], &shape), None);
        assert_eq!(unravel_index(13, &shape).unwrap().as_slice(), &[1, 0, 1]);
        assert_eq!(unravel_index(24, &shape), None);
        assert!(unravel_index(0, &[]).unwrap().is_empty());
        assert_eq!(unravel_index(1, &[]), None);
    }
}
