//! Hyperslab iterators.

use std::iter::FusedIterator;

use itertools::izip;

use crate::{ArrayIndicesTinyVec, Hyperslab, ravel_indices, unravel_index};

/// An iterator over the variable indices of the elements addressed by a hyperslab, in C order.
///
/// For a hyperslab with start `[0, 1]`, count `[2, 2]` and stride `[2, 1]` the indices are `[0, 1]`, `[0, 2]`, `[2, 1]`, `[2, 2]`.
#[derive(Clone, Debug)]
pub struct HyperslabIndices {
    hyperslab: Hyperslab,
    /// The position of the next element within the count of the hyperslab, [`None`] once exhausted.
    position: Option<ArrayIndicesTinyVec>,
    remaining: usize,
}

impl HyperslabIndices {
    /// Create an iterator over the indices addressed by `hyperslab`.
    ///
    /// The reported length saturates at [`usize::MAX`] for a hyperslab that fails [`Hyperslab::validate`].
    #[must_use]
    pub fn new(hyperslab: Hyperslab) -> Self {
        let remaining = hyperslab.num_elements_usize().unwrap_or(usize::MAX);
        let position = (remaining > 0)
            .then(|| std::iter::repeat_n(0, hyperslab.dimensionality()).collect());
        Self {
            hyperslab,
            position,
            remaining,
        }
    }
}

impl Iterator for HyperslabIndices {
    type Item = ArrayIndicesTinyVec;

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.position.as_mut()?;
        let indices = izip!(
            position.iter(),
            self.hyperslab.start(),
            self.hyperslab.stride()
        )
        .map(|(offset, start, stride)| start + offset * stride)
        .collect();

        // Advance the last dimension fastest, carrying into earlier dimensions
        let mut exhausted = true;
        for (offset, &count) in position.iter_mut().zip(self.hyperslab.count()).rev() {
            *offset += 1;
            if *offset < count {
                exhausted = false;
                break;
            }
            *offset = 0;
        }
        if exhausted {
            self.position = None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        Some(indices)
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        if n >= self.remaining {
            self.position = None;
            self.remaining = 0;
            return None;
        }
        if n > 0 {
            let position = self.position.as_ref()?;
            let count = self.hyperslab.count();
            let index = ravel_indices(position, count)? + u64::try_from(n).ok()?;
            self.position = unravel_index(index, count);
            self.remaining -= n;
        }
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for HyperslabIndices {}

impl FusedIterator for HyperslabIndices {}
