//! Strides type: per-axis element offsets

use super::shape::STACK_DIMS;
use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Deref;

/// Element offsets between consecutive elements along each dimension
///
/// Strides are in ELEMENTS, not bytes. A zero stride marks a broadcast axis.
/// Signed, so views such as flips can be described; the linear (non-General)
/// kernels only accept layouts whose strides are non-negative.
#[derive(Clone, PartialEq, Eq, Default, Hash)]
pub struct Strides(SmallVec<[isize; STACK_DIMS]>);

impl Strides {
    /// Create empty strides.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Create empty strides with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(SmallVec::with_capacity(capacity))
    }

    /// Push a stride value.
    pub fn push(&mut self, stride: isize) {
        self.0.push(stride);
    }

    /// Reverse stride order.
    pub fn reverse(&mut self) {
        self.0.reverse();
    }

    /// View strides as a slice.
    pub fn as_slice(&self) -> &[isize] {
        self.0.as_slice()
    }

    /// Strides as the `int64` vector the kernel library expects.
    pub fn to_kernel_vec(&self) -> Vec<i64> {
        self.0.iter().map(|&s| s as i64).collect()
    }
}

impl Deref for Strides {
    type Target = [isize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl fmt::Debug for Strides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<[isize]> for Strides {
    fn as_ref(&self) -> &[isize] {
        self.0.as_slice()
    }
}

impl From<Vec<isize>> for Strides {
    fn from(value: Vec<isize>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl From<&[isize]> for Strides {
    fn from(value: &[isize]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[isize; N]> for Strides {
    fn from(value: [isize; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<isize> for Strides {
    fn from_iter<T: IntoIterator<Item = isize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
