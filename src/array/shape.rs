//! Shape type: dimension sizes of an operand or dispatch grid

use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Deref;

/// Stack allocation threshold for dimensions
/// Elementwise operands rarely exceed 4 dimensions, and collapsed
/// dispatch shapes even less often, so we stack-allocate up to 4
pub(crate) const STACK_DIMS: usize = 4;

/// Ordered dimension sizes, outermost first
#[derive(Clone, PartialEq, Eq, Default, Hash)]
pub struct Shape(SmallVec<[usize; STACK_DIMS]>);

impl Shape {
    /// Create an empty (rank 0) shape.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Create an empty shape with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(SmallVec::with_capacity(capacity))
    }

    /// Push a dimension.
    pub fn push(&mut self, dim: usize) {
        self.0.push(dim);
    }

    /// Reverse dimension order.
    pub fn reverse(&mut self) {
        self.0.reverse();
    }

    /// View shape as a slice.
    pub fn as_slice(&self) -> &[usize] {
        self.0.as_slice()
    }

    /// Number of dimensions in this shape.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Product of all dimensions (1 for rank 0).
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.0.iter().product()
    }

    /// Shape as the `int32` vector the kernel library expects.
    ///
    /// Collapsing caps merged extents only; an axis that is already wider
    /// than `i32::MAX` survives it, so this returns `BackendLimitation`
    /// instead of narrowing.
    pub fn to_kernel_vec(&self) -> Result<Vec<i32>> {
        self.0
            .iter()
            .map(|&d| {
                i32::try_from(d).map_err(|_| {
                    Error::backend_limitation(
                        "gpu",
                        "binary dispatch",
                        format!("axis of {d} elements in shape {self:?} exceeds the int32 kernel shape"),
                    )
                })
            })
            .collect()
    }
}

impl Deref for Shape {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        self.0.as_slice()
    }
}

impl From<Vec<usize>> for Shape {
    fn from(value: Vec<usize>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl From<&[usize]> for Shape {
    fn from(value: &[usize]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(value: [usize; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elem_count() {
        assert_eq!(Shape::from([2, 3, 4]).elem_count(), 24);
        assert_eq!(Shape::new().elem_count(), 1);
        assert_eq!(Shape::from([4, 0]).elem_count(), 0);
    }

    #[test]
    fn test_kernel_vec() {
        assert_eq!(Shape::from([7, 1, 3]).to_kernel_vec().unwrap(), vec![7i32, 1, 3]);
    }

    #[test]
    fn test_kernel_vec_rejects_wide_axis() {
        let wide = (1usize << 31) + 5;
        let err = Shape::from([2, wide]).to_kernel_vec().unwrap_err();
        assert!(matches!(err, Error::BackendLimitation { .. }));
        assert_eq!(Shape::from([i32::MAX as usize]).to_kernel_vec().unwrap(), vec![i32::MAX]);
    }
}
