//! Values crossing the command-encoder boundary

use bytemuck::{bytes_of, cast_slice};
use std::fmt;

/// Three-axis extent used for both dispatch grids and thread groups
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct GridSize {
    /// Innermost axis
    pub width: u64,
    /// Middle axis
    pub height: u64,
    /// Outermost axis
    pub depth: u64,
}

impl GridSize {
    /// Create a grid size
    #[inline]
    pub const fn new(width: u64, height: u64, depth: u64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// One-dimensional extent
    #[inline]
    pub const fn linear(width: u64) -> Self {
        Self::new(width, 1, 1)
    }

    /// Total number of points covered
    #[inline]
    pub const fn volume(&self) -> u128 {
        self.width as u128 * self.height as u128 * self.depth as u128
    }
}

impl fmt::Debug for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.width, self.height, self.depth)
    }
}

impl From<(u64, u64, u64)> for GridSize {
    fn from((width, height, depth): (u64, u64, u64)) -> Self {
        Self::new(width, height, depth)
    }
}

/// Scalar constant bound with `set_bytes`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScalarArg {
    /// Signed 32-bit value (e.g. the dispatch rank)
    I32(i32),
    /// Unsigned 32-bit element count for narrow-index kernels
    U32(u32),
    /// 64-bit element count for wide-index kernels
    I64(i64),
}

impl ScalarArg {
    /// Raw little-endian bytes as the kernel reads them
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::I32(v) => bytes_of(v),
            Self::U32(v) => bytes_of(v),
            Self::I64(v) => bytes_of(v),
        }
    }
}

/// Constant vector bound with `set_vector_bytes`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VectorArg {
    /// `int32` vector, used for dispatch shapes
    I32(Vec<i32>),
    /// `int64` vector, used for element strides
    I64(Vec<i64>),
}

impl VectorArg {
    /// Raw bytes of the vector contents
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::I32(v) => cast_slice(v),
            Self::I64(v) => cast_slice(v),
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        match self {
            Self::I32(v) => v.len(),
            Self::I64(v) => v.len(),
        }
    }

    /// Whether the vector has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_bytes() {
        assert_eq!(ScalarArg::U32(4).as_bytes(), &4u32.to_ne_bytes());
        assert_eq!(ScalarArg::I64(-1).as_bytes().len(), 8);
    }

    #[test]
    fn test_vector_bytes() {
        let v = VectorArg::I64(vec![4, 0, 1]);
        assert_eq!(v.as_bytes().len(), 24);
        assert_eq!(v.len(), 3);
        assert_eq!(VectorArg::I32(vec![1, 2]).as_bytes().len(), 8);
    }

    #[test]
    fn test_grid_volume() {
        let g = GridSize::new(u32::MAX as u64, u32::MAX as u64, 4);
        assert_eq!(g.volume(), (u32::MAX as u128) * (u32::MAX as u128) * 4);
    }
}
