//! Layout: shape, strides, and offset of an operand in its buffer

use super::{Shape, Strides};
use std::fmt;

/// Layout describes how an operand's logical elements map onto its buffer
///
/// Address of element at indices [i0, i1, ..., in]:
///   offset + i0 * strides[0] + i1 * strides[1] + ... + in * strides[n]
///
/// The dispatch core never reads the buffer itself; it only inspects the
/// layout to decide which kernel family can address the elements.
#[derive(Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
    strides: Strides,
    /// Starting element index in the underlying storage
    offset: usize,
}

impl Layout {
    /// Create a new contiguous (row-major/C-order) layout from a shape
    ///
    /// # Example
    /// ```
    /// use binop_dispatch::array::Layout;
    /// let layout = Layout::contiguous(&[2, 3, 4]);
    /// assert_eq!(layout.shape(), &[2, 3, 4]);
    /// assert_eq!(layout.strides(), &[12, 4, 1]);
    /// ```
    pub fn contiguous(shape: &[usize]) -> Self {
        let shape: Shape = shape.into();
        let strides = Self::compute_contiguous_strides(&shape);
        Self {
            shape,
            strides,
            offset: 0,
        }
    }

    /// Create a layout with explicit shape, strides, and offset
    ///
    /// Returns None if shape and strides disagree on rank.
    pub fn new(shape: Shape, strides: Strides, offset: usize) -> Option<Self> {
        if shape.ndim() != strides.len() {
            return None;
        }
        Some(Self {
            shape,
            strides,
            offset,
        })
    }

    /// Create a scalar (0-dimensional) layout
    pub fn scalar() -> Self {
        Self {
            shape: Shape::new(),
            strides: Strides::new(),
            offset: 0,
        }
    }

    /// Compute contiguous strides for a given shape (row-major order)
    fn compute_contiguous_strides(shape: &[usize]) -> Strides {
        let mut strides = Strides::with_capacity(shape.len());
        let mut stride = 1isize;

        for &dim in shape.iter().rev() {
            strides.push(stride);
            stride *= dim as isize;
        }

        strides.reverse();
        strides
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Get the offset
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of logical elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.elem_count()
    }

    /// Number of buffer elements spanned by this layout.
    ///
    /// `1 + Σ (dim - 1) * |stride|`, or 0 for an empty layout. A value
    /// broadcast from a single element spans exactly one element no matter
    /// how large its logical shape is; a dense layout spans `elem_count()`.
    pub fn data_size(&self) -> usize {
        if self.shape.contains(&0) {
            return 0;
        }
        1 + self
            .shape
            .iter()
            .zip(self.strides.iter())
            .map(|(&d, &s)| (d - 1) * s.unsigned_abs())
            .sum::<usize>()
    }

    /// Every element of the spanned region is addressed exactly once, in
    /// some axis order, with non-negative strides.
    ///
    /// Dense layouts can be walked with a single linear index over
    /// `data_size()` elements even when their axes are permuted.
    pub fn is_dense(&self) -> bool {
        let mut axes: Vec<(usize, isize)> = self
            .shape
            .iter()
            .zip(self.strides.iter())
            .filter(|&(&d, _)| d != 1)
            .map(|(&d, &s)| (d, s))
            .collect();
        if axes.iter().any(|&(d, _)| d == 0) {
            return true;
        }
        axes.sort_by_key(|&(_, s)| s);

        let mut expected = 1isize;
        for (dim, stride) in axes {
            if stride != expected {
                return false;
            }
            expected *= dim as isize;
        }
        true
    }

    /// Strides are row-major for every axis of size > 1
    pub fn is_row_contiguous(&self) -> bool {
        let mut expected = 1isize;
        for (&dim, &stride) in self.shape.iter().zip(self.strides.iter()).rev() {
            if dim == 1 {
                continue;
            }
            if stride != expected {
                return false;
            }
            expected *= dim as isize;
        }
        true
    }

    /// Strides are column-major for every axis of size > 1
    pub fn is_col_contiguous(&self) -> bool {
        let mut expected = 1isize;
        for (&dim, &stride) in self.shape.iter().zip(self.strides.iter()) {
            if dim == 1 {
                continue;
            }
            if stride != expected {
                return false;
            }
            expected *= dim as isize;
        }
        true
    }

    /// Same strides and offset, different shape. Used to give an output the
    /// layout of the operand it mirrors.
    pub(crate) fn with_shape_of(&self, shape: &[usize]) -> Self {
        Self {
            shape: shape.into(),
            strides: self.strides.clone(),
            offset: 0,
        }
    }

    /// Create a broadcast layout to a target shape
    ///
    /// Returns None if shapes are not broadcastable
    pub fn broadcast_to(&self, target: &[usize]) -> Option<Self> {
        if target.len() < self.ndim() {
            return None;
        }

        let mut new_shape = Shape::with_capacity(target.len());
        let mut new_strides = Strides::with_capacity(target.len());

        // Pad with leading broadcast axes
        let pad = target.len() - self.ndim();
        for &t in &target[..pad] {
            new_shape.push(t);
            new_strides.push(0);
        }

        for ((&s, &st), &t) in self
            .shape
            .iter()
            .zip(self.strides.iter())
            .zip(&target[pad..])
        {
            if s == t {
                new_shape.push(t);
                new_strides.push(st);
            } else if s == 1 {
                new_shape.push(t);
                new_strides.push(0);
            } else {
                return None;
            }
        }

        Some(Self {
            shape: new_shape,
            strides: new_strides,
            offset: self.offset,
        })
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Layout {{ shape: {:?}, strides: {:?}, offset: {} }}",
            self.shape.as_slice(),
            self.strides.as_slice(),
            self.offset
        )
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.shape.as_slice())
    }
}

/// Compute the broadcast shape of two shapes
///
/// Dimensions are aligned from the right; a size-1 dimension stretches to
/// match the other side. Returns None if the shapes are incompatible.
pub fn broadcast_shapes(a: &[usize], b: &[usize]) -> Option<Shape> {
    let max_ndim = a.len().max(b.len());
    let mut result = Shape::with_capacity(max_ndim);

    for i in 0..max_ndim {
        let a_dim = if i < a.len() { a[a.len() - 1 - i] } else { 1 };
        let b_dim = if i < b.len() { b[b.len() - 1 - i] } else { 1 };

        if a_dim == b_dim {
            result.push(a_dim);
        } else if a_dim == 1 {
            result.push(b_dim);
        } else if b_dim == 1 {
            result.push(a_dim);
        } else {
            return None;
        }
    }

    result.reverse();
    Some(result)
}
