//! Dimension collapsing for strided (General) dispatches

use crate::array::{Shape, Strides};
use tracing::trace;

/// Largest merged extent the General kernels can index with their `int`
/// shape entries.
pub const COLLAPSE_SIZE_CAP: usize = i32::MAX as usize;

/// Collapse adjacent axes that form one contiguous run in every operand.
///
/// Size-1 axes are dropped first (they never move an address). Axes are
/// then merged left to right: axis `i` joins the run ending at the previous
/// kept axis `p` when, for every stride vector, `stride[i] * shape[i] ==
/// stride[p]`, and the merged extent stays within `size_cap`. A merged axis
/// keeps the stride of its innermost member.
///
/// Iterating the collapsed shape in row-major order visits exactly the same
/// per-operand offsets, in the same order, as iterating the original one.
///
/// A non-empty shape made only of size-1 axes collapses to `[1]` with zero
/// strides; a rank-0 shape stays rank 0.
///
/// # Example
/// ```
/// use binop_dispatch::binary::collapse_contiguous_dims;
/// // [2, 3, 4] row-major, a broadcast row, and a row-major output
/// let dense: &[isize] = &[12, 4, 1];
/// let row: &[isize] = &[0, 0, 1];
/// let (shape, [a, b, out]) = collapse_contiguous_dims(&[2, 3, 4], [dense, row, dense], usize::MAX);
/// assert_eq!(shape.as_slice(), &[6, 4]);
/// assert_eq!(a.as_slice(), &[4, 1]);
/// assert_eq!(b.as_slice(), &[0, 1]);
/// assert_eq!(out.as_slice(), &[4, 1]);
/// ```
pub fn collapse_contiguous_dims<const N: usize>(
    shape: &[usize],
    strides: [&[isize]; N],
    size_cap: usize,
) -> (Shape, [Strides; N]) {
    debug_assert!(strides.iter().all(|s| s.len() == shape.len()));

    let mut out_shape: Vec<usize> = Vec::with_capacity(shape.len());
    let mut out_strides: [Vec<isize>; N] = std::array::from_fn(|_| Vec::with_capacity(shape.len()));
    let mut prev: Option<usize> = None;

    for (axis, &dim) in shape.iter().enumerate() {
        if dim == 1 {
            continue;
        }

        let merge = match (prev, out_shape.last()) {
            (Some(p), Some(&run)) => {
                run.checked_mul(dim).is_some_and(|merged| merged <= size_cap)
                    && strides.iter().all(|st| st[axis] * dim as isize == st[p])
            }
            _ => false,
        };

        if merge {
            if let Some(run) = out_shape.last_mut() {
                *run *= dim;
            }
            for (collapsed, st) in out_strides.iter_mut().zip(strides.iter()) {
                if let Some(last) = collapsed.last_mut() {
                    *last = st[axis];
                }
            }
        } else {
            out_shape.push(dim);
            for (collapsed, st) in out_strides.iter_mut().zip(strides.iter()) {
                collapsed.push(st[axis]);
            }
        }
        prev = Some(axis);
    }

    if !shape.is_empty() && out_shape.is_empty() {
        out_shape.push(1);
        for collapsed in out_strides.iter_mut() {
            collapsed.push(0);
        }
    }

    trace!(from = ?shape, to = ?out_shape, "collapsed contiguous dims");

    (
        Shape::from(out_shape),
        out_strides.map(Strides::from),
    )
}

/// Collapsed dispatch shape plus the stride vectors of `a`, `b` and the
/// output, aligned axis by axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollapsedDims {
    /// Dispatch shape
    pub shape: Shape,
    /// Strides of operand `a`
    pub strides_a: Strides,
    /// Strides of operand `b`
    pub strides_b: Strides,
    /// Strides of the output
    pub strides_out: Strides,
}

impl CollapsedDims {
    /// Collapse the broadcast layouts of a binary operation
    pub fn new(shape: &[usize], a: &[isize], b: &[isize], out: &[isize]) -> Self {
        let (shape, [strides_a, strides_b, strides_out]) =
            collapse_contiguous_dims(shape, [a, b, out], COLLAPSE_SIZE_CAP);
        Self {
            shape,
            strides_a,
            strides_b,
            strides_out,
        }
    }

    /// Dispatch rank
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(shape: &[usize], strides: &[isize]) -> Vec<isize> {
        let total: usize = shape.iter().product();
        (0..total)
            .map(|mut linear| {
                let mut offset = 0isize;
                for (&dim, &stride) in shape.iter().zip(strides).rev() {
                    offset += (linear % dim) as isize * stride;
                    linear /= dim;
                }
                offset
            })
            .collect()
    }

    #[test]
    fn test_row_broadcast_stays_two_dimensional() {
        // a [3, 4], b [1, 4] broadcast along axis 0
        let dims = CollapsedDims::new(&[3, 4], &[4, 1], &[0, 1], &[4, 1]);
        assert_eq!(dims.shape.as_slice(), &[3, 4]);
        assert_eq!(dims.strides_b.as_slice(), &[0, 1]);
        assert_eq!(dims.ndim(), 2);
    }

    #[test]
    fn test_full_merge() {
        let dims = CollapsedDims::new(&[2, 3, 4], &[12, 4, 1], &[12, 4, 1], &[12, 4, 1]);
        assert_eq!(dims.shape.as_slice(), &[24]);
        assert_eq!(dims.strides_a.as_slice(), &[1]);
    }

    #[test]
    fn test_unit_axes_dropped() {
        let dims = CollapsedDims::new(&[1, 5, 1], &[5, 1, 1], &[0, 0, 0], &[5, 1, 1]);
        assert_eq!(dims.shape.as_slice(), &[5]);
        assert_eq!(dims.strides_b.as_slice(), &[0]);
    }

    #[test]
    fn test_all_unit_axes() {
        let dims = CollapsedDims::new(&[1, 1], &[1, 1], &[1, 1], &[1, 1]);
        assert_eq!(dims.shape.as_slice(), &[1]);
        assert_eq!(dims.strides_out.as_slice(), &[0]);
    }

    #[test]
    fn test_rank_zero() {
        let dims = CollapsedDims::new(&[], &[], &[], &[]);
        assert_eq!(dims.ndim(), 0);
    }

    #[test]
    fn test_transposed_operand_blocks_merge() {
        // b is a transposed [4, 3] viewed as [3, 4]
        let dims = CollapsedDims::new(&[2, 3, 4], &[12, 4, 1], &[12, 1, 3], &[12, 4, 1]);
        assert_eq!(dims.shape.as_slice(), &[2, 3, 4]);
    }

    #[test]
    fn test_size_cap_respected() {
        let (shape, _) = collapse_contiguous_dims(&[4, 4], [&[4isize, 1][..]], 8);
        assert_eq!(shape.as_slice(), &[4, 4]);
        let (shape, _) = collapse_contiguous_dims(&[4, 4], [&[4isize, 1][..]], 16);
        assert_eq!(shape.as_slice(), &[16]);
    }

    #[test]
    fn test_offsets_preserved() {
        let shape = [2, 1, 3, 4, 5];
        let a: [isize; 5] = [60, 60, 20, 5, 1];
        let b: [isize; 5] = [0, 0, 1, 0, 3];
        let out: [isize; 5] = [60, 60, 20, 5, 1];
        let (collapsed, [ca, cb, cout]) = collapse_contiguous_dims(&shape, [&a[..], &b[..], &out[..]], usize::MAX);
        assert!(collapsed.ndim() < shape.len());
        assert_eq!(offsets(&shape, &a), offsets(&collapsed, &ca));
        assert_eq!(offsets(&shape, &b), offsets(&collapsed, &cb));
        assert_eq!(offsets(&shape, &out), offsets(&collapsed, &cout));
    }
}
