//! Broadcast classification of a binary operand pair

use crate::array::Layout;
use std::fmt;

/// How the elements of two (already broadcast) operands line up.
///
/// Each category has its own kernel family. The four linear categories walk
/// the output with a single index; `General` walks an n-dimensional index
/// and reads each operand through its own stride vector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOpType {
    /// Both operands hold a single element
    ScalarScalar,
    /// `a` holds a single element, `b` is linearly addressable
    ScalarVector,
    /// `a` is linearly addressable, `b` holds a single element
    VectorScalar,
    /// Both operands share one linear element order
    VectorVector,
    /// Anything else: per-axis strides, possibly zero
    General,
}

impl BinaryOpType {
    /// Classify two operands that have been broadcast to the output shape.
    ///
    /// Total: every pair maps to exactly one category. Operands with
    /// different logical shapes must be broadcast first (see
    /// [`Layout::broadcast_to`]); otherwise two contiguous operands of
    /// different shapes would be taken for `VectorVector`.
    ///
    /// # Example
    /// ```
    /// use binop_dispatch::array::Layout;
    /// use binop_dispatch::binary::BinaryOpType;
    /// let a = Layout::contiguous(&[3, 4]);
    /// let b = Layout::contiguous(&[1, 4]).broadcast_to(&[3, 4]).unwrap();
    /// assert_eq!(BinaryOpType::classify(&a, &b), BinaryOpType::General);
    /// ```
    pub fn classify(a: &Layout, b: &Layout) -> Self {
        let a_scalar = a.data_size() == 1;
        let b_scalar = b.data_size() == 1;

        if a_scalar && b_scalar {
            Self::ScalarScalar
        } else if a_scalar && b.is_dense() {
            Self::ScalarVector
        } else if b_scalar && a.is_dense() {
            Self::VectorScalar
        } else if (a.is_row_contiguous() && b.is_row_contiguous())
            || (a.is_col_contiguous() && b.is_col_contiguous())
        {
            Self::VectorVector
        } else {
            Self::General
        }
    }

    /// Kernel-name tag of this category
    pub const fn tag(self) -> &'static str {
        match self {
            Self::ScalarScalar => "ss",
            Self::ScalarVector => "sv",
            Self::VectorScalar => "vs",
            Self::VectorVector => "vv",
            Self::General => "g",
        }
    }

    /// Whether this category uses the strided n-dimensional kernel family
    #[inline]
    pub const fn is_general(self) -> bool {
        matches!(self, Self::General)
    }
}

impl fmt::Display for BinaryOpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Layout the output of a binary op should have for `op_type`.
///
/// Linear kernels write the output with the same linear index they read
/// the vector operand with, so the output mirrors that operand's strides
/// (`ScalarVector` mirrors `b`; `VectorScalar` and `VectorVector` mirror `a`).
/// A `ScalarScalar` output is a single element broadcast like `a`, and a
/// `General` output is row-contiguous.
///
/// `a` and `b` must already be broadcast to the output shape. External
/// allocators use this to materialize outputs the way the planner expects.
pub fn binary_output_layout(op_type: BinaryOpType, a: &Layout, b: &Layout) -> Layout {
    match op_type {
        BinaryOpType::General => Layout::contiguous(a.shape()),
        BinaryOpType::ScalarVector => b.with_shape_of(b.shape()),
        BinaryOpType::ScalarScalar | BinaryOpType::VectorScalar | BinaryOpType::VectorVector => {
            a.with_shape_of(a.shape())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Shape;

    fn bcast(shape: &[usize], to: &[usize]) -> Layout {
        Layout::contiguous(shape).broadcast_to(to).unwrap()
    }

    fn strided(shape: &[usize], strides: &[isize]) -> Layout {
        Layout::new(Shape::from(shape), strides.into(), 0).unwrap()
    }

    #[test]
    fn test_scalar_scalar() {
        let a = Layout::scalar();
        let b = Layout::contiguous(&[1, 1]);
        assert_eq!(
            BinaryOpType::classify(&a.broadcast_to(&[1, 1]).unwrap(), &b),
            BinaryOpType::ScalarScalar
        );
    }

    #[test]
    fn test_scalar_vector() {
        let a = bcast(&[1], &[1000, 1000]);
        let b = Layout::contiguous(&[1000, 1000]);
        assert_eq!(BinaryOpType::classify(&a, &b), BinaryOpType::ScalarVector);
        assert_eq!(BinaryOpType::classify(&b, &a), BinaryOpType::VectorScalar);
    }

    #[test]
    fn test_scalar_with_transposed_vector() {
        let a = bcast(&[1, 1], &[4, 3]);
        let b = strided(&[4, 3], &[1, 4]);
        assert_eq!(BinaryOpType::classify(&a, &b), BinaryOpType::ScalarVector);
    }

    #[test]
    fn test_scalar_with_gapped_vector_is_general() {
        let a = bcast(&[1], &[3, 4]);
        let b = strided(&[3, 4], &[8, 2]);
        assert_eq!(BinaryOpType::classify(&a, &b), BinaryOpType::General);
    }

    #[test]
    fn test_vector_vector() {
        let a = Layout::contiguous(&[4]);
        let b = Layout::contiguous(&[4]);
        assert_eq!(BinaryOpType::classify(&a, &b), BinaryOpType::VectorVector);

        let a = strided(&[4, 3], &[1, 4]);
        let b = strided(&[4, 3], &[1, 4]);
        assert_eq!(BinaryOpType::classify(&a, &b), BinaryOpType::VectorVector);
    }

    #[test]
    fn test_mixed_orders_are_general() {
        let a = Layout::contiguous(&[4, 3]);
        let b = strided(&[4, 3], &[1, 4]);
        assert_eq!(BinaryOpType::classify(&a, &b), BinaryOpType::General);
    }

    #[test]
    fn test_row_broadcast_is_general() {
        let a = Layout::contiguous(&[3, 4]);
        let b = bcast(&[1, 4], &[3, 4]);
        assert_eq!(BinaryOpType::classify(&a, &b), BinaryOpType::General);
    }

    #[test]
    fn test_tags() {
        assert_eq!(BinaryOpType::ScalarScalar.tag(), "ss");
        assert_eq!(BinaryOpType::ScalarVector.tag(), "sv");
        assert_eq!(BinaryOpType::VectorScalar.tag(), "vs");
        assert_eq!(BinaryOpType::VectorVector.tag(), "vv");
        assert_eq!(BinaryOpType::General.tag(), "g");
    }

    #[test]
    fn test_output_layout_mirrors_vector_operand() {
        let a = bcast(&[1], &[4, 3]);
        let b = strided(&[4, 3], &[1, 4]);
        let out = binary_output_layout(BinaryOpType::ScalarVector, &a, &b);
        assert_eq!(out.strides(), &[1, 4]);
        assert_eq!(out.data_size(), 12);

        let out = binary_output_layout(BinaryOpType::VectorScalar, &b, &a);
        assert_eq!(out.strides(), &[1, 4]);
    }

    #[test]
    fn test_output_layout_scalar_scalar_is_single_element() {
        let a = bcast(&[1], &[3]);
        let b = bcast(&[1], &[3]);
        let out = binary_output_layout(BinaryOpType::ScalarScalar, &a, &b);
        assert_eq!(out.shape(), &[3]);
        assert_eq!(out.data_size(), 1);
    }

    #[test]
    fn test_output_layout_general_is_row_major() {
        let a = Layout::contiguous(&[3, 4]);
        let b = bcast(&[1, 4], &[3, 4]);
        let out = binary_output_layout(BinaryOpType::General, &a, &b);
        assert_eq!(out.strides(), &[4, 1]);
    }
}
