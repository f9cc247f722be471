//! Structured kernel-variant keys and their canonical names
//!
//! Inside the crate a variant is identified by [`KernelKey`], a plain value
//! that is matched exhaustively. It is rendered to the registry's string
//! form (`<tag>_<op><type>`) only when it crosses into
//! [`Device::binary_kernel`](crate::runtime::Device::binary_kernel).
//!
//! ```text
//! vv_addfloat32        vector-vector, one element per thread
//! svn_mulfloat16       scalar-vector, several elements per thread
//! vs2_divint64         vector-scalar, 64-bit element count
//! g2_subfloat32        strided, rank 2
//! gn4large_addint32    strided, rank > 3, 4 elements per thread, wide offsets
//! ```

use super::BinaryOpType;
use crate::dtype::DType;
use std::fmt;

// ============================================================================
// Variant
// ============================================================================

/// Size regime of a linear (`sv`, `vs`, `vv`) kernel
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VectorVariant {
    /// One element per thread, 32-bit element count
    Single,
    /// Several elements per thread, 32-bit element count
    Multi,
    /// 64-bit element count on a 2D grid
    Large,
}

impl VectorVariant {
    fn marker(self) -> &'static str {
        match self {
            Self::Single => "",
            Self::Multi => "n",
            Self::Large => "2",
        }
    }
}

/// Rank regime of a strided (`g`) kernel
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeneralRank {
    /// Rank 1 to 3; the shape is implicit in the launch grid
    Fixed(usize),
    /// Rank above 3; shape and rank are passed as arguments
    Dynamic {
        /// Elements each thread walks along the innermost axis
        work_per_thread: usize,
    },
}

/// Which compiled specialization of a binary op is needed
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KernelVariant {
    /// `ss`
    ScalarScalar,
    /// `sv`
    ScalarVector(VectorVariant),
    /// `vs`
    VectorScalar(VectorVariant),
    /// `vv`
    VectorVector(VectorVariant),
    /// `g`
    General {
        /// Rank regime
        rank: GeneralRank,
        /// 64-bit offsets
        large: bool,
    },
}

impl KernelVariant {
    /// Select the variant for one dispatch.
    ///
    /// `ndim` is the collapsed dispatch rank and only matters for
    /// [`BinaryOpType::General`]. A single-element (`ss`) dispatch has one
    /// variant regardless of `large` and `work_per_thread`.
    pub fn select(op_type: BinaryOpType, large: bool, ndim: usize, work_per_thread: usize) -> Self {
        let vector = if large {
            VectorVariant::Large
        } else if work_per_thread > 1 {
            VectorVariant::Multi
        } else {
            VectorVariant::Single
        };

        match op_type {
            BinaryOpType::ScalarScalar => Self::ScalarScalar,
            BinaryOpType::ScalarVector => Self::ScalarVector(vector),
            BinaryOpType::VectorScalar => Self::VectorScalar(vector),
            BinaryOpType::VectorVector => Self::VectorVector(vector),
            BinaryOpType::General => Self::General {
                rank: if ndim <= 3 {
                    GeneralRank::Fixed(ndim)
                } else {
                    GeneralRank::Dynamic { work_per_thread }
                },
                large,
            },
        }
    }

    /// Broadcast category this variant belongs to
    pub const fn op_type(self) -> BinaryOpType {
        match self {
            Self::ScalarScalar => BinaryOpType::ScalarScalar,
            Self::ScalarVector(_) => BinaryOpType::ScalarVector,
            Self::VectorScalar(_) => BinaryOpType::VectorScalar,
            Self::VectorVector(_) => BinaryOpType::VectorVector,
            Self::General { .. } => BinaryOpType::General,
        }
    }
}

impl fmt::Display for KernelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.op_type().tag())?;
        match *self {
            Self::ScalarScalar => Ok(()),
            Self::ScalarVector(v) | Self::VectorScalar(v) | Self::VectorVector(v) => {
                f.write_str(v.marker())
            }
            Self::General { rank, large } => {
                match rank {
                    GeneralRank::Fixed(ndim) => write!(f, "{ndim}")?,
                    GeneralRank::Dynamic { work_per_thread } => write!(f, "n{work_per_thread}")?,
                }
                if large {
                    f.write_str("large")?;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// Key
// ============================================================================

/// Full identity of a binary kernel variant
///
/// # Example
/// ```
/// use binop_dispatch::binary::{BinaryOpType, KernelKey};
/// use binop_dispatch::dtype::DType;
/// let key = KernelKey::new(BinaryOpType::General, "sub", DType::F32, false, 2, 2);
/// assert_eq!(key.to_string(), "g2_subfloat32");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KernelKey {
    /// Category and size regime
    pub variant: KernelVariant,
    /// Symbolic operation code (`add`, `divmod`, ...)
    pub op: &'static str,
    /// Operand element type
    pub dtype: DType,
}

impl KernelKey {
    /// Build the key for one dispatch
    pub fn new(
        op_type: BinaryOpType,
        op: &'static str,
        dtype: DType,
        large: bool,
        ndim: usize,
        work_per_thread: usize,
    ) -> Self {
        Self {
            variant: KernelVariant::select(op_type, large, ndim, work_per_thread),
            op,
            dtype,
        }
    }

    /// Broadcast category of the variant
    #[inline]
    pub const fn op_type(&self) -> BinaryOpType {
        self.variant.op_type()
    }

    /// Canonical registry name
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for KernelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}{}", self.variant, self.op, self.dtype.kernel_type_name())
    }
}

// ============================================================================
// Registry request
// ============================================================================

/// Number of outputs a kernel writes
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OutputArity {
    /// Single-output family (`add`, `eq`, `and`, ...)
    One,
    /// Dual-output family (`divmod`)
    Two,
}

impl OutputArity {
    /// Number of output buffers
    #[inline]
    pub const fn count(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// What the dispatch core asks the kernel-variant registry for
#[derive(Copy, Clone, Debug)]
pub struct KernelRequest<'a> {
    /// Canonical name, the registry's lookup key
    pub name: &'a str,
    /// Structured form of `name`
    pub key: &'a KernelKey,
    /// Operand element type
    pub in_dtype: DType,
    /// Output element type
    pub out_dtype: DType,
    /// Whether a one- or two-output kernel is needed
    pub arity: OutputArity,
}
