//! Operation tables
//!
//! Each family is one `binary_ops!` table mapping an operation to its
//! symbolic code and a [`BinaryKernels`] method. The table generates the
//! enum, its `code`/`arity`/`spec` accessors and the per-op methods.

use super::BinaryKernels;
use crate::array::ArrayDesc;
use crate::binary::{OpSpec, OutputArity};
use crate::error::Result;
use crate::runtime::Device;
use std::fmt;

macro_rules! binary_ops {
    (@method One $entry:ident $name:ident $variant:ident $method:ident $code:literal) => {
        #[doc = concat!("Dispatch `", $code, "` over `a` and `b` into `out`")]
        pub fn $method(&self, a: &ArrayDesc, b: &ArrayDesc, out: &ArrayDesc) -> Result<()> {
            self.$entry($name::$variant, a, b, out)
        }
    };

    (@method Two $entry:ident $name:ident $variant:ident $method:ident $code:literal) => {
        #[doc = concat!("Dispatch `", $code, "` over `a` and `b` into `out0` and `out1`")]
        pub fn $method(
            &self,
            a: &ArrayDesc,
            b: &ArrayDesc,
            out0: &ArrayDesc,
            out1: &ArrayDesc,
        ) -> Result<()> {
            self.$entry($name::$variant, a, b, [out0, out1])
        }
    };

    (
        $(#[$meta:meta])*
        enum $name:ident ($arity:ident) via $entry:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $code:literal as $method:ident,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every operation of the family, in table order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Symbolic code embedded in kernel names
            pub const fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Number of outputs
            pub const fn arity(self) -> OutputArity {
                OutputArity::$arity
            }

            /// Code and arity as handed to the dispatch pipeline
            pub const fn spec(self) -> OpSpec {
                OpSpec {
                    code: self.code(),
                    arity: OutputArity::$arity,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl<D: Device> BinaryKernels<'_, D> {
            $(
                binary_ops!(@method $arity $entry $name $variant $method $code);
            )+
        }
    };
}

binary_ops! {
    /// Single-output elementwise binary operations
    enum BinaryOp (One) via binary {
        /// a + b
        Add => "add" as add,
        /// a - b
        Sub => "sub" as sub,
        /// a * b
        Mul => "mul" as mul,
        /// a / b
        Div => "div" as div,
        /// Remainder with the sign of b
        Remainder => "rem" as remainder,
        /// a ^ b
        Pow => "pow" as pow,
        /// max(a, b)
        Maximum => "max" as maximum,
        /// min(a, b)
        Minimum => "min" as minimum,
        /// atan2(a, b)
        ArcTan2 => "atan2" as arctan2,
        /// log(exp(a) + exp(b))
        LogAddExp => "logaddexp" as logaddexp,
        /// a == b
        Equal => "eq" as equal,
        /// a == b, with NaN equal to NaN
        EqualNan => "naneq" as equal_nan,
        /// a != b
        NotEqual => "ne" as not_equal,
        /// a > b
        Greater => "gt" as greater,
        /// a >= b
        GreaterEqual => "ge" as greater_equal,
        /// a < b
        Less => "lt" as less,
        /// a <= b
        LessEqual => "le" as less_equal,
        /// a && b
        LogicalAnd => "land" as logical_and,
        /// a || b
        LogicalOr => "lor" as logical_or,
    }
}

binary_ops! {
    /// Elementwise binary operations writing two outputs
    enum DualBinaryOp (Two) via binary_multi {
        /// Quotient and remainder in one pass
        DivMod => "divmod" as divmod,
    }
}

binary_ops! {
    /// Bitwise operations on integer and boolean operands
    enum BitwiseOp (One) via bitwise {
        /// a & b
        And => "and" as bitwise_and,
        /// a | b
        Or => "or" as bitwise_or,
        /// a ^ b
        Xor => "xor" as bitwise_xor,
        /// a << b
        LeftShift => "shl" as left_shift,
        /// a >> b
        RightShift => "shr" as right_shift,
    }
}
