//! Operation families and their dispatch entry points
//!
//! Three entry points feed the one pipeline in [`crate::binary`]:
//!
//! ```text
//! binary_op_gpu        any single-output op, by symbolic code
//! binary_op_gpu_multi  dual-output ops (divmod), by symbolic code
//! bitwise_binary_gpu   BitwiseOp, mapped onto binary_op_gpu by code
//! ```
//!
//! [`BinaryKernels`] binds a device and a stream and exposes one method per
//! table entry (`add`, `divmod`, `bitwise_xor`, ...).

mod table;

pub use crate::binary::OpSpec;
pub use table::{BinaryOp, BitwiseOp, DualBinaryOp};

use crate::array::ArrayDesc;
use crate::binary::binary_op_gpu_inplace;
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::runtime::{Device, Stream};

// ============================================================================
// Entry points
// ============================================================================

/// Dispatch the single-output operation `code` over `a` and `b` into `out`.
///
/// # Example
/// ```ignore
/// binary_op_gpu(&device, &stream, BinaryOp::Add.code(), &a, &b, &out)?;
/// ```
pub fn binary_op_gpu<D: Device>(
    device: &D,
    stream: &Stream,
    code: &'static str,
    a: &ArrayDesc,
    b: &ArrayDesc,
    out: &ArrayDesc,
) -> Result<()> {
    binary_op_gpu_inplace(device, stream, OpSpec::single_output(code), a, b, &[out])
}

/// Dispatch the dual-output operation `code` over `a` and `b`.
///
/// Both outputs must share one shape and layout.
pub fn binary_op_gpu_multi<D: Device>(
    device: &D,
    stream: &Stream,
    code: &'static str,
    a: &ArrayDesc,
    b: &ArrayDesc,
    outputs: [&ArrayDesc; 2],
) -> Result<()> {
    binary_op_gpu_inplace(device, stream, OpSpec::dual_output(code), a, b, &outputs)
}

/// Dispatch a bitwise operation through the single-output path
///
/// # Errors
///
/// Returns `InvalidArgument` for floating-point or complex operands, in
/// addition to everything [`binary_op_gpu`] can return.
pub fn bitwise_binary_gpu<D: Device>(
    device: &D,
    stream: &Stream,
    op: BitwiseOp,
    a: &ArrayDesc,
    b: &ArrayDesc,
    out: &ArrayDesc,
) -> Result<()> {
    let dtype = a.dtype();
    if !(dtype.is_int() || dtype == DType::Bool) {
        return Err(Error::InvalidArgument {
            arg: "a",
            reason: format!("bitwise '{op}' needs integer or bool operands, got {dtype}"),
        });
    }
    binary_op_gpu(device, stream, op.code(), a, b, out)
}

// ============================================================================
// BinaryKernels
// ============================================================================

/// A device and stream bound together for issuing binary operations
///
/// # Example
/// ```ignore
/// let kernels = BinaryKernels::new(&device, Stream::new(0, 0));
/// kernels.add(&a, &b, &out)?;
/// kernels.divmod(&a, &b, &quotient, &remainder)?;
/// ```
pub struct BinaryKernels<'d, D: Device> {
    device: &'d D,
    stream: Stream,
}

impl<'d, D: Device> BinaryKernels<'d, D> {
    /// Issue operations on `stream` of `device`
    pub fn new(device: &'d D, stream: Stream) -> Self {
        Self { device, stream }
    }

    /// The bound device
    pub fn device(&self) -> &'d D {
        self.device
    }

    /// The bound stream
    pub fn stream(&self) -> Stream {
        self.stream
    }

    /// Dispatch any single-output operation
    pub fn binary(&self, op: BinaryOp, a: &ArrayDesc, b: &ArrayDesc, out: &ArrayDesc) -> Result<()> {
        binary_op_gpu(self.device, &self.stream, op.code(), a, b, out)
    }

    /// Dispatch any dual-output operation
    pub fn binary_multi(
        &self,
        op: DualBinaryOp,
        a: &ArrayDesc,
        b: &ArrayDesc,
        outputs: [&ArrayDesc; 2],
    ) -> Result<()> {
        binary_op_gpu_multi(self.device, &self.stream, op.code(), a, b, outputs)
    }

    /// Dispatch any bitwise operation
    pub fn bitwise(&self, op: BitwiseOp, a: &ArrayDesc, b: &ArrayDesc, out: &ArrayDesc) -> Result<()> {
        bitwise_binary_gpu(self.device, &self.stream, op, a, b, out)
    }
}

impl<D: Device> Clone for BinaryKernels<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Device> Copy for BinaryKernels<'_, D> {}
