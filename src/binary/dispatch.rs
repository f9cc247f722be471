//! The binary dispatch pipeline
//!
//! validate → broadcast → classify → (collapse) → plan → name → registry
//! lookup → launch geometry → bind → one `dispatch_threads`.

use super::{
    BinaryOpType, DispatchPlan, KernelRequest, OutputArity, bind_arguments, binary_output_layout,
};
use crate::array::{ArrayDesc, Layout, broadcast_shapes};
use crate::error::{Error, Result};
use crate::runtime::{ComputeKernel, Device, Stream};
use tracing::{debug, trace};

/// Symbolic code and output arity of one binary operation
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OpSpec {
    /// Code embedded in the kernel name (`add`, `divmod`, `shl`, ...)
    pub code: &'static str,
    /// Number of outputs the kernel writes
    pub arity: OutputArity,
}

impl OpSpec {
    /// Single-output operation
    pub const fn single_output(code: &'static str) -> Self {
        Self {
            code,
            arity: OutputArity::One,
        }
    }

    /// Dual-output operation
    pub const fn dual_output(code: &'static str) -> Self {
        Self {
            code,
            arity: OutputArity::Two,
        }
    }
}

/// Dispatch `op` over `a` and `b` into pre-allocated `outputs` on `stream`.
///
/// `outputs` must hold one descriptor per output of `op`, each shaped like
/// the broadcast of `a` and `b` and laid out as
/// [`binary_output_layout`] prescribes. An empty output is a no-op: no
/// kernel is looked up and nothing is dispatched.
///
/// # Errors
///
/// - `DTypeMismatch` if `a` and `b` differ in element type
/// - `BroadcastError` if their shapes are incompatible
/// - `InvalidArgument` for a wrong number of outputs, dual outputs with
///   different layouts, or an output laid out differently from what the
///   selected kernel writes
/// - `ShapeMismatch` if an output is not the broadcast shape
/// - `KernelNotFound` from the device's kernel registry
/// - `BackendLimitation` if a wide linear grid cannot be factored
/// - whatever the command encoder reports
///
/// # Panics
///
/// If a strided kernel reports a thread-group limit other than
/// [`GENERAL_GROUP_SIZE`](super::GENERAL_GROUP_SIZE).
pub fn binary_op_gpu_inplace<D: Device>(
    device: &D,
    stream: &Stream,
    op: OpSpec,
    a: &ArrayDesc,
    b: &ArrayDesc,
    outputs: &[&ArrayDesc],
) -> Result<()> {
    if a.dtype() != b.dtype() {
        return Err(Error::DTypeMismatch {
            lhs: a.dtype(),
            rhs: b.dtype(),
        });
    }
    let out = match outputs {
        [first, rest @ ..] if rest.len() + 1 == op.arity.count() => *first,
        _ => {
            return Err(Error::InvalidArgument {
                arg: "outputs",
                reason: format!(
                    "'{}' writes {} output(s), got {}",
                    op.code,
                    op.arity.count(),
                    outputs.len()
                ),
            });
        }
    };

    let shape = broadcast_shapes(a.shape(), b.shape()).ok_or_else(|| Error::broadcast(a.shape(), b.shape()))?;
    for output in outputs {
        if output.shape() != shape.as_slice() {
            return Err(Error::shape_mismatch(&shape, output.shape()));
        }
        if output.strides() != out.strides() {
            return Err(Error::InvalidArgument {
                arg: "outputs",
                reason: format!(
                    "dual outputs must share one layout, got {} and {}",
                    out.layout(),
                    output.layout()
                ),
            });
        }
    }

    if out.size() == 0 {
        trace!(op = op.code, shape = ?out.shape(), "empty output, nothing to dispatch");
        return Ok(());
    }

    let a = a.broadcast_to(out.shape())?;
    let b = b.broadcast_to(out.shape())?;
    let op_type = BinaryOpType::classify(a.layout(), b.layout());

    let expected = binary_output_layout(op_type, a.layout(), b.layout());
    if !same_addressing(out.layout(), &expected) {
        return Err(Error::InvalidArgument {
            arg: "outputs",
            reason: format!(
                "{op_type} kernels write layout {expected}, output has {}",
                out.layout()
            ),
        });
    }

    let plan = DispatchPlan::new(op_type, &a, &b, out);
    let key = plan.kernel_key(op.code, a.dtype());
    let name = key.name();
    let kernel = device.binary_kernel(&KernelRequest {
        name: &name,
        key: &key,
        in_dtype: a.dtype(),
        out_dtype: out.dtype(),
        arity: op.arity,
    })?;

    let geometry = plan.launch_geometry(out, kernel.max_total_threads_per_threadgroup())?;

    debug!(
        op = op.code,
        category = %op_type,
        kernel = %name,
        grid = ?geometry.grid,
        group = ?geometry.group,
        work_per_thread = plan.work_per_thread(),
        large = plan.large(),
        ?stream,
        "binary dispatch"
    );

    let mut encoder = device.command_encoder(stream)?;
    bind_arguments(&mut encoder, &kernel, &a, &b, outputs, &geometry)
}

/// Whether two layouts of one shape address elements identically
fn same_addressing(x: &Layout, y: &Layout) -> bool {
    x.shape() == y.shape()
        && x
            .shape()
            .iter()
            .zip(x.strides().iter().zip(y.strides()))
            .all(|(&dim, (sx, sy))| dim == 1 || sx == sy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_addressing_ignores_unit_axes() {
        let x = Layout::new([1usize, 4].into(), [7isize, 1].into(), 0).unwrap();
        let y = Layout::contiguous(&[1, 4]);
        assert!(same_addressing(&x, &y));

        let t = Layout::new([2usize, 4].into(), [1isize, 2].into(), 0).unwrap();
        assert!(!same_addressing(&t, &Layout::contiguous(&[2, 4])));
    }

    #[test]
    fn test_op_spec_constructors() {
        assert_eq!(OpSpec::single_output("add").arity, OutputArity::One);
        assert_eq!(OpSpec::dual_output("divmod").arity, OutputArity::Two);
    }
}
