//! Trait for command encoders

use super::ComputeKernel;
use crate::array::ArrayDesc;
use crate::error::Result;
use crate::runtime::{GridSize, ScalarArg, VectorArg};

/// Records one compute dispatch onto a stream
///
/// Argument slots are addressed by index. The dispatch core always fills
/// them in ascending order starting at 0, selects the pipeline first and
/// calls [`dispatch_threads`](Self::dispatch_threads) exactly once per
/// binary operation.
///
/// # Thread Safety
///
/// An encoder is used by one host thread at a time (`&mut self`). Sharing
/// one stream's encoder between threads is the implementor's concern.
pub trait CommandEncoder {
    /// Kernel object type accepted by this encoder
    type Kernel: ComputeKernel;

    /// Select the compute pipeline for the next dispatch
    fn set_compute_pipeline_state(&mut self, kernel: &Self::Kernel);

    /// Bind a read-only operand buffer
    fn set_input_array(&mut self, array: &ArrayDesc, index: usize);

    /// Bind a written output buffer
    fn set_output_array(&mut self, array: &ArrayDesc, index: usize);

    /// Bind a small scalar constant
    fn set_bytes(&mut self, value: ScalarArg, index: usize);

    /// Bind a small constant vector (shape or strides)
    fn set_vector_bytes(&mut self, value: &VectorArg, index: usize);

    /// Enqueue the dispatch.
    ///
    /// `grid` counts threads, not groups; partial groups at the edge of the
    /// grid are expected to be handled by the backend.
    fn dispatch_threads(&mut self, grid: GridSize, group: GridSize) -> Result<()>;
}
