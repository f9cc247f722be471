//! Dispatch core for elementwise binary operations
//!
//! # Pipeline
//!
//! ```text
//! operands + op code
//!   → BinaryOpType::classify      ss | sv | vs | vv | g
//!   → CollapsedDims (g only)      fewest axes with identical addressing
//!   → DispatchPlan                wide indexing, work per thread
//!   → KernelKey                   "<tag>_<op><type>" registry name
//!   → Device::binary_kernel       external variant registry
//!   → LaunchGeometry              grid, group, trailing args
//!   → bind_arguments              a, b, out0, [out1], trailing..., dispatch
//! ```
//!
//! Everything is computed per call and dropped after the dispatch is
//! enqueued. The only cross-call state is the device's kernel cache.

mod bind;
mod collapse;
mod dispatch;
mod kernel_name;
mod op_type;
mod plan;

pub use bind::{TrailingArg, bind_arguments};
pub use collapse::{COLLAPSE_SIZE_CAP, CollapsedDims, collapse_contiguous_dims};
pub use dispatch::{OpSpec, binary_op_gpu_inplace};
pub use kernel_name::{GeneralRank, KernelKey, KernelRequest, KernelVariant, OutputArity, VectorVariant};
pub use op_type::{BinaryOpType, binary_output_layout};
pub use plan::{
    DispatchPlan, GENERAL_GROUP_SIZE, LaunchGeometry, MAX_BLOCK_POW2, MAX_GRID_AXIS,
    WORK_PER_THREAD_THRESHOLD, block_dims, grid_dims_2d, work_per_thread,
};
