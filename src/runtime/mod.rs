//! Boundary to the GPU backend
//!
//! # Architecture
//!
//! ```text
//! Device (supplied by the backend)
//! ├── binary_kernel()   kernel-variant registry: name -> compiled kernel
//! └── command_encoder() per-stream encoder
//!       ├── set_compute_pipeline_state / set_*_array / set_*bytes
//!       └── dispatch_threads (exactly one per binary op)
//! ```
//!
//! Everything the dispatch core sends across this boundary is either a
//! buffer handle, a [`ScalarArg`], a [`VectorArg`], a [`GridSize`] or the
//! canonical kernel name inside a [`KernelRequest`](crate::binary::KernelRequest).

mod args;
mod stream;
pub mod traits;

pub use args::{GridSize, ScalarArg, VectorArg};
pub use stream::Stream;
pub use traits::{CommandEncoder, ComputeKernel, Device};
