//! # binop-dispatch
//!
//! **GPU dispatch core for elementwise binary array operations.**
//!
//! Given two operand descriptors and an operation code, this crate decides
//! how the work maps onto a device compute grid, names the precompiled
//! kernel variant to run, computes the launch geometry and hands everything
//! to a backend command encoder. It owns no device state: kernel compilation,
//! caching and command submission are supplied through the traits in
//! [`runtime`].
//!
//! ## Pipeline
//!
//! - **Classify** the operand pair: `ss`, `sv`, `vs`, `vv` or `g`
//! - **Collapse** contiguous axes of strided (`g`) dispatches
//! - **Plan** wide indexing, per-thread work, grid and group sizes
//! - **Name** the kernel variant, e.g. `vv_addfloat32`, `gn4large_addint32`
//! - **Bind** `a`, `b`, the outputs and trailing constants, then dispatch once
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use binop_dispatch::prelude::*;
//!
//! let a = ArrayDesc::of::<f32>(a_buf, &[3, 4]);
//! let b = ArrayDesc::of::<f32>(b_buf, &[1, 4]);
//! let out = ArrayDesc::of::<f32>(out_buf, &[3, 4]);
//!
//! // issues g2_subfloat32 on a (4, 3, 1) grid
//! BinaryKernels::new(&device, Stream::default()).sub(&a, &b, &out)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `f16`: `Element` impls for `half::f16` and `half::bf16`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array;
pub mod binary;
pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::array::{ArrayDesc, Layout};
    pub use crate::binary::{BinaryOpType, KernelKey, KernelRequest, OutputArity};
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::ops::{BinaryKernels, BinaryOp, BitwiseOp, DualBinaryOp};
    pub use crate::runtime::{CommandEncoder, ComputeKernel, Device, GridSize, Stream};
}
