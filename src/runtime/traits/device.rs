//! Trait for the device a binary operation is dispatched on

use super::{CommandEncoder, ComputeKernel};
use crate::binary::KernelRequest;
use crate::error::Result;
use crate::runtime::Stream;

/// A GPU device as seen by the dispatch core
///
/// Provides the two external services a dispatch needs: the kernel-variant
/// registry and the per-stream command encoder.
///
/// # Thread Safety
///
/// The dispatch core calls these methods without taking any lock. A device
/// shared between threads must make its registry and encoder lookup safe
/// for concurrent use (`Sync`).
pub trait Device: Send + Sync {
    /// Compiled kernel handle
    type Kernel: ComputeKernel;

    /// Encoder recording work onto one stream
    type Encoder<'a>: CommandEncoder<Kernel = Self::Kernel>
    where
        Self: 'a;

    /// Look up (compiling and caching lazily on first use) the kernel
    /// variant named by `request`.
    ///
    /// # Errors
    ///
    /// Must return `Error::KernelNotFound` when the variant is missing or
    /// fails to compile. The dispatch core never retries.
    fn binary_kernel(&self, request: &KernelRequest<'_>) -> Result<Self::Kernel>;

    /// Command encoder for `stream`
    fn command_encoder(&self, stream: &Stream) -> Result<Self::Encoder<'_>>;
}
