//! Trait for compiled kernel objects

/// A ready-to-dispatch compiled kernel variant
///
/// Returned by [`Device::binary_kernel`](super::Device::binary_kernel).
/// Backends typically implement this for a reference-counted pipeline
/// handle so the registry can keep its own copy cached.
pub trait ComputeKernel {
    /// Largest thread group this kernel was compiled to accept
    fn max_total_threads_per_threadgroup(&self) -> usize;
}

impl<K: ComputeKernel + ?Sized> ComputeKernel for std::sync::Arc<K> {
    fn max_total_threads_per_threadgroup(&self) -> usize {
        (**self).max_total_threads_per_threadgroup()
    }
}
