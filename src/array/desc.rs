//! Operand descriptors handed to the dispatch core

use super::{Layout, Shape, Strides};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};

/// Description of one device array taking part in a binary dispatch.
///
/// The descriptor carries only metadata. `handle` is the device buffer
/// (a device pointer, or a backend buffer id) owned by the external array
/// container; the dispatch core binds it but never copies or frees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayDesc {
    handle: u64,
    dtype: DType,
    layout: Layout,
}

impl ArrayDesc {
    /// Create a descriptor from an existing layout
    pub fn new(handle: u64, dtype: DType, layout: Layout) -> Self {
        Self {
            handle,
            dtype,
            layout,
        }
    }

    /// Row-major descriptor for a freshly allocated buffer
    pub fn contiguous(handle: u64, dtype: DType, shape: &[usize]) -> Self {
        Self::new(handle, dtype, Layout::contiguous(shape))
    }

    /// Row-major descriptor whose dtype is taken from a Rust element type
    ///
    /// # Example
    /// ```
    /// use binop_dispatch::array::ArrayDesc;
    /// use binop_dispatch::dtype::DType;
    /// let a = ArrayDesc::of::<f32>(0x1000, &[4]);
    /// assert_eq!(a.dtype(), DType::F32);
    /// ```
    pub fn of<T: Element>(handle: u64, shape: &[usize]) -> Self {
        Self::contiguous(handle, T::DTYPE, shape)
    }

    /// Descriptor with explicit strides and element offset
    ///
    /// # Errors
    /// Returns `InvalidArgument` if shape and strides disagree on rank.
    pub fn strided(
        handle: u64,
        dtype: DType,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
    ) -> Result<Self> {
        let layout = Layout::new(Shape::from(shape), Strides::from(strides), offset).ok_or_else(
            || Error::InvalidArgument {
                arg: "strides",
                reason: format!(
                    "rank {} does not match shape {:?} of rank {}",
                    strides.len(),
                    shape,
                    shape.len()
                ),
            },
        )?;
        Ok(Self::new(handle, dtype, layout))
    }

    /// Device buffer handle
    #[inline]
    pub fn handle(&self) -> u64 {
        self.handle
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Memory layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Logical shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Element strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Logical element count
    #[inline]
    pub fn size(&self) -> usize {
        self.layout.elem_count()
    }

    /// Buffer elements actually addressed, see [`Layout::data_size`]
    #[inline]
    pub fn data_size(&self) -> usize {
        self.layout.data_size()
    }

    /// Byte offset of the first element inside the buffer
    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.layout.offset() * self.dtype.size_in_bytes()
    }

    /// View of the same buffer broadcast to `shape`
    ///
    /// # Errors
    /// Returns `BroadcastError` if this operand cannot be stretched to `shape`.
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self> {
        let layout = self
            .layout
            .broadcast_to(shape)
            .ok_or_else(|| Error::broadcast(self.shape(), shape))?;
        Ok(Self::new(self.handle, self.dtype, layout))
    }
}
