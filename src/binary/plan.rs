//! Launch geometry for binary dispatches
//!
//! [`DispatchPlan`] holds the per-call decisions (wide indexing, work per
//! thread, collapsed dims) that feed both the kernel name and the launch.
//! [`DispatchPlan::launch_geometry`] turns them into grid and group sizes
//! plus the trailing kernel arguments, once the kernel's group limit is known.

use super::bind::TrailingArg;
use super::{BinaryOpType, CollapsedDims, KernelKey};
use crate::array::ArrayDesc;
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::runtime::{GridSize, ScalarArg, VectorArg};

// ============================================================================
// Configuration
// ============================================================================

/// Thread-group size every strided (`g*`) kernel is compiled for
pub const GENERAL_GROUP_SIZE: usize = 1024;

/// Linear workloads below this many elements run one element per thread
pub const WORK_PER_THREAD_THRESHOLD: usize = 1 << 16;

/// Largest extent of a single grid axis
pub const MAX_GRID_AXIS: u64 = u32::MAX as u64;

/// Strided thread groups hold at most `1 << MAX_BLOCK_POW2` threads
pub const MAX_BLOCK_POW2: u32 = 10;

/// Strided kernels index with `int` unless the `large` variant is used
const GENERAL_NARROW_LIMIT: usize = i32::MAX as usize;

/// Linear kernels take a `uint` element count unless the `2` variant is used
const LINEAR_NARROW_LIMIT: usize = u32::MAX as usize;

// ============================================================================
// Geometry helpers
// ============================================================================

/// Elements each thread of a linear kernel processes.
///
/// Small workloads stay at one element per thread. Larger ones pack up to
/// eight bytes of operand data per thread to bound the grid size.
pub fn work_per_thread(dtype: DType, size: usize) -> usize {
    if size < WORK_PER_THREAD_THRESHOLD {
        1
    } else {
        (8 / dtype.size_in_bytes()).max(1)
    }
}

/// Power-of-two thread-group shape for a 3D grid.
///
/// Doubles each axis in turn (innermost first) while it still fits its grid
/// extent, until the group holds `1 << pow2` threads or no axis can grow.
pub fn block_dims(dim0: u64, dim1: u64, dim2: u64, pow2: u32) -> GridSize {
    let dims = [dim0, dim1, dim2];
    let mut pows = [0u32; 3];
    let mut sum = 0;

    'grow: loop {
        let presum = sum;
        for (pow, &dim) in pows.iter_mut().zip(dims.iter()) {
            if dim >= 1u64 << (*pow + 1) {
                *pow += 1;
                sum += 1;
            }
            if sum == pow2 {
                break 'grow;
            }
        }
        if sum == presum {
            break;
        }
    }

    GridSize::new(1 << pows[0], 1 << pows[1], 1 << pows[2])
}

/// 2D grid covering a dense array of more than `u32::MAX` elements.
///
/// Axes with zero stride are skipped. `divisor` (the work per thread) is
/// absorbed into an axis it divides evenly where possible, otherwise the
/// innermost grid axis is ceil-divided by it at the end. The larger extent
/// always ends up in `width`.
///
/// # Errors
///
/// Returns `BackendLimitation` if the shape cannot be split into two axes
/// of at most [`MAX_GRID_AXIS`] each.
pub fn grid_dims_2d(shape: &[usize], strides: &[isize], divisor: usize) -> Result<GridSize> {
    let mut divisor = divisor.max(1) as u64;
    let mut grid_x: u64 = 1;
    let mut grid_y: u64 = 1;

    for (&dim, &stride) in shape.iter().zip(strides) {
        if stride == 0 {
            continue;
        }
        let dim = dim as u64;
        if divisor % dim == 0 {
            divisor /= dim;
            continue;
        }
        if grid_x.saturating_mul(dim) < MAX_GRID_AXIS {
            grid_x *= dim;
        } else {
            grid_y = grid_y.saturating_mul(dim);
        }
        if divisor > 1 {
            if grid_x % divisor == 0 {
                grid_x /= divisor;
                divisor = 1;
            } else if grid_y % divisor == 0 {
                grid_y /= divisor;
                divisor = 1;
            }
        }
    }

    if grid_x > MAX_GRID_AXIS || grid_y > MAX_GRID_AXIS {
        return Err(Error::backend_limitation(
            "gpu",
            "binary dispatch",
            format!("unable to factor shape {shape:?} into a 2D grid"),
        ));
    }
    if grid_y > grid_x {
        std::mem::swap(&mut grid_x, &mut grid_y);
    }
    if divisor > 1 {
        grid_x = grid_x.div_ceil(divisor);
    }
    Ok(GridSize::new(grid_x, grid_y, 1))
}

// ============================================================================
// Plan
// ============================================================================

/// Per-call dispatch decisions for one binary operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchPlan {
    op_type: BinaryOpType,
    large: bool,
    work_per_thread: usize,
    dims: Option<CollapsedDims>,
}

impl DispatchPlan {
    /// Plan a dispatch of `op_type` over broadcast operands and the output.
    ///
    /// `a` and `b` must already be broadcast to the output shape.
    pub fn new(op_type: BinaryOpType, a: &ArrayDesc, b: &ArrayDesc, out: &ArrayDesc) -> Self {
        if op_type.is_general() {
            let dims = CollapsedDims::new(out.shape(), a.strides(), b.strides(), out.strides());
            let large = a.data_size() > GENERAL_NARROW_LIMIT
                || b.data_size() > GENERAL_NARROW_LIMIT
                || out.size() > GENERAL_NARROW_LIMIT;
            Self {
                op_type,
                large,
                work_per_thread: if large { 4 } else { 2 },
                dims: Some(dims),
            }
        } else {
            Self {
                op_type,
                large: out.data_size() > LINEAR_NARROW_LIMIT,
                work_per_thread: work_per_thread(a.dtype(), out.data_size()),
                dims: None,
            }
        }
    }

    /// Broadcast category
    #[inline]
    pub fn op_type(&self) -> BinaryOpType {
        self.op_type
    }

    /// Whether the wide-indexing variant is needed
    #[inline]
    pub fn large(&self) -> bool {
        self.large
    }

    /// Per-thread work count used for kernel selection
    #[inline]
    pub fn work_per_thread(&self) -> usize {
        self.work_per_thread
    }

    /// Collapsed dispatch dims (strided category only)
    #[inline]
    pub fn dims(&self) -> Option<&CollapsedDims> {
        self.dims.as_ref()
    }

    /// Dispatch rank; zero for the linear categories
    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.as_ref().map_or(0, CollapsedDims::ndim)
    }

    /// Kernel-variant key for `op` on operands of `dtype`
    pub fn kernel_key(&self, op: &'static str, dtype: DType) -> KernelKey {
        KernelKey::new(self.op_type, op, dtype, self.large, self.ndim(), self.work_per_thread)
    }

    /// Grid, group and trailing arguments for a kernel whose thread groups
    /// hold at most `max_threads` threads.
    ///
    /// # Panics
    ///
    /// Strided kernels are compiled for exactly [`GENERAL_GROUP_SIZE`]
    /// threads per group. Any other `max_threads` means the kernel library
    /// and this crate disagree, and the call panics.
    ///
    /// # Errors
    ///
    /// Returns `BackendLimitation` when a wide linear workload cannot be
    /// laid out on a 2D grid, or when a strided dispatch of rank above 3
    /// has an axis that does not fit the kernel's `int32` shape argument.
    pub fn launch_geometry(&self, out: &ArrayDesc, max_threads: usize) -> Result<LaunchGeometry> {
        match &self.dims {
            Some(dims) => self.general_geometry(dims, out.size(), max_threads),
            None => self.linear_geometry(out, max_threads),
        }
    }

    fn general_geometry(&self, dims: &CollapsedDims, size: usize, max_threads: usize) -> Result<LaunchGeometry> {
        let shape = dims.shape.as_slice();
        let ndim = shape.len();
        let mut dim0 = if ndim > 0 { shape[ndim - 1] } else { 1 };
        let dim1 = if ndim > 1 { shape[ndim - 2] } else { 1 };
        let plane = dim0 * dim1;
        let rest = if plane == 0 { 0 } else { size / plane };

        let mut trailing = Vec::with_capacity(4);
        let elements_per_thread = if ndim > 3 {
            trailing.push(TrailingArg::Vector(VectorArg::I32(dims.shape.to_kernel_vec()?)));
            trailing.push(TrailingArg::Vector(VectorArg::I64(dims.strides_a.to_kernel_vec())));
            trailing.push(TrailingArg::Vector(VectorArg::I64(dims.strides_b.to_kernel_vec())));
            trailing.push(TrailingArg::Scalar(ScalarArg::I32(ndim as i32)));
            dim0 = dim0.div_ceil(self.work_per_thread);
            self.work_per_thread
        } else {
            // rank is implicit in the grid
            trailing.push(TrailingArg::Vector(VectorArg::I64(dims.strides_a.to_kernel_vec())));
            trailing.push(TrailingArg::Vector(VectorArg::I64(dims.strides_b.to_kernel_vec())));
            1
        };

        assert_eq!(
            max_threads, GENERAL_GROUP_SIZE,
            "strided binary kernels must use {GENERAL_GROUP_SIZE}-thread groups"
        );

        let (dim0, dim1, rest) = (dim0 as u64, dim1 as u64, rest as u64);
        Ok(LaunchGeometry {
            grid: GridSize::new(dim0, dim1, rest),
            group: block_dims(dim0, dim1, rest, MAX_BLOCK_POW2),
            elements_per_thread,
            trailing,
        })
    }

    fn linear_geometry(&self, out: &ArrayDesc, max_threads: usize) -> Result<LaunchGeometry> {
        let size = out.data_size();
        let nthreads = size.div_ceil(self.work_per_thread);
        let group = GridSize::linear(max_threads.min(nthreads).max(1) as u64);

        let (grid, count) = if self.large {
            (
                grid_dims_2d(out.shape(), out.strides(), self.work_per_thread)?,
                ScalarArg::I64(size as i64),
            )
        } else {
            // not large, so the count fits
            (GridSize::linear(nthreads as u64), ScalarArg::U32(size as u32))
        };

        Ok(LaunchGeometry {
            grid,
            group,
            elements_per_thread: self.work_per_thread,
            trailing: vec![TrailingArg::Scalar(count)],
        })
    }
}

/// Everything `dispatch_threads` and the trailing bindings need
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchGeometry {
    /// Threads in the grid
    pub grid: GridSize,
    /// Threads per group
    pub group: GridSize,
    /// Output elements each grid thread is responsible for
    pub elements_per_thread: usize,
    /// Arguments bound after the outputs, in order
    pub trailing: Vec<TrailingArg>,
}

impl LaunchGeometry {
    /// Number of output element slots the grid can reach
    pub fn capacity(&self) -> u128 {
        self.grid.volume() * self.elements_per_thread as u128
    }
}
