//! Execution streams

use std::fmt;

/// A logical, in-order execution stream on one device.
///
/// Dispatches submitted to the same stream execute in submission order.
/// No ordering is implied between different streams; cross-stream
/// synchronization is the scheduler's responsibility.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Stream {
    /// Device the stream belongs to
    pub device_index: usize,
    /// Stream index on that device
    pub index: usize,
}

impl Stream {
    /// Create a stream identifier
    pub const fn new(device_index: usize, index: usize) -> Self {
        Self {
            device_index,
            index,
        }
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stream(gpu:{}/{})", self.device_index, self.index)
    }
}
