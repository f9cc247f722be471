//! Argument binding for binary kernels

use super::LaunchGeometry;
use crate::array::ArrayDesc;
use crate::error::Result;
use crate::runtime::{CommandEncoder, ScalarArg, VectorArg};

/// Argument bound after the output buffers
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrailingArg {
    /// Bound with `set_bytes`
    Scalar(ScalarArg),
    /// Bound with `set_vector_bytes`
    Vector(VectorArg),
}

/// Bind a binary kernel's arguments and enqueue its single dispatch.
///
/// Slot order is fixed: `a`, `b`, every output in order, then the trailing
/// arguments of `geometry`. The pipeline is selected before any binding.
///
/// # Errors
///
/// Propagates the encoder's `dispatch_threads` failure.
pub fn bind_arguments<E: CommandEncoder>(
    encoder: &mut E,
    kernel: &E::Kernel,
    a: &ArrayDesc,
    b: &ArrayDesc,
    outputs: &[&ArrayDesc],
    geometry: &LaunchGeometry,
) -> Result<()> {
    encoder.set_compute_pipeline_state(kernel);

    let mut slot = 0;
    encoder.set_input_array(a, slot);
    slot += 1;
    encoder.set_input_array(b, slot);
    slot += 1;
    for out in outputs {
        encoder.set_output_array(out, slot);
        slot += 1;
    }

    for arg in &geometry.trailing {
        match arg {
            TrailingArg::Scalar(value) => encoder.set_bytes(*value, slot),
            TrailingArg::Vector(value) => encoder.set_vector_bytes(value, slot),
        }
        slot += 1;
    }

    encoder.dispatch_threads(geometry.grid, geometry.group)
}
