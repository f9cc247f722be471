//! Traits for the external collaborators of the dispatch core
//!
//! The dispatch core owns no device state. Kernel compilation and caching,
//! command encoding and queue submission live behind these traits and are
//! supplied by the backend that embeds this crate.

pub mod device;
pub mod encoder;
pub mod kernel;

pub use device::Device;
pub use encoder::CommandEncoder;
pub use kernel::ComputeKernel;
