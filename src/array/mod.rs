//! Operand metadata: shapes, strides, layouts and array descriptors
//!
//! The dispatch core works purely on metadata. Array storage, refcounting
//! and allocation belong to the surrounding array container; this module
//! only describes where an operand's elements live so the classifier and
//! planner can pick a kernel family and launch geometry.

mod desc;
mod layout;
mod shape;
mod strides;

pub use desc::ArrayDesc;
pub use layout::{Layout, broadcast_shapes};
pub use shape::Shape;
pub use strides::Strides;
