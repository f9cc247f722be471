//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::Pod;

/// Trait for Rust scalar types that can back a dispatched array
///
/// This connects Rust's type system to the runtime dtype carried by an
/// [`ArrayDesc`](crate::array::ArrayDesc), so callers can describe a buffer
/// by its element type instead of spelling out the `DType`.
///
/// Every implementor is plain old data (`Pod`), so a slice of elements can
/// be reinterpreted as the bytes of a buffer of the matching `DType`.
pub trait Element: Copy + Send + Sync + Pod + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$dtype;
            }
        )*
    };
}

impl_element! {
    f64 => F64,
    f32 => F32,
    i64 => I64,
    i32 => I32,
    i16 => I16,
    i8 => I8,
    u64 => U64,
    u32 => U32,
    u16 => U16,
    u8 => U8,
}

#[cfg(feature = "f16")]
impl_element! {
    half::f16 => F16,
    half::bf16 => BF16,
}
