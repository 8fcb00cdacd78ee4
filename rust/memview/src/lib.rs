//! Typed views over raw memory.
//!
//! A [`MemoryBlock`] is a region of bytes that is either allocated and owned
//! by the block, or adopted from an existing value and borrowed. Its bytes
//! can be reinterpreted in place as scalars, sequences and fixed-size
//! aggregates, with every projection checked against the block's state, size
//! and alignment.
//!
//! ```
//! use memview::MemoryBlock;
//!
//! let mut block = MemoryBlock::allocate(8)?;
//! *block.as_scalar_mut::<u32>()? = 0x11223344;
//! assert_eq!(&block.as_slice::<u8>()?[..4], &0x11223344u32.to_ne_bytes());
//! # Ok::<(), memview::Error>(())
//! ```

pub mod adopt;
pub mod block;
pub mod options;
mod raw;
pub mod shape;
pub mod view;

pub use adopt::{HostValue, Region};
pub use block::{Access, MemoryBlock};
pub use memview_common::{
    Result,
    error::{Error, ErrorKind},
};
pub use memview_sys_alloc::{HeapAllocator, PageAllocator, SystemAllocator};
pub use options::AllocOptions;
pub use shape::{Category, NATIVE_WIDTH, ResolvedShape, Scalar, ScalarKind, Shape};
pub use view::{ScalarValue, View, ViewHandle};
