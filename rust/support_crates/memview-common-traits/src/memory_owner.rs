//! `MemoryOwner`: a trait for values that can report their backing storage.

/// A trait for values whose bytes live in a single contiguous region that
/// can be borrowed in place.
///
/// This is the introspection capability adoption relies on: given a value,
/// report where its bytes are and how many of them there are.
///
/// # Safety
///
/// Implementors must guarantee that:
/// - `memory().ptr` points to `memory().len` initialized bytes that remain
///   valid and unmodified for as long as the owner is borrowed.
/// - `len <= capacity`, and `ptr` is a multiple of `alignment`.
/// - An owner with `len == 0` may report a dangling, well-aligned pointer.
pub unsafe trait MemoryOwner {
    /// Returns information about the owned memory region.
    fn memory(&self) -> MemoryAllocation;
}

/// Describes a region of memory owned by some other value.
#[derive(Debug, Clone, Copy)]
pub struct MemoryAllocation {
    /// Pointer to the first byte of the region.
    pub ptr: *const u8,
    /// Number of initialized bytes.
    pub len: usize,
    /// Total bytes reserved by the owner, initialized or not.
    pub capacity: usize,
    /// Guaranteed alignment of `ptr`.
    pub alignment: usize,
}

impl MemoryAllocation {
    /// Returns `true` if the region holds no initialized bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

unsafe impl MemoryOwner for Vec<u8> {
    fn memory(&self) -> MemoryAllocation {
        MemoryAllocation {
            ptr: self.as_ptr(),
            len: self.len(),
            capacity: self.capacity(),
            alignment: 1,
        }
    }
}

unsafe impl MemoryOwner for Box<[u8]> {
    fn memory(&self) -> MemoryAllocation {
        MemoryAllocation {
            ptr: self.as_ptr(),
            len: self.len(),
            capacity: self.len(),
            alignment: 1,
        }
    }
}

unsafe impl MemoryOwner for String {
    fn memory(&self) -> MemoryAllocation {
        MemoryAllocation {
            ptr: self.as_ptr(),
            len: self.len(),
            capacity: self.capacity(),
            alignment: 1,
        }
    }
}
