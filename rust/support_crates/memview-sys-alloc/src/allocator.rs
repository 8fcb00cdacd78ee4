//! The system allocator seam and its two platform-backed implementations.
//!
//! Memory blocks never talk to the platform directly; they go through a
//! [`SystemAllocator`], which only has to hand out zero-filled regions,
//! resize them and take them back.

use std::ptr::NonNull;

use crate::sys;

/// Raw allocation primitives consumed by owning memory blocks.
///
/// Every method reports failure through `std::io::Result`; no method retries
/// or falls back to a smaller request.
pub trait SystemAllocator: Send + Sync + std::fmt::Debug {
    /// Allocates `size` zero-initialized bytes.
    ///
    /// A zero-byte request succeeds with a non-null address that must still
    /// be passed to [`SystemAllocator::release`].
    fn allocate_zeroed(&self, size: usize) -> std::io::Result<NonNull<u8>>;

    /// Resizes the region at `ptr` from `old_size` to `new_size` bytes,
    /// possibly moving it.
    ///
    /// The first `min(old_size, new_size)` bytes are preserved. Bytes past
    /// `old_size` have unspecified contents. On failure the original region
    /// is still live and unchanged.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by this allocator with `old_size` as its
    /// current size, and must not have been released.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> std::io::Result<NonNull<u8>>;

    /// Returns the region at `ptr` to the system.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by this allocator with `size` as its
    /// current size, must not have been released, and must not be accessed
    /// afterwards.
    unsafe fn release(&self, ptr: NonNull<u8>, size: usize);

    /// Minimum alignment of every address this allocator returns.
    fn alignment(&self) -> usize;
}

/// Allocates from the platform C heap (`calloc`/`realloc`/`free` on Linux,
/// the process heap on Windows).
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocator;

impl SystemAllocator for HeapAllocator {
    fn allocate_zeroed(&self, size: usize) -> std::io::Result<NonNull<u8>> {
        let ptr = sys::heap_allocate_zeroed(size)?;
        non_null(ptr)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> std::io::Result<NonNull<u8>> {
        let ptr = unsafe { sys::heap_reallocate(ptr.as_ptr() as _, old_size, new_size)? };
        non_null(ptr)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        unsafe { sys::heap_release(ptr.as_ptr() as _, size) }
    }

    fn alignment(&self) -> usize {
        sys::HEAP_ALIGNMENT
    }
}

/// Allocates whole pages straight from the virtual memory subsystem.
///
/// Every region is page-aligned and its capacity is the requested size
/// rounded up to a page boundary. Suits large blocks that are resized often:
/// on Linux a resize is an `mremap` and never copies.
#[derive(Debug, Default, Clone, Copy)]
pub struct PageAllocator;

impl PageAllocator {
    /// Returns the size of a memory page on the current system.
    pub fn page_size() -> usize {
        sys::page_size()
    }

    /// Returns the number of bytes a region of `size` bytes really occupies.
    pub fn capacity_for(size: usize) -> usize {
        sys::pages_capacity(size)
    }
}

impl SystemAllocator for PageAllocator {
    fn allocate_zeroed(&self, size: usize) -> std::io::Result<NonNull<u8>> {
        let (ptr, _) = sys::pages_allocate(size)?;
        non_null(ptr)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> std::io::Result<NonNull<u8>> {
        let old_capacity = sys::pages_capacity(old_size);
        let (ptr, _) = unsafe { sys::pages_reallocate(ptr.as_ptr() as _, old_capacity, new_size)? };
        non_null(ptr)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        let capacity = sys::pages_capacity(size);
        if let Err(e) = unsafe { sys::pages_release(ptr.as_ptr() as _, capacity) } {
            log::warn!("failed to release {capacity} bytes of pages at {ptr:p}: {e}");
        }
    }

    fn alignment(&self) -> usize {
        sys::page_size()
    }
}

fn non_null(ptr: *mut std::ffi::c_void) -> std::io::Result<NonNull<u8>> {
    NonNull::new(ptr as *mut u8)
        .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::OutOfMemory))
}
