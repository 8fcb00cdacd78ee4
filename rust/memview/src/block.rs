//! `MemoryBlock`: one region of raw memory, either owned or borrowed, and
//! its allocate/resize/free state machine.

use std::marker::PhantomData;
use std::ptr::NonNull;
use std::sync::Arc;

use memview_common::{
    Result,
    error::Error,
    result::{verify_alignment, verify_size},
};
use memview_sys_alloc::SystemAllocator;

use crate::{options::AllocOptions, raw};

/// Whether a borrowed region may be written through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

enum Ownership<'a> {
    Owned {
        allocator: Arc<dyn SystemAllocator>,
        zero_on_grow: bool,
    },
    Borrowed {
        access: Access,
        _region: PhantomData<&'a mut [u8]>,
    },
}

/// A region of raw memory that can be viewed as scalars, sequences and
/// aggregates without copying.
///
/// An owning block (from [`MemoryBlock::allocate`] and friends) holds memory
/// obtained from a [`SystemAllocator`]; it may be resized and freed, and it
/// releases its memory on drop if it was not freed explicitly. A borrowed
/// block (from adoption) aliases storage owned by some other value for
/// `'a`; it is never resized or released by this crate.
///
/// Views borrow the block, so the borrow checker keeps them from outliving
/// a resize or free. Detached [`ViewHandle`](crate::ViewHandle)s carry the
/// block's generation instead and are rejected once it moves on.
///
/// Blocks are neither `Send` nor `Sync`.
pub struct MemoryBlock<'a> {
    ptr: NonNull<u8>,
    size: usize,
    freed: bool,
    generation: u64,
    ownership: Ownership<'a>,
}

impl MemoryBlock<'static> {
    /// Allocates `size` zero-initialized bytes from the C heap.
    ///
    /// A zero-byte block is valid, but every view projection over it fails
    /// with `InsufficientSize`.
    pub fn allocate(size: usize) -> Result<MemoryBlock<'static>> {
        Self::allocate_with(size, &AllocOptions::default())
    }

    /// Allocates `size` zero-initialized bytes as configured by `options`.
    pub fn allocate_with(size: usize, options: &AllocOptions) -> Result<MemoryBlock<'static>> {
        let allocator = options.get_allocator().clone();
        let ptr = allocator.allocate_zeroed(size).map_err(|e| {
            log::debug!("allocation of {size} bytes from {allocator:?} failed: {e}");
            Error::allocation_failure(size, e)
        })?;
        log::trace!("allocated {size} bytes at {ptr:p}");
        Ok(MemoryBlock {
            ptr,
            size,
            freed: false,
            generation: 0,
            ownership: Ownership::Owned {
                allocator,
                zero_on_grow: options.get_zero_on_grow(),
            },
        })
    }

    /// Allocates room for `count` elements of `element_size` bytes each.
    pub fn allocate_sequence(element_size: usize, count: usize) -> Result<MemoryBlock<'static>> {
        Self::allocate_sequence_with(element_size, count, &AllocOptions::default())
    }

    pub fn allocate_sequence_with(
        element_size: usize,
        count: usize,
        options: &AllocOptions,
    ) -> Result<MemoryBlock<'static>> {
        let size = element_size.checked_mul(count).ok_or_else(|| {
            Error::allocation_failure(
                usize::MAX,
                std::io::Error::new(
                    std::io::ErrorKind::OutOfMemory,
                    format!("{count} elements of {element_size} bytes overflow usize"),
                ),
            )
        })?;
        Self::allocate_with(size, options)
    }

    /// Allocates room for `count` values of `T`.
    pub fn allocate_array<T: bytemuck::Pod>(count: usize) -> Result<MemoryBlock<'static>> {
        Self::allocate_sequence(std::mem::size_of::<T>(), count)
    }
}

impl<'a> MemoryBlock<'a> {
    pub(crate) fn borrowed(ptr: NonNull<u8>, size: usize, access: Access) -> MemoryBlock<'a> {
        log::trace!("adopted {size} bytes at {ptr:p} ({access:?})");
        MemoryBlock {
            ptr,
            size,
            freed: false,
            generation: 0,
            ownership: Ownership::Borrowed {
                access,
                _region: PhantomData,
            },
        }
    }

    /// Byte length of the region as of the last allocation, resize or
    /// adoption.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if the block aliases memory owned elsewhere.
    #[inline]
    pub fn is_borrowed(&self) -> bool {
        matches!(self.ownership, Ownership::Borrowed { .. })
    }

    #[inline]
    pub fn is_freed(&self) -> bool {
        self.freed
    }

    /// Returns `true` if mutable views may be projected over the block.
    pub fn is_writable(&self) -> bool {
        match &self.ownership {
            Ownership::Owned { .. } => !self.freed,
            Ownership::Borrowed { access, .. } => *access == Access::ReadWrite,
        }
    }

    /// Counter bumped by every successful resize and by free.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Numeric start address of the region, for diagnostics.
    #[inline]
    pub fn address(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    /// Resizes an owning block to `new_size` bytes, possibly moving it.
    ///
    /// The first `min(old, new)` bytes are preserved. Bytes gained by growth
    /// are zero-filled unless disabled through
    /// [`AllocOptions::zero_on_grow`].
    ///
    /// # Errors
    ///
    /// - `AlreadyFreed` if the block was freed.
    /// - `ImmutableBorrow` if the block is borrowed.
    /// - `AllocationFailure` if the allocator refuses; the block is left as
    ///   it was.
    pub fn resize(&mut self, new_size: usize) -> Result<()> {
        self.ensure_live()?;
        let Ownership::Owned {
            allocator,
            zero_on_grow,
        } = &self.ownership
        else {
            return Err(Error::immutable_borrow("resize"));
        };

        let old_size = self.size;
        let ptr = unsafe { allocator.reallocate(self.ptr, old_size, new_size) }.map_err(|e| {
            log::debug!("resize of {:p} from {old_size} to {new_size} bytes failed: {e}", self.ptr);
            Error::allocation_failure(new_size, e)
        })?;
        if *zero_on_grow && new_size > old_size {
            unsafe { raw::zero(ptr, old_size, new_size - old_size) };
        }
        log::trace!(
            "resized {:p} ({old_size} bytes) to {ptr:p} ({new_size} bytes)",
            self.ptr
        );

        self.ptr = ptr;
        self.size = new_size;
        self.generation += 1;
        Ok(())
    }

    /// Releases an owning block's memory.
    ///
    /// Does nothing if the block is borrowed or already freed, so calling it
    /// repeatedly is harmless.
    pub fn free(&mut self) {
        if self.freed {
            return;
        }
        let Ownership::Owned { allocator, .. } = &self.ownership else {
            return;
        };
        unsafe { allocator.release(self.ptr, self.size) };
        log::trace!("freed {} bytes at {:p}", self.size, self.ptr);
        self.freed = true;
        self.generation += 1;
    }

    #[inline]
    pub(crate) fn ensure_live(&self) -> Result<()> {
        if self.freed {
            Err(Error::already_freed())
        } else {
            Ok(())
        }
    }

    /// The block's bytes, provided it is live and holds at least `required`
    /// of them.
    pub(crate) fn checked_bytes(&self, required: usize, alignment: usize) -> Result<&[u8]> {
        self.ensure_live()?;
        verify_size(self.size, required)?;
        verify_alignment(self.address(), alignment)?;
        Ok(unsafe { raw::bytes(self.ptr, self.size) })
    }

    /// Like [`Self::checked_bytes`], and the block must also be writable.
    pub(crate) fn checked_bytes_mut(
        &mut self,
        required: usize,
        alignment: usize,
    ) -> Result<&mut [u8]> {
        self.ensure_live()?;
        verify_size(self.size, required)?;
        if !self.is_writable() {
            return Err(Error::immutable_borrow("mutable view"));
        }
        verify_alignment(self.address(), alignment)?;
        Ok(unsafe { raw::bytes_mut(self.ptr, self.size) })
    }
}

impl Drop for MemoryBlock<'_> {
    fn drop(&mut self) {
        self.free();
    }
}

impl std::fmt::Debug for MemoryBlock<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBlock")
            .field("ptr", &self.ptr)
            .field("size", &self.size)
            .field("freed", &self.freed)
            .field("borrowed", &self.is_borrowed())
            .field("generation", &self.generation)
            .finish()
    }
}
