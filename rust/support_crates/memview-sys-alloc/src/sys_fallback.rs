use std::alloc::{Layout, alloc_zeroed, dealloc, realloc};

/// Alignment used for every heap layout on this platform.
pub const HEAP_ALIGNMENT: usize = 2 * std::mem::size_of::<usize>();

fn layout(size: usize, alignment: usize) -> std::io::Result<Layout> {
    Layout::from_size_align(size.max(1), alignment)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "Invalid layout"))
}

fn out_of_memory() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::OutOfMemory, "Failed to allocate memory")
}

/// Allocates `size` zero-initialized bytes from the global allocator.
pub fn heap_allocate_zeroed(size: usize) -> std::io::Result<*mut std::ffi::c_void> {
    let layout = layout(size, HEAP_ALIGNMENT)?;
    let ptr = unsafe { alloc_zeroed(layout) };
    if ptr.is_null() {
        return Err(out_of_memory());
    }
    Ok(ptr as *mut std::ffi::c_void)
}

/// Resizes a heap allocation. On failure the original allocation is left
/// untouched.
///
/// # Safety
///
/// `ptr` must come from [`heap_allocate_zeroed`] or [`heap_reallocate`] with
/// `old_size` as its current size.
pub unsafe fn heap_reallocate(
    ptr: *mut std::ffi::c_void,
    old_size: usize,
    new_size: usize,
) -> std::io::Result<*mut std::ffi::c_void> {
    let old_layout = layout(old_size, HEAP_ALIGNMENT)?;
    let new_ptr = unsafe { realloc(ptr as *mut u8, old_layout, new_size.max(1)) };
    if new_ptr.is_null() {
        return Err(out_of_memory());
    }
    Ok(new_ptr as *mut std::ffi::c_void)
}

/// Returns a heap allocation.
///
/// # Safety
///
/// `ptr` must come from [`heap_allocate_zeroed`] or [`heap_reallocate`] with
/// `size` as its current size.
pub unsafe fn heap_release(ptr: *mut std::ffi::c_void, size: usize) {
    if let Ok(layout) = layout(size, HEAP_ALIGNMENT) {
        unsafe { dealloc(ptr as *mut u8, layout) }
    }
}

/// Allocates page-aligned, zero-filled memory (emulated pages).
pub fn pages_allocate(size: usize) -> std::io::Result<(*mut std::ffi::c_void, usize)> {
    let capacity = pages_capacity(size);
    let layout = layout(capacity, page_size())?;
    let ptr = unsafe { alloc_zeroed(layout) };
    if ptr.is_null() {
        return Err(out_of_memory());
    }
    Ok((ptr as *mut std::ffi::c_void, capacity))
}

/// Moves an emulated page region to one of the requested size, copying the
/// overlapping prefix.
///
/// # Safety
///
/// `ptr` and `old_capacity` must describe a live region obtained from
/// [`pages_allocate`] or [`pages_reallocate`].
pub unsafe fn pages_reallocate(
    ptr: *mut std::ffi::c_void,
    old_capacity: usize,
    new_size: usize,
) -> std::io::Result<(*mut std::ffi::c_void, usize)> {
    let capacity = pages_capacity(new_size);
    if capacity == old_capacity {
        return Ok((ptr, capacity));
    }
    let (new_ptr, capacity) = pages_allocate(new_size)?;
    unsafe {
        std::ptr::copy_nonoverlapping(
            ptr as *const u8,
            new_ptr as *mut u8,
            old_capacity.min(capacity),
        );
        pages_release(ptr, old_capacity)?;
    }
    Ok((new_ptr, capacity))
}

/// Frees an emulated page region.
///
/// # Safety
///
/// `ptr` and `capacity` must describe a live region obtained from
/// [`pages_allocate`] or [`pages_reallocate`].
pub unsafe fn pages_release(ptr: *mut std::ffi::c_void, capacity: usize) -> std::io::Result<()> {
    let layout = layout(capacity, page_size())?;
    unsafe {
        dealloc(ptr as *mut u8, layout);
    }
    Ok(())
}

/// Number of bytes an emulated page region of `size` bytes occupies.
pub fn pages_capacity(size: usize) -> usize {
    let page_size = page_size();
    size.max(1).saturating_add(page_size - 1) & !(page_size - 1)
}

/// Returns the emulated page size in bytes.
pub fn page_size() -> usize {
    4 * 1024
}
