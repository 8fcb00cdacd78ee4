use std::sync::OnceLock;

/// Minimum alignment of every address returned by the C heap.
///
/// glibc and musl guarantee `2 * sizeof(size_t)`.
pub const HEAP_ALIGNMENT: usize = 2 * std::mem::size_of::<usize>();

/// Allocates `size` zero-initialized bytes from the C heap via `calloc`.
///
/// A zero-byte request is served as a one-byte request, so a successful
/// call never returns null.
pub fn heap_allocate_zeroed(size: usize) -> std::io::Result<*mut std::ffi::c_void> {
    let ptr = unsafe { libc::calloc(size.max(1), 1) };
    if ptr.is_null() {
        return Err(std::io::Error::from(std::io::ErrorKind::OutOfMemory));
    }
    Ok(ptr)
}

/// Resizes a C heap allocation via `realloc`.
///
/// On failure the original allocation is left untouched.
///
/// # Safety
///
/// `ptr` must have been returned by [`heap_allocate_zeroed`] or
/// [`heap_reallocate`] and not released since.
pub unsafe fn heap_reallocate(
    ptr: *mut std::ffi::c_void,
    _old_size: usize,
    new_size: usize,
) -> std::io::Result<*mut std::ffi::c_void> {
    let new_ptr = unsafe { libc::realloc(ptr, new_size.max(1)) };
    if new_ptr.is_null() {
        return Err(std::io::Error::from(std::io::ErrorKind::OutOfMemory));
    }
    Ok(new_ptr)
}

/// Returns a C heap allocation via `free`.
///
/// # Safety
///
/// `ptr` must have been returned by [`heap_allocate_zeroed`] or
/// [`heap_reallocate`] and not released since.
pub unsafe fn heap_release(ptr: *mut std::ffi::c_void, _size: usize) {
    unsafe { libc::free(ptr) }
}

/// Maps `size` bytes of anonymous, zero-filled memory, rounded up to whole
/// pages.
///
/// Returns the mapping address and its capacity in bytes.
pub fn pages_allocate(size: usize) -> std::io::Result<(*mut std::ffi::c_void, usize)> {
    let capacity = pages_capacity(size);
    let ptr = unsafe {
        libc::mmap(
            std::ptr::null_mut(),
            capacity,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };
    if ptr.is_null() || ptr == libc::MAP_FAILED {
        return Err(std::io::Error::last_os_error());
    }
    Ok((ptr, capacity))
}

/// Grows or shrinks a mapping with `mremap`, letting the kernel move it.
///
/// Returns the (possibly new) address and capacity. When the page-rounded
/// capacity does not change, the mapping is returned as is.
///
/// # Safety
///
/// `ptr` and `old_capacity` must describe a live mapping obtained from
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
    let new_ptr = unsafe { libc::mremap(ptr, old_capacity, capacity, libc::MREMAP_MAYMOVE) };
    if new_ptr == libc::MAP_FAILED {
        return Err(std::io::Error::last_os_error());
    }
    Ok((new_ptr, capacity))
}

/// Unmaps a mapping obtained from [`pages_allocate`] or [`pages_reallocate`].
///
/// # Safety
///
/// `ptr` and `capacity` must describe a live mapping, and no references into
/// it may be used afterwards.
pub unsafe fn pages_release(ptr: *mut std::ffi::c_void, capacity: usize) -> std::io::Result<()> {
    let res = unsafe { libc::munmap(ptr, capacity) };
    if res < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Number of bytes a page mapping of `size` bytes actually occupies.
pub fn pages_capacity(size: usize) -> usize {
    let page_size = page_size();
    debug_assert!(page_size.is_power_of_two());
    size.max(1).saturating_add(page_size - 1) & !(page_size - 1)
}

/// Gets the system's page size in bytes, cached after the first call.
///
/// Falls back to 4KB if `sysconf(_SC_PAGESIZE)` fails.
pub fn page_size() -> usize {
    static SIZE: OnceLock<usize> = OnceLock::new();
    *SIZE.get_or_init(|| read_page_size().unwrap_or(4 * 1024))
}

fn read_page_size() -> std::io::Result<usize> {
    let res = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if res <= 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(res as usize)
}
