use std::sync::OnceLock;
use windows_sys::Win32::{
    Foundation::GetLastError,
    System::{
        Memory::{
            GetProcessHeap, HEAP_ZERO_MEMORY, HeapAlloc, HeapFree, HeapReAlloc, MEM_COMMIT,
            MEM_RELEASE, MEM_RESERVE, PAGE_READWRITE, VirtualAlloc, VirtualFree,
        },
        SystemInformation::{GetSystemInfo, SYSTEM_INFO},
    },
};

/// Minimum alignment of every address returned by the process heap
/// (`MEMORY_ALLOCATION_ALIGNMENT`).
pub const HEAP_ALIGNMENT: usize = 2 * std::mem::size_of::<usize>();

/// Allocates `size` zero-initialized bytes from the process heap.
///
/// A zero-byte request is served as a one-byte request.
pub fn heap_allocate_zeroed(size: usize) -> std::io::Result<*mut std::ffi::c_void> {
    let ptr = unsafe { HeapAlloc(GetProcessHeap(), HEAP_ZERO_MEMORY, size.max(1)) };
    if ptr.is_null() {
        return Err(std::io::Error::from(std::io::ErrorKind::OutOfMemory));
    }
    Ok(ptr)
}

/// Resizes a process heap allocation. On failure the original allocation is
/// left untouched.
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
    let new_ptr = unsafe { HeapReAlloc(GetProcessHeap(), HEAP_ZERO_MEMORY, ptr, new_size.max(1)) };
    if new_ptr.is_null() {
        return Err(std::io::Error::from(std::io::ErrorKind::OutOfMemory));
    }
    Ok(new_ptr)
}

/// Returns a process heap allocation.
///
/// # Safety
///
/// `ptr` must have been returned by [`heap_allocate_zeroed`] or
/// [`heap_reallocate`] and not released since.
pub unsafe fn heap_release(ptr: *mut std::ffi::c_void, _size: usize) {
    unsafe {
        HeapFree(GetProcessHeap(), 0, ptr);
    }
}

/// Commits `size` bytes of zero-filled pages via `VirtualAlloc`.
///
/// Returns the region address and its page-rounded capacity.
pub fn pages_allocate(size: usize) -> std::io::Result<(*mut std::ffi::c_void, usize)> {
    let capacity = pages_capacity(size);
    unsafe {
        let ptr = VirtualAlloc(
            std::ptr::null_mut(),
            capacity,
            MEM_COMMIT | MEM_RESERVE,
            PAGE_READWRITE,
        );
        if ptr.is_null() {
            let error = GetLastError();
            return Err(std::io::Error::from_raw_os_error(error as i32));
        }
        Ok((ptr, capacity))
    }
}

/// Moves a page region to a new region of the requested size, copying the
/// overlapping prefix. There is no in-place remap on Windows.
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

/// Releases a page region.
///
/// # Safety
///
/// `ptr` and `capacity` must describe a live region, and no references into
/// it may be used afterwards.
pub unsafe fn pages_release(ptr: *mut std::ffi::c_void, capacity: usize) -> std::io::Result<()> {
    debug_assert!(capacity.is_multiple_of(page_size()));
    unsafe {
        let result = VirtualFree(ptr, 0, MEM_RELEASE);
        if result == 0 {
            let error = GetLastError();
            return Err(std::io::Error::from_raw_os_error(error as i32));
        }
    }
    Ok(())
}

/// Number of bytes a page region of `size` bytes actually occupies.
pub fn pages_capacity(size: usize) -> usize {
    let page_size = page_size();
    debug_assert!(page_size.is_power_of_two());
    size.max(1).saturating_add(page_size - 1) & !(page_size - 1)
}

/// Gets the system's page size in bytes, cached after the first call.
pub fn page_size() -> usize {
    static PAGE_SIZE: OnceLock<usize> = OnceLock::new();

    *PAGE_SIZE.get_or_init(|| unsafe {
        let mut system_info: SYSTEM_INFO = std::mem::zeroed();
        GetSystemInfo(&mut system_info);
        system_info.dwPageSize as usize
    })
}
