pub mod allocator;

#[cfg_attr(any(target_os = "linux"), path = "sys_linux.rs")]
#[cfg_attr(windows, path = "sys_win.rs")]
#[cfg_attr(not(any(target_os = "linux", windows)), path = "sys_fallback.rs")]
pub mod sys;

pub use allocator::{HeapAllocator, PageAllocator, SystemAllocator};
