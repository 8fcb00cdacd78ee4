//! Options controlling how owning blocks obtain and grow their memory.

use std::sync::Arc;

use memview_sys_alloc::{HeapAllocator, SystemAllocator};

/// Options for allocating an owning [`MemoryBlock`](crate::MemoryBlock).
#[derive(Debug, Clone)]
pub struct AllocOptions {
    allocator: Arc<dyn SystemAllocator>,
    zero_on_grow: bool,
}

impl AllocOptions {
    /// Creates options backed by the C heap, with zero-filled growth.
    pub fn new() -> Self {
        Self {
            allocator: Arc::new(HeapAllocator),
            zero_on_grow: true,
        }
    }

    /// Sets the system allocator that serves allocate, resize and free.
    ///
    /// # Arguments
    /// * `allocator` - Any [`SystemAllocator`], e.g. `PageAllocator` for
    ///   page-aligned blocks
    pub fn allocator(mut self, allocator: Arc<dyn SystemAllocator>) -> Self {
        self.allocator = allocator;
        self
    }

    /// Sets whether bytes gained by a growing resize are zero-filled.
    ///
    /// When disabled, their contents are whatever the allocator left there.
    pub fn zero_on_grow(mut self, zero_on_grow: bool) -> Self {
        self.zero_on_grow = zero_on_grow;
        self
    }

    /// The allocator blocks created with these options draw from.
    pub fn get_allocator(&self) -> &Arc<dyn SystemAllocator> {
        &self.allocator
    }

    /// Whether a growing resize zero-fills the bytes it adds.
    pub fn get_zero_on_grow(&self) -> bool {
        self.zero_on_grow
    }
}

impl Default for AllocOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use memview_sys_alloc::PageAllocator;

    use super::*;

    #[test]
    fn test_defaults_and_setters() {
        let options = AllocOptions::default();
        assert!(options.get_zero_on_grow());
        assert_eq!(options.get_allocator().alignment(), HeapAllocator.alignment());

        let options = AllocOptions::new()
            .allocator(Arc::new(PageAllocator))
            .zero_on_grow(false);
        assert!(!options.get_zero_on_grow());
        assert_eq!(options.get_allocator().alignment(), PageAllocator.alignment());
    }
}
