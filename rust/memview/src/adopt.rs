//! Adoption: borrowing the storage of existing values as memory blocks.
//!
//! [`HostValue`] describes a value's shape and, where it has one, its
//! backing storage. [`MemoryBlock::adopt`] turns it into a borrowed block or
//! explains why it cannot. The `adopt_*` constructors cover the common
//! cases directly.

use std::marker::PhantomData;
use std::ptr::NonNull;

use bytemuck::Pod;
use memview_common::{Result, error::Error};
use memview_common_traits::memory_owner::MemoryOwner;

use crate::{
    block::{Access, MemoryBlock},
    shape::{Category, Scalar, Shape},
};

/// Backing storage of a value: start address, byte extent and whether it
/// may be written through, borrowed for `'a`.
#[derive(Debug)]
pub struct Region<'a> {
    ptr: NonNull<u8>,
    len: usize,
    access: Access,
    _marker: PhantomData<&'a mut [u8]>,
}

impl<'a> Region<'a> {
    /// A read-only region over the bytes of `values`.
    pub fn from_slice<T: Pod>(values: &'a [T]) -> Region<'a> {
        let bytes: &'a [u8] = bytemuck::cast_slice(values);
        Region {
            ptr: NonNull::from(bytes).cast(),
            len: bytes.len(),
            access: Access::ReadOnly,
            _marker: PhantomData,
        }
    }

    /// A writable region over the bytes of `values`.
    pub fn from_slice_mut<T: Pod>(values: &'a mut [T]) -> Region<'a> {
        let bytes: &'a mut [u8] = bytemuck::cast_slice_mut(values);
        let len = bytes.len();
        Region {
            ptr: NonNull::from(bytes).cast(),
            len,
            access: Access::ReadWrite,
            _marker: PhantomData,
        }
    }

    pub fn from_ref<T: Pod>(value: &'a T) -> Region<'a> {
        Self::from_slice(std::slice::from_ref(value))
    }

    pub fn from_mut<T: Pod>(value: &'a mut T) -> Region<'a> {
        Self::from_slice_mut(std::slice::from_mut(value))
    }

    /// A writable region over the full capacity of `values`.
    ///
    /// Spare capacity beyond `len` is zero-filled first so that every byte
    /// of the region is initialized; the vector's length is left as is.
    pub fn from_vec<T: Pod>(values: &'a mut Vec<T>) -> Region<'a> {
        for slot in values.spare_capacity_mut() {
            slot.write(T::zeroed());
        }
        let len = values.capacity() * size_of::<T>();
        // Safety: a vector's buffer pointer is never null, even unallocated.
        let ptr = unsafe { NonNull::new_unchecked(values.as_mut_ptr().cast::<u8>()) };
        Region {
            ptr,
            len,
            access: Access::ReadWrite,
            _marker: PhantomData,
        }
    }

    /// A read-only region over the bytes of a UTF-8 string.
    pub fn from_text(text: &'a str) -> Region<'a> {
        Self::from_slice(text.as_bytes())
    }

    /// A read-only region over the initialized bytes reported by `owner`.
    ///
    /// Unlike adopting a growable vector, the extent is the owner's
    /// reported length, not its capacity.
    pub fn from_owner<O: MemoryOwner + ?Sized>(owner: &'a O) -> Region<'a> {
        let memory = owner.memory();
        let ptr = match NonNull::new(memory.ptr.cast_mut()) {
            Some(ptr) => ptr,
            None => NonNull::dangling(),
        };
        let len = if memory.ptr.is_null() { 0 } else { memory.len };
        Region {
            ptr,
            len,
            access: Access::ReadOnly,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_writable(&self) -> bool {
        self.access == Access::ReadWrite
    }

    fn into_block(self) -> MemoryBlock<'a> {
        MemoryBlock::borrowed(self.ptr, self.len, self.access)
    }
}

/// The shape of a value offered for adoption, together with whatever
/// storage it exposes.
#[derive(Debug)]
pub enum HostValue<'a> {
    /// A contiguous sequence; its header carries the storage address.
    Sequence(Region<'a>),
    Text(&'a str),
    /// One level of indirection. `target` is the storage the pointer refers
    /// to, when the pointee needs it to be addressable.
    Pointer {
        target: Option<Region<'a>>,
        pointee: Box<HostValue<'a>>,
    },
    /// A scalar or fixed-size aggregate held by value.
    Value(Shape),
    Unsupported(Category),
}

impl<'a> HostValue<'a> {
    /// A growable vector, adopted at its full capacity.
    pub fn vec<T: Pod>(values: &'a mut Vec<T>) -> HostValue<'a> {
        HostValue::Sequence(Region::from_vec(values))
    }

    pub fn slice<T: Pod>(values: &'a [T]) -> HostValue<'a> {
        HostValue::Sequence(Region::from_slice(values))
    }

    pub fn slice_mut<T: Pod>(values: &'a mut [T]) -> HostValue<'a> {
        HostValue::Sequence(Region::from_slice_mut(values))
    }

    pub fn text(text: &'a str) -> HostValue<'a> {
        HostValue::Text(text)
    }

    /// Any value that reports its own backing storage.
    ///
    /// The block is sized by the initialized length the owner reports, which
    /// departs from capacity-based adoption of growable sequences. Use
    /// [`HostValue::vec`] to adopt a vector at its full capacity.
    pub fn owner<O: MemoryOwner + ?Sized>(owner: &'a O) -> HostValue<'a> {
        HostValue::Sequence(Region::from_owner(owner))
    }

    /// A pointer to `pointee`, whose storage is `target`.
    pub fn pointer(target: Region<'a>, pointee: HostValue<'a>) -> HostValue<'a> {
        HostValue::Pointer {
            target: Some(target),
            pointee: Box::new(pointee),
        }
    }

    /// A shared reference to a fixed-size value.
    pub fn pointer_ref<T: Pod>(value: &'a T) -> HostValue<'a> {
        let shape = Shape::of_val(value);
        Self::pointer(Region::from_ref(value), HostValue::Value(shape))
    }

    /// An exclusive reference to a fixed-size value.
    pub fn pointer_mut<T: Pod>(value: &'a mut T) -> HostValue<'a> {
        let shape = Shape::of_val(value);
        Self::pointer(Region::from_mut(value), HostValue::Value(shape))
    }

    /// An exclusive reference to a scalar.
    pub fn pointer_to_scalar<T: Scalar>(value: &'a mut T) -> HostValue<'a> {
        Self::pointer(Region::from_mut(value), HostValue::Value(Shape::scalar::<T>()))
    }

    /// An extra level of indirection in front of `pointee`, such as a
    /// reference to a reference or to a vector header.
    pub fn indirect(pointee: HostValue<'a>) -> HostValue<'a> {
        HostValue::Pointer {
            target: None,
            pointee: Box::new(pointee),
        }
    }

    /// A fixed-size value passed by copy.
    pub fn by_value<T: Pod>(value: &T) -> HostValue<'a> {
        HostValue::Value(Shape::of_val(value))
    }

    pub fn unsupported(category: Category) -> HostValue<'a> {
        HostValue::Unsupported(category)
    }
}

impl<'a> MemoryBlock<'a> {
    /// Borrows the storage behind `value` as a block.
    ///
    /// Sequences and text are adopted at any depth of indirection. Scalars
    /// and aggregates need at least one pointer in front of them and take
    /// the storage of the innermost pointer that has one.
    ///
    /// # Errors
    ///
    /// - `UnsupportedShape` for categories without a fixed address and
    ///   extent.
    /// - `NotAddressable` for a scalar or aggregate held by value.
    pub fn adopt(value: HostValue<'a>) -> Result<MemoryBlock<'a>> {
        let mut target = None;
        let mut current = value;
        loop {
            match current {
                HostValue::Sequence(region) => return Ok(region.into_block()),
                HostValue::Text(text) => return Ok(Region::from_text(text).into_block()),
                HostValue::Pointer {
                    target: pointer_target,
                    pointee,
                } => {
                    if pointer_target.is_some() {
                        target = pointer_target;
                    }
                    current = *pointee;
                }
                HostValue::Unsupported(category) => {
                    return Err(Error::unsupported_shape(category.to_string()));
                }
                HostValue::Value(shape) => {
                    shape.resolve()?;
                    return match target {
                        Some(region) => Ok(region.into_block()),
                        None => Err(Error::not_addressable(shape.to_string())),
                    };
                }
            }
        }
    }

    /// Borrows a vector's full capacity. Spare capacity is zero-filled.
    pub fn adopt_vec<T: Pod>(values: &'a mut Vec<T>) -> MemoryBlock<'a> {
        Region::from_vec(values).into_block()
    }

    /// Borrows a slice read-only.
    pub fn adopt_slice<T: Pod>(values: &'a [T]) -> MemoryBlock<'a> {
        Region::from_slice(values).into_block()
    }

    pub fn adopt_slice_mut<T: Pod>(values: &'a mut [T]) -> MemoryBlock<'a> {
        Region::from_slice_mut(values).into_block()
    }

    /// Borrows the UTF-8 bytes of `text` read-only.
    pub fn adopt_text(text: &'a str) -> MemoryBlock<'a> {
        Region::from_text(text).into_block()
    }

    pub fn adopt_ref<T: Pod>(value: &'a T) -> MemoryBlock<'a> {
        Region::from_ref(value).into_block()
    }

    pub fn adopt_mut<T: Pod>(value: &'a mut T) -> MemoryBlock<'a> {
        Region::from_mut(value).into_block()
    }

    pub fn adopt_owner<O: MemoryOwner + ?Sized>(owner: &'a O) -> MemoryBlock<'a> {
        Region::from_owner(owner).into_block()
    }
}
