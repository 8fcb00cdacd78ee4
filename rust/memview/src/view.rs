//! View projection: reinterpreting a block's bytes as scalars, sequences and
//! aggregates in place.
//!
//! Every projection checks, in order: that the block was not freed, that
//! the requested shape resolves, that the block holds at least one element
//! of it, and that the block is writable (mutable projections only).
//!
//! Dynamic projections ([`MemoryBlock::project`]) and by-value access
//! ([`MemoryBlock::read`], [`View::read_scalar`], [`View::write_scalar`])
//! work on bytes and accept any address. Accessors that hand out `&T` or
//! `&mut T` additionally need the address to suit `T`'s alignment and fail
//! with `Misaligned` otherwise.

use std::fmt;

use bytemuck::Pod;
use memview_common::{
    Result,
    error::Error,
    result::verify_size,
};

use crate::{
    block::MemoryBlock,
    raw,
    shape::{ResolvedShape, Scalar, ScalarKind, Shape},
};

impl MemoryBlock<'_> {
    /// Views the leading bytes as a scalar in native byte order.
    ///
    /// The block's address must be aligned for `T`; [`MemoryBlock::read`]
    /// and [`MemoryBlock::write`] have no such requirement.
    pub fn as_scalar<T: Scalar>(&self) -> Result<&T> {
        self.as_pod()
    }

    /// Views the leading bytes as a mutable scalar. Writes land directly in
    /// the block and are visible through every other view of it.
    pub fn as_scalar_mut<T: Scalar>(&mut self) -> Result<&mut T> {
        self.as_pod_mut()
    }

    /// Views the leading `size_of::<T>()` bytes as a `T`.
    pub fn as_aggregate<T: Pod>(&self) -> Result<&T> {
        self.as_pod()
    }

    pub fn as_aggregate_mut<T: Pod>(&mut self) -> Result<&mut T> {
        self.as_pod_mut()
    }

    /// Views the block as `floor(size / size_of::<T>())` elements of `T`.
    ///
    /// Trailing bytes that do not make up a whole element are not part of
    /// the view. Fails with `InsufficientSize` rather than returning an
    /// empty slice when not even one element fits.
    pub fn as_slice<T: Pod>(&self) -> Result<&[T]> {
        self.ensure_live()?;
        verify_element::<T>()?;
        let bytes = self.checked_bytes(size_of::<T>(), align_of::<T>())?;
        raw::cast_slice(bytes)
    }

    pub fn as_slice_mut<T: Pod>(&mut self) -> Result<&mut [T]> {
        self.ensure_live()?;
        verify_element::<T>()?;
        let bytes = self.checked_bytes_mut(size_of::<T>(), align_of::<T>())?;
        raw::cast_slice_mut(bytes)
    }

    /// The block's entire byte range.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        self.checked_bytes(1, 1)
    }

    pub fn as_bytes_mut(&mut self) -> Result<&mut [u8]> {
        self.checked_bytes_mut(1, 1)
    }

    /// Copies the leading `size_of::<T>()` bytes out as a `T`, in native
    /// byte order and at any alignment.
    pub fn read<T: Pod>(&self) -> Result<T> {
        let bytes = self.checked_bytes(size_of::<T>(), 1)?;
        raw::read_unaligned(bytes)
    }

    /// Overwrites the leading `size_of::<T>()` bytes with `value`, at any
    /// alignment.
    pub fn write<T: Pod>(&mut self, value: T) -> Result<()> {
        let bytes = self.checked_bytes_mut(size_of::<T>(), 1)?;
        raw::write_unaligned(bytes, &value)
    }

    /// Projects the block as a dynamically described `shape`.
    ///
    /// Pointer shapes are unwrapped to their pointee. The view is writable
    /// if the block is. The block's address is not checked against the
    /// element alignment; the view's byte-based accessors work anywhere.
    pub fn project(&mut self, shape: &Shape) -> Result<View<'_>> {
        self.ensure_live()?;
        let resolved = shape.resolve()?;
        let required = resolved.required_size();
        let (len, span) = resolved.extent(self.size());
        let generation = self.generation();
        let bytes = if self.is_writable() {
            let bytes = self.checked_bytes_mut(required, 1)?;
            ViewBytes::Exclusive(&mut bytes[..span])
        } else {
            let bytes = self.checked_bytes(required, 1)?;
            ViewBytes::Shared(&bytes[..span])
        };
        Ok(View {
            shape: resolved,
            len,
            bytes,
            generation,
        })
    }

    /// Validates that `shape` can be projected now and returns a detached
    /// handle that can be turned into a [`View`] later with
    /// [`MemoryBlock::resolve`].
    pub fn handle(&self, shape: Shape) -> Result<ViewHandle> {
        self.ensure_live()?;
        verify_size(self.size(), shape.resolve()?.required_size())?;
        Ok(ViewHandle {
            generation: self.generation(),
            shape,
        })
    }

    /// Projects a handle obtained earlier from this block.
    ///
    /// # Errors
    ///
    /// `AlreadyFreed` if the block was freed since, `StaleView` if it was
    /// resized since, otherwise whatever [`MemoryBlock::project`] reports.
    pub fn resolve(&mut self, handle: &ViewHandle) -> Result<View<'_>> {
        self.ensure_live()?;
        if handle.generation != self.generation() {
            return Err(Error::stale_view(handle.generation, self.generation()));
        }
        self.project(&handle.shape)
    }

    fn as_pod<T: Pod>(&self) -> Result<&T> {
        let bytes = self.checked_bytes(size_of::<T>(), align_of::<T>())?;
        raw::cast_ref(bytes)
    }

    fn as_pod_mut<T: Pod>(&mut self) -> Result<&mut T> {
        let bytes = self.checked_bytes_mut(size_of::<T>(), align_of::<T>())?;
        raw::cast_mut(bytes)
    }
}

fn verify_element<T>() -> Result<()> {
    if size_of::<T>() == 0 {
        return Err(Error::unsupported_shape("sequence of zero-sized elements"));
    }
    Ok(())
}

enum ViewBytes<'b> {
    Shared(&'b [u8]),
    Exclusive(&'b mut [u8]),
}

/// A dynamically shaped view over a block's bytes.
///
/// The view borrows the block, so it cannot outlive a resize or free.
pub struct View<'b> {
    shape: ResolvedShape,
    len: usize,
    bytes: ViewBytes<'b>,
    generation: u64,
}

impl<'b> View<'b> {
    pub fn shape(&self) -> ResolvedShape {
        self.shape
    }

    /// Number of elements: `floor(size / W)` for sequences, 1 otherwise.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes covered by the view's elements.
    pub fn byte_len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_writable(&self) -> bool {
        matches!(self.bytes, ViewBytes::Exclusive(_))
    }

    /// Generation of the block when the view was projected.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.bytes {
            ViewBytes::Shared(bytes) => *bytes,
            ViewBytes::Exclusive(bytes) => &**bytes,
        }
    }

    pub fn as_bytes_mut(&mut self) -> Result<&mut [u8]> {
        match &mut self.bytes {
            ViewBytes::Shared(_) => Err(Error::immutable_borrow("mutable view")),
            ViewBytes::Exclusive(bytes) => Ok(&mut **bytes),
        }
    }

    /// Borrows the view's leading bytes as a `T`. Fails with `Misaligned`
    /// if the view does not start on a `T` boundary.
    pub fn get<T: Pod>(&self) -> Result<&T> {
        raw::cast_ref(self.as_bytes())
    }

    pub fn get_mut<T: Pod>(&mut self) -> Result<&mut T> {
        raw::cast_mut(self.as_bytes_mut()?)
    }

    pub fn as_slice<T: Pod>(&self) -> Result<&[T]> {
        verify_element::<T>()?;
        raw::cast_slice(self.as_bytes())
    }

    pub fn as_slice_mut<T: Pod>(&mut self) -> Result<&mut [T]> {
        verify_element::<T>()?;
        raw::cast_slice_mut(self.as_bytes_mut()?)
    }

    /// Copies the view's leading bytes out as a `T`, at any alignment.
    pub fn read<T: Pod>(&self) -> Result<T> {
        raw::read_unaligned(self.as_bytes())
    }

    /// Overwrites the view's leading bytes with `value`, at any alignment.
    pub fn write<T: Pod>(&mut self, value: T) -> Result<()> {
        raw::write_unaligned(self.as_bytes_mut()?, &value)
    }

    /// Writes `value` in native byte order over the view's leading bytes.
    pub fn write_scalar(&mut self, value: ScalarValue) -> Result<()> {
        match value {
            ScalarValue::I8(v) => self.write(v),
            ScalarValue::U8(v) => self.write(v),
            ScalarValue::I16(v) => self.write(v),
            ScalarValue::U16(v) => self.write(v),
            ScalarValue::I32(v) => self.write(v),
            ScalarValue::U32(v) => self.write(v),
            ScalarValue::I64(v) => self.write(v),
            ScalarValue::U64(v) => self.write(v),
            ScalarValue::Isize(v) => self.write(v),
            ScalarValue::Usize(v) => self.write(v),
        }
    }

    /// Reads the value of a scalar view, or `None` for other shapes.
    pub fn read_scalar(&self) -> Option<ScalarValue> {
        match self.shape {
            ResolvedShape::Scalar(kind) => ScalarValue::read(kind, self.as_bytes()),
            _ => None,
        }
    }
}

impl fmt::Debug for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("shape", &self.shape)
            .field("len", &self.len)
            .field("writable", &self.is_writable())
            .field("generation", &self.generation)
            .finish()
    }
}

/// A scalar read out of a view, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarValue {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    Isize(isize),
    Usize(usize),
}

macro_rules! read_ne {
    ($bytes:expr, $ty:ty) => {
        <$ty>::from_ne_bytes($bytes.get(..size_of::<$ty>())?.try_into().ok()?)
    };
}

impl ScalarValue {
    fn read(kind: ScalarKind, bytes: &[u8]) -> Option<ScalarValue> {
        let value = match kind {
            ScalarKind::I8 => ScalarValue::I8(read_ne!(bytes, i8)),
            ScalarKind::U8 => ScalarValue::U8(read_ne!(bytes, u8)),
            ScalarKind::I16 => ScalarValue::I16(read_ne!(bytes, i16)),
            ScalarKind::U16 => ScalarValue::U16(read_ne!(bytes, u16)),
            ScalarKind::I32 => ScalarValue::I32(read_ne!(bytes, i32)),
            ScalarKind::U32 => ScalarValue::U32(read_ne!(bytes, u32)),
            ScalarKind::I64 => ScalarValue::I64(read_ne!(bytes, i64)),
            ScalarKind::U64 => ScalarValue::U64(read_ne!(bytes, u64)),
            ScalarKind::Isize => ScalarValue::Isize(read_ne!(bytes, isize)),
            ScalarKind::Usize => ScalarValue::Usize(read_ne!(bytes, usize)),
        };
        Some(value)
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarValue::I8(_) => ScalarKind::I8,
            ScalarValue::U8(_) => ScalarKind::U8,
            ScalarValue::I16(_) => ScalarKind::I16,
            ScalarValue::U16(_) => ScalarKind::U16,
            ScalarValue::I32(_) => ScalarKind::I32,
            ScalarValue::U32(_) => ScalarKind::U32,
            ScalarValue::I64(_) => ScalarKind::I64,
            ScalarValue::U64(_) => ScalarKind::U64,
            ScalarValue::Isize(_) => ScalarKind::Isize,
            ScalarValue::Usize(_) => ScalarKind::Usize,
        }
    }

    /// Widens the value to `i128`, which holds every supported kind.
    pub fn as_i128(&self) -> i128 {
        match *self {
            ScalarValue::I8(v) => v.into(),
            ScalarValue::U8(v) => v.into(),
            ScalarValue::I16(v) => v.into(),
            ScalarValue::U16(v) => v.into(),
            ScalarValue::I32(v) => v.into(),
            ScalarValue::U32(v) => v.into(),
            ScalarValue::I64(v) => v.into(),
            ScalarValue::U64(v) => v.into(),
            ScalarValue::Isize(v) => v as i128,
            ScalarValue::Usize(v) => v as i128,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.as_i128(), self.kind())
    }
}

/// A shape validated against a block at a particular generation.
///
/// Unlike a [`View`], a handle does not borrow the block; it is checked
/// against the block's generation when resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewHandle {
    generation: u64,
    shape: Shape,
}

impl ViewHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

#[cfg(test)]
mod tests {
    use memview_common::error::ErrorKind;

    use super::*;
    use crate::shape::Category;

    #[repr(C)]
    #[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
    struct Foo {
        a: u16,
        b: u16,
    }

    #[test]
    fn test_scalar_projection_aliases_bytes() {
        let mut block = MemoryBlock::allocate(8).unwrap();
        *block.as_scalar_mut::<u32>().unwrap() = 0x11223344;
        let bytes = block.as_slice::<u8>().unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..4], &0x11223344u32.to_ne_bytes());
        assert_eq!(
            *block.as_scalar::<u16>().unwrap(),
            u16::from_ne_bytes([bytes[0], bytes[1]])
        );
    }

    #[test]
    fn test_scalar_widths() {
        for size in 0..16usize {
            let block = MemoryBlock::allocate(size).unwrap();
            for (width, ok) in [
                (1, block.as_scalar::<u8>().is_ok()),
                (2, block.as_scalar::<i16>().is_ok()),
                (4, block.as_scalar::<u32>().is_ok()),
                (8, block.as_scalar::<i64>().is_ok()),
            ] {
                assert_eq!(ok, size >= width, "size {size}, width {width}");
            }
        }
    }

    #[test]
    fn test_insufficient_size_reports_extent() {
        let block = MemoryBlock::allocate(3).unwrap();
        let err = block.as_scalar::<u32>().unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InsufficientSize {
                required: 4,
                available: 3
            }
        ));
    }

    #[test]
    fn test_slice_count_is_floor() {
        for size in 0..40usize {
            let block = MemoryBlock::allocate(size).unwrap();
            match block.as_slice::<u32>() {
                Ok(elements) => {
                    assert!(size >= 4);
                    assert_eq!(elements.len(), size / 4);
                }
                Err(e) => {
                    assert!(size < 4);
                    assert!(matches!(e.kind(), ErrorKind::InsufficientSize { .. }));
                }
            }
        }
    }

    #[test]
    fn test_aggregate_projection() {
        let mut block = MemoryBlock::allocate(6).unwrap();
        *block.as_aggregate_mut::<Foo>().unwrap() = Foo { a: 1, b: 2 };
        assert_eq!(block.as_slice::<u16>().unwrap(), &[1, 2, 0]);
        assert_eq!(*block.as_aggregate::<Foo>().unwrap(), Foo { a: 1, b: 2 });
        assert!(matches!(
            block.as_aggregate::<[u16; 4]>().unwrap_err().kind(),
            ErrorKind::InsufficientSize { .. }
        ));
    }

    #[test]
    fn test_projection_after_free() {
        let mut block = MemoryBlock::allocate(16).unwrap();
        block.free();
        let shapes = [
            Shape::scalar::<u8>(),
            Shape::sequence_of(Shape::scalar::<u32>()),
            Shape::aggregate::<Foo>(),
            Shape::pointer_to(Shape::scalar::<u64>()),
            Shape::Unsupported(Category::Callable),
        ];
        for shape in &shapes {
            let err = block.project(shape).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::AlreadyFreed), "{shape}");
        }
        assert!(matches!(
            block.as_scalar::<u8>().unwrap_err().kind(),
            ErrorKind::AlreadyFreed
        ));
        assert!(matches!(
            block.as_slice_mut::<u8>().unwrap_err().kind(),
            ErrorKind::AlreadyFreed
        ));
        assert!(matches!(
            block.handle(Shape::scalar::<u8>()).unwrap_err().kind(),
            ErrorKind::AlreadyFreed
        ));
    }

    #[test]
    fn test_project_sequence() {
        let mut block = MemoryBlock::allocate_sequence(2, 8).unwrap();
        let mut view = block
            .project(&Shape::sequence_of(Shape::scalar::<i16>()))
            .unwrap();
        assert_eq!(view.len(), 8);
        assert_eq!(view.byte_len(), 16);
        assert!(view.is_writable());
        view.as_slice_mut::<i16>().unwrap()[7] = -1;
        assert_eq!(view.read_scalar(), None);
        drop(view);
        assert_eq!(block.as_slice::<i16>().unwrap()[7], -1);
    }

    #[test]
    fn test_project_drops_partial_tail() {
        let mut block = MemoryBlock::allocate(11).unwrap();
        let view = block
            .project(&Shape::sequence_of(Shape::aggregate::<Foo>()))
            .unwrap();
        assert_eq!(view.len(), 2);
        assert_eq!(view.byte_len(), 8);
        assert_eq!(view.as_slice::<Foo>().unwrap().len(), 2);
    }

    #[test]
    fn test_project_sequence_of_pointers() {
        use crate::shape::NATIVE_WIDTH;

        let mut block = MemoryBlock::allocate(4 * NATIVE_WIDTH + 3).unwrap();
        let shape = Shape::sequence_of(Shape::pointer_to(Shape::scalar::<u8>()));
        let view = block.project(&shape).unwrap();
        assert_eq!(view.len(), 4);
        assert_eq!(view.byte_len(), 4 * NATIVE_WIDTH);
        assert_eq!(view.as_slice::<usize>().unwrap(), &[0; 4]);
    }

    #[test]
    fn test_project_through_pointer() {
        let mut block = MemoryBlock::allocate(8).unwrap();
        *block.as_scalar_mut::<i32>().unwrap() = -7;
        let shape = Shape::pointer_to(Shape::pointer_to(Shape::scalar::<i32>()));
        let view = block.project(&shape).unwrap();
        assert_eq!(view.shape(), ResolvedShape::Scalar(ScalarKind::I32));
        assert_eq!(view.len(), 1);
        assert_eq!(view.read_scalar(), Some(ScalarValue::I32(-7)));
        assert_eq!(*view.get::<i32>().unwrap(), -7);
    }

    #[test]
    fn test_project_unsupported() {
        let mut block = MemoryBlock::allocate(8).unwrap();
        for category in [Category::KeyedMap, Category::Opaque, Category::Dynamic] {
            let shape = Shape::pointer_to(Shape::Unsupported(category));
            assert!(matches!(
                block.project(&shape).unwrap_err().kind(),
                ErrorKind::UnsupportedShape { .. }
            ));
        }
    }

    #[test]
    fn test_zero_size_block_rejects_every_projection() {
        let mut block = MemoryBlock::allocate(0).unwrap();
        assert!(matches!(
            block.as_bytes().unwrap_err().kind(),
            ErrorKind::InsufficientSize { .. }
        ));
        assert!(matches!(
            block.as_slice::<u8>().unwrap_err().kind(),
            ErrorKind::InsufficientSize { .. }
        ));
        assert!(matches!(
            block
                .project(&Shape::sequence_of(Shape::scalar::<u8>()))
                .unwrap_err()
                .kind(),
            ErrorKind::InsufficientSize { .. }
        ));
    }

    #[test]
    fn test_zero_sized_slice_element() {
        let block = MemoryBlock::allocate(8).unwrap();
        assert!(matches!(
            block.as_slice::<[u8; 0]>().unwrap_err().kind(),
            ErrorKind::UnsupportedShape { .. }
        ));
    }

    #[test]
    fn test_handle_detects_resize() {
        let mut block = MemoryBlock::allocate(8).unwrap();
        let handle = block.handle(Shape::scalar::<u64>()).unwrap();
        assert_eq!(handle.generation(), 0);
        {
            let mut view = block.resolve(&handle).unwrap();
            *view.get_mut::<u64>().unwrap() = 42;
        }

        block.resize(16).unwrap();
        match block.resolve(&handle).unwrap_err().kind() {
            ErrorKind::StaleView {
                view_generation,
                block_generation,
            } => {
                assert_eq!(*view_generation, 0);
                assert_eq!(*block_generation, 1);
            }
            other => panic!("unexpected error {other:?}"),
        }

        let handle = block.handle(handle.shape().clone()).unwrap();
        assert_eq!(
            block.resolve(&handle).unwrap().read_scalar(),
            Some(ScalarValue::U64(42))
        );

        block.free();
        assert!(matches!(
            block.resolve(&handle).unwrap_err().kind(),
            ErrorKind::AlreadyFreed
        ));
    }

    #[test]
    fn test_handle_validates_size() {
        let block = MemoryBlock::allocate(2).unwrap();
        assert!(matches!(
            block.handle(Shape::scalar::<u32>()).unwrap_err().kind(),
            ErrorKind::InsufficientSize { .. }
        ));
    }

    /// Returns an offset into `bytes` whose address is odd.
    fn odd_offset(bytes: &[u8]) -> usize {
        if (bytes.as_ptr() as usize).is_multiple_of(2) { 1 } else { 0 }
    }

    #[test]
    fn test_projection_at_odd_address() {
        let mut storage = [0u8; 16];
        let offset = odd_offset(&storage);
        storage[offset..offset + 4].copy_from_slice(&[0x44, 0x33, 0x22, 0x11]);
        let expected = u32::from_ne_bytes([0x44, 0x33, 0x22, 0x11]);
        {
            let mut block = MemoryBlock::adopt_slice_mut(&mut storage[offset..offset + 4]);
            assert_eq!(block.address() % 2, 1);

            assert!(matches!(
                block.as_scalar::<u32>().unwrap_err().kind(),
                ErrorKind::Misaligned { required: 4, .. }
            ));
            assert_eq!(block.read::<u32>().unwrap(), expected);

            let handle = block.handle(Shape::scalar::<u32>()).unwrap();
            let mut view = block.resolve(&handle).unwrap();
            assert_eq!(view.read_scalar(), Some(ScalarValue::U32(expected)));
            assert_eq!(view.read::<u32>().unwrap(), expected);
            view.write_scalar(ScalarValue::U32(u32::from_ne_bytes([1, 2, 3, 4]))).unwrap();
        }
        assert_eq!(&storage[offset..offset + 4], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_block_read_write_unaligned() {
        let mut storage = [0u8; 16];
        let offset = odd_offset(&storage);
        {
            let mut block = MemoryBlock::adopt_slice_mut(&mut storage[offset..offset + 9]);
            block.write(0x0102030405060708u64).unwrap();
            assert_eq!(block.read::<u64>().unwrap(), 0x0102030405060708);
            assert!(matches!(
                block.read::<[u64; 2]>().unwrap_err().kind(),
                ErrorKind::InsufficientSize {
                    required: 16,
                    available: 9
                }
            ));
        }
        assert_eq!(
            &storage[offset..offset + 8],
            &0x0102030405060708u64.to_ne_bytes()
        );
    }

    #[test]
    fn test_write_scalar_needs_room_and_access() {
        let values = [0u8; 2];
        let mut block = MemoryBlock::adopt_slice(&values);
        let mut view = block.project(&Shape::scalar::<u16>()).unwrap();
        assert!(matches!(
            view.write_scalar(ScalarValue::U16(1)).unwrap_err().kind(),
            ErrorKind::ImmutableBorrow { .. }
        ));

        let mut block = MemoryBlock::allocate(2).unwrap();
        let mut view = block.project(&Shape::scalar::<u16>()).unwrap();
        assert!(matches!(
            view.write_scalar(ScalarValue::U32(1)).unwrap_err().kind(),
            ErrorKind::InsufficientSize {
                required: 4,
                available: 2
            }
        ));
        view.write_scalar(ScalarValue::I16(-2)).unwrap();
        assert_eq!(view.read_scalar(), Some(ScalarValue::U16((-2i16) as u16)));
    }

    #[test]
    fn test_scalar_value_display() {
        assert_eq!(ScalarValue::I16(-3).to_string(), "-3i16");
        assert_eq!(ScalarValue::Usize(9).to_string(), "9usize");
        assert_eq!(ScalarValue::U64(u64::MAX).as_i128(), u64::MAX as i128);
    }
}
