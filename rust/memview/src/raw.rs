//! The only place raw block addresses become Rust references.
//!
//! Everything above this module works with byte slices and hands typed
//! reinterpretation to `bytemuck`, which checks size and alignment.

use std::ptr::NonNull;

use bytemuck::{Pod, PodCastError};
use memview_common::{Result, error::Error};

/// Borrows `len` bytes at `ptr`.
///
/// # Safety
///
/// `ptr..ptr + len` must be initialized memory that stays live and is not
/// written through any other path for `'a`.
#[inline]
pub(crate) unsafe fn bytes<'a>(ptr: NonNull<u8>, len: usize) -> &'a [u8] {
    unsafe { std::slice::from_raw_parts(ptr.as_ptr(), len) }
}

/// Mutably borrows `len` bytes at `ptr`.
///
/// # Safety
///
/// `ptr..ptr + len` must be initialized, writable memory that stays live and
/// is not accessed through any other path for `'a`.
#[inline]
pub(crate) unsafe fn bytes_mut<'a>(ptr: NonNull<u8>, len: usize) -> &'a mut [u8] {
    unsafe { std::slice::from_raw_parts_mut(ptr.as_ptr(), len) }
}

/// Zero-fills `len` bytes starting `offset` bytes past `ptr`.
///
/// # Safety
///
/// The range must lie inside one live, writable allocation.
#[inline]
pub(crate) unsafe fn zero(ptr: NonNull<u8>, offset: usize, len: usize) {
    unsafe { ptr.as_ptr().add(offset).write_bytes(0, len) }
}

/// Reinterprets the leading `size_of::<T>()` bytes as a `T`.
pub(crate) fn cast_ref<T: Pod>(bytes: &[u8]) -> Result<&T> {
    let size = std::mem::size_of::<T>();
    let head = bytes
        .get(..size)
        .ok_or_else(|| Error::insufficient_size(size, bytes.len()))?;
    bytemuck::try_from_bytes(head).map_err(|e| cast_error::<T>(e, bytes))
}

pub(crate) fn cast_mut<T: Pod>(bytes: &mut [u8]) -> Result<&mut T> {
    let size = std::mem::size_of::<T>();
    let available = bytes.len();
    let address = bytes.as_ptr() as usize;
    let head = bytes
        .get_mut(..size)
        .ok_or_else(|| Error::insufficient_size(size, available))?;
    bytemuck::try_from_bytes_mut(head).map_err(|e| cast_error_at::<T>(e, address, available))
}

/// Reinterprets the longest whole-element prefix as a slice of `T`.
pub(crate) fn cast_slice<T: Pod>(bytes: &[u8]) -> Result<&[T]> {
    let span = whole_elements::<T>(bytes.len());
    bytemuck::try_cast_slice(&bytes[..span]).map_err(|e| cast_error::<T>(e, bytes))
}

pub(crate) fn cast_slice_mut<T: Pod>(bytes: &mut [u8]) -> Result<&mut [T]> {
    let span = whole_elements::<T>(bytes.len());
    let available = bytes.len();
    let address = bytes.as_ptr() as usize;
    bytemuck::try_cast_slice_mut(&mut bytes[..span])
        .map_err(|e| cast_error_at::<T>(e, address, available))
}

/// Copies the leading `size_of::<T>()` bytes out as a `T`, at any alignment.
pub(crate) fn read_unaligned<T: Pod>(bytes: &[u8]) -> Result<T> {
    let size = std::mem::size_of::<T>();
    let head = bytes
        .get(..size)
        .ok_or_else(|| Error::insufficient_size(size, bytes.len()))?;
    Ok(bytemuck::pod_read_unaligned(head))
}

/// Copies `value` over the leading `size_of::<T>()` bytes, at any alignment.
pub(crate) fn write_unaligned<T: Pod>(bytes: &mut [u8], value: &T) -> Result<()> {
    let src = bytemuck::bytes_of(value);
    let available = bytes.len();
    let head = bytes
        .get_mut(..src.len())
        .ok_or_else(|| Error::insufficient_size(src.len(), available))?;
    head.copy_from_slice(src);
    Ok(())
}

fn whole_elements<T>(len: usize) -> usize {
    match std::mem::size_of::<T>() {
        0 => 0,
        size => len / size * size,
    }
}

fn cast_error<T>(e: PodCastError, bytes: &[u8]) -> Error {
    cast_error_at::<T>(e, bytes.as_ptr() as usize, bytes.len())
}

fn cast_error_at<T>(e: PodCastError, address: usize, available: usize) -> Error {
    match e {
        PodCastError::TargetAlignmentGreaterAndInputNotAligned
        | PodCastError::AlignmentMismatch => Error::misaligned(address, std::mem::align_of::<T>()),
        _ => Error::insufficient_size(std::mem::size_of::<T>(), available),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memview_common::error::ErrorKind;

    #[test]
    fn test_cast_ref_reads_native_order() {
        let word = 0x11223344u32;
        let bytes = bytemuck::bytes_of(&word);
        assert_eq!(*cast_ref::<u32>(bytes).unwrap(), 0x11223344);
        assert_eq!(
            *cast_ref::<u16>(bytes).unwrap(),
            u16::from_ne_bytes([bytes[0], bytes[1]])
        );
    }

    #[test]
    fn test_cast_ref_too_short() {
        let bytes = [0u8; 3];
        let err = cast_ref::<u32>(&bytes).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InsufficientSize {
                required: 4,
                available: 3
            }
        ));
    }

    #[test]
    fn test_cast_mut_misaligned() {
        let mut words = [0u64; 2];
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut words);
        let err = cast_mut::<u32>(&mut bytes[1..]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Misaligned { required: 4, .. }));
    }

    #[test]
    fn test_cast_slice_drops_partial_tail() {
        let words = [7u32; 2];
        let bytes: &[u8] = bytemuck::cast_slice(&words);
        assert_eq!(cast_slice::<u32>(&bytes[..7]).unwrap(), &[7]);
        assert!(cast_slice::<u32>(&bytes[..3]).unwrap().is_empty());
    }

    #[test]
    fn test_unaligned_round_trip_at_odd_offset() {
        let mut words = [0u64; 2];
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut words);
        write_unaligned(&mut bytes[1..], &0x11223344u32).unwrap();
        assert_eq!(&bytes[1..5], &0x11223344u32.to_ne_bytes());
        assert_eq!(read_unaligned::<u32>(&bytes[1..]).unwrap(), 0x11223344);
        assert!(matches!(
            read_unaligned::<u64>(&bytes[12..]).unwrap_err().kind(),
            ErrorKind::InsufficientSize {
                required: 8,
                available: 4
            }
        ));
        assert!(matches!(
            write_unaligned(&mut bytes[14..], &0u32).unwrap_err().kind(),
            ErrorKind::InsufficientSize {
                required: 4,
                available: 2
            }
        ));
    }

    #[test]
    fn test_zero_range() {
        let mut buf = [0xffu8; 8];
        let ptr = NonNull::new(buf.as_mut_ptr()).unwrap();
        unsafe { zero(ptr, 2, 4) };
        assert_eq!(buf, [0xff, 0xff, 0, 0, 0, 0, 0xff, 0xff]);
    }
}
