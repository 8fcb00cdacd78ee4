pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Checks that a region of `available` bytes can back a view that needs
/// `required` bytes.
///
/// An empty region never qualifies, even for a zero-byte requirement.
#[inline]
pub fn verify_size(available: usize, required: usize) -> Result<()> {
    if available != 0 && available >= required {
        Ok(())
    } else {
        insufficient_size(available, required)
    }
}

/// Checks that `address` is a multiple of `alignment` (a power of two).
#[inline]
pub fn verify_alignment(address: usize, alignment: usize) -> Result<()> {
    debug_assert!(alignment.is_power_of_two());
    if address & (alignment - 1) == 0 {
        Ok(())
    } else {
        misaligned(address, alignment)
    }
}

#[cold]
fn insufficient_size(available: usize, required: usize) -> Result<()> {
    Err(crate::error::Error::insufficient_size(required, available))
}

#[cold]
fn misaligned(address: usize, alignment: usize) -> Result<()> {
    Err(crate::error::Error::misaligned(address, alignment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_verify_size() {
        assert!(verify_size(8, 4).is_ok());
        assert!(verify_size(4, 4).is_ok());
        assert!(verify_size(1, 0).is_ok());
        assert!(matches!(
            verify_size(3, 4).unwrap_err().kind(),
            ErrorKind::InsufficientSize {
                required: 4,
                available: 3
            }
        ));
        assert!(verify_size(0, 0).is_err());
    }

    #[test]
    fn test_verify_alignment() {
        assert!(verify_alignment(0, 8).is_ok());
        assert!(verify_alignment(64, 8).is_ok());
        assert!(verify_alignment(65, 1).is_ok());
        assert!(matches!(
            verify_alignment(66, 4).unwrap_err().kind(),
            ErrorKind::Misaligned {
                address: 66,
                required: 4
            }
        ));
    }
}
