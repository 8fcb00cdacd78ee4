use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn allocation_failure(requested: usize, source: std::io::Error) -> Error {
        Error(ErrorKind::AllocationFailure { requested, source }.into())
    }

    pub fn already_freed() -> Error {
        Error(ErrorKind::AlreadyFreed.into())
    }

    pub fn insufficient_size(required: usize, available: usize) -> Error {
        Error(
            ErrorKind::InsufficientSize {
                required,
                available,
            }
            .into(),
        )
    }

    pub fn immutable_borrow(operation: impl Into<String>) -> Error {
        Error(
            ErrorKind::ImmutableBorrow {
                operation: operation.into(),
            }
            .into(),
        )
    }

    pub fn not_addressable(shape: impl Into<String>) -> Error {
        Error(
            ErrorKind::NotAddressable {
                shape: shape.into(),
            }
            .into(),
        )
    }

    pub fn unsupported_shape(shape: impl Into<String>) -> Error {
        Error(
            ErrorKind::UnsupportedShape {
                shape: shape.into(),
            }
            .into(),
        )
    }

    pub fn misaligned(address: usize, required: usize) -> Error {
        Error(ErrorKind::Misaligned { address, required }.into())
    }

    pub fn stale_view(view_generation: u64, block_generation: u64) -> Error {
        Error(
            ErrorKind::StaleView {
                view_generation,
                block_generation,
            }
            .into(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("failed to allocate {requested} bytes: {source}")]
    AllocationFailure {
        requested: usize,
        source: std::io::Error,
    },

    #[error("memory block was already freed")]
    AlreadyFreed,

    #[error("memory block is too small: {required} bytes required, {available} available")]
    InsufficientSize { required: usize, available: usize },

    #[error("{operation} is not permitted on borrowed memory")]
    ImmutableBorrow { operation: String },

    #[error("{shape} passed by value has no stable address")]
    NotAddressable { shape: String },

    #[error("unsupported shape: {shape}")]
    UnsupportedShape { shape: String },

    #[error("address {address:#x} is not aligned to {required} bytes")]
    Misaligned { address: usize, required: usize },

    #[error("view from generation {view_generation} used at block generation {block_generation}")]
    StaleView {
        view_generation: u64,
        block_generation: u64,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        let err = Error::insufficient_size(8, 3);
        assert!(matches!(
            err.kind(),
            ErrorKind::InsufficientSize {
                required: 8,
                available: 3
            }
        ));
        assert_eq!(
            err.to_string(),
            "memory block is too small: 8 bytes required, 3 available"
        );
        assert!(matches!(
            err.into_kind(),
            ErrorKind::InsufficientSize { .. }
        ));
    }

    #[test]
    fn test_allocation_failure_keeps_source() {
        let source = std::io::Error::from(std::io::ErrorKind::OutOfMemory);
        let err = Error::allocation_failure(1 << 40, source);
        match err.kind() {
            ErrorKind::AllocationFailure { requested, source } => {
                assert_eq!(*requested, 1 << 40);
                assert_eq!(source.kind(), std::io::ErrorKind::OutOfMemory);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::already_freed().to_string(),
            "memory block was already freed"
        );
        assert_eq!(
            Error::immutable_borrow("resize").to_string(),
            "resize is not permitted on borrowed memory"
        );
        assert_eq!(
            Error::misaligned(0x1001, 4).to_string(),
            "address 0x1001 is not aligned to 4 bytes"
        );
    }
}
